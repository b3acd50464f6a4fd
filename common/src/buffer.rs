use bytes::Bytes;

/// Offset of the two-ASCII-byte record kind tag.
pub const RECORD_SPEC_OFFSET: usize = 0;
pub const RECORD_SPEC_LEN: usize = 2;
/// Offset of the one-byte data class tag.
pub const DATA_KUBUN_OFFSET: usize = 2;

/// One raw record as delivered by the vendor link, plus the name of the
/// source file it came out of (the unit the skip-files set works in).
#[derive(Debug, Clone)]
pub struct RecordBuffer {
    data: Bytes,
    file_name: String,
}

impl RecordBuffer {
    pub fn new(data: impl Into<Bytes>, file_name: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            file_name: file_name.into(),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// The record kind tag, if the head two bytes are ASCII.
    pub fn record_spec(&self) -> Option<&str> {
        let head = self
            .data
            .get(RECORD_SPEC_OFFSET..RECORD_SPEC_OFFSET + RECORD_SPEC_LEN)?;
        if head.iter().all(|b| b.is_ascii_alphanumeric()) {
            std::str::from_utf8(head).ok()
        } else {
            None
        }
    }

    /// The one-byte data class tag ('1'..'9', 'A', 'B', 0 = unset).
    pub fn data_kubun(&self) -> u8 {
        self.data.get(DATA_KUBUN_OFFSET).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_tag_extraction() {
        let buf = RecordBuffer::new(&b"RA7underneath"[..], "20240601.dat");
        assert_eq!(buf.record_spec(), Some("RA"));
        assert_eq!(buf.data_kubun(), b'7');
        assert_eq!(buf.file_name(), "20240601.dat");
    }

    #[test]
    fn non_ascii_tag_is_none() {
        let buf = RecordBuffer::new(&[0xFFu8, 0x01, b'1'][..], "f");
        assert_eq!(buf.record_spec(), None);
    }

    #[test]
    fn short_buffer_is_safe() {
        let buf = RecordBuffer::new(&b"R"[..], "f");
        assert_eq!(buf.record_spec(), None);
        assert_eq!(buf.data_kubun(), 0);
    }
}
