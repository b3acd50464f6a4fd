use encoding_rs::SHIFT_JIS;

/// Decode a Shift-JIS text field at `offset..offset+len` into UTF-8.
///
/// Trailing ASCII spaces and NULs are trimmed. Invalid multi-byte
/// sequences fall back to a byte-preserving single-byte decoding so the
/// record survives; ASCII subsequences round-trip byte-identical either
/// way. Caller guarantees the slice is in bounds.
pub fn sjis_text(buf: &[u8], offset: usize, len: usize) -> String {
    let slice = &buf[offset..offset + len];
    let trimmed = trim_trailing(slice);
    if trimmed.is_empty() {
        return String::new();
    }

    let (decoded, _, had_errors) = SHIFT_JIS.decode(trimmed);
    if !had_errors {
        return decoded.into_owned();
    }

    // Fallback: each byte becomes the code point of the same value.
    // Deterministic, and lossless for the ASCII range.
    trimmed.iter().map(|b| char::from(*b)).collect()
}

fn trim_trailing(slice: &[u8]) -> &[u8] {
    let end = slice
        .iter()
        .rposition(|b| *b != b' ' && *b != 0)
        .map(|p| p + 1)
        .unwrap_or(0);
    &slice[..end]
}
