use std::collections::HashMap;

use once_cell::sync::Lazy;

use common::buffer::RecordBuffer;
use common::err::{LResult, LoaderError};
use common::feed::{Feed, IngestPath};

use crate::k_type::RecordKind;
use crate::layout::RecordLayout;
use crate::layouts;
use crate::parser::parsed_record::ParsedRecord;
use crate::parser::record_parser::parse_with_layout;
use crate::schema::router::TableRouter;

static CENTRAL: Lazy<ParserRegistry> = Lazy::new(|| ParserRegistry::new(Feed::Central));
static REGIONAL: Lazy<ParserRegistry> = Lazy::new(|| ParserRegistry::new(Feed::Regional));

/// Per-feed parser lookup: two-byte tag to layout.
///
/// A tag valid in both feeds resolves to a feed-specific layout only where
/// the bytes actually differ; everything else shares the central layout.
#[derive(Debug)]
pub struct ParserRegistry {
    feed: Feed,
    layouts: HashMap<&'static str, &'static RecordLayout>,
}

impl ParserRegistry {
    pub fn new(feed: Feed) -> Self {
        let mut map: HashMap<&'static str, &'static RecordLayout> = HashMap::new();
        for layout in layouts::all_layouts(feed) {
            map.insert(layout.kind().tag(), layout);
        }
        Self { feed, layouts: map }
    }

    /// The shared registry instance for `feed`.
    pub fn for_feed(feed: Feed) -> &'static ParserRegistry {
        match feed {
            Feed::Central => &CENTRAL,
            Feed::Regional => &REGIONAL,
        }
    }

    pub fn feed(&self) -> Feed {
        self.feed
    }

    pub fn has_kind(&self, tag: &str) -> bool {
        self.layouts.contains_key(tag)
    }

    pub fn supported_tags(&self) -> Vec<&'static str> {
        let mut tags: Vec<&'static str> = self.layouts.keys().copied().collect();
        tags.sort_unstable();
        tags
    }

    pub fn layout(&self, kind: RecordKind) -> Option<&'static RecordLayout> {
        self.layouts.get(kind.tag()).copied()
    }

    /// Parse one buffer into its destination rows.
    ///
    /// The first two ASCII bytes select the parser; unrecognised tags for
    /// this feed (or kinds with no table on `path`) are `UnknownKind`.
    pub fn parse(&self, path: IngestPath, buffer: &RecordBuffer) -> LResult<Vec<ParsedRecord>> {
        let tag = buffer
            .record_spec()
            .ok_or_else(|| LoaderError::UnknownKind(head_for_message(buffer)))?;

        let kind = RecordKind::from_tag(tag)
            .filter(|k| self.layouts.contains_key(k.tag()))
            .ok_or_else(|| LoaderError::UnknownKind(tag.to_string()))?;

        if path == IngestPath::RealTime && !kind.is_realtime() {
            return Err(LoaderError::UnknownKind(tag.to_string()));
        }

        let layout = self.layouts[kind.tag()];
        let table = TableRouter::table_name(self.feed, path, kind);
        parse_with_layout(layout, buffer, &table)
    }
}

fn head_for_message(buffer: &RecordBuffer) -> String {
    buffer
        .bytes()
        .iter()
        .take(2)
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join("")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pad_record(tag: &str, len: usize) -> RecordBuffer {
        let mut data = Vec::with_capacity(len);
        data.extend_from_slice(tag.as_bytes());
        data.resize(len, b' ');
        RecordBuffer::new(data, "test.dat")
    }

    #[test]
    fn central_has_38_kinds_regional_41() {
        assert_eq!(ParserRegistry::for_feed(Feed::Central).supported_tags().len(), 38);
        assert_eq!(ParserRegistry::for_feed(Feed::Regional).supported_tags().len(), 41);
    }

    #[test]
    fn unknown_tag_is_an_error() {
        let registry = ParserRegistry::for_feed(Feed::Central);
        let buf = pad_record("ZZ", 64);
        assert!(matches!(
            registry.parse(IngestPath::Accumulated, &buf),
            Err(LoaderError::UnknownKind(_))
        ));
        // regional-only kind on the central feed
        let buf = pad_record("BA", 512);
        assert!(matches!(
            registry.parse(IngestPath::Accumulated, &buf),
            Err(LoaderError::UnknownKind(_))
        ));
    }

    #[test]
    fn parsed_keys_match_declared_columns() {
        let registry = ParserRegistry::for_feed(Feed::Central);
        let layout = registry.layout(RecordKind::Ra).unwrap();
        let buf = pad_record("RA", layout.record_len());
        let rows = registry.parse(IngestPath::Accumulated, &buf).unwrap();
        assert_eq!(rows.len(), 1);

        let mut expected: Vec<String> =
            layout.columns().iter().map(|c| c.name.clone()).collect();
        let mut actual: Vec<String> =
            rows[0].field_names().map(|s| s.to_string()).collect();
        expected.sort();
        actual.sort();
        assert_eq!(actual, expected);
        assert_eq!(rows[0].table(), "NL_RA");
    }

    #[test]
    fn non_realtime_kind_rejected_on_the_live_path() {
        let registry = ParserRegistry::for_feed(Feed::Central);
        let layout = registry.layout(RecordKind::Um).unwrap();
        let buf = pad_record("UM", layout.record_len());
        assert!(registry.parse(IngestPath::Accumulated, &buf).is_ok());
        assert!(matches!(
            registry.parse(IngestPath::RealTime, &buf),
            Err(LoaderError::UnknownKind(_))
        ));
    }

    #[test]
    fn regional_routes_to_suffixed_tables() {
        let registry = ParserRegistry::for_feed(Feed::Regional);
        let layout = registry.layout(RecordKind::Ra).unwrap();
        let buf = pad_record("RA", layout.record_len());
        let rows = registry.parse(IngestPath::Accumulated, &buf).unwrap();
        assert_eq!(rows[0].table(), "NL_RA_REG");
    }
}
