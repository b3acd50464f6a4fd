use common::err::{LResult, LoaderError};
use common::feed::{Feed, IngestPath};

use crate::k_type::RecordKind;
use crate::schema::catalogue::Catalogue;
use crate::schema::table_def::TableDef;

/// Maps (feed, path, kind) to a destination table and hands out schemas.
pub struct TableRouter;

impl TableRouter {
    /// Destination table name. Prefix by path, suffix by feed.
    pub fn table_name(feed: Feed, path: IngestPath, kind: RecordKind) -> String {
        format!("{}{}{}", path.table_prefix(), kind.tag(), feed.table_suffix())
    }

    /// Destination table definition, or a schema error for a kind the
    /// (feed, path) pair does not carry.
    pub fn route(feed: Feed, path: IngestPath, kind: RecordKind) -> LResult<&'static TableDef> {
        let name = Self::table_name(feed, path, kind);
        Catalogue::global().get(&name).ok_or_else(|| {
            LoaderError::Schema(format!(
                "no destination table {} for kind {} on feed {}",
                name, kind, feed
            ))
        })
    }

    /// Schema lookup by concrete table name.
    pub fn schema(table: &str) -> Option<&'static TableDef> {
        Catalogue::global().get(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_compose_prefix_tag_suffix() {
        assert_eq!(
            TableRouter::table_name(Feed::Central, IngestPath::Accumulated, RecordKind::Ra),
            "NL_RA"
        );
        assert_eq!(
            TableRouter::table_name(Feed::Regional, IngestPath::RealTime, RecordKind::O6),
            "RT_O6_REG"
        );
    }

    #[test]
    fn route_resolves_known_pairs() {
        let def = TableRouter::route(Feed::Central, IngestPath::Accumulated, RecordKind::Se).unwrap();
        assert_eq!(def.name, "NL_SE");
        assert_eq!(def.kind, RecordKind::Se);
    }

    #[test]
    fn route_rejects_missing_pairs() {
        // masters have no real-time family
        assert!(TableRouter::route(Feed::Central, IngestPath::RealTime, RecordKind::Um).is_err());
        // regional-only kind on the central feed
        assert!(TableRouter::route(Feed::Central, IngestPath::Accumulated, RecordKind::Ba).is_err());
    }

    #[test]
    fn schema_lookup_by_name() {
        assert!(TableRouter::schema("NL_HR").is_some());
        assert!(TableRouter::schema("NL_NOPE").is_none());
    }
}
