use common::err::{LResult, LoaderError};

use crate::k_type::RecordKind;

/// Logical column types. The driver maps these to its own keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int,
    BigInt,
    Real,
    Text,
}

/// Fixed structural definition of one destination table.
#[derive(Debug, Clone)]
pub struct TableDef {
    pub name: String,
    /// Ordered; the writer binds values in exactly this order.
    pub columns: Vec<(String, ColumnType)>,
    /// Never empty. The writer refuses a keyless table.
    pub pk: Vec<String>,
    /// The record kind this table receives.
    pub kind: RecordKind,
}

impl TableDef {
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|(n, _)| n == name)
    }

    /// A table is only usable with a declared key whose columns exist.
    pub fn validate(&self) -> LResult<()> {
        if self.pk.is_empty() {
            return Err(LoaderError::Schema(format!(
                "table {} declares no primary key",
                self.name
            )));
        }
        for key in &self.pk {
            if !self.has_column(key) {
                return Err(LoaderError::Schema(format!(
                    "table {}: primary key column {} not in column list",
                    self.name, key
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(pk: Vec<&str>) -> TableDef {
        TableDef {
            name: "NL_RA".to_string(),
            columns: vec![
                ("Year".to_string(), ColumnType::Int),
                ("JyoCD".to_string(), ColumnType::Text),
            ],
            pk: pk.into_iter().map(|s| s.to_string()).collect(),
            kind: RecordKind::Ra,
        }
    }

    #[test]
    fn keyless_table_is_refused() {
        assert!(def(vec![]).validate().is_err());
    }

    #[test]
    fn phantom_key_column_is_refused() {
        assert!(def(vec!["RaceNum"]).validate().is_err());
    }

    #[test]
    fn valid_def_passes() {
        assert!(def(vec!["Year", "JyoCD"]).validate().is_ok());
    }
}
