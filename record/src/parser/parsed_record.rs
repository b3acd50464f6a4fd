use std::collections::HashMap;

use common::value::Value;

/// One destination row: column name to typed value, keys unique.
///
/// Insertion order is irrelevant; the writer consults the table schema for
/// column order at flush time.
#[derive(Debug, Clone)]
pub struct ParsedRecord {
    table: String,
    values: HashMap<String, Value>,
}

impl ParsedRecord {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            values: HashMap::new(),
        }
    }

    /// The resolved destination table.
    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
