use common::value::Value;

/// Rows bound for one table, flushed as one transaction.
///
/// Rows are already in schema column order by the time they land here;
/// the buffer never mixes destinations.
#[derive(Debug)]
pub struct BatchBuffer {
    table: String,
    capacity: usize,
    rows: Vec<Vec<Value>>,
}

impl BatchBuffer {
    pub fn new(table: impl Into<String>, capacity: usize) -> Self {
        Self {
            table: table.into(),
            capacity: capacity.max(1),
            rows: Vec::new(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Returns true when the buffer reached capacity.
    pub fn push(&mut self, row: Vec<Value>) -> bool {
        self.rows.push(row);
        self.rows.len() >= self.capacity
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Contents move out; the buffer is ready for the next batch.
    pub fn take_rows(&mut self) -> Vec<Vec<Value>> {
        std::mem::take(&mut self.rows)
    }
}
