//! Result rows as returned by a storage driver

use std::collections::HashMap;

use crate::error::MappingError;
use crate::value::Value;

/// One result row: column names aligned positionally with their values
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Row {
    pub fn new(columns: Vec<String>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    /// Builds a row from `(column, value)` pairs
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let (columns, values) = pairs.into_iter().map(|(k, v)| (k.into(), v)).unzip();
        Self { columns, values }
    }

    /// Column values in result order
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Column names in result order
    pub fn field_descriptions(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Looks up a column value by name
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|i| self.values.get(i))
    }

    /// Converts the row into a column map, dropping NULL values
    ///
    /// # Errors
    ///
    /// Returns `MappingError::RowExtraction` when names and values are not
    /// aligned.
    pub fn into_column_map(self) -> Result<HashMap<String, Value>, MappingError> {
        if self.columns.len() != self.values.len() {
            return Err(MappingError::RowExtraction(format!(
                "row has {} column names but {} values",
                self.columns.len(),
                self.values.len()
            )));
        }

        Ok(self
            .columns
            .into_iter()
            .zip(self.values)
            .filter(|(_, value)| !value.is_null())
            .collect())
    }
}
