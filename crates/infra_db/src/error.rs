//! Database error types
//!
//! This module defines the errors returned by the generic repository. Each
//! variant carries the table or operation it came from, and wraps the
//! underlying driver or mapping error where there is one.

use mapping_core::{DriverError, MappingError};
use thiserror::Error;

/// Errors that can occur during repository operations
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to establish a database connection
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// A lookup was attempted with a blank key
    #[error("Empty key: {table} lookup requires a primary key value")]
    EmptyKey { table: String },

    /// No row matched where exactly one was expected
    #[error("Entity not found: {0}")]
    NotFound(String),

    /// The driver failed to execute a statement
    #[error("Query failed in {operation}: {source}; statement: {statement}")]
    QueryFailed {
        operation: &'static str,
        statement: String,
        #[source]
        source: DriverError,
    },

    /// Rows could not be mapped to or from records
    #[error("Mapping failed in {operation}: {source}")]
    Mapping {
        operation: &'static str,
        #[source]
        source: MappingError,
    },

    /// One row of a multi-row result could not be mapped
    #[error("Mapping failed in {operation} at row {row}: {source}")]
    RowMapping {
        operation: &'static str,
        row: usize,
        #[source]
        source: MappingError,
    },
}

impl DatabaseError {
    /// Creates a not found error for a table and key
    ///
    /// # Example
    ///
    /// ```rust
    /// use infra_db::DatabaseError;
    ///
    /// let error = DatabaseError::not_found("applications", 2);
    /// assert!(error.to_string().contains("applications"));
    /// ```
    pub fn not_found(table: &str, key: impl std::fmt::Display) -> Self {
        DatabaseError::NotFound(format!("{} with key '{}' not found", table, key))
    }

    pub fn empty_key(table: &str) -> Self {
        DatabaseError::EmptyKey {
            table: table.to_string(),
        }
    }

    /// Wraps a driver error, promoting row decode failures to mapping errors
    pub fn from_driver(operation: &'static str, statement: &str, error: DriverError) -> Self {
        match error {
            DriverError::RowDecode(message) => DatabaseError::Mapping {
                operation,
                source: MappingError::RowExtraction(message),
            },
            other => DatabaseError::QueryFailed {
                operation,
                statement: statement.to_string(),
                source: other,
            },
        }
    }

    pub fn mapping(operation: &'static str, source: MappingError) -> Self {
        DatabaseError::Mapping { operation, source }
    }

    pub fn row_mapping(operation: &'static str, row: usize, source: MappingError) -> Self {
        DatabaseError::RowMapping { operation, row, source }
    }

    /// Position of the row that failed to map, for multi-row results
    pub fn row_index(&self) -> Option<usize> {
        match self {
            DatabaseError::RowMapping { row, .. } => Some(*row),
            _ => None,
        }
    }

    /// The mapping error underneath, if any
    pub fn mapping_error(&self) -> Option<&MappingError> {
        match self {
            DatabaseError::Mapping { source, .. } | DatabaseError::RowMapping { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Checks if this error indicates a record was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, DatabaseError::NotFound(_))
    }

    pub fn is_empty_key(&self) -> bool {
        matches!(self, DatabaseError::EmptyKey { .. })
    }

    pub fn is_query_failed(&self) -> bool {
        matches!(self, DatabaseError::QueryFailed { .. })
    }

    /// Checks if this error came from a row that could not be read
    pub fn is_row_extraction(&self) -> bool {
        self.mapping_error().is_some_and(MappingError::is_row_extraction)
    }

    /// Checks if this error came from a field that could not be populated
    pub fn is_record_initialization(&self) -> bool {
        self.mapping_error().is_some_and(MappingError::is_record_initialization)
    }

    /// Checks if this error is a constraint violation reported by the database
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, DatabaseError::QueryFailed { source, .. } if source.is_constraint_violation())
    }

    /// Checks if this error is a connection-related issue
    pub fn is_connection_error(&self) -> bool {
        match self {
            DatabaseError::ConnectionFailed(_) => true,
            DatabaseError::QueryFailed { source, .. } => source.is_connection_error(),
            _ => false,
        }
    }

    /// The driver error underneath a failed query, if any
    pub fn driver_error(&self) -> Option<&DriverError> {
        match self {
            DatabaseError::QueryFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<MappingError> for DatabaseError {
    fn from(source: MappingError) -> Self {
        DatabaseError::Mapping {
            operation: "configure",
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_decode_becomes_row_extraction() {
        let err = DatabaseError::from_driver(
            "list",
            "SELECT * FROM applications",
            DriverError::RowDecode("column meta has unsupported type JSONB".into()),
        );
        assert!(err.is_row_extraction());
        assert!(!err.is_query_failed());
    }

    #[test]
    fn test_row_mapping_names_row() {
        let err = DatabaseError::row_mapping(
            "list",
            3,
            MappingError::RowExtraction("2 column names for 3 values".into()),
        );
        assert_eq!(err.row_index(), Some(3));
        assert!(err.is_row_extraction());
        assert!(err.to_string().contains("at row 3"));
        assert_eq!(DatabaseError::empty_key("applications").row_index(), None);
    }

    #[test]
    fn test_query_failed_keeps_statement() {
        let err = DatabaseError::from_driver(
            "add",
            "INSERT INTO applications (name) VALUES ($1) RETURNING id, name",
            DriverError::NotNullViolation("null value in column \"namespace\"".into()),
        );
        assert!(err.is_query_failed());
        assert!(err.is_constraint_violation());
        assert!(err.to_string().contains("INSERT INTO applications"));
    }

    #[test]
    fn test_connection_classification() {
        let err = DatabaseError::from_driver("find", "SELECT 1", DriverError::Timeout(500));
        assert!(err.is_connection_error());
        assert!(DatabaseError::ConnectionFailed("refused".into()).is_connection_error());
        assert!(!DatabaseError::empty_key("applications").is_connection_error());
    }
}
