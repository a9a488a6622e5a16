//! Mapping error types

use thiserror::Error;

use crate::codec::CodecError;
use crate::value::FieldKind;

/// Errors raised while translating between records and rows
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MappingError {
    /// A driver row could not be turned into column values
    #[error("Row extraction error: {0}")]
    RowExtraction(String),

    /// A field could not be populated from its column
    #[error("Record initialization error: {record}.{column}: {source}")]
    RecordInitialization {
        record: &'static str,
        column: String,
        #[source]
        source: CodecError,
    },

    /// The configured primary key maps to a kind that cannot identify rows
    #[error("Unsupported primary key kind: {record}.{column} is {kind}")]
    UnsupportedPrimaryKeyKind {
        record: &'static str,
        column: String,
        kind: FieldKind,
    },

    /// The configured primary key names no field of the shape
    #[error("Unknown primary key: {record} has no column {column}")]
    UnknownPrimaryKey {
        record: &'static str,
        column: String,
    },

    /// A lookup key does not parse as the primary key's kind
    #[error("Invalid key {key:?} for {column}: {source}")]
    InvalidKey {
        column: String,
        key: String,
        #[source]
        source: CodecError,
    },
}

impl MappingError {
    pub fn record_initialization(
        record: &'static str,
        column: impl Into<String>,
        source: CodecError,
    ) -> Self {
        MappingError::RecordInitialization {
            record,
            column: column.into(),
            source,
        }
    }

    pub fn is_row_extraction(&self) -> bool {
        matches!(self, MappingError::RowExtraction(_))
    }

    pub fn is_record_initialization(&self) -> bool {
        matches!(self, MappingError::RecordInitialization { .. })
    }
}
