//! Column values and field kinds
//!
//! `Value` is the closed set of column values the mapping engine moves between
//! records and the storage driver. `FieldKind` is the matching set of native
//! field kinds a record shape may declare. Every conversion in the crate is an
//! exhaustive match over one of these two enums.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

/// A dynamically-typed column value
///
/// Produced by the driver when decoding a row and by the codec when encoding a
/// record field into a bound parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL NULL
    Null,
    /// TEXT, VARCHAR and friends
    Text(String),
    /// Any integer width, widened to 64 bits
    Integer(i64),
    /// BOOLEAN
    Boolean(bool),
    /// TEXT[]; elements may individually be NULL
    TextArray(Vec<Option<String>>),
    /// UUID
    Uuid(Uuid),
    /// TIMESTAMP / TIMESTAMPTZ, normalized to UTC
    Timestamp(DateTime<Utc>),
}

impl Value {
    /// Returns the kind this value would populate, or `None` for NULL
    pub fn kind(&self) -> Option<FieldKind> {
        match self {
            Value::Null => None,
            Value::Text(_) => Some(FieldKind::Text),
            Value::Integer(_) => Some(FieldKind::Integer),
            Value::Boolean(_) => Some(FieldKind::Boolean),
            Value::TextArray(_) => Some(FieldKind::TextArray),
            Value::Uuid(_) => Some(FieldKind::Uuid),
            Value::Timestamp(_) => Some(FieldKind::Timestamp),
        }
    }

    /// Short name of the variant, used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self.kind() {
            Some(kind) => kind.as_str(),
            None => "null",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Renders the value as plain text
    ///
    /// Integers render in decimal, UUIDs in canonical hyphenated form and
    /// timestamps as RFC 3339. Arrays render in PostgreSQL literal form.
    pub fn render(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Text(text) => text.clone(),
            Value::Integer(n) => n.to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::TextArray(items) => {
                let inner: Vec<String> = items
                    .iter()
                    .map(|item| match item {
                        Some(text) => format!("\"{}\"", text.replace('"', "\\\"")),
                        None => "NULL".to_string(),
                    })
                    .collect();
                format!("{{{}}}", inner.join(","))
            }
            Value::Uuid(id) => id.hyphenated().to_string(),
            Value::Timestamp(ts) => ts.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<Uuid> for Value {
    fn from(id: Uuid) -> Self {
        Value::Uuid(id)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(ts: DateTime<Utc>) -> Self {
        Value::Timestamp(ts)
    }
}

/// Native kind of a record field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Text,
    Integer,
    Boolean,
    TextArray,
    Uuid,
    Timestamp,
    /// Optional (nullable) field; skipped by reads and writes
    Pointer,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Integer => "integer",
            FieldKind::Boolean => "boolean",
            FieldKind::TextArray => "text[]",
            FieldKind::Uuid => "uuid",
            FieldKind::Timestamp => "timestamp",
            FieldKind::Pointer => "pointer",
        }
    }

    /// Whether a field of this kind may serve as a primary key
    pub fn is_key_kind(&self) -> bool {
        matches!(self, FieldKind::Text | FieldKind::Integer | FieldKind::Uuid)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
