//! Value codec
//!
//! Converts native field values into bound-parameter [`Value`]s and back.
//! Each supported native type implements [`FieldCodec`] with one fixed policy:
//!
//! | native          | kind      | encode                   | decode accepts                  |
//! |-----------------|-----------|--------------------------|---------------------------------|
//! | `String`        | text      | `Text`                   | `Text`; anything else → `"invalid"` |
//! | `i16/i32/i64`   | integer   | `Integer`                | `Integer`, base-10 `Text`       |
//! | `bool`          | boolean   | `Boolean`                | `Boolean`                       |
//! | `Vec<String>`   | text[]    | `TextArray`              | `TextArray`, NULL elements skipped |
//! | `Uuid`          | uuid      | `Uuid`                   | `Uuid`                          |
//! | `DateTime<Utc>` | timestamp | `Timestamp`              | `Timestamp`                     |
//! | `Option<T>`     | pointer   | inner or `Null`          | `Null` or inner                 |
//!
//! Record shapes never read or write pointer fields; see [`crate::shape`].

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::value::{FieldKind, Value};

/// Sentinel assigned to text fields whose column held a non-text value
pub const INVALID_TEXT: &str = "invalid";

/// Errors raised while decoding a column value into a native field
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    /// The value's kind cannot populate a field of this kind
    #[error("unsupported kind: cannot assign {found} value to {expected} field")]
    UnsupportedKind {
        expected: FieldKind,
        found: &'static str,
    },

    /// The value could not be parsed as the field's kind
    #[error("parse error: {input:?} is not a valid {expected}: {reason}")]
    Parse {
        expected: FieldKind,
        input: String,
        reason: String,
    },
}

impl CodecError {
    pub fn unsupported(expected: FieldKind, found: &Value) -> Self {
        CodecError::UnsupportedKind {
            expected,
            found: found.kind_name(),
        }
    }

    pub fn parse(expected: FieldKind, input: impl Into<String>, reason: impl ToString) -> Self {
        CodecError::Parse {
            expected,
            input: input.into(),
            reason: reason.to_string(),
        }
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, CodecError::Parse { .. })
    }

    pub fn is_unsupported_kind(&self) -> bool {
        matches!(self, CodecError::UnsupportedKind { .. })
    }
}

/// Encode/decode pair for one native field type
pub trait FieldCodec: Sized {
    /// Kind reported for fields of this type
    const KIND: FieldKind;

    /// Converts the native value into a bound parameter
    fn encode(&self) -> Value;

    /// Converts a non-null column value into the native type
    fn decode(value: Value) -> Result<Self, CodecError>;
}

impl FieldCodec for String {
    const KIND: FieldKind = FieldKind::Text;

    fn encode(&self) -> Value {
        Value::Text(self.clone())
    }

    fn decode(value: Value) -> Result<Self, CodecError> {
        match value {
            Value::Text(text) => Ok(text),
            other => {
                warn!(found = other.kind_name(), "non-text value for text field, assigning sentinel");
                Ok(INVALID_TEXT.to_string())
            }
        }
    }
}

macro_rules! integer_codec {
    ($($int:ty),+) => {
        $(
            impl FieldCodec for $int {
                const KIND: FieldKind = FieldKind::Integer;

                fn encode(&self) -> Value {
                    Value::Integer(i64::from(*self))
                }

                fn decode(value: Value) -> Result<Self, CodecError> {
                    let wide = match value {
                        Value::Integer(n) => n,
                        Value::Text(text) => text
                            .trim()
                            .parse::<i64>()
                            .map_err(|e| CodecError::parse(FieldKind::Integer, text.as_str(), e))?,
                        other => {
                            return Err(CodecError::parse(
                                FieldKind::Integer,
                                other.render(),
                                format!("{} value is not integral", other.kind_name()),
                            ))
                        }
                    };
                    <$int>::try_from(wide)
                        .map_err(|e| CodecError::parse(FieldKind::Integer, wide.to_string(), e))
                }
            }
        )+
    };
}

integer_codec!(i16, i32, i64);

impl FieldCodec for bool {
    const KIND: FieldKind = FieldKind::Boolean;

    fn encode(&self) -> Value {
        Value::Boolean(*self)
    }

    fn decode(value: Value) -> Result<Self, CodecError> {
        match value {
            Value::Boolean(b) => Ok(b),
            other => Err(CodecError::unsupported(FieldKind::Boolean, &other)),
        }
    }
}

impl FieldCodec for Vec<String> {
    const KIND: FieldKind = FieldKind::TextArray;

    fn encode(&self) -> Value {
        Value::TextArray(self.iter().cloned().map(Some).collect())
    }

    fn decode(value: Value) -> Result<Self, CodecError> {
        match value {
            Value::TextArray(items) => Ok(items.into_iter().flatten().collect()),
            other => {
                warn!(found = other.kind_name(), "non-array value for text[] field, leaving empty");
                Ok(Vec::new())
            }
        }
    }
}

impl FieldCodec for Uuid {
    const KIND: FieldKind = FieldKind::Uuid;

    fn encode(&self) -> Value {
        Value::Uuid(*self)
    }

    fn decode(value: Value) -> Result<Self, CodecError> {
        match value {
            Value::Uuid(id) => Ok(id),
            other => Err(CodecError::unsupported(FieldKind::Uuid, &other)),
        }
    }
}

impl FieldCodec for DateTime<Utc> {
    const KIND: FieldKind = FieldKind::Timestamp;

    fn encode(&self) -> Value {
        Value::Timestamp(*self)
    }

    fn decode(value: Value) -> Result<Self, CodecError> {
        match value {
            Value::Timestamp(ts) => Ok(ts),
            other => Err(CodecError::unsupported(FieldKind::Timestamp, &other)),
        }
    }
}

impl<T: FieldCodec> FieldCodec for Option<T> {
    const KIND: FieldKind = FieldKind::Pointer;

    fn encode(&self) -> Value {
        match self {
            Some(inner) => inner.encode(),
            None => Value::Null,
        }
    }

    fn decode(value: Value) -> Result<Self, CodecError> {
        match value {
            Value::Null => Ok(None),
            other => T::decode(other).map(Some),
        }
    }
}

/// Parses a caller-supplied lookup key into a value of the given key kind
///
/// Used for primary-key lookups, where the caller passes the key as text.
pub fn parse_key(kind: FieldKind, key: &str) -> Result<Value, CodecError> {
    match kind {
        FieldKind::Text => Ok(Value::Text(key.to_string())),
        FieldKind::Integer => key
            .trim()
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|e| CodecError::parse(kind, key, e)),
        FieldKind::Uuid => Uuid::parse_str(key.trim())
            .map(Value::Uuid)
            .map_err(|e| CodecError::parse(kind, key, e)),
        FieldKind::Boolean | FieldKind::TextArray | FieldKind::Timestamp | FieldKind::Pointer => {
            Err(CodecError::UnsupportedKind {
                expected: kind,
                found: "text key",
            })
        }
    }
}
