//! Repository descriptors
//!
//! A [`RepositoryDescriptor`] binds a record shape to a table and primary key.
//! It is validated once at construction and never mutated afterwards, so one
//! descriptor can be shared by every caller of a repository.

use std::fmt;
use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::codec::parse_key;
use crate::error::MappingError;
use crate::shape::{FieldDef, Record, Shape};
use crate::statement::{Statement, StatementBuilder};
use crate::value::{FieldKind, Value};

/// Default column stamped on update
pub const UPDATED_AT_COLUMN: &str = "updated_at";

/// Update-time stamping policy
///
/// When enabled, `UPDATE` statements carry the current time for the named
/// timestamp column instead of the record's own value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateStamp {
    pub stamp_updated_at: bool,
    pub column: String,
}

impl Default for UpdateStamp {
    fn default() -> Self {
        Self {
            stamp_updated_at: false,
            column: UPDATED_AT_COLUMN.to_string(),
        }
    }
}

impl UpdateStamp {
    /// Stamping enabled on the default `updated_at` column
    pub fn enabled() -> Self {
        Self {
            stamp_updated_at: true,
            ..Self::default()
        }
    }

    /// Stamping enabled on a custom column
    pub fn on_column(column: impl Into<String>) -> Self {
        Self {
            stamp_updated_at: true,
            column: column.into(),
        }
    }
}

/// Table, primary key and shape configuration for one repository
pub struct RepositoryDescriptor<R> {
    table: String,
    primary_key: String,
    key_index: usize,
    key_kind: FieldKind,
    update_stamp: UpdateStamp,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> RepositoryDescriptor<R> {
    /// Creates a descriptor for `R` stored in `table`
    ///
    /// # Errors
    ///
    /// - `MappingError::UnknownPrimaryKey` if no field maps to `primary_key`
    /// - `MappingError::UnsupportedPrimaryKeyKind` if the key field is not
    ///   text, integer or UUID
    pub fn new(table: impl Into<String>, primary_key: impl Into<String>) -> Result<Self, MappingError> {
        let primary_key = primary_key.into();
        let shape = R::shape();
        let key_index = shape
            .fields()
            .iter()
            .position(|f| f.column() == primary_key)
            .ok_or_else(|| MappingError::UnknownPrimaryKey {
                record: shape.name(),
                column: primary_key.clone(),
            })?;
        let field = &shape.fields()[key_index];

        if !field.kind().is_key_kind() {
            return Err(MappingError::UnsupportedPrimaryKeyKind {
                record: shape.name(),
                column: primary_key,
                kind: field.kind(),
            });
        }

        Ok(Self {
            table: table.into(),
            key_index,
            key_kind: field.kind(),
            primary_key,
            update_stamp: UpdateStamp::default(),
            _record: PhantomData,
        })
    }

    /// Sets the update-time stamping policy
    ///
    /// A stamp column that is missing from the shape or is not a timestamp
    /// field is logged and stamping is turned off.
    pub fn with_update_stamp(mut self, mut stamp: UpdateStamp) -> Self {
        if stamp.stamp_updated_at {
            match R::shape().field(&stamp.column) {
                Some(field) if field.kind() == FieldKind::Timestamp => {}
                Some(field) => {
                    warn!(
                        record = R::shape().name(),
                        column = %stamp.column,
                        kind = %field.kind(),
                        "update stamp column is not a timestamp, stamping disabled"
                    );
                    stamp.stamp_updated_at = false;
                }
                None => {
                    warn!(
                        record = R::shape().name(),
                        column = %stamp.column,
                        "update stamp column not declared, stamping disabled"
                    );
                    stamp.stamp_updated_at = false;
                }
            }
        }
        self.update_stamp = stamp;
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    pub fn key_kind(&self) -> FieldKind {
        self.key_kind
    }

    pub fn update_stamp(&self) -> &UpdateStamp {
        &self.update_stamp
    }

    pub fn shape(&self) -> &'static Shape<R> {
        R::shape()
    }

    pub fn statements(&self) -> StatementBuilder<'_> {
        StatementBuilder::new(&self.table, &self.primary_key)
    }

    fn key_field(&self) -> &'static FieldDef<R> {
        &R::shape().fields()[self.key_index]
    }

    /// The record's primary-key value as a bound parameter
    pub fn primary_key_param(&self, record: &R) -> Value {
        self.key_field().encode(record)
    }

    /// The record's primary-key value rendered as text
    ///
    /// Decimal for integers, canonical form for UUIDs, raw text otherwise.
    pub fn primary_key_value(&self, record: &R) -> String {
        self.primary_key_param(record).render()
    }

    /// Parses a caller-supplied lookup key into the primary key's kind
    pub fn parse_key(&self, key: &str) -> Result<Value, MappingError> {
        parse_key(self.key_kind, key).map_err(|source| MappingError::InvalidKey {
            column: self.primary_key.clone(),
            key: key.to_string(),
            source,
        })
    }

    /// Builds the INSERT statement for a record
    pub fn insert_statement(&self, record: &R) -> Statement {
        let fields = R::shape().extract_writable(record, &self.primary_key);
        self.statements().insert(fields)
    }

    /// Builds the UPDATE statement for a record, applying the stamp policy
    ///
    /// `now` replaces the stamp column's value when stamping is enabled.
    pub fn update_statement(&self, record: &R, now: DateTime<Utc>) -> Statement {
        let mut fields = R::shape().extract_writable(record, &self.primary_key);
        if self.update_stamp.stamp_updated_at {
            for (column, value) in fields.iter_mut() {
                if *column == self.update_stamp.column && matches!(value, Value::Timestamp(_)) {
                    *value = Value::Timestamp(now);
                }
            }
        }
        self.statements().update(fields, self.primary_key_param(record))
    }
}

impl<R> Clone for RepositoryDescriptor<R> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            primary_key: self.primary_key.clone(),
            key_index: self.key_index,
            key_kind: self.key_kind,
            update_stamp: self.update_stamp.clone(),
            _record: PhantomData,
        }
    }
}

impl<R> fmt::Debug for RepositoryDescriptor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepositoryDescriptor")
            .field("table", &self.table)
            .field("primary_key", &self.primary_key)
            .field("key_kind", &self.key_kind)
            .field("update_stamp", &self.update_stamp)
            .finish()
    }
}
