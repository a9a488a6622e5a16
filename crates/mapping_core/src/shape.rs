//! Record shapes and field metadata extraction
//!
//! A [`Shape`] is the per-type mapping descriptor: an ordered list of
//! [`FieldDef`]s, each pairing a column name with the encode/decode functions
//! for one field. Shapes are declared with [`record_shape!`](crate::record_shape)
//! and built once per process.
//!
//! ```rust
//! use mapping_core::{record_shape, Record};
//!
//! #[derive(Debug, Default)]
//! struct Application {
//!     id: i32,
//!     name: String,
//!     tags: Vec<String>,
//! }
//!
//! record_shape!(Application {
//!     id => "id",
//!     name => "name",
//!     tags => "tags",
//! });
//!
//! assert_eq!(Application::shape().columns(), vec!["id", "name", "tags"]);
//! ```

use std::fmt;

use tracing::trace;

use crate::codec::{CodecError, FieldCodec};
use crate::value::{FieldKind, Value};

/// A type that can be stored through the generic repository
///
/// `Default` supplies the zero-valued instance that row materialization
/// populates.
pub trait Record: Default + Send + Sync + 'static {
    /// The shape describing this record's columns
    fn shape() -> &'static Shape<Self>;
}

type Encoder<R> = Box<dyn Fn(&R) -> Value + Send + Sync>;
type Decoder<R> = Box<dyn Fn(&mut R, Value) -> Result<(), CodecError> + Send + Sync>;

/// Metadata and codec functions for one record field
pub struct FieldDef<R> {
    column: &'static str,
    kind: FieldKind,
    encode: Encoder<R>,
    decode: Decoder<R>,
}

impl<R: 'static> FieldDef<R> {
    /// Declares a field from a pair of accessors
    ///
    /// The field's kind comes from the accessor's target type.
    pub fn new<T, G, M>(column: &'static str, get: G, get_mut: M) -> Self
    where
        T: FieldCodec + 'static,
        G: Fn(&R) -> &T + Send + Sync + 'static,
        M: Fn(&mut R) -> &mut T + Send + Sync + 'static,
    {
        Self {
            column,
            kind: T::KIND,
            encode: Box::new(move |record| get(record).encode()),
            decode: Box::new(move |record, value| {
                *get_mut(record) = T::decode(value)?;
                Ok(())
            }),
        }
    }

    pub fn column(&self) -> &'static str {
        self.column
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Pointer fields are neither written nor materialized
    pub fn is_skipped(&self) -> bool {
        self.kind == FieldKind::Pointer
    }

    /// Reads the field's current value from a record
    pub fn encode(&self, record: &R) -> Value {
        (self.encode)(record)
    }

    /// Assigns a column value to the field
    pub fn decode_into(&self, record: &mut R, value: Value) -> Result<(), CodecError> {
        (self.decode)(record, value)
    }
}

impl<R> fmt::Debug for FieldDef<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDef")
            .field("column", &self.column)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Ordered field layout of one record type
pub struct Shape<R> {
    name: &'static str,
    fields: Vec<FieldDef<R>>,
}

impl<R: 'static> Shape<R> {
    /// Creates a shape from fields in declaration order
    ///
    /// # Panics
    ///
    /// Panics if two fields declare the same column; shapes are declared
    /// statically, so this is a programming error.
    pub fn new(name: &'static str, fields: Vec<FieldDef<R>>) -> Self {
        for (i, field) in fields.iter().enumerate() {
            assert!(
                fields[..i].iter().all(|f| f.column != field.column),
                "record shape {} declares column {} twice",
                name,
                field.column
            );
        }
        Self { name, fields }
    }

    /// Name of the record type
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fields(&self) -> &[FieldDef<R>] {
        &self.fields
    }

    /// Looks up a field by column name
    pub fn field(&self, column: &str) -> Option<&FieldDef<R>> {
        self.fields.iter().find(|f| f.column == column)
    }

    /// Column names in declaration order
    pub fn columns(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.column).collect()
    }

    /// Extracts every field as `(column, value)` in declaration order
    pub fn extract(&self, record: &R) -> Vec<(&'static str, Value)> {
        self.fields
            .iter()
            .map(|f| (f.column, f.encode(record)))
            .collect()
    }

    /// Extracts the columns written by INSERT and UPDATE
    ///
    /// Excludes `primary_key` and skipped pointer fields, keeping declaration
    /// order.
    pub fn extract_writable(&self, record: &R, primary_key: &str) -> Vec<(&'static str, Value)> {
        self.fields
            .iter()
            .filter(|f| f.column != primary_key)
            .filter(|f| {
                if f.is_skipped() {
                    trace!(record = self.name, column = f.column, "skipping pointer field");
                    return false;
                }
                true
            })
            .map(|f| (f.column, f.encode(record)))
            .collect()
    }

    /// Column names written by INSERT and UPDATE, in declaration order
    pub fn writable_columns(&self, primary_key: &str) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|f| f.column != primary_key && !f.is_skipped())
            .map(|f| f.column)
            .collect()
    }
}

impl<R> fmt::Debug for Shape<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shape")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .finish()
    }
}

/// Declares the [`Record`] shape of a struct
///
/// Each entry maps a struct field to its column name. Field order is the
/// column order used for every generated statement.
#[macro_export]
macro_rules! record_shape {
    ($record:ident { $($field:ident => $column:literal),+ $(,)? }) => {
        impl $crate::Record for $record {
            fn shape() -> &'static $crate::Shape<Self> {
                static SHAPE: $crate::__private::Lazy<$crate::Shape<$record>> =
                    $crate::__private::Lazy::new(|| {
                        $crate::Shape::new(
                            stringify!($record),
                            vec![
                                $(
                                    $crate::FieldDef::new(
                                        $column,
                                        |record: &$record| &record.$field,
                                        |record: &mut $record| &mut record.$field,
                                    ),
                                )+
                            ],
                        )
                    });
                &SHAPE
            }
        }
    };
}
