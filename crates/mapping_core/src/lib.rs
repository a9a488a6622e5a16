//! Mapping Core - generic record mapping for single-table CRUD
//!
//! This crate turns plain Rust structs into SQL statements and back without
//! per-type mapping code:
//! - `value`: the closed set of column values and field kinds
//! - `codec`: native field ⇄ column value conversion
//! - `shape`: per-type field metadata, declared with [`record_shape!`]
//! - `statement`: SELECT/INSERT/UPDATE/DELETE generation
//! - `materialize`: populating records from result rows
//! - `descriptor`: table + primary key configuration for one repository
//! - `driver`: the storage driver port the repository executes through

pub mod value;
pub mod codec;
pub mod shape;
pub mod row;
pub mod statement;
pub mod materialize;
pub mod descriptor;
pub mod driver;
pub mod error;

pub use value::{Value, FieldKind};
pub use codec::{CodecError, FieldCodec, INVALID_TEXT};
pub use shape::{Record, Shape, FieldDef};
pub use row::Row;
pub use statement::{Statement, StatementBuilder};
pub use materialize::{materialize, materialize_all};
pub use descriptor::{RepositoryDescriptor, UpdateStamp, UPDATED_AT_COLUMN};
pub use driver::{StorageDriver, DriverError};
pub use error::MappingError;

#[doc(hidden)]
pub mod __private {
    pub use once_cell::sync::Lazy;
}
