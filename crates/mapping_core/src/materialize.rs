//! Row materialization
//!
//! Allocates a zero-valued record and populates it from a result row through
//! the record's shape. Columns missing from the row (or NULL) leave the field
//! at its default value.

use tracing::trace;

use crate::error::MappingError;
use crate::row::Row;
use crate::shape::Record;

/// Builds a record of type `R` from a result row
///
/// # Errors
///
/// - `MappingError::RowExtraction` if the row's names and values are misaligned
/// - `MappingError::RecordInitialization` if a present column fails to decode
pub fn materialize<R: Record>(row: Row) -> Result<R, MappingError> {
    let shape = R::shape();
    let mut columns = row.into_column_map()?;
    let mut record = R::default();

    for field in shape.fields() {
        if field.is_skipped() {
            trace!(record = shape.name(), column = field.column(), "pointer field not materialized");
            continue;
        }
        let Some(value) = columns.remove(field.column()) else {
            continue;
        };
        field
            .decode_into(&mut record, value)
            .map_err(|source| MappingError::record_initialization(shape.name(), field.column(), source))?;
    }

    Ok(record)
}

/// Materializes every row, failing on the first row that cannot be mapped
///
/// The error identifies the failing row's position.
pub fn materialize_all<R: Record>(rows: Vec<Row>) -> Result<Vec<R>, (usize, MappingError)> {
    rows.into_iter()
        .enumerate()
        .map(|(index, row)| materialize(row).map_err(|e| (index, e)))
        .collect()
}
