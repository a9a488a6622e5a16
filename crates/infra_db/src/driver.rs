//! PostgreSQL storage driver
//!
//! [`PgDriver`] implements the `StorageDriver` port on top of a SQLx pool. It
//! binds each [`Value`] by variant and decodes every result column by its
//! PostgreSQL type name, so rows can be read without knowing the record type.
//!
//! # Column types
//!
//! | PostgreSQL                          | Value          |
//! |-------------------------------------|----------------|
//! | `INT2`, `INT4`, `INT8`              | `Integer`      |
//! | `TEXT`, `VARCHAR`, `BPCHAR`, `NAME` | `Text`         |
//! | `BOOL`                              | `Boolean`      |
//! | `TEXT[]`, `VARCHAR[]`               | `TextArray`    |
//! | `UUID`                              | `Uuid`         |
//! | `TIMESTAMPTZ`, `TIMESTAMP`          | `Timestamp`    |
//!
//! NULL decodes to `Value::Null`. Any other column type is a row decode error.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use mapping_core::{DriverError, Row, Statement, StorageDriver, Value};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{Column, PgPool, Postgres, Row as _, TypeInfo};
use tracing::trace;
use uuid::Uuid;

use crate::pool::DatabaseConfig;

/// `StorageDriver` backed by a PostgreSQL connection pool
#[derive(Debug, Clone)]
pub struct PgDriver {
    pool: PgPool,
    statement_timeout: Option<Duration>,
}

impl PgDriver {
    /// Creates a driver over an existing pool
    ///
    /// # Arguments
    ///
    /// * `pool` - The PostgreSQL connection pool
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            statement_timeout: None,
        }
    }

    /// Creates a driver applying the config's statement timeout
    pub fn from_config(pool: PgPool, config: &DatabaseConfig) -> Self {
        Self {
            pool,
            statement_timeout: config.statement_timeout,
        }
    }

    /// Sets the deadline for each statement
    pub fn with_statement_timeout(mut self, timeout: Duration) -> Self {
        self.statement_timeout = Some(timeout);
        self
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn run<T, F>(&self, fut: F) -> Result<T, DriverError>
    where
        F: Future<Output = Result<T, sqlx::Error>> + Send,
    {
        match self.statement_timeout {
            Some(limit) => match tokio::time::timeout(limit, fut).await {
                Ok(result) => result.map_err(|e| classify(&e)),
                Err(_) => Err(DriverError::Timeout(limit.as_millis() as u64)),
            },
            None => fut.await.map_err(|e| classify(&e)),
        }
    }
}

#[async_trait]
impl StorageDriver for PgDriver {
    async fn query(&self, statement: &Statement) -> Result<Vec<Row>, DriverError> {
        let query = statement
            .params
            .iter()
            .fold(sqlx::query(&statement.sql), |query, value| bind_value(query, value));

        let rows = self.run(query.fetch_all(&self.pool)).await?;
        trace!(rows = rows.len(), "query returned");
        rows.iter().map(decode_row).collect()
    }

    async fn execute(&self, statement: &Statement) -> Result<u64, DriverError> {
        let query = statement
            .params
            .iter()
            .fold(sqlx::query(&statement.sql), |query, value| bind_value(query, value));

        let result = self.run(query.execute(&self.pool)).await?;
        Ok(result.rows_affected())
    }
}

/// Binds one value as the next positional parameter
fn bind_value<'q>(
    query: Query<'q, Postgres, PgArguments>,
    value: &Value,
) -> Query<'q, Postgres, PgArguments> {
    match value {
        Value::Null => query.bind(Option::<String>::None),
        Value::Text(text) => query.bind(text.clone()),
        Value::Integer(n) => query.bind(*n),
        Value::Boolean(b) => query.bind(*b),
        Value::TextArray(items) => query.bind(items.clone()),
        Value::Uuid(id) => query.bind(*id),
        Value::Timestamp(ts) => query.bind(*ts),
    }
}

/// Decodes a result row into column names and values
fn decode_row(row: &PgRow) -> Result<Row, DriverError> {
    let mut columns = Vec::with_capacity(row.len());
    let mut values = Vec::with_capacity(row.len());

    for column in row.columns() {
        let value = decode_column(row, column.ordinal(), column.type_info().name()).map_err(|reason| {
            DriverError::RowDecode(format!("column {}: {}", column.name(), reason))
        })?;
        columns.push(column.name().to_string());
        values.push(value);
    }

    Ok(Row::new(columns, values))
}

/// Column types the driver can decode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnType {
    Int2,
    Int4,
    Int8,
    Text,
    Bool,
    TextArray,
    Uuid,
    TimestampTz,
    Timestamp,
}

impl ColumnType {
    fn from_type_name(name: &str) -> Option<Self> {
        let column_type = match name {
            "INT2" => ColumnType::Int2,
            "INT4" => ColumnType::Int4,
            "INT8" => ColumnType::Int8,
            "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" => ColumnType::Text,
            "BOOL" => ColumnType::Bool,
            "TEXT[]" | "VARCHAR[]" | "BPCHAR[]" | "NAME[]" => ColumnType::TextArray,
            "UUID" => ColumnType::Uuid,
            "TIMESTAMPTZ" => ColumnType::TimestampTz,
            "TIMESTAMP" => ColumnType::Timestamp,
            _ => return None,
        };
        Some(column_type)
    }
}

fn decode_column(row: &PgRow, index: usize, type_name: &str) -> Result<Value, String> {
    let column_type =
        ColumnType::from_type_name(type_name).ok_or_else(|| format!("unsupported column type {}", type_name))?;

    let decoded = match column_type {
        ColumnType::Int2 => row
            .try_get::<Option<i16>, _>(index)
            .map(|v| v.map(|n| Value::Integer(n.into()))),
        ColumnType::Int4 => row
            .try_get::<Option<i32>, _>(index)
            .map(|v| v.map(|n| Value::Integer(n.into()))),
        ColumnType::Int8 => row.try_get::<Option<i64>, _>(index).map(|v| v.map(Value::Integer)),
        ColumnType::Text => row.try_get::<Option<String>, _>(index).map(|v| v.map(Value::Text)),
        ColumnType::Bool => row.try_get::<Option<bool>, _>(index).map(|v| v.map(Value::Boolean)),
        ColumnType::TextArray => row
            .try_get::<Option<Vec<Option<String>>>, _>(index)
            .map(|v| v.map(Value::TextArray)),
        ColumnType::Uuid => row.try_get::<Option<Uuid>, _>(index).map(|v| v.map(Value::Uuid)),
        ColumnType::TimestampTz => row
            .try_get::<Option<DateTime<Utc>>, _>(index)
            .map(|v| v.map(Value::Timestamp)),
        ColumnType::Timestamp => row
            .try_get::<Option<NaiveDateTime>, _>(index)
            .map(|v| v.map(|ts| Value::Timestamp(ts.and_utc()))),
    };

    decoded
        .map(|value| value.unwrap_or(Value::Null))
        .map_err(|e| e.to_string())
}

/// Maps SQLx errors onto driver error categories
///
/// Database errors are classified by PostgreSQL error code.
/// https://www.postgresql.org/docs/current/errcodes-appendix.html
pub fn classify(error: &sqlx::Error) -> DriverError {
    match error {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) | sqlx::Error::Tls(_) => {
            DriverError::Connection(error.to_string())
        }
        sqlx::Error::Database(db_err) => {
            let message = db_err.message().to_string();
            match db_err.code().as_deref() {
                Some("23502") => DriverError::NotNullViolation(message),
                Some("23503") => DriverError::ForeignKeyViolation(message),
                Some("23505") => DriverError::UniqueViolation(message),
                Some("23514") => DriverError::CheckViolation(message),
                _ => DriverError::Query(message),
            }
        }
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => DriverError::RowDecode(error.to_string()),
        _ => DriverError::Query(error.to_string()),
    }
}
