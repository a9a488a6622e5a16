//! Storage driver port
//!
//! The repository talks to the database only through [`StorageDriver`]: run a
//! statement and get rows back, or run a statement and get an affected-row
//! count. Connection handling, pooling and wire I/O belong to the driver
//! implementation.
//!
//! ```text
//!   Repository ──► StorageDriver (port) ◄── PgDriver (sqlx, infra_db)
//!                                     ◄── ScriptedDriver (test_utils)
//! ```

use async_trait::async_trait;
use thiserror::Error;

use crate::row::Row;
use crate::statement::Statement;

/// Errors reported by a storage driver
///
/// Constraint violations are split out so callers can distinguish bad input
/// from infrastructure failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DriverError {
    /// The driver could not reach the database
    #[error("Connection failed: {0}")]
    Connection(String),

    /// A NOT NULL column received no value
    #[error("Not-null violation: {0}")]
    NotNullViolation(String),

    /// A unique constraint rejected the row
    #[error("Unique violation: {0}")]
    UniqueViolation(String),

    /// A foreign key constraint rejected the row
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// A check constraint rejected the row
    #[error("Check violation: {0}")]
    CheckViolation(String),

    /// The statement did not finish within the configured timeout
    #[error("Statement timed out after {0}ms")]
    Timeout(u64),

    /// A result column could not be decoded into a column value
    #[error("Row decode failed: {0}")]
    RowDecode(String),

    /// Any other statement failure
    #[error("Query failed: {0}")]
    Query(String),
}

impl DriverError {
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            DriverError::NotNullViolation(_)
                | DriverError::UniqueViolation(_)
                | DriverError::ForeignKeyViolation(_)
                | DriverError::CheckViolation(_)
        )
    }

    pub fn is_connection_error(&self) -> bool {
        matches!(self, DriverError::Connection(_) | DriverError::Timeout(_))
    }
}

/// Executes SQL statements against a relational store
#[async_trait]
pub trait StorageDriver: Send + Sync {
    /// Runs a statement and returns its result rows
    async fn query(&self, statement: &Statement) -> Result<Vec<Row>, DriverError>;

    /// Runs a statement and returns the number of affected rows
    async fn execute(&self, statement: &Statement) -> Result<u64, DriverError>;

    /// Checks that the store is reachable
    async fn ping(&self) -> Result<(), DriverError> {
        self.query(&Statement::new("SELECT 1", Vec::new())).await.map(|_| ())
    }
}
