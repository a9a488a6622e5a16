//! Scripted Storage Driver
//!
//! A [`StorageDriver`] that never touches a database. Tests queue the results
//! each call should produce, run repository operations, then inspect the
//! statements that were issued.
//!
//! ```rust,ignore
//! let driver = ScriptedDriver::new();
//! driver.push_rows(vec![ApplicationFixtures::row(2, "billing")]);
//! let repo = Repository::new(driver, descriptor);
//! repo.find("2").await?;
//! assert_eq!(repo.driver().statements()[0].sql, "SELECT * FROM applications WHERE id=$1");
//! ```

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use mapping_core::{DriverError, Row, Statement, StorageDriver};

/// In-memory driver recording statements and replaying queued results
///
/// Unscripted calls succeed with no rows (for `query`) or zero affected
/// rows (for `execute`).
#[derive(Debug, Default)]
pub struct ScriptedDriver {
    statements: Mutex<Vec<Statement>>,
    query_results: Mutex<VecDeque<Result<Vec<Row>, DriverError>>>,
    execute_results: Mutex<VecDeque<Result<u64, DriverError>>>,
}

impl ScriptedDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the rows the next `query` returns
    pub fn push_rows(&self, rows: Vec<Row>) -> &Self {
        self.push_query_result(Ok(rows))
    }

    /// Queues an error for the next `query`
    pub fn push_query_error(&self, error: DriverError) -> &Self {
        self.push_query_result(Err(error))
    }

    pub fn push_query_result(&self, result: Result<Vec<Row>, DriverError>) -> &Self {
        lock(&self.query_results).push_back(result);
        self
    }

    /// Queues the affected row count the next `execute` returns
    pub fn push_affected(&self, affected: u64) -> &Self {
        lock(&self.execute_results).push_back(Ok(affected));
        self
    }

    pub fn push_execute_error(&self, error: DriverError) -> &Self {
        lock(&self.execute_results).push_back(Err(error));
        self
    }

    /// Every statement issued so far, in order
    pub fn statements(&self) -> Vec<Statement> {
        lock(&self.statements).clone()
    }

    pub fn statement_count(&self) -> usize {
        lock(&self.statements).len()
    }

    /// The most recent statement, if any
    pub fn last_statement(&self) -> Option<Statement> {
        lock(&self.statements).last().cloned()
    }

    /// Checks that every queued result was consumed
    pub fn is_drained(&self) -> bool {
        lock(&self.query_results).is_empty() && lock(&self.execute_results).is_empty()
    }

    fn record(&self, statement: &Statement) {
        lock(&self.statements).push(statement.clone());
    }
}

#[async_trait]
impl StorageDriver for ScriptedDriver {
    async fn query(&self, statement: &Statement) -> Result<Vec<Row>, DriverError> {
        self.record(statement);
        lock(&self.query_results).pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn execute(&self, statement: &Statement) -> Result<u64, DriverError> {
        self.record(statement);
        lock(&self.execute_results).pop_front().unwrap_or(Ok(0))
    }
}

/// Locks a mutex, recovering the data if a panicking test poisoned it
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
