//! Generic repository
//!
//! [`Repository`] performs single-table CRUD for any [`Record`] through a
//! [`StorageDriver`]. Statements come from the record's shape and the
//! repository's descriptor; results are materialized back into records.
//!
//! Each call issues exactly one statement. There is no transaction spanning
//! calls and no retry; a failed statement surfaces immediately.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{PgDriver, Repository};
//! use mapping_core::RepositoryDescriptor;
//!
//! let descriptor = RepositoryDescriptor::<Application>::new("applications", "id")?;
//! let repo = Repository::new(PgDriver::new(pool), descriptor);
//! let app = repo.find("2").await?;
//! ```

use std::sync::Arc;

use chrono::Utc;
use mapping_core::{
    materialize, materialize_all, Record, RepositoryDescriptor, Row, Statement, StorageDriver,
};
use tracing::{debug, instrument};

use crate::driver::PgDriver;
use crate::error::DatabaseError;

/// CRUD access to one table for one record type
pub struct Repository<R: Record, D = PgDriver> {
    driver: Arc<D>,
    descriptor: Arc<RepositoryDescriptor<R>>,
}

impl<R: Record, D> Clone for Repository<R, D> {
    fn clone(&self) -> Self {
        Self {
            driver: Arc::clone(&self.driver),
            descriptor: Arc::clone(&self.descriptor),
        }
    }
}

impl<R: Record, D> std::fmt::Debug for Repository<R, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

impl<R: Record, D: StorageDriver> Repository<R, D> {
    /// Creates a repository executing through `driver`
    ///
    /// # Arguments
    ///
    /// * `driver` - The storage driver statements are issued to
    /// * `descriptor` - Table and primary key for `R`
    pub fn new(driver: D, descriptor: RepositoryDescriptor<R>) -> Self {
        Self::shared(Arc::new(driver), Arc::new(descriptor))
    }

    /// Creates a repository from an already shared driver and descriptor
    pub fn shared(driver: Arc<D>, descriptor: Arc<RepositoryDescriptor<R>>) -> Self {
        Self { driver, descriptor }
    }

    pub fn descriptor(&self) -> &RepositoryDescriptor<R> {
        &self.descriptor
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Retrieves every row of the table
    ///
    /// # Returns
    ///
    /// All records, or an empty vector when the table is empty. If any row
    /// fails to materialize, no records are returned and the error's
    /// `row_index` names the failing row.
    #[instrument(skip(self), fields(table = %self.descriptor.table()))]
    pub async fn list(&self) -> Result<Vec<R>, DatabaseError> {
        let statement = self.descriptor.statements().select_all();
        let rows = self.query("list", &statement).await?;
        let count = rows.len();

        let records = materialize_all(rows).map_err(|(index, source)| {
            debug!(row = index, of = count, "row failed to materialize");
            DatabaseError::row_mapping("list", index, source)
        })?;

        debug!(count, "listed records");
        Ok(records)
    }

    /// Retrieves the record whose primary key equals `key`
    ///
    /// # Errors
    ///
    /// - `EmptyKey` if `key` is empty; no statement is issued
    /// - `Mapping(InvalidKey)` if `key` does not parse as the key's kind
    /// - `NotFound` if no row matches
    #[instrument(skip(self), fields(table = %self.descriptor.table()))]
    pub async fn find(&self, key: &str) -> Result<R, DatabaseError> {
        if key.is_empty() {
            return Err(DatabaseError::empty_key(self.descriptor.table()));
        }
        let key_value = self
            .descriptor
            .parse_key(key)
            .map_err(|e| DatabaseError::mapping("find", e))?;

        let statement = self.descriptor.statements().select_by_id(key_value);
        let rows = self.query("find", &statement).await?;
        self.single("find", rows, key)
    }

    /// Inserts a record and returns it as stored
    ///
    /// The primary key is not written; the returned record carries the
    /// database-assigned key and defaults.
    #[instrument(skip(self, record), fields(table = %self.descriptor.table()))]
    pub async fn add(&self, record: &R) -> Result<R, DatabaseError> {
        let statement = self.descriptor.insert_statement(record);
        let rows = self.query("add", &statement).await?;
        self.single("add", rows, "(new)")
    }

    /// Writes every non-key field of a record and returns it as stored
    ///
    /// The row is addressed by the record's own primary key. When the
    /// descriptor's update stamp is enabled, the stamp column is written with
    /// the current time.
    #[instrument(skip(self, record), fields(table = %self.descriptor.table()))]
    pub async fn update(&self, record: &R) -> Result<R, DatabaseError> {
        let key = self.descriptor.primary_key_value(record);
        let statement = self.descriptor.update_statement(record, Utc::now());
        let rows = self.query("update", &statement).await?;
        self.single("update", rows, &key)
    }

    /// Deletes the row whose primary key equals `key`
    ///
    /// Deleting a key that matches no row is not an error.
    #[instrument(skip(self), fields(table = %self.descriptor.table()))]
    pub async fn delete(&self, key: &str) -> Result<(), DatabaseError> {
        if key.is_empty() {
            return Err(DatabaseError::empty_key(self.descriptor.table()));
        }
        let key_value = self
            .descriptor
            .parse_key(key)
            .map_err(|e| DatabaseError::mapping("delete", e))?;

        let statement = self.descriptor.statements().delete(key_value);
        debug!(statement = %statement, "executing");
        let affected = self
            .driver
            .execute(&statement)
            .await
            .map_err(|e| DatabaseError::from_driver("delete", &statement.sql, e))?;

        debug!(affected, "deleted");
        Ok(())
    }

    async fn query(&self, operation: &'static str, statement: &Statement) -> Result<Vec<Row>, DatabaseError> {
        debug!(statement = %statement, params = statement.params.len(), "executing");
        self.driver
            .query(statement)
            .await
            .map_err(|e| DatabaseError::from_driver(operation, &statement.sql, e))
    }

    fn single(&self, operation: &'static str, rows: Vec<Row>, key: &str) -> Result<R, DatabaseError> {
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DatabaseError::not_found(self.descriptor.table(), key))?;
        materialize(row).map_err(|e| DatabaseError::mapping(operation, e))
    }
}
