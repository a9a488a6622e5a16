//! Infrastructure Database Layer
//!
//! This crate connects the record-mapping core to PostgreSQL using SQLx.
//!
//! # Architecture
//!
//! The crate follows the repository pattern. A single generic [`Repository`]
//! serves every record type; it builds statements from the record's shape,
//! executes them through a [`StorageDriver`](mapping_core::StorageDriver), and
//! materializes the returned rows. [`PgDriver`] is the PostgreSQL driver.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, DatabaseConfig, PgDriver, Repository};
//! use mapping_core::RepositoryDescriptor;
//!
//! let config = DatabaseConfig::new("postgres://localhost/deployments");
//! let pool = create_pool(&config).await?;
//! let descriptor = RepositoryDescriptor::<Application>::new("applications", "id")?;
//! let repo = Repository::new(PgDriver::from_config(pool, &config), descriptor);
//! let apps = repo.list().await?;
//! ```

pub mod pool;
pub mod error;
pub mod driver;
pub mod repository;

pub use pool::{create_pool, DatabaseConfig};
pub use error::DatabaseError;
pub use driver::PgDriver;
pub use repository::Repository;
