//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! record mapper test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built records and rows for the deployment tables
//! - `builders`: Builder patterns for test data construction
//! - `database`: PostgreSQL test containers
//! - `scripted_driver`: In-memory storage driver replaying scripted results
//! - `assertions`: Custom assertion helpers for records and statements
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod scripted_driver;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use scripted_driver::*;
pub use assertions::*;
pub use generators::*;
