//! Record Mapper Demo
//!
//! Command line driver for the deployment repositories. The binary
//! `record-mapper-demo` loads [`config::DemoConfig`], connects to
//! PostgreSQL and runs [`demo::run`].

pub mod config;
pub mod demo;

pub use config::DemoConfig;
pub use demo::{run, DemoReport};
