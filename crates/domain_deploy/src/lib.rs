//! Deployment Domain
//!
//! Records for the deployment service's tables and the repositories that
//! read and write them:
//!
//! - [`Application`]: a deployable application (`applications`, integer key)
//! - [`Deployment`]: one rollout of an image (`deployments`, UUID key,
//!   `updated_at` stamped on every update)
//! - [`TtyAccessToken`]: a short-lived database access token
//!   (`tty_access_tokens`, UUID key)
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_deploy::{Application, ApplicationRepo};
//! use infra_db::PgDriver;
//!
//! let apps = ApplicationRepo::new(PgDriver::new(pool))?;
//! let stored = apps
//!     .add(&Application::new("new-app", "staging").with_restricted_tables(["a", "b"]))
//!     .await?;
//! ```

pub mod access_token;
pub mod application;
pub mod deployment;
pub mod repos;

pub use access_token::TtyAccessToken;
pub use application::{Application, HELM_V2, HELM_V3};
pub use deployment::{Deployment, DeploymentStatus};
pub use repos::{
    ApplicationRepo, DeploymentRepo, TtyAccessTokenRepo, APPLICATIONS_TABLE, DEPLOYMENTS_TABLE,
    PRIMARY_KEY, TTY_ACCESS_TOKENS_TABLE,
};
