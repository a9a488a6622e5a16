//! Typed repositories for the deployment tables
//!
//! Each repository wraps the generic [`Repository`] with its table, primary
//! key and update policy fixed, and dereferences to it for the CRUD
//! operations.

use std::ops::Deref;

use infra_db::{DatabaseError, PgDriver, Repository};
use mapping_core::{RepositoryDescriptor, StorageDriver, UpdateStamp};
use tracing::debug;

use crate::access_token::TtyAccessToken;
use crate::application::Application;
use crate::deployment::Deployment;

pub const APPLICATIONS_TABLE: &str = "applications";
pub const DEPLOYMENTS_TABLE: &str = "deployments";
pub const TTY_ACCESS_TOKENS_TABLE: &str = "tty_access_tokens";

/// Primary key column shared by every deployment table
pub const PRIMARY_KEY: &str = "id";

macro_rules! typed_repo {
    ($(#[$meta:meta])* $repo:ident, $record:ty, $table:expr, $stamp:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $repo<D = PgDriver>(Repository<$record, D>);

        impl<D: StorageDriver> $repo<D> {
            /// Creates the repository over `driver`
            pub fn new(driver: D) -> Result<Self, DatabaseError> {
                Self::with_update_stamp(driver, $stamp)
            }

            /// Creates the repository with an explicit update stamp policy
            pub fn with_update_stamp(driver: D, stamp: UpdateStamp) -> Result<Self, DatabaseError> {
                let descriptor = RepositoryDescriptor::<$record>::new($table, PRIMARY_KEY)?
                    .with_update_stamp(stamp);
                debug!(table = $table, stamp = descriptor.update_stamp().stamp_updated_at, "repository ready");
                Ok(Self(Repository::new(driver, descriptor)))
            }

            pub fn into_inner(self) -> Repository<$record, D> {
                self.0
            }
        }

        impl<D> Deref for $repo<D> {
            type Target = Repository<$record, D>;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }
    };
}

typed_repo!(
    /// Repository over `applications`
    ApplicationRepo,
    Application,
    APPLICATIONS_TABLE,
    UpdateStamp::default()
);

typed_repo!(
    /// Repository over `deployments`; updates stamp `updated_at`
    DeploymentRepo,
    Deployment,
    DEPLOYMENTS_TABLE,
    UpdateStamp::enabled()
);

typed_repo!(
    /// Repository over `tty_access_tokens`
    TtyAccessTokenRepo,
    TtyAccessToken,
    TTY_ACCESS_TOKENS_TABLE,
    UpdateStamp::default()
);
