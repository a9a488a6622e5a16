//! Applications registered for deployment

use mapping_core::record_shape;
use serde::{Deserialize, Serialize};

/// Helm major versions an application can be deployed with
pub const HELM_V2: &str = "v2";
pub const HELM_V3: &str = "v3";

/// A deployable application and the cluster namespace it lives in
///
/// `restricted_tables` lists database tables TTY sessions for this
/// application may not read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: i32,
    pub name: String,
    pub namespace: String,
    pub database_url: String,
    pub restricted_tables: Vec<String>,
    pub helm_version: String,
    pub flux_version: String,
}

record_shape!(Application {
    id => "id",
    name => "name",
    namespace => "namespace",
    database_url => "database_url",
    restricted_tables => "restricted_tables",
    helm_version => "helm_version",
    flux_version => "flux_version",
});

impl Application {
    /// Creates an unsaved application; the database assigns the id
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            ..Default::default()
        }
    }

    pub fn with_restricted_tables<I, S>(mut self, tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.restricted_tables = tables.into_iter().map(Into::into).collect();
        self
    }

    /// Checks whether a table is off limits for this application
    pub fn is_restricted(&self, table: &str) -> bool {
        self.restricted_tables.iter().any(|t| t == table)
    }

    /// Switches between Helm v2 and v3
    ///
    /// Anything other than v2 (including an unset version) becomes v2.
    pub fn toggle_helm_version(&mut self) {
        self.helm_version = if self.helm_version == HELM_V2 {
            HELM_V3.to_string()
        } else {
            HELM_V2.to_string()
        };
    }
}
