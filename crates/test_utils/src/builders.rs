//! Test Data Builders
//!
//! Provides builder patterns for constructing test records with sensible
//! defaults. These builders allow tests to specify only the relevant fields
//! while using defaults for everything else.

use chrono::{DateTime, Utc};
use domain_deploy::{Application, Deployment, DeploymentStatus};
use uuid::Uuid;

use crate::fixtures::{fake_author, fake_image_url, fake_name, TemporalFixtures};

/// Builder for constructing test applications
pub struct ApplicationBuilder {
    app: Application,
}

impl Default for ApplicationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationBuilder {
    /// Creates a new builder for an unsaved application with a random name
    pub fn new() -> Self {
        Self {
            app: Application::new(fake_name(), "staging"),
        }
    }

    /// Sets the primary key, for records that are already stored
    pub fn with_id(mut self, id: i32) -> Self {
        self.app.id = id;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.app.name = name.into();
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.app.namespace = namespace.into();
        self
    }

    pub fn with_database_url(mut self, url: impl Into<String>) -> Self {
        self.app.database_url = url.into();
        self
    }

    /// Sets the restricted tables
    pub fn with_restricted_tables(mut self, tables: &[&str]) -> Self {
        self.app.restricted_tables = tables.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_helm_version(mut self, version: impl Into<String>) -> Self {
        self.app.helm_version = version.into();
        self
    }

    pub fn with_flux_version(mut self, version: impl Into<String>) -> Self {
        self.app.flux_version = version.into();
        self
    }

    /// Builds the test application
    pub fn build(self) -> Application {
        self.app
    }
}

/// Builder for constructing test deployments
pub struct DeploymentBuilder {
    deployment: Deployment,
}

impl DeploymentBuilder {
    /// Creates a pending deployment of `app_id` with random image and author
    pub fn new(app_id: i32) -> Self {
        let mut deployment = Deployment::new(app_id, fake_image_url(), fake_author());
        deployment.created_at = TemporalFixtures::created();
        deployment.updated_at = TemporalFixtures::created();
        Self { deployment }
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.deployment.id = id;
        self
    }

    pub fn with_status(mut self, status: DeploymentStatus) -> Self {
        self.deployment.set_status(status);
        self
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.deployment.image_url = url.into();
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.deployment.author = author.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.deployment.description = description.into();
        self
    }

    /// Sets both timestamps
    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.deployment.created_at = at;
        self.deployment.updated_at = at;
        self
    }

    /// Builds the test deployment
    pub fn build(self) -> Deployment {
        self.deployment
    }
}
