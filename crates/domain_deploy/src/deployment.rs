//! Deployments of an application image

use std::fmt;

use chrono::{DateTime, Utc};
use mapping_core::record_shape;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle states written to `deployments.status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentStatus {
    Pending,
    Running,
    Done,
    Failed,
}

impl DeploymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentStatus::Pending => "pending",
            DeploymentStatus::Running => "running",
            DeploymentStatus::Done => "done",
            DeploymentStatus::Failed => "failed",
        }
    }

    /// Parses a stored status; unknown text yields `None`
    pub fn parse(status: &str) -> Option<Self> {
        match status {
            "pending" => Some(DeploymentStatus::Pending),
            "running" => Some(DeploymentStatus::Running),
            "done" => Some(DeploymentStatus::Done),
            "failed" => Some(DeploymentStatus::Failed),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, DeploymentStatus::Done | DeploymentStatus::Failed)
    }
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One rollout of an image for an application
///
/// `status` is kept as free text so rows written by other tools still load;
/// use [`Deployment::status`] for the typed view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Deployment {
    pub id: Uuid,
    pub app_id: i32,
    pub status: String,
    pub image_url: String,
    pub author: String,
    pub description: String,
    pub updated_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

record_shape!(Deployment {
    id => "id",
    app_id => "app_id",
    status => "status",
    image_url => "image_url",
    author => "author",
    description => "description",
    updated_at => "updated_at",
    created_at => "created_at",
});

impl Deployment {
    /// Creates a pending deployment created now
    pub fn new(app_id: i32, image_url: impl Into<String>, author: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::nil(),
            app_id,
            status: DeploymentStatus::Pending.to_string(),
            image_url: image_url.into(),
            author: author.into(),
            description: String::new(),
            updated_at: now,
            created_at: now,
        }
    }

    pub fn status(&self) -> Option<DeploymentStatus> {
        DeploymentStatus::parse(&self.status)
    }

    pub fn set_status(&mut self, status: DeploymentStatus) {
        self.status = status.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_deployment_is_pending() {
        let deployment = Deployment::new(2, "registry.local/api:1.4.0", "dana");
        assert_eq!(deployment.status(), Some(DeploymentStatus::Pending));
        assert_eq!(deployment.created_at, deployment.updated_at);
        assert!(deployment.id.is_nil());
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            DeploymentStatus::Pending,
            DeploymentStatus::Running,
            DeploymentStatus::Done,
            DeploymentStatus::Failed,
        ] {
            assert_eq!(DeploymentStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(DeploymentStatus::parse("rolling-back"), None);
    }

    #[test]
    fn test_terminal_states() {
        assert!(DeploymentStatus::Done.is_terminal());
        assert!(DeploymentStatus::Failed.is_terminal());
        assert!(!DeploymentStatus::Running.is_terminal());
    }

    #[test]
    fn test_unknown_stored_status() {
        let mut deployment = Deployment::new(1, "img", "ops");
        deployment.status = "paused".into();
        assert_eq!(deployment.status(), None);
        deployment.set_status(DeploymentStatus::Done);
        assert_eq!(deployment.status, "done");
    }
}
