//! The demo flow
//!
//! Lists applications, looks one up by key, adds `new-app`, toggles the
//! found application's Helm version through an update, then lists
//! deployments. Failures of the add and update steps are logged and the
//! flow continues; the other steps abort it.

use domain_deploy::{Application, ApplicationRepo, DeploymentRepo};
use infra_db::DatabaseError;
use mapping_core::StorageDriver;
use tracing::{info, warn};

/// What one run of the demo saw
#[derive(Debug, Clone, Default)]
pub struct DemoReport {
    pub applications: usize,
    pub found: Application,
    pub added: Option<Application>,
    pub updated: Option<Application>,
    pub deployments: usize,
}

/// Runs the demo against the given repositories
///
/// # Arguments
///
/// * `apps` - Repository over `applications`
/// * `deployments` - Repository over `deployments`
/// * `find_key` - Key of the application to look up and update
///
/// # Errors
///
/// Returns the first error from listing, the lookup, or listing deployments
pub async fn run<D: StorageDriver>(
    apps: &ApplicationRepo<D>,
    deployments: &DeploymentRepo<D>,
    find_key: &str,
) -> Result<DemoReport, DatabaseError> {
    let mut report = DemoReport::default();

    let listed = apps.list().await?;
    for app in &listed {
        info!(
            name = %app.name,
            namespace = %app.namespace,
            flux_version = %app.flux_version,
            restricted_tables = ?app.restricted_tables,
            "application"
        );
    }
    report.applications = listed.len();

    let mut found = apps.find(find_key).await?;
    info!(id = found.id, name = %found.name, namespace = %found.namespace, flux_version = %found.flux_version, "found application");

    let new_app = Application::new("new-app", "staging").with_restricted_tables(["a", "b"]);
    match apps.add(&new_app).await {
        Ok(added) => {
            info!(id = added.id, name = %added.name, namespace = %added.namespace, "added application");
            report.added = Some(added);
        }
        Err(e) => warn!(error = %e, "add failed"),
    }

    found.toggle_helm_version();
    match apps.update(&found).await {
        Ok(updated) => {
            info!(id = updated.id, name = %updated.name, helm_version = %updated.helm_version, "updated application");
            report.updated = Some(updated);
        }
        Err(e) => warn!(id = found.id, error = %e, "update failed"),
    }
    report.found = found;

    let listed = deployments.list().await?;
    for deployment in &listed {
        info!(
            id = %deployment.id,
            app_id = deployment.app_id,
            status = %deployment.status,
            updated_at = %deployment.updated_at,
            "deployment"
        );
    }
    report.deployments = listed.len();

    Ok(report)
}
