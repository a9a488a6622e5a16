//! Record Mapper - Demo Binary
//!
//! Runs the repository demo flow against a PostgreSQL database.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin record-mapper-demo
//!
//! # Run with environment variables
//! MAPPER_DATABASE_URL=postgres://... MAPPER_LOG_LEVEL=debug cargo run --bin record-mapper-demo
//! ```
//!
//! # Environment Variables
//!
//! * `MAPPER_DATABASE_URL` - PostgreSQL connection string
//! * `MAPPER_MAX_CONNECTIONS` - Pool size (default: 3)
//! * `MAPPER_CONNECT_TIMEOUT_SECS` - Wait for a pooled connection (default: 5)
//! * `MAPPER_STATEMENT_TIMEOUT_MS` - Per-statement deadline (default: none)
//! * `MAPPER_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `MAPPER_LOG_JSON` - Emit JSON log lines (default: false)
//! * `MAPPER_STAMP_UPDATED_AT` - Stamp `updated_at` on deployment updates (default: true)
//! * `MAPPER_RUN_MIGRATIONS` - Apply bundled migrations first (default: false)
//! * `MAPPER_FIND_KEY` - Application key to look up (default: 2)

use anyhow::Context;
use domain_deploy::{ApplicationRepo, DeploymentRepo};
use infra_db::{create_pool, PgDriver};
use interface_cli::DemoConfig;
use mapping_core::{StorageDriver, UpdateStamp};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = DemoConfig::from_env().context("invalid MAPPER_* configuration")?;

    init_tracing(&config.log_level, config.log_json);

    tracing::info!(max_connections = config.max_connections, "Starting record mapper demo");

    let database = config.database();
    let pool = create_pool(&database).await?;
    let driver = PgDriver::from_config(pool, &database);

    driver.ping().await.context("database is not reachable")?;

    if config.run_migrations {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("../../migrations")
            .run(driver.pool())
            .await
            .context("migrations failed")?;
    }

    let stamp = if config.stamp_updated_at {
        UpdateStamp::enabled()
    } else {
        UpdateStamp::default()
    };
    let apps = ApplicationRepo::new(driver.clone())?;
    let deployments = DeploymentRepo::with_update_stamp(driver, stamp)?;

    let report = interface_cli::run(&apps, &deployments, &config.find_key).await?;

    tracing::info!(
        applications = report.applications,
        added = report.added.is_some(),
        updated = report.updated.is_some(),
        deployments = report.deployments,
        "Demo complete"
    );
    Ok(())
}

/// Initializes the tracing subscriber
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_target(true)))
        .init();
}
