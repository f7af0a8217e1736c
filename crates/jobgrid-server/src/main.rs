//! Jobgrid Server — application entry point.

mod config;

use anyhow::Context;
use jobgrid_auth::{AuthConfig, AuthService, PasswordResetService};
use jobgrid_db::DbManager;
use jobgrid_db::repository::{
    SurrealCandidateRepository, SurrealCompanyRepository, SurrealPasswordResetRepository,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("jobgrid=info".parse()?))
        .json()
        .init();

    tracing::info!("Starting jobgrid server...");

    let cfg = config::AppConfig::load();

    // Deployment-time invariant: refuse to start without a real secret.
    let auth_config = AuthConfig::from_secret(cfg.jwt_secret.clone())
        .context("JWT_SECRET must be configured with at least 32 bytes")?;

    let db = DbManager::connect(&cfg.db).await?;
    jobgrid_db::run_migrations(db.client()).await?;

    let company_repo = SurrealCompanyRepository::new(db.client().clone());
    let candidate_repo = SurrealCandidateRepository::new(db.client().clone());
    let reset_repo = SurrealPasswordResetRepository::new(db.client().clone());

    let _auth = AuthService::new(
        company_repo.clone(),
        candidate_repo.clone(),
        auth_config.clone(),
    );
    let _reset = PasswordResetService::new(company_repo, candidate_repo, reset_repo, auth_config);

    tracing::info!(
        port = cfg.port,
        environment = %cfg.environment,
        "jobgrid auth core ready"
    );

    // TODO: mount the HTTP route layer over these services and serve
    // on `cfg.port`.

    tracing::info!("jobgrid server stopped.");

    Ok(())
}
