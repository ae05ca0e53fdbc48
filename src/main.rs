//! Ferry CLI entrypoint for organization migration.

use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use ferry::{
    FerryConfig, GitCommandMirror, MigrationError, Migrator, OctocrabSourceGateway,
    OctocrabTargetGateway,
};
use ortho_config::OrthoConfig;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "info";

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

/// Installs a stderr fmt subscriber honouring `RUST_LOG`.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
    if let Err(error) = installed {
        drop(writeln!(io::stderr().lock(), "failed to install logger: {error}"));
    }
}

async fn run() -> Result<(), MigrationError> {
    let config = load_config()?;
    config.validate()?;

    let context = config.migration_context()?;
    let credentials = config.mirror_credentials()?;
    let source =
        OctocrabSourceGateway::for_token(&credentials.source_token, &credentials.source_host)?;
    let target =
        OctocrabTargetGateway::for_token(&credentials.target_token, &credentials.target_host)?;
    let mirror = Arc::new(GitCommandMirror::new(config.git_program));

    tracing::info!(
        source = context.source_org.as_str(),
        target = context.target_org.as_str(),
        target_host = context.target_host.web_base(),
        "starting migration"
    );
    let report = Migrator::new(&source, &target, mirror, &credentials, &context)
        .run()
        .await?;
    report.log_summary();
    Ok(())
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`MigrationError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<FerryConfig, MigrationError> {
    FerryConfig::load().map_err(|error| MigrationError::Configuration {
        message: error.to_string(),
    })
}
