//! Scenario state and the migration runner for the migration BDD tests.

use std::sync::Arc;

use ferry::{
    HostEndpoint, MigrationContext, MigrationError, MigrationReport, Migrator,
    MirrorCredentials, OctocrabSourceGateway, OctocrabTargetGateway, OrganizationName,
    PersonalAccessToken,
};
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use wiremock::MockServer;

use super::harness::{FakeMirror, SOURCE_ORG, TARGET_ORG};
use super::runtime::{SharedRuntime, ensure_runtime, ensure_server};

#[derive(ScenarioState, Default)]
pub(crate) struct MigrationState {
    pub(crate) runtime: Slot<SharedRuntime>,
    pub(crate) source: Slot<MockServer>,
    pub(crate) target: Slot<MockServer>,
    pub(crate) mirror: Slot<Arc<FakeMirror>>,
    pub(crate) report: Slot<MigrationReport>,
    pub(crate) error: Slot<MigrationError>,
}

/// Ensures the runtime and both mock hosts are running.
pub(crate) fn ensure_hosts(state: &MigrationState) -> SharedRuntime {
    let runtime = ensure_runtime(&state.runtime)
        .unwrap_or_else(|error| panic!("failed to create Tokio runtime: {error}"));
    ensure_server(&runtime, &state.source);
    ensure_server(&runtime, &state.target);
    runtime
}

/// Runs one migration from the source host to the target host and stores
/// the report or the fatal error.
pub(crate) fn run_migration(state: &MigrationState) {
    let runtime = ensure_hosts(state);
    let source_uri = state
        .source
        .with_ref(MockServer::uri)
        .unwrap_or_else(|| panic!("source server missing"));
    let target_uri = state
        .target
        .with_ref(MockServer::uri)
        .unwrap_or_else(|| panic!("target server missing"));
    let mirror = state
        .mirror
        .get()
        .unwrap_or_else(|| panic!("mirror not configured"));

    let result = runtime.block_on(async {
        let credentials = MirrorCredentials {
            user: "deploy".to_owned(),
            source_host: HostEndpoint::parse(&source_uri)?,
            source_token: PersonalAccessToken::new("source-token", "source")?,
            target_host: HostEndpoint::parse(&target_uri)?,
            target_token: PersonalAccessToken::new("target-token", "target")?,
        };
        let context = MigrationContext::new(
            OrganizationName::new(SOURCE_ORG)?,
            OrganizationName::new(TARGET_ORG)?,
            credentials.target_host.clone(),
        );
        let source =
            OctocrabSourceGateway::for_token(&credentials.source_token, &credentials.source_host)?;
        let target =
            OctocrabTargetGateway::for_token(&credentials.target_token, &credentials.target_host)?;

        Migrator::new(&source, &target, mirror, &credentials, &context)
            .run()
            .await
    });

    match result {
        Ok(report) => {
            state.report.set(report);
        }
        Err(error) => {
            state.error.set(error);
        }
    }
}
