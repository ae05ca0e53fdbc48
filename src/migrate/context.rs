//! Run-wide settings threaded through every migration stage.

use crate::github::locator::{HostEndpoint, OrganizationName, RepositoryName};

/// How the conversation step reacts to a failed entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReplayMode {
    /// Stop at the first failed entry.
    #[default]
    Strict,
    /// Log failed entries and continue with the rest.
    Lenient,
}

/// Explicit replacement for process-wide settings.
///
/// Built once from the loaded configuration and borrowed by the translator,
/// replay engine, and orchestrator.
#[derive(Debug, Clone)]
pub struct MigrationContext {
    /// Organization being read.
    pub source_org: OrganizationName,
    /// Organization being written.
    pub target_org: OrganizationName,
    /// Target host, used for profile links and git remotes.
    pub target_host: HostEndpoint,
    /// Explicit repository subset; `None` migrates every repository.
    pub repositories: Option<Vec<RepositoryName>>,
    /// Administrator login used to create a missing target organization.
    pub site_admin: Option<String>,
    /// Whether pull request history is reconstructed after mirroring.
    pub migrate_pull_requests: bool,
    /// Conversation failure policy.
    pub replay_mode: ReplayMode,
    /// Repositories migrated at the same time.
    pub repository_concurrency: usize,
    /// Pull requests replayed at the same time within one repository.
    pub pull_request_concurrency: usize,
}

impl MigrationContext {
    /// Creates a sequential, strict context migrating every repository.
    #[must_use]
    pub const fn new(
        source_org: OrganizationName,
        target_org: OrganizationName,
        target_host: HostEndpoint,
    ) -> Self {
        Self {
            source_org,
            target_org,
            target_host,
            repositories: None,
            site_admin: None,
            migrate_pull_requests: true,
            replay_mode: ReplayMode::Strict,
            repository_concurrency: 1,
            pull_request_concurrency: 1,
        }
    }

    /// Concurrency for repositories, never below one.
    #[must_use]
    pub fn repository_limit(&self) -> usize {
        self.repository_concurrency.max(1)
    }

    /// Concurrency for pull requests, never below one.
    #[must_use]
    pub fn pull_request_limit(&self) -> usize {
        self.pull_request_concurrency.max(1)
    }
}
