//! End-of-run summary of every per-entity outcome.

use std::fmt;

use crate::github::error::MigrationError;
use crate::github::gateway::MembershipRole;

use super::membership::MembershipOutcome;
use super::replay::ReplayOutcome;
use super::teams::TeamOutcome;

/// Stage at which a repository migration stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryStep {
    /// Creating the repository on the target.
    Create,
    /// Mirroring git refs.
    Mirror,
    /// Listing source pull requests.
    ListPullRequests,
}

impl fmt::Display for RepositoryStep {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Create => "create",
            Self::Mirror => "mirror",
            Self::ListPullRequests => "list pull requests",
        })
    }
}

/// How far a repository got.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryStatus {
    /// Refs were pushed; pull requests (if enabled) are in the outcome list.
    Mirrored,
    /// The source had no refs; pull requests were not migrated.
    Empty,
    /// A repository-level step failed.
    Failed {
        /// Step that failed.
        step: RepositoryStep,
        /// Failure detail.
        error: MigrationError,
    },
}

/// Result of migrating one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryOutcome {
    /// Repository name.
    pub name: String,
    /// Repository-level status.
    pub status: RepositoryStatus,
    /// Pull request outcomes in source listing order.
    pub pull_requests: Vec<ReplayOutcome>,
}

/// Organization-wide listing that the run could not read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    /// Listing source members with the given role.
    ListMembers(MembershipRole),
    /// Listing source teams.
    ListTeams,
}

impl fmt::Display for RunStage {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ListMembers(role) => write!(formatter, "list {} members", role.as_str()),
            Self::ListTeams => formatter.write_str("list teams"),
        }
    }
}

/// A listing failure that left part of the run without input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageFailure {
    /// Listing that failed.
    pub stage: RunStage,
    /// Failure detail.
    pub error: MigrationError,
}

/// Every outcome of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Membership grants.
    pub memberships: Vec<MembershipOutcome>,
    /// Team copies.
    pub teams: Vec<TeamOutcome>,
    /// Repository migrations.
    pub repositories: Vec<RepositoryOutcome>,
    /// Listings that failed before any per-entity work could start.
    pub stage_failures: Vec<StageFailure>,
}

impl MigrationReport {
    /// Number of repositories that did not fail.
    #[must_use]
    pub fn repositories_succeeded(&self) -> usize {
        self.repositories
            .iter()
            .filter(|outcome| !matches!(outcome.status, RepositoryStatus::Failed { .. }))
            .count()
    }

    /// Pull requests migrated and failed across all repositories.
    #[must_use]
    pub fn pull_request_counts(&self) -> (usize, usize) {
        self.repositories
            .iter()
            .flat_map(|outcome| &outcome.pull_requests)
            .fold((0, 0), |(migrated, failed), outcome| {
                if outcome.is_migrated() {
                    (migrated + 1, failed)
                } else {
                    (migrated, failed + 1)
                }
            })
    }

    /// Returns true when every recorded outcome succeeded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.stage_failures.is_empty()
            && self.memberships.iter().all(MembershipOutcome::is_success)
            && self.teams.iter().all(|team| team.error.is_none())
            && self.repositories_succeeded() == self.repositories.len()
            && self.pull_request_counts().1 == 0
    }

    /// Logs a one-line summary plus one line per failed stage and repository.
    ///
    /// The summary is logged at `warn` when anything failed.
    pub fn log_summary(&self) {
        let (pr_migrated, pr_failed) = self.pull_request_counts();
        let members_failed = self
            .memberships
            .iter()
            .filter(|outcome| !outcome.is_success())
            .count();
        let teams_failed = self.teams.iter().filter(|team| team.error.is_some()).count();
        let repositories_failed = self.repositories.len() - self.repositories_succeeded();

        if self.is_clean() {
            tracing::info!(
                members = self.memberships.len(),
                teams = self.teams.len(),
                repositories = self.repositories.len(),
                pull_requests_migrated = pr_migrated,
                "migration finished"
            );
        } else {
            tracing::warn!(
                stages_failed = self.stage_failures.len(),
                members = self.memberships.len(),
                members_failed,
                teams = self.teams.len(),
                teams_failed,
                repositories = self.repositories.len(),
                repositories_failed,
                pull_requests_migrated = pr_migrated,
                pull_requests_failed = pr_failed,
                "migration finished with failures"
            );
        }

        for failure in &self.stage_failures {
            tracing::warn!(stage = %failure.stage, "stage failed: {}", failure.error);
        }
        for outcome in &self.repositories {
            if let RepositoryStatus::Failed { step, error } = &outcome.status {
                tracing::warn!(repository = %outcome.name, step = %step, "repository failed: {error}");
            }
        }
    }
}
