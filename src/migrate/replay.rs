//! Per pull request replay onto the target host.
//!
//! Each pull request moves through [`ReplayStep`]s in order. A failure ends
//! the chain for that pull request only; the shell is never rolled back.

use std::fmt;

use crate::github::error::MigrationError;
use crate::github::gateway::TargetGateway;
use crate::github::locator::RepositoryLocator;

use super::context::ReplayMode;
use super::conversation::{ConversationEntry, PullRequest, ReplayEndpoint};

/// Stage of the replay state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayStep {
    /// Fetching the conversation from the source host.
    Reconstruct,
    /// Creating the pull request itself.
    CreateShell,
    /// Requesting reviewers.
    AttachReviewers,
    /// Adding assignees.
    AttachAssignees,
    /// Posting comments, reviews, and review comments.
    ReplayConversation,
}

impl fmt::Display for ReplayStep {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Reconstruct => "reconstruct",
            Self::CreateShell => "create shell",
            Self::AttachReviewers => "attach reviewers",
            Self::AttachAssignees => "attach assignees",
            Self::ReplayConversation => "replay conversation",
        };
        formatter.write_str(label)
    }
}

/// Terminal state of one pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayOutcome {
    /// Every step completed.
    Migrated {
        /// Number on the source host.
        source_number: u64,
        /// Number assigned by the target host.
        target_number: u64,
    },
    /// A step failed and the chain stopped.
    Failed {
        /// Number on the source host.
        source_number: u64,
        /// Number on the target host, when the shell was created.
        target_number: Option<u64>,
        /// Step that failed.
        step: ReplayStep,
        /// First failure encountered.
        error: MigrationError,
        /// Conversation entries that were not replayed.
        unreplayed_entries: usize,
    },
}

impl ReplayOutcome {
    /// Returns true for [`ReplayOutcome::Migrated`].
    #[must_use]
    pub const fn is_migrated(&self) -> bool {
        matches!(self, Self::Migrated { .. })
    }

    /// Source-side number of the pull request.
    #[must_use]
    pub const fn source_number(&self) -> u64 {
        match self {
            Self::Migrated { source_number, .. } | Self::Failed { source_number, .. } => {
                *source_number
            }
        }
    }

    /// Outcome for a pull request whose conversation could not be fetched.
    #[must_use]
    pub const fn not_reconstructed(source_number: u64, error: MigrationError) -> Self {
        Self::Failed {
            source_number,
            target_number: None,
            step: ReplayStep::Reconstruct,
            error,
            unreplayed_entries: 0,
        }
    }
}

/// Drives pull requests through the replay steps against a target gateway.
pub struct ReplayEngine<'a, T: TargetGateway + ?Sized> {
    target: &'a T,
    mode: ReplayMode,
}

impl<'a, T: TargetGateway + ?Sized> ReplayEngine<'a, T> {
    /// Creates an engine writing to `target`.
    #[must_use]
    pub const fn new(target: &'a T, mode: ReplayMode) -> Self {
        Self { target, mode }
    }

    /// Replays one pull request and reports its terminal state.
    ///
    /// Empty reviewer and assignee lists skip their request.
    pub async fn replay(
        &self,
        repository: &RepositoryLocator,
        pull_request: &PullRequest,
    ) -> ReplayOutcome {
        let source_number = pull_request.number;
        let entry_count = pull_request.entry_count();
        tracing::info!(
            repository = %repository,
            pull_request = source_number,
            entries = entry_count,
            "migrating pull request"
        );

        let target_number = match self
            .target
            .create_pull_request(repository, &pull_request.shell)
            .await
        {
            Ok(number) => number,
            Err(error) => {
                return Self::failed(
                    repository,
                    source_number,
                    None,
                    ReplayStep::CreateShell,
                    error,
                    entry_count,
                );
            }
        };

        if !pull_request.requested_reviewers.is_empty()
            && let Err(error) = self
                .target
                .request_reviewers(repository, target_number, &pull_request.requested_reviewers)
                .await
        {
            return Self::failed(
                repository,
                source_number,
                Some(target_number),
                ReplayStep::AttachReviewers,
                error,
                entry_count,
            );
        }

        if !pull_request.assignees.is_empty()
            && let Err(error) = self
                .target
                .add_assignees(repository, target_number, &pull_request.assignees)
                .await
        {
            return Self::failed(
                repository,
                source_number,
                Some(target_number),
                ReplayStep::AttachAssignees,
                error,
                entry_count,
            );
        }

        match self
            .replay_conversation(repository, source_number, target_number, pull_request)
            .await
        {
            Ok(()) => {
                tracing::info!(
                    repository = %repository,
                    pull_request = source_number,
                    target_number,
                    "pull request migrated"
                );
                ReplayOutcome::Migrated {
                    source_number,
                    target_number,
                }
            }
            Err((error, unreplayed)) => Self::failed(
                repository,
                source_number,
                Some(target_number),
                ReplayStep::ReplayConversation,
                error,
                unreplayed,
            ),
        }
    }

    /// Posts entries in merged order.
    ///
    /// Returns the first error with the number of entries left unreplayed.
    async fn replay_conversation(
        &self,
        repository: &RepositoryLocator,
        source_number: u64,
        target_number: u64,
        pull_request: &PullRequest,
    ) -> Result<(), (MigrationError, usize)> {
        let entries = pull_request.merged_conversation();
        let total = entries.len();
        let mut first_error: Option<MigrationError> = None;
        let mut unreplayed = 0_usize;

        for (index, entry) in entries.into_iter().enumerate() {
            let Err(error) = self.post_entry(repository, target_number, entry).await else {
                continue;
            };

            match self.mode {
                ReplayMode::Strict => return Err((error, total - index)),
                ReplayMode::Lenient => {
                    tracing::warn!(
                        repository = %repository,
                        pull_request = source_number,
                        entry = index,
                        "skipping conversation entry: {error}"
                    );
                    unreplayed += 1;
                    first_error.get_or_insert(error);
                }
            }
        }

        first_error.map_or(Ok(()), |error| Err((error, unreplayed)))
    }

    async fn post_entry(
        &self,
        repository: &RepositoryLocator,
        target_number: u64,
        entry: &ConversationEntry,
    ) -> Result<(), MigrationError> {
        match entry.endpoint() {
            ReplayEndpoint::IssueComments => {
                self.target
                    .create_issue_comment(repository, target_number, &entry.body)
                    .await
            }
            ReplayEndpoint::PullComments => {
                self.target
                    .create_review_comment(
                        repository,
                        target_number,
                        &entry.review_comment_request(),
                    )
                    .await
            }
        }
    }

    fn failed(
        repository: &RepositoryLocator,
        source_number: u64,
        target_number: Option<u64>,
        step: ReplayStep,
        error: MigrationError,
        unreplayed_entries: usize,
    ) -> ReplayOutcome {
        tracing::error!(
            repository = %repository,
            pull_request = source_number,
            step = %step,
            unreplayed_entries,
            "failed to migrate pull request: {error}"
        );
        ReplayOutcome::Failed {
            source_number,
            target_number,
            step,
            error,
            unreplayed_entries,
        }
    }
}

#[cfg(test)]
#[path = "replay_tests.rs"]
mod tests;
