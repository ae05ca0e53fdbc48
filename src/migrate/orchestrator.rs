//! Sequencing of one complete organization migration.

use std::sync::Arc;

use futures::{StreamExt, stream};

use crate::github::error::MigrationError;
use crate::github::gateway::{MembershipRole, SourceGateway, TargetGateway};
use crate::github::locator::{RepositoryLocator, RepositoryName};
use crate::github::models::{CreateOrganization, Repository, SourcePullRequest};
use crate::mirror::{MirrorCredentials, MirrorOutcome, RepositoryMirror};

use super::context::MigrationContext;
use super::membership::{Roster, sync_membership};
use super::replay::{ReplayEngine, ReplayOutcome};
use super::report::{
    MigrationReport, RepositoryOutcome, RepositoryStatus, RepositoryStep, RunStage, StageFailure,
};
use super::teams::copy_teams;
use super::thread::ThreadReconstructor;
use super::translate::Translator;

/// Runs the migration stages in order against both hosts.
pub struct Migrator<'a, S: ?Sized, T: ?Sized, M: ?Sized> {
    source: &'a S,
    target: &'a T,
    mirror: Arc<M>,
    credentials: &'a MirrorCredentials,
    context: &'a MigrationContext,
    translator: Translator,
}

impl<'a, S, T, M> Migrator<'a, S, T, M>
where
    S: SourceGateway + ?Sized,
    T: TargetGateway + ?Sized,
    M: RepositoryMirror + ?Sized + 'static,
{
    /// Creates a migrator for the run described by `context`.
    #[must_use]
    pub fn new(
        source: &'a S,
        target: &'a T,
        mirror: Arc<M>,
        credentials: &'a MirrorCredentials,
        context: &'a MigrationContext,
    ) -> Self {
        Self {
            source,
            target,
            mirror,
            credentials,
            context,
            translator: Translator::new(context),
        }
    }

    /// Migrates membership, teams, and repositories.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::OrganizationUnavailable`] when the target
    /// organization is missing and cannot be created, or the source listing
    /// error when the repository list cannot be read. Every other failure,
    /// including a failed member or team listing, is recorded in the report.
    pub async fn run(&self) -> Result<MigrationReport, MigrationError> {
        self.resolve_target_organization().await?;

        let mut stage_failures = Vec::new();
        let roster = self.load_roster(&mut stage_failures).await;
        let memberships = sync_membership(self.target, &self.context.target_org, &roster).await;

        let teams = match copy_teams(
            self.source,
            self.target,
            &self.translator,
            &self.context.source_org,
            &self.context.target_org,
        )
        .await
        {
            Ok(outcomes) => outcomes,
            Err(error) => {
                tracing::error!("failed to fetch source teams: {error}");
                stage_failures.push(StageFailure {
                    stage: RunStage::ListTeams,
                    error,
                });
                Vec::new()
            }
        };

        let repositories = self.resolve_repositories().await?;
        tracing::info!(
            count = repositories.len(),
            names = %repositories
                .iter()
                .map(|repository| repository.name.as_str())
                .collect::<Vec<_>>()
                .join(","),
            "repositories to migrate"
        );

        let outcomes = stream::iter(repositories)
            .map(|repository| self.migrate_repository(repository))
            .buffered(self.context.repository_limit())
            .collect::<Vec<_>>()
            .await;

        Ok(MigrationReport {
            memberships,
            teams,
            repositories: outcomes,
            stage_failures,
        })
    }

    async fn resolve_target_organization(&self) -> Result<(), MigrationError> {
        let org = &self.context.target_org;
        let Err(probe_error) = self.target.probe_organization(org).await else {
            return Ok(());
        };
        tracing::warn!(organization = org.as_str(), "target organization not found: {probe_error}");

        let Some(admin) = self.context.site_admin.as_deref() else {
            return Err(MigrationError::OrganizationUnavailable {
                organization: org.as_str().to_owned(),
                message: format!("{probe_error}; no site administrator supplied"),
            });
        };

        tracing::info!(organization = org.as_str(), admin, "creating target organization");
        let request = CreateOrganization {
            login: org.as_str().to_owned(),
            admin: admin.to_owned(),
        };
        self.target
            .create_organization(&request)
            .await
            .map_err(|error| MigrationError::OrganizationUnavailable {
                organization: org.as_str().to_owned(),
                message: format!("creation failed: {error}"),
            })
    }

    /// Lists admins and members separately so one failed role still
    /// leaves the other to be granted.
    async fn load_roster(&self, failures: &mut Vec<StageFailure>) -> Roster {
        let mut roster = Roster::default();
        for role in [MembershipRole::Admin, MembershipRole::Member] {
            match self.source.list_members(&self.context.source_org, role).await {
                Ok(logins) if role == MembershipRole::Admin => roster.admins = logins,
                Ok(logins) => roster.members = logins,
                Err(error) => {
                    tracing::error!(role = role.as_str(), "failed to fetch source members: {error}");
                    failures.push(StageFailure {
                        stage: RunStage::ListMembers(role),
                        error,
                    });
                }
            }
        }
        roster
    }

    async fn resolve_repositories(&self) -> Result<Vec<Repository>, MigrationError> {
        let org = &self.context.source_org;
        let Some(names) = &self.context.repositories else {
            return self.source.list_repositories(org).await;
        };

        let mut resolved = Vec::with_capacity(names.len());
        for name in names {
            match self.source.repository(org, name).await {
                Ok(repository) => resolved.push(repository),
                Err(error) => {
                    tracing::warn!(repository = name.as_str(), "dropping unresolved repository: {error}");
                }
            }
        }
        Ok(resolved)
    }

    async fn migrate_repository(&self, repository: Repository) -> RepositoryOutcome {
        tracing::info!(repository = %repository.name, "starting repository sync");
        let status = match self.sync_repository(&repository).await {
            Ok(status) => status,
            Err((step, error)) => {
                tracing::error!(repository = %repository.name, step = %step, "repository sync failed: {error}");
                return RepositoryOutcome {
                    name: repository.name,
                    status: RepositoryStatus::Failed { step, error },
                    pull_requests: Vec::new(),
                };
            }
        };

        let pull_requests = if status == RepositoryStatus::Mirrored
            && self.context.migrate_pull_requests
        {
            match self.migrate_pull_requests(&repository).await {
                Ok(outcomes) => outcomes,
                Err(error) => {
                    tracing::error!(repository = %repository.name, "failed to list pull requests: {error}");
                    return RepositoryOutcome {
                        name: repository.name,
                        status: RepositoryStatus::Failed {
                            step: RepositoryStep::ListPullRequests,
                            error,
                        },
                        pull_requests: Vec::new(),
                    };
                }
            }
        } else {
            Vec::new()
        };

        RepositoryOutcome {
            name: repository.name,
            status,
            pull_requests,
        }
    }

    /// Creates the repository on the target and mirrors its refs.
    async fn sync_repository(
        &self,
        repository: &Repository,
    ) -> Result<RepositoryStatus, (RepositoryStep, MigrationError)> {
        let (source, target) = self
            .locators(repository)
            .map_err(|error| (RepositoryStep::Create, error))?;

        match self
            .target
            .create_repository(&self.context.target_org, &self.translator.repository(repository))
            .await
        {
            Ok(()) => tracing::info!(repository = %target, "repository created"),
            Err(error) if error.is_already_exists() => {
                tracing::info!(repository = %target, "repository already exists");
            }
            Err(error) => return Err((RepositoryStep::Create, error)),
        }

        let request = self
            .credentials
            .request(&source, &target)
            .map_err(|error| (RepositoryStep::Mirror, error))?;
        let mirror = Arc::clone(&self.mirror);
        let outcome = tokio::task::spawn_blocking(move || mirror.mirror(&request))
            .await
            .map_err(|error| {
                (
                    RepositoryStep::Mirror,
                    MigrationError::Io {
                        message: format!("mirror task failed: {error}"),
                    },
                )
            })?
            .map_err(|error| (RepositoryStep::Mirror, error))?;

        Ok(match outcome {
            MirrorOutcome::Pushed => RepositoryStatus::Mirrored,
            MirrorOutcome::Empty => RepositoryStatus::Empty,
        })
    }

    async fn migrate_pull_requests(
        &self,
        repository: &Repository,
    ) -> Result<Vec<ReplayOutcome>, MigrationError> {
        let (source, target) = self.locators(repository)?;
        let listed = self.source.list_pull_requests(&source).await?;
        tracing::info!(repository = %source, count = listed.len(), "pull requests fetched");

        let reconstructor = ThreadReconstructor::new(self.source, &self.translator);
        let engine = ReplayEngine::new(self.target, self.context.replay_mode);

        Ok(stream::iter(listed)
            .map(|pull_request| {
                Self::migrate_pull_request(&reconstructor, &engine, &source, &target, pull_request)
            })
            .buffered(self.context.pull_request_limit())
            .collect()
            .await)
    }

    /// Reconstructs and replays one pull request, skipping it when its
    /// conversation cannot be fetched.
    async fn migrate_pull_request(
        reconstructor: &ThreadReconstructor<'_, S>,
        engine: &ReplayEngine<'_, T>,
        source: &RepositoryLocator,
        target: &RepositoryLocator,
        listed: SourcePullRequest,
    ) -> ReplayOutcome {
        match reconstructor.reconstruct(source, &listed).await {
            Ok(pull_request) => engine.replay(target, &pull_request).await,
            Err(error) => {
                tracing::error!(
                    repository = %source,
                    pull_request = listed.number,
                    "skipping pull request: {error}"
                );
                ReplayOutcome::not_reconstructed(listed.number, error)
            }
        }
    }

    fn locators(
        &self,
        repository: &Repository,
    ) -> Result<(RepositoryLocator, RepositoryLocator), MigrationError> {
        let name = RepositoryName::new(&repository.name)?;
        Ok((
            RepositoryLocator::new(self.context.source_org.clone(), name.clone()),
            RepositoryLocator::new(self.context.target_org.clone(), name),
        ))
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
