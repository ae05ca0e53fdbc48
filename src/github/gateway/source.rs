//! Octocrab implementation of the source-side gateway.

use async_trait::async_trait;
use octocrab::{Octocrab, Page};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::github::error::MigrationError;
use crate::github::locator::{
    HostEndpoint, OrganizationName, PersonalAccessToken, RepositoryLocator, RepositoryName,
};
use crate::github::models::{
    ApiComment, ApiPullRequest, ApiRepository, ApiReview, ApiReviewComment, ApiTeam,
    ApiTeamMembership, ApiTeamRepository, ApiUser, Repository, SourceComment, SourcePullRequest,
    SourceReview, SourceReviewComment, SourceTeam,
};
use crate::github::pagination::walk_pages;

use super::client::build_octocrab_client;
use super::error_mapping::map_octocrab_error;
use super::{MembershipRole, SourceGateway};

#[derive(Serialize)]
struct RoleFilter<'role> {
    role: &'role str,
}

#[derive(Serialize)]
struct StateFilter {
    state: &'static str,
}

/// Octocrab-backed reader for the source organization.
pub struct OctocrabSourceGateway {
    client: Octocrab,
}

impl OctocrabSourceGateway {
    /// Creates a new gateway from an Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Builds a gateway authenticated with `token` against `host`.
    ///
    /// # Errors
    ///
    /// Returns `MigrationError::InvalidUrl` when the API base cannot be parsed
    /// or `MigrationError::Api` when Octocrab fails to construct a client.
    pub fn for_token(
        token: &PersonalAccessToken,
        host: &HostEndpoint,
    ) -> Result<Self, MigrationError> {
        let client = build_octocrab_client(token, host.api_base().as_str())?;
        Ok(Self::new(client))
    }

    /// Fetches the first page of a listing and walks the remaining pages.
    ///
    /// Only a failure on the first page is an error; later page failures
    /// truncate the result.
    async fn list_all<A, S, P>(
        &self,
        route: String,
        parameters: Option<&P>,
        operation: &str,
    ) -> Result<Vec<S>, MigrationError>
    where
        A: DeserializeOwned + Into<S>,
        P: Serialize + Sync + ?Sized,
    {
        let first = self
            .client
            .get::<Page<A>, _, _>(route, parameters)
            .await
            .map_err(|error| map_octocrab_error(operation, &error))?;

        let items = walk_pages(&self.client, first, operation).await;
        Ok(items.into_iter().map(Into::into).collect())
    }
}

fn user_logins(users: Vec<ApiUser>) -> Vec<String> {
    users.into_iter().filter_map(|user| user.login).collect()
}

#[async_trait]
impl SourceGateway for OctocrabSourceGateway {
    async fn list_repositories(
        &self,
        org: &OrganizationName,
    ) -> Result<Vec<Repository>, MigrationError> {
        self.list_all::<ApiRepository, _, ()>(org.repos_path(), None, "list repositories")
            .await
    }

    async fn repository(
        &self,
        org: &OrganizationName,
        name: &RepositoryName,
    ) -> Result<Repository, MigrationError> {
        let locator = RepositoryLocator::new(org.clone(), name.clone());
        self.client
            .get::<ApiRepository, _, _>(locator.repository_path(), None::<&()>)
            .await
            .map(ApiRepository::into)
            .map_err(|error| map_octocrab_error("fetch repository", &error))
    }

    async fn list_members(
        &self,
        org: &OrganizationName,
        role: MembershipRole,
    ) -> Result<Vec<String>, MigrationError> {
        let filter = RoleFilter {
            role: role.as_str(),
        };
        let users = self
            .list_all::<ApiUser, ApiUser, _>(org.members_path(), Some(&filter), "list members")
            .await?;
        Ok(user_logins(users))
    }

    async fn list_teams(&self, org: &OrganizationName) -> Result<Vec<SourceTeam>, MigrationError> {
        self.list_all::<ApiTeam, _, ()>(org.teams_path(), None, "list teams")
            .await
    }

    async fn team_repositories(
        &self,
        org: &OrganizationName,
        slug: &str,
    ) -> Result<Vec<String>, MigrationError> {
        let repositories = self
            .list_all::<ApiTeamRepository, ApiTeamRepository, ()>(
                org.team_repos_path(slug),
                None,
                "list team repositories",
            )
            .await?;
        Ok(repositories
            .into_iter()
            .map(|repository| repository.full_name)
            .collect())
    }

    async fn team_members(
        &self,
        org: &OrganizationName,
        slug: &str,
    ) -> Result<Vec<String>, MigrationError> {
        let users = self
            .list_all::<ApiUser, ApiUser, ()>(
                org.team_members_path(slug),
                None,
                "list team members",
            )
            .await?;
        Ok(user_logins(users))
    }

    async fn team_member_role(
        &self,
        org: &OrganizationName,
        slug: &str,
        login: &str,
    ) -> Result<String, MigrationError> {
        let membership = self
            .client
            .get::<ApiTeamMembership, _, _>(org.team_membership_path(slug, login), None::<&()>)
            .await
            .map_err(|error| map_octocrab_error("fetch team membership", &error))?;
        Ok(membership
            .role
            .unwrap_or_else(|| MembershipRole::Member.as_str().to_owned()))
    }

    async fn list_pull_requests(
        &self,
        repository: &RepositoryLocator,
    ) -> Result<Vec<SourcePullRequest>, MigrationError> {
        let filter = StateFilter { state: "all" };
        self.list_all::<ApiPullRequest, _, _>(
            repository.pulls_path(),
            Some(&filter),
            "list pull requests",
        )
        .await
    }

    async fn issue_comments(
        &self,
        repository: &RepositoryLocator,
        number: u64,
    ) -> Result<Vec<SourceComment>, MigrationError> {
        self.list_all::<ApiComment, _, ()>(
            repository.issue_comments_path(number),
            None,
            "list issue comments",
        )
        .await
    }

    async fn review_comments(
        &self,
        repository: &RepositoryLocator,
        number: u64,
    ) -> Result<Vec<SourceReviewComment>, MigrationError> {
        self.list_all::<ApiReviewComment, _, ()>(
            repository.review_comments_path(number),
            None,
            "list review comments",
        )
        .await
    }

    async fn reviews(
        &self,
        repository: &RepositoryLocator,
        number: u64,
    ) -> Result<Vec<SourceReview>, MigrationError> {
        self.list_all::<ApiReview, _, ()>(repository.reviews_path(number), None, "list reviews")
            .await
    }
}

#[cfg(test)]
#[path = "source_tests.rs"]
mod tests;
