//! Octocrab implementation of the target-side gateway.

use async_trait::async_trait;
use octocrab::Octocrab;
use serde::Serialize;

use crate::github::error::MigrationError;
use crate::github::locator::{
    HostEndpoint, OrganizationName, PersonalAccessToken, RepositoryLocator,
};
use crate::github::models::{
    ApiCreatedPullRequest, AssigneesRequest, CreateIssueComment, CreateOrganization,
    CreatePullRequest, CreateRepository, CreateReviewComment, CreateTeam, MembershipRequest,
    ReviewersRequest,
};

use super::client::build_octocrab_client;
use super::error_mapping::map_octocrab_error;
use super::{MembershipRole, TargetGateway};

const ADMIN_ORGANIZATIONS_PATH: &str = "/admin/organizations";

#[derive(Debug, Clone, Copy)]
enum WriteMethod {
    Post,
    Put,
}

/// Octocrab-backed writer for the target organization.
pub struct OctocrabTargetGateway {
    client: Octocrab,
}

impl OctocrabTargetGateway {
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

    /// Sends a write whose response body is not needed.
    ///
    /// Any 2xx status, including an empty `204`, counts as success.
    async fn write<B>(
        &self,
        write_method: WriteMethod,
        route: String,
        body: &B,
        operation: &str,
    ) -> Result<(), MigrationError>
    where
        B: Serialize + Sync + ?Sized,
    {
        let response = match write_method {
            WriteMethod::Post => self.client._post(route.as_str(), Some(body)).await,
            WriteMethod::Put => self.client._put(route.as_str(), Some(body)).await,
        }
        .map_err(|error| map_octocrab_error(operation, &error))?;

        octocrab::map_github_error(response)
            .await
            .map(drop)
            .map_err(|error| map_octocrab_error(operation, &error))
    }
}

#[async_trait]
impl TargetGateway for OctocrabTargetGateway {
    async fn probe_organization(&self, org: &OrganizationName) -> Result<(), MigrationError> {
        self.client
            .get::<serde_json::Value, _, _>(org.repos_path(), None::<&()>)
            .await
            .map(drop)
            .map_err(|error| map_octocrab_error("probe organization", &error))
    }

    async fn create_organization(
        &self,
        request: &CreateOrganization,
    ) -> Result<(), MigrationError> {
        self.write(
            WriteMethod::Post,
            ADMIN_ORGANIZATIONS_PATH.to_owned(),
            request,
            "create organization",
        )
        .await
    }

    async fn set_membership(
        &self,
        org: &OrganizationName,
        login: &str,
        role: MembershipRole,
    ) -> Result<(), MigrationError> {
        let body = MembershipRequest {
            role: role.as_str(),
        };
        self.write(
            WriteMethod::Put,
            org.membership_path(login),
            &body,
            "set membership",
        )
        .await
    }

    async fn create_team(
        &self,
        org: &OrganizationName,
        request: &CreateTeam,
    ) -> Result<(), MigrationError> {
        self.write(WriteMethod::Post, org.teams_path(), request, "create team")
            .await
    }

    async fn create_repository(
        &self,
        org: &OrganizationName,
        request: &CreateRepository,
    ) -> Result<(), MigrationError> {
        self.write(
            WriteMethod::Post,
            org.repos_path(),
            request,
            "create repository",
        )
        .await
    }

    async fn create_pull_request(
        &self,
        repository: &RepositoryLocator,
        request: &CreatePullRequest,
    ) -> Result<u64, MigrationError> {
        self.client
            .post::<_, ApiCreatedPullRequest>(repository.pulls_path(), Some(request))
            .await
            .map(|created| created.number)
            .map_err(|error| map_octocrab_error("create pull request", &error))
    }

    async fn request_reviewers(
        &self,
        repository: &RepositoryLocator,
        number: u64,
        reviewers: &[String],
    ) -> Result<(), MigrationError> {
        self.write(
            WriteMethod::Post,
            repository.requested_reviewers_path(number),
            &ReviewersRequest { reviewers },
            "request reviewers",
        )
        .await
    }

    async fn add_assignees(
        &self,
        repository: &RepositoryLocator,
        number: u64,
        assignees: &[String],
    ) -> Result<(), MigrationError> {
        self.write(
            WriteMethod::Post,
            repository.assignees_path(number),
            &AssigneesRequest { assignees },
            "add assignees",
        )
        .await
    }

    async fn create_issue_comment(
        &self,
        repository: &RepositoryLocator,
        number: u64,
        body: &str,
    ) -> Result<(), MigrationError> {
        self.write(
            WriteMethod::Post,
            repository.issue_comments_path(number),
            &CreateIssueComment { body },
            "create issue comment",
        )
        .await
    }

    async fn create_review_comment(
        &self,
        repository: &RepositoryLocator,
        number: u64,
        request: &CreateReviewComment,
    ) -> Result<(), MigrationError> {
        self.write(
            WriteMethod::Post,
            repository.review_comments_path(number),
            request,
            "create review comment",
        )
        .await
    }
}

#[cfg(test)]
#[path = "target_tests.rs"]
mod tests;
