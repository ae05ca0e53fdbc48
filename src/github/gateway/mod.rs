//! Gateways for reading from the source host and writing to the target host.
//!
//! Each side is a trait so the migration stages can be exercised against
//! mocks, while the Octocrab implementations issue the real HTTP requests.

mod client;
mod error_mapping;
mod source;
mod target;

pub use source::OctocrabSourceGateway;
pub use target::OctocrabTargetGateway;

use async_trait::async_trait;

use crate::github::error::MigrationError;
use crate::github::locator::{OrganizationName, RepositoryLocator, RepositoryName};
use crate::github::models::{
    CreateOrganization, CreatePullRequest, CreateRepository, CreateReviewComment, CreateTeam,
    Repository, SourceComment, SourcePullRequest, SourceReview, SourceReviewComment, SourceTeam,
};

/// Organization role used when listing or granting membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MembershipRole {
    /// Regular member.
    Member,
    /// Organization owner.
    Admin,
}

impl MembershipRole {
    /// Returns the API value for this role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Admin => "admin",
        }
    }
}

/// Read-only access to the organization being migrated.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SourceGateway: Send + Sync {
    /// List every repository in the organization.
    async fn list_repositories(
        &self,
        org: &OrganizationName,
    ) -> Result<Vec<Repository>, MigrationError>;

    /// Fetch one repository by name.
    async fn repository(
        &self,
        org: &OrganizationName,
        name: &RepositoryName,
    ) -> Result<Repository, MigrationError>;

    /// List member logins holding `role`.
    async fn list_members(
        &self,
        org: &OrganizationName,
        role: MembershipRole,
    ) -> Result<Vec<String>, MigrationError>;

    /// List the organization's teams.
    async fn list_teams(&self, org: &OrganizationName) -> Result<Vec<SourceTeam>, MigrationError>;

    /// List full names (`org/name`) of repositories bound to a team.
    async fn team_repositories(
        &self,
        org: &OrganizationName,
        slug: &str,
    ) -> Result<Vec<String>, MigrationError>;

    /// List member logins of a team.
    async fn team_members(
        &self,
        org: &OrganizationName,
        slug: &str,
    ) -> Result<Vec<String>, MigrationError>;

    /// Fetch a member's role (`member` or `maintainer`) within a team.
    async fn team_member_role(
        &self,
        org: &OrganizationName,
        slug: &str,
        login: &str,
    ) -> Result<String, MigrationError>;

    /// List open and closed pull requests of a repository.
    async fn list_pull_requests(
        &self,
        repository: &RepositoryLocator,
    ) -> Result<Vec<SourcePullRequest>, MigrationError>;

    /// List issue comments of a pull request.
    async fn issue_comments(
        &self,
        repository: &RepositoryLocator,
        number: u64,
    ) -> Result<Vec<SourceComment>, MigrationError>;

    /// List review comments of a pull request.
    async fn review_comments(
        &self,
        repository: &RepositoryLocator,
        number: u64,
    ) -> Result<Vec<SourceReviewComment>, MigrationError>;

    /// List submitted reviews of a pull request.
    async fn reviews(
        &self,
        repository: &RepositoryLocator,
        number: u64,
    ) -> Result<Vec<SourceReview>, MigrationError>;
}

/// Write access to the organization receiving the migration.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TargetGateway: Send + Sync {
    /// Succeeds when the organization can be listed.
    async fn probe_organization(&self, org: &OrganizationName) -> Result<(), MigrationError>;

    /// Create an organization through the site-administration endpoint.
    async fn create_organization(
        &self,
        request: &CreateOrganization,
    ) -> Result<(), MigrationError>;

    /// Grant `role` in the organization to `login` (invites when needed).
    async fn set_membership(
        &self,
        org: &OrganizationName,
        login: &str,
        role: MembershipRole,
    ) -> Result<(), MigrationError>;

    /// Create a team.
    async fn create_team(
        &self,
        org: &OrganizationName,
        request: &CreateTeam,
    ) -> Result<(), MigrationError>;

    /// Create a repository.
    async fn create_repository(
        &self,
        org: &OrganizationName,
        request: &CreateRepository,
    ) -> Result<(), MigrationError>;

    /// Create a pull request and return the number the target assigned.
    async fn create_pull_request(
        &self,
        repository: &RepositoryLocator,
        request: &CreatePullRequest,
    ) -> Result<u64, MigrationError>;

    /// Request reviews from `reviewers`.
    async fn request_reviewers(
        &self,
        repository: &RepositoryLocator,
        number: u64,
        reviewers: &[String],
    ) -> Result<(), MigrationError>;

    /// Assign `assignees`.
    async fn add_assignees(
        &self,
        repository: &RepositoryLocator,
        number: u64,
        assignees: &[String],
    ) -> Result<(), MigrationError>;

    /// Post an issue-level comment.
    async fn create_issue_comment(
        &self,
        repository: &RepositoryLocator,
        number: u64,
        body: &str,
    ) -> Result<(), MigrationError>;

    /// Post a comment anchored to a diff position.
    async fn create_review_comment(
        &self,
        repository: &RepositoryLocator,
        number: u64,
        request: &CreateReviewComment,
    ) -> Result<(), MigrationError>;
}
