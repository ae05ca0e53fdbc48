//! Data models for records read from the source host and payloads sent to
//! the target host.
//!
//! Types prefixed with `Api` are internal deserialisation targets that convert
//! into the public `Source*` records. Types prefixed with `Create` (and the
//! request structs) serialise directly into target request bodies.

use serde::{Deserialize, Serialize};

#[cfg(feature = "test-support")]
pub mod test_support;

/// Repository identity and visibility on the source host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Repository {
    /// Repository name within its organization.
    pub name: String,
    /// Whether the repository is private.
    pub private: bool,
    /// Free-form description.
    pub description: Option<String>,
}

/// Team summary as listed by the source host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceTeam {
    /// Display name.
    pub name: String,
    /// URL-safe identifier used in team routes.
    pub slug: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Team privacy (`secret` or `closed`).
    pub privacy: Option<String>,
    /// Distinguished name of a linked directory group, if any.
    pub ldap_dn: Option<String>,
}

/// Pull request as listed by the source host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourcePullRequest {
    /// Source-side number.
    pub number: u64,
    /// Title.
    pub title: String,
    /// Description body.
    pub body: Option<String>,
    /// Author login.
    pub author: Option<String>,
    /// Creation timestamp (ISO 8601 format).
    pub created_at: Option<String>,
    /// Branch the changes come from.
    pub head_ref: String,
    /// Branch the changes merge into.
    pub base_ref: String,
    /// Assignee logins.
    pub assignees: Vec<String>,
    /// Logins whose review is requested.
    pub requested_reviewers: Vec<String>,
}

/// Issue-level comment on a pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceComment {
    /// Author login.
    pub author: Option<String>,
    /// Comment body.
    pub body: Option<String>,
    /// Creation timestamp (ISO 8601 format).
    pub created_at: Option<String>,
}

/// Comment attached to a diff position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceReviewComment {
    /// Author login.
    pub author: Option<String>,
    /// Comment body.
    pub body: Option<String>,
    /// Creation timestamp (ISO 8601 format).
    pub created_at: Option<String>,
    /// Commit the comment was originally made against.
    pub commit_id: Option<String>,
    /// File path the comment is attached to.
    pub path: Option<String>,
    /// Position within the diff the comment was originally made at.
    pub position: Option<u64>,
}

/// Submitted pull request review.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceReview {
    /// Author login.
    pub author: Option<String>,
    /// Review summary body.
    pub body: Option<String>,
    /// Review state such as `APPROVED` or `CHANGES_REQUESTED`.
    pub state: Option<String>,
    /// Submission timestamp (ISO 8601 format).
    pub submitted_at: Option<String>,
}

/// Body for `POST /orgs/{org}/repos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateRepository {
    /// Repository name.
    pub name: String,
    /// Whether the repository is private.
    pub private: bool,
    /// Description, omitted when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body for `POST /orgs/{org}/teams`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreateTeam {
    /// Team name.
    pub name: String,
    /// Description, omitted when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Privacy, omitted when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privacy: Option<String>,
    /// Repository full names (`org/name`) bound to the team.
    pub repo_names: Vec<String>,
    /// Member logins.
    pub members: Vec<String>,
    /// Maintainer logins, always a subset of `members`.
    pub maintainers: Vec<String>,
    /// Linked directory group; when present the lists above stay empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ldap_dn: Option<String>,
}

/// Body for `POST /admin/organizations`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateOrganization {
    /// Organization login.
    pub login: String,
    /// Administrator login that will own the organization.
    pub admin: String,
}

/// Body for `POST /repos/{org}/{repo}/pulls`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatePullRequest {
    /// Title.
    pub title: String,
    /// Description carrying the provenance banner.
    pub body: String,
    /// Source branch.
    pub head: String,
    /// Destination branch.
    pub base: String,
}

/// Body for `POST /repos/{org}/{repo}/pulls/{n}/comments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateReviewComment {
    /// Comment body carrying the provenance banner.
    pub body: String,
    /// Commit the comment refers to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_id: Option<String>,
    /// File path the comment is attached to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Diff position.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct CreateIssueComment<'body> {
    pub(crate) body: &'body str,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct MembershipRequest<'role> {
    pub(crate) role: &'role str,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ReviewersRequest<'logins> {
    pub(crate) reviewers: &'logins [String],
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct AssigneesRequest<'logins> {
    pub(crate) assignees: &'logins [String],
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiUser {
    pub(crate) login: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiRepository {
    pub(crate) name: String,
    pub(crate) private: Option<bool>,
    pub(crate) description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiTeam {
    pub(crate) name: String,
    pub(crate) slug: String,
    pub(crate) description: Option<String>,
    pub(crate) privacy: Option<String>,
    #[serde(default)]
    pub(crate) ldap_dn: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiTeamRepository {
    pub(crate) full_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiTeamMembership {
    pub(crate) role: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiBranchRef {
    #[serde(rename = "ref")]
    pub(crate) name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiPullRequest {
    pub(crate) number: u64,
    pub(crate) title: Option<String>,
    pub(crate) body: Option<String>,
    pub(crate) user: Option<ApiUser>,
    pub(crate) created_at: Option<String>,
    pub(crate) head: ApiBranchRef,
    pub(crate) base: ApiBranchRef,
    #[serde(default)]
    pub(crate) assignees: Option<Vec<ApiUser>>,
    #[serde(default)]
    pub(crate) requested_reviewers: Option<Vec<ApiUser>>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiComment {
    pub(crate) body: Option<String>,
    pub(crate) user: Option<ApiUser>,
    pub(crate) created_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiReviewComment {
    pub(crate) body: Option<String>,
    pub(crate) user: Option<ApiUser>,
    pub(crate) created_at: Option<String>,
    pub(crate) commit_id: Option<String>,
    pub(crate) original_commit_id: Option<String>,
    pub(crate) path: Option<String>,
    pub(crate) position: Option<u64>,
    pub(crate) original_position: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiReview {
    pub(crate) body: Option<String>,
    pub(crate) user: Option<ApiUser>,
    pub(crate) state: Option<String>,
    pub(crate) submitted_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiCreatedPullRequest {
    pub(crate) number: u64,
}

fn logins(users: Option<Vec<ApiUser>>) -> Vec<String> {
    users
        .unwrap_or_default()
        .into_iter()
        .filter_map(|user| user.login)
        .collect()
}

impl From<ApiRepository> for Repository {
    fn from(value: ApiRepository) -> Self {
        Self {
            name: value.name,
            private: value.private.unwrap_or(false),
            description: value.description,
        }
    }
}

impl From<ApiTeam> for SourceTeam {
    fn from(value: ApiTeam) -> Self {
        Self {
            name: value.name,
            slug: value.slug,
            description: value.description,
            privacy: value.privacy,
            ldap_dn: value.ldap_dn.filter(|dn| !dn.is_empty()),
        }
    }
}

impl From<ApiPullRequest> for SourcePullRequest {
    fn from(value: ApiPullRequest) -> Self {
        Self {
            number: value.number,
            title: value.title.unwrap_or_default(),
            body: value.body,
            author: value.user.and_then(|user| user.login),
            created_at: value.created_at,
            head_ref: value.head.name,
            base_ref: value.base.name,
            assignees: logins(value.assignees),
            requested_reviewers: logins(value.requested_reviewers),
        }
    }
}

impl From<ApiComment> for SourceComment {
    fn from(value: ApiComment) -> Self {
        Self {
            author: value.user.and_then(|user| user.login),
            body: value.body,
            created_at: value.created_at,
        }
    }
}

impl From<ApiReviewComment> for SourceReviewComment {
    fn from(value: ApiReviewComment) -> Self {
        Self {
            author: value.user.and_then(|user| user.login),
            body: value.body,
            created_at: value.created_at,
            commit_id: value.original_commit_id.or(value.commit_id),
            path: value.path,
            position: value.original_position.or(value.position),
        }
    }
}

impl From<ApiReview> for SourceReview {
    fn from(value: ApiReview) -> Self {
        Self {
            author: value.user.and_then(|user| user.login),
            body: value.body,
            state: value.state,
            submitted_at: value.submitted_at,
        }
    }
}
