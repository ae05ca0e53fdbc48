//! Access to the source and target hosts.
//!
//! This module wraps Octocrab behind two gateway traits: a read-only view of
//! the source organization and a write view of the target organization. Host
//! URLs, organization names, and tokens are validated into small wrapper types
//! before any request is made, and Octocrab failures are mapped into
//! [`MigrationError`] so callers can classify duplicates and validation
//! rejections without depending on Octocrab internals.

pub mod error;
pub mod gateway;
pub mod locator;
pub mod models;
pub mod pagination;

pub use error::MigrationError;
pub use gateway::{
    MembershipRole, OctocrabSourceGateway, OctocrabTargetGateway, SourceGateway, TargetGateway,
};
pub use locator::{
    HostEndpoint, OrganizationName, PersonalAccessToken, RepositoryLocator, RepositoryName,
};
pub use models::{
    CreateOrganization, CreatePullRequest, CreateRepository, CreateReviewComment, CreateTeam,
    Repository, SourceComment, SourcePullRequest, SourceReview, SourceReviewComment, SourceTeam,
};

#[cfg(test)]
pub use gateway::{MockSourceGateway, MockTargetGateway};
