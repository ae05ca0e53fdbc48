//! Ferry library crate for moving a GitHub organization between hosts.
//!
//! A run copies membership and teams, mirrors every repository's refs with
//! git, then reconstructs each pull request on the target host: the shell is
//! recreated, reviewers and assignees are attached, and the merged
//! conversation is replayed in original timestamp order with provenance
//! banners crediting the original authors.

pub mod config;
pub mod github;
pub mod migrate;
pub mod mirror;

pub use config::FerryConfig;
pub use github::{
    HostEndpoint, MigrationError, OctocrabSourceGateway, OctocrabTargetGateway, OrganizationName,
    PersonalAccessToken, RepositoryLocator, RepositoryName, SourceGateway, TargetGateway,
};
pub use migrate::{MigrationContext, MigrationReport, Migrator, ReplayMode};
pub use mirror::{GitCommandMirror, MirrorCredentials, MirrorOutcome, MirrorRequest, RepositoryMirror};
