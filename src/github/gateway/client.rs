//! Octocrab client construction helpers for gateway implementations.

use http::Uri;
use octocrab::Octocrab;

use crate::github::error::MigrationError;
use crate::github::locator::PersonalAccessToken;

use super::error_mapping::map_octocrab_error;

/// Builds an Octocrab client for the given token and API base URL.
///
/// # Errors
///
/// Returns `MigrationError::InvalidUrl` when the base URI cannot be parsed or
/// `MigrationError::Api` when Octocrab fails to construct a client.
pub(super) fn build_octocrab_client(
    token: &PersonalAccessToken,
    api_base: &str,
) -> Result<Octocrab, MigrationError> {
    let base_uri: Uri = api_base
        .parse::<Uri>()
        .map_err(|error| MigrationError::InvalidUrl(error.to_string()))?;

    Octocrab::builder()
        .personal_token(token.value().to_owned())
        .base_uri(base_uri)
        .map_err(|error| MigrationError::Api {
            status: None,
            message: format!("build client failed: {error}"),
        })?
        .build()
        .map_err(|error| map_octocrab_error("build client", &error))
}
