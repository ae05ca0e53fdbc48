//! Error types exposed by the GitHub gateway and migration layers.

use thiserror::Error;

/// HTTP status GitHub returns for validation failures such as duplicates.
const UNPROCESSABLE_ENTITY: u16 = 422;

/// Errors surfaced while configuring a run or talking to either host.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MigrationError {
    /// A host URL could not be parsed.
    #[error("host URL is invalid: {0}")]
    InvalidUrl(String),

    /// An organization, repository, or login segment was empty.
    #[error("{kind} must not be empty")]
    EmptyName {
        /// What kind of name was missing.
        kind: &'static str,
    },

    /// The authentication token for one side was missing.
    #[error("personal access token is required for the {side} host")]
    MissingToken {
        /// Which side (`source` or `target`) lacks a token.
        side: &'static str,
    },

    /// Configuration could not be loaded or is inconsistent.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// The token was rejected by the host.
    #[error("host rejected the token: {message}")]
    Authentication {
        /// Error message returned with the 401/403 response.
        message: String,
    },

    /// The host answered with a non-success status or an unusable body.
    #[error("API error: {message}")]
    Api {
        /// HTTP status when the host produced one.
        status: Option<u16>,
        /// Response detail describing the failure.
        message: String,
    },

    /// Networking failed while calling a host.
    #[error("network error: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },

    /// A git subprocess failed.
    #[error("git error: {message}")]
    Git {
        /// Command and exit detail.
        message: String,
    },

    /// The target organization is absent and could not be created.
    #[error("target organization {organization} is unavailable: {message}")]
    OrganizationUnavailable {
        /// Organization login on the target host.
        organization: String,
        /// Why the organization could not be resolved.
        message: String,
    },
}

impl MigrationError {
    /// HTTP status carried by an API error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => *status,
            _ => None,
        }
    }

    /// Returns true when the host rejected the request as unprocessable (422).
    #[must_use]
    pub const fn is_unprocessable(&self) -> bool {
        matches!(self.status(), Some(UNPROCESSABLE_ENTITY))
    }

    /// Returns true for a 422 whose detail reports a duplicate entity.
    #[must_use]
    pub fn is_already_exists(&self) -> bool {
        match self {
            Self::Api { message, .. } => {
                self.is_unprocessable() && message.to_lowercase().contains("already exists")
            }
            _ => false,
        }
    }
}
