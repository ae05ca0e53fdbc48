//! Error mapping helpers for the Octocrab gateway implementations.

use http::StatusCode;

use crate::github::error::MigrationError;

/// Checks if a status indicates an authentication failure.
pub(super) const fn is_auth_failure(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

/// Checks if an octocrab error represents a network/transport issue.
pub(super) const fn is_network_error(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::Http { .. }
            | octocrab::Error::Hyper { .. }
            | octocrab::Error::Service { .. }
    )
}

/// Flattens the `errors` array of a GitHub error body into one line.
fn error_details(errors: Option<&Vec<serde_json::Value>>) -> Option<String> {
    let details: Vec<String> = errors?
        .iter()
        .map(|entry| {
            entry
                .get("message")
                .and_then(serde_json::Value::as_str)
                .map_or_else(|| entry.to_string(), ToOwned::to_owned)
        })
        .collect();

    if details.is_empty() {
        None
    } else {
        Some(details.join("; "))
    }
}

pub(super) fn map_octocrab_error(operation: &str, error: &octocrab::Error) -> MigrationError {
    if let octocrab::Error::GitHub { source, .. } = error {
        let status = source.status_code;
        let detail = error_details(source.errors.as_ref())
            .map(|detail| format!(" ({detail})"))
            .unwrap_or_default();

        return if is_auth_failure(status) {
            MigrationError::Authentication {
                message: format!(
                    "{operation} failed: host returned {status} {message}{detail}",
                    message = source.message
                ),
            }
        } else {
            MigrationError::Api {
                status: Some(status.as_u16()),
                message: format!(
                    "{operation} failed with status {status}: {message}{detail}",
                    message = source.message
                ),
            }
        };
    }

    if is_network_error(error) {
        return MigrationError::Network {
            message: format!("{operation} failed: {error}"),
        };
    }

    MigrationError::Api {
        status: None,
        message: format!("{operation} failed: {error}"),
    }
}
