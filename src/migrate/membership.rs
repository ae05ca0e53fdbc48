//! Organization membership sync.

use crate::github::error::MigrationError;
use crate::github::gateway::{MembershipRole, TargetGateway};
use crate::github::locator::OrganizationName;

/// Status the target returns when the login is already a member or invited.
const ALREADY_MEMBER: u16 = 422;

/// Result of granting one login its role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipOutcome {
    /// Login on both hosts.
    pub login: String,
    /// Role granted.
    pub role: MembershipRole,
    /// Failure detail; `None` when the login was added or invited.
    pub error: Option<MigrationError>,
}

impl MembershipOutcome {
    /// Returns true when the membership call counted as success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Logins to grant, split by role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    /// Organization owners.
    pub admins: Vec<String>,
    /// Regular members.
    pub members: Vec<String>,
}

/// Grants admins first, then members.
///
/// A 422 response means the login is already present and counts as success.
/// Any other failure is logged and the next login proceeds.
pub async fn sync_membership<T>(
    target: &T,
    org: &OrganizationName,
    roster: &Roster,
) -> Vec<MembershipOutcome>
where
    T: TargetGateway + ?Sized,
{
    let ordered = roster
        .admins
        .iter()
        .map(|login| (login, MembershipRole::Admin))
        .chain(
            roster
                .members
                .iter()
                .map(|login| (login, MembershipRole::Member)),
        );

    let mut outcomes = Vec::with_capacity(roster.admins.len() + roster.members.len());
    for (login, role) in ordered {
        let error = match target.set_membership(org, login, role).await {
            Ok(()) => None,
            Err(error) if error.status() == Some(ALREADY_MEMBER) => None,
            Err(error) => Some(error),
        };

        match &error {
            None => tracing::info!(
                login = %login,
                role = role.as_str(),
                organization = org.as_str(),
                "added or invited to organization"
            ),
            Some(failure) => tracing::error!(
                login = %login,
                role = role.as_str(),
                organization = org.as_str(),
                "failed to add to organization: {failure}"
            ),
        }

        outcomes.push(MembershipOutcome {
            login: login.clone(),
            role,
            error,
        });
    }
    outcomes
}
