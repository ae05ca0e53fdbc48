//! Team copy from the source organization to the target.

use crate::github::error::MigrationError;
use crate::github::gateway::{SourceGateway, TargetGateway};
use crate::github::locator::OrganizationName;
use crate::github::models::SourceTeam;

use super::translate::{TeamRoster, Translator};

const MAINTAINER_ROLE: &str = "maintainer";

/// Result of copying one team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamOutcome {
    /// Team name.
    pub name: String,
    /// Failure detail; `None` when the team was created.
    pub error: Option<MigrationError>,
}

/// Loads bound repositories, members, and maintainers of `team`.
///
/// Teams linked to a directory group skip the member lookups.
///
/// # Errors
///
/// Returns the first source failure.
pub async fn load_roster<S>(
    source: &S,
    org: &OrganizationName,
    team: &SourceTeam,
) -> Result<TeamRoster, MigrationError>
where
    S: SourceGateway + ?Sized,
{
    let repositories = source.team_repositories(org, &team.slug).await?;
    if team.ldap_dn.is_some() {
        return Ok(TeamRoster {
            repositories,
            ..TeamRoster::default()
        });
    }

    let members = source.team_members(org, &team.slug).await?;
    let mut maintainers = Vec::new();
    for login in &members {
        if source.team_member_role(org, &team.slug, login).await? == MAINTAINER_ROLE {
            maintainers.push(login.clone());
        }
    }

    Ok(TeamRoster {
        repositories,
        members,
        maintainers,
    })
}

/// Copies every source team to the target organization.
///
/// Failures are logged per team and never stop the remaining teams.
///
/// # Errors
///
/// Returns an error only when the source team listing itself fails.
pub async fn copy_teams<S, T>(
    source: &S,
    target: &T,
    translator: &Translator,
    source_org: &OrganizationName,
    target_org: &OrganizationName,
) -> Result<Vec<TeamOutcome>, MigrationError>
where
    S: SourceGateway + ?Sized,
    T: TargetGateway + ?Sized,
{
    let teams = source.list_teams(source_org).await?;
    let mut outcomes = Vec::with_capacity(teams.len());

    for team in &teams {
        let result = match load_roster(source, source_org, team).await {
            Ok(roster) => {
                let request = translator.team(team, &roster);
                target.create_team(target_org, &request).await
            }
            Err(error) => Err(error),
        };

        let error = match result {
            Ok(()) => {
                tracing::info!(team = %team.name, organization = target_org.as_str(), "team created");
                None
            }
            Err(failure) => {
                tracing::error!(team = %team.name, "team creation failed: {failure}");
                Some(failure)
            }
        };
        outcomes.push(TeamOutcome {
            name: team.name.clone(),
            error,
        });
    }

    Ok(outcomes)
}
