//! Application configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.ferry.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `FERRY_*`, plus the legacy
//!    `SOURCE_GITHUB_TOKEN` and `TARGET_GITHUB_TOKEN` for tokens
//! 4. **Command-line arguments** – `--source-url`, `--target-org`, and so on
//!
//! # Configuration File
//!
//! ```toml
//! source_url = "https://github.com"
//! source_org = "acme"
//! target_url = "https://ghe.example.com"
//! target_org = "acme-new"
//! user = "deploy"
//! repos = "svc-a, svc-b"
//! site_admin = "root"
//! repository_concurrency = 4
//! ```

use std::env;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::github::error::MigrationError;
use crate::github::locator::{HostEndpoint, OrganizationName, PersonalAccessToken, RepositoryName};
use crate::migrate::context::{MigrationContext, ReplayMode};
use crate::mirror::MirrorCredentials;

/// Legacy environment variable consulted when no source token is configured.
pub const SOURCE_TOKEN_ENV: &str = "SOURCE_GITHUB_TOKEN";

/// Legacy environment variable consulted when no target token is configured.
pub const TARGET_TOKEN_ENV: &str = "TARGET_GITHUB_TOKEN";

const DEFAULT_GIT_PROGRAM: &str = "git";

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Environment Variables
///
/// - `FERRY_SOURCE_URL` or `--source-url`: Source host URL
/// - `FERRY_SOURCE_ORG` or `--source-org`: Source organization
/// - `FERRY_SOURCE_TOKEN`, `SOURCE_GITHUB_TOKEN`, or `--source-token`
/// - `FERRY_TARGET_URL` or `--target-url`: Target host URL
/// - `FERRY_TARGET_ORG` or `--target-org`: Target organization
/// - `FERRY_TARGET_TOKEN`, `TARGET_GITHUB_TOKEN`, or `--target-token`
/// - `FERRY_USER` or `--user`: User embedded in git remotes
///
/// # Example
///
/// ```no_run
/// use ferry::FerryConfig;
/// use ortho_config::OrthoConfig;
///
/// let config = FerryConfig::load().expect("failed to load configuration");
/// let context = config.migration_context().expect("incomplete configuration");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "FERRY",
    discovery(
        dotfile_name = ".ferry.toml",
        config_file_name = "ferry.toml",
        app_name = "ferry"
    )
)]
pub struct FerryConfig {
    /// Source host URL; `https://` is assumed when the scheme is missing.
    ///
    /// Can be provided via:
    /// - CLI: `--source-url <URL>` or `-s <URL>`
    /// - Environment: `FERRY_SOURCE_URL`
    /// - Config file: `source_url = "..."`
    #[ortho_config(cli_short = 's')]
    pub source_url: Option<String>,

    /// Organization to read from.
    ///
    /// Can be provided via:
    /// - CLI: `--source-org <ORG>` or `-o <ORG>`
    /// - Environment: `FERRY_SOURCE_ORG`
    /// - Config file: `source_org = "..."`
    #[ortho_config(cli_short = 'o')]
    pub source_org: Option<String>,

    /// Personal access token for the source host.
    ///
    /// Can be provided via:
    /// - CLI: `--source-token <TOKEN>` or `-k <TOKEN>`
    /// - Environment: `FERRY_SOURCE_TOKEN` or `SOURCE_GITHUB_TOKEN` (legacy)
    /// - Config file: `source_token = "..."`
    #[ortho_config(cli_short = 'k')]
    pub source_token: Option<String>,

    /// Target host URL.
    ///
    /// Can be provided via:
    /// - CLI: `--target-url <URL>` or `-t <URL>`
    /// - Environment: `FERRY_TARGET_URL`
    /// - Config file: `target_url = "..."`
    #[ortho_config(cli_short = 't')]
    pub target_url: Option<String>,

    /// Organization to write to. Defaults to the source organization.
    ///
    /// Can be provided via:
    /// - CLI: `--target-org <ORG>` or `-O <ORG>`
    /// - Environment: `FERRY_TARGET_ORG`
    /// - Config file: `target_org = "..."`
    #[ortho_config(cli_short = 'O')]
    pub target_org: Option<String>,

    /// Personal access token for the target host.
    ///
    /// Can be provided via:
    /// - CLI: `--target-token <TOKEN>` or `-K <TOKEN>`
    /// - Environment: `FERRY_TARGET_TOKEN` or `TARGET_GITHUB_TOKEN` (legacy)
    /// - Config file: `target_token = "..."`
    #[ortho_config(cli_short = 'K')]
    pub target_token: Option<String>,

    /// User embedded with the tokens in git remote URLs.
    ///
    /// Can be provided via:
    /// - CLI: `--user <LOGIN>` or `-u <LOGIN>`
    /// - Environment: `FERRY_USER`
    /// - Config file: `user = "..."`
    #[ortho_config(cli_short = 'u')]
    pub user: Option<String>,

    /// Repository subset separated by commas or whitespace. Every repository
    /// of the source organization is migrated when unset.
    ///
    /// Can be provided via:
    /// - CLI: `--repos <NAMES>` or `-r <NAMES>`
    /// - Environment: `FERRY_REPOS`
    /// - Config file: `repos = "svc-a, svc-b"`
    #[ortho_config(cli_short = 'r')]
    pub repos: Option<String>,

    /// Administrator login used to create a missing target organization.
    ///
    /// Can be provided via:
    /// - CLI: `--site-admin <LOGIN>` or `-a <LOGIN>`
    /// - Environment: `FERRY_SITE_ADMIN`
    /// - Config file: `site_admin = "..."`
    #[ortho_config(cli_short = 'a')]
    pub site_admin: Option<String>,

    /// Mirrors repositories without reconstructing pull requests.
    ///
    /// Can be provided via:
    /// - CLI: `--skip-pull-requests` or `-P`
    /// - Config file: `skip_pull_requests = true`
    ///
    /// Note: `ortho_config` does not load boolean values from the environment.
    #[ortho_config(cli_short = 'P')]
    pub skip_pull_requests: bool,

    /// Continues past conversation entries that fail to replay.
    ///
    /// Can be provided via:
    /// - CLI: `--lenient-replay` or `-l`
    /// - Config file: `lenient_replay = true`
    #[ortho_config(cli_short = 'l')]
    pub lenient_replay: bool,

    /// Repositories migrated at the same time (`--repository-concurrency`
    /// or `-j`). Defaults to 1.
    #[ortho_config(cli_short = 'j')]
    pub repository_concurrency: usize,

    /// Pull requests replayed at the same time within one repository
    /// (`--pull-request-concurrency` or `-J`). Defaults to 1.
    #[ortho_config(cli_short = 'J')]
    pub pull_request_concurrency: usize,

    /// Git executable used for mirroring (`--git-program` or `-g`). Defaults
    /// to `git` on `PATH`.
    #[ortho_config(cli_short = 'g')]
    pub git_program: String,
}

impl Default for FerryConfig {
    fn default() -> Self {
        Self {
            source_url: None,
            source_org: None,
            source_token: None,
            target_url: None,
            target_org: None,
            target_token: None,
            user: None,
            repos: None,
            site_admin: None,
            skip_pull_requests: false,
            lenient_replay: false,
            repository_concurrency: 1,
            pull_request_concurrency: 1,
            git_program: DEFAULT_GIT_PROGRAM.to_owned(),
        }
    }
}

impl FerryConfig {
    /// Resolves the source token, falling back to `SOURCE_GITHUB_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::MissingToken`] when no source provides a
    /// non-blank value.
    pub fn resolve_source_token(&self) -> Result<PersonalAccessToken, MigrationError> {
        resolve_token(self.source_token.as_deref(), SOURCE_TOKEN_ENV, "source")
    }

    /// Resolves the target token, falling back to `TARGET_GITHUB_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::MissingToken`] when no source provides a
    /// non-blank value.
    pub fn resolve_target_token(&self) -> Result<PersonalAccessToken, MigrationError> {
        resolve_token(self.target_token.as_deref(), TARGET_TOKEN_ENV, "target")
    }

    /// Parses the source host URL.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::Configuration`] when unset and
    /// [`MigrationError::InvalidUrl`] when it cannot be parsed.
    pub fn source_host(&self) -> Result<HostEndpoint, MigrationError> {
        HostEndpoint::parse(require(self.source_url.as_deref(), "source host URL", "--source-url")?)
    }

    /// Parses the target host URL.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::Configuration`] when unset and
    /// [`MigrationError::InvalidUrl`] when it cannot be parsed.
    pub fn target_host(&self) -> Result<HostEndpoint, MigrationError> {
        HostEndpoint::parse(require(self.target_url.as_deref(), "target host URL", "--target-url")?)
    }

    /// Returns the source organization.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::Configuration`] when unset.
    pub fn source_organization(&self) -> Result<OrganizationName, MigrationError> {
        OrganizationName::new(require(
            self.source_org.as_deref(),
            "source organization",
            "--source-org",
        )?)
    }

    /// Returns the target organization, defaulting to the source one.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::Configuration`] when neither is set.
    pub fn target_organization(&self) -> Result<OrganizationName, MigrationError> {
        match self.target_org.as_deref() {
            Some(name) if !name.trim().is_empty() => OrganizationName::new(name),
            _ => self.source_organization(),
        }
    }

    /// Splits `repos` into repository names.
    ///
    /// Returns `None` when no subset is configured, meaning every repository.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::Configuration`] when `repos` is set but
    /// names nothing.
    pub fn repository_subset(&self) -> Result<Option<Vec<RepositoryName>>, MigrationError> {
        let Some(raw) = self.repos.as_deref() else {
            return Ok(None);
        };
        let names = raw
            .split(|character: char| character == ',' || character.is_whitespace())
            .filter(|name| !name.is_empty())
            .map(RepositoryName::new)
            .collect::<Result<Vec<_>, _>>()?;
        if names.is_empty() {
            return Err(MigrationError::Configuration {
                message: "repository subset is empty (use --repos a,b or leave unset)".to_owned(),
            });
        }
        Ok(Some(names))
    }

    /// Checks that every required value is present and consistent.
    ///
    /// Runs before any network call so a bad configuration fails fast.
    ///
    /// # Errors
    ///
    /// Returns the first configuration problem found.
    pub fn validate(&self) -> Result<(), MigrationError> {
        self.migration_context()?;
        self.mirror_credentials()?;
        if self.git_program.trim().is_empty() {
            return Err(MigrationError::Configuration {
                message: "git program must not be empty".to_owned(),
            });
        }
        Ok(())
    }

    /// Builds the run-wide context from the loaded values.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::Configuration`] when a required value is
    /// missing or a concurrency limit is zero.
    pub fn migration_context(&self) -> Result<MigrationContext, MigrationError> {
        let repository_concurrency = require_positive(
            self.repository_concurrency,
            "repository_concurrency",
        )?;
        let pull_request_concurrency = require_positive(
            self.pull_request_concurrency,
            "pull_request_concurrency",
        )?;

        let mut context = MigrationContext::new(
            self.source_organization()?,
            self.target_organization()?,
            self.target_host()?,
        );
        context.repositories = self.repository_subset()?;
        context.site_admin = self
            .site_admin
            .as_deref()
            .map(str::trim)
            .filter(|login| !login.is_empty())
            .map(ToOwned::to_owned);
        context.migrate_pull_requests = !self.skip_pull_requests;
        context.replay_mode = if self.lenient_replay {
            ReplayMode::Lenient
        } else {
            ReplayMode::Strict
        };
        context.repository_concurrency = repository_concurrency;
        context.pull_request_concurrency = pull_request_concurrency;
        Ok(context)
    }

    /// Builds the credentials embedded in git remote URLs.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::Configuration`] when the user or a host is
    /// missing, or [`MigrationError::MissingToken`] when a token is.
    pub fn mirror_credentials(&self) -> Result<MirrorCredentials, MigrationError> {
        Ok(MirrorCredentials {
            user: require(self.user.as_deref(), "git user", "--user")?.to_owned(),
            source_host: self.source_host()?,
            source_token: self.resolve_source_token()?,
            target_host: self.target_host()?,
            target_token: self.resolve_target_token()?,
        })
    }
}

fn resolve_token(
    configured: Option<&str>,
    fallback_env: &str,
    side: &'static str,
) -> Result<PersonalAccessToken, MigrationError> {
    let value = configured
        .map(ToOwned::to_owned)
        .or_else(|| env::var(fallback_env).ok())
        .ok_or(MigrationError::MissingToken { side })?;
    PersonalAccessToken::new(value, side)
}

fn require<'a>(
    value: Option<&'a str>,
    what: &str,
    flag: &str,
) -> Result<&'a str, MigrationError> {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .ok_or_else(|| MigrationError::Configuration {
            message: format!("{what} is required (use {flag})"),
        })
}

fn require_positive(value: usize, field: &str) -> Result<usize, MigrationError> {
    if value == 0 {
        return Err(MigrationError::Configuration {
            message: format!("{field} must be at least 1"),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests;
