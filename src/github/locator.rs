//! Host URL normalisation, identity wrappers, and API route builders.

use url::Url;

use super::error::MigrationError;

/// Organization login wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrganizationName(String);

impl OrganizationName {
    /// Validates that the organization login is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::EmptyName`] when the value is blank.
    pub fn new(value: impl AsRef<str>) -> Result<Self, MigrationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(MigrationError::EmptyName {
                kind: "organization",
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the organization login.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub(crate) fn repos_path(&self) -> String {
        format!("/orgs/{}/repos", self.0)
    }

    pub(crate) fn members_path(&self) -> String {
        format!("/orgs/{}/members", self.0)
    }

    pub(crate) fn membership_path(&self, login: &str) -> String {
        format!("/orgs/{}/memberships/{login}", self.0)
    }

    pub(crate) fn teams_path(&self) -> String {
        format!("/orgs/{}/teams", self.0)
    }

    pub(crate) fn team_repos_path(&self, slug: &str) -> String {
        format!("/orgs/{}/teams/{slug}/repos", self.0)
    }

    pub(crate) fn team_members_path(&self, slug: &str) -> String {
        format!("/orgs/{}/teams/{slug}/members", self.0)
    }

    pub(crate) fn team_membership_path(&self, slug: &str, login: &str) -> String {
        format!("/orgs/{}/teams/{slug}/memberships/{login}", self.0)
    }
}

/// Repository name wrapper to prevent parameter mix-ups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryName(String);

impl RepositoryName {
    /// Validates that the repository name is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::EmptyName`] when the value is blank.
    pub fn new(value: impl AsRef<str>) -> Result<Self, MigrationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(MigrationError::EmptyName { kind: "repository" });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Personal access token wrapper enforcing presence.
///
/// `Debug` output never includes the token value.
#[derive(Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::MissingToken`] when the supplied string is
    /// blank.
    pub fn new(token: impl AsRef<str>, side: &'static str) -> Result<Self, MigrationError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(MigrationError::MissingToken { side });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Debug for PersonalAccessToken {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("PersonalAccessToken(***)")
    }
}

/// Web and API base URLs for one hosting instance.
///
/// # Example
///
/// ```
/// use ferry::github::locator::HostEndpoint;
///
/// let host = HostEndpoint::parse("ghe.example.com/").expect("host should parse");
/// assert_eq!(host.web_base(), "https://ghe.example.com");
/// assert_eq!(host.api_base().as_str(), "https://ghe.example.com/api/v3");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEndpoint {
    web: Url,
    api: Url,
}

impl HostEndpoint {
    /// Parses a host URL, assuming `https://` when no scheme is given.
    ///
    /// Public GitHub maps to `https://api.github.com`; any other host serves
    /// its API under `/api/v3`.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::InvalidUrl`] when the URL cannot be parsed or
    /// has no host.
    pub fn parse(input: &str) -> Result<Self, MigrationError> {
        let trimmed = input.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(MigrationError::InvalidUrl("host URL is empty".to_owned()));
        }
        let with_scheme = if trimmed.contains("://") {
            trimmed.to_owned()
        } else {
            format!("https://{trimmed}")
        };

        let web =
            Url::parse(&with_scheme).map_err(|error| MigrationError::InvalidUrl(error.to_string()))?;
        let api = derive_api_base(&web)?;
        Ok(Self { web, api })
    }

    /// Web base URL without a trailing slash, used for profile links.
    #[must_use]
    pub fn web_base(&self) -> &str {
        self.web.as_str().trim_end_matches('/')
    }

    /// API base URL for Octocrab clients.
    #[must_use]
    pub const fn api_base(&self) -> &Url {
        &self.api
    }

    /// Builds an authenticated git remote URL for `org/name`.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::InvalidUrl`] when the credentials cannot be
    /// embedded in the URL.
    pub fn git_remote(
        &self,
        user: &str,
        token: &PersonalAccessToken,
        repository: &RepositoryLocator,
    ) -> Result<Url, MigrationError> {
        let mut remote = self.web.clone();
        remote.set_path(&format!(
            "{}/{}.git",
            repository.owner().as_str(),
            repository.name().as_str()
        ));
        remote
            .set_username(user)
            .map_err(|()| MigrationError::InvalidUrl("cannot set git username".to_owned()))?;
        remote
            .set_password(Some(token.value()))
            .map_err(|()| MigrationError::InvalidUrl("cannot set git password".to_owned()))?;
        Ok(remote)
    }
}

fn derive_api_base(web: &Url) -> Result<Url, MigrationError> {
    let host = web
        .host_str()
        .ok_or_else(|| MigrationError::InvalidUrl("URL must include a host".to_owned()))?;

    if host.eq_ignore_ascii_case("github.com") {
        return Url::parse("https://api.github.com")
            .map_err(|error| MigrationError::InvalidUrl(error.to_string()));
    }

    let mut api = web.clone();
    let base_path = web.path().trim_end_matches('/');
    api.set_path(&format!("{base_path}/api/v3"));
    api.set_query(None);
    Ok(api)
}

/// Repository within an organization, with the API routes beneath it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryLocator {
    owner: OrganizationName,
    name: RepositoryName,
}

impl RepositoryLocator {
    /// Creates a locator from its owner and name.
    #[must_use]
    pub const fn new(owner: OrganizationName, name: RepositoryName) -> Self {
        Self { owner, name }
    }

    /// Repository owner.
    #[must_use]
    pub const fn owner(&self) -> &OrganizationName {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub const fn name(&self) -> &RepositoryName {
        &self.name
    }

    /// Returns `owner/name`.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner.as_str(), self.name.as_str())
    }

    pub(crate) fn repository_path(&self) -> String {
        format!("/repos/{}", self.full_name())
    }

    pub(crate) fn pulls_path(&self) -> String {
        format!("/repos/{}/pulls", self.full_name())
    }

    pub(crate) fn issue_comments_path(&self, number: u64) -> String {
        format!("/repos/{}/issues/{number}/comments", self.full_name())
    }

    pub(crate) fn assignees_path(&self, number: u64) -> String {
        format!("/repos/{}/issues/{number}/assignees", self.full_name())
    }

    pub(crate) fn review_comments_path(&self, number: u64) -> String {
        format!("/repos/{}/pulls/{number}/comments", self.full_name())
    }

    pub(crate) fn reviews_path(&self, number: u64) -> String {
        format!("/repos/{}/pulls/{number}/reviews", self.full_name())
    }

    pub(crate) fn requested_reviewers_path(&self, number: u64) -> String {
        format!(
            "/repos/{}/pulls/{number}/requested_reviewers",
            self.full_name()
        )
    }
}

impl std::fmt::Display for RepositoryLocator {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}/{}", self.owner.as_str(), self.name.as_str())
    }
}
