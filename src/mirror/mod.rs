//! Full git mirror of one repository from the source host to the target.
//!
//! The mirror clones with `--mirror` into a scoped temporary directory,
//! repoints `origin` at the target, rewrites hidden pull request refs in
//! `packed-refs` so the target accepts them, and pushes with `--mirror`.
//! Every git invocation receives the temporary directory as its working
//! directory; the process working directory is never changed.

use std::process::{Command, Output};

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use tempfile::TempDir;
use url::Url;

use crate::github::error::MigrationError;
use crate::github::locator::{HostEndpoint, PersonalAccessToken, RepositoryLocator};

const PACKED_REFS: &str = "packed-refs";
const PULL_REF_PREFIX: &str = "refs/pull/";
const RENAMED_PULL_REF_PREFIX: &str = "refs/pr/";

/// Result of a mirror attempt that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorOutcome {
    /// Refs were pushed to the target.
    Pushed,
    /// The source repository has no refs; nothing was pushed.
    Empty,
}

/// Remotes for one repository mirror.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorRequest {
    /// `owner/name` used in log output.
    pub repository: String,
    /// Credentialed source clone URL.
    pub source_remote: Url,
    /// Credentialed target push URL.
    pub target_remote: Url,
}

/// Credentials and hosts used to build git remotes on both sides.
#[derive(Debug, Clone)]
pub struct MirrorCredentials {
    /// Login embedded in both remote URLs.
    pub user: String,
    /// Source host.
    pub source_host: HostEndpoint,
    /// Source token.
    pub source_token: PersonalAccessToken,
    /// Target host.
    pub target_host: HostEndpoint,
    /// Target token.
    pub target_token: PersonalAccessToken,
}

impl MirrorCredentials {
    /// Builds the mirror request for copying `source` to `target`.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::InvalidUrl`] when credentials cannot be
    /// embedded in either remote.
    pub fn request(
        &self,
        source: &RepositoryLocator,
        target: &RepositoryLocator,
    ) -> Result<MirrorRequest, MigrationError> {
        Ok(MirrorRequest {
            repository: source.full_name(),
            source_remote: self
                .source_host
                .git_remote(&self.user, &self.source_token, source)?,
            target_remote: self
                .target_host
                .git_remote(&self.user, &self.target_token, target)?,
        })
    }
}

/// Copies every ref of a repository from source to target.
///
/// Implementations block; async callers run them on a blocking thread.
#[cfg_attr(test, mockall::automock)]
pub trait RepositoryMirror: Send + Sync {
    /// Mirrors the repository described by `request`.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::Io`] when the scratch directory cannot be
    /// prepared or [`MigrationError::Git`] when a git command fails.
    fn mirror(&self, request: &MirrorRequest) -> Result<MirrorOutcome, MigrationError>;
}

/// Mirror implementation driving the `git` executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitCommandMirror {
    program: String,
}

impl GitCommandMirror {
    /// Creates a mirror invoking `program` for git commands.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn run(
        &self,
        workdir: &Utf8Path,
        args: &[&str],
        request: &MirrorRequest,
    ) -> Result<(), MigrationError> {
        let description = redact_args(args, request);
        tracing::debug!(repository = %request.repository, command = %description, "running git");

        let output: Output = Command::new(&self.program)
            .args(args)
            .current_dir(workdir)
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()
            .map_err(|error| MigrationError::Git {
                message: format!("failed to launch {}: {error}", self.program),
            })?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = redact_secrets(&String::from_utf8_lossy(&output.stderr), request);
        Err(MigrationError::Git {
            message: format!(
                "`git {description}` exited with {}: {}",
                output.status,
                stderr.trim()
            ),
        })
    }
}

impl RepositoryMirror for GitCommandMirror {
    fn mirror(&self, request: &MirrorRequest) -> Result<MirrorOutcome, MigrationError> {
        let scratch = TempDir::new().map_err(|error| MigrationError::Io {
            message: format!("failed to create mirror directory: {error}"),
        })?;
        let workdir = Utf8Path::from_path(scratch.path()).ok_or_else(|| MigrationError::Io {
            message: format!(
                "mirror directory is not valid UTF-8: {}",
                scratch.path().display()
            ),
        })?;
        tracing::info!(repository = %request.repository, dir = %workdir, "cloning source mirror");

        self.run(
            workdir,
            &["clone", "--mirror", request.source_remote.as_str(), workdir.as_str()],
            request,
        )?;
        self.run(workdir, &["remote", "rm", "origin"], request)?;
        self.run(
            workdir,
            &["remote", "add", "origin", request.target_remote.as_str()],
            request,
        )?;

        let dir = Dir::open_ambient_dir(workdir, ambient_authority()).map_err(|error| {
            MigrationError::Io {
                message: format!("failed to open mirror directory: {error}"),
            }
        })?;
        if !dir.exists(PACKED_REFS) {
            tracing::info!(repository = %request.repository, "repository is empty, ignoring");
            return Ok(MirrorOutcome::Empty);
        }

        let packed = dir
            .read_to_string(PACKED_REFS)
            .map_err(|error| MigrationError::Io {
                message: format!("failed to read {PACKED_REFS}: {error}"),
            })?;
        dir.write(PACKED_REFS, rewrite_pull_refs(&packed))
            .map_err(|error| MigrationError::Io {
                message: format!("failed to rewrite {PACKED_REFS}: {error}"),
            })?;

        tracing::info!(repository = %request.repository, "pushing mirror to target");
        self.run(workdir, &["push", "--mirror"], request)?;
        Ok(MirrorOutcome::Pushed)
    }
}

/// Renames hidden `refs/pull/*` refs to `refs/pr/*` in `packed-refs` text.
///
/// Only the ref name column is touched; peeled lines and other refs pass
/// through unchanged.
#[must_use]
pub fn rewrite_pull_refs(packed_refs: &str) -> String {
    packed_refs
        .split_inclusive('\n')
        .map(|line| {
            line.split_once(' ')
                .and_then(|(object, name)| {
                    name.strip_prefix(PULL_REF_PREFIX)
                        .map(|rest| format!("{object} {RENAMED_PULL_REF_PREFIX}{rest}"))
                })
                .unwrap_or_else(|| line.to_owned())
        })
        .collect()
}

fn redact_args(args: &[&str], request: &MirrorRequest) -> String {
    args.iter()
        .map(|arg| redact_secrets(arg, request))
        .collect::<Vec<_>>()
        .join(" ")
}

fn redact_secrets(text: &str, request: &MirrorRequest) -> String {
    [&request.source_remote, &request.target_remote]
        .into_iter()
        .filter_map(Url::password)
        .filter(|secret| !secret.is_empty())
        .fold(text.to_owned(), |acc, secret| acc.replace(secret, "***"))
}
