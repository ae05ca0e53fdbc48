//! Conversion of source records into target creation requests.
//!
//! Translation is pure: nothing here performs I/O, and missing optional
//! fields degrade to empty or absent values instead of failing.

use crate::github::locator::OrganizationName;
use crate::github::models::{
    CreatePullRequest, CreateRepository, CreateTeam, Repository, SourceComment, SourcePullRequest,
    SourceReview, SourceReviewComment, SourceTeam,
};

use super::context::MigrationContext;
use super::conversation::{ConversationEntry, EntryKind, parse_timestamp};

/// Verb used when a review carries no state.
const FALLBACK_REVIEW_VERB: &str = "reviewed";

/// Team membership gathered from the source host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamRoster {
    /// Repository full names bound to the team on the source.
    pub repositories: Vec<String>,
    /// Member logins.
    pub members: Vec<String>,
    /// Maintainer logins.
    pub maintainers: Vec<String>,
}

/// Rewrites source records for the target organization.
#[derive(Debug, Clone)]
pub struct Translator {
    source_org: OrganizationName,
    target_org: OrganizationName,
    profile_base: String,
}

impl Translator {
    /// Creates a translator for the organizations and target host in `context`.
    #[must_use]
    pub fn new(context: &MigrationContext) -> Self {
        Self {
            source_org: context.source_org.clone(),
            target_org: context.target_org.clone(),
            profile_base: context.target_host.web_base().to_owned(),
        }
    }

    /// Repository creation request; the name passes through unchanged.
    #[must_use]
    pub fn repository(&self, repository: &Repository) -> CreateRepository {
        CreateRepository {
            name: repository.name.clone(),
            private: repository.private,
            description: repository.description.clone(),
        }
    }

    /// Rewrites the owner of an `owner/name` reference when it is the source
    /// organization.
    ///
    /// Other owners and the name segment are left untouched.
    #[must_use]
    pub fn rebind(&self, full_name: &str) -> String {
        match full_name.split_once('/') {
            Some((owner, name)) if owner == self.source_org.as_str() => {
                format!("{}/{name}", self.target_org.as_str())
            }
            _ => full_name.to_owned(),
        }
    }

    /// Team creation request.
    ///
    /// A team linked to a directory group keeps its linkage and leaves the
    /// member and maintainer lists empty.
    #[must_use]
    pub fn team(&self, team: &SourceTeam, roster: &TeamRoster) -> CreateTeam {
        let repo_names = roster
            .repositories
            .iter()
            .map(|full_name| self.rebind(full_name))
            .collect();

        let (members, maintainers) = if team.ldap_dn.is_some() {
            (Vec::new(), Vec::new())
        } else {
            let maintainers = roster
                .maintainers
                .iter()
                .filter(|login| roster.members.contains(login))
                .cloned()
                .collect();
            (roster.members.clone(), maintainers)
        };

        CreateTeam {
            name: team.name.clone(),
            description: team.description.clone(),
            privacy: team.privacy.clone(),
            repo_names,
            members,
            maintainers,
            ldap_dn: team.ldap_dn.clone(),
        }
    }

    /// Pull request shell with a `created as #n` banner.
    #[must_use]
    pub fn pull_request(&self, pull_request: &SourcePullRequest) -> CreatePullRequest {
        CreatePullRequest {
            title: pull_request.title.clone(),
            body: self.provenance(
                &format!("created as #{}", pull_request.number),
                pull_request.author.as_deref(),
                pull_request.created_at.as_deref(),
                pull_request.body.as_deref(),
            ),
            head: pull_request.head_ref.clone(),
            base: pull_request.base_ref.clone(),
        }
    }

    /// Issue comment entry.
    #[must_use]
    pub fn comment(&self, comment: &SourceComment) -> ConversationEntry {
        ConversationEntry {
            author: comment.author.clone(),
            body: self.provenance(
                "created",
                comment.author.as_deref(),
                comment.created_at.as_deref(),
                comment.body.as_deref(),
            ),
            created_at: parse_timestamp(comment.created_at.as_deref()),
            kind: EntryKind::Comment,
        }
    }

    /// Review entry, or `None` when the review has no body.
    #[must_use]
    pub fn review(&self, review: &SourceReview) -> Option<ConversationEntry> {
        let body = review.body.as_deref().filter(|body| !body.is_empty())?;
        let state = review.state.clone().unwrap_or_default();
        let verb = if state.is_empty() {
            FALLBACK_REVIEW_VERB
        } else {
            state.as_str()
        };

        Some(ConversationEntry {
            author: review.author.clone(),
            body: self.provenance(
                verb,
                review.author.as_deref(),
                review.submitted_at.as_deref(),
                Some(body),
            ),
            created_at: parse_timestamp(review.submitted_at.as_deref()),
            kind: EntryKind::Review { state },
        })
    }

    /// Review comment entry anchored to its original commit and position.
    #[must_use]
    pub fn review_comment(&self, comment: &SourceReviewComment) -> ConversationEntry {
        ConversationEntry {
            author: comment.author.clone(),
            body: self.provenance(
                "created",
                comment.author.as_deref(),
                comment.created_at.as_deref(),
                comment.body.as_deref(),
            ),
            created_at: parse_timestamp(comment.created_at.as_deref()),
            kind: EntryKind::ReviewComment {
                commit_id: comment.commit_id.clone(),
                path: comment.path.clone(),
                position: comment.position,
            },
        }
    }

    fn provenance(
        &self,
        verb: &str,
        login: Option<&str>,
        timestamp: Option<&str>,
        body: Option<&str>,
    ) -> String {
        format!(
            "Originally {verb} by [{login}]({base}/{login}) on {timestamp}\r\n\r\n{body}",
            login = login.unwrap_or_default(),
            base = self.profile_base,
            timestamp = timestamp.unwrap_or_default(),
            body = body.unwrap_or_default(),
        )
    }
}
