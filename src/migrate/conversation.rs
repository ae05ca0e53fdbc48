//! Pull request conversation model and timestamp ordering.
//!
//! Comments, reviews, and review comments share one entry type carrying a
//! [`EntryKind`] discriminant. The kind decides which target endpoint an
//! entry is replayed against.

use chrono::{DateTime, Utc};

use crate::github::models::{CreatePullRequest, CreateReviewComment};

/// Target endpoint a conversation entry is posted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayEndpoint {
    /// `POST /repos/{org}/{repo}/issues/{n}/comments`.
    IssueComments,
    /// `POST /repos/{org}/{repo}/pulls/{n}/comments`.
    PullComments,
}

/// What kind of source record an entry came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    /// Issue-level comment.
    Comment,
    /// Submitted review, replayed as an issue comment.
    Review {
        /// Originating state such as `APPROVED`.
        state: String,
    },
    /// Comment anchored to a diff position.
    ReviewComment {
        /// Commit the comment refers to.
        commit_id: Option<String>,
        /// File path.
        path: Option<String>,
        /// Diff position.
        position: Option<u64>,
    },
}

impl EntryKind {
    /// Endpoint used when replaying this kind.
    #[must_use]
    pub const fn endpoint(&self) -> ReplayEndpoint {
        match self {
            Self::Comment | Self::Review { .. } => ReplayEndpoint::IssueComments,
            Self::ReviewComment { .. } => ReplayEndpoint::PullComments,
        }
    }
}

/// One entry in a pull request conversation, body already carrying its
/// provenance banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationEntry {
    /// Author login on the source host.
    pub author: Option<String>,
    /// Rendered body.
    pub body: String,
    /// Creation (or submission) time; `None` when the source omitted it or it
    /// did not parse.
    pub created_at: Option<DateTime<Utc>>,
    /// Source record kind.
    pub kind: EntryKind,
}

impl ConversationEntry {
    /// Endpoint this entry is replayed against.
    #[must_use]
    pub const fn endpoint(&self) -> ReplayEndpoint {
        self.kind.endpoint()
    }

    /// Review comment request for this entry.
    ///
    /// Other kinds yield a request without an anchor.
    #[must_use]
    pub fn review_comment_request(&self) -> CreateReviewComment {
        let (commit_id, path, position) = match &self.kind {
            EntryKind::ReviewComment {
                commit_id,
                path,
                position,
            } => (commit_id.clone(), path.clone(), *position),
            EntryKind::Comment | EntryKind::Review { .. } => (None, None, None),
        };
        CreateReviewComment {
            body: self.body.clone(),
            commit_id,
            path,
            position,
        }
    }
}

/// A pull request ready for replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    /// Source-side number, used for logging.
    pub number: u64,
    /// Shell creation request: title, banner body, head, and base.
    pub shell: CreatePullRequest,
    /// Assignee logins.
    pub assignees: Vec<String>,
    /// Logins whose review is requested.
    pub requested_reviewers: Vec<String>,
    /// Issue comments in fetch order.
    pub comments: Vec<ConversationEntry>,
    /// Non-empty reviews in fetch order.
    pub reviews: Vec<ConversationEntry>,
    /// Review comments in fetch order.
    pub review_comments: Vec<ConversationEntry>,
}

impl PullRequest {
    /// Total number of conversation entries.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.comments.len() + self.reviews.len() + self.review_comments.len()
    }

    /// Merges the three collections into replay order.
    ///
    /// Entries are sorted by timestamp; ties keep comments before reviews
    /// before review comments, each in fetch order. Entries without a
    /// timestamp go last.
    #[must_use]
    pub fn merged_conversation(&self) -> Vec<&ConversationEntry> {
        let mut merged: Vec<&ConversationEntry> = self
            .comments
            .iter()
            .chain(&self.reviews)
            .chain(&self.review_comments)
            .collect();
        merged.sort_by_key(|entry| (entry.created_at.is_none(), entry.created_at));
        merged
    }
}

/// Parses an ISO 8601 timestamp into UTC, discarding values that do not
/// parse.
#[must_use]
pub fn parse_timestamp(value: Option<&str>) -> Option<DateTime<Utc>> {
    value
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|parsed| parsed.with_timezone(&Utc))
}
