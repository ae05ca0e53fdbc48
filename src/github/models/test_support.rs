//! Test helpers for building host API JSON fixtures.
//!
//! These builders produce the JSON bodies a GitHub-compatible host returns,
//! so behavioural tests can seed mock servers without repeating field lists.
//!
//! # Examples
//!
//! ```
//! use ferry::github::models::test_support::{comment_json, review_json};
//!
//! let comment = comment_json("alice", "Looks good", "2024-01-01T00:00:01Z");
//! assert_eq!(comment["user"]["login"], "alice");
//!
//! let review = review_json("bob", "", "APPROVED", "2024-01-01T00:00:02Z");
//! assert_eq!(review["state"], "APPROVED");
//! ```

use serde_json::{Value, json};

/// Builds a listed pull request with the given branches and people.
#[must_use]
pub fn pull_request_json(
    number: u64,
    title: &str,
    head: &str,
    base: &str,
    reviewers: &[&str],
    assignees: &[&str],
) -> Value {
    json!({
        "number": number,
        "title": title,
        "body": format!("Body of {title}"),
        "user": { "login": "octocat" },
        "created_at": "2024-01-01T00:00:00Z",
        "head": { "ref": head },
        "base": { "ref": base },
        "requested_reviewers": reviewers
            .iter()
            .map(|login| json!({ "login": login }))
            .collect::<Vec<_>>(),
        "assignees": assignees
            .iter()
            .map(|login| json!({ "login": login }))
            .collect::<Vec<_>>(),
    })
}

/// Builds an issue comment.
#[must_use]
pub fn comment_json(author: &str, body: &str, created_at: &str) -> Value {
    json!({
        "body": body,
        "user": { "login": author },
        "created_at": created_at,
    })
}

/// Builds a review with the given state.
#[must_use]
pub fn review_json(author: &str, body: &str, state: &str, submitted_at: &str) -> Value {
    json!({
        "body": body,
        "user": { "login": author },
        "state": state,
        "submitted_at": submitted_at,
    })
}

/// Builds a review comment anchored to `path` at diff `position`.
#[must_use]
pub fn review_comment_json(
    author: &str,
    body: &str,
    created_at: &str,
    path: &str,
    position: u64,
) -> Value {
    json!({
        "body": body,
        "user": { "login": author },
        "created_at": created_at,
        "commit_id": "0000000000000000000000000000000000000000",
        "original_commit_id": "1111111111111111111111111111111111111111",
        "path": path,
        "position": position,
        "original_position": position,
    })
}

/// Builds a repository listing entry.
#[must_use]
pub fn repository_json(name: &str, private: bool) -> Value {
    json!({
        "name": name,
        "full_name": format!("source/{name}"),
        "private": private,
        "description": format!("{name} service"),
    })
}
