//! Mock hosts and a fake mirror for the migration BDD tests.

use std::sync::{Arc, Mutex};

use ferry::github::models::test_support::{
    comment_json, pull_request_json, repository_json, review_comment_json, review_json,
};
use ferry::{MigrationError, MirrorOutcome, MirrorRequest, RepositoryMirror};
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub(crate) const SOURCE_ORG: &str = "acme";
pub(crate) const TARGET_ORG: &str = "acme-new";
pub(crate) const REPOSITORY: &str = "svc-a";

const API: &str = "/api/v3";
const TARGET_PULL_NUMBER: u64 = 7;

/// Mirror that records requested repositories and returns a fixed outcome.
pub(crate) struct FakeMirror {
    outcome: MirrorOutcome,
    requests: Mutex<Vec<String>>,
}

impl FakeMirror {
    pub(crate) fn shared(outcome: MirrorOutcome) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn mirrored(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(|error| panic!("mirror log poisoned: {error}"))
            .clone()
    }
}

impl RepositoryMirror for FakeMirror {
    fn mirror(&self, request: &MirrorRequest) -> Result<MirrorOutcome, MigrationError> {
        self.requests
            .lock()
            .map_err(|error| MigrationError::Io {
                message: error.to_string(),
            })?
            .push(request.repository.clone());
        Ok(self.outcome)
    }
}

async fn respond(server: &MockServer, verb: &str, route: String, status: u16, body: Value) {
    Mock::given(method(verb))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

/// Seeds a source organization with one repository holding one pull
/// request whose conversation interleaves comments, a review, and a review
/// comment at t=1..4.
pub(crate) async fn mount_source(server: &MockServer) {
    let org = format!("{API}/orgs/{SOURCE_ORG}");
    let repo = format!("{API}/repos/{SOURCE_ORG}/{REPOSITORY}");

    respond(server, "GET", format!("{org}/members"), 200, json!([])).await;
    respond(server, "GET", format!("{org}/teams"), 200, json!([])).await;
    respond(
        server,
        "GET",
        format!("{org}/repos"),
        200,
        json!([repository_json(REPOSITORY, false)]),
    )
    .await;
    respond(
        server,
        "GET",
        format!("{repo}/pulls"),
        200,
        json!([pull_request_json(1, "Add feature", "f1", "main", &["carol"], &["alice"])]),
    )
    .await;
    respond(
        server,
        "GET",
        format!("{repo}/issues/1/comments"),
        200,
        json!([
            comment_json("alice", "First pass", "2024-01-01T00:00:01Z"),
            comment_json("alice", "Second pass", "2024-01-01T00:00:03Z"),
        ]),
    )
    .await;
    respond(
        server,
        "GET",
        format!("{repo}/pulls/1/reviews"),
        200,
        json!([review_json(
            "bob",
            "Needs tests",
            "CHANGES_REQUESTED",
            "2024-01-01T00:00:02Z"
        )]),
    )
    .await;
    respond(
        server,
        "GET",
        format!("{repo}/pulls/1/comments"),
        200,
        json!([review_comment_json(
            "bob",
            "Rename this",
            "2024-01-01T00:00:04Z",
            "src/lib.rs",
            3
        )]),
    )
    .await;
}

/// Answers the organization probe as present or missing.
pub(crate) async fn mount_target_probe(server: &MockServer, exists: bool) {
    let route = format!("{API}/orgs/{TARGET_ORG}/repos");
    if exists {
        respond(server, "GET", route, 200, json!([])).await;
    } else {
        respond(server, "GET", route, 404, json!({ "message": "Not Found" })).await;
    }
}

/// Accepts repository creation and every pull request write. When
/// `accept_pull_requests` is false, shell creation is rejected with a 422.
pub(crate) async fn mount_target_writes(server: &MockServer, accept_pull_requests: bool) {
    let repo = format!("{API}/repos/{TARGET_ORG}/{REPOSITORY}");

    respond(
        server,
        "POST",
        format!("{API}/orgs/{TARGET_ORG}/repos"),
        201,
        json!({ "name": REPOSITORY }),
    )
    .await;

    if accept_pull_requests {
        respond(
            server,
            "POST",
            format!("{repo}/pulls"),
            201,
            json!({ "number": TARGET_PULL_NUMBER }),
        )
        .await;
    } else {
        respond(
            server,
            "POST",
            format!("{repo}/pulls"),
            422,
            json!({
                "message": "Validation Failed",
                "errors": [{ "resource": "PullRequest", "code": "custom", "message": "No commits between main and f1" }]
            }),
        )
        .await;
    }

    let number = TARGET_PULL_NUMBER;
    respond(
        server,
        "POST",
        format!("{repo}/pulls/{number}/requested_reviewers"),
        201,
        json!({}),
    )
    .await;
    respond(server, "POST", format!("{repo}/issues/{number}/assignees"), 201, json!({})).await;
    respond(server, "POST", format!("{repo}/issues/{number}/comments"), 201, json!({ "id": 1 })).await;
    respond(server, "POST", format!("{repo}/pulls/{number}/comments"), 201, json!({ "id": 2 })).await;
}

/// Conversation writes received by `server`, as `(endpoint, body)` pairs in
/// arrival order. The endpoint is `issue` or `review`.
pub(crate) async fn conversation_posts(server: &MockServer) -> Vec<(String, String)> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|request| {
            request.method.as_str() == "POST" && request.url.path().ends_with("/comments")
        })
        .map(|request| {
            let endpoint = if request.url.path().contains("/issues/") {
                "issue"
            } else {
                "review"
            };
            let body = serde_json::from_slice::<Value>(&request.body)
                .ok()
                .and_then(|value| value.get("body").and_then(Value::as_str).map(ToOwned::to_owned))
                .unwrap_or_default();
            (endpoint.to_owned(), body)
        })
        .collect()
}

/// Paths of every request `server` received.
pub(crate) async fn received_paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .map(|request| request.url.path().to_owned())
        .collect()
}
