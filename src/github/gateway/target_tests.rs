//! Tests for the target gateway.

use rstest::{fixture, rstest};
use serde_json::json;
use tokio::runtime::Runtime;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::OctocrabTargetGateway;
use crate::github::error::MigrationError;
use crate::github::gateway::{MembershipRole, TargetGateway};
use crate::github::locator::{
    HostEndpoint, OrganizationName, PersonalAccessToken, RepositoryLocator, RepositoryName,
};
use crate::github::models::{CreatePullRequest, CreateRepository, CreateReviewComment};

struct TargetGatewayFixture {
    runtime: Runtime,
    server: MockServer,
    org: OrganizationName,
    gateway: OctocrabTargetGateway,
}

impl TargetGatewayFixture {
    fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    fn mount(&self, mock: Mock) {
        self.block_on(mock.mount(&self.server));
    }

    fn repository(&self) -> RepositoryLocator {
        RepositoryLocator::new(
            self.org.clone(),
            RepositoryName::new("svc-a").expect("valid repository name"),
        )
    }
}

#[fixture]
fn gateway_fixture() -> TargetGatewayFixture {
    let runtime = Runtime::new().expect("runtime should start");
    let server = runtime.block_on(MockServer::start());
    let host = HostEndpoint::parse(&server.uri()).expect("mock server URL should parse");
    let token = PersonalAccessToken::new("target-token", "target").expect("valid token");
    let _guard = runtime.enter();
    let gateway = OctocrabTargetGateway::for_token(&token, &host).expect("gateway should build");
    TargetGatewayFixture {
        runtime,
        server,
        org: OrganizationName::new("acme-new").expect("valid org"),
        gateway,
    }
}

#[rstest]
fn create_pull_request_returns_assigned_number(gateway_fixture: TargetGatewayFixture) {
    gateway_fixture.mount(
        Mock::given(method("POST"))
            .and(path("/api/v3/repos/acme-new/svc-a/pulls"))
            .and(body_json(json!({
                "title": "Add retries",
                "body": "banner",
                "head": "f1",
                "base": "main"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "number": 7 }))),
    );
    let request = CreatePullRequest {
        title: "Add retries".to_owned(),
        body: "banner".to_owned(),
        head: "f1".to_owned(),
        base: "main".to_owned(),
    };

    let number = gateway_fixture
        .block_on(
            gateway_fixture
                .gateway
                .create_pull_request(&gateway_fixture.repository(), &request),
        )
        .expect("creation should succeed");

    assert_eq!(number, 7);
}

#[rstest]
fn create_pull_request_surfaces_validation_failures(gateway_fixture: TargetGatewayFixture) {
    gateway_fixture.mount(
        Mock::given(method("POST"))
            .and(path("/api/v3/repos/acme-new/svc-a/pulls"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "message": "Validation Failed",
                "errors": [{ "resource": "PullRequest", "code": "custom", "message": "No commits between main and f1" }]
            }))),
    );
    let request = CreatePullRequest {
        title: "Empty".to_owned(),
        body: String::new(),
        head: "f1".to_owned(),
        base: "main".to_owned(),
    };

    let error = gateway_fixture
        .block_on(
            gateway_fixture
                .gateway
                .create_pull_request(&gateway_fixture.repository(), &request),
        )
        .expect_err("creation should fail");

    assert!(error.is_unprocessable(), "unexpected error: {error:?}");
    assert!(
        error.to_string().contains("No commits between main and f1"),
        "missing detail: {error}"
    );
}

#[rstest]
fn create_repository_reports_existing_repositories(gateway_fixture: TargetGatewayFixture) {
    gateway_fixture.mount(
        Mock::given(method("POST"))
            .and(path("/api/v3/orgs/acme-new/repos"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "message": "Repository creation failed.",
                "errors": [{ "resource": "Repository", "code": "custom", "field": "name", "message": "name already exists on this account" }]
            }))),
    );
    let request = CreateRepository {
        name: "svc-a".to_owned(),
        private: true,
        description: None,
    };

    let error = gateway_fixture
        .block_on(
            gateway_fixture
                .gateway
                .create_repository(&gateway_fixture.org, &request),
        )
        .expect_err("creation should fail");

    assert!(error.is_already_exists(), "unexpected error: {error:?}");
}

#[rstest]
fn set_membership_puts_role(gateway_fixture: TargetGatewayFixture) {
    gateway_fixture.mount(
        Mock::given(method("PUT"))
            .and(path("/api/v3/orgs/acme-new/memberships/alice"))
            .and(body_json(json!({ "role": "admin" })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "state": "pending", "role": "admin" })),
            )
            .expect(1),
    );

    gateway_fixture
        .block_on(gateway_fixture.gateway.set_membership(
            &gateway_fixture.org,
            "alice",
            MembershipRole::Admin,
        ))
        .expect("membership should be granted");
}

#[rstest]
fn request_reviewers_accepts_empty_success_bodies(gateway_fixture: TargetGatewayFixture) {
    gateway_fixture.mount(
        Mock::given(method("POST"))
            .and(path("/api/v3/repos/acme-new/svc-a/pulls/7/requested_reviewers"))
            .and(body_json(json!({ "reviewers": ["bob"] })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1),
    );

    gateway_fixture
        .block_on(gateway_fixture.gateway.request_reviewers(
            &gateway_fixture.repository(),
            7,
            &["bob".to_owned()],
        ))
        .expect("reviewers should be requested");
}

#[rstest]
fn create_review_comment_sends_anchor(gateway_fixture: TargetGatewayFixture) {
    gateway_fixture.mount(
        Mock::given(method("POST"))
            .and(path("/api/v3/repos/acme-new/svc-a/pulls/7/comments"))
            .and(body_json(json!({
                "body": "nit",
                "commit_id": "abc",
                "path": "src/lib.rs",
                "position": 4
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 1 })))
            .expect(1),
    );
    let request = CreateReviewComment {
        body: "nit".to_owned(),
        commit_id: Some("abc".to_owned()),
        path: Some("src/lib.rs".to_owned()),
        position: Some(4),
    };

    gateway_fixture
        .block_on(gateway_fixture.gateway.create_review_comment(
            &gateway_fixture.repository(),
            7,
            &request,
        ))
        .expect("comment should be created");
}

#[rstest]
fn probe_organization_fails_for_missing_org(gateway_fixture: TargetGatewayFixture) {
    gateway_fixture.mount(
        Mock::given(method("GET"))
            .and(path("/api/v3/orgs/acme-new/repos"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Not Found" }))),
    );

    let error = gateway_fixture
        .block_on(gateway_fixture.gateway.probe_organization(&gateway_fixture.org))
        .expect_err("probe should fail");

    assert_eq!(error.status(), Some(404));
    assert!(matches!(error, MigrationError::Api { .. }));
}
