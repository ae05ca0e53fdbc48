//! Tests for run sequencing and per-repository isolation.

use std::sync::Arc;

use rstest::{fixture, rstest};

use super::Migrator;
use crate::github::error::MigrationError;
use crate::github::gateway::{MembershipRole, MockSourceGateway, MockTargetGateway};
use crate::github::locator::{
    HostEndpoint, OrganizationName, PersonalAccessToken, RepositoryName,
};
use crate::github::models::{Repository, SourcePullRequest};
use crate::migrate::context::MigrationContext;
use crate::migrate::report::{RepositoryStatus, RepositoryStep, RunStage, StageFailure};
use crate::mirror::{MirrorCredentials, MirrorOutcome, MockRepositoryMirror};

fn not_found() -> MigrationError {
    MigrationError::Api {
        status: Some(404),
        message: "Not Found".to_owned(),
    }
}

fn repository(name: &str) -> Repository {
    Repository {
        name: name.to_owned(),
        private: false,
        description: None,
    }
}

#[fixture]
fn context() -> MigrationContext {
    MigrationContext::new(
        OrganizationName::new("acme").expect("valid org"),
        OrganizationName::new("acme-new").expect("valid org"),
        HostEndpoint::parse("target.example.com").expect("valid host"),
    )
}

#[fixture]
fn credentials() -> MirrorCredentials {
    MirrorCredentials {
        user: "deploy".to_owned(),
        source_host: HostEndpoint::parse("source.example.com").expect("valid host"),
        source_token: PersonalAccessToken::new("s", "source").expect("valid token"),
        target_host: HostEndpoint::parse("target.example.com").expect("valid host"),
        target_token: PersonalAccessToken::new("t", "target").expect("valid token"),
    }
}

/// Source with no members and no teams.
fn quiet_source() -> MockSourceGateway {
    let mut source = MockSourceGateway::new();
    source.expect_list_members().returning(|_, _| Ok(Vec::new()));
    source.expect_list_teams().returning(|_| Ok(Vec::new()));
    source
}

#[rstest]
#[tokio::test]
async fn missing_organization_without_admin_aborts_before_repositories(
    context: MigrationContext,
    credentials: MirrorCredentials,
) {
    let mut source = MockSourceGateway::new();
    source.expect_list_repositories().never();
    source.expect_list_members().never();
    let mut target = MockTargetGateway::new();
    target
        .expect_probe_organization()
        .times(1)
        .returning(|_| Err(not_found()));
    target.expect_create_organization().never();
    let mut mirror = MockRepositoryMirror::new();
    mirror.expect_mirror().never();
    let migrator = Migrator::new(&source, &target, Arc::new(mirror), &credentials, &context);

    let result = migrator.run().await;

    assert!(
        matches!(
            result,
            Err(MigrationError::OrganizationUnavailable { ref organization, .. }) if organization == "acme-new"
        ),
        "unexpected result: {result:?}"
    );
}

#[rstest]
#[tokio::test]
async fn missing_organization_is_created_with_site_admin(
    mut context: MigrationContext,
    credentials: MirrorCredentials,
) {
    context.site_admin = Some("root".to_owned());
    let mut source = quiet_source();
    source.expect_list_repositories().returning(|_| Ok(Vec::new()));
    let mut target = MockTargetGateway::new();
    target
        .expect_probe_organization()
        .returning(|_| Err(not_found()));
    target
        .expect_create_organization()
        .withf(|request| request.login == "acme-new" && request.admin == "root")
        .times(1)
        .returning(|_| Ok(()));
    let migrator = Migrator::new(
        &source,
        &target,
        Arc::new(MockRepositoryMirror::new()),
        &credentials,
        &context,
    );

    let report = migrator.run().await.expect("run should succeed");

    assert!(report.repositories.is_empty());
}

fn connection_reset() -> MigrationError {
    MigrationError::Network {
        message: "connection reset".to_owned(),
    }
}

#[rstest]
#[tokio::test]
async fn failed_member_listing_still_grants_fetched_admins(
    context: MigrationContext,
    credentials: MirrorCredentials,
) {
    let mut source = MockSourceGateway::new();
    source
        .expect_list_members()
        .withf(|_, role| *role == MembershipRole::Admin)
        .times(1)
        .returning(|_, _| Ok(vec!["root".to_owned()]));
    source
        .expect_list_members()
        .withf(|_, role| *role == MembershipRole::Member)
        .times(1)
        .returning(|_, _| Err(connection_reset()));
    source.expect_list_teams().returning(|_| Ok(Vec::new()));
    source.expect_list_repositories().returning(|_| Ok(Vec::new()));
    let mut target = MockTargetGateway::new();
    target.expect_probe_organization().returning(|_| Ok(()));
    target
        .expect_set_membership()
        .withf(|_, login, role| login == "root" && *role == MembershipRole::Admin)
        .times(1)
        .returning(|_, _, _| Ok(()));
    let migrator = Migrator::new(
        &source,
        &target,
        Arc::new(MockRepositoryMirror::new()),
        &credentials,
        &context,
    );

    let report = migrator.run().await.expect("run should succeed");

    assert_eq!(report.memberships.len(), 1);
    assert_eq!(
        report.stage_failures,
        vec![StageFailure {
            stage: RunStage::ListMembers(MembershipRole::Member),
            error: connection_reset(),
        }]
    );
    assert!(!report.is_clean());
}

#[rstest]
#[tokio::test]
async fn failed_team_listing_is_recorded(
    context: MigrationContext,
    credentials: MirrorCredentials,
) {
    let mut source = MockSourceGateway::new();
    source.expect_list_members().returning(|_, _| Ok(Vec::new()));
    source
        .expect_list_teams()
        .times(1)
        .returning(|_| Err(connection_reset()));
    source.expect_list_repositories().returning(|_| Ok(Vec::new()));
    let mut target = MockTargetGateway::new();
    target.expect_probe_organization().returning(|_| Ok(()));
    target.expect_create_team().never();
    let migrator = Migrator::new(
        &source,
        &target,
        Arc::new(MockRepositoryMirror::new()),
        &credentials,
        &context,
    );

    let report = migrator.run().await.expect("run should succeed");

    assert!(report.teams.is_empty());
    assert_eq!(
        report.stage_failures,
        vec![StageFailure {
            stage: RunStage::ListTeams,
            error: connection_reset(),
        }]
    );
}

#[rstest]
#[tokio::test]
async fn failed_organization_creation_aborts(
    mut context: MigrationContext,
    credentials: MirrorCredentials,
) {
    context.site_admin = Some("root".to_owned());
    let source = MockSourceGateway::new();
    let mut target = MockTargetGateway::new();
    target
        .expect_probe_organization()
        .returning(|_| Err(not_found()));
    target.expect_create_organization().returning(|_| {
        Err(MigrationError::Authentication {
            message: "must be site admin".to_owned(),
        })
    });
    let migrator = Migrator::new(
        &source,
        &target,
        Arc::new(MockRepositoryMirror::new()),
        &credentials,
        &context,
    );

    let result = migrator.run().await;

    assert!(matches!(
        result,
        Err(MigrationError::OrganizationUnavailable { .. })
    ));
}

#[rstest]
#[tokio::test]
async fn empty_mirror_skips_pull_requests(
    context: MigrationContext,
    credentials: MirrorCredentials,
) {
    let mut source = quiet_source();
    source
        .expect_list_repositories()
        .returning(|_| Ok(vec![repository("svc-empty")]));
    source.expect_list_pull_requests().never();
    let mut target = MockTargetGateway::new();
    target.expect_probe_organization().returning(|_| Ok(()));
    target.expect_create_repository().returning(|_, _| Ok(()));
    let mut mirror = MockRepositoryMirror::new();
    mirror
        .expect_mirror()
        .withf(|request| request.repository == "acme/svc-empty")
        .times(1)
        .returning(|_| Ok(MirrorOutcome::Empty));
    let migrator = Migrator::new(&source, &target, Arc::new(mirror), &credentials, &context);

    let report = migrator.run().await.expect("run should succeed");

    let outcome = report.repositories.first().expect("one repository");
    assert_eq!(outcome.status, RepositoryStatus::Empty);
    assert!(outcome.pull_requests.is_empty());
}

#[rstest]
#[tokio::test]
async fn existing_repository_still_mirrors_and_failures_are_isolated(
    context: MigrationContext,
    credentials: MirrorCredentials,
) {
    let mut source = quiet_source();
    source
        .expect_list_repositories()
        .returning(|_| Ok(vec![repository("svc-a"), repository("svc-b")]));
    source
        .expect_list_pull_requests()
        .withf(|repository| repository.full_name() == "acme/svc-b")
        .returning(|_| Ok(Vec::new()));
    let mut target = MockTargetGateway::new();
    target.expect_probe_organization().returning(|_| Ok(()));
    target
        .expect_create_repository()
        .withf(|_, request| request.name == "svc-a")
        .returning(|_, _| {
            Err(MigrationError::Api {
                status: Some(422),
                message: "name already exists on this account".to_owned(),
            })
        });
    target
        .expect_create_repository()
        .withf(|_, request| request.name == "svc-b")
        .returning(|_, _| Ok(()));
    let mut mirror = MockRepositoryMirror::new();
    mirror
        .expect_mirror()
        .withf(|request| request.repository == "acme/svc-a")
        .returning(|_| {
            Err(MigrationError::Git {
                message: "clone failed".to_owned(),
            })
        });
    mirror
        .expect_mirror()
        .withf(|request| request.repository == "acme/svc-b")
        .returning(|_| Ok(MirrorOutcome::Pushed));
    let migrator = Migrator::new(&source, &target, Arc::new(mirror), &credentials, &context);

    let report = migrator.run().await.expect("run should succeed");

    let statuses: Vec<&RepositoryStatus> =
        report.repositories.iter().map(|outcome| &outcome.status).collect();
    assert!(matches!(
        statuses.first(),
        Some(RepositoryStatus::Failed {
            step: RepositoryStep::Mirror,
            ..
        })
    ));
    assert_eq!(statuses.get(1), Some(&&RepositoryStatus::Mirrored));
}

#[rstest]
#[tokio::test]
async fn unresolved_subset_names_are_dropped(
    mut context: MigrationContext,
    credentials: MirrorCredentials,
) {
    context.repositories = Some(vec![
        RepositoryName::new("ghost").expect("valid name"),
        RepositoryName::new("svc-a").expect("valid name"),
    ]);
    context.migrate_pull_requests = false;
    let mut source = quiet_source();
    source.expect_list_repositories().never();
    source
        .expect_repository()
        .withf(|_, name| name.as_str() == "ghost")
        .returning(|_, _| Err(not_found()));
    source
        .expect_repository()
        .withf(|_, name| name.as_str() == "svc-a")
        .returning(|_, _| Ok(repository("svc-a")));
    source.expect_list_pull_requests().never();
    let mut target = MockTargetGateway::new();
    target.expect_probe_organization().returning(|_| Ok(()));
    target
        .expect_create_repository()
        .times(1)
        .returning(|_, _| Ok(()));
    let mut mirror = MockRepositoryMirror::new();
    mirror
        .expect_mirror()
        .times(1)
        .returning(|_| Ok(MirrorOutcome::Pushed));
    let migrator = Migrator::new(&source, &target, Arc::new(mirror), &credentials, &context);

    let report = migrator.run().await.expect("run should succeed");

    let names: Vec<&str> = report
        .repositories
        .iter()
        .map(|outcome| outcome.name.as_str())
        .collect();
    assert_eq!(names, vec!["svc-a"]);
}

#[rstest]
#[tokio::test]
async fn unfetchable_pull_request_is_skipped(
    context: MigrationContext,
    credentials: MirrorCredentials,
) {
    let mut source = quiet_source();
    source
        .expect_list_repositories()
        .returning(|_| Ok(vec![repository("svc-a")]));
    source.expect_list_pull_requests().returning(|_| {
        Ok(vec![SourcePullRequest {
            number: 9,
            title: "Broken".to_owned(),
            head_ref: "f9".to_owned(),
            base_ref: "main".to_owned(),
            ..Default::default()
        }])
    });
    source
        .expect_issue_comments()
        .returning(|_, _| Err(not_found()));
    source.expect_review_comments().returning(|_, _| Ok(Vec::new()));
    source.expect_reviews().returning(|_, _| Ok(Vec::new()));
    let mut target = MockTargetGateway::new();
    target.expect_probe_organization().returning(|_| Ok(()));
    target.expect_create_repository().returning(|_, _| Ok(()));
    target.expect_create_pull_request().never();
    let mut mirror = MockRepositoryMirror::new();
    mirror
        .expect_mirror()
        .returning(|_| Ok(MirrorOutcome::Pushed));
    let migrator = Migrator::new(&source, &target, Arc::new(mirror), &credentials, &context);

    let report = migrator.run().await.expect("run should succeed");

    let (migrated, failed) = report.pull_request_counts();
    assert_eq!((migrated, failed), (0, 1));
}
