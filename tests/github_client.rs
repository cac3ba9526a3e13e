// ABOUTME: Integration tests for the GitHub REST client.
// ABOUTME: Checks request shape, payload parsing, and error mapping against a mock API.

use preview_wait::github::{ApiError, DeploymentApi, DeploymentState, GitHubClient, Repository};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> GitHubClient {
    GitHubClient::builder("ghs_test")
        .base_url(server.uri())
        .build()
        .unwrap()
}

fn repo() -> Repository {
    Repository::new("acme", "site")
}

#[tokio::test]
async fn lists_deployments_for_sha_and_environment() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/site/deployments"))
        .and(query_param("sha", "abc"))
        .and(query_param("environment", "Preview"))
        .and(header("authorization", "Bearer ghs_test"))
        .and(header("accept", "application/vnd.github+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 11, "sha": "abc", "environment": "Preview", "creator": { "login": "vercel[bot]" } },
            { "id": 12, "sha": "abc", "environment": "Preview", "creator": null }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let deployments = client(&server)
        .list_deployments(&repo(), "abc", Some("Preview"))
        .await
        .unwrap();

    assert_eq!(deployments.len(), 2);
    assert_eq!(deployments[0].creator_login(), Some("vercel[bot]"));
    assert_eq!(deployments[1].creator_login(), None);
}

#[tokio::test]
async fn lists_statuses_newest_first() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/site/deployments/11/statuses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "state": "success", "target_url": "https://preview.example.com", "created_at": "2024-05-01T10:02:00Z" },
            { "state": "in_progress", "target_url": null, "created_at": "2024-05-01T10:01:00Z" }
        ])))
        .mount(&server)
        .await;

    let statuses = client(&server)
        .list_deployment_statuses(&repo(), 11)
        .await
        .unwrap();

    assert_eq!(statuses[0].state, DeploymentState::Success);
    assert_eq!(
        statuses[0].target_url.as_deref(),
        Some("https://preview.example.com")
    );
    assert_eq!(statuses[1].state, DeploymentState::InProgress);
}

#[tokio::test]
async fn fetches_pull_request_head() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/site/pulls/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "number": 7,
            "title": "Add feature",
            "head": { "sha": "deadbeef", "ref": "feature" }
        })))
        .mount(&server)
        .await;

    let pr = client(&server).get_pull_request(&repo(), 7).await.unwrap();

    assert_eq!(pr.number, 7);
    assert_eq!(pr.head.sha, "deadbeef");
}

#[tokio::test]
async fn error_status_carries_api_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Bad credentials" })),
        )
        .mount(&server)
        .await;

    let err = client(&server)
        .list_deployments(&repo(), "abc", None)
        .await
        .unwrap_err();

    match err {
        ApiError::Status { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Bad credentials");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = client(&server).list_deployment_statuses(&repo(), 1).await;

    assert!(result.is_err());
}
