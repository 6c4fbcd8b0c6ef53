use super::*;
use serde_json::json;
use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::request::{REPO, USER_REPOS};

async fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(Url::parse(&server.uri()).unwrap()).expect("Failed to build client")
}

#[tokio::test]
async fn test_send_post_with_bearer_token_and_literal_body() {
    let mock_server = MockServer::start().await;
    let body = r#"{ "name": "my-repo", "description": "This is a test repository" }"#;

    Mock::given(method("POST"))
        .and(path("/user/repos"))
        .and(header("authorization", "Bearer ghp_valid"))
        .and(header("content-type", "application/json"))
        .and(header("accept", "application/vnd.github+json"))
        .and(body_string(body))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "name": "my-repo",
            "description": "This is a test repository"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    let request = ApiRequest::post(USER_REPOS)
        .bearer_token("ghp_valid")
        .body(body);

    let response = client.send(&request).await.expect("request should be sent");

    assert_eq!(response.status_code(), 201);
    assert_eq!(
        response.json_string("name").unwrap().as_deref(),
        Some("my-repo")
    );
}

#[tokio::test]
async fn test_send_without_token_omits_authorization_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/repos"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Requires authentication",
            "documentation_url": "https://docs.github.com/rest"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    let response = client
        .send(&ApiRequest::get(USER_REPOS))
        .await
        .expect("request should be sent");

    assert_eq!(response.status_code(), 401);

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
    assert!(requests[0].headers.get("user-agent").is_some());
}

#[tokio::test]
async fn test_send_substitutes_path_parameters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/repos/octocat/hello-world"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    let request = ApiRequest::delete(REPO)
        .path_param("owner", "octocat")
        .path_param("repo", "hello-world")
        .bearer_token("ghp_valid");

    let response = client.send(&request).await.unwrap();

    assert_eq!(response.status_code(), 204);
    assert!(response.body.is_none());
    assert!(response.raw_body.is_empty());
}

#[tokio::test]
async fn test_send_with_query_parameters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/repos"))
        .and(query_param("per_page", "100"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    let request = ApiRequest::get(USER_REPOS)
        .query("per_page", "100")
        .query("page", "3");

    let response = client.send(&request).await.unwrap();

    assert_eq!(response.body, Some(json!([])));
}

#[tokio::test]
async fn test_non_json_body_is_kept_raw() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/repos"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad gateway</html>"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    let response = client.send(&ApiRequest::get(USER_REPOS)).await.unwrap();

    assert_eq!(response.status_code(), 502);
    assert!(response.body.is_none());
    assert_eq!(response.raw_body, "<html>Bad gateway</html>");
}

#[tokio::test]
async fn test_unresolved_placeholder_is_not_sent() {
    let mock_server = MockServer::start().await;
    let client = client_for(&mock_server).await;

    let result = client
        .send(&ApiRequest::get(REPO).path_param("owner", "octocat"))
        .await;

    assert!(matches!(
        result,
        Err(HarnessError::UnresolvedPlaceholder { .. })
    ));
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    // Nothing listens on port 9 (discard) on the loopback interface in CI.
    let client = ApiClient::new(Url::parse("http://127.0.0.1:9").unwrap()).unwrap();

    let result = client.send(&ApiRequest::get(USER_REPOS)).await;

    match result {
        Err(HarnessError::Transport { method, url, .. }) => {
            assert_eq!(method, "GET");
            assert_eq!(url, "http://127.0.0.1:9/user/repos");
        }
        other => panic!("Expected Transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_invalid_header_is_rejected() {
    let mock_server = MockServer::start().await;
    let client = client_for(&mock_server).await;

    let result = client
        .send(&ApiRequest::get(USER_REPOS).header("bad header", "value"))
        .await;

    assert!(matches!(result, Err(HarnessError::InvalidHeader(name)) if name == "bad header"));
}
