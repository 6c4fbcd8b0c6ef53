use super::*;
use crate::config::Configuration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn context_for(server: &MockServer) -> TestContext {
    let properties = format!(
        "BASE_URL={}\nOWNER_USERNAME=octocat\nAUTH_TOKEN=ghp_valid\nREPO_NAME=hello-world\n",
        server.uri()
    );
    let configuration = Configuration::parse(&properties).unwrap();
    let config = HarnessConfig::from_configuration(&configuration).unwrap();
    TestContext::from_config(Arc::new(config)).expect("Failed to build context")
}

async fn mount_delete(server: &MockServer, repo: &str, status: u16, expected_calls: u64) {
    Mock::given(method("DELETE"))
        .and(path(format!("/repos/octocat/{repo}")))
        .and(header("authorization", "Bearer ghp_valid"))
        .respond_with(ResponseTemplate::new(status))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_teardown_deletes_recorded_repositories() {
    let mock_server = MockServer::start().await;
    mount_delete(&mock_server, "my-repo", 204, 1).await;
    mount_delete(&mock_server, "my-repo2", 204, 1).await;

    let ctx = context_for(&mock_server);
    ctx.record_created("my-repo");
    ctx.record_created("my-repo2");
    ctx.record_created("my-repo");

    let report = ctx.teardown().await;

    assert!(report.is_clean());
    assert_eq!(report.deleted, vec!["my-repo", "my-repo2"]);
    assert!(ctx.created().is_empty());
}

#[tokio::test]
async fn test_teardown_without_recorded_repositories_sends_nothing() {
    let mock_server = MockServer::start().await;
    let ctx = context_for(&mock_server);

    let report = ctx.teardown().await;

    assert_eq!(report, TeardownReport::default());
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_teardown_continues_after_failure() {
    let mock_server = MockServer::start().await;
    mount_delete(&mock_server, "first", 403, 1).await;
    mount_delete(&mock_server, "second", 204, 1).await;

    let ctx = context_for(&mock_server);
    ctx.record_created("first");
    ctx.record_created("second");

    let report = ctx.teardown().await;

    assert!(!report.is_clean());
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].repo, "first");
    assert!(report.failures[0].reason.contains("Expected status 204 but got 403"));
    assert_eq!(report.deleted, vec!["second"]);
}

#[tokio::test]
async fn test_forget_stops_tracking() {
    let mock_server = MockServer::start().await;
    let ctx = context_for(&mock_server);
    ctx.record_created("deleted-by-test");

    assert!(ctx.forget("deleted-by-test"));
    assert!(!ctx.forget("deleted-by-test"));
    assert!(ctx.teardown().await.deleted.is_empty());
}

#[tokio::test]
async fn test_run_with_teardown_keeps_body_error() {
    let mock_server = MockServer::start().await;
    mount_delete(&mock_server, "my-repo", 204, 1).await;
    let ctx = context_for(&mock_server);

    let body = async {
        ctx.record_created("my-repo");
        Err::<(), _>("assertion failed".to_string())
    };
    let (result, teardown) = run_with_teardown(&ctx, body).await;

    assert_eq!(result, Err("assertion failed".to_string()));
    assert_eq!(teardown.deleted, vec!["my-repo"]);
}

#[tokio::test]
async fn test_run_with_teardown_failure_does_not_mask_success() {
    let mock_server = MockServer::start().await;
    mount_delete(&mock_server, "my-repo", 500, 1).await;
    let ctx = context_for(&mock_server);

    let body = async {
        ctx.record_created("my-repo");
        Ok::<u32, String>(7)
    };
    let (result, teardown) = run_with_teardown(&ctx, body).await;

    assert_eq!(result, Ok(7));
    assert!(!teardown.is_clean());
}

#[tokio::test]
async fn test_run_with_teardown_cleans_up_before_resuming_panic() {
    let mock_server = MockServer::start().await;
    mount_delete(&mock_server, "my-repo", 204, 1).await;
    let ctx = context_for(&mock_server);

    let guarded = AssertUnwindSafe(run_with_teardown(&ctx, async {
        ctx.record_created("my-repo");
        panic!("assertion inside test body");
    }))
    .catch_unwind()
    .await;

    assert!(guarded.is_err());
    assert!(ctx.created().is_empty());
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}
