//! Agent HTTP API integration tests
//!
//! Each test binds a real server on an ephemeral port and drives it with the
//! typed client, so validation, engine, and wire handling are exercised
//! together.

use std::sync::Arc;
use std::time::Duration;

use relay_agent::api::{self, AppState};
use relay_agent::engine::ExecutionEngine;
use relay_agent::metrics::AgentMetrics;
use relay_client::{AgentClient, ClientError};
use relay_core::dto::execute::ExecuteRequest;

/// Bind an agent on an ephemeral port and return its base URL
async fn start_agent() -> String {
    let state = AppState {
        engine: Arc::new(ExecutionEngine::new(65536)),
        metrics: AgentMetrics::new().unwrap(),
        max_timeout_secs: 300,
    };
    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn request(command: &str, timeout_secs: u64) -> ExecuteRequest {
    ExecuteRequest {
        command: command.to_string(),
        timeout_secs,
    }
}

#[tokio::test]
async fn test_execute_returns_captured_output() {
    let client = AgentClient::new(start_agent().await);

    let result = client
        .execute(&request("echo hi", 30), Duration::from_secs(35))
        .await
        .unwrap();

    assert_eq!(result.exit_code, 0);
    assert_eq!(result.stdout, "hi\n");
    assert_eq!(result.stderr, "");
    assert!(!result.timed_out);
}

#[tokio::test]
async fn test_nonzero_exit_is_still_a_structured_result() {
    let client = AgentClient::new(start_agent().await);

    let result = client
        .execute(&request("echo bad 1>&2; exit 7", 30), Duration::from_secs(35))
        .await
        .unwrap();

    assert_eq!(result.exit_code, 7);
    assert_eq!(result.stderr, "bad\n");
    assert!(!result.timed_out);
}

#[tokio::test]
async fn test_empty_command_is_rejected_before_execution() {
    let client = AgentClient::new(start_agent().await);

    let err = client
        .execute(&request("   ", 30), Duration::from_secs(35))
        .await
        .unwrap_err();

    assert!(err.is_invalid_request());
    assert!(matches!(err, ClientError::Api { status: 400, .. }));
}

#[tokio::test]
async fn test_timeout_out_of_range_is_rejected() {
    let client = AgentClient::new(start_agent().await);

    let err = client
        .execute(&request("echo hi", 0), Duration::from_secs(5))
        .await
        .unwrap_err();
    assert!(err.is_invalid_request());

    let err = client
        .execute(&request("echo hi", 301), Duration::from_secs(5))
        .await
        .unwrap_err();
    assert!(err.is_invalid_request());
}

#[tokio::test]
async fn test_deadline_kill_reports_timed_out() {
    let client = AgentClient::new(start_agent().await);

    let result = client
        .execute(&request("sleep 30", 1), Duration::from_secs(6))
        .await
        .unwrap();

    assert!(result.timed_out);
    assert_eq!(result.exit_code, -1);
    assert_eq!(result.runtime_ms, 1000);
}

#[tokio::test]
async fn test_health_endpoint() {
    let client = AgentClient::new(start_agent().await);
    client.health().await.unwrap();
}

#[tokio::test]
async fn test_metrics_reflect_executions() {
    let base_url = start_agent().await;
    let client = AgentClient::new(&base_url);

    client
        .execute(&request("true", 30), Duration::from_secs(35))
        .await
        .unwrap();
    client
        .execute(&request("false", 30), Duration::from_secs(35))
        .await
        .unwrap();

    let text = reqwest::get(format!("{}/metrics", base_url))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(text.contains("relay_executions_total 2"));
    assert!(text.contains("relay_executions_success_total 1"));
    assert!(text.contains("relay_executions_failed_total 1"));
}
