mod common;

use common::{test_config, InMemoryStories, TestApp, UNREACHABLE_URI};
use reqwest::Client;
use stories_service::services::{init_metrics, DatabaseGate};

#[tokio::test]
async fn health_check_works() {
    let app = TestApp::spawn_with_store(InMemoryStories::new(vec![])).await;
    let client = Client::new();

    let response = client
        .get(&format!("{}/health", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "stories-service");
    assert_eq!(body["database"], "up");
}

#[tokio::test]
async fn health_check_reports_closed_gate() {
    let app = TestApp::spawn_with_gate(DatabaseGate::closed()).await;
    let client = Client::new();

    let response = client
        .get(&format!("{}/health", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 503);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["database"], "down");
}

#[tokio::test]
async fn readiness_check_works() {
    let app = TestApp::spawn_with_store(InMemoryStories::new(vec![])).await;
    let client = Client::new();

    let response = client
        .get(&format!("{}/ready", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
}

#[tokio::test]
async fn readiness_fails_when_ping_fails() {
    let app = TestApp::spawn_with_store(InMemoryStories::failing()).await;
    let client = Client::new();

    let response = client
        .get(&format!("{}/ready", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 503);
}

#[tokio::test]
async fn failed_bootstrap_serves_in_degraded_mode() {
    let config = test_config(UNREACHABLE_URI, "stories_test");
    let app = TestApp::spawn(config)
        .await
        .expect("Startup should survive a failed bootstrap");
    let client = Client::new();

    assert!(!app.gate.is_open());

    let greeting = client
        .get(&format!("{}/api", app.address))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(greeting.status().as_u16(), 200);

    let stories = client
        .get(&format!("{}/api/stories", app.address))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(stories.status().as_u16(), 503);

    let ready = client
        .get(&format!("{}/ready", app.address))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(ready.status().as_u16(), 503);
}

#[tokio::test]
async fn fail_fast_aborts_startup() {
    let mut config = test_config(UNREACHABLE_URI, "stories_test");
    config.mongodb.fail_fast = true;

    assert!(TestApp::spawn(config).await.is_err());
}

#[tokio::test]
async fn metrics_endpoint_returns_prometheus_format() {
    init_metrics().expect("Failed to install metrics recorder");
    let app = TestApp::spawn_with_store(InMemoryStories::new(vec![])).await;
    let client = Client::new();

    // Record at least one request
    client
        .get(&format!("{}/api/stories", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    let response = client
        .get(&format!("{}/metrics", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());

    let content_type = response
        .headers()
        .get("content-type")
        .expect("Missing content-type header")
        .to_str()
        .expect("Invalid content-type");
    assert!(content_type.starts_with("text/plain"));

    let body = response.text().await.expect("Failed to get response body");
    assert!(
        body.contains("http_requests_total"),
        "Unexpected metrics format: {}",
        body
    );
}
