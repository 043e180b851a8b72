//! Common test utilities for linear-relay-api integration tests
//!
//! This module provides:
//! - App-state builders wired with a real outbound HTTP sender
//! - Request builders for the relay endpoint
//! - Inbound payload fixtures

use axum::body::Body;
use axum::http::Request;
use linear_relay_api::{
    AppState, DeliveryConfig, HttpNotificationSender, ServiceConfig, ServiceMetrics,
    TargetRegistry,
};
use std::sync::Arc;
use url::Url;

/// Create an AppState around the given registry, using the real HTTP sender.
///
/// Tests point registry entries at a `wiremock::MockServer` so outbound
/// traffic can be asserted on exactly.
#[allow(dead_code)]
pub fn create_app_state(targets: TargetRegistry) -> AppState {
    let sender = HttpNotificationSender::new(&DeliveryConfig::default())
        .expect("Failed to build outbound HTTP client for tests");

    AppState::new(
        ServiceConfig::default(),
        Arc::new(targets),
        Arc::new(sender),
        Arc::new(ServiceMetrics::new().expect("Failed to build test metrics")),
    )
}

/// Create an AppState with a single target registered under `token`.
#[allow(dead_code)]
pub fn create_app_state_with_target(token: &str, destination: &str) -> AppState {
    let mut targets = TargetRegistry::new();
    targets.register(
        token,
        Url::parse(destination).expect("test destination must be a valid URL"),
    );
    create_app_state(targets)
}

/// Build a POST to the relay endpoint with a JSON body.
#[allow(dead_code)]
pub fn post_relay(target: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/linear/{target}"))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// The issue-create payload from the upstream compatibility scenario.
#[allow(dead_code)]
pub fn issue_create_body() -> serde_json::Value {
    serde_json::json!({
        "action": "create",
        "type": "Issue",
        "url": "https://x/y/z/a/b/ISSUE-42",
        "data": {
            "title": "Bug",
            "priority": 2,
            "labels": [{"name": "bug"}, {"name": "urgent"}]
        }
    })
}

/// A comment-create payload with all required nested fields present.
#[allow(dead_code)]
pub fn comment_create_body() -> serde_json::Value {
    serde_json::json!({
        "action": "create",
        "type": "Comment",
        "url": "https://linear.app/team/issue/ISSUE-42#comment-abc123",
        "data": {
            "body": "Looks good to me",
            "user": {"name": "Alex"},
            "issue": {"title": "Bug"}
        }
    })
}
