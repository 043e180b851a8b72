//! Tests for router wiring and the relay handler.

use super::*;
use axum::body::{to_bytes, Body};
use axum::http::Request;
use linear_relay_core::NotificationMessage;
use std::sync::Mutex;
use tower::ServiceExt; // For `oneshot`
use url::Url;

// ============================================================================
// Recording sender
// ============================================================================

/// Sender that records every message instead of performing I/O
#[derive(Default)]
struct RecordingSender {
    sent: Mutex<Vec<(Url, NotificationMessage)>>,
    fail_next: Mutex<bool>,
}

impl RecordingSender {
    fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    fn set_failing(&self) {
        *self.fail_next.lock().unwrap() = true;
    }
}

#[async_trait::async_trait]
impl NotificationSender for RecordingSender {
    async fn send(&self, target: &Url, message: &NotificationMessage) -> Result<(), DeliveryError> {
        if *self.fail_next.lock().unwrap() {
            return Err(DeliveryError::ErrorStatus { status: 500 });
        }
        self.sent
            .lock()
            .unwrap()
            .push((target.clone(), message.clone()));
        Ok(())
    }
}

// ============================================================================
// Fixtures
// ============================================================================

fn test_state(sender: Arc<RecordingSender>) -> AppState {
    let mut targets = TargetRegistry::new();
    targets.register("general", Url::parse("https://chat.example/hook").unwrap());

    AppState::new(
        ServiceConfig::default(),
        Arc::new(targets),
        sender,
        Arc::new(ServiceMetrics::new().unwrap()),
    )
}

fn issue_create_body() -> String {
    serde_json::json!({
        "action": "create",
        "type": "Issue",
        "url": "https://x/y/z/a/b/ISSUE-42",
        "data": {"title": "Bug", "priority": 2, "labels": [{"name": "bug"}, {"name": "urgent"}]}
    })
    .to_string()
}

fn relay_request(target: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/linear/{target}"))
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

// ============================================================================
// Router wiring
// ============================================================================

/// Verify that the health endpoint reports target count and version.
#[tokio::test]
async fn test_health_endpoint() {
    let sender = Arc::new(RecordingSender::default());
    let app = create_router(test_state(sender));

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let health: HealthResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.configured_targets, 1);
}

/// Verify that the metrics endpoint serves the text exposition.
#[tokio::test]
async fn test_metrics_endpoint() {
    let sender = Arc::new(RecordingSender::default());
    let app = create_router(test_state(sender));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("relay_events_received_total"));
}

/// Verify that unknown routes return 404.
#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let sender = Arc::new(RecordingSender::default());
    let app = create_router(test_state(sender));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/nonexistent")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Verify that GET requests to the relay path are rejected.
#[tokio::test]
async fn test_relay_endpoint_rejects_get() {
    let sender = Arc::new(RecordingSender::default());
    let app = create_router(test_state(sender));

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/linear/general")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// ============================================================================
// Relay handler behavior
// ============================================================================

/// Verify the happy path: recognized event, one send, 200 with empty body.
#[tokio::test]
async fn test_recognized_event_is_forwarded() {
    let sender = Arc::new(RecordingSender::default());
    let app = create_router(test_state(sender.clone()));

    let response = app
        .oneshot(relay_request("general", issue_create_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(bytes.is_empty());

    assert_eq!(sender.sent_count(), 1);
    let sent = sender.sent.lock().unwrap();
    let (target, message) = &sent[0];
    assert_eq!(target.as_str(), "https://chat.example/hook");
    assert_eq!(message.embeds[0].title, "Bug");
}

/// Verify that the routing token is resolved case-insensitively.
#[tokio::test]
async fn test_target_resolution_ignores_case() {
    let sender = Arc::new(RecordingSender::default());
    let app = create_router(test_state(sender.clone()));

    let response = app
        .oneshot(relay_request("GeNeRAL", issue_create_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(sender.sent_count(), 1);
}

/// Verify that an unknown target is rejected before any send.
#[tokio::test]
async fn test_unknown_target_rejected_without_send() {
    let sender = Arc::new(RecordingSender::default());
    let app = create_router(test_state(sender.clone()));

    let response = app
        .oneshot(relay_request("unknownzone", issue_create_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(
        body,
        serde_json::json!({"status": 400, "message": "Unknown webhook target."})
    );
    assert_eq!(sender.sent_count(), 0);
}

/// Verify that non-create actions are acknowledged without a send.
#[tokio::test]
async fn test_non_create_action_is_noop() {
    let sender = Arc::new(RecordingSender::default());
    let app = create_router(test_state(sender.clone()));

    let body = serde_json::json!({
        "action": "update",
        "type": "Issue",
        "url": "https://x/y/z/a/b/ISSUE-42",
        "data": {"title": "Bug"}
    })
    .to_string();

    let response = app.oneshot(relay_request("general", body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(sender.sent_count(), 0);
}

/// Verify that an unparseable body is a 400.
#[tokio::test]
async fn test_unparseable_body_is_bad_request() {
    let sender = Arc::new(RecordingSender::default());
    let app = create_router(test_state(sender.clone()));

    let response = app
        .oneshot(relay_request("general", "not json".to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(sender.sent_count(), 0);
}

/// Verify that a delivery failure still acknowledges the source with 200.
#[tokio::test]
async fn test_delivery_failure_still_returns_ok() {
    let sender = Arc::new(RecordingSender::default());
    sender.set_failing();
    let app = create_router(test_state(sender.clone()));

    let response = app
        .oneshot(relay_request("general", issue_create_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

/// Verify that a recognized event with an unusable payload is dropped
/// quietly: 200 to the source, nothing sent downstream.
#[tokio::test]
async fn test_unusable_payload_dropped_with_ok() {
    let sender = Arc::new(RecordingSender::default());
    let app = create_router(test_state(sender.clone()));

    let body = serde_json::json!({
        "action": "create",
        "type": "Comment",
        "url": "https://x/y#z",
        "data": {"body": "orphan comment"}
    })
    .to_string();

    let response = app.oneshot(relay_request("general", body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(sender.sent_count(), 0);
}

/// Verify the pipeline counters across a mixed sequence of requests.
#[tokio::test]
async fn test_metrics_track_outcomes() {
    let sender = Arc::new(RecordingSender::default());
    let state = test_state(sender.clone());
    let metrics = state.metrics.clone();

    let app = create_router(state);

    // One forwarded, one ignored, one unknown target.
    let _ = app
        .clone()
        .oneshot(relay_request("general", issue_create_body()))
        .await
        .unwrap();
    let ignored_body = serde_json::json!({
        "action": "create",
        "type": "Project",
        "url": "",
        "data": {}
    })
    .to_string();
    let _ = app
        .clone()
        .oneshot(relay_request("general", ignored_body))
        .await
        .unwrap();
    let _ = app
        .oneshot(relay_request("unknownzone", issue_create_body()))
        .await
        .unwrap();

    assert_eq!(metrics.events_received_total.get(), 3);
    assert_eq!(metrics.events_forwarded_total.get(), 1);
    assert_eq!(metrics.events_ignored_total.get(), 1);
    assert_eq!(metrics.unknown_target_total.get(), 1);
}
