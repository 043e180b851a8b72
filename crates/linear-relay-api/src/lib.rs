//! # Linear-Relay HTTP API
//!
//! HTTP server library for receiving issue-tracking webhooks and relaying
//! them to configured downstream chat endpoints.
//!
//! This library provides:
//! - The ingestion endpoint (`POST /linear/{webhook_target}`)
//! - Target resolution against the immutable registry built at startup
//! - Outbound delivery of transformed notification messages
//! - Health and metrics endpoints
//!
//! The domain logic (classification and transformation) lives in
//! `linear-relay-core`; this crate wires it to the network on both sides.

// Public modules
pub mod config;
pub mod delivery;
pub mod errors;
pub mod metrics;
pub mod targets;

#[cfg(test)]
#[path = "lib_tests.rs"]
mod lib_tests;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use bytes::Bytes;
use linear_relay_core::{dispatch, CorrelationId, DispatchDecision, InboundEvent, Timestamp};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, instrument, warn};

pub use config::{DeliveryConfig, LoggingConfig, ServerConfig, ServiceConfig};
pub use delivery::{DeliveryError, HttpNotificationSender, NotificationSender};
pub use errors::{ConfigError, RelayHandlerError, ServiceError};
pub use metrics::ServiceMetrics;
pub use targets::TargetRegistry;

// ============================================================================
// Application State
// ============================================================================

/// Shared application state
///
/// Everything in here is established once at startup and read-only during
/// request handling; requests themselves share no mutable state.
#[derive(Clone)]
pub struct AppState {
    /// Configuration for the service
    pub config: ServiceConfig,

    /// Immutable routing-token → destination map
    pub targets: Arc<TargetRegistry>,

    /// Outbound notification sender
    pub sender: Arc<dyn NotificationSender>,

    /// Metrics collector for observability
    pub metrics: Arc<ServiceMetrics>,
}

impl AppState {
    /// Create new application state
    pub fn new(
        config: ServiceConfig,
        targets: Arc<TargetRegistry>,
        sender: Arc<dyn NotificationSender>,
        metrics: Arc<ServiceMetrics>,
    ) -> Self {
        Self {
            config,
            targets,
            sender,
            metrics,
        }
    }
}

// ============================================================================
// HTTP Server
// ============================================================================

/// Create HTTP router with all endpoints
pub fn create_router(state: AppState) -> Router {
    let relay_routes = Router::new().route("/linear/{webhook_target}", post(handle_relay));

    let health_routes = Router::new().route("/health", get(handle_health_check));

    let observability_routes = Router::new().route("/metrics", get(metrics_endpoint));

    Router::new()
        .merge(relay_routes)
        .merge(health_routes)
        .merge(observability_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start HTTP server
///
/// Builds the application state, binds the configured listener, and serves
/// until SIGINT/SIGTERM triggers a graceful shutdown.
pub async fn start_server(
    config: ServiceConfig,
    targets: TargetRegistry,
    sender: Arc<dyn NotificationSender>,
) -> Result<(), ServiceError> {
    let metrics = Arc::new(ServiceMetrics::new().map_err(|e| {
        ServiceError::Configuration(ConfigError::Invalid {
            message: format!("Failed to initialize metrics: {}", e),
        })
    })?);

    let state = AppState::new(config.clone(), Arc::new(targets), sender, metrics);
    let app = create_router(state);

    let host = config
        .server
        .host
        .parse::<std::net::IpAddr>()
        .map_err(|e| ServiceError::BindFailed {
            address: config.server.host.clone(),
            message: e.to_string(),
        })?;
    let addr = SocketAddr::from((host, config.server.port));

    let listener =
        tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServiceError::BindFailed {
                address: addr.to_string(),
                message: e.to_string(),
            })?;

    info!("Starting HTTP server on {}", addr);

    let shutdown_timeout = std::time::Duration::from_secs(config.server.shutdown_timeout_seconds);

    let shutdown_signal = async move {
        let ctrl_c = async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to install Ctrl+C signal handler");
        };

        #[cfg(unix)]
        let terminate = async {
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("Failed to install SIGTERM signal handler")
                .recv()
                .await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                info!("Received SIGINT (Ctrl+C), initiating graceful shutdown with {}s timeout", shutdown_timeout.as_secs());
            },
            _ = terminate => {
                info!("Received SIGTERM, initiating graceful shutdown with {}s timeout", shutdown_timeout.as_secs());
            },
        }
    };

    // In-flight requests are allowed to finish; new connections are refused
    // as soon as the shutdown signal arrives.
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(|e| ServiceError::ServerFailed {
            message: e.to_string(),
        })?;

    info!("HTTP server shutdown complete");
    Ok(())
}

// ============================================================================
// Relay Handler
// ============================================================================

/// Handle an inbound webhook event for a named target.
///
/// The pipeline, in order:
/// 1. Resolve the routing token against the target registry. An unknown
///    target short-circuits with `400`: no payload inspection, no outbound
///    call.
/// 2. Parse the body as an event envelope; an unparseable body is `400`.
/// 3. Classify the event. Shapes the relay does not recognize are a
///    successful no-op (`200`, nothing sent). Recognized shapes with broken
///    payloads are logged, counted, and dropped, still `200`, because the
///    source is not responsible for downstream requirements.
/// 4. Forward the transformed message and await the send. Delivery failures
///    are logged and counted but never surfaced to the source; there is no
///    retry.
#[instrument(skip(state, body), fields(target = %webhook_target))]
pub async fn handle_relay(
    State(state): State<AppState>,
    Path(webhook_target): Path<String>,
    body: Bytes,
) -> Result<StatusCode, RelayHandlerError> {
    let correlation_id = CorrelationId::new();
    state.metrics.events_received_total.inc();

    let Some(target) = state.targets.resolve(&webhook_target) else {
        state.metrics.unknown_target_total.inc();
        warn!(%correlation_id, "Unknown webhook target");
        return Err(RelayHandlerError::UnknownTarget {
            target: webhook_target,
        });
    };

    let event: InboundEvent =
        serde_json::from_slice(&body).map_err(|e| RelayHandlerError::MalformedRequest {
            message: e.to_string(),
        })?;

    match dispatch::evaluate(&event) {
        Ok(DispatchDecision::Forward(message)) => match state.sender.send(target, &message).await {
            Ok(()) => {
                state.metrics.events_forwarded_total.inc();
                info!(
                    %correlation_id,
                    action = %event.action,
                    event_type = %event.event_type,
                    "Relayed event to downstream endpoint"
                );
            }
            Err(e) => {
                // The source still gets 200; delivery failures are an
                // operator concern, not the source's.
                state.metrics.delivery_failures_total.inc();
                warn!(%correlation_id, error = %e, "Downstream delivery failed; event dropped");
            }
        },
        Ok(DispatchDecision::Ignored(reason)) => {
            state.metrics.events_ignored_total.inc();
            debug!(
                %correlation_id,
                action = %event.action,
                event_type = %event.event_type,
                reason = reason.as_str(),
                "Ignoring unhandled event shape"
            );
        }
        Err(e) => {
            state.metrics.transform_failures_total.inc();
            warn!(
                %correlation_id,
                action = %event.action,
                event_type = %event.event_type,
                error = %e,
                "Dropping event with unusable payload"
            );
        }
    }

    Ok(StatusCode::OK)
}

// ============================================================================
// Health Check Handler
// ============================================================================

/// Health check response payload
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: Timestamp,
    pub version: String,
    pub configured_targets: usize,
}

/// Basic health check endpoint
///
/// The relay is stateless, so health reduces to "the process is serving";
/// the configured-target count is included as a cheap misconfiguration
/// signal for operators.
#[instrument(skip(state))]
async fn handle_health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Timestamp::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        configured_targets: state.targets.len(),
    })
}

// ============================================================================
// Observability Handlers
// ============================================================================

/// Prometheus metrics endpoint
#[instrument(skip_all)]
async fn metrics_endpoint(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .encode()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}
