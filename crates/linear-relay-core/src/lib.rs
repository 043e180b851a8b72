//! # Linear-Relay Core
//!
//! Core business logic for the Linear-Relay webhook forwarding service.
//!
//! This crate contains the domain logic for classifying inbound issue-tracking
//! events, deriving display values from their fields, and transforming
//! recognized events into the chat-notification messages the downstream
//! consumer expects.
//!
//! ## Architecture
//!
//! The core is pure: it performs no I/O and holds no connection state.
//! Everything HTTP-shaped (the ingestion endpoint, target resolution against
//! the environment, outbound delivery) lives in `linear-relay-api` and is
//! injected at runtime.
//!
//! ## Usage
//!
//! ```rust
//! use linear_relay_core::{dispatch, event::InboundEvent};
//!
//! let event: InboundEvent = serde_json::from_str(
//!     r#"{"action":"update","type":"Issue","url":"","data":{}}"#,
//! ).unwrap();
//!
//! // Non-create actions are ignored, not errors.
//! let decision = dispatch::evaluate(&event).unwrap();
//! assert!(!decision.is_forward());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// Re-export commonly used types
pub use uuid::Uuid;

// ============================================================================
// Time and Metadata Types
// ============================================================================

/// UTC timestamp attached to outbound notification messages
///
/// Serializes transparently as an RFC3339 string, which is what the
/// downstream chat consumer expects for the embed `timestamp` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create timestamp for current moment
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Convert to RFC3339 string
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339()
    }

    /// Get underlying DateTime
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

/// Identifier for tracing a single inbound request through the relay
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CorrelationId(Uuid);

impl CorrelationId {
    /// Generate new correlation ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get string representation
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Module declarations
// ============================================================================

/// Inbound event model for the issue-tracking webhook payloads
pub mod event;

/// Outbound notification message wire model
pub mod notification;

/// Field extractors and per-event-type payload transformers
pub mod transform;

/// Event classification and dispatch decisions
pub mod dispatch;

// Re-export key types for convenience
pub use dispatch::{DispatchDecision, IgnoreReason};
pub use event::{Actor, CommentData, InboundEvent, IssueData, IssueRef, Label};
pub use notification::{Embed, EmbedAuthor, EmbedField, EmbedFooter, NotificationMessage};
pub use transform::TransformError;

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
