//! # Inbound Event Model
//!
//! Types describing the webhook payloads delivered by the issue-tracking
//! source. The envelope is deserialized eagerly; the `data` member stays an
//! untyped [`serde_json::Value`] until the dispatcher has matched
//! `(action, type)` and knows which variant to decode it as.

use serde::{Deserialize, Serialize};

/// A raw webhook notification as delivered by the event source.
///
/// `action` and `type` jointly select behavior. `url` is a canonical link to
/// the source entity; the transformers derive short display identifiers from
/// it. Events arriving without `url` or `data` are still well-formed: they
/// are simply ignorable shapes (a deletion notification, for example, carries
/// neither).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundEvent {
    /// What happened to the entity (`"create"`, `"update"`, `"remove"`, ...)
    pub action: String,

    /// Entity kind the event describes (`"Issue"`, `"Comment"`, ...)
    #[serde(rename = "type")]
    pub event_type: String,

    /// Canonical link to the source entity
    #[serde(default)]
    pub url: String,

    /// Variant payload; shape depends on `type`
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Payload variant carried by `type == "Issue"` events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueData {
    pub title: String,

    /// Priority bucket, 0 (none) through 4 (low); absent means unset
    pub priority: Option<u8>,

    /// Story-point estimate
    pub estimate: Option<f64>,

    /// Attached labels in source order
    #[serde(default)]
    pub labels: Vec<Label>,
}

/// A single label attached to an issue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
}

/// Payload variant carried by `type == "Comment"` events
///
/// `user` and `issue` are optional at the deserialization layer because the
/// source does not guarantee them; the comment transformer treats their
/// absence as a per-event failure rather than crashing on field access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentData {
    pub body: String,

    /// Comment author
    pub user: Option<Actor>,

    /// Issue the comment was left on
    pub issue: Option<IssueRef>,
}

/// The person who triggered an event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub name: String,
}

/// Reference to a parent issue embedded in a comment payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueRef {
    pub title: String,
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
