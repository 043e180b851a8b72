//! # Event Dispatch
//!
//! Classifies inbound events by `(action, type)` and runs the matching
//! transformer. Event shapes the relay does not recognize produce an explicit
//! [`DispatchDecision::Ignored`] outcome rather than an error, since an ignored
//! event is a successful no-op from the source's perspective.

use crate::event::{CommentData, InboundEvent, IssueData};
use crate::notification::NotificationMessage;
use crate::transform::{self, TransformError};
use tracing::debug;

/// Outcome of classifying one inbound event
#[derive(Debug, Clone)]
pub enum DispatchDecision {
    /// The event matched a transformer; forward this message downstream
    Forward(NotificationMessage),

    /// The event shape is not one the relay handles
    Ignored(IgnoreReason),
}

impl DispatchDecision {
    /// Whether this decision carries a message to forward
    pub fn is_forward(&self) -> bool {
        matches!(self, Self::Forward(_))
    }
}

/// Why an event was ignored, for logs and metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The action was something other than `"create"`
    NonCreateAction,

    /// The entity type has no registered transformer
    UnrecognizedType,
}

impl IgnoreReason {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NonCreateAction => "non_create_action",
            Self::UnrecognizedType => "unrecognized_type",
        }
    }
}

/// Classify an inbound event and produce its notification message, if any.
///
/// Exactly one [`NotificationMessage`] is produced per recognized
/// create-action event; every other `(action, type)` combination yields
/// [`DispatchDecision::Ignored`]. The input is never mutated.
///
/// # Errors
///
/// Returns [`TransformError`] when the event matched a recognized shape but
/// its `data` member could not be decoded or was missing required fields.
/// Callers are expected to log the failure and drop the single event.
pub fn evaluate(event: &InboundEvent) -> Result<DispatchDecision, TransformError> {
    if event.action != "create" {
        debug!(
            action = %event.action,
            event_type = %event.event_type,
            "Ignoring non-create action"
        );
        return Ok(DispatchDecision::Ignored(IgnoreReason::NonCreateAction));
    }

    match event.event_type.as_str() {
        "Issue" => {
            let data: IssueData = serde_json::from_value(event.data.clone())?;
            Ok(DispatchDecision::Forward(transform::issue_created(
                &data, &event.url,
            )))
        }
        "Comment" => {
            let data: CommentData = serde_json::from_value(event.data.clone())?;
            Ok(DispatchDecision::Forward(transform::comment_created(
                &data, &event.url,
            )?))
        }
        other => {
            debug!(event_type = %other, "Ignoring unrecognized event type");
            Ok(DispatchDecision::Ignored(IgnoreReason::UnrecognizedType))
        }
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
