//! # Payload Transformers
//!
//! Pure mappings from a validated event payload to the notification message
//! posted downstream, one transformer per recognized event type, plus the
//! field extractors they share. Apart from stamping the current time on the
//! embed, transformation is a pure function of its inputs.

use crate::event::{CommentData, IssueData, Label};
use crate::notification::{
    Embed, EmbedAuthor, EmbedField, EmbedFooter, NotificationMessage, COMMENT_ACCENT_COLOR,
    ISSUE_ACCENT_COLOR,
};
use crate::Timestamp;

// ============================================================================
// Error Types
// ============================================================================

/// Failure to transform a single event into a notification message
///
/// These are per-event failures: the relay logs them and drops the event
/// without penalizing the source, since the source is not responsible for
/// what the relay needs downstream.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// A nested field the transformer requires was absent from the payload
    #[error("Required field missing from payload: {field}")]
    MissingField { field: &'static str },

    /// The `data` member did not decode as the variant the event type implies
    #[error("Payload does not match event type: {0}")]
    InvalidPayload(#[from] serde_json::Error),
}

// ============================================================================
// Field Extractors
// ============================================================================

/// Map a priority bucket to its display label.
///
/// An absent priority is treated as 0 (`"None"`). Values above the defined
/// range clamp to the lowest defined priority rather than failing the event.
pub fn priority_label(priority: Option<u8>) -> &'static str {
    match priority.unwrap_or(0) {
        0 => "None",
        1 => "Urgent",
        2 => "High",
        3 => "Medium",
        // 4 is the lowest defined bucket; anything above clamps to it.
        _ => "Low",
    }
}

/// Extract the short entity identifier from a canonical entity URL.
///
/// The identifier is the 6th `/`-delimited segment (0-indexed position 5),
/// e.g. `ISSUE-42` in `https://linear.app/team/issue/ISSUE-42/title`; note
/// the two leading segments produced by the `https://` scheme separator.
/// Returns `None` when the URL has too few segments to carry one.
pub fn short_entity_id(url: &str) -> Option<&str> {
    url.split('/').nth(5).filter(|segment| !segment.is_empty())
}

/// Extract the fragment identifier (the substring after the first `#`).
///
/// Comment URLs anchor the comment with a fragment; a URL without one yields
/// `None`.
pub fn fragment_id(url: &str) -> Option<&str> {
    url.split_once('#')
        .map(|(_, fragment)| fragment)
        .filter(|fragment| !fragment.is_empty())
}

/// Join label names with `", "` in their original order.
pub fn join_label_names(labels: &[Label]) -> String {
    labels
        .iter()
        .map(|label| label.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// Transformers
// ============================================================================

/// Build the notification for an issue-created event.
///
/// Always emits a `Priority` field (absent priority renders as `"None"`), a
/// `Points` field only when an estimate is present, and a `Labels` field only
/// when at least one label is attached.
pub fn issue_created(data: &IssueData, url: &str) -> NotificationMessage {
    let mut fields = vec![EmbedField::text(
        "Priority",
        priority_label(data.priority),
        true,
    )];

    if let Some(estimate) = data.estimate {
        fields.push(EmbedField::number("Points", estimate, true));
    }

    if !data.labels.is_empty() {
        fields.push(EmbedField::text(
            "Labels",
            join_label_names(&data.labels),
            false,
        ));
    }

    NotificationMessage::single(Embed {
        color: ISSUE_ACCENT_COLOR,
        author: EmbedAuthor {
            name: author_label("Issue Created", short_entity_id(url)),
        },
        title: data.title.clone(),
        url: url.to_string(),
        fields,
        timestamp: Timestamp::now(),
        footer: EmbedFooter::standard(),
    })
}

/// Build the notification for a comment-created event.
///
/// # Errors
///
/// Returns [`TransformError::MissingField`] when `user` or `issue` is absent
/// from the payload; both are required to render the message.
pub fn comment_created(
    data: &CommentData,
    url: &str,
) -> Result<NotificationMessage, TransformError> {
    let user = data
        .user
        .as_ref()
        .ok_or(TransformError::MissingField { field: "user" })?;
    let issue = data
        .issue
        .as_ref()
        .ok_or(TransformError::MissingField { field: "issue" })?;

    let fields = vec![
        EmbedField::text("Content", data.body.clone(), false),
        EmbedField::text("Issue", issue.title.clone(), false),
    ];

    Ok(NotificationMessage::single(Embed {
        color: COMMENT_ACCENT_COLOR,
        author: EmbedAuthor {
            name: author_label("Comment Created", fragment_id(url)),
        },
        title: format!("Comment by {}", user.name),
        url: url.to_string(),
        fields,
        timestamp: Timestamp::now(),
        footer: EmbedFooter::standard(),
    }))
}

/// Render the author line, omitting the bracketed id when none was derivable.
fn author_label(prefix: &str, id: Option<&str>) -> String {
    match id {
        Some(id) => format!("{prefix} [{id}]"),
        None => prefix.to_string(),
    }
}

#[cfg(test)]
#[path = "transform_tests.rs"]
mod tests;
