//! # Notification Message Wire Model
//!
//! The outbound payload posted to the downstream chat webhook. Field names,
//! nesting, and value types are a wire contract with the downstream consumer
//! and must serialize exactly as written here: renaming a field or changing
//! a value type silently breaks message rendering on the receiving side.

use crate::Timestamp;
use serde::{Deserialize, Serialize};

// ============================================================================
// Fixed display constants
// ============================================================================

/// Accent color for issue-created embeds
pub const ISSUE_ACCENT_COLOR: u32 = 0x4752B2;

/// Accent color for comment-created embeds
pub const COMMENT_ACCENT_COLOR: u32 = 0x2ECC71;

/// Footer text shown under every relayed embed
pub const FOOTER_TEXT: &str = "Linear App";

/// Footer icon shown under every relayed embed
pub const FOOTER_ICON_URL: &str =
    "https://pbs.twimg.com/profile_images/1121592030449168385/MF6whgy1_400x400.png";

// ============================================================================
// Wire types
// ============================================================================

/// Complete outbound notification: an ordered sequence of embed blocks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationMessage {
    pub embeds: Vec<Embed>,
}

impl NotificationMessage {
    /// Wrap a single embed; the relay only ever produces one per event
    pub fn single(embed: Embed) -> Self {
        Self {
            embeds: vec![embed],
        }
    }
}

/// A structured rich-message block in the downstream chat payload format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Embed {
    pub color: u32,
    pub author: EmbedAuthor,
    pub title: String,
    pub url: String,
    pub fields: Vec<EmbedField>,
    pub timestamp: Timestamp,
    pub footer: EmbedFooter,
}

/// Author line rendered above the embed title
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedAuthor {
    pub name: String,
}

/// A single named field inside an embed
///
/// `value` is deliberately an untyped [`serde_json::Value`]: the downstream
/// format carries strings for most fields but plain numbers for point
/// estimates, and both must round-trip unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: serde_json::Value,
    pub inline: bool,
}

impl EmbedField {
    /// Field with a text value
    pub fn text(name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        Self {
            name: name.into(),
            value: serde_json::Value::String(value.into()),
            inline,
        }
    }

    /// Field with a numeric value
    pub fn number(name: impl Into<String>, value: f64, inline: bool) -> Self {
        let value = serde_json::Number::from_f64(value)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null);
        Self {
            name: name.into(),
            value,
            inline,
        }
    }
}

/// Footer block rendered below the embed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedFooter {
    pub text: String,
    pub icon_url: String,
}

impl EmbedFooter {
    /// The fixed relay footer
    pub fn standard() -> Self {
        Self {
            text: FOOTER_TEXT.to_string(),
            icon_url: FOOTER_ICON_URL.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "notification_tests.rs"]
mod tests;
