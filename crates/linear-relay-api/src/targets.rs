//! Target registry for routing-token resolution.
//!
//! This module provides [`TargetRegistry`] for associating routing tokens
//! (the `{webhook_target}` URL segment) with their downstream destination
//! URLs. The registry is built once at startup from `WEBHOOK_*` environment
//! entries and used read-only during request handling.
//!
//! # Environment contract
//!
//! ```text
//! WEBHOOK_<UPPERCASED_TOKEN> = <destination URL>
//! ```
//!
//! For example, `WEBHOOK_GENERAL=https://chat.example/hook` makes
//! `POST /linear/general` (any casing) forward to `https://chat.example/hook`.

use std::collections::HashMap;
use tracing::warn;
use url::Url;

/// Environment-variable namespace for webhook targets
pub const TARGET_ENV_PREFIX: &str = "WEBHOOK_";

/// Registry mapping routing tokens to downstream destination URLs.
///
/// Tokens are opaque lookup keys, compared case-insensitively and never
/// interpreted. Resolution is a pure read of the immutable map; the registry
/// is an explicit value handed to the request state rather than an ad-hoc
/// environment read, so tests can inject their own.
///
/// # Examples
///
/// ```rust
/// use linear_relay_api::targets::TargetRegistry;
/// use url::Url;
///
/// let mut registry = TargetRegistry::new();
/// registry.register("general", Url::parse("https://chat.example/hook").unwrap());
///
/// assert!(registry.resolve("GENERAL").is_some()); // case-insensitive
/// assert!(registry.resolve("unknownzone").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TargetRegistry {
    targets: HashMap<String, Url>,
}

impl TargetRegistry {
    /// Create a new, empty registry.
    pub fn new() -> Self {
        Self {
            targets: HashMap::new(),
        }
    }

    /// Build the registry from `WEBHOOK_*` process environment entries.
    ///
    /// Entries whose value does not parse as a URL are skipped with a
    /// warning rather than failing startup: one broken target should not
    /// take down the others.
    pub fn from_env() -> Self {
        let mut registry = Self::new();

        for (key, value) in std::env::vars() {
            let Some(name) = key.strip_prefix(TARGET_ENV_PREFIX) else {
                continue;
            };
            if name.is_empty() {
                continue;
            }

            match Url::parse(&value) {
                Ok(destination) => {
                    registry.register(name, destination);
                }
                Err(e) => {
                    warn!(
                        target = %name,
                        error = %e,
                        "Skipping webhook target with invalid destination URL"
                    );
                }
            }
        }

        registry
    }

    /// Register a target under a routing token.
    ///
    /// The token is case-folded on the way in; registering the same token
    /// twice (in any casing) replaces the earlier destination. Returns
    /// `&mut Self` to allow method chaining.
    pub fn register(&mut self, token: impl AsRef<str>, destination: Url) -> &mut Self {
        self.targets
            .insert(token.as_ref().to_ascii_uppercase(), destination);
        self
    }

    /// Resolve a routing token to its destination URL.
    ///
    /// Case-insensitive; returns `None` when no destination is configured
    /// under the token. Pure and side-effect-free.
    pub fn resolve(&self, token: &str) -> Option<&Url> {
        self.targets.get(&token.to_ascii_uppercase())
    }

    /// Number of configured targets.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Whether no targets are configured.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Sorted target names, for startup logging.
    ///
    /// Names only: destination URLs routinely embed webhook secrets and
    /// must never be logged.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.targets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
#[path = "targets_tests.rs"]
mod tests;
