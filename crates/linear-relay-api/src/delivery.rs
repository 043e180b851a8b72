//! Outbound delivery of notification messages.
//!
//! Sends transformed messages to the resolved downstream endpoint with a
//! bounded timeout. Delivery is fire-and-forget from the source's point of
//! view: failures are reported to the caller of [`NotificationSender::send`]
//! for logging and metrics, but no retry is attempted anywhere.

use crate::config::DeliveryConfig;
use async_trait::async_trait;
use linear_relay_core::NotificationMessage;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Failure to deliver a notification message downstream
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// The HTTP client could not be constructed at startup
    #[error("Failed to build HTTP client: {0}")]
    ClientConstruction(#[source] reqwest::Error),

    /// The request never produced a response (connect error, timeout, ...)
    #[error("Request to downstream endpoint failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The downstream endpoint answered outside the 2xx range
    #[error("Downstream endpoint returned status {status}")]
    ErrorStatus { status: u16 },
}

/// Interface for sending a notification message to a destination endpoint
///
/// Injected into the request state as a trait object so endpoint tests can
/// substitute a recording implementation and assert on exactly what would
/// have been sent.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// Deliver one message to one destination.
    ///
    /// Implementations must attempt exactly one send per call; retry policy
    /// is deliberately out of scope.
    async fn send(&self, target: &Url, message: &NotificationMessage) -> Result<(), DeliveryError>;
}

/// HTTP implementation of [`NotificationSender`] using reqwest
pub struct HttpNotificationSender {
    client: Client,
}

impl HttpNotificationSender {
    /// Build the sender with the configured timeout and user agent.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::ClientConstruction`] when the underlying TLS
    /// backend cannot be initialized.
    pub fn new(config: &DeliveryConfig) -> Result<Self, DeliveryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(&config.user_agent)
            .build()
            .map_err(DeliveryError::ClientConstruction)?;

        Ok(Self { client })
    }
}

#[async_trait]
impl NotificationSender for HttpNotificationSender {
    async fn send(&self, target: &Url, message: &NotificationMessage) -> Result<(), DeliveryError> {
        // `json()` serializes the message and sets
        // `content-type: application/json`.
        let response = self.client.post(target.clone()).json(message).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeliveryError::ErrorStatus {
                status: status.as_u16(),
            });
        }

        debug!(status = status.as_u16(), "Delivered notification downstream");
        Ok(())
    }
}

#[cfg(test)]
#[path = "delivery_tests.rs"]
mod tests;
