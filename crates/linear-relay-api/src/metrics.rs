//! Metrics collection and exposition for the relay service.

use prometheus::{Encoder, IntCounter, Registry, TextEncoder};

/// Service metrics for observability
///
/// Counters live on a dedicated [`Registry`] rather than the process-global
/// one so constructing a second instance (tests, restarts inside one
/// process) never collides on metric names.
#[derive(Debug)]
pub struct ServiceMetrics {
    registry: Registry,

    // Relay pipeline metrics
    pub events_received_total: IntCounter,
    pub events_forwarded_total: IntCounter,
    pub events_ignored_total: IntCounter,
    pub transform_failures_total: IntCounter,
    pub delivery_failures_total: IntCounter,
    pub unknown_target_total: IntCounter,
}

impl ServiceMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let events_received_total = IntCounter::new(
            "relay_events_received_total",
            "Total inbound webhook events received",
        )?;
        let events_forwarded_total = IntCounter::new(
            "relay_events_forwarded_total",
            "Events transformed and delivered downstream",
        )?;
        let events_ignored_total = IntCounter::new(
            "relay_events_ignored_total",
            "Events with no matching transformer (successful no-ops)",
        )?;
        let transform_failures_total = IntCounter::new(
            "relay_transform_failures_total",
            "Recognized events dropped because their payload was unusable",
        )?;
        let delivery_failures_total = IntCounter::new(
            "relay_delivery_failures_total",
            "Outbound sends that errored or returned non-2xx",
        )?;
        let unknown_target_total = IntCounter::new(
            "relay_unknown_target_total",
            "Requests rejected because the routing token resolved to nothing",
        )?;

        registry.register(Box::new(events_received_total.clone()))?;
        registry.register(Box::new(events_forwarded_total.clone()))?;
        registry.register(Box::new(events_ignored_total.clone()))?;
        registry.register(Box::new(transform_failures_total.clone()))?;
        registry.register(Box::new(delivery_failures_total.clone()))?;
        registry.register(Box::new(unknown_target_total.clone()))?;

        Ok(Self {
            registry,
            events_received_total,
            events_forwarded_total,
            events_ignored_total,
            transform_failures_total,
            delivery_failures_total,
            unknown_target_total,
        })
    }

    /// Render all counters in Prometheus text exposition format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

#[cfg(test)]
#[path = "metrics_tests.rs"]
mod tests;
