//! Metrics sink capability
//!
//! Every worker gets a sink for its own instrumentation. The bootstrap
//! passes it through without interpreting it.

use metrics::counter;

pub trait MetricsSink: Send + Sync {
    /// Increment a named counter, tagged with the subscription it belongs to
    fn increment(&self, counter: &str, subscription: &str);
}

/// Sink backed by the process-wide `metrics` recorder
#[derive(Default)]
pub struct FacadeMetricsSink;

impl MetricsSink for FacadeMetricsSink {
    fn increment(&self, name: &str, subscription: &str) {
        counter!(
            name.to_string(),
            "subscription" => subscription.to_string()
        )
        .increment(1);
    }
}
