//! Subscriber contract - a runnable unit of work with a stable name
//!
//! A subscriber owns everything it needs to poll one subscription and runs
//! until the process-wide shutdown signal fires. The bootstrap only ever
//! observes construction and submission; it never joins a running worker.

use crate::config::SubscriptionConfig;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::{Arc, RwLock};
use tokio::sync::watch;

/// Worker lifecycle. `Created` is set at construction, `Running` when the
/// execution pool invokes the worker, and the terminal states when the run
/// loop exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SubscriberStatus {
    Created,
    Running,
    Terminated,
    Failed,
}

/// Shared status holder - written by the worker task, read by anyone
/// holding the handle
#[derive(Debug)]
pub struct StatusCell(RwLock<SubscriberStatus>);

impl StatusCell {
    pub fn new() -> Self {
        Self(RwLock::new(SubscriberStatus::Created))
    }

    pub fn get(&self) -> SubscriberStatus {
        *self.0.read().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set(&self, status: SubscriberStatus) {
        *self.0.write().unwrap_or_else(|e| e.into_inner()) = status;
    }
}

impl Default for StatusCell {
    fn default() -> Self {
        Self::new()
    }
}

/// Generic subscriber trait
#[async_trait]
pub trait Subscriber: Send + Sync {
    /// Stable worker name, derived from the subscription name
    fn worker_name(&self) -> &str;

    /// The subscription this worker polls
    fn subscription(&self) -> &SubscriptionConfig;

    /// Current lifecycle status
    fn status(&self) -> SubscriberStatus;

    /// Run the receive loop until `shutdown` goes true
    async fn run(self: Arc<Self>, shutdown: watch::Receiver<bool>);
}
