//! Fixed-capacity execution pool for subscription workers
//!
//! Capacity is chosen once at construction and never grows or shrinks.
//! Each submitted worker holds a dedicated slot for the lifetime of its
//! task, so a full pool rejects further submissions instead of queueing
//! them behind running workers.

use std::sync::Arc;
use telamon_sdk::{BootstrapError, Subscriber};
use tokio::sync::{watch, Semaphore};
use tracing::debug;

pub struct WorkerPool {
    slots: Arc<Semaphore>,
    capacity: usize,
}

impl WorkerPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Submit a worker, handing it a dedicated execution slot. Submission
    /// is fire-and-forget: the task runs until the shutdown signal fires
    /// and nothing joins it. Fails without queueing when every slot is
    /// taken or the pool has been closed.
    pub fn try_submit(
        &self,
        subscriber: Arc<dyn Subscriber>,
        shutdown: watch::Receiver<bool>,
    ) -> Result<(), BootstrapError> {
        let permit = self.slots.clone().try_acquire_owned().map_err(|_| {
            BootstrapError::SubmissionRejected {
                worker: subscriber.worker_name().to_string(),
            }
        })?;

        debug!(
            "Created worker for subscription: {}",
            subscriber.subscription().name
        );

        tokio::spawn(async move {
            let _permit = permit;
            subscriber.run(shutdown).await;
        });

        Ok(())
    }

    /// Close the pool to further submissions once bootstrap is done
    pub fn close(&self) {
        self.slots.close();
    }
}
