//! SQS subscription worker
//!
//! Owns one subscription's SNS and SQS clients for the process lifetime.
//! On startup it creates the queue, subscribes it to the topic, then polls
//! for messages until the process-wide shutdown signal fires. Every
//! received message goes to the injected handler; only handled messages
//! are acknowledged.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use aws_sdk_sqs::types::Message;
use chrono::{DateTime, Utc};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use telamon_sdk::config::SubscriptionConfig;
use telamon_sdk::{
    Arn, MessageDescription, MessageHandler, MetricsSink, StatusCell, Subscriber, SubscriberStatus,
};
use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::client_factory::SubscriptionClients;

/// Seconds SQS holds a receive open when the queue is empty
const WAIT_TIME_SECONDS: i32 = 20;
const MAX_MESSAGES_PER_RECEIVE: i32 = 10;

/// Base delay between failed queue operations, scaled by attempt
const RETRY_DELAY: Duration = Duration::from_secs(5);
const RETRY_JITTER_MS: u64 = 1000;

/// Setup attempts before the worker gives up entirely
const MAX_SETUP_ATTEMPTS: u32 = 5;

pub struct SqsSubscriber {
    worker_name: String,
    subscription: SubscriptionConfig,
    topic_arn: Arn,
    queue_arn: Arn,
    sns: aws_sdk_sns::Client,
    sqs: aws_sdk_sqs::Client,
    handler: Arc<dyn MessageHandler>,
    metrics: Arc<dyn MetricsSink>,
    status: StatusCell,
    created_at: DateTime<Utc>,
}

impl SqsSubscriber {
    pub fn new(
        subscription: SubscriptionConfig,
        clients: SubscriptionClients,
        handler: Arc<dyn MessageHandler>,
        metrics: Arc<dyn MetricsSink>,
    ) -> Self {
        Self {
            worker_name: format!("sqs-subscriber/{}", subscription.name),
            subscription,
            topic_arn: clients.topic_arn,
            queue_arn: clients.queue_arn,
            sns: clients.sns,
            sqs: clients.sqs,
            handler,
            metrics,
            status: StatusCell::new(),
            created_at: Utc::now(),
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Create the queue (idempotent) and subscribe it to the topic,
    /// retrying with backoff. `None` means the worker gave up.
    async fn initialize_queue(&self) -> Option<String> {
        for attempt in 1..=MAX_SETUP_ATTEMPTS {
            match self.ensure_queue().await {
                Ok(queue_url) => return Some(queue_url),
                Err(e) => {
                    warn!(
                        "{} setup attempt {attempt}/{MAX_SETUP_ATTEMPTS} failed: {e}",
                        self.worker_name
                    );
                    self.metrics
                        .increment("pubsub.amazon.setup.failures", &self.subscription.name);
                    sleep(RETRY_DELAY * attempt + jitter()).await;
                }
            }
        }

        error!("{} could not initialise its queue, giving up", self.worker_name);
        None
    }

    async fn ensure_queue(&self) -> Result<String> {
        let created = self
            .sqs
            .create_queue()
            .queue_name(&self.queue_arn.resource)
            .send()
            .await?;
        let queue_url = created
            .queue_url()
            .ok_or_else(|| anyhow!("no queue URL returned for '{}'", self.queue_arn.resource))?
            .to_string();

        self.sns
            .subscribe()
            .topic_arn(self.topic_arn.to_string())
            .protocol("sqs")
            .endpoint(self.queue_arn.to_string())
            .send()
            .await?;

        Ok(queue_url)
    }

    /// One receive round: a long poll followed by per-message dispatch
    async fn poll_once(&self, queue_url: &str) {
        let received = self
            .sqs
            .receive_message()
            .queue_url(queue_url)
            .max_number_of_messages(MAX_MESSAGES_PER_RECEIVE)
            .wait_time_seconds(WAIT_TIME_SECONDS)
            .message_attribute_names("All")
            .send()
            .await;

        match received {
            Ok(output) => {
                for message in output.messages() {
                    self.dispatch(queue_url, message).await;
                }
            }
            Err(e) => {
                error!("{} receive failed: {e}", self.worker_name);
                self.metrics
                    .increment("pubsub.amazon.receive.errors", &self.subscription.name);
                sleep(RETRY_DELAY + jitter()).await;
            }
        }
    }

    async fn dispatch(&self, queue_url: &str, message: &Message) {
        self.metrics
            .increment("pubsub.amazon.messages.received", &self.subscription.name);

        let attributes = message
            .message_attributes()
            .map(|attrs| {
                attrs
                    .iter()
                    .filter_map(|(key, value)| {
                        value.string_value().map(|v| (key.clone(), v.to_string()))
                    })
                    .collect()
            })
            .unwrap_or_default();

        let description = MessageDescription {
            subscription_name: self.subscription.name.clone(),
            message_id: message.message_id().map(str::to_string),
            payload: message.body().unwrap_or_default().to_string(),
            attributes,
        };

        match self.handler.handle_message(description).await {
            Ok(()) => {
                self.metrics
                    .increment("pubsub.amazon.messages.handled", &self.subscription.name);
                if let Some(receipt) = message.receipt_handle() {
                    if let Err(e) = self
                        .sqs
                        .delete_message()
                        .queue_url(queue_url)
                        .receipt_handle(receipt)
                        .send()
                        .await
                    {
                        warn!("{} could not acknowledge message: {e}", self.worker_name);
                    }
                }
            }
            Err(e) => {
                // Left on the queue for redelivery
                self.metrics
                    .increment("pubsub.amazon.messages.failed", &self.subscription.name);
                error!("{} handler failed: {e}", self.worker_name);
            }
        }
    }
}

#[async_trait]
impl Subscriber for SqsSubscriber {
    fn worker_name(&self) -> &str {
        &self.worker_name
    }

    fn subscription(&self) -> &SubscriptionConfig {
        &self.subscription
    }

    fn status(&self) -> SubscriberStatus {
        self.status.get()
    }

    async fn run(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        if *shutdown.borrow() {
            self.status.set(SubscriberStatus::Terminated);
            return;
        }

        self.status.set(SubscriberStatus::Running);
        info!("{} starting (created {})", self.worker_name, self.created_at);

        let queue_url = tokio::select! {
            _ = shutdown.wait_for(|stop| *stop) => None,
            url = self.initialize_queue() => url,
        };

        let Some(queue_url) = queue_url else {
            if *shutdown.borrow() {
                self.status.set(SubscriberStatus::Terminated);
            } else {
                self.status.set(SubscriberStatus::Failed);
            }
            return;
        };

        info!("{} listening on {}", self.worker_name, queue_url);

        loop {
            tokio::select! {
                _ = shutdown.wait_for(|stop| *stop) => break,
                _ = self.poll_once(&queue_url) => {}
            }
        }

        self.status.set(SubscriberStatus::Terminated);
        info!("{} stopped", self.worker_name);
    }
}

fn jitter() -> Duration {
    Duration::from_millis(rand::rng().random_range(0..RETRY_JITTER_MS))
}
