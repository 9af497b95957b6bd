//! Subscription bootstrap
//!
//! Walks the configured subscription list once, in order, and starts one
//! worker per subscription under a pool sized to the subscription count.
//! A subscription that cannot be started is logged and skipped; it never
//! blocks the rest. Whatever did start is published to the shared registry
//! in a single bulk insert.

use aws_config::SdkConfig;
use std::sync::Arc;
use telamon_sdk::config::SubscriptionConfig;
use telamon_sdk::{BootstrapError, MessageHandler, MetricsSink, Subscriber, SubscriberRegistry};
use tokio::sync::watch;
use tracing::{error, info};

use crate::client_factory::build_clients;
use crate::sqs_subscriber::SqsSubscriber;
use crate::worker_pool::WorkerPool;

pub struct SubscriberBootstrap {
    subscriptions: Vec<SubscriptionConfig>,
    base_config: SdkConfig,
    handler: Arc<dyn MessageHandler>,
    metrics: Arc<dyn MetricsSink>,
    registry: Arc<SubscriberRegistry>,
    shutdown: watch::Receiver<bool>,
}

impl SubscriberBootstrap {
    pub fn new(
        subscriptions: Vec<SubscriptionConfig>,
        base_config: SdkConfig,
        handler: Arc<dyn MessageHandler>,
        metrics: Arc<dyn MetricsSink>,
        registry: Arc<SubscriberRegistry>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            subscriptions,
            base_config,
            handler,
            metrics,
            registry,
            shutdown,
        }
    }

    /// Start every configured subscription worker. Called exactly once
    /// during process initialisation.
    pub fn start(&self) {
        let pool = WorkerPool::new(self.subscriptions.len());
        self.start_with_pool(&pool);
    }

    fn start_with_pool(&self, pool: &WorkerPool) {
        let mut started: Vec<Arc<dyn Subscriber>> = Vec::new();

        for subscription in &self.subscriptions {
            info!(
                "Bootstrapping SQS for SNS topic: {} in account: {}",
                subscription.topic_arn, subscription.account_name
            );
            if let Some(template) = &subscription.template_path {
                if !template.is_empty() {
                    info!(
                        "Using template: {} for subscription: {}",
                        template, subscription.name
                    );
                }
            }

            match self.start_worker(subscription, pool) {
                Ok(subscriber) => started.push(subscriber),
                Err(e) => error!("Could not start {}: {e}", e.worker()),
            }
        }

        // All workers submitted; the pool admits no further work
        pool.close();

        self.registry.put_all(started);
    }

    fn start_worker(
        &self,
        subscription: &SubscriptionConfig,
        pool: &WorkerPool,
    ) -> Result<Arc<dyn Subscriber>, BootstrapError> {
        let clients = build_clients(subscription, &self.base_config)?;

        let worker: Arc<dyn Subscriber> = Arc::new(SqsSubscriber::new(
            subscription.clone(),
            clients,
            self.handler.clone(),
            self.metrics.clone(),
        ));

        pool.try_submit(worker.clone(), self.shutdown.clone())?;

        Ok(worker)
    }
}
