//! Main process for a Telamon service installation
//! Bootstraps and supervises subscription workers built with telamon-sdk

use anyhow::Result;
use aws_config::{BehaviorVersion, SdkConfig};
use config::Config;
use std::sync::Arc;
use telamon_sdk::config::AmazonPubsubConfig;
use telamon_sdk::{FacadeMetricsSink, MessageHandler, MetricsSink, SubscriberRegistry};
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::watch;
use tracing::info;

mod bootstrap;
pub use bootstrap::SubscriberBootstrap;

mod client_factory;
pub use client_factory::SubscriptionClients;

mod logging_handler;
pub use logging_handler::LoggingMessageHandler;

mod sqs_subscriber;
pub use sqs_subscriber::SqsSubscriber;

mod worker_pool;
pub use worker_pool::WorkerPool;

/// Main Process structure
pub struct Process {
    /// Global configuration
    config: Arc<Config>,

    /// Shared credential chain and transport defaults; workers re-scope
    /// the region per client
    base_config: SdkConfig,

    /// Handler every worker dispatches received messages to
    handler: Arc<dyn MessageHandler>,

    /// Metrics sink handed to every worker
    metrics: Arc<dyn MetricsSink>,

    /// Registry of active subscribers, readable process-wide
    registry: Arc<SubscriberRegistry>,

    /// Shutdown signal to all workers
    shutdown: watch::Sender<bool>,
}

impl Process {
    /// Create a process with the given config and the default message
    /// handler and metrics sink
    pub async fn create(config: Arc<Config>) -> Self {
        Self::create_with(
            config,
            Arc::new(LoggingMessageHandler),
            Arc::new(FacadeMetricsSink),
        )
        .await
    }

    /// Create a process with an application-supplied handler and sink
    pub async fn create_with(
        config: Arc<Config>,
        handler: Arc<dyn MessageHandler>,
        metrics: Arc<dyn MetricsSink>,
    ) -> Self {
        let base_config = aws_config::defaults(BehaviorVersion::latest()).load().await;

        Self {
            config,
            base_config,
            handler,
            metrics,
            registry: SubscriberRegistry::new(),
            shutdown: watch::Sender::new(false),
        }
    }

    /// Registry of active subscribers, for health checks and introspection
    pub fn registry(&self) -> &Arc<SubscriberRegistry> {
        &self.registry
    }

    /// Run the process
    pub async fn run(&self) -> Result<()> {
        info!("Initialising...");

        let pubsub = AmazonPubsubConfig::from_config(&self.config)?;

        let bootstrap = SubscriberBootstrap::new(
            pubsub.subscriptions,
            self.base_config.clone(),
            self.handler.clone(),
            self.metrics.clone(),
            self.registry.clone(),
            self.shutdown.subscribe(),
        );
        bootstrap.start();

        info!(
            "Running with {} active subscriptions: {:?}",
            self.registry.len(),
            self.registry.names()
        );

        // Wait for SIGTERM
        let mut sigterm = signal(SignalKind::terminate()).expect("Can't set signal");
        sigterm.recv().await;

        info!("SIGTERM received. Shutting down...");

        // Stop every worker loop before the process exits
        let _ = self.shutdown.send(true);

        Ok(())
    }
}
