//! Process-wide registry of active subscribers
//!
//! Written once at bootstrap, via a single bulk insert after every
//! submission attempt has resolved, then read concurrently for the rest of
//! the process lifetime (health checks, administrative introspection).
//! Readers that get in before the insert see an empty registry, never a
//! partially populated one.

use crate::subscriber::Subscriber;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

pub struct SubscriberRegistry {
    subscribers: RwLock<HashMap<String, Arc<dyn Subscriber>>>,
}

impl SubscriberRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            subscribers: RwLock::new(HashMap::new()),
        })
    }

    /// Bulk insert - the single write of the registry's lifetime.
    /// Duplicate subscription names are last-write-wins.
    pub fn put_all(&self, subscribers: Vec<Arc<dyn Subscriber>>) {
        let mut map = self
            .subscribers
            .write()
            .unwrap_or_else(|e| e.into_inner());
        for subscriber in subscribers {
            let name = subscriber.subscription().name.clone();
            debug!("Registering subscriber '{name}'");
            map.insert(name, subscriber);
        }
    }

    /// Look up a subscriber by subscription name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Subscriber>> {
        self.subscribers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(name)
            .cloned()
    }

    /// Sorted list of registered subscription names
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .subscribers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .cloned()
            .collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// -- Tests --
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SubscriptionConfig;
    use crate::subscriber::SubscriberStatus;
    use async_trait::async_trait;
    use tokio::sync::watch;

    struct FakeSubscriber {
        worker_name: String,
        subscription: SubscriptionConfig,
    }

    impl FakeSubscriber {
        fn new(name: &str, queue_arn: &str) -> Arc<Self> {
            // Set up tracing
            let _ = tracing_subscriber::fmt().with_test_writer().try_init();

            Arc::new(Self {
                worker_name: format!("sqs-subscriber/{name}"),
                subscription: SubscriptionConfig {
                    name: name.to_string(),
                    account_name: "test-account".to_string(),
                    topic_arn: "arn:aws:sns:us-east-1:123:topic1".to_string(),
                    queue_arn: queue_arn.to_string(),
                    template_path: None,
                },
            })
        }
    }

    #[async_trait]
    impl Subscriber for FakeSubscriber {
        fn worker_name(&self) -> &str {
            &self.worker_name
        }

        fn subscription(&self) -> &SubscriptionConfig {
            &self.subscription
        }

        fn status(&self) -> SubscriberStatus {
            SubscriberStatus::Created
        }

        async fn run(self: Arc<Self>, _shutdown: watch::Receiver<bool>) {}
    }

    #[test]
    fn starts_empty() {
        let registry = SubscriberRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get("sub1").is_none());
    }

    #[test]
    fn put_all_registers_every_handle_by_name() {
        let registry = SubscriberRegistry::new();
        registry.put_all(vec![
            FakeSubscriber::new("sub1", "arn:aws:sqs:us-east-1:123:queue1"),
            FakeSubscriber::new("sub2", "arn:aws:sqs:us-east-1:123:queue2"),
            FakeSubscriber::new("sub3", "arn:aws:sqs:us-east-1:123:queue3"),
        ]);

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.names(), vec!["sub1", "sub2", "sub3"]);
        assert!(registry.get("sub2").is_some());
        assert!(registry.get("sub4").is_none());
    }

    #[test]
    fn duplicate_names_are_last_write_wins() {
        let registry = SubscriberRegistry::new();
        registry.put_all(vec![
            FakeSubscriber::new("sub1", "arn:aws:sqs:us-east-1:123:queue-a"),
            FakeSubscriber::new("sub1", "arn:aws:sqs:us-east-1:123:queue-b"),
        ]);

        assert_eq!(registry.len(), 1);
        let survivor = registry.get("sub1").unwrap();
        assert_eq!(
            survivor.subscription().queue_arn,
            "arn:aws:sqs:us-east-1:123:queue-b"
        );
    }

    #[test]
    fn readable_from_other_threads() {
        let registry = SubscriberRegistry::new();
        registry.put_all(vec![FakeSubscriber::new(
            "sub1",
            "arn:aws:sqs:us-east-1:123:queue1",
        )]);

        let shared = registry.clone();
        let handle = std::thread::spawn(move || shared.get("sub1").is_some());
        assert!(handle.join().unwrap());
    }
}
