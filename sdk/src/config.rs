//! Subscription configuration
//!
//! Descriptors are declared under `[[amazon-pubsub.subscriptions]]` in the
//! root configuration. The list is read once at startup; the bootstrap never
//! revisits it.

use anyhow::{bail, Result};
use config::Config;
use serde::Deserialize;
use std::collections::HashSet;

/// One configured topic-to-queue subscription
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SubscriptionConfig {
    /// Logical name, unique across the subscription list
    pub name: String,

    /// Account the topic and queue live in
    pub account_name: String,

    /// Resource name of the SNS topic to listen to
    pub topic_arn: String,

    /// Resource name of the SQS queue to poll
    pub queue_arn: String,

    /// Optional message template reference, passed through untouched
    #[serde(default)]
    pub template_path: Option<String>,
}

/// The `amazon-pubsub` section of the root configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AmazonPubsubConfig {
    #[serde(default)]
    pub subscriptions: Vec<SubscriptionConfig>,
}

impl AmazonPubsubConfig {
    /// Extract and validate the subscription list from the root config
    pub fn from_config(config: &Config) -> Result<Self> {
        let pubsub: AmazonPubsubConfig = config.get("amazon-pubsub")?;
        pubsub.validate()?;
        Ok(pubsub)
    }

    /// Reject configurations the bootstrap cannot act on. Duplicate names
    /// would silently shadow each other in the registry, so they fail here,
    /// before any worker is built.
    pub fn validate(&self) -> Result<()> {
        if self.subscriptions.is_empty() {
            bail!("no subscriptions configured under [amazon-pubsub]");
        }

        let mut seen = HashSet::new();
        for subscription in &self.subscriptions {
            if subscription.name.is_empty() {
                bail!(
                    "subscription with topic '{}' has an empty name",
                    subscription.topic_arn
                );
            }
            if !seen.insert(subscription.name.as_str()) {
                bail!("duplicate subscription name '{}'", subscription.name);
            }
        }

        Ok(())
    }
}

// -- Tests --
#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn config_from_toml(toml: &str) -> Config {
        Config::builder()
            .add_source(config::File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
    }

    #[test]
    fn deserializes_a_subscription_list() {
        let config = config_from_toml(
            r#"
            [[amazon-pubsub.subscriptions]]
            name = "sub1"
            account-name = "prod"
            topic-arn = "arn:aws:sns:us-east-1:123:topic1"
            queue-arn = "arn:aws:sqs:us-east-1:123:queue1"

            [[amazon-pubsub.subscriptions]]
            name = "sub2"
            account-name = "prod"
            topic-arn = "arn:aws:sns:us-west-2:123:topic2"
            queue-arn = "arn:aws:sqs:us-west-2:123:queue2"
            template-path = "/opt/templates/build.jinja"
            "#,
        );

        let pubsub = AmazonPubsubConfig::from_config(&config).unwrap();
        assert_eq!(pubsub.subscriptions.len(), 2);
        assert_eq!(pubsub.subscriptions[0].name, "sub1");
        assert_eq!(pubsub.subscriptions[0].template_path, None);
        assert_eq!(
            pubsub.subscriptions[1].template_path.as_deref(),
            Some("/opt/templates/build.jinja")
        );
    }

    #[test]
    fn order_of_declaration_is_preserved() {
        let config = config_from_toml(
            r#"
            [[amazon-pubsub.subscriptions]]
            name = "zulu"
            account-name = "a"
            topic-arn = "arn:aws:sns:us-east-1:1:t"
            queue-arn = "arn:aws:sqs:us-east-1:1:q"

            [[amazon-pubsub.subscriptions]]
            name = "alpha"
            account-name = "a"
            topic-arn = "arn:aws:sns:us-east-1:1:t2"
            queue-arn = "arn:aws:sqs:us-east-1:1:q2"
            "#,
        );

        let pubsub = AmazonPubsubConfig::from_config(&config).unwrap();
        let names: Vec<&str> = pubsub
            .subscriptions
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["zulu", "alpha"]);
    }

    #[test]
    fn missing_section_is_an_error() {
        let config = config_from_toml("[other]\nkey = \"value\"");
        assert!(AmazonPubsubConfig::from_config(&config).is_err());
    }

    #[test]
    fn empty_subscription_list_is_an_error() {
        let config = config_from_toml("[amazon-pubsub]\nsubscriptions = []");
        assert!(AmazonPubsubConfig::from_config(&config).is_err());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let config = config_from_toml(
            r#"
            [[amazon-pubsub.subscriptions]]
            name = "sub1"
            account-name = "a"
            topic-arn = "arn:aws:sns:us-east-1:1:t"
            queue-arn = "arn:aws:sqs:us-east-1:1:q"

            [[amazon-pubsub.subscriptions]]
            name = "sub1"
            account-name = "a"
            topic-arn = "arn:aws:sns:us-east-1:1:t2"
            queue-arn = "arn:aws:sqs:us-east-1:1:q2"
            "#,
        );

        let err = AmazonPubsubConfig::from_config(&config).unwrap_err();
        assert!(err.to_string().contains("duplicate subscription name"));
    }
}
