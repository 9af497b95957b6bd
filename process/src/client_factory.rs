//! Region-scoped client construction for one subscription
//!
//! The topic and queue regions are derived from their resource names
//! independently, so a subscription may fan out across regions. Clients are
//! never cached or pooled across subscriptions; each one is bound to a
//! single region. Building a client does not contact the network.

use aws_config::SdkConfig;
use aws_sdk_sns::config::Region;
use telamon_sdk::config::SubscriptionConfig;
use telamon_sdk::{Arn, BootstrapError};

/// The client pair for one subscription, plus the parsed resource names
/// the worker needs
#[derive(Debug)]
pub struct SubscriptionClients {
    pub sns: aws_sdk_sns::Client,
    pub sqs: aws_sdk_sqs::Client,
    pub topic_arn: Arn,
    pub queue_arn: Arn,
}

/// Build the SNS and SQS clients for one subscription, each scoped to the
/// region named in its resource ARN
pub fn build_clients(
    subscription: &SubscriptionConfig,
    base: &SdkConfig,
) -> Result<SubscriptionClients, BootstrapError> {
    let topic_arn = parse_identifier(&subscription.name, &subscription.topic_arn)?;
    let queue_arn = parse_identifier(&subscription.name, &subscription.queue_arn)?;

    validate_region(&subscription.name, &topic_arn.region)?;
    validate_region(&subscription.name, &queue_arn.region)?;

    let sns_config = aws_sdk_sns::config::Builder::from(base)
        .region(Region::new(topic_arn.region.clone()))
        .build();
    let sqs_config = aws_sdk_sqs::config::Builder::from(base)
        .region(Region::new(queue_arn.region.clone()))
        .build();

    Ok(SubscriptionClients {
        sns: aws_sdk_sns::Client::from_conf(sns_config),
        sqs: aws_sdk_sqs::Client::from_conf(sqs_config),
        topic_arn,
        queue_arn,
    })
}

fn parse_identifier(subscription: &str, identifier: &str) -> Result<Arn, BootstrapError> {
    Arn::parse(identifier).map_err(|source| BootstrapError::MalformedIdentifier {
        worker: subscription.to_string(),
        source,
    })
}

/// Region names are lowercase alphanumerics and dashes; anything else
/// would produce a client pointed at a nonsense endpoint
fn validate_region(subscription: &str, region: &str) -> Result<(), BootstrapError> {
    let valid = region
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !valid {
        return Err(BootstrapError::ClientConstruction {
            worker: subscription.to_string(),
            reason: format!("invalid region '{region}'"),
        });
    }
    Ok(())
}
