//! Default message handler - logs everything it receives
//!
//! Stands in until an application wires a real dispatcher through
//! `Process::create_with`.

use anyhow::Result;
use async_trait::async_trait;
use telamon_sdk::{MessageDescription, MessageHandler};
use tracing::info;

pub struct LoggingMessageHandler;

#[async_trait]
impl MessageHandler for LoggingMessageHandler {
    async fn handle_message(&self, message: MessageDescription) -> Result<()> {
        match serde_json::from_str::<serde_json::Value>(&message.payload) {
            Ok(value) => info!("Received on '{}': {}", message.subscription_name, value),
            Err(_) => info!(
                "Received {} bytes on '{}' (not JSON)",
                message.payload.len(),
                message.subscription_name
            ),
        }
        Ok(())
    }
}

// -- Tests --
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn description(payload: &str) -> MessageDescription {
        MessageDescription {
            subscription_name: "sub1".to_string(),
            message_id: Some("m-1".to_string()),
            payload: payload.to_string(),
            attributes: HashMap::new(),
        }
    }

    #[tokio::test]
    async fn accepts_json_payloads() {
        let handler = LoggingMessageHandler;
        assert!(handler
            .handle_message(description(r#"{"kind":"build","id":42}"#))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn accepts_non_json_payloads() {
        let handler = LoggingMessageHandler;
        assert!(handler.handle_message(description("plain text")).await.is_ok());
    }
}
