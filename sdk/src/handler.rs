//! Message handler seam
//!
//! Workers hand every received message here. Payload deserialization,
//! templating and dispatch all live behind this trait.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// A received message, decoupled from the transport types
#[derive(Debug, Clone)]
pub struct MessageDescription {
    /// Name of the subscription the message arrived on
    pub subscription_name: String,

    /// Transport-assigned message id, when one was supplied
    pub message_id: Option<String>,

    /// Raw message body
    pub payload: String,

    /// Transport message attributes, flattened to strings
    pub attributes: HashMap<String, String>,
}

#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Process one message. An `Err` leaves the message on the queue for
    /// redelivery; `Ok` lets the worker acknowledge it.
    async fn handle_message(&self, message: MessageDescription) -> Result<()>;
}
