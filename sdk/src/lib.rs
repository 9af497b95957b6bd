// Telamon subscription service SDK - main library exports
pub mod arn;
pub mod config;
pub mod error;
pub mod handler;
pub mod metrics;
pub mod registry;
pub mod subscriber;

// Flattened re-exports
pub use self::arn::Arn;
pub use self::error::{ArnError, BootstrapError};
pub use self::handler::{MessageDescription, MessageHandler};
pub use self::metrics::{FacadeMetricsSink, MetricsSink};
pub use self::registry::SubscriberRegistry;
pub use self::subscriber::{StatusCell, Subscriber, SubscriberStatus};
