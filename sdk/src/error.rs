//! Error types for subscription bootstrap

use thiserror::Error;

/// A resource name string that does not match the ARN grammar
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArnError {
    #[error("malformed ARN '{arn}': expected 6 colon-delimited segments, got {count}")]
    WrongSegmentCount { arn: String, count: usize },

    #[error("malformed ARN '{arn}': scheme is not 'arn'")]
    BadScheme { arn: String },

    #[error("malformed ARN '{arn}': empty {segment} segment")]
    EmptySegment { arn: String, segment: &'static str },
}

/// Why one subscription's worker could not be started.
/// Carries the worker name so operators can tie the log line back to
/// the subscription that failed.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// A topic or queue resource identifier failed to parse
    #[error("bad resource identifier for worker '{worker}'")]
    MalformedIdentifier {
        worker: String,
        #[source]
        source: ArnError,
    },

    /// A region-scoped client could not be built
    #[error("could not build clients for worker '{worker}': {reason}")]
    ClientConstruction { worker: String, reason: String },

    /// The worker pool refused the submission - at capacity or closed
    #[error("could not start worker '{worker}': execution pool rejected it")]
    SubmissionRejected { worker: String },
}

impl BootstrapError {
    /// Name of the worker the failure belongs to
    pub fn worker(&self) -> &str {
        match self {
            BootstrapError::MalformedIdentifier { worker, .. } => worker,
            BootstrapError::ClientConstruction { worker, .. } => worker,
            BootstrapError::SubmissionRejected { worker } => worker,
        }
    }
}
