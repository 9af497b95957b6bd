//! Parser for Amazon resource names
//!
//! An ARN is six colon-delimited segments:
//!   arn:partition:service:region:account:resource
//! The resource segment may itself contain colons, so everything after the
//! fifth delimiter belongs to it.

use crate::error::ArnError;
use serde::Serialize;
use std::fmt;

/// Structured decomposition of a resource name string
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Arn {
    pub partition: String,
    pub service: String,
    pub region: String,
    pub account: String,
    pub resource: String,
}

impl Arn {
    /// Parse a resource name, failing on anything outside the grammar
    pub fn parse(identifier: &str) -> Result<Self, ArnError> {
        let segments: Vec<&str> = identifier.splitn(6, ':').collect();

        if segments.len() != 6 {
            return Err(ArnError::WrongSegmentCount {
                arn: identifier.to_string(),
                count: segments.len(),
            });
        }

        if segments[0] != "arn" {
            return Err(ArnError::BadScheme {
                arn: identifier.to_string(),
            });
        }

        // The client factory needs the region, and the worker needs the
        // resource name, so an ARN missing either is unusable
        for (index, segment) in [(3, "region"), (4, "account"), (5, "resource")] {
            if segments[index].is_empty() {
                return Err(ArnError::EmptySegment {
                    arn: identifier.to_string(),
                    segment,
                });
            }
        }

        Ok(Arn {
            partition: segments[1].to_string(),
            service: segments[2].to_string(),
            region: segments[3].to_string(),
            account: segments[4].to_string(),
            resource: segments[5].to_string(),
        })
    }
}

impl fmt::Display for Arn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "arn:{}:{}:{}:{}:{}",
            self.partition, self.service, self.region, self.account, self.resource
        )
    }
}
