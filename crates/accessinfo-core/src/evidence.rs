//! Evidence linking for check findings.
//!
//! A triggered (or suppressed) check points at the exact place in the
//! request that decided it: a span of a message body, or a request field.

use serde::{Deserialize, Serialize};

/// Where a piece of evidence was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceSource {
    /// An incoming message body
    Message,
    /// A field of the request itself (e.g. `created_at`)
    Request,
}

/// A piece of evidence supporting a check finding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Evidence {
    /// What this evidence supports
    pub claim: String,

    /// Where the evidence comes from
    pub source: EvidenceSource,

    /// Pointer to the location (e.g., "incoming_messages[2].body[14:27]")
    pub pointer: String,
}

impl Evidence {
    /// Evidence from a byte span of the `index`th message body.
    pub fn from_message(claim: impl Into<String>, index: usize, start: usize, end: usize) -> Self {
        Self {
            claim: claim.into(),
            source: EvidenceSource::Message,
            pointer: format!("incoming_messages[{}].body[{}:{}]", index, start, end),
        }
    }

    /// Evidence from a request field.
    pub fn from_request(claim: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            claim: claim.into(),
            source: EvidenceSource::Request,
            pointer: field.into(),
        }
    }
}
