//! Request facts supplied by the host.
//!
//! The host implements [`InfoRequest`] over its own records; the engine only
//! ever reads through it. [`RequestSnapshot`] is a self-contained
//! implementation that can be loaded from YAML or JSON documents validated
//! against `schema/request.schema.json`.

mod parser;
mod schema;

pub use parser::{IncomingMessage, RequestError, RequestSnapshot, DEFAULT_BASE_STATUS};

use chrono::{DateTime, Utc};

/// Read-only view of a request, implemented by the host.
pub trait InfoRequest {
    /// When the request was made.
    fn created_at(&self) -> DateTime<Utc>;

    /// Whether the requester is still waiting on the department.
    fn awaiting_response(&self) -> bool;

    /// Decoded plain-text bodies of incoming messages, oldest first.
    fn message_bodies(&self) -> Vec<&str>;

    /// The host's own status for the request, used when no custom status
    /// applies.
    fn base_calculate_status(&self) -> String;
}
