//! Request snapshots and their parsing from YAML/JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use super::schema::validate_request_schema;
use super::InfoRequest;

/// Base status assumed when a document does not carry one.
pub const DEFAULT_BASE_STATUS: &str = "waiting_response";

/// Errors that can occur when loading request documents.
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Failed to read request file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Request does not match schema: {}", .0.join("; "))]
    SchemaError(Vec<String>),

    #[error("Request validation failed: {0}")]
    ValidationError(String),
}

/// An incoming message from the department.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomingMessage {
    /// Plain-text body, already decoded and unfolded
    pub body: String,

    /// When the message arrived. Carried for display; classification
    /// measures against the request's age, not this.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received_at: Option<DateTime<Utc>>,
}

impl IncomingMessage {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            received_at: None,
        }
    }

    pub fn received_at(mut self, at: DateTime<Utc>) -> Self {
        self.received_at = Some(at);
        self
    }
}

/// A point-in-time copy of a request's facts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestSnapshot {
    pub created_at: DateTime<Utc>,

    #[serde(default = "default_awaiting")]
    pub awaiting_response: bool,

    /// The host's status for this request when no custom status applies
    #[serde(default = "default_base_status")]
    pub base_status: String,

    #[serde(default)]
    pub incoming_messages: Vec<IncomingMessage>,
}

fn default_awaiting() -> bool {
    true
}

fn default_base_status() -> String {
    DEFAULT_BASE_STATUS.to_string()
}

impl RequestSnapshot {
    /// A request awaiting a response, with no correspondence yet.
    pub fn new(created_at: DateTime<Utc>) -> Self {
        Self {
            created_at,
            awaiting_response: true,
            base_status: default_base_status(),
            incoming_messages: Vec::new(),
        }
    }

    pub fn awaiting(mut self, awaiting_response: bool) -> Self {
        self.awaiting_response = awaiting_response;
        self
    }

    pub fn with_base_status(mut self, status: impl Into<String>) -> Self {
        self.base_status = status.into();
        self
    }

    pub fn with_message(mut self, message: impl Into<IncomingMessage>) -> Self {
        self.incoming_messages.push(message.into());
        self
    }

    /// Parse a request from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, RequestError> {
        let value: serde_json::Value = serde_yaml::from_str(yaml)?;
        Self::from_value(value)
    }

    /// Parse a request from JSON string.
    pub fn from_json(json: &str) -> Result<Self, RequestError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Parse a request from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, RequestError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parse a request from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, RequestError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parse a request file, choosing JSON for `.json` and YAML otherwise.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RequestError> {
        let path = path.as_ref();
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json_file(path)
        } else {
            Self::from_yaml_file(path)
        }
    }

    fn from_value(value: serde_json::Value) -> Result<Self, RequestError> {
        validate_request_schema(&value).map_err(RequestError::SchemaError)?;
        let request: RequestSnapshot = serde_json::from_value(value)?;
        request.validate()?;
        Ok(request)
    }

    fn validate(&self) -> Result<(), RequestError> {
        if self.base_status.trim().is_empty() {
            return Err(RequestError::ValidationError(
                "base_status must not be empty".to_string(),
            ));
        }

        if let Some((index, _)) = self
            .incoming_messages
            .iter()
            .enumerate()
            .find(|(_, m)| m.received_at.is_some_and(|at| at < self.created_at))
        {
            return Err(RequestError::ValidationError(format!(
                "incoming_messages[{}] was received before the request was created",
                index
            )));
        }

        Ok(())
    }
}

impl From<&str> for IncomingMessage {
    fn from(body: &str) -> Self {
        IncomingMessage::new(body)
    }
}

impl From<String> for IncomingMessage {
    fn from(body: String) -> Self {
        IncomingMessage::new(body)
    }
}

impl InfoRequest for RequestSnapshot {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn awaiting_response(&self) -> bool {
        self.awaiting_response
    }

    fn message_bodies(&self) -> Vec<&str> {
        self.incoming_messages.iter().map(|m| m.body.as_str()).collect()
    }

    fn base_calculate_status(&self) -> String {
        self.base_status.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_REQUEST: &str = r#"
created_at: "2025-01-01T09:00:00Z"
awaiting_response: true
base_status: waiting_response
incoming_messages:
  - body: "This is an interim reply. We need more time."
    received_at: "2025-01-09T10:30:00Z"
  - body: "我們需要更多時間處理你的要求。"
"#;

    #[test]
    fn test_parse_valid_request() {
        let request = RequestSnapshot::from_yaml(VALID_REQUEST).unwrap();
        assert!(request.awaiting_response);
        assert_eq!(request.base_status, "waiting_response");
        assert_eq!(request.incoming_messages.len(), 2);
        assert!(request.incoming_messages[0].received_at.is_some());
        assert_eq!(request.message_bodies()[1], "我們需要更多時間處理你的要求。");
    }

    #[test]
    fn test_defaults_applied() {
        let request = RequestSnapshot::from_json(r#"{"created_at": "2025-01-01T09:00:00Z"}"#)
            .unwrap();
        assert!(request.awaiting_response);
        assert_eq!(request.base_status, DEFAULT_BASE_STATUS);
        assert!(request.incoming_messages.is_empty());
    }

    #[test]
    fn test_missing_created_at_fails_schema() {
        let result = RequestSnapshot::from_yaml("awaiting_response: true\n");
        assert!(matches!(result, Err(RequestError::SchemaError(_))));
    }

    #[test]
    fn test_unknown_field_fails_schema() {
        let result = RequestSnapshot::from_json(
            r#"{"created_at": "2025-01-01T09:00:00Z", "title": "Budget papers"}"#,
        );
        assert!(matches!(result, Err(RequestError::SchemaError(_))));
    }

    #[test]
    fn test_empty_base_status_rejected() {
        let result = RequestSnapshot::from_json(
            r#"{"created_at": "2025-01-01T09:00:00Z", "base_status": "  "}"#,
        );
        assert!(matches!(result, Err(RequestError::ValidationError(_))));
    }

    #[test]
    fn test_message_before_creation_rejected() {
        let yaml = r#"
created_at: "2025-01-10T00:00:00Z"
incoming_messages:
  - body: "Early"
    received_at: "2025-01-09T00:00:00Z"
"#;
        let result = RequestSnapshot::from_yaml(yaml);
        assert!(matches!(result, Err(RequestError::ValidationError(_))));
    }

    #[test]
    fn test_demo_documents_load() {
        let yaml = RequestSnapshot::from_yaml(include_str!("../../../../demos/interim-reply.yaml"))
            .unwrap();
        assert_eq!(yaml.incoming_messages.len(), 2);

        let json =
            RequestSnapshot::from_json(include_str!("../../../../demos/unexplained-delay.json"))
                .unwrap();
        assert_eq!(json.base_status, "waiting_response_overdue");
    }

    #[test]
    fn test_builder() {
        let created = "2025-01-01T09:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let request = RequestSnapshot::new(created)
            .awaiting(false)
            .with_base_status("successful")
            .with_message("Here is the information.");

        assert!(!request.awaiting_response());
        assert_eq!(request.base_calculate_status(), "successful");
        assert_eq!(request.message_bodies(), vec!["Here is the information."]);
    }
}
