//! JSON Schema validation for request documents.
//!
//! Documents are validated against `schema/request.schema.json` before they
//! are deserialized, so malformed input is reported with its location.

use std::sync::OnceLock;

const REQUEST_SCHEMA_JSON: &str = include_str!("../../schema/request.schema.json");

static VALIDATOR: OnceLock<Result<jsonschema::Validator, String>> = OnceLock::new();

/// The compiled request schema. A schema that fails to load is reported
/// through the same error list as a document that fails to validate.
fn validator() -> Result<&'static jsonschema::Validator, String> {
    VALIDATOR
        .get_or_init(|| {
            let schema: serde_json::Value = serde_json::from_str(REQUEST_SCHEMA_JSON)
                .map_err(|e| format!("request schema is not valid JSON: {}", e))?;
            jsonschema::options()
                .build(&schema)
                .map_err(|e| format!("request schema does not compile: {}", e))
        })
        .as_ref()
        .map_err(Clone::clone)
}

/// Validate a request document against the schema.
///
/// Returns every violation, each suffixed with its instance path.
pub fn validate_request_schema(request_json: &serde_json::Value) -> Result<(), Vec<String>> {
    let schema = validator().map_err(|e| vec![e])?;

    let errors: Vec<String> = schema
        .iter_errors(request_json)
        .map(|e| format!("{} at {}", e, e.instance_path))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_schema_compiles() {
        assert!(validator().is_ok());
    }

    #[test]
    fn test_minimal_request_passes() {
        let value = serde_json::json!({ "created_at": "2025-01-01T09:00:00Z" });
        assert!(validate_request_schema(&value).is_ok());
    }

    #[test]
    fn test_full_request_passes() {
        let value = serde_json::json!({
            "created_at": "2025-01-01T09:00:00+08:00",
            "awaiting_response": true,
            "base_status": "waiting_response_overdue",
            "incoming_messages": [
                { "body": "This is an interim reply." },
                { "body": "我們需要更多時間。", "received_at": "2025-01-12T10:00:00.250Z" }
            ]
        });
        assert!(validate_request_schema(&value).is_ok());
    }

    #[test]
    fn test_bad_timestamp_fails() {
        let value = serde_json::json!({ "created_at": "1 January 2025" });
        let errors = validate_request_schema(&value).unwrap_err();
        assert!(errors.iter().any(|e| e.contains("/created_at")));
    }

    #[test]
    fn test_message_without_body_fails() {
        let value = serde_json::json!({
            "created_at": "2025-01-01T09:00:00Z",
            "incoming_messages": [ { "received_at": "2025-01-02T09:00:00Z" } ]
        });
        assert!(validate_request_schema(&value).is_err());
    }

    #[test]
    fn test_awaiting_must_be_boolean() {
        let value = serde_json::json!({
            "created_at": "2025-01-01T09:00:00Z",
            "awaiting_response": "yes"
        });
        assert!(validate_request_schema(&value).is_err());
    }
}
