//! # accessinfo-core
//!
//! Deterministic deadline and status classification for requests made under
//! Hong Kong's Code on Access to Information.
//!
//! This crate answers, for a request at a given moment:
//! - When are the 10, 21 and 51 calendar-day deadlines?
//! - How far along is the request, and how should that be shown?
//! - Does it warrant one of the custom statuses, or the host's own?
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: every function is pure in its inputs, including `now`
//! 2. **Closed status set**: only the six [`CustomStatus`] codes are labelled;
//!    anything else is an error, never echoed back
//! 3. **Traceable**: every check finding cites the message span or field
//!    that decided it
//! 4. **Parallel-safe**: no shared mutable state
//!
//! ## Example
//!
//! ```rust,ignore
//! use accessinfo_core::{classify_status, display_label, RequestSnapshot};
//!
//! let request = RequestSnapshot::from_yaml_file("request.yaml")?;
//! let status = classify_status(&request, chrono::Utc::now());
//!
//! match status.custom() {
//!     Some(custom) => println!("{}", display_label(custom.as_str())?),
//!     None => println!("host status: {}", status),
//! }
//! ```

pub mod checks;
pub mod classifier;
pub mod deadlines;
pub mod display;
pub mod evidence;
pub mod request;
pub mod summary;
pub mod types;

// Re-export main types at crate root
pub use checks::{
    exceeds_target_without_explanation, has_unresolved_interim_reply, Check, InterimReplyCheck,
    UnexplainedDelayCheck,
};
pub use classifier::{classify_status, CodeOnAccessClassifier, StatusClassifier};
pub use deadlines::{
    compute_deadlines, days_elapsed, days_until_deadline, deadline_bucket, exceeded_deadline,
    DeadlinePolicy, PolicyError,
};
pub use display::{
    deadline_alert, describe_state, display_label, display_label_in, status_message,
    status_style_tag, Locale, Notice, NoticeLevel, StatusMessage,
};
pub use evidence::{Evidence, EvidenceSource};
pub use request::{IncomingMessage, InfoRequest, RequestError, RequestSnapshot};
pub use summary::DeadlineSummary;
pub use types::{
    extra_states, CheckFinding, CheckType, Classification, CustomStatus, DeadlineBucket,
    DeadlineKind, DeadlineSet, Status, StatusError,
};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeDelta, Utc};

    const OVERDUE_REQUEST: &str = r#"
created_at: "2025-01-01T09:00:00Z"
awaiting_response: true
incoming_messages:
  - body: "We acknowledge receipt of your request."
    received_at: "2025-01-02T09:00:00Z"
"#;

    fn parse(at: &str) -> DateTime<Utc> {
        at.parse().unwrap()
    }

    #[test]
    fn test_document_to_label() {
        let request = RequestSnapshot::from_yaml(OVERDUE_REQUEST).unwrap();
        let now = parse("2025-01-26T09:00:00Z");

        let status = classify_status(&request, now);
        assert_eq!(status, Status::Custom(CustomStatus::Exceeds21Days));
        assert_eq!(
            display_label(status.code()).unwrap(),
            "Response time exceeded 21 calendar days."
        );
        assert_eq!(days_elapsed(request.created_at, now), 25);
        assert_eq!(status_style_tag(request.created_at, now), "hk-deadline-overdue");
    }

    #[test]
    fn test_interim_reply_document() {
        let request = RequestSnapshot::from_yaml(OVERDUE_REQUEST)
            .unwrap()
            .with_message("這是中期回覆。");
        let now = request.created_at + TimeDelta::days(15);

        assert!(has_unresolved_interim_reply(&request, now));
        assert!(!exceeds_target_without_explanation(&request, now));
        assert_eq!(
            classify_status(&request, now),
            Status::Custom(CustomStatus::InterimReplyReceived)
        );
    }

    #[test]
    fn test_classifier_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CodeOnAccessClassifier>();
        assert_send_sync::<DeadlinePolicy>();
        assert_send_sync::<RequestSnapshot>();
    }
}
