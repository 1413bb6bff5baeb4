//! Status classification with strict first-match precedence:
//!
//! 1. Unresolved interim reply → `interim_reply_received`
//! 2. Past target without explanation → `exceeds_21_days`
//! 3. Otherwise → the host's base status, unchanged
//!
//! The order is fixed. A request that satisfies both checks is reported as
//! having received an interim reply.

use chrono::{DateTime, Utc};

use crate::checks::{Check, InterimReplyCheck, UnexplainedDelayCheck};
use crate::deadlines::DeadlinePolicy;
use crate::request::InfoRequest;
use crate::types::{Classification, CustomStatus, Status};

/// Capability the host injects to compute a request's status.
pub trait StatusClassifier: Send + Sync {
    fn classify(&self, request: &dyn InfoRequest, now: DateTime<Utc>) -> Status;
}

/// Classifier for the Code on Access to Information.
pub struct CodeOnAccessClassifier {
    /// Checks in precedence order, each paired with the status it yields
    rules: Vec<(CustomStatus, Box<dyn Check>)>,
}

impl CodeOnAccessClassifier {
    pub fn new() -> Self {
        Self::with_policy(DeadlinePolicy::default())
    }

    pub fn with_policy(policy: DeadlinePolicy) -> Self {
        Self {
            rules: vec![
                (
                    CustomStatus::InterimReplyReceived,
                    Box::new(InterimReplyCheck::with_policy(policy)) as Box<dyn Check>,
                ),
                (
                    CustomStatus::Exceeds21Days,
                    Box::new(UnexplainedDelayCheck::with_policy(policy)) as Box<dyn Check>,
                ),
            ],
        }
    }

    /// Classify and keep every check's finding.
    ///
    /// All checks are evaluated so the caller can see why lower-precedence
    /// statuses did or did not apply; the status is still the first match.
    pub fn classify_detailed(
        &self,
        request: &dyn InfoRequest,
        now: DateTime<Utc>,
    ) -> Classification {
        let findings: Vec<_> = self
            .rules
            .iter()
            .map(|(_, check)| check.evaluate(request, now))
            .collect();

        let status = self
            .rules
            .iter()
            .zip(&findings)
            .find(|(_, finding)| finding.triggered)
            .map(|((status, _), _)| Status::Custom(*status))
            .unwrap_or_else(|| Status::from(request.base_calculate_status()));

        tracing::debug!(status = %status, checks = findings.len(), "Request classified");

        Classification {
            status,
            findings,
            evaluated_at: now,
        }
    }
}

impl Default for CodeOnAccessClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusClassifier for CodeOnAccessClassifier {
    fn classify(&self, request: &dyn InfoRequest, now: DateTime<Utc>) -> Status {
        for (status, check) in &self.rules {
            if check.evaluate(request, now).triggered {
                tracing::debug!(
                    status = %status,
                    check = ?check.check_type(),
                    "Custom status matched"
                );
                return Status::Custom(*status);
            }
        }

        let base = request.base_calculate_status();
        tracing::debug!(status = %base, "No custom status matched, using base status");
        Status::from(base)
    }
}

/// Classify a request under the Code on Access to Information.
pub fn classify_status(request: &dyn InfoRequest, now: DateTime<Utc>) -> Status {
    CodeOnAccessClassifier::new().classify(request, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::RequestSnapshot;
    use crate::types::CheckType;
    use chrono::{TimeDelta, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 30, 12, 0, 0).unwrap()
    }

    fn request_aged(days: i64) -> RequestSnapshot {
        RequestSnapshot::new(now() - TimeDelta::days(days))
    }

    /// A host request with a hand-written base status.
    struct HostRequest {
        created_at: DateTime<Utc>,
        bodies: Vec<String>,
    }

    impl InfoRequest for HostRequest {
        fn created_at(&self) -> DateTime<Utc> {
            self.created_at
        }

        fn awaiting_response(&self) -> bool {
            true
        }

        fn message_bodies(&self) -> Vec<&str> {
            self.bodies.iter().map(String::as_str).collect()
        }

        fn base_calculate_status(&self) -> String {
            "waiting_response_overdue".to_string()
        }
    }

    #[test]
    fn test_interim_reply_received() {
        let request = request_aged(15).with_message("This is an interim reply.");
        assert_eq!(
            classify_status(&request, now()),
            Status::Custom(CustomStatus::InterimReplyReceived)
        );
    }

    #[test]
    fn test_exceeds_21_days() {
        let request = request_aged(25);
        assert_eq!(
            classify_status(&request, now()),
            Status::Custom(CustomStatus::Exceeds21Days)
        );
    }

    #[test]
    fn test_interim_reply_wins_over_exceeds() {
        // "extending" is an interim reply phrase but not an explanation,
        // so both checks trigger at 25 days
        let request = request_aged(25).with_message("We are extending the deadline.");
        let classification = CodeOnAccessClassifier::new().classify_detailed(&request, now());

        assert!(classification.findings.iter().all(|f| f.triggered));
        assert_eq!(
            classification.status,
            Status::Custom(CustomStatus::InterimReplyReceived)
        );
        assert_eq!(
            classify_status(&request, now()),
            Status::Custom(CustomStatus::InterimReplyReceived)
        );
    }

    #[test]
    fn test_falls_back_to_base_status() {
        let request = request_aged(5).with_base_status("waiting_response");
        assert_eq!(
            classify_status(&request, now()),
            Status::Base("waiting_response".to_string())
        );
    }

    #[test]
    fn test_not_awaiting_uses_base_status() {
        let request = request_aged(60).awaiting(false).with_base_status("successful");
        assert_eq!(classify_status(&request, now()), Status::Base("successful".to_string()));
    }

    #[test]
    fn test_host_request_through_trait_object() {
        let host = HostRequest {
            created_at: now() - TimeDelta::days(30),
            bodies: vec!["由於特殊情況，我們需要延長處理時間。".to_string()],
        };

        // Explained delay and "延長" is also an interim phrase
        let classifier: Box<dyn StatusClassifier> = Box::new(CodeOnAccessClassifier::new());
        assert_eq!(
            classifier.classify(&host, now()),
            Status::Custom(CustomStatus::InterimReplyReceived)
        );

        let host = HostRequest {
            created_at: now() - TimeDelta::days(30),
            bodies: vec!["Due to exceptional circumstances, a reply will follow.".to_string()],
        };
        assert_eq!(
            classifier.classify(&host, now()),
            Status::Base("waiting_response_overdue".to_string())
        );
    }

    #[test]
    fn test_detailed_reports_every_check() {
        let request = request_aged(25);
        let classification = CodeOnAccessClassifier::new().classify_detailed(&request, now());

        assert_eq!(classification.findings.len(), 2);
        assert_eq!(classification.findings[0].check, CheckType::InterimReply);
        assert!(!classification.findings[0].triggered);
        assert_eq!(classification.findings[1].check, CheckType::UnexplainedDelay);
        assert!(classification.findings[1].triggered);
        assert_eq!(classification.evaluated_at, now());
    }

    #[test]
    fn test_custom_policy() {
        let policy = DeadlinePolicy::new(10, 30, 60).unwrap();
        let classifier = CodeOnAccessClassifier::with_policy(policy);
        let request = request_aged(25);

        assert_eq!(
            classifier.classify(&request, now()),
            Status::Base("waiting_response".to_string())
        );
    }
}
