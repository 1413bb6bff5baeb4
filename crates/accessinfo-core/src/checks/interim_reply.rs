//! Interim Reply Check
//!
//! **Question**: Did the department send an interim reply and still owe a
//! final response?
//!
//! Every message body is scanned; the request qualifies once any of them
//! reads as an interim reply and the request as a whole is older than the
//! initial-response offset. The age is measured at `now`, not at the time
//! the interim message arrived.

use chrono::{DateTime, Utc};

use crate::deadlines::{days_elapsed, DeadlinePolicy};
use crate::evidence::Evidence;
use crate::request::InfoRequest;
use crate::types::{CheckFinding, CheckType, DeadlineKind};

use super::keywords::find_interim_reply;
use super::{not_triggered, Check};

/// The interim reply check.
pub struct InterimReplyCheck {
    policy: DeadlinePolicy,
}

impl InterimReplyCheck {
    pub fn new() -> Self {
        Self::with_policy(DeadlinePolicy::default())
    }

    pub fn with_policy(policy: DeadlinePolicy) -> Self {
        Self { policy }
    }
}

impl Default for InterimReplyCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for InterimReplyCheck {
    fn check_type(&self) -> CheckType {
        CheckType::InterimReply
    }

    fn evaluate(&self, request: &dyn InfoRequest, now: DateTime<Utc>) -> CheckFinding {
        if !request.awaiting_response() {
            return not_triggered(self.check_type(), "Request is not awaiting a response");
        }

        let evidence: Vec<Evidence> = request
            .message_bodies()
            .iter()
            .enumerate()
            .flat_map(|(index, body)| {
                find_interim_reply(body).into_iter().map(move |(start, end)| {
                    Evidence::from_message(
                        format!("Interim reply phrase \"{}\"", &body[start..end]),
                        index,
                        start,
                        end,
                    )
                })
            })
            .collect();

        if evidence.is_empty() {
            return not_triggered(self.check_type(), "No message reads as an interim reply");
        }

        let created_at = request.created_at();
        let threshold = self.policy.days(DeadlineKind::Initial);
        if !self.policy.elapsed_beyond(created_at, now, DeadlineKind::Initial) {
            tracing::trace!(
                matches = evidence.len(),
                threshold,
                "Interim reply found but initial deadline not yet passed"
            );
            return CheckFinding {
                check: self.check_type(),
                triggered: false,
                rationale: format!(
                    "Interim reply found, but the request is not yet past {} days",
                    threshold
                ),
                evidence,
            };
        }

        let mut evidence = evidence;
        evidence.push(Evidence::from_request(
            format!("{} days elapsed", days_elapsed(created_at, now)),
            "created_at",
        ));

        CheckFinding {
            check: self.check_type(),
            triggered: true,
            rationale: format!(
                "Interim reply received and the request is past {} days without a final response",
                threshold
            ),
            evidence,
        }
    }
}

/// Whether the request has an interim reply but no final response yet.
pub fn has_unresolved_interim_reply(request: &dyn InfoRequest, now: DateTime<Utc>) -> bool {
    InterimReplyCheck::new().evaluate(request, now).triggered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::RequestSnapshot;
    use chrono::{TimeDelta, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 30, 12, 0, 0).unwrap()
    }

    fn request_aged(days: i64, body: &str) -> RequestSnapshot {
        RequestSnapshot::new(now() - TimeDelta::days(days)).with_message(body)
    }

    #[test]
    fn test_english_keywords_after_fifteen_days() {
        for body in [
            "This is an interim reply. We need more time.",
            "We need more time to process your request.",
            "We are extending the deadline for your request.",
            "ADDITIONAL TIME is required.",
        ] {
            let request = request_aged(15, body);
            assert!(has_unresolved_interim_reply(&request, now()), "{body}");
        }
    }

    #[test]
    fn test_chinese_keywords_after_fifteen_days() {
        for body in [
            "這是中期回覆。我們需要更多時間。",
            "我們需要更多時間處理你的要求。",
            "我們正在延長你的要求的截止日期。",
            "我們需要額外時間。",
        ] {
            let request = request_aged(15, body);
            assert!(has_unresolved_interim_reply(&request, now()), "{body}");
        }
    }

    #[test]
    fn test_regular_message_not_flagged() {
        let request = request_aged(15, "Here is the information you requested.");
        assert!(!has_unresolved_interim_reply(&request, now()));
    }

    #[test]
    fn test_within_first_ten_days_not_flagged() {
        let request = request_aged(5, "This is an interim reply.");
        let finding = InterimReplyCheck::new().evaluate(&request, now());

        assert!(!finding.triggered);
        // The phrase is still reported
        assert_eq!(finding.evidence.len(), 1);
    }

    #[test]
    fn test_exactly_ten_days_not_flagged() {
        let request = request_aged(10, "This is an interim reply.");
        assert!(!has_unresolved_interim_reply(&request, now()));

        let request = RequestSnapshot::new(now() - TimeDelta::days(10) - TimeDelta::seconds(1))
            .with_message("This is an interim reply.");
        assert!(has_unresolved_interim_reply(&request, now()));
    }

    #[test]
    fn test_not_awaiting_response() {
        let request = request_aged(15, "This is an interim reply.").awaiting(false);
        assert!(!has_unresolved_interim_reply(&request, now()));
    }

    #[test]
    fn test_no_messages() {
        let request = RequestSnapshot::new(now() - TimeDelta::days(30));
        assert!(!has_unresolved_interim_reply(&request, now()));
    }

    #[test]
    fn test_any_message_qualifies() {
        let request = RequestSnapshot::new(now() - TimeDelta::days(15))
            .with_message("Acknowledged, reference ABC/123.")
            .with_message("Interim reply: we are still collating records.")
            .with_message("Thank you.");

        let finding = InterimReplyCheck::new().evaluate(&request, now());
        assert!(finding.triggered);
        assert!(finding.evidence[0].pointer.starts_with("incoming_messages[1]"));
        assert_eq!(finding.evidence.last().unwrap().pointer, "created_at");
    }

    #[test]
    fn test_custom_policy_threshold() {
        let policy = DeadlinePolicy::new(14, 28, 56).unwrap();
        let check = InterimReplyCheck::with_policy(policy);
        let request = request_aged(12, "This is an interim reply.");

        assert!(!check.evaluate(&request, now()).triggered);
        assert!(InterimReplyCheck::new().evaluate(&request, now()).triggered);
    }
}
