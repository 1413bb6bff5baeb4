//! Unexplained Delay Check
//!
//! **Question**: Has the 21-day target passed without the department
//! explaining the delay?
//!
//! A request qualifies when it is still awaiting a response, is strictly
//! older than the target offset, and no incoming message mentions an
//! extension, exceptional circumstances or needing more time.

use chrono::{DateTime, Utc};

use crate::deadlines::{days_elapsed, DeadlinePolicy};
use crate::evidence::Evidence;
use crate::request::InfoRequest;
use crate::types::{CheckFinding, CheckType, DeadlineKind};

use super::keywords::find_explanation;
use super::{not_triggered, Check};

/// The unexplained delay check.
pub struct UnexplainedDelayCheck {
    policy: DeadlinePolicy,
}

impl UnexplainedDelayCheck {
    pub fn new() -> Self {
        Self::with_policy(DeadlinePolicy::default())
    }

    pub fn with_policy(policy: DeadlinePolicy) -> Self {
        Self { policy }
    }
}

impl Default for UnexplainedDelayCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for UnexplainedDelayCheck {
    fn check_type(&self) -> CheckType {
        CheckType::UnexplainedDelay
    }

    fn evaluate(&self, request: &dyn InfoRequest, now: DateTime<Utc>) -> CheckFinding {
        if !request.awaiting_response() {
            return not_triggered(self.check_type(), "Request is not awaiting a response");
        }

        let created_at = request.created_at();
        let target = self.policy.days(DeadlineKind::Target);
        if !self.policy.elapsed_beyond(created_at, now, DeadlineKind::Target) {
            return not_triggered(
                self.check_type(),
                format!("Request is not yet past the {} day target", target),
            );
        }

        // The first explanation is enough to clear the request
        let explanation = request
            .message_bodies()
            .iter()
            .enumerate()
            .find_map(|(index, body)| {
                find_explanation(body).first().map(|&(start, end)| {
                    Evidence::from_message(
                        format!("Delay explained: \"{}\"", &body[start..end]),
                        index,
                        start,
                        end,
                    )
                })
            });

        let elapsed = Evidence::from_request(
            format!("{} days elapsed", days_elapsed(created_at, now)),
            "created_at",
        );

        match explanation {
            Some(evidence) => {
                tracing::trace!(pointer = %evidence.pointer, "Delay past target was explained");
                CheckFinding {
                    check: self.check_type(),
                    triggered: false,
                    rationale: format!(
                        "Past the {} day target, but the department explained the delay",
                        target
                    ),
                    evidence: vec![evidence, elapsed],
                }
            }
            None => CheckFinding {
                check: self.check_type(),
                triggered: true,
                rationale: format!("Past the {} day target with no explanation given", target),
                evidence: vec![elapsed],
            },
        }
    }
}

/// Whether the request is past the target deadline with no explanation.
pub fn exceeds_target_without_explanation(request: &dyn InfoRequest, now: DateTime<Utc>) -> bool {
    UnexplainedDelayCheck::new().evaluate(request, now).triggered
}
