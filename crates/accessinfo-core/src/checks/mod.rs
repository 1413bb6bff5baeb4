//! Keyword-driven checks over a request's correspondence.
//!
//! Each check answers one question about a request at a point in time:
//!
//! | Check | Triggers when |
//! |-------|---------------|
//! | [`InterimReplyCheck`] | past the initial deadline with an interim reply |
//! | [`UnexplainedDelayCheck`] | past the target deadline, delay unexplained |
//!
//! Both apply only while the request is awaiting a response.
//!
//! Checks are pure: the same request and `now` always produce the same
//! finding.

mod interim_reply;
pub mod keywords;
mod unexplained_delay;

pub use interim_reply::{has_unresolved_interim_reply, InterimReplyCheck};
pub use unexplained_delay::{exceeds_target_without_explanation, UnexplainedDelayCheck};

use chrono::{DateTime, Utc};

use crate::request::InfoRequest;
use crate::types::{CheckFinding, CheckType};

/// Trait implemented by every check.
pub trait Check: Send + Sync {
    /// Which check this is.
    fn check_type(&self) -> CheckType;

    /// The question this check answers.
    fn question(&self) -> &'static str {
        self.check_type().question()
    }

    /// Evaluate the check against a request at `now`.
    fn evaluate(&self, request: &dyn InfoRequest, now: DateTime<Utc>) -> CheckFinding;
}

/// A finding for a check whose preconditions did not hold.
pub(crate) fn not_triggered(check: CheckType, rationale: impl Into<String>) -> CheckFinding {
    CheckFinding {
        check,
        triggered: false,
        rationale: rationale.into(),
        evidence: vec![],
    }
}
