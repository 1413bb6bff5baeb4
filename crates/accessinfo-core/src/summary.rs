//! Deadline summary shown on a request page while it awaits a response.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::deadlines::{days_elapsed, DeadlinePolicy};
use crate::display::{deadline_alert, Locale, Notice, StatusMessage};
use crate::request::InfoRequest;
use crate::types::{DeadlineBucket, DeadlineKind, DeadlineSet};

/// Everything a host view needs to render the deadline banner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeadlineSummary {
    pub deadlines: DeadlineSet,
    pub days_elapsed: i64,
    pub days_until_target: i64,
    pub bucket: DeadlineBucket,
    pub style_tag: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert: Option<Notice>,
}

impl DeadlineSummary {
    /// Summarize a request, or `None` if it is no longer awaiting a response.
    pub fn for_request(
        request: &dyn InfoRequest,
        now: DateTime<Utc>,
        locale: Locale,
        policy: &DeadlinePolicy,
    ) -> Option<Self> {
        if !request.awaiting_response() {
            return None;
        }

        let created_at = request.created_at();
        let message = StatusMessage::compute(policy, created_at, now);

        Some(Self {
            deadlines: policy.deadlines(created_at),
            days_elapsed: days_elapsed(created_at, now),
            days_until_target: policy.days_until(created_at, now, DeadlineKind::Target),
            bucket: message.bucket,
            style_tag: message.bucket.style_tag().to_string(),
            message: message.render(locale),
            alert: deadline_alert(policy, created_at, now, locale),
        })
    }
}
