//! Human-readable output: status labels, deadline messages, style tags,
//! state-description notices and deadline alerts.
//!
//! A built-in catalog covers English and Traditional Chinese (Hong Kong).
//! Hosts with their own catalog can take [`StatusMessage::template`] and its
//! parameters instead of the rendered text.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::deadlines::{days_elapsed, DeadlinePolicy};
use crate::types::{CustomStatus, DeadlineBucket, DeadlineKind, StatusError};

/// Output language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "en")]
    En,
    #[serde(rename = "zh-HK")]
    ZhHk,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::ZhHk => "zh-HK",
        }
    }

    /// Long date-time format used in deadline messages.
    pub fn format_long(&self, at: DateTime<Utc>) -> String {
        match self {
            Locale::En => at.format("%B %d, %Y %H:%M").to_string(),
            Locale::ZhHk => at.format("%Y年%-m月%-d日 %H:%M").to_string(),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "en" | "en-gb" | "en-hk" => Ok(Locale::En),
            "zh-hk" | "zh-hant" | "zh-hant-hk" => Ok(Locale::ZhHk),
            _ => Err(StatusError::UnknownLocale(s.to_string())),
        }
    }
}

// ============================================================================
// Status labels
// ============================================================================

impl CustomStatus {
    /// One-line label shown wherever the status is displayed.
    pub fn label(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (CustomStatus::InternalReviewPending, Locale::En) => "Internal review pending.",
            (CustomStatus::InternalReviewPending, Locale::ZhHk) => "內部覆核待處理。",
            (CustomStatus::OmbudsmanComplaint, Locale::En) => {
                "Complaint lodged with The Ombudsman."
            }
            (CustomStatus::OmbudsmanComplaint, Locale::ZhHk) => "已向申訴專員投訴。",
            (CustomStatus::InterimReplyReceived, Locale::En) => {
                "Interim reply received, awaiting final response."
            }
            (CustomStatus::InterimReplyReceived, Locale::ZhHk) => "已收到中期回覆，正等待最終回覆。",
            (CustomStatus::PaymentRequired, Locale::En) => {
                "Payment required for photocopying charges."
            }
            (CustomStatus::PaymentRequired, Locale::ZhHk) => "需要繳付影印費用。",
            (CustomStatus::Exceeds21Days, Locale::En) => "Response time exceeded 21 calendar days.",
            (CustomStatus::Exceeds21Days, Locale::ZhHk) => "回覆時間已超過21個曆日。",
            (CustomStatus::TransferredHk, Locale::En) => {
                "Transferred to another Hong Kong government department."
            }
            (CustomStatus::TransferredHk, Locale::ZhHk) => "已轉交另一香港政府部門處理。",
        }
    }

    /// Notice shown after a requester marks their request with this status.
    pub fn description(&self, locale: Locale) -> Notice {
        let level = match self {
            CustomStatus::Exceeds21Days => NoticeLevel::Warning,
            _ => NoticeLevel::Notice,
        };

        let text = match (self, locale) {
            (CustomStatus::InternalReviewPending, Locale::En) => {
                "You have requested an internal review. The department should have this reviewed by a directorate officer at least one rank senior to the officer who made the original decision."
            }
            (CustomStatus::InternalReviewPending, Locale::ZhHk) => {
                "你已要求進行內部覆核。部門應安排一名職級至少高於原決定人員一級的首長級人員進行覆核。"
            }
            (CustomStatus::OmbudsmanComplaint, Locale::En) => {
                "You have indicated that you've complained to The Ombudsman. They will investigate whether the department properly complied with the Code on Access to Information."
            }
            (CustomStatus::OmbudsmanComplaint, Locale::ZhHk) => {
                "你已表示曾向申訴專員投訴。申訴專員將調查部門有否妥善遵從《公開資料守則》。"
            }
            (CustomStatus::InterimReplyReceived, Locale::En) => {
                "The department sent an interim reply. Under the Code, they should provide the information within 21 calendar days of your original request, or up to 51 days in exceptional circumstances with explanation."
            }
            (CustomStatus::InterimReplyReceived, Locale::ZhHk) => {
                "部門已發出中期回覆。根據《守則》，部門應在你提出要求後21個曆日內提供資料；如有特殊情況並作出解釋，最多可延至51日。"
            }
            (CustomStatus::PaymentRequired, Locale::En) => {
                "The department has indicated that photocopying charges apply (HK$1.5 per A4 page, HK$1.6 per A3 page). Information will not be released until payment is made."
            }
            (CustomStatus::PaymentRequired, Locale::ZhHk) => {
                "部門表示須繳付影印費用（A4每頁港幣1.5元，A3每頁港幣1.6元）。付款後部門才會發放資料。"
            }
            (CustomStatus::Exceeds21Days, Locale::En) => {
                "This request has exceeded the 21 calendar day target response time without explanation. You may wish to send a reminder or request an internal review."
            }
            (CustomStatus::Exceeds21Days, Locale::ZhHk) => {
                "此要求已超過21個曆日的目標回覆時間而未有解釋。你可考慮發出提示或要求內部覆核。"
            }
            (CustomStatus::TransferredHk, Locale::En) => {
                "Your request has been transferred to another Hong Kong government department. The receiving department should handle your request under the Code on Access to Information."
            }
            (CustomStatus::TransferredHk, Locale::ZhHk) => {
                "你的要求已轉交另一香港政府部門。接收部門應根據《公開資料守則》處理你的要求。"
            }
        };

        Notice {
            level,
            text: text.to_string(),
        }
    }
}

/// English label for a custom status code.
///
/// Codes outside the six custom statuses are rejected rather than echoed.
pub fn display_label(code: &str) -> Result<&'static str, StatusError> {
    display_label_in(code, Locale::En)
}

pub fn display_label_in(code: &str, locale: Locale) -> Result<&'static str, StatusError> {
    let status: CustomStatus = code.parse()?;
    Ok(status.label(locale))
}

/// The notice for a requester marking their request with `code`.
pub fn describe_state(code: &str, locale: Locale) -> Result<Notice, StatusError> {
    let status: CustomStatus = code.parse()?;
    Ok(status.description(locale))
}

// ============================================================================
// Notices
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Notice,
    Warning,
}

/// A flash-style message for the host to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

/// Alert for a request that has run past its target or maximum deadline.
pub fn deadline_alert(
    policy: &DeadlinePolicy,
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
    locale: Locale,
) -> Option<Notice> {
    let deadlines = policy.deadlines(created_at);

    if deadlines.exceeded(DeadlineKind::Maximum, now) {
        let limit = policy.days(DeadlineKind::Maximum);
        let text = match locale {
            Locale::En => format!(
                "This request has exceeded the {} calendar day maximum under the Code on Access to Information.",
                limit
            ),
            Locale::ZhHk => format!("此要求已超過《公開資料守則》規定的{}個曆日上限。", limit),
        };
        Some(Notice {
            level: NoticeLevel::Warning,
            text,
        })
    } else if deadlines.exceeded(DeadlineKind::Target, now) {
        let limit = policy.days(DeadlineKind::Target);
        let text = match locale {
            Locale::En => format!(
                "This request has exceeded the {} calendar day target response time.",
                limit
            ),
            Locale::ZhHk => format!("此要求已超過{}個曆日的目標回覆時間。", limit),
        };
        Some(Notice {
            level: NoticeLevel::Notice,
            text,
        })
    } else {
        None
    }
}

// ============================================================================
// Deadline status messages
// ============================================================================

/// The deadline status message for a request, before rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub bucket: DeadlineBucket,

    /// Days left before the pending deadline; absent once all have passed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<i64>,

    /// The pending deadline itself
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,

    /// Maximum offset, quoted once every deadline has passed
    pub limit: i64,
}

impl StatusMessage {
    pub fn compute(policy: &DeadlinePolicy, created_at: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let elapsed = days_elapsed(created_at, now);
        let bucket = policy.bucket_for_days(elapsed);

        let (days, date) = match bucket.pending_deadline() {
            Some(kind) => (
                Some(policy.days(kind) - elapsed),
                Some(policy.deadline(created_at, kind)),
            ),
            None => (None, None),
        };

        Self {
            bucket,
            days,
            date,
            limit: policy.days(DeadlineKind::Maximum),
        }
    }

    /// Catalog template with `%{days}`, `%{date}` and `%{limit}` placeholders.
    pub fn template(&self, locale: Locale) -> &'static str {
        match (self.bucket, locale) {
            (DeadlineBucket::Ok, Locale::En) => {
                "Department should respond within %{days} calendar days (by %{date})"
            }
            (DeadlineBucket::Ok, Locale::ZhHk) => "部門應於%{days}個曆日內回覆（%{date}或之前）",
            (DeadlineBucket::Approaching, Locale::En) => {
                "Target response time is %{days} calendar days (by %{date})"
            }
            (DeadlineBucket::Approaching, Locale::ZhHk) => {
                "目標回覆時間為%{days}個曆日（%{date}或之前）"
            }
            (DeadlineBucket::Overdue, Locale::En) => {
                "Request overdue. Maximum time is %{days} calendar days (by %{date})"
            }
            (DeadlineBucket::Overdue, Locale::ZhHk) => {
                "要求已逾期。最長處理時間為%{days}個曆日（%{date}或之前）"
            }
            (DeadlineBucket::SignificantlyOverdue, Locale::En) => {
                "Request significantly overdue (exceeded %{limit} calendar day maximum). Consider requesting an internal review or complaining to The Ombudsman."
            }
            (DeadlineBucket::SignificantlyOverdue, Locale::ZhHk) => {
                "要求已嚴重逾期（超過%{limit}個曆日的上限）。請考慮要求內部覆核或向申訴專員投訴。"
            }
        }
    }

    pub fn render(&self, locale: Locale) -> String {
        let mut text = self
            .template(locale)
            .replace("%{limit}", &self.limit.to_string());
        if let Some(days) = self.days {
            text = text.replace("%{days}", &days.to_string());
        }
        if let Some(date) = self.date {
            text = text.replace("%{date}", &locale.format_long(date));
        }
        text
    }
}

/// English deadline status message under the Code on Access to Information.
pub fn status_message(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    StatusMessage::compute(&DeadlinePolicy::CODE_ON_ACCESS, created_at, now).render(Locale::En)
}

/// Style tag matching [`status_message`]'s bucket.
pub fn status_style_tag(created_at: DateTime<Utc>, now: DateTime<Utc>) -> &'static str {
    DeadlinePolicy::CODE_ON_ACCESS
        .bucket(created_at, now)
        .style_tag()
}
