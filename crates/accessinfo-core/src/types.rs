//! Core types shared across the engine.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::evidence::Evidence;

/// Errors raised when a status code or locale is outside the known set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatusError {
    #[error("unknown status {0}")]
    UnknownStatus(String),

    #[error("unknown locale {0}")]
    UnknownLocale(String),
}

// ============================================================================
// Statuses
// ============================================================================

/// Statuses added on top of the host's base classification for the
/// Code on Access to Information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CustomStatus {
    /// Requester asked for an internal review by a senior officer
    #[serde(rename = "internal_review_pending")]
    InternalReviewPending,

    /// Complaint lodged with The Ombudsman
    #[serde(rename = "ombudsman_complaint")]
    OmbudsmanComplaint,

    /// Department sent an interim reply, final response outstanding
    #[serde(rename = "interim_reply_received")]
    InterimReplyReceived,

    /// Awaiting payment of photocopying charges
    #[serde(rename = "payment_required")]
    PaymentRequired,

    /// Past the 21-day target without an explanation
    #[serde(rename = "exceeds_21_days")]
    Exceeds21Days,

    /// Transferred between Hong Kong government departments
    #[serde(rename = "transferred_hk")]
    TransferredHk,
}

impl CustomStatus {
    /// Every custom status, in registration order.
    pub const ALL: [CustomStatus; 6] = [
        CustomStatus::InternalReviewPending,
        CustomStatus::OmbudsmanComplaint,
        CustomStatus::InterimReplyReceived,
        CustomStatus::PaymentRequired,
        CustomStatus::Exceeds21Days,
        CustomStatus::TransferredHk,
    ];

    /// The wire code for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomStatus::InternalReviewPending => "internal_review_pending",
            CustomStatus::OmbudsmanComplaint => "ombudsman_complaint",
            CustomStatus::InterimReplyReceived => "interim_reply_received",
            CustomStatus::PaymentRequired => "payment_required",
            CustomStatus::Exceeds21Days => "exceeds_21_days",
            CustomStatus::TransferredHk => "transferred_hk",
        }
    }
}

impl fmt::Display for CustomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CustomStatus {
    type Err = StatusError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        CustomStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == code)
            .ok_or_else(|| StatusError::UnknownStatus(code.to_string()))
    }
}

/// The codes of every custom status, for injection into the host's
/// status validation.
pub fn extra_states() -> [&'static str; 6] {
    CustomStatus::ALL.map(|status| status.as_str())
}

/// A classified status: either one of ours or whatever the host computed.
///
/// Serializes as the bare status code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Status {
    Custom(CustomStatus),
    Base(String),
}

impl Status {
    pub fn code(&self) -> &str {
        match self {
            Status::Custom(status) => status.as_str(),
            Status::Base(code) => code,
        }
    }

    pub fn custom(&self) -> Option<CustomStatus> {
        match self {
            Status::Custom(status) => Some(*status),
            Status::Base(_) => None,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Status::Custom(_))
    }
}

impl From<CustomStatus> for Status {
    fn from(status: CustomStatus) -> Self {
        Status::Custom(status)
    }
}

impl From<String> for Status {
    fn from(code: String) -> Self {
        match code.parse::<CustomStatus>() {
            Ok(status) => Status::Custom(status),
            Err(_) => Status::Base(code),
        }
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        status.code().to_string()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ============================================================================
// Deadlines
// ============================================================================

/// Which of the three statutory deadlines to measure against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineKind {
    /// 10 days: substantive or interim reply due
    Initial,
    /// 21 days: target for a full response
    #[default]
    Target,
    /// 51 days: ceiling in exceptional circumstances
    Maximum,
}

impl DeadlineKind {
    pub const ALL: [DeadlineKind; 3] =
        [DeadlineKind::Initial, DeadlineKind::Target, DeadlineKind::Maximum];

    /// Resolve a deadline name, falling back to `Target` for anything
    /// unrecognized.
    pub fn parse_or_target(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "initial" => DeadlineKind::Initial,
            "maximum" => DeadlineKind::Maximum,
            _ => DeadlineKind::Target,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeadlineKind::Initial => "initial",
            DeadlineKind::Target => "target",
            DeadlineKind::Maximum => "maximum",
        }
    }
}

impl fmt::Display for DeadlineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three deadlines derived from a request's creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadlineSet {
    pub initial_response: DateTime<Utc>,
    pub target_completion: DateTime<Utc>,
    pub maximum_time: DateTime<Utc>,
}

impl DeadlineSet {
    pub fn get(&self, kind: DeadlineKind) -> DateTime<Utc> {
        match kind {
            DeadlineKind::Initial => self.initial_response,
            DeadlineKind::Target => self.target_completion,
            DeadlineKind::Maximum => self.maximum_time,
        }
    }

    /// Whether `now` is strictly past the given deadline.
    pub fn exceeded(&self, kind: DeadlineKind, now: DateTime<Utc>) -> bool {
        now > self.get(kind)
    }
}

/// Elapsed-time bucket driving the deadline message and its style tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineBucket {
    Ok,
    Approaching,
    Overdue,
    SignificantlyOverdue,
}

impl DeadlineBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeadlineBucket::Ok => "ok",
            DeadlineBucket::Approaching => "approaching",
            DeadlineBucket::Overdue => "overdue",
            DeadlineBucket::SignificantlyOverdue => "significantly_overdue",
        }
    }

    /// CSS class a host view attaches to the deadline banner.
    pub fn style_tag(&self) -> &'static str {
        match self {
            DeadlineBucket::Ok => "hk-deadline-ok",
            DeadlineBucket::Approaching => "hk-deadline-approaching",
            DeadlineBucket::Overdue => "hk-deadline-overdue",
            DeadlineBucket::SignificantlyOverdue => "hk-deadline-significantly-overdue",
        }
    }

    /// The deadline a request in this bucket is being measured against.
    /// `None` once every deadline has passed.
    pub fn pending_deadline(&self) -> Option<DeadlineKind> {
        match self {
            DeadlineBucket::Ok => Some(DeadlineKind::Initial),
            DeadlineBucket::Approaching => Some(DeadlineKind::Target),
            DeadlineBucket::Overdue => Some(DeadlineKind::Maximum),
            DeadlineBucket::SignificantlyOverdue => None,
        }
    }
}

impl fmt::Display for DeadlineBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Checks
// ============================================================================

/// The keyword-driven checks run against a request's correspondence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckType {
    InterimReply,
    UnexplainedDelay,
}

impl CheckType {
    /// The question this check answers.
    pub fn question(&self) -> &'static str {
        match self {
            CheckType::InterimReply => {
                "Did the department send an interim reply and still owe a final response?"
            }
            CheckType::UnexplainedDelay => {
                "Has the 21-day target passed without the department explaining the delay?"
            }
        }
    }
}

/// What a single check observed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckFinding {
    pub check: CheckType,

    /// Whether the check's condition holds
    pub triggered: bool,

    /// Human-readable reason for the outcome
    pub rationale: String,

    /// Message spans and request fields backing the outcome
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub evidence: Vec<Evidence>,
}

/// A classification together with the findings that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub status: Status,
    pub findings: Vec<CheckFinding>,
    pub evaluated_at: DateTime<Utc>,
}
