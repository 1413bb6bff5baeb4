//! Deadline arithmetic for the Code on Access to Information.
//!
//! All offsets are calendar days (24h × N) from the request's creation time.
//! Elapsed days round down, remaining days round up, so the "days left"
//! figure a requester sees never understates how urgent a request is.
//!
//! | Deadline | Default | Meaning |
//! |----------|---------|---------|
//! | initial  | 10 days | Substantive or interim reply due |
//! | target   | 21 days | Full response expected |
//! | maximum  | 51 days | Ceiling in exceptional circumstances |

use std::fs;
use std::path::Path;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{DeadlineBucket, DeadlineKind, DeadlineSet};

const SECONDS_PER_DAY: i64 = 86_400;

/// Upper bound on any configured offset (roughly 100 years).
const MAX_OFFSET_DAYS: i64 = 36_500;

/// Errors from loading or validating a deadline policy.
#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("Failed to read policy file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("{field} must be between 1 and 36500 days, got {value}")]
    OutOfRange { field: &'static str, value: i64 },

    #[error("Deadlines must be strictly increasing: initial {initial}, target {target}, maximum {maximum}")]
    NotIncreasing { initial: i64, target: i64, maximum: i64 },
}

/// Day offsets of the three deadlines.
///
/// Defaults to the Code on Access to Information. Any field left out of a
/// policy file keeps its default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeadlinePolicy {
    pub initial_response_days: i64,
    pub target_completion_days: i64,
    pub maximum_time_days: i64,
}

impl Default for DeadlinePolicy {
    fn default() -> Self {
        Self::CODE_ON_ACCESS
    }
}

impl DeadlinePolicy {
    /// 10 / 21 / 51 calendar days.
    pub const CODE_ON_ACCESS: Self = Self {
        initial_response_days: 10,
        target_completion_days: 21,
        maximum_time_days: 51,
    };

    /// Build a policy from explicit offsets.
    pub fn new(initial: i64, target: i64, maximum: i64) -> Result<Self, PolicyError> {
        let policy = Self {
            initial_response_days: initial,
            target_completion_days: target,
            maximum_time_days: maximum,
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Parse a policy from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, PolicyError> {
        let policy: DeadlinePolicy = serde_yaml::from_str(yaml)?;
        policy.validate()?;
        Ok(policy)
    }

    /// Parse a policy from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, PolicyError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    fn validate(&self) -> Result<(), PolicyError> {
        let fields = [
            ("initial_response_days", self.initial_response_days),
            ("target_completion_days", self.target_completion_days),
            ("maximum_time_days", self.maximum_time_days),
        ];
        for (field, value) in fields {
            if !(1..=MAX_OFFSET_DAYS).contains(&value) {
                return Err(PolicyError::OutOfRange { field, value });
            }
        }

        if self.initial_response_days >= self.target_completion_days
            || self.target_completion_days >= self.maximum_time_days
        {
            return Err(PolicyError::NotIncreasing {
                initial: self.initial_response_days,
                target: self.target_completion_days,
                maximum: self.maximum_time_days,
            });
        }

        Ok(())
    }

    /// Offset of a deadline in whole days.
    pub fn days(&self, kind: DeadlineKind) -> i64 {
        match kind {
            DeadlineKind::Initial => self.initial_response_days,
            DeadlineKind::Target => self.target_completion_days,
            DeadlineKind::Maximum => self.maximum_time_days,
        }
    }

    /// Offset of a deadline as a duration.
    pub fn offset(&self, kind: DeadlineKind) -> TimeDelta {
        TimeDelta::days(self.days(kind))
    }

    /// When a deadline falls. Saturates at the edge of the representable
    /// range rather than overflowing.
    pub fn deadline(&self, created_at: DateTime<Utc>, kind: DeadlineKind) -> DateTime<Utc> {
        let offset = self.offset(kind);
        created_at.checked_add_signed(offset).unwrap_or(if offset > TimeDelta::zero() {
            DateTime::<Utc>::MAX_UTC
        } else {
            DateTime::<Utc>::MIN_UTC
        })
    }

    pub fn deadlines(&self, created_at: DateTime<Utc>) -> DeadlineSet {
        DeadlineSet {
            initial_response: self.deadline(created_at, DeadlineKind::Initial),
            target_completion: self.deadline(created_at, DeadlineKind::Target),
            maximum_time: self.deadline(created_at, DeadlineKind::Maximum),
        }
    }

    /// Whether more than `kind`'s offset has passed since `created_at`.
    pub fn elapsed_beyond(
        &self,
        created_at: DateTime<Utc>,
        now: DateTime<Utc>,
        kind: DeadlineKind,
    ) -> bool {
        now - created_at > self.offset(kind)
    }

    /// Whole days until a deadline, rounded up. Negative once overdue.
    pub fn days_until(
        &self,
        created_at: DateTime<Utc>,
        now: DateTime<Utc>,
        kind: DeadlineKind,
    ) -> i64 {
        ceil_days(self.deadline(created_at, kind) - now)
    }

    /// Bucket a whole number of elapsed days.
    pub fn bucket_for_days(&self, days_elapsed: i64) -> DeadlineBucket {
        if days_elapsed <= self.initial_response_days {
            DeadlineBucket::Ok
        } else if days_elapsed <= self.target_completion_days {
            DeadlineBucket::Approaching
        } else if days_elapsed <= self.maximum_time_days {
            DeadlineBucket::Overdue
        } else {
            DeadlineBucket::SignificantlyOverdue
        }
    }

    pub fn bucket(&self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> DeadlineBucket {
        self.bucket_for_days(days_elapsed(created_at, now))
    }
}

/// Deadlines under the Code on Access to Information.
pub fn compute_deadlines(created_at: DateTime<Utc>) -> DeadlineSet {
    DeadlinePolicy::CODE_ON_ACCESS.deadlines(created_at)
}

/// Whole calendar days since `created_at`, rounded down.
pub fn days_elapsed(created_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    floor_days(now - created_at)
}

/// Whole calendar days until the given deadline, rounded up.
pub fn days_until_deadline(
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
    kind: DeadlineKind,
) -> i64 {
    DeadlinePolicy::CODE_ON_ACCESS.days_until(created_at, now, kind)
}

pub fn deadline_bucket(created_at: DateTime<Utc>, now: DateTime<Utc>) -> DeadlineBucket {
    DeadlinePolicy::CODE_ON_ACCESS.bucket(created_at, now)
}

/// Whether `now` is strictly past the given deadline.
pub fn exceeded_deadline(
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
    kind: DeadlineKind,
) -> bool {
    compute_deadlines(created_at).exceeded(kind, now)
}

// `TimeDelta` keeps whole seconds truncated toward zero plus a same-signed
// nanosecond remainder; round the seconds first, then divide.

fn floor_days(delta: TimeDelta) -> i64 {
    let mut secs = delta.num_seconds();
    if delta.subsec_nanos() < 0 {
        secs -= 1;
    }
    secs.div_euclid(SECONDS_PER_DAY)
}

fn ceil_days(delta: TimeDelta) -> i64 {
    let mut secs = delta.num_seconds();
    if delta.subsec_nanos() > 0 {
        secs += 1;
    }
    -(-secs).div_euclid(SECONDS_PER_DAY)
}
