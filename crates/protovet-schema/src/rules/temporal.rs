use crate::{MAX_DURATION_SECONDS, MAX_TIMESTAMP_SECONDS, MIN_TIMESTAMP_SECONDS, prelude::*};
use std::fmt::{self, Display};
use thiserror::Error as ThisError;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

const NANOS_PER_SECOND: i32 = 1_000_000_000;

///
/// TemporalError
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, ThisError)]
pub enum TemporalError {
    #[error("nanos ({0}) out of range")]
    NanosOutOfRange(i32),

    #[error("seconds ({0}) out of range")]
    SecondsOutOfRange(i64),

    #[error("seconds and nanos must share a sign")]
    SignMismatch,
}

///
/// DurationValue
/// a `google.protobuf.Duration` literal
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DurationValue {
    pub seconds: i64,
    pub nanos: i32,
}

impl DurationValue {
    #[must_use]
    pub const fn new(seconds: i64, nanos: i32) -> Self {
        Self { seconds, nanos }
    }

    /// Validate the literal and flatten it to signed nanoseconds.
    pub fn total_nanos(self) -> Result<i128, TemporalError> {
        if self.seconds.unsigned_abs() > MAX_DURATION_SECONDS.unsigned_abs() {
            return Err(TemporalError::SecondsOutOfRange(self.seconds));
        }
        if self.nanos.unsigned_abs() >= NANOS_PER_SECOND.unsigned_abs() {
            return Err(TemporalError::NanosOutOfRange(self.nanos));
        }
        if (self.seconds > 0 && self.nanos < 0) || (self.seconds < 0 && self.nanos > 0) {
            return Err(TemporalError::SignMismatch);
        }

        Ok(i128::from(self.seconds) * i128::from(NANOS_PER_SECOND) + i128::from(self.nanos))
    }
}

impl Display for DurationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nanos == 0 {
            write!(f, "{}s", self.seconds)
        } else {
            write!(f, "{}s{}ns", self.seconds, self.nanos)
        }
    }
}

///
/// TimestampValue
/// a `google.protobuf.Timestamp` literal
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimestampValue {
    pub seconds: i64,
    pub nanos: i32,
}

impl TimestampValue {
    #[must_use]
    pub const fn new(seconds: i64, nanos: i32) -> Self {
        Self { seconds, nanos }
    }

    /// Validate the literal and flatten it to nanoseconds since the epoch.
    pub fn unix_nanos(self) -> Result<i128, TemporalError> {
        if !(MIN_TIMESTAMP_SECONDS..=MAX_TIMESTAMP_SECONDS).contains(&self.seconds) {
            return Err(TemporalError::SecondsOutOfRange(self.seconds));
        }
        if !(0..NANOS_PER_SECOND).contains(&self.nanos) {
            return Err(TemporalError::NanosOutOfRange(self.nanos));
        }

        Ok(i128::from(self.seconds) * i128::from(NANOS_PER_SECOND) + i128::from(self.nanos))
    }

    pub fn datetime(self) -> Result<OffsetDateTime, TemporalError> {
        let nanos = self.unix_nanos()?;

        OffsetDateTime::from_unix_timestamp_nanos(nanos)
            .map_err(|_| TemporalError::SecondsOutOfRange(self.seconds))
    }
}

impl Display for TimestampValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.datetime().ok().and_then(|dt| dt.format(&Rfc3339).ok()) {
            Some(text) => f.write_str(&text),
            None => write!(f, "{}s{}ns", self.seconds, self.nanos),
        }
    }
}

///
/// AnyRules
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AnyRules {
    #[serde(default)]
    pub rules: Vec<AnyRule>,
}

///
/// AnyRule
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnyRule {
    pub required: bool,

    #[serde(rename = "in", skip_serializing_if = "Vec::is_empty")]
    pub in_set: Vec<String>,

    #[serde(rename = "not_in", skip_serializing_if = "Vec::is_empty")]
    pub not_in_set: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorSpec>,
}

///
/// DurationRules
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DurationRules {
    #[serde(default)]
    pub rules: Vec<DurationRule>,
}

///
/// DurationRule
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DurationRule {
    pub required: bool,

    #[serde(rename = "const", skip_serializing_if = "Option::is_none")]
    pub constant: Option<DurationValue>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lt: Option<DurationValue>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lte: Option<DurationValue>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gt: Option<DurationValue>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gte: Option<DurationValue>,

    #[serde(rename = "in", skip_serializing_if = "Vec::is_empty")]
    pub in_set: Vec<DurationValue>,

    #[serde(rename = "not_in", skip_serializing_if = "Vec::is_empty")]
    pub not_in_set: Vec<DurationValue>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorSpec>,
}

///
/// TimestampRules
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TimestampRules {
    #[serde(default)]
    pub rules: Vec<TimestampRule>,
}

///
/// TimestampRule
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimestampRule {
    pub required: bool,

    #[serde(rename = "const", skip_serializing_if = "Option::is_none")]
    pub constant: Option<TimestampValue>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lt: Option<TimestampValue>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lte: Option<TimestampValue>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gt: Option<TimestampValue>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gte: Option<TimestampValue>,

    pub lt_now: bool,

    pub gt_now: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub within: Option<DurationValue>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorSpec>,
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_nanos_flatten() {
        assert_eq!(DurationValue::new(2, 500).total_nanos(), Ok(2_000_000_500));
        assert_eq!(DurationValue::new(-1, -1).total_nanos(), Ok(-1_000_000_001));
        assert_eq!(DurationValue::new(0, -5).total_nanos(), Ok(-5));
    }

    #[test]
    fn malformed_durations_are_rejected() {
        assert_eq!(
            DurationValue::new(1, -1).total_nanos(),
            Err(TemporalError::SignMismatch)
        );
        assert_eq!(
            DurationValue::new(0, 1_000_000_000).total_nanos(),
            Err(TemporalError::NanosOutOfRange(1_000_000_000))
        );
        assert_eq!(
            DurationValue::new(MAX_DURATION_SECONDS + 1, 0).total_nanos(),
            Err(TemporalError::SecondsOutOfRange(MAX_DURATION_SECONDS + 1))
        );
    }

    #[test]
    fn timestamps_are_bounded() {
        assert!(TimestampValue::new(MIN_TIMESTAMP_SECONDS, 0).unix_nanos().is_ok());
        assert!(TimestampValue::new(MAX_TIMESTAMP_SECONDS, 999_999_999).unix_nanos().is_ok());
        assert_eq!(
            TimestampValue::new(MAX_TIMESTAMP_SECONDS + 1, 0).unix_nanos(),
            Err(TemporalError::SecondsOutOfRange(MAX_TIMESTAMP_SECONDS + 1))
        );
        assert_eq!(
            TimestampValue::new(0, -1).unix_nanos(),
            Err(TemporalError::NanosOutOfRange(-1))
        );
    }

    #[test]
    fn timestamps_display_as_rfc3339() {
        assert_eq!(TimestampValue::new(0, 0).to_string(), "1970-01-01T00:00:00Z");
        assert_eq!(DurationValue::new(90, 0).to_string(), "90s");
    }
}
