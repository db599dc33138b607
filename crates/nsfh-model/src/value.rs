//! Normalized raw field values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Why a raw field carries no usable value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason", content = "code")]
pub enum MissingReason {
    /// Empty cell or a lone `.`.
    Blank,
    /// A wave-specific missing/refused/inapplicable code.
    Sentinel(i64),
    /// Text that is not an integer.
    Unparseable,
    /// The instrument has no such column.
    Absent,
    /// A negative value where a count was expected.
    Negative(i64),
}

impl fmt::Display for MissingReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingReason::Blank => f.write_str("blank"),
            MissingReason::Sentinel(code) => write!(f, "sentinel({code})"),
            MissingReason::Unparseable => f.write_str("unparseable"),
            MissingReason::Absent => f.write_str("absent"),
            MissingReason::Negative(value) => write!(f, "negative({value})"),
        }
    }
}

/// A raw field after sentinel normalization.
///
/// `Missing` never converts to a number; every accessor returns `Option`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldValue {
    Present(i64),
    Missing(MissingReason),
}

impl FieldValue {
    pub fn value(self) -> Option<i64> {
        match self {
            FieldValue::Present(v) => Some(v),
            FieldValue::Missing(_) => None,
        }
    }

    pub fn is_missing(self) -> bool {
        matches!(self, FieldValue::Missing(_))
    }

    pub fn missing_reason(self) -> Option<MissingReason> {
        match self {
            FieldValue::Present(_) => None,
            FieldValue::Missing(reason) => Some(reason),
        }
    }

    /// Non-negative count, or `None` when missing or negative.
    pub fn count(self) -> Option<u32> {
        self.value().and_then(|v| u32::try_from(v).ok())
    }

    /// The same value read as a count: negatives become missing.
    pub fn as_count(self) -> FieldValue {
        match self {
            FieldValue::Present(v) if v < 0 => FieldValue::Missing(MissingReason::Negative(v)),
            other => other,
        }
    }

    /// `Some(true)` when the value equals `code`, `None` when missing.
    pub fn equals(self, code: i64) -> Option<bool> {
        self.value().map(|v| v == code)
    }

    /// `Some(value >= threshold)`, `None` when missing.
    pub fn at_least(self, threshold: i64) -> Option<bool> {
        self.value().map(|v| v >= threshold)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Present(v) => write!(f, "{v}"),
            FieldValue::Missing(reason) => write!(f, "missing:{reason}"),
        }
    }
}
