//! Sentinel-code normalization.
//!
//! Survey extracts encode "don't know", "refused" and "inapplicable" as
//! numeric codes. Those codes become [`FieldValue::Missing`] here, before any
//! derivation reads them, so they can never be counted as real values.

use std::collections::{BTreeMap, BTreeSet};

use nsfh_model::{FieldValue, MissingReason, Wave};

use super::numeric::{is_blank, parse_integral};

/// Missing-value codes shared by every Wave 2 field.
pub const COMMON_MISSING_CODES: [i64; 15] = [
    7, 8, 9, 97, 98, 99, 997, 998, 999, 9997, 9998, 9999, 99997, 99998, 99999,
];

/// Lifetime marriage count missing code in Wave 1.
pub const WAVE1_MARRIAGE_MISSING: i64 = 99;

/// Codes that mean "no value" for one field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SentinelSet {
    codes: BTreeSet<i64>,
}

impl SentinelSet {
    pub fn new(codes: impl IntoIterator<Item = i64>) -> Self {
        Self {
            codes: codes.into_iter().collect(),
        }
    }

    pub fn contains(&self, value: i64) -> bool {
        self.codes.contains(&value)
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn codes(&self) -> impl Iterator<Item = i64> + '_ {
        self.codes.iter().copied()
    }
}

/// Normalizes one raw cell against a sentinel set.
///
/// `None` means the extract has no such column.
pub fn normalize_value(raw: Option<&str>, sentinels: &SentinelSet) -> FieldValue {
    let Some(raw) = raw else {
        return FieldValue::Missing(MissingReason::Absent);
    };
    if is_blank(raw) {
        return FieldValue::Missing(MissingReason::Blank);
    }
    match parse_integral(raw) {
        Some(value) if sentinels.contains(value) => {
            FieldValue::Missing(MissingReason::Sentinel(value))
        }
        Some(value) => FieldValue::Present(value),
        None => FieldValue::Missing(MissingReason::Unparseable),
    }
}

/// Per-field sentinel sets for one instrument.
///
/// Fields are looked up by canonical name, case-insensitively; fields without
/// an entry use the default set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SentinelNormalizer {
    fields: BTreeMap<String, SentinelSet>,
    default: SentinelSet,
}

impl SentinelNormalizer {
    pub fn new(default: SentinelSet) -> Self {
        Self {
            fields: BTreeMap::new(),
            default,
        }
    }

    #[must_use]
    pub fn with_field(mut self, field: &str, set: SentinelSet) -> Self {
        self.fields.insert(field.to_ascii_uppercase(), set);
        self
    }

    /// Sentinel tables of each NSFH instrument.
    pub fn for_wave(wave: Wave) -> Self {
        match wave {
            Wave::Wave1 => Self::default()
                .with_field("M95", SentinelSet::new([WAVE1_MARRIAGE_MISSING])),
            Wave::Wave2 => Self::new(SentinelSet::new(COMMON_MISSING_CODES)),
            Wave::Wave3 => Self::default(),
        }
    }

    pub fn set_for(&self, field: &str) -> &SentinelSet {
        self.fields
            .get(&field.to_ascii_uppercase())
            .unwrap_or(&self.default)
    }

    pub fn normalize(&self, field: &str, raw: Option<&str>) -> FieldValue {
        normalize_value(raw, self.set_for(field))
    }
}
