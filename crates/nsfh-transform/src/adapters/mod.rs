//! Wave adapters.
//!
//! Each NSFH instrument names its variables differently and measures
//! partnership history differently. A [`WaveAdapter`] maps one instrument's
//! raw record onto the common [`PartnershipRecord`], recording every raw field
//! it consulted and any derivation caveats.
//!
//! # Architecture
//!
//! Adapters are bound to an extract's header row with [`bind_adapter`]. Binding
//! resolves each canonical field against its alias list once, so a missing
//! required column fails the run before any respondent is read.

mod wave1;
mod wave2;
mod wave3;

use nsfh_ingest::{RawRecord, require_column, resolve_column};
use nsfh_model::{
    AuditField, DerivationNote, FieldValue, PartnershipRecord, ReasonCode, Sex, SourceRef, Wave,
};

use crate::error::Result;
use crate::normalization::SentinelNormalizer;

pub use wave1::Wave1Adapter;
pub use wave2::Wave2Adapter;
pub use wave3::Wave3Adapter;

/// Respondent key candidates for joined extracts, main and roster alike.
pub const MERGE_KEY_CANDIDATES: &[&str] = &["CASENUM", "CASEID"];

/// Adapter output for one respondent.
#[derive(Debug, Clone)]
pub struct Harmonized {
    pub respondent_id: String,
    pub source: SourceRef,
    pub audit: Vec<AuditField>,
    pub notes: Vec<DerivationNote>,
    /// The partnership record, or why sex or age could not be determined.
    pub outcome: std::result::Result<PartnershipRecord, ReasonCode>,
}

/// Maps one instrument's raw records onto [`PartnershipRecord`].
pub trait WaveAdapter: Send + Sync {
    fn wave(&self) -> Wave;

    fn description(&self) -> &'static str {
        "Wave adapter"
    }

    /// Canonical names of the raw fields audited for every respondent.
    fn audit_fields(&self) -> &'static [&'static str];

    fn adapt(&self, record: &RawRecord<'_>, sentinels: &SentinelNormalizer) -> Harmonized;
}

/// Binds the adapter for `wave` to an extract's headers.
pub fn bind_adapter(
    wave: Wave,
    headers: &[String],
    source_name: &str,
) -> Result<Box<dyn WaveAdapter>> {
    let adapter: Box<dyn WaveAdapter> = match wave {
        Wave::Wave1 => Box::new(Wave1Adapter::bind(headers, source_name)?),
        Wave::Wave2 => Box::new(Wave2Adapter::bind(headers, source_name)?),
        Wave::Wave3 => Box::new(Wave3Adapter::bind(headers, source_name)?),
    };
    Ok(adapter)
}

/// A canonical field and the extract column it resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundField {
    field: &'static str,
    column: Option<String>,
}

impl BoundField {
    pub fn required(
        headers: &[String],
        field: &'static str,
        candidates: &[&str],
        source_name: &str,
    ) -> Result<Self> {
        let column = require_column(headers, field, candidates, source_name)?;
        Ok(Self {
            field,
            column: Some(column),
        })
    }

    pub fn optional(headers: &[String], field: &'static str, candidates: &[&str]) -> Self {
        Self {
            field,
            column: resolve_column(headers, candidates),
        }
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    pub fn is_bound(&self) -> bool {
        self.column.is_some()
    }
}

/// Reads bound fields from one record, keeping an audit entry per read.
pub(crate) struct FieldReader<'r, 'a> {
    record: &'r RawRecord<'a>,
    sentinels: &'r SentinelNormalizer,
    audit: Vec<AuditField>,
}

impl<'r, 'a> FieldReader<'r, 'a> {
    pub(crate) fn new(record: &'r RawRecord<'a>, sentinels: &'r SentinelNormalizer) -> Self {
        Self {
            record,
            sentinels,
            audit: Vec::new(),
        }
    }

    pub(crate) fn read(&mut self, binding: &BoundField) -> FieldValue {
        self.read_with(binding, std::convert::identity)
    }

    /// Reads a count field; a negative value is recorded as missing.
    pub(crate) fn read_count(&mut self, binding: &BoundField) -> FieldValue {
        self.read_with(binding, FieldValue::as_count)
    }

    fn read_with(
        &mut self,
        binding: &BoundField,
        map: fn(FieldValue) -> FieldValue,
    ) -> FieldValue {
        let raw = binding.column().and_then(|column| self.record.get(column));
        let value = map(self.sentinels.normalize(binding.field(), raw));
        self.audit.push(AuditField {
            field: binding.field().to_string(),
            column: binding.column.clone(),
            raw: raw.map(str::to_string),
            value,
        });
        value
    }

    pub(crate) fn finish(self) -> Vec<AuditField> {
        self.audit
    }
}

/// Respondent id from the id column, falling back to the source row.
pub(crate) fn respondent_id(record: &RawRecord<'_>, id: &BoundField) -> String {
    id.column()
        .and_then(|column| record.get(column))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map_or_else(
            || format!("row-{}", record.source().record),
            str::to_string,
        )
}

/// Age and sex, or the reason the respondent cannot be placed.
pub(crate) fn identity(
    age: Option<i32>,
    sex: FieldValue,
) -> std::result::Result<(i32, Sex), ReasonCode> {
    let age = age.filter(|age| *age >= 0).ok_or(ReasonCode::MissingAge)?;
    let sex = sex
        .value()
        .and_then(Sex::from_code)
        .ok_or(ReasonCode::MissingSex)?;
    Ok((age, sex))
}

/// Age from a directly reported value.
pub(crate) fn reported_age(value: FieldValue) -> Option<i32> {
    value.value().and_then(|age| i32::try_from(age).ok())
}

/// `Some(true)` if either source says yes, `None` only if both are missing.
pub(crate) fn either(first: Option<bool>, second: Option<bool>) -> Option<bool> {
    match (first, second) {
        (Some(true), _) | (_, Some(true)) => Some(true),
        (None, None) => None,
        _ => Some(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn either_is_missing_only_when_both_missing() {
        assert_eq!(either(None, None), None);
        assert_eq!(either(Some(false), None), Some(false));
        assert_eq!(either(None, Some(true)), Some(true));
        assert_eq!(either(Some(false), Some(false)), Some(false));
    }

    #[test]
    fn identity_checks_age_before_sex() {
        let missing = FieldValue::Missing(nsfh_model::MissingReason::Blank);
        assert_eq!(identity(None, missing), Err(ReasonCode::MissingAge));
        assert_eq!(identity(Some(30), missing), Err(ReasonCode::MissingSex));
        assert_eq!(
            identity(Some(30), FieldValue::Present(3)),
            Err(ReasonCode::MissingSex)
        );
        assert_eq!(
            identity(Some(30), FieldValue::Present(2)),
            Ok((30, Sex::Female))
        );
    }
}
