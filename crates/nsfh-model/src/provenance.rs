#![deny(unsafe_code)]

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::fault::ReasonCode;
use crate::record::AnalyticRecord;
use crate::value::FieldValue;
use crate::wave::Wave;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceRef {
    /// File name (or other stable identifier) of the extract.
    pub source: String,
    /// Record number within the parsed input (1-based, excluding header).
    pub record: u64,
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source, self.record)
    }
}

/// One raw field consulted while deriving a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditField {
    /// Canonical instrument variable name (e.g. `M95`).
    pub field: String,
    /// Column the value was read from, when the extract has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    /// Raw cell text as read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    pub value: FieldValue,
}

/// Non-fatal flags attached to a derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivationNote {
    /// Wave 2 counts cover unions since the prior wave, combined with the
    /// ever-married/cohabited flags.
    SincePriorWaveCounts,
    /// Marriage count rebuilt from marital status and married-before.
    MaritalStatusMarriageCount,
    /// Cohabitation taken from a current-status field, not lifetime occurrence.
    CurrentCohabitationStatus,
    /// No cohabitation source in the extract.
    CohabitationUnavailable,
    /// Age computed from date of birth and interview date.
    AgeFromDates,
    /// Ever married with no married-before answer; counted as one marriage.
    MarriedBeforeAssumedFirst,
    /// Birth year outside the primary bin set.
    CohortOutOfRange,
}

impl DerivationNote {
    pub fn code(self) -> &'static str {
        match self {
            DerivationNote::SincePriorWaveCounts => "since_prior_wave_counts",
            DerivationNote::MaritalStatusMarriageCount => "marital_status_marriage_count",
            DerivationNote::CurrentCohabitationStatus => "current_cohabitation_status",
            DerivationNote::CohabitationUnavailable => "cohabitation_unavailable",
            DerivationNote::AgeFromDates => "age_from_dates",
            DerivationNote::MarriedBeforeAssumedFirst => "married_before_assumed_first",
            DerivationNote::CohortOutOfRange => "cohort_out_of_range",
        }
    }
}

/// Respondent outcome recorded in the provenance export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    Included,
    Excluded(ReasonCode),
}

impl RecordStatus {
    pub fn label(self) -> &'static str {
        match self {
            RecordStatus::Included => "included",
            RecordStatus::Excluded(reason) => reason.code(),
        }
    }
}

/// Audit row for one respondent, kept for the full population.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvenanceRecord {
    pub wave: Wave,
    pub respondent_id: String,
    pub source: SourceRef,
    pub status: RecordStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<AnalyticRecord>,
    pub notes: Vec<DerivationNote>,
    pub audit: Vec<AuditField>,
}

impl ProvenanceRecord {
    pub fn is_included(&self) -> bool {
        matches!(self.status, RecordStatus::Included)
    }

    pub fn audit_field(&self, field: &str) -> Option<&AuditField> {
        self.audit
            .iter()
            .find(|entry| entry.field.eq_ignore_ascii_case(field))
    }

    pub fn notes_label(&self) -> String {
        self.notes
            .iter()
            .copied()
            .map(DerivationNote::code)
            .collect::<Vec<_>>()
            .join(";")
    }
}
