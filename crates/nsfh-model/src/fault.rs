//! Per-record fault codes and run-level fault counters.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Fault taxonomy for record-level anomalies. Run-level faults are errors,
/// not values of this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    /// A field normalized to missing; the record continues.
    MissingValue,
    /// Sex or age underivable; the record leaves the analytic set.
    Identity,
    /// Non 1:1 key match across extracts.
    JoinCardinality,
    /// Birth year outside every primary bin.
    CohortBoundary,
}

/// Why a respondent was excluded from the analytic set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    MissingAge,
    MissingSex,
    JoinUnmatched,
    JoinDuplicate,
}

impl ReasonCode {
    pub fn code(self) -> &'static str {
        match self {
            ReasonCode::MissingAge => "missing_age",
            ReasonCode::MissingSex => "missing_sex",
            ReasonCode::JoinUnmatched => "join_unmatched",
            ReasonCode::JoinDuplicate => "join_duplicate",
        }
    }

    pub fn kind(self) -> FaultKind {
        match self {
            ReasonCode::MissingAge | ReasonCode::MissingSex => FaultKind::Identity,
            ReasonCode::JoinUnmatched | ReasonCode::JoinDuplicate => FaultKind::JoinCardinality,
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Counters surfaced to the caller after a wave run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultSummary {
    /// Respondent rows that reached an adapter or the join fault list.
    pub respondents: usize,
    /// Records in the analytic set.
    pub included: usize,
    pub identity_faults: usize,
    /// Distinct respondent keys with a non 1:1 match.
    pub join_faults: usize,
    /// Roster keys with no main-file respondent.
    pub orphan_roster_keys: usize,
    /// Fields of analytic respondents normalized to missing because of a
    /// sentinel code. Excluded respondents are not counted here or below.
    pub sentinel_values: usize,
    pub unparseable_values: usize,
    /// Count fields holding a negative non-sentinel value.
    pub negative_counts: usize,
    pub cohort_boundary_faults: usize,
    /// Main-file rows that are not main respondents.
    pub non_respondent_rows: usize,
}

impl FaultSummary {
    pub fn excluded(&self) -> usize {
        self.respondents.saturating_sub(self.included)
    }

    pub fn has_record_faults(&self) -> bool {
        self.identity_faults > 0 || self.join_faults > 0 || self.cohort_boundary_faults > 0
    }
}
