//! Canonical analytic record shared by every wave.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Upper age bound (inclusive) of the tabulated subset.
pub const AGE_CEILING: i32 = 35;

/// Respondent sex. Ordering (Female before Male) is the table ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Sex {
    Female,
    Male,
}

impl Sex {
    pub const ALL: [Sex; 2] = [Sex::Female, Sex::Male];

    /// Survey coding shared by all three instruments: 1 = Male, 2 = Female.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Sex::Male),
            2 => Some(Sex::Female),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Sex::Female => "Female",
            Sex::Male => "Male",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Partnership fields produced by a wave adapter, before cohort assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnershipRecord {
    pub respondent_id: String,
    pub age: i32,
    pub sex: Sex,
    pub num_marriages: Option<u32>,
    pub ever_married: Option<bool>,
    pub remarried_2plus: Option<bool>,
    pub num_cohab_partners: Option<u32>,
    pub ever_cohabited: Option<bool>,
}

impl PartnershipRecord {
    /// Boolean OR of the two union flags; a missing flag counts as false here
    /// and nowhere else.
    pub fn ever_partnered(&self) -> bool {
        self.ever_married.unwrap_or(false) || self.ever_cohabited.unwrap_or(false)
    }

    pub fn age_le_35(&self) -> bool {
        self.age <= AGE_CEILING
    }
}

/// Cohort labels resolved for one birth year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CohortAssignment {
    pub birth_year: i32,
    pub cohort_primary: Option<String>,
    pub cohort_macro: Option<String>,
}

/// One respondent's harmonized record. Built once per wave run and never
/// modified; corrections produce a new record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticRecord {
    pub respondent_id: String,
    pub age: i32,
    pub sex: Sex,
    pub birth_year: i32,
    pub num_marriages: Option<u32>,
    pub ever_married: Option<bool>,
    pub remarried_2plus: Option<bool>,
    pub num_cohab_partners: Option<u32>,
    pub ever_cohabited: Option<bool>,
    pub ever_partnered: bool,
    pub age_le_35: bool,
    pub cohort_primary: Option<String>,
    pub cohort_macro: Option<String>,
}

impl AnalyticRecord {
    /// Combines adapter output with its cohort assignment.
    ///
    /// `remarried_2plus == Some(true)` forces `ever_married` to `Some(true)`.
    pub fn from_parts(partnership: PartnershipRecord, cohort: CohortAssignment) -> Self {
        let ever_partnered = partnership.ever_partnered();
        let age_le_35 = partnership.age_le_35();
        let ever_married = if partnership.remarried_2plus == Some(true) {
            Some(true)
        } else {
            partnership.ever_married
        };
        Self {
            respondent_id: partnership.respondent_id,
            age: partnership.age,
            sex: partnership.sex,
            birth_year: cohort.birth_year,
            num_marriages: partnership.num_marriages,
            ever_married,
            remarried_2plus: partnership.remarried_2plus,
            num_cohab_partners: partnership.num_cohab_partners,
            ever_cohabited: partnership.ever_cohabited,
            ever_partnered: ever_partnered || ever_married == Some(true),
            age_le_35,
            cohort_primary: cohort.cohort_primary,
            cohort_macro: cohort.cohort_macro,
        }
    }

    /// Checks the composite-flag invariants.
    pub fn is_consistent(&self) -> bool {
        let partnered =
            self.ever_married.unwrap_or(false) || self.ever_cohabited.unwrap_or(false);
        let remarried_ok = self.remarried_2plus != Some(true) || self.ever_married == Some(true);
        partnered == self.ever_partnered && remarried_ok
    }
}
