//! NSFH Wave 3 (2001–03) adapter.
//!
//! Wave 3 reads a main interview record joined with its household roster.
//! Age is computed from month/year of birth and the interview date. The
//! marriage count is rebuilt from marital status and the married-before item,
//! and cohabitation falls back to a current-status item when no lifetime
//! count exists.

use chrono::NaiveDate;
use nsfh_ingest::RawRecord;
use nsfh_model::{DerivationNote, FieldValue, PartnershipRecord, Wave};

use super::{
    BoundField, FieldReader, Harmonized, MERGE_KEY_CANDIDATES, WaveAdapter, identity,
    respondent_id,
};
use crate::error::Result;
use crate::normalization::SentinelNormalizer;

const AUDIT_FIELDS: &[&str] = &[
    "DOBY", "DOBM", "IDATYY", "IDATMM", "IDATDD", "SEX", "MS", "MB", "COH", "NUMCOHAB",
];

const DEFAULT_MONTH: u32 = 6;
const DEFAULT_DAY: u32 = 15;
const BIRTH_DAY: u32 = 15;
const DAYS_PER_YEAR: f64 = 365.25;

/// Marital status codes 1..=4 (married, separated, divorced, widowed).
const EVER_MARRIED_STATUSES: std::ops::RangeInclusive<i64> = 1..=4;
const MARRIED_BEFORE: i64 = 2;
const COHABITING: i64 = 1;

#[derive(Debug, Clone)]
pub struct Wave3Adapter {
    id: BoundField,
    birth_year: BoundField,
    birth_month: BoundField,
    interview_year: BoundField,
    interview_month: BoundField,
    interview_day: BoundField,
    sex: BoundField,
    marital_status: BoundField,
    married_before: BoundField,
    cohab_status: BoundField,
    cohab_partners: BoundField,
}

impl Wave3Adapter {
    pub fn bind(headers: &[String], source_name: &str) -> Result<Self> {
        Ok(Self {
            id: BoundField::optional(headers, "CASENUM", MERGE_KEY_CANDIDATES),
            birth_year: BoundField::required(headers, "DOBY", &["DOBY"], source_name)?,
            birth_month: BoundField::optional(headers, "DOBM", &["DOBM"]),
            interview_year: BoundField::required(
                headers,
                "IDATYY",
                &["IDATYY", "INTYY", "INTERVIEW_YEAR"],
                source_name,
            )?,
            interview_month: BoundField::optional(headers, "IDATMM", &["IDATMM", "INTMM"]),
            interview_day: BoundField::optional(headers, "IDATDD", &["IDATDD", "INTDD"]),
            sex: BoundField::required(
                headers,
                "SEX",
                &["SEX_A", "SEXA", "RSEX", "SEX"],
                source_name,
            )?,
            marital_status: BoundField::required(
                headers,
                "MS",
                &["MS_A", "MSA", "RMS", "MARSTAT", "MS"],
                source_name,
            )?,
            married_before: BoundField::optional(headers, "MB", &["MB_A", "MBA", "MB"]),
            cohab_status: BoundField::optional(headers, "COH", &["COH_A", "COHA", "COH"]),
            cohab_partners: BoundField::optional(headers, "NUMCOHAB", &["NUMCOHAB"]),
        })
    }
}

fn month_or_default(value: FieldValue, default: u32) -> u32 {
    value
        .value()
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(default)
}

/// Two-digit birth years belong to the 1900s.
fn four_digit_year(year: i64) -> i64 {
    if (0..100).contains(&year) {
        1900 + year
    } else {
        year
    }
}

/// Completed years between mid-month of birth and the interview date.
pub fn age_from_dates(
    birth_year: FieldValue,
    birth_month: FieldValue,
    interview_year: FieldValue,
    interview_month: FieldValue,
    interview_day: FieldValue,
) -> Option<i32> {
    let birth_year = i32::try_from(four_digit_year(birth_year.value()?)).ok()?;
    let born = NaiveDate::from_ymd_opt(
        birth_year,
        month_or_default(birth_month, DEFAULT_MONTH),
        BIRTH_DAY,
    )?;
    let interviewed = NaiveDate::from_ymd_opt(
        i32::try_from(interview_year.value()?).ok()?,
        month_or_default(interview_month, DEFAULT_MONTH),
        month_or_default(interview_day, DEFAULT_DAY),
    )?;
    let days = (interviewed - born).num_days();
    Some((days as f64 / DAYS_PER_YEAR).floor() as i32)
}

/// Ever-married, remarried and the 0/1/2 marriage count.
///
/// An ever-married respondent without a married-before answer counts as
/// married once.
fn marriage_history(
    marital_status: FieldValue,
    married_before: FieldValue,
) -> (Option<bool>, Option<bool>, Option<u32>) {
    let ever_married = marital_status
        .value()
        .map(|status| EVER_MARRIED_STATUSES.contains(&status));
    let remarried = match ever_married {
        Some(true) => Some(married_before.equals(MARRIED_BEFORE).unwrap_or(false)),
        Some(false) => Some(false),
        None => None,
    };
    let count = match (ever_married, remarried) {
        (Some(false), _) => Some(0),
        (Some(true), Some(true)) => Some(2),
        (Some(true), Some(false)) => Some(1),
        _ => None,
    };
    (ever_married, remarried, count)
}

impl WaveAdapter for Wave3Adapter {
    fn wave(&self) -> Wave {
        Wave::Wave3
    }

    fn description(&self) -> &'static str {
        "Date-derived age with marital-status marriage counts"
    }

    fn audit_fields(&self) -> &'static [&'static str] {
        AUDIT_FIELDS
    }

    fn adapt(&self, record: &RawRecord<'_>, sentinels: &SentinelNormalizer) -> Harmonized {
        let respondent_id = respondent_id(record, &self.id);
        let mut reader = FieldReader::new(record, sentinels);
        let birth_year = reader.read(&self.birth_year);
        let birth_month = reader.read(&self.birth_month);
        let interview_year = reader.read(&self.interview_year);
        let interview_month = reader.read(&self.interview_month);
        let interview_day = reader.read(&self.interview_day);
        let sex = reader.read(&self.sex);
        let marital_status = reader.read(&self.marital_status);
        let married_before = reader.read(&self.married_before);
        let cohab_status = reader.read(&self.cohab_status);
        let cohab_partners = reader.read_count(&self.cohab_partners);

        let mut notes = vec![
            DerivationNote::AgeFromDates,
            DerivationNote::MaritalStatusMarriageCount,
        ];
        let num_cohab_partners = cohab_partners.count();
        let ever_cohabited = if num_cohab_partners.is_some() {
            cohab_partners.at_least(1)
        } else if self.cohab_status.is_bound() {
            notes.push(DerivationNote::CurrentCohabitationStatus);
            cohab_status.equals(COHABITING)
        } else {
            notes.push(DerivationNote::CohabitationUnavailable);
            None
        };

        let age = age_from_dates(
            birth_year,
            birth_month,
            interview_year,
            interview_month,
            interview_day,
        );
        let (ever_married, remarried_2plus, num_marriages) =
            marriage_history(marital_status, married_before);
        if ever_married == Some(true) && married_before.is_missing() {
            notes.push(DerivationNote::MarriedBeforeAssumedFirst);
        }
        let outcome = identity(age, sex).map(|(age, sex)| PartnershipRecord {
            respondent_id: respondent_id.clone(),
            age,
            sex,
            num_marriages,
            ever_married,
            remarried_2plus,
            num_cohab_partners,
            ever_cohabited,
        });

        Harmonized {
            respondent_id,
            source: record.source().clone(),
            audit: reader.finish(),
            notes,
            outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use nsfh_model::MissingReason;

    use super::*;

    const BLANK: FieldValue = FieldValue::Missing(MissingReason::Blank);

    #[test]
    fn age_uses_mid_month_birth_and_defaults() {
        let age = age_from_dates(
            FieldValue::Present(70),
            FieldValue::Present(3),
            FieldValue::Present(2002),
            FieldValue::Present(3),
            FieldValue::Present(14),
        );
        assert_eq!(age, Some(31));
        let age = age_from_dates(
            FieldValue::Present(70),
            BLANK,
            FieldValue::Present(2002),
            BLANK,
            BLANK,
        );
        assert_eq!(age, Some(32));
    }

    #[test]
    fn age_missing_without_birth_year_or_valid_date() {
        assert_eq!(
            age_from_dates(BLANK, BLANK, FieldValue::Present(2002), BLANK, BLANK),
            None
        );
        assert_eq!(
            age_from_dates(
                FieldValue::Present(70),
                FieldValue::Present(13),
                FieldValue::Present(2002),
                BLANK,
                BLANK
            ),
            None
        );
    }

    #[test]
    fn marriage_history_from_status() {
        assert_eq!(
            marriage_history(FieldValue::Present(5), BLANK),
            (Some(false), Some(false), Some(0))
        );
        assert_eq!(
            marriage_history(FieldValue::Present(3), FieldValue::Present(2)),
            (Some(true), Some(true), Some(2))
        );
        assert_eq!(
            marriage_history(FieldValue::Present(1), FieldValue::Present(1)),
            (Some(true), Some(false), Some(1))
        );
        assert_eq!(
            marriage_history(FieldValue::Present(1), BLANK),
            (Some(true), Some(false), Some(1))
        );
        assert_eq!(
            marriage_history(
                FieldValue::Present(4),
                FieldValue::Missing(MissingReason::Absent)
            ),
            (Some(true), Some(false), Some(1))
        );
        assert_eq!(marriage_history(BLANK, BLANK), (None, None, None));
    }
}
