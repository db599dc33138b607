//! NSFH Wave 2 (1992–94) adapter.
//!
//! Wave 2 only asks about unions since the Wave 1 interview. Ever-married and
//! ever-cohabited combine the since-prior-wave counts with the yes/no items,
//! which approximates lifetime history; every record is flagged with
//! [`DerivationNote::SincePriorWaveCounts`].

use nsfh_ingest::RawRecord;
use nsfh_model::{DerivationNote, PartnershipRecord, Wave};

use super::{
    BoundField, FieldReader, Harmonized, WaveAdapter, either, identity, reported_age,
    respondent_id,
};
use crate::error::Result;
use crate::normalization::SentinelNormalizer;

const AUDIT_FIELDS: &[&str] = &["MA8", "MA7", "MI41", "MI140", "MI40", "MI42"];

/// "Yes" on the married-since and cohabited-since items.
const YES: i64 = 1;

#[derive(Debug, Clone)]
pub struct Wave2Adapter {
    id: BoundField,
    age: BoundField,
    sex: BoundField,
    marriages_since: BoundField,
    cohab_partners_since: BoundField,
    married_since: BoundField,
    cohabited_since: BoundField,
}

impl Wave2Adapter {
    pub fn bind(headers: &[String], source_name: &str) -> Result<Self> {
        Ok(Self {
            id: BoundField::optional(headers, "MCASEID", &["MCASEID", "CASEID", "CASENUM"]),
            age: BoundField::required(headers, "MA8", &["MA8"], source_name)?,
            sex: BoundField::required(headers, "MA7", &["MA7"], source_name)?,
            marriages_since: BoundField::required(headers, "MI41", &["MI41"], source_name)?,
            cohab_partners_since: BoundField::required(headers, "MI140", &["MI140"], source_name)?,
            married_since: BoundField::required(headers, "MI40", &["MI40"], source_name)?,
            cohabited_since: BoundField::required(headers, "MI42", &["MI42"], source_name)?,
        })
    }
}

impl WaveAdapter for Wave2Adapter {
    fn wave(&self) -> Wave {
        Wave::Wave2
    }

    fn description(&self) -> &'static str {
        "Since-prior-wave union counts combined with yes/no items"
    }

    fn audit_fields(&self) -> &'static [&'static str] {
        AUDIT_FIELDS
    }

    fn adapt(&self, record: &RawRecord<'_>, sentinels: &SentinelNormalizer) -> Harmonized {
        let respondent_id = respondent_id(record, &self.id);
        let mut reader = FieldReader::new(record, sentinels);
        let age = reader.read(&self.age);
        let sex = reader.read(&self.sex);
        let marriages = reader.read_count(&self.marriages_since);
        let cohab_partners = reader.read_count(&self.cohab_partners_since);
        let married_since = reader.read(&self.married_since);
        let cohabited_since = reader.read(&self.cohabited_since);

        let outcome = identity(reported_age(age), sex).map(|(age, sex)| PartnershipRecord {
            respondent_id: respondent_id.clone(),
            age,
            sex,
            num_marriages: marriages.count(),
            ever_married: either(marriages.at_least(1), married_since.equals(YES)),
            remarried_2plus: marriages.at_least(2),
            num_cohab_partners: cohab_partners.count(),
            ever_cohabited: either(cohab_partners.at_least(1), cohabited_since.equals(YES)),
        });

        Harmonized {
            respondent_id,
            source: record.source().clone(),
            audit: reader.finish(),
            notes: vec![DerivationNote::SincePriorWaveCounts],
            outcome,
        }
    }
}
