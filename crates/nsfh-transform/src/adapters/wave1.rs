//! NSFH Wave 1 (1987–88) adapter.
//!
//! Wave 1 asks lifetime questions directly, so the mapping is one-to-one:
//! `M95` is the number of marriages and `NUMCOHAB` the number of cohabiting
//! partners.

use nsfh_ingest::RawRecord;
use nsfh_model::{PartnershipRecord, Wave};

use super::{
    BoundField, FieldReader, Harmonized, WaveAdapter, identity, reported_age, respondent_id,
};
use crate::error::Result;
use crate::normalization::SentinelNormalizer;

const AUDIT_FIELDS: &[&str] = &["M2BP01", "M2DP01", "M95", "NUMCOHAB"];

#[derive(Debug, Clone)]
pub struct Wave1Adapter {
    id: BoundField,
    age: BoundField,
    sex: BoundField,
    marriages: BoundField,
    cohab_partners: BoundField,
}

impl Wave1Adapter {
    pub fn bind(headers: &[String], source_name: &str) -> Result<Self> {
        Ok(Self {
            id: BoundField::optional(headers, "MCASEID", &["MCASEID", "CASEID"]),
            age: BoundField::required(headers, "M2BP01", &["M2BP01"], source_name)?,
            sex: BoundField::required(headers, "M2DP01", &["M2DP01"], source_name)?,
            marriages: BoundField::required(headers, "M95", &["M95"], source_name)?,
            cohab_partners: BoundField::required(headers, "NUMCOHAB", &["NUMCOHAB"], source_name)?,
        })
    }
}

impl WaveAdapter for Wave1Adapter {
    fn wave(&self) -> Wave {
        Wave::Wave1
    }

    fn description(&self) -> &'static str {
        "Lifetime marriage and cohabiting-partner counts"
    }

    fn audit_fields(&self) -> &'static [&'static str] {
        AUDIT_FIELDS
    }

    fn adapt(&self, record: &RawRecord<'_>, sentinels: &SentinelNormalizer) -> Harmonized {
        let respondent_id = respondent_id(record, &self.id);
        let mut reader = FieldReader::new(record, sentinels);
        let age = reader.read(&self.age);
        let sex = reader.read(&self.sex);
        let marriages = reader.read_count(&self.marriages);
        let cohab_partners = reader.read_count(&self.cohab_partners);

        let outcome = identity(reported_age(age), sex).map(|(age, sex)| PartnershipRecord {
            respondent_id: respondent_id.clone(),
            age,
            sex,
            num_marriages: marriages.count(),
            ever_married: marriages.at_least(1),
            remarried_2plus: marriages.at_least(2),
            num_cohab_partners: cohab_partners.count(),
            ever_cohabited: cohab_partners.at_least(1),
        });

        Harmonized {
            respondent_id,
            source: record.source().clone(),
            audit: reader.finish(),
            notes: Vec::new(),
            outcome,
        }
    }
}
