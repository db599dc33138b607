use serde::{Deserialize, Serialize};

use crate::record::Sex;
use crate::wave::Wave;

/// Statistics for one (cohort, sex) cell of the age-restricted subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateCell {
    pub cohort: String,
    pub sex: Sex,
    #[serde(rename = "N")]
    pub n: usize,
    #[serde(rename = "P_ever_partnered")]
    pub p_ever_partnered: f64,
    #[serde(rename = "Mean_num_cohab_partners_if_partnered")]
    pub mean_num_cohab_partners_if_partnered: Option<f64>,
    #[serde(rename = "Mean_num_marriages_if_partnered")]
    pub mean_num_marriages_if_partnered: Option<f64>,
    #[serde(rename = "P_remarried_2plus_if_partnered")]
    pub p_remarried_2plus_if_partnered: Option<f64>,
}

/// Female-minus-male difference in the ever-partnered proportion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapRow {
    pub cohort: String,
    pub female: Option<f64>,
    pub male: Option<f64>,
    pub gap: Option<f64>,
}

/// The named views of one wave's summary artifact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryTables {
    pub primary_all: Vec<AggregateCell>,
    pub primary_present: Vec<AggregateCell>,
    pub ever_partnered_gap: Vec<GapRow>,
    pub macro_all: Vec<AggregateCell>,
}

impl SummaryTables {
    pub fn present_cohorts(&self) -> Vec<&str> {
        let mut cohorts: Vec<&str> = Vec::new();
        for cell in &self.primary_present {
            if cohorts.last() != Some(&cell.cohort.as_str()) {
                cohorts.push(cell.cohort.as_str());
            }
        }
        cohorts
    }
}

/// One wave's tables within a stacked run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveTables {
    pub wave: Wave,
    pub tables: SummaryTables,
}

/// Tables over the analytic records of several waves.
///
/// `pooled` groups every wave's records by cohort label alone; `by_wave`
/// keeps each wave's own cells, suppression and gap.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StackedTables {
    pub waves: Vec<Wave>,
    pub pooled: SummaryTables,
    pub by_wave: Vec<WaveTables>,
}
