//! Cohort × sex aggregation.
//!
//! Only respondents aged 35 or younger at interview are tabulated. Cells are
//! keyed by the cohort's position in its bin set, then sex, so output order is
//! chronological whatever the input order.

use std::collections::BTreeMap;

use nsfh_model::{AggregateCell, AnalyticRecord, BinSet, Sex};

/// Which cohort label an aggregation groups by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CohortField {
    Primary,
    Macro,
}

impl CohortField {
    pub fn label(self, record: &AnalyticRecord) -> Option<&str> {
        match self {
            CohortField::Primary => record.cohort_primary.as_deref(),
            CohortField::Macro => record.cohort_macro.as_deref(),
        }
    }
}

/// Mean over non-missing values.
#[derive(Debug, Clone, Copy, Default)]
struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    fn push(&mut self, value: Option<f64>) {
        if let Some(value) = value {
            self.sum += value;
            self.count += 1;
        }
    }

    fn value(self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct CellAccumulator {
    n: usize,
    partnered: usize,
    cohab_partners: Mean,
    marriages: Mean,
    remarried: Mean,
}

impl CellAccumulator {
    fn push(&mut self, record: &AnalyticRecord) {
        self.n += 1;
        if !record.ever_partnered {
            return;
        }
        self.partnered += 1;
        self.cohab_partners
            .push(record.num_cohab_partners.map(f64::from));
        self.marriages.push(record.num_marriages.map(f64::from));
        self.remarried
            .push(record.remarried_2plus.map(|flag| if flag { 1.0 } else { 0.0 }));
    }

    fn finish(self, cohort: &str, sex: Sex) -> AggregateCell {
        AggregateCell {
            cohort: cohort.to_string(),
            sex,
            n: self.n,
            p_ever_partnered: self.partnered as f64 / self.n as f64,
            mean_num_cohab_partners_if_partnered: self.cohab_partners.value(),
            mean_num_marriages_if_partnered: self.marriages.value(),
            p_remarried_2plus_if_partnered: self.remarried.value(),
        }
    }
}

/// Tabulates records aged 35 or younger by cohort and sex.
///
/// Records whose cohort label is missing or not in `bins` are skipped.
pub fn aggregate<'a>(
    records: impl IntoIterator<Item = &'a AnalyticRecord>,
    bins: &BinSet,
    field: CohortField,
) -> Vec<AggregateCell> {
    let labels: Vec<&str> = bins.labels().collect();
    aggregate_by_labels(records, &labels, field)
}

/// [`aggregate`] over an explicit label order, for records whose labels
/// come from more than one bin set.
pub fn aggregate_by_labels<'a>(
    records: impl IntoIterator<Item = &'a AnalyticRecord>,
    labels: &[&str],
    field: CohortField,
) -> Vec<AggregateCell> {
    let mut cells: BTreeMap<(usize, Sex), CellAccumulator> = BTreeMap::new();
    for record in records {
        if !record.age_le_35 {
            continue;
        }
        let Some(position) = field
            .label(record)
            .and_then(|label| labels.iter().position(|known| *known == label))
        else {
            continue;
        };
        cells.entry((position, record.sex)).or_default().push(record);
    }
    cells
        .into_iter()
        .map(|((position, sex), acc)| acc.finish(labels[position], sex))
        .collect()
}
