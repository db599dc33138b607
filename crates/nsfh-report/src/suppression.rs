//! Small-cell suppression.

use std::collections::BTreeMap;

use nsfh_model::{AggregateCell, Sex};

/// Keeps cohorts where both sexes have a cell with `N >= min_n`.
///
/// All-or-nothing per cohort; input order is preserved.
pub fn suppress(cells: &[AggregateCell], min_n: usize) -> Vec<AggregateCell> {
    let mut sizes: BTreeMap<&str, (Option<usize>, Option<usize>)> = BTreeMap::new();
    for cell in cells {
        let entry = sizes.entry(cell.cohort.as_str()).or_default();
        match cell.sex {
            Sex::Female => entry.0 = Some(cell.n),
            Sex::Male => entry.1 = Some(cell.n),
        }
    }
    let retained = |cohort: &str| {
        matches!(
            sizes.get(cohort),
            Some((Some(female), Some(male))) if *female >= min_n && *male >= min_n
        )
    };
    cells
        .iter()
        .filter(|cell| retained(&cell.cohort))
        .cloned()
        .collect()
}
