//! Female-minus-male gap in the ever-partnered proportion.

use nsfh_model::{AggregateCell, GapRow, Sex};

/// One row per cohort, in input order. A cohort missing either sex gets a
/// missing gap rather than an error.
pub fn ever_partnered_gap(cells: &[AggregateCell]) -> Vec<GapRow> {
    let mut rows: Vec<GapRow> = Vec::new();
    for cell in cells {
        let index = match rows.iter().position(|row| row.cohort == cell.cohort) {
            Some(index) => index,
            None => {
                rows.push(GapRow {
                    cohort: cell.cohort.clone(),
                    female: None,
                    male: None,
                    gap: None,
                });
                rows.len() - 1
            }
        };
        let row = &mut rows[index];
        match cell.sex {
            Sex::Female => row.female = Some(cell.p_ever_partnered),
            Sex::Male => row.male = Some(cell.p_ever_partnered),
        }
    }
    for row in &mut rows {
        row.gap = row.female.zip(row.male).map(|(female, male)| female - male);
    }
    rows
}
