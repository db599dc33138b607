//! Birth cohort assignment.
//!
//! Primary bins are a policy: a fixed literal set, or equal-width bins fitted
//! to the observed birth years. Either way the policy resolves to a validated
//! [`BinSet`] before any respondent is assigned.

use nsfh_model::{BinSet, CohortAssignment, CohortBin, ModelError, Wave};

use crate::error::Result;

pub const PRIMARY_SET: &str = "primary";
pub const MACRO_SET: &str = "macro";

/// Width of the data-derived Wave 2 bins.
pub const WAVE2_BIN_WIDTH: i32 = 5;

/// Birth year implied by age at the reference interview year.
pub fn birth_year(reference_interview_year: i32, age: i32) -> i32 {
    reference_interview_year - age
}

/// How the primary bin set is obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BinningPolicy {
    Fixed(BinSet),
    EqualWidth { width: i32 },
}

impl BinningPolicy {
    pub fn primary_for(wave: Wave) -> Result<Self> {
        Ok(match wave {
            Wave::Wave1 => BinningPolicy::Fixed(wave1_primary_bins()?),
            Wave::Wave2 => BinningPolicy::EqualWidth {
                width: WAVE2_BIN_WIDTH,
            },
            Wave::Wave3 => BinningPolicy::Fixed(wave3_primary_bins()?),
        })
    }

    /// Resolves the policy against observed birth years.
    pub fn resolve(&self, observed: &[i32]) -> Result<BinSet> {
        match self {
            BinningPolicy::Fixed(bins) => Ok(bins.clone()),
            BinningPolicy::EqualWidth { width } => equal_width_bins(PRIMARY_SET, *width, observed),
        }
    }
}

/// Wave 1 primary cohorts: 1952–56, then four-year bins through 1972.
pub fn wave1_primary_bins() -> Result<BinSet> {
    let bins = vec![
        CohortBin::closed("1952–56", 1952, 1956),
        CohortBin::closed("1957–60", 1957, 1960),
        CohortBin::closed("1961–64", 1961, 1964),
        CohortBin::closed("1965–68", 1965, 1968),
        CohortBin::closed("1969–72", 1969, 1972),
    ];
    Ok(BinSet::new(PRIMARY_SET, bins)?)
}

/// Decade bins from `first` to `last` (decade starts), open at both ends.
fn decade_bins(name: &str, first: i32, last: i32) -> Result<BinSet> {
    let mut bins = vec![CohortBin::new(format!("≤{}", first - 1), None, Some(first))];
    let mut start = first;
    while start <= last {
        bins.push(CohortBin::closed(
            format!("{start}–{:02}", (start + 9) % 100),
            start,
            start + 9,
        ));
        start += 10;
    }
    bins.push(CohortBin::new(format!("≥{start}"), Some(start), None));
    Ok(BinSet::new(name, bins)?)
}

/// Wave 3 primary cohorts: ≤1939, decades 1940–49 through 1990–99, ≥2000.
pub fn wave3_primary_bins() -> Result<BinSet> {
    decade_bins(PRIMARY_SET, 1940, 1990)
}

/// Macro cohorts shared by every wave: ≤1949, 1950–59, 1960–69, 1970–79, ≥1980.
pub fn macro_bins() -> Result<BinSet> {
    decade_bins(MACRO_SET, 1950, 1970)
}

/// Equal-width bins aligned to multiples of `width`, covering the observed
/// range. Labels read `YYYY–yy`. An empty observation set yields no bins.
pub fn equal_width_bins(name: &str, width: i32, observed: &[i32]) -> Result<BinSet> {
    if width <= 0 {
        return Err(ModelError::InvalidWidth(width).into());
    }
    let (Some(&min), Some(&max)) = (observed.iter().min(), observed.iter().max()) else {
        return Ok(BinSet::empty(name));
    };
    let overflow = |start: i32| ModelError::YearOverflow {
        set: name.to_string(),
        start,
        width,
    };
    let mut bins = Vec::new();
    let mut start = min
        .div_euclid(width)
        .checked_mul(width)
        .ok_or_else(|| overflow(min))?;
    loop {
        let end = start.checked_add(width).ok_or_else(|| overflow(start))?;
        let last = end - 1;
        bins.push(CohortBin::closed(
            format!("{start}–{:02}", last.rem_euclid(100)),
            start,
            last,
        ));
        if last >= max {
            break;
        }
        start = end;
    }
    Ok(BinSet::new(name, bins)?)
}

/// Assigns primary and macro cohorts from age.
#[derive(Debug, Clone)]
pub struct CohortAssigner {
    reference_interview_year: i32,
    primary: BinSet,
    macro_bins: BinSet,
}

impl CohortAssigner {
    pub fn new(reference_interview_year: i32, primary: BinSet, macro_bins: BinSet) -> Self {
        Self {
            reference_interview_year,
            primary,
            macro_bins,
        }
    }

    pub fn primary(&self) -> &BinSet {
        &self.primary
    }

    pub fn macro_bins(&self) -> &BinSet {
        &self.macro_bins
    }

    pub fn assign(&self, age: i32) -> CohortAssignment {
        let birth_year = birth_year(self.reference_interview_year, age);
        CohortAssignment {
            birth_year,
            cohort_primary: self
                .primary
                .assign(birth_year)
                .map(|bin| bin.label.clone()),
            cohort_macro: self
                .macro_bins
                .assign(birth_year)
                .map(|bin| bin.label.clone()),
        }
    }
}
