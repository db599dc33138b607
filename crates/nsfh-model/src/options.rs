//! Options for a single wave run.

use serde::{Deserialize, Serialize};

use crate::wave::Wave;

/// Default minimum cell count per sex for a cohort to be reported.
pub const DEFAULT_MIN_N: usize = 200;

/// Options controlling one wave's harmonization and tabulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveOptions {
    pub wave: Wave,
    /// Year subtracted from age to obtain birth year.
    pub reference_interview_year: i32,
    /// Both sexes need at least this many respondents for a cohort to appear
    /// in `primary_present`.
    pub min_n: usize,
}

impl WaveOptions {
    pub fn new(wave: Wave) -> Self {
        Self {
            wave,
            reference_interview_year: wave.default_reference_year(),
            min_n: DEFAULT_MIN_N,
        }
    }

    #[must_use]
    pub fn with_reference_year(mut self, year: i32) -> Self {
        self.reference_interview_year = year;
        self
    }

    #[must_use]
    pub fn with_min_n(mut self, min_n: usize) -> Self {
        self.min_n = min_n;
        self
    }
}
