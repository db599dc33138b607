//! Birth-cohort bins and validated bin sets.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// A half-open birth-year interval `[start, end)`. `None` leaves that side open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CohortBin {
    pub label: String,
    pub start: Option<i32>,
    pub end: Option<i32>,
}

impl CohortBin {
    pub fn new(label: impl Into<String>, start: Option<i32>, end: Option<i32>) -> Self {
        Self {
            label: label.into(),
            start,
            end,
        }
    }

    /// Closed bin covering `first..=last`.
    pub fn closed(label: impl Into<String>, first: i32, last: i32) -> Self {
        Self::new(label, Some(first), Some(last + 1))
    }

    pub fn contains(&self, birth_year: i32) -> bool {
        self.start.is_none_or(|start| birth_year >= start)
            && self.end.is_none_or(|end| birth_year < end)
    }
}

/// An ordered partition of a birth-year range.
///
/// Construction rejects unsorted, overlapping or gapped bins, so every
/// `BinSet` in circulation satisfies the partition invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinSet {
    name: String,
    bins: Vec<CohortBin>,
}

impl BinSet {
    pub fn new(name: impl Into<String>, bins: Vec<CohortBin>) -> Result<Self> {
        let name = name.into();
        let mut labels = BTreeSet::new();
        let last_index = bins.len().saturating_sub(1);
        for (idx, bin) in bins.iter().enumerate() {
            if !labels.insert(bin.label.as_str()) {
                return Err(ModelError::DuplicateLabel {
                    set: name,
                    label: bin.label.clone(),
                });
            }
            if let (Some(start), Some(end)) = (bin.start, bin.end)
                && start >= end
            {
                return Err(ModelError::EmptyBin {
                    set: name,
                    label: bin.label.clone(),
                    start,
                    end,
                });
            }
            if bin.start.is_none() && idx != 0 {
                return Err(ModelError::OpenStartNotFirst {
                    set: name,
                    label: bin.label.clone(),
                });
            }
            if bin.end.is_none() && idx != last_index {
                return Err(ModelError::OpenEndNotLast {
                    set: name,
                    label: bin.label.clone(),
                });
            }
        }
        for pair in bins.windows(2) {
            let (previous, next) = (&pair[0], &pair[1]);
            if previous.end.is_none() || previous.end != next.start {
                return Err(ModelError::NotContiguous {
                    set: name,
                    previous: previous.label.clone(),
                    next: next.label.clone(),
                });
            }
        }
        Ok(Self { name, bins })
    }

    /// A set with no bins; every lookup misses.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bins: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bins(&self) -> &[CohortBin] {
        &self.bins
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn assign(&self, birth_year: i32) -> Option<&CohortBin> {
        self.bins.iter().find(|bin| bin.contains(birth_year))
    }

    /// Chronological position of a label within the set.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.bins.iter().position(|bin| bin.label == label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.bins.iter().map(|bin| bin.label.as_str())
    }
}
