use std::fmt;

use serde::{Deserialize, Serialize};

/// One fielding round of the survey, each with its own instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Wave {
    Wave1,
    Wave2,
    Wave3,
}

impl Wave {
    pub const ALL: [Wave; 3] = [Wave::Wave1, Wave::Wave2, Wave::Wave3];

    pub fn number(self) -> u8 {
        match self {
            Wave::Wave1 => 1,
            Wave::Wave2 => 2,
            Wave::Wave3 => 3,
        }
    }

    /// Stable identifier used for output directories and config tables.
    pub fn key(self) -> &'static str {
        match self {
            Wave::Wave1 => "wave1",
            Wave::Wave2 => "wave2",
            Wave::Wave3 => "wave3",
        }
    }

    /// Historical interview year used to derive birth years.
    pub fn default_reference_year(self) -> i32 {
        match self {
            Wave::Wave1 => 1987,
            Wave::Wave2 => 1993,
            Wave::Wave3 => 2002,
        }
    }

    pub fn fielding_period(self) -> &'static str {
        match self {
            Wave::Wave1 => "1987-88",
            Wave::Wave2 => "1992-94",
            Wave::Wave3 => "2001-03",
        }
    }

    /// Whether the wave needs a second (roster) extract joined to the main file.
    pub fn requires_roster(self) -> bool {
        matches!(self, Wave::Wave3)
    }
}

impl fmt::Display for Wave {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for Wave {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "1" | "wave1" | "w1" => Ok(Wave::Wave1),
            "2" | "wave2" | "w2" => Ok(Wave::Wave2),
            "3" | "wave3" | "w3" => Ok(Wave::Wave3),
            other => Err(format!("unknown wave: {other}")),
        }
    }
}
