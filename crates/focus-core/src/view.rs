//! Display ranges over a generated day.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::clock::hm;
use crate::error::ValidationError;
use crate::schedule::ScheduleBlock;

/// Part of the day to show. Filtering happens after generation, so the
/// schedule itself is the same for every view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewRange {
    /// Blocks starting before noon.
    Morning,
    /// Blocks starting at or after noon.
    Afternoon,
    #[default]
    #[serde(alias = "all-day")]
    All,
}

impl ViewRange {
    /// Boundary between the morning and afternoon views.
    pub fn noon() -> NaiveTime {
        hm(12, 0)
    }

    pub fn includes(&self, block: &ScheduleBlock) -> bool {
        match self {
            Self::Morning => block.start < Self::noon(),
            Self::Afternoon => block.start >= Self::noon(),
            Self::All => true,
        }
    }

    pub fn filter<'a>(&self, blocks: &'a [ScheduleBlock]) -> Vec<&'a ScheduleBlock> {
        blocks.iter().filter(|b| self.includes(b)).collect()
    }
}

impl fmt::Display for ViewRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Morning => write!(f, "Morning"),
            Self::Afternoon => write!(f, "Afternoon"),
            Self::All => write!(f, "All Day"),
        }
    }
}

impl FromStr for ViewRange {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "morning" => Ok(Self::Morning),
            "afternoon" => Ok(Self::Afternoon),
            "all" | "all-day" | "allday" => Ok(Self::All),
            other => Err(ValidationError::InvalidValue {
                field: "view".into(),
                message: format!("expected morning, afternoon or all, got '{other}'"),
            }),
        }
    }
}
