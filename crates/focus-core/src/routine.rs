//! Fixed daily routines.
//!
//! Routines are the non-negotiable blocks of the day (meals by default).
//! They are loaded once from configuration and never change during a
//! session; whenever the schedule cursor enters one, the routine wins over
//! any pending task.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::clock::{self, hm};
use crate::error::ValidationError;

/// A fixed routine occupying `[start, end)` every day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutineSlot {
    pub name: String,
    #[serde(with = "clock::hhmm")]
    pub start: NaiveTime,
    #[serde(with = "clock::hhmm")]
    pub end: NaiveTime,
    /// Tag shown next to the routine in the rendered table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl RoutineSlot {
    pub fn new(name: impl Into<String>, start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            name: name.into(),
            start,
            end,
            icon: None,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Half-open containment: the end instant belongs to whatever follows.
    pub fn contains(&self, t: NaiveTime) -> bool {
        self.start <= t && t < self.end
    }

    pub fn duration_minutes(&self) -> i64 {
        clock::minutes_between(self.start, self.end)
    }
}

/// Breakfast, lunch and dinner.
pub fn default_routines() -> Vec<RoutineSlot> {
    vec![
        RoutineSlot::new("Breakfast", hm(7, 0), hm(7, 30)).with_icon("☕"),
        RoutineSlot::new("Lunch", hm(12, 0), hm(13, 0)).with_icon("🍴"),
        RoutineSlot::new("Dinner", hm(18, 0), hm(18, 30)).with_icon("🌙"),
    ]
}

/// Check that every routine is a proper interval and that the set is
/// chronological and non-overlapping.
pub fn validate_routines(routines: &[RoutineSlot]) -> Result<(), ValidationError> {
    for slot in routines {
        if slot.end <= slot.start {
            return Err(ValidationError::InvalidTimeRange {
                start: slot.start,
                end: slot.end,
            });
        }
    }

    for pair in routines.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        if next.start < prev.start {
            return Err(ValidationError::UnorderedRoutines {
                name: next.name.clone(),
            });
        }
        if next.start < prev.end {
            return Err(ValidationError::OverlappingRoutines {
                first: prev.name.clone(),
                second: next.name.clone(),
            });
        }
    }

    Ok(())
}
