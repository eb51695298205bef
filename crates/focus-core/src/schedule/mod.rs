//! Day schedule types and the schedule builder.
//!
//! A schedule is an ordered list of [`ScheduleBlock`]s that tile the day
//! from the configured start to the configured end with no gaps. Each block
//! is a routine, a placed task, or free time.

mod builder;

pub use builder::{build_schedule, BuilderConfig, FreeTimePolicy, OverrunPolicy, ScheduleBuilder};

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::clock;
use crate::routine::RoutineSlot;
use crate::task::TaskRequest;

/// Label used for blocks nobody claimed.
pub const FREE_LABEL: &str = "Free";

/// What occupies a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockCategory {
    Routine,
    Task,
    Free,
}

impl BlockCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Routine => "routine",
            Self::Task => "task",
            Self::Free => "free",
        }
    }
}

/// One contiguous segment of the generated day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleBlock {
    #[serde(with = "clock::hhmm")]
    pub start: NaiveTime,
    #[serde(with = "clock::hhmm")]
    pub end: NaiveTime,
    pub label: String,
    pub category: BlockCategory,
    /// Routine icon, if the routine has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl ScheduleBlock {
    pub fn routine(slot: &RoutineSlot, start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            start,
            end,
            label: slot.name.clone(),
            category: BlockCategory::Routine,
            icon: slot.icon.clone(),
        }
    }

    pub fn task(task: &TaskRequest, start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            start,
            end,
            label: task.name.clone(),
            category: BlockCategory::Task,
            icon: None,
        }
    }

    pub fn free(start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            start,
            end,
            label: FREE_LABEL.to_string(),
            category: BlockCategory::Free,
            icon: None,
        }
    }

    pub fn duration_minutes(&self) -> i64 {
        clock::minutes_between(self.start, self.end)
    }

    /// `HH:MM-HH:MM`
    pub fn time_range(&self) -> String {
        format!(
            "{}-{}",
            clock::format_hhmm(self.start),
            clock::format_hhmm(self.end)
        )
    }
}

/// Result of one generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub blocks: Vec<ScheduleBlock>,
    /// Tasks the sweep never reached, in the order they were queued.
    #[serde(default)]
    pub unplaced: Vec<TaskRequest>,
}

impl Schedule {
    /// Total minutes of free time in the day.
    pub fn free_minutes(&self) -> i64 {
        self.blocks
            .iter()
            .filter(|b| b.category == BlockCategory::Free)
            .map(ScheduleBlock::duration_minutes)
            .sum()
    }

    /// Placed tasks only.
    pub fn task_blocks(&self) -> impl Iterator<Item = &ScheduleBlock> {
        self.blocks
            .iter()
            .filter(|b| b.category == BlockCategory::Task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::hm;
    use crate::task::Priority;

    #[test]
    fn block_constructors_set_category() {
        let slot = RoutineSlot::new("Lunch", hm(12, 0), hm(13, 0)).with_icon("🍴");
        let routine = ScheduleBlock::routine(&slot, hm(12, 30), hm(13, 0));
        assert_eq!(routine.category, BlockCategory::Routine);
        assert_eq!(routine.icon.as_deref(), Some("🍴"));
        assert_eq!(routine.duration_minutes(), 30);

        let task = TaskRequest::new("Math", 60, Priority::Must).unwrap();
        let placed = ScheduleBlock::task(&task, hm(7, 30), hm(8, 30));
        assert_eq!(placed.label, "Math");
        assert_eq!(placed.time_range(), "07:30-08:30");

        let free = ScheduleBlock::free(hm(8, 30), hm(9, 0));
        assert_eq!(free.label, FREE_LABEL);
        assert_eq!(free.category, BlockCategory::Free);
    }

    #[test]
    fn block_json_shape() {
        let free = ScheduleBlock::free(hm(8, 30), hm(9, 0));
        let json = serde_json::to_value(&free).unwrap();
        assert_eq!(json["start"], "08:30");
        assert_eq!(json["category"], "free");
        assert!(json.get("icon").is_none());
    }
}
