//! Greedy single-pass schedule builder.
//!
//! The builder walks a cursor from the start of the day to its end:
//! - a routine containing the cursor is emitted first
//! - otherwise the next pending task (Must before Want) is placed
//! - otherwise the time is marked free
//!
//! Tasks the cursor never reaches are reported back as unplaced. The input
//! task slice is never modified.

use std::collections::VecDeque;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::{Schedule, ScheduleBlock};
use crate::clock::{self, hm};
use crate::error::ValidationError;
use crate::routine::RoutineSlot;
use crate::task::TaskRequest;

/// What to emit when no task is pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreeTimePolicy {
    /// Fixed-length free blocks, each cut short at the next routine or day end.
    Fixed { minutes: u32 },
    /// One free block to the end of the day, then stop. Later routines are
    /// not emitted.
    Remainder,
}

impl Default for FreeTimePolicy {
    fn default() -> Self {
        Self::Fixed { minutes: 30 }
    }
}

/// What to do when a task would run into the next routine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverrunPolicy {
    /// Keep the full duration. The overrun routine is entered mid-slot or
    /// skipped entirely.
    Allow,
    /// Cut the task at the routine start.
    #[default]
    Truncate,
    /// Place the first pending task that fits before the routine; the
    /// others wait for a later window.
    Requeue,
}

/// Builder configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuilderConfig {
    pub day_start: NaiveTime,
    pub day_end: NaiveTime,
    pub free_time: FreeTimePolicy,
    pub overrun: OverrunPolicy,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            day_start: hm(7, 0),
            day_end: hm(23, 30),
            free_time: FreeTimePolicy::default(),
            overrun: OverrunPolicy::default(),
        }
    }
}

impl BuilderConfig {
    /// Check the preconditions the builder relies on.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.day_start >= self.day_end {
            return Err(ValidationError::InvalidTimeRange {
                start: self.day_start,
                end: self.day_end,
            });
        }
        if let FreeTimePolicy::Fixed { minutes: 0 } = self.free_time {
            return Err(ValidationError::InvalidValue {
                field: "free_block_minutes".into(),
                message: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}

/// Builds a day schedule from routines and pending tasks.
#[derive(Debug, Clone, Default)]
pub struct ScheduleBuilder {
    config: BuilderConfig,
}

impl ScheduleBuilder {
    /// Create a builder with the default 07:00-23:30 day
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom config
    pub fn with_config(config: BuilderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Generate the day's blocks.
    pub fn build(&self, routines: &[RoutineSlot], tasks: &[TaskRequest]) -> Vec<ScheduleBlock> {
        self.generate(routines, tasks).blocks
    }

    /// Generate the day's blocks and collect tasks that did not fit.
    ///
    /// # Arguments
    /// * `routines` - Fixed routines, non-overlapping
    /// * `tasks` - Pending tasks in submission order
    pub fn generate(&self, routines: &[RoutineSlot], tasks: &[TaskRequest]) -> Schedule {
        let BuilderConfig {
            day_start,
            day_end,
            free_time,
            overrun,
        } = self.config;

        // Stable: submission order survives within a priority class.
        let mut sorted = tasks.to_vec();
        sorted.sort_by_key(|t| t.priority);
        let mut pending: VecDeque<TaskRequest> = sorted.into();

        let mut blocks = Vec::new();
        let mut cursor = day_start;

        while cursor < day_end {
            if let Some(slot) = routines.iter().find(|r| r.contains(cursor)) {
                let end = slot.end.min(day_end);
                blocks.push(ScheduleBlock::routine(slot, cursor, end));
                cursor = end;
                continue;
            }

            let boundary = next_boundary(routines, cursor, day_end);

            if let Some(task) = take_task(&mut pending, overrun, cursor, boundary) {
                let limit = match overrun {
                    OverrunPolicy::Allow => day_end,
                    OverrunPolicy::Truncate | OverrunPolicy::Requeue => boundary,
                };
                let end = clock::advance(cursor, i64::from(task.minutes), limit);
                blocks.push(ScheduleBlock::task(&task, cursor, end));
                cursor = end;
                continue;
            }

            if !pending.is_empty() {
                // Requeue: nothing fits this window, hold the tasks for later.
                blocks.push(ScheduleBlock::free(cursor, boundary));
                cursor = boundary;
                continue;
            }

            match free_time {
                FreeTimePolicy::Fixed { minutes } => {
                    let end = clock::advance(cursor, i64::from(minutes.max(1)), boundary);
                    blocks.push(ScheduleBlock::free(cursor, end));
                    cursor = end;
                }
                FreeTimePolicy::Remainder => {
                    blocks.push(ScheduleBlock::free(cursor, day_end));
                    cursor = day_end;
                }
            }
        }

        let unplaced: Vec<TaskRequest> = pending.into_iter().collect();
        if !unplaced.is_empty() {
            tracing::warn!(
                count = unplaced.len(),
                "tasks did not fit before {}",
                clock::format_hhmm(day_end)
            );
        }
        tracing::debug!(
            blocks = blocks.len(),
            tasks = tasks.len(),
            ?overrun,
            ?free_time,
            "generated schedule"
        );

        Schedule { blocks, unplaced }
    }
}

/// Build with the default day bounds and policies.
pub fn build_schedule(routines: &[RoutineSlot], tasks: &[TaskRequest]) -> Vec<ScheduleBlock> {
    ScheduleBuilder::new().build(routines, tasks)
}

/// Start of the next routine after `cursor`, or the end of the day.
fn next_boundary(routines: &[RoutineSlot], cursor: NaiveTime, day_end: NaiveTime) -> NaiveTime {
    routines
        .iter()
        .map(|r| r.start)
        .filter(|start| *start > cursor)
        .min()
        .map_or(day_end, |start| start.min(day_end))
}

fn take_task(
    pending: &mut VecDeque<TaskRequest>,
    overrun: OverrunPolicy,
    cursor: NaiveTime,
    boundary: NaiveTime,
) -> Option<TaskRequest> {
    match overrun {
        OverrunPolicy::Allow | OverrunPolicy::Truncate => pending.pop_front(),
        OverrunPolicy::Requeue => {
            let window = clock::minutes_between(cursor, boundary);
            let idx = pending
                .iter()
                .position(|t| i64::from(t.minutes) <= window)?;
            pending.remove(idx)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routine::default_routines;
    use crate::schedule::{BlockCategory, FREE_LABEL};
    use crate::task::Priority;
    use proptest::prelude::*;

    fn task(name: &str, minutes: u32, priority: Priority) -> TaskRequest {
        TaskRequest::new(name, minutes, priority).unwrap()
    }

    fn builder(free_time: FreeTimePolicy, overrun: OverrunPolicy) -> ScheduleBuilder {
        ScheduleBuilder::with_config(BuilderConfig {
            free_time,
            overrun,
            ..BuilderConfig::default()
        })
    }

    fn assert_tiles_day(blocks: &[ScheduleBlock], config: &BuilderConfig) {
        assert!(!blocks.is_empty());
        assert_eq!(blocks[0].start, config.day_start);
        assert_eq!(blocks[blocks.len() - 1].end, config.day_end);
        for block in blocks {
            assert!(block.start < block.end, "empty block {:?}", block);
        }
        for pair in blocks.windows(2) {
            assert_eq!(pair[0].end, pair[1].start, "gap or overlap at {:?}", pair);
        }
    }

    fn find<'a>(blocks: &'a [ScheduleBlock], label: &str) -> &'a ScheduleBlock {
        blocks
            .iter()
            .find(|b| b.label == label)
            .unwrap_or_else(|| panic!("no block labelled {label}"))
    }

    #[test]
    fn math_scenario_matches_reference_day() {
        let blocks = build_schedule(&default_routines(), &[task("Math", 60, Priority::Must)]);
        assert_tiles_day(&blocks, &BuilderConfig::default());

        let first: Vec<_> = blocks
            .iter()
            .take(3)
            .map(|b| (b.time_range(), b.label.as_str()))
            .collect();
        assert_eq!(
            first,
            vec![
                ("07:00-07:30".to_string(), "Breakfast"),
                ("07:30-08:30".to_string(), "Math"),
                ("08:30-09:00".to_string(), FREE_LABEL),
            ]
        );
        assert_eq!(find(&blocks, "Lunch").time_range(), "12:00-13:00");
        assert_eq!(find(&blocks, "Dinner").time_range(), "18:00-18:30");

        let last = blocks.last().unwrap();
        assert_eq!(last.category, BlockCategory::Free);
        assert_eq!(last.end, hm(23, 30));
    }

    #[test]
    fn must_outranks_earlier_want() {
        let tasks = vec![task("A", 30, Priority::Want), task("B", 15, Priority::Must)];
        let blocks = build_schedule(&default_routines(), &tasks);

        assert_eq!(blocks[0].label, "Breakfast");
        assert_eq!(blocks[1].label, "B");
        assert_eq!(blocks[1].time_range(), "07:30-07:45");
        assert_eq!(blocks[2].label, "A");
        assert_eq!(blocks[2].time_range(), "07:45-08:15");
    }

    #[test]
    fn ties_keep_submission_order() {
        let tasks = vec![
            task("W1", 15, Priority::Want),
            task("M1", 15, Priority::Must),
            task("W2", 15, Priority::Want),
            task("M2", 15, Priority::Must),
        ];
        let schedule = ScheduleBuilder::new().generate(&default_routines(), &tasks);
        let order: Vec<_> = schedule.task_blocks().map(|b| b.label.as_str()).collect();
        assert_eq!(order, vec!["M1", "M2", "W1", "W2"]);
    }

    #[test]
    fn input_is_not_mutated_and_build_is_idempotent() {
        let tasks = vec![task("A", 30, Priority::Want), task("B", 45, Priority::Must)];
        let before = tasks.clone();
        let builder = ScheduleBuilder::new();

        let first = builder.build(&default_routines(), &tasks);
        let second = builder.build(&default_routines(), &tasks);

        assert_eq!(first, second);
        assert_eq!(tasks, before);
    }

    #[test]
    fn no_tasks_yields_only_routines_and_free_time() {
        let blocks = build_schedule(&default_routines(), &[]);
        assert_tiles_day(&blocks, &BuilderConfig::default());
        assert!(blocks.iter().all(|b| b.category != BlockCategory::Task));
        assert_eq!(
            blocks
                .iter()
                .filter(|b| b.category == BlockCategory::Routine)
                .count(),
            3
        );
    }

    #[test]
    fn fixed_free_blocks_stop_at_next_routine() {
        // 07:30 + 15 leaves 11:45-12:00 as a short free block before lunch.
        let blocks = build_schedule(&default_routines(), &[task("Tea", 15, Priority::Want)]);
        assert_tiles_day(&blocks, &BuilderConfig::default());

        let lunch_idx = blocks.iter().position(|b| b.label == "Lunch").unwrap();
        let before_lunch = &blocks[lunch_idx - 1];
        assert_eq!(before_lunch.category, BlockCategory::Free);
        assert_eq!(before_lunch.time_range(), "11:45-12:00");
        assert!(blocks
            .iter()
            .filter(|b| b.category == BlockCategory::Free)
            .all(|b| b.duration_minutes() <= 30));
    }

    #[test]
    fn remainder_policy_ends_with_one_block() {
        let b = builder(FreeTimePolicy::Remainder, OverrunPolicy::Truncate);
        let blocks = b.build(&default_routines(), &[task("Math", 60, Priority::Must)]);
        assert_tiles_day(&blocks, b.config());

        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[2].category, BlockCategory::Free);
        assert_eq!(blocks[2].time_range(), "08:30-23:30");
        assert!(blocks.iter().all(|b| b.label != "Lunch"));
    }

    #[test]
    fn truncate_cuts_task_at_routine_start() {
        let b = builder(FreeTimePolicy::default(), OverrunPolicy::Truncate);
        let tasks = vec![
            task("Long", 240, Priority::Must),
            task("Overrun", 60, Priority::Must),
            task("After", 30, Priority::Want),
        ];
        let blocks = b.build(&default_routines(), &tasks);
        assert_tiles_day(&blocks, b.config());

        // 07:30-11:30, then 11:30-12:00 (cut), Lunch, then After.
        assert_eq!(find(&blocks, "Long").time_range(), "07:30-11:30");
        assert_eq!(find(&blocks, "Overrun").time_range(), "11:30-12:00");
        assert_eq!(find(&blocks, "Lunch").time_range(), "12:00-13:00");
        assert_eq!(find(&blocks, "After").time_range(), "13:00-13:30");
    }

    #[test]
    fn allow_enters_routine_mid_slot() {
        let b = builder(FreeTimePolicy::default(), OverrunPolicy::Allow);
        let tasks = vec![
            task("Long", 240, Priority::Must),
            task("Overrun", 60, Priority::Must),
        ];
        let blocks = b.build(&default_routines(), &tasks);
        assert_tiles_day(&blocks, b.config());

        assert_eq!(find(&blocks, "Overrun").time_range(), "11:30-12:30");
        assert_eq!(find(&blocks, "Lunch").time_range(), "12:30-13:00");
    }

    #[test]
    fn allow_can_skip_routine_entirely() {
        let b = builder(FreeTimePolicy::default(), OverrunPolicy::Allow);
        let tasks = vec![
            task("Long", 240, Priority::Must),
            task("Marathon", 120, Priority::Must),
        ];
        let blocks = b.build(&default_routines(), &tasks);
        assert_tiles_day(&blocks, b.config());

        assert_eq!(find(&blocks, "Marathon").time_range(), "11:30-13:30");
        assert!(blocks.iter().all(|b| b.label != "Lunch"));
    }

    #[test]
    fn requeue_places_fitting_task_first() {
        let b = builder(FreeTimePolicy::default(), OverrunPolicy::Requeue);
        let tasks = vec![
            task("Long", 240, Priority::Must),
            task("Big", 60, Priority::Must),
            task("Small", 30, Priority::Want),
        ];
        let blocks = b.build(&default_routines(), &tasks);
        assert_tiles_day(&blocks, b.config());

        // Only 30 minutes remain before lunch: Small fits, Big waits.
        assert_eq!(find(&blocks, "Small").time_range(), "11:30-12:00");
        assert_eq!(find(&blocks, "Big").time_range(), "13:00-14:00");
    }

    #[test]
    fn requeue_fills_window_with_free_when_nothing_fits() {
        let b = builder(FreeTimePolicy::default(), OverrunPolicy::Requeue);
        let tasks = vec![
            task("Long", 240, Priority::Must),
            task("Big", 60, Priority::Must),
        ];
        let blocks = b.build(&default_routines(), &tasks);
        assert_tiles_day(&blocks, b.config());

        let gap = blocks.iter().find(|b| b.start == hm(11, 30)).unwrap();
        assert_eq!(gap.category, BlockCategory::Free);
        assert_eq!(gap.end, hm(12, 0));
        assert_eq!(find(&blocks, "Big").start, hm(13, 0));
    }

    #[test]
    fn routine_reached_exactly_is_verbatim() {
        let tasks = vec![task("Work", 270, Priority::Must)];
        let blocks = build_schedule(&default_routines(), &tasks);
        assert_eq!(find(&blocks, "Work").time_range(), "07:30-12:00");
        let lunch = find(&blocks, "Lunch");
        assert_eq!((lunch.start, lunch.end), (hm(12, 0), hm(13, 0)));
        assert_eq!(lunch.icon.as_deref(), Some("🍴"));
    }

    #[test]
    fn tasks_past_day_end_are_unplaced() {
        let tasks: Vec<_> = (0..20)
            .map(|i| task(&format!("T{i}"), 120, Priority::Must))
            .collect();
        let schedule = ScheduleBuilder::new().generate(&default_routines(), &tasks);
        assert_tiles_day(&schedule.blocks, &BuilderConfig::default());
        assert!(!schedule.unplaced.is_empty());
        assert_eq!(
            schedule.task_blocks().count() + schedule.unplaced.len(),
            tasks.len()
        );
        assert_eq!(schedule.blocks.last().unwrap().end, hm(23, 30));
    }

    #[test]
    fn routine_straddling_day_start_is_clipped() {
        let config = BuilderConfig {
            day_start: hm(7, 15),
            ..BuilderConfig::default()
        };
        let blocks = ScheduleBuilder::with_config(config).build(&default_routines(), &[]);
        assert_tiles_day(&blocks, &config);
        assert_eq!(blocks[0].label, "Breakfast");
        assert_eq!(blocks[0].time_range(), "07:15-07:30");
    }

    #[test]
    fn config_validation() {
        assert!(BuilderConfig::default().validate().is_ok());
        let inverted = BuilderConfig {
            day_start: hm(23, 30),
            day_end: hm(7, 0),
            ..BuilderConfig::default()
        };
        assert!(inverted.validate().is_err());
        let zero = BuilderConfig {
            free_time: FreeTimePolicy::Fixed { minutes: 0 },
            ..BuilderConfig::default()
        };
        assert!(zero.validate().is_err());
    }

    fn arb_tasks() -> impl Strategy<Value = Vec<TaskRequest>> {
        prop::collection::vec((1u32..=16, any::<bool>()), 0..12).prop_map(|specs| {
            specs
                .into_iter()
                .enumerate()
                .map(|(i, (steps, must))| TaskRequest {
                    name: format!("task-{i}"),
                    minutes: steps * 15,
                    priority: if must { Priority::Must } else { Priority::Want },
                })
                .collect()
        })
    }

    fn arb_policy() -> impl Strategy<Value = (FreeTimePolicy, OverrunPolicy)> {
        let free = prop_oneof![
            (1u32..=90).prop_map(|minutes| FreeTimePolicy::Fixed { minutes }),
            Just(FreeTimePolicy::Remainder),
        ];
        let overrun = prop_oneof![
            Just(OverrunPolicy::Allow),
            Just(OverrunPolicy::Truncate),
            Just(OverrunPolicy::Requeue),
        ];
        (free, overrun)
    }

    fn quarter(q: u32) -> NaiveTime {
        hm(q / 4, (q % 4) * 15)
    }

    /// Day bounds on the quarter-hour grid plus sorted, non-overlapping
    /// routines. Routines may straddle either day bound or fall outside it.
    fn arb_day() -> impl Strategy<Value = (BuilderConfig, Vec<RoutineSlot>)> {
        (
            0u32..48,
            1u32..48,
            prop::collection::vec((0u32..16, 1u32..8), 0..6),
        )
            .prop_map(|(start_q, span_q, specs)| {
                let mut routines = Vec::new();
                let mut at = start_q.saturating_sub(2);
                for (i, (gap, len)) in specs.into_iter().enumerate() {
                    let start = at + gap;
                    let end = start + len;
                    if end > 95 {
                        break;
                    }
                    routines.push(RoutineSlot::new(
                        format!("routine-{i}"),
                        quarter(start),
                        quarter(end),
                    ));
                    at = end;
                }
                let config = BuilderConfig {
                    day_start: quarter(start_q),
                    day_end: quarter(start_q + span_q),
                    ..BuilderConfig::default()
                };
                (config, routines)
            })
    }

    proptest! {
        #[test]
        fn prop_blocks_tile_the_day(
            tasks in arb_tasks(),
            (free_time, overrun) in arb_policy(),
        ) {
            let b = builder(free_time, overrun);
            let blocks = b.build(&default_routines(), &tasks);

            prop_assert_eq!(blocks[0].start, b.config().day_start);
            prop_assert_eq!(blocks[blocks.len() - 1].end, b.config().day_end);
            for pair in blocks.windows(2) {
                prop_assert_eq!(pair[0].end, pair[1].start);
            }
            for block in &blocks {
                prop_assert!(block.start < block.end);
            }
        }

        #[test]
        fn prop_any_routines_tile_the_day(
            (day, routines) in arb_day(),
            tasks in arb_tasks(),
            (free_time, overrun) in arb_policy(),
        ) {
            prop_assert!(crate::routine::validate_routines(&routines).is_ok());
            let b = ScheduleBuilder::with_config(BuilderConfig { free_time, overrun, ..day });
            let schedule = b.generate(&routines, &tasks);
            let blocks = &schedule.blocks;

            prop_assert!(!blocks.is_empty());
            prop_assert_eq!(blocks[0].start, day.day_start);
            prop_assert_eq!(blocks[blocks.len() - 1].end, day.day_end);
            for pair in blocks.windows(2) {
                prop_assert_eq!(pair[0].end, pair[1].start);
            }
            for block in blocks {
                prop_assert!(block.start < block.end);
            }
            prop_assert_eq!(
                schedule.task_blocks().count() + schedule.unplaced.len(),
                tasks.len()
            );
            prop_assert_eq!(&b.generate(&routines, &tasks), &schedule);
        }

        #[test]
        fn prop_must_before_want_without_requeue(
            (day, routines) in arb_day(),
            tasks in arb_tasks(),
            overrun in prop_oneof![Just(OverrunPolicy::Allow), Just(OverrunPolicy::Truncate)],
        ) {
            let schedule = ScheduleBuilder::with_config(BuilderConfig { overrun, ..day })
                .generate(&routines, &tasks);
            let priority_of = |label: &str| {
                tasks.iter().find(|t| t.name == label).map(|t| t.priority)
            };
            let placed: Vec<_> = schedule
                .task_blocks()
                .filter_map(|b| priority_of(&b.label))
                .collect();
            let mut sorted = placed.clone();
            sorted.sort();
            prop_assert_eq!(placed, sorted);
        }
    }
}
