//! In-memory session state.
//!
//! The pending task list is the only mutable state in the planner. The
//! caller owns a [`Session`]; generation borrows the list read-only, so it
//! is unchanged no matter how many times the day is rebuilt.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::routine::RoutineSlot;
use crate::schedule::{Schedule, ScheduleBuilder};
use crate::task::{Priority, TaskRequest};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    tasks: Vec<TaskRequest>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a task from raw form input.
    ///
    /// A blank name is ignored without error and returns `Ok(false)`.
    ///
    /// # Errors
    /// Returns an error if the duration is off the 15-minute grid.
    pub fn submit(
        &mut self,
        name: &str,
        minutes: u32,
        priority: Priority,
    ) -> Result<bool, ValidationError> {
        if name.trim().is_empty() {
            tracing::debug!("ignoring task submission with empty name");
            return Ok(false);
        }
        let task = TaskRequest::new(name.trim(), minutes, priority)?;
        tracing::debug!(name = %task.name, minutes, %priority, "task added");
        self.tasks.push(task);
        Ok(true)
    }

    pub fn tasks(&self) -> &[TaskRequest] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Owned copy of the pending list.
    pub fn snapshot(&self) -> Vec<TaskRequest> {
        self.tasks.clone()
    }

    /// Drop every pending task.
    pub fn reset(&mut self) {
        tracing::info!(cleared = self.tasks.len(), "session reset");
        self.tasks.clear();
    }

    pub fn generate(&self, builder: &ScheduleBuilder, routines: &[RoutineSlot]) -> Schedule {
        builder.generate(routines, &self.tasks)
    }
}
