//! User-submitted task requests.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Shortest task that can be submitted, in minutes.
pub const MIN_TASK_MINUTES: u32 = 15;
/// Durations must be multiples of this, in minutes.
pub const TASK_STEP_MINUTES: u32 = 15;

/// Priority class. Variant order is placement order: `Must` before `Want`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Must,
    Want,
}

impl Priority {
    /// Ordinal rank (lower is placed first).
    pub fn rank(&self) -> u8 {
        match self {
            Self::Must => 1,
            Self::Want => 2,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Must => write!(f, "Must"),
            Self::Want => write!(f, "Want"),
        }
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "must" => Ok(Self::Must),
            "want" => Ok(Self::Want),
            other => Err(ValidationError::InvalidValue {
                field: "priority".into(),
                message: format!("expected 'must' or 'want', got '{other}'"),
            }),
        }
    }
}

/// A task waiting to be placed on the day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRequest {
    pub name: String,
    /// Duration in minutes.
    pub minutes: u32,
    pub priority: Priority,
}

impl TaskRequest {
    /// Create a task, checking the name and duration grid.
    ///
    /// # Errors
    /// Returns an error if the name is blank or the duration is below
    /// [`MIN_TASK_MINUTES`] or not a multiple of [`TASK_STEP_MINUTES`].
    pub fn new(
        name: impl Into<String>,
        minutes: u32,
        priority: Priority,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        validate_duration(minutes)?;
        Ok(Self {
            name,
            minutes,
            priority,
        })
    }
}

/// Check a duration against the submission grid.
pub fn validate_duration(minutes: u32) -> Result<(), ValidationError> {
    if minutes < MIN_TASK_MINUTES || minutes % TASK_STEP_MINUTES != 0 {
        return Err(ValidationError::InvalidDuration {
            minutes,
            min: MIN_TASK_MINUTES,
            step: TASK_STEP_MINUTES,
        });
    }
    Ok(())
}
