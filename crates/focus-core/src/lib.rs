//! # Focus Core Library
//!
//! This library provides the core logic for the Focus daily planner. It
//! follows a CLI-first design: the `focus-cli` binary is a thin layer over
//! the same types exported here.
//!
//! ## Architecture
//!
//! - **Schedule builder**: a single forward sweep that lays fixed routines
//!   and priority-sorted tasks onto one day, marking the rest as free time
//! - **Session**: the caller-owned, in-memory list of pending tasks
//! - **View/Render**: post-generation filtering and table output
//! - **Storage**: TOML-based configuration (day bounds, policies, routines)
//!
//! ## Key Components
//!
//! - [`ScheduleBuilder`]: the builder and its [`BuilderConfig`]
//! - [`Session`]: pending task list with submit/reset
//! - [`Config`]: application configuration management

pub mod clock;
pub mod error;
pub mod render;
pub mod routine;
pub mod schedule;
pub mod session;
pub mod storage;
pub mod task;
pub mod view;

pub use error::{ConfigError, CoreError, ValidationError};
pub use routine::{default_routines, RoutineSlot};
pub use schedule::{
    build_schedule, BlockCategory, BuilderConfig, FreeTimePolicy, OverrunPolicy, Schedule,
    ScheduleBlock, ScheduleBuilder,
};
pub use session::Session;
pub use storage::Config;
pub use task::{Priority, TaskRequest};
pub use view::ViewRange;
