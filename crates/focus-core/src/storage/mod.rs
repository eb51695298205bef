mod config;

pub use config::{Config, DayConfig, FreeTimeMode, PolicyConfig, ViewConfig};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the planner's config directory, creating it if needed.
///
/// `FOCUS_PLANNER_HOME` overrides the location outright. Otherwise it is
/// `~/.config/focus-planner[-dev]/`, with `FOCUS_PLANNER_ENV=dev` selecting
/// the development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("FOCUS_PLANNER_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env =
                std::env::var("FOCUS_PLANNER_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("focus-planner-dev")
            } else {
                base_dir.join("focus-planner")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|source| ConfigError::DataDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}
