//! TOML-based planner configuration.
//!
//! Stores:
//! - Day bounds (when the timeline starts and ends)
//! - Free-time and overrun policies for the builder
//! - The default view range
//! - The fixed routine set
//!
//! Configuration is stored at `~/.config/focus-planner/config.toml`.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::clock::{self, hm};
use crate::error::{ConfigError, Result};
use crate::routine::{default_routines, validate_routines, RoutineSlot};
use crate::schedule::{BuilderConfig, FreeTimePolicy, OverrunPolicy, ScheduleBuilder};
use crate::view::ViewRange;

/// Day bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayConfig {
    #[serde(with = "clock::hhmm", default = "default_day_start")]
    pub start: NaiveTime,
    #[serde(with = "clock::hhmm", default = "default_day_end")]
    pub end: NaiveTime,
}

/// How idle time is filled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FreeTimeMode {
    #[default]
    Fixed,
    Remainder,
}

/// Builder policies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default)]
    pub free_time: FreeTimeMode,
    /// Length of each free block in `fixed` mode (minutes).
    #[serde(default = "default_free_block_minutes")]
    pub free_block_minutes: u32,
    #[serde(default)]
    pub overrun: OverrunPolicy,
}

/// View configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewConfig {
    #[serde(default)]
    pub default: ViewRange,
}

/// Planner configuration.
///
/// Serialized to/from TOML at `~/.config/focus-planner/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub day: DayConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default = "default_routines")]
    pub routines: Vec<RoutineSlot>,
}

fn default_day_start() -> NaiveTime {
    hm(7, 0)
}
fn default_day_end() -> NaiveTime {
    hm(23, 30)
}
fn default_free_block_minutes() -> u32 {
    30
}

impl Default for DayConfig {
    fn default() -> Self {
        Self {
            start: default_day_start(),
            end: default_day_end(),
        }
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            free_time: FreeTimeMode::default(),
            free_block_minutes: default_free_block_minutes(),
            overrun: OverrunPolicy::default(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            day: DayConfig::default(),
            policy: PolicyConfig::default(),
            view: ViewConfig::default(),
            routines: default_routines(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                        serde_json::Value::Number(n.into())
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the data directory, writing defaults if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed or
    /// fails validation, or if the default config cannot be written.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults if no file exists.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Persist to the data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        tracing::info!(path = %path.display(), "config saved");
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Update a value in memory by dot-separated key and re-validate.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the resulting configuration is invalid. `self` is unchanged on error.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json)?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Update a value by key and save.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.apply(key, value)?;
        self.save()
    }

    /// Check day bounds, policies and the routine set.
    pub fn validate(&self) -> Result<()> {
        self.builder_config().validate()?;
        validate_routines(&self.routines)?;
        Ok(())
    }

    pub fn builder_config(&self) -> BuilderConfig {
        let free_time = match self.policy.free_time {
            FreeTimeMode::Fixed => FreeTimePolicy::Fixed {
                minutes: self.policy.free_block_minutes,
            },
            FreeTimeMode::Remainder => FreeTimePolicy::Remainder,
        };
        BuilderConfig {
            day_start: self.day.start,
            day_end: self.day.end,
            free_time,
            overrun: self.policy.overrun,
        }
    }

    pub fn builder(&self) -> ScheduleBuilder {
        ScheduleBuilder::with_config(self.builder_config())
    }
}
