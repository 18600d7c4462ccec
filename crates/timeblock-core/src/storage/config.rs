//! TOML-based engine configuration.
//!
//! Holds the host-supplied parameters of the engine:
//! - Grid hours and slot width
//! - Default task duration for auto placement
//! - Drag scale, bounds and snap resolution
//!
//! Configuration is stored at `~/.config/timeblock/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, CoreError, ScheduleError};
use crate::grid::{Interval, TimeGrid};
use crate::scheduler::{DragRescheduler, SchedulerConfig};

/// Day grid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    #[serde(default = "default_grid_lower_hour")]
    pub lower_hour: u32,
    #[serde(default = "default_grid_upper_hour")]
    pub upper_hour: u32,
    #[serde(default = "default_slot_minutes")]
    pub slot_minutes: u32,
}

/// Auto placement configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingConfig {
    #[serde(default = "default_duration_minutes")]
    pub default_duration_minutes: u32,
}

/// Drag configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragConfig {
    #[serde(default = "default_pixels_per_minute")]
    pub pixels_per_minute: f64,
    #[serde(default = "default_drag_lower_hour")]
    pub lower_hour: u32,
    #[serde(default = "default_drag_upper_hour")]
    pub upper_hour: u32,
    /// Drag offsets snap to multiples of this many minutes.
    #[serde(default = "default_snap_minutes")]
    pub snap_minutes: u32,
}

/// Engine configuration.
///
/// Serialized to/from TOML at `~/.config/timeblock/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub scheduling: SchedulingConfig,
    #[serde(default)]
    pub drag: DragConfig,
}

// Default functions
fn default_grid_lower_hour() -> u32 {
    8
}
fn default_grid_upper_hour() -> u32 {
    18
}
fn default_slot_minutes() -> u32 {
    15
}
fn default_duration_minutes() -> u32 {
    30
}
fn default_pixels_per_minute() -> f64 {
    2.0
}
fn default_drag_lower_hour() -> u32 {
    5
}
fn default_drag_upper_hour() -> u32 {
    23
}
fn default_snap_minutes() -> u32 {
    1
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            lower_hour: default_grid_lower_hour(),
            upper_hour: default_grid_upper_hour(),
            slot_minutes: default_slot_minutes(),
        }
    }
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            default_duration_minutes: default_duration_minutes(),
        }
    }
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            pixels_per_minute: default_pixels_per_minute(),
            lower_hour: default_drag_lower_hour(),
            upper_hour: default_drag_upper_hour(),
            snap_minutes: default_snap_minutes(),
        }
    }
}

impl GridConfig {
    pub fn grid(&self) -> Result<TimeGrid, ScheduleError> {
        TimeGrid::generate(self.lower_hour, self.upper_hour, self.slot_minutes)
    }
}

impl SchedulingConfig {
    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            default_duration_minutes: self.default_duration_minutes,
        }
    }
}

impl DragConfig {
    /// Allowed drag range, `[lower_hour:00, upper_hour:00)`.
    pub fn bounds(&self) -> Result<Interval, ScheduleError> {
        if self.upper_hour > 24 || self.upper_hour <= self.lower_hour {
            return Err(ScheduleError::InvalidConfig(format!(
                "drag hours {}..{} must satisfy lower < upper <= 24",
                self.lower_hour, self.upper_hour
            )));
        }
        Interval::from_minutes(i64::from(self.lower_hour) * 60, i64::from(self.upper_hour) * 60)
    }

    pub fn rescheduler(&self) -> Result<DragRescheduler, ScheduleError> {
        DragRescheduler::new(self.snap_minutes)
    }
}

impl Config {
    /// The day grid described by `[grid]`.
    pub fn time_grid(&self) -> Result<TimeGrid, ScheduleError> {
        self.grid.grid()
    }

    fn get_json_value_by_path<'a>(root: &'a serde_json::Value, key: &str) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(root: &mut serde_json::Value, key: &str, value: &str) -> Result<(), ConfigError> {
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
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;

            let new_value = match existing {
                serde_json::Value::Bool(_) => value
                    .parse::<bool>()
                    .map(serde_json::Value::Bool)
                    .map_err(|e| invalid(e.to_string()))?,
                serde_json::Value::Number(_) => {
                    if let Ok(n) = value.parse::<u64>() {
                        serde_json::Value::Number(n.into())
                    } else if let Ok(n) = value.parse::<f64>() {
                        serde_json::Number::from_f64(n)
                            .map(serde_json::Value::Number)
                            .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                    } else {
                        return Err(invalid(format!("cannot parse '{value}' as number")));
                    }
                }
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    return Err(invalid("section keys cannot be set directly".to_string()));
                }
                _ => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    pub fn path() -> Result<PathBuf, CoreError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults there if missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, CoreError> {
        let path = Self::path()?;
        if path.exists() {
            return Self::load_from(&path);
        }
        let cfg = Self::default();
        cfg.save_to(&path)?;
        Ok(cfg)
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, CoreError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
                .into())
            }
        };
        let cfg: Config = toml::from_str(&content).map_err(ConfigError::from)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), CoreError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), CoreError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
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

    /// Set a value by dot-separated key, keeping the field's type.
    ///
    /// The change is validated but not saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the resulting configuration is invalid.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Flattened `key = value` pairs, for listing.
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut entries = Vec::new();
        if let Ok(serde_json::Value::Object(sections)) = serde_json::to_value(self) {
            for (section, fields) in sections {
                if let serde_json::Value::Object(fields) = fields {
                    for (field, value) in fields {
                        entries.push((format!("{section}.{field}"), value.to_string()));
                    }
                }
            }
        }
        entries
    }

    /// Check every section against the engine's constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, err: ScheduleError| ConfigError::InvalidValue {
            key: key.to_string(),
            message: err.to_string(),
        };

        self.grid.grid().map_err(|e| invalid("grid", e))?;
        if self.scheduling.default_duration_minutes == 0 {
            return Err(ConfigError::InvalidValue {
                key: "scheduling.default_duration_minutes".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if !self.drag.pixels_per_minute.is_finite() || self.drag.pixels_per_minute <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "drag.pixels_per_minute".to_string(),
                message: "must be a positive number".to_string(),
            });
        }
        self.drag.bounds().map_err(|e| invalid("drag", e))?;
        self.drag
            .rescheduler()
            .map_err(|e| invalid("drag.snap_minutes", e))?;
        Ok(())
    }
}
