mod config;

pub use config::{Config, DragConfig, GridConfig, SchedulingConfig};

use std::path::PathBuf;

use crate::error::CoreError;

/// Returns `~/.config/timeblock[-dev]/` based on TIMEBLOCK_ENV.
///
/// Set TIMEBLOCK_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, CoreError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("TIMEBLOCK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("timeblock-dev")
    } else {
        base_dir.join("timeblock")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
