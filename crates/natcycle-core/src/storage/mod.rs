mod config;

pub use config::{
    Config, MilestonesConfig, ModalsConfig, SessionConfig, ShareConfig, MAX_DELAY_MS,
};

use std::path::PathBuf;

use crate::error::Result;

/// Returns `~/.config/natcycle[-dev]/` based on NATCYCLE_ENV.
///
/// Set NATCYCLE_ENV=dev to use the development config directory, or
/// NATCYCLE_CONFIG_DIR to point somewhere else entirely.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os("NATCYCLE_CONFIG_DIR") {
        let dir = PathBuf::from(dir);
        std::fs::create_dir_all(&dir)?;
        return Ok(dir);
    }

    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("NATCYCLE_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("natcycle-dev")
    } else {
        base_dir.join("natcycle")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
