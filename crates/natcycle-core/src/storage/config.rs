//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Success modal auto-dismiss delays
//! - Deferred milestone check delay
//! - Session tick interval
//! - Share link settings
//!
//! Configuration is stored at `~/.config/natcycle/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, Result};
use crate::success::SuccessTimings;

/// Success modal configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModalsConfig {
    #[serde(default = "default_dropoff_auto_close_ms")]
    pub dropoff_auto_close_ms: u64,
    /// 0 keeps milestone celebrations open until dismissed.
    #[serde(default)]
    pub milestone_auto_close_ms: u64,
}

/// Milestone check configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MilestonesConfig {
    /// Delay between the drop-off modal opening and the milestone check.
    /// Must outlast the drop-off modal's auto-dismiss.
    #[serde(default = "default_check_delay_ms")]
    pub check_delay_ms: u64,
}

/// Async session driver configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

/// Share link configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareConfig {
    #[serde(default = "default_app_url")]
    pub app_url: String,
    #[serde(default = "default_hashtags")]
    pub hashtags: Vec<String>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/natcycle/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub modals: ModalsConfig,
    #[serde(default)]
    pub milestones: MilestonesConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub share: ShareConfig,
}

/// Upper bound for every delay: one day.
pub const MAX_DELAY_MS: u64 = 24 * 60 * 60 * 1000;

// Default functions
fn default_dropoff_auto_close_ms() -> u64 {
    5000
}
fn default_check_delay_ms() -> u64 {
    6000
}
fn default_tick_interval_ms() -> u64 {
    250
}
fn default_app_url() -> String {
    "https://natcycle.com".into()
}
fn default_hashtags() -> Vec<String> {
    vec!["NatCycle".into(), "Recycling".into(), "Sustainability".into()]
}

impl Default for ModalsConfig {
    fn default() -> Self {
        Self {
            dropoff_auto_close_ms: default_dropoff_auto_close_ms(),
            milestone_auto_close_ms: 0,
        }
    }
}

impl Default for MilestonesConfig {
    fn default() -> Self {
        Self {
            check_delay_ms: default_check_delay_ms(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            app_url: default_app_url(),
            hashtags: default_hashtags(),
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

        let (parents, leaf) = match key.rsplit_once('.') {
            Some((parents, leaf)) => (Some(parents), leaf),
            None => (None, key),
        };
        if leaf.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        for part in parents.into_iter().flat_map(|p| p.split('.')) {
            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        let obj = current.as_object_mut().ok_or_else(unknown)?;
        let existing = obj.get(leaf).ok_or_else(unknown)?;

        let new_value = match existing {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(
                value
                    .parse::<bool>()
                    .map_err(|e| invalid(e.to_string()))?,
            ),
            serde_json::Value::Number(_) => serde_json::Value::Number(
                value
                    .parse::<u64>()
                    .map_err(|e| invalid(format!("cannot parse '{value}' as number: {e}")))?
                    .into(),
            ),
            serde_json::Value::Array(_) => serde_json::Value::Array(
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(|s| serde_json::Value::String(s.to_string()))
                    .collect(),
            ),
            serde_json::Value::Object(_) => return Err(unknown()),
            _ => serde_json::Value::String(value.into()),
        };

        obj.insert(leaf.to_string(), new_value);
        Ok(())
    }

    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or create the default file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed or
    /// fails validation, or if the default config cannot be written.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

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
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let delays = [
            ("modals.dropoff_auto_close_ms", self.modals.dropoff_auto_close_ms),
            ("modals.milestone_auto_close_ms", self.modals.milestone_auto_close_ms),
            ("milestones.check_delay_ms", self.milestones.check_delay_ms),
        ];
        for (key, ms) in delays {
            if ms > MAX_DELAY_MS {
                return Err(ConfigError::InvalidValue {
                    key: key.into(),
                    message: format!("must be at most {MAX_DELAY_MS} ms, got {ms}"),
                });
            }
        }
        let auto_close = self.modals.dropoff_auto_close_ms;
        if auto_close > 0 && self.milestones.check_delay_ms <= auto_close {
            return Err(ConfigError::InvalidValue {
                key: "milestones.check_delay_ms".into(),
                message: format!(
                    "must exceed modals.dropoff_auto_close_ms ({auto_close}), got {}",
                    self.milestones.check_delay_ms
                ),
            });
        }
        if self.session.tick_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "session.tick_interval_ms".into(),
                message: "must be greater than zero".into(),
            });
        }
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

    /// Set a config value by key without saving. The result must still
    /// pass [`Config::validate`].
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json)?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// the result is invalid, or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.apply(key, value)?;
        self.save()
    }

    pub fn timings(&self) -> SuccessTimings {
        SuccessTimings::from_millis(
            self.modals.dropoff_auto_close_ms,
            self.modals.milestone_auto_close_ms,
            self.milestones.check_delay_ms,
        )
    }
}
