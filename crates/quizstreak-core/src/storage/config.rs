//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Default scoring for recorded answers
//! - Whether the per-answer history is kept
//! - Countdown tick interval
//!
//! Configuration is stored at `~/.config/quizstreak/config.toml`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::ConfigError;

/// Quiz scoring configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizConfig {
    /// Points awarded for a correct answer when none are given explicitly.
    #[serde(default = "default_points_per_correct")]
    pub points_per_correct: u32,
    /// Keep a per-answer history row alongside the aggregate record.
    #[serde(default = "default_true")]
    pub track_history: bool,
}

/// Countdown display configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountdownConfig {
    /// Tick interval for the live countdown, in milliseconds.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/quizstreak/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub quiz: QuizConfig,
    #[serde(default)]
    pub countdown: CountdownConfig,
}

fn default_points_per_correct() -> u32 {
    10
}
fn default_tick_ms() -> u64 {
    1000
}
fn default_true() -> bool {
    true
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            points_per_correct: default_points_per_correct(),
            track_history: true,
        }
    }
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            quiz: QuizConfig::default(),
            countdown: CountdownConfig::default(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let value = lookup(&json, key)?;
        match value {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Update a value by dot-separated key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be
    /// parsed as the field's type.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        update(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Set a config value by key and persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.apply(key, value)?;
        self.save()
    }
}

fn lookup<'a>(root: &'a serde_json::Value, key: &str) -> Option<&'a serde_json::Value> {
    if key.is_empty() {
        return None;
    }
    let mut current = root;
    for part in key.split('.') {
        current = current.get(part)?;
    }
    Some(current)
}

fn update(root: &mut serde_json::Value, key: &str, value: &str) -> Result<(), ConfigError> {
    let unknown = || ConfigError::UnknownKey(key.to_string());
    let invalid = |message: String| ConfigError::InvalidValue {
        key: key.to_string(),
        message,
    };

    let (parents, leaf) = match key.rsplit_once('.') {
        Some((parents, leaf)) => (Some(parents), leaf),
        None if !key.is_empty() => (None, key),
        None => return Err(unknown()),
    };

    let target = match parents {
        Some(path) => path
            .split('.')
            .try_fold(root, |node, part| node.get_mut(part))
            .ok_or_else(unknown)?,
        None => root,
    };

    let object = target.as_object_mut().ok_or_else(unknown)?;
    let existing = object.get(leaf).ok_or_else(unknown)?;

    let new_value = match existing {
        serde_json::Value::Bool(_) => serde_json::Value::Bool(
            value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
        ),
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
            serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
        }
        _ => serde_json::Value::String(value.into()),
    };

    object.insert(leaf.to_string(), new_value);
    Ok(())
}
