mod config;
pub mod database;

pub use config::Config;
pub use database::{Database, Stats};

use std::path::PathBuf;

use crate::error::StorageError;

/// The persistence surface the progress record lives behind: get/set of
/// strings by key. Reads of absent keys yield `None`; writes are
/// best-effort from the caller's perspective.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

/// Returns `~/.config/quizstreak[-dev]/` based on QUIZSTREAK_ENV.
///
/// Set QUIZSTREAK_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("QUIZSTREAK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("quizstreak-dev")
    } else {
        base_dir.join("quizstreak")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
