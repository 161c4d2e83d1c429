//! SQLite-based answer history and key-value storage.
//!
//! Provides persistent storage for:
//! - The answer history (one row per recorded answer)
//! - Aggregate statistics (daily and all-time)
//! - Key-value store for application state, including the progress record

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDate, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use super::{data_dir, KeyValueStore};
use crate::error::StorageError;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Stats {
    pub questions_answered: u64,
    pub correct_answers: u64,
    pub total_points: u64,
    pub accuracy_pct: u32,
    pub today_answered: u64,
    pub today_points: u64,
}

/// SQLite database for answer history and application state.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/quizstreak/quizstreak.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StorageError> {
        Self::open_at(data_dir()?.join("quizstreak.db"))
    }

    /// Open the database at an explicit path.
    pub fn open_at(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: PathBuf::from(path),
            source,
        })?;
        let db = Self { conn };
        db.migrate()
            .map_err(|e| StorageError::MigrationFailed(e.to_string()))?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::QueryFailed(e.to_string()))?;
        let db = Self { conn };
        db.migrate()
            .map_err(|e| StorageError::MigrationFailed(e.to_string()))?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS answers (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                points      INTEGER NOT NULL,
                correct     INTEGER NOT NULL,
                answered_at TEXT NOT NULL,
                local_date  TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_answers_local_date ON answers(local_date);",
        )?;
        Ok(())
    }

    /// Append one answer to the history.
    ///
    /// `local_date` is the local calendar day the answer counts toward;
    /// `answered_at` is the precise UTC instant.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn record_answer(
        &self,
        points: u32,
        correct: bool,
        answered_at: DateTime<Utc>,
        local_date: NaiveDate,
    ) -> Result<i64, rusqlite::Error> {
        self.conn.execute(
            "INSERT INTO answers (points, correct, answered_at, local_date)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                points,
                correct as i64,
                answered_at.to_rfc3339(),
                local_date.format("%Y-%m-%d").to_string(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn stats_today(&self) -> Result<Stats, rusqlite::Error> {
        self.stats_for_day(Local::now().date_naive())
    }

    pub fn stats_for_day(&self, day: NaiveDate) -> Result<Stats, rusqlite::Error> {
        let day = day.format("%Y-%m-%d").to_string();
        let row = self.conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(correct), 0), COALESCE(SUM(points), 0)
             FROM answers WHERE local_date = ?1",
            params![day],
            |row| {
                Ok((
                    row.get::<_, u64>(0)?,
                    row.get::<_, u64>(1)?,
                    row.get::<_, u64>(2)?,
                ))
            },
        )?;

        let (answered, correct, points) = row;
        Ok(Stats {
            questions_answered: answered,
            correct_answers: correct,
            total_points: points,
            accuracy_pct: accuracy(correct, answered),
            today_answered: answered,
            today_points: points,
        })
    }

    pub fn stats_all(&self) -> Result<Stats, rusqlite::Error> {
        let row = self.conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(correct), 0), COALESCE(SUM(points), 0)
             FROM answers",
            [],
            |row| {
                Ok((
                    row.get::<_, u64>(0)?,
                    row.get::<_, u64>(1)?,
                    row.get::<_, u64>(2)?,
                ))
            },
        )?;
        let (answered, correct, points) = row;

        let today = self.stats_today()?;
        Ok(Stats {
            questions_answered: answered,
            correct_answers: correct,
            total_points: points,
            accuracy_pct: accuracy(correct, answered),
            today_answered: today.today_answered,
            today_points: today.today_points,
        })
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

impl KeyValueStore for Database {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.kv_get(key).map_err(StorageError::from)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.kv_set(key, value).map_err(StorageError::from)
    }
}

fn accuracy(correct: u64, answered: u64) -> u32 {
    if answered == 0 {
        return 0;
    }
    (correct as f64 / answered as f64 * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
        db.kv_set("test", "hello").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "hello");
        db.kv_set("test", "replaced").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "replaced");
    }

    #[test]
    fn record_and_aggregate() {
        let db = Database::open_memory().unwrap();
        let now = Utc::now();
        db.record_answer(10, true, now, date("2024-01-10")).unwrap();
        db.record_answer(5, false, now, date("2024-01-10")).unwrap();
        db.record_answer(10, true, now, date("2024-01-11")).unwrap();

        let stats = db.stats_all().unwrap();
        assert_eq!(stats.questions_answered, 3);
        assert_eq!(stats.correct_answers, 2);
        assert_eq!(stats.total_points, 25);
        assert_eq!(stats.accuracy_pct, 67);
    }

    #[test]
    fn daily_stats_only_count_that_day() {
        let db = Database::open_memory().unwrap();
        let now = Utc::now();
        db.record_answer(10, true, now, date("2024-01-10")).unwrap();
        db.record_answer(5, true, now, date("2024-01-11")).unwrap();

        let day = db.stats_for_day(date("2024-01-10")).unwrap();
        assert_eq!(day.questions_answered, 1);
        assert_eq!(day.total_points, 10);
        assert_eq!(day.accuracy_pct, 100);
    }

    #[test]
    fn empty_history_has_zero_accuracy() {
        let db = Database::open_memory().unwrap();
        let stats = db.stats_all().unwrap();
        assert_eq!(stats.questions_answered, 0);
        assert_eq!(stats.accuracy_pct, 0);
    }
}
