//! # Quizstreak Core Library
//!
//! This library provides the core business logic for Quizstreak, a daily
//! quiz companion. It implements a CLI-first philosophy where all operations
//! are available via a standalone CLI binary, with any GUI being a thin
//! layer over the same core library.
//!
//! ## Architecture
//!
//! - **Progress**: A durable per-device quiz record (points, streaks,
//!   accuracy counters) mutated through a single record-answer operation
//! - **Countdown**: A wall-clock view of the time remaining until local
//!   midnight, when the next daily quiz unlocks
//! - **Storage**: SQLite-based answer history plus a key-value store for
//!   application state, and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`ProgressStore`]: Load/mutate/persist the quiz progress record
//! - [`QuizAffordance`]: Which action the quiz surface should offer today
//! - [`CountdownClock`]: Midnight countdown computation and live publisher
//! - [`Database`]: Answer history and key-value persistence
//! - [`Config`]: Application configuration management

pub mod countdown;
pub mod error;
pub mod events;
pub mod progress;
pub mod storage;

pub use countdown::{CountdownClock, CountdownFrame};
pub use error::{ConfigError, CoreError, StorageError};
pub use events::Event;
pub use progress::{ProgressStore, QuizAffordance, QuizProgress, StreakTransition};
pub use storage::{Config, Database, KeyValueStore, Stats};
