use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::progress::{QuizAffordance, QuizProgress, StreakTransition};

/// Every state change in the system produces an Event.
/// The CLI prints them; a GUI would poll or subscribe to them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    AnswerRecorded {
        points: u32,
        correct: bool,
        transition: StreakTransition,
        current_streak: u32,
        total_points: u64,
        at: DateTime<Utc>,
    },
    ProgressReset {
        at: DateTime<Utc>,
    },
    ProgressSnapshot {
        progress: QuizProgress,
        accuracy_pct: u32,
        has_played_today: bool,
        affordance: QuizAffordance,
        at: DateTime<Utc>,
    },
    CountdownTick {
        formatted: String,
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
}
