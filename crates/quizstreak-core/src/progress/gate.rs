use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::record::QuizProgress;

/// Which action the quiz surface should offer.
///
/// Derived from the progress record, never stored. Being an enum, exactly
/// one affordance exists at a time: `Start` until an answer is recorded
/// today, `Results` afterwards, flipping back to `Start` at midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizAffordance {
    /// Today's quiz has not been attempted yet.
    Start,
    /// Today's quiz is done; show the results view.
    Results,
}

impl QuizAffordance {
    pub fn for_progress(progress: &QuizProgress, today: NaiveDate) -> Self {
        if progress.has_played_on(today) {
            QuizAffordance::Results
        } else {
            QuizAffordance::Start
        }
    }

    pub fn start_available(self) -> bool {
        self == QuizAffordance::Start
    }

    pub fn results_available(self) -> bool {
        self == QuizAffordance::Results
    }
}
