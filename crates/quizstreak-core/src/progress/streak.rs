//! Calendar-day streak arithmetic.
//!
//! A streak counts consecutive local calendar days with at least one
//! recorded answer. Day boundaries are calendar dates, never elapsed
//! hours: an answer at 23:50 followed by one at 00:10 the next day is a
//! valid next-day continuation even though less than 24 hours passed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How a recorded answer on `today` relates to the previous play date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakTransition {
    /// Already played today; the streak stays as it is.
    Unchanged,
    /// First-ever play, or a continuation from yesterday.
    Extended,
    /// A gap of two or more days, or a last-played date in the future.
    Reset,
}

/// Classify the day-boundary transition for an answer recorded on `today`.
///
/// First-ever play and yesterday-continuation are deliberately the same
/// branch: both extend, and `0 + 1 = 1` starts a fresh streak.
pub fn classify(last_played: Option<NaiveDate>, today: NaiveDate) -> StreakTransition {
    match last_played {
        Some(last) if last == today => StreakTransition::Unchanged,
        None => StreakTransition::Extended,
        Some(last) => match today.pred_opt() {
            Some(yesterday) if last == yesterday => StreakTransition::Extended,
            _ => StreakTransition::Reset,
        },
    }
}

/// The streak value after recording an answer on `today`.
pub fn next_streak(current: u32, last_played: Option<NaiveDate>, today: NaiveDate) -> u32 {
    match classify(last_played, today) {
        StreakTransition::Unchanged => current,
        StreakTransition::Extended => current.saturating_add(1),
        StreakTransition::Reset => 1,
    }
}
