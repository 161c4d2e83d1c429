mod gate;
mod record;
mod store;
mod streak;

pub use gate::QuizAffordance;
pub use record::QuizProgress;
pub use store::{ProgressStore, PROGRESS_KEY};
pub use streak::{classify, next_streak, StreakTransition};
