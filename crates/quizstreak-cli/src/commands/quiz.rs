use clap::Subcommand;
use quizstreak_core::progress::ProgressStore;
use quizstreak_core::storage::{Config, Database};

#[derive(Subcommand)]
pub enum QuizAction {
    /// Record an answer for today's quiz
    Answer {
        /// Points awarded (defaults to quiz.points_per_correct for correct answers)
        #[arg(long)]
        points: Option<u32>,
        /// Mark the answer as incorrect
        #[arg(long)]
        wrong: bool,
    },
    /// Print current progress as JSON
    Status,
    /// Reset progress to the all-zero defaults
    Reset,
}

pub fn run(action: QuizAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let db = Database::open()?;

    match action {
        QuizAction::Answer { points, wrong } => {
            let correct = !wrong;
            let points = points.unwrap_or(if correct {
                config.quiz.points_per_correct
            } else {
                0
            });

            if config.quiz.track_history {
                db.record_answer(
                    points,
                    correct,
                    chrono::Utc::now(),
                    chrono::Local::now().date_naive(),
                )?;
            }

            let mut store = ProgressStore::open(db);
            let updated = store.record_answer(points, correct);
            println!("{}", serde_json::to_string_pretty(&updated)?);
        }
        QuizAction::Status => {
            let store = ProgressStore::open(db);
            println!("{}", serde_json::to_string_pretty(&store.snapshot())?);
        }
        QuizAction::Reset => {
            let mut store = ProgressStore::open(db);
            let cleared = store.reset();
            println!("{}", serde_json::to_string_pretty(&cleared)?);
        }
    }
    Ok(())
}
