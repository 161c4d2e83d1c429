//! Progress record load/mutate/persist.
//!
//! The store owns the in-memory record and a key-value persistence
//! surface. Persistence is best-effort in both directions: an absent or
//! malformed stored value loads as the default record, and a failed write
//! is logged while the in-memory record keeps the update, so readers stay
//! consistent for the rest of the session.

use chrono::{Local, NaiveDate, Utc};

use super::record::QuizProgress;
use super::streak;
use crate::events::Event;
use crate::storage::KeyValueStore;

pub const PROGRESS_KEY: &str = "quiz_progress";

pub struct ProgressStore<S: KeyValueStore> {
    kv: S,
    progress: QuizProgress,
}

impl<S: KeyValueStore> ProgressStore<S> {
    /// Load the persisted record, falling back to the all-zero default.
    /// Never fails.
    pub fn open(kv: S) -> Self {
        let progress = load_from(&kv);
        Self { kv, progress }
    }

    pub fn progress(&self) -> &QuizProgress {
        &self.progress
    }

    /// Record one answered question for today's local calendar date.
    pub fn record_answer(&mut self, points: u32, correct: bool) -> QuizProgress {
        self.record_answer_on(points, correct, Local::now().date_naive())
    }

    /// Record one answered question for an explicit calendar date.
    ///
    /// Counters only ever grow; the streak follows the day-boundary rules
    /// in [`streak`]. The updated record is persisted and returned.
    pub fn record_answer_on(
        &mut self,
        points: u32,
        correct: bool,
        today: NaiveDate,
    ) -> QuizProgress {
        let transition = streak::classify(self.progress.last_played_date, today);
        let new_streak =
            streak::next_streak(self.progress.current_streak, self.progress.last_played_date, today);

        self.progress.total_points = self.progress.total_points.saturating_add(points as u64);
        self.progress.current_streak = new_streak;
        self.progress.longest_streak = self.progress.longest_streak.max(new_streak);
        self.progress.last_played_date = Some(today);
        self.progress.questions_answered = self.progress.questions_answered.saturating_add(1);
        if correct {
            self.progress.correct_answers = self.progress.correct_answers.saturating_add(1);
        }

        self.persist();
        let event = Event::AnswerRecorded {
            points,
            correct,
            transition,
            current_streak: new_streak,
            total_points: self.progress.total_points,
            at: Utc::now(),
        };
        tracing::debug!(?event, "answer recorded");
        self.progress.clone()
    }

    /// Overwrite the record with the all-zero default and return it.
    pub fn reset(&mut self) -> QuizProgress {
        self.progress = QuizProgress::default();
        self.persist();
        tracing::debug!(event = ?Event::ProgressReset { at: Utc::now() }, "progress reset");
        self.progress.clone()
    }

    pub fn has_played_today(&self) -> bool {
        self.has_played_on(Local::now().date_naive())
    }

    pub fn has_played_on(&self, today: NaiveDate) -> bool {
        self.progress.has_played_on(today)
    }

    /// Full state snapshot for today's local calendar date.
    pub fn snapshot(&self) -> Event {
        self.snapshot_on(Local::now().date_naive())
    }

    pub fn snapshot_on(&self, today: NaiveDate) -> Event {
        Event::ProgressSnapshot {
            progress: self.progress.clone(),
            accuracy_pct: self.progress.accuracy(),
            has_played_today: self.has_played_on(today),
            affordance: super::QuizAffordance::for_progress(&self.progress, today),
            at: Utc::now(),
        }
    }

    fn persist(&self) {
        let json = match serde_json::to_string(&self.progress) {
            Ok(json) => json,
            Err(error) => {
                tracing::warn!(%error, "failed to serialize progress record");
                return;
            }
        };
        if let Err(error) = self.kv.set(PROGRESS_KEY, &json) {
            tracing::warn!(%error, "failed to persist progress record, keeping in-memory state");
        }
    }
}

fn load_from<S: KeyValueStore>(kv: &S) -> QuizProgress {
    match kv.get(PROGRESS_KEY) {
        Ok(Some(json)) => match serde_json::from_str(&json) {
            Ok(progress) => progress,
            Err(error) => {
                tracing::warn!(%error, "malformed progress record, starting from defaults");
                QuizProgress::default()
            }
        },
        Ok(None) => QuizProgress::default(),
        Err(error) => {
            tracing::warn!(%error, "failed to read progress record, starting from defaults");
            QuizProgress::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemoryStore {
        values: RefCell<HashMap<String, String>>,
    }

    impl KeyValueStore for MemoryStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            Ok(self.values.borrow().get(key).cloned())
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.values.borrow_mut().insert(key.into(), value.into());
            Ok(())
        }
    }

    /// Simulates storage being disabled or over quota.
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::QueryFailed("storage disabled".into()))
        }
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn seeded() -> QuizProgress {
        QuizProgress {
            total_points: 50,
            current_streak: 3,
            longest_streak: 5,
            last_played_date: Some(date("2024-01-10")),
            questions_answered: 20,
            correct_answers: 15,
        }
    }

    fn seed(kv: &MemoryStore, progress: &QuizProgress) {
        kv.set(PROGRESS_KEY, &serde_json::to_string(progress).unwrap())
            .unwrap();
    }

    #[test]
    fn fresh_store_loads_defaults() {
        let store = ProgressStore::open(MemoryStore::default());
        assert_eq!(store.progress(), &QuizProgress::default());
        assert!(!store.has_played_on(date("2024-01-11")));
    }

    #[test]
    fn first_answer_starts_streak_at_one() {
        let mut store = ProgressStore::open(MemoryStore::default());
        let updated = store.record_answer_on(10, true, date("2024-01-11"));
        assert_eq!(updated.current_streak, 1);
        assert_eq!(updated.longest_streak, 1);
        assert_eq!(updated.total_points, 10);
        assert_eq!(updated.last_played_date, Some(date("2024-01-11")));
    }

    #[test]
    fn next_day_answer_extends_streak() {
        let kv = MemoryStore::default();
        seed(&kv, &seeded());
        let mut store = ProgressStore::open(&kv);

        let updated = store.record_answer_on(10, true, date("2024-01-11"));
        assert_eq!(
            updated,
            QuizProgress {
                total_points: 60,
                current_streak: 4,
                longest_streak: 5,
                last_played_date: Some(date("2024-01-11")),
                questions_answered: 21,
                correct_answers: 16,
            }
        );
    }

    #[test]
    fn gap_resets_streak_but_keeps_longest() {
        let kv = MemoryStore::default();
        seed(&kv, &seeded());
        let mut store = ProgressStore::open(&kv);

        let updated = store.record_answer_on(10, false, date("2024-01-15"));
        assert_eq!(updated.current_streak, 1);
        assert_eq!(updated.longest_streak, 5);
        assert_eq!(updated.correct_answers, 15);
        assert_eq!(updated.questions_answered, 21);
    }

    #[test]
    fn same_day_answers_only_grow_counters() {
        let mut store = ProgressStore::open(MemoryStore::default());
        let today = date("2024-01-11");
        let first = store.record_answer_on(10, true, today);
        let second = store.record_answer_on(5, false, today);

        assert_eq!(second.current_streak, first.current_streak);
        assert_eq!(second.questions_answered, 2);
        assert_eq!(second.correct_answers, 1);
        assert_eq!(second.total_points, 15);
    }

    #[test]
    fn longest_streak_tracks_new_peak() {
        let kv = MemoryStore::default();
        seed(
            &kv,
            &QuizProgress {
                current_streak: 5,
                longest_streak: 5,
                last_played_date: Some(date("2024-01-10")),
                ..Default::default()
            },
        );
        let mut store = ProgressStore::open(&kv);
        let updated = store.record_answer_on(1, true, date("2024-01-11"));
        assert_eq!(updated.current_streak, 6);
        assert_eq!(updated.longest_streak, 6);
    }

    #[test]
    fn record_then_read_round_trips() {
        let kv = MemoryStore::default();
        let mut store = ProgressStore::open(&kv);
        let returned = store.record_answer_on(10, true, date("2024-01-11"));
        assert_eq!(store.progress(), &returned);

        let reopened = ProgressStore::open(&kv);
        assert_eq!(reopened.progress(), &returned);
    }

    #[test]
    fn reset_restores_defaults_everywhere() {
        let kv = MemoryStore::default();
        seed(&kv, &seeded());
        let mut store = ProgressStore::open(&kv);

        let cleared = store.reset();
        assert_eq!(cleared, QuizProgress::default());

        let reopened = ProgressStore::open(&kv);
        assert_eq!(reopened.progress(), &QuizProgress::default());
    }

    #[test]
    fn malformed_record_loads_as_defaults() {
        let kv = MemoryStore::default();
        kv.set(PROGRESS_KEY, "definitely not json").unwrap();
        let store = ProgressStore::open(&kv);
        assert_eq!(store.progress(), &QuizProgress::default());
    }

    #[test]
    fn garbled_date_loads_as_defaults() {
        let kv = MemoryStore::default();
        kv.set(PROGRESS_KEY, r#"{"totalPoints":10,"lastPlayedDate":"not-a-date"}"#)
            .unwrap();
        let store = ProgressStore::open(&kv);
        assert_eq!(store.progress(), &QuizProgress::default());
    }

    #[test]
    fn write_failure_keeps_session_state() {
        let mut store = ProgressStore::open(ReadOnlyStore);
        let updated = store.record_answer_on(10, true, date("2024-01-11"));
        assert_eq!(updated.total_points, 10);
        assert_eq!(store.progress().current_streak, 1);
        assert!(store.has_played_on(date("2024-01-11")));
    }

    #[test]
    fn persisted_payload_uses_wire_field_names() {
        let kv = MemoryStore::default();
        let mut store = ProgressStore::open(&kv);
        store.record_answer_on(10, true, date("2024-01-11"));

        let raw = kv.get(PROGRESS_KEY).unwrap().unwrap();
        assert!(raw.contains("\"totalPoints\":10"));
        assert!(raw.contains("\"lastPlayedDate\":\"2024-01-11\""));
    }

    #[test]
    fn future_last_played_resets_to_one() {
        let kv = MemoryStore::default();
        seed(
            &kv,
            &QuizProgress {
                current_streak: 7,
                longest_streak: 7,
                last_played_date: Some(date("2024-01-12")),
                ..Default::default()
            },
        );
        let mut store = ProgressStore::open(&kv);
        let updated = store.record_answer_on(1, true, date("2024-01-11"));
        assert_eq!(updated.current_streak, 1);
        assert_eq!(updated.longest_streak, 7);
    }

    proptest! {
        #[test]
        fn invariants_hold_over_any_operation_sequence(
            ops in prop::collection::vec((0u32..100, any::<bool>(), 0u64..4), 1..40)
        ) {
            let mut store = ProgressStore::open(MemoryStore::default());
            let mut today = date("2024-01-01");
            let mut previous = store.progress().clone();

            for (points, correct, advance) in ops {
                today = today
                    .checked_add_days(chrono::Days::new(advance))
                    .unwrap();
                let updated = store.record_answer_on(points, correct, today);

                prop_assert!(updated.total_points >= previous.total_points);
                prop_assert!(updated.questions_answered > previous.questions_answered);
                prop_assert!(updated.correct_answers >= previous.correct_answers);
                prop_assert!(updated.correct_answers <= updated.questions_answered);
                prop_assert!(updated.longest_streak >= updated.current_streak);
                prop_assert!(updated.current_streak >= 1);
                prop_assert_eq!(updated.last_played_date, Some(today));
                previous = updated;
            }
        }
    }
}
