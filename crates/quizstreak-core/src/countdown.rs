//! Countdown to the next daily quiz.
//!
//! The countdown is a wall-clock view with no stored state: each tick
//! recomputes the time remaining until the next local midnight, so the
//! boundary rolls over without any external reset.
//!
//! ## Usage
//!
//! ```ignore
//! // One-shot:
//! let frame = CountdownClock::frame_now();
//! println!("{}", frame.formatted);
//!
//! // Live (inside a Tokio runtime):
//! let mut frames = CountdownClock::subscribe(Duration::from_secs(1));
//! while frames.changed().await.is_ok() {
//!     println!("{}", frames.borrow().formatted);
//! }
//! ```
//!
//! The publisher task exits as soon as every receiver is dropped; no
//! timers outlive their subscribers.

use chrono::{Local, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// One tick of the countdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownFrame {
    /// Milliseconds until the next local midnight.
    pub remaining_ms: u64,
    /// Zero-padded `HH:MM:SS`.
    pub formatted: String,
}

pub struct CountdownClock;

impl CountdownClock {
    /// Compute the frame for the current local wall-clock time.
    pub fn frame_now() -> CountdownFrame {
        Self::frame_at(Local::now().naive_local())
    }

    /// Compute the frame for an explicit local wall-clock time.
    pub fn frame_at(now: NaiveDateTime) -> CountdownFrame {
        let remaining = Self::remaining_until_midnight(now);
        CountdownFrame {
            remaining_ms: remaining.num_milliseconds().max(0) as u64,
            formatted: Self::format_hms(remaining),
        }
    }

    /// Time until the next local midnight. Exactly at midnight this is a
    /// full day, since the boundary has already advanced.
    pub fn remaining_until_midnight(now: NaiveDateTime) -> TimeDelta {
        let next_midnight = now
            .date()
            .succ_opt()
            .map(|d| d.and_time(chrono::NaiveTime::MIN))
            .unwrap_or(now); // calendar range exhausted
        next_midnight - now
    }

    fn format_hms(remaining: TimeDelta) -> String {
        let total_secs = remaining.num_seconds().max(0);
        format!(
            "{:02}:{:02}:{:02}",
            total_secs / 3600,
            total_secs % 3600 / 60,
            total_secs % 60
        )
    }

    /// Spawn a publisher that recomputes the frame on every tick.
    ///
    /// Must be called from within a Tokio runtime. The spawned task stops
    /// once all receivers are dropped.
    pub fn subscribe(tick: std::time::Duration) -> watch::Receiver<CountdownFrame> {
        let (tx, rx) = watch::channel(Self::frame_now());
        tokio::spawn(Self::publish(tx, tick));
        rx
    }

    async fn publish(tx: watch::Sender<CountdownFrame>, tick: std::time::Duration) {
        let mut timer = tokio::time::interval(tick);
        loop {
            tokio::select! {
                _ = timer.tick() => {
                    if tx.send(Self::frame_now()).is_err() {
                        break;
                    }
                }
                _ = tx.closed() => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(date: &str, h: u32, m: u32, s: u32) -> NaiveDateTime {
        date.parse::<NaiveDate>()
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn formats_zero_padded_hms() {
        let frame = CountdownClock::frame_at(at("2024-01-11", 21, 30, 5));
        assert_eq!(frame.formatted, "02:29:55");
    }

    #[test]
    fn one_second_before_midnight() {
        let frame = CountdownClock::frame_at(at("2024-01-11", 23, 59, 59));
        assert_eq!(frame.formatted, "00:00:01");
        assert_eq!(frame.remaining_ms, 1_000);
    }

    #[test]
    fn exactly_midnight_counts_a_full_day() {
        let frame = CountdownClock::frame_at(at("2024-01-12", 0, 0, 0));
        assert_eq!(frame.formatted, "24:00:00");
        assert_eq!(frame.remaining_ms, 86_400_000);
    }

    #[test]
    fn rolls_over_to_the_new_boundary() {
        let before = CountdownClock::frame_at(at("2024-01-11", 23, 59, 59));
        let after = CountdownClock::frame_at(at("2024-01-12", 0, 0, 1));
        assert_eq!(before.remaining_ms, 1_000);
        assert_eq!(after.remaining_ms, 86_399_000);
        assert_eq!(after.formatted, "23:59:59");
    }

    #[test]
    fn sub_second_remainders_truncate() {
        let now = at("2024-01-11", 23, 59, 59)
            .checked_add_signed(TimeDelta::milliseconds(500))
            .unwrap();
        let frame = CountdownClock::frame_at(now);
        assert_eq!(frame.formatted, "00:00:00");
        assert_eq!(frame.remaining_ms, 500);
    }

    #[tokio::test]
    async fn publisher_emits_frames() {
        let mut rx = CountdownClock::subscribe(std::time::Duration::from_millis(5));
        rx.changed().await.unwrap();
        let formatted = rx.borrow().formatted.clone();
        assert_eq!(formatted.len(), 8);
        assert_eq!(formatted.as_bytes()[2], b':');
    }

    #[tokio::test]
    async fn publisher_stops_when_unobserved() {
        let (tx, rx) = watch::channel(CountdownClock::frame_now());
        let handle = tokio::spawn(CountdownClock::publish(
            tx,
            std::time::Duration::from_millis(5),
        ));
        drop(rx);
        tokio::time::timeout(std::time::Duration::from_secs(1), handle)
            .await
            .expect("publisher should exit once unobserved")
            .unwrap();
    }
}
