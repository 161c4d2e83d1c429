use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The persisted quiz progress record -- one per device.
///
/// Serialized as JSON under a single key-value entry. Field names on the
/// wire are camelCase and `lastPlayedDate` is a `YYYY-MM-DD` local calendar
/// date, with the empty string meaning "never played".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuizProgress {
    pub total_points: u64,
    pub current_streak: u32,
    pub longest_streak: u32,
    #[serde(with = "date_string")]
    pub last_played_date: Option<NaiveDate>,
    pub questions_answered: u64,
    pub correct_answers: u64,
}

impl QuizProgress {
    /// Percentage of answered questions marked correct, rounded to the
    /// nearest integer. Zero before the first answer.
    pub fn accuracy(&self) -> u32 {
        if self.questions_answered == 0 {
            return 0;
        }
        (self.correct_answers as f64 / self.questions_answered as f64 * 100.0).round() as u32
    }

    pub fn has_played_on(&self, today: NaiveDate) -> bool {
        self.last_played_date == Some(today)
    }
}

/// `YYYY-MM-DD` or the empty string for "never played".
mod date_string {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(
        date: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => serializer.serialize_str(&d.format(FORMAT).to_string()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        let value = String::deserialize(deserializer)?;
        if value.is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(&value, FORMAT)
            .map(Some)
            .map_err(serde::de::Error::custom)
    }
}
