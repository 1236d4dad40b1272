//! crates/curri_builder_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or HTTP framework; they carry
//! serde derives because the curriculum is a JSON document end to end (model
//! reply, wire format, and stored record all share the same shape).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// One day of a generated curriculum: the lesson content plus its question set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayEntry {
    /// 1-based ordinal within the curriculum.
    pub day: u32,
    pub title: String,
    pub explanation: String,
    /// A URL or URL-embedding text pointing at one external resource.
    pub resource: String,
    /// The generator is instructed to produce at least 5 of these, but the
    /// count is not enforced at parse time.
    pub mcqs: Vec<Mcq>,
}

/// A single multiple-choice question.
///
/// `options` holds 4 choice strings, each prefixed with a single-letter label and a
/// delimiter (e.g. `"b) Propagates the error"`). `answer` is the bare letter of the
/// correct option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mcq {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
}

impl Mcq {
    /// The letter label of the correct option, if `answer` carries one.
    pub fn answer_letter(&self) -> Option<char> {
        self.answer.trim().chars().next()
    }

    /// Extracts the letter label an option string is prefixed with.
    pub fn option_letter(option: &str) -> Option<char> {
        option.trim().chars().next()
    }
}

/// The persisted curriculum + progress state for one user/topic pair.
///
/// `progress` is the highest completed day index + 1 (0 when nothing is done yet).
/// Invariant: `0 <= progress <= total_days`. Serialized in camelCase so the stored
/// and wire shape stays `{ curriculum, progress, totalDays }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicRecord {
    pub curriculum: Vec<DayEntry>,
    pub progress: u32,
    pub total_days: u32,
}

impl TopicRecord {
    /// A fresh record for a just-generated curriculum: nothing completed yet.
    pub fn new(curriculum: Vec<DayEntry>) -> Self {
        let total_days = curriculum.len() as u32;
        Self {
            curriculum,
            progress: 0,
            total_days,
        }
    }
}

/// The difficulty label a learner picks for a topic. Influences prompt content only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Depth {
    Beginner,
    Intermediate,
    Advanced,
}

impl Depth {
    pub fn as_str(&self) -> &'static str {
        match self {
            Depth::Beginner => "Beginner",
            Depth::Intermediate => "Intermediate",
            Depth::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Depth {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Beginner" => Ok(Depth::Beginner),
            "Intermediate" => Ok(Depth::Intermediate),
            "Advanced" => Ok(Depth::Advanced),
            _ => Err(()),
        }
    }
}

/// A validated request for curriculum generation, as handed to the generation port.
///
/// `days` is bounded to [`MIN_DAYS`]..=[`MAX_DAYS`] and `reference_material`, when
/// present, has already been truncated to [`REFERENCE_CHAR_BUDGET`] characters.
#[derive(Debug, Clone, PartialEq)]
pub struct LessonPlanRequest {
    pub topic: String,
    pub depth: Depth,
    pub days: u32,
    pub reference_material: Option<String>,
}

/// Smallest accepted curriculum length.
pub const MIN_DAYS: u32 = 1;
/// Largest accepted curriculum length.
pub const MAX_DAYS: u32 = 30;
/// Character budget for uploaded reference material, bounding prompt size.
pub const REFERENCE_CHAR_BUDGET: usize = 2000;

// Represents a user - used throughout app
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: Uuid,
    pub email: Option<String>,
}

// Only used internally for login/signup - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user_id: Uuid,
    pub email: String,
    pub hashed_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_round_trips_through_str() {
        for depth in [Depth::Beginner, Depth::Intermediate, Depth::Advanced] {
            assert_eq!(depth.as_str().parse::<Depth>(), Ok(depth));
        }
        assert!("Expert".parse::<Depth>().is_err());
        assert!("beginner".parse::<Depth>().is_err());
    }

    #[test]
    fn mcq_letter_extraction() {
        let mcq = Mcq {
            question: "What does `?` do?".to_string(),
            options: vec![
                "a) Panics".to_string(),
                "b) Propagates the error".to_string(),
                "c) Ignores the error".to_string(),
                "d) Logs it".to_string(),
            ],
            answer: "b".to_string(),
        };
        assert_eq!(mcq.answer_letter(), Some('b'));
        assert_eq!(Mcq::option_letter("  c) Ignores the error"), Some('c'));
        assert_eq!(Mcq::option_letter(""), None);
    }

    #[test]
    fn new_topic_record_starts_at_zero() {
        let record = TopicRecord::new(vec![]);
        assert_eq!(record.progress, 0);
        assert_eq!(record.total_days, 0);
    }

    #[test]
    fn topic_record_serializes_total_days_in_camel_case() {
        let record = TopicRecord::new(vec![]);
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("totalDays").is_some());
        assert!(json.get("total_days").is_none());
    }
}
