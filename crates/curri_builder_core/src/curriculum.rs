//! crates/curri_builder_core/src/curriculum.rs
//!
//! Parsing and validation of the model's curriculum reply.
//!
//! The completion service is instructed to answer with a bare JSON array of day
//! entries, but it is known to sometimes wrap its output in commentary or code
//! fences. No repair is attempted here: the reply either validates fully or the
//! caller gets a typed error saying exactly how it failed.

use crate::domain::DayEntry;
use serde_json::Value;

/// How a model reply failed to become a curriculum.
///
/// `Syntax` means the reply was not JSON at all (commentary, code fences, prose).
/// `Shape` means it was JSON but not an array of day entries. `DayCount` means the
/// structure was right but the number of entries did not match the request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CurriculumParseError {
    #[error("reply was not valid JSON: {0}")]
    Syntax(String),
    #[error("reply did not match the curriculum shape: {0}")]
    Shape(String),
    #[error("expected {expected} day entries, got {actual}")]
    DayCount { expected: usize, actual: usize },
}

/// Parses a raw completion into exactly `expected_days` day entries.
///
/// Validation is all-or-nothing: a partially usable reply is an error, never a
/// truncated curriculum.
pub fn parse_curriculum(
    raw: &str,
    expected_days: usize,
) -> Result<Vec<DayEntry>, CurriculumParseError> {
    let value: Value = serde_json::from_str(raw.trim())
        .map_err(|e| CurriculumParseError::Syntax(e.to_string()))?;

    if !value.is_array() {
        return Err(CurriculumParseError::Shape(format!(
            "expected a JSON array of day entries, got {}",
            json_type_name(&value)
        )));
    }

    let days: Vec<DayEntry> = serde_json::from_value(value)
        .map_err(|e| CurriculumParseError::Shape(e.to_string()))?;

    if days.len() != expected_days {
        return Err(CurriculumParseError::DayCount {
            expected: expected_days,
            actual: days.len(),
        });
    }

    Ok(days)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Mcq;

    /// A reply shaped the way the prompt asks for it: one object per day,
    /// 5 lettered questions each.
    fn three_day_reply() -> String {
        let days: Vec<Value> = (1..=3)
            .map(|day| {
                let mcqs: Vec<Value> = (0..5)
                    .map(|q| {
                        serde_json::json!({
                            "question": format!("Day {day} question {q}?"),
                            "options": ["a) first", "b) second", "c) third", "d) fourth"],
                            "answer": "b"
                        })
                    })
                    .collect();
                serde_json::json!({
                    "day": day,
                    "title": format!("Python Basics part {day}"),
                    "explanation": "Variables hold values; functions bundle behavior.",
                    "resource": "https://docs.python.org/3/tutorial/",
                    "mcqs": mcqs
                })
            })
            .collect();
        serde_json::to_string(&days).unwrap()
    }

    #[test]
    fn parses_a_well_formed_reply() {
        let days = parse_curriculum(&three_day_reply(), 3).unwrap();
        assert_eq!(days.len(), 3);
        assert_eq!(days[0].day, 1);
        assert_eq!(days[2].title, "Python Basics part 3");
        for day in &days {
            assert_eq!(day.mcqs.len(), 5);
            for mcq in &day.mcqs {
                // The answer letter must label exactly one of the 4 options.
                let answer = mcq.answer_letter().unwrap();
                let matching = mcq
                    .options
                    .iter()
                    .filter(|o| Mcq::option_letter(o) == Some(answer))
                    .count();
                assert_eq!(matching, 1);
                assert_eq!(mcq.options.len(), 4);
            }
        }
    }

    #[test]
    fn tolerates_surrounding_whitespace_only() {
        let wrapped = format!("\n  {}  \n", three_day_reply());
        assert!(parse_curriculum(&wrapped, 3).is_ok());
    }

    #[test]
    fn code_fenced_reply_is_a_syntax_error() {
        let fenced = format!("```json\n{}\n```", three_day_reply());
        assert!(matches!(
            parse_curriculum(&fenced, 3),
            Err(CurriculumParseError::Syntax(_))
        ));
    }

    #[test]
    fn commentary_around_json_is_a_syntax_error() {
        let chatty = format!("Here is your curriculum!\n{}", three_day_reply());
        assert!(matches!(
            parse_curriculum(&chatty, 3),
            Err(CurriculumParseError::Syntax(_))
        ));
    }

    #[test]
    fn non_array_json_is_a_shape_error() {
        let err = parse_curriculum(r#"{"curriculum": []}"#, 3).unwrap_err();
        match err {
            CurriculumParseError::Shape(msg) => assert!(msg.contains("an object")),
            other => panic!("expected Shape, got {other:?}"),
        }
    }

    #[test]
    fn array_of_wrong_objects_is_a_shape_error() {
        let raw = r#"[{"day": 1, "caption": "missing required fields"}]"#;
        assert!(matches!(
            parse_curriculum(raw, 1),
            Err(CurriculumParseError::Shape(_))
        ));
    }

    #[test]
    fn wrong_day_count_is_rejected() {
        let err = parse_curriculum(&three_day_reply(), 5).unwrap_err();
        assert_eq!(
            err,
            CurriculumParseError::DayCount {
                expected: 5,
                actual: 3
            }
        );
    }

    #[test]
    fn empty_array_only_valid_for_zero_days() {
        assert!(parse_curriculum("[]", 0).is_ok());
        assert!(matches!(
            parse_curriculum("[]", 2),
            Err(CurriculumParseError::DayCount { .. })
        ));
    }
}
