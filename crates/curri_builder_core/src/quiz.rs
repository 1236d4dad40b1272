//! crates/curri_builder_core/src/quiz.rs
//!
//! The per-day quiz state machine the client runs while working through a topic.
//!
//! Answer selections are transient: they live for one page view and are never
//! persisted. Only the day pointer survives, via the monotonic progress value
//! computed with [`next_progress`].

use crate::domain::{DayEntry, Mcq};
use std::collections::BTreeMap;

/// Where a day's quiz currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    /// No answers selected yet. A day without questions stays here forever.
    NotStarted,
    /// Some but not all questions answered.
    InProgress,
    /// Every question has a recorded selection.
    AllAnswered,
}

/// The action a fully answered day exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayAction {
    /// Advance the day pointer; there are more days after this one.
    NextDay,
    /// This was the last day: completing it finishes the topic.
    FinishTopic,
}

/// One recorded selection for one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerSelection {
    pub selected: char,
    /// The letter labeling the correct option, when the entry carried one.
    pub correct: Option<char>,
}

impl AnswerSelection {
    pub fn is_correct(&self) -> bool {
        self.correct == Some(self.selected)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuizError {
    #[error("question {0} does not exist on this day")]
    NoSuchQuestion(usize),
    /// Selections are write-once: re-answering is not allowed within a page view.
    #[error("question {0} already has a recorded answer")]
    AlreadyAnswered(usize),
}

/// The state of one day's question set.
#[derive(Debug, Clone)]
pub struct DayQuiz {
    correct: Vec<Option<char>>,
    answers: BTreeMap<usize, AnswerSelection>,
}

impl DayQuiz {
    pub fn new(day: &DayEntry) -> Self {
        Self {
            correct: day.mcqs.iter().map(Mcq::answer_letter).collect(),
            answers: BTreeMap::new(),
        }
    }

    pub fn question_count(&self) -> usize {
        self.correct.len()
    }

    pub fn answer(&self, question: usize) -> Option<&AnswerSelection> {
        self.answers.get(&question)
    }

    /// Records a selection for `question`. Each question accepts exactly one
    /// answer per page view.
    pub fn record_answer(
        &mut self,
        question: usize,
        selected: char,
    ) -> Result<AnswerSelection, QuizError> {
        let correct = *self
            .correct
            .get(question)
            .ok_or(QuizError::NoSuchQuestion(question))?;
        if self.answers.contains_key(&question) {
            return Err(QuizError::AlreadyAnswered(question));
        }
        let selection = AnswerSelection { selected, correct };
        self.answers.insert(question, selection);
        Ok(selection)
    }

    pub fn phase(&self) -> QuizPhase {
        if self.answers.is_empty() {
            QuizPhase::NotStarted
        } else if self.answers.len() < self.correct.len() {
            QuizPhase::InProgress
        } else {
            QuizPhase::AllAnswered
        }
    }

    /// The advance action this day exposes, if any.
    ///
    /// Only a fully answered day unlocks one: "next day" when further days
    /// remain, "finish" on the last day.
    pub fn available_action(&self, day_index: usize, total_days: u32) -> Option<DayAction> {
        if self.phase() != QuizPhase::AllAnswered {
            return None;
        }
        if (day_index as u32) + 1 < total_days {
            Some(DayAction::NextDay)
        } else {
            Some(DayAction::FinishTopic)
        }
    }
}

/// The progress value to store after completing the day at `day_index`.
///
/// Progress never moves backwards: revisiting an already completed day leaves
/// the stored value alone.
pub fn next_progress(current: u32, day_index: usize) -> u32 {
    current.max(day_index as u32 + 1)
}

/// Whether the day at `day_index` is navigable given the stored progress.
/// Days beyond the first not-yet-completed one stay locked.
pub fn day_unlocked(progress: u32, day_index: usize) -> bool {
    (day_index as u32) <= progress
}
