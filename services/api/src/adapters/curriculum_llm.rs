//! services/api/src/adapters/curriculum_llm.rs
//!
//! This module contains the adapter for the curriculum-generating LLM.
//! It implements the `CurriculumGenerationService` port from the `core` crate
//! against any OpenAI-compatible chat-completion endpoint (Groq in production).

const PROMPT_TEMPLATE: &str = r#"You are an expert AI tutor. A student wants to learn the topic: "{topic}" with a {depth} learning depth.
They want to complete the learning in {days} days.

For each of the {days} days, create a lesson plan in this JSON format:

[
  {
    "day": 1,
    "title": "Day Title",
    "explanation": "Teach the concept clearly and fully like a real tutor would. Write like you're tutoring a student who has no prior knowledge.",
    "resource": "Mention one relevant YouTube video or blog URL (keep it short)",
    "mcqs": [
      {
        "question": "What is ...?",
        "options": ["a) ...", "b) ...", "c) ...", "d) ..."],
        "answer": "b"
      }
    ]
  }
]

Each day's "mcqs" array must contain at least 5 questions, each with exactly 4 options labeled a) through d), and an "answer" holding the single letter of the correct option.
{reference}
Respond ONLY with the complete JSON array. Do NOT include any commentary or code block formatting."#;

const REFERENCE_SECTION_TEMPLATE: &str = r#"
Base the lesson plan on the following reference material wherever it applies:
---
{material}
---
"#;

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs},
    Client,
};
use async_trait::async_trait;
use curri_builder_core::curriculum::parse_curriculum;
use curri_builder_core::domain::{DayEntry, LessonPlanRequest};
use curri_builder_core::ports::{CurriculumGenerationService, GenerationError};
use std::time::Duration;

/// Sampling temperature for every generation request.
const COMPLETION_TEMPERATURE: f32 = 0.7;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `CurriculumGenerationService` using an
/// OpenAI-compatible LLM endpoint.
#[derive(Clone)]
pub struct GroqCurriculumAdapter {
    client: Client<OpenAIConfig>,
    model: String,
    timeout: Duration,
}

impl GroqCurriculumAdapter {
    /// Creates a new `GroqCurriculumAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String, timeout: Duration) -> Self {
        Self {
            client,
            model,
            timeout,
        }
    }
}

/// Renders the prompt for a validated request. Same input, same prompt: the only
/// variability in a generation run comes from the model.
fn build_prompt(request: &LessonPlanRequest) -> String {
    let reference = match &request.reference_material {
        Some(material) => REFERENCE_SECTION_TEMPLATE.replace("{material}", material),
        None => String::new(),
    };

    PROMPT_TEMPLATE
        .replace("{topic}", &request.topic)
        .replace("{depth}", request.depth.as_str())
        .replace("{days}", &request.days.to_string())
        .replace("{reference}", &reference)
}

//=========================================================================================
// `CurriculumGenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl CurriculumGenerationService for GroqCurriculumAdapter {
    async fn generate_curriculum(
        &self,
        request: &LessonPlanRequest,
    ) -> Result<Vec<DayEntry>, GenerationError> {
        let prompt = build_prompt(request);

        let messages = vec![ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|e| GenerationError::Transport(e.to_string()))?
            .into()];

        let chat_request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(COMPLETION_TEMPERATURE)
            .build()
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        // The upstream call runs under a deadline so a hung endpoint fails the
        // request instead of holding it open forever.
        let response = tokio::time::timeout(self.timeout, self.client.chat().create(chat_request))
            .await
            .map_err(|_| GenerationError::UpstreamTimeout(self.timeout))?
            .map_err(|e: OpenAIError| GenerationError::Transport(e.to_string()))?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(GenerationError::UpstreamEmpty)?;

        // All-or-nothing: the reply either validates into exactly the requested
        // number of days or the whole request fails.
        let curriculum = parse_curriculum(&content, request.days as usize)?;
        Ok(curriculum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curri_builder_core::domain::Depth;

    fn request(reference: Option<&str>) -> LessonPlanRequest {
        LessonPlanRequest {
            topic: "Python Basics".to_string(),
            depth: Depth::Beginner,
            days: 3,
            reference_material: reference.map(ToString::to_string),
        }
    }

    #[test]
    fn prompt_is_deterministic() {
        assert_eq!(build_prompt(&request(None)), build_prompt(&request(None)));
    }

    #[test]
    fn prompt_interpolates_the_request() {
        let prompt = build_prompt(&request(None));
        assert!(prompt.contains("\"Python Basics\""));
        assert!(prompt.contains("Beginner learning depth"));
        assert!(prompt.contains("in 3 days"));
        assert!(prompt.contains("Respond ONLY with the complete JSON array"));
        // No leftover placeholders.
        assert!(!prompt.contains("{topic}"));
        assert!(!prompt.contains("{reference}"));
    }

    #[test]
    fn reference_material_only_appears_when_uploaded() {
        let without = build_prompt(&request(None));
        assert!(!without.contains("reference material"));

        let with = build_prompt(&request(Some("Chapter 1: variables and types.")));
        assert!(with.contains("reference material"));
        assert!(with.contains("Chapter 1: variables and types."));
    }
}
