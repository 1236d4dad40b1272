//! crates/curri_builder_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or
//! completion APIs.

use crate::curriculum::CurriculumParseError;
use crate::domain::{DayEntry, LessonPlanRequest, TopicRecord, User, UserCredentials};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::time::Duration;
use uuid::Uuid;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for storage port operations.
/// This abstracts away the specific errors from external services (e.g., database).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Already exists: {0}")]
    Conflict(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

/// How a curriculum generation attempt failed.
///
/// `UpstreamEmpty` and `UpstreamMalformed` mirror the two ways the completion
/// service disappoints: nothing usable came back, or text came back that does not
/// validate as a curriculum. The upstream call runs under a bounded deadline, so an
/// unresponsive service surfaces as `UpstreamTimeout` instead of stalling the
/// request indefinitely.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("completion service returned no candidates")]
    UpstreamEmpty,
    #[error("completion service reply was unusable: {0}")]
    UpstreamMalformed(#[from] CurriculumParseError),
    #[error("completion service did not answer within {0:?}")]
    UpstreamTimeout(Duration),
    #[error("completion request failed: {0}")]
    Transport(String),
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait DatabaseService: Send + Sync {
    // --- Auth Methods ---
    async fn create_user_with_email(
        &self,
        email: &str,
        hashed_password: &str,
    ) -> PortResult<User>;

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials>;

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()>;

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid>;

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()>;

    // --- Topic Records ---

    /// Creates or replaces the record for `topic_name` under `user_id`, resetting
    /// progress to 0 and `total_days` to the curriculum length. Records for other
    /// topics are untouched.
    async fn save_topic(
        &self,
        user_id: Uuid,
        topic_name: &str,
        curriculum: &[DayEntry],
    ) -> PortResult<()>;

    /// Raises the stored progress for `topic_name` to `new_progress` if that is
    /// higher than the current value. A missing record is a silent no-op: this
    /// never creates one.
    async fn update_progress(
        &self,
        user_id: Uuid,
        topic_name: &str,
        new_progress: u32,
    ) -> PortResult<()>;

    /// All topic records for the user, keyed by topic name. Empty when the user
    /// has none.
    async fn get_user_topics(&self, user_id: Uuid) -> PortResult<HashMap<String, TopicRecord>>;
}

#[async_trait]
pub trait CurriculumGenerationService: Send + Sync {
    /// Produces one day entry per requested day, fully validated, or a typed
    /// error. Never a partial curriculum.
    async fn generate_curriculum(
        &self,
        request: &LessonPlanRequest,
    ) -> Result<Vec<DayEntry>, GenerationError>;
}
