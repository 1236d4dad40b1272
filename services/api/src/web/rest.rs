//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.
//!
//! Curriculum generation is side-effect free: the handler validates input, asks
//! the generation port for a curriculum, and returns it. Persisting a topic and
//! moving progress are separate calls against the topic-record handlers below.

use crate::web::state::AppState;
use axum::{
    extract::{Extension, Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use curri_builder_core::domain::{
    DayEntry, Depth, LessonPlanRequest, TopicRecord, MAX_DAYS, MIN_DAYS, REFERENCE_CHAR_BUDGET,
};
use curri_builder_core::ports::{GenerationError, PortError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::error;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        generate_curriculum_handler,
        generate_curriculum_upload_handler,
        list_topics_handler,
        save_topic_handler,
        update_progress_handler,
        crate::web::auth::signup_handler,
        crate::web::auth::login_handler,
        crate::web::auth::logout_handler,
    ),
    components(
        schemas(
            GenerateRequest,
            GenerateResponse,
            SaveTopicRequest,
            UpdateProgressRequest,
            TopicsResponse,
            ErrorBody,
            crate::web::auth::SignupRequest,
            crate::web::auth::LoginRequest,
            crate::web::auth::AuthResponse,
        )
    ),
    tags(
        (name = "CurriBuilder API", description = "API endpoints for generating and working through multi-day curricula.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// The uniform error payload for every failed request.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// The JSON-body variant of a generation request. All fields are optional at the
/// serde level so that absence surfaces as a 400 with a message rather than a
/// deserialization rejection.
#[derive(Deserialize, ToSchema)]
pub struct GenerateRequest {
    pub topic: Option<String>,
    pub depth: Option<String>,
    pub days: Option<i64>,
}

/// A successfully generated curriculum, exactly one entry per requested day.
#[derive(Serialize, ToSchema)]
pub struct GenerateResponse {
    #[schema(value_type = Vec<Object>)]
    pub curriculum: Vec<DayEntry>,
}

#[derive(Deserialize, ToSchema)]
pub struct SaveTopicRequest {
    pub topic: String,
    #[schema(value_type = Vec<Object>)]
    pub curriculum: Vec<DayEntry>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateProgressRequest {
    pub progress: u32,
}

/// All of a user's topic records, keyed by topic name.
#[derive(Serialize, ToSchema)]
pub struct TopicsResponse {
    #[schema(value_type = Object)]
    pub topics: HashMap<String, TopicRecord>,
}

//=========================================================================================
// Validation and Error Mapping
//=========================================================================================

type HandlerError = (StatusCode, Json<ErrorBody>);

fn bad_request(message: impl Into<String>) -> HandlerError {
    (StatusCode::BAD_REQUEST, Json(ErrorBody::new(message)))
}

fn internal_error(message: impl Into<String>) -> HandlerError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody::new(message)),
    )
}

/// Validates the raw generation parameters into a `LessonPlanRequest`.
///
/// Runs before anything is sent upstream: an invalid request never reaches the
/// completion service.
fn validate_lesson_plan_request(
    topic: Option<String>,
    depth: Option<String>,
    days: Option<i64>,
    reference_material: Option<String>,
) -> Result<LessonPlanRequest, HandlerError> {
    let (Some(topic), Some(depth), Some(days)) = (topic, depth, days) else {
        return Err(bad_request("Topic, depth, or days missing"));
    };

    let topic = topic.trim().to_string();
    if topic.is_empty() {
        return Err(bad_request("Topic, depth, or days missing"));
    }

    let depth = depth
        .parse::<Depth>()
        .map_err(|_| bad_request("Depth must be one of Beginner, Intermediate, or Advanced"))?;

    if days < MIN_DAYS as i64 || days > MAX_DAYS as i64 {
        return Err(bad_request(format!(
            "Days must be between {} and {}",
            MIN_DAYS, MAX_DAYS
        )));
    }

    Ok(LessonPlanRequest {
        topic,
        depth,
        days: days as u32,
        reference_material,
    })
}

fn generation_error_response(e: GenerationError) -> HandlerError {
    error!("Curriculum generation failed: {}", e);
    match &e {
        GenerationError::UpstreamEmpty => {
            internal_error("No completion returned from the model")
        }
        GenerationError::UpstreamMalformed(inner) => {
            internal_error(format!("Invalid response format from the model: {}", inner))
        }
        GenerationError::UpstreamTimeout(deadline) => (
            StatusCode::GATEWAY_TIMEOUT,
            Json(ErrorBody::new(format!(
                "The model did not answer within {}s",
                deadline.as_secs()
            ))),
        ),
        GenerationError::Transport(_) => internal_error("Curriculum generation failed"),
    }
}

//=========================================================================================
// Curriculum Generation Handlers
//=========================================================================================

/// Generate a multi-day curriculum for a topic.
///
/// Validates the request, delegates to the completion service, and returns the
/// parsed curriculum. Nothing is persisted; a separate `POST /topics` saves it.
#[utoipa::path(
    post,
    path = "/api/generate",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Curriculum generated", body = GenerateResponse),
        (status = 400, description = "Missing or invalid parameters", body = ErrorBody),
        (status = 500, description = "The completion service returned nothing usable", body = ErrorBody),
        (status = 504, description = "The completion service did not answer in time", body = ErrorBody)
    )
)]
pub async fn generate_curriculum_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let request = validate_lesson_plan_request(req.topic, req.depth, req.days, None)?;

    let curriculum = state
        .generator
        .generate_curriculum(&request)
        .await
        .map_err(generation_error_response)?;

    Ok(Json(GenerateResponse { curriculum }))
}

/// Generate a curriculum from a multipart form, optionally grounded in an
/// uploaded reference file.
///
/// The file part is decoded as UTF-8 text and truncated to a fixed character
/// budget before it enters the prompt.
#[utoipa::path(
    post,
    path = "/api/generate/upload",
    request_body(content_type = "multipart/form-data", description = "Fields `topic`, `depth`, `days`, and an optional `file` part."),
    responses(
        (status = 200, description = "Curriculum generated", body = GenerateResponse),
        (status = 400, description = "Missing parameters or undecodable form", body = ErrorBody),
        (status = 500, description = "The completion service returned nothing usable", body = ErrorBody),
        (status = 504, description = "The completion service did not answer in time", body = ErrorBody)
    )
)]
pub async fn generate_curriculum_upload_handler(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, HandlerError> {
    let mut topic = None;
    let mut depth = None;
    let mut days = None;
    let mut reference_material = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(format!("Failed to read multipart form: {}", e)))?
    {
        let name = field.name().map(ToString::to_string);
        match name.as_deref() {
            Some("topic") => {
                topic = Some(read_text_field(field, "topic").await?);
            }
            Some("depth") => {
                depth = Some(read_text_field(field, "depth").await?);
            }
            Some("days") => {
                let raw = read_text_field(field, "days").await?;
                days = Some(
                    raw.trim()
                        .parse::<i64>()
                        .map_err(|_| bad_request("Days must be a whole number"))?,
                );
            }
            Some("file") => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| bad_request(format!("Failed to read file part: {}", e)))?;
                let text = String::from_utf8(data.to_vec())
                    .map_err(|_| bad_request("Uploaded file is not valid UTF-8 text"))?;
                reference_material = Some(text.chars().take(REFERENCE_CHAR_BUDGET).collect());
            }
            _ => {}
        }
    }

    let request = validate_lesson_plan_request(topic, depth, days, reference_material)?;

    let curriculum = state
        .generator
        .generate_curriculum(&request)
        .await
        .map_err(generation_error_response)?;

    Ok(Json(GenerateResponse { curriculum }))
}

async fn read_text_field(
    field: axum::extract::multipart::Field<'_>,
    name: &str,
) -> Result<String, HandlerError> {
    field
        .text()
        .await
        .map_err(|e| bad_request(format!("Failed to read field '{}': {}", name, e)))
}

//=========================================================================================
// Topic Record Handlers
//=========================================================================================

/// List all topic records for the signed-in user.
#[utoipa::path(
    get,
    path = "/topics",
    responses(
        (status = 200, description = "The user's topics, possibly empty", body = TopicsResponse),
        (status = 401, description = "Not signed in"),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn list_topics_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<impl IntoResponse, HandlerError> {
    let topics = state.db.get_user_topics(user_id).await.map_err(|e| {
        error!("Failed to load topics for {}: {:?}", user_id, e);
        internal_error("Failed to load topics")
    })?;

    Ok(Json(TopicsResponse { topics }))
}

/// Save a generated curriculum as a topic record.
///
/// Idempotent per topic name: saving again (a regeneration) replaces the
/// curriculum and resets progress to zero. Other topics are unaffected.
#[utoipa::path(
    post,
    path = "/topics",
    request_body = SaveTopicRequest,
    responses(
        (status = 201, description = "Topic record created or replaced", body = Object),
        (status = 400, description = "Missing topic name", body = ErrorBody),
        (status = 401, description = "Not signed in"),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn save_topic_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Json(req): Json<SaveTopicRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let topic = req.topic.trim().to_string();
    if topic.is_empty() {
        return Err(bad_request("Topic name is required"));
    }

    state
        .db
        .save_topic(user_id, &topic, &req.curriculum)
        .await
        .map_err(|e| {
            error!("Failed to save topic '{}' for {}: {:?}", topic, user_id, e);
            internal_error("Failed to save topic")
        })?;

    Ok((
        StatusCode::CREATED,
        Json(TopicRecord::new(req.curriculum)),
    ))
}

/// Record quiz progress on a topic.
///
/// Stored progress only ever moves forward: sending a lower value than the
/// current one leaves the record unchanged, and repeating the same value is a
/// no-op. Unknown topics are silently ignored.
#[utoipa::path(
    put,
    path = "/topics/{topic}/progress",
    request_body = UpdateProgressRequest,
    params(
        ("topic" = String, Path, description = "The topic name the progress belongs to.")
    ),
    responses(
        (status = 204, description = "Progress recorded (or no such topic existed)"),
        (status = 401, description = "Not signed in"),
        (status = 409, description = "Progress value exceeds the topic's total days", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn update_progress_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(topic): Path<String>,
    Json(req): Json<UpdateProgressRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    state
        .db
        .update_progress(user_id, &topic, req.progress)
        .await
        .map_err(|e| match e {
            PortError::Conflict(_) => (
                StatusCode::CONFLICT,
                Json(ErrorBody::new("Progress cannot exceed the topic's total days")),
            ),
            other => {
                error!(
                    "Failed to update progress on '{}' for {}: {:?}",
                    topic, user_id, other
                );
                internal_error("Failed to update progress")
            }
        })?;

    Ok(StatusCode::NO_CONTENT)
}

//=========================================================================================
// Tests
//=========================================================================================
