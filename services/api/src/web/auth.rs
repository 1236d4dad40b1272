//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for user signup, login, and logout.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{Duration, Utc};
use curri_builder_core::ports::{DatabaseService, PortError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::web::rest::ErrorBody;
use crate::web::state::AppState;

const SESSION_COOKIE: &str = "session";
const SESSION_TTL_DAYS: i64 = 30;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct AuthResponse {
    pub user_id: Uuid,
    pub email: String,
}

//=========================================================================================
// Cookie Helpers
//=========================================================================================

/// Pulls the auth session id out of the request's cookie header, if present.
pub(crate) fn session_id_from_headers(headers: &HeaderMap) -> Option<String> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;
    cookie_header
        .split(';')
        .find_map(|c| c.trim().strip_prefix("session="))
        .map(ToString::to_string)
}

/// Creates a server-side auth session for `user_id` and returns the Set-Cookie value.
async fn issue_session_cookie(
    db: &Arc<dyn DatabaseService>,
    user_id: Uuid,
) -> Result<String, PortError> {
    let auth_session_id = Uuid::new_v4().to_string();
    let ttl = Duration::days(SESSION_TTL_DAYS);
    db.create_auth_session(&auth_session_id, user_id, Utc::now() + ttl)
        .await?;

    Ok(format!(
        "{}={}; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age={}",
        SESSION_COOKIE,
        auth_session_id,
        ttl.num_seconds()
    ))
}

fn error_body(status: StatusCode, message: &str) -> (StatusCode, Json<ErrorBody>) {
    (status, Json(ErrorBody::new(message)))
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/signup - Create a new user account
#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User created successfully", body = AuthResponse),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 409, description = "Email already registered", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn signup_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorBody>)> {
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(error_body(
            StatusCode::BAD_REQUEST,
            "Email and password are required",
        ));
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|e| {
            error!("Failed to hash password: {:?}", e);
            error_body(StatusCode::INTERNAL_SERVER_ERROR, "Failed to hash password")
        })?
        .to_string();

    let user = state
        .db
        .create_user_with_email(req.email.trim(), &password_hash)
        .await
        .map_err(|e| match e {
            PortError::Conflict(_) => {
                error_body(StatusCode::CONFLICT, "Email is already registered")
            }
            other => {
                error!("Failed to create user: {:?}", other);
                error_body(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create user")
            }
        })?;

    let cookie = issue_session_cookie(&state.db, user.user_id)
        .await
        .map_err(|e| {
            error!("Failed to create auth session: {:?}", e);
            error_body(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create session")
        })?;

    let response = AuthResponse {
        user_id: user.user_id,
        email: user.email.unwrap_or_default(),
    };

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(response),
    ))
}

/// POST /auth/login - Login with existing account
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorBody>)> {
    let user_creds = state
        .db
        .get_user_by_email(req.email.trim())
        .await
        .map_err(|e| {
            error!("Failed to get user: {:?}", e);
            error_body(StatusCode::UNAUTHORIZED, "Invalid email or password")
        })?;

    let parsed_hash = PasswordHash::new(&user_creds.hashed_password).map_err(|e| {
        error!("Failed to parse password hash: {:?}", e);
        error_body(StatusCode::INTERNAL_SERVER_ERROR, "Authentication error")
    })?;

    let valid = Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .is_ok();

    if !valid {
        return Err(error_body(
            StatusCode::UNAUTHORIZED,
            "Invalid email or password",
        ));
    }

    let cookie = issue_session_cookie(&state.db, user_creds.user_id)
        .await
        .map_err(|e| {
            error!("Failed to create auth session: {:?}", e);
            error_body(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create session")
        })?;

    let response = AuthResponse {
        user_id: user_creds.user_id,
        email: user_creds.email,
    };

    Ok((StatusCode::OK, [(header::SET_COOKIE, cookie)], Json(response)))
}

/// POST /auth/logout - Logout and invalidate session
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Logout successful"),
        (status = 401, description = "No active session", body = ErrorBody)
    )
)]
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorBody>)> {
    let auth_session_id = session_id_from_headers(&headers)
        .ok_or_else(|| error_body(StatusCode::UNAUTHORIZED, "No session found"))?;

    state
        .db
        .delete_auth_session(&auth_session_id)
        .await
        .map_err(|e| {
            error!("Failed to delete auth session: {:?}", e);
            error_body(StatusCode::INTERNAL_SERVER_ERROR, "Failed to logout")
        })?;

    let cookie = format!(
        "{}=; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age=0",
        SESSION_COOKIE
    );

    Ok((StatusCode::OK, [(header::SET_COOKIE, cookie)]))
}
