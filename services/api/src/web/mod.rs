//! services/api/src/web/mod.rs
//!
//! HTTP surface of the service: handlers, auth, shared state, and the router.

pub mod auth;
pub mod middleware;
pub mod rest;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use state::AppState;
use std::sync::Arc;

pub use middleware::require_auth;
pub use rest::{
    generate_curriculum_handler, generate_curriculum_upload_handler, list_topics_handler,
    save_topic_handler, update_progress_handler,
};

/// Assembles the API router: public auth routes plus the session-protected
/// curriculum and topic routes. Deployment-level layers (CORS, Swagger UI) are
/// added by the binary.
pub fn api_router(state: Arc<AppState>) -> Router {
    let public_routes = Router::new()
        .route("/auth/signup", post(auth::signup_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler));

    let protected_routes = Router::new()
        .route("/api/generate", post(rest::generate_curriculum_handler))
        .route(
            "/api/generate/upload",
            post(rest::generate_curriculum_upload_handler),
        )
        .route(
            "/topics",
            get(rest::list_topics_handler).post(rest::save_topic_handler),
        )
        .route(
            "/topics/{topic}/progress",
            put(rest::update_progress_handler),
        )
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
        .with_state(state)
}
