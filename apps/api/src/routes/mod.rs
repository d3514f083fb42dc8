pub mod auth;
pub mod chat;
pub mod health;
pub mod profile;
pub mod projects;
pub mod resume;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Chat API
        .route("/api/v1/chat/send", post(chat::handle_send))
        .route("/api/v1/session", get(chat::handle_get_session))
        // Auth API
        .route("/api/v1/auth/signin", post(auth::handle_signin))
        .route("/api/v1/auth/signout", post(auth::handle_signout))
        // Profile API
        .route(
            "/api/v1/profile",
            get(profile::handle_get_profile).put(profile::handle_put_profile),
        )
        // Resume API
        .route("/api/v1/resume/generate", post(resume::handle_generate))
        // Projects API
        .route(
            "/api/v1/projects/slide-image",
            post(projects::handle_slide_image),
        )
        .with_state(state)
}
