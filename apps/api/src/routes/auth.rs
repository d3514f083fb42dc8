//! Sign-in and sign-out.
//!
//! Sign-in accepts an identity-provider credential, merges its claims into
//! the persisted profile, and routes the user to Profile or Dashboard based
//! on completeness. Sign-out clears the persisted record and resets the
//! in-memory session.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use crate::auth::decode_identity_claims;
use crate::errors::AppError;
use crate::models::profile::UserProfile;
use crate::models::view::AppView;
use crate::orchestrator::session::ChatSession;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub credential: String,
}

/// POST /api/v1/auth/signin
pub async fn handle_signin(
    State(state): State<AppState>,
    Json(request): Json<SigninRequest>,
) -> Result<Json<UserProfile>, AppError> {
    // An undecodable credential aborts sign-in without touching stored state.
    let claims = decode_identity_claims(&request.credential).ok_or(AppError::Unauthorized)?;

    let mut profile = state.profiles.load();
    profile.is_authenticated = true;
    profile.profile_id = claims.sub;
    if !claims.name.is_empty() {
        profile.name = claims.name;
    }
    if !claims.email.is_empty() {
        profile.email = claims.email;
    }
    if claims.picture.is_some() {
        profile.picture = claims.picture;
    }
    state.profiles.save(&profile)?;

    let mut session = state.session.try_lock().map_err(|_| AppError::Busy)?;
    session.active_view = if profile.is_complete() {
        AppView::Dashboard
    } else {
        AppView::Profile
    };
    info!(view = ?session.active_view, "User signed in");

    Ok(Json(profile))
}

/// POST /api/v1/auth/signout
/// Drops the persisted profile and starts a fresh session.
pub async fn handle_signout(State(state): State<AppState>) -> Result<Json<UserProfile>, AppError> {
    state.profiles.clear()?;

    let mut session = state.session.try_lock().map_err(|_| AppError::Busy)?;
    *session = ChatSession::new();
    info!("User signed out, session reset");

    Ok(Json(UserProfile::default()))
}
