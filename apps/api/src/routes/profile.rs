//! Profile read/update. A profile edit that crosses the completeness gate
//! moves the user off the Profile view.

use axum::extract::State;
use axum::Json;
use tracing::debug;

use crate::errors::AppError;
use crate::models::profile::UserProfile;
use crate::models::view::AppView;
use crate::state::AppState;

/// GET /api/v1/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
) -> Result<Json<UserProfile>, AppError> {
    Ok(Json(state.profiles.load()))
}

/// PUT /api/v1/profile
pub async fn handle_put_profile(
    State(state): State<AppState>,
    Json(update): Json<UserProfile>,
) -> Result<Json<UserProfile>, AppError> {
    // Authentication is owned by sign-in, not by profile edits.
    let mut profile = update;
    profile.is_authenticated = state.profiles.load().is_authenticated;
    if !profile.is_authenticated {
        return Err(AppError::Unauthorized);
    }
    state.profiles.save(&profile)?;

    let mut session = state.session.try_lock().map_err(|_| AppError::Busy)?;
    if session.active_view == AppView::Profile && profile.is_complete() {
        session.active_view = AppView::Dashboard;
    }
    debug!(complete = profile.is_complete(), "Profile saved");

    Ok(Json(profile))
}
