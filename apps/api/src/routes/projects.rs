//! Slide illustration generation for project decks.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SlideImageRequest {
    pub prompt: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideImageResponse {
    /// Data URI, or null when generation failed. A missing illustration
    /// degrades the slide, it never fails the deck.
    pub image_url: Option<String>,
}

/// POST /api/v1/projects/slide-image
pub async fn handle_slide_image(
    State(state): State<AppState>,
    Json(request): Json<SlideImageRequest>,
) -> Result<Json<SlideImageResponse>, AppError> {
    if !state.profiles.load().is_authenticated {
        return Err(AppError::Unauthorized);
    }
    if request.prompt.trim().is_empty() {
        return Err(AppError::Validation("prompt must not be empty".to_string()));
    }

    let image_url = state.llm.generate_image(&request.prompt).await;
    Ok(Json(SlideImageResponse { image_url }))
}
