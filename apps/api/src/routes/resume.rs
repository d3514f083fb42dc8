//! Resume generation entry point.
//!
//! Builds the architect prompt from the persisted profile and pushes it into
//! the normal orchestration loop; the model answers with a `generateResume`
//! tool call and the dispatcher takes it from there.

use axum::extract::State;
use axum::Json;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::prompts::{resume_architect_prompt, ResumeLayout};
use crate::llm_client::Attachment;
use crate::models::view::AppView;
use crate::orchestrator::conversation::{Role, TurnKind};
use crate::orchestrator::session::SessionSnapshot;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// Named layout style, e.g. "modern" or "classic". Ignored when a
    /// reference document is supplied.
    pub style: Option<String>,
    /// Base64-encoded reference resume whose layout should be mimicked.
    pub reference: Option<ReferencePayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferencePayload {
    pub data: String,
    pub mime_type: String,
}

/// POST /api/v1/resume/generate
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let profile = state.profiles.load();
    if !profile.is_authenticated {
        return Err(AppError::Unauthorized);
    }

    let mut session = state.session.try_lock().map_err(|_| AppError::Busy)?;

    // Generation without identity data produces an empty shell; send the
    // user to fill in the profile instead.
    if profile.name.is_empty() {
        session.active_view = AppView::Profile;
        return Err(AppError::Validation(
            "complete your profile before generating a resume".to_string(),
        ));
    }

    match request.reference {
        Some(reference) => {
            let bytes = BASE64_STANDARD
                .decode(&reference.data)
                .map_err(|e| AppError::Validation(format!("invalid reference encoding: {e}")))?;
            let attachment = Attachment {
                bytes,
                mime_type: reference.mime_type,
            };

            session.log.append(
                Role::Assistant,
                TurnKind::Text,
                "Analyzing your reference resume layout...",
                true,
            );
            info!("Resume generation from reference document");

            let prompt = resume_architect_prompt(&profile, &ResumeLayout::MimicReference);
            state
                .orchestrator
                .send_silent_message(&mut session, prompt, Some(attachment))
                .await?;
        }
        None => {
            let style = request.style.unwrap_or_else(|| "modern".to_string());
            info!(%style, "Resume generation from named style");

            let prompt = resume_architect_prompt(&profile, &ResumeLayout::Style(style));
            state
                .orchestrator
                .send_silent_message(&mut session, prompt, None)
                .await?;
        }
    }

    Ok(Json(session.snapshot()))
}
