//! Chat endpoints: the user-facing entry into the orchestration loop.

use axum::extract::State;
use axum::Json;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use serde::Deserialize;
use tracing::debug;

use crate::errors::AppError;
use crate::llm_client::{prompts, Attachment};
use crate::orchestrator::session::SessionSnapshot;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendRequest {
    #[serde(default)]
    pub text: String,
    /// Base64-encoded attachment bytes, usually a job-post screenshot.
    pub attachment: Option<AttachmentPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentPayload {
    pub data: String,
    pub mime_type: String,
}

/// POST /api/v1/chat/send
/// Runs one full orchestration chain and returns the settled session.
pub async fn handle_send(
    State(state): State<AppState>,
    Json(request): Json<SendRequest>,
) -> Result<Json<SessionSnapshot>, AppError> {
    if !state.profiles.load().is_authenticated {
        return Err(AppError::Unauthorized);
    }

    let attachment = request
        .attachment
        .map(|payload| {
            let bytes = BASE64_STANDARD
                .decode(&payload.data)
                .map_err(|e| AppError::Validation(format!("invalid attachment encoding: {e}")))?;
            Ok::<_, AppError>(Attachment {
                bytes,
                mime_type: payload.mime_type,
            })
        })
        .transpose()?;

    // An upload without accompanying text gets the standard analysis prompt.
    let text = if request.text.is_empty() && attachment.is_some() {
        prompts::JOB_UPLOAD_PROMPT.to_string()
    } else {
        request.text
    };

    // try_lock rather than lock: a send that arrives mid-chain is rejected,
    // never queued behind the running one.
    let mut session = state.session.try_lock().map_err(|_| AppError::Busy)?;

    debug!(
        has_attachment = attachment.is_some(),
        "Chat send accepted"
    );
    state
        .orchestrator
        .send_user_message(&mut session, text, attachment)
        .await?;

    Ok(Json(session.snapshot()))
}

/// GET /api/v1/session
/// Read-only snapshot of the current session.
pub async fn handle_get_session(
    State(state): State<AppState>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let session = state.session.try_lock().map_err(|_| AppError::Busy)?;
    Ok(Json(session.snapshot()))
}
