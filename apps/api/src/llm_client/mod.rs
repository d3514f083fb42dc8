/// LLM Client — the single point of entry for all Gemini API calls in CareerOS.
///
/// ARCHITECTURAL RULE: No other module may call the Gemini API directly.
/// All model interactions MUST go through this module, behind the
/// `TurnTransport` seam so the orchestration loop is testable offline.
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::tools::{registry, ToolDeclaration, ToolInvocation};

pub mod prompts;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Full-capability model for user-initiated generation requests.
pub const MODEL_PRO: &str = "gemini-3-pro-preview";
/// Lower-latency variant for silent automatic follow-ups.
pub const MODEL_FLASH: &str = "gemini-3-flash-preview";
/// Image model used for slide visuals.
pub const MODEL_IMAGE: &str = "gemini-2.5-flash-image";

const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },
}

/// Role a prior turn is presented under. The model's wire format only knows
/// `user` and `model`: assistant turns map to `model`, everything else to
/// `user`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRole {
    User,
    Model,
}

impl TurnRole {
    fn as_str(&self) -> &'static str {
        match self {
            TurnRole::User => "user",
            TurnRole::Model => "model",
        }
    }
}

/// A prior conversation turn, already role-mapped for transport.
#[derive(Debug, Clone)]
pub struct HistoryTurn {
    pub role: TurnRole,
    pub text: String,
}

/// Binary attachment accompanying a turn. Base64-encoded at the wire
/// boundary, never earlier.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// One outbound exchange: the new turn plus the rolling history.
/// `text` may be empty only when an attachment is present.
#[derive(Debug, Clone)]
pub struct TurnRequest {
    pub text: String,
    pub history: Vec<HistoryTurn>,
    pub attachment: Option<Attachment>,
    pub fast: bool,
}

/// What came back: free text and/or structured tool-invocation requests.
#[derive(Debug, Clone, Default)]
pub struct ModelReply {
    pub text: Option<String>,
    pub tool_calls: Vec<ToolInvocation>,
}

/// The model invocation boundary. `GeminiClient` is the production
/// implementation; tests script replies through fakes.
#[async_trait]
pub trait TurnTransport: Send + Sync {
    async fn send(&self, request: TurnRequest) -> Result<ModelReply, LlmError>;
}

/// The single Gemini client used by all services in CareerOS.
/// Wraps `generateContent` with retry logic and the fixed tool catalog.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> anyhow::Result<Self> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()?,
            api_key,
        })
    }

    /// Generates a slide visual for `prompt` at the fixed 16:9 aspect ratio.
    /// Returns a displayable data URI. Any failure degrades to `None` — a
    /// slide without an image is not an error.
    pub async fn generate_image(&self, prompt: &str) -> Option<String> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: None,
                parts: vec![Part::text(prompt)],
            }],
            system_instruction: None,
            tools: vec![],
            generation_config: Some(GenerationConfig {
                image_config: ImageConfig {
                    aspect_ratio: "16:9",
                },
            }),
        };

        match self.post(MODEL_IMAGE, &request).await {
            Ok(response) => response
                .into_first_candidate_parts()
                .into_iter()
                .find_map(|part| part.inline_data)
                .map(|blob| format!("data:{};base64,{}", blob.mime_type, blob.data)),
            Err(e) => {
                warn!("Image generation failed, continuing without image: {e}");
                None
            }
        }
    }

    /// POSTs to `generateContent` for `model`, retrying 429s and 5xx with
    /// exponential backoff.
    async fn post(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, LlmError> {
        let url = format!(
            "{BASE_URL}/{model}:generateContent?key={key}",
            key = self.api_key
        );

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "Model call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self.client.post(&url).json(request).send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Model API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<GeminiError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let parsed: GenerateContentResponse = response.json().await?;
            return Ok(parsed);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

#[async_trait]
impl TurnTransport for GeminiClient {
    async fn send(&self, request: TurnRequest) -> Result<ModelReply, LlmError> {
        let model = if request.fast { MODEL_FLASH } else { MODEL_PRO };
        let body = build_request(&request);

        let response = self.post(model, &body).await?;
        let parts = response.into_first_candidate_parts();

        let mut reply = ModelReply::default();
        for part in parts {
            if let Some(text) = part.text {
                if !text.is_empty() {
                    reply.text = Some(match reply.text.take() {
                        Some(existing) => format!("{existing}{text}"),
                        None => text,
                    });
                }
            }
            if let Some(call) = part.function_call {
                reply.tool_calls.push(ToolInvocation {
                    name: call.name,
                    args: call.args,
                });
            }
        }

        debug!(
            "Model reply: text={} tool_calls={}",
            reply.text.is_some(),
            reply.tool_calls.len()
        );

        Ok(reply)
    }
}

/// Assembles the wire request: role-mapped history, the new turn (text plus
/// optional base64 inline attachment), the fixed system instruction, and the
/// full tool catalog.
fn build_request(request: &TurnRequest) -> GenerateContentRequest {
    let mut contents: Vec<Content> = request
        .history
        .iter()
        .map(|turn| Content {
            role: Some(turn.role.as_str()),
            parts: vec![Part::text(&turn.text)],
        })
        .collect();

    let mut parts = vec![Part::text(&request.text)];
    if let Some(attachment) = &request.attachment {
        parts.push(Part {
            text: None,
            inline_data: Some(InlineData {
                mime_type: attachment.mime_type.clone(),
                data: BASE64_STANDARD.encode(&attachment.bytes),
            }),
            function_call: None,
        });
    }
    contents.push(Content {
        role: Some("user"),
        parts,
    });

    GenerateContentRequest {
        contents,
        system_instruction: Some(Content {
            role: None,
            parts: vec![Part::text(prompts::SYSTEM_INSTRUCTION)],
        }),
        tools: vec![
            ToolConfig {
                function_declarations: registry(),
                google_search: None,
            },
            ToolConfig {
                function_declarations: vec![],
                google_search: Some(GoogleSearch {}),
            },
        ],
        generation_config: None,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<ToolConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolConfig {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    function_declarations: Vec<ToolDeclaration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    google_search: Option<GoogleSearch>,
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    image_config: ImageConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageConfig {
    aspect_ratio: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    function_call: Option<FunctionCall>,
}

impl Part {
    fn text(text: impl Into<String>) -> Self {
        Part {
            text: Some(text.into()),
            inline_data: None,
            function_call: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct FunctionCall {
    name: String,
    #[serde(default)]
    args: Value,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

impl GenerateContentResponse {
    fn into_first_candidate_parts(self) -> Vec<ResponsePart> {
        self.candidates
            .into_iter()
            .flatten()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| content.parts)
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    text: Option<String>,
    inline_data: Option<InlineData>,
    function_call: Option<FunctionCall>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_request_maps_roles_and_appends_new_turn_last() {
        let request = TurnRequest {
            text: "What roles fit my profile?".into(),
            history: vec![
                HistoryTurn {
                    role: TurnRole::User,
                    text: "Hi".into(),
                },
                HistoryTurn {
                    role: TurnRole::Model,
                    text: "Hello, upload a job post to begin.".into(),
                },
            ],
            attachment: None,
            fast: false,
        };

        let body = build_request(&request);
        let value = serde_json::to_value(&body).unwrap();
        let contents = value["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[2]["role"], "user");
        assert_eq!(
            contents[2]["parts"][0]["text"],
            "What roles fit my profile?"
        );
    }

    #[test]
    fn test_build_request_encodes_attachment_as_inline_data() {
        let request = TurnRequest {
            text: "Analyze this job post screenshot.".into(),
            history: vec![],
            attachment: Some(Attachment {
                bytes: vec![0xDE, 0xAD, 0xBE, 0xEF],
                mime_type: "image/png".into(),
            }),
            fast: false,
        };

        let value = serde_json::to_value(build_request(&request)).unwrap();
        let parts = value["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[1]["inlineData"]["mimeType"], "image/png");
        assert_eq!(
            parts[1]["inlineData"]["data"],
            BASE64_STANDARD.encode([0xDE, 0xAD, 0xBE, 0xEF])
        );
    }

    #[test]
    fn test_build_request_always_declares_the_full_tool_catalog() {
        let request = TurnRequest {
            text: "hello".into(),
            history: vec![],
            attachment: None,
            fast: true,
        };

        let value = serde_json::to_value(build_request(&request)).unwrap();
        let declarations = value["tools"][0]["functionDeclarations"]
            .as_array()
            .unwrap();
        assert_eq!(declarations.len(), crate::tools::ToolName::ALL.len());
        assert!(value["tools"][1]["googleSearch"].is_object());
        assert!(value["systemInstruction"]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("CareerOS"));
    }

    #[test]
    fn test_response_parsing_extracts_text_and_function_calls() {
        let raw = r#"{
            "candidates": [{
                "content": {
                    "parts": [
                        {"text": "On it."},
                        {"functionCall": {"name": "navigateApp", "args": {"targetView": "ats"}}}
                    ]
                }
            }]
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        let parts = response.into_first_candidate_parts();
        assert_eq!(parts[0].text.as_deref(), Some("On it."));
        let call = parts[1].function_call.as_ref().unwrap();
        assert_eq!(call.name, "navigateApp");
        assert_eq!(call.args["targetView"], "ats");
    }

    #[test]
    fn test_empty_candidates_yield_no_parts() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(response.into_first_candidate_parts().is_empty());
    }
}
