//! Gemini `generateContent` API client.
//!
//! Thin HTTP wrapper for `/models/{model}:generateContent`. Request encoding
//! and reply decoding are pure functions (`build_request`, `parse_response`)
//! for testability.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::config::{GeminiConfig, LlmTimeouts};
use super::types::{Candidate, GenerateContent, GenerationReply, GenerationRequest, LlmError, ReplyPart, RequestPart};

const API_KEY_HEADER: &str = "x-goog-api-key";
const USER_ROLE: &str = "user";
const MAX_ERROR_BODY_CHARS: usize = 500;

// =============================================================================
// CLIENT
// =============================================================================

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    timeouts: LlmTimeouts,
}

impl GeminiClient {
    /// Build a client from environment variables (see [`GeminiConfig::from_env`]).
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing, a value fails to parse, or
    /// the HTTP client fails to build.
    pub fn from_env() -> Result<Self, LlmError> {
        Self::new(GeminiConfig::from_env()?)
    }

    /// Build a client from a parsed typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: GeminiConfig) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| LlmError::HttpClientBuild(e.to_string()))?;
        Ok(Self {
            http,
            api_key: config.api_key,
            base_url: config.base_url,
            model: config.model,
            timeouts: config.timeouts,
        })
    }

    /// Return the configured model name (e.g. `"gemini-2.5-flash-image"`).
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn request_error(&self, err: &reqwest::Error) -> LlmError {
        if err.is_timeout() {
            LlmError::ApiRequest(format!("request timed out after {}s", self.timeouts.request_secs))
        } else {
            LlmError::ApiRequest(err.to_string())
        }
    }
}

#[async_trait::async_trait]
impl GenerateContent for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationReply, LlmError> {
        let body = build_request(request);

        let response = self
            .http
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.request_error(&e))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| self.request_error(&e))?;

        if !(200..300).contains(&status) {
            return Err(LlmError::ApiResponse { status, body: error_message(&text) });
        }

        parse_response(&text)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiRequest<'a> {
    contents: Vec<ApiContent<'a>>,
    generation_config: ApiGenerationConfig,
}

#[derive(Serialize)]
struct ApiContent<'a> {
    role: &'static str,
    parts: Vec<ApiRequestPart<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum ApiRequestPart<'a> {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: ApiRequestBlob<'a>,
    },
    Text {
        text: &'a str,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiRequestBlob<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiGenerationConfig {
    response_modalities: Vec<&'static str>,
}

#[derive(Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<ApiCandidate>,
    #[serde(default)]
    prompt_feedback: Option<ApiPromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiPromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct ApiCandidate {
    #[serde(default)]
    content: Option<ApiReplyContent>,
}

#[derive(Deserialize)]
struct ApiReplyContent {
    #[serde(default)]
    parts: Vec<ApiReplyPart>,
}

/// Reply parts are untagged on the wire; at most one payload field is set.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiReplyPart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default, alias = "inline_data")]
    inline_data: Option<ApiReplyBlob>,
    #[serde(default)]
    thought: Option<bool>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiReplyBlob {
    #[serde(default, alias = "mime_type")]
    mime_type: Option<String>,
    #[serde(default)]
    data: String,
}

// =============================================================================
// ENCODING / PARSING
// =============================================================================

fn build_request(request: &GenerationRequest) -> ApiRequest<'_> {
    let parts = request
        .parts
        .iter()
        .map(|part| match part {
            RequestPart::Image(image) => ApiRequestPart::InlineData {
                inline_data: ApiRequestBlob { mime_type: &image.mime_type, data: &image.data },
            },
            RequestPart::Text(text) => ApiRequestPart::Text { text },
        })
        .collect();

    ApiRequest {
        contents: vec![ApiContent { role: USER_ROLE, parts }],
        generation_config: ApiGenerationConfig {
            response_modalities: request.modalities.iter().map(|m| m.as_str()).collect(),
        },
    }
}

fn parse_response(json: &str) -> Result<GenerationReply, LlmError> {
    let api: ApiResponse = serde_json::from_str(json).map_err(|e| LlmError::ApiParse(e.to_string()))?;

    let candidates = api
        .candidates
        .into_iter()
        .map(|candidate| Candidate {
            parts: candidate
                .content
                .map(|content| content.parts.into_iter().map(tag_part).collect())
                .unwrap_or_default(),
        })
        .collect();

    Ok(GenerationReply { candidates, block_reason: api.prompt_feedback.and_then(|f| f.block_reason) })
}

/// Service message from a `{"error":{"message":..}}` body, or the body
/// itself (trimmed, capped at `MAX_ERROR_BODY_CHARS`) when it has none.
fn error_message(body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ApiErrorEnvelope>(body) {
        if !envelope.error.message.trim().is_empty() {
            return envelope.error.message;
        }
    }
    body.trim().chars().take(MAX_ERROR_BODY_CHARS).collect()
}

fn tag_part(part: ApiReplyPart) -> ReplyPart {
    if part.thought == Some(true) {
        return ReplyPart::Unknown;
    }
    if let Some(blob) = part.inline_data {
        let mime_type = blob.mime_type.filter(|m| !m.trim().is_empty());
        return ReplyPart::InlineData { data: blob.data, mime_type };
    }
    match part.text {
        Some(text) => ReplyPart::Text(text),
        None => ReplyPart::Unknown,
    }
}

#[cfg(test)]
#[path = "gemini_test.rs"]
mod tests;
