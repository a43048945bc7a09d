//! Generation types: provider-neutral request/reply parts and errors.
//!
//! Replies are decoded into explicitly tagged parts so the interpreter in
//! `services::transform` never inspects raw field presence.

use images::EncodedImage;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by generation client operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// The required API key environment variable is not set.
    #[error("missing API key: env var {var} not set")]
    MissingApiKey { var: String },

    /// The HTTP request to the generation service failed (including timeouts).
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// The generation service returned a non-success HTTP status. `body` is
    /// the service's error message when it sent one, else the raw body.
    #[error("API response error: status {status}: {body}")]
    ApiResponse { status: u16, body: String },

    /// The generation service response body could not be deserialized.
    #[error("API response parse failed: {0}")]
    ApiParse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl LlmError {
    /// `true` for failures a caller could reasonably retry.
    #[must_use]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::ApiRequest(_) | Self::ApiResponse { status: 429 | 500..=599, .. })
    }
}

// =============================================================================
// REQUEST
// =============================================================================

/// Output modality requested from the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modality {
    Image,
    Text,
}

impl Modality {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "IMAGE",
            Self::Text => "TEXT",
        }
    }
}

/// One ordered part of a generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestPart {
    Image(EncodedImage),
    Text(String),
}

/// Ordered request parts plus the response modalities the caller accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub parts: Vec<RequestPart>,
    pub modalities: Vec<Modality>,
}

// =============================================================================
// REPLY
// =============================================================================

/// One part of a candidate's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyPart {
    /// Embedded binary payload (base64). The service may omit the MIME type.
    InlineData { data: String, mime_type: Option<String> },
    /// Plain text.
    Text(String),
    /// Anything else (thoughts, function calls, future part kinds).
    Unknown,
}

/// One alternative output for a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidate {
    pub parts: Vec<ReplyPart>,
}

/// Decoded reply from the generation service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReply {
    pub candidates: Vec<Candidate>,
    /// Prompt-level block reason reported instead of candidates, if any.
    pub block_reason: Option<String>,
}

// =============================================================================
// GENERATE CONTENT TRAIT
// =============================================================================

/// Provider-neutral async trait for content generation. Enables mocking in tests.
#[async_trait::async_trait]
pub trait GenerateContent: Send + Sync {
    /// Send a generation request and wait for the complete reply.
    ///
    /// # Errors
    ///
    /// Returns an [`LlmError`] if the request fails, times out, returns a
    /// non-success status, or the reply is malformed.
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationReply, LlmError>;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
