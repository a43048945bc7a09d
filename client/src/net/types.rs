//! Transform endpoint response body and its interpretation.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use images::EncodedImage;
use serde::Deserialize;

pub const TRANSFORM_FAILED_MESSAGE: &str = "Failed to transform image";
pub const NO_IMAGE_MESSAGE: &str = "No image returned";

/// Union of the success and error bodies the server sends.
#[derive(Debug, Default, Deserialize)]
pub struct TransformBody {
    #[serde(default)]
    pub success: bool,
    pub image: Option<EncodedImage>,
    pub error: Option<String>,
    /// Model text returned alongside a `success: false` decline.
    pub text: Option<String>,
}

/// Turn a raw HTTP status and body into the workflow's completion result.
///
/// # Errors
///
/// Returns the message to display: the server's `error` field when present
/// (with the model's text appended for a decline), otherwise a generic
/// fallback.
pub fn interpret_response(status: u16, body: &str) -> Result<EncodedImage, String> {
    let parsed: TransformBody = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(e) => {
            log::warn!("transform response ({status}) is not JSON: {e}");
            return Err(format!("{TRANSFORM_FAILED_MESSAGE} (HTTP {status})"));
        }
    };

    if !(200..300).contains(&status) {
        let message = parsed.error.unwrap_or_else(|| TRANSFORM_FAILED_MESSAGE.to_owned());
        return Err(match parsed.text.filter(|t| !t.trim().is_empty()) {
            Some(text) => format!("{message}: {text}"),
            None => message,
        });
    }

    match parsed.image {
        Some(image) if parsed.success => Ok(image),
        _ => Err(parsed.error.unwrap_or_else(|| NO_IMAGE_MESSAGE.to_owned())),
    }
}
