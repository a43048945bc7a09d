//! Shared image encoding for uploads and generated results.
//!
//! This crate owns the transport representation used by both the server
//! and `client`: raw bytes become a base64 payload tagged with a MIME type,
//! and the same value renders to a `data:` URI for display. Encoding is
//! lossless; `decode` returns the exact bytes that were encoded.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// Content type assumed for uploads that arrive without one.
pub const DEFAULT_UPLOAD_TYPE: &str = "image/jpeg";

/// Content type assumed for generated images the service left untagged.
pub const DEFAULT_REPLY_TYPE: &str = "image/png";

const IMAGE_TYPE_PREFIX: &str = "image/";
const DATA_URI_SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// Error returned by the checked encode and decode helpers.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ImageError {
    /// The declared content type is not an `image/*` type.
    #[error("not an image: {content_type}")]
    NotAnImage { content_type: String },
    /// The payload is not valid standard base64.
    #[error("invalid base64 payload: {0}")]
    InvalidBase64(String),
}

/// Base64 image payload plus its MIME type.
///
/// Serializes as `{ "data": ..., "mimeType": ... }`, the shape returned to
/// browsers on a successful transform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedImage {
    pub data: String,
    pub mime_type: String,
}

impl EncodedImage {
    /// Render as a `data:` URI suitable for an `<img src>` or download link.
    #[must_use]
    pub fn data_uri(&self) -> String {
        format!("{DATA_URI_SCHEME}{}{BASE64_MARKER}{}", self.mime_type, self.data)
    }

    /// Decode the base64 payload back to raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidBase64`] if the payload is malformed.
    pub fn decode(&self) -> Result<Vec<u8>, ImageError> {
        STANDARD
            .decode(self.data.as_bytes())
            .map_err(|e| ImageError::InvalidBase64(e.to_string()))
    }
}

/// `true` when the content type names an image (`image/*`).
#[must_use]
pub fn is_image_type(content_type: &str) -> bool {
    content_type.trim().to_ascii_lowercase().starts_with(IMAGE_TYPE_PREFIX)
}

/// Encode raw bytes, defaulting a missing or blank content type to
/// [`DEFAULT_UPLOAD_TYPE`]. The content type is not validated.
#[must_use]
pub fn encode(bytes: &[u8], content_type: Option<&str>) -> EncodedImage {
    let mime_type = content_type
        .map(str::trim)
        .filter(|ct| !ct.is_empty())
        .unwrap_or(DEFAULT_UPLOAD_TYPE)
        .to_owned();
    EncodedImage { data: STANDARD.encode(bytes), mime_type }
}

/// Encode raw bytes after checking that the declared content type is an
/// image type. A missing or blank type is rejected; browsers report unknown
/// files that way.
///
/// # Errors
///
/// Returns [`ImageError::NotAnImage`] when the declared type is absent,
/// blank, or does not start with `image/`.
pub fn encode_checked(bytes: &[u8], content_type: Option<&str>) -> Result<EncodedImage, ImageError> {
    let declared = content_type.map(str::trim).unwrap_or_default();
    if !is_image_type(declared) {
        return Err(ImageError::NotAnImage { content_type: declared.to_owned() });
    }
    Ok(encode(bytes, Some(declared)))
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
