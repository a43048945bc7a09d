//! Transform service: uploaded images → generation request → outcome.
//!
//! DESIGN
//! ======
//! One parameterized pipeline serves both endpoints. A `TransformVariant`
//! names the required image slots (in request order) and whether the
//! instruction can be overridden by the caller. Route handlers only translate
//! form fields into a `TransformInput` and the result into JSON.
//!
//! Preconditions are checked before anything is encoded: every slot must be
//! filled, then a generator must be configured. Neither failure reaches the
//! generation service.
//!
//! OUTCOME PRECEDENCE
//! ==================
//! The first inline-binary part (candidate order, then part order) wins even
//! if text is also present. Without one, the first text part is a refusal.
//! Otherwise the reply is empty.

use std::collections::HashMap;

use images::{DEFAULT_REPLY_TYPE, EncodedImage};
use tracing::{info, warn};

use crate::llm::GenerateContent;
use crate::llm::types::{GenerationReply, GenerationRequest, LlmError, Modality, ReplyPart, RequestPart};

/// Instruction used by the single-image endpoint when no prompt is given.
pub const DEFAULT_TRANSFORM_PROMPT: &str = "Replace the wheels on this car with a set of stylish aftermarket \
     rims. Keep the car body, paint, background, lighting and camera angle exactly as they are.";

/// Fixed instruction for the two-image wheel swap.
pub const WHEEL_SWAP_PROMPT: &str = "swap the car wheels with the ones in the second image";

// =============================================================================
// VARIANTS
// =============================================================================

/// A required image input and the form field that carries it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSlot {
    pub field: &'static str,
    /// Reported to the caller when the field is absent.
    pub missing_message: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// Caller may supply a prompt; blank or absent falls back to the default.
    Overridable { default: &'static str },
    /// Caller prompt is ignored.
    Fixed(&'static str),
}

impl Instruction {
    #[must_use]
    pub fn resolve(self, prompt: Option<&str>) -> String {
        match self {
            Self::Overridable { default } => prompt
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .unwrap_or(default)
                .to_owned(),
            Self::Fixed(text) => text.to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformVariant {
    pub name: &'static str,
    /// Slots in the order their images are sent.
    pub slots: &'static [ImageSlot],
    pub instruction: Instruction,
}

pub const SINGLE_IMAGE: TransformVariant = TransformVariant {
    name: "single",
    slots: &[ImageSlot { field: "image", missing_message: "No image provided" }],
    instruction: Instruction::Overridable { default: DEFAULT_TRANSFORM_PROMPT },
};

pub const WHEEL_SWAP: TransformVariant = TransformVariant {
    name: "wheel_swap",
    slots: &[
        ImageSlot { field: "carImage", missing_message: "No car image provided" },
        ImageSlot { field: "wheelzImage", missing_message: "No wheelz image provided" },
    ],
    instruction: Instruction::Fixed(WHEEL_SWAP_PROMPT),
};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("Invalid form data: {0}")]
    InvalidForm(String),
    #[error("Upload too large: {0}")]
    PayloadTooLarge(String),
    #[error("{missing_message}")]
    MissingImage { field: &'static str, missing_message: &'static str },
    #[error("Google AI API key not configured")]
    NotConfigured,
    #[error("Model returned text instead of image")]
    Declined { text: String },
    #[error("No image data in response")]
    EmptyReply,
    #[error("Failed to process image: {0}")]
    Upstream(#[from] LlmError),
}

/// One uploaded file as received at the HTTP boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadedImage {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
    pub file_name: Option<String>,
}

/// Form contents keyed by field name.
#[derive(Debug, Clone, Default)]
pub struct TransformInput {
    pub images: HashMap<String, UploadedImage>,
    pub prompt: Option<String>,
}

/// Resolution of a completed generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Image(EncodedImage),
    TextOnly(String),
    Empty,
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Run one transform request end to end.
///
/// # Errors
///
/// Returns a [`TransformError`] for a missing slot, a missing generator, a
/// text-only or empty reply, or any generation service failure.
pub async fn run_transform(
    generator: Option<&dyn GenerateContent>,
    variant: TransformVariant,
    input: &TransformInput,
) -> Result<EncodedImage, TransformError> {
    let uploads = collect_images(variant, input)?;
    let generator = generator.ok_or(TransformError::NotConfigured)?;

    let encoded: Vec<EncodedImage> = uploads
        .iter()
        .map(|upload| images::encode(&upload.bytes, upload.content_type.as_deref()))
        .collect();
    let instruction = variant.instruction.resolve(input.prompt.as_deref());
    let request = compose_request(&encoded, &instruction);

    let file_names: Vec<&str> = uploads.iter().filter_map(|u| u.file_name.as_deref()).collect();
    info!(
        variant = variant.name,
        images = encoded.len(),
        files = ?file_names,
        bytes = uploads.iter().map(|u| u.bytes.len()).sum::<usize>(),
        instruction_len = instruction.len(),
        "transform: calling generation service"
    );

    let reply = generator.generate(&request).await?;
    if let Some(reason) = &reply.block_reason {
        warn!(variant = variant.name, %reason, "transform: prompt blocked by service");
    }

    match interpret_reply(&reply) {
        GenerationOutcome::Image(image) => {
            info!(variant = variant.name, mime_type = %image.mime_type, "transform: image generated");
            Ok(image)
        }
        GenerationOutcome::TextOnly(text) => {
            warn!(variant = variant.name, text_len = text.len(), "transform: service returned text only");
            Err(TransformError::Declined { text })
        }
        GenerationOutcome::Empty => {
            warn!(variant = variant.name, candidates = reply.candidates.len(), "transform: empty reply");
            Err(TransformError::EmptyReply)
        }
    }
}

// =============================================================================
// PIPELINE STAGES
// =============================================================================

/// Look up every required slot, in slot order.
///
/// # Errors
///
/// Returns [`TransformError::MissingImage`] for the first absent slot.
pub fn collect_images(variant: TransformVariant, input: &TransformInput) -> Result<Vec<&UploadedImage>, TransformError> {
    variant
        .slots
        .iter()
        .map(|slot| {
            input
                .images
                .get(slot.field)
                .ok_or(TransformError::MissingImage { field: slot.field, missing_message: slot.missing_message })
        })
        .collect()
}

/// Images first (in the given order), instruction last.
#[must_use]
pub fn compose_request(images: &[EncodedImage], instruction: &str) -> GenerationRequest {
    let mut parts: Vec<RequestPart> = images.iter().cloned().map(RequestPart::Image).collect();
    parts.push(RequestPart::Text(instruction.to_owned()));
    GenerationRequest { parts, modalities: vec![Modality::Image, Modality::Text] }
}

#[must_use]
pub fn interpret_reply(reply: &GenerationReply) -> GenerationOutcome {
    let parts = || reply.candidates.iter().flat_map(|c| c.parts.iter());

    let image = parts().find_map(|part| match part {
        ReplyPart::InlineData { data, mime_type } => Some(EncodedImage {
            data: data.clone(),
            mime_type: mime_type.clone().unwrap_or_else(|| DEFAULT_REPLY_TYPE.to_owned()),
        }),
        _ => None,
    });
    if let Some(image) = image {
        return GenerationOutcome::Image(image);
    }

    let text = parts().find_map(|part| match part {
        ReplyPart::Text(text) => Some(text.clone()),
        _ => None,
    });
    match text {
        Some(text) => GenerationOutcome::TextOnly(text),
        None => GenerationOutcome::Empty,
    }
}

#[cfg(test)]
#[path = "transform_test.rs"]
mod tests;
