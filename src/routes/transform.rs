//! Transform routes: multipart form in, JSON result out.
//!
//! Both endpoints are thin adapters over `services::transform::run_transform`;
//! they differ only in the `TransformVariant` they pass.

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use images::EncodedImage;
use serde::Serialize;
use tracing::{Instrument, error, info, warn};
use uuid::Uuid;

use crate::services::transform::{
    self, SINGLE_IMAGE, TransformError, TransformInput, TransformVariant, UploadedImage, WHEEL_SWAP,
};
use crate::state::AppState;

const PROMPT_FIELD: &str = "prompt";

#[derive(Serialize)]
pub struct TransformSuccess {
    pub success: bool,
    pub image: EncodedImage,
}

/// `POST /api/transform`: one `image` file plus an optional `prompt`.
pub async fn transform_single(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    handle_transform(state, SINGLE_IMAGE, multipart).await
}

/// `POST /api/transform/wheelz`: `carImage` and `wheelzImage` files.
pub async fn transform_wheel_swap(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    handle_transform(state, WHEEL_SWAP, multipart).await
}

async fn handle_transform(
    state: AppState,
    variant: TransformVariant,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("transform", %request_id, variant = variant.name);

    async move {
        let result = match multipart {
            Ok(multipart) => match read_form(variant, multipart).await {
                Ok(input) => transform::run_transform(state.generator.as_deref(), variant, &input).await,
                Err(e) => Err(e),
            },
            Err(rejection) => Err(TransformError::InvalidForm(rejection.body_text())),
        };

        match result {
            Ok(image) => {
                info!("transform: success");
                (StatusCode::OK, Json(TransformSuccess { success: true, image })).into_response()
            }
            Err(err) => transform_error_response(&err),
        }
    }
    .instrument(span)
    .await
}

// =============================================================================
// FORM PARSING
// =============================================================================

/// Collect the variant's image fields and the optional prompt.
///
/// The first occurrence of a field wins. A file field with no file name and
/// no bytes (an untouched browser file input) counts as absent.
async fn read_form(variant: TransformVariant, mut multipart: Multipart) -> Result<TransformInput, TransformError> {
    let mut input = TransformInput::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        if name == PROMPT_FIELD {
            let text = field.text().await.map_err(multipart_error)?;
            if input.prompt.is_none() {
                input.prompt = Some(text);
            }
            continue;
        }

        if !variant.slots.iter().any(|slot| slot.field == name) || input.images.contains_key(&name) {
            continue;
        }

        let file_name = field.file_name().map(str::to_owned);
        let content_type = field.content_type().map(str::to_owned);
        let bytes = field.bytes().await.map_err(multipart_error)?;
        if bytes.is_empty() && file_name.as_deref().is_none_or(str::is_empty) {
            continue;
        }

        input.images.insert(name, UploadedImage { bytes: bytes.to_vec(), content_type, file_name });
    }

    Ok(input)
}

fn multipart_error(err: MultipartError) -> TransformError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        TransformError::PayloadTooLarge(err.body_text())
    } else {
        TransformError::InvalidForm(err.body_text())
    }
}

// =============================================================================
// ERROR MAPPING
// =============================================================================

pub(crate) fn transform_error_status(err: &TransformError) -> StatusCode {
    match err {
        TransformError::InvalidForm(_) | TransformError::MissingImage { .. } => StatusCode::BAD_REQUEST,
        TransformError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
        TransformError::Declined { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        TransformError::NotConfigured | TransformError::EmptyReply | TransformError::Upstream(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

pub(crate) fn transform_error_response(err: &TransformError) -> Response {
    let status = transform_error_status(err);
    match err {
        TransformError::Upstream(e) => error!(error = %e, retryable = e.retryable(), "transform: upstream failure"),
        TransformError::MissingImage { field, .. } => warn!(%field, "transform: required image missing"),
        _ => warn!(status = status.as_u16(), error = %err, "transform: request failed"),
    }

    let body = match err {
        TransformError::Declined { text } => serde_json::json!({
            "success": false,
            "error": err.to_string(),
            "text": text,
        }),
        _ => serde_json::json!({ "error": err.to_string() }),
    };
    (status, Json(body)).into_response()
}

#[cfg(test)]
#[path = "transform_test.rs"]
mod tests;
