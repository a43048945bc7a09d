//! Multipart POST to the transform endpoints.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net` with a browser
//! `FormData` body. Native builds get a stub that reports the request as
//! unavailable, so the workflow still compiles and tests without a browser.
//!
//! ERROR HANDLING
//! ==============
//! Every failure, transport or server, comes back as the display message
//! the workflow stores in its error banner.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use images::EncodedImage;

use crate::state::workflow::Submission;
#[cfg(any(test, feature = "hydrate"))]
use crate::state::workflow::FormFile;

#[cfg(any(test, feature = "hydrate"))]
use super::types::TRANSFORM_FAILED_MESSAGE;

/// Name of the optional instruction field.
pub const PROMPT_FIELD: &str = "prompt";

/// MIME type sent for a file part, falling back to the upload default.
#[cfg(any(test, feature = "hydrate"))]
fn part_type(file: &FormFile) -> &str {
    let ct = file.file.content_type.trim();
    if ct.is_empty() { images::DEFAULT_UPLOAD_TYPE } else { ct }
}

/// Filename sent for a file part; the server treats an empty name with no
/// bytes as a missing file, so a nameless upload is labelled by its field.
#[cfg(any(test, feature = "hydrate"))]
fn part_filename(file: &FormFile) -> &str {
    if file.file.name.is_empty() { file.field } else { &file.file.name }
}

#[cfg(any(test, feature = "hydrate"))]
fn transport_failed_message(detail: &str) -> String {
    format!("{TRANSFORM_FAILED_MESSAGE}: {detail}")
}

/// Send a submission and interpret the reply.
///
/// # Errors
///
/// Returns the message to display if the form cannot be built, the request
/// fails, or the server does not return an image.
pub async fn submit_transform(submission: &Submission) -> Result<EncodedImage, String> {
    #[cfg(feature = "hydrate")]
    {
        let form = build_form(submission)?;
        let resp = gloo_net::http::Request::post(submission.endpoint)
            .body(form)
            .map_err(|e| transport_failed_message(&e.to_string()))?
            .send()
            .await
            .map_err(|e| transport_failed_message(&e.to_string()))?;
        let status = resp.status();
        let body = resp.text().await.map_err(|e| transport_failed_message(&e.to_string()))?;
        log::debug!("{} responded {status} ({} bytes)", submission.endpoint, body.len());
        super::types::interpret_response(status, &body)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Err(format!("{} is only reachable from the browser", submission.endpoint))
    }
}

#[cfg(feature = "hydrate")]
fn build_form(submission: &Submission) -> Result<web_sys::FormData, String> {
    let js_err = |e: wasm_bindgen::JsValue| transport_failed_message(&format!("{e:?}"));

    let form = web_sys::FormData::new().map_err(js_err)?;
    for file in &submission.files {
        let bytes = js_sys::Uint8Array::from(file.file.bytes.as_slice());
        let parts = js_sys::Array::of1(&bytes);
        let options = web_sys::BlobPropertyBag::new();
        options.set_type(part_type(file));
        let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options).map_err(js_err)?;
        form.append_with_blob_and_filename(file.field, &blob, part_filename(file)).map_err(js_err)?;
    }
    if let Some(prompt) = &submission.prompt {
        form.append_with_str(PROMPT_FIELD, prompt).map_err(js_err)?;
    }
    Ok(form)
}
