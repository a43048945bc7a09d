//! Upload → submit → result/error → reset state machine.
//!
//! DESIGN
//! ======
//! `Workflow` is plain data so it can sit behind whatever reactive wrapper
//! the page uses. Drag-and-drop and click-to-browse both funnel into
//! `select_file`, so validation and preview encoding never depend on the
//! entry point.
//!
//! Each `submit` hands out a fresh `SubmissionId`. `complete` only applies a
//! result whose id is still pending; a reset (or a newer submit) makes any
//! in-flight response stale and it is dropped on arrival.

#[cfg(test)]
#[path = "workflow_test.rs"]
mod workflow_test;

use images::EncodedImage;

use super::slot::{SelectedFile, TransformKind, UploadSlot};

pub const NOT_AN_IMAGE_MESSAGE: &str = "Please upload an image file";
pub const MISSING_IMAGE_MESSAGE: &str = "Please upload an image first";

/// Lifecycle phase of the page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    ReadyToSubmit,
    Submitting,
    Succeeded,
    Failed,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("not an image: {content_type}")]
    NotAnImage { content_type: String },
    #[error("missing image for slot {slot}")]
    MissingImage { slot: &'static str },
    #[error("a transform is already in progress")]
    Busy,
    #[error("unknown upload slot: {0}")]
    UnknownSlot(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubmissionId(u64);

/// One file bound to its form field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormFile {
    pub field: &'static str,
    pub file: SelectedFile,
}

/// Everything needed to POST one transform request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submission {
    pub id: SubmissionId,
    pub endpoint: &'static str,
    /// Files in slot order.
    pub files: Vec<FormFile>,
    pub prompt: Option<String>,
}

/// Link target for saving the current result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadLink {
    pub href: String,
    pub filename: String,
}

#[derive(Clone, Debug)]
pub struct Workflow {
    kind: TransformKind,
    slots: Vec<UploadSlot>,
    prompt: String,
    phase: Phase,
    error: Option<String>,
    result: Option<String>,
    pending: Option<SubmissionId>,
    next_id: u64,
}

impl Workflow {
    #[must_use]
    pub fn new(kind: TransformKind) -> Self {
        Self {
            kind,
            slots: vec![UploadSlot::default(); kind.slots().len()],
            prompt: String::new(),
            phase: Phase::Idle,
            error: None,
            result: None,
            pending: None,
            next_id: 0,
        }
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    #[must_use]
    pub fn kind(&self) -> TransformKind {
        self.kind
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Displayable `data:` URI of the last successful result.
    #[must_use]
    pub fn result_uri(&self) -> Option<&str> {
        self.result.as_deref()
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn slot(&self, key: &str) -> Option<&UploadSlot> {
        self.slot_index(key).map(|i| &self.slots[i])
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.phase == Phase::Submitting
    }

    /// Whether the submit control should be enabled.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.is_submitting() && self.all_filled()
    }

    // =========================================================================
    // FILE SELECTION
    // =========================================================================

    /// Mark a slot as hovered by a drag.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::UnknownSlot`] if `key` is not a slot of this page.
    pub fn drag_enter(&mut self, key: &str) -> Result<(), WorkflowError> {
        let index = self.require_slot(key)?;
        self.slots[index].drag_active = true;
        Ok(())
    }

    /// Clear the drag hover flag.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::UnknownSlot`] if `key` is not a slot of this page.
    pub fn drag_leave(&mut self, key: &str) -> Result<(), WorkflowError> {
        let index = self.require_slot(key)?;
        self.slots[index].drag_active = false;
        Ok(())
    }

    /// A file dropped onto a slot.
    ///
    /// # Errors
    ///
    /// See [`Workflow::select_file`].
    pub fn drop_file(&mut self, key: &str, file: SelectedFile) -> Result<(), WorkflowError> {
        self.drag_leave(key)?;
        self.select_file(key, file)
    }

    /// A file chosen through the slot's file picker.
    ///
    /// # Errors
    ///
    /// See [`Workflow::select_file`].
    pub fn browse_file(&mut self, key: &str, file: SelectedFile) -> Result<(), WorkflowError> {
        self.select_file(key, file)
    }

    /// Validate a file, encode its preview, and store it in the slot.
    ///
    /// A valid file clears the previous error and result. An invalid one
    /// leaves the slot and phase untouched and sets [`NOT_AN_IMAGE_MESSAGE`].
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::UnknownSlot`], [`WorkflowError::Busy`] while a
    /// submission is pending, or [`WorkflowError::NotAnImage`].
    pub fn select_file(&mut self, key: &str, file: SelectedFile) -> Result<(), WorkflowError> {
        let index = self.require_slot(key)?;
        if self.is_submitting() {
            return Err(WorkflowError::Busy);
        }

        let preview = match images::encode_checked(&file.bytes, Some(&file.content_type)) {
            Ok(encoded) => encoded.data_uri(),
            Err(e) => {
                log::debug!("slot {key}: rejected {}: {e}", file.name);
                self.error = Some(NOT_AN_IMAGE_MESSAGE.to_owned());
                return Err(WorkflowError::NotAnImage { content_type: file.content_type });
            }
        };

        log::debug!("slot {key}: selected {} ({} bytes)", file.name, file.bytes.len());
        self.slots[index].fill(file, preview);
        self.error = None;
        self.result = None;
        self.phase = if self.all_filled() { Phase::ReadyToSubmit } else { Phase::Idle };
        Ok(())
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    // =========================================================================
    // SUBMISSION
    // =========================================================================

    /// Start a transform. Allowed once every slot is filled and nothing is
    /// pending, including as a retry after a result or failure.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Busy`] while a submission is pending, or
    /// [`WorkflowError::MissingImage`] (setting [`MISSING_IMAGE_MESSAGE`]) when
    /// a slot is empty. Neither changes the phase.
    pub fn submit(&mut self) -> Result<Submission, WorkflowError> {
        if self.is_submitting() {
            return Err(WorkflowError::Busy);
        }

        let mut files = Vec::with_capacity(self.slots.len());
        for (spec, slot) in self.kind.slots().iter().zip(&self.slots) {
            let Some(file) = &slot.file else {
                self.error = Some(MISSING_IMAGE_MESSAGE.to_owned());
                return Err(WorkflowError::MissingImage { slot: spec.key });
            };
            files.push(FormFile { field: spec.field, file: file.clone() });
        }

        self.next_id += 1;
        let id = SubmissionId(self.next_id);
        self.pending = Some(id);
        self.phase = Phase::Submitting;
        self.error = None;
        self.result = None;

        let prompt = self.kind.accepts_prompt().then(|| self.prompt.clone());
        log::info!("submitting transform #{} to {}", self.next_id, self.kind.endpoint());
        Ok(Submission { id, endpoint: self.kind.endpoint(), files, prompt })
    }

    /// Apply the result of a submission. Returns `false` (and changes
    /// nothing) when `id` is no longer pending.
    pub fn complete(&mut self, id: SubmissionId, result: Result<EncodedImage, String>) -> bool {
        if self.pending != Some(id) {
            log::debug!("ignoring stale transform result {id:?}");
            return false;
        }
        self.pending = None;

        match result {
            Ok(image) => {
                self.result = Some(image.data_uri());
                self.error = None;
                self.phase = Phase::Succeeded;
            }
            Err(message) => {
                log::warn!("transform failed: {message}");
                self.result = None;
                self.error = Some(message);
                self.phase = Phase::Failed;
            }
        }
        true
    }

    /// Back to `Idle` with every slot, preview, result, and error cleared.
    /// Any pending submission is abandoned. The prompt text is kept.
    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            slot.clear();
        }
        self.phase = Phase::Idle;
        self.error = None;
        self.result = None;
        self.pending = None;
    }

    // =========================================================================
    // DOWNLOAD
    // =========================================================================

    /// Link for saving the current result, named after the first slot's file.
    #[must_use]
    pub fn download_link(&self) -> Option<DownloadLink> {
        if self.phase != Phase::Succeeded {
            return None;
        }
        let href = self.result.clone()?;
        let base = self
            .slots
            .first()
            .and_then(|slot| slot.file_name.as_deref())
            .filter(|name| !name.is_empty())
            .unwrap_or("image");
        let filename = format!("transformed-{base}.png");
        log::info!("download requested: {filename}");
        Some(DownloadLink { href, filename })
    }

    // =========================================================================
    // HELPERS
    // =========================================================================

    fn slot_index(&self, key: &str) -> Option<usize> {
        self.kind.slots().iter().position(|spec| spec.key == key)
    }

    fn require_slot(&self, key: &str) -> Result<usize, WorkflowError> {
        self.slot_index(key).ok_or_else(|| WorkflowError::UnknownSlot(key.to_owned()))
    }

    fn all_filled(&self) -> bool {
        self.slots.iter().all(UploadSlot::is_filled)
    }
}
