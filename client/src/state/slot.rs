#[cfg(test)]
#[path = "slot_test.rs"]
mod slot_test;

/// Which transform page the workflow drives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransformKind {
    /// One photo, optional prompt.
    #[default]
    Single,
    /// A car photo plus a wheel reference photo.
    WheelSwap,
}

/// A named upload target and the form field it is posted as.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotSpec {
    pub key: &'static str,
    pub field: &'static str,
}

const SINGLE_SLOTS: &[SlotSpec] = &[SlotSpec { key: "image", field: "image" }];

const WHEEL_SWAP_SLOTS: &[SlotSpec] =
    &[SlotSpec { key: "car", field: "carImage" }, SlotSpec { key: "wheelz", field: "wheelzImage" }];

impl TransformKind {
    /// Required slots, in the order their images are sent.
    #[must_use]
    pub fn slots(self) -> &'static [SlotSpec] {
        match self {
            Self::Single => SINGLE_SLOTS,
            Self::WheelSwap => WHEEL_SWAP_SLOTS,
        }
    }

    #[must_use]
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::Single => "/api/transform",
            Self::WheelSwap => "/api/transform/wheelz",
        }
    }

    /// Whether the endpoint accepts a caller prompt.
    #[must_use]
    pub fn accepts_prompt(self) -> bool {
        matches!(self, Self::Single)
    }
}

/// A file picked by the user, read into memory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Upload state for one slot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UploadSlot {
    pub file: Option<SelectedFile>,
    /// `data:` URI of the selected file for immediate display.
    pub preview: Option<String>,
    pub file_name: Option<String>,
    pub drag_active: bool,
}

impl UploadSlot {
    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.file.is_some()
    }

    pub fn fill(&mut self, file: SelectedFile, preview: String) {
        self.file_name = Some(file.name.clone());
        self.preview = Some(preview);
        self.file = Some(file);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
