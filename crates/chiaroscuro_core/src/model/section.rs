//! Section marker model.
//!
//! # Invariants
//! - `offset >= 0` after every write.
//! - `label` is a single trimmed line and never empty; blank input becomes
//!   [`DEFAULT_SECTION_LABEL`].

use super::clamp_offset;
use uuid::Uuid;

/// Stable identifier of a section marker.
pub type SectionId = Uuid;

/// Label stored when the user confirms an empty or whitespace-only name.
pub const DEFAULT_SECTION_LABEL: &str = "Section";

/// Labeled horizontal marker on the divider.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    id: SectionId,
    offset: f64,
    label: String,
}

impl Section {
    pub(crate) fn new(offset: f64, label: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            offset: clamp_offset(offset),
            label: normalize_label(label),
        }
    }

    pub fn id(&self) -> SectionId {
        self.id
    }

    /// Divider-local Y of the marker.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub(crate) fn set_offset(&mut self, offset: f64) {
        self.offset = clamp_offset(offset);
    }

    pub(crate) fn set_label(&mut self, label: &str) {
        self.label = normalize_label(label);
    }
}

/// Normalizes raw label input to its stored form.
///
/// Only the first line is kept, surrounding whitespace is trimmed, and a
/// blank result falls back to [`DEFAULT_SECTION_LABEL`].
pub fn normalize_label(raw: &str) -> String {
    let first_line = raw.lines().next().unwrap_or("").trim();
    if first_line.is_empty() {
        DEFAULT_SECTION_LABEL.to_string()
    } else {
        first_line.to_string()
    }
}
