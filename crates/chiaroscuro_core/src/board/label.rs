//! Section label prompt.
//!
//! A [`LabelRequest`] is the pending state of the modal label dialog. Its
//! purpose is fixed when the prompt opens, so confirming always runs the
//! action the prompt was opened for.

use super::store::EntityStore;
use crate::model::clamp_offset;
use crate::model::section::{Section, SectionId};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LabelPurpose {
    /// Create a new section at the divider-local `offset`.
    Create { offset: f64 },
    /// Rename an existing section.
    Rename { section_id: SectionId },
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelRequest {
    purpose: LabelPurpose,
    initial: String,
}

/// Result of confirming a label request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelOutcome {
    Created(SectionId),
    Renamed(SectionId),
}

impl LabelRequest {
    /// Empty prompt for a prospective section at `offset`.
    pub fn create(offset: f64) -> Self {
        Self {
            purpose: LabelPurpose::Create {
                offset: clamp_offset(offset),
            },
            initial: String::new(),
        }
    }

    /// Prompt pre-filled with the section's current label.
    pub fn rename(section: &Section) -> Self {
        Self {
            purpose: LabelPurpose::Rename {
                section_id: section.id(),
            },
            initial: section.label().to_string(),
        }
    }

    pub fn purpose(&self) -> LabelPurpose {
        self.purpose
    }

    /// Text the dialog should show when it opens.
    pub fn initial(&self) -> &str {
        &self.initial
    }

    /// Applies confirmed `input` to `store`.
    ///
    /// Returns `None` when renaming a section that no longer exists.
    pub fn confirm(self, input: &str, store: &mut EntityStore) -> Option<LabelOutcome> {
        match self.purpose {
            LabelPurpose::Create { offset } => {
                Some(LabelOutcome::Created(store.add_section(offset, input).id()))
            }
            LabelPurpose::Rename { section_id } => store
                .update_section_label(section_id, input)
                .then_some(LabelOutcome::Renamed(section_id)),
        }
    }
}
