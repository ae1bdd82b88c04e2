//! In-memory entity store.
//!
//! # Responsibility
//! - Own the ordered note and section collections of one board.
//! - Apply every entity mutation; nothing else writes entities.
//!
//! # Invariants
//! - Insertion order is preserved and stable across mutations.
//! - Lookups that miss (stale or already-removed ids) are silent no-ops.
//! - Offsets are floored at zero and labels normalized on every write.

use crate::model::note::{AnchorId, Column, Note, NoteId, Position};
use crate::model::section::{Section, SectionId};

#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    notes: Vec<Note>,
    sections: Vec<Section>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn note(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| note.id() == id)
    }

    /// Resolves the note tethered to `anchor_id`.
    pub fn note_by_anchor(&self, anchor_id: AnchorId) -> Option<&Note> {
        self.notes.iter().find(|note| note.anchor_id() == anchor_id)
    }

    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections.iter().find(|section| section.id() == id)
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty() && self.sections.is_empty()
    }

    /// Creates an empty note at `position` with its anchor level with it.
    pub fn add_note(&mut self, column: Column, position: Position) -> &Note {
        self.notes.push(Note::new(column, position));
        &self.notes[self.notes.len() - 1]
    }

    /// Replaces note text. Returns `false` when the note is unknown.
    pub fn update_note_text(&mut self, id: NoteId, text: impl Into<String>) -> bool {
        match self.note_mut(id) {
            Some(note) => {
                note.set_text(text.into());
                true
            }
            None => false,
        }
    }

    /// Moves a note and its anchor together. A non-finite `position` is
    /// rejected and the note is left where it was.
    pub fn update_note_position(
        &mut self,
        id: NoteId,
        position: Position,
        anchor_offset: f64,
    ) -> bool {
        if !position.is_finite() {
            return false;
        }
        match self.note_mut(id) {
            Some(note) => {
                note.set_position(position);
                note.set_anchor_offset(anchor_offset);
                true
            }
            None => false,
        }
    }

    /// Moves only the anchor; the note stays where it is.
    pub fn update_anchor_offset(&mut self, id: NoteId, offset: f64) -> bool {
        match self.note_mut(id) {
            Some(note) => {
                note.set_anchor_offset(offset);
                true
            }
            None => false,
        }
    }

    pub fn remove_note(&mut self, id: NoteId) -> Option<Note> {
        let index = self.notes.iter().position(|note| note.id() == id)?;
        Some(self.notes.remove(index))
    }

    pub fn add_section(&mut self, offset: f64, label: &str) -> &Section {
        self.sections.push(Section::new(offset, label));
        &self.sections[self.sections.len() - 1]
    }

    pub fn update_section_offset(&mut self, id: SectionId, offset: f64) -> bool {
        match self.section_mut(id) {
            Some(section) => {
                section.set_offset(offset);
                true
            }
            None => false,
        }
    }

    pub fn update_section_label(&mut self, id: SectionId, label: &str) -> bool {
        match self.section_mut(id) {
            Some(section) => {
                section.set_label(label);
                true
            }
            None => false,
        }
    }

    pub fn remove_section(&mut self, id: SectionId) -> Option<Section> {
        let index = self
            .sections
            .iter()
            .position(|section| section.id() == id)?;
        Some(self.sections.remove(index))
    }

    pub fn clear(&mut self) {
        self.notes.clear();
        self.sections.clear();
    }

    fn note_mut(&mut self, id: NoteId) -> Option<&mut Note> {
        self.notes.iter_mut().find(|note| note.id() == id)
    }

    fn section_mut(&mut self, id: SectionId) -> Option<&mut Section> {
        self.sections.iter_mut().find(|section| section.id() == id)
    }
}
