//! Note domain model.
//!
//! # Responsibility
//! - Define the free-text note and its tethered anchor/line identity.
//! - Keep mutation of placement fields inside the crate so the entity store
//!   stays the single writer.
//!
//! # Invariants
//! - `anchor_id` and `line_id` are generated with the note and never change.
//! - `column` never changes after creation.
//! - `anchor_offset >= 0` after every write.

use super::clamp_offset;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a note.
pub type NoteId = Uuid;
/// Stable identifier of the anchor a note is tethered to.
pub type AnchorId = Uuid;
/// Stable identifier of the connector drawn between note and anchor.
pub type LineId = Uuid;

/// Board column a note lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    /// Left column: what happens.
    Plot,
    /// Right column: what it means.
    Subtext,
}

impl Column {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plot => "plot",
            Self::Subtext => "subtext",
        }
    }
}

/// 2D point. Column-local for note positions, board-frame for pointers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both coordinates are finite. Non-finite points cannot be persisted.
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Returns this point moved by `(dx, dy)`.
    pub fn translated(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// A note placed in one column and tethered to an anchor on the divider.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    id: NoteId,
    anchor_id: AnchorId,
    line_id: LineId,
    column: Column,
    text: String,
    position: Position,
    anchor_offset: f64,
}

impl Note {
    /// Creates an empty note whose anchor sits level with `position.y`.
    pub(crate) fn new(column: Column, position: Position) -> Self {
        Self {
            id: Uuid::new_v4(),
            anchor_id: Uuid::new_v4(),
            line_id: Uuid::new_v4(),
            column,
            text: String::new(),
            position,
            anchor_offset: clamp_offset(position.y),
        }
    }

    pub fn id(&self) -> NoteId {
        self.id
    }

    pub fn anchor_id(&self) -> AnchorId {
        self.anchor_id
    }

    pub fn line_id(&self) -> LineId {
        self.line_id
    }

    pub fn column(&self) -> Column {
        self.column
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Column-local top-left corner.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Divider-local Y of the anchor.
    pub fn anchor_offset(&self) -> f64 {
        self.anchor_offset
    }

    pub(crate) fn set_text(&mut self, text: String) {
        self.text = text;
    }

    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub(crate) fn set_anchor_offset(&mut self, offset: f64) {
        self.anchor_offset = clamp_offset(offset);
    }
}

#[cfg(test)]
mod tests {
    use super::{Column, Note, Position};

    #[test]
    fn new_note_anchors_level_with_its_top() {
        let note = Note::new(Column::Plot, Position::new(40.0, 60.0));
        assert_eq!(note.anchor_offset(), 60.0);
        assert!(note.text().is_empty());
        assert_ne!(note.anchor_id(), note.line_id());
        assert_ne!(note.id(), note.anchor_id());
    }

    #[test]
    fn anchor_offset_is_floored_on_every_write() {
        let mut note = Note::new(Column::Subtext, Position::new(0.0, -15.0));
        assert_eq!(note.anchor_offset(), 0.0);

        note.set_anchor_offset(25.0);
        note.set_anchor_offset(-1.0);
        assert_eq!(note.anchor_offset(), 0.0);
    }

    #[test]
    fn column_serializes_in_snake_case() {
        let json = serde_json::to_value(Column::Subtext).unwrap();
        assert_eq!(json, "subtext");
    }
}
