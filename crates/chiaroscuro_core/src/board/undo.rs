//! Bounded undo history of deletions.
//!
//! # Invariants
//! - Holds at most `depth` records; the oldest record is evicted first.
//! - Only deletions are recorded; undo re-creates, it never redoes.

use super::store::EntityStore;
use crate::model::note::{Note, NoteId};
use crate::model::section::{Section, SectionId};
use chrono::Utc;
use std::collections::VecDeque;

/// Entity captured at deletion time.
#[derive(Debug, Clone, PartialEq)]
pub enum DeletedEntity {
    Note(Note),
    Section(Section),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeletionRecord {
    pub entity: DeletedEntity,
    /// Unix epoch milliseconds.
    pub deleted_at_ms: i64,
}

/// Entity re-created by [`UndoBuffer::undo_last`], with its new id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Restored {
    Note(NoteId),
    Section(SectionId),
}

#[derive(Debug, Clone)]
pub struct UndoBuffer {
    records: VecDeque<DeletionRecord>,
    depth: usize,
}

impl UndoBuffer {
    /// Creates a buffer keeping at most `depth` deletions (minimum one).
    pub fn new(depth: usize) -> Self {
        let depth = depth.max(1);
        Self {
            records: VecDeque::with_capacity(depth),
            depth,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Most recent deletion, if any.
    pub fn peek(&self) -> Option<&DeletionRecord> {
        self.records.back()
    }

    /// Pushes a timestamped copy of a deleted entity.
    pub fn record_deletion(&mut self, entity: DeletedEntity) {
        self.record_deletion_at(entity, Utc::now().timestamp_millis());
    }

    pub fn record_deletion_at(&mut self, entity: DeletedEntity, deleted_at_ms: i64) {
        if self.records.len() == self.depth {
            self.records.pop_front();
        }
        self.records.push_back(DeletionRecord {
            entity,
            deleted_at_ms,
        });
    }

    /// Re-creates the most recent deletion in `store`.
    ///
    /// Text/label, position, anchor offset and section offset are restored
    /// exactly; ids are freshly generated. Returns `None` when empty.
    pub fn undo_last(&mut self, store: &mut EntityStore) -> Option<Restored> {
        let record = self.records.pop_back()?;
        let restored = match record.entity {
            DeletedEntity::Note(note) => {
                let id = store.add_note(note.column(), note.position()).id();
                store.update_note_text(id, note.text());
                store.update_anchor_offset(id, note.anchor_offset());
                Restored::Note(id)
            }
            DeletedEntity::Section(section) => {
                Restored::Section(store.add_section(section.offset(), section.label()).id())
            }
        };
        Some(restored)
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::{DeletedEntity, Restored, UndoBuffer};
    use crate::board::store::EntityStore;
    use crate::model::note::{Column, Position};

    #[test]
    fn undo_on_empty_buffer_is_no_op() {
        let mut store = EntityStore::new();
        let mut undo = UndoBuffer::new(3);
        assert_eq!(undo.undo_last(&mut store), None);
        assert!(store.is_empty());
    }

    #[test]
    fn undo_restores_only_the_latest_deletion() {
        let mut store = EntityStore::new();
        let mut undo = UndoBuffer::new(10);
        let a = store.add_note(Column::Plot, Position::new(1.0, 2.0)).id();
        let b = store.add_note(Column::Subtext, Position::new(3.0, 4.0)).id();
        store.update_note_text(b, "second");
        store.update_anchor_offset(b, 90.0);

        let removed_a = store.remove_note(a).unwrap();
        undo.record_deletion(DeletedEntity::Note(removed_a));
        let removed_b = store.remove_note(b).unwrap();
        undo.record_deletion(DeletedEntity::Note(removed_b));

        let Some(Restored::Note(id)) = undo.undo_last(&mut store) else {
            panic!("expected a restored note");
        };
        assert_eq!(store.notes().len(), 1);
        let note = store.note(id).unwrap();
        assert_eq!(note.text(), "second");
        assert_eq!(note.column(), Column::Subtext);
        assert_eq!(note.position(), Position::new(3.0, 4.0));
        assert_eq!(note.anchor_offset(), 90.0);
        assert_eq!(undo.len(), 1);
    }

    #[test]
    fn depth_evicts_oldest_records() {
        let mut store = EntityStore::new();
        let mut undo = UndoBuffer::new(2);
        for label in ["one", "two", "three"] {
            let id = store.add_section(5.0, label).id();
            let removed = store.remove_section(id).unwrap();
            undo.record_deletion_at(DeletedEntity::Section(removed), 1);
        }
        assert_eq!(undo.len(), 2);

        undo.undo_last(&mut store);
        undo.undo_last(&mut store);
        assert_eq!(undo.undo_last(&mut store), None);
        let labels: Vec<_> = store.sections().iter().map(|s| s.label()).collect();
        assert_eq!(labels, vec!["three", "two"]);
    }
}
