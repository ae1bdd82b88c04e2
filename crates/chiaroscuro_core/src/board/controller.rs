//! Interaction controller: the board's single state machine.
//!
//! # Responsibility
//! - Translate host gestures into entity store mutations.
//! - Track the active drag target, the focused note and the label prompt.
//! - Trigger snapshot saves and queue change notifications for the host.
//!
//! # Invariants
//! - Exactly one [`Mode`] at a time; drags and the label prompt are modal.
//! - At most one note is focused.
//! - Offsets are floored at zero on every pointer step.
//! - Storage and document failures surface as `ErrorReported`, never panics.

use super::event::BoardEvent;
use super::geometry::{self, Connector, Region};
use super::label::{LabelOutcome, LabelRequest};
use super::store::EntityStore;
use super::undo::{DeletedEntity, Restored, UndoBuffer};
use crate::config::BoardConfig;
use crate::model::note::{Note, NoteId, Position};
use crate::model::section::{Section, SectionId};
use crate::repo::blob_repo::BlobStore;
use crate::service::persistence::{ExportFile, PersistError, PersistenceGateway};
use log::{debug, info, warn};
use std::time::{Duration, Instant};

/// Prompt shown to the host before wiping the board.
pub const CLEAR_CONFIRMATION: &str =
    "Are you sure you want to clear all content? This cannot be undone.";

/// Controller state. Each drag variant remembers the last pointer position
/// so motion is applied as a delta.
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Idle,
    DraggingAnchor { note_id: NoteId, last: Position },
    DraggingNote { note_id: NoteId, last: Position },
    DraggingSection { section_id: SectionId, last: Position },
    EditingLabel(LabelRequest),
}

impl Mode {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(
            self,
            Self::DraggingAnchor { .. } | Self::DraggingNote { .. } | Self::DraggingSection { .. }
        )
    }
}

/// Part of a note that received a press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotePart {
    /// Frame of the note; starts a drag.
    Body,
    /// Text field; only focuses.
    TextField,
}

/// Global keyboard commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    DeleteFocused,
    UndoLastDeletion,
}

/// Render-ready view of one note.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteView<'a> {
    pub note: &'a Note,
    pub connector: Connector,
    pub height: f64,
    pub active: bool,
}

/// Deterministic projection of the whole board for the host to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardProjection<'a> {
    pub notes: Vec<NoteView<'a>>,
    pub sections: &'a [Section],
    pub label_prompt: Option<&'a LabelRequest>,
}

/// Fixed-interval autosave clock driven by host ticks.
#[derive(Debug, Clone)]
struct AutosaveTimer {
    interval: Duration,
    last_fired: Option<Instant>,
}

impl AutosaveTimer {
    fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fired: None,
        }
    }

    /// First tick arms the timer; later ticks fire once per elapsed interval.
    fn poll(&mut self, now: Instant) -> bool {
        match self.last_fired {
            None => {
                self.last_fired = Some(now);
                false
            }
            Some(last) if now.saturating_duration_since(last) >= self.interval => {
                self.last_fired = Some(now);
                true
            }
            Some(_) => false,
        }
    }
}

/// Owns the board state and turns gestures into mutations.
///
/// Every mutation queues a [`BoardEvent`]; hosts must call
/// [`Self::drain_events`] regularly or the queue keeps growing.
pub struct InteractionController<S: BlobStore> {
    config: BoardConfig,
    store: EntityStore,
    undo: UndoBuffer,
    persistence: PersistenceGateway<S>,
    mode: Mode,
    focused: Option<NoteId>,
    autosave: AutosaveTimer,
    events: Vec<BoardEvent>,
}

impl<S: BlobStore> InteractionController<S> {
    /// Creates a controller over an empty board. Call [`Self::load`] to
    /// restore the durable snapshot.
    pub fn new(blobs: S, config: BoardConfig) -> Self {
        let persistence = PersistenceGateway::new(blobs, config.storage_key.clone());
        Self {
            undo: UndoBuffer::new(config.undo_depth),
            autosave: AutosaveTimer::new(config.autosave_interval()),
            store: EntityStore::new(),
            persistence,
            mode: Mode::Idle,
            focused: None,
            events: Vec::new(),
            config,
        }
    }

    /// Creates a controller and restores the durable snapshot, if any.
    /// A malformed snapshot is reported and the board starts empty.
    pub fn open(blobs: S, config: BoardConfig) -> Self {
        let mut controller = Self::new(blobs, config);
        if controller.load().is_err() {
            debug!("event=board_open module=board status=empty reason=load_failed");
        }
        controller
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn undo_buffer(&self) -> &UndoBuffer {
        &self.undo
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn focused_note(&self) -> Option<NoteId> {
        self.focused
    }

    /// Takes all queued change notifications.
    ///
    /// The queue is unbounded; hosts drain it after every batch of input.
    pub fn drain_events(&mut self) -> Vec<BoardEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn connector(&self, note_id: NoteId) -> Option<Connector> {
        self.store
            .note(note_id)
            .map(|note| geometry::connector_for(note, &self.config.layout))
    }

    pub fn projection(&self) -> BoardProjection<'_> {
        let layout = &self.config.layout;
        let notes = self
            .store
            .notes()
            .iter()
            .map(|note| NoteView {
                note,
                connector: geometry::connector_for(note, layout),
                height: geometry::note_height(note.text(), layout),
                active: self.focused == Some(note.id()),
            })
            .collect();
        let label_prompt = match &self.mode {
            Mode::EditingLabel(request) => Some(request),
            _ => None,
        };
        BoardProjection {
            notes,
            sections: self.store.sections(),
            label_prompt,
        }
    }

    /// Double activation on a column background creates a focused note at
    /// the pointer. Ignored unless idle or when the point is on the divider.
    pub fn double_activate_column(&mut self, point: Position) -> Option<NoteId> {
        if !self.mode.is_idle() {
            debug!("event=note_create module=board status=skip reason=modal");
            return None;
        }
        if !point.is_finite() {
            debug!("event=note_create module=board status=skip reason=non_finite_point");
            return None;
        }
        let Region::Column { column, local } = geometry::locate(point, &self.config.layout)
        else {
            return None;
        };
        let id = self.store.add_note(column, local).id();
        debug!(
            "event=note_create module=board status=ok column={}",
            column.as_str()
        );
        self.events.push(BoardEvent::NoteCreated(id));
        self.set_focus(Some(id));
        Some(id)
    }

    /// Single activation on the divider opens the label prompt for a new
    /// section at the pointer's divider-local y.
    pub fn activate_divider(&mut self, point: Position) -> bool {
        if !self.mode.is_idle() || !point.is_finite() {
            return false;
        }
        self.open_label_prompt(LabelRequest::create(geometry::divider_offset(point)));
        true
    }

    /// Double activation on a section label opens the rename prompt.
    pub fn double_activate_section(&mut self, section_id: SectionId) -> bool {
        if !self.mode.is_idle() {
            return false;
        }
        let Some(section) = self.store.section(section_id) else {
            return false;
        };
        let request = LabelRequest::rename(section);
        self.open_label_prompt(request);
        true
    }

    /// Confirms the label prompt with the user's input.
    pub fn confirm_label(&mut self, input: &str) -> Option<SectionId> {
        if !matches!(self.mode, Mode::EditingLabel(_)) {
            return None;
        }
        let Mode::EditingLabel(request) = std::mem::replace(&mut self.mode, Mode::Idle) else {
            return None;
        };
        self.events.push(BoardEvent::LabelPromptClosed);
        let outcome = request.confirm(input, &mut self.store)?;
        let id = match outcome {
            LabelOutcome::Created(id) => {
                debug!("event=section_create module=board status=ok");
                self.events.push(BoardEvent::SectionCreated(id));
                id
            }
            LabelOutcome::Renamed(id) => {
                debug!("event=section_rename module=board status=ok");
                self.events.push(BoardEvent::SectionRelabeled(id));
                id
            }
        };
        self.save();
        Some(id)
    }

    /// Dismisses the label prompt; a pending creation is discarded.
    pub fn cancel_label(&mut self) {
        if matches!(self.mode, Mode::EditingLabel(_)) {
            self.mode = Mode::Idle;
            self.events.push(BoardEvent::LabelPromptClosed);
        }
    }

    /// Marks `note_id` as the active note (e.g. its text field got focus).
    pub fn focus_note(&mut self, note_id: NoteId) -> bool {
        if self.store.note(note_id).is_none() {
            return false;
        }
        self.set_focus(Some(note_id));
        true
    }

    /// Replaces a note's text; its height, and therefore its connector,
    /// may change.
    pub fn edit_note_text(&mut self, note_id: NoteId, text: impl Into<String>) -> bool {
        if !self.store.update_note_text(note_id, text) {
            return false;
        }
        self.events.push(BoardEvent::NoteTextChanged(note_id));
        true
    }

    /// Press on an anchor: focuses its note and starts an anchor drag.
    pub fn press_anchor(&mut self, note_id: NoteId, point: Position) -> bool {
        if !self.mode.is_idle() || !point.is_finite() || self.store.note(note_id).is_none() {
            return false;
        }
        self.set_focus(Some(note_id));
        self.mode = Mode::DraggingAnchor {
            note_id,
            last: point,
        };
        true
    }

    /// Press on a note: always focuses it, starts a drag only on the body.
    pub fn press_note(&mut self, note_id: NoteId, point: Position, part: NotePart) -> bool {
        if !self.mode.is_idle() || !point.is_finite() || self.store.note(note_id).is_none() {
            return false;
        }
        self.set_focus(Some(note_id));
        if part == NotePart::Body {
            self.mode = Mode::DraggingNote {
                note_id,
                last: point,
            };
        }
        true
    }

    /// Press on a section body starts a vertical section drag.
    pub fn press_section(&mut self, section_id: SectionId, point: Position) -> bool {
        if !self.mode.is_idle() || !point.is_finite() || self.store.section(section_id).is_none()
        {
            return false;
        }
        self.mode = Mode::DraggingSection {
            section_id,
            last: point,
        };
        true
    }

    /// Applies pointer motion to the active drag target, if any. Non-finite
    /// samples are dropped and the drag continues from the last good one.
    pub fn pointer_move(&mut self, point: Position) {
        if !point.is_finite() {
            debug!("event=pointer_move module=board status=skip reason=non_finite_point");
            return;
        }
        let (dx, dy) = match &mut self.mode {
            Mode::DraggingAnchor { last, .. }
            | Mode::DraggingNote { last, .. }
            | Mode::DraggingSection { last, .. } => {
                let delta = (point.x - last.x, point.y - last.y);
                *last = point;
                delta
            }
            Mode::Idle | Mode::EditingLabel(_) => return,
        };

        match self.mode.clone() {
            Mode::DraggingAnchor { note_id, .. } => self.drag_anchor(note_id, dy),
            Mode::DraggingNote { note_id, .. } => self.drag_note(note_id, dx, dy),
            Mode::DraggingSection { section_id, .. } => self.drag_section(section_id, dy),
            Mode::Idle | Mode::EditingLabel(_) => {}
        }
    }

    /// Ends any drag and saves a snapshot.
    pub fn pointer_release(&mut self) {
        if !self.mode.is_dragging() {
            return;
        }
        self.mode = Mode::Idle;
        self.save();
    }

    fn drag_anchor(&mut self, note_id: NoteId, dy: f64) {
        let Some(current) = self.store.note(note_id).map(Note::anchor_offset) else {
            return;
        };
        if self.store.update_anchor_offset(note_id, current + dy) {
            self.events.push(BoardEvent::AnchorMoved(note_id));
        }
    }

    fn drag_note(&mut self, note_id: NoteId, dx: f64, dy: f64) {
        let Some(note) = self.store.note(note_id) else {
            return;
        };
        let position = note.position().translated(dx, dy);
        let anchor = geometry::trailing_edge_at(position, note.text(), &self.config.layout);
        if self.store.update_note_position(note_id, position, anchor) {
            self.events.push(BoardEvent::NoteMoved(note_id));
        }
    }

    fn drag_section(&mut self, section_id: SectionId, dy: f64) {
        let Some(current) = self.store.section(section_id).map(Section::offset) else {
            return;
        };
        if self.store.update_section_offset(section_id, current + dy) {
            self.events.push(BoardEvent::SectionMoved(section_id));
        }
    }

    pub fn key_command(&mut self, command: KeyCommand) -> bool {
        match command {
            KeyCommand::DeleteFocused => self.delete_focused(),
            KeyCommand::UndoLastDeletion => self.undo_last_deletion(),
        }
    }

    /// Deletes the focused note, if any.
    pub fn delete_focused(&mut self) -> bool {
        match self.focused {
            Some(note_id) => self.delete_note(note_id),
            None => false,
        }
    }

    /// Secondary activation on a note deletes it.
    pub fn secondary_activate_note(&mut self, note_id: NoteId) -> bool {
        self.delete_note(note_id)
    }

    /// Secondary activation on a section deletes it.
    pub fn secondary_activate_section(&mut self, section_id: SectionId) -> bool {
        if !self.mode.is_idle() {
            return false;
        }
        let Some(section) = self.store.remove_section(section_id) else {
            return false;
        };
        self.undo.record_deletion(DeletedEntity::Section(section));
        debug!(
            "event=section_delete module=board status=ok undo_len={}",
            self.undo.len()
        );
        self.events.push(BoardEvent::SectionRemoved(section_id));
        self.save();
        true
    }

    fn delete_note(&mut self, note_id: NoteId) -> bool {
        if !self.mode.is_idle() {
            return false;
        }
        let Some(note) = self.store.remove_note(note_id) else {
            return false;
        };
        self.undo.record_deletion(DeletedEntity::Note(note));
        debug!(
            "event=note_delete module=board status=ok undo_len={}",
            self.undo.len()
        );
        self.events.push(BoardEvent::NoteRemoved(note_id));
        if self.focused == Some(note_id) {
            self.set_focus(None);
        }
        self.save();
        true
    }

    /// Re-creates the most recently deleted note or section.
    pub fn undo_last_deletion(&mut self) -> bool {
        if !self.mode.is_idle() {
            return false;
        }
        let Some(restored) = self.undo.undo_last(&mut self.store) else {
            return false;
        };
        match restored {
            Restored::Note(id) => self.events.push(BoardEvent::NoteCreated(id)),
            Restored::Section(id) => self.events.push(BoardEvent::SectionCreated(id)),
        }
        debug!(
            "event=undo_delete module=board status=ok undo_len={}",
            self.undo.len()
        );
        true
    }

    /// Writes a snapshot to durable storage. Failures are reported.
    pub fn save(&mut self) -> bool {
        match self.persistence.save(&self.store) {
            Ok(()) => {
                self.events.push(BoardEvent::Saved);
                true
            }
            Err(err) => {
                self.report("Error saving board", &err);
                false
            }
        }
    }

    /// Host timer hook; saves once per configured autosave interval.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.autosave.poll(now) {
            self.save()
        } else {
            false
        }
    }

    /// Restores the durable snapshot. Absence keeps the current (empty)
    /// board; a malformed snapshot is reported and leaves state unchanged.
    pub fn load(&mut self) -> Result<bool, PersistError> {
        match self.persistence.load(&mut self.store) {
            Ok(loaded) => {
                if loaded {
                    self.reset_transient_state();
                }
                Ok(loaded)
            }
            Err(err) => {
                self.report("Error loading board", &err);
                Err(err)
            }
        }
    }

    /// Saves, then produces the exchange document for download.
    pub fn export_document(&mut self) -> Result<ExportFile, PersistError> {
        let result = self.persistence.export(&self.store);
        if let Err(err) = &result {
            self.report("Error exporting data", err);
        }
        result
    }

    /// Replaces the board with an imported exchange document.
    pub fn import_document(&mut self, text: &str) -> Result<(), PersistError> {
        match self.persistence.import(&mut self.store, text) {
            Ok(()) => {
                self.reset_transient_state();
                Ok(())
            }
            Err(err) => {
                self.report("Error importing data", &err);
                Err(err)
            }
        }
    }

    /// Wipes every entity and the durable blob after host confirmation.
    /// The undo history is kept.
    pub fn clear_all(&mut self, confirm: impl FnOnce(&str) -> bool) -> bool {
        if !confirm(CLEAR_CONFIRMATION) {
            return false;
        }
        if let Err(err) = self.persistence.clear() {
            self.report("Error clearing board", &err);
            return false;
        }
        self.store.clear();
        self.reset_transient_state();
        info!("event=board_clear module=board status=ok");
        true
    }

    fn open_label_prompt(&mut self, request: LabelRequest) {
        self.events.push(BoardEvent::LabelPromptOpened {
            initial: request.initial().to_string(),
        });
        self.mode = Mode::EditingLabel(request);
    }

    fn set_focus(&mut self, current: Option<NoteId>) {
        let previous = self.focused;
        if previous == current {
            return;
        }
        self.focused = current;
        self.events
            .push(BoardEvent::FocusChanged { previous, current });
    }

    fn reset_transient_state(&mut self) {
        if let Mode::EditingLabel(_) = self.mode {
            self.events.push(BoardEvent::LabelPromptClosed);
        }
        self.mode = Mode::Idle;
        self.set_focus(None);
        self.events.push(BoardEvent::BoardReset);
    }

    fn report(&mut self, context: &str, err: &PersistError) {
        warn!("event=board_error module=board status=error context={context} error={err}");
        self.events
            .push(BoardEvent::ErrorReported(format!("{context}: {err}")));
    }
}
