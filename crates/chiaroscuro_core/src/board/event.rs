//! Change notifications for the rendering host.

use crate::model::note::NoteId;
use crate::model::section::SectionId;

/// One observable change, queued by the controller and drained by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum BoardEvent {
    NoteCreated(NoteId),
    NoteMoved(NoteId),
    NoteTextChanged(NoteId),
    AnchorMoved(NoteId),
    NoteRemoved(NoteId),
    SectionCreated(SectionId),
    SectionMoved(SectionId),
    SectionRelabeled(SectionId),
    SectionRemoved(SectionId),
    FocusChanged {
        previous: Option<NoteId>,
        current: Option<NoteId>,
    },
    /// The host should open the label dialog pre-filled with `initial`.
    LabelPromptOpened { initial: String },
    LabelPromptClosed,
    /// All entities were replaced (load, import, clear); re-render everything.
    BoardReset,
    Saved,
    /// User-facing error message.
    ErrorReported(String),
}
