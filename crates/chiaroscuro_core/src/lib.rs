//! Core domain logic for the Chiaroscuro plot/subtext annotation board.
//! This crate is the single source of truth for board invariants.

pub mod board;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use board::controller::{
    BoardProjection, InteractionController, KeyCommand, Mode, NotePart, NoteView,
    CLEAR_CONFIRMATION,
};
pub use board::event::BoardEvent;
pub use board::geometry::{Connector, Region};
pub use board::label::{LabelOutcome, LabelPurpose, LabelRequest};
pub use board::store::EntityStore;
pub use board::undo::{DeletedEntity, DeletionRecord, Restored, UndoBuffer};
pub use config::{BoardConfig, ConfigError, LayoutConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::document::{
    Document, DocumentError, ExchangeDocument, NoteRecord, SectionRecord, EXCHANGE_VERSION,
};
pub use model::note::{AnchorId, Column, LineId, Note, NoteId, Position};
pub use model::section::{normalize_label, Section, SectionId, DEFAULT_SECTION_LABEL};
pub use repo::blob_repo::{BlobError, BlobResult, BlobStore, SqliteBlobStore};
pub use service::persistence::{ExportFile, PersistError, PersistenceGateway};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
