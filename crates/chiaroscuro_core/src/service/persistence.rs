//! Persistence gateway between the entity store and durable storage.
//!
//! # Responsibility
//! - Snapshot the entity store into a [`Document`] and restore it back.
//! - Save/load the snapshot as a named durable blob.
//! - Export/import the exchange document format.
//!
//! # Invariants
//! - Only semantic fields round-trip; ids and connectors are re-derived.
//! - A rejected document never touches the entity store.
//! - An absent blob loads as an empty board, not an error.

use crate::board::store::EntityStore;
use crate::model::document::{Document, DocumentError, ExchangeDocument, NoteRecord, SectionRecord};
use crate::repo::blob_repo::{BlobError, BlobStore};
use chrono::{DateTime, SecondsFormat, Utc};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

#[derive(Debug)]
pub enum PersistError {
    Document(DocumentError),
    Blob(BlobError),
}

impl Display for PersistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Document(err) => write!(f, "{err}"),
            Self::Blob(err) => write!(f, "board storage failed: {err}"),
        }
    }
}

impl Error for PersistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Document(err) => Some(err),
            Self::Blob(err) => Some(err),
        }
    }
}

impl From<DocumentError> for PersistError {
    fn from(value: DocumentError) -> Self {
        Self::Document(value)
    }
}

impl From<BlobError> for PersistError {
    fn from(value: BlobError) -> Self {
        Self::Blob(value)
    }
}

/// Export payload ready to hand to a download/file-save collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportFile {
    /// Suggested file name, `chiaroscuro-export-YYYY-MM-DD.json`.
    pub file_name: String,
    /// Pretty-printed JSON of `document`.
    pub contents: String,
    pub document: ExchangeDocument,
}

/// Captures every note and section in store order.
pub fn snapshot(store: &EntityStore) -> Document {
    Document {
        notes: store.notes().iter().map(NoteRecord::from).collect(),
        sections: store.sections().iter().map(SectionRecord::from).collect(),
    }
}

/// Replaces the store contents with the entities described by `doc`.
pub fn restore(store: &mut EntityStore, doc: &Document) {
    store.clear();
    for record in &doc.notes {
        let id = store.add_note(record.column, record.position).id();
        store.update_note_text(id, record.text.as_str());
        store.update_anchor_offset(id, record.anchor_offset);
    }
    for record in &doc.sections {
        store.add_section(record.offset, &record.label);
    }
}

/// Durable snapshot storage keyed by a single blob name.
pub struct PersistenceGateway<S: BlobStore> {
    blobs: S,
    key: String,
}

impl<S: BlobStore> PersistenceGateway<S> {
    pub fn new(blobs: S, key: impl Into<String>) -> Self {
        Self {
            blobs,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Writes the current snapshot to the durable blob.
    pub fn save(&self, store: &EntityStore) -> Result<(), PersistError> {
        let started_at = Instant::now();
        let doc = snapshot(store);
        self.blobs.save_blob(&self.key, &doc.to_json()?)?;
        info!(
            "event=board_save module=persistence status=ok notes={} sections={} duration_ms={}",
            doc.notes.len(),
            doc.sections.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }

    /// Restores the store from the durable blob.
    ///
    /// Returns `Ok(false)` and leaves the store untouched when no blob exists.
    ///
    /// # Errors
    /// - `Document` when the stored payload is malformed; the store is unchanged.
    /// - `Blob` on storage failure.
    pub fn load(&self, store: &mut EntityStore) -> Result<bool, PersistError> {
        let Some(payload) = self.blobs.load_blob(&self.key)? else {
            info!("event=board_load module=persistence status=skip reason=no_blob");
            return Ok(false);
        };
        let doc = Document::from_json(&payload).map_err(|err| {
            warn!("event=board_load module=persistence status=error error={err}");
            err
        })?;
        restore(store, &doc);
        info!(
            "event=board_load module=persistence status=ok notes={} sections={}",
            doc.notes.len(),
            doc.sections.len()
        );
        Ok(true)
    }

    /// Saves, then builds an exchange document stamped with the current time.
    pub fn export(&self, store: &EntityStore) -> Result<ExportFile, PersistError> {
        self.save(store)?;
        self.export_at(store, Utc::now())
    }

    /// Builds an exchange document stamped with `now`. Does not save.
    pub fn export_at(
        &self,
        store: &EntityStore,
        now: DateTime<Utc>,
    ) -> Result<ExportFile, PersistError> {
        let document = ExchangeDocument::new(
            snapshot(store),
            now.to_rfc3339_opts(SecondsFormat::Millis, true),
        );
        let contents = document.to_json_pretty()?;
        info!(
            "event=board_export module=persistence status=ok notes={} sections={}",
            document.notes.len(),
            document.sections.len()
        );
        Ok(ExportFile {
            file_name: format!("chiaroscuro-export-{}.json", now.format("%Y-%m-%d")),
            contents,
            document,
        })
    }

    /// Validates an exchange document, stores it, then restores from it.
    ///
    /// # Errors
    /// - `Document` when `notes`/`sections` is missing or the JSON is
    ///   malformed; neither the store nor the blob is touched.
    /// - `Blob` when the accepted document cannot be stored; the store is
    ///   left unchanged.
    pub fn import(&self, store: &mut EntityStore, text: &str) -> Result<(), PersistError> {
        let doc = Document::from_json(text).map_err(|err| {
            warn!("event=board_import module=persistence status=error error={err}");
            err
        })?;
        self.blobs.save_blob(&self.key, &doc.to_json()?)?;
        restore(store, &doc);
        info!(
            "event=board_import module=persistence status=ok notes={} sections={}",
            doc.notes.len(),
            doc.sections.len()
        );
        Ok(())
    }

    /// Deletes the durable blob. Returns whether one existed.
    pub fn clear(&self) -> Result<bool, PersistError> {
        Ok(self.blobs.remove_blob(&self.key)?)
    }
}
