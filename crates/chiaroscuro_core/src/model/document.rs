//! Board document wire shapes.
//!
//! # Responsibility
//! - Define the `{notes, sections}` snapshot stored in the durable blob.
//! - Define the exchange document (`version` + `timestamp` envelope).
//! - Validate untrusted JSON before it can reach the entity store.
//!
//! # Invariants
//! - Field names are camelCase on write.
//! - Legacy field names (`dotId`, `columnType`, `dotPosition`, `id`, section
//!   `position`) are accepted on read.
//! - Entity ids are informational; they are never required to round-trip.

use super::note::{Column, Note, Position};
use super::section::Section;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Version string written into every exchange document.
pub const EXCHANGE_VERSION: &str = "1.0";

/// Errors raised while decoding or validating a board document.
#[derive(Debug)]
pub enum DocumentError {
    /// Input is not valid JSON or does not match the expected shape.
    Parse(serde_json::Error),
    /// Top-level JSON value is not an object.
    NotAnObject,
    /// Required collection is absent or `null`.
    MissingField(&'static str),
}

impl Display for DocumentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid board document: {err}"),
            Self::NotAnObject => write!(f, "invalid board document: expected a JSON object"),
            Self::MissingField(field) => {
                write!(f, "invalid board document: missing `{field}` collection")
            }
        }
    }
}

impl Error for DocumentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::NotAnObject | Self::MissingField(_) => None,
        }
    }
}

impl From<serde_json::Error> for DocumentError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Persisted form of one note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note_id: Option<String>,
    #[serde(default, alias = "dotId", skip_serializing_if = "Option::is_none")]
    pub anchor_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_id: Option<String>,
    #[serde(alias = "columnType")]
    pub column: Column,
    #[serde(default)]
    pub text: String,
    pub position: Position,
    #[serde(alias = "dotPosition")]
    pub anchor_offset: f64,
}

impl From<&Note> for NoteRecord {
    fn from(note: &Note) -> Self {
        Self {
            note_id: Some(note.id().to_string()),
            anchor_id: Some(note.anchor_id().to_string()),
            line_id: Some(note.line_id().to_string()),
            column: note.column(),
            text: note.text().to_string(),
            position: note.position(),
            anchor_offset: note.anchor_offset(),
        }
    }
}

/// Persisted form of one section marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionRecord {
    #[serde(default, alias = "id", skip_serializing_if = "Option::is_none")]
    pub section_id: Option<String>,
    #[serde(alias = "position")]
    pub offset: f64,
    #[serde(default)]
    pub label: String,
}

impl From<&Section> for SectionRecord {
    fn from(section: &Section) -> Self {
        Self {
            section_id: Some(section.id().to_string()),
            offset: section.offset(),
            label: section.label().to_string(),
        }
    }
}

/// Snapshot of the whole board, as written to the durable blob.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub notes: Vec<NoteRecord>,
    pub sections: Vec<SectionRecord>,
}

impl Document {
    /// Decodes and validates an untrusted board document.
    ///
    /// Extra top-level fields (such as `version`/`timestamp` from an export)
    /// are ignored.
    ///
    /// # Errors
    /// - `NotAnObject` when the top-level value is not a JSON object.
    /// - `MissingField` when `notes` or `sections` is absent or `null`.
    /// - `Parse` on malformed JSON or malformed entity records.
    pub fn from_json(text: &str) -> Result<Self, DocumentError> {
        let value: Value = serde_json::from_str(text)?;
        let object = value.as_object().ok_or(DocumentError::NotAnObject)?;
        for field in ["notes", "sections"] {
            match object.get(field) {
                None | Some(Value::Null) => return Err(DocumentError::MissingField(field)),
                Some(_) => {}
            }
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Encodes this snapshot as compact JSON.
    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Exchange document written by export and accepted by import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeDocument {
    pub notes: Vec<NoteRecord>,
    pub sections: Vec<SectionRecord>,
    pub version: String,
    /// RFC 3339 / ISO-8601 creation time. Informational only.
    pub timestamp: String,
}

impl ExchangeDocument {
    pub fn new(snapshot: Document, timestamp: impl Into<String>) -> Self {
        Self {
            notes: snapshot.notes,
            sections: snapshot.sections,
            version: EXCHANGE_VERSION.to_string(),
            timestamp: timestamp.into(),
        }
    }

    /// Encodes this document as indented JSON for file export.
    pub fn to_json_pretty(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::{Document, DocumentError, ExchangeDocument, EXCHANGE_VERSION};
    use crate::model::note::Column;
    use serde_json::json;

    #[test]
    fn from_json_rejects_missing_sections() {
        let err = Document::from_json(r#"{"notes": []}"#).unwrap_err();
        assert!(matches!(err, DocumentError::MissingField("sections")));
    }

    #[test]
    fn from_json_rejects_null_notes() {
        let err = Document::from_json(r#"{"notes": null, "sections": []}"#).unwrap_err();
        assert!(matches!(err, DocumentError::MissingField("notes")));
    }

    #[test]
    fn from_json_rejects_non_object_payload() {
        let err = Document::from_json("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, DocumentError::NotAnObject));
    }

    #[test]
    fn from_json_accepts_legacy_field_names() {
        let legacy = json!({
            "notes": [{
                "noteId": "note-1700000000000",
                "dotId": "dot-1700000000000",
                "lineId": "line-dot-1700000000000",
                "columnType": "subtext",
                "text": "she lies",
                "position": {"x": 12, "y": 30},
                "dotPosition": 44
            }],
            "sections": [{"id": "section-1", "position": 120, "label": "Act I"}],
            "version": "1.0",
            "timestamp": "2024-03-01T10:00:00.000Z"
        });

        let doc = Document::from_json(&legacy.to_string()).unwrap();
        assert_eq!(doc.notes.len(), 1);
        assert_eq!(doc.notes[0].column, Column::Subtext);
        assert_eq!(doc.notes[0].anchor_offset, 44.0);
        assert_eq!(doc.notes[0].anchor_id.as_deref(), Some("dot-1700000000000"));
        assert_eq!(doc.sections[0].offset, 120.0);
        assert_eq!(doc.sections[0].section_id.as_deref(), Some("section-1"));
    }

    #[test]
    fn exchange_document_carries_version_and_camel_case_fields() {
        let doc = Document::from_json(
            &json!({
                "notes": [{
                    "column": "plot",
                    "text": "",
                    "position": {"x": 1, "y": 2},
                    "anchorOffset": 2
                }],
                "sections": []
            })
            .to_string(),
        )
        .unwrap();

        let exchange = ExchangeDocument::new(doc, "2026-01-01T00:00:00+00:00");
        let value: serde_json::Value =
            serde_json::from_str(&exchange.to_json_pretty().unwrap()).unwrap();
        assert_eq!(value["version"], EXCHANGE_VERSION);
        assert_eq!(value["notes"][0]["anchorOffset"], 2.0);
        assert!(value["notes"][0].get("noteId").is_none());
    }
}
