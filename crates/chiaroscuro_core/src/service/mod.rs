//! Use-case services layered over the board and storage.
//!
//! # Responsibility
//! - Orchestrate repository calls into snapshot/export/import use-cases.
//! - Keep the interaction controller decoupled from storage details.

pub mod persistence;
