//! Repository layer for durable board state.
//!
//! # Responsibility
//! - Define the storage contract the persistence gateway depends on.
//! - Isolate SQLite details from board orchestration.

pub mod blob_repo;
