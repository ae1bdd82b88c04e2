//! Interactive board: entity store, geometry, undo, label prompt and the
//! controller that drives them.
//!
//! # Responsibility
//! - Hold the in-memory board state and its mutation rules.
//! - Expose a gesture-level API to hosts and a render projection back.
//!
//! # Invariants
//! - The entity store is the only state that is persisted.
//! - Everything a host draws is derived from the store plus controller focus.

pub mod controller;
pub mod event;
pub mod geometry;
pub mod label;
pub mod store;
pub mod undo;
