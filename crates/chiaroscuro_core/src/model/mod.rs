//! Board domain model.
//!
//! # Responsibility
//! - Define the semantic entities placed on the board (notes, sections).
//! - Define the wire shapes used by the durable blob and exchange documents.
//!
//! # Invariants
//! - Every entity is identified by a random v4 UUID, never reused.
//! - Divider-local offsets are never negative.
//! - Entities carry no presentation state; connectors are derived.

pub mod document;
pub mod note;
pub mod section;

/// Floors a divider-local offset at zero.
///
/// Non-finite input collapses to `0.0` so a bad pointer reading can never
/// push an anchor or section above the divider top.
pub fn clamp_offset(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
