//! Connector geometry and board-frame hit regions.
//!
//! Board frame: x grows to the right from the plot column's left edge, y
//! grows downward from the shared top of both columns and the divider, so a
//! column-local y is also a divider-local y.

use crate::config::LayoutConfig;
use crate::model::clamp_offset;
use crate::model::note::{Column, LineId, Note, NoteId, Position};

/// Horizontal segment drawn at the anchor's height between the anchor and
/// the note's attachment point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connector {
    pub note_id: NoteId,
    pub line_id: LineId,
    /// Left end, board frame.
    pub start_x: f64,
    /// Board-frame y; equals the anchor offset.
    pub y: f64,
    pub length: f64,
}

/// Where a board-frame point landed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Region {
    Column { column: Column, local: Position },
    /// Divider hit, with the divider-local y.
    Divider { offset: f64 },
}

/// Classifies a board-frame point into a column (with local coordinates) or
/// the divider.
pub fn locate(point: Position, layout: &LayoutConfig) -> Region {
    let divider_left = layout.plot_width;
    let divider_right = divider_left + layout.divider_width;
    if point.x < divider_left {
        Region::Column {
            column: Column::Plot,
            local: point,
        }
    } else if point.x < divider_right {
        Region::Divider {
            offset: divider_offset(point),
        }
    } else {
        Region::Column {
            column: Column::Subtext,
            local: Position::new(point.x - divider_right, point.y),
        }
    }
}

/// Divider-local anchor Y for a pointer position, floored at the divider top.
pub fn divider_offset(point: Position) -> f64 {
    clamp_offset(point.y)
}

/// Board-frame x of a column's left edge.
pub fn column_origin_x(column: Column, layout: &LayoutConfig) -> f64 {
    match column {
        Column::Plot => 0.0,
        Column::Subtext => layout.plot_width + layout.divider_width,
    }
}

/// Board-frame x of an anchor: the divider edge facing the note's column.
pub fn anchor_x(column: Column, layout: &LayoutConfig) -> f64 {
    match column {
        Column::Plot => layout.plot_width,
        Column::Subtext => layout.plot_width + layout.divider_width,
    }
}

/// Rendered note height for `text`, from wrapped line count.
pub fn note_height(text: &str, layout: &LayoutConfig) -> f64 {
    let per_line = layout.chars_per_line.max(1);
    let wrapped: usize = text
        .split('\n')
        .map(|line| line.chars().count().div_ceil(per_line).max(1))
        .sum();
    let rows = wrapped.max(layout.min_lines);
    rows as f64 * layout.line_height + 2.0 * layout.note_padding
}

/// Divider-local y of the note's trailing (bottom) edge, floored at zero.
pub fn trailing_edge_offset(note: &Note, layout: &LayoutConfig) -> f64 {
    trailing_edge_at(note.position(), note.text(), layout)
}

/// Same as [`trailing_edge_offset`] for a prospective position.
pub fn trailing_edge_at(position: Position, text: &str, layout: &LayoutConfig) -> f64 {
    clamp_offset(position.y + note_height(text, layout))
}

/// Computes the connector for `note` from its current placement.
pub fn connector_for(note: &Note, layout: &LayoutConfig) -> Connector {
    let anchor = anchor_x(note.column(), layout);
    let attachment = column_origin_x(note.column(), layout) + note.position().x;
    Connector {
        note_id: note.id(),
        line_id: note.line_id(),
        start_x: anchor.min(attachment),
        y: note.anchor_offset(),
        length: (anchor - attachment).abs(),
    }
}
