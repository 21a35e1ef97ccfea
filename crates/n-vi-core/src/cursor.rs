//! Cursor: position tracking with mode-dependent clamping.
//!
//! The `Cursor` tracks a position in a buffer and a sticky column for
//! vertical movement.
//!
//! # Column bounds
//!
//! Methods take a `past_end: bool` parameter rather than a mode:
//!
//! - **Normal, Visual, Replace**: `past_end = false`, the cursor sits ON a
//!   character, so `col <= max(len - 1, 0)`.
//! - **Insert**: `past_end = true`, the cursor may sit after the last char,
//!   so `col <= len`.
//!
//! The caller decides the limit. The cursor just stays within it.
//!
//! # Sticky column
//!
//! Moving up or down through a short line and back onto a long one snaps
//! the cursor back to the column it started from. Any other movement resets
//! the sticky column to wherever the cursor lands.

use crate::buffer::Buffer;
use crate::position::Position;

/// A cursor in a text buffer.
///
/// Does not own or reference the buffer; the buffer is passed to each
/// method that needs bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pos: Position,
    sticky_col: usize,
}

impl Cursor {
    /// Create a cursor at the origin.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pos: Position::ZERO,
            sticky_col: 0,
        }
    }

    // -- Accessors ----------------------------------------------------------

    /// Current position.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> Position {
        self.pos
    }

    /// Current line (0-indexed).
    #[inline]
    #[must_use]
    pub const fn line(&self) -> usize {
        self.pos.line
    }

    /// The desired column for vertical movement.
    #[inline]
    #[must_use]
    pub const fn sticky_col(&self) -> usize {
        self.sticky_col
    }

    // -- Positioning --------------------------------------------------------

    /// Move to `pos`, clamped to the buffer. Resets the sticky column.
    pub fn set_position(&mut self, pos: Position, buf: &Buffer, past_end: bool) {
        self.pos = clamp(pos, buf, past_end);
        self.sticky_col = self.pos.col;
    }

    /// Move to `pos`, clamped to the buffer, leaving the sticky column alone.
    /// Used by vertical motions.
    pub fn set_position_keep_sticky(&mut self, pos: Position, buf: &Buffer, past_end: bool) {
        self.pos = clamp(pos, buf, past_end);
    }

    /// Re-clamp after the buffer changed under the cursor (or the mode's
    /// column bound tightened).
    pub fn clamp(&mut self, buf: &Buffer, past_end: bool) {
        self.pos = clamp(self.pos, buf, past_end);
    }
}

// ---------------------------------------------------------------------------
// Bounds
// ---------------------------------------------------------------------------

/// The highest column the cursor may occupy on `line`.
///
/// With `past_end` this is the line length; otherwise the index of the last
/// char, or 0 on an empty line.
#[must_use]
pub fn max_col_for_line(buf: &Buffer, line: usize, past_end: bool) -> usize {
    let len = buf.line_len(line);
    if past_end { len } else { len.saturating_sub(1) }
}

/// Clamp a position into the buffer's valid range for the given bound.
#[must_use]
pub fn clamp(pos: Position, buf: &Buffer, past_end: bool) -> Position {
    let line = pos.line.min(buf.line_count().saturating_sub(1));
    let col = pos.col.min(max_col_for_line(buf, line, past_end));
    Position::new(line, col)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
