//! Search: literal substring search over the buffer.
//!
//! `/pattern` and `n` search forward, `?pattern` and `N` search backward.
//! Patterns are plain text, not regular expressions. Neither direction
//! wraps around the ends of the buffer: running off the end is a
//! not-found.
//!
//! The last submitted pattern is kept in [`SearchState`] so `n`/`N` can
//! repeat it.

use crate::buffer::Buffer;
use crate::position::Position;

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// Search direction.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SearchDirection {
    Forward,
    Backward,
}

impl SearchDirection {
    /// The command-line prefix for this direction.
    #[must_use]
    pub const fn prefix(self) -> char {
        match self {
            Self::Forward => '/',
            Self::Backward => '?',
        }
    }
}

// ---------------------------------------------------------------------------
// SearchState
// ---------------------------------------------------------------------------

/// The last search pattern, shared by `n` and `N`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    pattern: Option<String>,
}

impl SearchState {
    #[must_use]
    pub const fn new() -> Self {
        Self { pattern: None }
    }

    /// Remember `pattern` for later `n`/`N`.
    pub fn set_pattern(&mut self, pattern: impl Into<String>) {
        self.pattern = Some(pattern.into());
    }

    /// The last pattern, if any search has been made.
    #[inline]
    #[must_use]
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }
}

// ---------------------------------------------------------------------------
// Search functions
// ---------------------------------------------------------------------------

/// First match of `pattern` at or after `from`, scanning to the end of the
/// buffer. Lines after `from.line` are scanned from column 0.
///
/// To skip the match under the cursor, pass `(line, col + 1)`.
#[must_use]
pub fn find_forward(buf: &Buffer, pattern: &str, from: Position) -> Option<Position> {
    if pattern.is_empty() {
        return None;
    }

    (from.line..buf.line_count()).find_map(|line_idx| {
        let start_col = if line_idx == from.line { from.col } else { 0 };
        let content = buf.line(line_idx)?;
        match_starts(&content, pattern)
            .find(|&col| col >= start_col)
            .map(|col| Position::new(line_idx, col))
    })
}

/// Last match of `pattern` that starts strictly before `from`, scanning back
/// to the top of the buffer. On `from.line` only matches starting before
/// `from.col` count; earlier lines are searched in full.
#[must_use]
pub fn find_backward(buf: &Buffer, pattern: &str, from: Position) -> Option<Position> {
    if pattern.is_empty() || from.line >= buf.line_count() {
        return None;
    }

    (0..=from.line).rev().find_map(|line_idx| {
        let content = buf.line(line_idx)?;
        let limit = if line_idx == from.line { from.col } else { usize::MAX };
        match_starts(&content, pattern)
            .take_while(|&col| col < limit)
            .last()
            .map(|col| Position::new(line_idx, col))
    })
}

/// Find a match in the given direction.
#[must_use]
pub fn find(
    buf: &Buffer,
    pattern: &str,
    from: Position,
    direction: SearchDirection,
) -> Option<Position> {
    match direction {
        SearchDirection::Forward => find_forward(buf, pattern, from),
        SearchDirection::Backward => find_backward(buf, pattern, from),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Char columns where `pattern` starts in `line`, in ascending order.
/// Overlapping matches are all reported.
fn match_starts<'a>(line: &'a str, pattern: &'a str) -> impl Iterator<Item = usize> + 'a {
    line.char_indices()
        .enumerate()
        .filter(move |(_, (byte, _))| line[*byte..].starts_with(pattern))
        .map(|(col, _)| col)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
