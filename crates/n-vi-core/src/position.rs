//! Cursor positions and line spans.
//!
//! All coordinates are **0-indexed**. Line 0 is the first line, column 0 is the
//! first character. Columns count Unicode scalar values (chars), not bytes.
//!
//! The status line converts to 1-indexed for the user; that conversion never
//! belongs here.

use std::fmt;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A position in a text buffer: (line, column), both 0-indexed.
///
/// `col` is the char offset from the start of the line, **not** a byte offset.
/// For the line `"café"`, column 3 is `'é'` and column 4 is the
/// cursor-after-last-char position only reachable in insert mode.
///
/// # Ordering
///
/// Positions are ordered lexicographically: line first, then column.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    /// The origin, line 0 column 0.
    pub const ZERO: Self = Self { line: 0, col: 0 };

    /// Create a new position.
    #[inline]
    #[must_use]
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

impl Ord for Position {
    #[inline]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.line
            .cmp(&other.line)
            .then(self.col.cmp(&other.col))
    }
}

impl PartialOrd for Position {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pos({}:{})", self.line, self.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 1-indexed for human display, matching Vim's `line:col` status.
        write!(f, "{}:{}", self.line + 1, self.col + 1)
    }
}

// ---------------------------------------------------------------------------
// LineSpan
// ---------------------------------------------------------------------------

/// An inclusive span of whole lines: `first..=last`.
///
/// Every operator in this editor is line-wise, so selections and ex-command
/// ranges are expressed as line spans rather than character ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineSpan {
    pub first: usize,
    pub last: usize,
}

impl LineSpan {
    /// Build a span from two line numbers in either order.
    #[inline]
    #[must_use]
    pub const fn ordered(a: usize, b: usize) -> Self {
        if a <= b {
            Self { first: a, last: b }
        } else {
            Self { first: b, last: a }
        }
    }

    /// Number of lines covered. Never zero.
    #[inline]
    #[must_use]
    #[allow(clippy::len_without_is_empty)]
    pub const fn len(self) -> usize {
        self.last - self.first + 1
    }

    /// Clamp both ends into `0..line_count`.
    #[must_use]
    pub fn clamped(self, line_count: usize) -> Self {
        let max = line_count.saturating_sub(1);
        Self {
            first: self.first.min(max),
            last: self.last.min(max),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- Position -----------------------------------------------------------

    #[test]
    fn position_zero() {
        assert_eq!(Position::ZERO, Position::new(0, 0));
        assert_eq!(Position::default(), Position::ZERO);
    }

    #[test]
    fn position_ordering_same_line() {
        assert!(Position::new(1, 3) < Position::new(1, 7));
    }

    #[test]
    fn position_ordering_different_lines() {
        assert!(Position::new(0, 100) < Position::new(1, 0));
    }

    #[test]
    fn position_ord_is_consistent() {
        let positions = [
            Position::ZERO,
            Position::new(0, 1),
            Position::new(0, 100),
            Position::new(1, 0),
            Position::new(10, 0),
        ];
        for window in positions.windows(2) {
            assert!(window[0] <= window[1], "{:?} should be <= {:?}", window[0], window[1]);
        }
    }

    #[test]
    fn position_debug_format() {
        assert_eq!(format!("{:?}", Position::new(2, 5)), "Pos(2:5)");
    }

    #[test]
    fn position_display_is_one_indexed() {
        assert_eq!(format!("{}", Position::new(0, 0)), "1:1");
        assert_eq!(format!("{}", Position::new(9, 4)), "10:5");
    }

    // -- LineSpan -----------------------------------------------------------

    #[test]
    fn span_ordered_swaps() {
        assert_eq!(LineSpan::ordered(5, 2), LineSpan { first: 2, last: 5 });
        assert_eq!(LineSpan::ordered(2, 5), LineSpan { first: 2, last: 5 });
    }

    #[test]
    fn span_len_single_line() {
        assert_eq!(LineSpan::ordered(3, 3).len(), 1);
        assert_eq!(LineSpan::ordered(1, 4).len(), 4);
    }

    #[test]
    fn span_clamped_to_buffer() {
        let span = LineSpan::ordered(3, 50).clamped(10);
        assert_eq!(span, LineSpan { first: 3, last: 9 });
        assert_eq!(LineSpan::ordered(0, 0).clamped(0), LineSpan { first: 0, last: 0 });
    }
}
