//! Motions: pure cursor-position computations.
//!
//! A [`Motion`] maps a starting position, the buffer and a repeat count to a
//! new position. Motions never fail: at the edges of the buffer they
//! saturate. Left and right never wrap across lines.
//!
//! Normal and Visual mode both move through [`apply`]; Insert and Replace
//! mode reuse it for the arrow keys with a wider column bound.

use crate::buffer::Buffer;
use crate::cursor::{Cursor, clamp};
use crate::position::Position;
use crate::word;

/// A cursor motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    /// `h` / Left.
    Left,
    /// `l` / Right.
    Right,
    /// `k` / Up.
    Up,
    /// `j` / Down.
    Down,
    /// `0`.
    LineStart,
    /// `$`.
    LineEnd,
    /// `^`.
    FirstNonBlank,
    /// `w`.
    WordForward,
    /// `b`.
    WordBackward,
    /// `gg`.
    DocumentTop,
    /// `G`.
    DocumentBottom,
    /// Jump to an absolute 0-indexed line, column 0 (`{n}G`, `:{n}`).
    Line(usize),
}

impl Motion {
    /// Vertical motions keep the sticky column instead of resetting it.
    #[inline]
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }

    /// Compute the target of this motion from `from`, repeated `count`
    /// times (a count of 0 is treated as 1).
    ///
    /// `sticky_col` is the desired column for vertical motions. The result
    /// is clamped for the given column bound.
    #[must_use]
    pub fn target(
        self,
        buf: &Buffer,
        from: Position,
        sticky_col: usize,
        count: usize,
        past_end: bool,
    ) -> Position {
        let count = count.max(1);
        let last_line = buf.line_count().saturating_sub(1);

        let raw = match self {
            Self::Left => {
                let from = clamp(from, buf, past_end);
                Position::new(from.line, from.col.saturating_sub(count))
            }
            Self::Right => Position::new(from.line, from.col.saturating_add(count)),
            Self::Up => Position::new(from.line.saturating_sub(count), sticky_col),
            Self::Down => Position::new(from.line.saturating_add(count).min(last_line), sticky_col),
            Self::LineStart => Position::new(from.line, 0),
            Self::LineEnd => Position::new(from.line, buf.line_len(from.line).saturating_sub(1)),
            Self::FirstNonBlank => Position::new(from.line, first_non_blank(buf, from.line)),
            Self::WordForward => repeat_until_stuck(from, count, |pos| word::word_forward(buf, pos)),
            Self::WordBackward => repeat_until_stuck(from, count, |pos| word::word_backward(buf, pos)),
            Self::DocumentTop => Position::ZERO,
            Self::DocumentBottom => Position::new(last_line, 0),
            Self::Line(line) => Position::new(line.min(last_line), 0),
        };

        clamp(raw, buf, past_end)
    }
}

/// Step `count` times, stopping early once a step no longer moves.
fn repeat_until_stuck(from: Position, count: usize, step: impl Fn(Position) -> Position) -> Position {
    let mut pos = from;
    for _ in 0..count {
        let next = step(pos);
        if next == pos {
            break;
        }
        pos = next;
    }
    pos
}

/// Apply a motion to a cursor, updating its sticky column as appropriate.
pub fn apply(cursor: &mut Cursor, motion: Motion, count: usize, buf: &Buffer, past_end: bool) {
    let target = motion.target(buf, cursor.position(), cursor.sticky_col(), count, past_end);
    if motion.is_vertical() {
        cursor.set_position_keep_sticky(target, buf, past_end);
    } else {
        cursor.set_position(target, buf, past_end);
    }
}

/// Column of the first non-whitespace char on `line`, or the line length if
/// the line is blank.
#[must_use]
pub fn first_non_blank(buf: &Buffer, line: usize) -> usize {
    buf.line(line)
        .unwrap_or_default()
        .chars()
        .take_while(|ch| ch.is_whitespace())
        .count()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
