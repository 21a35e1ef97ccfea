//! Word motions: whitespace-delimited token navigation.
//!
//! | Motion | Key | Description |
//! |--------|-----|-------------|
//! | [`word_forward`] | `w` | Forward to the start of the next token |
//! | [`word_backward`] | `b` | Backward to the start of the previous token |
//!
//! A **token** here is any run of non-whitespace characters; `hello.world`
//! is one token. Only whitespace separates tokens.
//!
//! Neither motion ever fails. At the edges of the buffer they saturate.

use crate::buffer::Buffer;
use crate::position::Position;

#[inline]
fn is_blank(ch: char) -> bool {
    ch.is_whitespace()
}

fn line_chars(buf: &Buffer, line: usize) -> Vec<char> {
    buf.line(line).unwrap_or_default().chars().collect()
}

/// `w`: skip the rest of the current token, then any whitespace after it.
///
/// Running off the end of the line moves to column 0 of the next line. On
/// the last line the cursor settles on the last character instead.
#[must_use]
pub fn word_forward(buf: &Buffer, pos: Position) -> Position {
    let chars = line_chars(buf, pos.line);
    let len = chars.len();
    let mut col = pos.col;

    while col < len && !is_blank(chars[col]) {
        col += 1;
    }
    while col < len && is_blank(chars[col]) {
        col += 1;
    }

    if col < len {
        Position::new(pos.line, col)
    } else if pos.line + 1 < buf.line_count() {
        Position::new(pos.line + 1, 0)
    } else {
        Position::new(pos.line, len.saturating_sub(1))
    }
}

/// `b`: step back over whitespace, then to the start of the token before it.
///
/// At column 0 the cursor moves to the last character of the previous line.
#[must_use]
pub fn word_backward(buf: &Buffer, pos: Position) -> Position {
    let chars = line_chars(buf, pos.line);
    let mut col = pos.col.min(chars.len());

    if col == 0 {
        if pos.line == 0 {
            return Position::ZERO;
        }
        let prev = pos.line - 1;
        return Position::new(prev, buf.line_len(prev).saturating_sub(1));
    }

    col -= 1;
    while col > 0 && is_blank(chars[col]) {
        col -= 1;
    }
    while col > 0 && !is_blank(chars[col - 1]) {
        col -= 1;
    }
    Position::new(pos.line, col)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
