//! Text buffer: the ordered sequence of lines being edited.
//!
//! A `Buffer` wraps a [`ropey::Rope`] with a line-oriented editing API,
//! plus the metadata the editor reports in its status line (name, modified
//! flag).
//!
//! # Design choices
//!
//! - **ropey** gives O(log n) line indexing and edits anywhere in the text.
//!   The crate is built without its Unicode line-break extensions, so `\n`
//!   is the only line separator. Text is normalized to `\n` on load.
//!
//! - **Columns are char offsets**, not byte offsets. Byte offsets never leak
//!   into the public API.
//!
//! - **Never empty.** A rope always reports at least one line, so the
//!   "minimum one (possibly empty) line" invariant holds structurally.
//!   [`Buffer::remove_lines`] relies on it when asked to remove everything.
//!
//! - **Lines joined by `\n`.** [`Buffer::contents`] is exactly the string the
//!   host persists; a buffer loaded from `"a\nb\nc"` saves as `"a\nb\nc"`.

use std::fmt;

use ropey::Rope;

use crate::position::{LineSpan, Position};

// ---------------------------------------------------------------------------
// Buffer
// ---------------------------------------------------------------------------

/// A text buffer backed by a rope.
///
/// All positions are 0-indexed `(line, col)` pairs where `col` counts chars
/// within the line's content (the trailing `\n` is never addressable).
pub struct Buffer {
    rope: Rope,
    name: Option<String>,
    modified: bool,
}

impl Buffer {
    // -- Construction -------------------------------------------------------

    /// Create an empty single-line buffer with no name.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rope: Rope::new(),
            name: None,
            modified: false,
        }
    }

    /// Create a buffer from a string. `\r\n` and lone `\r` become `\n`.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let rope = if text.contains('\r') {
            Rope::from_str(&normalize_line_endings(text))
        } else {
            Rope::from_str(text)
        };
        Self {
            rope,
            name: None,
            modified: false,
        }
    }

    // -- Text access --------------------------------------------------------

    /// Total number of lines. Always at least 1.
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Total character count, line separators included.
    #[inline]
    #[must_use]
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Number of chars in a line, excluding the `\n`. Returns 0 for lines
    /// past the end of the buffer.
    #[must_use]
    pub fn line_len(&self, line: usize) -> usize {
        if line >= self.rope.len_lines() {
            return 0;
        }
        let slice = self.rope.line(line);
        let total = slice.len_chars();
        if total > 0 && slice.char(total - 1) == '\n' {
            total - 1
        } else {
            total
        }
    }

    /// The content of a line without its `\n`. `None` if out of bounds.
    #[must_use]
    pub fn line(&self, line: usize) -> Option<String> {
        if line >= self.rope.len_lines() {
            return None;
        }
        let start = self.rope.line_to_char(line);
        let end = start + self.line_len(line);
        Some(self.rope.slice(start..end).to_string())
    }

    /// Every line's content, in order.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        (0..self.line_count())
            .map(|i| self.line(i).unwrap_or_default())
            .collect()
    }

    /// The character at a position. `None` past the end of the line content.
    #[must_use]
    pub fn char_at(&self, pos: Position) -> Option<char> {
        if pos.line >= self.rope.len_lines() || pos.col >= self.line_len(pos.line) {
            return None;
        }
        Some(self.rope.char(self.rope.line_to_char(pos.line) + pos.col))
    }

    /// The full text, lines joined by `\n`.
    #[must_use]
    pub fn contents(&self) -> String {
        self.rope.to_string()
    }

    // -- Character edits ----------------------------------------------------

    /// Insert a character. `pos.col` may equal the line length (append).
    /// Out-of-range positions are ignored.
    pub fn insert_char(&mut self, pos: Position, ch: char) {
        if let Some(idx) = self.insert_idx(pos) {
            self.rope.insert_char(idx, ch);
            self.modified = true;
        }
    }

    /// Remove the character at a position, returning it. `None` (and no
    /// change) when the position is past the line's content.
    pub fn remove_char(&mut self, pos: Position) -> Option<char> {
        let ch = self.char_at(pos)?;
        let idx = self.rope.line_to_char(pos.line) + pos.col;
        self.rope.remove(idx..=idx);
        self.modified = true;
        Some(ch)
    }

    /// Remove up to `count` characters starting at `pos`, without crossing
    /// the end of the line. Returns the removed text.
    pub fn remove_chars(&mut self, pos: Position, count: usize) -> String {
        let len = self.line_len(pos.line);
        if pos.line >= self.line_count() || pos.col >= len || count == 0 {
            return String::new();
        }
        let end_col = (pos.col + count).min(len);
        let start = self.rope.line_to_char(pos.line) + pos.col;
        let end = start + (end_col - pos.col);
        let removed = self.rope.slice(start..end).to_string();
        self.rope.remove(start..end);
        self.modified = true;
        removed
    }

    /// Overwrite the character at `pos`. Returns `false` (no change) when
    /// there is no character there.
    pub fn replace_char(&mut self, pos: Position, ch: char) -> bool {
        if self.char_at(pos).is_none() {
            return false;
        }
        let idx = self.rope.line_to_char(pos.line) + pos.col;
        self.rope.remove(idx..=idx);
        self.rope.insert_char(idx, ch);
        self.modified = true;
        true
    }

    // -- Line edits ---------------------------------------------------------

    /// Split a line at `pos`: text from `pos.col` onward moves to a new line
    /// below.
    pub fn split_line(&mut self, pos: Position) {
        self.insert_char(pos, '\n');
    }

    /// Join `line` with the line below by removing the separator between
    /// them. Returns `false` on the last line.
    pub fn join_with_next(&mut self, line: usize) -> bool {
        if line + 1 >= self.line_count() {
            return false;
        }
        let idx = self.rope.line_to_char(line) + self.line_len(line);
        self.rope.remove(idx..=idx);
        self.modified = true;
        true
    }

    /// Replace the content of a line (its `\n` is kept).
    pub fn set_line(&mut self, line: usize, text: &str) {
        if line >= self.line_count() {
            return;
        }
        let start = self.rope.line_to_char(line);
        let end = start + self.line_len(line);
        self.rope.remove(start..end);
        self.rope.insert(start, text);
        self.modified = true;
    }

    /// Remove a span of whole lines and return their contents.
    ///
    /// Removing every line leaves a single empty line behind; the buffer
    /// never reaches zero lines.
    pub fn remove_lines(&mut self, span: LineSpan) -> Vec<String> {
        let line_count = self.line_count();
        let span = span.clamped(line_count);
        let removed: Vec<String> = (span.first..=span.last)
            .map(|i| self.line(i).unwrap_or_default())
            .collect();

        if span.first == 0 && span.last + 1 >= line_count {
            self.rope = Rope::new();
        } else if span.last + 1 < line_count {
            let start = self.rope.line_to_char(span.first);
            let end = self.rope.line_to_char(span.last + 1);
            self.rope.remove(start..end);
        } else {
            // Through the end of the buffer: eat the separator above instead.
            let prev = span.first - 1;
            let start = self.rope.line_to_char(prev) + self.line_len(prev);
            let end = self.rope.len_chars();
            self.rope.remove(start..end);
        }
        self.modified = true;
        removed
    }

    /// Insert whole lines so that the first of them becomes line `at`.
    /// `at == line_count()` appends after the last line.
    pub fn insert_lines(&mut self, at: usize, lines: &[String]) {
        if lines.is_empty() || at > self.line_count() {
            return;
        }
        let joined = lines.join("\n");
        if at < self.line_count() {
            let idx = self.rope.line_to_char(at);
            self.rope.insert(idx, &format!("{joined}\n"));
        } else {
            let idx = self.rope.len_chars();
            self.rope.insert(idx, &format!("\n{joined}"));
        }
        self.modified = true;
    }

    // -- Metadata -----------------------------------------------------------

    /// The name this buffer is saved under, if any.
    #[inline]
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Set the name used by `:w`.
    #[inline]
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// True if the buffer changed since the last save (or load).
    #[inline]
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.modified
    }

    /// Clear the modified flag after a successful save.
    #[inline]
    pub const fn mark_saved(&mut self) {
        self.modified = false;
    }

    // -- Helpers ------------------------------------------------------------

    /// Rope char index for an insertion point, allowing `col == line_len`.
    fn insert_idx(&self, pos: Position) -> Option<usize> {
        if pos.line >= self.line_count() || pos.col > self.line_len(pos.line) {
            return None;
        }
        Some(self.rope.line_to_char(pos.line) + pos.col)
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("lines", &self.line_count())
            .field("chars", &self.len_chars())
            .field("modified", &self.modified)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Convert `\r\n` and lone `\r` to `\n`.
fn normalize_line_endings(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\r' {
            result.push('\n');
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
        } else {
            result.push(ch);
        }
    }

    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
