//! Buffer-changing commands: text entry, operators, paste and join.
//!
//! Every command that removes or copies text replaces the register. Paste
//! only reads it. All operators are line-wise except `x`, `s` and `r`.

use std::iter;

use crate::mode::Mode;
use crate::position::{LineSpan, Position};

use super::Editor;

/// Most lines a single paste may insert.
const MAX_PASTE_LINES: usize = 1 << 20;

impl Editor {
    /// `count` lines starting at the cursor line, clamped to the buffer.
    fn span_from_cursor(&self, count: usize) -> LineSpan {
        let line = self.cursor.line();
        let last = line.saturating_add(count.max(1) - 1);
        LineSpan::ordered(line, last).clamped(self.buffer.line_count())
    }

    fn lines_in(&self, span: LineSpan) -> Vec<String> {
        (span.first..=span.last)
            .map(|i| self.buffer.line(i).unwrap_or_default())
            .collect()
    }

    // -- Text entry ---------------------------------------------------------

    /// Type a character at the cursor (Insert mode).
    pub(super) fn insert_char(&mut self, ch: char) {
        let pos = self.cursor.position();
        self.buffer.insert_char(pos, ch);
        self.move_cursor_to(Position::new(pos.line, pos.col + 1));
    }

    /// Enter: split the line at the cursor.
    pub(super) fn insert_newline(&mut self) {
        let pos = self.cursor.position();
        self.buffer.split_line(pos);
        self.move_cursor_to(Position::new(pos.line + 1, 0));
    }

    /// Backspace: delete before the cursor, or join with the previous line
    /// at column 0.
    pub(super) fn insert_backspace(&mut self) {
        let pos = self.cursor.position();
        if pos.col > 0 {
            let from = Position::new(pos.line, pos.col - 1);
            self.buffer.remove_char(from);
            self.move_cursor_to(from);
        } else if pos.line > 0 {
            let prev = pos.line - 1;
            let prev_len = self.buffer.line_len(prev);
            self.buffer.join_with_next(prev);
            self.move_cursor_to(Position::new(prev, prev_len));
        }
    }

    /// Delete: remove the char under the cursor, or join the next line at
    /// the end of this one.
    pub(super) fn insert_delete(&mut self) {
        let pos = self.cursor.position();
        if pos.col < self.buffer.line_len(pos.line) {
            self.buffer.remove_char(pos);
        } else {
            self.buffer.join_with_next(pos.line);
        }
    }

    /// `o` / `O`: open an empty line below or above and start inserting.
    pub(super) fn open_line(&mut self, below: bool) {
        let line = self.cursor.line();
        let at = if below { line + 1 } else { line };
        self.buffer.insert_lines(at, &[String::new()]);
        self.set_mode(Mode::Insert);
        self.move_cursor_to(Position::new(at, 0));
    }

    /// Replace mode: overwrite under the cursor, or append once the end of
    /// the line has been reached.
    pub(super) fn overwrite_char(&mut self, ch: char, appending: bool) {
        let pos = self.cursor.position();
        let len = self.buffer.line_len(pos.line);

        if !appending && pos.col < len {
            self.buffer.replace_char(pos, ch);
            if pos.col + 1 < len {
                self.move_cursor_to(Position::new(pos.line, pos.col + 1));
            } else {
                self.mode = Mode::Replace { appending: true };
            }
        } else {
            self.buffer.insert_char(Position::new(pos.line, len), ch);
            self.move_cursor_to(Position::new(pos.line, len));
            self.mode = Mode::Replace { appending: true };
        }
    }

    // -- Character operators ------------------------------------------------

    /// `x`: remove `count` chars at the cursor into the register. On an
    /// empty line the next line is joined instead, leaving the register
    /// alone.
    pub(super) fn delete_chars(&mut self, count: usize) {
        let pos = self.cursor.position();
        if pos.col >= self.buffer.line_len(pos.line) {
            self.buffer.join_with_next(pos.line);
            return;
        }
        let removed = self.buffer.remove_chars(pos, count);
        self.register.store(vec![removed]);
    }

    /// `s`: remove `count` chars at the cursor and start inserting.
    pub(super) fn substitute_chars(&mut self, count: usize) {
        let pos = self.cursor.position();
        let removed = self.buffer.remove_chars(pos, count);
        if !removed.is_empty() {
            self.register.store(vec![removed]);
        }
        self.set_mode(Mode::Insert);
        self.move_cursor_to(pos);
    }

    /// `r{char}`: overwrite one char. No-op on an empty line.
    pub(super) fn replace_char(&mut self, ch: char) {
        self.buffer.replace_char(self.cursor.position(), ch);
    }

    // -- Line operators -----------------------------------------------------

    /// `dd`: remove `count` lines into the register.
    pub(super) fn delete_lines(&mut self, count: usize) {
        let span = self.span_from_cursor(count);
        let removed = self.buffer.remove_lines(span);
        self.register.store(removed);
        self.move_cursor_to(Position::new(span.first, 0));
    }

    /// `yy`: copy `count` lines into the register.
    pub(super) fn yank_lines(&mut self, count: usize) {
        let lines = self.lines_in(self.span_from_cursor(count));
        self.register.store(lines);
    }

    /// `cc` / `S`: replace `count` lines with one empty line and start
    /// inserting on it.
    pub(super) fn change_lines(&mut self, count: usize) {
        let span = self.span_from_cursor(count);
        let removed = self.lines_in(span);
        if span.len() > 1 {
            self.buffer
                .remove_lines(LineSpan::ordered(span.first + 1, span.last));
        }
        self.buffer.set_line(span.first, "");
        self.register.store(removed);
        self.set_mode(Mode::Insert);
        self.move_cursor_to(Position::new(span.first, 0));
    }

    /// `p` / `P`: put the register's lines below or above the cursor line,
    /// `count` times. A paste that would add too many lines is refused.
    pub(super) fn paste(&mut self, below: bool, count: usize) {
        if self.register.is_empty() {
            return;
        }
        let count = count.max(1);
        let total = self.register.lines().len().checked_mul(count);
        if total.is_none_or(|n| n > MAX_PASTE_LINES) {
            self.set_error("E1240: Resulting text too long");
            return;
        }
        let lines: Vec<String> = iter::repeat_n(self.register.lines(), count)
            .flatten()
            .cloned()
            .collect();
        let line = self.cursor.line();
        let at = if below { line + 1 } else { line };
        self.buffer.insert_lines(at, &lines);
        self.move_cursor_to(Position::new(at, 0));
    }

    /// `J`: join `count` lines (at least two) with single spaces.
    pub(super) fn join_lines(&mut self, count: usize) {
        let line = self.cursor.line();
        let joins = count.max(2) - 1;
        let mut join_col = None;

        for _ in 0..joins {
            if line + 1 >= self.buffer.line_count() {
                break;
            }
            let current = self.buffer.line(line).unwrap_or_default();
            let next = self.buffer.line(line + 1).unwrap_or_default();
            let next = next.trim_start();

            let col = current.chars().count();
            let sep = if current.is_empty() || next.is_empty() { "" } else { " " };
            self.buffer.set_line(line, &format!("{current}{sep}{next}"));
            self.buffer.remove_lines(LineSpan::ordered(line + 1, line + 1));
            join_col = Some(col);
        }

        if let Some(col) = join_col {
            self.move_cursor_to(Position::new(line, col));
        }
    }

    // -- Visual operators ---------------------------------------------------

    /// Visual `d` / `x`: remove the selected lines into the register.
    pub(super) fn visual_delete(&mut self, anchor: Position) {
        let span = LineSpan::ordered(anchor.line, self.cursor.line());
        let removed = self.buffer.remove_lines(span);
        self.register.store(removed);
        self.escape_to_normal();
        self.move_cursor_to(Position::new(span.first, 0));
    }

    /// Visual `y`: copy the selected lines into the register.
    pub(super) fn visual_yank(&mut self, anchor: Position) {
        let span = LineSpan::ordered(anchor.line, self.cursor.line());
        let lines = self.lines_in(span);
        self.register.store(lines);
        self.escape_to_normal();
        self.move_cursor_to(Position::new(span.first, 0));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::super::harness::{editor_with, keys, message};
    use crate::mode::Mode;
    use crate::position::Position;
    use pretty_assertions::assert_eq;

    fn pos(line: usize, col: usize) -> Position {
        Position::new(line, col)
    }

    // -- x ------------------------------------------------------------------

    #[test]
    fn x_deletes_into_register() {
        let mut ed = editor_with("hello");
        keys(&mut ed, "x");
        assert_eq!(ed.lines(), vec!["ello"]);
        assert_eq!(ed.register(), ["h"]);
    }

    #[test]
    fn x_with_count_stops_at_line_end() {
        let mut ed = editor_with("hello\nworld");
        keys(&mut ed, "3l5x");
        assert_eq!(ed.lines(), vec!["hel", "world"]);
        assert_eq!(ed.register(), ["lo"]);
        assert_eq!(ed.cursor(), pos(0, 2));
    }

    #[test]
    fn x_on_empty_line_joins_without_touching_register() {
        let mut ed = editor_with("\nnext");
        keys(&mut ed, "jyyk");
        keys(&mut ed, "x");
        assert_eq!(ed.lines(), vec!["next"]);
        assert_eq!(ed.register(), ["next"]);
    }

    #[test]
    fn x_on_lone_empty_line_is_noop() {
        let mut ed = editor_with("");
        keys(&mut ed, "x");
        assert_eq!(ed.lines(), vec![""]);
        assert!(!ed.buffer().is_modified());
    }

    // -- dd -----------------------------------------------------------------

    #[test]
    fn dd_first_line() {
        let mut ed = editor_with("one\ntwo\nthree");
        keys(&mut ed, "dd");
        assert_eq!(ed.lines(), vec!["two", "three"]);
        assert_eq!(ed.register(), ["one"]);
        assert_eq!(ed.cursor(), pos(0, 0));
    }

    #[test]
    fn dd_with_count() {
        let mut ed = editor_with("a\nb\nc\nd");
        keys(&mut ed, "j2dd");
        assert_eq!(ed.lines(), vec!["a", "d"]);
        assert_eq!(ed.register(), ["b", "c"]);
        assert_eq!(ed.cursor(), pos(1, 0));
    }

    #[test]
    fn dd_last_line_moves_cursor_up() {
        let mut ed = editor_with("a\nb\nc");
        keys(&mut ed, "Gdd");
        assert_eq!(ed.lines(), vec!["a", "b"]);
        assert_eq!(ed.cursor(), pos(1, 0));
    }

    #[test]
    fn dd_never_empties_the_buffer() {
        let mut ed = editor_with("a\nb");
        keys(&mut ed, "5dd");
        assert_eq!(ed.lines(), vec![""]);
        assert_eq!(ed.register(), ["a", "b"]);
        keys(&mut ed, "dddddd");
        assert_eq!(ed.buffer().line_count(), 1);
        assert_eq!(ed.register(), [""]);
    }

    #[test]
    fn dd_resets_column() {
        let mut ed = editor_with("abc\ndefgh");
        keys(&mut ed, "$dd");
        assert_eq!(ed.cursor(), pos(0, 0));
    }

    // -- yy / p / P ---------------------------------------------------------

    #[test]
    fn yank_then_paste_after() {
        let mut ed = editor_with("a\nb\nc");
        keys(&mut ed, "jyyp");
        assert_eq!(ed.lines(), vec!["a", "b", "b", "c"]);
        assert_eq!(ed.cursor(), pos(2, 0));
        assert_eq!(ed.register(), ["b"]);
    }

    #[test]
    fn yank_does_not_modify() {
        let mut ed = editor_with("a\nb\nc");
        keys(&mut ed, "2yy");
        assert_eq!(ed.register(), ["a", "b"]);
        assert!(!ed.buffer().is_modified());
        assert_eq!(ed.cursor(), pos(0, 0));
    }

    #[test]
    fn paste_before() {
        let mut ed = editor_with("a\nb");
        keys(&mut ed, "jyykP");
        assert_eq!(ed.lines(), vec!["b", "a", "b"]);
        assert_eq!(ed.cursor(), pos(0, 0));
    }

    #[test]
    fn paste_with_count_repeats_block() {
        let mut ed = editor_with("x\ny");
        keys(&mut ed, "2yyG2p");
        assert_eq!(ed.lines(), vec!["x", "y", "x", "y", "x", "y"]);
        assert_eq!(ed.cursor(), pos(2, 0));
    }

    #[test]
    fn oversized_paste_is_refused() {
        let mut ed = editor_with("x\ny");
        keys(&mut ed, "yy99999999999999999999p");
        assert_eq!(ed.lines(), vec!["x", "y"]);
        assert!(!ed.buffer().is_modified());
        assert_eq!(message(&mut ed).as_deref(), Some("E1240: Resulting text too long"));

        keys(&mut ed, "2yy524289P");
        assert_eq!(ed.lines(), vec!["x", "y"]);
        assert_eq!(message(&mut ed).as_deref(), Some("E1240: Resulting text too long"));

        keys(&mut ed, "3p");
        assert_eq!(ed.buffer().line_count(), 8);
        assert!(ed.take_message().is_none());
    }

    #[test]
    fn paste_after_last_line() {
        let mut ed = editor_with("a\nb");
        keys(&mut ed, "yyGp");
        assert_eq!(ed.lines(), vec!["a", "b", "a"]);
        assert_eq!(ed.cursor(), pos(2, 0));
    }

    #[test]
    fn paste_with_empty_register_is_noop() {
        let mut ed = editor_with("a");
        keys(&mut ed, "pP");
        assert_eq!(ed.lines(), vec!["a"]);
        assert!(!ed.buffer().is_modified());
    }

    #[test]
    fn paste_after_x_inserts_a_line() {
        let mut ed = editor_with("abc\nz");
        keys(&mut ed, "xp");
        assert_eq!(ed.lines(), vec!["bc", "a", "z"]);
    }

    #[test]
    fn register_holds_only_latest() {
        let mut ed = editor_with("one\ntwo\nthree");
        keys(&mut ed, "yyjddx");
        assert_eq!(ed.register(), ["t"]);
    }

    // -- cc / S / s ---------------------------------------------------------

    #[test]
    fn cc_empties_line_and_inserts() {
        let mut ed = editor_with("one\ntwo\nthree");
        keys(&mut ed, "jlcc");
        assert_eq!(ed.mode(), &Mode::Insert);
        assert_eq!(ed.lines(), vec!["one", "", "three"]);
        assert_eq!(ed.cursor(), pos(1, 0));
        assert_eq!(ed.register(), ["two"]);
        keys(&mut ed, "2<Esc>");
        assert_eq!(ed.lines(), vec!["one", "2", "three"]);
    }

    #[test]
    fn counted_change_collapses_to_one_line() {
        let mut ed = editor_with("a\nb\nc\nd");
        keys(&mut ed, "j2S");
        assert_eq!(ed.lines(), vec!["a", "", "d"]);
        assert_eq!(ed.register(), ["b", "c"]);
    }

    #[test]
    fn change_everything() {
        let mut ed = editor_with("a\nb");
        keys(&mut ed, "9cc");
        assert_eq!(ed.lines(), vec![""]);
        assert_eq!(ed.register(), ["a", "b"]);
    }

    #[test]
    fn s_removes_chars_and_inserts() {
        let mut ed = editor_with("abcdef");
        keys(&mut ed, "l3sX");
        assert_eq!(ed.lines(), vec!["aXef"]);
        assert_eq!(ed.register(), ["bcd"]);
        assert_eq!(ed.mode(), &Mode::Insert);
    }

    #[test]
    fn s_on_empty_line_keeps_register() {
        let mut ed = editor_with("");
        keys(&mut ed, "s");
        assert_eq!(ed.mode(), &Mode::Insert);
        assert!(ed.register().is_empty());
    }

    // -- J ------------------------------------------------------------------

    #[test]
    fn join_trims_leading_whitespace() {
        let mut ed = editor_with("hello\n    world");
        keys(&mut ed, "J");
        assert_eq!(ed.lines(), vec!["hello world"]);
        assert_eq!(ed.cursor(), pos(0, 5));
    }

    #[test]
    fn join_with_empty_side_adds_no_space() {
        let mut ed = editor_with("\nabc\nx\n   ");
        keys(&mut ed, "J");
        assert_eq!(ed.lines(), vec!["abc", "x", "   "]);
        keys(&mut ed, "jJ");
        assert_eq!(ed.lines(), vec!["abc", "x"]);
    }

    #[test]
    fn join_on_last_line_is_noop() {
        let mut ed = editor_with("a\nb");
        keys(&mut ed, "GJ");
        assert_eq!(ed.lines(), vec!["a", "b"]);
        assert!(!ed.buffer().is_modified());
    }

    #[test]
    fn join_with_count() {
        let mut ed = editor_with("a\nb\nc\nd");
        keys(&mut ed, "3J");
        assert_eq!(ed.lines(), vec!["a b c", "d"]);
        keys(&mut ed, "gg1J");
        assert_eq!(ed.lines(), vec!["a b c d"]);
    }

    #[test]
    fn join_does_not_touch_register() {
        let mut ed = editor_with("a\nb");
        keys(&mut ed, "J");
        assert!(ed.register().is_empty());
    }

    // -- r ------------------------------------------------------------------

    #[test]
    fn r_replaces_one_char() {
        let mut ed = editor_with("cat");
        keys(&mut ed, "rb");
        assert_eq!(ed.lines(), vec!["bat"]);
        assert_eq!(ed.mode(), &Mode::Normal);
        assert_eq!(ed.cursor(), pos(0, 0));
    }

    #[test]
    fn r_escape_cancels() {
        let mut ed = editor_with("cat");
        keys(&mut ed, "r<Esc>l");
        assert_eq!(ed.lines(), vec!["cat"]);
        assert_eq!(ed.cursor(), pos(0, 1));
    }

    #[test]
    fn r_on_empty_line_is_noop() {
        let mut ed = editor_with("");
        keys(&mut ed, "rx");
        assert_eq!(ed.lines(), vec![""]);
        assert!(!ed.buffer().is_modified());
    }

    #[test]
    fn r_ignores_count() {
        let mut ed = editor_with("aaaa");
        keys(&mut ed, "3rb");
        assert_eq!(ed.lines(), vec!["baaa"]);
    }
}
