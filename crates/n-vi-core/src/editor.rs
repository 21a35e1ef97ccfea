//! Editor: the modal state machine.
//!
//! One [`Editor`] owns everything a session needs: the buffer, the cursor,
//! the current mode, the register, the last search pattern and the pending
//! message. Input arrives one key at a time through [`Editor::handle_key`];
//! each key is processed to completion before the next.
//!
//! # Dispatch
//!
//! `handle_key` routes on the current [`Mode`]. Normal and Visual share the
//! motion table; Normal additionally resolves counts and two-key sequences
//! (`dd`, `yy`, `cc`, `gg`, `r{char}`) through a small [`Pending`] tag.
//! The buffer-changing commands live in `operator`, the colon commands in
//! `ex`.
//!
//! After every key the cursor is clamped to the active mode's column bound,
//! so no reachable state leaves it off the buffer.

mod ex;
mod operator;

use tracing::{debug, trace};

use crate::buffer::Buffer;
use crate::command::CommandLine;
use crate::cursor::Cursor;
use crate::host::{Host, HostError};
use crate::key::{KeyCode, KeyEvent};
use crate::mode::Mode;
use crate::motion::{self, Motion};
use crate::position::Position;
use crate::register::Register;
use crate::search::{SearchDirection, SearchState};
use crate::status::{Message, StatusLine};

/// What the host should do after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Keep feeding keys.
    Continue,
    /// The editor asked the host to exit.
    Quit,
}

/// A two-key command waiting for its second key.
///
/// The count is the one typed before the first key (`3dd`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    /// `d`, waiting for `d`.
    Delete { count: usize },
    /// `y`, waiting for `y`.
    Yank { count: usize },
    /// `c`, waiting for `c`.
    Change { count: usize },
    /// `g`, waiting for `g`. Keeps the raw count for `{n}gg`.
    G { count: Option<usize> },
    /// `r`, waiting for the replacement character.
    Replace,
}

/// The editing engine.
#[derive(Debug)]
pub struct Editor {
    buffer: Buffer,
    cursor: Cursor,
    mode: Mode,
    pending: Option<Pending>,

    /// Count accumulator. `None` until a digit 1-9 is pressed; consumed by
    /// the next command.
    count: Option<usize>,

    register: Register,
    search: SearchState,

    /// One-shot message, handed out by [`take_message`](Self::take_message).
    message: Option<Message>,
}

impl Editor {
    // -- Construction -------------------------------------------------------

    /// An editor over an empty, unnamed buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::with_buffer(Buffer::new())
    }

    /// An editor over an unnamed buffer holding `text`.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self::with_buffer(Buffer::from_text(text))
    }

    /// Load `name` through the host. Missing content yields one empty line.
    ///
    /// # Errors
    ///
    /// Propagates the host's [`HostError`] if loading fails.
    pub fn open(name: &str, host: &mut dyn Host) -> Result<Self, HostError> {
        let mut editor = host
            .load(name)?
            .map_or_else(Self::new, |text| Self::from_text(&text));
        editor.buffer.set_name(name);
        debug!(name, lines = editor.buffer.line_count(), "buffer opened");
        Ok(editor)
    }

    fn with_buffer(buffer: Buffer) -> Self {
        Self {
            buffer,
            cursor: Cursor::new(),
            mode: Mode::Normal,
            pending: None,
            count: None,
            register: Register::new(),
            search: SearchState::new(),
            message: None,
        }
    }

    // -- Accessors ----------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// Cursor position, 0-indexed.
    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> Position {
        self.cursor.position()
    }

    #[inline]
    #[must_use]
    pub const fn mode(&self) -> &Mode {
        &self.mode
    }

    /// The register's lines. Empty until the first yank or delete.
    #[inline]
    #[must_use]
    pub fn register(&self) -> &[String] {
        self.register.lines()
    }

    /// The last search pattern, if any.
    #[inline]
    #[must_use]
    pub fn last_search(&self) -> Option<&str> {
        self.search.pattern()
    }

    /// The buffer's lines, in order.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.buffer.lines()
    }

    /// Name the buffer for later `:w`.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.buffer.set_name(name);
    }

    /// A snapshot for the status line.
    #[must_use]
    pub fn status(&self) -> StatusLine {
        let pos = self.cursor.position();
        StatusLine {
            mode: self.mode.display_name(),
            name: self.buffer.name().map(str::to_string),
            modified: self.buffer.is_modified(),
            line: pos.line + 1,
            col: pos.col + 1,
            total_lines: self.buffer.line_count(),
        }
    }

    /// Take the pending message, leaving none behind.
    pub const fn take_message(&mut self) -> Option<Message> {
        self.message.take()
    }

    // -- Input --------------------------------------------------------------

    /// Process one key.
    ///
    /// Returns [`Action::Quit`] once the host's `exit` has been called.
    ///
    /// # Errors
    ///
    /// A failed save is returned as [`HostError`] after it has also been
    /// reported on the message channel. The editor stays usable.
    pub fn handle_key(&mut self, key: KeyEvent, host: &mut dyn Host) -> Result<Action, HostError> {
        trace!(key = %key, mode = %self.mode, "key");

        let result = match self.mode {
            Mode::Normal => {
                self.handle_normal(key);
                Ok(Action::Continue)
            }
            Mode::Insert => {
                self.handle_insert(key);
                Ok(Action::Continue)
            }
            Mode::Visual { anchor } => {
                self.handle_visual(key, anchor);
                Ok(Action::Continue)
            }
            Mode::Replace { appending } => {
                self.handle_replace(key, appending);
                Ok(Action::Continue)
            }
            Mode::CommandLine(_) => self.handle_command_line(key, host),
        };

        self.cursor.clamp(&self.buffer, self.mode.cursor_past_end());
        result
    }

    // -- Shared helpers -----------------------------------------------------

    fn set_mode(&mut self, mode: Mode) {
        if std::mem::discriminant(&self.mode) != std::mem::discriminant(&mode) {
            debug!(from = %self.mode, to = %mode, "mode change");
        }
        self.mode = mode;
        self.cursor.clamp(&self.buffer, self.mode.cursor_past_end());
    }

    /// Leave any mode for Normal, dropping pending keys and counts.
    fn escape_to_normal(&mut self) {
        self.pending = None;
        self.count = None;
        self.set_mode(Mode::Normal);
    }

    fn set_message(&mut self, text: impl Into<String>) {
        self.message = Some(Message::info(text));
    }

    fn set_error(&mut self, text: impl Into<String>) {
        self.message = Some(Message::error(text));
    }

    fn take_count(&mut self) -> usize {
        self.count.take().unwrap_or(1)
    }

    fn push_count_digit(&mut self, digit: u32) {
        let current = self.count.unwrap_or(0);
        self.count = Some(current.saturating_mul(10).saturating_add(digit as usize));
    }

    /// Feed a digit into the count. `0` only counts once a count has
    /// started; otherwise it is the line-start motion.
    fn accumulate_count(&mut self, key: KeyEvent) -> bool {
        match key.printable() {
            Some(d @ '1'..='9') => {
                self.push_count_digit(d.to_digit(10).unwrap_or(0));
                true
            }
            Some('0') if self.count.is_some() => {
                self.push_count_digit(0);
                true
            }
            _ => false,
        }
    }

    /// Move the cursor with the column bound of the current mode.
    fn move_cursor(&mut self, motion: Motion, count: usize) {
        let past_end = self.mode.cursor_past_end();
        motion::apply(&mut self.cursor, motion, count, &self.buffer, past_end);
    }

    fn move_cursor_to(&mut self, pos: Position) {
        self.cursor
            .set_position(pos, &self.buffer, self.mode.cursor_past_end());
    }

    /// `/` or `?`: a command line pre-filled with the direction's prefix.
    fn open_search_prompt(&mut self, direction: SearchDirection) {
        let mut prefix = [0; 4];
        let text = direction.prefix().encode_utf8(&mut prefix);
        self.set_mode(Mode::CommandLine(CommandLine::with_text(text)));
    }

    // -- Normal mode --------------------------------------------------------

    fn handle_normal(&mut self, key: KeyEvent) {
        if key.is_ctrl('r') {
            self.pending = None;
            self.count = None;
            self.set_error("redo: not yet implemented");
            return;
        }

        if let Some(pending) = self.pending.take() {
            self.handle_pending(pending, key);
            return;
        }

        if key.code == KeyCode::Escape {
            self.count = None;
            return;
        }

        if self.accumulate_count(key) {
            return;
        }

        let raw_count = self.count.take();
        self.handle_normal_key(key, raw_count);
    }

    fn handle_normal_key(&mut self, key: KeyEvent, raw_count: Option<usize>) {
        if let Some(motion) = motion_for_key(key, raw_count) {
            self.move_cursor(motion, raw_count.unwrap_or(1));
            return;
        }

        let Some(ch) = key.printable() else {
            return;
        };
        let count = raw_count.unwrap_or(1);
        let pos = self.cursor.position();

        match ch {
            ':' => self.set_mode(Mode::CommandLine(CommandLine::new())),
            '/' => self.open_search_prompt(SearchDirection::Forward),
            '?' => self.open_search_prompt(SearchDirection::Backward),
            'v' | 'V' => self.set_mode(Mode::Visual { anchor: pos }),
            'R' => self.set_mode(Mode::Replace { appending: false }),

            'i' => self.set_mode(Mode::Insert),
            'a' => {
                self.set_mode(Mode::Insert);
                self.move_cursor_to(Position::new(pos.line, pos.col + 1));
            }
            'A' => {
                self.set_mode(Mode::Insert);
                self.move_cursor_to(Position::new(pos.line, self.buffer.line_len(pos.line)));
            }
            'I' => {
                self.set_mode(Mode::Insert);
                self.move_cursor_to(Position::new(pos.line, motion::first_non_blank(&self.buffer, pos.line)));
            }
            'o' => self.open_line(true),
            'O' => self.open_line(false),

            'x' => self.delete_chars(count),
            's' => self.substitute_chars(count),
            'S' => self.change_lines(count),
            'J' => self.join_lines(count),
            'p' => self.paste(true, count),
            'P' => self.paste(false, count),

            'd' => self.pending = Some(Pending::Delete { count }),
            'y' => self.pending = Some(Pending::Yank { count }),
            'c' => self.pending = Some(Pending::Change { count }),
            'g' => self.pending = Some(Pending::G { count: raw_count }),
            'r' => self.pending = Some(Pending::Replace),

            'n' => self.search_repeat(SearchDirection::Forward, count),
            'N' => self.search_repeat(SearchDirection::Backward, count),
            'u' => self.set_error("undo: not yet implemented"),

            _ => {}
        }
    }

    /// Resolve the second key of a two-key command. Anything but the
    /// expected key cancels the command and is otherwise ignored.
    fn handle_pending(&mut self, pending: Pending, key: KeyEvent) {
        if key.code == KeyCode::Escape {
            self.count = None;
            return;
        }

        match (pending, key.printable()) {
            (Pending::Delete { count }, Some('d')) => self.delete_lines(count),
            (Pending::Yank { count }, Some('y')) => self.yank_lines(count),
            (Pending::Change { count }, Some('c')) => self.change_lines(count),
            (Pending::G { count }, Some('g')) => {
                let motion = count.map_or(Motion::DocumentTop, |n| Motion::Line(n.saturating_sub(1)));
                self.move_cursor(motion, 1);
            }
            (Pending::Replace, Some(ch)) => self.replace_char(ch),
            _ => trace!(?pending, key = %key, "pending command cancelled"),
        }
    }

    // -- Visual mode --------------------------------------------------------

    fn handle_visual(&mut self, key: KeyEvent, anchor: Position) {
        if key.code == KeyCode::Escape {
            self.escape_to_normal();
            return;
        }

        if let Some(pending) = self.pending.take() {
            if let (Pending::G { count }, Some('g')) = (pending, key.printable()) {
                let motion = count.map_or(Motion::DocumentTop, |n| Motion::Line(n.saturating_sub(1)));
                self.move_cursor(motion, 1);
            }
            return;
        }

        if self.accumulate_count(key) {
            return;
        }

        let raw_count = self.count.take();
        if let Some(motion) = motion_for_key(key, raw_count) {
            self.move_cursor(motion, raw_count.unwrap_or(1));
            return;
        }

        match key.printable() {
            Some('x' | 'd') => self.visual_delete(anchor),
            Some('y') => self.visual_yank(anchor),
            Some('g') => self.pending = Some(Pending::G { count: raw_count }),
            Some('v' | 'V') => self.escape_to_normal(),
            _ => {}
        }
    }

    // -- Insert mode --------------------------------------------------------

    fn handle_insert(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Escape => {
                let pos = self.cursor.position();
                self.escape_to_normal();
                self.move_cursor_to(Position::new(pos.line, pos.col.saturating_sub(1)));
            }
            KeyCode::Enter => self.insert_newline(),
            KeyCode::Backspace => self.insert_backspace(),
            KeyCode::Delete => self.insert_delete(),
            KeyCode::Tab => self.insert_char('\t'),
            KeyCode::Left => self.move_cursor(Motion::Left, 1),
            KeyCode::Right => self.move_cursor(Motion::Right, 1),
            KeyCode::Up => self.move_cursor(Motion::Up, 1),
            KeyCode::Down => self.move_cursor(Motion::Down, 1),
            KeyCode::Char(_) => {
                if let Some(ch) = key.printable() {
                    self.insert_char(ch);
                }
            }
        }
    }

    // -- Replace mode -------------------------------------------------------

    fn handle_replace(&mut self, key: KeyEvent, appending: bool) {
        let motion = match key.code {
            KeyCode::Escape => {
                self.escape_to_normal();
                return;
            }
            KeyCode::Backspace => {
                if appending {
                    // The cursor already shows on the last char.
                    self.mode = Mode::Replace { appending: false };
                } else {
                    self.move_cursor(Motion::Left, 1);
                }
                return;
            }
            KeyCode::Left => Motion::Left,
            KeyCode::Right => Motion::Right,
            KeyCode::Up => Motion::Up,
            KeyCode::Down => Motion::Down,
            _ => {
                if let Some(ch) = key.printable() {
                    self.overwrite_char(ch, appending);
                }
                return;
            }
        };
        self.mode = Mode::Replace { appending: false };
        self.move_cursor(motion, 1);
    }

    // -- Command-line mode --------------------------------------------------

    fn handle_command_line(&mut self, key: KeyEvent, host: &mut dyn Host) -> Result<Action, HostError> {
        let Mode::CommandLine(cmdline) = &mut self.mode else {
            return Ok(Action::Continue);
        };

        match key.code {
            KeyCode::Escape => self.escape_to_normal(),
            KeyCode::Enter => {
                let cmd = cmdline.parse();
                self.set_mode(Mode::Normal);
                return self.run_ex(cmd, host);
            }
            KeyCode::Backspace => {
                if !cmdline.backspace() {
                    self.set_mode(Mode::Normal);
                }
            }
            KeyCode::Delete => {
                cmdline.delete();
            }
            KeyCode::Left => cmdline.move_left(),
            KeyCode::Right => cmdline.move_right(),
            KeyCode::Tab => cmdline.insert_char('\t'),
            KeyCode::Up | KeyCode::Down => {}
            KeyCode::Char(_) => {
                if let Some(ch) = key.printable() {
                    cmdline.insert_char(ch);
                }
            }
        }

        Ok(Action::Continue)
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

/// The motion a Normal/Visual key stands for, if any. `G` takes the raw
/// count as a line number.
fn motion_for_key(key: KeyEvent, raw_count: Option<usize>) -> Option<Motion> {
    let motion = match key.code {
        KeyCode::Left => Motion::Left,
        KeyCode::Right => Motion::Right,
        KeyCode::Up => Motion::Up,
        KeyCode::Down => Motion::Down,
        KeyCode::Char(_) => match key.printable()? {
            'h' => Motion::Left,
            'l' => Motion::Right,
            'k' => Motion::Up,
            'j' => Motion::Down,
            '0' => Motion::LineStart,
            '$' => Motion::LineEnd,
            '^' => Motion::FirstNonBlank,
            'w' => Motion::WordForward,
            'b' => Motion::WordBackward,
            'G' => raw_count.map_or(Motion::DocumentBottom, |n| Motion::Line(n.saturating_sub(1))),
            _ => return None,
        },
        _ => return None,
    };
    Some(motion)
}

// ---------------------------------------------------------------------------
// Test harness
// ---------------------------------------------------------------------------


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::harness::{editor_with, feed, keys, message};
    use super::*;
    use crate::host::testing::MemoryHost;
    use pretty_assertions::assert_eq;

    fn pos(line: usize, col: usize) -> Position {
        Position::new(line, col)
    }

    // -- Construction -------------------------------------------------------

    #[test]
    fn starts_in_normal_at_origin() {
        let ed = Editor::new();
        assert_eq!(ed.mode(), &Mode::Normal);
        assert_eq!(ed.cursor(), Position::ZERO);
        assert_eq!(ed.lines(), vec![""]);
        assert!(ed.register().is_empty());
    }

    #[test]
    fn open_loads_through_host() {
        let mut host = MemoryHost::with_file("a.txt", "a\nb\nc");
        let ed = Editor::open("a.txt", &mut host).unwrap();
        assert_eq!(ed.lines(), vec!["a", "b", "c"]);
        assert_eq!(ed.buffer().name(), Some("a.txt"));
        assert!(!ed.buffer().is_modified());
    }

    #[test]
    fn open_missing_is_one_empty_line() {
        let mut host = MemoryHost::default();
        let ed = Editor::open("new.txt", &mut host).unwrap();
        assert_eq!(ed.lines(), vec![""]);
        assert_eq!(ed.buffer().name(), Some("new.txt"));
    }

    // -- Mode transitions ---------------------------------------------------

    #[test]
    fn insert_and_escape_steps_left() {
        let mut ed = editor_with("");
        keys(&mut ed, "ihello");
        assert_eq!(ed.mode(), &Mode::Insert);
        assert_eq!(ed.cursor(), pos(0, 5));
        keys(&mut ed, "<Esc>");
        assert_eq!(ed.mode(), &Mode::Normal);
        assert_eq!(ed.cursor(), pos(0, 4));
        assert_eq!(ed.lines(), vec!["hello"]);
    }

    #[test]
    fn escape_at_col_zero_stays() {
        let mut ed = editor_with("abc");
        keys(&mut ed, "i<Esc>");
        assert_eq!(ed.cursor(), pos(0, 0));
    }

    #[test]
    fn append_moves_right() {
        let mut ed = editor_with("ac");
        keys(&mut ed, "ab<Esc>");
        assert_eq!(ed.lines(), vec!["abc"]);
        assert_eq!(ed.cursor(), pos(0, 1));
    }

    #[test]
    fn append_at_line_end() {
        let mut ed = editor_with("abc");
        keys(&mut ed, "A!");
        assert_eq!(ed.cursor(), pos(0, 4));
        assert_eq!(ed.lines(), vec!["abc!"]);
    }

    #[test]
    fn insert_at_first_non_blank() {
        let mut ed = editor_with("    x");
        keys(&mut ed, "$I>");
        assert_eq!(ed.lines(), vec!["    >x"]);
    }

    #[test]
    fn open_below_and_above() {
        let mut ed = editor_with("one\ntwo");
        keys(&mut ed, "oa<Esc>");
        assert_eq!(ed.lines(), vec!["one", "a", "two"]);
        assert_eq!(ed.cursor(), pos(1, 0));
        keys(&mut ed, "Ob<Esc>");
        assert_eq!(ed.lines(), vec!["one", "b", "a", "two"]);
        assert_eq!(ed.cursor(), pos(1, 0));
    }

    #[test]
    fn colon_and_slash_enter_command_line() {
        let mut ed = editor_with("x");
        keys(&mut ed, ":");
        assert_eq!(ed.mode(), &Mode::CommandLine(CommandLine::new()));
        keys(&mut ed, "<Esc>/");
        assert_eq!(ed.mode(), &Mode::CommandLine(CommandLine::with_text("/")));
        keys(&mut ed, "<Esc>?");
        assert_eq!(ed.mode(), &Mode::CommandLine(CommandLine::with_text("?")));
        keys(&mut ed, "<Esc>");
        assert_eq!(ed.mode(), &Mode::Normal);
    }

    #[test]
    fn backspace_on_empty_command_line_leaves() {
        let mut ed = editor_with("x");
        keys(&mut ed, ":w<BS>");
        assert_eq!(ed.mode(), &Mode::CommandLine(CommandLine::new()));
        keys(&mut ed, "<BS>");
        assert_eq!(ed.mode(), &Mode::Normal);
    }

    #[test]
    fn visual_and_replace_entry() {
        let mut ed = editor_with("abc\ndef");
        keys(&mut ed, "jV");
        assert_eq!(ed.mode(), &Mode::Visual { anchor: pos(1, 0) });
        keys(&mut ed, "<Esc>R");
        assert_eq!(ed.mode(), &Mode::Replace { appending: false });
        keys(&mut ed, "<Esc>");
        assert_eq!(ed.mode(), &Mode::Normal);
    }

    #[test]
    fn undo_and_redo_report_not_implemented() {
        let mut ed = editor_with("abc");
        keys(&mut ed, "u");
        let msg = ed.take_message().unwrap();
        assert!(msg.is_error);
        assert!(msg.text.contains("not yet implemented"));
        keys(&mut ed, "<C-r>");
        assert!(message(&mut ed).unwrap().contains("not yet implemented"));
        assert_eq!(ed.lines(), vec!["abc"]);
    }

    // -- Insert mode keys ---------------------------------------------------

    #[test]
    fn enter_splits_line() {
        let mut ed = editor_with("helloworld");
        keys(&mut ed, "5li<CR>");
        assert_eq!(ed.lines(), vec!["hello", "world"]);
        assert_eq!(ed.cursor(), pos(1, 0));
    }

    #[test]
    fn backspace_joins_previous_line() {
        let mut ed = editor_with("abc\ndef");
        keys(&mut ed, "ji<BS>");
        assert_eq!(ed.lines(), vec!["abcdef"]);
        assert_eq!(ed.cursor(), pos(0, 3));
    }

    #[test]
    fn backspace_at_origin_is_noop() {
        let mut ed = editor_with("abc");
        keys(&mut ed, "i<BS>");
        assert_eq!(ed.lines(), vec!["abc"]);
        assert!(!ed.buffer().is_modified());
    }

    #[test]
    fn delete_joins_next_line_at_end() {
        let mut ed = editor_with("ab\ncd");
        keys(&mut ed, "A<Del>");
        assert_eq!(ed.lines(), vec!["abcd"]);
        keys(&mut ed, "<Esc>0i<Del>");
        assert_eq!(ed.lines(), vec!["bcd"]);
    }

    #[test]
    fn tab_and_arrows_in_insert() {
        let mut ed = editor_with("ab\ncd");
        keys(&mut ed, "i<Tab><Right><Right><Right>");
        assert_eq!(ed.lines(), vec!["\tab", "cd"]);
        assert_eq!(ed.cursor(), pos(0, 3));
        keys(&mut ed, "<Down>");
        assert_eq!(ed.cursor(), pos(1, 2));
    }

    #[test]
    fn ctrl_keys_do_not_insert() {
        let mut ed = editor_with("");
        keys(&mut ed, "i<C-x>a");
        assert_eq!(ed.lines(), vec!["a"]);
    }

    // -- Replace mode -------------------------------------------------------

    #[test]
    fn replace_overwrites_and_appends() {
        let mut ed = editor_with("abc");
        keys(&mut ed, "lRXYZW");
        assert_eq!(ed.lines(), vec!["aXYZW"]);
        keys(&mut ed, "<Esc>");
        assert_eq!(ed.mode(), &Mode::Normal);
        assert_eq!(ed.cursor(), pos(0, 4));
    }

    #[test]
    fn replace_on_empty_line_appends() {
        let mut ed = editor_with("");
        keys(&mut ed, "Rhi");
        assert_eq!(ed.lines(), vec!["hi"]);
    }

    #[test]
    fn replace_backspace_moves_left() {
        let mut ed = editor_with("abcd");
        keys(&mut ed, "RXY<BS>Z");
        assert_eq!(ed.lines(), vec!["XZcd"]);
    }

    #[test]
    fn replace_backspace_after_append_overwrites_last() {
        let mut ed = editor_with("ab");
        keys(&mut ed, "RXY<BS>Z");
        assert_eq!(ed.lines(), vec!["XZ"]);
    }

    // -- Motions ------------------------------------------------------------

    #[test]
    fn word_forward_from_origin() {
        let mut ed = editor_with("hello world\nfoo");
        keys(&mut ed, "w");
        assert_eq!(ed.cursor(), pos(0, 6));
        keys(&mut ed, "w");
        assert_eq!(ed.cursor(), pos(1, 0));
        keys(&mut ed, "b");
        assert_eq!(ed.cursor(), pos(0, 10));
    }

    #[test]
    fn huge_counted_word_motions_stop_at_edges() {
        let mut ed = editor_with("hello world\nfoo");
        keys(&mut ed, "200000000w");
        assert_eq!(ed.cursor(), pos(1, 2));
        keys(&mut ed, "99999999999999999999b");
        assert_eq!(ed.cursor(), pos(0, 0));
        assert_eq!(ed.lines(), vec!["hello world", "foo"]);
    }

    #[test]
    fn hjkl_with_counts() {
        let mut ed = editor_with("abcdef\nabcdef\nabcdef\nabcdef");
        keys(&mut ed, "3l2j");
        assert_eq!(ed.cursor(), pos(2, 3));
        keys(&mut ed, "10k");
        assert_eq!(ed.cursor(), pos(0, 3));
        keys(&mut ed, "h");
        assert_eq!(ed.cursor(), pos(0, 2));
    }

    #[test]
    fn zero_is_motion_without_count() {
        let mut ed = editor_with(&"x".repeat(20));
        keys(&mut ed, "$0");
        assert_eq!(ed.cursor(), pos(0, 0));
        keys(&mut ed, "10l");
        assert_eq!(ed.cursor(), pos(0, 10));
    }

    #[test]
    fn line_end_and_first_non_blank() {
        let mut ed = editor_with("   abc");
        keys(&mut ed, "$");
        assert_eq!(ed.cursor(), pos(0, 5));
        keys(&mut ed, "^");
        assert_eq!(ed.cursor(), pos(0, 3));
    }

    #[test]
    fn document_motions_and_counted_jumps() {
        let text = (1..=10).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
        let mut ed = editor_with(&text);
        keys(&mut ed, "G");
        assert_eq!(ed.cursor(), pos(9, 0));
        keys(&mut ed, "gg");
        assert_eq!(ed.cursor(), pos(0, 0));
        keys(&mut ed, "4G");
        assert_eq!(ed.cursor(), pos(3, 0));
        keys(&mut ed, "7gg");
        assert_eq!(ed.cursor(), pos(6, 0));
        keys(&mut ed, "99G");
        assert_eq!(ed.cursor(), pos(9, 0));
    }

    #[test]
    fn g_then_other_key_cancels() {
        let mut ed = editor_with("a\nb\nc");
        keys(&mut ed, "Ggj");
        assert_eq!(ed.cursor(), pos(2, 0));
        keys(&mut ed, "k");
        assert_eq!(ed.cursor(), pos(1, 0));
    }

    #[test]
    fn escape_clears_count() {
        let mut ed = editor_with("abcdef");
        keys(&mut ed, "3<Esc>l");
        assert_eq!(ed.cursor(), pos(0, 1));
    }

    // -- Two-key resolution -------------------------------------------------

    #[test]
    fn escape_cancels_pending_operator() {
        let mut ed = editor_with("one\ntwo");
        keys(&mut ed, "d<Esc>d");
        assert_eq!(ed.lines(), vec!["one", "two"]);
    }

    #[test]
    fn mismatched_second_key_cancels() {
        let mut ed = editor_with("one two\nthree");
        keys(&mut ed, "dw");
        assert_eq!(ed.lines(), vec!["one two", "three"]);
        assert_eq!(ed.cursor(), pos(0, 0));
        keys(&mut ed, "dy");
        assert!(ed.register().is_empty());
        keys(&mut ed, "yy");
        assert_eq!(ed.register(), ["one two"]);
        assert_eq!(ed.lines(), vec!["one two", "three"]);
    }

    // -- Visual mode --------------------------------------------------------

    #[test]
    fn visual_delete_is_linewise() {
        let mut ed = editor_with("a\nb\nc\nd");
        keys(&mut ed, "jvjd");
        assert_eq!(ed.lines(), vec!["a", "d"]);
        assert_eq!(ed.register(), ["b", "c"]);
        assert_eq!(ed.cursor(), pos(1, 0));
        assert_eq!(ed.mode(), &Mode::Normal);
    }

    #[test]
    fn visual_selection_upward() {
        let mut ed = editor_with("a\nb\nc\nd");
        keys(&mut ed, "GVkkx");
        assert_eq!(ed.lines(), vec!["a"]);
        assert_eq!(ed.register(), ["b", "c", "d"]);
        assert_eq!(ed.cursor(), pos(0, 0));
    }

    #[test]
    fn visual_yank_moves_to_start() {
        let mut ed = editor_with("a\nb\nc");
        keys(&mut ed, "Vjjy");
        assert_eq!(ed.register(), ["a", "b", "c"]);
        assert_eq!(ed.cursor(), pos(0, 0));
        assert_eq!(ed.mode(), &Mode::Normal);
        assert!(!ed.buffer().is_modified());
    }

    #[test]
    fn visual_escape_has_no_effect() {
        let mut ed = editor_with("a\nb");
        keys(&mut ed, "Vj<Esc>");
        assert_eq!(ed.lines(), vec!["a", "b"]);
        assert_eq!(ed.cursor(), pos(1, 0));
        assert!(ed.register().is_empty());
    }

    #[test]
    fn visual_gg_and_counts() {
        let mut ed = editor_with("a\nb\nc\nd");
        keys(&mut ed, "GVggy");
        assert_eq!(ed.register(), ["a", "b", "c", "d"]);
        keys(&mut ed, "V2jd");
        assert_eq!(ed.lines(), vec!["d"]);
    }

    // -- Status -------------------------------------------------------------

    #[test]
    fn status_is_one_indexed() {
        let mut ed = editor_with("abc\ndef");
        ed.set_name("f.txt");
        keys(&mut ed, "jlx");
        let status = ed.status();
        assert_eq!(status.mode, "NORMAL");
        assert_eq!(status.name.as_deref(), Some("f.txt"));
        assert!(status.modified);
        assert_eq!((status.line, status.col), (2, 2));
        assert_eq!(status.total_lines, 2);
    }

    #[test]
    fn messages_are_one_shot() {
        let mut ed = editor_with("abc");
        keys(&mut ed, "u");
        assert!(ed.take_message().is_some());
        assert!(ed.take_message().is_none());
    }

    // -- Invariants ---------------------------------------------------------

    #[test]
    fn cursor_stays_in_bounds_for_mixed_input() {
        let mut ed = editor_with("hello world\n\nfoo bar baz\nx");
        let mut host = MemoryHost::default();
        let script = "$jjwwwddxxxpPGx0J3ddAabc<Esc>Vkd$Rzzzz<Esc>oq<Esc>kkkkx";
        for key in crate::key::parse_keys(script).unwrap() {
            ed.handle_key(key, &mut host).unwrap();
            let cur = ed.cursor();
            assert!(cur.line < ed.buffer().line_count(), "line out of bounds: {cur:?}");
            let len = ed.buffer().line_len(cur.line);
            let max = if ed.mode().cursor_past_end() { len } else { len.saturating_sub(1) };
            assert!(cur.col <= max, "col out of bounds: {cur:?} max {max}");
            assert!(ed.buffer().line_count() >= 1);
        }
    }

    #[test]
    fn feed_reports_quit() {
        let mut ed = editor_with("");
        let mut host = MemoryHost::default();
        assert_eq!(feed(&mut ed, &mut host, ":q!<CR>"), Action::Quit);
        assert_eq!(host.exits, 1);
    }
}
