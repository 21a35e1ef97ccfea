//! Command-line mode: the `:`, `/` and `?` prompt.
//!
//! Pressing `:` in Normal mode opens an empty command line; `/` and `?` open
//! one pre-filled with the search prefix. Enter parses the text into an
//! [`ExCommand`], Escape cancels.
//!
//! # Supported commands
//!
//! Rules are tried in this order; the first that matches wins.
//!
//! | Command                 | Action                                     |
//! |-------------------------|--------------------------------------------|
//! | `:N`                    | Jump to line N (1-indexed)                 |
//! | `:w` / `:w <name>`      | Save (optionally under a new name)         |
//! | `:q`                    | Quit, refused if the buffer is modified    |
//! | `:q!`                   | Quit unconditionally                       |
//! | `:wq` / `:x`            | Save, then quit if the save succeeded      |
//! | `:wq!`                  | Save, then quit                            |
//! | `/pat` / `?pat`         | Search forward / backward                  |
//! | `:[range]s/old/new/[gi]`| Literal substitution                       |
//! | `:set nu` / `:set nonu` | Line-number option (always on)             |
//!
//! Ranges for `:s` are the current line (no prefix), `%` for every line, or
//! `N,M` / `N` for 1-indexed line numbers.

use crate::position::LineSpan;
use crate::search::SearchDirection;

// ---------------------------------------------------------------------------
// Command-line range
// ---------------------------------------------------------------------------

/// An address range prefix for `:s`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmdRange {
    /// No range given.
    CurrentLine,
    /// `%`.
    All,
    /// `N,M` or `N`, converted to 0-indexed and ordered.
    Lines(LineSpan),
}

/// Flags for `:s`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SubFlags {
    /// `g`: replace every match on a line, not just the first.
    pub global: bool,
    /// `i`: case-insensitive matching.
    pub case_insensitive: bool,
}

/// The argument of `:set`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetOption {
    /// `nu` / `number`.
    Number,
    /// `nonu` / `nonumber`.
    NoNumber,
    /// Anything else.
    Unknown(String),
}

// ---------------------------------------------------------------------------
// ExCommand
// ---------------------------------------------------------------------------

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExCommand {
    /// Blank input.
    Empty,
    /// `:N`, 1-indexed as typed.
    GotoLine(usize),
    /// `:w` or `:w <name>`.
    Write(Option<String>),
    /// `:q`.
    Quit,
    /// `:q!`.
    ForceQuit,
    /// `:wq` and `:x`.
    WriteQuit,
    /// `:wq!`.
    ForceWriteQuit,
    /// `/pat` or `?pat`.
    Search {
        direction: SearchDirection,
        pattern: String,
    },
    /// `:[range]s/pattern/replacement/[flags]`.
    Substitute {
        range: CmdRange,
        pattern: String,
        replacement: String,
        flags: SubFlags,
    },
    /// `:set <option>`.
    Set(SetOption),
    /// Not a recognized command; holds the trimmed input.
    Unknown(String),
}

// ---------------------------------------------------------------------------
// CommandLine
// ---------------------------------------------------------------------------

/// The command-line input buffer: text plus a char-offset cursor.
///
/// The leading `:` is not stored. Search prompts keep their `/` or `?` as
/// the first character of the text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandLine {
    text: String,
    cursor: usize,
}

impl CommandLine {
    /// Create an empty command line.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            text: String::new(),
            cursor: 0,
        }
    }

    /// Create a command line pre-filled with `text`, cursor at the end.
    #[must_use]
    pub fn with_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            cursor: text.chars().count(),
        }
    }

    /// Insert a character at the cursor.
    pub fn insert_char(&mut self, ch: char) {
        let byte_idx = self.char_to_byte(self.cursor);
        self.text.insert(byte_idx, ch);
        self.cursor += 1;
    }

    /// Delete the character before the cursor. Returns `false` at offset 0.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let byte_idx = self.char_to_byte(self.cursor);
        self.text.remove(byte_idx);
        true
    }

    /// Delete the character under the cursor. Returns `false` at the end.
    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.text.chars().count() {
            return false;
        }
        let byte_idx = self.char_to_byte(self.cursor);
        self.text.remove(byte_idx);
        true
    }

    /// Move the cursor one char left.
    pub const fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Move the cursor one char right.
    pub fn move_right(&mut self) {
        if self.cursor < self.text.chars().count() {
            self.cursor += 1;
        }
    }

    /// Parse the text into an [`ExCommand`].
    #[must_use]
    pub fn parse(&self) -> ExCommand {
        parse_command(&self.text)
    }

    fn char_to_byte(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map_or(self.text.len(), |(byte_idx, _)| byte_idx)
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse command-line text (without a leading `:`) into an [`ExCommand`].
#[must_use]
pub fn parse_command(input: &str) -> ExCommand {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return ExCommand::Empty;
    }

    if trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return trimmed
            .parse()
            .map_or_else(|_| ExCommand::Unknown(trimmed.to_string()), ExCommand::GotoLine);
    }

    if let Some(cmd) = parse_write_quit(trimmed) {
        return cmd;
    }

    if let Some(pattern) = trimmed.strip_prefix('/') {
        return ExCommand::Search {
            direction: SearchDirection::Forward,
            pattern: pattern.to_string(),
        };
    }
    if let Some(pattern) = trimmed.strip_prefix('?') {
        return ExCommand::Search {
            direction: SearchDirection::Backward,
            pattern: pattern.to_string(),
        };
    }

    let (range, rest) = parse_range(trimmed);
    if let Some(body) = rest.strip_prefix('s') {
        if let Some(cmd) = parse_substitute(range, body) {
            return cmd;
        }
    }

    if range == CmdRange::CurrentLine {
        if let Some(arg) = trimmed.strip_prefix("set") {
            if arg.starts_with(char::is_whitespace) {
                return ExCommand::Set(parse_set(arg.trim()));
            }
        }
    }

    ExCommand::Unknown(trimmed.to_string())
}

/// `w`, `w <name>`, `q`, `q!`, `wq`, `x`, `wq!`.
fn parse_write_quit(input: &str) -> Option<ExCommand> {
    let (cmd, arg) = input
        .find(char::is_whitespace)
        .map_or((input, ""), |pos| (&input[..pos], input[pos..].trim_start()));

    let parsed = match (cmd, arg.is_empty()) {
        ("w", true) => ExCommand::Write(None),
        ("w", false) => ExCommand::Write(Some(arg.to_string())),
        ("q", true) => ExCommand::Quit,
        ("q!", true) => ExCommand::ForceQuit,
        ("wq" | "x", true) => ExCommand::WriteQuit,
        ("wq!", true) => ExCommand::ForceWriteQuit,
        _ => return None,
    };
    Some(parsed)
}

/// Parse a range prefix. Returns `(CmdRange::CurrentLine, input)` if there is
/// none.
fn parse_range(input: &str) -> (CmdRange, &str) {
    if let Some(rest) = input.strip_prefix('%') {
        return (CmdRange::All, rest);
    }

    let Some((start, rest)) = parse_line_number(input) else {
        return (CmdRange::CurrentLine, input);
    };
    let start = start.saturating_sub(1);

    if let Some(after_comma) = rest.strip_prefix(',') {
        if let Some((end, rest)) = parse_line_number(after_comma) {
            let span = LineSpan::ordered(start, end.saturating_sub(1));
            return (CmdRange::Lines(span), rest);
        }
        return (CmdRange::CurrentLine, input);
    }

    (CmdRange::Lines(LineSpan::ordered(start, start)), rest)
}

/// Parse a decimal number from the start of `input`.
fn parse_line_number(input: &str) -> Option<(usize, &str)> {
    let end = input
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(input.len());
    if end == 0 {
        return None;
    }
    let num: usize = input[..end].parse().ok()?;
    Some((num, &input[end..]))
}

/// Parse the body of `:s` (everything after the `s`).
///
/// The first character is the delimiter; it must not be alphanumeric or
/// whitespace, so `set` is never read as a substitution. `\<delim>` escapes
/// the delimiter. Missing trailing delimiters are allowed: `s/a` replaces
/// `a` with nothing.
fn parse_substitute(range: CmdRange, body: &str) -> Option<ExCommand> {
    let delim = body.chars().next()?;
    if delim.is_alphanumeric() || delim.is_whitespace() || delim == '\\' || delim == '"' {
        return None;
    }
    let after_delim = &body[delim.len_utf8()..];

    let (pattern, replacement, flags) = match split_at_unescaped(after_delim, delim) {
        None => (after_delim, "", SubFlags::default()),
        Some((pattern, rest)) => match split_at_unescaped(rest, delim) {
            None => (pattern, rest, SubFlags::default()),
            Some((replacement, flags)) => (pattern, replacement, parse_sub_flags(flags)),
        },
    };

    Some(ExCommand::Substitute {
        range,
        pattern: unescape_delim(pattern, delim),
        replacement: unescape_delim(replacement, delim),
        flags,
    })
}

/// Split at the first occurrence of `delim` not preceded by a backslash.
fn split_at_unescaped(s: &str, delim: char) -> Option<(&str, &str)> {
    let mut escaped = false;
    for (byte_idx, ch) in s.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if ch == '\\' {
            escaped = true;
            continue;
        }
        if ch == delim {
            return Some((&s[..byte_idx], &s[byte_idx + ch.len_utf8()..]));
        }
    }
    None
}

/// `\<delim>` becomes `<delim>`; every other backslash is kept literally.
fn unescape_delim(s: &str, delim: char) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\\' && chars.peek() == Some(&delim) {
            result.push(delim);
            chars.next();
        } else {
            result.push(ch);
        }
    }
    result
}

/// `g` and `i` are understood; other flag characters are ignored.
fn parse_sub_flags(s: &str) -> SubFlags {
    let mut flags = SubFlags::default();
    for ch in s.trim().chars() {
        match ch {
            'g' => flags.global = true,
            'i' => flags.case_insensitive = true,
            _ => {}
        }
    }
    flags
}

fn parse_set(arg: &str) -> SetOption {
    match arg {
        "nu" | "number" => SetOption::Number,
        "nonu" | "nonumber" => SetOption::NoNumber,
        other => SetOption::Unknown(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
