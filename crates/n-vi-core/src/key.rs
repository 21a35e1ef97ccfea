//! Key events and vim-style key notation.
//!
//! The editor consumes a stream of [`KeyEvent`]s: a logical key plus
//! modifier flags. Hosts that read scripted input turn notation like
//! `ihello<Esc>:wq<CR>` into events with [`parse_keys`].
//!
//! # Notation
//!
//! | Notation             | Key                  |
//! |----------------------|----------------------|
//! | any other char       | that character       |
//! | `<Esc>`              | Escape               |
//! | `<CR>` / `<Enter>`   | Enter                |
//! | `<BS>`               | Backspace            |
//! | `<Del>`              | Delete               |
//! | `<Tab>`              | Tab                  |
//! | `<Space>`            | `' '`                |
//! | `<Left>` `<Right>` `<Up>` `<Down>` | arrows |
//! | `<lt>`               | a literal `<`        |
//! | `<C-x>`              | Ctrl + `x`           |
//!
//! Names inside `<...>` are case-insensitive. A raw newline in the input is
//! Enter, a raw tab is Tab, and a raw carriage return is skipped.

use std::fmt;

use bitflags::bitflags;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

/// Identity of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A Unicode character.
    Char(char),
    Enter,
    Tab,
    Backspace,
    Escape,
    Delete,
    Up,
    Down,
    Left,
    Right,
}

bitflags! {
    /// Keyboard modifier flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0000_0001;
        const ALT   = 0b0000_0010;
        const CTRL  = 0b0000_0100;
    }
}

/// A key press: key identity plus active modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// A key with explicit modifiers.
    #[inline]
    #[must_use]
    pub const fn new(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    /// An unmodified character key.
    #[inline]
    #[must_use]
    pub const fn char(ch: char) -> Self {
        Self::new(KeyCode::Char(ch), Modifiers::empty())
    }

    /// Ctrl + `ch`.
    #[inline]
    #[must_use]
    pub const fn ctrl(ch: char) -> Self {
        Self::new(KeyCode::Char(ch), Modifiers::CTRL)
    }

    /// True if this is Ctrl + `ch` (case-insensitive).
    #[must_use]
    pub fn is_ctrl(&self, ch: char) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
            && matches!(self.code, KeyCode::Char(c) if c.eq_ignore_ascii_case(&ch))
    }

    /// The character this key types, if it is a printable key without Ctrl
    /// or Alt held.
    #[must_use]
    pub fn printable(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(ch)
                if !ch.is_control() && !self.modifiers.intersects(Modifiers::CTRL | Modifiers::ALT) =>
            {
                Some(ch)
            }
            _ => None,
        }
    }
}

impl From<KeyCode> for KeyEvent {
    fn from(code: KeyCode) -> Self {
        Self::new(code, Modifiers::empty())
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.code {
            KeyCode::Char(ch) if self.modifiers.contains(Modifiers::CTRL) => {
                return write!(f, "<C-{ch}>");
            }
            KeyCode::Char('<') => "<lt>",
            KeyCode::Char(' ') => "<Space>",
            KeyCode::Char(ch) => return write!(f, "{ch}"),
            KeyCode::Enter => "<CR>",
            KeyCode::Tab => "<Tab>",
            KeyCode::Backspace => "<BS>",
            KeyCode::Escape => "<Esc>",
            KeyCode::Delete => "<Del>",
            KeyCode::Up => "<Up>",
            KeyCode::Down => "<Down>",
            KeyCode::Left => "<Left>",
            KeyCode::Right => "<Right>",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Notation parser
// ---------------------------------------------------------------------------

/// Malformed key notation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyParseError {
    /// A `<` with no closing `>`.
    #[error("unterminated key name starting at offset {offset}")]
    Unterminated { offset: usize },
    /// A `<...>` group naming no known key.
    #[error("unknown key name <{name}>")]
    UnknownKey { name: String },
}

/// Parse vim-style key notation into key events.
///
/// # Errors
///
/// Returns [`KeyParseError`] for an unterminated `<` group or an unknown
/// key name.
pub fn parse_keys(notation: &str) -> Result<Vec<KeyEvent>, KeyParseError> {
    let mut keys = Vec::with_capacity(notation.len());
    let mut rest = notation;

    while let Some(ch) = rest.chars().next() {
        let offset = notation.len() - rest.len();
        match ch {
            '<' => {
                let Some(close) = rest.find('>') else {
                    return Err(KeyParseError::Unterminated { offset });
                };
                keys.push(parse_named(&rest[1..close])?);
                rest = &rest[close + 1..];
                continue;
            }
            '\n' => keys.push(KeyCode::Enter.into()),
            '\t' => keys.push(KeyCode::Tab.into()),
            '\r' => {}
            _ => keys.push(KeyEvent::char(ch)),
        }
        rest = &rest[ch.len_utf8()..];
    }

    Ok(keys)
}

/// Resolve the name inside `<...>`.
fn parse_named(name: &str) -> Result<KeyEvent, KeyParseError> {
    let lower = name.to_ascii_lowercase();

    if let Some(key) = lower.strip_prefix("c-") {
        let mut chars = key.chars();
        if let (Some(ch), None) = (chars.next(), chars.next()) {
            return Ok(KeyEvent::ctrl(ch));
        }
    }

    let code = match lower.as_str() {
        "esc" => KeyCode::Escape,
        "cr" | "enter" => KeyCode::Enter,
        "bs" => KeyCode::Backspace,
        "del" => KeyCode::Delete,
        "tab" => KeyCode::Tab,
        "space" => KeyCode::Char(' '),
        "lt" => KeyCode::Char('<'),
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        _ => {
            return Err(KeyParseError::UnknownKey {
                name: name.to_string(),
            });
        }
    };
    Ok(code.into())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
