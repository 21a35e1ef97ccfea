//! Status line and messages: what the editor reports back to its host.
//!
//! [`StatusLine`] is a snapshot recomputed from the editor on demand. A
//! [`Message`] is one-shot: the editor holds at most one, and the host
//! takes it after each key.

use std::fmt;

/// A snapshot of the editor's visible state.
///
/// Line and column are **1-indexed**, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub mode: &'static str,
    pub name: Option<String>,
    pub modified: bool,
    pub line: usize,
    pub col: usize,
    pub total_lines: usize,
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "-- {} -- {}", self.mode, self.name.as_deref().unwrap_or("[No Name]"))?;
        if self.modified {
            f.write_str(" [+]")?;
        }
        write!(f, "  {}:{}  {} lines", self.line, self.col, self.total_lines)
    }
}

/// A one-shot message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub is_error: bool,
}

impl Message {
    /// An informational message.
    #[must_use]
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    /// An error message.
    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
