//! Vi-style modal editing.
//!
//! The editor is always in exactly one [`Mode`]. Each mode changes how input
//! is interpreted and how far right the cursor may go:
//!
//! | Mode        | Cursor limit         | Purpose                 |
//! |-------------|----------------------|-------------------------|
//! | Normal      | `0..=len-1`          | Navigation, commands    |
//! | Insert      | `0..=len`            | Typing text             |
//! | Visual      | `0..=len-1`          | Line-wise selection     |
//! | Replace     | `0..=len-1`          | Overwriting text        |
//! | CommandLine | (in the command line) | `:` commands, `/` `?` |
//!
//! Per-mode state travels with the variant: the Visual anchor, Replace's
//! append flag and the command-line text are created on entry and dropped
//! on exit.

use std::fmt;

use crate::command::CommandLine;
use crate::position::Position;

/// The current editing mode.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Keys are commands, not text input.
    #[default]
    Normal,
    /// Keys produce characters in the buffer.
    Insert,
    /// Line-wise selection between `anchor` and the cursor.
    Visual { anchor: Position },
    /// `R`: continuous overwrite until Escape. `appending` turns on once the
    /// last character of the line has been overwritten; from then on typed
    /// characters are appended.
    Replace { appending: bool },
    /// `:`, `/` or `?` input.
    CommandLine(CommandLine),
}

impl Mode {
    /// Name for the status line.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Insert => "INSERT",
            Self::Visual { .. } => "VISUAL LINE",
            Self::Replace { .. } => "REPLACE",
            Self::CommandLine(_) => "COMMAND",
        }
    }

    /// True if the cursor can sit one past the last char.
    #[inline]
    #[must_use]
    pub const fn cursor_past_end(&self) -> bool {
        matches!(self, Self::Insert)
    }

}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
