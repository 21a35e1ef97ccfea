//! # n-vi-core: editing engine for n-vi
//!
//! A headless, line-oriented modal editor. The host feeds [`KeyEvent`]s to an
//! [`Editor`] one at a time and reads back the buffer, cursor, mode, status
//! line and one-shot messages. Loading, saving and quitting go through the
//! [`Host`] trait, so the engine never touches the file system itself.
//!
//! - **[`position`]**: `Position` (line, col) and `LineSpan`, 0-indexed
//! - **[`buffer`]**: the rope-backed line buffer with name and modified flag
//! - **[`cursor`]**, **[`motion`]**, **[`word`]**: cursor clamping and motions
//! - **[`mode`]**: Normal, Insert, Visual line, Replace and command-line modes
//! - **[`editor`]**: the key state machine, operators and `:` commands
//! - **[`command`]**: command-line input and ex command parsing
//! - **[`key`]**: key events and the `<Esc>`-style key notation
//! - **[`search`]**, **[`register`]**, **[`status`]**, **[`host`]**

pub mod buffer;
pub mod command;
pub mod cursor;
pub mod editor;
pub mod host;
pub mod key;
pub mod mode;
pub mod motion;
pub mod position;
pub mod register;
pub mod search;
pub mod status;
pub mod word;

pub use editor::{Action, Editor};
pub use host::{Host, HostError};
pub use key::{KeyCode, KeyEvent, KeyParseError, Modifiers, parse_keys};
pub use mode::Mode;
pub use position::Position;
pub use status::{Message, StatusLine};
