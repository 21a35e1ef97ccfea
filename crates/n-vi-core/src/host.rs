//! Host: the collaborators the editor calls out to.
//!
//! The engine never touches the file system or the surrounding shell
//! directly. Loading initial content, persisting a save and handing control
//! back on quit all go through a [`Host`]. Calls are synchronous: when
//! `save` returns, the write is complete.

use std::io;

use thiserror::Error;

/// Failure reported by a [`Host`].
#[derive(Debug, Error)]
pub enum HostError {
    /// Reading or writing the named buffer failed.
    #[error("{name}: {source}")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },
    /// The host refused the operation.
    #[error("{0}")]
    Rejected(String),
}

impl HostError {
    /// Wrap an I/O error for the buffer called `name`.
    #[must_use]
    pub fn io(name: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            name: name.into(),
            source,
        }
    }
}

/// Collaborators for load, save and exit.
pub trait Host {
    /// Initial content for `name`. `Ok(None)` means there is nothing to
    /// load, and the editor starts with one empty line.
    ///
    /// # Errors
    ///
    /// Returns [`HostError`] if the content exists but cannot be read.
    fn load(&mut self, name: &str) -> Result<Option<String>, HostError>;

    /// Persist `text` (lines joined by `\n`) under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`HostError`] if the write fails.
    fn save(&mut self, name: &str, text: &str) -> Result<(), HostError>;

    /// Hand control back to the surrounding shell.
    fn exit(&mut self);
}
