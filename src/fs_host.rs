//! [`Host`] over the real file system.

use std::fs;
use std::io;

use n_vi_core::{Host, HostError};

/// Loads and saves buffers as files named by path. `exit` only raises a flag;
/// the key loop checks it after every key.
#[derive(Debug, Default)]
pub struct FsHost {
    exit_requested: bool,
}

impl FsHost {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            exit_requested: false,
        }
    }

    #[inline]
    #[must_use]
    pub const fn exit_requested(&self) -> bool {
        self.exit_requested
    }
}

impl Host for FsHost {
    fn load(&mut self, name: &str) -> Result<Option<String>, HostError> {
        match fs::read_to_string(name) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(HostError::io(name, err)),
        }
    }

    fn save(&mut self, name: &str, text: &str) -> Result<(), HostError> {
        fs::write(name, text).map_err(|err| HostError::io(name, err))
    }

    fn exit(&mut self) {
        self.exit_requested = true;
    }
}
