//! Host configuration, read from `~/.config/n-vi/config.toml`.
//!
//! Every field has a default, so a partial file is fine and a missing file
//! means the defaults. A file that does not parse is reported by the caller
//! and then ignored.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Settings for the headless host.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `tracing` filter used when `RUST_LOG` is not set.
    pub log_level: String,

    /// Print the status line after the last key.
    pub show_status: bool,

    /// Print each message the editor produces.
    pub echo_messages: bool,

    /// Print the final buffer text to stdout.
    pub print_buffer: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            show_status: true,
            echo_messages: true,
            print_buffer: false,
        }
    }
}

impl Config {
    /// `<config dir>/n-vi/config.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("n-vi").join("config.toml"))
    }

    /// Read the config at `path`. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Fails if the file exists but cannot be read or is not valid TOML.
    pub fn load_from(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => {
                return Err(err).with_context(|| format!("failed to read {}", path.display()));
            }
        };
        toml::from_str(&text).with_context(|| format!("invalid config in {}", path.display()))
    }
}
