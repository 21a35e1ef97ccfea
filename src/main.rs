// SPDX-License-Identifier: MIT
//
// n-vi: a headless host for the n-vi-core editing engine.
//
// The host stands in for a terminal front end. It opens one file, feeds a
// key script through the engine and reports what happened:
//
//   --keys / --script / stdin → parse_keys → Editor::handle_key
//   messages (after each key) → stdout
//   status line, buffer text  → stdout (per config)
//   logs                      → stderr
//
// Saves and quits reach the file system through FsHost.

mod config;
mod fs_host;

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use n_vi_core::{Action, Editor, KeyEvent, parse_keys};

use crate::config::Config;
use crate::fs_host::FsHost;

/// Run vi-style key sequences against a file.
#[derive(Debug, Parser)]
#[command(name = "n-vi", version, about, long_about = None)]
struct Cli {
    /// File to edit. It does not need to exist yet.
    file: Option<String>,

    /// Keys in vi notation, e.g. `dd:wq<CR>`.
    #[arg(short, long, conflicts_with = "script")]
    keys: Option<String>,

    /// Read the key script from a file instead of stdin.
    #[arg(short, long, value_name = "PATH")]
    script: Option<PathBuf>,

    /// Use this config file instead of the default location.
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, config_error) = match cli.config.clone().or_else(Config::default_path) {
        Some(path) => match Config::load_from(&path) {
            Ok(config) => (config, None),
            Err(err) => (Config::default(), Some(err)),
        },
        None => (Config::default(), None),
    };
    init_tracing(&config.log_level);
    if let Some(err) = config_error {
        warn!(error = format!("{err:#}"), "using default config");
    }

    let script = read_script(&cli)?;
    let keys = parse_keys(&script).context("invalid key script")?;

    let mut host = FsHost::new();
    let mut editor = match &cli.file {
        Some(name) => Editor::open(name, &mut host).with_context(|| format!("failed to open {name}"))?,
        None => Editor::new(),
    };

    let mut out = io::stdout().lock();
    run(&mut editor, &mut host, keys, &config, &mut out)?;
    report(&editor, &config, &mut out)?;
    out.flush().context("failed to flush stdout")?;
    Ok(())
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// The key script from `--keys`, `--script` or stdin, with one trailing
/// line break dropped (a raw newline is `<CR>`).
fn read_script(cli: &Cli) -> Result<String> {
    let mut script = if let Some(keys) = &cli.keys {
        keys.clone()
    } else if let Some(path) = &cli.script {
        fs::read_to_string(path).with_context(|| format!("failed to read script {}", path.display()))?
    } else {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read keys from stdin")?;
        text
    };

    if script.ends_with('\n') {
        script.pop();
        if script.ends_with('\r') {
            script.pop();
        }
    }
    Ok(script)
}

/// Feed keys until they run out or the editor asks to exit.
///
/// Host failures have already been reported as editor messages, so they do
/// not stop the script.
fn run(
    editor: &mut Editor,
    host: &mut FsHost,
    keys: Vec<KeyEvent>,
    config: &Config,
    out: &mut impl Write,
) -> Result<()> {
    let total = keys.len();
    for (fed, key) in keys.into_iter().enumerate() {
        let result = editor.handle_key(key, host);

        if let Some(message) = editor.take_message() {
            if config.echo_messages {
                writeln!(out, "{message}").context("failed to write message")?;
            }
        }

        match result {
            Ok(Action::Quit) => {
                debug!(fed = fed + 1, total, "stopped on quit");
                break;
            }
            Ok(Action::Continue) => {}
            Err(err) => debug!(error = %err, "host call failed"),
        }
        if host.exit_requested() {
            break;
        }
    }
    Ok(())
}

fn report(editor: &Editor, config: &Config, out: &mut impl Write) -> Result<()> {
    if config.show_status {
        writeln!(out, "{}", editor.status()).context("failed to write status")?;
    }
    if config.print_buffer {
        write!(out, "{}", editor.buffer().contents()).context("failed to write buffer")?;
        if !editor.buffer().contents().ends_with('\n') {
            writeln!(out).context("failed to write buffer")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet() -> Config {
        Config {
            show_status: false,
            ..Config::default()
        }
    }

    fn run_keys(editor: &mut Editor, host: &mut FsHost, notation: &str, config: &Config) -> String {
        let mut out = Vec::new();
        run(editor, host, parse_keys(notation).unwrap(), config, &mut out).unwrap();
        report(editor, config, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn cli_parses_keys_and_file() {
        let cli = Cli::try_parse_from(["n-vi", "notes.txt", "--keys", "dd"]).unwrap();
        assert_eq!(cli.file.as_deref(), Some("notes.txt"));
        assert_eq!(cli.keys.as_deref(), Some("dd"));
        assert!(Cli::try_parse_from(["n-vi", "-k", "x", "-s", "s.txt"]).is_err());
    }

    #[test]
    fn script_drops_one_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keys");
        fs::write(&path, "ihi\n\n").unwrap();
        let cli = Cli::try_parse_from(["n-vi", "--script", path.to_str().unwrap()]).unwrap();
        assert_eq!(read_script(&cli).unwrap(), "ihi\n");
    }

    #[test]
    fn messages_are_echoed() {
        let mut editor = Editor::new();
        let out = run_keys(&mut editor, &mut FsHost::new(), ":bogus<CR>", &quiet());
        assert_eq!(out, "E492: Not an editor command: bogus\n");
    }

    #[test]
    fn quit_stops_the_script() {
        let mut editor = Editor::from_text("abc");
        let mut host = FsHost::new();
        run_keys(&mut editor, &mut host, ":q<CR>x", &quiet());
        assert!(host.exit_requested());
        assert_eq!(editor.lines(), vec!["abc"]);
    }

    #[test]
    fn status_and_buffer_report() {
        let config = Config {
            print_buffer: true,
            echo_messages: false,
            ..Config::default()
        };
        let mut editor = Editor::from_text("a\nb");
        let out = run_keys(&mut editor, &mut FsHost::new(), "jx", &config);
        assert_eq!(out, "-- NORMAL -- [No Name] [+]  2:1  2 lines\na\n");
    }

    #[test]
    fn failed_save_keeps_going() {
        let dir = tempfile::tempdir().unwrap();
        let name = dir.path().join("missing/f.txt").to_string_lossy().into_owned();
        let mut host = FsHost::new();
        let mut editor = Editor::open(&name, &mut host).unwrap();
        let out = run_keys(&mut editor, &mut host, "ix<Esc>:w<CR>:q!<CR>", &quiet());
        assert!(out.starts_with("E212: Can't save file: "));
        assert!(host.exit_requested());
    }
}
