//! Colon commands and search.
//!
//! [`Editor::run_ex`] applies a parsed [`ExCommand`]. The command line has
//! already been closed by the time it runs, so every branch ends in Normal
//! mode unless it quits.
//!
//! Substitution patterns are literal text. They are escaped and compiled
//! with `regex` so the `i` flag can use the engine's Unicode case folding.

use regex::{NoExpand, RegexBuilder};
use tracing::{debug, info, warn};

use crate::command::{CmdRange, ExCommand, SetOption, SubFlags};
use crate::host::{Host, HostError};
use crate::motion::Motion;
use crate::position::{LineSpan, Position};
use crate::search::{self, SearchDirection};

use super::{Action, Editor};

impl Editor {
    /// Apply a parsed command line.
    pub(super) fn run_ex(&mut self, cmd: ExCommand, host: &mut dyn Host) -> Result<Action, HostError> {
        debug!(?cmd, "ex command");

        match cmd {
            ExCommand::Empty => {}
            ExCommand::GotoLine(line) => self.move_cursor(Motion::Line(line.saturating_sub(1)), 1),
            ExCommand::Write(name) => {
                self.write(name, host)?;
            }
            ExCommand::Quit => {
                if self.buffer.is_modified() {
                    self.set_error("E37: No write since last change (add ! to override)");
                } else {
                    return Ok(self.quit(host));
                }
            }
            ExCommand::ForceQuit => return Ok(self.quit(host)),
            ExCommand::WriteQuit | ExCommand::ForceWriteQuit => {
                if self.write(None, host)? {
                    return Ok(self.quit(host));
                }
            }
            ExCommand::Search { direction, pattern } => self.search_command(direction, pattern),
            ExCommand::Substitute {
                range,
                pattern,
                replacement,
                flags,
            } => self.substitute(range, &pattern, &replacement, flags),
            ExCommand::Set(option) => self.set_option(option),
            ExCommand::Unknown(input) => self.set_error(format!("E492: Not an editor command: {input}")),
        }

        Ok(Action::Continue)
    }

    fn quit(&mut self, host: &mut dyn Host) -> Action {
        debug!(modified = self.buffer.is_modified(), "exit requested");
        host.exit();
        Action::Quit
    }

    // -- Write --------------------------------------------------------------

    /// Save through the host, optionally under a new name that the buffer
    /// then adopts. Returns `Ok(false)` when there is no name to save under.
    fn write(&mut self, name: Option<String>, host: &mut dyn Host) -> Result<bool, HostError> {
        let Some(name) = name.or_else(|| self.buffer.name().map(str::to_string)) else {
            self.set_error("E32: No file name");
            return Ok(false);
        };

        let text = self.buffer.contents();
        if let Err(err) = host.save(&name, &text) {
            warn!(name, error = %err, "save failed");
            self.set_error(format!("E212: Can't save file: {err}"));
            return Err(err);
        }

        let lines = self.buffer.line_count();
        let chars = text.chars().count();
        info!(name, lines, chars, "buffer written");

        self.buffer.set_name(name.as_str());
        self.buffer.mark_saved();
        self.set_message(format!("\"{name}\" {lines}L, {chars}C written"));
        Ok(true)
    }

    // -- Search -------------------------------------------------------------

    /// `/pattern` or `?pattern`: remember the pattern, then jump.
    fn search_command(&mut self, direction: SearchDirection, pattern: String) {
        if pattern.is_empty() {
            self.set_error("E35: No previous regular expression");
            return;
        }
        self.search.set_pattern(pattern);
        self.search_repeat(direction, 1);
    }

    /// `n` / `N`: jump `count` matches in `direction` using the last
    /// pattern. The cursor only moves if every step finds a match.
    pub(super) fn search_repeat(&mut self, direction: SearchDirection, count: usize) {
        let Some(pattern) = self.search.pattern().map(str::to_string) else {
            self.set_error("E35: No previous regular expression");
            return;
        };

        let mut at = self.cursor.position();
        for _ in 0..count.max(1) {
            let from = match direction {
                SearchDirection::Forward => Position::new(at.line, at.col + 1),
                SearchDirection::Backward => at,
            };
            match search::find(&self.buffer, &pattern, from, direction) {
                Some(hit) => at = hit,
                None => {
                    self.set_error(format!("E486: Pattern not found: {pattern}"));
                    return;
                }
            }
        }

        self.move_cursor_to(at);
        self.set_message(format!("\"{pattern}\" found at {at}"));
    }

    // -- Substitute ---------------------------------------------------------

    fn substitute(&mut self, range: CmdRange, pattern: &str, replacement: &str, flags: SubFlags) {
        if pattern.is_empty() {
            self.set_error("E35: No previous regular expression");
            return;
        }

        let line_count = self.buffer.line_count();
        let span = match range {
            CmdRange::CurrentLine => LineSpan::ordered(self.cursor.line(), self.cursor.line()),
            CmdRange::All => LineSpan::ordered(0, line_count - 1),
            CmdRange::Lines(span) if span.first < line_count => span.clamped(line_count),
            CmdRange::Lines(_) => {
                self.set_error("E16: Invalid range");
                return;
            }
        };

        let regex = match RegexBuilder::new(&regex::escape(pattern))
            .case_insensitive(flags.case_insensitive)
            .build()
        {
            Ok(regex) => regex,
            Err(err) => {
                self.set_error(format!("E383: Invalid search string: {err}"));
                return;
            }
        };
        let limit = if flags.global { 0 } else { 1 };

        let mut changed = 0usize;
        for line in span.first..=span.last {
            let Some(text) = self.buffer.line(line) else {
                continue;
            };
            if !regex.is_match(&text) {
                continue;
            }
            let replaced = regex.replacen(&text, limit, NoExpand(replacement));
            self.buffer.set_line(line, &replaced);
            changed += 1;
        }

        debug!(pattern, replacement, changed, "substitute");

        if changed == 0 {
            self.set_error("Pattern not found");
        } else if range == CmdRange::CurrentLine {
            self.set_message("1 substitution");
        } else if changed == 1 {
            self.set_message("1 line changed");
        } else {
            self.set_message(format!("{changed} lines changed"));
        }
    }

    // -- Set ----------------------------------------------------------------

    fn set_option(&mut self, option: SetOption) {
        match option {
            SetOption::Number => self.set_message("Line numbers are always shown"),
            SetOption::NoNumber => self.set_message("Line numbers cannot be hidden"),
            SetOption::Unknown(arg) => self.set_error(format!("E518: Unknown option: {arg}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
