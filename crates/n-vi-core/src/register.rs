//! Register: the single clipboard slot for yanked and deleted text.
//!
//! Every yank (`yy`, Visual `y`) and delete (`dd`, `x`, `s`, `cc`, `S`,
//! Visual `d`) replaces the register's contents. Paste (`p`, `P`) reads it
//! without changing it. There is exactly one slot; it lives as long as the
//! editor.
//!
//! Content is stored as a list of lines. Paste always inserts whole lines,
//! so a char-wise delete like `x` lands in the register as a single line.

/// The single register slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Register {
    lines: Vec<String>,
}

impl Register {
    /// Create an empty register.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Replace the contents with `lines`.
    pub fn store(&mut self, lines: Vec<String>) {
        self.lines = lines;
    }

    /// The stored lines. Empty until the first yank or delete.
    #[inline]
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// True if nothing has been stored yet.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
