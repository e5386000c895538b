//! Status output for the installer CLI.
//!
//! User-facing text goes through a [`StatusWriter`] that couples the
//! injected stderr stream with the localiser and the quiet flag, so
//! modules emit message keys rather than formatted strings and tests can
//! capture everything in a buffer.

use crate::i18n::{Arguments, Localiser};
use std::io::Write;

/// Write a line to the given stream, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}

/// Localised status output with quiet-mode gating.
///
/// Progress messages are suppressed in quiet mode; alerts (errors and
/// security warnings) are always written.
pub struct StatusWriter<'a> {
    out: &'a mut dyn Write,
    messages: &'a Localiser,
    quiet: bool,
}

impl<'a> StatusWriter<'a> {
    /// Couple a stream, a localiser, and the quiet flag.
    pub fn new(out: &'a mut dyn Write, messages: &'a Localiser, quiet: bool) -> Self {
        Self {
            out,
            messages,
            quiet,
        }
    }

    /// The localiser behind this writer.
    #[must_use]
    pub fn messages(&self) -> &Localiser {
        self.messages
    }

    /// Whether progress output is enabled.
    #[must_use]
    pub fn progress_enabled(&self) -> bool {
        !self.quiet
    }

    /// Write the localised message for `key` as a progress line.
    pub fn say(&mut self, key: &str) {
        if !self.quiet {
            write_stderr_line(self.out, self.messages.text(key));
        }
    }

    /// Write the localised message for `key` with arguments as a
    /// progress line.
    pub fn say_with(&mut self, key: &str, args: &Arguments<'_>) {
        if !self.quiet {
            write_stderr_line(self.out, self.messages.text_with(key, args));
        }
    }

    /// Write the localised message for `key` unconditionally.
    pub fn alert(&mut self, key: &str) {
        write_stderr_line(self.out, self.messages.text(key));
    }

    /// Write the localised message for `key` with arguments
    /// unconditionally.
    pub fn alert_with(&mut self, key: &str, args: &Arguments<'_>) {
        write_stderr_line(self.out, self.messages.text_with(key, args));
    }

    /// Write a pre-formatted line unconditionally.
    pub fn line(&mut self, text: impl std::fmt::Display) {
        write_stderr_line(self.out, text);
    }

    /// Write raw text without a trailing newline (progress updates).
    pub fn raw(&mut self, text: &str) {
        if !self.quiet {
            let _ = write!(self.out, "{text}");
            let _ = self.out.flush();
        }
    }

    /// Write an empty progress line.
    pub fn blank(&mut self) {
        if !self.quiet {
            write_stderr_line(self.out, "");
        }
    }
}
