//! `OutputBuffer`: Single-syscall output buffer for one progress frame.

use crate::format::Colors;
use crossterm::cursor;
use crossterm::queue;
use crossterm::style::{ResetColor, SetBackgroundColor, SetForegroundColor};
use std::io::Write;

/// Cursor-left control character.
pub const BACKSPACE: u8 = 0x08;

/// Pre-allocated buffer for building a frame.
///
/// All output of a tick is accumulated here, then flushed in a single
/// `write()` call so the terminal never shows a half-drawn bar.
pub struct OutputBuffer {
    data: Vec<u8>,
}

impl OutputBuffer {
    /// Create a new output buffer with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Create a buffer sized for a single progress line.
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Clear the buffer for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Get the buffer contents.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Get the buffer length.
    #[inline]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if buffer is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Write a string.
    #[inline]
    pub fn write_str(&mut self, s: &str) {
        self.data.extend_from_slice(s.as_bytes());
    }

    /// Move the cursor `count` columns to the left using backspaces.
    #[inline]
    pub fn cursor_back(&mut self, count: usize) {
        self.data.resize(self.data.len() + count, BACKSPACE);
    }

    /// Write `count` blank columns.
    #[inline]
    pub fn spaces(&mut self, count: usize) {
        self.data.resize(self.data.len() + count, b' ');
    }

    /// Write a line break.
    #[inline]
    pub fn newline(&mut self) {
        self.data.push(b'\n');
    }

    /// Apply the given colors. Returns `true` if any color was emitted.
    pub fn set_colors(&mut self, colors: Colors) -> bool {
        if let Some(bg) = colors.bg {
            let _ = queue!(self.data, SetBackgroundColor(bg));
        }
        if let Some(fg) = colors.fg {
            let _ = queue!(self.data, SetForegroundColor(fg));
        }
        colors.is_set()
    }

    /// Reset colors to the terminal defaults.
    #[inline]
    pub fn reset_colors(&mut self) {
        let _ = queue!(self.data, ResetColor);
    }

    /// Hide cursor.
    #[inline]
    pub fn cursor_hide(&mut self) {
        let _ = queue!(self.data, cursor::Hide);
    }

    /// Show cursor.
    #[inline]
    pub fn cursor_show(&mut self) {
        let _ = queue!(self.data, cursor::Show);
    }

    /// Flush to a writer in a single syscall.
    ///
    /// Empty buffers are not written at all.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn flush_to<W: Write + ?Sized>(&self, writer: &mut W) -> std::io::Result<()> {
        if self.data.is_empty() {
            return Ok(());
        }
        writer.write_all(&self.data)?;
        writer.flush()
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}
