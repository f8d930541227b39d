//! Terminal module: where rendered frames go.
//!
//! - [`Output`]: a writable sink that knows whether it is attached to a terminal
//! - [`OutputBuffer`]: per-frame byte buffer flushed in one write
//! - [`CaptureOutput`]: in-memory sink for tests and embedding

mod output;

pub use output::{OutputBuffer, BACKSPACE};

use crossterm::tty::IsTty;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

/// A destination for progress frames.
///
/// Progress displays only draw on interactive terminals. When the sink is
/// redirected to a file or a pipe, nothing is scheduled and nothing is written.
pub trait Output: Write + Send + 'static {
    /// Whether this sink is an interactive terminal.
    fn is_interactive(&self) -> bool;
}

impl Output for io::Stdout {
    fn is_interactive(&self) -> bool {
        self.is_tty()
    }
}

impl Output for io::Stderr {
    fn is_interactive(&self) -> bool {
        self.is_tty()
    }
}

/// An in-memory [`Output`] whose clones share one byte buffer.
///
/// Hand one clone to a progress bar and keep another to inspect what was
/// written.
#[derive(Debug, Clone)]
pub struct CaptureOutput {
    data: Arc<Mutex<Vec<u8>>>,
    interactive: bool,
}

impl CaptureOutput {
    /// A capture that behaves like an interactive terminal.
    pub fn new() -> Self {
        Self {
            data: Arc::default(),
            interactive: true,
        }
    }

    /// A capture that behaves like redirected output.
    pub fn redirected() -> Self {
        Self {
            data: Arc::default(),
            interactive: false,
        }
    }

    /// Copy of everything written so far.
    pub fn contents(&self) -> Vec<u8> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Everything written so far, lossily decoded.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.contents()).into_owned()
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.data.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for CaptureOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for CaptureOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.data
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Output for CaptureOutput {
    fn is_interactive(&self) -> bool {
        self.interactive
    }
}
