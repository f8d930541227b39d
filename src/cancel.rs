//! Cancellation signal for indefinite loops such as the marquee.
//!
//! The signal is the disconnection of a crossbeam channel that never carries
//! a message: once the last sender is gone every receiver sees it, at once
//! and for good.

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Create a linked handle/token pair.
pub fn cancellation() -> (CancelHandle, CancelToken) {
    let (sender, signal) = bounded(0);
    (
        CancelHandle {
            sender: Arc::new(Mutex::new(Some(sender))),
        },
        CancelToken { signal },
    )
}

/// Requests cancellation. Clones share the same signal.
///
/// Dropping every clone of the handle also cancels.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    sender: Arc<Mutex<Option<Sender<()>>>>,
}

impl CancelHandle {
    /// Signal cancellation. Calling it again has no effect.
    pub fn cancel(&self) {
        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }

    /// Whether [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

/// Observes cancellation.
#[derive(Debug, Clone)]
pub struct CancelToken {
    signal: Receiver<()>,
}

impl CancelToken {
    /// Whether cancellation has been signalled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self.signal.try_recv(), Err(TryRecvError::Disconnected))
    }

    /// Wait up to `timeout`. Returns `true` if cancelled.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        matches!(
            self.signal.recv_timeout(timeout),
            Err(RecvTimeoutError::Disconnected)
        )
    }

    /// Block until cancelled.
    pub fn wait(&self) {
        while self.signal.recv().is_ok() {}
    }
}
