//! Clock Actor: Dedicated thread driving periodic redraws.
//!
//! The clock waits `interval` on a control channel. When the wait times out
//! it runs the tick handler once and only then waits again, so ticks never
//! overlap and a slow handler delays the next tick instead of queueing it.
//! A [`ClockCommand::Dispose`] (or a dropped control sender) ends the loop.

use super::messages::{ClockCommand, ClockPhase};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use std::ops::ControlFlow;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};

enum ClockState {
    Running {
        control: Sender<ClockCommand>,
        handle: JoinHandle<()>,
    },
    Inactive,
    Disposed,
}

/// A cancellable, self-rescheduling render timer.
///
/// Disposal is idempotent. When [`dispose`](Self::dispose) returns on a
/// thread other than the clock's own, the tick handler is not running and
/// will never run again.
pub struct RenderClock {
    state: Mutex<ClockState>,
}

impl RenderClock {
    /// Start a clock that calls `on_tick` every `interval`.
    ///
    /// The handler receives the tick number (starting at 0). Returning
    /// `ControlFlow::Break(())` ends the loop from inside.
    ///
    /// When `interactive` is false nothing is scheduled: the clock is created
    /// inactive and the handler is dropped without ever running.
    pub fn start<F>(interval: Duration, interactive: bool, on_tick: F) -> Self
    where
        F: FnMut(u64) -> ControlFlow<()> + Send + 'static,
    {
        if !interactive {
            debug!("output is not interactive, render clock not started");
            return Self::inactive();
        }

        // One slot is enough: a single Dispose is all the loop ever needs.
        let (control, commands) = bounded(1);

        let spawned = thread::Builder::new()
            .name("progline-clock".to_string())
            .spawn(move || {
                Self::run_loop(&commands, interval, on_tick);
            });

        match spawned {
            Ok(handle) => {
                debug!(?interval, "render clock started");
                Self {
                    state: Mutex::new(ClockState::Running { control, handle }),
                }
            }
            Err(error) => {
                warn!(%error, "failed to spawn render clock thread");
                Self::inactive()
            }
        }
    }

    /// A clock that never ticks.
    pub const fn inactive() -> Self {
        Self {
            state: Mutex::new(ClockState::Inactive),
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> ClockPhase {
        match &*self.lock() {
            ClockState::Running { handle, .. } if handle.is_finished() => ClockPhase::Stopped,
            ClockState::Running { .. } => ClockPhase::Running,
            ClockState::Inactive => ClockPhase::Inactive,
            ClockState::Disposed => ClockPhase::Disposed,
        }
    }

    /// Whether `dispose` has been called.
    pub fn is_disposed(&self) -> bool {
        matches!(*self.lock(), ClockState::Disposed)
    }

    /// Stop the clock.
    ///
    /// Returns `true` for the call that performed the teardown and `false`
    /// for every later call. Waits for an in-flight tick to finish unless
    /// called from the tick handler itself.
    pub fn dispose(&self) -> bool {
        // Take the state out first so the join below does not hold the lock.
        let previous = std::mem::replace(&mut *self.lock(), ClockState::Disposed);

        match previous {
            ClockState::Running { control, handle } => {
                let _ = control.try_send(ClockCommand::Dispose);
                drop(control);

                if handle.thread().id() == thread::current().id() {
                    debug!("render clock disposed from its own tick");
                } else if handle.join().is_err() {
                    warn!("render clock thread panicked");
                } else {
                    debug!("render clock disposed");
                }
                true
            }
            ClockState::Inactive => true,
            ClockState::Disposed => false,
        }
    }

    fn lock(&self) -> MutexGuard<'_, ClockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Main clock loop.
    fn run_loop<F>(commands: &Receiver<ClockCommand>, interval: Duration, mut on_tick: F)
    where
        F: FnMut(u64) -> ControlFlow<()>,
    {
        let mut tick = 0u64;

        loop {
            match commands.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {
                    if on_tick(tick).is_break() {
                        debug!(tick, "tick handler stopped the render clock");
                        break;
                    }
                    tick = tick.wrapping_add(1);
                }
                Ok(ClockCommand::Dispose) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    }
}

impl Drop for RenderClock {
    fn drop(&mut self) {
        self.dispose();
    }
}
