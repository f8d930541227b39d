//! Message types for actor communication.

/// Commands sent to a clock thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockCommand {
    /// Stop ticking and exit the clock thread.
    Dispose,
}

/// Where a clock is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockPhase {
    /// The clock thread is alive and ticking.
    Running,
    /// The clock never started because output is not interactive
    /// (or the thread could not be spawned).
    Inactive,
    /// The tick loop ended on its own; `dispose` has not been called yet.
    Stopped,
    /// `dispose` has been called.
    Disposed,
}
