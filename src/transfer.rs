//! File Transfer Tracker: a progress bar with byte counters and stall
//! detection.
//!
//! The tracker is a [`ProgressBar`] composed with a [`TransferFormatter`]
//! (adds `received of total`) and a stall-checking tick observer. Every
//! report and every byte-count update refreshes the last-update timestamp;
//! each tick compares it against the stall threshold.
//!
//! Stall notifications are level-triggered: while no data arrives, every
//! tick past the threshold notifies again. Observers that only want one
//! notification return `ControlFlow::Break(())`, which stops the tracker.

use crate::actor::ClockPhase;
use crate::bar::{BarConfig, ProgressBar, TickObserver};
use crate::error::Result;
use crate::format::{format_line, BarStyle, Formatter};
use crate::terminal::Output;
use crossbeam_channel::{unbounded, Receiver, TrySendError};
use std::io;
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::warn;

/// Default time without updates after which a transfer counts as stalled.
pub const DEFAULT_STALL_THRESHOLD: Duration = Duration::from_secs(5);

/// Byte counters and the last-update timestamp of a transfer.
///
/// All fields are atomics, so any thread may update them while the clock
/// thread reads them.
#[derive(Debug)]
pub struct TransferState {
    file_size: u64,
    bytes_received: AtomicU64,
    origin: Instant,
    /// Nanoseconds from `origin` to the last update.
    last_update: AtomicU64,
}

impl TransferState {
    /// A transfer of `file_size` bytes with nothing received yet.
    pub fn new(file_size: u64) -> Self {
        Self {
            file_size,
            bytes_received: AtomicU64::new(0),
            origin: Instant::now(),
            last_update: AtomicU64::new(0),
        }
    }

    /// Total size of the transfer.
    #[inline]
    pub const fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Bytes received so far. May exceed the file size.
    #[inline]
    pub fn bytes_received(&self) -> u64 {
        self.bytes_received.load(Ordering::Acquire)
    }

    /// Set the received byte count and refresh the timestamp.
    pub fn set_bytes_received(&self, bytes: u64) {
        self.bytes_received.store(bytes, Ordering::Release);
        self.touch();
    }

    /// Add to the received byte count and refresh the timestamp.
    pub fn add_bytes(&self, bytes: u64) {
        self.bytes_received.fetch_add(bytes, Ordering::AcqRel);
        self.touch();
    }

    /// Record that data arrived now.
    pub fn touch(&self) {
        let nanos = u64::try_from(self.origin.elapsed().as_nanos()).unwrap_or(u64::MAX);
        self.last_update.fetch_max(nanos, Ordering::AcqRel);
    }

    /// When data last arrived.
    pub fn last_update(&self) -> Instant {
        self.origin + Duration::from_nanos(self.last_update.load(Ordering::Acquire))
    }
}

/// Formats a transfer line: bar, `received of total`, percentage, animation.
#[derive(Debug, Clone)]
pub struct TransferFormatter {
    transfer: Arc<TransferState>,
}

impl TransferFormatter {
    /// A formatter reading from `transfer`.
    pub const fn new(transfer: Arc<TransferState>) -> Self {
        Self { transfer }
    }
}

impl Formatter for TransferFormatter {
    fn format(&self, style: &BarStyle, fraction: f64, frame: usize) -> String {
        let bytes = (self.transfer.bytes_received(), self.transfer.file_size());
        format_line(style, fraction, frame, Some(bytes))
    }
}

/// Raised when no data arrived for at least the stall threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StallEvent {
    /// When data was last received.
    pub last_data_received: Instant,
    /// When the stall was detected.
    pub detected_at: Instant,
}

impl StallEvent {
    /// Time between the last data and the detection.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.detected_at.saturating_duration_since(self.last_data_received)
    }
}

/// Pure stall check against a fixed threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StallDetector {
    threshold: Duration,
}

impl StallDetector {
    /// A detector for `threshold`.
    pub const fn new(threshold: Duration) -> Self {
        Self { threshold }
    }

    /// The configured threshold.
    #[inline]
    pub const fn threshold(&self) -> Duration {
        self.threshold
    }

    /// A stall event if at least `threshold` passed between `last_update`
    /// and `now`.
    pub fn check(&self, last_update: Instant, now: Instant) -> Option<StallEvent> {
        (now.saturating_duration_since(last_update) >= self.threshold).then_some(StallEvent {
            last_data_received: last_update,
            detected_at: now,
        })
    }
}

/// Tick observer running the stall check and notifying the handler.
struct StallWatch<H> {
    transfer: Arc<TransferState>,
    detector: StallDetector,
    on_stall: H,
}

impl<H> TickObserver for StallWatch<H>
where
    H: FnMut(&StallEvent) -> ControlFlow<()> + Send + 'static,
{
    fn on_tick(&mut self, now: Instant) -> ControlFlow<()> {
        match self.detector.check(self.transfer.last_update(), now) {
            Some(event) => {
                warn!(elapsed = ?event.elapsed(), "file transfer stalled");
                (self.on_stall)(&event)
            }
            None => ControlFlow::Continue(()),
        }
    }
}

/// Configuration for a file transfer tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferConfig {
    /// Bar appearance and tick interval.
    pub bar: BarConfig,
    /// Size of the file being transferred.
    pub file_size: u64,
    /// Time without updates after which the transfer counts as stalled.
    pub stall_threshold: Duration,
}

impl TransferConfig {
    /// Defaults for a transfer of `file_size` bytes.
    pub fn new(file_size: u64) -> Self {
        Self {
            bar: BarConfig::default(),
            file_size,
            stall_threshold: DEFAULT_STALL_THRESHOLD,
        }
    }
}

/// A progress bar for file transfers.
pub struct TransferTracker {
    bar: ProgressBar,
    transfer: Arc<TransferState>,
    stall_threshold: Duration,
}

impl TransferTracker {
    /// Track a transfer on stdout with default styling. Stalls are only
    /// logged.
    pub fn new(file_size: u64, stall_threshold: Duration) -> Result<Self> {
        let config = TransferConfig {
            stall_threshold,
            ..TransferConfig::new(file_size)
        };
        Self::with_output(config, io::stdout(), |_: &StallEvent| ControlFlow::Continue(()))
    }

    /// Track a transfer on stdout, calling `on_stall` from the clock thread
    /// on every stalled tick.
    pub fn with_config<H>(config: TransferConfig, on_stall: H) -> Result<Self>
    where
        H: FnMut(&StallEvent) -> ControlFlow<()> + Send + 'static,
    {
        Self::with_output(config, io::stdout(), on_stall)
    }

    /// Track a transfer drawing on `output`.
    pub fn with_output<O, H>(config: TransferConfig, output: O, on_stall: H) -> Result<Self>
    where
        O: Output,
        H: FnMut(&StallEvent) -> ControlFlow<()> + Send + 'static,
    {
        let TransferConfig {
            bar,
            file_size,
            stall_threshold,
        } = config;

        let transfer = Arc::new(TransferState::new(file_size));
        let watch = StallWatch {
            transfer: transfer.clone(),
            detector: StallDetector::new(stall_threshold),
            on_stall,
        };
        let bar = ProgressBar::with_formatter(bar, TransferFormatter::new(transfer.clone()), watch, output)?;

        Ok(Self {
            bar,
            transfer,
            stall_threshold,
        })
    }

    /// Track a transfer drawing on `output`, delivering stall events on a
    /// channel instead of a callback.
    ///
    /// The tracker keeps running after a stall; dropping the receiver stops
    /// it at the next stalled tick.
    pub fn with_stall_channel<O: Output>(
        config: TransferConfig,
        output: O,
    ) -> Result<(Self, Receiver<StallEvent>)> {
        let (events, receiver) = unbounded();
        let tracker = Self::with_output(config, output, move |event: &StallEvent| {
            match events.try_send(*event) {
                Err(TrySendError::Disconnected(_)) => ControlFlow::Break(()),
                _ => ControlFlow::Continue(()),
            }
        })?;
        Ok((tracker, receiver))
    }

    /// Report progress; also records that data arrived.
    pub fn report(&self, value: f64) {
        self.transfer.touch();
        self.bar.report(value);
    }

    /// The latest reported fraction.
    pub fn fraction(&self) -> f64 {
        self.bar.fraction()
    }

    /// Total size of the transfer.
    pub fn file_size(&self) -> u64 {
        self.transfer.file_size()
    }

    /// Bytes received so far.
    pub fn bytes_received(&self) -> u64 {
        self.transfer.bytes_received()
    }

    /// Set the received byte count. Not validated against the file size.
    pub fn set_bytes_received(&self, bytes: u64) {
        self.transfer.set_bytes_received(bytes);
    }

    /// Add to the received byte count.
    pub fn add_bytes(&self, bytes: u64) {
        self.transfer.add_bytes(bytes);
    }

    /// When data last arrived.
    pub fn last_update(&self) -> Instant {
        self.transfer.last_update()
    }

    /// The stall threshold.
    pub const fn stall_threshold(&self) -> Duration {
        self.stall_threshold
    }

    /// Change the style; takes effect on the next tick.
    pub fn configure(&self, update: impl FnOnce(&mut BarStyle)) {
        self.bar.configure(update);
    }

    /// Lifecycle phase of the render clock.
    pub fn phase(&self) -> ClockPhase {
        self.bar.phase()
    }

    /// Whether [`dispose`](Self::dispose) has been called.
    pub fn is_disposed(&self) -> bool {
        self.bar.is_disposed()
    }

    /// Stop rendering and stall checks. Returns `false` if already disposed.
    pub fn dispose(&self) -> bool {
        self.bar.dispose()
    }
}
