//! Progress Bar: the core render loop.
//!
//! A [`ProgressBar`] holds the latest reported fraction in an atomic, owns a
//! [`RenderClock`], and on every tick formats the line and diff-renders it.
//! Reporting never renders; output frequency is bounded by the tick interval
//! no matter how often [`ProgressBar::report`] is called.
//!
//! # Example
//!
//! ```rust,ignore
//! use progline::ProgressBar;
//!
//! let bar = ProgressBar::new();
//! for i in 0..=100 {
//!     bar.report(f64::from(i) / 100.0);
//!     std::thread::sleep(std::time::Duration::from_millis(20));
//! }
//! bar.dispose();
//! ```

use crate::actor::{ClockPhase, RenderClock};
use crate::error::{Error, Result};
use crate::format::{BarFormatter, BarStyle, Formatter};
use crate::render::LineRenderer;
use crate::terminal::{Output, OutputBuffer};
use std::io;
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Default time between redraws (8 frames per second).
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(125);

/// Clamp a reported value into `[0, 1]`. NaN counts as no progress.
#[inline]
pub fn clamp_fraction(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// The completion fraction shared between reporters and the render loop.
///
/// Stored as the bit pattern of an `f64` in one atomic word, so a read never
/// observes a partially written value.
#[derive(Debug, Default)]
pub struct ProgressState {
    bits: AtomicU64,
}

impl ProgressState {
    /// A state at 0 %.
    pub const fn new() -> Self {
        Self {
            bits: AtomicU64::new(0),
        }
    }

    /// Store a new fraction, clamped into `[0, 1]`.
    #[inline]
    pub fn report(&self, value: f64) {
        self.bits.store(clamp_fraction(value).to_bits(), Ordering::Release);
    }

    /// The latest stored fraction.
    #[inline]
    pub fn fraction(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Acquire))
    }
}

/// Hook run on the clock thread after each rendered tick.
pub trait TickObserver: Send + 'static {
    /// Called with the tick's timestamp. `Break` stops the clock.
    fn on_tick(&mut self, now: Instant) -> ControlFlow<()>;
}

impl TickObserver for () {
    fn on_tick(&mut self, _now: Instant) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

/// Configuration for a progress bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarConfig {
    /// Appearance.
    pub style: BarStyle,
    /// Time between redraws.
    pub interval: Duration,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            style: BarStyle::default(),
            interval: DEFAULT_INTERVAL,
        }
    }
}

impl BarConfig {
    /// Check that the configuration can be rendered.
    pub fn validate(&self) -> Result<()> {
        if self.interval.is_zero() {
            return Err(Error::ZeroInterval);
        }
        self.style.validate()
    }
}

/// A single-line, in-place progress bar.
///
/// Lifecycle: the clock starts at construction, ticks until
/// [`dispose`](Self::dispose) (or drop), and never ticks again afterwards.
/// The last rendered text stays on screen; report `1.0` before disposing to
/// leave a completed bar behind.
pub struct ProgressBar {
    state: Arc<ProgressState>,
    style: Arc<Mutex<BarStyle>>,
    clock: RenderClock,
}

impl ProgressBar {
    /// Create a bar with the default configuration, drawing on stdout.
    pub fn new() -> Self {
        Self::spawn(BarConfig::default(), BarFormatter, (), io::stdout())
    }

    /// Create a bar with a custom configuration, drawing on stdout.
    pub fn with_config(config: BarConfig) -> Result<Self> {
        Self::with_output(config, io::stdout())
    }

    /// Create a bar drawing on `output`.
    pub fn with_output<O: Output>(config: BarConfig, output: O) -> Result<Self> {
        Self::with_formatter(config, BarFormatter, (), output)
    }

    /// Create a bar from a custom formatter and tick observer.
    pub fn with_formatter<F, T, O>(config: BarConfig, formatter: F, observer: T, output: O) -> Result<Self>
    where
        F: Formatter,
        T: TickObserver,
        O: Output,
    {
        config.validate()?;
        Ok(Self::spawn(config, formatter, observer, output))
    }

    fn spawn<F, T, O>(config: BarConfig, formatter: F, mut observer: T, mut output: O) -> Self
    where
        F: Formatter,
        T: TickObserver,
        O: Output,
    {
        let BarConfig { style, interval } = config;
        let state = Arc::new(ProgressState::new());
        let style = Arc::new(Mutex::new(style));
        let interactive = output.is_interactive();

        let tick_state = state.clone();
        let tick_style = style.clone();
        let mut renderer = LineRenderer::new();
        let mut buffer = OutputBuffer::new();
        let mut frame = 0usize;
        let mut write_failed = false;

        let clock = RenderClock::start(interval, interactive, move |_| {
            let fraction = tick_state.fraction();
            let (text, colors) = {
                let style = lock(&tick_style);
                (formatter.format(&style, fraction, frame), style.colors)
            };
            frame = frame.wrapping_add(1);

            buffer.clear();
            renderer.render(&text, colors, &mut buffer);
            if let Err(error) = buffer.flush_to(&mut output) {
                if !write_failed {
                    warn!(%error, "failed to write progress frame");
                    write_failed = true;
                }
            }

            observer.on_tick(Instant::now())
        });

        Self { state, style, clock }
    }

    /// Report progress as a fraction in `[0, 1]`; out-of-range values are
    /// clamped.
    ///
    /// Never blocks and never draws; the next tick picks the value up.
    #[inline]
    pub fn report(&self, value: f64) {
        self.state.report(value);
    }

    /// The latest reported fraction.
    #[inline]
    pub fn fraction(&self) -> f64 {
        self.state.fraction()
    }

    /// A copy of the current style.
    pub fn style(&self) -> BarStyle {
        lock(&self.style).clone()
    }

    /// Change the style; takes effect on the next tick.
    pub fn configure(&self, update: impl FnOnce(&mut BarStyle)) {
        update(&mut lock(&self.style));
    }

    /// Lifecycle phase of the render clock.
    pub fn phase(&self) -> ClockPhase {
        self.clock.phase()
    }

    /// Whether [`dispose`](Self::dispose) has been called.
    pub fn is_disposed(&self) -> bool {
        self.clock.is_disposed()
    }

    /// Stop rendering. Returns `false` if the bar was already disposed.
    pub fn dispose(&self) -> bool {
        let disposed = self.clock.dispose();
        if disposed {
            debug!(fraction = self.fraction(), "progress bar disposed");
        }
        disposed
    }
}

impl Default for ProgressBar {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Segments;
    use crate::terminal::CaptureOutput;
    use std::thread;

    const INTERVAL: Duration = Duration::from_millis(5);

    fn fast_config() -> BarConfig {
        BarConfig {
            interval: INTERVAL,
            ..BarConfig::default()
        }
    }

    fn screen(capture: &CaptureOutput) -> String {
        let mut parser = vt100::Parser::new(1, 80, 0);
        parser.process(&capture.contents());
        parser.screen().contents().trim_end().to_string()
    }

    #[test]
    fn test_report_clamps() {
        let state = ProgressState::new();
        assert_eq!(state.fraction(), 0.0);

        state.report(-0.5);
        assert_eq!(state.fraction(), 0.0);
        state.report(1.5);
        assert_eq!(state.fraction(), 1.0);
        state.report(0.3);
        assert_eq!(state.fraction(), 0.3);
        state.report(f64::NAN);
        assert_eq!(state.fraction(), 0.0);
        state.report(f64::INFINITY);
        assert_eq!(state.fraction(), 1.0);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = BarConfig {
            style: BarStyle {
                blocks: 0,
                ..BarStyle::default()
            },
            ..BarConfig::default()
        };
        assert!(matches!(
            ProgressBar::with_output(config, CaptureOutput::new()),
            Err(Error::ZeroBlocks)
        ));

        let config = BarConfig {
            interval: Duration::ZERO,
            ..BarConfig::default()
        };
        assert!(matches!(
            ProgressBar::with_output(config, CaptureOutput::new()),
            Err(Error::ZeroInterval)
        ));
    }

    #[test]
    fn test_renders_completed_bar() {
        let capture = CaptureOutput::new();
        let bar = ProgressBar::with_output(fast_config(), capture.clone()).unwrap();

        for i in 0..=10 {
            bar.report(f64::from(i) / 10.0);
            thread::sleep(Duration::from_millis(8));
        }
        bar.report(1.0);
        thread::sleep(Duration::from_millis(60));
        bar.dispose();

        assert_eq!(screen(&capture), "[##########] 100%");
    }

    #[test]
    fn test_report_does_not_render() {
        let capture = CaptureOutput::new();
        let config = BarConfig {
            interval: Duration::from_secs(60),
            ..BarConfig::default()
        };
        let bar = ProgressBar::with_output(config, capture.clone()).unwrap();

        for i in 0..100 {
            bar.report(f64::from(i) / 100.0);
        }
        assert!(capture.is_empty());
        assert!((bar.fraction() - 0.99).abs() < f64::EPSILON);

        bar.dispose();
        assert!(capture.is_empty());
    }

    #[test]
    fn test_redirected_output_stays_silent() {
        let capture = CaptureOutput::redirected();
        let bar = ProgressBar::with_output(fast_config(), capture.clone()).unwrap();
        assert_eq!(bar.phase(), ClockPhase::Inactive);

        bar.report(0.5);
        thread::sleep(Duration::from_millis(40));
        assert!(capture.is_empty());
        assert_eq!(bar.fraction(), 0.5);
        assert!(bar.dispose());
    }

    #[test]
    fn test_dispose_twice() {
        let capture = CaptureOutput::new();
        let bar = ProgressBar::with_output(fast_config(), capture.clone()).unwrap();
        bar.report(0.5);
        thread::sleep(Duration::from_millis(40));

        assert!(bar.dispose());
        assert!(!bar.dispose());
        assert!(bar.is_disposed());

        let written = capture.len();
        bar.report(1.0);
        thread::sleep(Duration::from_millis(40));
        assert_eq!(capture.len(), written);
        assert!(screen(&capture).starts_with("[#####-----]"));
    }

    #[test]
    fn test_configure_while_running() {
        let capture = CaptureOutput::new();
        let bar = ProgressBar::with_output(fast_config(), capture.clone()).unwrap();
        bar.report(1.0);
        thread::sleep(Duration::from_millis(30));

        bar.configure(|style| style.segments = Segments::PERCENT);
        assert_eq!(bar.style().segments, Segments::PERCENT);
        thread::sleep(Duration::from_millis(40));
        bar.dispose();

        assert_eq!(screen(&capture), "100%");
    }

    #[test]
    fn test_observer_can_stop_rendering() {
        struct StopAfter(u32);

        impl TickObserver for StopAfter {
            fn on_tick(&mut self, _now: Instant) -> ControlFlow<()> {
                self.0 = self.0.saturating_sub(1);
                if self.0 == 0 {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            }
        }

        let capture = CaptureOutput::new();
        let bar =
            ProgressBar::with_formatter(fast_config(), BarFormatter, StopAfter(3), capture.clone())
                .unwrap();
        thread::sleep(Duration::from_millis(80));

        assert_eq!(bar.phase(), ClockPhase::Stopped);
        assert!(!capture.is_empty());
        assert!(bar.dispose());
    }
}
