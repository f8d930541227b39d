//! # Progline
//!
//! Flicker-free, in-place progress bars for terminal programs.
//!
//! Progline redraws a single terminal line at a fixed rate, writing only the
//! part of the line that changed since the previous frame.
//!
//! ## Core Concepts
//!
//! - **Line diffing**: backspace to the first changed column, write the new
//!   suffix, blank out leftovers
//! - **Decoupled reporting**: `report` is one atomic store; a clock thread
//!   samples it and redraws, so output rate never follows input rate
//! - **Actor clock**: ticks are serialized and disposal is idempotent
//! - **Redirect-aware**: nothing is drawn when output is not a terminal
//!
//! ## Example
//!
//! ```rust,ignore
//! use progline::{BarConfig, ProgressBar};
//!
//! let bar = ProgressBar::with_config(BarConfig::default())?;
//! for i in 0..=150 {
//!     bar.report(f64::from(i) / 150.0);
//!     std::thread::sleep(std::time::Duration::from_millis(20));
//! }
//! bar.dispose();
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod bar;
pub mod cancel;
pub mod error;
pub mod format;
pub mod marquee;
pub mod render;
pub mod terminal;
pub mod transfer;

// Re-exports for convenience
pub use actor::{ClockPhase, RenderClock};
pub use bar::{BarConfig, ProgressBar, ProgressState, TickObserver};
pub use cancel::{cancellation, CancelHandle, CancelToken};
pub use error::{Error, Result};
pub use format::{animation, Animation, BarStyle, Colors, FileSize, Formatter, Segments};
pub use marquee::{Marquee, MarqueeBar, MarqueeConfig};
pub use render::{LineDiff, LineRenderer};
pub use terminal::{CaptureOutput, Output};
pub use transfer::{StallEvent, TransferConfig, TransferState, TransferTracker};

/// Re-exported so callers can name colors without depending on crossterm.
pub use crossterm::style::Color;
