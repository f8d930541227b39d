//! Actor Model: the render clock thread.
//!
//! Every progress bar owns one clock actor. Callers never talk to the clock
//! directly; they swap progress values atomically and the clock samples them
//! on each tick.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   report(x)    ┌──────────────┐
//! │ Caller(s)    │ ─────────────▶ │ Atomic state │
//! └──────────────┘                └──────────────┘
//!                                        ▲ read per tick
//! ┌──────────────┐  ClockCommand  ┌──────────────┐   diff   ┌──────────┐
//! │ Owner        │ ─────────────▶ │ Clock Thread │ ───────▶ │ Terminal │
//! └──────────────┘   (Dispose)    └──────────────┘          └──────────┘
//! ```

mod clock;
mod messages;

pub use clock::RenderClock;
pub use messages::{ClockCommand, ClockPhase};
