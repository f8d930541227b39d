//! Error handling for Progline.
//!
//! Rendering itself never fails from the caller's point of view: write errors
//! raised on the clock thread are logged and dropped. The errors here come from
//! configuration validation and from the few operations that write to an
//! output synchronously.

use std::io;
use thiserror::Error;

/// Errors that can happen when configuring or driving a progress display.
#[derive(Error, Debug)]
pub enum Error {
    /// A bar was configured with zero blocks.
    #[error("block count must be at least 1")]
    ZeroBlocks,

    /// Animation display is enabled but the animation has no frames.
    #[error("animation is enabled but the animation sequence is empty")]
    EmptyAnimation,

    /// The tick interval (or marquee delay) is zero.
    #[error("tick interval must be greater than zero")]
    ZeroInterval,

    /// I/O Error.
    ///
    /// Wraps failures of the underlying output while writing a frame.
    #[error("I/O error")]
    IOError {
        /// The underlying I/O error.
        #[from]
        source: io::Error,
    },
}

/// Result type alias for fallible Progline operations.
pub type Result<T> = std::result::Result<T, Error>;
