//! Render module: in-place single-line redraws.
//!
//! - [`LineDiff`]: the backspace/suffix/padding edit between two lines
//! - [`LineRenderer`]: remembers the displayed line and emits diffs against it

pub mod diff;

pub use diff::{common_prefix_len, DiffResult, LineDiff, LineRenderer};
