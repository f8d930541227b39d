//! Format module: turning progress state into the text of one line.
//!
//! This module contains:
//! - [`BarStyle`]: glyphs, block count, visible [`Segments`] and [`Colors`]
//! - [`Animation`]: the per-tick glyph sequence, see [`animation`] for presets
//! - [`FileSize`]: byte counts as `bytes`/`KB`/`MB`/`GB`
//! - [`Formatter`]: the pluggable "state to text" capability used by the render loop

pub mod animation;
mod file_size;
mod line;
mod style;

pub use animation::Animation;
pub use file_size::{FileSize, ONE_GB, ONE_KB, ONE_MB};
pub use line::{
    bar_segment, bytes_segment, format_line, pad_left, percent_segment, BarFormatter, Formatter,
    NBSP,
};
pub use style::{BarStyle, Colors, Segments};
