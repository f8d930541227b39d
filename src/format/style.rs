//! Bar appearance: glyphs, visible segments and colors.

use super::Animation;
use crate::error::{Error, Result};
use bitflags::bitflags;
use crossterm::style::Color;

bitflags! {
    /// Which parts of the progress line are displayed.
    ///
    /// These can be combined using bitwise OR.
    ///
    /// # Example
    /// ```
    /// use progline::Segments;
    /// let quiet = Segments::PERCENT | Segments::BYTES;
    /// assert!(!quiet.contains(Segments::BARS));
    /// ```
    #[derive(Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Segments: u8 {
        /// The bracketed block bar.
        const BARS = 0b0000_0001;
        /// The percentage, e.g. ` 42%`.
        const PERCENT = 0b0000_0010;
        /// The spinning animation glyph.
        const ANIMATION = 0b0000_0100;
        /// `received of total` (file transfers only).
        const BYTES = 0b0000_1000;
    }
}

impl std::fmt::Debug for Segments {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

impl Default for Segments {
    fn default() -> Self {
        Self::all()
    }
}

/// Foreground and background colors for a render burst.
///
/// `None` leaves the terminal's current color untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Colors {
    /// Foreground color.
    pub fg: Option<Color>,
    /// Background color.
    pub bg: Option<Color>,
}

impl Colors {
    /// Leave both colors as they are.
    pub const NONE: Self = Self { fg: None, bg: None };

    /// Create a color pair.
    #[inline]
    pub const fn new(fg: Option<Color>, bg: Option<Color>) -> Self {
        Self { fg, bg }
    }

    /// Only set the foreground.
    #[inline]
    pub const fn fg(color: Color) -> Self {
        Self::new(Some(color), None)
    }

    /// Whether any color is set.
    #[inline]
    pub const fn is_set(&self) -> bool {
        self.fg.is_some() || self.bg.is_some()
    }
}

/// Appearance of a block progress bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarStyle {
    /// Number of blocks between the brackets.
    pub blocks: usize,
    /// Opening bracket.
    pub start_bracket: String,
    /// Closing bracket.
    pub end_bracket: String,
    /// Glyph for a completed block.
    pub completed: String,
    /// Glyph for an incomplete block.
    pub incomplete: String,
    /// Animation shown after the percentage.
    pub animation: Animation,
    /// Visible segments.
    pub segments: Segments,
    /// Colors used while drawing.
    pub colors: Colors,
}

impl Default for BarStyle {
    fn default() -> Self {
        Self {
            blocks: 10,
            start_bracket: "[".to_string(),
            end_bracket: "]".to_string(),
            completed: "#".to_string(),
            incomplete: "-".to_string(),
            animation: Animation::default(),
            segments: Segments::default(),
            colors: Colors::NONE,
        }
    }
}

impl BarStyle {
    /// Check that the style can be rendered.
    pub fn validate(&self) -> Result<()> {
        if self.blocks == 0 {
            return Err(Error::ZeroBlocks);
        }
        if self.segments.contains(Segments::ANIMATION) && self.animation.is_empty() {
            return Err(Error::EmptyAnimation);
        }
        Ok(())
    }

    /// Number of completed blocks for `fraction`: `floor(fraction * blocks)`,
    /// clamped to `0..=blocks`.
    #[allow(clippy::cast_possible_truncation)]
    #[allow(clippy::cast_sign_loss)]
    #[allow(clippy::cast_precision_loss)]
    pub fn completed_blocks(&self, fraction: f64) -> usize {
        let raw = (fraction * self.blocks as f64).floor();
        if raw.is_nan() || raw <= 0.0 {
            return 0;
        }
        (raw as usize).min(self.blocks)
    }
}
