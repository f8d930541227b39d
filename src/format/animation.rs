//! Animation glyph sequences.
//!
//! An [`Animation`] is an ordered list of grapheme clusters shown one per tick
//! after the percentage. The constants below are the built-in sequences.

use unicode_segmentation::UnicodeSegmentation;

/// Sequences that render correctly in most terminal fonts.
pub mod universal {
    /// `|/-\-`
    pub const DEFAULT: &str = "|/-\\-";
    /// A ball bouncing up and down.
    pub const BOUNCING_BALL: &str = ".oO\u{b0}Oo.";
    /// A growing blast.
    pub const EXPLOSION: &str = ".oO@*";
    /// A triangle turning clockwise.
    pub const ROTATING_TRIANGLE: &str = "\u{25b2}\u{25ba}\u{25bc}\u{25c4}";
    /// An arrow turning clockwise.
    pub const ROTATING_ARROW: &str = "\u{2190}\u{2191}\u{2192}\u{2193}";
    /// A line thickening and thinning.
    pub const PULSING_LINE: &str = "\u{2212}\u{3d}\u{2261}\u{39e}\u{2261}\u{3d}\u{2212}";
    /// Alternating circle glyphs.
    pub const CIRCLES: &str = "\u{25cb}\u{263c}\u{a4}\u{2219}";
}

/// Sequences that need a font with full box-drawing and block coverage.
pub mod extended {
    /// A dot travelling around a circle.
    pub const ROTATING_DOT: &str = "\u{25dc}\u{25dd}\u{25de}\u{25df}";
    /// A vertical bar growing and shrinking.
    pub const GROWING_BAR_VERTICAL: &str = "\u{2581}\u{2582}\u{2583}\u{2584}\u{2585}\u{2586}\u{2587}\u{2588}\u{2587}\u{2586}\u{2585}\u{2584}\u{2583}\u{2581}";
    /// A box-drawing pipe turning around.
    pub const ROTATING_PIPE: &str = "\u{2524}\u{2518}\u{2534}\u{2514}\u{251c}\u{250c}\u{252c}\u{2510}";
    /// A half-filled circle turning around.
    pub const ROTATING_CIRCLE: &str = "\u{25d0}\u{25d3}\u{25d1}\u{25d2}";
    /// A horizontal bar growing and shrinking.
    pub const GROWING_BAR_HORIZONTAL: &str = "\u{2589}\u{258a}\u{258b}\u{258c}\u{258d}\u{258e}\u{258f}\u{258e}\u{258d}\u{258c}\u{258b}\u{258a}\u{2589}";
}

/// An ordered sequence of animation frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Animation {
    frames: Vec<String>,
}

impl Animation {
    /// Split a sequence into one frame per grapheme cluster.
    pub fn new(sequence: &str) -> Self {
        Self {
            frames: sequence.graphemes(true).map(str::to_owned).collect(),
        }
    }

    /// Build an animation from explicit frames.
    pub fn from_frames<I, S>(frames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            frames: frames.into_iter().map(Into::into).collect(),
        }
    }

    /// Number of frames.
    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the animation has no frames.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// The frame shown at tick `index`, wrapping around the sequence.
    ///
    /// Returns `None` for an empty animation.
    pub fn frame(&self, index: usize) -> Option<&str> {
        if self.frames.is_empty() {
            return None;
        }
        Some(&self.frames[index % self.frames.len()])
    }
}

impl Default for Animation {
    fn default() -> Self {
        Self::new(universal::DEFAULT)
    }
}

impl From<&str> for Animation {
    fn from(sequence: &str) -> Self {
        Self::new(sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_wrap() {
        let animation = Animation::default();
        assert_eq!(animation.len(), 5);
        assert_eq!(animation.frame(0), Some("|"));
        assert_eq!(animation.frame(3), Some("\\"));
        assert_eq!(animation.frame(5), Some("|"));
        assert_eq!(animation.frame(usize::MAX), animation.frame(usize::MAX % 5));
    }

    #[test]
    fn test_grapheme_frames() {
        // "e" + combining acute is a single frame.
        let animation = Animation::new("e\u{301}x");
        assert_eq!(animation.len(), 2);
        assert_eq!(animation.frame(0), Some("e\u{301}"));

        let triangle = Animation::new(universal::ROTATING_TRIANGLE);
        assert_eq!(triangle.len(), 4);
        assert_eq!(triangle.frame(1), Some("\u{25ba}"));
    }

    #[test]
    fn test_empty_animation() {
        let animation = Animation::from_frames(Vec::<String>::new());
        assert!(animation.is_empty());
        assert_eq!(animation.frame(7), None);
    }
}
