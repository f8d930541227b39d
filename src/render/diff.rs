//! Line Diffing: Generate the minimal edit that turns the text on screen into
//! the next frame.
//!
//! This module implements the core anti-flicker logic:
//! 1. Find the common grapheme prefix of the displayed and the new text
//! 2. Backspace over the part of the old text after that prefix
//! 3. Write only the new suffix
//! 4. Blank out leftover columns if the new text is narrower, then step back
//!
//! The whole line is never rewritten when only its tail changed, and an
//! unchanged line produces no output at all.

use crate::format::Colors;
use crate::terminal::OutputBuffer;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Byte length of the longest common grapheme prefix of `a` and `b`.
///
/// The scan is linear and stops at the first differing grapheme or at the
/// end of the shorter string.
pub fn common_prefix_len(a: &str, b: &str) -> usize {
    let mut len = 0;
    for ((offset, left), (_, right)) in a.grapheme_indices(true).zip(b.grapheme_indices(true)) {
        if left != right {
            break;
        }
        len = offset + left.len();
    }
    len
}

/// The edit that transforms one line into another.
///
/// All counts are terminal columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineDiff<'a> {
    /// Byte length of the shared prefix.
    pub prefix_len: usize,
    /// Backspaces from the end of the old text to the end of the prefix.
    pub backspaces: usize,
    /// New text written after backtracking.
    pub suffix: &'a str,
    /// Blank columns needed to erase the rest of a longer old text.
    pub padding: usize,
}

impl<'a> LineDiff<'a> {
    /// Compute the edit from `previous` to `next`.
    pub fn new(previous: &str, next: &'a str) -> Self {
        let prefix_len = common_prefix_len(previous, next);
        let padding = previous.width().saturating_sub(next.width());
        Self {
            prefix_len,
            backspaces: previous[prefix_len..].width(),
            suffix: &next[prefix_len..],
            padding,
        }
    }

    /// Whether applying this edit changes nothing on screen.
    pub fn is_empty(&self) -> bool {
        self.backspaces == 0 && self.suffix.is_empty() && self.padding == 0
    }

    /// Append the edit to `output`, without colors.
    pub fn write_to(&self, output: &mut OutputBuffer) {
        output.cursor_back(self.backspaces);
        output.write_str(self.suffix);
        if self.padding > 0 {
            output.spaces(self.padding);
            output.cursor_back(self.padding);
        }
    }
}

/// Statistics of one render call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffResult {
    /// Backspaces emitted, including the ones after padding.
    pub backspaces: usize,
    /// Bytes of new text written.
    pub written: usize,
    /// Blank columns written.
    pub padding: usize,
}

/// Keeps the line currently on screen and emits diffs against it.
///
/// The renderer assumes the cursor sits right after the text it last wrote
/// and that nothing else writes to the line in between.
#[derive(Debug, Clone, Default)]
pub struct LineRenderer {
    /// The text currently displayed.
    current: String,
}

impl LineRenderer {
    /// A renderer for a line that is still empty.
    pub const fn new() -> Self {
        Self {
            current: String::new(),
        }
    }

    /// The text last rendered.
    #[inline]
    pub fn current(&self) -> &str {
        &self.current
    }

    /// Forget the displayed text, e.g. after the cursor moved to a new line.
    pub fn reset(&mut self) {
        self.current.clear();
    }

    /// Append the transition to `text` to `output`.
    ///
    /// The edit is wrapped in `colors`; colors are reset afterwards if any
    /// were set. Nothing is written when the text did not change.
    pub fn render(&mut self, text: &str, colors: Colors, output: &mut OutputBuffer) -> DiffResult {
        debug_assert!(!text.contains(['\n', '\r']), "progress text must be a single line");

        let diff = LineDiff::new(&self.current, text);
        if diff.is_empty() {
            return DiffResult::default();
        }

        let colored = output.set_colors(colors);
        diff.write_to(output);
        if colored {
            output.reset_colors();
        }

        let result = DiffResult {
            backspaces: diff.backspaces + diff.padding,
            written: diff.suffix.len(),
            padding: diff.padding,
        };

        self.current.clear();
        self.current.push_str(text);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::style::Color;

    /// Replay `bytes` on a one-line virtual terminal.
    fn replay(bytes: &[u8]) -> vt100::Parser {
        let mut parser = vt100::Parser::new(1, 80, 0);
        parser.process(bytes);
        parser
    }

    fn screen_line(parser: &vt100::Parser) -> String {
        parser.screen().contents().trim_end().to_string()
    }

    #[test]
    fn test_common_prefix() {
        assert_eq!(common_prefix_len("", ""), 0);
        assert_eq!(common_prefix_len("abc", ""), 0);
        assert_eq!(common_prefix_len("abc", "abd"), 2);
        assert_eq!(common_prefix_len("abc", "abcdef"), 3);
        assert_eq!(common_prefix_len("xyz", "abc"), 0);
        // Byte length, not char count.
        assert_eq!(common_prefix_len("\u{a0}5%", "\u{a0}6%"), 2);
        // A combining mark breaks the grapheme, not just the char.
        assert_eq!(common_prefix_len("ae", "ae\u{301}"), 1);
    }

    #[test]
    fn test_diff_minimality() {
        let cases = [
            ("[###-------] 30% |", "[####------] 40% /"),
            ("[##########] 100% -", "[##########] 100%"),
            ("abc", "abcdef"),
            ("abcdef", "abc"),
            ("", "hello"),
            ("hello", ""),
            ("same", "same"),
        ];

        for (previous, next) in cases {
            let diff = LineDiff::new(previous, next);
            let k = common_prefix_len(previous, next);
            assert_eq!(diff.backspaces, previous.len() - k, "{previous:?} -> {next:?}");
            assert_eq!(diff.suffix, &next[k..]);
            assert_eq!(diff.padding, previous.len().saturating_sub(next.len()));
        }
    }

    #[test]
    fn test_write_sequence() {
        let mut out = OutputBuffer::new();
        LineDiff::new("abcdef", "abX").write_to(&mut out);
        assert_eq!(out.as_bytes(), b"\x08\x08\x08\x08X   \x08\x08\x08");
    }

    #[test]
    fn test_unchanged_text_writes_nothing() {
        let mut renderer = LineRenderer::new();
        let mut out = OutputBuffer::new();
        renderer.render("[#---] 25%", Colors::fg(Color::Cyan), &mut out);

        out.clear();
        let result = renderer.render("[#---] 25%", Colors::fg(Color::Cyan), &mut out);
        assert!(out.is_empty());
        assert_eq!(result, DiffResult::default());
    }

    #[test]
    fn test_only_tail_is_rewritten() {
        let mut renderer = LineRenderer::new();
        let mut out = OutputBuffer::new();
        renderer.render("[#####-----]  50% |", Colors::NONE, &mut out);

        out.clear();
        let result = renderer.render("[#####-----]  50% /", Colors::NONE, &mut out);
        assert_eq!(out.as_bytes(), b"\x08/");
        assert_eq!(result.backspaces, 1);
        assert_eq!(result.written, 1);
    }

    #[test]
    fn test_replay_reproduces_each_frame() {
        let frames = [
            "Working... [----------]   0% |",
            "Working... [#---------]  10% /",
            "Working... [###-------]  30% -",
            "Working... [##########] 100%",
            "Done",
            "Done, with a much longer trailing message",
        ];

        let mut renderer = LineRenderer::new();
        let mut stream = Vec::new();
        let mut out = OutputBuffer::new();
        for frame in frames {
            out.clear();
            renderer.render(frame, Colors::new(Some(Color::Green), Some(Color::Black)), &mut out);
            stream.extend_from_slice(out.as_bytes());

            let parser = replay(&stream);
            assert_eq!(screen_line(&parser), frame);
            let (_, col) = parser.screen().cursor_position();
            assert_eq!(usize::from(col), frame.width());
        }
        assert_eq!(renderer.current(), frames[frames.len() - 1]);
    }

    #[test]
    fn test_replay_with_wide_glyphs() {
        let mut renderer = LineRenderer::new();
        let mut stream = Vec::new();
        let mut out = OutputBuffer::new();
        for frame in ["\u{8fdb}\u{5ea6} 10%", "\u{8fdb}\u{5ea6} 9%", "\u{8fdb} 5%"] {
            out.clear();
            renderer.render(frame, Colors::NONE, &mut out);
            stream.extend_from_slice(out.as_bytes());
            assert_eq!(screen_line(&replay(&stream)), frame);
        }
    }

    #[test]
    fn test_colors_wrap_the_edit() {
        let mut renderer = LineRenderer::new();
        let mut out = OutputBuffer::new();
        renderer.render("ab", Colors::fg(Color::Red), &mut out);
        let bytes = out.as_bytes();
        assert!(bytes.starts_with(b"\x1b["));
        assert!(bytes.ends_with(b"\x1b[0m"));

        let mut plain = LineRenderer::new();
        out.clear();
        plain.render("ab", Colors::NONE, &mut out);
        assert_eq!(out.as_bytes(), b"ab");
    }

    #[test]
    fn test_reset_starts_a_fresh_line() {
        let mut renderer = LineRenderer::new();
        let mut out = OutputBuffer::new();
        renderer.render("first", Colors::NONE, &mut out);
        renderer.reset();
        assert_eq!(renderer.current(), "");

        out.clear();
        renderer.render("second", Colors::NONE, &mut out);
        assert_eq!(out.as_bytes(), b"second");
    }
}
