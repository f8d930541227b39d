//! Progress line text: pure functions from progress state to the string shown.

use super::{BarStyle, FileSize, Segments};
use unicode_width::UnicodeWidthStr;

/// Padding used to right-align numbers. It is not a breaking space, so the
/// terminal keeps the columns together.
pub const NBSP: char = '\u{a0}';

/// Produces the text of one tick.
///
/// The render loop owns the formatter and calls it once per tick with the
/// current style, the latest reported fraction and the tick's animation frame.
pub trait Formatter: Send + 'static {
    /// Text for the current tick. Must not contain line breaks.
    fn format(&self, style: &BarStyle, fraction: f64, frame: usize) -> String;
}

/// Formats the plain block bar: bar, percentage, animation.
#[derive(Debug, Clone, Copy, Default)]
pub struct BarFormatter;

impl Formatter for BarFormatter {
    fn format(&self, style: &BarStyle, fraction: f64, frame: usize) -> String {
        format_line(style, fraction, frame, None)
    }
}

/// Left-pad `text` with non-breaking spaces to `width` columns.
pub fn pad_left(text: &str, width: usize) -> String {
    let missing = width.saturating_sub(text.width());
    let mut padded = String::with_capacity(text.len() + missing * NBSP.len_utf8());
    padded.extend(std::iter::repeat(NBSP).take(missing));
    padded.push_str(text);
    padded
}

/// `[####------]` for the given fraction.
pub fn bar_segment(style: &BarStyle, fraction: f64) -> String {
    let completed = style.completed_blocks(fraction);
    let incomplete = style.blocks - completed;
    let mut bar = String::with_capacity(
        style.start_bracket.len()
            + style.completed.len() * completed
            + style.incomplete.len() * incomplete
            + style.end_bracket.len(),
    );
    bar.push_str(&style.start_bracket);
    bar.push_str(&style.completed.repeat(completed));
    bar.push_str(&style.incomplete.repeat(incomplete));
    bar.push_str(&style.end_bracket);
    bar
}

/// Rounded percentage, right-aligned in four columns: ` 42%`.
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_sign_loss)]
pub fn percent_segment(fraction: f64) -> String {
    let percent = (fraction * 100.0).round().clamp(0.0, 100.0) as u32;
    pad_left(&format!("{percent}%"), 4)
}

/// `received of total`, with `received` right-aligned to the width of `total`.
pub fn bytes_segment(received: u64, total: u64) -> String {
    let total = FileSize(total).to_string();
    let received = pad_left(&FileSize(received).to_string(), total.width());
    format!("{received} of {total}")
}

/// Assemble a full progress line.
///
/// Segments appear in the order bar, bytes, percentage, animation, each
/// followed by one space, and trailing whitespace is trimmed. `bytes` is
/// `(received, total)` and only shown when [`Segments::BYTES`] is set. The
/// animation is never shown once the fraction reaches 1.
pub fn format_line(
    style: &BarStyle,
    fraction: f64,
    frame: usize,
    bytes: Option<(u64, u64)>,
) -> String {
    let segments = style.segments;
    let mut line = String::new();

    if segments.contains(Segments::BARS) {
        line.push_str(&bar_segment(style, fraction));
        line.push(' ');
    }

    if let Some((received, total)) = bytes.filter(|_| segments.contains(Segments::BYTES)) {
        line.push_str(&bytes_segment(received, total));
        line.push(' ');
    }

    if segments.contains(Segments::PERCENT) {
        line.push_str(&percent_segment(fraction));
        line.push(' ');
    }

    if segments.contains(Segments::ANIMATION) && fraction < 1.0 {
        if let Some(glyph) = style.animation.frame(frame) {
            line.push_str(glyph);
        }
    }

    let trimmed = line.trim_end().len();
    line.truncate(trimmed);
    line
}
