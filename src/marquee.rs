//! Marquee: an indeterminate bar with a lit segment sliding across it.
//!
//! [`Marquee`] is the pure sequencer. Display positions run from `0` to
//! `blocks + 1`; the first and last are the brackets. The lit window is
//! `round(0.2 * blocks)` blocks wide and lives on a ring of `blocks`
//! positions, so it wraps from the last block straight back to the first
//! without ever touching a bracket.
//!
//! [`MarqueeBar`] runs one session: header, then a redraw every `delay`
//! until its [`CancelToken`] fires.

use crate::cancel::CancelToken;
use crate::error::{Error, Result};
use crate::format::Colors;
use crate::render::LineRenderer;
use crate::terminal::{Output, OutputBuffer};
use crossterm::terminal;
use std::io;
use std::time::Duration;
use tracing::{debug, warn};

/// Smallest block count a marquee session uses.
pub const MIN_MARQUEE_BLOCKS: usize = 25;

/// Default time between marquee redraws.
pub const DEFAULT_MARQUEE_DELAY: Duration = Duration::from_millis(50);

/// What a display position shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// Position 0.
    StartBracket,
    /// Position `blocks + 1`.
    EndBracket,
    /// A block inside the window.
    Lit,
    /// A block outside the window.
    Unlit,
}

/// Rotating lit window over a ring of blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marquee {
    blocks: usize,
    lit: usize,
    /// Ring offset (0-based) of the window's first block.
    start: usize,
    /// Ring offset (0-based) of the window's last block.
    end: usize,
}

impl Marquee {
    /// A marquee over `blocks` blocks (at least one) with its window ending
    /// on the first block.
    #[allow(clippy::cast_possible_truncation)]
    #[allow(clippy::cast_sign_loss)]
    #[allow(clippy::cast_precision_loss)]
    pub fn new(blocks: usize) -> Self {
        let blocks = blocks.max(1);
        let lit = (blocks as f64 * 0.2).round() as usize;
        let end = 0;
        let start = (blocks + 1 - lit.max(1)) % blocks;
        Self {
            blocks,
            lit,
            start,
            end,
        }
    }

    /// Number of blocks between the brackets.
    #[inline]
    pub const fn blocks(&self) -> usize {
        self.blocks
    }

    /// Width of the lit window.
    #[inline]
    pub const fn window_len(&self) -> usize {
        self.lit
    }

    /// Display positions `(start, end)` of the window; `end < start` when it
    /// wraps.
    #[inline]
    pub const fn window(&self) -> (usize, usize) {
        (self.start + 1, self.end + 1)
    }

    /// Advance the window by one block.
    pub fn rotate(&mut self) {
        self.start = (self.start + 1) % self.blocks;
        self.end = (self.end + 1) % self.blocks;
    }

    /// What display position `index` shows.
    ///
    /// Brackets are resolved before window membership. Positions past the
    /// end bracket are reported as unlit.
    pub fn kind(&self, index: usize) -> BlockKind {
        if index == 0 {
            BlockKind::StartBracket
        } else if index == self.blocks + 1 {
            BlockKind::EndBracket
        } else if index <= self.blocks && self.contains(index - 1) {
            BlockKind::Lit
        } else {
            BlockKind::Unlit
        }
    }

    /// The glyph for display position `index`.
    pub fn glyph<'a>(&self, index: usize, config: &'a MarqueeConfig) -> &'a str {
        match self.kind(index) {
            BlockKind::StartBracket => &config.start_bracket,
            BlockKind::EndBracket => &config.end_bracket,
            BlockKind::Lit => &config.completed,
            BlockKind::Unlit => &config.incomplete,
        }
    }

    /// The full bar, brackets included.
    pub fn render(&self, config: &MarqueeConfig) -> String {
        (0..=self.blocks + 1).map(|index| self.glyph(index, config)).collect()
    }

    const fn contains(&self, offset: usize) -> bool {
        if self.lit == 0 {
            false
        } else if self.end < self.start {
            offset >= self.start || offset <= self.end
        } else {
            self.start <= offset && offset <= self.end
        }
    }
}

/// Default block count: 35 % of the terminal width, at least
/// [`MIN_MARQUEE_BLOCKS`].
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_sign_loss)]
pub fn default_marquee_blocks() -> usize {
    terminal::size()
        .map(|(width, _)| (f64::from(width) * 0.35) as usize)
        .unwrap_or(0)
        .max(MIN_MARQUEE_BLOCKS)
}

/// Clamp a requested block count to `[MIN_MARQUEE_BLOCKS, width]`. The
/// minimum wins over a terminal narrower than it.
pub fn clamp_marquee_blocks(requested: usize, width: Option<usize>) -> usize {
    width
        .map_or(requested, |width| requested.min(width))
        .max(MIN_MARQUEE_BLOCKS)
}

/// Configuration for a marquee session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarqueeConfig {
    /// Number of blocks between the brackets; clamped to
    /// [`MIN_MARQUEE_BLOCKS`] and the terminal width.
    pub blocks: usize,
    /// Opening bracket.
    pub start_bracket: String,
    /// Closing bracket.
    pub end_bracket: String,
    /// Glyph for a lit block.
    pub completed: String,
    /// Glyph for an unlit block.
    pub incomplete: String,
    /// Time between redraws.
    pub delay: Duration,
    /// Colors of the bar.
    pub bar_colors: Colors,
    /// Colors of the header text.
    pub header_colors: Colors,
}

impl Default for MarqueeConfig {
    fn default() -> Self {
        Self {
            blocks: default_marquee_blocks(),
            start_bracket: "[".to_string(),
            end_bracket: "]".to_string(),
            completed: "#".to_string(),
            incomplete: "-".to_string(),
            delay: DEFAULT_MARQUEE_DELAY,
            bar_colors: Colors::NONE,
            header_colors: Colors::NONE,
        }
    }
}

/// A marquee-style indeterminate progress display.
#[derive(Debug, Clone)]
pub struct MarqueeBar {
    config: MarqueeConfig,
}

impl MarqueeBar {
    /// A marquee with the default configuration.
    pub fn new() -> Self {
        Self {
            config: MarqueeConfig::default(),
        }
    }

    /// A marquee with a custom configuration.
    pub fn with_config(mut config: MarqueeConfig) -> Result<Self> {
        if config.delay.is_zero() {
            return Err(Error::ZeroInterval);
        }
        let width = terminal::size().ok().map(|(width, _)| usize::from(width));
        config.blocks = clamp_marquee_blocks(config.blocks, width);
        Ok(Self { config })
    }

    /// The effective configuration.
    pub const fn config(&self) -> &MarqueeConfig {
        &self.config
    }

    /// Show `header` and run the marquee on stdout until `cancel` fires.
    pub fn run(&self, header: &str, cancel: &CancelToken) {
        self.run_on(header, cancel, &mut io::stdout());
    }

    /// Show `header` and run the marquee on `output` until `cancel` fires.
    ///
    /// Cancellation is the normal way out and is not an error. On exit the
    /// cursor moves to the next line, is shown again, and colors are reset.
    /// Non-interactive outputs get nothing written; the call still blocks
    /// until cancellation.
    pub fn run_on<O: Output>(&self, header: &str, cancel: &CancelToken, output: &mut O) {
        if !output.is_interactive() {
            debug!("output is not interactive, marquee not drawn");
            cancel.wait();
            return;
        }

        debug!(blocks = self.config.blocks, "marquee started");
        if let Err(error) = self.draw(header, cancel, output) {
            warn!(%error, "marquee rendering failed");
            cancel.wait();
        }

        let mut buffer = OutputBuffer::new();
        buffer.newline();
        buffer.cursor_show();
        buffer.reset_colors();
        if let Err(error) = buffer.flush_to(output) {
            warn!(%error, "failed to restore terminal after marquee");
        }
        debug!("marquee stopped");
    }

    fn draw<O: Output>(&self, header: &str, cancel: &CancelToken, output: &mut O) -> Result<()> {
        let mut marquee = Marquee::new(self.config.blocks);
        let mut renderer = LineRenderer::new();
        let mut buffer = OutputBuffer::new();

        buffer.cursor_hide();
        let colored = buffer.set_colors(self.config.header_colors);
        buffer.write_str(header);
        buffer.write_str("  ");
        if colored {
            buffer.reset_colors();
        }
        buffer.flush_to(output)?;

        loop {
            buffer.clear();
            let text = marquee.render(&self.config);
            renderer.render(&text, self.config.bar_colors, &mut buffer);
            buffer.flush_to(output)?;

            marquee.rotate();
            if cancel.wait_timeout(self.config.delay) {
                return Ok(());
            }
        }
    }
}

impl Default for MarqueeBar {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::cancellation;
    use crate::terminal::CaptureOutput;
    use std::thread;

    fn small_config(blocks: usize) -> MarqueeConfig {
        MarqueeConfig {
            blocks,
            delay: Duration::from_millis(5),
            ..MarqueeConfig::default()
        }
    }

    #[test]
    fn test_window_size_is_constant() {
        for blocks in 1..=60 {
            let mut marquee = Marquee::new(blocks);
            let expected = (blocks as f64 * 0.2).round() as usize;
            assert_eq!(marquee.window_len(), expected);

            for _ in 0..(3 * blocks) {
                let lit = (0..=blocks + 1)
                    .filter(|&i| marquee.kind(i) == BlockKind::Lit)
                    .count();
                assert_eq!(lit, expected, "blocks={blocks} window={:?}", marquee.window());
                assert_eq!(marquee.kind(0), BlockKind::StartBracket);
                assert_eq!(marquee.kind(blocks + 1), BlockKind::EndBracket);
                marquee.rotate();
            }
        }
    }

    #[test]
    fn test_initial_window_wraps() {
        let marquee = Marquee::new(10);
        assert_eq!(marquee.window_len(), 2);
        // Window ends on the first block and starts on the last.
        assert_eq!(marquee.window(), (10, 1));
        assert_eq!(marquee.kind(1), BlockKind::Lit);
        assert_eq!(marquee.kind(10), BlockKind::Lit);
        assert_eq!(marquee.kind(2), BlockKind::Unlit);
        assert_eq!(marquee.kind(12), BlockKind::Unlit);
    }

    #[test]
    fn test_rotation_renders() {
        let config = MarqueeConfig::default();
        let mut marquee = Marquee::new(5);
        assert_eq!(marquee.render(&config), "[#----]");
        marquee.rotate();
        assert_eq!(marquee.render(&config), "[-#---]");
        for _ in 0..4 {
            marquee.rotate();
        }
        assert_eq!(marquee.render(&config), "[#----]");

        let mut marquee = Marquee::new(10);
        marquee.rotate();
        assert_eq!(marquee.window(), (1, 2));
        assert_eq!(marquee.render(&config), "[##--------]");
    }

    #[test]
    fn test_config_validation() {
        let marquee = MarqueeBar::with_config(small_config(3)).unwrap();
        assert_eq!(marquee.config().blocks, MIN_MARQUEE_BLOCKS);

        let config = MarqueeConfig {
            delay: Duration::ZERO,
            ..small_config(30)
        };
        assert!(matches!(MarqueeBar::with_config(config), Err(Error::ZeroInterval)));
        assert!(default_marquee_blocks() >= MIN_MARQUEE_BLOCKS);
    }

    #[test]
    fn test_block_clamping() {
        assert_eq!(clamp_marquee_blocks(10, None), MIN_MARQUEE_BLOCKS);
        assert_eq!(clamp_marquee_blocks(500, None), 500);
        assert_eq!(clamp_marquee_blocks(500, Some(120)), 120);
        assert_eq!(clamp_marquee_blocks(40, Some(120)), 40);
        assert_eq!(clamp_marquee_blocks(40, Some(10)), MIN_MARQUEE_BLOCKS);
    }

    #[test]
    fn test_session_until_cancelled() {
        let marquee = MarqueeBar::with_config(small_config(25)).unwrap();
        let (handle, token) = cancellation();
        let mut capture = CaptureOutput::new();
        let inspect = capture.clone();

        let canceller = thread::spawn(move || {
            thread::sleep(Duration::from_millis(60));
            handle.cancel();
        });
        marquee.run_on("Working", &token, &mut capture);
        canceller.join().unwrap();

        let bytes = inspect.contents();
        let text = inspect.text();
        assert!(text.starts_with("\x1b[?25lWorking  ["));
        assert!(text.ends_with("\n\x1b[?25h\x1b[0m"));
        assert!(bytes.contains(&crate::terminal::BACKSPACE));

        let mut parser = vt100::Parser::new(2, 80, 0);
        parser.process(&bytes);
        let first_line = parser.screen().contents();
        let first_line = first_line.lines().next().unwrap_or_default();
        assert!(first_line.starts_with("Working  ["));
        assert!(first_line.ends_with(']'));
        assert_eq!(first_line.chars().count(), "Working  ".len() + 27);
        assert!(!parser.screen().hide_cursor());
    }

    #[test]
    fn test_redirected_session_writes_nothing() {
        let marquee = MarqueeBar::with_config(small_config(25)).unwrap();
        let (handle, token) = cancellation();
        let mut capture = CaptureOutput::redirected();

        handle.cancel();
        marquee.run_on("Working", &token, &mut capture);
        assert!(capture.is_empty());
    }
}
