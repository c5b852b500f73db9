//! Terminal styling for run summaries.
//!
//! Color is decided once per process from `--color`/`--plain` or the
//! environment, then every line of the summary goes through a [`Painter`].

use colored::{ColoredString, Colorize};
use std::env;
use std::io::IsTerminal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ColorMode {
    /// Color when stdout is a terminal
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn enabled(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => stdout_supports_color(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormattingConfig {
    pub color: ColorMode,
}

impl FormattingConfig {
    pub fn new(color: ColorMode) -> Self {
        Self { color }
    }

    /// `NO_COLOR` and `CLICOLOR=0` turn color off; `CLICOLOR_FORCE=1` wins
    /// over both.
    pub fn from_env() -> Self {
        let disabled = env::var_os("NO_COLOR").is_some()
            || env::var("CLICOLOR").is_ok_and(|val| val == "0");
        let forced = env::var("CLICOLOR_FORCE").is_ok_and(|val| val == "1");

        let color = match (forced, disabled) {
            (true, _) => ColorMode::Always,
            (false, true) => ColorMode::Never,
            (false, false) => ColorMode::Auto,
        };
        Self { color }
    }

    pub fn plain() -> Self {
        Self::new(ColorMode::Never)
    }
}

/// What a piece of summary text means, independent of how it is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// The summary title
    Title,
    /// A file that was (or would be) rewritten
    Modified,
    /// A file that could not be processed
    Failed,
    /// Dry-run and similar notices
    Notice,
    /// Section headings inside the summary
    Emphasis,
    /// Secondary detail such as error messages
    Muted,
}

pub trait Painter {
    fn paint(&self, tone: Tone, text: &str) -> String;
}

/// Draws every tone as-is.
pub struct PlainPainter;

impl Painter for PlainPainter {
    fn paint(&self, _tone: Tone, text: &str) -> String {
        text.to_string()
    }
}

/// ANSI colors via `colored`.
pub struct ColorPainter;

impl ColorPainter {
    pub fn new() -> Self {
        colored::control::set_override(true);
        Self
    }
}

impl Default for ColorPainter {
    fn default() -> Self {
        Self::new()
    }
}

impl Painter for ColorPainter {
    fn paint(&self, tone: Tone, text: &str) -> String {
        let styled: ColoredString = match tone {
            Tone::Title => text.blue().bold(),
            Tone::Modified => text.green(),
            Tone::Failed => text.red(),
            Tone::Notice => text.yellow(),
            Tone::Emphasis => text.bold(),
            Tone::Muted => text.dimmed(),
        };
        styled.to_string()
    }
}

/// The painter for `config`.
pub fn painter_for(config: FormattingConfig) -> Box<dyn Painter> {
    if config.color.enabled() {
        Box::new(ColorPainter::new())
    } else {
        Box::new(PlainPainter)
    }
}

fn stdout_supports_color() -> bool {
    let dumb = env::var("TERM").is_ok_and(|term| term == "dumb");
    !dumb && std::io::stdout().is_terminal()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forced_modes() {
        assert!(ColorMode::Always.enabled());
        assert!(!ColorMode::Never.enabled());
        assert_eq!(FormattingConfig::plain().color, ColorMode::Never);
    }

    #[test]
    fn test_plain_painter_keeps_text() {
        for tone in [Tone::Title, Tone::Failed, Tone::Muted] {
            assert_eq!(PlainPainter.paint(tone, "Summary"), "Summary");
        }
    }

    #[test]
    fn test_color_painter_wraps_text() {
        let painted = ColorPainter::new().paint(Tone::Failed, "Failed:");
        assert!(painted.contains("Failed:"));
        assert_ne!(painted, "Failed:");
    }
}
