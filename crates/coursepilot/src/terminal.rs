use std::env;
use std::io::IsTerminal as _;

use coursepilot_core::layout::{self, LayoutOptions, Line, Style};
use coursepilot_core::{Frame, ViewConfig};
use owo_colors::OwoColorize;

const DEFAULT_WIDTH: usize = 80;

/// Paints laid out lines for a terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Painter {
    color: bool,
    width: usize,
}

impl Painter {
    /// Creates a painter.
    #[inline]
    pub fn new(color: bool, width: usize) -> Self {
        Self { color, width }
    }

    /// Creates a painter for stdout.
    ///
    /// Colors are used when stdout is a terminal and `NO_COLOR` is unset or
    /// empty. The width comes from `COLUMNS`.
    pub fn from_env() -> Self {
        let no_color = env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        let width = env::var("COLUMNS")
            .ok()
            .and_then(|cols| cols.trim().parse().ok())
            .filter(|&cols: &usize| cols > 0)
            .unwrap_or(DEFAULT_WIDTH);
        Self::new(!no_color && std::io::stdout().is_terminal(), width)
    }

    /// Returns whether ANSI styling is emitted.
    #[inline]
    pub fn color(&self) -> bool {
        self.color
    }

    /// Paints a whole frame, one line per row.
    pub fn paint_frame(&self, frame: &Frame, config: &ViewConfig) -> String {
        let opts = LayoutOptions::new(self.width, config);
        layout::frame_lines(frame, &opts)
            .iter()
            .map(|line| self.paint_line(line))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Paints one line.
    pub fn paint_line(&self, line: &Line) -> String {
        if !self.color {
            return line.text();
        }
        line.spans
            .iter()
            .map(|span| {
                let text = span.text.as_str();
                match span.style {
                    Style::Plain => text.to_owned(),
                    Style::Muted => text.bright_black().to_string(),
                    Style::Strong => text.bold().to_string(),
                    Style::Accent => text.bright_cyan().to_string(),
                    Style::Success => text.green().to_string(),
                    Style::Error => text.bright_red().to_string(),
                    Style::Bar => text.blue().to_string(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use coursepilot_core::layout::Span;

    use super::*;

    fn line() -> Line {
        Line {
            spans: vec![
                Span::new("✓ ", Style::Success),
                Span::new("Combining information...", Style::Plain),
            ],
        }
    }

    #[test]
    fn test_plain() {
        let painter = Painter::new(false, 80);
        assert_eq!(painter.paint_line(&line()), "✓ Combining information...");
    }

    #[test]
    fn test_colored() {
        let painted = Painter::new(true, 80).paint_line(&line());
        assert!(painted.contains('\u{1b}'));
        assert!(painted.ends_with("Combining information..."));
    }

    #[test]
    fn test_paint_frame() {
        let frame = Frame {
            messages: vec![],
            thinking: true,
        };
        let painted = Painter::new(false, 40).paint_frame(&frame, &ViewConfig::default());
        assert_eq!(painted, "✦ Thinking...");
    }
}
