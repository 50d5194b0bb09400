//! Lays out frames as styled lines of text.
//!
//! The layout is terminal-agnostic: every [`Line`] is a sequence of
//! [`Span`]s tagged with a semantic [`Style`], and it is up to the painter to
//! map styles to colors. Widths are measured in terminal columns.

use unicode_width::UnicodeWidthStr;

use crate::config::ViewConfig;
use crate::frame::{AttachmentPreview, Bubble, Frame, RenderedMessage};
use crate::render::{Block, CourseInfoBlock, Histogram, ProgressBlock};

const ASSISTANT_ICON: &str = "✦ ";
const INDENT: &str = "  ";

/// Semantic style of a span.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Style {
    /// Body text.
    Plain,
    /// Secondary text.
    Muted,
    /// Headings.
    Strong,
    /// The user bubble and the assistant icon.
    Accent,
    /// Done checkpoints.
    Success,
    /// Failures.
    Error,
    /// Histogram bars.
    Bar,
}

/// A run of text in one style.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Span {
    /// The text.
    pub text: String,
    /// Its style.
    pub style: Style,
}

impl Span {
    /// Creates a span.
    #[inline]
    pub fn new<S: Into<String>>(text: S, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// One line of output.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Line {
    /// Spans, left to right.
    pub spans: Vec<Span>,
}

impl Line {
    /// Creates a line of a single span.
    #[inline]
    pub fn single<S: Into<String>>(text: S, style: Style) -> Self {
        Self {
            spans: vec![Span::new(text, style)],
        }
    }

    /// Appends a span.
    #[inline]
    pub fn push<S: Into<String>>(&mut self, text: S, style: Style) {
        self.spans.push(Span::new(text, style));
    }

    /// Returns the width of the line in terminal columns.
    pub fn width(&self) -> usize {
        self.spans.iter().map(|span| span.text.width()).sum()
    }

    /// Returns the line without styling.
    pub fn text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }

    fn indented(mut self, prefix: &str, style: Style) -> Self {
        self.spans.insert(0, Span::new(prefix, style));
        self
    }
}

/// Layout parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutOptions {
    /// Available width in columns.
    pub width: usize,
    /// Width of a 100% histogram bar.
    pub histogram_width: usize,
}

impl LayoutOptions {
    /// Creates options for the given width, taking the rest from `config`.
    #[inline]
    pub fn new(width: usize, config: &ViewConfig) -> Self {
        Self {
            width,
            histogram_width: config.histogram_width(),
        }
    }
}

impl Default for LayoutOptions {
    #[inline]
    fn default() -> Self {
        Self::new(80, &ViewConfig::default())
    }
}

/// Lays out a whole frame, messages separated by blank lines.
pub fn frame_lines(frame: &Frame, opts: &LayoutOptions) -> Vec<Line> {
    let mut lines = Vec::new();
    for msg in &frame.messages {
        if !lines.is_empty() {
            lines.push(Line::default());
        }
        match msg.bubble {
            Bubble::User => user_lines(msg, opts, &mut lines),
            Bubble::Assistant => assistant_lines(msg, opts, &mut lines),
        }
    }
    if frame.thinking {
        if !lines.is_empty() {
            lines.push(Line::default());
        }
        let mut line = Line::single(ASSISTANT_ICON, Style::Accent);
        line.push("Thinking...", Style::Muted);
        lines.push(line);
    }
    lines
}

fn user_lines(msg: &RenderedMessage, opts: &LayoutOptions, lines: &mut Vec<Line>) {
    let bubble_width = (opts.width * 3 / 4).max(1);
    let mut body: Vec<Line> = msg
        .text
        .as_deref()
        .map(|text| {
            wrap(text, bubble_width)
                .into_iter()
                .map(|row| Line::single(row, Style::Accent))
                .collect()
        })
        .unwrap_or_default();
    body.extend(
        msg.attachments
            .iter()
            .map(|att| Line::single(attachment_label(att), Style::Muted)),
    );
    for line in body {
        let pad = opts.width.saturating_sub(line.width());
        lines.push(line.indented(&" ".repeat(pad), Style::Plain));
    }
}

fn assistant_lines(msg: &RenderedMessage, opts: &LayoutOptions, lines: &mut Vec<Line>) {
    let inner = LayoutOptions {
        width: opts.width.saturating_sub(INDENT.width()).max(1),
        ..*opts
    };
    let mut body = Vec::new();
    if let Some(text) = &msg.text {
        body.extend(
            wrap(text, inner.width)
                .into_iter()
                .map(|row| Line::single(row, Style::Plain)),
        );
    }
    for att in &msg.attachments {
        body.push(Line::single(attachment_label(att), Style::Muted));
    }
    for tool in &msg.tools {
        if let Some(block) = &tool.block {
            body.extend(block_lines(block, &inner));
        }
    }

    // An assistant turn with nothing to show still gets its icon.
    if body.is_empty() {
        body.push(Line::default());
    }
    for (idx, line) in body.into_iter().enumerate() {
        let line = if idx == 0 {
            line.indented(ASSISTANT_ICON, Style::Accent)
        } else {
            line.indented(INDENT, Style::Plain)
        };
        lines.push(line);
    }
}

fn attachment_label(att: &AttachmentPreview) -> String {
    match att.content_type.as_deref().map(str::trim) {
        Some(content_type) if !content_type.is_empty() => {
            format!("[{} · {content_type}]", att.label)
        }
        _ => format!("[{}]", att.label),
    }
}

/// Lays out one block.
pub fn block_lines(block: &Block, opts: &LayoutOptions) -> Vec<Line> {
    match block {
        Block::Progress(progress) => progress_lines(progress),
        Block::Skeleton(label) => vec![Line::single(format!("… {label}"), Style::Muted)],
        Block::CourseInfo(info) => course_info_lines(info, opts),
        Block::Placeholder(text) => vec![Line::single(text.clone(), Style::Muted)],
        Block::Json(json) => json
            .lines()
            .map(|row| Line::single(row, Style::Muted))
            .collect(),
        Block::Notice(text) => wrap(text, opts.width.saturating_sub(2).max(1))
            .into_iter()
            .map(|row| Line::single(format!("! {row}"), Style::Error))
            .collect(),
    }
}

fn progress_lines(progress: &ProgressBlock) -> Vec<Line> {
    progress
        .steps
        .iter()
        .map(|(label, done)| {
            if *done {
                let mut line = Line::single("✓ ", Style::Success);
                line.push(label.clone(), Style::Plain);
                line
            } else {
                Line::single(format!("○ {label}"), Style::Muted)
            }
        })
        .collect()
}

fn course_info_lines(info: &CourseInfoBlock, opts: &LayoutOptions) -> Vec<Line> {
    let mut lines = Vec::new();
    if let Some(heading) = &info.heading {
        lines.push(Line::single(heading.clone(), Style::Strong));
    }

    // The open histogram sits above the table it was toggled from.
    if let Some(histogram) = &info.histogram {
        lines.extend(histogram_lines(histogram, opts));
        lines.push(Line::default());
    }

    if !info.courses.is_empty() {
        let rows = info
            .courses
            .iter()
            .enumerate()
            .map(|(idx, row)| {
                let action_style = if row.selected {
                    Style::Accent
                } else {
                    Style::Muted
                };
                vec![
                    (idx.to_string(), Style::Muted),
                    (row.term.clone(), Style::Plain),
                    (row.instructor.clone(), Style::Plain),
                    (row.gpa.clone(), Style::Plain),
                    (format!("[{}]", row.action()), action_style),
                ]
            })
            .collect();
        lines.extend(table(&["#", "Term", "Instructor", "GPA", ""], rows));
    }


    if !info.professors.is_empty() {
        lines.push(Line::default());
        let rows = info
            .professors
            .iter()
            .map(|prof| {
                vec![
                    (prof.name.clone(), Style::Plain),
                    (prof.department.clone(), Style::Plain),
                    (prof.rating.clone(), Style::Plain),
                    (prof.difficulty.clone(), Style::Plain),
                    (prof.would_take_again.clone(), Style::Plain),
                    (prof.num_ratings.clone(), Style::Plain),
                ]
            })
            .collect();
        lines.extend(table(
            &[
                "Professor",
                "Department",
                "Rating",
                "Difficulty",
                "Would Take Again",
                "Ratings",
            ],
            rows,
        ));
    }
    lines
}

fn histogram_lines(histogram: &Histogram, opts: &LayoutOptions) -> Vec<Line> {
    let label_width = histogram
        .bars
        .iter()
        .map(|bar| bar.label.width())
        .max()
        .unwrap_or(0);
    let mut lines = vec![Line::single(
        format!("Grade distribution · {}", histogram.title),
        Style::Strong,
    )];
    for bar in &histogram.bars {
        let percent = if bar.percent.is_finite() {
            bar.percent.clamp(0.0, 100.0)
        } else {
            0.0
        };
        let len = (percent / 100.0 * opts.histogram_width as f64).round() as usize;
        let mut line = Line::single(pad(bar.label, label_width), Style::Plain);
        line.push(" ", Style::Plain);
        line.push("█".repeat(len), Style::Bar);
        line.push(format!(" {percent:.1}%"), Style::Muted);
        lines.push(line);
    }
    lines
}

fn table(headers: &[&str], rows: Vec<Vec<(String, Style)>>) -> Vec<Line> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
    for row in &rows {
        for (idx, (cell, _)) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(cell.width());
        }
    }
    let total = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);

    let mut header = Line::default();
    for (idx, title) in headers.iter().enumerate() {
        push_cell(&mut header, idx, title, Style::Strong, &widths);
    }

    let mut lines = vec![header, Line::single("─".repeat(total), Style::Muted)];
    for row in rows {
        let mut line = Line::default();
        for (idx, (cell, style)) in row.iter().enumerate() {
            push_cell(&mut line, idx, cell, *style, &widths);
        }
        lines.push(line);
    }
    for line in &mut lines {
        trim_end(line);
    }
    lines
}

fn push_cell(line: &mut Line, idx: usize, text: &str, style: Style, widths: &[usize]) {
    if idx > 0 {
        line.push("  ", Style::Plain);
    }
    line.push(pad(text, widths[idx]), style);
}

fn trim_end(line: &mut Line) {
    while let Some(last) = line.spans.last_mut() {
        let trimmed = last.text.trim_end().len();
        if trimmed > 0 {
            last.text.truncate(trimmed);
            return;
        }
        line.spans.pop();
    }
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{text}{}", " ".repeat(fill))
}

/// Greedy word wrap. Words wider than `width` get a row of their own.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut rows = Vec::new();
    for paragraph in text.lines() {
        let mut row = String::new();
        for word in paragraph.split_whitespace() {
            if !row.is_empty() && row.width() + 1 + word.width() > width {
                rows.push(std::mem::take(&mut row));
            }
            if !row.is_empty() {
                row.push(' ');
            }
            row.push_str(word);
        }
        rows.push(row);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::RenderedTool;
    use crate::render::{CourseRow, HistogramBar};

    fn opts(width: usize) -> LayoutOptions {
        LayoutOptions {
            width,
            histogram_width: 10,
        }
    }

    fn texts(lines: &[Line]) -> Vec<String> {
        lines.iter().map(Line::text).collect()
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("one two three", 7), ["one two", "three"]);
        assert_eq!(wrap("supercalifragilistic x", 5), ["supercalifragilistic", "x"]);
        assert_eq!(wrap("a\n\nb", 10), ["a", "", "b"]);
    }

    #[test]
    fn test_progress_marks() {
        let block = Block::Progress(ProgressBlock {
            steps: vec![("Looking...".into(), true), ("Combining...".into(), false)],
        });
        let lines = block_lines(&block, &opts(40));
        assert_eq!(texts(&lines), ["✓ Looking...", "○ Combining..."]);
        assert_eq!(lines[0].spans[0].style, Style::Success);
        assert_eq!(lines[1].spans[0].style, Style::Muted);
    }

    #[test]
    fn test_course_table_is_aligned() {
        let block = Block::CourseInfo(CourseInfoBlock {
            heading: Some("CS 3114 · Data Structures".into()),
            histogram: Some(Histogram {
                title: "2024 Fall".into(),
                bars: vec![
                    HistogramBar {
                        label: "A",
                        percent: 50.0,
                    },
                    HistogramBar {
                        label: "A-",
                        percent: 250.0,
                    },
                ],
            }),
            courses: vec![
                CourseRow {
                    term: "2024 Fall".into(),
                    instructor: "Jane Roe".into(),
                    gpa: "3.12".into(),
                    selected: true,
                },
                CourseRow {
                    term: "2023 Spring".into(),
                    instructor: "Li".into(),
                    gpa: "N/A".into(),
                    selected: false,
                },
            ],
            professors: vec![],
        });
        let lines = texts(&block_lines(&block, &opts(80)));
        assert_eq!(lines[0], "CS 3114 · Data Structures");
        assert_eq!(lines[1], "Grade distribution · 2024 Fall");
        assert_eq!(lines[2], "A  █████ 50.0%");
        assert_eq!(lines[3], "A- ██████████ 100.0%");
        assert_eq!(lines[4], "");
        assert_eq!(lines[5], "#  Term         Instructor  GPA");
        assert_eq!(lines[7], "0  2024 Fall    Jane Roe    3.12  [Hide]");
        assert_eq!(lines[8], "1  2023 Spring  Li          N/A   [Show]");
        assert_eq!(lines.len(), 9);
    }

    #[test]
    fn test_histogram_opens_above_course_table() {
        let mut selection = crate::render::CourseSelection::default();
        selection.toggle(0);
        let info = crate::model::CombinedInfo::from_payload(&serde_json::json!({
            "course_info": [
                { "Academic Year": "2024", "Term": "Fall", "Instructor": "Jane Roe",
                  "GPA": 3.1, "A (%)": 60.0 }
            ],
            "professor_info": [{ "name": "Jane Roe", "rating": 4.5 }]
        }))
        .unwrap();
        let block = crate::render::render_course_info(&info, selection);
        let lines = texts(&block_lines(&block, &opts(80)));

        let position = |prefix: &str| {
            lines
                .iter()
                .position(|line| line.starts_with(prefix))
                .unwrap()
        };
        let histogram = position("Grade distribution");
        let courses = position("#  Term");
        let professors = position("Professor");
        assert!(histogram < courses);
        assert!(courses < professors);
        // No course code, no title: no blank heading line either.
        assert_eq!(histogram, 0);
    }

    #[test]
    fn test_attachment_preview_shows_content_type() {
        let message = |bubble| RenderedMessage {
            id: "m1".into(),
            bubble,
            text: None,
            tools: vec![],
            attachments: vec![
                AttachmentPreview {
                    label: "s.pdf".into(),
                    content_type: Some("application/pdf".into()),
                    url: "https://x/s.pdf".into(),
                },
                AttachmentPreview {
                    label: "https://x/raw".into(),
                    content_type: Some(" ".into()),
                    url: "https://x/raw".into(),
                },
            ],
        };
        let frame = Frame {
            messages: vec![message(Bubble::Assistant)],
            thinking: false,
        };
        assert_eq!(
            texts(&frame_lines(&frame, &opts(40))),
            ["✦ [s.pdf · application/pdf]", "  [https://x/raw]"]
        );

        let frame = Frame {
            messages: vec![message(Bubble::User)],
            thinking: false,
        };
        let lines = texts(&frame_lines(&frame, &opts(40)));
        assert_eq!(lines[0].trim_start(), "[s.pdf · application/pdf]");
        assert_eq!(lines[0].chars().count(), 40);
    }

    #[test]
    fn test_frame_layout() {
        let frame = Frame {
            messages: vec![
                RenderedMessage {
                    id: "m1".into(),
                    bubble: Bubble::User,
                    text: Some("hi".into()),
                    tools: vec![],
                    attachments: vec![AttachmentPreview {
                        label: "notes.pdf".into(),
                        content_type: None,
                        url: "https://x/notes.pdf".into(),
                    }],
                },
                RenderedMessage {
                    id: "m2".into(),
                    bubble: Bubble::Assistant,
                    text: Some("Let me check.".into()),
                    tools: vec![RenderedTool {
                        tool_call_id: "call_1".into(),
                        tool_name: "get_course_info".into(),
                        pending: false,
                        block: Some(Block::Notice("lookup failed".into())),
                    }],
                    attachments: vec![],
                },
            ],
            thinking: false,
        };
        let lines = texts(&frame_lines(&frame, &opts(20)));
        assert_eq!(
            lines,
            [
                "                  hi",
                "         [notes.pdf]",
                "",
                "✦ Let me check.",
                "  ! lookup failed",
            ]
        );
    }

    #[test]
    fn test_thinking_line() {
        let frame = Frame {
            messages: vec![],
            thinking: true,
        };
        assert_eq!(texts(&frame_lines(&frame, &opts(20))), ["✦ Thinking..."]);
    }
}
