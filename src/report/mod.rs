// src/report/mod.rs
//! PDF test reports.
//!
//! Layout is written against the small [`Canvas`] trait; [`PdfCanvas`] is the
//! lopdf-backed implementation used for real files.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::errors::Result;
use crate::models::Submission;

pub mod pdf;

pub use pdf::PdfCanvas;

/// US Letter, in points.
pub const PAGE_WIDTH: i64 = 612;
pub const PAGE_HEIGHT: i64 = 792;
pub const MARGIN: i64 = 40;
/// The cursor may not go below this before a new page is started.
pub const BOTTOM_LIMIT: i64 = 60;

const BODY_SIZE: i64 = 9;
const BODY_LEADING: i64 = 12;

/// The standard Type1 fonts the report uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Helvetica,
    HelveticaBold,
    Courier,
}

impl Font {
    pub const ALL: [Font; 3] = [Font::Helvetica, Font::HelveticaBold, Font::Courier];

    pub fn base_name(self) -> &'static str {
        match self {
            Font::Helvetica => "Helvetica",
            Font::HelveticaBold => "Helvetica-Bold",
            Font::Courier => "Courier",
        }
    }

    /// Glyph advance in 1/1000 em. Exact for Courier; an average for Helvetica.
    fn advance(self) -> f32 {
        match self {
            Font::Courier => 600.0,
            Font::Helvetica => 556.0,
            Font::HelveticaBold => 611.0,
        }
    }

    pub fn text_width(self, text: &str, size: i64) -> f32 {
        text.chars().count() as f32 * self.advance() * size as f32 / 1000.0
    }
}

/// Drawing surface for the report layout. Coordinates are PDF points with
/// the origin at the bottom-left corner.
pub trait Canvas {
    fn set_font(&mut self, font: Font, size: i64);

    fn draw_text(&mut self, x: i64, y: i64, text: &str);

    fn new_page(&mut self);

    fn measure_width(&self, text: &str, font: Font, size: i64) -> f32 {
        font.text_width(text, size)
    }
}

/// The four text blocks that make up a report.
#[derive(Debug, Clone, Copy)]
pub struct ReportContent<'a> {
    pub source: &'a str,
    pub generated_tests: &'a str,
    pub test_output: &'a str,
    pub summary: &'a str,
}

impl<'a> From<&'a Submission> for ReportContent<'a> {
    fn from(submission: &'a Submission) -> Self {
        Self {
            source: &submission.source,
            generated_tests: &submission.result.generated_tests,
            test_output: &submission.result.test_output,
            summary: &submission.result.summary,
        }
    }
}

/// Greedy word wrap. Words are whitespace separated; a word joins the current
/// line while the measured width stays strictly below `max_width`. A word
/// that is too wide on its own gets a line to itself.
pub fn wrap_text<F>(text: &str, max_width: f32, measure: F) -> Vec<String>
where
    F: Fn(&str) -> f32,
{
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let candidate = if line.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", line, word)
        };

        if measure(&candidate) < max_width || line.is_empty() {
            line = candidate;
        } else {
            lines.push(std::mem::replace(&mut line, word.to_string()));
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

struct Layout<'c, C: Canvas> {
    canvas: &'c mut C,
    y: i64,
}

impl<'c, C: Canvas> Layout<'c, C> {
    fn new(canvas: &'c mut C) -> Self {
        Self {
            canvas,
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn line(&mut self, font: Font, size: i64, text: &str, advance: i64) {
        self.canvas.set_font(font, size);
        self.canvas.draw_text(MARGIN, self.y, text);
        self.y -= advance;
    }

    fn section(&mut self, title: &str, content: &str) {
        self.line(Font::HelveticaBold, 12, title, 20);

        let max_width = (PAGE_WIDTH - 2 * MARGIN) as f32;
        self.canvas.set_font(Font::Courier, BODY_SIZE);
        for raw_line in content.lines() {
            let wrapped = wrap_text(raw_line, max_width, |s| {
                self.canvas.measure_width(s, Font::Courier, BODY_SIZE)
            });
            for text in wrapped {
                self.canvas.draw_text(MARGIN, self.y, &text);
                self.y -= BODY_LEADING;
                if self.y < BOTTOM_LIMIT {
                    self.canvas.new_page();
                    self.y = PAGE_HEIGHT - MARGIN;
                    self.canvas.set_font(Font::Courier, BODY_SIZE);
                }
            }
        }
    }
}

/// Lays out the full report: title, timestamp, then the four sections.
pub fn render_report<C: Canvas>(canvas: &mut C, content: &ReportContent<'_>, generated_at: &str) {
    let mut layout = Layout::new(canvas);

    layout.line(Font::HelveticaBold, 14, "AI-Powered Unit Test Report", 20);
    layout.line(Font::Helvetica, 10, &format!("Generated: {}", generated_at), 30);

    layout.section("User-Submitted Code:", content.source);
    layout.section("Generated Test Cases:", content.generated_tests);
    layout.section("Test Execution Output:", content.test_output);
    layout.section("Summary:", content.summary);
}

pub fn report_file_name(now: &DateTime<Local>) -> String {
    format!("test_report_{}.pdf", now.format("%Y%m%d_%H%M%S_%3f"))
}

/// Renders `submission` to a new PDF under `dir` and returns the file path.
pub fn write_report(dir: &Path, submission: &Submission, now: DateTime<Local>) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(report_file_name(&now));

    let mut canvas = PdfCanvas::new();
    render_report(
        &mut canvas,
        &ReportContent::from(submission),
        &now.format("%Y-%m-%d %H:%M:%S").to_string(),
    );
    canvas.save(&path)?;

    log::info!("Wrote report {}", path.display());
    Ok(path)
}
