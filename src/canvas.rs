//! Stateful canvas wrapper over a pdf-writer content stream
//!
//! The canvas speaks the layout's coordinate system: origin at the top-left
//! of the page, y growing downward, like every measurement in the
//! certificate recipe. Coordinates are flipped to PDF's bottom-up space at
//! the moment an operator is emitted.
//!
//! The canvas position is the only cursor there is. It is pushed into the
//! content stream by each draw call (`Td` takes the position explicitly),
//! so there is no second, surface-side cursor that could drift out of sync.

use pdf_writer::{Content, Name, Str};

use crate::encoding::to_winansi;
use crate::fonts::Font;
use crate::types::{Color, Point, Rgb};

/// Horizontal page margin bounding centered text, in points.
const MARGIN: f64 = 28.35;

/// A configuration action applied to the canvas before a shape is drawn.
///
/// Options are applied in order, so a later option overrides the surface
/// state set by an earlier one.
#[derive(Debug, Clone, Copy)]
pub enum PaintOp {
    FillColor(Color),
    StrokeColor(Color),
    LineWidth(f64),
}

/// Tracked canvas state, mirroring what has been written to the stream.
#[derive(Debug, Clone)]
pub struct CanvasState {
    pub fill_color: Rgb,
    pub stroke_color: Rgb,
    pub text_color: Rgb,
    pub line_width: f64,
    pub font: Font,
    pub font_size: f64,
    pub x: f64,
    pub y: f64,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self {
            fill_color: Rgb { r: 0, g: 0, b: 0 },
            stroke_color: Rgb { r: 0, g: 0, b: 0 },
            text_color: Rgb { r: 0, g: 0, b: 0 },
            line_width: 1.0,
            font: Font::Helvetica,
            font_size: 12.0,
            x: 0.0,
            y: 0.0,
        }
    }
}

pub struct Canvas {
    content: Content,
    state: CanvasState,
    page_width: f64,
    page_height: f64,
    fonts_used: Vec<Font>,
}

impl Canvas {
    pub fn new(page_width: f64, page_height: f64) -> Self {
        Self {
            content: Content::new(),
            state: CanvasState::default(),
            page_width,
            page_height,
            fonts_used: Vec::new(),
        }
    }

    pub fn page_size(&self) -> (f64, f64) {
        (self.page_width, self.page_height)
    }

    /// Consume the canvas, returning the finished content stream bytes and
    /// the fonts that need to appear in the page resources.
    pub fn finish(self) -> (Vec<u8>, Vec<Font>) {
        (self.content.finish(), self.fonts_used)
    }

    fn flip(&self, y: f64) -> f32 {
        (self.page_height - y) as f32
    }

    // ===== Cursor =====

    /// Shift the cursor by a delta.
    pub fn move_by(&mut self, dx: f64, dy: f64) {
        self.state.x += dx;
        self.state.y += dy;
    }

    /// Place the cursor at an absolute position.
    pub fn move_to(&mut self, x: f64, y: f64) {
        self.state.x = x;
        self.state.y = y;
    }

    pub fn position(&self) -> (f64, f64) {
        (self.state.x, self.state.y)
    }

    // ===== Colors =====

    pub fn set_fill_color(&mut self, color: Color) {
        let rgb = color.flatten();
        self.state.fill_color = rgb;
        let (r, g, b) = rgb.to_pdf();
        self.content.set_fill_rgb(r, g, b);
    }

    pub fn set_stroke_color(&mut self, color: Color) {
        let rgb = color.flatten();
        self.state.stroke_color = rgb;
        let (r, g, b) = rgb.to_pdf();
        self.content.set_stroke_rgb(r, g, b);
    }

    /// Color used by subsequent text operations. Kept separate from the
    /// shape fill color, matching how the layout recipe switches between
    /// banner fills and text shades independently.
    pub fn set_text_color(&mut self, color: Color) {
        self.state.text_color = color.flatten();
    }

    pub fn set_line_width(&mut self, width: f64) {
        self.state.line_width = width;
        self.content.set_line_width(width as f32);
    }

    // ===== Fonts =====

    pub fn set_font(&mut self, font: Font, size: f64) {
        self.state.font = font;
        self.state.font_size = size;
        if !self.fonts_used.contains(&font) {
            self.fonts_used.push(font);
        }
    }

    /// Nominal line height of the active font: its point size, the same
    /// convention the layout constants were tuned against.
    pub fn line_height(&self) -> f64 {
        self.state.font_size
    }

    pub fn state(&self) -> &CanvasState {
        &self.state
    }

    // ===== Text =====

    /// Draw text with its baseline at the cursor. Does not move the cursor.
    pub fn text(&mut self, text: &str) {
        let (x, y) = (self.state.x, self.state.y);
        self.show_text_at(x, y, text);
    }

    /// Word-wrap `text` to the page content width and draw each line
    /// horizontally centered, in cells of `cell_height` starting at the
    /// cursor. Does not move the cursor.
    pub fn write_centered(&mut self, text: &str, cell_height: f64) {
        let lines = self.wrap_lines(text);
        let content_width = self.page_width - 2.0 * MARGIN;
        for (i, line) in lines.iter().enumerate() {
            let width = self.state.font.text_width(line, self.state.font_size);
            let x = MARGIN + (content_width - width) / 2.0;
            let y = self.state.y + i as f64 * cell_height + self.baseline_in_cell(cell_height);
            self.show_text_at(x, y, line);
        }
    }

    /// Draw `text` centered inside a single cell of `width` x `height`
    /// anchored at the cursor. No wrapping. Does not move the cursor.
    pub fn cell_centered(&mut self, width: f64, height: f64, text: &str) {
        let text_width = self.state.font.text_width(text, self.state.font_size);
        let x = self.state.x + (width - text_width) / 2.0;
        let y = self.state.y + self.baseline_in_cell(height);
        self.show_text_at(x, y, text);
    }

    // Baseline offset from the top of a cell; sits slightly below the
    // vertical center so lowercase text reads as centered.
    fn baseline_in_cell(&self, cell_height: f64) -> f64 {
        0.5 * cell_height + 0.3 * self.state.font_size
    }

    fn show_text_at(&mut self, x: f64, y: f64, text: &str) {
        if text.is_empty() {
            return;
        }
        let (r, g, b) = self.state.text_color.to_pdf();
        // q/Q so the text fill color does not leak into shape fills
        self.content.save_state();
        self.content.set_fill_rgb(r, g, b);
        self.content.begin_text();
        self.content
            .set_font(self.state.font.resource_name(), self.state.font_size as f32);
        self.content.next_line(x as f32, self.flip(y));
        self.content.show(Str(&to_winansi(text)));
        self.content.end_text();
        self.content.restore_state();
    }

    fn wrap_lines(&self, text: &str) -> Vec<String> {
        let max_width = self.page_width - 2.0 * MARGIN;
        let mut lines = Vec::new();
        let mut current = String::new();
        for word in text.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            let width = self.state.font.text_width(&candidate, self.state.font_size);
            if width > max_width && !current.is_empty() {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            } else {
                current = candidate;
            }
        }
        if !current.is_empty() || lines.is_empty() {
            lines.push(current);
        }
        lines
    }

    // ===== Shapes =====

    /// Apply the paint options in order, then fill the closed polygon.
    /// Ignores the cursor entirely.
    pub fn polygon(&mut self, points: &[Point], ops: &[PaintOp]) {
        for op in ops {
            self.apply(*op);
        }
        let Some(first) = points.first() else {
            return;
        };
        self.content.move_to(first.x as f32, self.flip(first.y));
        for p in &points[1..] {
            self.content.line_to(p.x as f32, self.flip(p.y));
        }
        self.content.close_path();
        self.content.fill_nonzero();
    }

    fn apply(&mut self, op: PaintOp) {
        match op {
            PaintOp::FillColor(c) => self.set_fill_color(c),
            PaintOp::StrokeColor(c) => self.set_stroke_color(c),
            PaintOp::LineWidth(w) => self.set_line_width(w),
        }
    }

    /// Filled rectangle with its top-left corner at (x, y).
    pub fn rect_filled(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.content
            .rect(x as f32, self.flip(y + height), width as f32, height as f32);
        self.content.fill_nonzero();
    }

    /// Stroked line segment.
    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.content.move_to(x1 as f32, self.flip(y1));
        self.content.line_to(x2 as f32, self.flip(y2));
        self.content.stroke();
    }

    // ===== Images =====

    /// Place a registered image XObject with its top-left corner at (x, y).
    pub fn draw_image(&mut self, name: Name<'static>, x: f64, y: f64, width: f64, height: f64) {
        self.content.save_state();
        // unit image square scaled to width x height, translated to the
        // bottom-left corner in PDF space
        self.content.transform([
            width as f32,
            0.0,
            0.0,
            height as f32,
            x as f32,
            self.flip(y + height),
        ]);
        self.content.x_object(name);
        self.content.restore_state();
    }
}
