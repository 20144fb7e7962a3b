//! The certificate page recipe
//!
//! A linear sequence of draw calls with hand-tuned coordinates, tuned for
//! landscape US Letter. Not reusable layout machinery; when a coordinate
//! looks arbitrary, it is.

use std::path::{Path, PathBuf};

use chrono::{Datelike, Local};
use log::debug;

use crate::canvas::PaintOp;
use crate::document::{Document, PAGE_HEIGHT, PAGE_WIDTH};
use crate::error::RenderResult;
use crate::fonts::Font;
use crate::svg_utils::SignatureArt;
use crate::types::{Color, Point};

/// Brand colors for the corner banners; the secondary is translucent and
/// flattens to a lighter shade of the primary.
const PRIMARY: Color = Color::rgba(103, 60, 79, 255);
const SECONDARY: Color = Color::rgba(103, 60, 79, 220);

const TEXT_DARK: Color = Color::rgb(50, 50, 50);
const TEXT_GRAY: Color = Color::rgb(100, 100, 100);

const TITLE: &str = "Certificate of Completion";
const SUBTITLE: &str = "This certificate is awarded to";
const BODY: &str = "For successfully completing the Creating a PDF exercise \
                    in the document generation course and demonstrating \
                    mastery of automated page layout";

pub struct RenderOptions {
    /// Honoree name printed in the center of the page.
    pub name: String,
    pub logo_path: PathBuf,
    pub signature_path: PathBuf,
    /// Overlay the layout calibration grid.
    pub grid: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            name: String::new(),
            logo_path: PathBuf::from("assets/logo.png"),
            signature_path: PathBuf::from("assets/sig.svg"),
            grid: false,
        }
    }
}

/// Render the certificate and write it to `output`.
pub fn generate(options: &RenderOptions, output: &Path) -> RenderResult<()> {
    let (w, h) = (PAGE_WIDTH, PAGE_HEIGHT);
    let mut doc = Document::landscape_letter();

    // Top and bottom banners: two triangles per edge, the translucent one
    // drawn first so the opaque wedge overlaps it.
    let canvas = doc.canvas();
    canvas.polygon(
        &[
            Point::new(0.0, 0.0),
            Point::new(0.0, h / 9.0),
            Point::new(w - w / 6.0, 0.0),
        ],
        &[PaintOp::FillColor(SECONDARY)],
    );
    canvas.polygon(
        &[
            Point::new(w / 6.0, 0.0),
            Point::new(w, 0.0),
            Point::new(w, h / 9.0),
        ],
        &[PaintOp::FillColor(PRIMARY)],
    );
    canvas.polygon(
        &[
            Point::new(w, h),
            Point::new(w, h - h / 8.0),
            Point::new(w / 6.0, h),
        ],
        &[PaintOp::FillColor(SECONDARY)],
    );
    canvas.polygon(
        &[
            Point::new(0.0, h),
            Point::new(0.0, h - h / 8.0),
            Point::new(w - w / 6.0, h),
        ],
        &[PaintOp::FillColor(PRIMARY)],
    );

    // Title
    canvas.set_font(Font::TimesBold, 50.0);
    canvas.set_text_color(TEXT_DARK);
    canvas.move_to(0.0, 100.0);
    let mut line_ht = canvas.line_height();
    canvas.write_centered(TITLE, line_ht);
    canvas.move_by(0.0, line_ht * 2.0);

    // Award line
    canvas.set_font(Font::Helvetica, 28.0);
    line_ht = canvas.line_height();
    canvas.write_centered(SUBTITLE, line_ht);
    canvas.move_by(0.0, line_ht * 2.0);

    // Honoree name
    canvas.set_font(Font::TimesBold, 42.0);
    line_ht = canvas.line_height();
    canvas.write_centered(&options.name, line_ht);
    canvas.move_by(0.0, line_ht * 1.75);

    // Completion statement, 1.5x line spacing
    canvas.set_font(Font::Helvetica, 22.0);
    line_ht = canvas.line_height();
    canvas.write_centered(BODY, line_ht * 1.5);
    canvas.move_by(0.0, line_ht * 4.5);

    // Logo, 100pt wide, centered
    debug!("embedding logo {}", options.logo_path.display());
    let logo = doc.embed_image_file(&options.logo_path)?;
    let canvas = doc.canvas();
    let (_, y) = canvas.position();
    canvas.draw_image(logo.name, w / 2.0 - 50.0, y, 100.0, logo.height_for_width(100.0));

    // Rule lines above "Date" and "Student Signature"
    canvas.move_by(0.0, 65.0);
    canvas.set_fill_color(TEXT_GRAY);
    let (_, rule_y) = canvas.position();
    canvas.rect_filled(60.0, rule_y, 240.0, 1.0);
    canvas.rect_filled(490.0, rule_y, 240.0, 1.0);

    // Captions under the rules
    canvas.set_font(Font::Helvetica, 12.0);
    canvas.move_by(0.0, line_ht / 1.5);
    canvas.set_text_color(TEXT_GRAY);
    let (_, caption_y) = canvas.position();
    canvas.move_to(60.0 + 105.0, caption_y);
    canvas.text("Date");
    canvas.move_to(490.0 + 60.0, caption_y);
    canvas.text("Student Signature");
    canvas.move_to(60.0, caption_y - line_ht / 1.5);

    // Today's date, centered over the left rule
    canvas.set_font(Font::TimesRoman, 22.0);
    line_ht = canvas.line_height();
    canvas.move_by(0.0, -line_ht);
    canvas.set_text_color(TEXT_DARK);
    canvas.cell_centered(240.0, line_ht, &today());
    let (_, date_y) = canvas.position();
    canvas.move_to(490.0, date_y);

    // Signature art over the right rule, at half its intrinsic size,
    // lifted in proportion to its own height
    debug!("embedding signature {}", options.signature_path.display());
    let signature = SignatureArt::load(&options.signature_path)?;
    let (sig_w, sig_h) = (signature.width() * 0.5, signature.height() * 0.5);
    let embedded = doc.embed_vector_art(&signature, sig_w, sig_h)?;
    let canvas = doc.canvas();
    canvas.move_by(0.0, -(0.45 * signature.height() - line_ht));
    let (sig_x, sig_y) = canvas.position();
    canvas.draw_image(embedded.name, sig_x, sig_y, sig_w, sig_h);

    if options.grid {
        draw_grid(doc.canvas());
    }

    doc.save(output)
}

/// Numeric month/day/year, no zero padding.
fn today() -> String {
    let now = Local::now();
    format!("{}/{}/{}", now.month(), now.day(), now.year())
}

/// Calibration overlay: evenly spaced rules with coordinate labels, for
/// re-tuning the layout constants.
fn draw_grid(canvas: &mut crate::canvas::Canvas) {
    let (w, h) = canvas.page_size();
    canvas.set_font(Font::Courier, 12.0);
    canvas.set_stroke_color(Color::rgb(200, 200, 200));
    let line_ht = canvas.line_height();
    let step = w / 20.0;

    let mut x = 0.0;
    while x < w {
        canvas.set_text_color(Color::rgb(200, 200, 200));
        canvas.line(x, 0.0, x, h);
        canvas.move_to(x, line_ht);
        canvas.text(&format!("{}", x as i32));
        x += step;
    }
    let mut y = 0.0;
    while y < h {
        canvas.set_text_color(Color::rgb(80, 80, 80));
        canvas.line(0.0, y, w, y);
        canvas.move_to(0.0, y);
        canvas.text(&format!("{}", y as i32));
        y += step;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    const SIG_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="220" height="90">
  <path d="M 15 60 C 40 15, 60 75, 90 40 S 140 65, 165 35 S 195 55, 205 45" stroke="#1a1a2e" stroke-width="3" fill="none"/>
</svg>"##;

    fn write_assets(dir: &Path) -> (PathBuf, PathBuf) {
        let logo = dir.join("logo.png");
        let sig = dir.join("sig.svg");
        let img = RgbaImage::from_fn(64, 64, |x, y| {
            Rgba([x as u8 * 4, y as u8 * 4, 160, if x > 8 { 255 } else { 0 }])
        });
        img.save(&logo).unwrap();
        std::fs::write(&sig, SIG_SVG).unwrap();
        (logo, sig)
    }

    #[test]
    fn generates_certificate_with_name_and_date() {
        let dir = tempfile::tempdir().unwrap();
        let (logo_path, signature_path) = write_assets(dir.path());
        let output = dir.path().join("cert.pdf");

        let options = RenderOptions {
            name: "Jane Doe".to_string(),
            logo_path,
            signature_path,
            grid: false,
        };
        generate(&options, &output).unwrap();

        let metadata = std::fs::metadata(&output).unwrap();
        assert!(metadata.len() > 0);

        let text = pdf_extract::extract_text(&output).unwrap();
        assert!(text.contains("Jane Doe"), "extracted: {text:?}");
        assert!(text.contains("Certificate of Completion"), "extracted: {text:?}");
        assert!(text.contains(&today()), "extracted: {text:?}");
    }

    #[test]
    fn empty_name_still_produces_a_document() {
        let dir = tempfile::tempdir().unwrap();
        let (logo_path, signature_path) = write_assets(dir.path());
        let output = dir.path().join("cert.pdf");

        let options = RenderOptions {
            name: String::new(),
            logo_path,
            signature_path,
            grid: false,
        };
        generate(&options, &output).unwrap();
        let text = pdf_extract::extract_text(&output).unwrap();
        assert!(text.contains("This certificate is awarded to"));
    }

    #[test]
    fn grid_overlay_renders() {
        let dir = tempfile::tempdir().unwrap();
        let (logo_path, signature_path) = write_assets(dir.path());
        let output = dir.path().join("cert-grid.pdf");

        let options = RenderOptions {
            name: "Grid".to_string(),
            logo_path,
            signature_path,
            grid: true,
        };
        generate(&options, &output).unwrap();
        let text = pdf_extract::extract_text(&output).unwrap();
        // grid labels step in multiples of 39 (792 / 20)
        assert!(text.contains("39"), "extracted: {text:?}");
    }

    #[test]
    fn missing_logo_aborts_generation() {
        let dir = tempfile::tempdir().unwrap();
        let (_, signature_path) = write_assets(dir.path());
        let output = dir.path().join("cert.pdf");

        let options = RenderOptions {
            name: "X".to_string(),
            logo_path: dir.path().join("absent.png"),
            signature_path,
            grid: false,
        };
        assert!(generate(&options, &output).is_err());
        assert!(!output.exists());
    }
}
