//! Single-page PDF document lifecycle
//!
//! Owns the pdf-writer object graph: catalog, page tree, the one page, its
//! content stream and resources. Draw calls go through the [`Canvas`];
//! images and the signature are embedded as XObjects up front and placed by
//! name. `save` finalizes everything and writes the file in one shot.

use std::path::Path;

use log::info;
use pdf_writer::{Finish, Pdf, Rect, Ref};

use crate::canvas::Canvas;
use crate::error::RenderResult;
use crate::fonts::FontRegistry;
use crate::image_utils::{self, EmbeddedImage};
use crate::svg_utils::SignatureArt;

/// US Letter landscape, in points.
pub const PAGE_WIDTH: f64 = 792.0;
pub const PAGE_HEIGHT: f64 = 612.0;

pub struct Document {
    pdf: Pdf,
    page_tree_id: Ref,
    page_id: Ref,
    content_id: Ref,
    next_ref_id: i32,
    canvas: Canvas,
    images: Vec<EmbeddedImage>,
}

impl Document {
    /// A blank landscape US Letter page.
    pub fn landscape_letter() -> Self {
        Self::new(PAGE_WIDTH, PAGE_HEIGHT)
    }

    pub fn new(page_width: f64, page_height: f64) -> Self {
        let mut pdf = Pdf::new();
        let catalog_id = Ref::new(1);
        let page_tree_id = Ref::new(2);
        let page_id = Ref::new(3);
        let content_id = Ref::new(4);
        pdf.catalog(catalog_id).pages(page_tree_id);
        Self {
            pdf,
            page_tree_id,
            page_id,
            content_id,
            next_ref_id: 5,
            canvas: Canvas::new(page_width, page_height),
            images: Vec::new(),
        }
    }

    pub fn canvas(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    /// Embed a raster image file and return its placement handle.
    pub fn embed_image_file(&mut self, path: &Path) -> RenderResult<EmbeddedImage> {
        let embedded = image_utils::embed_image_file(&mut self.pdf, path, &mut self.next_ref_id)?;
        self.images.push(embedded);
        Ok(embedded)
    }

    /// Rasterize vector art for the given display size (in points) and
    /// embed the result.
    pub fn embed_vector_art(
        &mut self,
        art: &SignatureArt,
        display_width: f64,
        display_height: f64,
    ) -> RenderResult<EmbeddedImage> {
        let (rgba, px_w, px_h) = art.rasterize(display_width, display_height)?;
        let embedded =
            image_utils::embed_rgba(&mut self.pdf, &rgba, px_w, px_h, &mut self.next_ref_id)?;
        self.images.push(embedded);
        Ok(embedded)
    }

    /// Finalize the page and write the document to `path`. Overwrites any
    /// existing file.
    pub fn save(self, path: &Path) -> RenderResult<()> {
        let Self {
            mut pdf,
            page_tree_id,
            page_id,
            content_id,
            mut next_ref_id,
            canvas,
            images,
        } = self;

        let (page_width, page_height) = canvas.page_size();
        let (content_bytes, fonts_used) = canvas.finish();
        pdf.stream(content_id, &content_bytes);

        // font objects must exist before the page borrows the writer
        let mut fonts = FontRegistry::new();
        for font in fonts_used {
            let id = Ref::new(next_ref_id);
            next_ref_id += 1;
            fonts.register(&mut pdf, font, id);
        }

        let mut page = pdf.page(page_id);
        page.media_box(Rect::new(0.0, 0.0, page_width as f32, page_height as f32));
        page.parent(page_tree_id);
        page.contents(content_id);
        {
            let mut resources = page.resources();
            fonts.write_resources(&mut resources);
            if !images.is_empty() {
                let mut dict = resources.x_objects();
                for image in &images {
                    dict.pair(image.name, image.id);
                }
            }
        }
        page.finish();

        pdf.pages(page_tree_id).kids([page_id]).count(1);

        let bytes = pdf.finish();
        info!("writing {} ({} bytes)", path.display(), bytes.len());
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::Font;
    use crate::types::Color;

    #[test]
    fn saves_a_wellformed_single_page_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.pdf");

        let mut doc = Document::landscape_letter();
        let c = doc.canvas();
        c.set_font(Font::Helvetica, 12.0);
        c.set_text_color(Color::rgb(50, 50, 50));
        c.move_to(100.0, 100.0);
        c.text("hello");
        doc.save(&path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        assert!(bytes.len() > 200);
    }

    #[test]
    fn extracted_text_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("text.pdf");

        let mut doc = Document::landscape_letter();
        let c = doc.canvas();
        c.set_font(Font::TimesBold, 42.0);
        c.move_to(0.0, 300.0);
        c.write_centered("Jane Doe", 42.0);
        doc.save(&path).unwrap();

        let text = pdf_extract::extract_text(&path).unwrap();
        assert!(text.contains("Jane Doe"), "extracted: {text:?}");
    }
}
