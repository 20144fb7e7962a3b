//! Vector signature loading and rasterization
//!
//! The signature file is parsed with usvg; a parse failure is fatal for the
//! run. Placement math uses the SVG's intrinsic size in points, while the
//! pixels that end up in the PDF come from a resvg render at a higher
//! resolution so the downscaled art stays crisp.

use std::path::Path;

use log::debug;
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};

use crate::error::{RenderError, RenderResult};

/// Rasterization density for embedded vector art, in pixels per point.
/// 300 dpi over the 72 dpi page space.
const PIXELS_PER_POINT: f32 = 300.0 / 72.0;

#[derive(Debug)]
pub struct SignatureArt {
    tree: Tree,
}

impl SignatureArt {
    pub fn load(path: &Path) -> RenderResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| RenderError::Svg(format!("failed to read {}: {}", path.display(), e)))?;
        Self::from_str(&text)
    }

    pub fn from_str(text: &str) -> RenderResult<Self> {
        let options = Options::default();
        let fontdb = resvg::usvg::fontdb::Database::new();
        let tree = Tree::from_str(text, &options, &fontdb)
            .map_err(|e| RenderError::Svg(format!("failed to parse SVG: {e}")))?;
        Ok(Self { tree })
    }

    /// Intrinsic width in points.
    pub fn width(&self) -> f64 {
        f64::from(self.tree.size().width())
    }

    /// Intrinsic height in points.
    pub fn height(&self) -> f64 {
        f64::from(self.tree.size().height())
    }

    /// Render the art for a display size in points, returning straight
    /// (non-premultiplied) RGBA samples and the pixel dimensions.
    pub fn rasterize(&self, display_width: f64, display_height: f64) -> RenderResult<(Vec<u8>, u32, u32)> {
        let target_w = ((display_width as f32) * PIXELS_PER_POINT).ceil().max(1.0) as u32;
        let target_h = ((display_height as f32) * PIXELS_PER_POINT).ceil().max(1.0) as u32;
        let mut pixmap = Pixmap::new(target_w, target_h)
            .ok_or_else(|| RenderError::Svg("failed to allocate pixmap".into()))?;

        let size = self.tree.size();
        let transform = Transform::from_scale(
            target_w as f32 / size.width(),
            target_h as f32 / size.height(),
        );
        resvg::render(&self.tree, transform, &mut pixmap.as_mut());
        debug!(
            "rasterized signature {:.1}x{:.1}pt -> {}x{}px",
            display_width, display_height, target_w, target_h
        );

        let mut rgba = Vec::with_capacity((target_w * target_h * 4) as usize);
        for pixel in pixmap.pixels() {
            let c = pixel.demultiply();
            rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        Ok((rgba, target_w, target_h))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STROKE_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="120" height="40">
  <path d="M 10 30 C 30 5, 50 35, 70 15 S 100 30, 110 20" stroke="#202020" stroke-width="3" fill="none"/>
</svg>"##;

    #[test]
    fn reports_intrinsic_size() {
        let art = SignatureArt::from_str(STROKE_SVG).unwrap();
        assert_eq!(art.width(), 120.0);
        assert_eq!(art.height(), 40.0);
    }

    #[test]
    fn rasterization_produces_ink() {
        let art = SignatureArt::from_str(STROKE_SVG).unwrap();
        let (rgba, w, h) = art.rasterize(60.0, 20.0).unwrap();
        assert_eq!(rgba.len(), (w * h * 4) as usize);
        // some pixels must be inked (nonzero alpha)
        assert!(rgba.chunks_exact(4).any(|p| p[3] > 0));
    }

    #[test]
    fn malformed_svg_is_an_svg_error() {
        let err = SignatureArt::from_str("<svg").unwrap_err();
        assert!(matches!(err, crate::error::RenderError::Svg(_)));
    }

    #[test]
    fn missing_file_is_an_svg_error() {
        let err = SignatureArt::load(Path::new("no-such-sig.svg")).unwrap_err();
        assert!(matches!(err, crate::error::RenderError::Svg(_)));
    }
}
