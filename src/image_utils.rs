//! Raster image loading and XObject embedding
//!
//! Images are decoded with the `image` crate and embedded as uncompressed
//! RGB samples; an alpha channel, when present, is split off into a
//! DeviceGray soft mask. Baseline JPEG files skip the decode entirely and
//! are embedded with their original DCT data.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::io::Reader as ImageReader;
use image::DynamicImage;
use jpeg_decoder::PixelFormat;
use log::debug;
use pdf_writer::{Filter, Name, Pdf, Ref};

use crate::error::{RenderError, RenderResult};

/// An image XObject registered with the document.
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedImage {
    pub id: Ref,
    pub name: Name<'static>,
    pub width: u32,
    pub height: u32,
}

impl EmbeddedImage {
    /// Aspect-preserving height for a target display width in points.
    pub fn height_for_width(&self, width: f64) -> f64 {
        width * f64::from(self.height) / f64::from(self.width)
    }
}

/// Embed an image file. Baseline JPEGs keep their compressed data
/// (DCTDecode); everything else goes through a full decode.
pub fn embed_image_file(
    pdf: &mut Pdf,
    path: &Path,
    next_ref_id: &mut i32,
) -> RenderResult<EmbeddedImage> {
    if let Some(jpeg) = try_jpeg_passthrough(path)? {
        let (data, width, height, gray) = jpeg;
        let image_id = alloc_ref(next_ref_id);
        {
            let mut xobject = pdf.image_xobject(image_id, &data);
            xobject.filter(Filter::DctDecode);
            xobject.width(width as i32);
            xobject.height(height as i32);
            if gray {
                xobject.color_space().device_gray();
            } else {
                xobject.color_space().device_rgb();
            }
            xobject.bits_per_component(8);
        }
        debug!("embedded JPEG {} ({}x{}, {} bytes)", path.display(), width, height, data.len());
        return Ok(EmbeddedImage {
            id: image_id,
            name: xobject_name(image_id),
            width,
            height,
        });
    }

    let image = load_image(path)?;
    embed_decoded(pdf, &image, next_ref_id)
}

/// Embed RGBA samples (e.g. a rasterized vector graphic) with a soft mask.
pub fn embed_rgba(
    pdf: &mut Pdf,
    rgba: &[u8],
    width: u32,
    height: u32,
    next_ref_id: &mut i32,
) -> RenderResult<EmbeddedImage> {
    if rgba.len() != (width * height * 4) as usize {
        return Err(RenderError::Image(format!(
            "RGBA buffer length {} does not match {}x{}",
            rgba.len(),
            width,
            height
        )));
    }
    let mut rgb = Vec::with_capacity((width * height * 3) as usize);
    let mut alpha = Vec::with_capacity((width * height) as usize);
    for chunk in rgba.chunks_exact(4) {
        rgb.push(chunk[0]);
        rgb.push(chunk[1]);
        rgb.push(chunk[2]);
        alpha.push(chunk[3]);
    }
    write_rgb_with_mask(pdf, &rgb, Some(&alpha), width, height, next_ref_id)
}

fn load_image(path: &Path) -> RenderResult<DynamicImage> {
    let file = File::open(path)
        .map_err(|e| RenderError::Image(format!("failed to open {}: {}", path.display(), e)))?;
    ImageReader::new(BufReader::new(file))
        .with_guessed_format()
        .map_err(|e| RenderError::Image(format!("failed to read image format: {e}")))?
        .decode()
        .map_err(|e| RenderError::Image(format!("failed to decode {}: {}", path.display(), e)))
}

fn embed_decoded(
    pdf: &mut Pdf,
    image: &DynamicImage,
    next_ref_id: &mut i32,
) -> RenderResult<EmbeddedImage> {
    let has_alpha = matches!(
        image,
        DynamicImage::ImageRgba8(_) | DynamicImage::ImageRgba16(_) | DynamicImage::ImageLumaA8(_)
    );
    if has_alpha {
        let rgba = image.to_rgba8();
        let (w, h) = rgba.dimensions();
        embed_rgba(pdf, &rgba.into_raw(), w, h, next_ref_id)
    } else {
        let rgb = image.to_rgb8();
        let (w, h) = rgb.dimensions();
        write_rgb_with_mask(pdf, &rgb.into_raw(), None, w, h, next_ref_id)
    }
}

fn write_rgb_with_mask(
    pdf: &mut Pdf,
    rgb: &[u8],
    alpha: Option<&[u8]>,
    width: u32,
    height: u32,
    next_ref_id: &mut i32,
) -> RenderResult<EmbeddedImage> {
    // soft mask first, so the image dictionary can reference it
    let smask_id = match alpha {
        Some(mask) => {
            let smask_id = alloc_ref(next_ref_id);
            let mut smask = pdf.image_xobject(smask_id, mask);
            smask.width(width as i32);
            smask.height(height as i32);
            smask.color_space().device_gray();
            smask.bits_per_component(8);
            Some(smask_id)
        }
        None => None,
    };

    let image_id = alloc_ref(next_ref_id);
    {
        let mut xobject = pdf.image_xobject(image_id, rgb);
        xobject.width(width as i32);
        xobject.height(height as i32);
        xobject.color_space().device_rgb();
        xobject.bits_per_component(8);
        if let Some(smask_id) = smask_id {
            xobject.s_mask(smask_id);
        }
    }
    debug!(
        "embedded image XObject {} ({}x{}, smask={})",
        image_id.get(),
        width,
        height,
        smask_id.is_some()
    );
    Ok(EmbeddedImage {
        id: image_id,
        name: xobject_name(image_id),
        width,
        height,
    })
}

/// Probe a file with jpeg-decoder; return the raw data and dimensions when
/// the DCT stream can be embedded directly (8-bit gray or RGB baseline).
fn try_jpeg_passthrough(path: &Path) -> RenderResult<Option<(Vec<u8>, u32, u32, bool)>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_ascii_lowercase())
        .unwrap_or_default();
    if ext != "jpg" && ext != "jpeg" {
        return Ok(None);
    }
    let file = File::open(path)
        .map_err(|e| RenderError::Image(format!("failed to open {}: {}", path.display(), e)))?;
    let mut decoder = jpeg_decoder::Decoder::new(BufReader::new(file));
    decoder
        .read_info()
        .map_err(|e| RenderError::Image(format!("failed to read JPEG header: {e}")))?;
    let info = decoder
        .info()
        .ok_or_else(|| RenderError::Image("JPEG header missing image info".into()))?;
    let gray = match info.pixel_format {
        PixelFormat::L8 => true,
        PixelFormat::RGB24 => false,
        // CMYK and 16-bit gray fall back to a full decode
        _ => return Ok(None),
    };
    let data = std::fs::read(path)?;
    Ok(Some((data, u32::from(info.width), u32::from(info.height), gray)))
}

fn alloc_ref(next_ref_id: &mut i32) -> Ref {
    let r = Ref::new(*next_ref_id);
    *next_ref_id += 1;
    r
}

// XObject resource names are tiny and live for the whole process; leaking
// them gives the 'static lifetime pdf-writer's Name wants.
fn xobject_name(id: Ref) -> Name<'static> {
    let leaked: &'static str = Box::leak(format!("I{}", id.get()).into_boxed_str());
    Name(leaked.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb as ImageRgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn embeds_png_with_alpha_as_rgb_plus_smask() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.png");
        let img = RgbaImage::from_fn(8, 4, |x, _| Rgba([x as u8 * 30, 0, 100, 200]));
        img.save(&path).unwrap();

        let mut pdf = Pdf::new();
        let mut next_ref = 10;
        let embedded = embed_image_file(&mut pdf, &path, &mut next_ref).unwrap();
        assert_eq!(embedded.width, 8);
        assert_eq!(embedded.height, 4);
        // smask consumed one ref, the image another
        assert_eq!(next_ref, 12);
        assert!(embedded.name.0.starts_with(b"I"));
    }

    #[test]
    fn embeds_jpeg_without_recompression() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.jpg");
        let img = RgbImage::from_fn(16, 16, |x, y| ImageRgb([x as u8 * 10, y as u8 * 10, 128]));
        img.save(&path).unwrap();

        let mut pdf = Pdf::new();
        let mut next_ref = 10;
        let embedded = embed_image_file(&mut pdf, &path, &mut next_ref).unwrap();
        assert_eq!((embedded.width, embedded.height), (16, 16));
        // pass-through embeds a single XObject
        assert_eq!(next_ref, 11);
    }

    #[test]
    fn aspect_preserving_height() {
        let embedded = EmbeddedImage {
            id: Ref::new(1),
            name: Name(b"I1"),
            width: 200,
            height: 100,
        };
        assert_eq!(embedded.height_for_width(100.0), 50.0);
    }

    #[test]
    fn missing_file_is_an_image_error() {
        let mut pdf = Pdf::new();
        let mut next_ref = 10;
        let err = embed_image_file(&mut pdf, Path::new("no-such-logo.png"), &mut next_ref)
            .unwrap_err();
        assert!(matches!(err, RenderError::Image(_)));
    }

    #[test]
    fn rgba_buffer_length_is_validated() {
        let mut pdf = Pdf::new();
        let mut next_ref = 10;
        let err = embed_rgba(&mut pdf, &[0u8; 10], 4, 4, &mut next_ref).unwrap_err();
        assert!(matches!(err, RenderError::Image(_)));
    }
}
