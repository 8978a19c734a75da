//! Preview rendering for icon files.
//!
//! Raster icons are decoded with `image`; SVG icons are rasterized with
//! `resvg`. Both are scaled to fit a square of the requested size with the
//! aspect ratio preserved.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use image::imageops::FilterType;
use image::{DynamicImage, Rgba, RgbaImage};
use resvg::tiny_skia;
use resvg::usvg;

/// A rendered icon, ready to hand to a view.
///
/// Cloning is cheap; the pixel buffer is shared.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    image: Arc<RgbaImage>,
}

impl Preview {
    /// Wrap an already decoded image.
    pub fn from_image(image: RgbaImage) -> Self {
        Self {
            image: Arc::new(image),
        }
    }

    /// A drawn stand-in for icons that cannot be loaded at all.
    ///
    /// Renders a grey frame with a diagonal cross.
    pub fn placeholder(size: u32) -> Self {
        let size = size.max(1);
        let stroke = Rgba([128, 128, 128, 255]);
        let image = RgbaImage::from_fn(size, size, |x, y| {
            let edge = x == 0 || y == 0 || x == size - 1 || y == size - 1;
            if edge || x == y || x + y == size - 1 {
                stroke
            } else {
                Rgba([0, 0, 0, 0])
            }
        });
        Self::from_image(image)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// The RGBA pixels (straight alpha).
    pub fn as_rgba(&self) -> &RgbaImage {
        &self.image
    }
}

/// Render an icon file at `size`.
///
/// SVG files are rasterized directly at the target size; every other format
/// is decoded and then scaled.
pub fn render_file(path: &Path, size: u32) -> crate::Result<Preview> {
    let size = size.max(1);
    let is_svg = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"));

    if is_svg {
        let data = fs::read(path).map_err(|e| crate::Error::io(path, e))?;
        render_svg(&data, size)
            .map_err(|message| crate::Error::render(path.display().to_string(), message))
    } else {
        let decoded = image::open(path)
            .map_err(|e| crate::Error::render(path.display().to_string(), e.to_string()))?;
        Ok(fit(decoded, size))
    }
}

/// Scale an image down (or up) to fit the square, preserving aspect.
fn fit(image: DynamicImage, size: u32) -> Preview {
    if image.width() == size && image.height() == size {
        return Preview::from_image(image.into_rgba8());
    }
    Preview::from_image(image.resize(size, size, FilterType::Triangle).into_rgba8())
}

/// Rasterize SVG data into a `size` x `size` canvas.
fn render_svg(data: &[u8], size: u32) -> std::result::Result<Preview, String> {
    let options = usvg::Options::default();
    let tree = usvg::Tree::from_data(data, &options)
        .map_err(|e| format!("Failed to parse SVG: {e}"))?;

    let natural = tree.size();
    if natural.width() <= 0.0 || natural.height() <= 0.0 {
        return Err("SVG has an empty canvas".to_string());
    }

    let mut pixmap = tiny_skia::Pixmap::new(size, size)
        .ok_or_else(|| format!("Cannot allocate a {size}x{size} canvas"))?;

    // Uniform scale, centered on the longer axis
    let scale = (size as f32 / natural.width()).min(size as f32 / natural.height());
    let dx = (size as f32 - natural.width() * scale) / 2.0;
    let dy = (size as f32 - natural.height() * scale) / 2.0;
    let transform = tiny_skia::Transform::from_scale(scale, scale).post_translate(dx, dy);

    resvg::render(&tree, transform, &mut pixmap.as_mut());

    // Convert from premultiplied RGBA to straight RGBA
    let mut result = Vec::with_capacity(pixmap.data().len());
    for chunk in pixmap.data().chunks(4) {
        let a = chunk[3] as f32 / 255.0;
        if a > 0.0 {
            result.push((chunk[0] as f32 / a).min(255.0) as u8);
            result.push((chunk[1] as f32 / a).min(255.0) as u8);
            result.push((chunk[2] as f32 / a).min(255.0) as u8);
            result.push(chunk[3]);
        } else {
            result.extend_from_slice(&[0, 0, 0, 0]);
        }
    }

    RgbaImage::from_raw(size, size, result)
        .map(Preview::from_image)
        .ok_or_else(|| "Rendered buffer has the wrong length".to_string())
}
