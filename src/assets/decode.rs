use std::path::Path;

use anyhow::Context;
use image::RgbaImage;

use crate::foundation::error::{CardError, CardResult};
use crate::foundation::math::unpremultiply_rgba8_in_place;

/// SVGs are rasterized so their longer side is at least this many pixels; layout stages only
/// ever downscale from there.
const SVG_MIN_LONG_SIDE: f32 = 1024.0;
const SVG_MAX_DIM: u32 = 16_384;

/// Decode raster (PNG, JPEG, WebP, ...) or SVG bytes into a straight-alpha RGBA image.
pub fn decode_image(bytes: &[u8]) -> CardResult<RgbaImage> {
    if looks_like_svg(bytes) {
        return rasterize_svg(bytes);
    }
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    if rgba.width() == 0 || rgba.height() == 0 {
        return Err(CardError::processing("decoded image is empty"));
    }
    Ok(rgba)
}

/// Read and decode an image file.
pub fn load_image(path: impl AsRef<Path>) -> CardResult<RgbaImage> {
    let path = path.as_ref();
    let bytes =
        std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    decode_image(&bytes)
}

/// Sniff for an XML/SVG document without parsing it.
pub fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    let Ok(text) = std::str::from_utf8(head) else {
        return false;
    };
    let text = text.trim_start_matches('\u{feff}').trim_start();
    text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg"))
}

/// Parse and rasterize SVG bytes with `resvg`.
pub fn rasterize_svg(bytes: &[u8]) -> CardResult<RgbaImage> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;

    let size = tree.size();
    let (sw, sh) = (size.width(), size.height());
    if !(sw.is_finite() && sh.is_finite() && sw > 0.0 && sh > 0.0) {
        return Err(CardError::processing("svg has invalid width/height"));
    }
    let scale = (SVG_MIN_LONG_SIDE / sw.max(sh)).max(1.0);
    let width = ((sw * scale).ceil() as u32).max(1);
    let height = ((sh * scale).ceil() as u32).max(1);
    if width > SVG_MAX_DIM || height > SVG_MAX_DIM {
        return Err(CardError::processing(format!(
            "svg raster size too large: {width}x{height} (max {SVG_MAX_DIM}x{SVG_MAX_DIM})"
        )));
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| CardError::processing("failed to allocate svg pixmap"))?;
    let xform = resvg::tiny_skia::Transform::from_scale(
        width as f32 / sw,
        height as f32 / sh,
    );
    resvg::render(&tree, xform, &mut pixmap.as_mut());

    let mut data = pixmap.take();
    unpremultiply_rgba8_in_place(&mut data);
    RgbaImage::from_raw(width, height, data)
        .ok_or_else(|| CardError::processing("svg pixmap does not match its size"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
