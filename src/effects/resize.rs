use image::RgbaImage;
use image::imageops::{self, FilterType};

use crate::foundation::error::{CardError, CardResult};
use crate::foundation::math::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place};

/// Lanczos3 resize of a straight-alpha image to exactly `width × height`.
///
/// Filtering runs on premultiplied data so transparent borders of cutouts do not leave dark
/// fringes.
pub fn resize_exact(img: &RgbaImage, width: u32, height: u32) -> CardResult<RgbaImage> {
    if width == 0 || height == 0 {
        return Err(CardError::processing(format!(
            "resize target must be non-empty (got {width}x{height})"
        )));
    }
    if img.width() == 0 || img.height() == 0 {
        return Err(CardError::processing("cannot resize an empty image"));
    }
    if img.dimensions() == (width, height) {
        return Ok(img.clone());
    }

    let mut premul = img.clone();
    premultiply_rgba8_in_place(premul.as_mut());
    let mut out = imageops::resize(&premul, width, height, FilterType::Lanczos3);
    unpremultiply_rgba8_in_place(out.as_mut());
    Ok(out)
}

/// Scale uniformly so the image height becomes `height` (width rounded, at least 1 px).
pub fn scale_to_height(img: &RgbaImage, height: u32) -> CardResult<RgbaImage> {
    let (w, h) = img.dimensions();
    if h == 0 || w == 0 {
        return Err(CardError::processing("cannot scale a zero-sized image"));
    }
    let height = height.max(1);
    let width = ((f64::from(w) * f64::from(height) / f64::from(h)).round() as u32).max(1);
    resize_exact(img, width, height)
}

/// Bounding box `(x, y, w, h)` of pixels with non-zero alpha, or `None` if fully transparent.
pub fn content_bounds(img: &RgbaImage) -> Option<(u32, u32, u32, u32)> {
    let mut min_x = u32::MAX;
    let mut min_y = u32::MAX;
    let mut max_x = 0u32;
    let mut max_y = 0u32;
    let mut any = false;
    for (x, y, p) in img.enumerate_pixels() {
        if p.0[3] == 0 {
            continue;
        }
        any = true;
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }
    any.then(|| (min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
}

/// Crop away fully transparent borders. A fully transparent image is returned unchanged.
pub fn trim_transparent(img: &RgbaImage) -> RgbaImage {
    match content_bounds(img) {
        Some((x, y, w, h)) if (w, h) != img.dimensions() => {
            imageops::crop_imm(img, x, y, w, h).to_image()
        }
        _ => img.clone(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/resize.rs"]
mod tests;
