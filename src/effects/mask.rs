use image::RgbaImage;

use crate::effects::raster::fill_coverage;
use crate::foundation::error::CardResult;
use crate::foundation::math::mul_div255_u8;

/// Mask `img` with an anti-aliased rounded rectangle covering the whole image.
///
/// The radius is clamped to half the shorter side; a non-positive radius leaves the image as is.
pub fn round_corners(img: &mut RgbaImage, radius: f64) -> CardResult<()> {
    let (w, h) = img.dimensions();
    if !(radius.is_finite() && radius > 0.0) || w == 0 || h == 0 {
        return Ok(());
    }
    let radius = radius.min(f64::from(w.min(h)) / 2.0);
    let rr = kurbo::RoundedRect::new(0.0, 0.0, f64::from(w), f64::from(h), radius);
    let coverage = fill_coverage(w, h, &rr)?;
    apply_alpha_mask(img, coverage.as_raw());
    Ok(())
}

/// Multiply each pixel's alpha by the matching 8-bit mask value.
pub(crate) fn apply_alpha_mask(img: &mut RgbaImage, mask: &[u8]) {
    for (px, &m) in img.as_mut().chunks_exact_mut(4).zip(mask) {
        px[3] = mul_div255_u8(u16::from(px[3]), u16::from(m));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/mask.rs"]
mod tests;
