use image::RgbaImage;
use image::imageops;

use crate::effects::composite::composite;
use crate::effects::gradient::{linear_alpha, vertical_ramp};
use crate::effects::resize::resize_exact;
use crate::foundation::core::{CanvasSize, PixelOffset, Rgb8};
use crate::foundation::error::{CardError, CardResult};
use crate::foundation::math::mul_div255_u8;

/// Cover-fit `background` into `canvas`, cropping the overflow.
///
/// The crop is centered horizontally; vertically it is placed by `vertical_anchor` (0 keeps the
/// top of the source, 1 the bottom, values outside are clamped). Only the cropped region is
/// resampled. The result is fully opaque: transparent source pixels are flattened onto black.
pub fn fit_cover(
    background: &RgbaImage,
    canvas: CanvasSize,
    vertical_anchor: f64,
) -> CardResult<RgbaImage> {
    let (w, h) = background.dimensions();
    if w == 0 || h == 0 {
        return Err(CardError::processing(format!(
            "background must be non-empty (got {w}x{h})"
        )));
    }
    let anchor = if vertical_anchor.is_finite() {
        vertical_anchor.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (x, y, crop_w, crop_h) = cover_crop(w, h, canvas.width, canvas.height, anchor);
    let region = imageops::crop_imm(background, x, y, crop_w, crop_h).to_image();

    let mut out = resize_exact(&region, canvas.width, canvas.height)?;
    flatten_onto_black(&mut out);
    Ok(out)
}

/// Largest `(x, y, w, h)` region of a `w × h` source with the aspect ratio of `cw × ch`.
///
/// The region is centered horizontally and placed vertically by `anchor` in `[0, 1]`.
pub(crate) fn cover_crop(w: u32, h: u32, cw: u32, ch: u32, anchor: f64) -> (u32, u32, u32, u32) {
    let (crop_w, crop_h) = if u64::from(w) * u64::from(ch) > u64::from(cw) * u64::from(h) {
        let cropped = (f64::from(h) * f64::from(cw) / f64::from(ch)).round() as u32;
        (cropped.clamp(1, w), h)
    } else {
        let cropped = (f64::from(w) * f64::from(ch) / f64::from(cw)).round() as u32;
        (w, cropped.clamp(1, h))
    };
    let x = (w - crop_w) / 2;
    let y = ((f64::from(h - crop_h) * anchor).round() as u32).min(h - crop_h);
    (x, y, crop_w, crop_h)
}

fn flatten_onto_black(img: &mut RgbaImage) {
    for px in img.as_mut().chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 255 {
            continue;
        }
        px[0] = mul_div255_u8(u16::from(px[0]), a);
        px[1] = mul_div255_u8(u16::from(px[1]), a);
        px[2] = mul_div255_u8(u16::from(px[2]), a);
        px[3] = 255;
    }
}

/// Darken the whole canvas with a black top-to-bottom gradient.
pub fn darken_fade(canvas: &mut RgbaImage, top_alpha: u8, bottom_alpha: u8) {
    let (w, h) = canvas.dimensions();
    if (top_alpha == 0 && bottom_alpha == 0) || w == 0 || h == 0 {
        return;
    }
    let ramp = vertical_ramp(w, h, Rgb8::BLACK, |y| linear_alpha(top_alpha, bottom_alpha, y, h));
    composite(canvas, &ramp, PixelOffset::default());
}

#[cfg(test)]
#[path = "../../tests/unit/layout/background.rs"]
mod tests;
