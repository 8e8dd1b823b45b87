use image::RgbaImage;

use crate::effects::resize::resize_exact;
use crate::foundation::core::{CanvasSize, PixelOffset};
use crate::foundation::error::{CardError, CardResult};
use crate::foundation::math::scale_u8;
use crate::layout::characters::Placement;
use crate::scene::params::{Corner, LogoOptions};

/// Scale, recolor and position the provider logo in its corner.
///
/// The logo keeps its aspect ratio and fits within `max_width_ratio × max_height_ratio` of the
/// canvas. Inversion flips RGB and keeps alpha; opacity multiplies alpha.
pub fn place_logo(
    logo: &RgbaImage,
    canvas: CanvasSize,
    options: &LogoOptions,
) -> CardResult<Placement> {
    let (w, h) = logo.dimensions();
    if w == 0 || h == 0 {
        return Err(CardError::processing("logo image must be non-empty"));
    }
    let max_w = f64::from(canvas.width) * options.max_width_ratio;
    let max_h = f64::from(canvas.height) * options.max_height_ratio;
    let scale = (max_w / f64::from(w)).min(max_h / f64::from(h));
    let lw = ((f64::from(w) * scale) as u32).max(1);
    let lh = ((f64::from(h) * scale) as u32).max(1);

    let mut image = resize_exact(logo, lw, lh)?;
    let opacity = options.opacity.clamp(0.0, 1.0);
    for px in image.pixels_mut() {
        if options.invert {
            px.0[0] = 255 - px.0[0];
            px.0[1] = 255 - px.0[1];
            px.0[2] = 255 - px.0[2];
        }
        if opacity < 1.0 {
            px.0[3] = scale_u8(px.0[3], opacity);
        }
    }

    let offset = corner_offset(canvas, (lw, lh), options.corner, options.margin);
    Ok(Placement {
        image,
        offset,
        halo: None,
    })
}

/// Top-left position of a `size` box attached to `corner` with `margin` pixels of clearance.
pub fn corner_offset(canvas: CanvasSize, size: (u32, u32), corner: Corner, margin: u32) -> PixelOffset {
    let m = i64::from(margin);
    let right = i64::from(canvas.width) - i64::from(size.0) - m;
    let bottom = i64::from(canvas.height) - i64::from(size.1) - m;
    match corner {
        Corner::TopLeft => PixelOffset::new(m, m),
        Corner::TopRight => PixelOffset::new(right, m),
        Corner::BottomLeft => PixelOffset::new(m, bottom),
        Corner::BottomRight => PixelOffset::new(right, bottom),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/logo.rs"]
mod tests;
