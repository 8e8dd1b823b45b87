use image::{RgbaImage, imageops};

use crate::effects::blur::{blur_gray, gaussian_blur};
use crate::effects::composite::{composite, composite_additive};
use crate::effects::gradient::{linear_alpha, vertical_ramp};
use crate::effects::raster::fill_coverage;
use crate::foundation::core::{PixelOffset, Rgb8};
use crate::foundation::error::CardResult;
use crate::foundation::math::scale_u8;
use crate::layout::palette::dominant_color;
use crate::scene::params::{BandSpec, BandTechnique, GlowTechnique, LayoutMode};
use crate::scene::style::{BlurDarkenStyle, CardStyle, GlowBandStyle, MaskFadeStyle};

/// Apply the band resolved from `spec` for `mode`.
///
/// Returns the glow color when a glow was drawn.
pub fn apply_band(
    canvas: &mut RgbaImage,
    spec: &BandSpec,
    mode: LayoutMode,
    style: &CardStyle,
) -> CardResult<Option<Rgb8>> {
    match spec.resolved_technique(mode) {
        BandTechnique::Auto | BandTechnique::None => Ok(None),
        BandTechnique::BlurDarken => {
            apply_blur_darken(canvas, &style.blur_darken, spec.intensity, spec.blur)?;
            Ok(None)
        }
        BandTechnique::Glow => {
            let color = match spec.glow {
                GlowTechnique::Ellipses => {
                    let color = match spec.color {
                        Some(c) => c,
                        None => sample_color(canvas, style.glow.sample_start_ratio, style)?,
                    };
                    apply_glow_ellipses(canvas, color, &style.glow, spec.intensity)?;
                    color
                }
                GlowTechnique::MaskFade => apply_mask_fade(
                    canvas,
                    spec.color,
                    &style.mask_fade,
                    spec.intensity,
                    spec.blur,
                    style,
                )?,
            };
            Ok(Some(color))
        }
    }
}

/// Blur the lowest band of the canvas and darken it with a vertical gradient.
pub fn apply_blur_darken(
    canvas: &mut RgbaImage,
    style: &BlurDarkenStyle,
    intensity: f32,
    blur: bool,
) -> CardResult<()> {
    let (w, h) = canvas.dimensions();
    let band_h = ((f64::from(h) * style.band_height_ratio) as u32).min(h);
    if band_h == 0 || w == 0 {
        return Ok(());
    }
    let top = h - band_h;

    let crop = imageops::crop_imm(canvas, 0, top, w, band_h).to_image();
    let mut band = if blur {
        gaussian_blur(&crop, style.blur_radius * intensity.max(0.0))?
    } else {
        crop
    };

    let bottom_alpha = (f32::from(style.bottom_alpha) * intensity.max(0.0))
        .round()
        .clamp(0.0, 255.0) as u8;
    let ramp = vertical_ramp(w, band_h, Rgb8::BLACK, |y| {
        linear_alpha(style.top_alpha, bottom_alpha, y, band_h)
    });
    composite(&mut band, &ramp, PixelOffset::default());
    imageops::replace(canvas, &band, 0, i64::from(top));
    Ok(())
}

/// Layered glow: blurred half-ellipses on the bottom edge summed into one overlay of `color`.
pub fn apply_glow_ellipses(
    canvas: &mut RgbaImage,
    color: Rgb8,
    style: &GlowBandStyle,
    intensity: f32,
) -> CardResult<()> {
    let (w, h) = canvas.dimensions();
    if w == 0 || h == 0 || style.layers.is_empty() {
        return Ok(());
    }

    let mut overlay = RgbaImage::new(w, h);
    let center = kurbo::Point::new(f64::from(w) / 2.0, f64::from(h));
    for layer in &style.layers {
        let radii = kurbo::Vec2::new(
            f64::from(w) * layer.radius_x_ratio,
            f64::from(h) * layer.radius_y_ratio,
        );
        if radii.x <= 0.0 || radii.y <= 0.0 {
            continue;
        }
        let coverage = fill_coverage(w, h, &kurbo::Ellipse::new(center, radii, 0.0))?;
        let coverage = blur_gray(&coverage, layer.blur_radius)?;
        let opacity = (layer.opacity * intensity).clamp(0.0, 1.0);
        let mut glow = RgbaImage::new(w, h);
        for (px, &c) in glow.pixels_mut().zip(coverage.as_raw()) {
            *px = color.with_alpha(scale_u8(c, opacity));
        }
        composite_additive(&mut overlay, &glow, PixelOffset::default());
    }
    composite(canvas, &overlay, PixelOffset::default());
    Ok(())
}

/// Mask-fade glow: a blurred copy of the band fades in over its top part, then a tint of the
/// band's color rises to a peak at mid-band and falls off toward the bottom edge.
///
/// Returns the tint color.
pub fn apply_mask_fade(
    canvas: &mut RgbaImage,
    color: Option<Rgb8>,
    style: &MaskFadeStyle,
    intensity: f32,
    blur: bool,
    card: &CardStyle,
) -> CardResult<Rgb8> {
    let (w, h) = canvas.dimensions();
    let start = ((f64::from(h) * style.start_ratio).max(0.0) as u32).min(h);
    let band_h = h - start;
    if band_h == 0 || w == 0 {
        return Ok(color.unwrap_or(card.palette.fallback));
    }

    if blur {
        let crop = imageops::crop_imm(canvas, 0, start, w, band_h).to_image();
        let blurred = gaussian_blur(&crop, style.blur_radius * intensity.max(0.0))?;
        let transition = ((f64::from(band_h) * style.transition_ratio) as u32).max(1);
        for y in 0..band_h {
            let t = (f64::from(y) / f64::from(transition)).min(1.0);
            let m = (255.0 * t * t * (3.0 - 2.0 * t)).round() as u16;
            for x in 0..w {
                let dst = canvas.get_pixel_mut(x, start + y);
                let src = blurred.get_pixel(x, y);
                for (d, &s) in dst.0.iter_mut().zip(&src.0) {
                    let mixed = u32::from(*d) * u32::from(255 - m) + u32::from(s) * u32::from(m);
                    *d = ((mixed + 127) / 255) as u8;
                }
            }
        }
    }

    let color = match color {
        Some(c) => c,
        None => sample_color(canvas, style.start_ratio, card)?,
    };

    let peak = f64::from(style.tint_peak_alpha) * f64::from(intensity.max(0.0));
    let tint = vertical_ramp(w, band_h, color, |y| {
        let p = f64::from(y) / f64::from(band_h);
        let a = if p < 0.5 {
            peak * p * 2.0
        } else {
            peak * (1.0 - (p - 0.5) * 2.0 * style.tint_tail_drop)
        };
        a.clamp(0.0, 255.0) as u8
    });
    composite(canvas, &tint, PixelOffset::new(0, i64::from(start)));
    Ok(color)
}

fn sample_color(canvas: &RgbaImage, start_ratio: f64, style: &CardStyle) -> CardResult<Rgb8> {
    let (w, h) = canvas.dimensions();
    let start = ((f64::from(h) * start_ratio).max(0.0) as u32).min(h);
    let region = imageops::crop_imm(canvas, 0, start, w, h - start).to_image();
    dominant_color(&region, &style.palette)
}

#[cfg(test)]
#[path = "../../tests/unit/layout/band.rs"]
mod tests;
