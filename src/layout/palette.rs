use std::collections::HashMap;

use image::RgbaImage;

use crate::effects::resize::resize_exact;
use crate::foundation::core::Rgb8;
use crate::foundation::error::CardResult;
use crate::scene::style::PaletteStyle;

/// Most frequent sufficiently colorful color of `region`, or `style.fallback`.
///
/// The region is resampled to a `grid × grid` thumbnail, each channel is quantized to
/// `style.levels` buckets (represented by the bucket center) and buckets are ranked by pixel count.
/// The first bucket that is chromatic enough, bright enough, not near-black and not near-white
/// wins.
pub fn dominant_color(region: &RgbaImage, style: &PaletteStyle) -> CardResult<Rgb8> {
    let (w, h) = region.dimensions();
    if w == 0 || h == 0 || style.grid == 0 || style.levels == 0 {
        return Ok(style.fallback);
    }
    let thumb = resize_exact(region, style.grid, style.grid)?;

    let step = (256 / style.levels.min(256)).max(1);
    let quantize = |v: u8| -> u8 {
        let bucket = u32::from(v) / step;
        (bucket * step + step / 2).min(255) as u8
    };

    let mut counts: HashMap<Rgb8, u32> = HashMap::new();
    for p in thumb.pixels() {
        let [r, g, b, a] = p.0;
        if a == 0 {
            continue;
        }
        *counts
            .entry(Rgb8::new(quantize(r), quantize(g), quantize(b)))
            .or_default() += 1;
    }

    let mut ranked: Vec<(Rgb8, u32)> = counts.into_iter().collect();
    ranked.sort_by(|(ca, na), (cb, nb)| {
        nb.cmp(na)
            .then_with(|| (ca.r, ca.g, ca.b).cmp(&(cb.r, cb.g, cb.b)))
    });

    Ok(ranked
        .into_iter()
        .map(|(c, _)| c)
        .find(|&c| qualifies(c, style))
        .unwrap_or(style.fallback))
}

fn qualifies(c: Rgb8, style: &PaletteStyle) -> bool {
    let max = c.r.max(c.g).max(c.b);
    let min = c.r.min(c.g).min(c.b);
    c.channel_variance() >= style.min_variance
        && c.brightness_sum() >= style.min_brightness
        && max >= style.near_black_max
        && min <= style.near_white_min
}

#[cfg(test)]
#[path = "../../tests/unit/layout/palette.rs"]
mod tests;
