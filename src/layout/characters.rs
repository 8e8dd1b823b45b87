use image::RgbaImage;
use smallvec::SmallVec;

use crate::effects::blur::gaussian_blur;
use crate::effects::composite::composite;
use crate::effects::resize::{resize_exact, scale_to_height, trim_transparent};
use crate::foundation::core::{CanvasSize, PixelOffset};
use crate::foundation::error::{CardError, CardResult};
use crate::foundation::math::scale_u8;
use crate::scene::style::{DualStyle, GlowHalo, PyramidStyle, SideBySideStyle, SingleStyle};

/// Up to three placements, in draw order.
pub type Placements = SmallVec<[Placement; 3]>;

/// A resized image and where its top-left corner goes on the canvas.
///
/// Offsets may be negative or lie past the canvas edge; the compositor clips.
#[derive(Clone, Debug)]
pub struct Placement {
    /// Resized character.
    pub image: RgbaImage,
    /// Top-left corner on the canvas.
    pub offset: PixelOffset,
    /// Glow drawn immediately before the character.
    pub halo: Option<Box<Placement>>,
}

impl Placement {
    fn new(image: RgbaImage, offset: PixelOffset) -> Self {
        Self {
            image,
            offset,
            halo: None,
        }
    }

    /// Rendered height of the character.
    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Composite placements in order, each preceded by its halo.
pub fn draw_placements(canvas: &mut RgbaImage, placements: &[Placement]) {
    for p in placements {
        if let Some(halo) = &p.halo {
            composite(canvas, &halo.image, halo.offset);
        }
        composite(canvas, &p.image, p.offset);
    }
}

/// Crypto mode: one enlarged character, centered, bottom at `bottom_ratio`, with a glow behind.
pub fn place_single(
    character: &RgbaImage,
    canvas: CanvasSize,
    height_ratio: f64,
    style: &SingleStyle,
) -> CardResult<Placement> {
    ensure_non_empty(character)?;
    let target_h = to_px(f64::from(canvas.height) * height_ratio * style.enlarge);
    let image = scale_to_height(character, target_h)?;
    let x = (i64::from(canvas.width) - i64::from(image.width())).div_euclid(2);
    let y = canvas.frac_h(style.bottom_ratio) - i64::from(image.height());

    let mut placement = Placement::new(image, PixelOffset::new(x, y));
    placement.halo = Some(Box::new(build_halo(&placement, &style.halo)?));
    Ok(placement)
}

/// Default mode with one or two characters: equal visual size, spaced, centered as a group and
/// bottom-anchored. The group shrinks uniformly if wider than `max_group_width_ratio`.
pub fn place_side_by_side(
    characters: &[&RgbaImage],
    canvas: CanvasSize,
    height_ratio: f64,
    style: &SideBySideStyle,
) -> CardResult<Placements> {
    let mut out = Placements::new();
    if characters.is_empty() {
        return Ok(out);
    }

    let target = (f64::from(canvas.height) * height_ratio).trunc();
    let mut sizes: SmallVec<[(u32, u32); 3]> = SmallVec::new();
    for c in characters {
        ensure_non_empty(c)?;
        let (w, h) = c.dimensions();
        let scale = target / f64::from(w.max(h));
        sizes.push((to_px(f64::from(w) * scale), to_px(f64::from(h) * scale)));
    }

    let mut spacing = canvas.frac_w(style.spacing_ratio);
    let mut total = group_width(&sizes, spacing);
    let max_width = f64::from(canvas.width) * style.max_group_width_ratio;
    if total as f64 > max_width {
        let down = max_width / total as f64;
        for s in &mut sizes {
            *s = (to_px(f64::from(s.0) * down), to_px(f64::from(s.1) * down));
        }
        spacing = (spacing as f64 * down) as i64;
        total = group_width(&sizes, spacing);
    }

    let bottom = canvas.frac_h(style.bottom_ratio);
    let mut x = (i64::from(canvas.width) - total).div_euclid(2);
    for (c, &(w, h)) in characters.iter().zip(&sizes) {
        let image = resize_exact(c, w, h)?;
        out.push(Placement::new(image, PixelOffset::new(x, bottom - i64::from(h))));
        x += i64::from(w) + spacing;
    }
    Ok(out)
}

fn group_width(sizes: &[(u32, u32)], spacing: i64) -> i64 {
    let chars: i64 = sizes.iter().map(|&(w, _)| i64::from(w)).sum();
    chars + spacing * (sizes.len() as i64 - 1).max(0)
}

/// Dual mode: two characters trimmed to their content, equal height, centered on fixed columns,
/// top-aligned.
pub fn place_dual(
    left: &RgbaImage,
    right: &RgbaImage,
    canvas: CanvasSize,
    style: &DualStyle,
) -> CardResult<Placements> {
    let target_h = to_px(f64::from(canvas.height) * style.height_ratio);
    let top = canvas.frac_h(style.top_ratio);
    let mut out = Placements::new();
    let columns = [
        (left, style.center_x_ratios[0]),
        (right, style.center_x_ratios[1]),
    ];
    for (img, center_ratio) in columns {
        ensure_non_empty(img)?;
        let trimmed = trim_transparent(img);
        let image = scale_to_height(&trimmed, target_h)?;
        let x = canvas.frac_w(center_ratio) - i64::from(image.width() / 2);
        out.push(Placement::new(image, PixelOffset::new(x, top)));
    }
    Ok(out)
}

/// Pyramid: large middle character with a glow, two smaller ones in front at the sides.
///
/// `characters` is in asset order; the second asset is the middle one.
pub fn place_pyramid(
    characters: [&RgbaImage; 3],
    canvas: CanvasSize,
    style: &PyramidStyle,
) -> CardResult<Placements> {
    let [first, middle, third] = characters;
    for c in characters {
        ensure_non_empty(c)?;
    }

    let middle_h = to_px(f64::from(canvas.height) * style.middle_height_ratio);
    let middle_img = scale_to_height(middle, middle_h)?;
    let mx = (i64::from(canvas.width) - i64::from(middle_img.width())).div_euclid(2);
    let my = canvas.frac_h(style.middle_center_y_ratio) - i64::from(middle_img.height() / 2);
    let mut middle_p = Placement::new(middle_img, PixelOffset::new(mx, my));
    middle_p.halo = Some(Box::new(build_halo(&middle_p, &style.halo)?));

    let side_h = to_px(f64::from(canvas.height) * style.side_height_ratio);
    let side_cy = canvas.frac_h(style.side_center_y_ratio);
    let mut out = Placements::new();
    out.push(middle_p);
    let sides = [
        (first, style.side_center_x_ratios[0]),
        (third, style.side_center_x_ratios[1]),
    ];
    for (img, cx_ratio) in sides {
        let image = scale_to_height(img, side_h)?;
        let x = canvas.frac_w(cx_ratio) - i64::from(image.width() / 2);
        let y = side_cy - i64::from(image.height() / 2);
        out.push(Placement::new(image, PixelOffset::new(x, y)));
    }
    Ok(out)
}

/// Blurred, alpha-scaled copy of a placed character, positioned behind it with the halo offset.
///
/// The copy is padded by twice the blur radius on every side so the blur is not cut off at the
/// image edges.
pub fn build_halo(placement: &Placement, halo: &GlowHalo) -> CardResult<Placement> {
    let pad = (halo.blur_radius.max(0.0) * 2.0).ceil() as u32;
    let (w, h) = placement.image.dimensions();
    let mut padded = RgbaImage::new(w + 2 * pad, h + 2 * pad);
    image::imageops::replace(&mut padded, &placement.image, i64::from(pad), i64::from(pad));

    let mut blurred = gaussian_blur(&padded, halo.blur_radius)?;
    for px in blurred.pixels_mut() {
        px.0[3] = scale_u8(px.0[3], halo.alpha);
    }

    let shift = halo.offset - i64::from(pad);
    Ok(Placement::new(blurred, placement.offset.shifted(shift, shift)))
}

fn to_px(v: f64) -> u32 {
    if v.is_finite() && v >= 1.0 {
        v as u32
    } else {
        1
    }
}

fn ensure_non_empty(img: &RgbaImage) -> CardResult<()> {
    if img.width() == 0 || img.height() == 0 {
        return Err(CardError::processing("character image must be non-empty"));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/layout/characters.rs"]
mod tests;
