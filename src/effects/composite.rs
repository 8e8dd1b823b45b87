use image::RgbaImage;

use crate::foundation::core::PixelOffset;

/// Straight-alpha RGBA8 pixel.
pub type Rgba8 = [u8; 4];

/// Intersection of a translated overlay with the base image, in both coordinate spaces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Overlap {
    /// First overlay column inside the base.
    pub src_x: u32,
    /// First overlay row inside the base.
    pub src_y: u32,
    /// Destination column in the base.
    pub dst_x: u32,
    /// Destination row in the base.
    pub dst_y: u32,
    /// Width of the overlapping region.
    pub width: u32,
    /// Height of the overlapping region.
    pub height: u32,
}

/// Compute the overlapping rectangle of an `ov_w × ov_h` overlay placed at `offset` on a
/// `base_w × base_h` base. Returns `None` when the overlap has zero area.
pub fn overlap(
    base_w: u32,
    base_h: u32,
    ov_w: u32,
    ov_h: u32,
    offset: PixelOffset,
) -> Option<Overlap> {
    let x0 = offset.x.max(0);
    let y0 = offset.y.max(0);
    let x1 = offset.x.saturating_add(i64::from(ov_w)).min(i64::from(base_w));
    let y1 = offset.y.saturating_add(i64::from(ov_h)).min(i64::from(base_h));
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some(Overlap {
        src_x: (x0 - offset.x) as u32,
        src_y: (y0 - offset.y) as u32,
        dst_x: x0 as u32,
        dst_y: y0 as u32,
        width: (x1 - x0) as u32,
        height: (y1 - y0) as u32,
    })
}

/// Straight alpha-over of a single pixel with an extra opacity factor on the source.
pub fn over(dst: Rgba8, src: Rgba8, opacity: f32) -> Rgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }
    let op = ((opacity * 255.0).round() as u32).min(255);
    let sa = (u32::from(src[3]) * op + 127) / 255;
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return [src[0], src[1], src[2], 255];
    }

    // Scaled by 255^2 to keep the division exact until the end.
    let da = u32::from(dst[3]);
    let dst_w = da * (255 - sa);
    let src_w = sa * 255;
    let total = src_w + dst_w;
    if total == 0 {
        return [0, 0, 0, 0];
    }

    let mut out = [0u8; 4];
    for i in 0..3 {
        let c = u32::from(src[i]) * src_w + u32::from(dst[i]) * dst_w;
        out[i] = ((c + total / 2) / total).min(255) as u8;
    }
    out[3] = ((total + 127) / 255).min(255) as u8;
    out
}

/// Additive blend of a single pixel: alphas add (saturating), colors mix weighted by alpha.
///
/// Two layers with the same RGB keep that RGB exactly.
pub fn add(dst: Rgba8, src: Rgba8) -> Rgba8 {
    let sa = u32::from(src[3]);
    if sa == 0 {
        return dst;
    }
    let da = u32::from(dst[3]);
    let total = sa + da;
    let mut out = [0u8; 4];
    for i in 0..3 {
        out[i] = ((u32::from(src[i]) * sa + u32::from(dst[i]) * da) / total) as u8;
    }
    out[3] = total.min(255) as u8;
    out
}

/// Alpha-composite `overlay` onto `base` with its top-left corner at `offset`.
///
/// The overlay is clipped against the base rectangle; offsets far outside the base (including
/// negative ones) are valid and result in a partial or empty blit. Returns whether any pixel was
/// touched.
pub fn composite(base: &mut RgbaImage, overlay: &RgbaImage, offset: PixelOffset) -> bool {
    composite_with_opacity(base, overlay, offset, 1.0)
}

/// [`composite`] with the overlay's alpha scaled by `opacity`.
pub fn composite_with_opacity(
    base: &mut RgbaImage,
    overlay: &RgbaImage,
    offset: PixelOffset,
    opacity: f32,
) -> bool {
    blit_with(base, overlay, offset, |d, s| over(d, s, opacity))
}

/// Additively blend `overlay` onto `base` (see [`add`]).
pub fn composite_additive(base: &mut RgbaImage, overlay: &RgbaImage, offset: PixelOffset) -> bool {
    blit_with(base, overlay, offset, add)
}

fn blit_with<F>(base: &mut RgbaImage, overlay: &RgbaImage, offset: PixelOffset, blend: F) -> bool
where
    F: Fn(Rgba8, Rgba8) -> Rgba8,
{
    let Some(o) = overlap(
        base.width(),
        base.height(),
        overlay.width(),
        overlay.height(),
        offset,
    ) else {
        return false;
    };

    let base_w = base.width() as usize;
    let ov_w = overlay.width() as usize;
    let dst = base.as_mut();
    let src = overlay.as_raw();
    for row in 0..o.height as usize {
        let d_row = (o.dst_y as usize + row) * base_w + o.dst_x as usize;
        let s_row = (o.src_y as usize + row) * ov_w + o.src_x as usize;
        for col in 0..o.width as usize {
            let di = (d_row + col) * 4;
            let si = (s_row + col) * 4;
            let out = blend(
                [dst[di], dst[di + 1], dst[di + 2], dst[di + 3]],
                [src[si], src[si + 1], src[si + 2], src[si + 3]],
            );
            dst[di..di + 4].copy_from_slice(&out);
        }
    }
    true
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
