use image::RgbaImage;

use crate::foundation::core::Rgb8;

/// Solid-color overlay whose alpha varies per row.
pub fn vertical_ramp(
    width: u32,
    height: u32,
    color: Rgb8,
    mut alpha_at: impl FnMut(u32) -> u8,
) -> RgbaImage {
    let mut out = RgbaImage::new(width, height);
    for (y, row) in out.rows_mut().enumerate() {
        let a = alpha_at(y as u32);
        for px in row {
            *px = color.with_alpha(a);
        }
    }
    out
}

/// Linear interpolation from `top` at row 0 to `bottom` at the last row.
pub fn linear_alpha(top: u8, bottom: u8, row: u32, rows: u32) -> u8 {
    if rows <= 1 {
        return top;
    }
    let t = f64::from(row.min(rows - 1)) / f64::from(rows - 1);
    (f64::from(top) + (f64::from(bottom) - f64::from(top)) * t).round() as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/gradient.rs"]
mod tests;
