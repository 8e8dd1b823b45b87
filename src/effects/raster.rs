//! Anti-aliased vector coverage via `vello_cpu`.
//!
//! Shapes are described with workspace `kurbo` geometry and converted to the `kurbo` version that
//! `vello_cpu` re-exports before filling.

use image::{GrayImage, RgbaImage};
use kurbo::{PathEl, Shape};

use crate::foundation::error::{CardError, CardResult};
use crate::foundation::math::unpremultiply_rgba8_in_place;

const PATH_TOLERANCE: f64 = 0.1;

/// Dimensions checked against the `u16` limits of the vector rasterizer.
pub(crate) fn raster_dims(width: u32, height: u32) -> CardResult<(u16, u16)> {
    let w: u16 = width
        .try_into()
        .map_err(|_| CardError::processing("raster width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| CardError::processing("raster height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(CardError::processing("raster size must be non-empty"));
    }
    Ok((w, h))
}

/// Fill `shape` in opaque white on a transparent `width × height` surface and return its coverage.
pub fn fill_coverage(width: u32, height: u32, shape: &impl Shape) -> CardResult<GrayImage> {
    let (w, h) = raster_dims(width, height)?;
    let mut ctx = vello_cpu::RenderContext::new(w, h);
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
    ctx.fill_path(&shape_to_cpu(shape));
    ctx.flush();

    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.render_to_pixmap(&mut pixmap);

    let alpha: Vec<u8> = pixmap
        .data_as_u8_slice()
        .chunks_exact(4)
        .map(|px| px[3])
        .collect();
    GrayImage::from_raw(width, height, alpha)
        .ok_or_else(|| CardError::processing("coverage buffer does not match raster size"))
}

/// Copy a premultiplied `vello_cpu` pixmap into a straight-alpha image.
pub(crate) fn pixmap_to_rgba(pixmap: &vello_cpu::Pixmap) -> CardResult<RgbaImage> {
    let mut bytes = pixmap.data_as_u8_slice().to_vec();
    unpremultiply_rgba8_in_place(&mut bytes);
    RgbaImage::from_raw(u32::from(pixmap.width()), u32::from(pixmap.height()), bytes)
        .ok_or_else(|| CardError::processing("pixmap buffer does not match its size"))
}

pub(crate) fn shape_to_cpu(shape: &impl Shape) -> vello_cpu::kurbo::BezPath {
    let mut out = vello_cpu::kurbo::BezPath::new();
    for el in shape.path_elements(PATH_TOLERANCE) {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/effects/raster.rs"]
mod tests;
