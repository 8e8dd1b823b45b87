use std::borrow::Cow;
use std::collections::HashMap;

use image::{Rgba, RgbaImage};

use crate::effects::composite::composite;
use crate::effects::raster::{pixmap_to_rgba, raster_dims};
use crate::foundation::core::PixelOffset;
use crate::foundation::error::{CardError, CardResult};
use crate::scene::assets::FontData;

/// Pixel extent of one laid-out line.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextExtent {
    /// Advance width.
    pub width: f32,
    /// Line height.
    pub height: f32,
}

/// Measures and paints single lines of text.
///
/// The fitter only needs extents; painting is separate so tests can swap in a deterministic
/// engine.
pub trait TextEngine {
    /// Extent of `text` set in `font` at `size_px`.
    fn measure(&mut self, text: &str, font: &FontData, size_px: f32) -> CardResult<TextExtent>;

    /// Paint `text` with its layout box's top-left corner at `origin`.
    fn draw(
        &mut self,
        canvas: &mut RgbaImage,
        text: &str,
        font: &FontData,
        size_px: f32,
        origin: PixelOffset,
        color: Rgba<u8>,
    ) -> CardResult<()>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct TextBrush {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

/// [`TextEngine`] shaping with `parley` and rasterizing glyphs with `vello_cpu`.
pub struct ParleyTextEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrush>,
    families: HashMap<u64, String>,
}

impl Default for ParleyTextEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ParleyTextEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParleyTextEngine")
            .field("registered_fonts", &self.families.len())
            .finish()
    }
}

impl ParleyTextEngine {
    /// Engine with fresh font and layout contexts.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            families: HashMap::new(),
        }
    }

    fn family_for(&mut self, font: &FontData) -> CardResult<String> {
        if let Some(name) = self.families.get(&font.fingerprint()) {
            return Ok(name.clone());
        }
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font.bytes().to_vec()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| CardError::font_load("no font families registered from font bytes"))?;
        let name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| CardError::font_load("registered font family has no name"))?
            .to_string();
        self.families.insert(font.fingerprint(), name.clone());
        Ok(name)
    }

    fn layout(
        &mut self,
        text: &str,
        font: &FontData,
        size_px: f32,
        brush: TextBrush,
    ) -> CardResult<parley::Layout<TextBrush>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(CardError::processing("text size_px must be finite and > 0"));
        }
        let family = self.family_for(font)?;
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrush> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

impl TextEngine for ParleyTextEngine {
    fn measure(&mut self, text: &str, font: &FontData, size_px: f32) -> CardResult<TextExtent> {
        if text.is_empty() {
            return Ok(TextExtent::default());
        }
        let layout = self.layout(text, font, size_px, TextBrush::default())?;
        Ok(TextExtent {
            width: layout.width(),
            height: layout.height(),
        })
    }

    fn draw(
        &mut self,
        canvas: &mut RgbaImage,
        text: &str,
        font: &FontData,
        size_px: f32,
        origin: PixelOffset,
        color: Rgba<u8>,
    ) -> CardResult<()> {
        if text.is_empty() || color.0[3] == 0 {
            return Ok(());
        }
        let [r, g, b, a] = color.0;
        let layout = self.layout(text, font, size_px, TextBrush { r, g, b, a })?;

        // Glyph ink may overhang the advance box.
        let pad = (size_px * 0.25).ceil().max(1.0);
        let w = (layout.width() + 2.0 * pad).ceil() as u32;
        let h = (layout.height() + 2.0 * pad).ceil() as u32;
        let (pw, ph) = raster_dims(w, h)?;

        let cpu_font =
            vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font.bytes().to_vec()), 0);
        let mut ctx = vello_cpu::RenderContext::new(pw, ph);
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((
            f64::from(pad),
            f64::from(pad),
        )));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&cpu_font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        ctx.flush();

        let mut pixmap = vello_cpu::Pixmap::new(pw, ph);
        ctx.render_to_pixmap(&mut pixmap);
        let ink = pixmap_to_rgba(&pixmap)?;

        let shift = -(pad as i64);
        composite(canvas, &ink, origin.shifted(shift, shift));
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/engine.rs"]
mod tests;
