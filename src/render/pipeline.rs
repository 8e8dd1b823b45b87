use image::RgbaImage;
use smallvec::SmallVec;

use crate::effects::composite::composite;
use crate::effects::mask::round_corners;
use crate::effects::resize::resize_exact;
use crate::foundation::core::{CanvasSize, PixelOffset};
use crate::foundation::error::{CardError, CardResult};
use crate::layout::background::{darken_fade, fit_cover};
use crate::layout::band::apply_band;
use crate::layout::characters::{
    Placements, draw_placements, place_dual, place_pyramid, place_side_by_side, place_single,
};
use crate::layout::logo::place_logo;
use crate::render::dispatch::{LayoutPlan, select_layout};
use crate::render::observer::{EventSink, RenderEvent, TracingSink};
use crate::scene::assets::CardAssets;
use crate::scene::params::{CardParams, LayoutMode};
use crate::scene::style::TextBoxStyle;
use crate::text::engine::{ParleyTextEngine, TextEngine};
use crate::text::fit::{FitRequest, TextFitter, TextLine, TitleContent};

/// Compose one card with the `parley` text engine, logging stages through `tracing`.
///
/// The returned image is exactly `params.canvas` in size. Nothing is read from or written to
/// disk.
#[tracing::instrument(skip_all, fields(mode = ?params.mode, width = params.canvas.width, height = params.canvas.height))]
pub fn render(assets: &CardAssets, params: &CardParams) -> CardResult<RgbaImage> {
    let mut engine = ParleyTextEngine::new();
    render_with(assets, params, &mut engine, &mut TracingSink)
}

/// Compose one card with an explicit text engine and event sink.
///
/// Stages run in a fixed order: layout selection, background, characters, band, text (or title
/// image), logo, corner rounding.
pub fn render_with(
    assets: &CardAssets,
    params: &CardParams,
    engine: &mut dyn TextEngine,
    sink: &mut dyn EventSink,
) -> CardResult<RgbaImage> {
    params.validate()?;
    let style = &params.style;
    let size = params.canvas;

    let plan = select_layout(
        params.mode,
        assets.characters.len(),
        assets.title_image.is_some(),
    )?;
    sink.emit(RenderEvent::LayoutSelected { plan });

    let anchor = match params.mode {
        LayoutMode::Default => style.background.default_anchor,
        LayoutMode::Crypto => style.background.crypto_anchor,
        LayoutMode::Dual => style.background.dual_anchor,
    };
    let mut canvas = fit_cover(&assets.background, size, anchor)?;
    if params.mode == LayoutMode::Crypto {
        darken_fade(
            &mut canvas,
            style.background.crypto_fade_top_alpha,
            style.background.crypto_fade_bottom_alpha,
        );
    }
    sink.emit(RenderEvent::BackgroundFitted { anchor });

    let placements = place_characters(assets, params, plan)?;
    draw_placements(&mut canvas, &placements);
    sink.emit(RenderEvent::CharactersPlaced {
        count: placements.len(),
    });

    let color = apply_band(&mut canvas, &params.band, params.mode, style)?;
    sink.emit(RenderEvent::BandApplied {
        technique: params.band.resolved_technique(params.mode),
        color,
    });

    let logo = if params.use_logo {
        // Dual mode draws no provider text to fall back to.
        if assets.logo.is_none() && params.mode != LayoutMode::Dual {
            sink.emit(RenderEvent::LogoMissingFallback);
        }
        assets.logo.as_deref()
    } else {
        None
    };

    let logo_drawn = logo.is_some();
    match params.mode {
        LayoutMode::Dual => draw_banner(&mut canvas, assets, params, sink)?,
        LayoutMode::Crypto => {
            let text = &style.crypto_text;
            draw_text(&mut canvas, assets, params, text, logo_drawn, engine, sink)?;
        }
        LayoutMode::Default => {
            let text = &style.default_text;
            draw_text(&mut canvas, assets, params, text, logo_drawn, engine, sink)?;
        }
    }

    if let Some(logo) = logo {
        let placed = place_logo(logo, size, &params.logo)?;
        composite(&mut canvas, &placed.image, placed.offset);
        sink.emit(RenderEvent::LogoPlaced {
            offset: placed.offset,
        });
    }

    if let Some(radius) = params.corner_radius {
        round_corners(&mut canvas, radius)?;
        sink.emit(RenderEvent::CornersRounded { radius });
    }

    Ok(canvas)
}

fn place_characters(
    assets: &CardAssets,
    params: &CardParams,
    plan: LayoutPlan,
) -> CardResult<Placements> {
    let style = &params.style;
    let size = params.canvas;
    let chars: SmallVec<[&RgbaImage; 3]> = assets
        .characters
        .iter()
        .take(plan.characters_used())
        .map(|c| c.as_ref())
        .collect();

    match (plan, chars.as_slice()) {
        (LayoutPlan::Single, [first, ..]) => {
            let mut out = Placements::new();
            out.push(place_single(
                first,
                size,
                params.character_height_ratio,
                &style.single,
            )?);
            Ok(out)
        }
        (LayoutPlan::SideBySide { .. }, chars) => {
            place_side_by_side(chars, size, params.character_height_ratio, &style.side_by_side)
        }
        (LayoutPlan::Pyramid, &[a, b, c]) => place_pyramid([a, b, c], size, &style.pyramid),
        (LayoutPlan::Dual, &[left, right]) => place_dual(left, right, size, &style.dual),
        _ => Err(CardError::processing(
            "layout plan does not match the supplied characters",
        )),
    }
}

/// Dual mode: the title image as a wide banner over the characters.
fn draw_banner(
    canvas: &mut RgbaImage,
    assets: &CardAssets,
    params: &CardParams,
    sink: &mut dyn EventSink,
) -> CardResult<()> {
    let title = assets
        .title_image
        .as_deref()
        .ok_or_else(|| CardError::invalid_layout("dual mode needs a title image"))?;
    let (w, h) = title.dimensions();
    if w == 0 || h == 0 {
        return Err(CardError::processing("title image must be non-empty"));
    }
    let size = params.canvas;
    let dual = &params.style.dual;
    let bw = size.frac_w(dual.banner_width_ratio).max(1) as u32;
    let bh = ((f64::from(h) * f64::from(bw) / f64::from(w)) as u32).max(1);
    let banner = resize_exact(title, bw, bh)?;
    let offset = PixelOffset::new(
        (i64::from(size.width) - i64::from(bw)).div_euclid(2),
        size.frac_h(dual.banner_center_y_ratio) - i64::from(bh / 2),
    );
    composite(canvas, &banner, offset);
    sink.emit(RenderEvent::TitleImagePlaced { offset });
    Ok(())
}

/// Title (text or image), subtitle and provider line fitted into the mode's text box.
///
/// The provider line is left out when a logo will be drawn. The subtitle is set in the title
/// font.
fn draw_text(
    canvas: &mut RgbaImage,
    assets: &CardAssets,
    params: &CardParams,
    text_style: &TextBoxStyle,
    logo_drawn: bool,
    engine: &mut dyn TextEngine,
    sink: &mut dyn EventSink,
) -> CardResult<()> {
    let size = params.canvas;
    let title_image = if params.use_title_image {
        assets.title_image.as_deref()
    } else {
        None
    };
    let scaled_title = title_image
        .map(|img| scale_title_image(img, size, params))
        .transpose()?;

    let lines: SmallVec<[&str; 4]> = params.title_text().collect();
    let subtitle_text = params.subtitle_text();
    let provider_text = if logo_drawn {
        None
    } else {
        params.provider_text()
    };
    if scaled_title.is_none()
        && lines.is_empty()
        && subtitle_text.is_none()
        && provider_text.is_none()
    {
        return Ok(());
    }

    let title = match &scaled_title {
        Some(img) => TitleContent::Image {
            width: img.width(),
            height: img.height(),
        },
        None if lines.is_empty() => TitleContent::None,
        None => TitleContent::Lines {
            lines: &lines,
            font: assets
                .title_font
                .as_ref()
                .ok_or_else(|| CardError::font_load("title text needs a title font"))?,
        },
    };
    let subtitle = match subtitle_text {
        Some(text) => Some(TextLine {
            text,
            font: assets
                .title_font
                .as_ref()
                .ok_or_else(|| CardError::font_load("subtitle text needs a title font"))?,
        }),
        None => None,
    };
    let provider = match provider_text {
        Some(text) => Some(TextLine {
            text,
            font: assets
                .effective_provider_font()
                .ok_or_else(|| CardError::font_load("provider text needs a font"))?,
        }),
        None => None,
    };

    let req = FitRequest::from_style(
        title,
        provider,
        size,
        text_style,
        params.text_scale,
        params.text_offset_ratio,
    )
    .with_subtitle(subtitle);
    let mut fitter = TextFitter::new(engine, &params.style.fit);
    let outcome = fitter.fit(&req)?;
    sink.emit(RenderEvent::TextFitted {
        title_ratio: outcome.title_ratio,
        provider_ratio: outcome.provider_ratio,
        iterations: outcome.iterations,
        fits: outcome.fits,
    });

    if let Some(img) = &scaled_title {
        let offset = PixelOffset::new(
            (i64::from(size.width) - i64::from(img.width())).div_euclid(2),
            outcome.title_top,
        );
        composite(canvas, img, offset);
        sink.emit(RenderEvent::TitleImagePlaced { offset });
    }
    fitter.draw(canvas, &req, &outcome, text_style)
}

/// Fit within the title-image bounds without upscaling, then apply the user scale.
fn scale_title_image(
    img: &RgbaImage,
    size: CanvasSize,
    params: &CardParams,
) -> CardResult<RgbaImage> {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return Err(CardError::processing("title image must be non-empty"));
    }
    let bounds = &params.style.title_image;
    let max_w = f64::from(size.width) * bounds.max_width_ratio;
    let max_h = f64::from(size.height) * bounds.max_height_ratio;
    let fit = (max_w / f64::from(w)).min(max_h / f64::from(h)).min(1.0);
    let scale = fit * params.title_image_scale;
    let tw = ((f64::from(w) * scale) as u32).max(1);
    let th = ((f64::from(h) * scale) as u32).max(1);
    resize_exact(img, tw, th)
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
