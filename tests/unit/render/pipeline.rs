use std::sync::Arc;

use image::Rgba;

use super::*;
use crate::foundation::core::Rgb8;
use crate::render::observer::RecordingSink;
use crate::scene::assets::FontData;
use crate::scene::params::{BandTechnique, Corner};
use crate::text::engine::TextExtent;

#[derive(Debug, Default)]
struct FakeEngine {
    drawn: Vec<String>,
}

impl TextEngine for FakeEngine {
    fn measure(&mut self, text: &str, _font: &FontData, size_px: f32) -> CardResult<TextExtent> {
        Ok(TextExtent {
            width: text.chars().count() as f32 * 0.6 * size_px,
            height: size_px,
        })
    }

    fn draw(
        &mut self,
        canvas: &mut RgbaImage,
        text: &str,
        _font: &FontData,
        size_px: f32,
        origin: PixelOffset,
        color: Rgba<u8>,
    ) -> CardResult<()> {
        let w = (text.chars().count() as f32 * 0.6 * size_px) as u32;
        let block = RgbaImage::from_pixel(w.max(1), size_px as u32, color);
        composite(canvas, &block, origin);
        self.drawn.push(text.to_string());
        Ok(())
    }
}

fn font() -> FontData {
    FontData::from_bytes(vec![0, 1, 0, 0, 5, 5, 5, 5]).unwrap()
}

fn solid(w: u32, h: u32, px: [u8; 4]) -> Arc<RgbaImage> {
    Arc::new(RgbaImage::from_pixel(w, h, Rgba(px)))
}

fn assets(characters: usize) -> CardAssets {
    let mut a = CardAssets::new(solid(800, 600, [30, 60, 90, 255])).with_title_font(font());
    for _ in 0..characters {
        a = a.with_character(solid(100, 200, [220, 180, 40, 255]));
    }
    a
}

fn params(mode: LayoutMode) -> CardParams {
    CardParams {
        mode,
        title_lines: vec!["Title".to_string()],
        provider: Some("Provider".to_string()),
        ..CardParams::default()
    }
}

fn run(assets: &CardAssets, params: &CardParams) -> CardResult<(RgbaImage, FakeEngine, RecordingSink)> {
    let mut engine = FakeEngine::default();
    let mut sink = RecordingSink::default();
    let img = render_with(assets, params, &mut engine, &mut sink)?;
    Ok((img, engine, sink))
}

#[test]
fn every_mode_produces_canvas_sized_output() {
    let dual_assets = assets(2).with_title_image(solid(300, 80, [255, 255, 255, 255]));
    let cases = [
        (assets(1), LayoutMode::Default),
        (assets(2), LayoutMode::Default),
        (assets(3), LayoutMode::Default),
        (assets(1), LayoutMode::Crypto),
        (dual_assets, LayoutMode::Dual),
    ];
    for (a, mode) in cases {
        let (img, _, _) = run(&a, &params(mode)).unwrap();
        assert_eq!(img.dimensions(), (440, 590), "{mode:?}");
        assert!(img.pixels().all(|p| p.0[3] == 255), "{mode:?}");
    }
}

#[test]
fn stages_are_reported_in_order() {
    let (_, _, sink) = run(&assets(1), &params(LayoutMode::Crypto)).unwrap();
    let kinds: Vec<&'static str> = sink
        .events
        .iter()
        .map(|e| match e {
            RenderEvent::LayoutSelected { .. } => "layout",
            RenderEvent::BackgroundFitted { .. } => "background",
            RenderEvent::CharactersPlaced { .. } => "characters",
            RenderEvent::BandApplied { .. } => "band",
            RenderEvent::TextFitted { .. } => "text",
            RenderEvent::TitleImagePlaced { .. } => "title_image",
            RenderEvent::LogoPlaced { .. } => "logo",
            RenderEvent::LogoMissingFallback => "logo_fallback",
            RenderEvent::CornersRounded { .. } => "corners",
        })
        .collect();
    assert_eq!(
        kinds,
        ["layout", "background", "characters", "band", "logo_fallback", "text"]
    );
    assert!(matches!(
        sink.events[3],
        RenderEvent::BandApplied {
            technique: BandTechnique::Glow,
            color: Some(_)
        }
    ));
}

#[test]
fn missing_logo_falls_back_to_provider_text() {
    let (_, engine, sink) = run(&assets(2), &params(LayoutMode::Default)).unwrap();
    assert!(sink.events.contains(&RenderEvent::LogoMissingFallback));
    assert!(engine.drawn.iter().any(|t| t == "Provider"));
}

#[test]
fn dual_mode_reports_no_provider_fallback() {
    let a = assets(2).with_title_image(solid(200, 50, [250, 0, 0, 255]));
    let p = params(LayoutMode::Dual);
    assert!(p.use_logo);
    let (_, engine, sink) = run(&a, &p).unwrap();
    assert!(engine.drawn.is_empty());
    assert!(!sink.events.contains(&RenderEvent::LogoMissingFallback));
}

#[test]
fn subtitle_is_drawn_between_title_and_provider() {
    let mut p = params(LayoutMode::Default);
    p.subtitle = Some("Play now".to_string());
    let (_, engine, _) = run(&assets(1), &p).unwrap();
    let main: Vec<&str> = engine.drawn.iter().skip(1).step_by(2).map(String::as_str).collect();
    assert_eq!(main, ["Title", "Play now", "Provider"]);
}

#[test]
fn subtitle_without_title_font_is_font_load_error() {
    let a = CardAssets::new(solid(10, 10, [0, 0, 0, 255]))
        .with_character(solid(4, 8, [9, 9, 9, 255]))
        .with_provider_font(font());
    let p = CardParams {
        subtitle: Some("Play now".to_string()),
        ..CardParams::default()
    };
    let err = run(&a, &p).unwrap_err();
    assert!(matches!(err, CardError::FontLoad(_)));
    assert!(err.to_string().contains("subtitle"));
}

#[test]
fn logo_replaces_provider_text() {
    let a = assets(2).with_logo(solid(200, 100, [255, 255, 255, 255]));
    let mut p = params(LayoutMode::Default);
    p.logo.corner = Corner::TopLeft;
    let (img, engine, sink) = run(&a, &p).unwrap();

    assert!(!engine.drawn.iter().any(|t| t == "Provider"));
    assert!(engine.drawn.iter().any(|t| t == "Title"));
    assert!(sink.events.contains(&RenderEvent::LogoPlaced {
        offset: PixelOffset::new(12, 12)
    }));
    // Inverted white logo.
    assert_eq!(img.get_pixel(40, 30).0, [0, 0, 0, 255]);
}

#[test]
fn provider_text_without_logo_flag() {
    let a = assets(1).with_logo(solid(20, 10, [255, 255, 255, 255]));
    let mut p = params(LayoutMode::Default);
    p.use_logo = false;
    let (_, engine, sink) = run(&a, &p).unwrap();
    assert!(engine.drawn.iter().any(|t| t == "Provider"));
    assert!(!sink
        .events
        .iter()
        .any(|e| matches!(e, RenderEvent::LogoPlaced { .. })));
}

#[test]
fn title_text_without_font_is_font_load_error() {
    let a = CardAssets::new(solid(10, 10, [0, 0, 0, 255])).with_character(solid(4, 8, [9, 9, 9, 255]));
    let err = run(&a, &params(LayoutMode::Default)).unwrap_err();
    assert!(matches!(err, CardError::FontLoad(_)));
}

#[test]
fn no_text_needs_no_font() {
    let a = CardAssets::new(solid(10, 10, [0, 0, 0, 255])).with_character(solid(4, 8, [9, 9, 9, 255]));
    let p = CardParams::default();
    let (img, engine, sink) = run(&a, &p).unwrap();
    assert_eq!(img.dimensions(), (440, 590));
    assert!(engine.drawn.is_empty());
    assert!(!sink
        .events
        .iter()
        .any(|e| matches!(e, RenderEvent::TextFitted { .. })));
}

#[test]
fn dual_without_title_image_is_invalid() {
    let err = run(&assets(2), &params(LayoutMode::Dual)).unwrap_err();
    assert!(matches!(err, CardError::InvalidLayoutConfiguration(_)));
}

#[test]
fn dual_draws_banner_and_no_text() {
    let a = assets(2).with_title_image(solid(200, 50, [250, 0, 0, 255]));
    let (img, engine, sink) = run(&a, &params(LayoutMode::Dual)).unwrap();
    assert!(engine.drawn.is_empty());
    // 374 x 93 banner centered on 0.585 H.
    let offset = PixelOffset::new(33, 345 - 46);
    assert!(sink.events.contains(&RenderEvent::TitleImagePlaced { offset }));
    assert_eq!(img.get_pixel(220, 345).0, [250, 0, 0, 255]);
}

#[test]
fn title_image_replaces_title_lines() {
    let a = assets(1).with_title_image(solid(1000, 200, [0, 250, 0, 255]));
    let mut p = params(LayoutMode::Crypto);
    p.use_title_image = true;
    let (_, engine, sink) = run(&a, &p).unwrap();
    assert!(!engine.drawn.iter().any(|t| t == "Title"));
    assert!(engine.drawn.iter().any(|t| t == "Provider"));
    assert!(sink
        .events
        .iter()
        .any(|e| matches!(e, RenderEvent::TitleImagePlaced { .. })));
}

#[test]
fn missing_title_image_falls_back_to_lines() {
    let mut p = params(LayoutMode::Crypto);
    p.use_title_image = true;
    let (_, engine, _) = run(&assets(1), &p).unwrap();
    assert!(engine.drawn.iter().any(|t| t == "Title"));
}

#[test]
fn title_image_scaling_never_upscales() {
    let p = CardParams::default();
    let big = RgbaImage::new(1000, 200);
    let (w, h) = scale_title_image(&big, p.canvas, &p).unwrap().dimensions();
    assert!((307..=308).contains(&w), "{w}");
    assert_eq!(h, 61);
    let small = RgbaImage::new(50, 20);
    assert_eq!(
        scale_title_image(&small, p.canvas, &p).unwrap().dimensions(),
        (50, 20)
    );
}

#[test]
fn corner_radius_clears_corners() {
    let mut p = params(LayoutMode::Default);
    p.corner_radius = Some(26.0);
    let (img, _, sink) = run(&assets(1), &p).unwrap();
    assert_eq!(img.get_pixel(0, 0).0[3], 0);
    assert_eq!(img.get_pixel(439, 589).0[3], 0);
    assert_eq!(img.get_pixel(220, 295).0[3], 255);
    assert!(sink
        .events
        .contains(&RenderEvent::CornersRounded { radius: 26.0 }));
}

#[test]
fn manual_band_color_is_reported() {
    let mut p = params(LayoutMode::Crypto);
    p.band.color = Some(Rgb8::new(200, 50, 50));
    let (img, _, sink) = run(&assets(1), &p).unwrap();
    assert!(sink.events.contains(&RenderEvent::BandApplied {
        technique: BandTechnique::Glow,
        color: Some(Rgb8::new(200, 50, 50)),
    }));
    let bottom = img.get_pixel(220, 589).0;
    assert_eq!(bottom, [200, 50, 50, 255]);
}

#[test]
fn invalid_params_fail_before_rendering() {
    let mut p = params(LayoutMode::Default);
    p.text_scale = 0.0;
    let err = run(&assets(1), &p).unwrap_err();
    assert!(matches!(err, CardError::Config(_)));
}
