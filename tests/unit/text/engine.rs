use super::*;

const SYSTEM_FONT: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf";

fn system_font() -> Option<FontData> {
    FontData::from_path(SYSTEM_FONT).ok()
}

#[test]
fn measure_grows_with_text_and_size() {
    let Some(font) = system_font() else {
        return;
    };
    let mut engine = ParleyTextEngine::new();
    let short = engine.measure("Card", &font, 32.0).unwrap();
    let long = engine.measure("Card Card Card", &font, 32.0).unwrap();
    let big = engine.measure("Card", &font, 64.0).unwrap();

    assert!(short.width > 0.0 && short.height > 0.0);
    assert!(long.width > 2.5 * short.width);
    assert!((big.width / short.width - 2.0).abs() < 0.1);
    assert!(big.height > short.height);
}

#[test]
fn empty_text_has_zero_extent() {
    let mut engine = ParleyTextEngine::new();
    let font = FontData::from_bytes(vec![0, 1, 0, 0, 9, 9, 9, 9]).unwrap();
    assert_eq!(engine.measure("", &font, 20.0).unwrap(), TextExtent::default());
}

#[test]
fn unparseable_font_is_font_load_error() {
    let mut engine = ParleyTextEngine::new();
    let font = FontData::from_bytes(vec![0, 1, 0, 0, 9, 9, 9, 9]).unwrap();
    let err = engine.measure("x", &font, 20.0).unwrap_err();
    assert!(matches!(err, CardError::FontLoad(_)));
}

#[test]
fn draw_paints_ink_near_origin() {
    let Some(font) = system_font() else {
        return;
    };
    let mut engine = ParleyTextEngine::new();
    let extent = engine.measure("HH", &font, 40.0).unwrap();
    let mut canvas = RgbaImage::from_pixel(200, 100, Rgba([0, 0, 0, 255]));
    engine
        .draw(
            &mut canvas,
            "HH",
            &font,
            40.0,
            PixelOffset::new(20, 10),
            Rgba([255, 255, 255, 255]),
        )
        .unwrap();

    let lit: Vec<(u32, u32)> = canvas
        .enumerate_pixels()
        .filter(|(_, _, p)| p.0[0] > 128)
        .map(|(x, y, _)| (x, y))
        .collect();
    assert!(!lit.is_empty());
    let right = 20.0 + extent.width + 2.0;
    let bottom = 10.0 + extent.height + 2.0;
    for (x, y) in lit {
        assert!(x >= 18 && (x as f32) <= right, "x {x}");
        assert!(y >= 8 && (y as f32) <= bottom, "y {y}");
    }
}

#[test]
fn family_names_are_cached_per_font() {
    let Some(font) = system_font() else {
        return;
    };
    let mut engine = ParleyTextEngine::new();
    engine.measure("a", &font, 12.0).unwrap();
    engine.measure("b", &font, 12.0).unwrap();
    assert_eq!(engine.families.len(), 1);
}
