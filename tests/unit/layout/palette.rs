use super::*;
use image::Rgba;

fn style() -> PaletteStyle {
    PaletteStyle::default()
}

#[test]
fn gray_majority_is_skipped_for_the_chromatic_minority() {
    let mut region = RgbaImage::from_pixel(100, 100, Rgba([120, 120, 120, 255]));
    for y in 0..100 {
        for x in 70..100 {
            region.put_pixel(x, y, Rgba([200, 50, 50, 255]));
        }
    }
    let c = dominant_color(&region, &style()).unwrap();
    assert!(c.r > 150 && c.g < 90 && c.b < 90, "{c:?}");
}

#[test]
fn achromatic_regions_fall_back_to_gray() {
    for px in [[0, 0, 0, 255], [255, 255, 255, 255], [90, 90, 90, 255], [20, 5, 5, 255]] {
        let region = RgbaImage::from_pixel(64, 32, Rgba(px));
        assert_eq!(dominant_color(&region, &style()).unwrap(), Rgb8::NEUTRAL_GRAY, "{px:?}");
    }
}

#[test]
fn empty_region_falls_back() {
    let region = RgbaImage::new(0, 0);
    assert_eq!(dominant_color(&region, &style()).unwrap(), Rgb8::NEUTRAL_GRAY);
}

#[test]
fn custom_fallback_is_honored() {
    let s = PaletteStyle {
        fallback: Rgb8::new(1, 2, 3),
        ..style()
    };
    let region = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255]));
    assert_eq!(dominant_color(&region, &s).unwrap(), Rgb8::new(1, 2, 3));
}

#[test]
fn result_is_a_bucket_center() {
    let region = RgbaImage::from_pixel(50, 50, Rgba([30, 100, 220, 255]));
    assert_eq!(dominant_color(&region, &style()).unwrap(), Rgb8::new(24, 104, 216));
}
