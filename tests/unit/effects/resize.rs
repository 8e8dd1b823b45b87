use super::*;
use image::Rgba;

#[test]
fn resize_rejects_empty_target() {
    let img = RgbaImage::new(4, 4);
    assert!(resize_exact(&img, 0, 4).is_err());
    assert!(resize_exact(&RgbaImage::new(0, 4), 2, 2).is_err());
}

#[test]
fn scale_to_height_keeps_aspect() {
    let img = RgbaImage::from_pixel(100, 200, Rgba([1, 2, 3, 255]));
    let out = scale_to_height(&img, 50).unwrap();
    assert_eq!(out.dimensions(), (25, 50));
}

#[test]
fn resize_keeps_opaque_color() {
    let img = RgbaImage::from_pixel(10, 10, Rgba([200, 40, 90, 255]));
    let out = resize_exact(&img, 23, 7).unwrap();
    for p in out.pixels() {
        for (got, want) in p.0.iter().zip([200u8, 40, 90, 255]) {
            assert!((i32::from(*got) - i32::from(want)).abs() <= 1);
        }
    }
}

#[test]
fn content_bounds_finds_opaque_region() {
    let mut img = RgbaImage::new(10, 8);
    img.put_pixel(2, 3, Rgba([0, 0, 0, 1]));
    img.put_pixel(6, 5, Rgba([0, 0, 0, 255]));
    assert_eq!(content_bounds(&img), Some((2, 3, 5, 3)));
    assert_eq!(trim_transparent(&img).dimensions(), (5, 3));
}

#[test]
fn trim_fully_transparent_is_unchanged() {
    let img = RgbaImage::new(6, 6);
    assert_eq!(content_bounds(&img), None);
    assert_eq!(trim_transparent(&img).dimensions(), (6, 6));
}
