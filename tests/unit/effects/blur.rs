use super::*;
use image::{Luma, Rgba};

#[test]
fn sigma_0_is_identity() {
    let src = vec![1u8, 2, 3, 4, 5, 6, 7, 8];
    let out = blur_channels(&src, 1, 2, 4, 0.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn rejects_mismatched_buffer_and_bad_sigma() {
    assert!(blur_channels(&[0u8; 7], 1, 2, 4, 1.0).is_err());
    assert!(blur_channels(&[0u8; 8], 1, 2, 4, f32::NAN).is_err());
    assert!(blur_channels(&[0u8; 8], 1, 2, 4, -1.0).is_err());
}

#[test]
fn constant_image_is_identity_for_both_paths() {
    let (w, h) = (9u32, 7u32);
    let px = [10u8, 20, 30, 40];
    let src = px.repeat((w * h) as usize);
    for sigma in [1.5, 4.0, 12.0, 60.0] {
        let out = blur_channels(&src, w, h, 4, sigma).unwrap();
        assert_eq!(out, src, "sigma {sigma}");
    }
}

#[test]
fn blur_spreads_energy_from_single_pixel() {
    let mut mask = GrayImage::new(21, 21);
    mask.put_pixel(10, 10, Luma([255]));
    let out = blur_gray(&mask, 2.0).unwrap();
    assert!(out.get_pixel(10, 10).0[0] < 255);
    assert!(out.get_pixel(11, 10).0[0] > 0);
    assert_eq!(out.get_pixel(11, 10), out.get_pixel(9, 10));
    assert_eq!(out.get_pixel(10, 11), out.get_pixel(10, 9));
}

#[test]
fn box_path_is_symmetric_and_spreads() {
    let mut mask = GrayImage::new(81, 3);
    for y in 0..3 {
        for x in 30..51 {
            mask.put_pixel(x, y, Luma([255]));
        }
    }
    let out = blur_gray(&mask, 10.0).unwrap();
    assert!(out.get_pixel(25, 1).0[0] > 0);
    assert!(out.get_pixel(40, 1).0[0] < 255);
    assert_eq!(out.get_pixel(30, 1), out.get_pixel(50, 1));
}

#[test]
fn box_radii_approximate_sigma() {
    let radii = box_radii(60.0);
    assert_eq!(radii, [59, 59, 60]);
    let var: f64 = radii
        .iter()
        .map(|&r| {
            let d = (2 * r + 1) as f64;
            (d * d - 1.0) / 12.0
        })
        .sum();
    assert!((var.sqrt() - 60.0).abs() < 1.0);
}

#[test]
fn straight_alpha_color_survives_blur() {
    let mut img = RgbaImage::new(15, 15);
    img.put_pixel(7, 7, Rgba([255, 0, 0, 255]));
    let out = gaussian_blur(&img, 2.0).unwrap();
    for p in out.pixels() {
        if p.0[3] > 0 {
            assert_eq!(&p.0[..3], &[255, 0, 0]);
        }
    }
}
