use super::*;

#[test]
fn mul_div255_rounds_to_nearest() {
    assert_eq!(mul_div255_u16(255, 255), 255);
    assert_eq!(mul_div255_u16(128, 255), 128);
    assert_eq!(mul_div255_u16(128, 128), 64);
    assert_eq!(mul_div255_u8(0, 200), 0);
}

#[test]
fn premultiply_zeroes_transparent_pixels() {
    let mut px = vec![200, 100, 50, 0, 200, 100, 50, 255];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[..4], &[0, 0, 0, 0]);
    assert_eq!(&px[4..], &[200, 100, 50, 255]);
}

#[test]
fn premultiply_then_unpremultiply_is_close() {
    let mut px = vec![200, 100, 50, 128];
    premultiply_rgba8_in_place(&mut px);
    unpremultiply_rgba8_in_place(&mut px);
    assert!((i32::from(px[0]) - 200).abs() <= 2);
    assert!((i32::from(px[1]) - 100).abs() <= 2);
    assert!((i32::from(px[2]) - 50).abs() <= 2);
    assert_eq!(px[3], 128);
}

#[test]
fn scale_u8_clamps_factor() {
    assert_eq!(scale_u8(200, 0.5), 100);
    assert_eq!(scale_u8(200, 2.0), 200);
    assert_eq!(scale_u8(200, -1.0), 0);
}
