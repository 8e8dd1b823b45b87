use super::*;

#[test]
fn linear_alpha_hits_both_ends() {
    assert_eq!(linear_alpha(0, 200, 0, 11), 0);
    assert_eq!(linear_alpha(0, 200, 10, 11), 200);
    assert_eq!(linear_alpha(0, 200, 5, 11), 100);
    assert_eq!(linear_alpha(80, 0, 0, 1), 80);
}

#[test]
fn ramp_rows_share_alpha_and_color() {
    let ramp = vertical_ramp(3, 4, Rgb8::new(1, 2, 3), |y| (y * 10) as u8);
    assert_eq!(ramp.get_pixel(0, 2).0, [1, 2, 3, 20]);
    assert_eq!(ramp.get_pixel(2, 2).0, [1, 2, 3, 20]);
    assert_eq!(ramp.get_pixel(1, 3).0[3], 30);
}
