use super::*;
use serde_json::json;

#[test]
fn parses_hex_with_and_without_hash() {
    let c: Rgb8 = serde_json::from_value(json!("#C83232")).unwrap();
    assert_eq!(c, Rgb8::new(200, 50, 50));
    let c: Rgb8 = serde_json::from_value(json!("0a0b0c")).unwrap();
    assert_eq!(c, Rgb8::new(10, 11, 12));
}

#[test]
fn parses_array_and_object() {
    let c: Rgb8 = serde_json::from_value(json!([200, 50, 50])).unwrap();
    assert_eq!(c, Rgb8::new(200, 50, 50));
    let c: Rgb8 = serde_json::from_value(json!({"r": 1, "g": 2, "b": 3})).unwrap();
    assert_eq!(c, Rgb8::new(1, 2, 3));
}

#[test]
fn rejects_out_of_range_and_bad_shapes() {
    assert!(serde_json::from_value::<Rgb8>(json!([256, 0, 0])).is_err());
    assert!(serde_json::from_value::<Rgb8>(json!([-1, 0, 0])).is_err());
    assert!(serde_json::from_value::<Rgb8>(json!([1, 2])).is_err());
    assert!(serde_json::from_value::<Rgb8>(json!("#12345")).is_err());
    assert!(serde_json::from_value::<Rgb8>(json!("#zz0000")).is_err());
}

#[test]
fn serialized_form_reads_back() {
    let c = Rgb8::new(9, 8, 7);
    let v = serde_json::to_value(c).unwrap();
    assert_eq!(serde_json::from_value::<Rgb8>(v).unwrap(), c);
}
