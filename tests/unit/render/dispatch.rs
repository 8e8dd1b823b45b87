use super::*;

#[test]
fn default_mode_picks_by_count() {
    assert_eq!(
        select_layout(LayoutMode::Default, 1, false).unwrap(),
        LayoutPlan::SideBySide { count: 1 }
    );
    assert_eq!(
        select_layout(LayoutMode::Default, 2, true).unwrap(),
        LayoutPlan::SideBySide { count: 2 }
    );
    assert_eq!(
        select_layout(LayoutMode::Default, 3, false).unwrap(),
        LayoutPlan::Pyramid
    );
}

#[test]
fn crypto_is_single_for_any_valid_count() {
    for n in 1..=3 {
        let plan = select_layout(LayoutMode::Crypto, n, false).unwrap();
        assert_eq!(plan, LayoutPlan::Single);
        assert_eq!(plan.characters_used(), 1);
    }
}

#[test]
fn no_characters_is_missing_asset() {
    for mode in [LayoutMode::Default, LayoutMode::Crypto, LayoutMode::Dual] {
        let err = select_layout(mode, 0, true).unwrap_err();
        assert!(matches!(err, CardError::MissingRequiredAsset(_)), "{mode:?}");
    }
}

#[test]
fn too_many_characters_is_invalid() {
    let err = select_layout(LayoutMode::Default, 4, false).unwrap_err();
    assert!(matches!(err, CardError::InvalidLayoutConfiguration(_)));
}

#[test]
fn dual_requires_two_characters_and_title_image() {
    let one = select_layout(LayoutMode::Dual, 1, true).unwrap_err();
    assert!(matches!(one, CardError::InvalidLayoutConfiguration(_)));
    let no_title = select_layout(LayoutMode::Dual, 2, false).unwrap_err();
    assert!(no_title.to_string().contains("title image"));
    let plan = select_layout(LayoutMode::Dual, 3, true).unwrap();
    assert_eq!(plan, LayoutPlan::Dual);
    assert_eq!(plan.characters_used(), 2);
}
