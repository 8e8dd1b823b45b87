use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        CardError::missing_asset("x")
            .to_string()
            .contains("missing asset:")
    );
    assert!(
        CardError::invalid_layout("x")
            .to_string()
            .contains("invalid layout:")
    );
    assert!(
        CardError::font_load("x")
            .to_string()
            .contains("font load error:")
    );
    assert!(
        CardError::processing("x")
            .to_string()
            .contains("processing error:")
    );
    assert!(CardError::config("x").to_string().contains("config error:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = CardError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
