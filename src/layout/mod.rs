//! Card composition stages: background, characters, band, logo.

/// Cover-fit of the background photo and the crypto darkening fade.
pub mod background;
/// Lower-band treatments (blur-darken, glow ellipses, mask-fade tint).
pub mod band;
/// Character placement for every layout plan.
pub mod characters;
/// Provider logo scaling, recoloring and corner placement.
pub mod logo;
/// Dominant color extraction.
pub mod palette;
