//! Boundary model: the assets, parameters and style of one card.

/// Decoded inputs and fonts.
pub mod assets;
/// Per-card parameters and their JSON loading.
pub mod params;
/// Tunables that reproduce the reference look.
pub mod style;
