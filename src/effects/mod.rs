//! Pixel-level building blocks shared by every layout stage.

/// Separable gaussian blur for color and coverage buffers.
pub mod blur;
/// Source-over and additive compositing with clipping.
pub mod composite;
/// Vertical alpha ramps.
pub mod gradient;
/// Rounded-corner alpha mask.
pub mod mask;
pub(crate) mod raster;
/// Lanczos resizing and transparent-border trimming.
pub mod resize;
