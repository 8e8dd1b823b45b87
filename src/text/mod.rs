//! Text measurement, fitting and painting.

/// Measuring and drawing strings.
pub mod engine;
/// Title/provider size fitting.
pub mod fit;
