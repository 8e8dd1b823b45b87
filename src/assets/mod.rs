//! Decoding and caching of source images.

/// Bounded LRU of decoded images keyed by id and content fingerprint.
pub mod cache;
mod color;
/// Raster and SVG decoding.
pub mod decode;
