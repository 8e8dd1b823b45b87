//! Rendering many cards at once.

/// Parallel batch rendering on a dedicated rayon pool.
pub mod batch;
