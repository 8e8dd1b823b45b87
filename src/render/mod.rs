//! Card rendering: layout selection, the stage pipeline and its progress events.

/// Layout selection from mode and asset counts.
pub mod dispatch;
/// Render progress events and sinks.
pub mod observer;
/// The single-card stage pipeline.
pub mod pipeline;
