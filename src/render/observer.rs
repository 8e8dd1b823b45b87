use crate::foundation::core::{PixelOffset, Rgb8};
use crate::render::dispatch::LayoutPlan;
use crate::scene::params::BandTechnique;

/// Progress notifications emitted by one render, in pipeline order.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderEvent {
    /// Layout chosen for the supplied assets.
    LayoutSelected {
        /// Selected plan.
        plan: LayoutPlan,
    },
    /// Background cover-fitted onto the canvas.
    BackgroundFitted {
        /// Vertical crop anchor used.
        anchor: f64,
    },
    /// Characters composited.
    CharactersPlaced {
        /// Number of characters drawn.
        count: usize,
    },
    /// Band stage finished.
    BandApplied {
        /// Technique after resolving `auto`.
        technique: BandTechnique,
        /// Glow color when a glow was drawn.
        color: Option<Rgb8>,
    },
    /// Text fit finished.
    TextFitted {
        /// Final title ratio.
        title_ratio: f64,
        /// Final provider ratio.
        provider_ratio: f64,
        /// Loop passes used.
        iterations: u32,
        /// Whether the group fits its box.
        fits: bool,
    },
    /// Title image composited in place of title text.
    TitleImagePlaced {
        /// Top-left corner.
        offset: PixelOffset,
    },
    /// Provider logo composited.
    LogoPlaced {
        /// Top-left corner.
        offset: PixelOffset,
    },
    /// Logo requested but absent in a text mode; provider text drawn instead.
    LogoMissingFallback,
    /// Rounded-corner mask applied.
    CornersRounded {
        /// Radius in pixels.
        radius: f64,
    },
}

/// Receives [`RenderEvent`]s.
pub trait EventSink {
    /// Handle one event.
    fn emit(&mut self, event: RenderEvent);
}

/// Forwards events to `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&mut self, event: RenderEvent) {
        match &event {
            RenderEvent::LogoMissingFallback => {
                tracing::info!("logo requested but not supplied; drawing provider text")
            }
            RenderEvent::TextFitted { fits: false, .. } => {
                tracing::info!(?event, "text did not fit its box at the size floor")
            }
            _ => tracing::debug!(?event, "render stage"),
        }
    }
}

/// Drops every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: RenderEvent) {}
}

/// Keeps every event in order.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    /// Events received so far.
    pub events: Vec<RenderEvent>,
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: RenderEvent) {
        self.events.push(event);
    }
}
