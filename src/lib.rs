//! thumbcard composes fixed-size promotional cards from a background photo, one to three
//! character cutouts, a title and a provider label or logo.
//!
//! The public API is a pure function of decoded inputs:
//!
//! - Build [`CardAssets`] (decoded images and fonts) and [`CardParams`] (mode, text, band, logo)
//! - Call [`render`] for an RGBA image of exactly `params.canvas`
//! - Or call [`render_with`] to supply your own [`TextEngine`] and [`EventSink`]
//!
//! Many cards can be rendered at once with [`render_batch`], which runs on a dedicated rayon pool
//! and skips failing items.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Image decoding and the decoded-asset cache.
pub mod assets;
/// Pixel operations: blur, compositing, gradients, masks, resizing.
pub mod effects;
/// Composition stages of a card.
pub mod layout;
/// The render pipeline and its progress events.
pub mod render;
/// Boundary model: assets, parameters and style.
pub mod scene;
/// Batch rendering.
pub mod session;
/// Text measurement and fitting.
pub mod text;

pub use crate::foundation::core::{CanvasSize, PixelOffset, Rgb8};
pub use crate::foundation::error::{CardError, CardResult};

pub use crate::assets::cache::{AssetCache, AssetKey, SharedAssetCache};
pub use crate::assets::decode::{decode_image, load_image};
pub use crate::render::dispatch::{LayoutPlan, select_layout};
pub use crate::render::observer::{EventSink, NullSink, RecordingSink, RenderEvent, TracingSink};
pub use crate::render::pipeline::{render, render_with};
pub use crate::scene::assets::{CardAssets, FontData};
pub use crate::scene::params::{
    BandSpec, BandTechnique, CardParams, Corner, GlowTechnique, LayoutMode, LogoOptions,
};
pub use crate::scene::style::CardStyle;
pub use crate::session::batch::{BatchItem, BatchOpts, BatchReport, render_batch};
pub use crate::text::engine::{ParleyTextEngine, TextEngine, TextExtent};
