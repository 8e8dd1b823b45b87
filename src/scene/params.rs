use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::foundation::core::{CanvasSize, Rgb8};
use crate::foundation::error::{CardError, CardResult};
use crate::scene::style::CardStyle;

/// Corner radius used by the reference cards when rounding is enabled.
pub const DEFAULT_CORNER_RADIUS: f64 = 26.0;

/// Named layout family of a card.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    /// Side-by-side for one or two characters, pyramid for three.
    #[default]
    Default,
    /// One large centered character over a glowing band.
    Crypto,
    /// Two characters facing a central title banner.
    Dual,
}

/// Lower-band treatment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandTechnique {
    /// Glow in crypto mode, nothing otherwise.
    #[default]
    Auto,
    /// No band.
    None,
    /// Blur the lower third and darken it with a gradient.
    BlurDarken,
    /// Colored glow in the hue of the composed image (or a manual color).
    Glow,
}

/// How a [`BandTechnique::Glow`] band is synthesized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlowTechnique {
    /// Three blurred ellipses centered on the bottom edge.
    #[default]
    Ellipses,
    /// Blurred band pasted through a fade mask, then tinted.
    MaskFade,
}

/// Band configuration of one card.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BandSpec {
    /// Which band to draw.
    pub technique: BandTechnique,
    /// Glow variant when the technique resolves to a glow.
    pub glow: GlowTechnique,
    /// Manual glow/tint color; extracted from the image when absent.
    pub color: Option<Rgb8>,
    /// Multiplier on blur radius, darkening and glow opacity.
    pub intensity: f32,
    /// When false, band stages skip their blur step.
    pub blur: bool,
}

impl Default for BandSpec {
    fn default() -> Self {
        Self {
            technique: BandTechnique::Auto,
            glow: GlowTechnique::Ellipses,
            color: None,
            intensity: 1.0,
            blur: true,
        }
    }
}

impl BandSpec {
    /// Resolve [`BandTechnique::Auto`] for `mode`.
    pub fn resolved_technique(&self, mode: LayoutMode) -> BandTechnique {
        match (self.technique, mode) {
            (BandTechnique::Auto, LayoutMode::Crypto) => BandTechnique::Glow,
            (BandTechnique::Auto, _) => BandTechnique::None,
            (t, _) => t,
        }
    }
}

/// Canvas corner for the provider logo.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Corner {
    /// Top left.
    TopLeft,
    /// Top right.
    TopRight,
    /// Bottom left.
    BottomLeft,
    /// Bottom right.
    #[default]
    BottomRight,
}

/// Provider logo placement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogoOptions {
    /// Corner the logo is attached to.
    pub corner: Corner,
    /// Distance from both canvas edges in pixels.
    pub margin: u32,
    /// Alpha multiplier, clamped to `[0, 1]`.
    pub opacity: f32,
    /// Invert RGB (alpha kept) for contrast on dark bands.
    pub invert: bool,
    /// Maximum logo width as a fraction of canvas width.
    pub max_width_ratio: f64,
    /// Maximum logo height as a fraction of canvas height.
    pub max_height_ratio: f64,
}

impl Default for LogoOptions {
    fn default() -> Self {
        Self {
            corner: Corner::BottomRight,
            margin: 12,
            opacity: 1.0,
            invert: true,
            max_width_ratio: 0.28,
            max_height_ratio: 0.12,
        }
    }
}

/// Resolved parameters of a single card render.
///
/// Every field has a default, so `{}` is a valid JSON document describing a default-mode card with
/// no text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CardParams {
    /// Output size.
    pub canvas: CanvasSize,
    /// Layout family.
    pub mode: LayoutMode,
    /// Character height as a fraction of canvas height.
    pub character_height_ratio: f64,
    /// Title lines, top to bottom.
    pub title_lines: Vec<String>,
    /// Draw the title image (when supplied) instead of the title lines.
    pub use_title_image: bool,
    /// Line set in the title font between the title and the provider label.
    pub subtitle: Option<String>,
    /// Provider label.
    pub provider: Option<String>,
    /// Draw the provider logo (when supplied) instead of the provider label.
    pub use_logo: bool,
    /// Lower-band treatment.
    pub band: BandSpec,
    /// Multiplier on the starting text size ratios.
    pub text_scale: f64,
    /// Vertical text shift as a fraction of canvas height (positive moves down).
    pub text_offset_ratio: f64,
    /// Extra scale applied to a title image after fitting its bounds.
    pub title_image_scale: f64,
    /// Provider logo placement.
    pub logo: LogoOptions,
    /// Round the output corners with this radius.
    pub corner_radius: Option<f64>,
    /// Look and feel.
    pub style: CardStyle,
}

impl Default for CardParams {
    fn default() -> Self {
        Self {
            canvas: CanvasSize::default(),
            mode: LayoutMode::Default,
            character_height_ratio: 0.72,
            title_lines: Vec::new(),
            use_title_image: false,
            subtitle: None,
            provider: None,
            use_logo: true,
            band: BandSpec::default(),
            text_scale: 1.0,
            text_offset_ratio: 0.0,
            title_image_scale: 1.0,
            logo: LogoOptions::default(),
            corner_radius: None,
            style: CardStyle::default(),
        }
    }
}

impl CardParams {
    /// Parse parameters from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> CardResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| CardError::config(format!("parse card params JSON: {e}")))
    }

    /// Parse parameters from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> CardResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            CardError::config(format!("open card params JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Parse parameters from a JSON string.
    pub fn from_json_str(s: &str) -> CardResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| CardError::config(format!("parse card params JSON: {e}")))
    }

    /// Check ranges that serde cannot express.
    pub fn validate(&self) -> CardResult<()> {
        CanvasSize::new(self.canvas.width, self.canvas.height)?;
        if !(self.character_height_ratio.is_finite()
            && self.character_height_ratio > 0.0
            && self.character_height_ratio <= 2.0)
        {
            return Err(CardError::config(format!(
                "character_height_ratio must be within (0, 2] (got {})",
                self.character_height_ratio
            )));
        }
        if !(self.band.intensity.is_finite() && (0.0..=4.0).contains(&self.band.intensity)) {
            return Err(CardError::config(format!(
                "band.intensity must be within [0, 4] (got {})",
                self.band.intensity
            )));
        }
        for (name, v) in [
            ("text_scale", self.text_scale),
            ("title_image_scale", self.title_image_scale),
            ("logo.max_width_ratio", self.logo.max_width_ratio),
            ("logo.max_height_ratio", self.logo.max_height_ratio),
        ] {
            if !(v.is_finite() && v > 0.0) {
                return Err(CardError::config(format!(
                    "{name} must be finite and > 0 (got {v})"
                )));
            }
        }
        if !self.text_offset_ratio.is_finite() || self.text_offset_ratio.abs() > 1.0 {
            return Err(CardError::config(format!(
                "text_offset_ratio must be within [-1, 1] (got {})",
                self.text_offset_ratio
            )));
        }
        if !self.logo.opacity.is_finite() {
            return Err(CardError::config("logo.opacity must be finite"));
        }
        if let Some(r) = self.corner_radius
            && !(r.is_finite() && r >= 0.0)
        {
            return Err(CardError::config(format!(
                "corner_radius must be finite and >= 0 (got {r})"
            )));
        }
        self.style.validate()
    }

    /// Non-empty title lines.
    pub fn title_text(&self) -> impl Iterator<Item = &str> {
        self.title_lines
            .iter()
            .map(String::as_str)
            .filter(|l| !l.trim().is_empty())
    }

    /// Subtitle, when non-empty.
    pub fn subtitle_text(&self) -> Option<&str> {
        self.subtitle.as_deref().filter(|s| !s.trim().is_empty())
    }

    /// Provider label, when non-empty.
    pub fn provider_text(&self) -> Option<&str> {
        self.provider.as_deref().filter(|p| !p.trim().is_empty())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/params.rs"]
mod tests;
