use serde::{Deserialize, Serialize};

use crate::foundation::core::Rgb8;
use crate::foundation::error::{CardError, CardResult};

/// Every geometric and tonal tunable of the card look, grouped by pipeline stage.
///
/// `CardStyle::default()` reproduces the reference card aesthetic. The value is immutable during a
/// render and threaded by reference through every stage; any subset can be overridden from JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CardStyle {
    /// Background cover-fit anchors and the crypto fade.
    pub background: BackgroundStyle,
    /// Single centered character (crypto mode).
    pub single: SingleStyle,
    /// One or two characters side by side (default mode).
    pub side_by_side: SideBySideStyle,
    /// Two trimmed characters plus a title banner (dual mode).
    pub dual: DualStyle,
    /// One large and two small characters (default mode with three characters).
    pub pyramid: PyramidStyle,
    /// Blurred and darkened lower band.
    pub blur_darken: BlurDarkenStyle,
    /// Layered elliptical color glow.
    pub glow: GlowBandStyle,
    /// Blurred band pasted through a fade mask, plus a tint overlay.
    pub mask_fade: MaskFadeStyle,
    /// Dominant color extraction.
    pub palette: PaletteStyle,
    /// Text box used in crypto mode.
    pub crypto_text: TextBoxStyle,
    /// Text box used in default mode.
    pub default_text: TextBoxStyle,
    /// Iteration limits of the text fitter.
    pub fit: FitStyle,
    /// Title image bounds used in place of title text.
    pub title_image: TitleImageStyle,
}

impl Default for CardStyle {
    fn default() -> Self {
        Self {
            background: BackgroundStyle::default(),
            single: SingleStyle::default(),
            side_by_side: SideBySideStyle::default(),
            dual: DualStyle::default(),
            pyramid: PyramidStyle::default(),
            blur_darken: BlurDarkenStyle::default(),
            glow: GlowBandStyle::default(),
            mask_fade: MaskFadeStyle::default(),
            palette: PaletteStyle::default(),
            crypto_text: TextBoxStyle::crypto(),
            default_text: TextBoxStyle::default_mode(),
            fit: FitStyle::default(),
            title_image: TitleImageStyle::default(),
        }
    }
}

impl CardStyle {
    /// Check that every ratio, radius and alpha is usable.
    pub fn validate(&self) -> CardResult<()> {
        fn ratio(name: &str, v: f64) -> CardResult<()> {
            if !v.is_finite() || !(0.0..=4.0).contains(&v) {
                return Err(CardError::config(format!(
                    "style.{name} must be finite and within [0, 4] (got {v})"
                )));
            }
            Ok(())
        }
        fn radius(name: &str, v: f32) -> CardResult<()> {
            if !v.is_finite() || v < 0.0 {
                return Err(CardError::config(format!(
                    "style.{name} must be finite and >= 0 (got {v})"
                )));
            }
            Ok(())
        }

        ratio("background.default_anchor", self.background.default_anchor)?;
        ratio("background.crypto_anchor", self.background.crypto_anchor)?;
        ratio("background.dual_anchor", self.background.dual_anchor)?;
        ratio("single.enlarge", self.single.enlarge)?;
        ratio("single.bottom_ratio", self.single.bottom_ratio)?;
        self.single.halo.validate("single.halo")?;
        ratio("side_by_side.spacing_ratio", self.side_by_side.spacing_ratio)?;
        ratio(
            "side_by_side.max_group_width_ratio",
            self.side_by_side.max_group_width_ratio,
        )?;
        ratio("side_by_side.bottom_ratio", self.side_by_side.bottom_ratio)?;
        ratio("dual.height_ratio", self.dual.height_ratio)?;
        ratio("dual.top_ratio", self.dual.top_ratio)?;
        ratio("dual.banner_width_ratio", self.dual.banner_width_ratio)?;
        ratio("dual.banner_center_y_ratio", self.dual.banner_center_y_ratio)?;
        ratio("pyramid.middle_height_ratio", self.pyramid.middle_height_ratio)?;
        ratio("pyramid.side_height_ratio", self.pyramid.side_height_ratio)?;
        self.pyramid.halo.validate("pyramid.halo")?;
        ratio("blur_darken.band_height_ratio", self.blur_darken.band_height_ratio)?;
        radius("blur_darken.blur_radius", self.blur_darken.blur_radius)?;
        for (i, layer) in self.glow.layers.iter().enumerate() {
            ratio(&format!("glow.layers[{i}].radius_x_ratio"), layer.radius_x_ratio)?;
            ratio(&format!("glow.layers[{i}].radius_y_ratio"), layer.radius_y_ratio)?;
            radius(&format!("glow.layers[{i}].blur_radius"), layer.blur_radius)?;
            ratio(&format!("glow.layers[{i}].opacity"), f64::from(layer.opacity))?;
        }
        ratio("glow.sample_start_ratio", self.glow.sample_start_ratio)?;
        ratio("mask_fade.start_ratio", self.mask_fade.start_ratio)?;
        ratio("mask_fade.transition_ratio", self.mask_fade.transition_ratio)?;
        radius("mask_fade.blur_radius", self.mask_fade.blur_radius)?;
        if self.palette.grid == 0 || self.palette.levels == 0 {
            return Err(CardError::config("style.palette grid and levels must be > 0"));
        }
        self.crypto_text.validate("crypto_text")?;
        self.default_text.validate("default_text")?;
        if !(1..=MAX_FIT_ITERATIONS).contains(&self.fit.max_iterations) {
            return Err(CardError::config(format!(
                "style.fit.max_iterations must be within [1, {MAX_FIT_ITERATIONS}] (got {})",
                self.fit.max_iterations
            )));
        }
        if !FIT_DAMPING_RANGE.contains(&self.fit.damping) {
            return Err(CardError::config(format!(
                "style.fit.damping must be within [{}, {}] (got {})",
                FIT_DAMPING_RANGE.start(),
                FIT_DAMPING_RANGE.end(),
                self.fit.damping
            )));
        }
        ratio("fit.title_floor", self.fit.title_floor)?;
        ratio("fit.subtitle_floor", self.fit.subtitle_floor)?;
        ratio("fit.provider_floor", self.fit.provider_floor)?;
        ratio("title_image.max_width_ratio", self.title_image.max_width_ratio)?;
        ratio("title_image.max_height_ratio", self.title_image.max_height_ratio)?;
        Ok(())
    }
}

/// Background anchors and the crypto darkening fade.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackgroundStyle {
    /// Vertical crop anchor in default mode (0 keeps the top).
    pub default_anchor: f64,
    /// Vertical crop anchor in crypto mode.
    pub crypto_anchor: f64,
    /// Vertical crop anchor in dual mode.
    pub dual_anchor: f64,
    /// Fade alpha at the top of the canvas in crypto mode.
    pub crypto_fade_top_alpha: u8,
    /// Fade alpha at the bottom of the canvas in crypto mode.
    pub crypto_fade_bottom_alpha: u8,
}

impl Default for BackgroundStyle {
    fn default() -> Self {
        Self {
            default_anchor: 0.0,
            crypto_anchor: 0.5,
            dual_anchor: 0.5,
            crypto_fade_top_alpha: 0,
            crypto_fade_bottom_alpha: 80,
        }
    }
}

/// Blurred, dimmed duplicate of a character drawn behind it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GlowHalo {
    /// Gaussian blur radius in pixels.
    pub blur_radius: f32,
    /// Alpha multiplier applied after blurring.
    pub alpha: f32,
    /// Offset applied to both axes relative to the character.
    pub offset: i64,
}

impl GlowHalo {
    fn validate(&self, name: &str) -> CardResult<()> {
        if !self.blur_radius.is_finite() || self.blur_radius < 0.0 {
            return Err(CardError::config(format!("style.{name}.blur_radius must be >= 0")));
        }
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(CardError::config(format!("style.{name}.alpha must be within [0, 1]")));
        }
        Ok(())
    }
}

/// Crypto mode character.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SingleStyle {
    /// Multiplier on the requested character height ratio.
    pub enlarge: f64,
    /// Character bottom edge as a fraction of canvas height.
    pub bottom_ratio: f64,
    /// Glow drawn behind the character.
    pub halo: GlowHalo,
}

impl Default for SingleStyle {
    fn default() -> Self {
        Self {
            enlarge: 1.15,
            bottom_ratio: 0.85,
            halo: GlowHalo {
                blur_radius: 50.0,
                alpha: 0.7,
                offset: -20,
            },
        }
    }
}

/// Default mode with one or two characters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SideBySideStyle {
    /// Gap between characters as a fraction of canvas width.
    pub spacing_ratio: f64,
    /// Maximum group width as a fraction of canvas width.
    pub max_group_width_ratio: f64,
    /// Group bottom edge as a fraction of canvas height.
    pub bottom_ratio: f64,
}

impl Default for SideBySideStyle {
    fn default() -> Self {
        Self {
            spacing_ratio: 0.05,
            max_group_width_ratio: 0.90,
            bottom_ratio: 0.95,
        }
    }
}

/// Dual "versus" layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DualStyle {
    /// Height of each trimmed character as a fraction of canvas height.
    pub height_ratio: f64,
    /// Horizontal centers of the two characters as fractions of canvas width.
    pub center_x_ratios: [f64; 2],
    /// Top edge of both characters as a fraction of canvas height.
    pub top_ratio: f64,
    /// Banner width as a fraction of canvas width.
    pub banner_width_ratio: f64,
    /// Banner vertical center as a fraction of canvas height.
    pub banner_center_y_ratio: f64,
}

impl Default for DualStyle {
    fn default() -> Self {
        Self {
            height_ratio: 0.52,
            center_x_ratios: [0.30, 0.70],
            top_ratio: 0.15,
            banner_width_ratio: 0.85,
            banner_center_y_ratio: 0.585,
        }
    }
}

/// Default mode with three characters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PyramidStyle {
    /// Height of the middle character as a fraction of canvas height.
    pub middle_height_ratio: f64,
    /// Vertical center of the middle character as a fraction of canvas height.
    pub middle_center_y_ratio: f64,
    /// Glow behind the middle character.
    pub halo: GlowHalo,
    /// Height of the two side characters as a fraction of canvas height.
    pub side_height_ratio: f64,
    /// Horizontal centers of the side characters as fractions of canvas width.
    pub side_center_x_ratios: [f64; 2],
    /// Vertical center of the side characters as a fraction of canvas height.
    pub side_center_y_ratio: f64,
}

impl Default for PyramidStyle {
    fn default() -> Self {
        Self {
            middle_height_ratio: 0.95,
            middle_center_y_ratio: 0.38,
            halo: GlowHalo {
                blur_radius: 48.0,
                alpha: 0.85,
                offset: -25,
            },
            side_height_ratio: 0.42,
            side_center_x_ratios: [0.30, 0.70],
            side_center_y_ratio: 0.58,
        }
    }
}

/// Blur-darken band.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlurDarkenStyle {
    /// Band height as a fraction of canvas height, measured from the bottom.
    pub band_height_ratio: f64,
    /// Blur radius before intensity scaling.
    pub blur_radius: f32,
    /// Darkening alpha at the top of the band.
    pub top_alpha: u8,
    /// Darkening alpha at the bottom of the band before intensity scaling.
    pub bottom_alpha: u8,
}

impl Default for BlurDarkenStyle {
    fn default() -> Self {
        Self {
            band_height_ratio: 0.333,
            blur_radius: 60.0,
            top_alpha: 0,
            bottom_alpha: 200,
        }
    }
}

/// One elliptical glow layer centered on the bottom edge.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GlowLayerStyle {
    /// Horizontal radius as a fraction of canvas width.
    pub radius_x_ratio: f64,
    /// Vertical radius as a fraction of canvas height.
    pub radius_y_ratio: f64,
    /// Blur radius applied to the layer coverage.
    pub blur_radius: f32,
    /// Layer opacity before intensity scaling.
    pub opacity: f32,
}

/// Layered glow band.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlowBandStyle {
    /// Core, bleed and outer fade layers, drawn in this order.
    pub layers: Vec<GlowLayerStyle>,
    /// Top of the region sampled for the dominant color, as a fraction of canvas height.
    pub sample_start_ratio: f64,
}

impl Default for GlowBandStyle {
    fn default() -> Self {
        Self {
            layers: vec![
                GlowLayerStyle {
                    radius_x_ratio: 0.55,
                    radius_y_ratio: 0.14,
                    blur_radius: 12.0,
                    opacity: 0.85,
                },
                GlowLayerStyle {
                    radius_x_ratio: 0.85,
                    radius_y_ratio: 0.26,
                    blur_radius: 28.0,
                    opacity: 0.55,
                },
                GlowLayerStyle {
                    radius_x_ratio: 1.25,
                    radius_y_ratio: 0.42,
                    blur_radius: 56.0,
                    opacity: 0.35,
                },
            ],
            sample_start_ratio: 0.67,
        }
    }
}

/// Mask-fade band variant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MaskFadeStyle {
    /// Band top as a fraction of canvas height.
    pub start_ratio: f64,
    /// Blur radius of the band copy.
    pub blur_radius: f32,
    /// Fraction of the band over which the blurred copy fades in.
    pub transition_ratio: f64,
    /// Tint alpha at the middle of the band.
    pub tint_peak_alpha: u8,
    /// Fraction of the peak lost by the bottom edge.
    pub tint_tail_drop: f64,
}

impl Default for MaskFadeStyle {
    fn default() -> Self {
        Self {
            start_ratio: 0.67,
            blur_radius: 25.0,
            transition_ratio: 0.20,
            tint_peak_alpha: 230,
            tint_tail_drop: 0.95,
        }
    }
}

/// Dominant color extraction thresholds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PaletteStyle {
    /// Side of the square sampling grid.
    pub grid: u32,
    /// Quantization levels per channel.
    pub levels: u32,
    /// Minimum channel variance of an accepted color.
    pub min_variance: f64,
    /// Minimum channel sum of an accepted color.
    pub min_brightness: u32,
    /// Colors whose brightest channel is below this are near-black.
    pub near_black_max: u8,
    /// Colors whose darkest channel is above this are near-white.
    pub near_white_min: u8,
    /// Returned when no bucket qualifies.
    pub fallback: Rgb8,
}

impl Default for PaletteStyle {
    fn default() -> Self {
        Self {
            grid: 50,
            levels: 16,
            min_variance: 150.0,
            min_brightness: 60,
            near_black_max: 30,
            near_white_min: 225,
            fallback: Rgb8::NEUTRAL_GRAY,
        }
    }
}

/// How a fitted text group is placed in its box.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TextAnchorStyle {
    /// Title and provider centered together in the box.
    Centered,
    /// Provider bottom `padding_ratio * H` above the box bottom, title centered above it.
    Bottom {
        /// Bottom padding as a fraction of canvas height.
        padding_ratio: f64,
    },
}

/// Drop shadow drawn under each text line.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShadowStyle {
    /// Horizontal shadow offset in pixels.
    pub dx: i64,
    /// Vertical shadow offset in pixels.
    pub dy: i64,
    /// Shadow alpha (the shadow is black).
    pub alpha: u8,
}

/// Text box geometry, start sizes and paint for one layout mode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextBoxStyle {
    /// Box top as a fraction of canvas height.
    pub top_ratio: f64,
    /// Box bottom as a fraction of canvas height.
    pub bottom_ratio: f64,
    /// Box width as a fraction of canvas width, centered.
    pub width_ratio: f64,
    /// Starting title size as a fraction of canvas height.
    pub title_ratio: f64,
    /// Starting subtitle size as a fraction of canvas height.
    pub subtitle_ratio: f64,
    /// Starting provider size as a fraction of canvas height.
    pub provider_ratio: f64,
    /// Gap between title and provider as a fraction of canvas height.
    pub min_gap_ratio: f64,
    /// Gap between lines of one block as a fraction of canvas height.
    pub line_gap_ratio: f64,
    /// Group placement.
    pub anchor: TextAnchorStyle,
    /// Title fill.
    pub title_color: Rgb8,
    /// Title alpha.
    pub title_alpha: u8,
    /// Provider fill.
    pub provider_color: Rgb8,
    /// Provider alpha.
    pub provider_alpha: u8,
    /// Optional drop shadow.
    pub shadow: Option<ShadowStyle>,
}

impl TextBoxStyle {
    /// Reference crypto text box: 68%–95% of the height, 95% of the width, centered.
    pub fn crypto() -> Self {
        Self {
            top_ratio: 0.68,
            bottom_ratio: 0.95,
            width_ratio: 0.95,
            title_ratio: 0.15,
            subtitle_ratio: 0.06,
            provider_ratio: 0.048,
            min_gap_ratio: 0.02,
            line_gap_ratio: 0.01,
            anchor: TextAnchorStyle::Centered,
            title_color: Rgb8::WHITE,
            title_alpha: 255,
            provider_color: Rgb8::WHITE,
            provider_alpha: 235,
            shadow: None,
        }
    }

    /// Reference default text block: bottom anchored with 8% padding and a soft shadow.
    pub fn default_mode() -> Self {
        Self {
            top_ratio: 0.66,
            bottom_ratio: 1.0,
            width_ratio: 0.92,
            title_ratio: 0.085,
            subtitle_ratio: 0.055,
            provider_ratio: 0.040,
            min_gap_ratio: 0.015,
            line_gap_ratio: 0.015,
            anchor: TextAnchorStyle::Bottom {
                padding_ratio: 0.08,
            },
            title_color: Rgb8::WHITE,
            title_alpha: 255,
            provider_color: Rgb8::WHITE,
            provider_alpha: 255,
            shadow: Some(ShadowStyle {
                dx: 2,
                dy: 2,
                alpha: 160,
            }),
        }
    }

    fn validate(&self, name: &str) -> CardResult<()> {
        let ok = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
        if !(ok(self.top_ratio) && ok(self.bottom_ratio) && self.top_ratio < self.bottom_ratio) {
            return Err(CardError::config(format!(
                "style.{name}: need 0 <= top_ratio < bottom_ratio <= 1"
            )));
        }
        if !(ok(self.width_ratio) && self.width_ratio > 0.0) {
            return Err(CardError::config(format!(
                "style.{name}.width_ratio must be within (0, 1]"
            )));
        }
        for (field, v) in [
            ("title_ratio", self.title_ratio),
            ("subtitle_ratio", self.subtitle_ratio),
            ("provider_ratio", self.provider_ratio),
            ("min_gap_ratio", self.min_gap_ratio),
            ("line_gap_ratio", self.line_gap_ratio),
        ] {
            if !ok(v) {
                return Err(CardError::config(format!(
                    "style.{name}.{field} must be within [0, 1] (got {v})"
                )));
            }
        }
        Ok(())
    }
}

impl Default for TextBoxStyle {
    fn default() -> Self {
        Self::default_mode()
    }
}

/// Upper bound on [`FitStyle::max_iterations`].
pub const MAX_FIT_ITERATIONS: u32 = 10;

/// Accepted range of [`FitStyle::damping`].
pub const FIT_DAMPING_RANGE: std::ops::RangeInclusive<f64> = 0.85..=0.95;

/// Text fitter loop limits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FitStyle {
    /// Hard cap on shrink iterations, at most [`MAX_FIT_ITERATIONS`].
    pub max_iterations: u32,
    /// Extra factor applied on every shrink step, within [`FIT_DAMPING_RANGE`].
    pub damping: f64,
    /// Smallest title ratio the fitter will go to.
    pub title_floor: f64,
    /// Smallest subtitle ratio the fitter will go to.
    pub subtitle_floor: f64,
    /// Smallest provider ratio the fitter will go to.
    pub provider_floor: f64,
}

impl Default for FitStyle {
    fn default() -> Self {
        Self {
            max_iterations: MAX_FIT_ITERATIONS,
            damping: 0.95,
            title_floor: 0.06,
            subtitle_floor: 0.04,
            provider_floor: 0.03,
        }
    }
}

/// Bounds for a title image standing in for title text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TitleImageStyle {
    /// Maximum width as a fraction of canvas width.
    pub max_width_ratio: f64,
    /// Maximum height as a fraction of canvas height.
    pub max_height_ratio: f64,
}

impl Default for TitleImageStyle {
    fn default() -> Self {
        Self {
            max_width_ratio: 0.7,
            max_height_ratio: 0.22,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/style.rs"]
mod tests;
