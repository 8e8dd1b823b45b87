use crate::foundation::error::{CardError, CardResult};

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct CanvasSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: 440,
            height: 590,
        }
    }
}

impl CanvasSize {
    /// Create a validated canvas size with both dimensions > 0.
    pub fn new(width: u32, height: u32) -> CardResult<Self> {
        if width == 0 || height == 0 {
            return Err(CardError::config("canvas width and height must be > 0"));
        }
        Ok(Self { width, height })
    }

    /// `ratio` of the canvas width in whole pixels (truncated toward zero).
    pub fn frac_w(self, ratio: f64) -> i64 {
        (f64::from(self.width) * ratio) as i64
    }

    /// `ratio` of the canvas height in whole pixels (truncated toward zero).
    pub fn frac_h(self, ratio: f64) -> i64 {
        (f64::from(self.height) * ratio) as i64
    }

    /// Total pixel count.
    pub fn area(self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// Integer top-left offset of an overlay on the canvas.
///
/// Offsets may be negative or lie beyond the canvas; clipping is the compositor's job.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PixelOffset {
    /// Horizontal offset in pixels.
    pub x: i64,
    /// Vertical offset in pixels.
    pub y: i64,
}

impl PixelOffset {
    /// Build an offset from two coordinates.
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Translate this offset by `(dx, dy)`.
    pub const fn shifted(self, dx: i64, dy: i64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Opaque sRGB color with 8-bit channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Build a color from three channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Neutral mid gray.
    pub const NEUTRAL_GRAY: Self = Self::new(128, 128, 128);

    /// Pure white.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Pure black.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Sum of the three channels.
    pub fn brightness_sum(self) -> u32 {
        u32::from(self.r) + u32::from(self.g) + u32::from(self.b)
    }

    /// Population variance of the three channels, a cheap chroma estimate.
    pub fn channel_variance(self) -> f64 {
        let c = [f64::from(self.r), f64::from(self.g), f64::from(self.b)];
        let mean = (c[0] + c[1] + c[2]) / 3.0;
        c.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / 3.0
    }

    /// Straight-alpha RGBA pixel with the given alpha.
    pub fn with_alpha(self, a: u8) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, a])
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
