use std::path::Path;
use std::sync::Arc;

use image::RgbaImage;
use smallvec::SmallVec;

use crate::foundation::error::{CardError, CardResult};

/// Font file contents plus a content fingerprint.
///
/// Construction only checks the sfnt/collection signature; glyph-level parsing happens in the text
/// engine, which reports [`CardError::FontLoad`] for fonts it cannot register.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontData {
    bytes: Arc<Vec<u8>>,
    fingerprint: u64,
}

const FONT_SIGNATURES: [&[u8; 4]; 6] = [
    b"\x00\x01\x00\x00",
    b"OTTO",
    b"true",
    b"typ1",
    b"ttcf",
    b"wOFF",
];

impl FontData {
    /// Wrap font bytes (TrueType, OpenType, collection or WOFF).
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> CardResult<Self> {
        let bytes = bytes.into();
        let Some(magic) = bytes.get(..4) else {
            return Err(CardError::font_load("font data is shorter than its signature"));
        };
        if !FONT_SIGNATURES.iter().any(|sig| magic == sig.as_slice()) {
            return Err(CardError::font_load("font data has no known sfnt signature"));
        }
        let fingerprint = xxhash_rust::xxh3::xxh3_64(&bytes);
        Ok(Self {
            bytes: Arc::new(bytes),
            fingerprint,
        })
    }

    /// Read a font file from disk.
    pub fn from_path(path: impl AsRef<Path>) -> CardResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| CardError::font_load(format!("read font '{}': {e}", path.display())))?;
        Self::from_bytes(bytes)
    }

    /// Raw font bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// xxh3 hash of the font bytes.
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }
}

/// Decoded inputs of a single card.
///
/// Images are shared and never mutated; stages that resize or filter work on copies.
#[derive(Clone, Debug)]
pub struct CardAssets {
    /// Background photo of any aspect ratio.
    pub background: Arc<RgbaImage>,
    /// One to three character cutouts, in placement order.
    pub characters: SmallVec<[Arc<RgbaImage>; 3]>,
    /// Title banner or logotype replacing title text.
    pub title_image: Option<Arc<RgbaImage>>,
    /// Provider logo replacing the provider label.
    pub logo: Option<Arc<RgbaImage>>,
    /// Font for title lines.
    pub title_font: Option<FontData>,
    /// Font for the provider label; the title font is used when absent.
    pub provider_font: Option<FontData>,
}

impl CardAssets {
    /// Assets with a background and no characters yet.
    pub fn new(background: impl Into<Arc<RgbaImage>>) -> Self {
        Self {
            background: background.into(),
            characters: SmallVec::new(),
            title_image: None,
            logo: None,
            title_font: None,
            provider_font: None,
        }
    }

    /// Append a character cutout.
    pub fn with_character(mut self, img: impl Into<Arc<RgbaImage>>) -> Self {
        self.characters.push(img.into());
        self
    }

    /// Set the title image.
    pub fn with_title_image(mut self, img: impl Into<Arc<RgbaImage>>) -> Self {
        self.title_image = Some(img.into());
        self
    }

    /// Set the provider logo.
    pub fn with_logo(mut self, img: impl Into<Arc<RgbaImage>>) -> Self {
        self.logo = Some(img.into());
        self
    }

    /// Set the title font.
    pub fn with_title_font(mut self, font: FontData) -> Self {
        self.title_font = Some(font);
        self
    }

    /// Set the provider font.
    pub fn with_provider_font(mut self, font: FontData) -> Self {
        self.provider_font = Some(font);
        self
    }

    /// Provider font, falling back to the title font.
    pub fn effective_provider_font(&self) -> Option<&FontData> {
        self.provider_font.as_ref().or(self.title_font.as_ref())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/assets.rs"]
mod tests;
