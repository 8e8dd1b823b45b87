/// Convenience result type used across thumbcard.
pub type CardResult<T> = Result<T, CardError>;

/// Top-level error taxonomy for a single card render.
///
/// Every failure is scoped to one render call: the canvas is owned by the call, so an error never
/// leaves a partially written image behind.
#[derive(thiserror::Error, Debug)]
pub enum CardError {
    /// A required asset is absent (no background, or zero character images).
    #[error("missing asset: {0}")]
    MissingRequiredAsset(String),

    /// The requested layout cannot be built from the supplied assets or parameters.
    #[error("invalid layout: {0}")]
    InvalidLayoutConfiguration(String),

    /// A requested font could not be opened or registered.
    #[error("font load error: {0}")]
    FontLoad(String),

    /// Unexpected geometry or draw failure (for example a zero-height source image).
    #[error("processing error: {0}")]
    Processing(String),

    /// Card parameters failed to parse or validate.
    #[error("config error: {0}")]
    Config(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CardError {
    /// Build a [`CardError::MissingRequiredAsset`] value.
    pub fn missing_asset(msg: impl Into<String>) -> Self {
        Self::MissingRequiredAsset(msg.into())
    }

    /// Build a [`CardError::InvalidLayoutConfiguration`] value.
    pub fn invalid_layout(msg: impl Into<String>) -> Self {
        Self::InvalidLayoutConfiguration(msg.into())
    }

    /// Build a [`CardError::FontLoad`] value.
    pub fn font_load(msg: impl Into<String>) -> Self {
        Self::FontLoad(msg.into())
    }

    /// Build a [`CardError::Processing`] value.
    pub fn processing(msg: impl Into<String>) -> Self {
        Self::Processing(msg.into())
    }

    /// Build a [`CardError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
