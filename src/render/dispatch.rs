use crate::foundation::error::{CardError, CardResult};
use crate::scene::params::LayoutMode;

/// Most characters any layout can place.
pub const MAX_CHARACTERS: usize = 3;

/// Concrete character arrangement chosen for one render.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayoutPlan {
    /// Crypto: the first character, enlarged, with a halo.
    Single,
    /// Default mode with one or two characters.
    SideBySide {
        /// Characters placed (1 or 2).
        count: usize,
    },
    /// Default mode with three characters.
    Pyramid,
    /// Dual: the first two characters around a title banner.
    Dual,
}

impl LayoutPlan {
    /// Number of leading character assets the plan consumes.
    pub fn characters_used(self) -> usize {
        match self {
            Self::Single => 1,
            Self::SideBySide { count } => count,
            Self::Pyramid => 3,
            Self::Dual => 2,
        }
    }
}

/// Pick the layout for `mode` and the number of supplied characters.
///
/// Crypto ignores characters beyond the first. Dual needs two characters and a title image.
pub fn select_layout(
    mode: LayoutMode,
    character_count: usize,
    has_title_image: bool,
) -> CardResult<LayoutPlan> {
    if character_count == 0 {
        return Err(CardError::missing_asset(
            "at least one character image is required",
        ));
    }
    if character_count > MAX_CHARACTERS {
        return Err(CardError::invalid_layout(format!(
            "at most {MAX_CHARACTERS} character images are supported (got {character_count})"
        )));
    }
    match mode {
        LayoutMode::Crypto => Ok(LayoutPlan::Single),
        LayoutMode::Default if character_count == 3 => Ok(LayoutPlan::Pyramid),
        LayoutMode::Default => Ok(LayoutPlan::SideBySide {
            count: character_count,
        }),
        LayoutMode::Dual => {
            if character_count < 2 {
                return Err(CardError::invalid_layout(
                    "dual mode needs two character images",
                ));
            }
            if !has_title_image {
                return Err(CardError::invalid_layout("dual mode needs a title image"));
            }
            Ok(LayoutPlan::Dual)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/dispatch.rs"]
mod tests;
