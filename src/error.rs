/// Crate-wide error type.
///
/// Most failures in this game are recoverable and never reach the player:
/// a missing image falls back to the built-in layout, a broken config falls
/// back to defaults. The variants below are what the loaders and the combat
/// state machine report to their callers.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    /// Terminal or file IO.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Image could not be opened or decoded.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Image decoded to zero pixels in one dimension.
    #[error("image has no pixels: {0}")]
    EmptyImage(String),

    /// TOML that does not match the expected schema.
    #[error("toml parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Content file loaded but unusable (e.g. empty prompt pool).
    #[error("invalid content: {0}")]
    Content(String),

    /// Combat input that is not one of the offered options.
    #[error("invalid choice: {0:?}")]
    InvalidChoice(String),

    /// A player turn was attempted while no choice is pending.
    #[error("no combat choice is pending")]
    NotAwaitingChoice,
}

pub type Result<T> = std::result::Result<T, GameError>;
