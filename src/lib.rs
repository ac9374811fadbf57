//! Image to ASCII art converter driven by an interactive command session.

pub mod algorithm;
pub mod chunk;
pub mod glyph;
pub mod matcher;
pub mod output;
pub mod session;

pub use algorithm::AsciiArtAlgorithm;
pub use glyph::{Font8x8Renderer, FontdueRenderer, GlyphBitmap, GlyphRenderer};
pub use matcher::CharMatcher;
pub use output::{AsciiOutput, ConsoleOutput, HtmlOutput};
pub use session::{Command, ParseCommandError, Session, SessionConfig};

use thiserror::Error;

/// Rows of output characters, top to bottom.
pub type CharGrid = Vec<Vec<char>>;

#[derive(Error, Debug)]
pub enum AsciiArtError {
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Resolution {resolution} out of bounds [{min}, {max}]")]
    ResolutionOutOfBounds { resolution: u32, min: u32, max: u32 },
    #[error("Character palette is empty")]
    EmptyPalette,
    #[error("Font error: {0}")]
    Font(String),
}

pub type Result<T> = std::result::Result<T, AsciiArtError>;
