use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by color extraction and palette generation.
#[derive(Error, Debug)]
pub enum Error {
    /// The requested number of colors was zero.
    #[error("number of colors must be at least 1")]
    InvalidColorCount,

    /// The image (or pixel slice) contained no pixels.
    #[error("image contains no pixels")]
    EmptyImage,

    /// Palette generation was given an empty color list.
    #[error("no colors provided")]
    NoColors,

    #[error("unknown palette type: {0}")]
    UnknownPaletteType(String),

    #[error("unknown extraction method: {0}")]
    UnknownExtractionMethod(String),

    #[error("invalid hex color: {0}")]
    InvalidHex(String),

    /// The image file could not be opened or decoded.
    #[error("failed to load image {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl Error {
    /// Whether the error was caused by a bad argument rather than by reading the image.
    pub fn is_invalid_argument(&self) -> bool {
        !matches!(self, Error::Image { .. })
    }
}
