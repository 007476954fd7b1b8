//! Error types for the shaping pipeline.

use thiserror::Error;

/// Errors that can occur while loading or parsing a font.
///
/// Cloneable so a failed load can be cached and handed back to every
/// concurrent requester of the same font.
#[derive(Debug, Clone, Error)]
pub enum FontError {
    /// Font file could not be read.
    #[error("font I/O error: {0}")]
    Io(String),

    /// Font bytes are not a parseable TTF/OTF program.
    #[error("invalid font data")]
    InvalidFont,
}

impl From<std::io::Error> for FontError {
    fn from(err: std::io::Error) -> Self {
        FontError::Io(err.to_string())
    }
}

/// Errors surfaced by a render request.
///
/// Everything else (unmatched glyphs, unexpected codepoints) degrades to a
/// best-effort `Other` unit instead of failing the word.
#[derive(Debug, Clone, Error)]
pub enum ShapeError {
    /// Font bytes missing or unparseable. Fatal for the request.
    #[error("font unavailable: {0}")]
    FontUnavailable(#[from] FontError),

    /// The shaping engine failed to initialize or shape. Fatal for the
    /// request; no partial glyph list is emitted.
    #[error("shaping unavailable: {0}")]
    ShapingUnavailable(String),
}

/// Convenient result alias for render operations.
pub type Result<T> = std::result::Result<T, ShapeError>;
