//! Error types for sheet parsing, decoding and compositing.
//!
//! Two failure classes are kept apart on purpose: [`ParseError`] covers the
//! description grammar and always aborts, while [`DecodeError`] covers the
//! pixel container and may be degraded to a "render failed" result by callers.

use std::fmt;

use thiserror::Error;

/// What went wrong while parsing a description line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The line has no `=` separator.
    MissingEquals,
    /// The key is not part of the grammar.
    UnknownKey(String),
    /// A header key (`version`, `width`, `height`) appeared after the first state.
    KeyOutsideHeader(String),
    /// A state key appeared before the first `state` line.
    KeyOutsideState(String),
    /// The value is not a valid unsigned integer.
    InvalidInteger { key: String, value: String },
    /// A `delay` entry is not a valid float.
    InvalidFloat { key: String, value: String },
    /// `dirs` must be 1, 4 or 8.
    InvalidDirs(u32),
    /// `frames` must be at least 1.
    ZeroFrames,
    /// `width` or `height` was zero.
    ZeroDimension(String),
    /// A required header field was not set before the first state.
    MissingHeaderField(&'static str),
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::MissingEquals => write!(f, "expected `key = value`"),
            ParseErrorKind::UnknownKey(key) => write!(f, "unknown key '{}'", key),
            ParseErrorKind::KeyOutsideHeader(key) => {
                write!(f, "key '{}' is only valid in the header", key)
            }
            ParseErrorKind::KeyOutsideState(key) => {
                write!(f, "key '{}' is only valid inside a state", key)
            }
            ParseErrorKind::InvalidInteger { key, value } => {
                write!(f, "invalid integer '{}' for key '{}'", value, key)
            }
            ParseErrorKind::InvalidFloat { key, value } => {
                write!(f, "invalid number '{}' for key '{}'", value, key)
            }
            ParseErrorKind::InvalidDirs(dirs) => {
                write!(f, "dirs must be 1, 4 or 8, got {}", dirs)
            }
            ParseErrorKind::ZeroFrames => write!(f, "frames must be at least 1"),
            ParseErrorKind::ZeroDimension(key) => write!(f, "{} must be greater than 0", key),
            ParseErrorKind::MissingHeaderField(key) => {
                write!(f, "missing required header field '{}'", key)
            }
        }
    }
}

/// A fatal error in the sheet description grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    /// 1-based line number within the description text.
    pub line: usize,
    /// The specific failure.
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub(crate) fn new(line: usize, kind: ParseErrorKind) -> Self {
        Self { line, kind }
    }
}

/// Errors from the pixel container or from sprite encoding.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The PNG container could not be read.
    #[error("PNG decoding error: {0}")]
    Png(#[from] png::DecodingError),

    /// The pixel grid could not be decoded.
    #[error("image decoding error: {0}")]
    Image(#[from] image::ImageError),

    /// The container holds no `Description` text chunk.
    #[error("sheet has no Description text chunk")]
    MissingDescription,

    /// The sheet is narrower than a single cell.
    #[error("sheet width {sheet_width} is smaller than cell width {cell_width}")]
    SheetTooNarrow { sheet_width: u32, cell_width: u32 },

    /// The description asks for more cells than the raster holds.
    #[error("cell at column {column}, row {row} lies outside the {width}x{height} sheet")]
    CellOutOfBounds {
        column: u32,
        row: u32,
        width: u32,
        height: u32,
    },

    /// Encoding a sprite failed.
    #[error("sprite encoding error: {0}")]
    Encode(#[from] crate::encode::EncodeError),
}

/// Any failure while turning one sheet into sprites.
#[derive(Debug, Error)]
pub enum SheetError {
    #[error("invalid sheet description: {0}")]
    Parse(#[from] ParseError),

    #[error("failed to render sheet: {0}")]
    Decode(#[from] DecodeError),
}

impl SheetError {
    /// Returns true for container/render failures, which callers may degrade.
    pub fn is_decode(&self) -> bool {
        matches!(self, SheetError::Decode(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display_includes_line() {
        let err = ParseError::new(3, ParseErrorKind::UnknownKey("movement".to_string()));
        assert_eq!(err.to_string(), "line 3: unknown key 'movement'");
    }

    #[test]
    fn test_sheet_error_classification() {
        let parse: SheetError = ParseError::new(1, ParseErrorKind::MissingEquals).into();
        let decode: SheetError = DecodeError::MissingDescription.into();
        assert!(!parse.is_decode());
        assert!(decode.is_decode());
    }
}
