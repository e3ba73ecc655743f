//! Error types for file I/O.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for I/O operations.
pub type IoResult<T> = Result<T, IoError>;

/// Errors raised while reading FITS files or writing STL files.
#[derive(Debug, Error)]
pub enum IoError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was not found.
        path: PathBuf,
    },

    /// The file does not start with a valid FITS primary header.
    #[error("not a FITS file: {message}")]
    NotFits {
        /// What was wrong with the signature.
        message: String,
    },

    /// A mandatory header card is missing or malformed.
    #[error("bad FITS header card {keyword}: {message}")]
    BadCard {
        /// The card keyword.
        keyword: String,
        /// What was wrong with it.
        message: String,
    },

    /// The requested HDU does not exist in the file.
    #[error("HDU {requested} out of range: file has {available} HDU(s)")]
    HduOutOfRange {
        /// The 0-based HDU index asked for.
        requested: usize,
        /// How many HDUs the file actually contains.
        available: usize,
    },

    /// The selected HDU holds no 2D image.
    #[error("HDU {hdu} is not a 2D image (NAXIS = {naxis})")]
    NotTwoDimensional {
        /// The 0-based HDU index.
        hdu: usize,
        /// The NAXIS value found.
        naxis: i64,
    },

    /// BITPIX is not one of the values the FITS standard defines.
    #[error("unsupported BITPIX value {0}")]
    UnsupportedBitpix(i64),

    /// The file ended inside a header or data unit.
    #[error("unexpected end of file at byte {position}")]
    UnexpectedEof {
        /// Byte offset where the file ran out.
        position: u64,
    },

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IoError {
    /// Create a `NotFits` error with the given message.
    #[must_use]
    pub fn not_fits(message: impl Into<String>) -> Self {
        Self::NotFits {
            message: message.into(),
        }
    }

    /// Create a `BadCard` error for a keyword.
    #[must_use]
    pub fn bad_card(keyword: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BadCard {
            keyword: keyword.into(),
            message: message.into(),
        }
    }
}
