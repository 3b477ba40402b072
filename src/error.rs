//! Error handling for the pgenview library.
//!
//! This module defines all error types that can occur while opening a genotype
//! matrix, reading windows out of it, or extracting identifiers from the
//! accompanying metadata files.

use std::fmt;

use thiserror::Error;

/// A specialized `Result` type for pgenview operations.
///
/// It's equivalent to `std::result::Result<T, PgenError>`.
///
/// # Examples
///
/// ```rust
/// use pgenview::{MatrixHeader, Result};
/// use std::io::Cursor;
///
/// fn dimensions(bytes: Vec<u8>) -> Result<(u32, u32)> {
///     let header = MatrixHeader::read_from(&mut Cursor::new(bytes))?;
///     Ok((header.variant_count, header.sample_count))
/// }
///
/// let bytes = vec![0x6C, 0x1B, 0x10, 4, 0, 0, 0, 3, 0, 0, 0];
/// assert_eq!(dimensions(bytes).unwrap(), (4, 3));
/// ```
pub type Result<T> = std::result::Result<T, PgenError>;

/// Coordinate axis a range refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Variant (row) axis of the genotype matrix
    Variant,
    /// Sample (column) axis of the genotype matrix
    Sample,
    /// Record axis of a metadata file
    Record,
}
impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Variant => f.write_str("variant"),
            Axis::Sample => f.write_str("sample"),
            Axis::Record => f.write_str("record"),
        }
    }
}

/// Broad class of a [`PgenError`].
///
/// Callers that only care about *why* a call failed (bad input file, bad
/// request, or failing storage) can match on this instead of every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The file content does not follow the expected layout
    Format,
    /// The header declares a storage mode this reader does not decode
    UnsupportedMode,
    /// The requested coordinates fall outside the declared dimensions
    Range,
    /// The underlying storage failed or ended early
    Io,
}

/// Error types for pgenview operations.
///
/// Every error is terminal to the call that raised it. No variant is ever
/// returned alongside a partial result.
///
/// # Examples
///
/// ```rust
/// use pgenview::{ErrorKind, MatrixHeader, PgenError};
/// use std::io::Cursor;
///
/// let bytes = vec![0x00, 0x1B, 0x10, 4, 0, 0, 0, 3, 0, 0, 0];
/// match MatrixHeader::read_from(&mut Cursor::new(bytes)) {
///     Err(e @ PgenError::InvalidMagic { .. }) => assert_eq!(e.kind(), ErrorKind::Format),
///     Err(e) => panic!("unexpected error: {e}"),
///     Ok(_) => unreachable!(),
/// }
/// ```
#[derive(Error, Debug)]
pub enum PgenError {
    /// I/O error from the underlying file or stream.
    ///
    /// This covers failed opens, failed seeks and reads that end early.
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    /// Compression detection error from niffler.
    ///
    /// Raised while sniffing or opening a compressed metadata file.
    #[cfg(feature = "niffler")]
    #[error("Niffler error")]
    Niffler(#[from] niffler::Error),

    /// The file does not start with the genotype matrix signature.
    #[error("Invalid magic bytes, expected ({expected:02x?}), found ({actual:02x?})")]
    InvalidMagic { expected: [u8; 2], actual: [u8; 2] },

    /// The header's storage mode byte is not the packed 2-bit mode.
    #[error("Unsupported storage mode ({0:#04x})")]
    UnsupportedMode(u8),

    /// A requested half-open range is empty or extends past the declared count.
    #[error("Invalid {axis} range [{start}, {end}) - must be non-empty and end at most {max}")]
    InvalidRange {
        axis: Axis,
        start: u32,
        end: u32,
        max: u32,
    },

    /// A chunk planner was given a zero chunk size.
    #[error("Invalid chunk size - must be greater than zero")]
    InvalidChunkSize,

    /// The genotype bytes for a request extend past the end of the file.
    #[error("Truncated matrix: {needed} bytes needed at offset {offset}, only {available} available")]
    TruncatedMatrix {
        offset: u64,
        needed: u64,
        available: u64,
    },

    /// The metadata file holds fewer records than a request needs.
    #[error("Missing records: {requested} requested, file holds {available}")]
    MissingRecords { requested: u32, available: u32 },

    /// A metadata line lacks the delimiter(s) needed to reach the field.
    #[error("Missing field {field} on line {line}")]
    MissingField { line: u64, field: usize },

    /// A metadata field is not valid UTF-8.
    #[error("Field {field} on line {line} is not valid UTF-8")]
    InvalidUtf8 { line: u64, field: usize },
}
impl PgenError {
    /// Returns the broad class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PgenError::InvalidMagic { .. }
            | PgenError::MissingField { .. }
            | PgenError::InvalidUtf8 { .. } => ErrorKind::Format,
            PgenError::UnsupportedMode(_) => ErrorKind::UnsupportedMode,
            PgenError::InvalidRange { .. } | PgenError::InvalidChunkSize => ErrorKind::Range,
            PgenError::Io(_)
            | PgenError::TruncatedMatrix { .. }
            | PgenError::MissingRecords { .. } => ErrorKind::Io,
            #[cfg(feature = "niffler")]
            PgenError::Niffler(_) => ErrorKind::Io,
        }
    }
}

/// Checks a half-open range against a declared count.
pub(crate) fn check_range(axis: Axis, range: &std::ops::Range<u32>, max: u32) -> Result<()> {
    if range.start >= range.end || range.end > max {
        return Err(PgenError::InvalidRange {
            axis,
            start: range.start,
            end: range.end,
            max,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    #[test]
    fn test_error_display_messages() {
        let err = PgenError::InvalidMagic {
            expected: [0x6c, 0x1b],
            actual: [0x00, 0xff],
        };
        let display = format!("{}", err);
        assert!(display.contains("6c"));
        assert!(display.contains("ff"));

        let err = PgenError::UnsupportedMode(0x02);
        assert!(format!("{}", err).contains("0x02"));

        let err = PgenError::InvalidRange {
            axis: Axis::Sample,
            start: 2,
            end: 9,
            max: 8,
        };
        let display = format!("{}", err);
        assert!(display.contains("sample"));
        assert!(display.contains("[2, 9)"));
        assert!(display.contains("8"));

        let err = PgenError::TruncatedMatrix {
            offset: 11,
            needed: 40,
            available: 12,
        };
        let display = format!("{}", err);
        assert!(display.contains("40"));
        assert!(display.contains("12"));

        let err = PgenError::MissingField { line: 7, field: 1 };
        let display = format!("{}", err);
        assert!(display.contains("field 1"));
        assert!(display.contains("line 7"));

        let err = PgenError::InvalidUtf8 { line: 4, field: 1 };
        let display = format!("{}", err);
        assert!(display.contains("UTF-8"));
        assert!(display.contains("line 4"));
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            PgenError::InvalidMagic {
                expected: [0x6c, 0x1b],
                actual: [0, 0]
            }
            .kind(),
            ErrorKind::Format
        );
        assert_eq!(
            PgenError::MissingField { line: 2, field: 1 }.kind(),
            ErrorKind::Format
        );
        assert_eq!(
            PgenError::InvalidUtf8 { line: 2, field: 1 }.kind(),
            ErrorKind::Format
        );
        assert_eq!(
            PgenError::UnsupportedMode(0).kind(),
            ErrorKind::UnsupportedMode
        );
        assert_eq!(PgenError::InvalidChunkSize.kind(), ErrorKind::Range);
        assert_eq!(
            PgenError::MissingRecords {
                requested: 4,
                available: 2
            }
            .kind(),
            ErrorKind::Io
        );
        let io_err = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        assert_eq!(PgenError::from(io_err).kind(), ErrorKind::Io);
    }

    #[test]
    fn test_check_range() {
        assert!(check_range(Axis::Variant, &(0..4), 4).is_ok());
        assert!(check_range(Axis::Variant, &(3..4), 4).is_ok());
        assert!(matches!(
            check_range(Axis::Variant, &(0..5), 4),
            Err(PgenError::InvalidRange { end: 5, max: 4, .. })
        ));
        assert!(check_range(Axis::Sample, &(2..2), 4).is_err());
        #[allow(clippy::reversed_empty_ranges)]
        let reversed = 3..1;
        assert!(check_range(Axis::Sample, &reversed, 4).is_err());
    }

    #[test]
    fn test_error_source_chain() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Access denied");
        let err = PgenError::Io(io_err);

        let source = err.source();
        assert!(source.is_some());
        if let Some(source) = source {
            let io_source = source.downcast_ref::<std::io::Error>();
            assert_eq!(
                io_source.map(|e| e.kind()),
                Some(std::io::ErrorKind::PermissionDenied)
            );
        }
    }

    #[test]
    fn test_error_send_sync() {
        fn is_send<T: Send>() {}
        fn is_sync<T: Sync>() {}

        is_send::<PgenError>();
        is_sync::<PgenError>();
    }
}
