//! # pgenview - Windowed Access to Binary Genotype Matrices
//!
//! `pgenview` is a Rust library for random-access reads over a variant × sample
//! genotype matrix stored in a compact binary file, paired with the two
//! tab-delimited metadata files that name its variants and samples. Only the
//! bytes a request touches are read, so matrices far larger than memory can be
//! scanned window by window.
//!
//! ## Format Specification
//!
//! ### Header (11 bytes)
//! - Magic bytes: `0x6C 0x1B`
//! - Storage mode: `0x10` (fixed-width 2-bit calls; nothing else is accepted)
//! - Variant count: little-endian `u32`
//! - Sample count: little-endian `u32`
//!
//! ### Genotype data (from byte 11)
//! Calls are ordered variant-major, sample-minor. Each call is a 2-bit code:
//! `0`, `1` and `2` are allele counts, `3` marks a missing call. How codes map
//! onto bytes is chosen with [`Layout`]:
//! - [`Layout::BytePerGenotype`] (default): one byte per call, low two bits
//!   significant
//! - [`Layout::Packed2Bit`]: four calls per byte, least-significant pair first
//!
//! ### Metadata files
//! Delimited text with one header line and one record per line. Variant files
//! (`.pvar`) carry the identifier in field 1, sample files (`.psam`) in field 0.
//!
//! ## Basic Usage
//!
//! ```rust
//! use pgenview::{GenotypeValue, Reader};
//! use std::io::Cursor;
//!
//! # fn main() -> pgenview::Result<()> {
//! // 4 variants x 3 samples
//! let mut bytes = vec![0x6C, 0x1B, 0x10, 0x04, 0x00, 0x00, 0x00, 0x03, 0x00, 0x00, 0x00];
//! bytes.extend_from_slice(&[0, 1, 2, 3, 0, 1, 2, 3, 0, 1, 2, 3]);
//!
//! let mut reader = Reader::new(Cursor::new(bytes))?;
//! let header = reader.header();
//! assert_eq!((header.variant_count, header.sample_count), (4, 3));
//!
//! // Windows are sample-major: window.get(sample, variant)
//! let window = reader.read_window(0..2, 0..2)?;
//! assert_eq!(window.shape(), (2, 2));
//! assert_eq!(window.get(0, 0), Some(GenotypeValue::Zero));
//! assert_eq!(window.get(0, 1), Some(GenotypeValue::Missing));
//! # Ok(())
//! # }
//! ```
//!
//! ## Working with a Fileset
//!
//! ```rust,no_run
//! use pgenview::{Chunks, Fileset};
//!
//! # fn main() -> pgenview::Result<()> {
//! let mut fileset = Fileset::from_prefix("plink2")?;
//! let header = fileset.header();
//!
//! for (variants, samples) in Chunks::new(&header, 32, 64)? {
//!     let window = fileset.read_genotypes(variants.clone(), samples)?;
//!     let ids = fileset.variant_ids(variants)?;
//!     println!("{} .. {}: {} missing", ids[0], ids[ids.len() - 1], window.missing_count());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Memory-Mapped Reading
//!
//! ```rust,no_run
//! use pgenview::MmapReader;
//!
//! # fn main() -> pgenview::Result<()> {
//! let reader = MmapReader::new("plink2.pgen")?;
//! let shared = reader.clone();
//! let handle = std::thread::spawn(move || shared.read_window(0..10, 0..10));
//! let window = reader.read_window(10..20, 0..10)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All operations return `Result<T, PgenError>`. Errors fall into four classes
//! reported by [`PgenError::kind`]: malformed input, unsupported storage mode,
//! out-of-range request, and I/O failure. Range and truncation checks happen
//! before any byte is read, and no call ever returns a partial result.
//!
//! ```rust
//! use pgenview::{ErrorKind, Reader};
//! use std::io::Cursor;
//!
//! let bytes = vec![0x6C, 0x1B, 0x10, 4, 0, 0, 0, 3, 0, 0, 0];
//! let mut reader = Reader::new(Cursor::new(bytes)).unwrap();
//! let err = reader.read_window(0..5, 0..3).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::Range);
//! ```

mod config;
mod constructs;
mod error;
mod io;
mod source;

pub use config::{MetadataConfig, ReaderConfig};
pub use constructs::{
    Chunks, GenotypeValue, GenotypeWindow, Layout, MatrixHeader, RawHeader, StorageMode,
    HEADER_SIZE, MAGIC, MODE_PACKED_2BIT,
};
pub use error::{Axis, ErrorKind, PgenError, Result};
pub use io::{Fileset, MetadataFile, MmapReader, Reader};
pub use source::GenotypeSource;
