//! Seek-and-read access to genotype matrix files.
//!
//! This module provides the handle-owning reader, which fetches only the bytes
//! a window needs through `Read + Seek` instead of loading the matrix.

use std::{
    fs::File,
    io::{Read, Seek, SeekFrom},
    ops::Range,
    path::Path,
};

use crate::{source::GenotypeSource, GenotypeWindow, MatrixHeader, ReaderConfig, Result};

use super::plan_window;

/// Windowed reader over any seekable genotype matrix source.
///
/// The `Reader` validates the header once during construction and then serves
/// arbitrary windows. Each call seeks to the bytes it needs before reading, so
/// no cursor position is carried from one call to the next.
///
/// The source is owned exclusively by the reader and released when the reader
/// is dropped. Reads take `&mut self`; to read concurrently, open one reader
/// per thread or use [`MmapReader`](crate::MmapReader).
///
/// # Examples
///
/// ```rust
/// use pgenview::{GenotypeValue, Reader};
/// use std::io::Cursor;
///
/// # fn main() -> pgenview::Result<()> {
/// // 4 variants x 3 samples, one byte per call
/// let mut bytes = vec![0x6C, 0x1B, 0x10, 4, 0, 0, 0, 3, 0, 0, 0];
/// bytes.extend_from_slice(&[0, 1, 2, 3, 0, 1, 2, 3, 0, 1, 2, 3]);
///
/// let mut reader = Reader::new(Cursor::new(bytes))?;
/// assert_eq!(reader.header().variant_count, 4);
///
/// let window = reader.read_window(0..2, 0..2)?;
/// assert_eq!(window.shape(), (2, 2));
/// assert_eq!(window.get(0, 1), Some(GenotypeValue::Missing));
/// # Ok(())
/// # }
/// ```
pub struct Reader<R: Read + Seek> {
    /// Inner source providing the matrix bytes
    inner: R,

    /// Header validated at construction
    header: MatrixHeader,

    config: ReaderConfig,

    /// Scratch buffer reused across spans
    buffer: Vec<u8>,

    /// Total number of genotype bytes read from the inner source
    bytes_read: u64,
}
impl<R: Read + Seek> Reader<R> {
    /// Creates a reader with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the header cannot be read, carries the wrong magic
    /// bytes, or declares an unsupported storage mode.
    pub fn new(inner: R) -> Result<Self> {
        Self::with_config(inner, ReaderConfig::default())
    }

    /// Creates a reader with an explicit configuration.
    pub fn with_config(mut inner: R, config: ReaderConfig) -> Result<Self> {
        let header = MatrixHeader::read_from(&mut inner)?;
        super::warn_if_short(&header, config.layout);
        Ok(Self {
            inner,
            header,
            config,
            buffer: Vec::new(),
            bytes_read: 0,
        })
    }

    /// Returns a copy of the validated header.
    pub fn header(&self) -> MatrixHeader {
        self.header
    }

    pub fn config(&self) -> ReaderConfig {
        self.config
    }

    /// Total number of genotype bytes read so far
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Reads the half-open window `variants × samples`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - either range is empty or ends past the declared count
    /// - the window's bytes extend past the end of the file
    /// - seeking or reading the underlying source fails
    ///
    /// Range and truncation errors are raised before any byte is read.
    pub fn read_window(&mut self, variants: Range<u32>, samples: Range<u32>) -> Result<GenotypeWindow> {
        let spans = plan_window(&self.header, self.config.layout, &variants, &samples)?;
        log::trace!(
            "Reading window v[{}, {}) s[{}, {}) in {} span(s)",
            variants.start,
            variants.end,
            samples.start,
            samples.end,
            spans.len()
        );

        let mut window = GenotypeWindow::zeroed(variants, samples.clone());
        for span in &spans {
            self.inner.seek(SeekFrom::Start(span.offset))?;
            self.buffer.resize(span.len, 0);
            self.inner.read_exact(&mut self.buffer)?;
            self.bytes_read += span.len as u64;
            self.config
                .layout
                .decode(&self.header, span, &self.buffer, &samples, &mut window);
        }
        Ok(window)
    }

    /// Consumes the reader and returns the inner source.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read + Seek> GenotypeSource for Reader<R> {
    fn header(&self) -> MatrixHeader {
        self.header
    }

    fn read_window(&mut self, variants: Range<u32>, samples: Range<u32>) -> Result<GenotypeWindow> {
        Reader::read_window(self, variants, samples)
    }
}

impl Reader<File> {
    /// Opens a genotype matrix file with the default configuration.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use pgenview::Reader;
    ///
    /// # fn main() -> pgenview::Result<()> {
    /// let mut reader = Reader::from_path("data.pgen")?;
    /// let header = reader.header();
    /// let window = reader.read_window(0..header.variant_count.min(32), 0..header.sample_count.min(64))?;
    /// println!("Missing calls: {}", window.missing_count());
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_path_with_config(path, ReaderConfig::default())
    }

    pub fn from_path_with_config<P: AsRef<Path>>(path: P, config: ReaderConfig) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Opening genotype matrix {}", path.display());
        let file = File::open(path)?;
        Self::with_config(file, config)
    }
}
