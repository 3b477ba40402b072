//! Reader configuration.
//!
//! Both configs are plain values with `Default` and chained setters, so a
//! caller only spells out what differs from the common `.pgen`/`.pvar`/`.psam`
//! conventions.

use crate::Layout;

/// Configuration of a genotype matrix reader.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReaderConfig {
    pub layout: Layout,
}
impl ReaderConfig {
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }
}

/// Configuration of a delimited metadata file.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetadataConfig {
    /// Lines skipped before the first record
    pub header_lines: usize,
    pub delimiter: u8,
    /// Zero-based field holding the identifier
    pub field: usize,
}
impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            header_lines: 1,
            delimiter: b'\t',
            field: 0,
        }
    }
}
impl MetadataConfig {
    /// Variant records carry their identifier in field 1
    pub fn variants() -> Self {
        Self::default().with_field(1)
    }

    /// Sample records carry their identifier in field 0
    pub fn samples() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, field: usize) -> Self {
        self.field = field;
        self
    }

    pub fn with_header_lines(mut self, header_lines: usize) -> Self {
        self.header_lines = header_lines;
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}
