mod fileset;
mod metadata;
mod mmap;
mod reader;

pub use fileset::Fileset;
pub use metadata::MetadataFile;
pub use mmap::MmapReader;
pub use reader::Reader;

use std::ops::Range;

use crate::{constructs::Span, error::check_range, Axis, Layout, MatrixHeader, PgenError};

/// Validates a window request and plans the spans it reads.
///
/// Fails before any I/O when a range is out of bounds or when the last span
/// ends past the end of the file.
pub(crate) fn plan_window(
    header: &MatrixHeader,
    layout: Layout,
    variants: &Range<u32>,
    samples: &Range<u32>,
) -> crate::Result<Vec<Span>> {
    check_range(Axis::Variant, variants, header.variant_count)?;
    check_range(Axis::Sample, samples, header.sample_count)?;

    let spans = layout.plan(header, variants, samples);
    if let Some(span) = spans.iter().find(|span| span.end() > header.file_size) {
        return Err(PgenError::TruncatedMatrix {
            offset: span.offset,
            needed: span.len as u64,
            available: header.file_size.saturating_sub(span.offset),
        });
    }
    Ok(spans)
}

pub(crate) fn warn_if_short(header: &MatrixHeader, layout: Layout) {
    let expected = layout.matrix_len(header);
    if header.data_len() < expected {
        log::warn!(
            "Genotype data holds {} bytes but the header declares {} ({} variants x {} samples); \
            windows touching the missing tail will fail",
            header.data_len(),
            expected,
            header.variant_count,
            header.sample_count
        );
    }
}
