use std::ops::Range;

use crate::{GenotypeValue, GenotypeWindow, MatrixHeader};

/// Byte layout of the genotype cells following the header.
///
/// Cells are always ordered variant-major, sample-minor, so cell `(v, s)` has
/// element index `e = v * sample_count + s`. The layout decides how an element
/// index maps onto bytes, and the same mapping is used for addressing and for
/// decoding.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Layout {
    /// One byte per cell at `data_offset + e`, low two bits significant
    #[default]
    BytePerGenotype,
    /// Four cells per byte at `data_offset + e / 4`, bit offset `2 * (e % 4)`,
    /// no padding between variants
    Packed2Bit,
}

/// A contiguous run of bytes holding every requested cell of `variants`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Span {
    pub(crate) variants: Range<u32>,
    /// Absolute file offset of the first byte
    pub(crate) offset: u64,
    pub(crate) len: usize,
    /// Element index of the first requested cell
    first_element: u64,
}
impl Span {
    pub(crate) fn end(&self) -> u64 {
        self.offset + self.len as u64
    }
}

impl Layout {
    #[inline]
    fn byte_of(self, element: u64) -> u64 {
        match self {
            Layout::BytePerGenotype => element,
            Layout::Packed2Bit => element / 4,
        }
    }

    /// Bytes needed after the header to hold the full matrix
    pub fn matrix_len(self, header: &MatrixHeader) -> u64 {
        match self {
            Layout::BytePerGenotype => header.cell_count(),
            Layout::Packed2Bit => header.cell_count().div_ceil(4),
        }
    }

    /// Plans the reads needed for a window.
    ///
    /// A window spanning every sample is one contiguous run, otherwise each
    /// variant gets its own span. Ranges must already be validated.
    pub(crate) fn plan(self, header: &MatrixHeader, variants: &Range<u32>, samples: &Range<u32>) -> Vec<Span> {
        let n = header.sample_count as u64;
        let span_of = |rows: Range<u32>| {
            let first = rows.start as u64 * n + samples.start as u64;
            let last = (rows.end as u64 - 1) * n + samples.end as u64 - 1;
            let first_byte = self.byte_of(first);
            Span {
                variants: rows,
                offset: header.data_offset + first_byte,
                len: (self.byte_of(last) - first_byte + 1) as usize,
                first_element: first,
            }
        };
        if samples.start == 0 && samples.end == header.sample_count {
            vec![span_of(variants.clone())]
        } else {
            variants.clone().map(|v| span_of(v..v + 1)).collect()
        }
    }

    /// Decodes the cells of `span` that fall inside `samples` into `window`.
    ///
    /// `bytes` must hold exactly the span's bytes.
    pub(crate) fn decode(
        self,
        header: &MatrixHeader,
        span: &Span,
        bytes: &[u8],
        samples: &Range<u32>,
        window: &mut GenotypeWindow,
    ) {
        let n = header.sample_count as u64;
        let base_byte = self.byte_of(span.first_element);
        let window_start = window.variants().start;
        for v in span.variants.clone() {
            let vi = (v - window_start) as usize;
            let row = v as u64 * n;
            for s in samples.clone() {
                let element = row + s as u64;
                let byte = bytes[(self.byte_of(element) - base_byte) as usize];
                let code = match self {
                    Layout::BytePerGenotype => byte,
                    Layout::Packed2Bit => byte >> ((element % 4) * 2),
                };
                window.set(
                    (s - samples.start) as usize,
                    vi,
                    GenotypeValue::from_code(code),
                );
            }
        }
    }
}
