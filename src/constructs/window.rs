use std::ops::Range;

use crate::{GenotypeValue, MatrixHeader, PgenError};

/// Dense block of genotype calls for a variant range × sample range.
///
/// Values are stored sample-major: row `i` holds every requested variant for
/// sample `samples.start + i`, regardless of the variant-major order used on
/// disk.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenotypeWindow {
    variants: Range<u32>,
    samples: Range<u32>,
    values: Vec<GenotypeValue>,
}
impl GenotypeWindow {
    pub(crate) fn zeroed(variants: Range<u32>, samples: Range<u32>) -> Self {
        let len = variants.len() * samples.len();
        Self {
            variants,
            samples,
            values: vec![GenotypeValue::default(); len],
        }
    }

    #[inline]
    pub(crate) fn set(&mut self, sample: usize, variant: usize, value: GenotypeValue) {
        let width = self.n_variants();
        self.values[sample * width + variant] = value;
    }

    /// Absolute variant range covered by the window
    pub fn variants(&self) -> Range<u32> {
        self.variants.clone()
    }

    /// Absolute sample range covered by the window
    pub fn samples(&self) -> Range<u32> {
        self.samples.clone()
    }

    pub fn n_variants(&self) -> usize {
        self.variants.len()
    }

    pub fn n_samples(&self) -> usize {
        self.samples.len()
    }

    /// `(rows, columns)`, i.e. `(samples, variants)`
    pub fn shape(&self) -> (usize, usize) {
        (self.n_samples(), self.n_variants())
    }

    /// Value at window-relative coordinates, `None` when out of bounds
    pub fn get(&self, sample: usize, variant: usize) -> Option<GenotypeValue> {
        if sample >= self.n_samples() || variant >= self.n_variants() {
            return None;
        }
        Some(self.values[sample * self.n_variants() + variant])
    }

    /// All variants of one window-relative sample
    pub fn row(&self, sample: usize) -> Option<&[GenotypeValue]> {
        if sample >= self.n_samples() {
            return None;
        }
        let width = self.n_variants();
        Some(&self.values[sample * width..(sample + 1) * width])
    }

    pub fn rows(&self) -> impl Iterator<Item = &[GenotypeValue]> {
        self.values.chunks_exact(self.n_variants().max(1))
    }

    /// Flat sample-major view of the values
    pub fn as_slice(&self) -> &[GenotypeValue] {
        &self.values
    }

    pub fn into_values(self) -> Vec<GenotypeValue> {
        self.values
    }

    /// Nested integer form with `-1` for missing calls
    pub fn to_nested(&self) -> Vec<Vec<i8>> {
        self.rows()
            .map(|row| row.iter().map(|v| v.as_i8()).collect())
            .collect()
    }

    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_missing()).count()
    }
}

/// Tiles a whole matrix into windows of at most `variant_chunk × sample_chunk`.
///
/// Tiles are yielded variant-outer, sample-inner. The last tile along each
/// axis is clipped to the declared count, so every cell is covered once.
#[derive(Clone, Debug)]
pub struct Chunks {
    variant_count: u32,
    sample_count: u32,
    variant_chunk: u32,
    sample_chunk: u32,
    variant_start: u32,
    sample_start: u32,
}
impl Chunks {
    pub fn new(header: &MatrixHeader, variant_chunk: u32, sample_chunk: u32) -> crate::Result<Self> {
        if variant_chunk == 0 || sample_chunk == 0 {
            return Err(PgenError::InvalidChunkSize);
        }
        Ok(Self {
            variant_count: header.variant_count,
            sample_count: header.sample_count,
            variant_chunk,
            sample_chunk,
            variant_start: 0,
            sample_start: 0,
        })
    }

    /// Number of tiles the planner yields in total
    pub fn n_chunks(&self) -> usize {
        let along = |count: u32, chunk: u32| count.div_ceil(chunk) as usize;
        along(self.variant_count, self.variant_chunk) * along(self.sample_count, self.sample_chunk)
    }
}
impl Iterator for Chunks {
    type Item = (Range<u32>, Range<u32>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.sample_count == 0 || self.variant_start >= self.variant_count {
            return None;
        }
        let variant_end = self
            .variant_start
            .saturating_add(self.variant_chunk)
            .min(self.variant_count);
        let sample_end = self
            .sample_start
            .saturating_add(self.sample_chunk)
            .min(self.sample_count);
        let item = (self.variant_start..variant_end, self.sample_start..sample_end);

        if sample_end == self.sample_count {
            self.sample_start = 0;
            self.variant_start = variant_end;
        } else {
            self.sample_start = sample_end;
        }
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StorageMode;

    fn header(variants: u32, samples: u32) -> MatrixHeader {
        MatrixHeader {
            storage_mode: StorageMode::Packed2Bit,
            variant_count: variants,
            sample_count: samples,
            data_offset: 11,
            file_size: 11 + variants as u64 * samples as u64,
        }
    }

    #[test]
    fn test_window_accessors() {
        let mut window = GenotypeWindow::zeroed(2..5, 10..12);
        assert_eq!(window.shape(), (2, 3));
        window.set(1, 2, GenotypeValue::Missing);
        window.set(0, 1, GenotypeValue::Two);

        assert_eq!(window.get(1, 2), Some(GenotypeValue::Missing));
        assert_eq!(window.get(0, 1), Some(GenotypeValue::Two));
        assert_eq!(window.get(2, 0), None);
        assert_eq!(window.get(0, 3), None);
        assert_eq!(
            window.row(0),
            Some(&[GenotypeValue::Zero, GenotypeValue::Two, GenotypeValue::Zero][..])
        );
        assert_eq!(window.rows().count(), 2);
        assert_eq!(window.to_nested(), vec![vec![0, 2, 0], vec![0, 0, -1]]);
        assert_eq!(window.missing_count(), 1);
        assert_eq!(window.variants(), 2..5);
        assert_eq!(window.samples(), 10..12);
    }

    #[test]
    fn test_chunks_cover_matrix_once() {
        let header = header(70, 130);
        let chunks = Chunks::new(&header, 32, 64).unwrap();
        assert_eq!(chunks.n_chunks(), 9);

        let mut seen = vec![0u8; 70 * 130];
        let mut count = 0;
        for (variants, samples) in chunks {
            assert!(!variants.is_empty() && !samples.is_empty());
            for v in variants.clone() {
                for s in samples.clone() {
                    seen[(v * 130 + s) as usize] += 1;
                }
            }
            count += 1;
        }
        assert_eq!(count, 9);
        assert!(seen.iter().all(|&n| n == 1));
    }

    #[test]
    fn test_chunks_order_and_clipping() {
        let header = header(3, 5);
        let tiles: Vec<_> = Chunks::new(&header, 2, 4).unwrap().collect();
        assert_eq!(
            tiles,
            vec![(0..2, 0..4), (0..2, 4..5), (2..3, 0..4), (2..3, 4..5)]
        );
    }

    #[test]
    fn test_chunks_reject_zero_size() {
        let header = header(3, 5);
        assert!(matches!(
            Chunks::new(&header, 0, 4),
            Err(PgenError::InvalidChunkSize)
        ));
        assert!(Chunks::new(&header, 1, 0).is_err());
    }

    #[test]
    fn test_chunks_empty_matrix() {
        assert_eq!(Chunks::new(&header(0, 5), 2, 2).unwrap().count(), 0);
        assert_eq!(Chunks::new(&header(5, 0), 2, 2).unwrap().count(), 0);
    }
}
