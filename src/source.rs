use std::ops::Range;

use crate::{GenotypeWindow, MatrixHeader, Result};

/// Trait for readers that serve rectangular windows of a genotype matrix.
///
/// Every call is self-contained: implementors locate the bytes for the
/// request from scratch and never rely on a cursor left by a previous call.
pub trait GenotypeSource {
    /// Validated header of the underlying matrix
    fn header(&self) -> MatrixHeader;

    /// Reads the half-open window `variants × samples`.
    ///
    /// The result has `samples.len()` rows of `variants.len()` values each.
    fn read_window(&mut self, variants: Range<u32>, samples: Range<u32>) -> Result<GenotypeWindow>;

    /// Reads every sample of a single variant
    fn read_variant(&mut self, variant: u32) -> Result<GenotypeWindow> {
        let samples = 0..self.header().sample_count;
        self.read_window(variant..variant.saturating_add(1), samples)
    }

    /// Reads the full matrix
    fn read_all(&mut self) -> Result<GenotypeWindow> {
        let header = self.header();
        self.read_window(0..header.variant_count, 0..header.sample_count)
    }
}
