use std::{
    fs::File,
    ops::Range,
    path::{Path, PathBuf},
};

use crate::{
    GenotypeWindow, MatrixHeader, MetadataConfig, MetadataFile, Reader, ReaderConfig, Result,
};

/// A genotype matrix together with its variant and sample metadata.
///
/// All three files are opened on construction and released together when the
/// fileset is dropped. Every range is bounded by the counts in the matrix
/// header.
///
/// # Examples
///
/// ```rust,no_run
/// use pgenview::Fileset;
///
/// # fn main() -> pgenview::Result<()> {
/// let mut fileset = Fileset::from_prefix("plink2")?;
/// let header = fileset.header();
/// println!("Variant count {}", header.variant_count);
/// println!("Sample count {}", header.sample_count);
///
/// let window = fileset.read_genotypes(0..2, 0..2)?;
/// let variants = fileset.variant_ids(0..2)?;
/// let samples = fileset.sample_ids(0..2)?;
/// # Ok(())
/// # }
/// ```
pub struct Fileset {
    genotypes: Reader<File>,
    variants: MetadataFile,
    samples: MetadataFile,
}
impl Fileset {
    /// Opens the three files with default configurations.
    pub fn open<P, Q, S>(pgen: P, pvar: Q, psam: S) -> Result<Self>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
        S: AsRef<Path>,
    {
        Self::with_config(
            pgen,
            pvar,
            psam,
            ReaderConfig::default(),
            MetadataConfig::variants(),
            MetadataConfig::samples(),
        )
    }

    /// Opens `{prefix}.pgen`, `{prefix}.pvar` and `{prefix}.psam`.
    pub fn from_prefix<P: AsRef<Path>>(prefix: P) -> Result<Self> {
        Self::from_prefix_with_config(
            prefix,
            ReaderConfig::default(),
            MetadataConfig::variants(),
            MetadataConfig::samples(),
        )
    }

    /// Opens the files sharing `prefix` with explicit configurations.
    pub fn from_prefix_with_config<P: AsRef<Path>>(
        prefix: P,
        reader_config: ReaderConfig,
        variant_config: MetadataConfig,
        sample_config: MetadataConfig,
    ) -> Result<Self> {
        let prefix = prefix.as_ref();
        Self::with_config(
            with_suffix(prefix, "pgen"),
            with_suffix(prefix, "pvar"),
            with_suffix(prefix, "psam"),
            reader_config,
            variant_config,
            sample_config,
        )
    }

    pub fn with_config<P, Q, S>(
        pgen: P,
        pvar: Q,
        psam: S,
        reader_config: ReaderConfig,
        variant_config: MetadataConfig,
        sample_config: MetadataConfig,
    ) -> Result<Self>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
        S: AsRef<Path>,
    {
        let genotypes = Reader::from_path_with_config(pgen, reader_config)?;
        let header = genotypes.header();
        let variants = MetadataFile::open(pvar, variant_config, header.variant_count)?;
        let samples = MetadataFile::open(psam, sample_config, header.sample_count)?;
        Ok(Self {
            genotypes,
            variants,
            samples,
        })
    }

    pub fn header(&self) -> MatrixHeader {
        self.genotypes.header()
    }

    pub fn read_genotypes(&mut self, variants: Range<u32>, samples: Range<u32>) -> Result<GenotypeWindow> {
        self.genotypes.read_window(variants, samples)
    }

    pub fn variant_ids(&mut self, variants: Range<u32>) -> Result<Vec<String>> {
        self.variants.read_field_range(variants)
    }

    pub fn sample_ids(&mut self, samples: Range<u32>) -> Result<Vec<String>> {
        self.samples.read_field_range(samples)
    }

    pub fn genotype_reader(&mut self) -> &mut Reader<File> {
        &mut self.genotypes
    }
}

fn with_suffix(prefix: &Path, suffix: &str) -> PathBuf {
    let mut path = prefix.as_os_str().to_owned();
    path.push(".");
    path.push(suffix);
    PathBuf::from(path)
}
