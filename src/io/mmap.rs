use std::{fs::File, ops::Range, path::Path, sync::Arc};

use memmap2::Mmap;

use crate::{source::GenotypeSource, GenotypeWindow, MatrixHeader, ReaderConfig};

use super::plan_window;

/// Memory-mapped genotype matrix reader.
///
/// Windows are decoded straight out of the map, so reads take `&self`.
/// Clones share the same map and may be handed to separate threads; each
/// call is self-contained.
#[derive(Clone)]
pub struct MmapReader {
    map: Arc<Mmap>,
    /// Header
    header: MatrixHeader,
    config: ReaderConfig,
}
impl MmapReader {
    pub fn new<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        Self::with_config(path, ReaderConfig::default())
    }

    pub fn with_config<P: AsRef<Path>>(path: P, config: ReaderConfig) -> crate::Result<Self> {
        let path = path.as_ref();
        log::debug!("Mapping genotype matrix {}", path.display());
        let file = File::open(path)?;
        let map = unsafe { Arc::new(Mmap::map(&file)?) };

        // parse header
        let header = MatrixHeader::from_bytes(&map, map.len() as u64)?;
        super::warn_if_short(&header, config.layout);

        Ok(Self {
            map,
            header,
            config,
        })
    }

    pub fn header(&self) -> MatrixHeader {
        self.header
    }

    pub fn config(&self) -> ReaderConfig {
        self.config
    }

    /// Reads the half-open window `variants × samples` out of the map.
    pub fn read_window(&self, variants: Range<u32>, samples: Range<u32>) -> crate::Result<GenotypeWindow> {
        let spans = plan_window(&self.header, self.config.layout, &variants, &samples)?;
        let mut window = GenotypeWindow::zeroed(variants, samples.clone());
        for span in &spans {
            let bytes = &self.map[span.offset as usize..span.end() as usize];
            self.config
                .layout
                .decode(&self.header, span, bytes, &samples, &mut window);
        }
        Ok(window)
    }
}

impl GenotypeSource for MmapReader {
    fn header(&self) -> MatrixHeader {
        self.header
    }

    fn read_window(&mut self, variants: Range<u32>, samples: Range<u32>) -> crate::Result<GenotypeWindow> {
        MmapReader::read_window(self, variants, samples)
    }
}
