mod genotype;
mod header;
mod layout;
mod window;

pub use genotype::GenotypeValue;
pub use header::{MatrixHeader, RawHeader, StorageMode, HEADER_SIZE, MAGIC, MODE_PACKED_2BIT};
pub use layout::Layout;
pub(crate) use layout::Span;
pub use window::{Chunks, GenotypeWindow};
