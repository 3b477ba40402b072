use std::io::{Read, Seek, SeekFrom};

use bytemuck::{Pod, Zeroable};

use crate::PgenError;

pub const MAGIC: [u8; 2] = [0x6c, 0x1b];
pub const MODE_PACKED_2BIT: u8 = 0x10;
pub const HEADER_SIZE: usize = std::mem::size_of::<RawHeader>();

/// 11-byte on-disk preamble, byte arrays only so it has no padding
#[derive(Copy, Clone, Pod, Zeroable, Debug, PartialEq, Eq, Hash)]
#[repr(C)]
pub struct RawHeader {
    pub magic: [u8; 2],         // 0x6c 0x1b
    pub mode: u8,               // storage mode
    pub variant_count: [u8; 4], // LE u32
    pub sample_count: [u8; 4],  // LE u32
}
impl RawHeader {
    /// Reinterprets the first 11 bytes, `None` if fewer are given
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        bytes.get(..HEADER_SIZE).map(bytemuck::pod_read_unaligned)
    }
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

/// How genotype calls are stored after the header.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StorageMode {
    /// Fixed-width 2-bit calls (mode byte `0x10`)
    Packed2Bit,
    /// Any other mode byte
    Unsupported(u8),
}
impl From<u8> for StorageMode {
    fn from(byte: u8) -> Self {
        match byte {
            MODE_PACKED_2BIT => StorageMode::Packed2Bit,
            other => StorageMode::Unsupported(other),
        }
    }
}

/// Validated header of a genotype matrix file.
///
/// A `MatrixHeader` only exists once the magic bytes and storage mode have
/// been checked, so holding one means the file is decodable.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatrixHeader {
    pub storage_mode: StorageMode,
    pub variant_count: u32,
    pub sample_count: u32,
    /// Offset of the first genotype byte
    pub data_offset: u64,
    /// Total size of the underlying file in bytes
    pub file_size: u64,
}
impl MatrixHeader {
    /// Parses and validates a header from raw bytes.
    ///
    /// Fields are checked in file order: the magic bytes as soon as two bytes
    /// are present, then the mode byte, then the counts. Input that ends
    /// before a field is an I/O error only once every earlier field passed.
    /// `file_size` is the total length of the file the bytes came from.
    pub fn from_bytes(bytes: &[u8], file_size: u64) -> crate::Result<Self> {
        if let Some(&[first, second]) = bytes.get(..2) {
            if [first, second] != MAGIC {
                return Err(PgenError::InvalidMagic {
                    expected: MAGIC,
                    actual: [first, second],
                });
            }
        }
        if let Some(&mode) = bytes.get(2) {
            if let StorageMode::Unsupported(mode) = StorageMode::from(mode) {
                return Err(PgenError::UnsupportedMode(mode));
            }
        }
        let raw = RawHeader::from_bytes(bytes).ok_or_else(|| {
            PgenError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "file is shorter than the genotype matrix header",
            ))
        })?;
        let header = Self {
            storage_mode: StorageMode::Packed2Bit,
            variant_count: u32::from_le_bytes(raw.variant_count),
            sample_count: u32::from_le_bytes(raw.sample_count),
            data_offset: HEADER_SIZE as u64,
            file_size,
        };
        log::debug!(
            "Validated matrix header: {} variants x {} samples, {} bytes",
            header.variant_count,
            header.sample_count,
            header.file_size
        );
        Ok(header)
    }

    /// Reads and validates the header from the start of a seekable source.
    ///
    /// On success the source is left positioned at [`MatrixHeader::data_offset`].
    pub fn read_from<R: Read + Seek>(reader: &mut R) -> crate::Result<Self> {
        reader.seek(SeekFrom::Start(0))?;
        let mut bytes = Vec::with_capacity(HEADER_SIZE);
        reader
            .by_ref()
            .take(HEADER_SIZE as u64)
            .read_to_end(&mut bytes)?;
        let file_size = reader.seek(SeekFrom::End(0))?;
        let header = Self::from_bytes(&bytes, file_size)?;
        reader.seek(SeekFrom::Start(header.data_offset))?;
        Ok(header)
    }

    /// Total number of genotype cells declared by the header
    pub fn cell_count(&self) -> u64 {
        self.variant_count as u64 * self.sample_count as u64
    }

    /// Bytes available after the header
    pub fn data_len(&self) -> u64 {
        self.file_size.saturating_sub(self.data_offset)
    }

    /// Encodes the header back into its 11-byte on-disk form
    pub fn to_raw(&self) -> RawHeader {
        let mode = match self.storage_mode {
            StorageMode::Packed2Bit => MODE_PACKED_2BIT,
            StorageMode::Unsupported(mode) => mode,
        };
        RawHeader {
            magic: MAGIC,
            mode,
            variant_count: self.variant_count.to_le_bytes(),
            sample_count: self.sample_count.to_le_bytes(),
        }
    }
}
