//! Record-indexed access to delimited metadata files.
//!
//! Variant and sample metadata are line-oriented text with a header. Plain
//! files get a byte-offset index of every record line on open, so a range read
//! seeks straight to its first record. Compressed files cannot be seeked and
//! are scanned from the start on every call instead.

use std::{
    fs::File,
    io::{BufRead, BufReader, Seek, SeekFrom},
    ops::Range,
    path::{Path, PathBuf},
};

use crate::{error::check_range, Axis, MetadataConfig, PgenError, Result};

enum Backing {
    /// Seekable file plus the byte offset of every record line
    Indexed {
        file: BufReader<File>,
        offsets: Vec<u64>,
    },
    /// Compressed file, rescanned per call
    #[cfg(feature = "niffler")]
    Streamed { records: u32 },
}

/// A delimited metadata file addressed by zero-based record index.
///
/// Record `i` is the `i`-th line after the configured number of header
/// lines. Requests are bounded by the count declared by the matrix header,
/// not by the number of lines that happen to be in the file.
///
/// # Examples
///
/// ```rust,no_run
/// use pgenview::{MetadataConfig, MetadataFile};
///
/// # fn main() -> pgenview::Result<()> {
/// let mut pvar = MetadataFile::open("data.pvar", MetadataConfig::variants(), 1000)?;
/// let ids = pvar.read_field_range(10..20)?;
/// assert_eq!(ids.len(), 10);
/// # Ok(())
/// # }
/// ```
pub struct MetadataFile {
    path: PathBuf,
    config: MetadataConfig,
    /// Upper bound for record ranges
    declared: u32,
    backing: Backing,
    /// Reusable line buffer
    line: Vec<u8>,
}
impl MetadataFile {
    /// Opens a metadata file and indexes its records.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read.
    pub fn open<P: AsRef<Path>>(path: P, config: MetadataConfig, declared: u32) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let backing = Self::build_backing(&path, &config)?;
        let meta = Self {
            path,
            config,
            declared,
            backing,
            line: Vec::new(),
        };

        log::debug!(
            "Indexed {} records in {}{}",
            meta.record_count(),
            meta.path.display(),
            if meta.is_compressed() { " (compressed)" } else { "" }
        );
        if meta.record_count() != declared {
            log::warn!(
                "{} holds {} records but the matrix header declares {}",
                meta.path.display(),
                meta.record_count(),
                declared
            );
        }
        Ok(meta)
    }

    #[cfg(feature = "niffler")]
    fn build_backing(path: &Path, config: &MetadataConfig) -> Result<Backing> {
        // sniffing needs the leading magic bytes
        if File::open(path)?.metadata()?.len() >= 5 {
            let (stream, format) = niffler::from_path(path)?;
            if format != niffler::Format::No {
                let mut stream = BufReader::new(stream);
                let mut line = Vec::new();
                skip_lines(&mut stream, &mut line, config.header_lines)?;
                let mut records = 0u32;
                while read_line(&mut stream, &mut line)? > 0 {
                    records = records.saturating_add(1);
                }
                return Ok(Backing::Streamed { records });
            }
        }
        Self::index(path, config)
    }

    #[cfg(not(feature = "niffler"))]
    fn build_backing(path: &Path, config: &MetadataConfig) -> Result<Backing> {
        Self::index(path, config)
    }

    fn index(path: &Path, config: &MetadataConfig) -> Result<Backing> {
        let mut file = File::open(path).map(BufReader::new)?;
        let mut line = Vec::new();
        let mut pos = skip_lines(&mut file, &mut line, config.header_lines)?;
        let mut offsets = Vec::new();
        loop {
            let n = read_line(&mut file, &mut line)?;
            if n == 0 {
                break;
            }
            offsets.push(pos);
            pos += n as u64;
        }
        Ok(Backing::Indexed { file, offsets })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> MetadataConfig {
        self.config
    }

    /// Count the matrix header declares for this file
    pub fn declared_count(&self) -> u32 {
        self.declared
    }

    /// Number of records actually present in the file
    pub fn record_count(&self) -> u32 {
        match &self.backing {
            Backing::Indexed { offsets, .. } => u32::try_from(offsets.len()).unwrap_or(u32::MAX),
            #[cfg(feature = "niffler")]
            Backing::Streamed { records } => *records,
        }
    }

    pub fn is_compressed(&self) -> bool {
        !matches!(self.backing, Backing::Indexed { .. })
    }

    /// Extracts the configured field of every record in `records`.
    pub fn read_field_range(&mut self, records: Range<u32>) -> Result<Vec<String>> {
        self.read_fields(records, self.config.field)
    }

    /// Extracts field `field` of every record in `records`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the range is empty or ends past the declared count
    /// - the file holds fewer records than the range needs
    /// - a record line lacks the delimiters to reach `field`
    /// - reading the file fails
    ///
    /// Nothing is returned unless every record in the range was extracted.
    pub fn read_fields(&mut self, records: Range<u32>, field: usize) -> Result<Vec<String>> {
        check_range(Axis::Record, &records, self.declared)?;
        let available = self.record_count();
        if records.end > available {
            return Err(PgenError::MissingRecords {
                requested: records.end,
                available,
            });
        }

        let first_line = (self.config.header_lines as u64) + records.start as u64 + 1;
        let mut fields = Vec::with_capacity(records.len());
        match &mut self.backing {
            Backing::Indexed { file, offsets } => {
                file.seek(SeekFrom::Start(offsets[records.start as usize]))?;
                collect_fields(file, &mut self.line, &records, first_line, field, &self.config, &mut fields)?;
            }
            #[cfg(feature = "niffler")]
            Backing::Streamed { .. } => {
                let (stream, _format) = niffler::from_path(&self.path)?;
                let mut stream = BufReader::new(stream);
                skip_lines(
                    &mut stream,
                    &mut self.line,
                    self.config.header_lines + records.start as usize,
                )?;
                collect_fields(&mut stream, &mut self.line, &records, first_line, field, &self.config, &mut fields)?;
            }
        }
        Ok(fields)
    }
}

fn read_line<R: BufRead>(reader: &mut R, line: &mut Vec<u8>) -> std::io::Result<usize> {
    line.clear();
    reader.read_until(b'\n', line)
}

/// Skips up to `count` lines, returning the number of bytes consumed
fn skip_lines<R: BufRead>(reader: &mut R, line: &mut Vec<u8>, count: usize) -> std::io::Result<u64> {
    let mut consumed = 0;
    for _ in 0..count {
        let n = read_line(reader, line)?;
        if n == 0 {
            break;
        }
        consumed += n as u64;
    }
    Ok(consumed)
}

fn collect_fields<R: BufRead>(
    reader: &mut R,
    line: &mut Vec<u8>,
    records: &Range<u32>,
    first_line: u64,
    field: usize,
    config: &MetadataConfig,
    fields: &mut Vec<String>,
) -> Result<()> {
    for (i, record) in records.clone().enumerate() {
        if read_line(reader, line)? == 0 {
            return Err(PgenError::MissingRecords {
                requested: records.end,
                available: record,
            });
        }
        let line_number = first_line + i as u64;
        fields.push(extract_field(line, config.delimiter, field, line_number)?);
    }
    Ok(())
}

/// Returns field `field` of raw line `line_number`.
///
/// Fails with `MissingField` if the line is empty or has fewer than `field`
/// delimiters, and with `InvalidUtf8` if the field bytes are not UTF-8.
fn extract_field(line: &[u8], delimiter: u8, field: usize, line_number: u64) -> Result<String> {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    let missing = PgenError::MissingField {
        line: line_number,
        field,
    };
    if line.is_empty() {
        return Err(missing);
    }
    let bytes = line.split(|&b| b == delimiter).nth(field).ok_or(missing)?;
    String::from_utf8(bytes.to_vec()).map_err(|_| PgenError::InvalidUtf8 {
        line: line_number,
        field,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_bytes(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file.flush().unwrap();
        file
    }

    fn write_text(content: &str) -> NamedTempFile {
        write_bytes(content.as_bytes())
    }

    const PVAR: &str = "#CHROM\tID\tPOS\tREF\tALT\n\
        1\trs1\t100\tA\tG\n\
        1\trs2\t200\tC\tT\n\
        2\trs3\t300\tG\tA\n\
        2\trs4\t400\tT\tC\n";

    #[test]
    fn test_single_variant_record() {
        let file = write_text("#CHROM\tID\tPOS\n1\tvariant_A\t12345\n");
        let mut pvar = MetadataFile::open(file.path(), MetadataConfig::variants(), 1).unwrap();
        assert_eq!(pvar.read_field_range(0..1).unwrap(), vec!["variant_A"]);
    }

    #[test]
    fn test_full_range_matches_lines() {
        let file = write_text(PVAR);
        let mut pvar = MetadataFile::open(file.path(), MetadataConfig::variants(), 4).unwrap();
        assert_eq!(pvar.record_count(), 4);
        assert!(!pvar.is_compressed());

        let ids = pvar.read_field_range(0..4).unwrap();
        let expected: Vec<String> = PVAR
            .lines()
            .skip(1)
            .map(|l| l.split('\t').nth(1).unwrap().to_string())
            .collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_sub_ranges_in_any_order() {
        let file = write_text(PVAR);
        let mut pvar = MetadataFile::open(file.path(), MetadataConfig::variants(), 4).unwrap();
        assert_eq!(pvar.read_field_range(2..4).unwrap(), vec!["rs3", "rs4"]);
        assert_eq!(pvar.read_field_range(0..1).unwrap(), vec!["rs1"]);
        assert_eq!(pvar.read_field_range(1..3).unwrap(), vec!["rs2", "rs3"]);
        assert_eq!(pvar.read_fields(3..4, 2).unwrap(), vec!["400"]);
    }

    #[test]
    fn test_sample_ids_field_zero() {
        let file = write_text("#IID\tSEX\r\nS1\t1\r\nS2\t2\r\nS3\r\n");
        let mut psam = MetadataFile::open(file.path(), MetadataConfig::samples(), 3).unwrap();
        assert_eq!(psam.read_field_range(0..3).unwrap(), vec!["S1", "S2", "S3"]);
    }

    #[test]
    fn test_last_line_without_newline() {
        let file = write_text("#IID\nA\nB");
        let mut psam = MetadataFile::open(file.path(), MetadataConfig::samples(), 2).unwrap();
        assert_eq!(psam.record_count(), 2);
        assert_eq!(psam.read_field_range(1..2).unwrap(), vec!["B"]);
    }

    #[test]
    fn test_range_beyond_declared_count() {
        let file = write_text(PVAR);
        let mut pvar = MetadataFile::open(file.path(), MetadataConfig::variants(), 3).unwrap();
        let result = pvar.read_field_range(0..4);
        assert!(matches!(
            result,
            Err(PgenError::InvalidRange {
                axis: Axis::Record,
                end: 4,
                max: 3,
                ..
            })
        ));
        assert!(pvar.read_field_range(1..1).is_err());
    }

    #[test]
    fn test_fewer_records_than_declared() {
        let file = write_text(PVAR);
        let mut pvar = MetadataFile::open(file.path(), MetadataConfig::variants(), 10).unwrap();
        let err = pvar.read_field_range(2..6).unwrap_err();
        assert!(matches!(
            err,
            PgenError::MissingRecords {
                requested: 6,
                available: 4
            }
        ));
        assert_eq!(err.kind(), ErrorKind::Io);
        assert_eq!(pvar.read_field_range(2..4).unwrap(), vec!["rs3", "rs4"]);
    }

    #[test]
    fn test_missing_delimiter_is_format_error() {
        let file = write_text("#CHROM\tID\n1\trs1\nmalformed\n1\trs3\n");
        let mut pvar = MetadataFile::open(file.path(), MetadataConfig::variants(), 3).unwrap();
        let err = pvar.read_field_range(0..3).unwrap_err();
        assert!(matches!(err, PgenError::MissingField { line: 3, field: 1 }));
        assert_eq!(err.kind(), ErrorKind::Format);
        assert_eq!(pvar.read_field_range(2..3).unwrap(), vec!["rs3"]);
    }

    #[test]
    fn test_empty_record_is_format_error() {
        let file = write_text("#IID\nS1\n\nS3\n");
        let mut psam = MetadataFile::open(file.path(), MetadataConfig::samples(), 3).unwrap();
        assert!(matches!(
            psam.read_field_range(1..2),
            Err(PgenError::MissingField { line: 3, field: 0 })
        ));
    }

    #[test]
    fn test_invalid_utf8_is_format_error() {
        let file = write_bytes(b"#CHROM\tID\tPOS\n1\trs1\t5\n1\tvar\xff\xfeA\t9\n");
        let mut pvar = MetadataFile::open(file.path(), MetadataConfig::variants(), 2).unwrap();
        let err = pvar.read_field_range(0..2).unwrap_err();
        assert!(matches!(err, PgenError::InvalidUtf8 { line: 3, field: 1 }));
        assert_eq!(err.kind(), ErrorKind::Format);

        // other fields of the same line still decode
        assert_eq!(pvar.read_fields(1..2, 2).unwrap(), vec!["9"]);
        assert_eq!(pvar.read_field_range(0..1).unwrap(), vec!["rs1"]);
    }

    #[test]
    fn test_multiple_header_lines() {
        let file = write_text("##fileformat=PVARv1.0\n##source=test\n#CHROM\tID\n1\tx1\n1\tx2\n");
        let config = MetadataConfig::variants().with_header_lines(3);
        let mut pvar = MetadataFile::open(file.path(), config, 2).unwrap();
        assert_eq!(pvar.read_field_range(0..2).unwrap(), vec!["x1", "x2"]);
    }

    #[test]
    fn test_header_only_file() {
        let file = write_text("#IID\n");
        let mut psam = MetadataFile::open(file.path(), MetadataConfig::samples(), 1).unwrap();
        assert_eq!(psam.record_count(), 0);
        assert!(matches!(
            psam.read_field_range(0..1),
            Err(PgenError::MissingRecords { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = MetadataFile::open("/nonexistent/file.psam", MetadataConfig::samples(), 1);
        assert!(matches!(result, Err(PgenError::Io(_))));
    }

    #[cfg(feature = "niffler")]
    #[test]
    fn test_compressed_file_is_streamed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.pvar.gz");
        {
            let mut writer =
                niffler::to_path(&path, niffler::Format::Gzip, niffler::Level::One).unwrap();
            writer.write_all(PVAR.as_bytes()).unwrap();
        }

        let mut pvar = MetadataFile::open(&path, MetadataConfig::variants(), 4).unwrap();
        assert!(pvar.is_compressed());
        assert_eq!(pvar.record_count(), 4);
        assert_eq!(pvar.read_field_range(1..3).unwrap(), vec!["rs2", "rs3"]);
        assert_eq!(pvar.read_field_range(0..4).unwrap(), vec!["rs1", "rs2", "rs3", "rs4"]);
        assert!(matches!(
            pvar.read_field_range(3..5),
            Err(PgenError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_extract_field() {
        let get = |line: &[u8], delimiter, field| extract_field(line, delimiter, field, 1).ok();
        assert_eq!(get(b"a\tb\tc\n", b'\t', 0).as_deref(), Some("a"));
        assert_eq!(get(b"a\tb\tc\n", b'\t', 2).as_deref(), Some("c"));
        assert_eq!(get(b"a\tb\tc\n", b'\t', 3), None);
        assert_eq!(get(b"a\t\tc", b'\t', 1).as_deref(), Some(""));
        assert_eq!(get(b"a b", b' ', 1).as_deref(), Some("b"));
        assert_eq!(get(b"\r\n", b'\t', 0), None);
        assert!(matches!(
            extract_field(b"a\t\xc3\x28", b'\t', 1, 9),
            Err(PgenError::InvalidUtf8 { line: 9, field: 1 })
        ));
        assert!(matches!(
            extract_field(b"a", b'\t', 1, 4),
            Err(PgenError::MissingField { line: 4, field: 1 })
        ));
    }
}
