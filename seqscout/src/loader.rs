use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info};

use crate::buffer::SequenceBuffer;
use crate::errors::{ScanError, ScanResult};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Counters accumulated while ingesting sequence files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Number of files ingested
    pub files: usize,
    /// Sequence lines appended to the buffer
    pub lines_kept: u64,
    /// Annotation (`>`) lines discarded
    pub lines_skipped: u64,
    /// Total sequence bytes appended
    pub bytes_loaded: u64,
}

/// Opens `path` for line-oriented reading, transparently decompressing gzip.
///
/// Detection goes by the two-byte gzip magic header rather than the file
/// extension, so a flat file named `chr1.fa.gz` or a gzipped file with no
/// extension both open correctly.
fn open_reader(path: &Path) -> ScanResult<Box<dyn BufRead>> {
    let file = File::open(path).map_err(|e| ScanError::from_open(path, e))?;
    let mut reader = BufReader::new(file);

    let is_gzip = reader
        .fill_buf()
        .map_err(|e| ScanError::read_error(path, e))?
        .starts_with(&GZIP_MAGIC);

    if is_gzip {
        Ok(Box::new(BufReader::new(GzDecoder::new(reader))))
    } else {
        Ok(Box::new(reader))
    }
}

/// Reads one sequence file into `buffer`, returning its line/byte counters.
///
/// Lines beginning with `>` are annotation and are discarded; every other
/// line has its terminator stripped and its bytes appended verbatim. Calling
/// this repeatedly concatenates files (e.g. chromosome files) into one
/// logical sequence.
pub fn load_file(path: &Path, buffer: &mut SequenceBuffer) -> ScanResult<LoadStats> {
    let reader = open_reader(path)?;
    info!("loading {}", path.display());

    let mut stats = LoadStats {
        files: 1,
        ..Default::default()
    };

    for line in reader.lines() {
        let line = line.map_err(|e| ScanError::read_error(path, e))?;
        if line.starts_with('>') {
            stats.lines_skipped += 1;
        } else {
            buffer.append(line.as_bytes())?;
            stats.lines_kept += 1;
            stats.bytes_loaded += line.len() as u64;
        }
    }

    debug!(
        "{}: {} lines skipped, {} lines kept, {} total bytes buffered",
        path.display(),
        stats.lines_skipped,
        stats.lines_kept,
        buffer.len()
    );

    Ok(stats)
}

/// Ingests `paths` in order into `buffer` and sums the per-file counters.
/// Any open or read failure aborts the whole load; there is no partial-success
/// mode.
pub fn load_files<P: AsRef<Path>>(
    paths: &[P],
    buffer: &mut SequenceBuffer,
) -> ScanResult<LoadStats> {
    let mut totals = LoadStats::default();
    for path in paths {
        let stats = load_file(path.as_ref(), buffer)?;
        totals.files += stats.files;
        totals.lines_kept += stats.lines_kept;
        totals.lines_skipped += stats.lines_skipped;
        totals.bytes_loaded += stats.bytes_loaded;
    }
    Ok(totals)
}
