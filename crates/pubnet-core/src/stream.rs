//! Local gzip archive reading with byte counting for progress.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use flate2::read::MultiGzDecoder;

/// Buffer size for gzip stream reader (256KB)
const GZIP_BUF_SIZE: usize = 256 * 1024;

/// Buffered reader over a gzipped file with byte counting
pub type GzipReader = BufReader<MultiGzDecoder<CountingReader<File>>>;

/// Shared counter of compressed bytes consumed
pub type ByteCounter = Arc<AtomicU64>;

/// Open file → gunzip → buffered reader with byte counter
///
/// Returns (reader, byte_counter, total_compressed_bytes)
pub fn open_gzip_file(path: &Path) -> io::Result<(GzipReader, ByteCounter, u64)> {
    let file = File::open(path)?;
    let total_bytes = file.metadata()?.len();

    let counter = Arc::new(AtomicU64::new(0));
    let counting_reader = CountingReader {
        inner: file,
        count: counter.clone(),
    };
    let gz = MultiGzDecoder::new(counting_reader);
    let buf = BufReader::with_capacity(GZIP_BUF_SIZE, gz);

    Ok((buf, counter, total_bytes))
}

/// Reader wrapper that tracks bytes read
pub struct CountingReader<R> {
    inner: R,
    count: Arc<AtomicU64>,
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.count.fetch_add(n as u64, Ordering::Relaxed);
        Ok(n)
    }
}

/// List `*.gz` archives directly inside `dir`, sorted by file name.
pub fn find_archives(dir: &Path) -> io::Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("archive directory not found: {}", dir.display()),
        ));
    }
    let pattern = Path::new(&glob::Pattern::escape(&dir.to_string_lossy())).join("*.gz");
    let pattern = pattern.to_string_lossy();
    let mut archives: Vec<PathBuf> = glob::glob(&pattern)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?
        .filter_map(Result::ok)
        .filter(|p| p.is_file())
        .collect();
    archives.sort();
    Ok(archives)
}
