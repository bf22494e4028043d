//! Output sinks: atomic tmp→rename files and tab-separated row writers

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Buffered file writer with atomic tmp→rename.
///
/// Dropping an unfinalized `AtomicFile` removes its temporary file, so a
/// failed write leaves nothing at the final path.
pub struct AtomicFile {
    writer: BufWriter<File>,
    tmp_path: PathBuf,
    final_path: PathBuf,
    finished: bool,
}

impl std::fmt::Debug for AtomicFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AtomicFile")
            .field("final_path", &self.final_path)
            .finish_non_exhaustive()
    }
}

impl AtomicFile {
    /// Create `<final_path>.tmp` for writing
    pub fn create(final_path: &Path) -> io::Result<Self> {
        let mut tmp_name = final_path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        // Clean up stale tmp file
        if tmp_path.exists() {
            fs::remove_file(&tmp_path)?;
        }

        let file = File::create(&tmp_path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            tmp_path,
            final_path: final_path.to_path_buf(),
            finished: false,
        })
    }

    /// Flush and atomically rename tmp → final
    pub fn finalize(mut self) -> io::Result<PathBuf> {
        self.writer.flush()?;
        fs::rename(&self.tmp_path, &self.final_path)?;
        self.finished = true;
        Ok(self.final_path.clone())
    }

    pub fn final_path(&self) -> &Path {
        &self.final_path
    }
}

impl Write for AtomicFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl Drop for AtomicFile {
    fn drop(&mut self) {
        if !self.finished {
            log::debug!("Discarding partial output {}", self.tmp_path.display());
            let _ = fs::remove_file(&self.tmp_path);
        }
    }
}

/// Tab-separated row writer: no header, no quoting, `\n` terminator.
///
/// Fields are written verbatim, so callers must strip tabs and newlines
/// from values beforehand.
pub struct TsvSink {
    writer: csv::Writer<AtomicFile>,
    row_count: usize,
}

impl std::fmt::Debug for TsvSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TsvSink")
            .field("final_path", &self.writer.get_ref().final_path())
            .field("row_count", &self.row_count)
            .finish_non_exhaustive()
    }
}

impl TsvSink {
    pub fn create(path: &Path) -> io::Result<Self> {
        let file = AtomicFile::create(path)?;
        let writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .quote_style(csv::QuoteStyle::Never)
            .terminator(csv::Terminator::Any(b'\n'))
            .has_headers(false)
            .flexible(true)
            .from_writer(file);
        Ok(Self {
            writer,
            row_count: 0,
        })
    }

    /// Write one row. A row must not consist of a single empty field.
    pub fn write_row<I, T>(&mut self, fields: I) -> io::Result<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        self.writer.write_record(fields)?;
        self.row_count += 1;
        Ok(())
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Push buffered rows down to the tmp file without renaming it
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    pub fn final_path(&self) -> &Path {
        self.writer.get_ref().final_path()
    }

    /// Flush and rename into place. Returns the number of rows written.
    pub fn finalize(self) -> io::Result<usize> {
        let row_count = self.row_count;
        let file = self.writer.into_inner().map_err(|e| e.into_error())?;
        file.finalize()?;
        Ok(row_count)
    }
}

/// Remove stale .tmp files in the output directory
pub fn cleanup_tmp_files(output_dir: &Path) -> io::Result<()> {
    for entry in fs::read_dir(output_dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "tmp") {
            log::warn!("Removing stale tmp file: {}", path.display());
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn finalize_renames_into_place() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("links_a.csv");

        let mut sink = TsvSink::create(&path).unwrap();
        sink.write_row(["36464820", "36464821"]).unwrap();
        sink.write_row(["36464820", "36464824"]).unwrap();
        assert!(!path.exists());
        assert_eq!(sink.finalize().unwrap(), 2);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "36464820\t36464821\n36464820\t36464824\n");
        assert!(!dir.path().join("links_a.csv.tmp").exists());
    }

    #[test]
    fn values_are_never_quoted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nodes_a.csv");

        let mut sink = TsvSink::create(&path).unwrap();
        sink.write_row(["1", "say \"hi\", ok", ""]).unwrap();
        sink.write_row(["", ""]).unwrap();
        sink.finalize().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "1\tsay \"hi\", ok\t\n\t\n");
    }

    #[test]
    fn dropped_sink_leaves_no_output() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nodes_a.csv");
        {
            let mut sink = TsvSink::create(&path).unwrap();
            sink.write_row(["1", "x"]).unwrap();
        }
        assert!(!path.exists());
        assert!(!dir.path().join("nodes_a.csv.tmp").exists());
    }

    #[test]
    fn cleanup_removes_only_tmp() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("nodes_a.csv.tmp"), "x").unwrap();
        std::fs::write(dir.path().join("nodes_b.csv"), "x").unwrap();

        cleanup_tmp_files(dir.path()).unwrap();

        assert!(!dir.path().join("nodes_a.csv.tmp").exists());
        assert!(dir.path().join("nodes_b.csv").exists());
    }
}
