//! Processing of a single PubMed archive

use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;

use pubnet_core::{PipelineError, ProgressContext, open_gzip_file};

use crate::config::ParseConfig;
use crate::manifest::TableKind;
use crate::parser::ArticleReader;
use crate::transform::RecordWriter;

/// Counts and output files of one archive
#[derive(Debug, Clone, Default)]
pub struct ArchiveOutput {
    pub nodes_path: PathBuf,
    pub links_path: PathBuf,
    /// `PubmedArticle` elements read
    pub articles: usize,
    /// Node rows written, partial rows included
    pub written: usize,
    /// Rows missing their identifier or title
    pub partial: usize,
    /// Articles rejected by the topic filter
    pub filtered: usize,
    pub links: usize,
}

/// Archive file name without `.xml.gz` / `.gz`
pub fn archive_stem(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    name.strip_suffix(".xml.gz")
        .or_else(|| name.strip_suffix(".gz"))
        .unwrap_or(name.as_str())
        .to_string()
}

/// Parse one archive into `nodes_<stem>.csv` and `links_<stem>.csv`.
///
/// Both files appear only if the whole archive succeeds.
pub fn process_archive(
    path: &Path,
    config: &ParseConfig,
    progress: &ProgressContext,
) -> Result<ArchiveOutput, PipelineError> {
    let stem = archive_stem(path);
    let nodes_path = config.output_dir.join(TableKind::Nodes.file_name(&stem));
    let links_path = config.output_dir.join(TableKind::Links.file_name(&stem));

    let (reader, byte_counter, total_bytes) = open_gzip_file(path)?;
    let pb = progress.archive_bar(&stem, total_bytes);

    let mut writer = RecordWriter::create(&nodes_path, &links_path, config.informations)?;
    let mut output = ArchiveOutput::default();
    let mut articles = ArticleReader::new(reader);

    while let Some(article) = articles
        .next_article()
        .map_err(|e| PipelineError::malformed_input(path, e))?
    {
        output.articles += 1;

        if let Some(mesh) = config.mesh.as_deref() {
            if !article.has_descriptor(mesh) {
                output.filtered += 1;
                continue;
            }
        }

        let counts = writer.write_article(&article)?;
        output.written += counts.nodes;
        output.links += counts.links;
        if counts.partial {
            output.partial += 1;
        }

        pb.set_position(byte_counter.load(Ordering::Relaxed));
    }

    let (nodes, links) = writer.finalize()?;
    pb.finish_and_clear();
    log::debug!("{stem}: {} articles, {nodes} node rows, {links} link rows", output.articles);

    output.nodes_path = nodes_path;
    output.links_path = links_path;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stem_strips_archive_suffix() {
        assert_eq!(archive_stem(Path::new("data/test.xml.gz")), "test");
        assert_eq!(archive_stem(Path::new("pubmed26n0001.xml.gz")), "pubmed26n0001");
        assert_eq!(archive_stem(Path::new("dump.gz")), "dump");
        assert_eq!(archive_stem(Path::new("plain.xml")), "plain.xml");
    }

    #[test]
    fn archive_output_default() {
        let output = ArchiveOutput::default();
        assert_eq!(output.articles, 0);
        assert_eq!(output.written, 0);
        assert_eq!(output.filtered, 0);
        assert_eq!(output.links, 0);
    }
}
