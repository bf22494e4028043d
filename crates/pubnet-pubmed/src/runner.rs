//! Main runner for the archive parser

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use pubnet_core::{PipelineError, ProgressContext, cleanup_tmp_files, find_archives, fmt_num};
use rustc_hash::FxHashMap;

use crate::config::ParseConfig;
use crate::manifest::{Manifest, TableKind};
use crate::worker;

/// Parser execution summary
#[derive(Debug, Default)]
pub struct Summary {
    pub archives: usize,
    pub articles: usize,
    pub written: usize,
    pub partial: usize,
    pub filtered: usize,
    pub links: usize,
    pub elapsed: std::time::Duration,
}

/// Fail when two archives would write the same `nodes_<stem>.csv`
/// (e.g. `a.gz` and `a.xml.gz`)
fn check_distinct_stems(archives: &[PathBuf]) -> Result<(), PipelineError> {
    let mut seen: FxHashMap<String, &Path> = FxHashMap::default();
    for path in archives {
        let stem = worker::archive_stem(path);
        if let Some(first) = seen.insert(stem.clone(), path) {
            return Err(PipelineError::malformed_input(
                path,
                format!("output name `{stem}` already used by {}", first.display()),
            ));
        }
    }
    Ok(())
}

/// Parse every archive of `config.input_dir` in file-name order.
///
/// Stops at the first failing archive; outputs of earlier archives stay in
/// place, the failing archive leaves none.
pub fn run(config: &ParseConfig, progress: &ProgressContext) -> Result<(Summary, Manifest)> {
    let start = Instant::now();

    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "Failed to create output directory {}",
            config.output_dir.display()
        )
    })?;
    cleanup_tmp_files(&config.output_dir).context("Failed to clean stale tmp files")?;

    let archives = find_archives(&config.input_dir)
        .with_context(|| format!("Failed to list archives in {}", config.input_dir.display()))?;
    log::info!(
        "Parsing {} archives from {} (informations: {})",
        archives.len(),
        config.input_dir.display(),
        config.informations
    );
    if let Some(mesh) = &config.mesh {
        log::info!("Topic filter: MeSH descriptor {mesh}");
    }
    check_distinct_stems(&archives)?;

    let stage = progress.stage_line("parse");
    let mut summary = Summary::default();
    let mut manifest = Manifest::new();

    for (i, path) in archives.iter().enumerate() {
        stage.set_message(format!("{}/{} {}", i + 1, archives.len(), path.display()));

        let output = worker::process_archive(path, config, progress)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        summary.archives += 1;
        summary.articles += output.articles;
        summary.written += output.written;
        summary.partial += output.partial;
        summary.filtered += output.filtered;
        summary.links += output.links;

        manifest.push(TableKind::Nodes, output.nodes_path);
        manifest.push(TableKind::Links, output.links_path);
    }
    stage.finish_and_clear();

    summary.elapsed = start.elapsed();

    log::info!("=== Parse Summary ===");
    log::info!("Archives: {}", summary.archives);
    log::info!(
        "Articles: {} read, {} written ({} partial), {} filtered",
        fmt_num(summary.articles),
        fmt_num(summary.written),
        fmt_num(summary.partial),
        fmt_num(summary.filtered)
    );
    log::info!("Links: {}", fmt_num(summary.links));
    log::info!("Time: {:.1}s", summary.elapsed.as_secs_f64());

    if summary.articles > 0 {
        let rate = summary.articles as f64 / summary.elapsed.as_secs_f64();
        log::info!("Throughput: {:.0} articles/sec", rate);
    }

    Ok((summary, manifest))
}
