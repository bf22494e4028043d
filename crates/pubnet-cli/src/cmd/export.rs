//! `pubnet export` - stored graph back to node and link tables

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use pubnet_core::fmt_num;
use pubnet_graph::{links_to_table, nodes_to_table, read_gexf};
use pubnet_pubmed::TableKind;

use crate::config::Config;

/// File stem of exported tables: `nodes_graph.csv`, `links_graph.csv`
const EXPORT_STEM: &str = "graph";

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// GEXF file to export
    #[arg(short, long)]
    pub graph: Option<PathBuf>,

    /// Output directory
    #[arg(short, long)]
    pub output: PathBuf,
}

pub fn run(args: ExportArgs, config: &Config) -> Result<()> {
    let graph_path = args.graph.unwrap_or_else(|| config.graph_path());
    let graph = read_gexf(&graph_path)
        .with_context(|| format!("failed to load graph {}", graph_path.display()))?;

    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("failed to create {}", args.output.display()))?;

    let nodes_path = args.output.join(TableKind::Nodes.file_name(EXPORT_STEM));
    let links_path = args.output.join(TableKind::Links.file_name(EXPORT_STEM));

    let nodes = nodes_to_table(&graph).write_tsv(&nodes_path)?;
    let links = links_to_table(&graph).write_tsv(&links_path)?;
    log::info!(
        "Exported {} nodes and {} links to {}",
        nodes,
        links,
        args.output.display()
    );

    super::print_summary(
        "Export",
        &[
            ("Node rows", fmt_num(nodes)),
            ("Link rows", fmt_num(links)),
            ("Nodes file", nodes_path.display().to_string()),
            ("Links file", links_path.display().to_string()),
        ],
    );
    Ok(())
}
