//! `pubnet build` - node and link tables to a GEXF graph

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use pubnet_core::fmt_num;
use pubnet_graph::{CitationGraph, GraphOptions, assemble, load_links, load_nodes, write_gexf};
use pubnet_pubmed::{Information, InformationSet, Manifest};

use crate::config::Config;

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Directory holding nodes_*.csv and links_*.csv
    #[arg(short, long)]
    pub tables: Option<PathBuf>,

    /// Output GEXF file
    #[arg(short, long)]
    pub graph: Option<PathBuf>,

    /// Keep every weakly-connected component
    #[arg(long)]
    pub no_connected: bool,

    /// Keep links whose target has no node row
    #[arg(long)]
    pub keep_unknown_nodes: bool,

    /// Node columns the tables were written with (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub info: Option<Vec<Information>>,
}

pub fn run(args: BuildArgs, config: &Config) -> Result<()> {
    let tables = args.tables.unwrap_or_else(|| config.paths.csv.clone());
    let graph_path = args.graph.unwrap_or_else(|| config.graph_path());
    let selection = super::selection(args.info.as_deref(), config)?;

    let mut options = config.graph_options();
    if args.no_connected {
        options.connected = false;
    }
    if args.keep_unknown_nodes {
        options.keep_unknown_nodes = true;
    }

    let manifest = Manifest::from_dir(&tables)
        .with_context(|| format!("failed to list tables in {}", tables.display()))?;
    let graph = build_graph(&manifest, selection, options)?;
    save_graph(&graph, &graph_path)
}

/// Load the manifest's tables and assemble the citation graph
pub fn build_graph(
    manifest: &Manifest,
    selection: InformationSet,
    options: GraphOptions,
) -> Result<CitationGraph> {
    log::info!(
        "Building graph from {} tables (connected: {}, unknown nodes: {})",
        manifest.len(),
        options.connected,
        options.keep_unknown_nodes
    );

    let Some(links) = load_links(manifest)? else {
        anyhow::bail!("no link rows found, nothing to build");
    };
    let Some(nodes) = load_nodes(manifest, selection)? else {
        anyhow::bail!("no node rows found, nothing to build");
    };

    Ok(assemble(&links, &nodes, options))
}

/// Write `graph` as GEXF, creating the parent directory
pub fn save_graph(graph: &CitationGraph, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    write_gexf(graph, path).with_context(|| format!("failed to write {}", path.display()))?;

    super::print_summary(
        "Graph",
        &[
            ("Nodes", fmt_num(graph.node_count())),
            ("Edges", fmt_num(graph.edge_count())),
            ("File", path.display().to_string()),
        ],
    );
    Ok(())
}
