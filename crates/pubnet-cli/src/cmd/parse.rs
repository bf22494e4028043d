//! `pubnet parse` - archives to node and link tables

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use pubnet_core::{SharedProgress, fmt_num};
use pubnet_pubmed::{Information, Manifest, ParseConfig, Summary};

use crate::config::Config;

#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Directory of *.gz PubMed archives
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Directory receiving nodes_*.csv and links_*.csv
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Keep only articles tagged with this MeSH descriptor UI (e.g. D004724)
    #[arg(long)]
    pub mesh: Option<String>,

    /// Node columns (comma-separated: title,abstract,date,authors,journal,keywords)
    #[arg(long, value_delimiter = ',')]
    pub info: Option<Vec<Information>>,
}

pub fn run(args: ParseArgs, config: &Config, progress: &SharedProgress) -> Result<()> {
    let mut parse = config.parse_config()?;
    parse.informations = super::selection(args.info.as_deref(), config)?;
    if let Some(input) = args.input {
        parse.input_dir = input;
    }
    if let Some(output) = args.output {
        parse.output_dir = output;
    }
    if let Some(mesh) = args.mesh {
        parse = parse.with_mesh(mesh);
    }

    parse_archives(&parse, progress)?;
    Ok(())
}

/// Parse every archive and print the summary table
pub fn parse_archives(parse: &ParseConfig, progress: &SharedProgress) -> Result<Manifest> {
    log::info!("Parsing PubMed archives");
    log::info!("  Input: {}", parse.input_dir.display());
    log::info!("  Output: {}", parse.output_dir.display());
    log::info!("  Informations: {}", parse.informations);
    if let Some(mesh) = &parse.mesh {
        log::info!("  MeSH filter: {mesh}");
    }

    let (summary, manifest) = pubnet_pubmed::run(parse, progress)?;
    print_parse_summary(&summary);
    Ok(manifest)
}

fn print_parse_summary(summary: &Summary) {
    super::print_summary(
        "PubMed",
        &[
            ("Archives", fmt_num(summary.archives)),
            ("Articles", fmt_num(summary.articles)),
            (
                "Node rows",
                format!(
                    "{} ({} partial)",
                    fmt_num(summary.written),
                    fmt_num(summary.partial)
                ),
            ),
            ("Filtered out", fmt_num(summary.filtered)),
            ("Links", fmt_num(summary.links)),
            ("Time", format!("{:.1}s", summary.elapsed.as_secs_f64())),
        ],
    );
}
