//! `pubnet run` - parse + build from configuration

use anyhow::{Context, Result};
use clap::Args;
use pubnet_core::SharedProgress;
use pubnet_pubmed::Manifest;

use crate::config::Config;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Reuse the tables already in the csv directory instead of parsing
    #[arg(long)]
    pub skip_parse: bool,
}

pub fn run(args: RunArgs, config: &Config, progress: &SharedProgress) -> Result<()> {
    let parse = config.parse_config()?;

    let manifest = if args.skip_parse {
        log::info!("Reusing tables in {}", parse.output_dir.display());
        Manifest::from_dir(&parse.output_dir)
            .with_context(|| format!("failed to list tables in {}", parse.output_dir.display()))?
    } else {
        super::parse::parse_archives(&parse, progress)?
    };

    let stage = progress.stage_line("graph");
    stage.set_message("assembling citation graph");
    let graph = super::build::build_graph(&manifest, parse.informations, config.graph_options());
    stage.finish_and_clear();

    super::build::save_graph(&graph?, &config.graph_path())
}
