//! pubnet - PubMed citation network pipeline
//!
//! Parses PubMed baseline archives into node and link tables, then builds
//! a directed citation graph and stores it as GEXF.

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod cmd;
mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "pubnet")]
#[command(about = "PubMed citation network pipeline")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Config file path (default: ./pubnet.toml or ~/.config/pubnet/config.toml)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Parse PubMed archives into node and link tables
    Parse(cmd::parse::ParseArgs),
    /// Build a citation graph from node and link tables
    Build(cmd::build::BuildArgs),
    /// Run the full pipeline from configuration (parse + build)
    Run(cmd::run::RunArgs),
    /// Export a stored graph back to node and link tables
    Export(cmd::export::ExportArgs),
    /// Show current configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let progress = Arc::new(pubnet_core::ProgressContext::new());

    // Logging:
    //   TTY:     quiet (warn) unless --debug, progress bars show activity
    //   non-TTY: info unless --debug, logs are the only progress indicator
    let is_tty = progress.is_tty();
    let multi = if is_tty { Some(progress.multi()) } else { None };
    let quiet = is_tty && !cli.debug;
    if let Err(e) = pubnet_core::init_logging(quiet, cli.debug, multi) {
        eprintln!("Logger already initialized: {e}");
    }

    let config = if let Some(path) = cli.config {
        Config::from_file(&path)?
    } else {
        Config::load()?
    };

    match cli.command {
        Command::Parse(args) => cmd::parse::run(args, &config, &progress),
        Command::Build(args) => cmd::build::run(args, &config),
        Command::Run(args) => cmd::run::run(args, &config, &progress),
        Command::Export(args) => cmd::export::run(args, &config),
        Command::Config => {
            let rows = [
                ("Archives", config.paths.pubmed.display().to_string()),
                ("Tables", config.paths.csv.display().to_string()),
                ("Graph file", config.graph_path().display().to_string()),
                (
                    "MeSH filter",
                    if config.mesh.mesh.trim().is_empty() {
                        "none".to_string()
                    } else {
                        config.mesh.mesh.clone()
                    },
                ),
                ("Informations", config.informations()?.to_string()),
                ("Connected only", config.graph.connected.to_string()),
                (
                    "Keep unknown nodes",
                    config.graph.keep_unknown_nodes.to_string(),
                ),
            ];
            cmd::print_summary("Setting", &rows);
            Ok(())
        }
    }
}
