//! Subcommand implementations

pub mod build;
pub mod export;
pub mod parse;
pub mod run;

use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};
use pubnet_pubmed::{Information, InformationSet};

/// Two-column table on stderr
pub fn print_summary(title: &str, rows: &[(&str, String)]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new(title).fg(Color::Cyan),
            Cell::new("Value").fg(Color::Cyan),
        ]);
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), Cell::new(value)]);
    }
    eprintln!("\n{table}");
}

/// `--info` override, else the configured selection
pub fn selection(
    info: Option<&[Information]>,
    config: &crate::config::Config,
) -> anyhow::Result<InformationSet> {
    match info {
        Some(infos) => Ok(infos.iter().copied().collect()),
        None => config.informations(),
    }
}
