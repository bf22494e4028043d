//! Logging setup for the pipeline binaries
//!
//! `RUST_LOG` wins over the defaults. On a terminal, records are printed with
//! the progress bars suspended so that bars are redrawn below them.

use indicatif::MultiProgress;
use log::{Level, Log, Metadata, Record};

const RESET: &str = "\x1b[0m";

fn label(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARN ",
        Level::Info => "INFO ",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}

fn color(level: Level) -> &'static str {
    match level {
        Level::Error => "\x1b[31m",
        Level::Warn => "\x1b[33m",
        Level::Info => "\x1b[32m",
        Level::Debug => "\x1b[36m",
        Level::Trace => "\x1b[35m",
    }
}

/// One output line; debug and trace records also name their module
fn render(record: &Record, ansi: bool) -> String {
    let level = record.level();
    let tag = if ansi {
        format!("{}{}{RESET}", color(level), label(level))
    } else {
        label(level).to_string()
    };
    if level >= Level::Debug {
        format!("[{tag} {}] {}", record.target(), record.args())
    } else {
        format!("[{tag}] {}", record.args())
    }
}

fn default_filter(quiet: bool, debug: bool) -> &'static str {
    match (debug, quiet) {
        (true, _) => "debug",
        (false, true) => "warn",
        (false, false) => "info",
    }
}

/// env_logger filtering, printed around the progress bars
pub struct SuspendingLogger {
    filter: env_logger::Logger,
    multi: MultiProgress,
}

impl Log for SuspendingLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.filter.enabled(metadata)
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let line = render(record, true);
            self.multi.suspend(|| eprintln!("{line}"));
        }
    }

    fn flush(&self) {
        self.filter.flush();
    }
}

/// Install the global logger.
///
/// `quiet` lowers the default to `warn`, `debug` raises it to `debug`.
/// Passing `multi` routes output through the progress bars. Fails only if a
/// logger was already installed.
pub fn init_logging(
    quiet: bool,
    debug: bool,
    multi: Option<&MultiProgress>,
) -> Result<(), log::SetLoggerError> {
    let env = env_logger::Env::default().default_filter_or(default_filter(quiet, debug));
    let mut builder = env_logger::Builder::from_env(env);

    let Some(multi) = multi else {
        return builder
            .format(|buf, record| {
                use std::io::Write;
                writeln!(buf, "{}", render(record, false))
            })
            .try_init();
    };

    let filter = builder.build();
    let max_level = filter.filter();
    log::set_boxed_logger(Box::new(SuspendingLogger {
        filter,
        multi: multi.clone(),
    }))?;
    log::set_max_level(max_level);
    Ok(())
}
