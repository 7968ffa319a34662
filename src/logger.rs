use std::{env as stdenv, io::Write, path::Path};

use chrono::Local;
use colored::*;
use env_logger::{Builder, Env};
use log::{info, SetLoggerError};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn script_name() -> String {
    Path::new(&stdenv::args().next().unwrap_or_default())
        .file_name()
        .unwrap_or_default()
        .to_str()
        .unwrap_or_default()
        .to_owned()
}

fn level_label(level: log::Level) -> ColoredString {
    match level {
        log::Level::Error => format!("{}", level).red(),
        log::Level::Warn => format!(" {}", level).yellow(),
        log::Level::Info => format!(" {}", level).green(),
        log::Level::Debug => format!("{}", level).blue(),
        log::Level::Trace => format!("{}", level).purple(),
    }
}

/// Installs the coloured `env_logger` formatter.
///
/// Defaults to `info`; `RUST_LOG` overrides it. With `RUST_LOG=trace` the
/// prefix shrinks to `file:line LEVEL`.
pub fn try_setup_logger() -> Result<(), SetLoggerError> {
    let compact = matches!(stdenv::var("RUST_LOG"), Ok(val) if val.to_lowercase() == "trace");
    let name_with_version = format!("{}_{}", script_name(), VERSION);
    Builder::from_env(Env::default().default_filter_or("info"))
        .format(move |buf, record| {
            let level = level_label(record.level());
            let file = record.file().unwrap_or("unknown");
            let line = record.line().unwrap_or(0);
            if compact {
                writeln!(buf, "{}:{} {}: {}", file, line, level, record.args())
            } else {
                writeln!(
                    buf,
                    "{}:{} [{} {}]{}: {}",
                    file,
                    line,
                    name_with_version.dimmed(),
                    Local::now().format("%Y%m%d %H:%M:%S").to_string().purple(),
                    level,
                    record.args()
                )
            }
        })
        .try_init()?;
    info!("Logger initialized");
    Ok(())
}

/// Like [`try_setup_logger`], ignoring a logger that is already installed.
pub fn setup_logger() {
    let _ = try_setup_logger();
}
