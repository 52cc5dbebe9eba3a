use std::io::Write;

use clap::ValueEnum;
use colored::Colorize;
use env_logger::Builder;
use log::{Level, LevelFilter};

/// Value of `--log-level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    #[value(name = "none")]
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Resolve the effective filter: an explicit `--log-level` wins over `-v` counts.
pub fn level_filter(level: Option<LogLevel>, verbosity: u8) -> LevelFilter {
    match level {
        Some(LogLevel::Off) => LevelFilter::Off,
        Some(LogLevel::Error) => LevelFilter::Error,
        Some(LogLevel::Warn) => LevelFilter::Warn,
        Some(LogLevel::Info) => LevelFilter::Info,
        Some(LogLevel::Debug) => LevelFilter::Debug,
        Some(LogLevel::Trace) => LevelFilter::Trace,
        None => match verbosity {
            0 => LevelFilter::Off,   // default: silent
            1 => LevelFilter::Info,  // -v: info and up
            2 => LevelFilter::Debug, // -vv: debug and up
            _ => LevelFilter::Trace, // -vvv: trace and up
        },
    }
}

/// Install the process logger once, before any other work.
pub fn init_logger(level: LevelFilter) {
    let mut builder = Builder::new();
    builder.filter_level(level);

    builder.format(|buf, record| {
        let level_label = match record.level() {
            Level::Error => "ERROR".red().bold(),
            Level::Warn  => "WARN ".yellow().bold(),
            Level::Info  => "INFO ".white().bold(),
            Level::Debug => "DEBUG".bright_black(),
            Level::Trace => "TRACE".bright_black(),
        };

        writeln!(
            buf,
            "[{}] {} {}",
            buf.timestamp_seconds(),
            level_label,
            record.args()
        )
    });

    builder.init();
}
