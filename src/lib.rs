//! Triage library exports for testing

use clap::ValueEnum;
use simplelog::LevelFilter;

pub mod analysis;
pub mod core;
pub mod render;
pub mod store;
pub mod tui;

#[cfg(test)]
pub mod test_support;

/// Verbosity of `triage.log`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    #[default]
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}
