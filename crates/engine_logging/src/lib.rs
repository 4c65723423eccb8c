#![deny(missing_docs)]
//! Shared logging utilities for the iconset workspace.
//!
//! This crate provides the `engine_*` logging macros used across the codebase,
//! the run-time logger setup used by the binary, and a minimal test initializer
//! for the global logger.

use std::fs::File;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! engine_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! engine_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! engine_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! engine_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! engine_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Where and how verbosely a run logs.
#[derive(Debug, Clone)]
pub struct LogSettings {
    /// Log file receiving every message at `file_level`. `None` disables it.
    pub file: Option<PathBuf>,
    /// Level written to the log file.
    pub file_level: LevelFilter,
    /// Level echoed to stderr. Stdout is never used, it carries the manifest.
    pub terminal_level: LevelFilter,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            file: Some(PathBuf::from("debug.log")),
            file_level: LevelFilter::Debug,
            terminal_level: LevelFilter::Warn,
        }
    }
}

/// Initialize the global logger from `settings`.
///
/// A log file that cannot be created is reported on stderr and skipped; the
/// terminal logger is still installed. Returns the number of active sinks.
pub fn initialize(settings: &LogSettings) -> usize {
    let config = build_config();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        settings.terminal_level,
        config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];
    if let Some(path) = settings.file.as_ref() {
        if let Some(file_logger) = create_file_logger(path, settings.file_level, config) {
            loggers.push(file_logger);
        }
    }

    let count = loggers.len();
    let _ = CombinedLogger::init(loggers);
    count
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        // Keep HTTP client internals out of the run log.
        .add_filter_ignore_str("hyper")
        .add_filter_ignore_str("rustls")
        .add_filter_ignore_str("reqwest")
        .build()
}

fn create_file_logger(
    path: &Path,
    level: LevelFilter,
    config: Config,
) -> Option<Box<WriteLogger<File>>> {
    match File::create(path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("iconset: not logging to {}: {err}", path.display());
            None
        }
    }
}

/// Installs a stderr logger for tests; later calls are no-ops.
pub fn initialize_for_tests() {
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let _ = TermLogger::init(level, build_config(), TerminalMode::Stderr, ColorChoice::Never);
}
