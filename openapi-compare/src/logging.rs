// Copyright 2025 Oxide Computer Company

//! Logging configuration
//!
//! Log output is separate from the comparison report: the report goes to
//! stdout, log records go to stderr or to a file as configured here.

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use slog::{Drain, Level, Logger};
use std::fs::{File, OpenOptions};
use std::io::{self, LineWriter};

/// Where log records go, and how many of them
///
/// This is the `[log]` table of the configuration file.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "mode")]
pub enum ConfigLogging {
    /// Human-readable output to stderr
    StderrTerminal { level: ConfigLoggingLevel },
    /// Bunyan-formatted output to a file
    File {
        level: ConfigLoggingLevel,
        path: Utf8PathBuf,
        if_exists: ConfigLoggingIfExists,
    },
}

impl Default for ConfigLogging {
    fn default() -> Self {
        ConfigLogging::StderrTerminal { level: ConfigLoggingLevel::Warn }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigLoggingLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Critical,
}

impl From<&ConfigLoggingLevel> for Level {
    fn from(config_level: &ConfigLoggingLevel) -> Level {
        match config_level {
            ConfigLoggingLevel::Trace => Level::Trace,
            ConfigLoggingLevel::Debug => Level::Debug,
            ConfigLoggingLevel::Info => Level::Info,
            ConfigLoggingLevel::Warn => Level::Warning,
            ConfigLoggingLevel::Error => Level::Error,
            ConfigLoggingLevel::Critical => Level::Critical,
        }
    }
}

/// What to do when the log file already exists
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigLoggingIfExists {
    Fail,
    Truncate,
    Append,
}

impl ConfigLoggingIfExists {
    fn open_options(&self) -> OpenOptions {
        let mut options = OpenOptions::new();
        match self {
            ConfigLoggingIfExists::Fail => options.write(true).create_new(true),
            ConfigLoggingIfExists::Truncate => {
                options.write(true).create(true).truncate(true)
            }
            ConfigLoggingIfExists::Append => {
                options.append(true).create(true)
            }
        };
        options
    }
}

impl ConfigLogging {
    /// Create a root logger for this configuration
    ///
    /// In file mode, a note naming the log file is printed on stderr so the
    /// records can be found afterwards.
    pub fn to_logger<S: AsRef<str>>(
        &self,
        log_name: S,
    ) -> Result<Logger, io::Error> {
        let logger = match self {
            ConfigLogging::StderrTerminal { level } => {
                root_logger(level, stderr_drain())
            }
            ConfigLogging::File { level, path, if_exists } => {
                let drain = file_drain(path, if_exists, log_name.as_ref())?;
                eprintln!("note: configured to log to \"{path}\"");
                root_logger(level, drain)
            }
        };
        Ok(logger)
    }
}

fn root_logger<D>(level: &ConfigLoggingLevel, drain: D) -> Logger
where
    D: Drain + Send + 'static,
    D::Err: std::fmt::Debug,
{
    let drain = slog::LevelFilter(drain, Level::from(level)).fuse();
    let drain = slog_async::Async::new(drain).chan_size(1024).build().fuse();
    Logger::root(drain, slog::o!())
}

fn stderr_drain() -> impl Drain<Ok = (), Err = slog::Never> + Send {
    let decorator = slog_term::TermDecorator::new().stderr().build();
    slog_term::FullFormat::new(decorator).build().fuse()
}

type FileDrain = slog::Fuse<slog_json::Json<LineWriter<File>>>;

fn file_drain(
    path: &Utf8Path,
    if_exists: &ConfigLoggingIfExists,
    log_name: &str,
) -> Result<FileDrain, io::Error> {
    match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => {
            std::fs::create_dir_all(parent)?;
        }
        _ => (),
    }
    let file = LineWriter::new(if_exists.open_options().open(path)?);

    // slog_bunyan takes the name as `&'static str`.  A process builds one
    // logger, so this leaks once.
    let name: &'static str = Box::leak(log_name.to_owned().into_boxed_str());
    Ok(slog_bunyan::with_name(name, file).build().fuse())
}
