//! Process-wide logging setup.
//!
//! The library only emits `tracing` events. Applications call [`init`] once
//! at startup to route them to a timestamped log file named
//! `<YYMMDD>-<HHMM>.log`, one line per event:
//!
//! ```text
//! 2024-05-23 14:02:11 | magkit::prune::scan | INFO | scanned checkpoint directory directory=drive-0 ...
//! ```

use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::{self, FormatEvent, FormatFields};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::EnvFilter;

use crate::error::ConfigError;

/// Timestamp format used inside log lines.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Log file name format.
pub const FILE_NAME_FORMAT: &str = "%y%m%d-%H%M.log";

static INSTALLED: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Minimum level written to the log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Self::ERROR,
            LogLevel::Warn => Self::WARN,
            LogLevel::Info => Self::INFO,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Trace => Self::TRACE,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogSettings {
    /// Write a log file at all.
    pub enabled: bool,
    /// Directory the log file is created in.
    pub directory: PathBuf,
    pub level: LogLevel,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            directory: PathBuf::from("."),
            level: LogLevel::Info,
        }
    }
}

/// Log file name for a given start time, e.g. `240523-1402.log`.
#[must_use]
pub fn log_file_name<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    now.format(FILE_NAME_FORMAT).to_string()
}

/// `timestamp | target | LEVEL | message fields`
struct PipeFormat;

impl<S, N> FormatEvent<S, N> for PipeFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();
        write!(
            writer,
            "{} | {} | {} | ",
            Local::now().format(TIMESTAMP_FORMAT),
            meta.target(),
            meta.level()
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Installs the global subscriber.
///
/// Only the first call does anything; later calls return the first call's
/// result. Returns the log file path, or `None` when logging is disabled or
/// another subscriber was already installed. `RUST_LOG` overrides the
/// configured level.
///
/// # Errors
///
/// Returns `ConfigError::LogFile` if the log file cannot be created.
pub fn init(settings: &LogSettings) -> Result<Option<PathBuf>, ConfigError> {
    if let Some(installed) = INSTALLED.get() {
        return Ok(installed.clone());
    }
    if !settings.enabled {
        return Ok(INSTALLED.get_or_init(|| None).clone());
    }

    let path = settings.directory.join(log_file_name(&Local::now()));
    let file = create_log_file(&path)?;

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from(settings.level).into())
        .from_env_lossy();

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .event_format(PipeFormat)
        .with_writer(Mutex::new(file))
        .try_init()
        .is_ok();

    let result = installed.then_some(path);
    if let Some(path) = &result {
        tracing::info!(path = %path.display(), "logging initialised");
    }
    Ok(INSTALLED.get_or_init(|| result).clone())
}

fn create_log_file(path: &Path) -> Result<File, ConfigError> {
    File::create(path).map_err(|source| ConfigError::LogFile {
        path: path.to_path_buf(),
        source,
    })
}
