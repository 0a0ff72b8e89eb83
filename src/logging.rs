//! Logging setup for the `kanban-report` binary.
//!
//! The library only emits `tracing` events; nothing is printed unless a
//! subscriber is installed. The binary installs one here, with:
//! - stderr or file output through a non-blocking writer
//! - a level filter scoped to this crate
//! - text or JSON format

use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::error::ConfigError;

pub const LOG_LEVEL_ENV: &str = "KANBAN_LOG_LEVEL";
pub const LOG_FILE_ENV: &str = "KANBAN_LOG_FILE";
pub const LOG_FORMAT_ENV: &str = "KANBAN_LOG_FORMAT";

/// Log level configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(ConfigError::InvalidSetting {
                field: "log level".to_string(),
                value: s.to_string(),
                expected: "trace, debug, info, warn or error".to_string(),
            }),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::InvalidSetting {
                field: "log format".to_string(),
                value: s.to_string(),
                expected: "text or json".to_string(),
            }),
        }
    }
}

/// Configuration for the logging system.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct LogConfig {
    /// `None` disables logging.
    pub level: Option<LogLevel>,
    /// `None` logs to stderr.
    pub file: Option<PathBuf>,
    pub format: LogFormat,
}

impl LogConfig {
    /// Resolves the configuration from command-line values, falling back to
    /// the `KANBAN_LOG_*` environment variables.
    pub fn resolve(
        level: Option<&str>,
        file: Option<&Path>,
        format: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let level = level
            .map(str::to_string)
            .or_else(|| env_value(LOG_LEVEL_ENV));
        let file = file
            .map(Path::to_path_buf)
            .or_else(|| env_value(LOG_FILE_ENV).map(PathBuf::from));
        let format = format
            .map(str::to_string)
            .or_else(|| env_value(LOG_FORMAT_ENV));

        Ok(Self {
            level: level.as_deref().map(LogLevel::from_str).transpose()?,
            file,
            format: format
                .as_deref()
                .map(LogFormat::from_str)
                .transpose()?
                .unwrap_or_default(),
        })
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Guard that must be held to ensure logs are flushed.
///
/// Dropping it flushes pending messages.
pub struct LogGuard {
    _guard: WorkerGuard,
}

/// Initialize the logging system.
///
/// Returns `Ok(None)` when logging is disabled. The guard must be held until
/// application exit.
///
/// # Example
///
/// ```rust,no_run
/// use kanban_report::logging::{LogConfig, LogFormat, LogLevel, init_logging};
/// use std::path::PathBuf;
///
/// let config = LogConfig {
///     level: Some(LogLevel::Debug),
///     file: Some(PathBuf::from("/tmp/kanban-report.log")),
///     format: LogFormat::Text,
/// };
///
/// let _guard = init_logging(config).unwrap();
/// ```
#[must_use = "the returned guard must be held until application exit"]
pub fn init_logging(config: LogConfig) -> Result<Option<LogGuard>, ConfigError> {
    let Some(level) = config.level else {
        return Ok(None);
    };

    // Dependencies such as reqwest and hyper stay quiet
    let filter = EnvFilter::new(format!("kanban_report={}", level.as_filter_str()));

    let (writer, guard) = match &config.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| ConfigError::Logging {
                    message: format!("cannot open {}: {e}", path.display()),
                })?;
            tracing_appender::non_blocking(file)
        }
        None => tracing_appender::non_blocking(std::io::stderr()),
    };
    let to_file = config.file.is_some();

    install(filter, writer, config.format, to_file).map_err(|e| ConfigError::Logging {
        message: e.to_string(),
    })?;

    Ok(Some(LogGuard { _guard: guard }))
}

fn install(
    filter: EnvFilter,
    writer: NonBlocking,
    format: LogFormat,
    to_file: bool,
) -> Result<(), tracing_subscriber::util::TryInitError> {
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .with_writer(writer)
                    .json()
                    .with_span_events(FmtSpan::CLOSE)
                    .with_file(to_file)
                    .with_line_number(to_file),
            )
            .try_init(),
        LogFormat::Text if to_file => registry
            .with(
                fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(writer).with_target(true).compact())
            .try_init(),
    }
}
