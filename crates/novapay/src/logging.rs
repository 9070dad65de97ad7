//! # Logging
//!
//! Structured logging for the `novapay` binary, built on `tracing`.
//!
//! Log output always goes to stderr so that commands which print a
//! signature or a PEM document on stdout stay pipe-friendly. An optional
//! log file receives the same events through a non-blocking daily-rolling
//! appender.
//!
//! ## Example
//!
//! ```no_run
//! use novapay::logging::{init_logging, LogConfig, LogFormat, LogLevel};
//!
//! let config = LogConfig {
//!     level: LogLevel::Debug,
//!     format: LogFormat::Compact,
//!     file_path: None,
//! };
//! let _guard = init_logging(&config).expect("logging initializes");
//! tracing::info!("ready");
//! ```

use std::fmt;
use std::path::PathBuf;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt as subscriber_fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Target used for key lifecycle audit events.
pub const KEY_EVENT_TARGET: &str = "novapay::keys";

/// Values shorter than this are fully masked by [`redact_sensitive`].
const REDACT_MIN_LEN: usize = 12;

// ============================================================================
// LogError
// ============================================================================

/// Errors that can occur while setting up logging.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// The log file or its directory could not be created.
    #[error("failed to create log file: {0}")]
    FileCreation(String),

    /// A global subscriber is already installed or the filter is invalid.
    #[error("failed to initialize subscriber: {0}")]
    SubscriberInit(String),

    /// The log configuration is unusable.
    #[error("invalid log configuration: {0}")]
    InvalidConfig(String),
}

// ============================================================================
// LogLevel / LogFormat
// ============================================================================

/// Log verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Errors only.
    Error,
    /// Warnings and errors.
    #[default]
    Warn,
    /// Informational messages.
    Info,
    /// Debug output, including canonical payload lengths.
    Debug,
    /// Everything.
    Trace,
}

impl LogLevel {
    /// The matching `tracing` level.
    #[must_use]
    pub const fn as_tracing_level(self) -> Level {
        match self {
            Self::Error => Level::ERROR,
            Self::Warn => Level::WARN,
            Self::Info => Level::INFO,
            Self::Debug => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// Lowercase name, as accepted by `RUST_LOG`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Multi-line, human-oriented output.
    Pretty,
    /// One JSON object per event.
    Json,
    /// Single-line output.
    #[default]
    Compact,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pretty => "pretty",
            Self::Json => "json",
            Self::Compact => "compact",
        })
    }
}

// ============================================================================
// LogConfig / LogGuard
// ============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    /// Minimum level when `RUST_LOG` is unset.
    pub level: LogLevel,
    /// Line format for stderr and file output.
    pub format: LogFormat,
    /// Optional log file; rotated daily.
    pub file_path: Option<PathBuf>,
}

/// Keeps the non-blocking file writer alive.
///
/// Dropping the guard flushes buffered file output.
pub struct LogGuard {
    guard: Option<WorkerGuard>,
}

impl fmt::Debug for LogGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogGuard")
            .field("file_writer", &self.guard.is_some())
            .finish()
    }
}

// ============================================================================
// Initialization
// ============================================================================

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over `config.level` when it is set.
///
/// # Errors
///
/// Returns [`LogError`] if the log file cannot be created or a subscriber is
/// already installed.
pub fn init_logging(config: &LogConfig) -> Result<LogGuard, LogError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.level.as_str()))
        .map_err(|e| LogError::SubscriberInit(e.to_string()))?;

    let (file_sink, guard) = match &config.file_path {
        Some(path) => {
            let (writer, guard) = file_writer(path)?;
            (Some(writer), Some(guard))
        }
        None => (None, None),
    };

    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.format {
        LogFormat::Pretty => registry
            .with(
                subscriber_fmt::layer()
                    .pretty()
                    .with_writer(std::io::stderr),
            )
            .with(file_sink.map(|w| {
                subscriber_fmt::layer()
                    .with_writer(w)
                    .with_ansi(false)
            }))
            .try_init(),
        LogFormat::Json => registry
            .with(subscriber_fmt::layer().json().with_writer(std::io::stderr))
            .with(file_sink.map(|w| subscriber_fmt::layer().json().with_writer(w)))
            .try_init(),
        LogFormat::Compact => registry
            .with(
                subscriber_fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .with(file_sink.map(|w| {
                subscriber_fmt::layer()
                    .compact()
                    .with_writer(w)
                    .with_ansi(false)
            }))
            .try_init(),
    };
    result.map_err(|e| LogError::SubscriberInit(e.to_string()))?;

    Ok(LogGuard { guard })
}

fn file_writer(
    path: &std::path::Path,
) -> Result<(tracing_appender::non_blocking::NonBlocking, WorkerGuard), LogError> {
    let directory = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| std::path::Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| LogError::InvalidConfig(format!("{} has no file name", path.display())))?;

    std::fs::create_dir_all(directory)
        .map_err(|e| LogError::FileCreation(format!("{}: {e}", directory.display())))?;

    let appender = tracing_appender::rolling::daily(directory, file_name);
    Ok(tracing_appender::non_blocking(appender))
}

// ============================================================================
// Helpers
// ============================================================================

/// Map `-v` occurrences to a level: none is warn, then info, debug, trace.
#[must_use]
pub const fn verbosity_to_level(verbosity: u8) -> LogLevel {
    match verbosity {
        0 => LogLevel::Warn,
        1 => LogLevel::Info,
        2 => LogLevel::Debug,
        _ => LogLevel::Trace,
    }
}

/// Mask a sensitive value for logging, keeping four characters at each end
/// of long values.
#[must_use]
pub fn redact_sensitive(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() < REDACT_MIN_LEN {
        return "***".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}***{tail}")
}

/// Record a key lifecycle event (generation, encryption, decryption).
///
/// Events carry the action, the affected path and whether the written key
/// is passphrase-protected. Key material is never logged.
pub fn log_key_event(action: &str, path: &std::path::Path, encrypted: bool) {
    tracing::info!(
        target: KEY_EVENT_TARGET,
        action,
        path = %path.display(),
        encrypted,
        "key file written"
    );
}

// ============================================================================
// Tests
// ============================================================================
