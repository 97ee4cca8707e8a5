//! # Logger
//!
//! Installs the global `tracing` subscriber for gpm binaries: a compact console
//! layer, an optional non-blocking file layer and an [`EnvFilter`] honoring
//! `RUST_LOG`.
//!
//! ## Example
//!
//! ```rust
//! # use gpm_logger::{Logger, LevelFilter};
//!
//! let _logger = Logger::builder("gpm")
//!     .level(LevelFilter::DEBUG)
//!     .ansi(false)
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::LoggerError;
pub use tracing::level_filters::LevelFilter;

use std::fs;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const LOG_FILE_SUFFIX: &str = "log";

/// A builder for configuring and initializing the global tracing subscriber.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug)]
pub struct LoggerBuilder {
    name: String,
    level: LevelFilter,
    env_filter: Option<String>,
    console: bool,
    ansi: bool,
    json: bool,
    stderr: bool,
    directory: Option<PathBuf>,
}

impl LoggerBuilder {
    /// Configures the minimum log level to be emitted.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// Adds an explicit env filter (e.g., `gpm=trace`).
    ///
    /// When set, `RUST_LOG` is ignored. Invalid filters make
    /// [`LoggerBuilder::init`] fail.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Enables or disables console output.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn console(mut self, enabled: bool) -> Self {
        self.console = enabled;
        self
    }

    /// Enables or disables ANSI colors on the console.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn ansi(mut self, enabled: bool) -> Self {
        self.ansi = enabled;
        self
    }

    /// Emits JSON lines instead of the compact text format.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn json(mut self, enabled: bool) -> Self {
        self.json = enabled;
        self
    }

    /// Sends console output to stderr instead of stdout.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn stderr(mut self, enabled: bool) -> Self {
        self.stderr = enabled;
        self
    }

    /// Also writes logs to `<directory>/<name>.log`.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn file(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    /// Consumes the builder and initializes the global tracing subscriber.
    ///
    /// # Returns
    /// A [`Logger`] handle. Keep it alive for the duration of the program so
    /// buffered file output gets flushed.
    ///
    /// # Errors
    /// Returns [`LoggerError::InvalidConfiguration`] for invalid builder settings,
    /// [`LoggerError::Io`] or [`LoggerError::Appender`] if the log file cannot be
    /// created, and [`LoggerError::Subscriber`] if a global subscriber is
    /// already installed.
    pub fn init(self) -> Result<Logger, LoggerError> {
        self.validate()?;

        let env_filter = self.build_env_filter()?;
        let mut layers = Vec::new();

        if self.console {
            let console = layer().with_ansi(self.ansi);
            layers.push(match (self.json, self.stderr) {
                (true, true) => console.with_writer(std::io::stderr).json().boxed(),
                (true, false) => console.json().boxed(),
                (false, true) => console.with_writer(std::io::stderr).compact().boxed(),
                (false, false) => console.compact().boxed(),
            });
        }

        let guard = if let Some(directory) = &self.directory {
            fs::create_dir_all(directory).map_err(|source| LoggerError::Io {
                source,
                context: Some(format!("Failed to create {}", directory.display()).into()),
            })?;

            let appender = RollingFileAppender::builder()
                .rotation(Rotation::NEVER)
                .filename_prefix(&self.name)
                .filename_suffix(LOG_FILE_SUFFIX)
                .build(directory)?;
            let (writer, guard) = tracing_appender::non_blocking(appender);

            let file = layer().with_writer(writer).with_ansi(false);
            layers.push(if self.json { file.json().boxed() } else { file.boxed() });
            Some(guard)
        } else {
            None
        };

        tracing_subscriber::registry().with(env_filter).with(layers).try_init()?;

        Ok(Logger { guard })
    }

    fn validate(&self) -> Result<(), LoggerError> {
        if self.name.trim().is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "Logger name cannot be empty".into(),
                context: None,
            });
        }

        if !self.console && self.directory.is_none() {
            return Err(LoggerError::InvalidConfiguration {
                message: "No logging layers enabled. Enable console or file output.".into(),
                context: None,
            });
        }

        Ok(())
    }

    fn build_env_filter(&self) -> Result<EnvFilter, LoggerError> {
        let builder = EnvFilter::builder().with_default_directive(self.level.into());
        self.env_filter.as_ref().map_or_else(
            || Ok(builder.from_env_lossy()),
            |filter| {
                builder.parse(filter).map_err(|e| LoggerError::InvalidConfiguration {
                    message: format!("Invalid env filter '{filter}': {e}").into(),
                    context: None,
                })
            },
        )
    }
}

/// A handle to the initialized logging system.
///
/// Holds the background writer guard when file output is enabled.
#[must_use = "Dropping this handle will stop background logging threads."]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    /// Returns a new [`LoggerBuilder`]. `name` prefixes the log file.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn builder(name: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder {
            name: name.into(),
            level: LevelFilter::INFO,
            env_filter: None,
            console: true,
            ansi: true,
            json: false,
            stderr: false,
            directory: None,
        }
    }

    /// Returns `true` when logs are also written to a file.
    #[must_use]
    pub const fn has_file_output(&self) -> bool {
        self.guard.is_some()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::debug!("Logging system shutting down, flushing buffers...");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    #[serial]
    fn builder_defaults() {
        let builder = Logger::builder("gpm-test");
        assert!(builder.console);
        assert!(builder.ansi);
        assert!(!builder.json);
        assert!(!builder.stderr);
        assert_eq!(builder.level, LevelFilter::INFO);
        assert!(builder.env_filter.is_none());
        assert!(builder.directory.is_none());
    }

    #[test]
    #[serial]
    fn empty_name_is_rejected() {
        let err = Logger::builder("  ").init().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    #[serial]
    fn no_outputs_is_rejected() {
        let err = Logger::builder("gpm-test").console(false).init().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    #[serial]
    fn invalid_filter_is_rejected() {
        let err = Logger::builder("gpm-test").env_filter("gpm=verbose").init().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    #[serial]
    fn file_output_writes_named_log() -> Result<(), LoggerError> {
        let tmp_dir = tempdir()?;
        let log_dir = tmp_dir.path().join("logs");

        let logger = Logger::builder("gpm-test")
            .console(false)
            .file(&log_dir)
            .level(LevelFilter::INFO)
            .init()?;
        assert!(logger.has_file_output());

        tracing::info!("hello world");
        std::thread::sleep(Duration::from_millis(20));
        drop(logger);

        assert!(log_dir.join("gpm-test.log").exists(), "log file should be named after the logger");
        Ok(())
    }
}
