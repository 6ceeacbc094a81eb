//! Logging setup.
//!
//! Logs go to stderr by default. The interactive terminal UI owns the screen,
//! so it logs to a file instead (or not at all). `RUST_LOG` overrides the
//! configured level unless the override is switched off.

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::{fmt, EnvFilter};

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Trace level - most verbose
    Trace,
    /// Debug level
    Debug,
    /// Info level
    Info,
    /// Warning level (default)
    #[default]
    Warn,
    /// Error level - least verbose
    Error,
    /// Disable logging entirely
    Off,
}

impl LogLevel {
    fn directive(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }
}

impl From<u8> for LogLevel {
    /// Convert verbosity count to log level.
    /// 0 = Warn, 1 = Info, 2 = Debug, 3+ = Trace
    fn from(verbosity: u8) -> Self {
        match verbosity {
            0 => LogLevel::Warn,
            1 => LogLevel::Info,
            2 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }
}

/// Where log lines are written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LogTarget {
    /// Standard error
    #[default]
    Stderr,
    /// Append to a file
    File(PathBuf),
}

/// Configuration for logging.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// The log level to use
    pub level: LogLevel,
    /// Where to write
    pub target: LogTarget,
    /// Whether to include timestamps
    pub with_timestamps: bool,
    /// Whether to include the target (module path)
    pub with_target: bool,
    /// Whether `RUST_LOG` may override `level`
    pub env_override: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            target: LogTarget::Stderr,
            with_timestamps: true,
            with_target: true,
            env_override: true,
        }
    }
}

impl LoggingConfig {
    /// Create a new logging configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the log level.
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Set the output target.
    pub fn with_output(mut self, target: LogTarget) -> Self {
        self.target = target;
        self
    }

    /// Set whether to include timestamps.
    pub fn with_timestamps(mut self, enabled: bool) -> Self {
        self.with_timestamps = enabled;
        self
    }

    /// Set whether to include the target (module path).
    pub fn with_target(mut self, enabled: bool) -> Self {
        self.with_target = enabled;
        self
    }

    /// Set whether `RUST_LOG` overrides the configured level.
    pub fn with_env_override(mut self, enabled: bool) -> Self {
        self.env_override = enabled;
        self
    }

    /// Create a configuration from a verbosity count.
    pub fn from_verbosity(verbosity: u8) -> Self {
        Self::default().with_level(LogLevel::from(verbosity))
    }

    fn filter_directives(&self, rust_log: Option<String>) -> String {
        match rust_log {
            Some(directives) if self.env_override => directives,
            _ => self.level.directive().to_string(),
        }
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::new(self.filter_directives(std::env::var("RUST_LOG").ok()))
    }
}

/// Initialize logging. Call once at startup.
///
/// Fails only when a log file cannot be opened.
pub fn init_logging(config: LoggingConfig) -> io::Result<()> {
    let builder = fmt::Subscriber::builder()
        .with_env_filter(config.env_filter())
        .with_target(config.with_target);

    match &config.target {
        LogTarget::Stderr => {
            let builder = builder.with_writer(io::stderr);
            if config.with_timestamps {
                builder.init();
            } else {
                builder.without_time().init();
            }
        }
        LogTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let builder = builder.with_writer(Mutex::new(file)).with_ansi(false);
            if config.with_timestamps {
                builder.init();
            } else {
                builder.without_time().init();
            }
        }
    }
    Ok(())
}
