//! Error types for Ripple.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// The main error type for Ripple core operations.
#[derive(Debug)]
pub enum RippleError {
    /// Scheduler-related error.
    Scheduler(SchedulerError),
    /// Configuration-related error.
    Config(ConfigError),
}

impl fmt::Display for RippleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scheduler(err) => write!(f, "Scheduler error: {err}"),
            Self::Config(err) => write!(f, "Configuration error: {err}"),
        }
    }
}

impl std::error::Error for RippleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Scheduler(err) => Some(err),
            Self::Config(err) => Some(err),
        }
    }
}

/// Scheduler-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    /// The task ID is invalid or the task has already run.
    InvalidTaskId,
    /// The frame request ID is invalid or the callback has already run.
    InvalidFrameRequest,
    /// The timer ID is invalid or the timer has already fired.
    InvalidTimerId,
}

impl fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTaskId => write!(f, "Invalid or completed task ID"),
            Self::InvalidFrameRequest => write!(f, "Invalid or completed frame request"),
            Self::InvalidTimerId => write!(f, "Invalid or expired timer ID"),
        }
    }
}

impl std::error::Error for SchedulerError {}

impl From<SchedulerError> for RippleError {
    fn from(err: SchedulerError) -> Self {
        Self::Scheduler(err)
    }
}

/// Configuration loading errors.
#[derive(Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    Io {
        /// The file that was being read.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },
    /// The configuration text is not valid TOML for [`crate::RippleConfig`].
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Failed to read configuration '{}': {source}", path.display())
            }
            Self::Parse(err) => write!(f, "Invalid configuration: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        Self::Parse(err)
    }
}

impl From<ConfigError> for RippleError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// A specialized Result type for Ripple core operations.
pub type Result<T> = std::result::Result<T, RippleError>;
