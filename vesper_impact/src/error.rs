//! Error taxonomy for the impact engine.
//!
//! Configuration errors are reported at construction, usage errors at
//! lifecycle entry points. Name-resolution failures and malformed literal
//! shapes are *not* errors anywhere in this crate; they reduce to `None` /
//! "no match" by contract.

use std::thread::ThreadId;

/// Errors in collector/mapper configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The filter root path is missing or empty.
    MissingRoot,

    /// Allocation tracing requested with single-threaded scope.
    /// Object-creation events are process-wide; a single-thread collector
    /// cannot attribute them.
    AllocationTracingUnsupported,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRoot => write!(f, "root path is required"),
            Self::AllocationTracingUnsupported => {
                write!(f, "allocation tracing requires multi-threaded mode")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors in collector lifecycle usage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    /// `stop` called on a collector that was never started.
    NotRunning,

    /// `start` called on a collector that is already running.
    AlreadyRunning,

    /// A single-threaded collector was stopped from a thread other than
    /// the one that started it.
    WrongThread {
        /// Thread that armed the hooks.
        started: ThreadId,
        /// Thread that attempted the stop.
        stopped: ThreadId,
    },
}

impl std::fmt::Display for UsageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotRunning => write!(f, "collector is not running"),
            Self::AlreadyRunning => write!(f, "collector is already running"),
            Self::WrongThread { started, stopped } => write!(
                f,
                "single-threaded collector started on {started:?} cannot be stopped from {stopped:?}"
            ),
        }
    }
}

impl std::error::Error for UsageError {}

/// Any error from the coverage collector lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverageError {
    /// Configuration rejected.
    Config(ConfigError),
    /// Lifecycle misuse.
    Usage(UsageError),
}

impl std::fmt::Display for CoverageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => err.fmt(f),
            Self::Usage(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for CoverageError {}

impl From<ConfigError> for CoverageError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<UsageError> for CoverageError {
    fn from(err: UsageError) -> Self {
        Self::Usage(err)
    }
}

/// Errors from the static dependency mapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapperError {
    /// `populate` called without a root path.
    RootRequired,
}

impl std::fmt::Display for MapperError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RootRequired => write!(f, "root path must be a non-empty string"),
        }
    }
}

impl std::error::Error for MapperError {}

/// Result alias for collector operations.
pub type CoverageResult<T> = Result<T, CoverageError>;

/// Result alias for mapper operations.
pub type MapperResult<T> = Result<T, MapperError>;
