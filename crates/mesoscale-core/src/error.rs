//! Error types for the mesoscale decision engine.

use thiserror::Error;

/// Result type alias for evaluation-cycle operations.
pub type ScaleResult<T> = Result<T, ScaleError>;

/// Errors that can occur during a single evaluation cycle.
///
/// Every variant is recoverable: the control loop logs it, skips the rest
/// of the cycle, and re-evaluates fresh on the next interval. None of these
/// ever terminate the process.
#[derive(Debug, Error)]
pub enum ScaleError {
    /// No data available to compute a sample (empty task set, unreachable
    /// source).
    #[error("no metric data: {0}")]
    NoMetricData(String),

    /// Data was present but semantically invalid, e.g. a reported memory
    /// limit of zero making the utilization ratio undefined.
    #[error("invalid metric for task {task} on agent {agent}: {reason}")]
    InvalidMetric {
        task: String,
        agent: String,
        reason: String,
    },

    /// The inventory has no record of the target application.
    #[error("application not found: {0}")]
    AppNotFound(String),

    /// The actuator rejected or failed the instance-count change.
    #[error("actuation failed for {app}: {reason}")]
    Actuation { app: String, reason: String },
}

/// Unrecoverable configuration errors detected at startup.
///
/// These are the only errors that are fatal to the process.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("range min {min} is greater than max {max}")]
    InvertedRange { min: f64, max: f64 },

    #[error("scale multiplier must be greater than 1.0, got {0}")]
    Multiplier(f64),

    #[error("max_instances {max} is less than min_instances {min}")]
    InstanceBounds { min: u32, max: u32 },

    #[error("{0} must be at least 1")]
    ZeroFactor(&'static str),

    #[error("poll interval must be greater than zero")]
    ZeroInterval,

    #[error("trigger mode {mode} requires {expected} range dimension(s), got {got}")]
    RangeArity {
        mode: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("unknown trigger mode: {0}")]
    UnknownTrigger(String),

    #[error("sqs trigger mode requires a queue reference")]
    MissingQueue,

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}
