//! Autoscaler configuration: validated at startup, immutable for the run.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::Range;

/// Which metric(s) drive scaling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerMode {
    /// Average CPU utilization across tasks.
    Cpu,
    /// Average memory utilization across tasks.
    Mem,
    /// Queue depth.
    Sqs,
    /// CPU and memory must agree before scaling.
    And,
    /// Either CPU or memory crossing its threshold triggers scaling.
    Or,
}

impl TriggerMode {
    /// Number of range dimensions the mode consumes.
    pub fn dimensions(&self) -> usize {
        match self {
            TriggerMode::And | TriggerMode::Or => 2,
            _ => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerMode::Cpu => "cpu",
            TriggerMode::Mem => "mem",
            TriggerMode::Sqs => "sqs",
            TriggerMode::And => "and",
            TriggerMode::Or => "or",
        }
    }
}

impl FromStr for TriggerMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cpu" => Ok(TriggerMode::Cpu),
            "mem" => Ok(TriggerMode::Mem),
            "sqs" => Ok(TriggerMode::Sqs),
            "and" => Ok(TriggerMode::And),
            "or" => Ok(TriggerMode::Or),
            other => Err(ConfigError::UnknownTrigger(other.to_string())),
        }
    }
}

/// Parameters fixed at startup. Read-only during the run; one config
/// belongs to exactly one control loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoscalerConfig {
    /// Application name, normalized to a leading slash.
    pub app: String,
    pub trigger: TriggerMode,
    /// Multiplicative factor applied to the instance count on each scale
    /// action. Must be greater than 1.0.
    pub multiplier: f64,
    /// Minimum number of instances to maintain.
    pub min_instances: u32,
    /// Maximum number of instances that may ever exist.
    pub max_instances: u32,
    /// Consecutive above-range cycles required before scaling up.
    pub scale_up_factor: u32,
    /// Consecutive below-range cycles required before scaling down.
    pub cool_down_factor: u32,
    /// Seconds between evaluation cycles.
    pub interval_secs: u64,
    /// Lower range bound per tracked dimension (two for composite modes).
    pub min_range: Vec<f64>,
    /// Upper range bound per tracked dimension.
    pub max_range: Vec<f64>,
    /// Queue reference for the sqs trigger mode.
    #[serde(default)]
    pub queue: Option<String>,
}

impl AutoscalerConfig {
    /// Load and validate a configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: AutoscalerConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field invariants. Called once at startup; a failure
    /// here is the only fatal error class in the system.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.multiplier <= 1.0 {
            return Err(ConfigError::Multiplier(self.multiplier));
        }
        if self.max_instances < self.min_instances {
            return Err(ConfigError::InstanceBounds {
                min: self.min_instances,
                max: self.max_instances,
            });
        }
        if self.scale_up_factor < 1 {
            return Err(ConfigError::ZeroFactor("scale_up_factor"));
        }
        if self.cool_down_factor < 1 {
            return Err(ConfigError::ZeroFactor("cool_down_factor"));
        }
        if self.interval_secs == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if self.trigger == TriggerMode::Sqs && self.queue.is_none() {
            return Err(ConfigError::MissingQueue);
        }
        self.ranges()?;
        Ok(())
    }

    /// The configured `[min, max]` band for each tracked dimension.
    ///
    /// Leaf modes consume one dimension, composite modes two (index 0 is
    /// cpu, index 1 is mem).
    pub fn ranges(&self) -> Result<Vec<Range>, ConfigError> {
        let want = self.trigger.dimensions();
        let got = self.min_range.len().min(self.max_range.len());
        if got < want {
            return Err(ConfigError::RangeArity {
                mode: self.trigger.as_str(),
                expected: want,
                got,
            });
        }
        (0..want)
            .map(|i| Range::new(self.min_range[i], self.max_range[i]))
            .collect()
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Normalize an app name to the orchestrator's absolute form.
    pub fn normalize_app(name: &str) -> String {
        if name.starts_with('/') {
            name.to_string()
        } else {
            format!("/{name}")
        }
    }
}
