//! Domain types shared across mesoscale crates.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Directional verdict for one metric sample against its configured range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Sample is below the range minimum.
    Below,
    /// Sample sits inside the range (boundaries included).
    Within,
    /// Sample is above the range maximum.
    Above,
}

/// The debounced decision emitted by the hysteresis controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleAction {
    /// Grow the instance count.
    Up,
    /// Shrink the instance count.
    Down,
    /// Leave the instance count unchanged.
    Hold,
}

/// Inclusive `[min, max]` band for one metric dimension.
///
/// Constructed once at startup and immutable for the lifetime of the
/// scaling mode that owns it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    min: f64,
    max: f64,
}

impl Range {
    /// Create a range, rejecting an inverted pair.
    pub fn new(min: f64, max: f64) -> Result<Self, ConfigError> {
        if min > max {
            return Err(ConfigError::InvertedRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Compare a sample against the band.
    ///
    /// Boundary values are `Within`: a sample sitting exactly on a
    /// threshold is not evidence in either direction.
    pub fn direction(&self, sample: f64) -> Signal {
        if sample > self.max {
            Signal::Above
        } else if sample < self.min {
            Signal::Below
        } else {
            Signal::Within
        }
    }
}

/// Memory statistics for one task, as reported by its agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStats {
    pub mem_rss_bytes: u64,
    pub mem_limit_bytes: u64,
}

/// Per-cycle view of the scaled application: current instance count and
/// the task → agent map. Fetched fresh at the start of every cycle and
/// discarded once the cycle's signal is derived.
#[derive(Debug, Clone, Default)]
pub struct AppSnapshot {
    pub instances: u32,
    pub tasks: HashMap<String, String>,
}
