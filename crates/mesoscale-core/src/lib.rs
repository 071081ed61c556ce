//! mesoscale-core — shared types for the mesoscale autoscaler.
//!
//! Defines the domain vocabulary used by every other crate: the directional
//! [`Signal`], the inclusive [`Range`] it is derived from, the debounced
//! [`ScaleAction`], the per-cycle [`AppSnapshot`], and the validated
//! [`AutoscalerConfig`].
//!
//! The decision engine never talks to an orchestrator directly; it goes
//! through the [`collab`] traits so that tests (and alternative backends)
//! can substitute their own implementations.

pub mod collab;
pub mod config;
pub mod error;
pub mod types;

pub use collab::{Actuator, AppInventory, MetricsSource};
pub use config::{AutoscalerConfig, TriggerMode};
pub use error::{ConfigError, ScaleError, ScaleResult};
pub use types::*;
