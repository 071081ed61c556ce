//! mesoscale-modes — pluggable scaling-mode strategies.
//!
//! A [`ScalingMode`] turns the current state of one metric dimension into a
//! directional [`Signal`] once per evaluation cycle. Leaf modes (cpu, mem,
//! sqs) aggregate a sample and compare it against a configured `Range`;
//! composite modes own two sub-modes and combine their signals with AND/OR
//! policy.
//!
//! Modes are stateless between cycles: samples and signals are derived
//! fresh each time and discarded.

pub mod composite;
pub mod cpu;
pub mod mem;
pub mod sqs;

mod factory;

pub use composite::{AndMode, OrMode};
pub use cpu::CpuMode;
pub use factory::build_mode;
pub use mem::MemoryMode;
pub use sqs::SqsMode;

use async_trait::async_trait;
use mesoscale_core::{AppSnapshot, ScaleResult, Signal};

/// A scaling strategy: one directional verdict per evaluation cycle.
#[async_trait]
pub trait ScalingMode: Send + Sync {
    /// Sample the tracked metric(s) for the given snapshot and compare
    /// against the configured range(s).
    async fn direction(&self, snapshot: &AppSnapshot) -> ScaleResult<Signal>;
}
