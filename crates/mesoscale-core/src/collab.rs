//! Collaborator contracts consumed by the decision engine.
//!
//! The engine treats the metrics source, the application inventory, and the
//! actuator as external systems behind these traits. Timeout policy belongs
//! to the implementation, not the engine: a hung call blocks the control
//! loop until the implementation resolves it.

use async_trait::async_trait;

use crate::error::ScaleResult;
use crate::types::{AppSnapshot, TaskStats};

/// Source of per-task resource statistics and queue depths.
#[async_trait]
pub trait MetricsSource: Send + Sync {
    /// Memory statistics for one task, or `None` if the agent has not
    /// reported any yet.
    async fn task_stats(&self, agent: &str, task: &str) -> ScaleResult<Option<TaskStats>>;

    /// Current CPU utilization for one task, as a percentage.
    async fn cpu_usage(&self, agent: &str, task: &str) -> ScaleResult<f64>;

    /// Current depth of the referenced queue.
    async fn queue_depth(&self, queue: &str) -> ScaleResult<f64>;
}

/// Resolves an application name to its current deployment state.
#[async_trait]
pub trait AppInventory: Send + Sync {
    /// Current instance count and task → agent map, or `None` if the
    /// application does not exist.
    async fn snapshot(&self, app: &str) -> ScaleResult<Option<AppSnapshot>>;
}

/// Applies a new instance count to the orchestrated application.
#[async_trait]
pub trait Actuator: Send + Sync {
    async fn set_instances(&self, app: &str, target: u32) -> ScaleResult<()>;
}
