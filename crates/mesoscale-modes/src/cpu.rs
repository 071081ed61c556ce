//! CPU scaling mode — mean per-task CPU utilization.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use mesoscale_core::{
    AppSnapshot, MetricsSource, Range, ScaleError, ScaleResult, Signal,
};

use crate::ScalingMode;

/// Scales on the mean CPU utilization percentage across all of the
/// application's tasks.
pub struct CpuMode {
    metrics: Arc<dyn MetricsSource>,
    app: String,
    range: Range,
}

impl CpuMode {
    pub fn new(metrics: Arc<dyn MetricsSource>, app: impl Into<String>, range: Range) -> Self {
        Self {
            metrics,
            app: app.into(),
            range,
        }
    }

    /// Mean CPU percentage across the snapshot's tasks.
    ///
    /// An empty task map means there is nothing to average over; that is
    /// `NoMetricData`, never a silent division by zero.
    pub async fn sample(&self, snapshot: &AppSnapshot) -> ScaleResult<f64> {
        if snapshot.tasks.is_empty() {
            return Err(ScaleError::NoMetricData(format!(
                "no task data found for app {}",
                self.app
            )));
        }

        let mut total = 0.0;
        for (task, agent) in &snapshot.tasks {
            let usage = self.metrics.cpu_usage(agent, task).await?;
            debug!(%task, %agent, usage, "task cpu usage");
            total += usage;
        }

        let avg = total / snapshot.tasks.len() as f64;
        info!(app = %self.app, avg_cpu = avg, "current average cpu utilization");
        Ok(avg)
    }
}

#[async_trait]
impl ScalingMode for CpuMode {
    async fn direction(&self, snapshot: &AppSnapshot) -> ScaleResult<Signal> {
        let sample = self.sample(snapshot).await?;
        Ok(self.range.direction(sample))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use mesoscale_core::TaskStats;

    /// Metrics source that serves a fixed cpu percentage per task id.
    struct FixedCpu(HashMap<String, f64>);

    #[async_trait]
    impl MetricsSource for FixedCpu {
        async fn task_stats(&self, _agent: &str, _task: &str) -> ScaleResult<Option<TaskStats>> {
            Ok(None)
        }

        async fn cpu_usage(&self, _agent: &str, task: &str) -> ScaleResult<f64> {
            self.0
                .get(task)
                .copied()
                .ok_or_else(|| ScaleError::NoMetricData(format!("unknown task {task}")))
        }

        async fn queue_depth(&self, _queue: &str) -> ScaleResult<f64> {
            Ok(0.0)
        }
    }

    fn snapshot(tasks: &[&str]) -> AppSnapshot {
        AppSnapshot {
            instances: 2,
            tasks: tasks
                .iter()
                .map(|t| (t.to_string(), "agent-1".to_string()))
                .collect(),
        }
    }

    fn cpu_mode(values: &[(&str, f64)], min: f64, max: f64) -> CpuMode {
        let source = FixedCpu(
            values
                .iter()
                .map(|(t, v)| (t.to_string(), *v))
                .collect(),
        );
        CpuMode::new(Arc::new(source), "/web", Range::new(min, max).unwrap())
    }

    #[tokio::test]
    async fn averages_across_tasks() {
        let mode = cpu_mode(&[("a", 40.0), ("b", 60.0)], 20.0, 80.0);
        let sample = mode.sample(&snapshot(&["a", "b"])).await.unwrap();
        assert!((sample - 50.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn empty_task_map_is_no_metric_data() {
        let mode = cpu_mode(&[], 20.0, 80.0);
        let err = mode.direction(&snapshot(&[])).await.unwrap_err();
        assert!(matches!(err, ScaleError::NoMetricData(_)));
    }

    #[tokio::test]
    async fn direction_reflects_range() {
        let mode = cpu_mode(&[("a", 90.0)], 20.0, 80.0);
        assert_eq!(
            mode.direction(&snapshot(&["a"])).await.unwrap(),
            Signal::Above
        );

        let mode = cpu_mode(&[("a", 10.0)], 20.0, 80.0);
        assert_eq!(
            mode.direction(&snapshot(&["a"])).await.unwrap(),
            Signal::Below
        );
    }

    #[tokio::test]
    async fn task_fetch_failure_propagates() {
        // Snapshot names a task the source has never heard of.
        let mode = cpu_mode(&[("a", 50.0)], 20.0, 80.0);
        let err = mode.direction(&snapshot(&["a", "ghost"])).await.unwrap_err();
        assert!(matches!(err, ScaleError::NoMetricData(_)));
    }
}
