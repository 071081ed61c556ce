//! Memory scaling mode — mean RSS-over-limit utilization.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use mesoscale_core::{
    AppSnapshot, MetricsSource, Range, ScaleError, ScaleResult, Signal,
};

use crate::ScalingMode;

/// Scales on the mean memory utilization percentage (`100 × rss / limit`)
/// across all of the application's tasks.
pub struct MemoryMode {
    metrics: Arc<dyn MetricsSource>,
    app: String,
    range: Range,
}

impl MemoryMode {
    pub fn new(metrics: Arc<dyn MetricsSource>, app: impl Into<String>, range: Range) -> Self {
        Self {
            metrics,
            app: app.into(),
            range,
        }
    }

    /// Memory utilization for one task.
    ///
    /// A task with no reported statistics counts as 0 so that partial data
    /// degrades the average instead of aborting the cycle. A reported limit
    /// of zero is a data-integrity fault and fails the whole aggregation.
    async fn task_utilization(&self, task: &str, agent: &str) -> ScaleResult<f64> {
        let Some(stats) = self.metrics.task_stats(agent, task).await? else {
            debug!(%task, %agent, "no statistics reported yet, counting as 0");
            return Ok(0.0);
        };

        if stats.mem_limit_bytes == 0 {
            return Err(ScaleError::InvalidMetric {
                task: task.to_string(),
                agent: agent.to_string(),
                reason: "mem_limit_bytes is 0".to_string(),
            });
        }

        let utilization = 100.0 * stats.mem_rss_bytes as f64 / stats.mem_limit_bytes as f64;
        debug!(
            %task,
            %agent,
            rss = stats.mem_rss_bytes,
            limit = stats.mem_limit_bytes,
            utilization,
            "task memory usage"
        );
        Ok(utilization)
    }

    /// Mean memory utilization across the snapshot's tasks.
    pub async fn sample(&self, snapshot: &AppSnapshot) -> ScaleResult<f64> {
        if snapshot.tasks.is_empty() {
            return Err(ScaleError::NoMetricData(format!(
                "no task data found for app {}",
                self.app
            )));
        }

        let mut total = 0.0;
        for (task, agent) in &snapshot.tasks {
            total += self.task_utilization(task, agent).await?;
        }

        let avg = total / snapshot.tasks.len() as f64;
        info!(app = %self.app, avg_mem = avg, "current average memory utilization");
        Ok(avg)
    }
}

#[async_trait]
impl ScalingMode for MemoryMode {
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

    /// Metrics source with per-task memory stats; tasks absent from the map
    /// report no statistics at all.
    struct FixedMem(HashMap<String, TaskStats>);

    #[async_trait]
    impl MetricsSource for FixedMem {
        async fn task_stats(&self, _agent: &str, task: &str) -> ScaleResult<Option<TaskStats>> {
            Ok(self.0.get(task).copied())
        }

        async fn cpu_usage(&self, _agent: &str, _task: &str) -> ScaleResult<f64> {
            Ok(0.0)
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

    fn mode(stats: &[(&str, u64, u64)]) -> MemoryMode {
        let source = FixedMem(
            stats
                .iter()
                .map(|(t, rss, limit)| {
                    (
                        t.to_string(),
                        TaskStats {
                            mem_rss_bytes: *rss,
                            mem_limit_bytes: *limit,
                        },
                    )
                })
                .collect(),
        );
        MemoryMode::new(Arc::new(source), "/web", Range::new(20.0, 80.0).unwrap())
    }

    #[tokio::test]
    async fn averages_rss_over_limit() {
        let mode = mode(&[("a", 50, 100), ("b", 25, 100)]);
        let sample = mode.sample(&snapshot(&["a", "b"])).await.unwrap();
        assert!((sample - 37.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn missing_stats_count_as_zero() {
        // Task "b" has not reported yet; it degrades the average to 25.
        let mode = mode(&[("a", 50, 100)]);
        let sample = mode.sample(&snapshot(&["a", "b"])).await.unwrap();
        assert!((sample - 25.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn zero_limit_is_invalid_metric_naming_the_task() {
        let mode = mode(&[("a", 50, 100), ("b", 0, 0)]);
        let err = mode.sample(&snapshot(&["a", "b"])).await.unwrap_err();
        match err {
            ScaleError::InvalidMetric { task, agent, .. } => {
                assert_eq!(task, "b");
                assert_eq!(agent, "agent-1");
            }
            other => panic!("expected InvalidMetric, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_task_map_is_no_metric_data() {
        let mode = mode(&[]);
        let err = mode.direction(&snapshot(&[])).await.unwrap_err();
        assert!(matches!(err, ScaleError::NoMetricData(_)));
    }
}
