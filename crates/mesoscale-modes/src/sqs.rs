//! Queue-depth scaling mode.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use mesoscale_core::{AppSnapshot, MetricsSource, Range, ScaleResult, Signal};

use crate::ScalingMode;

/// Scales on the depth of a single queue.
///
/// No per-task aggregation: the queue itself is the tracked dimension, so
/// the application snapshot is ignored. Any fetch failure propagates as
/// `NoMetricData`.
pub struct SqsMode {
    metrics: Arc<dyn MetricsSource>,
    queue: String,
    range: Range,
}

impl SqsMode {
    pub fn new(metrics: Arc<dyn MetricsSource>, queue: impl Into<String>, range: Range) -> Self {
        Self {
            metrics,
            queue: queue.into(),
            range,
        }
    }
}

#[async_trait]
impl ScalingMode for SqsMode {
    async fn direction(&self, _snapshot: &AppSnapshot) -> ScaleResult<Signal> {
        let depth = self.metrics.queue_depth(&self.queue).await?;
        debug!(queue = %self.queue, depth, "queue depth sampled");
        Ok(self.range.direction(depth))
    }
}
