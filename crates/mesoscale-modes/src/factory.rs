//! Builds a scaling mode from the validated configuration.

use std::sync::Arc;

use mesoscale_core::{AutoscalerConfig, ConfigError, MetricsSource, TriggerMode};

use crate::{AndMode, CpuMode, MemoryMode, OrMode, ScalingMode, SqsMode};

/// Instantiate the configured trigger mode.
///
/// Composite modes pair CPU (dimension 0) with memory (dimension 1), each
/// with its own range.
pub fn build_mode(
    config: &AutoscalerConfig,
    metrics: Arc<dyn MetricsSource>,
) -> Result<Box<dyn ScalingMode>, ConfigError> {
    let ranges = config.ranges()?;

    let mode: Box<dyn ScalingMode> = match config.trigger {
        TriggerMode::Cpu => Box::new(CpuMode::new(metrics, config.app.as_str(), ranges[0])),
        TriggerMode::Mem => Box::new(MemoryMode::new(metrics, config.app.as_str(), ranges[0])),
        TriggerMode::Sqs => {
            let queue = config.queue.clone().ok_or(ConfigError::MissingQueue)?;
            Box::new(SqsMode::new(metrics, queue, ranges[0]))
        }
        TriggerMode::And => Box::new(AndMode::new(
            Box::new(CpuMode::new(metrics.clone(), config.app.as_str(), ranges[0])),
            Box::new(MemoryMode::new(metrics, config.app.as_str(), ranges[1])),
        )),
        TriggerMode::Or => Box::new(OrMode::new(
            Box::new(CpuMode::new(metrics.clone(), config.app.as_str(), ranges[0])),
            Box::new(MemoryMode::new(metrics, config.app.as_str(), ranges[1])),
        )),
    };

    Ok(mode)
}
