//! The control loop: one evaluation cycle per poll interval.
//!
//! Data flows one direction per cycle: snapshot → signal → hysteresis →
//! action → target count → actuation. Each step returns a typed result
//! and the loop matches on the error kind; no failure ever escapes a
//! cycle or touches the streak counters.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use mesoscale_core::{Actuator, AppInventory, AutoscalerConfig, ScaleAction};
use mesoscale_modes::ScalingMode;

use crate::hysteresis::Hysteresis;
use crate::target::target_instances;

/// Typed outcome of a single evaluation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The application does not currently exist in the inventory.
    AppMissing,
    /// The snapshot or metric sample was unavailable; the cycle was
    /// skipped with the streaks untouched.
    Skipped,
    /// No action fired (within range, or a streak still building).
    Held,
    /// An action fired but the computed target equals the current count.
    AtBounds,
    /// The actuator was invoked with a new instance count.
    Scaled { from: u32, to: u32 },
    /// The actuator call failed; the decision stands and the next cycle
    /// re-evaluates fresh.
    ActuationFailed,
}

/// Drives scaling decisions for one application.
///
/// Owns its hysteresis state exclusively. Scaling out to several
/// applications means one `ControlLoop` per application, each with its own
/// streaks and ranges; no state is shared between loops.
pub struct ControlLoop {
    config: AutoscalerConfig,
    mode: Box<dyn ScalingMode>,
    inventory: Arc<dyn AppInventory>,
    actuator: Arc<dyn Actuator>,
    hysteresis: Hysteresis,
}

impl ControlLoop {
    pub fn new(
        config: AutoscalerConfig,
        mode: Box<dyn ScalingMode>,
        inventory: Arc<dyn AppInventory>,
        actuator: Arc<dyn Actuator>,
    ) -> Self {
        let hysteresis = Hysteresis::new(config.scale_up_factor, config.cool_down_factor);
        Self {
            config,
            mode,
            inventory,
            actuator,
            hysteresis,
        }
    }

    /// Run one evaluation cycle.
    pub async fn tick(&mut self) -> CycleOutcome {
        // A missing application is not evidence of any direction, so the
        // streaks are left alone.
        let snapshot = match self.inventory.snapshot(&self.config.app).await {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                warn!(app = %self.config.app, "application not found in inventory");
                return CycleOutcome::AppMissing;
            }
            Err(error) => {
                warn!(app = %self.config.app, %error, "snapshot fetch failed, skipping cycle");
                return CycleOutcome::Skipped;
            }
        };

        // Neither is a failed sample: NoMetricData and InvalidMetric both
        // skip the cycle with the streaks untouched.
        let signal = match self.mode.direction(&snapshot).await {
            Ok(signal) => signal,
            Err(error) => {
                warn!(app = %self.config.app, %error, "metric sampling failed, skipping cycle");
                return CycleOutcome::Skipped;
            }
        };
        debug!(app = %self.config.app, ?signal, "scaling mode direction");

        let action = self.hysteresis.observe(signal);
        if action == ScaleAction::Hold {
            return CycleOutcome::Held;
        }

        let current = snapshot.instances;
        let target = target_instances(
            current,
            action,
            self.config.multiplier,
            self.config.min_instances,
            self.config.max_instances,
        );
        if target == current {
            info!(app = %self.config.app, current, "already at instance bounds, no actuation");
            return CycleOutcome::AtBounds;
        }

        match self.actuator.set_instances(&self.config.app, target).await {
            Ok(()) => {
                info!(app = %self.config.app, from = current, to = target, "instance count updated");
                CycleOutcome::Scaled {
                    from: current,
                    to: target,
                }
            }
            Err(error) => {
                // Only the side effect failed; the streaks are not rolled
                // back.
                warn!(app = %self.config.app, target, %error, "actuation failed");
                CycleOutcome::ActuationFailed
            }
        }
    }

    /// Run cycles until the shutdown channel flips.
    ///
    /// Cycles never overlap: each one runs to completion before the sleep
    /// starts, and there is no natural termination.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!(
            app = %self.config.app,
            trigger = self.config.trigger.as_str(),
            interval_secs = self.config.interval_secs,
            "control loop started"
        );

        loop {
            let outcome = self.tick().await;
            debug!(app = %self.config.app, ?outcome, "cycle complete, sleeping");

            tokio::select! {
                _ = tokio::time::sleep(self.config.interval()) => {}
                _ = shutdown.changed() => {
                    info!(app = %self.config.app, "control loop shutting down");
                    break;
                }
            }
        }
    }
}
