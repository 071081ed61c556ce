//! Target instance-count calculation.

use tracing::debug;

use mesoscale_core::ScaleAction;

/// Compute the desired instance count for one action.
///
/// `Up` multiplies and rounds toward more capacity, `Down` divides and
/// rounds toward less. The result is clamped to the configured instance
/// bounds, so at the ceiling or floor the target can equal `current`;
/// the caller treats that as a no-op and skips actuation.
pub fn target_instances(
    current: u32,
    action: ScaleAction,
    multiplier: f64,
    min_instances: u32,
    max_instances: u32,
) -> u32 {
    let target = match action {
        ScaleAction::Up => {
            let desired = (current as f64 * multiplier).ceil() as u32;
            if desired > max_instances {
                debug!(max_instances, "reached the configured instance maximum");
            }
            desired.min(max_instances)
        }
        ScaleAction::Down => {
            let desired = (current as f64 / multiplier).floor() as u32;
            if desired < min_instances {
                debug!(min_instances, "reached the configured instance minimum");
            }
            desired.max(min_instances)
        }
        ScaleAction::Hold => current,
    };
    debug!(current, ?action, target, "target instances computed");
    target
}
