//! mesoscale-controller — the hysteresis-based control loop.
//!
//! Converts the noisy per-cycle stream of directional signals produced by a
//! scaling mode into debounced scale actions with clamped instance bounds.
//! One [`ControlLoop`] owns one [`Hysteresis`] and one mode instance;
//! monitoring several applications means running several fully independent
//! loops with nothing shared.

pub mod control;
pub mod hysteresis;
pub mod target;

pub use control::{ControlLoop, CycleOutcome};
pub use hysteresis::Hysteresis;
pub use target::target_instances;
