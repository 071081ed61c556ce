//! Consecutive-signal streak tracking.

use tracing::{debug, info};

use mesoscale_core::{ScaleAction, Signal};

/// Streak state for one control loop.
///
/// An action fires only after the configured number of consecutive
/// same-direction signals. At most one of the two counters is non-zero:
/// an opposing signal clears the other side's accumulated streak
/// immediately (no partial credit across direction reversals), a `Within`
/// signal clears both, and firing an action resets to idle.
#[derive(Debug)]
pub struct Hysteresis {
    scale_up_factor: u32,
    cool_down_factor: u32,
    scale_up_streak: u32,
    cool_down_streak: u32,
}

impl Hysteresis {
    pub fn new(scale_up_factor: u32, cool_down_factor: u32) -> Self {
        Self {
            scale_up_factor,
            cool_down_factor,
            scale_up_streak: 0,
            cool_down_streak: 0,
        }
    }

    /// Feed one cycle's signal and return the action to take.
    pub fn observe(&mut self, signal: Signal) -> ScaleAction {
        match signal {
            Signal::Above => {
                self.scale_up_streak += 1;
                self.cool_down_streak = 0;
                if self.scale_up_streak >= self.scale_up_factor {
                    info!(
                        streak = self.scale_up_streak,
                        "scale-up streak reached threshold"
                    );
                    self.scale_up_streak = 0;
                    ScaleAction::Up
                } else {
                    info!(
                        streak = self.scale_up_streak,
                        factor = self.scale_up_factor,
                        "above range, waiting to exceed scale-up factor"
                    );
                    ScaleAction::Hold
                }
            }
            Signal::Below => {
                self.cool_down_streak += 1;
                self.scale_up_streak = 0;
                if self.cool_down_streak >= self.cool_down_factor {
                    info!(
                        streak = self.cool_down_streak,
                        "cool-down streak reached threshold"
                    );
                    self.cool_down_streak = 0;
                    ScaleAction::Down
                } else {
                    info!(
                        streak = self.cool_down_streak,
                        factor = self.cool_down_factor,
                        "below range, waiting to exceed cool-down factor"
                    );
                    ScaleAction::Hold
                }
            }
            Signal::Within => {
                debug!("within range, streaks cleared");
                self.scale_up_streak = 0;
                self.cool_down_streak = 0;
                ScaleAction::Hold
            }
        }
    }

    /// Current `(scale_up, cool_down)` streaks.
    pub fn streaks(&self) -> (u32, u32) {
        (self.scale_up_streak, self.cool_down_streak)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_after_exact_streak_then_resets() {
        let mut hysteresis = Hysteresis::new(3, 3);
        assert_eq!(hysteresis.observe(Signal::Above), ScaleAction::Hold);
        assert_eq!(hysteresis.observe(Signal::Above), ScaleAction::Hold);
        assert_eq!(hysteresis.observe(Signal::Above), ScaleAction::Up);
        assert_eq!(hysteresis.streaks(), (0, 0));

        // Continued pressure builds a fresh streak, no immediate re-fire.
        assert_eq!(hysteresis.observe(Signal::Above), ScaleAction::Hold);
        assert_eq!(hysteresis.observe(Signal::Above), ScaleAction::Hold);
        assert_eq!(hysteresis.observe(Signal::Above), ScaleAction::Up);
    }

    #[test]
    fn within_clears_a_building_streak() {
        let mut hysteresis = Hysteresis::new(3, 3);
        assert_eq!(hysteresis.observe(Signal::Above), ScaleAction::Hold);
        assert_eq!(hysteresis.observe(Signal::Above), ScaleAction::Hold);
        assert_eq!(hysteresis.observe(Signal::Within), ScaleAction::Hold);
        assert_eq!(hysteresis.streaks(), (0, 0));

        // The earlier near-threshold streak earns no credit.
        assert_eq!(hysteresis.observe(Signal::Above), ScaleAction::Hold);
    }

    #[test]
    fn reversal_clears_the_opposing_streak() {
        let mut hysteresis = Hysteresis::new(3, 2);
        assert_eq!(hysteresis.observe(Signal::Above), ScaleAction::Hold);
        assert_eq!(hysteresis.observe(Signal::Above), ScaleAction::Hold);
        assert_eq!(hysteresis.observe(Signal::Below), ScaleAction::Hold);
        assert_eq!(hysteresis.streaks(), (0, 1));
        assert_eq!(hysteresis.observe(Signal::Below), ScaleAction::Down);
        assert_eq!(hysteresis.streaks(), (0, 0));
    }

    #[test]
    fn at_most_one_counter_is_ever_nonzero() {
        let mut hysteresis = Hysteresis::new(5, 5);
        for signal in [
            Signal::Above,
            Signal::Above,
            Signal::Below,
            Signal::Above,
            Signal::Within,
            Signal::Below,
        ] {
            hysteresis.observe(signal);
            let (up, down) = hysteresis.streaks();
            assert!(up == 0 || down == 0);
        }
    }

    #[test]
    fn factor_of_one_fires_immediately() {
        let mut hysteresis = Hysteresis::new(1, 1);
        assert_eq!(hysteresis.observe(Signal::Above), ScaleAction::Up);
        assert_eq!(hysteresis.observe(Signal::Below), ScaleAction::Down);
    }
}
