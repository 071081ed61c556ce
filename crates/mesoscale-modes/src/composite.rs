//! Composite AND/OR modes over two sub-modes.
//!
//! Each sub-mode carries its own independent range. Both sub-modes are
//! sampled before the signals are combined; if either sampling fails the
//! composite fails with the same error, never a partial evaluation.

use async_trait::async_trait;

use mesoscale_core::{AppSnapshot, ScaleResult, Signal};

use crate::ScalingMode;

/// Scales only when both tracked dimensions agree: Above iff both sub-modes
/// are Above, Below iff both are Below, otherwise Within.
pub struct AndMode {
    a: Box<dyn ScalingMode>,
    b: Box<dyn ScalingMode>,
}

impl AndMode {
    pub fn new(a: Box<dyn ScalingMode>, b: Box<dyn ScalingMode>) -> Self {
        Self { a, b }
    }
}

#[async_trait]
impl ScalingMode for AndMode {
    async fn direction(&self, snapshot: &AppSnapshot) -> ScaleResult<Signal> {
        let a = self.a.direction(snapshot).await?;
        let b = self.b.direction(snapshot).await?;
        Ok(match (a, b) {
            (Signal::Above, Signal::Above) => Signal::Above,
            (Signal::Below, Signal::Below) => Signal::Below,
            _ => Signal::Within,
        })
    }
}

/// Scales on the first dimension that crosses its threshold: Above if
/// either sub-mode is Above, Below if either is Below and neither is Above,
/// otherwise Within.
///
/// When one sub-mode reports Above while the other reports Below, Above
/// wins: scaling up is prioritized over scaling down to protect
/// availability. Load-bearing policy, not an accident of match ordering.
pub struct OrMode {
    a: Box<dyn ScalingMode>,
    b: Box<dyn ScalingMode>,
}

impl OrMode {
    pub fn new(a: Box<dyn ScalingMode>, b: Box<dyn ScalingMode>) -> Self {
        Self { a, b }
    }
}

#[async_trait]
impl ScalingMode for OrMode {
    async fn direction(&self, snapshot: &AppSnapshot) -> ScaleResult<Signal> {
        let a = self.a.direction(snapshot).await?;
        let b = self.b.direction(snapshot).await?;
        Ok(match (a, b) {
            (Signal::Above, _) | (_, Signal::Above) => Signal::Above,
            (Signal::Below, _) | (_, Signal::Below) => Signal::Below,
            _ => Signal::Within,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use mesoscale_core::ScaleError;

    /// Sub-mode that always reports the same signal.
    struct Fixed(Signal);

    #[async_trait]
    impl ScalingMode for Fixed {
        async fn direction(&self, _snapshot: &AppSnapshot) -> ScaleResult<Signal> {
            Ok(self.0)
        }
    }

    /// Sub-mode whose sampling always fails.
    struct Failing;

    #[async_trait]
    impl ScalingMode for Failing {
        async fn direction(&self, _snapshot: &AppSnapshot) -> ScaleResult<Signal> {
            Err(ScaleError::NoMetricData("agent unreachable".into()))
        }
    }

    fn sub(signal: Signal) -> Box<dyn ScalingMode> {
        Box::new(Fixed(signal))
    }

    async fn and(a: Signal, b: Signal) -> Signal {
        AndMode::new(sub(a), sub(b))
            .direction(&AppSnapshot::default())
            .await
            .unwrap()
    }

    async fn or(a: Signal, b: Signal) -> Signal {
        OrMode::new(sub(a), sub(b))
            .direction(&AppSnapshot::default())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn and_requires_both_to_agree() {
        assert_eq!(and(Signal::Above, Signal::Above).await, Signal::Above);
        assert_eq!(and(Signal::Below, Signal::Below).await, Signal::Below);
        assert_eq!(and(Signal::Above, Signal::Within).await, Signal::Within);
        assert_eq!(and(Signal::Within, Signal::Below).await, Signal::Within);
        assert_eq!(and(Signal::Above, Signal::Below).await, Signal::Within);
    }

    #[tokio::test]
    async fn or_fires_on_either_side() {
        assert_eq!(or(Signal::Above, Signal::Within).await, Signal::Above);
        assert_eq!(or(Signal::Within, Signal::Above).await, Signal::Above);
        assert_eq!(or(Signal::Below, Signal::Within).await, Signal::Below);
        assert_eq!(or(Signal::Within, Signal::Below).await, Signal::Below);
        assert_eq!(or(Signal::Within, Signal::Within).await, Signal::Within);
    }

    #[tokio::test]
    async fn or_prioritizes_above_over_simultaneous_below() {
        assert_eq!(or(Signal::Above, Signal::Below).await, Signal::Above);
        assert_eq!(or(Signal::Below, Signal::Above).await, Signal::Above);
    }

    #[tokio::test]
    async fn sub_mode_failure_propagates_unchanged() {
        let snapshot = AppSnapshot::default();

        let err = AndMode::new(sub(Signal::Above), Box::new(Failing))
            .direction(&snapshot)
            .await
            .unwrap_err();
        assert!(matches!(err, ScaleError::NoMetricData(_)));

        let err = OrMode::new(Box::new(Failing), sub(Signal::Below))
            .direction(&snapshot)
            .await
            .unwrap_err();
        assert!(matches!(err, ScaleError::NoMetricData(_)));
    }
}
