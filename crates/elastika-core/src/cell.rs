//! Per-parameter real-time state.
//!
//! A [`ParamCell`] pairs an [`EngineParam`] with the [`LagFilter`] that
//! smooths it and the block-start snapshots used to decide whether the
//! smoothed value is pushed into the engine. Cells are owned by the audio
//! thread; nothing in here is shared.

use crate::engine::EngineParam;
use crate::host_params::HostParams;
use crate::lag::LagFilter;

/// Tolerance for the approximate comparisons behind [`PushPolicy`].
pub const PUSH_EPSILON: f32 = 1e-6;

/// When a cell's smoothed value is pushed into the engine.
///
/// The decision is made once per block from the snapshots taken in
/// [`ParamCell::update_lag`] and then applies to every sample of the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PushPolicy {
    /// Push while the smoothed value captured at block start is
    /// approximately equal to the new target.
    ///
    /// This compares the previous *smoothed value* with the new *target*,
    /// not the previous target with the new one. A parameter whose target
    /// just changed is therefore not pushed during the block that ramps to
    /// it, and a steady parameter is pushed on every sample.
    #[default]
    SnapshotMatchesTarget,
    /// Push only while the target differs from the one seen at the previous
    /// block boundary, or a ramp was still in flight at block start.
    ///
    /// A constant target is pushed during the block that reaches it and
    /// never again until it changes.
    TargetChanged,
}

/// Real-time state for one engine parameter.
#[derive(Debug, Clone)]
pub struct ParamCell {
    param: EngineParam,
    lag: LagFilter,
    /// Smoothed value captured at the last block boundary.
    last_value: f32,
    /// Lag target captured at the last block boundary, before retargeting.
    last_target: f32,
}

impl ParamCell {
    /// Create a settled cell at the parameter's default value.
    pub fn new(param: EngineParam) -> Self {
        let initial = param.default_value();
        Self {
            param,
            lag: LagFilter::new(initial),
            last_value: initial,
            last_target: initial,
        }
    }

    /// The parameter this cell smooths.
    #[inline]
    pub fn param(&self) -> EngineParam {
        self.param
    }

    /// Block-boundary update.
    ///
    /// Snapshots the current smoothed value and target, then hands the
    /// host's current target to the lag filter. Host changes that land
    /// mid-block are only seen here, at the next boundary.
    #[inline]
    pub fn update_lag(&mut self, host: &HostParams) {
        self.last_value = self.lag.current();
        self.last_target = self.lag.target();
        self.lag.new_value(host.get(self.param));
    }

    /// Advance the lag filter one sample and return the smoothed value.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        self.lag.process()
    }

    /// Whether this block's smoothed values go to the engine.
    #[inline]
    pub fn wants_push(&self, policy: PushPolicy) -> bool {
        let target = self.lag.target();
        match policy {
            PushPolicy::SnapshotMatchesTarget => approx_eq(self.last_value, target),
            PushPolicy::TargetChanged => {
                !approx_eq(self.last_target, target)
                    || !approx_eq(self.last_value, self.last_target)
            }
        }
    }

    /// Set the lag rate (see [`RateController`](crate::RateController)).
    #[inline]
    pub fn set_rate(&mut self, rate: f32) {
        self.lag.set_rate(rate);
    }

    /// Current smoothed value.
    #[inline]
    pub fn value(&self) -> f32 {
        self.lag.current()
    }

    /// Current lag target.
    #[inline]
    pub fn target(&self) -> f32 {
        self.lag.target()
    }

    /// Smoothed value snapshotted at the last block boundary.
    #[inline]
    pub fn last_value(&self) -> f32 {
        self.last_value
    }

    /// Target snapshotted at the last block boundary.
    #[inline]
    pub fn last_target(&self) -> f32 {
        self.last_target
    }

    /// The cell's lag filter.
    #[inline]
    pub fn lag(&self) -> &LagFilter {
        &self.lag
    }
}

#[inline]
fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() <= PUSH_EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_block(cell: &mut ParamCell, host: &HostParams, len: usize) {
        cell.set_rate(1.0 / len as f32);
        cell.update_lag(host);
        for _ in 0..len {
            cell.advance();
        }
    }

    #[test]
    fn new_cell_sits_at_default() {
        let cell = ParamCell::new(EngineParam::Span);
        assert_eq!(cell.param(), EngineParam::Span);
        assert_eq!(cell.value(), 0.5);
        assert_eq!(cell.last_value(), 0.5);
        assert_eq!(cell.last_target(), 0.5);
    }

    #[test]
    fn update_lag_snapshots_then_retargets() {
        let host = HostParams::new();
        let mut cell = ParamCell::new(EngineParam::Mass);
        host.set(EngineParam::Mass, 0.6);
        cell.set_rate(0.25);
        cell.update_lag(&host);

        assert_eq!(cell.last_value(), 0.0);
        assert_eq!(cell.last_target(), 0.0);
        assert_eq!(cell.target(), 0.6);
        assert_eq!(cell.value(), 0.0, "target capture must not move the value");
    }

    #[test]
    fn mid_block_host_change_waits_for_boundary() {
        let host = HostParams::new();
        let mut cell = ParamCell::new(EngineParam::Curl);
        cell.set_rate(0.25);
        cell.update_lag(&host);
        cell.advance();
        host.set(EngineParam::Curl, 1.0);
        for _ in 0..3 {
            assert_eq!(cell.advance(), 0.0);
        }
        cell.update_lag(&host);
        assert_eq!(cell.target(), 1.0);
    }

    #[test]
    fn snapshot_policy_skips_the_ramping_block() {
        let host = HostParams::new();
        let mut cell = ParamCell::new(EngineParam::Drive);

        host.set(EngineParam::Drive, 0.2);
        cell.set_rate(1.0 / 8.0);
        cell.update_lag(&host);
        assert!(!cell.wants_push(PushPolicy::SnapshotMatchesTarget));
        for _ in 0..8 {
            cell.advance();
        }

        cell.update_lag(&host);
        assert!(cell.wants_push(PushPolicy::SnapshotMatchesTarget));
    }

    #[test]
    fn target_changed_policy_pushes_only_the_ramping_block() {
        let host = HostParams::new();
        let mut cell = ParamCell::new(EngineParam::Drive);

        cell.update_lag(&host);
        assert!(!cell.wants_push(PushPolicy::TargetChanged));

        host.set(EngineParam::Drive, 0.2);
        run_block(&mut cell, &host, 8);
        assert!(cell.wants_push(PushPolicy::TargetChanged));

        cell.update_lag(&host);
        assert!(!cell.wants_push(PushPolicy::TargetChanged));
    }

    #[test]
    fn target_changed_policy_keeps_pushing_unfinished_ramp() {
        let host = HostParams::new();
        let mut cell = ParamCell::new(EngineParam::Gain);
        host.set(EngineParam::Gain, 0.0);
        cell.set_rate(1.0 / 8.0);
        cell.update_lag(&host);
        for _ in 0..4 {
            cell.advance();
        }
        // Target unchanged, but the value never got there.
        cell.update_lag(&host);
        assert!(cell.wants_push(PushPolicy::TargetChanged));
    }

    #[test]
    fn default_policy_is_snapshot() {
        assert_eq!(PushPolicy::default(), PushPolicy::SnapshotMatchesTarget);
    }
}
