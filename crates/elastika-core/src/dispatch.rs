//! The per-block, per-sample real-time loop.
//!
//! [`BlockDispatcher`] runs once per host callback:
//!
//! 1. If the buffer length differs from the previous call, the
//!    [`RateController`] recomputes every lag rate.
//! 2. Every [`ParamCell`] captures the host's current target
//!    ([`ParamCell::update_lag`]) and decides, per its [`PushPolicy`],
//!    whether its smoothed values reach the engine this block.
//! 3. For each sample: every cell advances its lag filter and, if pushing,
//!    hands the smoothed value to the engine; then the engine transforms one
//!    stereo sample.
//! 4. Block maxima are published to the [`Telemetry`] bank.
//!
//! No allocation, locking or I/O happens inside
//! [`process_block`](BlockDispatcher::process_block). Non-finite values are
//! passed through as-is.

use std::sync::Arc;

use crate::cell::{ParamCell, PushPolicy};
use crate::engine::{Engine, EngineParam, PARAM_COUNT};
use crate::host_params::HostParams;
use crate::rate::RateController;
use crate::telemetry::{BlockPeak, SIGNAL_TAP_COUNT, SignalTap, Telemetry};

/// Drives an [`Engine`] from host parameter targets, one block at a time.
pub struct BlockDispatcher<E> {
    engine: E,
    cells: [ParamCell; PARAM_COUNT],
    rates: RateController,
    policy: PushPolicy,
    sample_rate: f32,
    telemetry: Arc<Telemetry>,
    param_peaks: [BlockPeak; PARAM_COUNT],
    signal_peaks: [BlockPeak; SIGNAL_TAP_COUNT],
    /// Per-block push decisions, indexed like `cells`.
    push: [bool; PARAM_COUNT],
}

impl<E: Engine> BlockDispatcher<E> {
    /// Create a dispatcher around `engine`, publishing into `telemetry`.
    ///
    /// All cells start settled at their defaults. Rates are not set until
    /// [`prepare`](Self::prepare) or the first block.
    pub fn new(engine: E, telemetry: Arc<Telemetry>) -> Self {
        Self {
            engine,
            cells: core::array::from_fn(|i| ParamCell::new(EngineParam::ALL[i])),
            rates: RateController::new(),
            policy: PushPolicy::default(),
            sample_rate: 0.0,
            telemetry,
            param_peaks: [BlockPeak::new(); PARAM_COUNT],
            signal_peaks: [BlockPeak::new(); SIGNAL_TAP_COUNT],
            push: [false; PARAM_COUNT],
        }
    }

    /// Builder-style policy selection.
    pub fn with_policy(mut self, policy: PushPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Stream start: record the sample rate and set rates for `block_size`.
    ///
    /// Hosts call this again whenever either value changes.
    pub fn prepare(&mut self, sample_rate: f32, block_size: usize) {
        self.sample_rate = sample_rate;
        self.rates.recompute_rates(&mut self.cells, block_size);

        #[cfg(feature = "tracing")]
        tracing::debug!(sample_rate, block_size, rate = ?self.rates.rate(), "dispatcher prepared");
    }

    /// Process one block of stereo audio.
    ///
    /// Produces exactly one output pair per input pair. If the slices differ
    /// in length, only the common prefix is processed and the rest of the
    /// output is left untouched.
    pub fn process_block(
        &mut self,
        host: &HostParams,
        in_left: &[f32],
        in_right: &[f32],
        out_left: &mut [f32],
        out_right: &mut [f32],
    ) {
        let len = in_left
            .len()
            .min(in_right.len())
            .min(out_left.len())
            .min(out_right.len());

        self.rates.observe(&mut self.cells, len);

        for (cell, push) in self.cells.iter_mut().zip(self.push.iter_mut()) {
            cell.update_lag(host);
            *push = cell.wants_push(self.policy);
        }

        for i in 0..len {
            for ((cell, push), peak) in self
                .cells
                .iter_mut()
                .zip(self.push.iter())
                .zip(self.param_peaks.iter_mut())
            {
                let value = cell.advance();
                peak.accumulate(value);
                if *push {
                    self.engine.set_param(cell.param(), value);
                }
            }

            let (l, r) = (in_left[i], in_right[i]);
            let (out_l, out_r) = self.engine.process(self.sample_rate, l, r);
            out_left[i] = out_l;
            out_right[i] = out_r;

            self.signal_peaks[SignalTap::InputLeft.index()].accumulate_abs(l);
            self.signal_peaks[SignalTap::InputRight.index()].accumulate_abs(r);
            self.signal_peaks[SignalTap::OutputLeft.index()].accumulate_abs(out_l);
            self.signal_peaks[SignalTap::OutputRight.index()].accumulate_abs(out_r);
        }

        self.publish_telemetry();
    }

    fn publish_telemetry(&mut self) {
        for (param, peak) in EngineParam::ALL.iter().zip(self.param_peaks.iter_mut()) {
            peak.publish_to(self.telemetry.param_slot(*param));
        }
        for (tap, peak) in SignalTap::ALL.iter().zip(self.signal_peaks.iter_mut()) {
            peak.publish_to(self.telemetry.signal_slot(*tap));
        }
    }

    /// Push every cell's current smoothed value into the engine.
    ///
    /// Used after activation so the engine starts from the smoothed state
    /// regardless of the push policy.
    pub fn sync_engine(&mut self) {
        for cell in &self.cells {
            self.engine.set_param(cell.param(), cell.value());
        }
    }

    /// The wrapped engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Mutable access to the wrapped engine.
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// The cell for `param`.
    pub fn cell(&self, param: EngineParam) -> &ParamCell {
        &self.cells[param.index()]
    }

    /// All cells in slot order.
    pub fn cells(&self) -> &[ParamCell] {
        &self.cells
    }

    /// The rate controller.
    pub fn rates(&self) -> &RateController {
        &self.rates
    }

    /// Active push policy.
    pub fn policy(&self) -> PushPolicy {
        self.policy
    }

    /// Change the push policy. Takes effect at the next block boundary.
    pub fn set_policy(&mut self, policy: PushPolicy) {
        self.policy = policy;
    }

    /// Sample rate handed to the engine.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// The telemetry bank this dispatcher publishes into.
    pub fn telemetry(&self) -> &Arc<Telemetry> {
        &self.telemetry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counting {
        pushes: [usize; PARAM_COUNT],
        last: [f32; PARAM_COUNT],
        processed: usize,
    }

    impl Counting {
        fn record(&mut self, param: EngineParam, value: f32) {
            self.pushes[param.index()] += 1;
            self.last[param.index()] = value;
        }
    }

    impl Engine for Counting {
        fn set_friction(&mut self, value: f32) {
            self.record(EngineParam::Friction, value);
        }
        fn set_span(&mut self, value: f32) {
            self.record(EngineParam::Span, value);
        }
        fn set_stiffness(&mut self, value: f32) {
            self.record(EngineParam::Stiffness, value);
        }
        fn set_curl(&mut self, value: f32) {
            self.record(EngineParam::Curl, value);
        }
        fn set_mass(&mut self, value: f32) {
            self.record(EngineParam::Mass, value);
        }
        fn set_drive(&mut self, value: f32) {
            self.record(EngineParam::Drive, value);
        }
        fn set_gain(&mut self, value: f32) {
            self.record(EngineParam::Gain, value);
        }
        fn set_input_tilt(&mut self, value: f32) {
            self.record(EngineParam::InputTilt, value);
        }
        fn set_output_tilt(&mut self, value: f32) {
            self.record(EngineParam::OutputTilt, value);
        }
        fn process(&mut self, _sample_rate: f32, left: f32, right: f32) -> (f32, f32) {
            self.processed += 1;
            (right, left)
        }
    }

    fn dispatcher() -> BlockDispatcher<Counting> {
        BlockDispatcher::new(Counting::default(), Arc::new(Telemetry::new()))
    }

    fn run(
        d: &mut BlockDispatcher<Counting>,
        host: &HostParams,
        len: usize,
    ) -> (Vec<f32>, Vec<f32>) {
        let in_l = vec![0.5; len];
        let in_r = vec![-0.25; len];
        let mut out_l = vec![0.0; len];
        let mut out_r = vec![0.0; len];
        d.process_block(host, &in_l, &in_r, &mut out_l, &mut out_r);
        (out_l, out_r)
    }

    #[test]
    fn one_output_pair_per_input_pair() {
        let mut d = dispatcher();
        let host = HostParams::new();
        d.prepare(48000.0, 32);
        let (out_l, out_r) = run(&mut d, &host, 32);
        assert_eq!(d.engine().processed, 32);
        assert!(out_l.iter().all(|&s| s == -0.25));
        assert!(out_r.iter().all(|&s| s == 0.5));
    }

    #[test]
    fn first_block_detects_block_size() {
        let mut d = dispatcher();
        let host = HostParams::new();
        assert_eq!(d.rates().block_size(), None);
        run(&mut d, &host, 16);
        assert_eq!(d.rates().block_size(), Some(16));
    }

    #[test]
    fn steady_params_push_every_sample_under_snapshot_policy() {
        let mut d = dispatcher();
        let host = HostParams::new();
        d.prepare(48000.0, 8);
        run(&mut d, &host, 8);
        for param in EngineParam::ALL {
            assert_eq!(d.engine().pushes[param.index()], 8, "{param}");
        }
    }

    #[test]
    fn target_changed_policy_is_quiet_when_steady() {
        let mut d = dispatcher().with_policy(PushPolicy::TargetChanged);
        let host = HostParams::new();
        d.prepare(48000.0, 8);
        run(&mut d, &host, 8);
        assert_eq!(d.engine().pushes, [0; PARAM_COUNT]);
    }

    #[test]
    fn telemetry_reports_block_peaks() {
        let mut d = dispatcher();
        let host = HostParams::new();
        d.prepare(48000.0, 4);
        run(&mut d, &host, 4);
        let t = d.telemetry();
        assert_eq!(t.signal(SignalTap::InputLeft), 0.5);
        assert_eq!(t.signal(SignalTap::InputRight), 0.25);
        assert_eq!(t.signal(SignalTap::OutputLeft), 0.25);
        assert_eq!(t.signal(SignalTap::OutputRight), 0.5);
        assert_eq!(t.param(EngineParam::Drive), 1.0);
        assert_eq!(t.param(EngineParam::Friction), 0.5);
    }

    #[test]
    fn empty_block_publishes_floor() {
        let mut d = dispatcher();
        let host = HostParams::new();
        d.prepare(48000.0, 4);
        run(&mut d, &host, 4);
        run(&mut d, &host, 0);
        assert_eq!(d.telemetry().signal(SignalTap::InputLeft), 0.0);
        assert_eq!(d.rates().block_size(), Some(4));
    }

    #[test]
    fn mismatched_lengths_use_common_prefix() {
        let mut d = dispatcher();
        let host = HostParams::new();
        let in_l = [1.0; 8];
        let in_r = [1.0; 6];
        let mut out_l = [9.0; 8];
        let mut out_r = [9.0; 8];
        d.process_block(&host, &in_l, &in_r, &mut out_l, &mut out_r);
        assert_eq!(d.engine().processed, 6);
        assert_eq!(out_l[5], 1.0);
        assert_eq!(out_l[6], 9.0);
    }

    #[test]
    fn sync_engine_pushes_all() {
        let mut d = dispatcher().with_policy(PushPolicy::TargetChanged);
        d.sync_engine();
        assert_eq!(d.engine().pushes, [1; PARAM_COUNT]);
        assert_eq!(d.engine().last[EngineParam::Gain.index()], 1.0);
    }
}
