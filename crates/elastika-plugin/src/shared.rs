//! Thread-safe shared state for the Elastika processor.
//!
//! `ElastikaShared` lives for the lifetime of the processor instance and is
//! handed to every thread that needs it: the host/UI thread writes parameter
//! targets, the audio thread reads them once per block and publishes
//! telemetry, and the presentation layer polls that telemetry.

use std::sync::Arc;

use elastika_core::{EngineParam, HostParams, PARAM_COUNT, SignalTap, Telemetry};

/// Cloneable handle to the processor's shared state.
///
/// Both halves sit behind an `Arc`, so the handle can be moved into
/// `'static + Send` closures (a UI timer, a host callback) at no cost.
#[derive(Clone, Default)]
pub struct ElastikaShared {
    params: Arc<HostParams>,
    telemetry: Arc<Telemetry>,
}

impl ElastikaShared {
    /// Fresh state: every parameter at its default, telemetry at the floor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Host-written parameter targets.
    pub fn params(&self) -> &Arc<HostParams> {
        &self.params
    }

    /// Audio-thread-written telemetry.
    pub fn telemetry(&self) -> &Arc<Telemetry> {
        &self.telemetry
    }

    /// Number of parameters.
    pub fn param_count(&self) -> usize {
        PARAM_COUNT
    }

    /// Current target of `param`.
    pub fn get(&self, param: EngineParam) -> f32 {
        self.params.get(param)
    }

    /// Set the target of `param`, clamped to [0, 1].
    pub fn set(&self, param: EngineParam, value: f32) {
        self.params.set(param, value);
    }

    /// Latest per-block maximum of `param`'s smoothed value.
    pub fn param_level(&self, param: EngineParam) -> f32 {
        self.telemetry.param(param)
    }

    /// Latest per-block peak of a signal tap.
    pub fn signal_level(&self, tap: SignalTap) -> f32 {
        self.telemetry.signal(tap)
    }
}

impl std::fmt::Debug for ElastikaShared {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElastikaShared")
            .field("params", &self.params.snapshot())
            .finish_non_exhaustive()
    }
}
