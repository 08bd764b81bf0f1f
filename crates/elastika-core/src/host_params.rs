//! Host-owned parameter targets.
//!
//! [`HostParams`] holds the value the host (automation, UI gestures, state
//! restore) most recently set for each [`EngineParam`]. Each slot has a
//! single writer, the host/UI side, and a single reader, the audio thread,
//! which samples it once per block in
//! [`ParamCell::update_lag`](crate::ParamCell::update_lag). Values are f32
//! bit-cast into `AtomicU32`, the same storage the rest of the framework uses
//! for lock-free parameter access.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::engine::{EngineParam, PARAM_COUNT};

/// Normalized host-parameter targets, one per engine parameter.
///
/// Writes clamp to the normalized range 0..=1. NaN is not a range violation
/// the core checks for; it is stored as-is and reaches the engine unchanged.
#[derive(Debug)]
pub struct HostParams {
    values: [AtomicU32; PARAM_COUNT],
}

impl HostParams {
    /// Create the store with every parameter at its default.
    pub fn new() -> Self {
        Self {
            values: core::array::from_fn(|i| {
                AtomicU32::new(EngineParam::ALL[i].default_value().to_bits())
            }),
        }
    }

    /// Read the current target of a parameter.
    #[inline]
    pub fn get(&self, param: EngineParam) -> f32 {
        f32::from_bits(self.values[param.index()].load(Ordering::Acquire))
    }

    /// Set a parameter target (host/UI thread). Clamps to 0..=1.
    #[inline]
    pub fn set(&self, param: EngineParam, value: f32) {
        let clamped = value.clamp(0.0, 1.0);
        self.values[param.index()].store(clamped.to_bits(), Ordering::Release);
    }

    /// Read a parameter by its stable id.
    pub fn get_by_id(&self, id: &str) -> Option<f32> {
        EngineParam::from_id(id).map(|p| self.get(p))
    }

    /// Set a parameter by its stable id.
    ///
    /// Returns `false` and changes nothing if the id is unknown.
    pub fn set_by_id(&self, id: &str, value: f32) -> bool {
        match EngineParam::from_id(id) {
            Some(param) => {
                self.set(param, value);
                true
            }
            None => false,
        }
    }

    /// Snapshot all targets in slot order.
    pub fn snapshot(&self) -> [f32; PARAM_COUNT] {
        core::array::from_fn(|i| f32::from_bits(self.values[i].load(Ordering::Acquire)))
    }
}

impl Default for HostParams {
    fn default() -> Self {
        Self::new()
    }
}
