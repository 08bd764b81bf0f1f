//! Lock-free level and activity telemetry.
//!
//! The audio thread publishes one representative magnitude per slot per
//! block; the presentation layer polls the slots whenever it repaints.
//!
//! ```text
//! Audio thread (per block)            UI thread (own cadence)
//! ┌──────────────────────┐            ┌──────────────────────┐
//! │ accumulate BlockPeak │            │                      │
//! │ publish (Relaxed)    │  ───────►  │ read (Relaxed)       │
//! │ reset to METER_FLOOR │  AtomicU32 │ may miss / repeat    │
//! └──────────────────────┘            └──────────────────────┘
//! ```
//!
//! This is a sampling channel, not a queue. Readers can miss a block or see
//! the same value twice, and tolerate a value one block stale. Each slot is a
//! single-word atomic with exactly one writer, so no value is ever torn, and
//! no slot orders against any other.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::engine::{EngineParam, PARAM_COUNT};

/// Floor sentinel an accumulator resets to after publication.
pub const METER_FLOOR: f32 = 0.0;

/// Number of signal taps.
pub const SIGNAL_TAP_COUNT: usize = 4;

/// A single published f32 magnitude.
#[derive(Debug)]
pub struct TelemetrySlot {
    bits: AtomicU32,
}

impl TelemetrySlot {
    /// Create a slot holding [`METER_FLOOR`].
    pub const fn new() -> Self {
        Self {
            bits: AtomicU32::new(METER_FLOOR.to_bits()),
        }
    }

    /// Publish a value (audio thread only).
    #[inline]
    pub fn publish(&self, value: f32) {
        self.bits.store(value.to_bits(), Ordering::Relaxed);
    }

    /// Read the last published value.
    #[inline]
    pub fn read(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Relaxed))
    }
}

impl Default for TelemetrySlot {
    fn default() -> Self {
        Self::new()
    }
}

/// A point in the signal path whose block peak is published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalTap {
    /// Left engine input.
    InputLeft,
    /// Right engine input.
    InputRight,
    /// Left engine output.
    OutputLeft,
    /// Right engine output.
    OutputRight,
}

impl SignalTap {
    /// All taps in slot order.
    pub const ALL: [SignalTap; SIGNAL_TAP_COUNT] = [
        SignalTap::InputLeft,
        SignalTap::InputRight,
        SignalTap::OutputLeft,
        SignalTap::OutputRight,
    ];

    /// Slot index of this tap.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Stable name used for lookup.
    pub const fn name(self) -> &'static str {
        match self {
            SignalTap::InputLeft => "input_left",
            SignalTap::InputRight => "input_right",
            SignalTap::OutputLeft => "output_left",
            SignalTap::OutputRight => "output_right",
        }
    }

    /// Look up a tap by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.name() == name)
    }
}

/// All telemetry slots of one processor instance.
///
/// Parameter slots carry the block maximum of the parameter's smoothed
/// value; signal slots carry the block peak magnitude at each tap.
#[derive(Debug, Default)]
pub struct Telemetry {
    params: [TelemetrySlot; PARAM_COUNT],
    signals: [TelemetrySlot; SIGNAL_TAP_COUNT],
}

impl Telemetry {
    /// Create a bank with every slot at [`METER_FLOOR`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot for a parameter.
    #[inline]
    pub fn param_slot(&self, param: EngineParam) -> &TelemetrySlot {
        &self.params[param.index()]
    }

    /// Slot for a signal tap.
    #[inline]
    pub fn signal_slot(&self, tap: SignalTap) -> &TelemetrySlot {
        &self.signals[tap.index()]
    }

    /// Last published value for a parameter.
    pub fn param(&self, param: EngineParam) -> f32 {
        self.param_slot(param).read()
    }

    /// Last published peak at a signal tap.
    pub fn signal(&self, tap: SignalTap) -> f32 {
        self.signal_slot(tap).read()
    }

    /// Find a slot by tap name or parameter id.
    pub fn slot_by_name(&self, name: &str) -> Option<&TelemetrySlot> {
        if let Some(tap) = SignalTap::from_name(name) {
            return Some(self.signal_slot(tap));
        }
        EngineParam::from_id(name).map(|p| self.param_slot(p))
    }
}

/// Audio-side running block maximum.
///
/// Accumulates during a block, then [`take`](Self::take) hands the value
/// over for publication and resets to [`METER_FLOOR`] so the next block only
/// reflects its own activity.
#[derive(Debug, Clone, Copy)]
pub struct BlockPeak {
    value: f32,
}

impl BlockPeak {
    /// Create an accumulator at the floor.
    pub const fn new() -> Self {
        Self { value: METER_FLOOR }
    }

    /// Fold a value into the running maximum.
    ///
    /// NaN never wins the comparison and is ignored.
    #[inline]
    pub fn accumulate(&mut self, value: f32) {
        if value > self.value {
            self.value = value;
        }
    }

    /// Fold a sample's magnitude into the running maximum.
    #[inline]
    pub fn accumulate_abs(&mut self, sample: f32) {
        self.accumulate(sample.abs());
    }

    /// Current running maximum.
    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Return the running maximum and reset to the floor.
    #[inline]
    pub fn take(&mut self) -> f32 {
        let v = self.value;
        self.value = METER_FLOOR;
        v
    }

    /// Publish into `slot` and reset to the floor.
    #[inline]
    pub fn publish_to(&mut self, slot: &TelemetrySlot) {
        slot.publish(self.take());
    }
}

impl Default for BlockPeak {
    fn default() -> Self {
        Self::new()
    }
}
