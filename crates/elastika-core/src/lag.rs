//! Single-parameter lag filter.
//!
//! [`LagFilter`] is the smoothing primitive behind every
//! [`ParamCell`](crate::ParamCell). Its rate is set from the host block size
//! (`1 / block_size`), so a new target is always reached within one block,
//! whatever block size the host picks.
//!
//! ## Usage
//!
//! ```rust
//! use elastika_core::LagFilter;
//!
//! let mut lag = LagFilter::new(0.0);
//! lag.set_rate(1.0 / 64.0);
//! lag.new_value(1.0);
//!
//! for _ in 0..64 {
//!     lag.process();
//! }
//! assert_eq!(lag.current(), 1.0);
//! ```

/// A lag (slew) filter stepping a value toward its target.
///
/// The distance to the target is covered in `1 / rate` equal steps, measured
/// from the moment the target or rate last changed. Each step is computed
/// from the ramp origin rather than accumulated, and the last step lands
/// exactly on the target, so the filter never overshoots and holds steady
/// once settled.
///
/// # Invariants
///
/// - `rate` is in (0, 1]
/// - `current` always lies between its value at the last retarget and `target`
#[derive(Debug, Clone)]
pub struct LagFilter {
    /// Current smoothed value
    current: f32,
    /// Value being approached
    target: f32,
    /// Per-step convergence rate (fraction of the ramp covered per step)
    rate: f32,
    /// Value the current ramp started from
    origin: f32,
    /// Increment per step
    step: f32,
    /// Length of the current ramp in steps
    ramp_len: u32,
    /// Steps left until `current` lands on `target`
    steps_remaining: u32,
}

impl LagFilter {
    /// Create a settled filter holding `initial`.
    ///
    /// The rate starts at 1 (instant) until [`set_rate`](Self::set_rate) is
    /// called.
    pub fn new(initial: f32) -> Self {
        Self {
            current: initial,
            target: initial,
            rate: 1.0,
            origin: initial,
            step: 0.0,
            ramp_len: 0,
            steps_remaining: 0,
        }
    }

    /// Set the per-step convergence rate.
    ///
    /// The rate is normally `1 / block_size`. Values outside (0, 1], and
    /// non-finite values, fall back to 1. A ramp in progress is re-planned
    /// over the new number of steps from the current value.
    pub fn set_rate(&mut self, rate: f32) {
        self.rate = if rate.is_finite() && rate > 0.0 && rate <= 1.0 {
            rate
        } else {
            1.0
        };
        if self.steps_remaining > 0 {
            self.plan_ramp();
        }
    }

    /// Record a new target without moving the current value.
    #[inline]
    pub fn new_value(&mut self, target: f32) {
        self.target = target;
        self.plan_ramp();
    }

    /// Advance the current value one step toward the target.
    ///
    /// Returns the new current value. Once settled this is a no-op.
    #[inline]
    pub fn process(&mut self) -> f32 {
        if self.steps_remaining > 0 {
            self.steps_remaining -= 1;
            self.current = if self.steps_remaining == 0 {
                self.target
            } else {
                let elapsed = self.ramp_len - self.steps_remaining;
                self.origin + self.step * elapsed as f32
            };
        }
        self.current
    }

    /// Current smoothed value.
    #[inline]
    pub fn current(&self) -> f32 {
        self.current
    }

    /// Value being approached.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Per-step convergence rate.
    #[inline]
    pub fn rate(&self) -> f32 {
        self.rate
    }

    /// Whether the current value has reached the target.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.steps_remaining == 0
    }

    /// Number of steps in a full ramp at the current rate.
    #[inline]
    fn steps_per_ramp(&self) -> u32 {
        let steps = (1.0 / self.rate).round();
        if steps >= 1.0 { steps as u32 } else { 1 }
    }

    fn plan_ramp(&mut self) {
        // Bit equality: NaN targets still get a ramp and pass through.
        self.origin = self.current;
        if self.current.to_bits() == self.target.to_bits() {
            self.step = 0.0;
            self.ramp_len = 0;
            self.steps_remaining = 0;
            return;
        }
        let steps = self.steps_per_ramp();
        self.step = (self.target - self.current) / steps as f32;
        self.ramp_len = steps;
        self.steps_remaining = steps;
    }
}

impl Default for LagFilter {
    fn default() -> Self {
        Self::new(0.0)
    }
}
