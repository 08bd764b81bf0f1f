//! Block-size driven lag rates.
//!
//! Every cell's lag rate is `1 / block_size`, so a ramp started at a block
//! boundary always finishes inside that block. Hosts are free to change the
//! block size from one callback to the next, so the [`RateController`]
//! watches the observed buffer length and recomputes whenever it moves.

use crate::cell::ParamCell;

/// Keeps lag rates in step with the host block size.
#[derive(Debug, Clone, Default)]
pub struct RateController {
    /// Block size the current rates were computed for.
    block_size: Option<usize>,
}

impl RateController {
    /// Create a controller that has not seen a block size yet.
    pub fn new() -> Self {
        Self { block_size: None }
    }

    /// Set every cell's rate to `1 / block_size`.
    ///
    /// A zero block size is treated as a single sample (instant smoothing).
    pub fn recompute_rates(&mut self, cells: &mut [ParamCell], block_size: usize) {
        let block_size = block_size.max(1);
        let rate = 1.0 / block_size as f32;
        for cell in cells.iter_mut() {
            cell.set_rate(rate);
        }
        self.block_size = Some(block_size);
    }

    /// Recompute rates if `block_size` differs from the last one seen.
    ///
    /// Returns `true` when a recomputation happened. Empty blocks carry no
    /// samples to smooth and never trigger one.
    #[inline]
    pub fn observe(&mut self, cells: &mut [ParamCell], block_size: usize) -> bool {
        if block_size == 0 || self.block_size == Some(block_size) {
            return false;
        }
        self.recompute_rates(cells, block_size);
        true
    }

    /// Block size the current rates were computed for.
    pub fn block_size(&self) -> Option<usize> {
        self.block_size
    }

    /// The rate currently applied to every cell.
    pub fn rate(&self) -> Option<f32> {
        self.block_size.map(|n| 1.0 / n as f32)
    }
}
