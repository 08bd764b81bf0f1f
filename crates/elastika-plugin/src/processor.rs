//! Host-facing processor wrapping a [`BlockDispatcher`].
//!
//! [`ElastikaProcessor`] is what a plugin-format adapter drives: it answers
//! metadata queries, negotiates bus layouts, maps the host's channel
//! buffers onto the dispatcher's stereo pair, and persists parameter state.
//!
//! # Channel mapping
//!
//! | Host input | Engine (left, right) |
//! |------------|----------------------|
//! | none       | (silence, silence)   |
//! | mono       | (ch 0, ch 0)         |
//! | stereo     | (ch 0, ch 1)         |
//!
//! Output channels beyond the second, and any output tail the engine did not
//! produce, are filled with silence.

use std::fmt;

use elastika_core::{BlockDispatcher, Engine, PushPolicy};

use crate::config::ProcessorConfig;
use crate::error::PluginError;
use crate::shared::ElastikaShared;
use crate::state;

/// Processor name reported to hosts.
pub const PROCESSOR_NAME: &str = "Elastika";

/// Name of the single program.
pub const DEFAULT_PROGRAM_NAME: &str = "Default";

/// Channel configuration of one bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelSet {
    /// Bus is switched off.
    Disabled,
    /// One channel.
    Mono,
    /// Left and right.
    Stereo,
    /// Any other channel count.
    Discrete(usize),
}

impl ChannelSet {
    /// Channel set for a plain channel count.
    pub fn from_count(count: usize) -> Self {
        match count {
            0 => Self::Disabled,
            1 => Self::Mono,
            2 => Self::Stereo,
            n => Self::Discrete(n),
        }
    }

    /// Number of channels on the bus.
    pub fn channel_count(self) -> usize {
        match self {
            Self::Disabled => 0,
            Self::Mono => 1,
            Self::Stereo => 2,
            Self::Discrete(n) => n,
        }
    }
}

impl fmt::Display for ChannelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => f.write_str("disabled"),
            Self::Mono => f.write_str("mono"),
            Self::Stereo => f.write_str("stereo"),
            Self::Discrete(n) => write!(f, "{n} channels"),
        }
    }
}

/// Main input and output bus configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusLayout {
    /// Main input bus.
    pub input: ChannelSet,
    /// Main output bus.
    pub output: ChannelSet,
}

impl BusLayout {
    /// Layout with the given input and output sets.
    pub const fn new(input: ChannelSet, output: ChannelSet) -> Self {
        Self { input, output }
    }

    /// Stereo in, stereo out.
    pub const fn stereo() -> Self {
        Self::new(ChannelSet::Stereo, ChannelSet::Stereo)
    }

    /// Mono in, stereo out.
    pub const fn mono_to_stereo() -> Self {
        Self::new(ChannelSet::Mono, ChannelSet::Stereo)
    }
}

impl Default for BusLayout {
    fn default() -> Self {
        Self::stereo()
    }
}

impl fmt::Display for BusLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.input, self.output)
    }
}

/// The Elastika audio processor, generic over its physics engine.
pub struct ElastikaProcessor<E: Engine> {
    dispatcher: BlockDispatcher<E>,
    shared: ElastikaShared,
    config: ProcessorConfig,
    layout: BusLayout,
    sample_rate: f64,
    max_block_size: usize,
    prepared: bool,
    /// Zeroed input for a missing input bus.
    silence: Vec<f32>,
    /// Sinks for output channels the host did not provide.
    spill_left: Vec<f32>,
    spill_right: Vec<f32>,
}

impl<E: Engine> ElastikaProcessor<E> {
    /// Create a processor with the default configuration.
    pub fn new(engine: E) -> Self {
        Self::with_config(engine, ProcessorConfig::default())
    }

    /// Create a processor with an explicit configuration.
    pub fn with_config(engine: E, config: ProcessorConfig) -> Self {
        let shared = ElastikaShared::new();
        let dispatcher = BlockDispatcher::new(engine, std::sync::Arc::clone(shared.telemetry()))
            .with_policy(config.push_policy);
        Self {
            dispatcher,
            shared,
            config,
            layout: BusLayout::default(),
            sample_rate: 0.0,
            max_block_size: 0,
            prepared: false,
            silence: Vec::new(),
            spill_left: Vec::new(),
            spill_right: Vec::new(),
        }
    }

    // ── Metadata ────────────────────────────────────────────────────────

    /// Name reported to hosts.
    pub fn name(&self) -> &'static str {
        PROCESSOR_NAME
    }

    /// The processor takes no MIDI input.
    pub fn accepts_midi(&self) -> bool {
        false
    }

    /// The processor emits no MIDI.
    pub fn produces_midi(&self) -> bool {
        false
    }

    /// The processor is an audio effect, not a MIDI effect.
    pub fn is_midi_effect(&self) -> bool {
        false
    }

    /// How long output may ring after input stops, in seconds.
    pub fn tail_length_seconds(&self) -> f64 {
        self.config.tail_seconds
    }

    /// Always 1: some hosts misbehave when told there are no programs.
    pub fn num_programs(&self) -> usize {
        1
    }

    /// Always 0.
    pub fn current_program(&self) -> usize {
        0
    }

    /// No-op; there is only one program.
    pub fn set_current_program(&mut self, _index: usize) {}

    /// Name of the program at `index`.
    pub fn program_name(&self, _index: usize) -> &'static str {
        DEFAULT_PROGRAM_NAME
    }

    // ── Bus layout ──────────────────────────────────────────────────────

    /// Whether the processor can run with `layout`.
    ///
    /// The input must be mono or stereo and the output stereo.
    pub fn is_bus_layout_supported(&self, layout: &BusLayout) -> bool {
        matches!(layout.input, ChannelSet::Mono | ChannelSet::Stereo)
            && layout.output == ChannelSet::Stereo
    }

    /// Adopt `layout`, or reject it if unsupported.
    pub fn set_bus_layout(&mut self, layout: BusLayout) -> Result<(), PluginError> {
        if !self.is_bus_layout_supported(&layout) {
            tracing::warn!(%layout, "rejected bus layout");
            return Err(PluginError::UnsupportedLayout(layout));
        }
        tracing::debug!(%layout, "bus layout set");
        self.layout = layout;
        Ok(())
    }

    /// Current bus layout.
    pub fn bus_layout(&self) -> BusLayout {
        self.layout
    }

    // ── Lifecycle ───────────────────────────────────────────────────────

    /// Stream start or restart.
    ///
    /// Records the sample rate handed to the engine, sets lag rates for
    /// `max_block_size` and pre-sizes scratch buffers.
    pub fn prepare_to_play(&mut self, sample_rate: f64, max_block_size: usize) {
        self.sample_rate = sample_rate;
        self.max_block_size = max_block_size;
        self.resize_scratch(max_block_size);
        self.dispatcher.prepare(sample_rate as f32, max_block_size);
        self.dispatcher.sync_engine();
        self.prepared = true;

        tracing::info!(
            sample_rate,
            max_block_size,
            layout = %self.layout,
            policy = ?self.dispatcher.policy(),
            "prepared to play"
        );
    }

    /// Stream stop. Frees scratch memory.
    pub fn release_resources(&mut self) {
        self.silence = Vec::new();
        self.spill_left = Vec::new();
        self.spill_right = Vec::new();
        self.prepared = false;
        tracing::debug!("resources released");
    }

    /// Whether [`prepare_to_play`](Self::prepare_to_play) has run since the
    /// last release.
    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    /// Sample rate from the last `prepare_to_play`.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Maximum block size announced by the last `prepare_to_play`.
    pub fn max_block_size(&self) -> usize {
        self.max_block_size
    }

    // ── Processing ──────────────────────────────────────────────────────

    /// Process one block of channel buffers in place of the host callback.
    ///
    /// The block length is taken from the first output channel, or the
    /// first input channel when there are no outputs.
    ///
    /// Never allocates. Missing channels are backed by scratch sized in
    /// [`prepare_to_play`](Self::prepare_to_play); when such a block is
    /// longer than the scratch, only the covered prefix is processed and the
    /// rest of the output is zeroed.
    pub fn process_block(&mut self, inputs: &[&[f32]], outputs: &mut [&mut [f32]]) {
        let frames = match (outputs.first(), inputs.first()) {
            (Some(out), _) => out.len(),
            (None, Some(inp)) => inp.len(),
            (None, None) => 0,
        };
        // Scratch only backs missing channels; full stereo never reads it.
        let covered = frames.min(self.silence.len());

        let silence = &self.silence[..covered];
        let (in_left, in_right): (&[f32], &[f32]) = match inputs {
            [] => (silence, silence),
            [mono] => (*mono, *mono),
            [left, right, ..] => (*left, *right),
        };

        let (out_left, out_right): (&mut [f32], &mut [f32]) = match outputs {
            [] => (
                &mut self.spill_left[..covered],
                &mut self.spill_right[..covered],
            ),
            [only] => (&mut **only, &mut self.spill_right[..covered]),
            [left, right, rest @ ..] => {
                for ch in rest.iter_mut() {
                    ch.fill(0.0);
                }
                (&mut **left, &mut **right)
            }
        };

        let len = in_left
            .len()
            .min(in_right.len())
            .min(out_left.len())
            .min(out_right.len());

        self.dispatcher.process_block(
            self.shared.params(),
            in_left,
            in_right,
            &mut *out_left,
            &mut *out_right,
        );

        out_left[len..].fill(0.0);
        out_right[len..].fill(0.0);
    }

    fn resize_scratch(&mut self, frames: usize) {
        self.silence.resize(frames, 0.0);
        self.spill_left.resize(frames, 0.0);
        self.spill_right.resize(frames, 0.0);
    }

    // ── Shared state, config and persistence ───────────────────────────

    /// Cloneable handle for the host/UI side.
    pub fn shared(&self) -> ElastikaShared {
        self.shared.clone()
    }

    /// Active configuration.
    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Switch push policy. Takes effect at the next block boundary.
    pub fn set_push_policy(&mut self, policy: PushPolicy) {
        self.config.push_policy = policy;
        self.dispatcher.set_policy(policy);
    }

    /// Serialize every parameter target.
    pub fn save_state(&self) -> Result<Vec<u8>, PluginError> {
        Ok(state::save_state(self.shared.params())?)
    }

    /// Restore parameter targets from a saved blob.
    ///
    /// Returns the number of values applied; malformed input applies nothing.
    pub fn load_state(&self, blob: &[u8]) -> usize {
        state::load_state(self.shared.params(), blob)
    }

    /// The underlying dispatcher.
    pub fn dispatcher(&self) -> &BlockDispatcher<E> {
        &self.dispatcher
    }

    /// The wrapped engine.
    pub fn engine(&self) -> &E {
        self.dispatcher.engine()
    }
}
