//! Offline block simulation.
//!
//! Feeds a sine through an [`ElastikaProcessor`] over a schedule of block
//! sizes and parameter changes, printing the telemetry published after each
//! block. Useful for seeing how smoothing and push policy behave when a host
//! changes block size mid-stream.

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::{Args, ValueEnum};
use elastika_core::{EngineParam, PushPolicy, SignalTap};
use elastika_plugin::{BusLayout, ElastikaProcessor, ElastikaShared, ProcessorConfig};
use serde::Serialize;

use super::common::{Assignment, SoftClip, parse_assignment};

/// Push policy as accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PolicyArg {
    /// Push while the block-start value matches the new target
    SnapshotMatchesTarget,
    /// Push only while the target is changing
    TargetChanged,
}

impl From<PolicyArg> for PushPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::SnapshotMatchesTarget => PushPolicy::SnapshotMatchesTarget,
            PolicyArg::TargetChanged => PushPolicy::TargetChanged,
        }
    }
}

/// Simulate a stream of blocks.
#[derive(Args)]
pub struct SimulateArgs {
    /// Block sizes, one per block (e.g., "64,64,512,7")
    #[arg(short, long, value_delimiter = ',', num_args = 1.., default_value = "64,64,64,64")]
    pub blocks: Vec<usize>,

    /// Parameter change as id=value or id=value@block (repeatable)
    #[arg(short, long = "set", value_parser = parse_assignment)]
    pub set: Vec<Assignment>,

    /// Sample rate handed to the engine
    #[arg(long, default_value = "48000")]
    pub sample_rate: f64,

    /// Push policy (overrides the configuration file)
    #[arg(long, value_enum)]
    pub policy: Option<PolicyArg>,

    /// Processor configuration file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// State file (JSON) loaded before the first block
    #[arg(long)]
    pub state: Option<PathBuf>,

    /// Test tone frequency in Hz
    #[arg(long, default_value = "220")]
    pub frequency: f32,

    /// Test tone amplitude
    #[arg(long, default_value = "0.5")]
    pub amplitude: f32,

    /// Use a mono input bus
    #[arg(long)]
    pub mono: bool,

    /// Emit one JSON object per block instead of a table
    #[arg(long)]
    pub json: bool,
}

/// Telemetry published after one block.
#[derive(Debug, Serialize)]
struct BlockReport {
    block: usize,
    size: usize,
    params: BTreeMap<&'static str, f32>,
    signals: BTreeMap<&'static str, f32>,
}

impl BlockReport {
    fn capture(block: usize, size: usize, shared: &ElastikaShared) -> Self {
        Self {
            block,
            size,
            params: EngineParam::ALL
                .iter()
                .map(|p| (p.id(), shared.param_level(*p)))
                .collect(),
            signals: SignalTap::ALL
                .iter()
                .map(|t| (t.name(), shared.signal_level(*t)))
                .collect(),
        }
    }
}

/// Run the simulate command.
pub fn run(args: SimulateArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => ProcessorConfig::load(path)?,
        None => ProcessorConfig::default(),
    };
    if let Some(policy) = args.policy {
        config.push_policy = policy.into();
    }

    let mut processor = ElastikaProcessor::with_config(SoftClip::default(), config);
    if args.mono {
        processor.set_bus_layout(BusLayout::mono_to_stereo())?;
    }

    if let Some(path) = &args.state {
        let blob = std::fs::read(path)
            .map_err(|e| anyhow::anyhow!("failed to read '{}': {}", path.display(), e))?;
        let applied = processor.load_state(&blob);
        tracing::info!(path = %path.display(), applied, "initial state loaded");
    }

    let max_block = args.blocks.iter().copied().max().unwrap_or(0);
    processor.prepare_to_play(args.sample_rate, max_block);
    let shared = processor.shared();

    if !args.json {
        print_header(&config);
    }

    let phase_inc = args.frequency / args.sample_rate as f32;
    let mut phase = 0.0f32;
    let mut left = Vec::with_capacity(max_block);
    let mut right = Vec::with_capacity(max_block);
    let mut out_left = vec![0.0f32; max_block];
    let mut out_right = vec![0.0f32; max_block];

    for (block, &size) in args.blocks.iter().enumerate() {
        for change in args.set.iter().filter(|a| a.block == block) {
            shared.set(change.param, change.value);
        }

        left.clear();
        right.clear();
        for _ in 0..size {
            let s = (2.0 * std::f32::consts::PI * phase).sin() * args.amplitude;
            left.push(s);
            right.push(-s);
            phase = (phase + phase_inc).fract();
        }

        let out_l = &mut out_left[..size];
        let out_r = &mut out_right[..size];
        if args.mono {
            processor.process_block(&[&left[..]], &mut [out_l, out_r]);
        } else {
            processor.process_block(&[&left[..], &right[..]], &mut [out_l, out_r]);
        }

        let report = BlockReport::capture(block, size, &shared);
        if args.json {
            println!("{}", serde_json::to_string(&report)?);
        } else {
            print_row(&report);
        }
    }

    Ok(())
}

fn print_header(config: &ProcessorConfig) {
    println!("Push policy: {:?}", config.push_policy);
    print!("{:>5} {:>5}", "BLOCK", "SIZE");
    for param in EngineParam::ALL {
        print!(" {:>11}", param.id());
    }
    for tap in SignalTap::ALL {
        print!(" {:>12}", tap.name());
    }
    println!();
}

fn print_row(report: &BlockReport) {
    print!("{:>5} {:>5}", report.block, report.size);
    for param in EngineParam::ALL {
        print!(" {:>11.4}", report.params[param.id()]);
    }
    for tap in SignalTap::ALL {
        print!(" {:>12.4}", report.signals[tap.name()]);
    }
    println!();
}
