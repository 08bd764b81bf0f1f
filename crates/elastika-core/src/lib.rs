//! Elastika Core - the real-time control plane of the Elastika effect
//!
//! This crate turns host-driven parameter values into sample-accurate
//! smoothed control values for an opaque physics engine, and publishes
//! level/activity telemetry for a presentation layer without locks.
//!
//! # Core Abstractions
//!
//! ## Smoothing
//!
//! - [`LagFilter`] - Per-parameter smoother; reaches its target within one block
//! - [`ParamCell`] - Lag filter plus block-start snapshots for one parameter
//! - [`RateController`] - Keeps lag rates at `1 / block_size`
//!
//! ## Dispatch
//!
//! - [`BlockDispatcher`] - Per-block target capture, per-sample smoothing and engine push
//! - [`PushPolicy`] - When smoothed values are handed to the engine
//!
//! ## Shared State
//!
//! - [`HostParams`] - Host-written targets, read by the audio thread at block boundaries
//! - [`Telemetry`] - Relaxed atomic slots polled by the UI
//!
//! ## Engine
//!
//! - [`Engine`] - Capability interface: one setter per [`EngineParam`], one stereo transform
//!
//! # Threading
//!
//! Every shared field has exactly one writer. Host targets are written by
//! the host/UI thread and read by the audio thread; telemetry slots are
//! written by the audio thread and read by any number of observers. Cells
//! and the engine are owned by the audio thread outright.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use elastika_core::{BlockDispatcher, EngineParam, HostParams, Telemetry};
//!
//! let host = HostParams::new();
//! let telemetry = Arc::new(Telemetry::new());
//! let mut dispatcher = BlockDispatcher::new(my_engine, Arc::clone(&telemetry));
//! dispatcher.prepare(48000.0, 64);
//!
//! host.set(EngineParam::Drive, 0.3);
//! dispatcher.process_block(&host, &in_l, &in_r, &mut out_l, &mut out_r);
//! let level = telemetry.param(EngineParam::Drive);
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: No allocations, locks or I/O in `process_block`
//! - **Block-granular targets**: Host changes are captured at block boundaries only
//! - **Total**: Every real-time function returns a result for every input

pub mod cell;
pub mod dispatch;
pub mod engine;
pub mod host_params;
pub mod lag;
pub mod rate;
pub mod telemetry;

// Re-export main types at crate root
pub use cell::{PUSH_EPSILON, ParamCell, PushPolicy};
pub use dispatch::BlockDispatcher;
pub use engine::{Engine, EngineParam, PARAM_COUNT};
pub use host_params::HostParams;
pub use lag::LagFilter;
pub use rate::RateController;
pub use telemetry::{BlockPeak, METER_FLOOR, SIGNAL_TAP_COUNT, SignalTap, Telemetry, TelemetrySlot};
