//! Host-facing processor for the Elastika effect.
//!
//! This crate wraps the real-time control plane from `elastika-core` in the
//! surface a plugin-format adapter needs: metadata, bus-layout negotiation,
//! channel mapping, parameter persistence and a configuration file.
//!
//! # Architecture
//!
//! | Concern | Type |
//! |---------|------|
//! | Audio callback | [`ElastikaProcessor::process_block`] |
//! | Host/UI parameter writes | [`ElastikaShared`] |
//! | Session state | [`save_state`] / [`load_state`] (JSON, id → value) |
//! | Construction settings | [`ProcessorConfig`] (TOML) |
//!
//! # Example
//!
//! ```rust,ignore
//! use elastika_plugin::{ElastikaProcessor, ProcessorConfig};
//!
//! let config = ProcessorConfig::load("elastika.toml")?;
//! let mut processor = ElastikaProcessor::with_config(my_engine, config);
//! processor.prepare_to_play(48000.0, 512);
//!
//! let ui = processor.shared();
//! ui.set(elastika_core::EngineParam::Drive, 0.7);
//! processor.process_block(&[&in_l, &in_r], &mut [&mut out_l, &mut out_r]);
//! ```

pub mod config;
pub mod error;
pub mod processor;
pub mod shared;
pub mod state;

pub use config::{DEFAULT_TAIL_SECONDS, ProcessorConfig};
pub use error::{ConfigError, PluginError, StateError};
pub use processor::{BusLayout, ChannelSet, DEFAULT_PROGRAM_NAME, ElastikaProcessor, PROCESSOR_NAME};
pub use shared::ElastikaShared;
pub use state::{load_state, save_state};
