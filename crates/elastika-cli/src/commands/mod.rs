//! CLI command implementations.

pub mod check_config;
pub mod common;
pub mod defaults;
pub mod inspect_state;
pub mod simulate;
