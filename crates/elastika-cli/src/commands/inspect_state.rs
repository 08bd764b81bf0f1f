//! Validate a saved state blob.

use clap::Args;
use elastika_core::{EngineParam, HostParams};
use elastika_plugin::load_state;
use std::path::PathBuf;

/// Load a state blob into a fresh parameter set and report the result.
#[derive(Args)]
pub struct InspectStateArgs {
    /// Path to the state file (JSON)
    pub file: PathBuf,

    /// Fail if any entry was not applied
    #[arg(long)]
    pub strict: bool,
}

/// Run the inspect-state command.
pub fn run(args: InspectStateArgs) -> anyhow::Result<()> {
    let blob = std::fs::read(&args.file)
        .map_err(|e| anyhow::anyhow!("failed to read '{}': {}", args.file.display(), e))?;

    let params = HostParams::new();
    let applied = load_state(&params, &blob);
    let entries = count_entries(&blob);

    println!("File:    {}", args.file.display());
    println!(
        "Entries: {}",
        entries.map_or_else(|| "not a JSON object".to_string(), |n| n.to_string())
    );
    println!("Applied: {applied}");
    println!();

    for param in EngineParam::ALL {
        let value = params.get(param);
        let marker = if value == param.default_value() { "" } else { "  *" };
        println!("  {:<12} {:>8.4}{}", param.id(), value, marker);
    }

    if args.strict && entries != Some(applied) {
        anyhow::bail!(
            "{} of {} entries were not applied",
            entries.unwrap_or(0).saturating_sub(applied),
            entries.map_or_else(|| "?".to_string(), |n| n.to_string())
        );
    }

    Ok(())
}

/// Number of top-level entries, or `None` if the blob is not a JSON object.
fn count_entries(blob: &[u8]) -> Option<usize> {
    serde_json::from_slice::<serde_json::Value>(blob)
        .ok()?
        .as_object()
        .map(serde_json::Map::len)
}
