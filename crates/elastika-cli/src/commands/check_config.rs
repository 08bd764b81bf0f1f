//! Validate a processor configuration file.

use clap::Args;
use elastika_plugin::ProcessorConfig;
use std::path::PathBuf;

/// Parse and validate a configuration file, printing the effective values.
#[derive(Args)]
pub struct CheckConfigArgs {
    /// Path to the configuration file (TOML)
    pub file: PathBuf,
}

/// Run the check-config command.
pub fn run(args: CheckConfigArgs) -> anyhow::Result<()> {
    let config = ProcessorConfig::load(&args.file)?;

    println!("File:         {}", args.file.display());
    println!("Push policy:  {:?}", config.push_policy);
    println!("Tail length:  {:.3}s", config.tail_seconds);
    println!();
    println!("Effective configuration:");
    print!("{}", config.to_toml()?);

    Ok(())
}
