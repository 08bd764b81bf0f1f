//! Print the parameter table and the default state.

use clap::Args;
use elastika_core::{EngineParam, HostParams};
use elastika_plugin::save_state;

/// Print every parameter with its default.
#[derive(Args)]
pub struct DefaultsArgs {
    /// Print only the default state blob as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the defaults command.
pub fn run(args: DefaultsArgs) -> anyhow::Result<()> {
    let blob = save_state(&HostParams::new())?;

    if args.json {
        println!("{}", String::from_utf8(blob)?);
        return Ok(());
    }

    println!("{:<4} {:<12} {:<12} {:>8}", "#", "ID", "NAME", "DEFAULT");
    for param in EngineParam::ALL {
        println!(
            "{:<4} {:<12} {:<12} {:>8.3}",
            param.index(),
            param.id(),
            param.name(),
            param.default_value()
        );
    }
    println!();
    println!("State: {}", String::from_utf8(blob)?);

    Ok(())
}
