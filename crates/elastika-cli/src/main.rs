//! Elastika CLI - offline harness for the Elastika control plane.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "elastika")]
#[command(author, version, about = "Elastika control-plane harness", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the parameter table and the default state blob
    Defaults(commands::defaults::DefaultsArgs),

    /// Validate a saved state blob and show what it would apply
    InspectState(commands::inspect_state::InspectStateArgs),

    /// Validate a processor configuration file
    CheckConfig(commands::check_config::CheckConfigArgs),

    /// Run blocks through the processor and print published telemetry
    Simulate(commands::simulate::SimulateArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Defaults(args) => commands::defaults::run(args),
        Commands::InspectState(args) => commands::inspect_state::run(args),
        Commands::CheckConfig(args) => commands::check_config::run(args),
        Commands::Simulate(args) => commands::simulate::run(args),
    }
}
