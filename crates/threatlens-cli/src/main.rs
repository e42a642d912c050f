//! ThreatLens CLI - extract security incidents from logs and chart them.

use clap::Parser;
use threatlens_cli::commands;
use threatlens_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> threatlens_cli::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // OPENAI_API_KEY may come from a .env file
    dotenvy::dotenv().ok();

    let config = Config::load(cli.config.as_deref())?;
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(color_enabled, config.settings.preview_rows);

    match cli.command {
        Command::Extract(args) => {
            commands::execute_extract(args, &config, &formatter)?;
        }
        Command::Visualize(args) => {
            commands::execute_visualize(args, &config, &formatter)?;
        }
        Command::Run(args) => {
            commands::execute_run(args, &config, &formatter)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
