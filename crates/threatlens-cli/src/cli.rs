//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ThreatLens - Extract security incidents from logs with an LLM and chart them.
#[derive(Debug, Parser)]
#[command(name = "threatlens")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path (default: ~/.threatlens/config.toml)
    #[arg(short, long, global = true, env = "THREATLENS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract incidents from a log file into a CSV table
    Extract(ExtractArgs),

    /// Chart an extracted CSV table
    Visualize(VisualizeArgs),

    /// Extract, then chart the result
    Run(RunArgs),
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// Plain-text log file
    pub input: PathBuf,

    /// Output CSV path (default from config: output.csv)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Model name, overriding the config
    #[arg(short, long)]
    pub model: Option<String>,
}

/// Arguments for the visualize command.
#[derive(Debug, Parser)]
pub struct VisualizeArgs {
    /// CSV table to chart (default from config: output.csv)
    pub input: Option<PathBuf>,

    /// Directory for the chart files
    #[arg(short = 'd', long)]
    pub output_dir: Option<PathBuf>,
}

/// Arguments for the run command.
#[derive(Debug, Parser)]
pub struct RunArgs {
    /// Plain-text log file
    pub input: PathBuf,

    /// Output CSV path (default from config: output.csv)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Directory for the chart files
    #[arg(short = 'd', long)]
    pub output_dir: Option<PathBuf>,

    /// Model name, overriding the config
    #[arg(short, long)]
    pub model: Option<String>,
}

impl RunArgs {
    /// Split into the arguments of the two stages
    pub fn into_stages(self) -> (ExtractArgs, VisualizeArgs) {
        let extract = ExtractArgs {
            input: self.input,
            output: self.output.clone(),
            model: self.model,
        };
        let visualize = VisualizeArgs {
            input: self.output,
            output_dir: self.output_dir,
        };
        (extract, visualize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_command() {
        let cli = Cli::parse_from(["threatlens", "extract", "logs.txt", "-o", "incidents.csv"]);
        match cli.command {
            Command::Extract(args) => {
                assert_eq!(args.input, PathBuf::from("logs.txt"));
                assert_eq!(args.output, Some(PathBuf::from("incidents.csv")));
            }
            _ => panic!("Expected Extract command"),
        }
    }

    #[test]
    fn test_visualize_defaults() {
        let cli = Cli::parse_from(["threatlens", "visualize"]);
        match cli.command {
            Command::Visualize(args) => {
                assert!(args.input.is_none());
                assert!(args.output_dir.is_none());
            }
            _ => panic!("Expected Visualize command"),
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from([
            "threatlens",
            "run",
            "logs.txt",
            "--verbose",
            "--config",
            "custom.toml",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        assert!(matches!(cli.command, Command::Run(_)));
    }

    #[test]
    fn test_run_stages_share_output() {
        let args = RunArgs {
            input: "logs.txt".into(),
            output: Some("out.csv".into()),
            output_dir: Some("charts".into()),
            model: None,
        };
        let (extract, visualize) = args.into_stages();
        assert_eq!(extract.output, visualize.input);
        assert_eq!(visualize.output_dir, Some(PathBuf::from("charts")));
    }
}
