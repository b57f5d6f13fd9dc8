//! arch-health CLI tool.
//!
//! Usage:
//! ```bash
//! arch-health check [OPTIONS] [PATH]
//! arch-health init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Architectural health analyzer for JavaScript/TypeScript projects
#[derive(Parser)]
#[command(name = "arch-health")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "ARCH_HEALTH_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a project and report cycles, layer violations and coupling
    Check {
        /// Project directory (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Source roots to scan, relative to the project (can be specified
        /// multiple times; replaces `analyzer.sources`)
        #[arg(short, long = "root")]
        roots: Vec<PathBuf>,

        /// Directory names or glob patterns to exclude (can be specified
        /// multiple times)
        #[arg(short, long)]
        exclude: Vec<String>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Also write architecture-report.md and architecture-results.json here
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Report each physical cycle once
        #[arg(long)]
        dedupe_cycles: bool,
    },

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for analysis results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// Markdown report.
    Markdown,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check {
            path,
            roots,
            exclude,
            format,
            output_dir,
            dedupe_cycles,
        } => {
            let args = commands::check::CheckArgs {
                path,
                roots,
                exclude,
                format,
                output_dir,
                dedupe_cycles,
            };
            commands::check::run(&args, cli.config.as_deref())
        }
        Commands::Init { force } => commands::init::run(force),
    }
}
