//! Check command implementation.

use anyhow::{Context, Result};
use arch_health::{AnalysisResult, Analyzer};
use std::path::{Path, PathBuf};

use crate::config_resolver;
use crate::OutputFormat;

/// Markdown report file written to `--output-dir`.
pub const REPORT_FILE: &str = "architecture-report.md";
/// JSON results file written to `--output-dir`.
pub const RESULTS_FILE: &str = "architecture-results.json";

/// Arguments of `arch-health check`.
#[derive(Debug, Clone)]
pub struct CheckArgs {
    /// Project directory.
    pub path: PathBuf,
    /// Source roots overriding `analyzer.sources`.
    pub roots: Vec<PathBuf>,
    /// Extra exclude entries.
    pub exclude: Vec<String>,
    /// Output format for stdout.
    pub format: OutputFormat,
    /// Where to write report artifacts, if anywhere.
    pub output_dir: Option<PathBuf>,
    /// Force cycle de-duplication on.
    pub dedupe_cycles: bool,
}

/// Runs the check command.
///
/// Exits the process with status 1 when cycles or layer violations are found.
pub fn run(args: &CheckArgs, explicit_config: Option<&Path>) -> Result<()> {
    let result = execute(args, explicit_config)?;

    super::output::print(&result, args.format)?;

    if let Some(dir) = &args.output_dir {
        write_artifacts(&result, dir)?;
    }

    if result.has_findings() {
        std::process::exit(1);
    }

    Ok(())
}

/// Loads config, builds the analyzer and runs it.
pub fn execute(args: &CheckArgs, explicit_config: Option<&Path>) -> Result<AnalysisResult> {
    let source = config_resolver::resolve(&args.path, explicit_config);
    let mut config = source.load()?;
    if args.dedupe_cycles {
        config.cycles.dedupe = true;
    }

    let mut builder = Analyzer::builder().base(&args.path).config(config);
    for root in &args.roots {
        builder = builder.root(root);
    }
    for pattern in &args.exclude {
        builder = builder.exclude(pattern);
    }

    let analyzer = builder.build().context("Failed to build analyzer")?;

    tracing::info!("Analyzing {}", analyzer.root().display());

    analyzer.analyze().context("Analysis failed")
}

/// Writes the Markdown report and JSON results into `dir`.
pub fn write_artifacts(result: &AnalysisResult, dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

    let report_path = dir.join(REPORT_FILE);
    std::fs::write(&report_path, result.report.to_markdown())
        .with_context(|| format!("Failed to write {}", report_path.display()))?;

    let results_path = dir.join(RESULTS_FILE);
    let json = serde_json::to_string_pretty(result)?;
    std::fs::write(&results_path, json)
        .with_context(|| format!("Failed to write {}", results_path.display()))?;

    tracing::info!("Wrote {} and {}", report_path.display(), results_path.display());
    Ok(())
}
