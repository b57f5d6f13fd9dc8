//! Analysis pipeline: scan, extract, build the graph, run the checks.

use std::path::{Path, PathBuf};

use arch_health_core::{
    CircularDependency, Config, ConfigError, CouplingMetric, DependencyGraph, DependencyNode,
    GraphError, LayerViolation, ResolveOptions, ScanError, SourceFile, SourceScanner,
};
use arch_health_js::{FileAnalyzer, LanguageExtractor};
use arch_health_rules::{CouplingAnalyzer, CycleDetector, LayerPolicy, LayerValidator};
use miette::Diagnostic;
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::report::HealthReport;

/// Errors that abort an analysis run.
#[derive(Debug, Error, Diagnostic)]
pub enum AnalyzerError {
    /// IO error resolving the working directory.
    #[error("IO error: {0}")]
    #[diagnostic(code(arch_health::io))]
    Io(#[from] std::io::Error),

    /// Source discovery failed.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Scan(#[from] ScanError),

    /// Configuration is invalid.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    /// Graph construction failed.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Graph(#[from] GraphError),

    /// The worker pool could not be created.
    #[error("failed to build worker pool: {0}")]
    #[diagnostic(
        code(arch_health::thread_pool),
        help("check `analyzer.parallelism` in arch-health.toml")
    )]
    ThreadPool(String),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    base: Option<PathBuf>,
    roots: Vec<PathBuf>,
    exclude: Vec<String>,
    config: Option<Config>,
    extractors: Vec<Box<dyn LanguageExtractor>>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the project base directory (default: current directory).
    #[must_use]
    pub fn base(mut self, path: impl Into<PathBuf>) -> Self {
        self.base = Some(path.into());
        self
    }

    /// Adds a source root, relative to the project root. When any root is
    /// given, the configured `analyzer.sources` are replaced.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.roots.push(path.into());
        self
    }

    /// Adds an excluded directory name or glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude.push(pattern.into());
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Registers an extra language extractor.
    #[must_use]
    pub fn extractor(mut self, extractor: Box<dyn LanguageExtractor>) -> Self {
        self.extractors.push(extractor);
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or an exclude
    /// pattern does not parse.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let mut config = self.config.unwrap_or_default();
        if !self.roots.is_empty() {
            config.analyzer.sources = self.roots;
        }
        config.analyzer.exclude.extend(self.exclude);
        config.validate()?;

        let base = match self.base {
            Some(base) if base.is_absolute() => base,
            Some(base) => std::env::current_dir()?.join(base),
            None => std::env::current_dir()?,
        };

        let policy = config
            .dependency_table()?
            .map_or_else(LayerPolicy::default, LayerPolicy::from_table);
        let scanner = SourceScanner::from_config(&base, &config.analyzer)?;
        let file_analyzer = self
            .extractors
            .into_iter()
            .fold(FileAnalyzer::new(), FileAnalyzer::with_extractor);

        Ok(Analyzer {
            scanner,
            file_analyzer,
            policy,
            config,
        })
    }
}

/// Runs one analysis over a source tree.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    scanner: SourceScanner,
    file_analyzer: FileAnalyzer,
    policy: LayerPolicy,
    config: Config,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// The resolved project root; node ids are relative to it.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.scanner.base()
    }

    /// The effective configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Scans, builds the graph and runs every check.
    ///
    /// # Errors
    ///
    /// Returns an error if a source root is missing or the worker pool
    /// cannot be created. Unreadable files are skipped with a warning.
    pub fn analyze(&self) -> Result<AnalysisResult, AnalyzerError> {
        info!("Starting analysis at {}", self.root().display());

        let files: Vec<SourceFile> = self.scanner.files()?.collect();
        info!("Found {} source files", files.len());

        let nodes = match self.config.analyzer.parallelism {
            Some(threads) => rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| AnalyzerError::ThreadPool(e.to_string()))?
                .install(|| self.analyze_files(&files)),
            None => self.analyze_files(&files),
        };

        let mut graph = DependencyGraph::with_options(ResolveOptions::from(&self.config.analyzer));
        for node in nodes {
            graph.insert(node)?;
        }
        let resolved_imports = graph.edges().len();
        debug!(
            "Graph built: {} modules, {} resolved imports",
            graph.len(),
            resolved_imports
        );

        let detector = CycleDetector::new().with_dedupe(self.config.cycles.dedupe);
        let validator = LayerValidator::new(self.policy.clone());
        let coupling_analyzer = CouplingAnalyzer::new(self.config.coupling);

        let (cycles, (violations, coupling)) = rayon::join(
            || detector.detect(&graph),
            || {
                rayon::join(
                    || validator.validate(&graph),
                    || coupling_analyzer.analyze(&graph),
                )
            },
        );

        let report = HealthReport::generate(
            graph.len(),
            resolved_imports,
            &cycles,
            &violations,
            &coupling,
        );

        info!(
            "Analysis complete: {} cycles, {} layer violations, score {}",
            cycles.len(),
            violations.len(),
            report.summary.health_score
        );

        Ok(AnalysisResult {
            graph,
            cycles,
            violations,
            coupling,
            report,
        })
    }

    fn analyze_files(&self, files: &[SourceFile]) -> Vec<DependencyNode> {
        files
            .par_iter()
            .filter_map(|file| match std::fs::read_to_string(&file.path) {
                Ok(source) => Some(self.file_analyzer.analyze(&file.id, &source)),
                Err(e) => {
                    warn!("Skipping {}: {e}", file.path.display());
                    None
                }
            })
            .collect()
    }
}

/// Everything one run produced.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    /// The completed dependency graph.
    #[serde(skip)]
    pub graph: DependencyGraph,
    /// Circular dependencies.
    pub cycles: Vec<CircularDependency>,
    /// Layer violations.
    pub violations: Vec<LayerViolation>,
    /// Coupling metrics for every module.
    pub coupling: Vec<CouplingMetric>,
    /// Aggregated report.
    pub report: HealthReport,
}

impl AnalysisResult {
    /// True when any cycle or layer violation was found. Coupling issues
    /// alone do not count.
    #[must_use]
    pub fn has_findings(&self) -> bool {
        !self.cycles.is_empty() || !self.violations.is_empty()
    }
}
