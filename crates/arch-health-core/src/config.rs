//! Configuration types for arch-health.

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::types::Layer;

/// Directory names skipped by default: dependency caches and build output.
pub const DEFAULT_EXCLUDES: &[&str] = &[
    "node_modules",
    "dist",
    "build",
    "coverage",
    ".git",
    ".next",
    "out",
];

/// Source extensions recognized by default.
pub const DEFAULT_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx", "mjs", "cjs"];

/// Alias prefixes that are deliberately never resolved.
pub const DEFAULT_ALIAS_PREFIXES: &[&str] = &["@/", "~/", "#/"];

/// Top-level configuration for arch-health.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Scanner and resolution settings.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Cycle detection settings.
    #[serde(default)]
    pub cycles: CycleConfig,

    /// Coupling severity thresholds.
    #[serde(default)]
    pub coupling: CouplingThresholds,

    /// Optional override of the allowed layer dependencies:
    /// layer name -> list of layers it may import.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dependencies: BTreeMap<String, Vec<String>>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Validates config consistency.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.analyzer.sources.is_empty() {
            return Err(ConfigError::Validation(
                "analyzer.sources must name at least one directory".into(),
            ));
        }
        if self.analyzer.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "analyzer.extensions must not be empty".into(),
            ));
        }
        if self.analyzer.parallelism == Some(0) {
            return Err(ConfigError::Validation(
                "analyzer.parallelism must be at least 1".into(),
            ));
        }
        self.coupling.validate()?;
        self.dependency_table()?;
        Ok(())
    }

    /// Parses the `[dependencies]` override into typed layers.
    ///
    /// Returns `None` when no override is configured.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown layer names or self-dependencies.
    pub fn dependency_table(&self) -> Result<Option<BTreeMap<Layer, Vec<Layer>>>, ConfigError> {
        if self.dependencies.is_empty() {
            return Ok(None);
        }

        let mut table = BTreeMap::new();
        for (name, deps) in &self.dependencies {
            let layer: Layer = name.parse().map_err(|_| {
                ConfigError::Validation(format!("dependencies.{name}: unknown layer"))
            })?;

            let mut allowed = Vec::with_capacity(deps.len());
            for dep in deps {
                let target: Layer = dep.parse().map_err(|_| {
                    ConfigError::Validation(format!("dependencies.{name}: unknown dep '{dep}'"))
                })?;
                if target == layer {
                    return Err(ConfigError::Validation(format!(
                        "dependencies.{name}: self-dependency"
                    )));
                }
                allowed.push(target);
            }
            table.insert(layer, allowed);
        }

        Ok(Some(table))
    }
}

/// Scanner and resolution configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Project base directory; node ids are relative to it.
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Directories to scan, relative to `root`.
    #[serde(default = "default_sources")]
    pub sources: Vec<PathBuf>,

    /// Directory names or glob patterns to skip.
    #[serde(default = "default_excludes")]
    pub exclude: Vec<String>,

    /// File extensions to analyze, without the leading dot.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Import prefixes treated as unresolvable aliases.
    #[serde(default = "default_alias_prefixes")]
    pub alias_prefixes: Vec<String>,

    /// Whether to respect `.gitignore` files.
    #[serde(default)]
    pub respect_gitignore: bool,

    /// Maximum number of parallel file analyses.
    #[serde(default)]
    pub parallelism: Option<usize>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            sources: default_sources(),
            exclude: default_excludes(),
            extensions: default_extensions(),
            alias_prefixes: default_alias_prefixes(),
            respect_gitignore: false,
            parallelism: None,
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_sources() -> Vec<PathBuf> {
    vec![PathBuf::from(".")]
}

fn default_excludes() -> Vec<String> {
    DEFAULT_EXCLUDES.iter().map(ToString::to_string).collect()
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect()
}

fn default_alias_prefixes() -> Vec<String> {
    DEFAULT_ALIAS_PREFIXES
        .iter()
        .map(ToString::to_string)
        .collect()
}

/// Cycle detection configuration.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CycleConfig {
    /// Report each physical cycle once, normalized to start at its
    /// lexicographically smallest module.
    #[serde(default)]
    pub dedupe: bool,
}

/// Thresholds used to classify coupling metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CouplingThresholds {
    /// Instability above which a heavily coupled module is critical.
    pub critical_instability: f64,
    /// Total coupling above which an unstable module is critical.
    pub critical_total_coupling: usize,
    /// Distance above which a module is critical.
    pub critical_distance: f64,
    /// Instability above which a module is concerning.
    pub concerning_instability: f64,
    /// Distance above which a module is concerning.
    pub concerning_distance: f64,
    /// Total coupling above which a module is concerning.
    pub concerning_total_coupling: usize,
}

impl Default for CouplingThresholds {
    fn default() -> Self {
        Self {
            critical_instability: 0.8,
            critical_total_coupling: 20,
            critical_distance: 0.7,
            concerning_instability: 0.6,
            concerning_distance: 0.4,
            concerning_total_coupling: 15,
        }
    }
}

impl CouplingThresholds {
    /// Checks that ratio thresholds fall within `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first out-of-range threshold.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ratios = [
            ("critical_instability", self.critical_instability),
            ("critical_distance", self.critical_distance),
            ("concerning_instability", self.concerning_instability),
            ("concerning_distance", self.concerning_distance),
        ];
        for (name, value) in ratios {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Validation(format!(
                    "coupling.{name} must be between 0 and 1, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    #[diagnostic(code(arch_health::config::io))]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    #[diagnostic(code(arch_health::config::parse))]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// Config is structurally invalid.
    #[error("Config validation: {0}")]
    #[diagnostic(
        code(arch_health::config::invalid),
        help("layer names are: presentation, business, data, infrastructure, shared, unknown")
    )]
    Validation(String),
}
