//! Core types for dependency nodes and analysis findings.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

/// Architectural tier assigned to a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    /// Controllers, routes, middleware.
    Presentation,
    /// Services and domain logic.
    Business,
    /// Repositories and database access.
    Data,
    /// Configuration and external integrations.
    Infrastructure,
    /// Utilities and shared types.
    Shared,
    /// No layer could be inferred from the path.
    Unknown,
}

impl Layer {
    /// All layers, in hierarchy order.
    pub const ALL: [Layer; 6] = [
        Self::Presentation,
        Self::Business,
        Self::Data,
        Self::Infrastructure,
        Self::Shared,
        Self::Unknown,
    ];

    /// Lowercase name used in config files and reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Presentation => "presentation",
            Self::Business => "business",
            Self::Data => "data",
            Self::Infrastructure => "infrastructure",
            Self::Shared => "shared",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a layer name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown layer '{0}'")]
pub struct UnknownLayer(pub String);

impl FromStr for Layer {
    type Err = UnknownLayer;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|l| l.as_str() == lowered)
            .ok_or_else(|| UnknownLayer(s.to_string()))
    }
}

/// Role of a module, inferred from its file path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
    /// HTTP controller.
    Controller,
    /// Business service.
    Service,
    /// Data repository.
    Repository,
    /// Request middleware.
    Middleware,
    /// Configuration module.
    Config,
    /// Type declarations.
    Type,
    /// Utility helpers.
    Util,
    /// Anything else.
    Module,
}

impl ModuleKind {
    /// Returns true for the kinds that carry application logic
    /// (service, controller, repository).
    #[must_use]
    pub const fn is_core(self) -> bool {
        matches!(self, Self::Service | Self::Controller | Self::Repository)
    }

    /// Lowercase name used in reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Controller => "controller",
            Self::Service => "service",
            Self::Repository => "repository",
            Self::Middleware => "middleware",
            Self::Config => "config",
            Self::Type => "type",
            Self::Util => "util",
            Self::Module => "module",
        }
    }
}

impl std::fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Abstract and concrete declaration counts found in a file's text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationCounts {
    /// Interfaces, abstract classes and type aliases.
    pub abstract_count: usize,
    /// Classes, functions and constants.
    pub concrete_count: usize,
}

impl DeclarationCounts {
    /// Creates counts from raw numbers.
    #[must_use]
    pub const fn new(abstract_count: usize, concrete_count: usize) -> Self {
        Self {
            abstract_count,
            concrete_count,
        }
    }

    /// Ratio of abstract to all declarations, `0.0` when nothing was found.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn abstractness(&self) -> f64 {
        let total = self.abstract_count + self.concrete_count;
        if total == 0 {
            0.0
        } else {
            self.abstract_count as f64 / total as f64
        }
    }
}

/// One analyzed source file.
///
/// Built once by the file analyzer and owned by the
/// [`DependencyGraph`](crate::DependencyGraph) afterwards; the graph only
/// hands out shared references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyNode {
    /// Path relative to the project base, `/`-separated.
    pub id: String,
    /// Import specifiers exactly as written, in source order.
    pub imports: Vec<String>,
    /// Exported symbol names.
    pub exports: BTreeSet<String>,
    /// Architectural layer.
    pub layer: Layer,
    /// Module kind.
    pub kind: ModuleKind,
    /// Declaration counts used for abstractness.
    pub declarations: DeclarationCounts,
}

impl DependencyNode {
    /// Creates a node with no imports, exports or declarations.
    #[must_use]
    pub fn new(id: impl Into<String>, layer: Layer, kind: ModuleKind) -> Self {
        Self {
            id: id.into(),
            imports: Vec::new(),
            exports: BTreeSet::new(),
            layer,
            kind,
            declarations: DeclarationCounts::default(),
        }
    }

    /// Sets the import specifiers.
    #[must_use]
    pub fn with_imports<I, S>(mut self, imports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.imports = imports.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the exported names.
    #[must_use]
    pub fn with_exports<I, S>(mut self, exports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exports = exports.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the declaration counts.
    #[must_use]
    pub fn with_declarations(mut self, declarations: DeclarationCounts) -> Self {
        self.declarations = declarations;
        self
    }
}

/// Severity of a circular dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CycleSeverity {
    /// Long cycle between non-core modules.
    Low,
    /// Short cycle, or a cycle through a core module.
    Medium,
    /// Short cycle through a core module.
    High,
}

impl std::fmt::Display for CycleSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        })
    }
}

/// A circular dependency between modules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircularDependency {
    /// Module ids along the cycle; the first id is repeated at the end.
    pub cycle: Vec<String>,
    /// Severity of this cycle.
    pub severity: CycleSeverity,
}

impl CircularDependency {
    /// Number of distinct modules in the cycle (the closing id is not counted).
    #[must_use]
    pub fn len(&self) -> usize {
        self.cycle.len().saturating_sub(1)
    }

    /// Returns true if the cycle holds no modules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Formats the cycle as `a -> b -> a`.
    #[must_use]
    pub fn path(&self) -> String {
        self.cycle.join(" -> ")
    }
}

/// Severity of a layer violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViolationSeverity {
    /// Disallowed but low-impact direction.
    Minor,
    /// Infrastructure or shared code reaching upward.
    Major,
    /// Data layer reaching into presentation or business.
    Critical,
}

impl std::fmt::Display for ViolationSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Minor => "minor",
            Self::Major => "major",
            Self::Critical => "critical",
        })
    }
}

/// An import that crosses layers against the allowed direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerViolation {
    /// Importing module.
    pub violator: String,
    /// Imported module.
    pub violatee: String,
    /// Layer of the importing module.
    pub violator_layer: Layer,
    /// Layer of the imported module.
    pub violatee_layer: Layer,
    /// Severity of this violation.
    pub severity: ViolationSeverity,
}

impl std::fmt::Display for LayerViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}) -> {} ({})",
            self.violator, self.violator_layer, self.violatee, self.violatee_layer
        )
    }
}

/// Severity of a coupling measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CouplingSeverity {
    /// Within healthy bounds.
    Good,
    /// Worth watching.
    Concerning,
    /// Needs attention.
    Critical,
}

impl std::fmt::Display for CouplingSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Good => "good",
            Self::Concerning => "concerning",
            Self::Critical => "critical",
        })
    }
}

/// Martin coupling metrics for one module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouplingMetric {
    /// Module id.
    pub id: String,
    /// Ca: distinct other modules importing this one.
    pub afferent_coupling: usize,
    /// Ce: distinct modules this one imports.
    pub efferent_coupling: usize,
    /// I = Ce / (Ca + Ce).
    pub instability: f64,
    /// A = abstract / (abstract + concrete).
    pub abstractness: f64,
    /// D = |A + I - 1|.
    pub distance: f64,
    /// Severity of this measurement.
    pub severity: CouplingSeverity,
}

impl CouplingMetric {
    /// Ca + Ce.
    #[must_use]
    pub fn total_coupling(&self) -> usize {
        self.afferent_coupling + self.efferent_coupling
    }
}
