//! # arch-health-core
//!
//! Core model for architectural health analysis of JavaScript/TypeScript
//! source trees.
//!
//! This crate provides the building blocks shared by the other arch-health
//! crates:
//!
//! - [`SourceScanner`] for deterministic source file discovery
//! - [`DependencyGraph`] for module registration and import resolution
//! - [`DependencyNode`] and the finding types ([`CircularDependency`],
//!   [`LayerViolation`], [`CouplingMetric`])
//! - [`Config`] for `arch-health.toml` settings
//!
//! ## Example
//!
//! ```ignore
//! use arch_health_core::{DependencyGraph, DependencyNode, Layer, ModuleKind};
//!
//! let mut graph = DependencyGraph::new();
//! graph.insert(
//!     DependencyNode::new("src/app.ts", Layer::Unknown, ModuleKind::Module)
//!         .with_imports(["./db"]),
//! )?;
//! graph.insert(DependencyNode::new("src/db.ts", Layer::Data, ModuleKind::Module))?;
//!
//! assert_eq!(graph.resolve("src/app.ts", "./db"), Some("src/db.ts"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod graph;
mod scanner;
mod types;

pub use config::{
    AnalyzerConfig, Config, ConfigError, CouplingThresholds, CycleConfig, DEFAULT_ALIAS_PREFIXES,
    DEFAULT_EXCLUDES, DEFAULT_EXTENSIONS,
};
pub use graph::{DependencyGraph, GraphError, ResolveOptions};
pub use scanner::{relative_id, ScanError, SourceFile, SourceScanner};
pub use types::{
    CircularDependency, CouplingMetric, CouplingSeverity, CycleSeverity, DeclarationCounts,
    DependencyNode, Layer, LayerViolation, ModuleKind, UnknownLayer, ViolationSeverity,
};
