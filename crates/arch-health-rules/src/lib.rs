//! # arch-health-rules
//!
//! Graph checks run over a completed
//! [`DependencyGraph`](arch_health_core::DependencyGraph).
//!
//! | Check | Output |
//! |-------|--------|
//! | [`CycleDetector`] | circular dependencies with high/medium/low severity |
//! | [`LayerValidator`] | imports crossing layers against a [`LayerPolicy`] |
//! | [`CouplingAnalyzer`] | afferent/efferent coupling, instability, abstractness, distance |
//!
//! All checks are read-only over the graph and independent of each other.
//!
//! ## Usage
//!
//! ```ignore
//! use arch_health_rules::{CycleDetector, LayerValidator};
//!
//! let cycles = CycleDetector::new().detect(&graph);
//! let violations = LayerValidator::default().validate(&graph);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod coupling;
pub mod cycles;
pub mod layers;

pub use coupling::CouplingAnalyzer;
pub use cycles::CycleDetector;
pub use layers::{LayerPolicy, LayerValidator};
