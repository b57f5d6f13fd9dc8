//! # arch-health
//!
//! Architectural integrity analyzer for JavaScript/TypeScript source trees.
//!
//! This is the facade crate: it wires the scanner, the file analyzer and
//! the graph checks into one [`Analyzer`] run and turns the findings into a
//! scored [`HealthReport`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use arch_health::Analyzer;
//!
//! let result = Analyzer::builder()
//!     .base("./my-app")
//!     .root("src")
//!     .exclude("__generated__")
//!     .build()?
//!     .analyze()?;
//!
//! println!("{}", result.report.to_markdown());
//! if result.has_findings() {
//!     std::process::exit(1);
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
pub mod report;

pub use analyzer::{AnalysisResult, Analyzer, AnalyzerBuilder, AnalyzerError};
pub use report::{Grade, HealthReport, Summary};

// Re-export core types
pub use arch_health_core::*;

/// Source extraction and classification.
pub mod js {
    pub use arch_health_js::*;
}

/// Graph checks.
pub mod rules {
    pub use arch_health_rules::*;
}
