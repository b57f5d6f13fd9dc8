//! # arch-health-js
//!
//! Lexical JavaScript/TypeScript module extraction for arch-health.
//!
//! This crate turns a scanned file into a
//! [`DependencyNode`](arch_health_core::DependencyNode):
//!
//! - [`LanguageExtractor`] trait for pluggable dialect support
//! - [`EcmaScriptExtractor`] for import/export/declaration extraction
//! - [`classify_layer`] and [`classify_kind`] for path-based classification
//! - [`FileAnalyzer`] combining both into a node

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod classify;
pub mod ecmascript;
pub mod extractor;
pub mod file_analyzer;

pub use classify::{classify_kind, classify_layer};
pub use ecmascript::EcmaScriptExtractor;
pub use extractor::{FileAnalysis, ImportInfo, ImportKind, LanguageExtractor};
pub use file_analyzer::FileAnalyzer;
