//! Language-agnostic extraction types and trait.
//!
//! `LanguageExtractor` is the extension point for adding new source
//! dialects. Implement it to teach arch-health how to pull import
//! specifiers, exported names and declaration counts out of raw text.

use arch_health_core::DeclarationCounts;

/// How an import was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    /// `import x from '...'` or `import '...'`.
    Static,
    /// `require('...')` or `import('...')`.
    Call,
}

/// A single import specifier extracted from source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportInfo {
    /// Line number (1-indexed).
    pub line: usize,
    /// Specifier exactly as written, without quotes.
    pub specifier: String,
    /// Syntactic form of the import.
    pub kind: ImportKind,
}

/// Result of analyzing a single source text.
#[derive(Debug, Clone, Default)]
pub struct FileAnalysis {
    /// All imports, in source order.
    pub imports: Vec<ImportInfo>,
    /// Exported symbol names, in source order (may repeat).
    pub exports: Vec<String>,
    /// Abstract/concrete declaration counts.
    pub declarations: DeclarationCounts,
}

impl FileAnalysis {
    /// Import specifiers in source order.
    pub fn specifiers(&self) -> impl Iterator<Item = &str> {
        self.imports.iter().map(|i| i.specifier.as_str())
    }
}

/// Trait for dialect-specific lexical extraction.
///
/// The extractor receives raw source text and returns a [`FileAnalysis`].
/// Extraction is pattern based, never a full parse.
pub trait LanguageExtractor: Send + Sync {
    /// Language identifier (e.g., `"ecmascript"`).
    fn language_id(&self) -> &'static str;

    /// File extensions this extractor handles, without dots (e.g., `&["ts", "js"]`).
    fn extensions(&self) -> &'static [&'static str];

    /// Extract imports, exports and declaration counts from source text.
    fn analyze(&self, source: &str) -> FileAnalysis;
}
