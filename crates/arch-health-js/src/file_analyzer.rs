//! Turns one file's id and text into a [`DependencyNode`].

use arch_health_core::DependencyNode;
use tracing::debug;

use crate::classify::{classify_kind, classify_layer};
use crate::ecmascript::EcmaScriptExtractor;
use crate::extractor::LanguageExtractor;

/// Combines lexical extraction with path classification.
///
/// Registered extractors are chosen by file extension; anything no
/// extractor claims goes through the ECMAScript extractor.
pub struct FileAnalyzer {
    extractors: Vec<Box<dyn LanguageExtractor>>,
    fallback: EcmaScriptExtractor,
}

impl FileAnalyzer {
    /// Creates an analyzer with only the built-in ECMAScript extractor.
    #[must_use]
    pub fn new() -> Self {
        Self {
            extractors: Vec::new(),
            fallback: EcmaScriptExtractor::new(),
        }
    }

    /// Registers an extractor, consulted before the built-in one.
    #[must_use]
    pub fn with_extractor(mut self, extractor: Box<dyn LanguageExtractor>) -> Self {
        self.extractors.push(extractor);
        self
    }

    /// Builds the node for `id` from its source text.
    #[must_use]
    pub fn analyze(&self, id: &str, source: &str) -> DependencyNode {
        let extractor = self.extractor_for(id);
        let analysis = extractor.analyze(source);

        let layer = classify_layer(id);
        let kind = classify_kind(id);
        debug!(
            "{id}: {} imports, layer={layer}, kind={kind} ({})",
            analysis.imports.len(),
            extractor.language_id()
        );

        DependencyNode::new(id, layer, kind)
            .with_imports(analysis.specifiers())
            .with_exports(analysis.exports)
            .with_declarations(analysis.declarations)
    }

    fn extractor_for(&self, id: &str) -> &dyn LanguageExtractor {
        let ext = id.rsplit_once('.').map_or("", |(_, e)| e);
        self.extractors
            .iter()
            .find(|e| e.extensions().contains(&ext))
            .map_or(&self.fallback as &dyn LanguageExtractor, |e| e.as_ref())
    }
}

impl Default for FileAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
