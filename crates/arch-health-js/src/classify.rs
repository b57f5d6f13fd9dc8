//! Path-based classification: maps file paths to layers and module kinds.
//!
//! Both classifiers lowercase the path and walk an ordered rule table;
//! the first rule with a matching keyword wins.

use arch_health_core::{Layer, ModuleKind};

/// Ordered layer rules: (keywords, layer).
const LAYER_RULES: &[(&[&str], Layer)] = &[
    (&["controller", "route", "middleware"], Layer::Presentation),
    (&["service", "domain"], Layer::Business),
    (&["repository", "db", "database"], Layer::Data),
    (&["config", "integration"], Layer::Infrastructure),
    (&["util", "type", "shared"], Layer::Shared),
];

/// Ordered kind rules: (keyword, kind).
const KIND_RULES: &[(&str, ModuleKind)] = &[
    ("controller", ModuleKind::Controller),
    ("service", ModuleKind::Service),
    ("repository", ModuleKind::Repository),
    ("middleware", ModuleKind::Middleware),
    ("config", ModuleKind::Config),
    ("type", ModuleKind::Type),
    ("util", ModuleKind::Util),
];

/// Which layer does this path belong to?
#[must_use]
pub fn classify_layer(path: &str) -> Layer {
    let lowered = path.to_ascii_lowercase();
    LAYER_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lowered.contains(k)))
        .map_or(Layer::Unknown, |(_, layer)| *layer)
}

/// Which kind of module does this path hold?
#[must_use]
pub fn classify_kind(path: &str) -> ModuleKind {
    let lowered = path.to_ascii_lowercase();
    KIND_RULES
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .map_or(ModuleKind::Module, |(_, kind)| *kind)
}
