//! Layered-architecture validation.
//!
//! Every resolved import is checked against a [`LayerPolicy`]. A layer may
//! always depend on itself; any other target must be listed in the source
//! layer's allowed set.

use std::collections::BTreeMap;

use arch_health_core::{DependencyGraph, Layer, LayerViolation, ViolationSeverity};
use tracing::debug;

/// Allowed layer dependencies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerPolicy {
    allowed: BTreeMap<Layer, Vec<Layer>>,
}

impl LayerPolicy {
    /// Builds a policy from an explicit table. Layers missing from the table
    /// may only depend on themselves.
    #[must_use]
    pub fn from_table(allowed: BTreeMap<Layer, Vec<Layer>>) -> Self {
        Self { allowed }
    }

    /// Layers `layer` may import besides itself.
    #[must_use]
    pub fn allowed(&self, layer: Layer) -> &[Layer] {
        self.allowed.get(&layer).map_or(&[], Vec::as_slice)
    }

    /// Can a module in `from` import a module in `to`?
    #[must_use]
    pub fn permits(&self, from: Layer, to: Layer) -> bool {
        from == to || self.allowed(from).contains(&to)
    }
}

impl Default for LayerPolicy {
    fn default() -> Self {
        use Layer::{Business, Data, Infrastructure, Presentation, Shared, Unknown};

        Self::from_table(BTreeMap::from([
            (Presentation, vec![Business, Infrastructure, Shared]),
            (Business, vec![Data, Infrastructure, Shared]),
            (Data, vec![Infrastructure, Shared]),
            (Infrastructure, vec![Shared]),
            (Shared, vec![]),
            (
                Unknown,
                vec![Presentation, Business, Data, Infrastructure, Shared],
            ),
        ]))
    }
}

/// Checks every resolved edge of a graph against a [`LayerPolicy`].
#[derive(Debug, Clone, Default)]
pub struct LayerValidator {
    policy: LayerPolicy,
}

impl LayerValidator {
    /// Creates a validator for `policy`.
    #[must_use]
    pub fn new(policy: LayerPolicy) -> Self {
        Self { policy }
    }

    /// The policy in use.
    #[must_use]
    pub fn policy(&self) -> &LayerPolicy {
        &self.policy
    }

    /// One violation per offending resolved import, in node then import order.
    #[must_use]
    pub fn validate(&self, graph: &DependencyGraph) -> Vec<LayerViolation> {
        let violations: Vec<LayerViolation> = graph
            .edges()
            .into_iter()
            .filter_map(|(from, to)| {
                let from = graph.get(from)?;
                let to = graph.get(to)?;
                if self.policy.permits(from.layer, to.layer) {
                    return None;
                }
                Some(LayerViolation {
                    violator: from.id.clone(),
                    violatee: to.id.clone(),
                    violator_layer: from.layer,
                    violatee_layer: to.layer,
                    severity: severity(from.layer, to.layer),
                })
            })
            .collect();

        debug!("Layer validation found {} violation(s)", violations.len());
        violations
    }
}

fn severity(from: Layer, to: Layer) -> ViolationSeverity {
    let upward = matches!(to, Layer::Presentation | Layer::Business);
    match from {
        Layer::Data if upward => ViolationSeverity::Critical,
        Layer::Infrastructure if upward => ViolationSeverity::Major,
        Layer::Shared if to != Layer::Shared => ViolationSeverity::Major,
        _ => ViolationSeverity::Minor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arch_health_core::{DependencyNode, ModuleKind};

    fn node(id: &str, layer: Layer, imports: &[&str]) -> DependencyNode {
        DependencyNode::new(id, layer, ModuleKind::Module).with_imports(imports.to_vec())
    }

    fn graph(nodes: Vec<DependencyNode>) -> DependencyGraph {
        let mut g = DependencyGraph::new();
        for n in nodes {
            g.insert(n).unwrap();
        }
        g
    }

    #[test]
    fn default_policy_matches_layer_hierarchy() {
        let policy = LayerPolicy::default();
        assert!(policy.permits(Layer::Presentation, Layer::Business));
        assert!(policy.permits(Layer::Business, Layer::Data));
        assert!(policy.permits(Layer::Data, Layer::Shared));
        assert!(policy.permits(Layer::Shared, Layer::Shared));
        assert!(policy.permits(Layer::Unknown, Layer::Data));

        assert!(!policy.permits(Layer::Presentation, Layer::Data));
        assert!(!policy.permits(Layer::Data, Layer::Business));
        assert!(!policy.permits(Layer::Shared, Layer::Infrastructure));
        assert!(!policy.permits(Layer::Business, Layer::Unknown));
    }

    #[test]
    fn data_importing_presentation_is_critical() {
        let g = graph(vec![
            node("src/data/repo.ts", Layer::Data, &["../web/view"]),
            node("src/web/view.ts", Layer::Presentation, &[]),
        ]);
        let violations = LayerValidator::default().validate(&g);
        assert_eq!(violations.len(), 1);
        let v = &violations[0];
        assert_eq!(v.violator, "src/data/repo.ts");
        assert_eq!(v.violatee, "src/web/view.ts");
        assert_eq!(v.violator_layer, Layer::Data);
        assert_eq!(v.violatee_layer, Layer::Presentation);
        assert_eq!(v.severity, ViolationSeverity::Critical);
    }

    #[test]
    fn severity_rules() {
        use Layer::{Business, Data, Infrastructure, Presentation, Shared, Unknown};
        assert_eq!(severity(Data, Business), ViolationSeverity::Critical);
        assert_eq!(severity(Infrastructure, Presentation), ViolationSeverity::Major);
        assert_eq!(severity(Infrastructure, Data), ViolationSeverity::Minor);
        assert_eq!(severity(Shared, Data), ViolationSeverity::Major);
        assert_eq!(severity(Shared, Unknown), ViolationSeverity::Major);
        assert_eq!(severity(Presentation, Data), ViolationSeverity::Minor);
        assert_eq!(severity(Business, Unknown), ViolationSeverity::Minor);
    }

    #[test]
    fn same_layer_and_unresolved_imports_are_ignored() {
        let g = graph(vec![
            node("a.ts", Layer::Shared, &["./b", "lodash", "@/x"]),
            node("b.ts", Layer::Shared, &[]),
        ]);
        assert!(LayerValidator::default().validate(&g).is_empty());
    }

    #[test]
    fn one_violation_per_offending_import() {
        let g = graph(vec![
            node("shared.ts", Layer::Shared, &["./svc", "./svc.ts"]),
            node("svc.ts", Layer::Business, &[]),
        ]);
        let violations = LayerValidator::default().validate(&g);
        assert_eq!(violations.len(), 2);
        assert!(violations.iter().all(|v| v.severity == ViolationSeverity::Major));
    }

    #[test]
    fn custom_table_overrides_default() {
        let policy = LayerPolicy::from_table(BTreeMap::from([(
            Layer::Presentation,
            vec![Layer::Data],
        )]));
        let g = graph(vec![
            node("ui.ts", Layer::Presentation, &["./repo", "./svc"]),
            node("repo.ts", Layer::Data, &[]),
            node("svc.ts", Layer::Business, &[]),
        ]);
        let violations = LayerValidator::new(policy).validate(&g);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].violatee, "svc.ts");
    }

    #[test]
    fn layers_missing_from_table_allow_only_themselves() {
        let policy = LayerPolicy::from_table(BTreeMap::new());
        assert!(policy.allowed(Layer::Business).is_empty());
        assert!(policy.permits(Layer::Business, Layer::Business));
        assert!(!policy.permits(Layer::Business, Layer::Shared));
    }
}
