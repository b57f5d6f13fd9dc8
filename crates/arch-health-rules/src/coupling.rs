//! Martin coupling metrics.
//!
//! For each module:
//!
//! - `Ce`: distinct modules it imports
//! - `Ca`: distinct other modules importing it
//! - `I = Ce / (Ca + Ce)`, `0` for an isolated module
//! - `A`: declaration abstractness computed at extraction time
//! - `D = |A + I - 1|`

use std::collections::{HashMap, HashSet};

use arch_health_core::{CouplingMetric, CouplingSeverity, CouplingThresholds, DependencyGraph};
use tracing::debug;

/// Computes a [`CouplingMetric`] for every node of a graph.
#[derive(Debug, Clone, Copy, Default)]
pub struct CouplingAnalyzer {
    thresholds: CouplingThresholds,
}

impl CouplingAnalyzer {
    /// Creates an analyzer classifying with `thresholds`.
    #[must_use]
    pub fn new(thresholds: CouplingThresholds) -> Self {
        Self { thresholds }
    }

    /// One metric per node, in graph insertion order.
    #[must_use]
    pub fn analyze(&self, graph: &DependencyGraph) -> Vec<CouplingMetric> {
        let ids: Vec<&str> = graph.nodes().map(|n| n.id.as_str()).collect();

        // Forward targets per node, then a single reverse pass for Ca.
        let targets: Vec<Vec<&str>> = ids
            .iter()
            .map(|id| {
                graph
                    .resolved_targets(id)
                    .into_iter()
                    .filter(|t| t != id)
                    .collect()
            })
            .collect();

        let mut importers: HashMap<&str, HashSet<&str>> = HashMap::with_capacity(ids.len());
        for (from, tos) in ids.iter().zip(&targets) {
            for to in tos {
                importers.entry(*to).or_default().insert(*from);
            }
        }

        let metrics: Vec<CouplingMetric> = graph
            .nodes()
            .zip(&targets)
            .map(|(node, tos)| {
                let ca = importers.get(node.id.as_str()).map_or(0, HashSet::len);
                let ce = tos.len();
                let instability = instability(ca, ce);
                let abstractness = node.declarations.abstractness();
                let distance = (abstractness + instability - 1.0).abs();

                let mut metric = CouplingMetric {
                    id: node.id.clone(),
                    afferent_coupling: ca,
                    efferent_coupling: ce,
                    instability,
                    abstractness,
                    distance,
                    severity: CouplingSeverity::Good,
                };
                metric.severity = self.classify(&metric);
                metric
            })
            .collect();

        debug!(
            "Coupling analysis: {} module(s), {} non-good",
            metrics.len(),
            metrics
                .iter()
                .filter(|m| m.severity != CouplingSeverity::Good)
                .count()
        );
        metrics
    }

    /// Severity of one measurement under these thresholds.
    #[must_use]
    pub fn classify(&self, metric: &CouplingMetric) -> CouplingSeverity {
        let t = &self.thresholds;
        let total = metric.total_coupling();

        if (metric.instability > t.critical_instability && total > t.critical_total_coupling)
            || metric.distance > t.critical_distance
        {
            CouplingSeverity::Critical
        } else if metric.instability > t.concerning_instability
            || metric.distance > t.concerning_distance
            || total > t.concerning_total_coupling
        {
            CouplingSeverity::Concerning
        } else {
            CouplingSeverity::Good
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn instability(ca: usize, ce: usize) -> f64 {
    let total = ca + ce;
    if total == 0 {
        0.0
    } else {
        ce as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arch_health_core::{DeclarationCounts, DependencyNode, Layer, ModuleKind};

    fn node(id: &str, imports: &[&str]) -> DependencyNode {
        DependencyNode::new(id, Layer::Unknown, ModuleKind::Module).with_imports(imports.to_vec())
    }

    fn graph(nodes: Vec<DependencyNode>) -> DependencyGraph {
        let mut g = DependencyGraph::new();
        for n in nodes {
            g.insert(n).unwrap();
        }
        g
    }

    fn metric_for<'a>(metrics: &'a [CouplingMetric], id: &str) -> &'a CouplingMetric {
        metrics.iter().find(|m| m.id == id).unwrap()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn isolated_module_has_zero_instability() {
        let metrics = CouplingAnalyzer::default().analyze(&graph(vec![node("lonely.ts", &[])]));
        let m = &metrics[0];
        assert_eq!(m.afferent_coupling, 0);
        assert_eq!(m.efferent_coupling, 0);
        assert!(approx(m.instability, 0.0));
        // A = 0, I = 0 puts the module in the zone of pain.
        assert!(approx(m.distance, 1.0));
        assert_eq!(m.severity, CouplingSeverity::Critical);
    }

    #[test]
    fn counts_distinct_targets_and_importers() {
        let g = graph(vec![
            node("a.ts", &["./hub", "./hub", "./hub.ts"]),
            node("b.ts", &["./hub", "react"]),
            node("c.ts", &["./hub"]),
            node("hub.ts", &["./types"]),
            node("types.ts", &[]),
        ]);
        let metrics = CouplingAnalyzer::default().analyze(&g);

        let hub = metric_for(&metrics, "hub.ts");
        assert_eq!(hub.afferent_coupling, 3);
        assert_eq!(hub.efferent_coupling, 1);
        assert!(approx(hub.instability, 0.25));

        let a = metric_for(&metrics, "a.ts");
        assert_eq!(a.afferent_coupling, 0);
        assert_eq!(a.efferent_coupling, 1);
        assert!(approx(a.instability, 1.0));

        let types = metric_for(&metrics, "types.ts");
        assert_eq!(types.afferent_coupling, 1);
        assert_eq!(types.efferent_coupling, 0);
    }

    #[test]
    fn self_import_is_not_coupling() {
        let metrics = CouplingAnalyzer::default().analyze(&graph(vec![node("a.ts", &["./a"])]));
        assert_eq!(metrics[0].afferent_coupling, 0);
        assert_eq!(metrics[0].efferent_coupling, 0);
    }

    #[test]
    fn abstract_stable_module_sits_on_main_sequence() {
        let g = graph(vec![
            node("impl.ts", &["./contract"]),
            DependencyNode::new("contract.ts", Layer::Shared, ModuleKind::Type)
                .with_declarations(DeclarationCounts::new(2, 0)),
        ]);
        let metrics = CouplingAnalyzer::default().analyze(&g);
        let contract = metric_for(&metrics, "contract.ts");
        assert!(approx(contract.abstractness, 1.0));
        assert!(approx(contract.instability, 0.0));
        assert!(approx(contract.distance, 0.0));
        assert_eq!(contract.severity, CouplingSeverity::Good);
    }

    #[test]
    fn metrics_follow_insertion_order() {
        let g = graph(vec![node("z.ts", &[]), node("a.ts", &[])]);
        let ids: Vec<String> = CouplingAnalyzer::default()
            .analyze(&g)
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec!["z.ts", "a.ts"]);
    }

    fn metric(ca: usize, ce: usize, instability: f64, distance: f64) -> CouplingMetric {
        CouplingMetric {
            id: "m.ts".into(),
            afferent_coupling: ca,
            efferent_coupling: ce,
            instability,
            abstractness: 0.0,
            distance,
            severity: CouplingSeverity::Good,
        }
    }

    #[test]
    fn classification_thresholds() {
        let analyzer = CouplingAnalyzer::default();

        // Highly unstable and heavily coupled.
        assert_eq!(
            analyzer.classify(&metric(2, 19, 0.9, 0.1)),
            CouplingSeverity::Critical
        );
        // Unstable but lightly coupled is only concerning.
        assert_eq!(
            analyzer.classify(&metric(1, 9, 0.9, 0.1)),
            CouplingSeverity::Concerning
        );
        assert_eq!(
            analyzer.classify(&metric(0, 0, 0.0, 0.71)),
            CouplingSeverity::Critical
        );
        assert_eq!(
            analyzer.classify(&metric(0, 0, 0.0, 0.7)),
            CouplingSeverity::Concerning
        );
        assert_eq!(
            analyzer.classify(&metric(8, 8, 0.5, 0.1)),
            CouplingSeverity::Concerning
        );
        assert_eq!(
            analyzer.classify(&metric(4, 4, 0.5, 0.4)),
            CouplingSeverity::Good
        );
    }

    #[test]
    fn custom_thresholds() {
        let strict = CouplingAnalyzer::new(CouplingThresholds {
            concerning_distance: 0.05,
            ..CouplingThresholds::default()
        });
        assert_eq!(
            strict.classify(&metric(1, 1, 0.5, 0.1)),
            CouplingSeverity::Concerning
        );
    }
}
