//! Circular dependency detection.
//!
//! Depth-first search over resolved imports with a `visited` set (nodes
//! fully explored) and a `recursion_stack` (nodes on the active path). When
//! an import resolves to a node on the active path, the path is sliced from
//! that node and closed by repeating it.
//!
//! The outer loop visits nodes in graph insertion order and imports are
//! followed in source order, so output is stable for an unchanged tree.

use std::collections::HashSet;

use arch_health_core::{CircularDependency, CycleSeverity, DependencyGraph};
use tracing::debug;

/// Cycles of at most this many modules count as short for severity.
const SHORT_CYCLE: usize = 3;
/// Cycles of at most this many modules are at least medium severity.
const MEDIUM_CYCLE: usize = 5;

/// Finds circular dependencies in a [`DependencyGraph`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CycleDetector {
    dedupe: bool,
}

impl CycleDetector {
    /// Creates a detector that reports every cycle the traversal closes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// When enabled, each cycle is rotated to start at its smallest id and
    /// repeats are dropped.
    #[must_use]
    pub fn with_dedupe(mut self, dedupe: bool) -> Self {
        self.dedupe = dedupe;
        self
    }

    /// Runs the traversal.
    #[must_use]
    pub fn detect(&self, graph: &DependencyGraph) -> Vec<CircularDependency> {
        let mut state = DfsState::default();

        for node in graph.nodes() {
            if !state.visited.contains(node.id.as_str()) {
                dfs(graph, &node.id, &mut state);
            }
        }

        let cycles = if self.dedupe {
            dedupe(state.cycles)
        } else {
            state.cycles
        };

        debug!("Cycle detection found {} cycle(s)", cycles.len());

        cycles
            .into_iter()
            .map(|cycle| {
                let severity = severity(graph, &cycle);
                CircularDependency { cycle, severity }
            })
            .collect()
    }
}

#[derive(Default)]
struct DfsState<'g> {
    visited: HashSet<&'g str>,
    recursion_stack: HashSet<&'g str>,
    path_stack: Vec<&'g str>,
    cycles: Vec<Vec<String>>,
}

fn dfs<'g>(graph: &'g DependencyGraph, id: &'g str, state: &mut DfsState<'g>) {
    state.visited.insert(id);
    state.recursion_stack.insert(id);
    state.path_stack.push(id);

    if let Some(node) = graph.get(id) {
        for spec in &node.imports {
            let Some(target) = graph.resolve(id, spec) else {
                continue;
            };
            if state.recursion_stack.contains(target) {
                record_cycle(target, state);
            } else if !state.visited.contains(target) {
                dfs(graph, target, state);
            }
        }
    }

    state.recursion_stack.remove(id);
    state.path_stack.pop();
}

fn record_cycle(target: &str, state: &mut DfsState<'_>) {
    if let Some(pos) = state.path_stack.iter().position(|x| *x == target) {
        let mut cycle: Vec<String> = state.path_stack[pos..]
            .iter()
            .map(|s| (*s).to_string())
            .collect();
        cycle.push(target.to_string());
        state.cycles.push(cycle);
    }
}

/// Rotates each cycle to start at its smallest id and keeps the first
/// occurrence of each rotation.
fn dedupe(cycles: Vec<Vec<String>>) -> Vec<Vec<String>> {
    let mut seen = HashSet::new();
    cycles
        .into_iter()
        .map(normalize)
        .filter(|cycle| seen.insert(cycle.clone()))
        .collect()
}

fn normalize(mut cycle: Vec<String>) -> Vec<String> {
    cycle.pop();
    let start = cycle
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.cmp(b.1))
        .map_or(0, |(i, _)| i);
    cycle.rotate_left(start);
    if let Some(first) = cycle.first().cloned() {
        cycle.push(first);
    }
    cycle
}

/// `high` for a short cycle through a core module, `medium` for a core
/// module or a cycle of at most five modules, else `low`.
fn severity(graph: &DependencyGraph, cycle: &[String]) -> CycleSeverity {
    let len = cycle.len().saturating_sub(1);
    let has_core = cycle
        .iter()
        .filter_map(|id| graph.get(id))
        .any(|n| n.kind.is_core());

    if has_core && len <= SHORT_CYCLE {
        CycleSeverity::High
    } else if has_core || len <= MEDIUM_CYCLE {
        CycleSeverity::Medium
    } else {
        CycleSeverity::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arch_health_core::{DependencyNode, Layer, ModuleKind};

    fn module(id: &str, imports: &[&str]) -> DependencyNode {
        DependencyNode::new(id, Layer::Unknown, ModuleKind::Module).with_imports(imports.to_vec())
    }

    fn service(id: &str, imports: &[&str]) -> DependencyNode {
        DependencyNode::new(id, Layer::Business, ModuleKind::Service)
            .with_imports(imports.to_vec())
    }

    fn graph(nodes: Vec<DependencyNode>) -> DependencyGraph {
        let mut g = DependencyGraph::new();
        for n in nodes {
            g.insert(n).unwrap();
        }
        g
    }

    fn ids(cycle: &CircularDependency) -> Vec<&str> {
        cycle.cycle.iter().map(String::as_str).collect()
    }

    #[test]
    fn acyclic_graph_has_no_cycles() {
        let g = graph(vec![
            module("a.ts", &["./b", "./c"]),
            module("b.ts", &["./d"]),
            module("c.ts", &["./d", "react"]),
            module("d.ts", &[]),
        ]);
        assert!(CycleDetector::new().detect(&g).is_empty());
    }

    #[test]
    fn empty_graph_has_no_cycles() {
        assert!(CycleDetector::new().detect(&DependencyGraph::new()).is_empty());
    }

    #[test]
    fn mutual_import_is_one_cycle() {
        let g = graph(vec![module("a.ts", &["./b"]), module("b.ts", &["./a"])]);
        let cycles = CycleDetector::new().detect(&g);
        assert_eq!(cycles.len(), 1);
        assert_eq!(ids(&cycles[0]), vec!["a.ts", "b.ts", "a.ts"]);
        assert_eq!(cycles[0].len(), 2);
        assert_eq!(cycles[0].severity, CycleSeverity::Medium);
    }

    #[test]
    fn three_services_in_a_loop_are_high() {
        let g = graph(vec![
            service("a.service.ts", &["./b.service"]),
            service("b.service.ts", &["./c.service"]),
            service("c.service.ts", &["./a.service"]),
        ]);
        let cycles = CycleDetector::new().detect(&g);
        assert_eq!(cycles.len(), 1);
        assert_eq!(
            ids(&cycles[0]),
            vec!["a.service.ts", "b.service.ts", "c.service.ts", "a.service.ts"]
        );
        assert_eq!(cycles[0].severity, CycleSeverity::High);
    }

    #[test]
    fn self_import_is_a_cycle() {
        let g = graph(vec![module("a.ts", &["./a"])]);
        let cycles = CycleDetector::new().detect(&g);
        assert_eq!(cycles.len(), 1);
        assert_eq!(ids(&cycles[0]), vec!["a.ts", "a.ts"]);
    }

    #[test]
    fn cycle_is_sliced_from_entry_point() {
        // entry -> a -> b -> a: the entry module is not part of the cycle
        let g = graph(vec![
            module("entry.ts", &["./a"]),
            module("a.ts", &["./b"]),
            module("b.ts", &["./a"]),
        ]);
        let cycles = CycleDetector::new().detect(&g);
        assert_eq!(cycles.len(), 1);
        assert_eq!(ids(&cycles[0]), vec!["a.ts", "b.ts", "a.ts"]);
    }

    #[test]
    fn severity_by_length_without_core_modules() {
        let six: Vec<DependencyNode> = (0..6)
            .map(|i| {
                let next = format!("./m{}", (i + 1) % 6);
                module(&format!("m{i}.ts"), &[next.as_str()])
            })
            .collect();
        let cycles = CycleDetector::new().detect(&graph(six));
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].len(), 6);
        assert_eq!(cycles[0].severity, CycleSeverity::Low);

        let five: Vec<DependencyNode> = (0..5)
            .map(|i| {
                let next = format!("./m{}", (i + 1) % 5);
                module(&format!("m{i}.ts"), &[next.as_str()])
            })
            .collect();
        let cycles = CycleDetector::new().detect(&graph(five));
        assert_eq!(cycles[0].severity, CycleSeverity::Medium);
    }

    #[test]
    fn long_cycle_through_core_module_is_medium() {
        let mut nodes: Vec<DependencyNode> = (0..5)
            .map(|i| {
                let next = format!("./m{}", i + 1);
                module(&format!("m{i}.ts"), &[next.as_str()])
            })
            .collect();
        nodes.push(
            DependencyNode::new("m5.ts", Layer::Data, ModuleKind::Repository)
                .with_imports(["./m0"]),
        );
        let cycles = CycleDetector::new().detect(&graph(nodes));
        assert_eq!(cycles[0].len(), 6);
        assert_eq!(cycles[0].severity, CycleSeverity::Medium);
    }

    #[test]
    fn figure_eight_reports_both_loops() {
        let g = graph(vec![
            module("a.ts", &["./b"]),
            module("b.ts", &["./a", "./c"]),
            module("c.ts", &["./b"]),
        ]);
        let cycles = CycleDetector::new().detect(&g);
        assert_eq!(cycles.len(), 2);
        assert_eq!(ids(&cycles[0]), vec!["a.ts", "b.ts", "a.ts"]);
        assert_eq!(ids(&cycles[1]), vec!["b.ts", "c.ts", "b.ts"]);
    }

    #[test]
    fn repeated_import_reports_the_same_cycle_twice() {
        // Two import statements for one edge close the same loop twice.
        let g = graph(vec![
            module("a.ts", &["./b"]),
            module("b.ts", &["./a", "./a.ts"]),
        ]);
        let cycles = CycleDetector::new().detect(&g);
        assert_eq!(cycles.len(), 2);
        assert_eq!(cycles[0].cycle, cycles[1].cycle);

        let deduped = CycleDetector::new().with_dedupe(true).detect(&g);
        assert_eq!(deduped.len(), 1);
        assert_eq!(ids(&deduped[0]), vec!["a.ts", "b.ts", "a.ts"]);
    }

    #[test]
    fn normalize_rotates_to_smallest_id() {
        let cycle = vec!["c".to_string(), "a".into(), "b".into(), "c".into()];
        assert_eq!(normalize(cycle), vec!["a", "b", "c", "a"]);
    }

    #[test]
    fn detection_is_deterministic() {
        let g = graph(vec![
            module("x.ts", &["./y"]),
            module("y.ts", &["./z", "./x"]),
            module("z.ts", &["./x"]),
        ]);
        let first = CycleDetector::new().detect(&g);
        let second = CycleDetector::new().detect(&g);
        assert_eq!(first, second);
    }
}
