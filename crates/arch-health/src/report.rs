//! Health report: score, grade, summary counts and recommendations.

use std::fmt::Write as _;

use arch_health_core::{
    CircularDependency, CouplingMetric, CouplingSeverity, CycleSeverity, LayerViolation,
    ViolationSeverity,
};
use serde::{Deserialize, Serialize};

/// Penalty per high-severity cycle.
pub const HIGH_CYCLE_PENALTY: u32 = 15;
/// Penalty per medium-severity cycle.
pub const MEDIUM_CYCLE_PENALTY: u32 = 5;
/// Penalty per critical layer violation.
pub const CRITICAL_VIOLATION_PENALTY: u32 = 20;
/// Penalty per major layer violation.
pub const MAJOR_VIOLATION_PENALTY: u32 = 10;
/// Penalty per critical coupling metric.
pub const CRITICAL_COUPLING_PENALTY: u32 = 8;
/// Penalty per concerning coupling metric.
pub const CONCERNING_COUPLING_PENALTY: u32 = 3;

/// Maximum number of coupling issues listed in a report.
pub const TOP_COUPLING_ISSUES: usize = 10;

const CYCLE_ADVICE: &str = "Break circular dependencies by extracting shared code into a \
     separate module or inverting one direction behind an interface.";
const VIOLATION_ADVICE: &str = "Route cross-layer calls through the allowed direction: \
     presentation -> business -> data, with infrastructure and shared below.";
const COUPLING_ADVICE: &str = "Reduce coupling in the listed modules: split large modules, \
     depend on abstractions, and move stable code towards abstract types.";
const HEALTHY_ADVICE: &str = "No structural issues found. Keep running the analysis in CI to \
     catch regressions early.";

/// Letter grade derived from the health score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    /// 90 and above.
    A,
    /// 80 to 89.
    B,
    /// 70 to 79.
    C,
    /// 60 to 69.
    D,
    /// Below 60.
    F,
}

impl Grade {
    /// Grade for a 0..=100 score.
    #[must_use]
    pub fn from_score(score: u32) -> Self {
        match score {
            90.. => Self::A,
            80..=89 => Self::B,
            70..=79 => Self::C,
            60..=69 => Self::D,
            _ => Self::F,
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        };
        f.write_str(s)
    }
}

/// Executive summary counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of modules in the graph.
    pub files_analyzed: usize,
    /// Number of resolved import edges.
    pub resolved_imports: usize,
    /// Total cycles.
    pub cycles: usize,
    /// High-severity cycles.
    pub high_cycles: usize,
    /// Medium-severity cycles.
    pub medium_cycles: usize,
    /// Low-severity cycles.
    pub low_cycles: usize,
    /// Total layer violations.
    pub violations: usize,
    /// Critical layer violations.
    pub critical_violations: usize,
    /// Major layer violations.
    pub major_violations: usize,
    /// Minor layer violations.
    pub minor_violations: usize,
    /// Critical coupling metrics.
    pub critical_coupling: usize,
    /// Concerning coupling metrics.
    pub concerning_coupling: usize,
    /// Health score, 0..=100.
    pub health_score: u32,
}

/// Aggregated findings of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    /// Summary counts and score.
    pub summary: Summary,
    /// Letter grade for the score.
    pub grade: Grade,
    /// Every cycle found.
    pub cycles: Vec<CircularDependency>,
    /// Every layer violation found.
    pub violations: Vec<LayerViolation>,
    /// Worst non-good coupling metrics, by distance descending.
    pub coupling_issues: Vec<CouplingMetric>,
    /// Advice keyed on which categories have findings.
    pub recommendations: Vec<String>,
}

impl HealthReport {
    /// Builds a report from the findings of one run.
    #[must_use]
    pub fn generate(
        files_analyzed: usize,
        resolved_imports: usize,
        cycles: &[CircularDependency],
        violations: &[LayerViolation],
        coupling: &[CouplingMetric],
    ) -> Self {
        let count_cycles =
            |s: CycleSeverity| cycles.iter().filter(|c| c.severity == s).count();
        let count_violations =
            |s: ViolationSeverity| violations.iter().filter(|v| v.severity == s).count();
        let count_coupling =
            |s: CouplingSeverity| coupling.iter().filter(|m| m.severity == s).count();

        let mut summary = Summary {
            files_analyzed,
            resolved_imports,
            cycles: cycles.len(),
            high_cycles: count_cycles(CycleSeverity::High),
            medium_cycles: count_cycles(CycleSeverity::Medium),
            low_cycles: count_cycles(CycleSeverity::Low),
            violations: violations.len(),
            critical_violations: count_violations(ViolationSeverity::Critical),
            major_violations: count_violations(ViolationSeverity::Major),
            minor_violations: count_violations(ViolationSeverity::Minor),
            critical_coupling: count_coupling(CouplingSeverity::Critical),
            concerning_coupling: count_coupling(CouplingSeverity::Concerning),
            health_score: 0,
        };
        summary.health_score = health_score(&summary);

        let coupling_issues = top_coupling_issues(coupling);
        let recommendations = recommendations(cycles, violations, &coupling_issues);

        Self {
            grade: Grade::from_score(summary.health_score),
            summary,
            cycles: cycles.to_vec(),
            violations: violations.to_vec(),
            coupling_issues,
            recommendations,
        }
    }

    /// Renders the report as Markdown.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let s = &self.summary;
        let mut out = String::new();

        let _ = writeln!(out, "# Architecture Health Report\n");
        let _ = writeln!(
            out,
            "**Health score:** {}/100 (grade {})\n",
            s.health_score, self.grade
        );

        let _ = writeln!(out, "## Summary\n");
        let _ = writeln!(out, "| Metric | Count |");
        let _ = writeln!(out, "|---|---|");
        let _ = writeln!(out, "| Files analyzed | {} |", s.files_analyzed);
        let _ = writeln!(out, "| Resolved imports | {} |", s.resolved_imports);
        let _ = writeln!(
            out,
            "| Circular dependencies | {} (high {}, medium {}, low {}) |",
            s.cycles, s.high_cycles, s.medium_cycles, s.low_cycles
        );
        let _ = writeln!(
            out,
            "| Layer violations | {} (critical {}, major {}, minor {}) |",
            s.violations, s.critical_violations, s.major_violations, s.minor_violations
        );
        let _ = writeln!(
            out,
            "| Coupling issues | critical {}, concerning {} |",
            s.critical_coupling, s.concerning_coupling
        );

        let _ = writeln!(out, "\n## Circular Dependencies\n");
        if self.cycles.is_empty() {
            let _ = writeln!(out, "None found.");
        }
        for cycle in &self.cycles {
            let _ = writeln!(
                out,
                "- **{}** `{}`",
                severity_label(cycle.severity),
                cycle.path()
            );
        }

        let _ = writeln!(out, "\n## Layer Violations\n");
        if self.violations.is_empty() {
            let _ = writeln!(out, "None found.");
        }
        for v in &self.violations {
            let _ = writeln!(
                out,
                "- **{}** `{}` ({}) imports `{}` ({})",
                severity_label(v.severity),
                v.violator,
                v.violator_layer,
                v.violatee,
                v.violatee_layer
            );
        }

        let _ = writeln!(out, "\n## Coupling Issues\n");
        if self.coupling_issues.is_empty() {
            let _ = writeln!(out, "None found.");
        } else {
            let _ = writeln!(out, "| Module | Ca | Ce | I | A | D | Severity |");
            let _ = writeln!(out, "|---|---|---|---|---|---|---|");
            for m in &self.coupling_issues {
                let _ = writeln!(
                    out,
                    "| `{}` | {} | {} | {:.2} | {:.2} | {:.2} | {} |",
                    m.id,
                    m.afferent_coupling,
                    m.efferent_coupling,
                    m.instability,
                    m.abstractness,
                    m.distance,
                    severity_label(m.severity)
                );
            }
        }

        let _ = writeln!(out, "\n## Recommendations\n");
        for r in &self.recommendations {
            let _ = writeln!(out, "- {r}");
        }

        out
    }
}

/// `100 - penalties`, floored at zero.
#[must_use]
pub fn health_score(summary: &Summary) -> u32 {
    let weighted = [
        (summary.high_cycles, HIGH_CYCLE_PENALTY),
        (summary.medium_cycles, MEDIUM_CYCLE_PENALTY),
        (summary.critical_violations, CRITICAL_VIOLATION_PENALTY),
        (summary.major_violations, MAJOR_VIOLATION_PENALTY),
        (summary.critical_coupling, CRITICAL_COUPLING_PENALTY),
        (summary.concerning_coupling, CONCERNING_COUPLING_PENALTY),
    ];
    let penalty = weighted.iter().fold(0u32, |acc, (count, weight)| {
        let count = u32::try_from(*count).unwrap_or(u32::MAX);
        acc.saturating_add(count.saturating_mul(*weight))
    });
    100u32.saturating_sub(penalty)
}

fn top_coupling_issues(coupling: &[CouplingMetric]) -> Vec<CouplingMetric> {
    let mut issues: Vec<CouplingMetric> = coupling
        .iter()
        .filter(|m| m.severity != CouplingSeverity::Good)
        .cloned()
        .collect();
    issues.sort_by(|a, b| {
        b.distance
            .total_cmp(&a.distance)
            .then_with(|| a.id.cmp(&b.id))
    });
    issues.truncate(TOP_COUPLING_ISSUES);
    issues
}

fn recommendations(
    cycles: &[CircularDependency],
    violations: &[LayerViolation],
    coupling_issues: &[CouplingMetric],
) -> Vec<String> {
    let mut out = Vec::new();
    if !cycles.is_empty() {
        out.push(CYCLE_ADVICE.to_string());
    }
    if !violations.is_empty() {
        out.push(VIOLATION_ADVICE.to_string());
    }
    if !coupling_issues.is_empty() {
        out.push(COUPLING_ADVICE.to_string());
    }
    if out.is_empty() {
        out.push(HEALTHY_ADVICE.to_string());
    }
    out
}

fn severity_label(severity: impl std::fmt::Display) -> String {
    severity.to_string().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use arch_health_core::Layer;

    fn cycle(severity: CycleSeverity) -> CircularDependency {
        CircularDependency {
            cycle: vec!["a.ts".into(), "b.ts".into(), "a.ts".into()],
            severity,
        }
    }

    fn violation(severity: ViolationSeverity) -> LayerViolation {
        LayerViolation {
            violator: "src/db/repo.ts".into(),
            violatee: "src/controllers/user.ts".into(),
            violator_layer: Layer::Data,
            violatee_layer: Layer::Presentation,
            severity,
        }
    }

    fn metric(id: &str, distance: f64, severity: CouplingSeverity) -> CouplingMetric {
        CouplingMetric {
            id: id.into(),
            afferent_coupling: 1,
            efferent_coupling: 1,
            instability: 0.5,
            abstractness: 0.0,
            distance,
            severity,
        }
    }

    #[test]
    fn clean_run_scores_full_marks() {
        let report = HealthReport::generate(3, 0, &[], &[], &[]);
        assert_eq!(report.summary.health_score, 100);
        assert_eq!(report.grade, Grade::A);
        assert_eq!(report.recommendations, vec![HEALTHY_ADVICE.to_string()]);
    }

    #[test]
    fn penalties_are_weighted_per_severity() {
        let report = HealthReport::generate(
            10,
            12,
            &[
                cycle(CycleSeverity::High),
                cycle(CycleSeverity::Medium),
                cycle(CycleSeverity::Low),
            ],
            &[
                violation(ViolationSeverity::Major),
                violation(ViolationSeverity::Minor),
            ],
            &[
                metric("a.ts", 0.5, CouplingSeverity::Concerning),
                metric("b.ts", 0.1, CouplingSeverity::Good),
            ],
        );
        // 100 - 15 - 5 - 10 - 3
        assert_eq!(report.summary.health_score, 67);
        assert_eq!(report.grade, Grade::D);
        assert_eq!(report.summary.low_cycles, 1);
        assert_eq!(report.summary.minor_violations, 1);
        assert_eq!(report.recommendations.len(), 3);
    }

    #[test]
    fn score_floors_at_zero() {
        let violations = vec![violation(ViolationSeverity::Critical); 6];
        let report = HealthReport::generate(2, 6, &[], &violations, &[]);
        assert_eq!(report.summary.health_score, 0);
        assert_eq!(report.grade, Grade::F);
    }

    #[test]
    fn grade_boundaries() {
        assert_eq!(Grade::from_score(100), Grade::A);
        assert_eq!(Grade::from_score(90), Grade::A);
        assert_eq!(Grade::from_score(89), Grade::B);
        assert_eq!(Grade::from_score(80), Grade::B);
        assert_eq!(Grade::from_score(79), Grade::C);
        assert_eq!(Grade::from_score(70), Grade::C);
        assert_eq!(Grade::from_score(69), Grade::D);
        assert_eq!(Grade::from_score(60), Grade::D);
        assert_eq!(Grade::from_score(59), Grade::F);
        assert_eq!(Grade::from_score(0), Grade::F);
    }

    #[test]
    fn top_issues_are_sorted_and_capped() {
        let metrics: Vec<CouplingMetric> = (0..12)
            .map(|i| {
                metric(
                    &format!("m{i:02}.ts"),
                    0.41 + f64::from(i) * 0.01,
                    CouplingSeverity::Concerning,
                )
            })
            .chain([metric("good.ts", 0.9, CouplingSeverity::Good)])
            .collect();

        let issues = top_coupling_issues(&metrics);
        assert_eq!(issues.len(), TOP_COUPLING_ISSUES);
        assert_eq!(issues[0].id, "m11.ts");
        assert!(issues.iter().all(|m| m.severity != CouplingSeverity::Good));
        assert!(issues.windows(2).all(|w| w[0].distance >= w[1].distance));
    }

    #[test]
    fn equal_distances_sort_by_id() {
        let issues = top_coupling_issues(&[
            metric("b.ts", 0.5, CouplingSeverity::Concerning),
            metric("a.ts", 0.5, CouplingSeverity::Concerning),
        ]);
        assert_eq!(issues[0].id, "a.ts");
    }

    #[test]
    fn markdown_lists_every_section() {
        let report = HealthReport::generate(
            2,
            1,
            &[cycle(CycleSeverity::Medium)],
            &[violation(ViolationSeverity::Critical)],
            &[metric("a.ts", 0.8, CouplingSeverity::Critical)],
        );
        let md = report.to_markdown();
        assert!(md.starts_with("# Architecture Health Report"));
        assert!(md.contains("**Health score:** 67/100 (grade D)"));
        assert!(md.contains("- **MEDIUM** `a.ts -> b.ts -> a.ts`"));
        assert!(md.contains(
            "- **CRITICAL** `src/db/repo.ts` (data) imports `src/controllers/user.ts` (presentation)"
        ));
        assert!(md.contains("| `a.ts` | 1 | 1 | 0.50 | 0.00 | 0.80 | CRITICAL |"));
        assert!(md.contains("## Recommendations"));
    }

    #[test]
    fn markdown_marks_empty_sections() {
        let md = HealthReport::generate(1, 0, &[], &[], &[]).to_markdown();
        assert_eq!(md.matches("None found.").count(), 3);
    }
}
