//! Shared output formatting for analysis results.

use anyhow::Result;
use arch_health::{
    AnalysisResult, CouplingSeverity, CycleSeverity, Grade, ViolationSeverity,
};
use std::fmt::Write as _;

use crate::OutputFormat;

const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const BLUE: &str = "\x1b[34m";
const GREEN: &str = "\x1b[32m";
const RESET: &str = "\x1b[0m";

/// Print analysis results in the specified format.
pub fn print(result: &AnalysisResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print!("{}", render_text(result)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(result)?),
        OutputFormat::Markdown => print!("{}", result.report.to_markdown()),
    }
    Ok(())
}

/// Human-readable summary with ANSI colors.
pub fn render_text(result: &AnalysisResult) -> String {
    let report = &result.report;
    let mut out = String::new();

    if !report.cycles.is_empty() {
        let _ = writeln!(out, "Circular dependencies ({}):", report.cycles.len());
        for cycle in &report.cycles {
            let color = match cycle.severity {
                CycleSeverity::High => RED,
                CycleSeverity::Medium => YELLOW,
                CycleSeverity::Low => BLUE,
            };
            let _ = writeln!(out, "  {color}{}{RESET} {}", cycle.severity, cycle.path());
        }
        out.push('\n');
    }

    if !report.violations.is_empty() {
        let _ = writeln!(out, "Layer violations ({}):", report.violations.len());
        for v in &report.violations {
            let color = match v.severity {
                ViolationSeverity::Critical => RED,
                ViolationSeverity::Major => YELLOW,
                ViolationSeverity::Minor => BLUE,
            };
            let _ = writeln!(out, "  {color}{}{RESET} {v}", v.severity);
        }
        out.push('\n');
    }

    if !report.coupling_issues.is_empty() {
        let _ = writeln!(out, "Coupling issues (top {}):", report.coupling_issues.len());
        for m in &report.coupling_issues {
            let color = match m.severity {
                CouplingSeverity::Critical => RED,
                CouplingSeverity::Concerning => YELLOW,
                CouplingSeverity::Good => GREEN,
            };
            let _ = writeln!(
                out,
                "  {color}{}{RESET} {} Ca={} Ce={} I={:.2} A={:.2} D={:.2}",
                m.severity,
                m.id,
                m.afferent_coupling,
                m.efferent_coupling,
                m.instability,
                m.abstractness,
                m.distance
            );
        }
        out.push('\n');
    }

    let s = &report.summary;
    let score_color = match report.grade {
        Grade::A | Grade::B => GREEN,
        Grade::C | Grade::D => YELLOW,
        Grade::F => RED,
    };
    let _ = writeln!(
        out,
        "{score_color}Health score {}/100 (grade {}){RESET}: {} cycle(s), {} layer violation(s) in {} file(s)",
        s.health_score, report.grade, s.cycles, s.violations, s.files_analyzed
    );

    out
}
