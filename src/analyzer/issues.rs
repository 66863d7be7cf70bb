//! Severity, issues and recommendations for one file
//!
//! Each threshold rule that fires adds one issue and one recommendation and
//! raises the severity; the highest severity wins.

use crate::config::AnalyzerConfig;
use crate::models::{FileAnalysis, Severity};
use regex::Regex;
use std::sync::OnceLock;

/// Multiplier over a limit at which a finding escalates one level
const ESCALATION_FACTOR: f64 = 1.5;

static BUILD_ARTIFACT: OnceLock<Regex> = OnceLock::new();

fn build_artifact_pattern() -> &'static Regex {
    BUILD_ARTIFACT.get_or_init(|| {
        Regex::new(
            r"(^|/)(dist|build|out|\.next|coverage|node_modules)/|\.(min|bundle)\.[cm]?js$|\.d\.[cm]?ts$",
        )
        .unwrap()
    })
}

/// Generated or bundled output rather than authored source
pub fn is_build_artifact(path: &str) -> bool {
    build_artifact_pattern().is_match(path)
}

/// Fill in `severity`, `issues` and `recommendations` from the metrics
/// already present on `result`
pub fn assess(result: &mut FileAnalysis, config: &AnalyzerConfig) {
    let mut severity = Severity::Info;
    let mut issues = Vec::new();
    let mut recommendations = Vec::new();

    if !result.circular_deps.is_empty() {
        severity = severity.max(Severity::Critical);
        let chains: Vec<String> = result
            .circular_deps
            .iter()
            .map(|cycle| display_cycle(cycle))
            .collect();
        issues.push(format!(
            "Part of {} circular import chain(s): {}",
            chains.len(),
            chains.join("; ")
        ));
        recommendations.push(
            "Break the cycle by extracting the shared code into a separate module".to_string(),
        );
    }

    let max_budget = config.max_context_budget as f64;
    let budget = result.context_budget as f64;
    if budget > max_budget {
        let level = if budget > max_budget * ESCALATION_FACTOR {
            Severity::Critical
        } else {
            Severity::Major
        };
        severity = severity.max(level);
        issues.push(format!(
            "Context budget of {} tokens exceeds the limit of {}",
            result.context_budget, config.max_context_budget
        ));
        recommendations.push(format!(
            "Reduce the {} transitive dependencies or split the file so less context is needed to understand it",
            result.dependency_count
        ));
    }

    let max_depth = config.max_depth as f64;
    let depth = result.import_depth as f64;
    if depth > max_depth {
        let level = if depth > max_depth * ESCALATION_FACTOR {
            Severity::Major
        } else {
            Severity::Minor
        };
        severity = severity.max(level);
        issues.push(format!(
            "Import depth of {} exceeds the limit of {}",
            result.import_depth, config.max_depth
        ));
        recommendations
            .push("Flatten the import chain by depending on lower-level modules directly".to_string());
    }

    if result.cohesion_score < config.min_cohesion {
        let level = if result.cohesion_score < config.min_cohesion / 2.0 {
            Severity::Major
        } else {
            Severity::Minor
        };
        severity = severity.max(level);
        issues.push(format!(
            "Low cohesion ({:.2}): the {} exports belong to unrelated domains",
            result.cohesion_score, result.export_count
        ));
        recommendations.push("Split the file so each part serves a single domain".to_string());
    }

    if result.fragmentation_score > config.max_fragmentation {
        severity = severity.max(Severity::Minor);
        issues.push(format!(
            "The {} domain is scattered across directories (fragmentation {:.2})",
            result.primary_domain, result.fragmentation_score
        ));
        recommendations.push(format!(
            "Consolidate the {} files into one directory",
            result.primary_domain
        ));
    }

    if !config.include_build_artifacts && is_build_artifact(&result.file) {
        severity = Severity::Info;
        issues.clear();
        recommendations.clear();
    }

    result.severity = severity;
    result.issues = issues;
    result.recommendations = recommendations;
}

fn display_cycle(cycle: &[String]) -> String {
    cycle
        .iter()
        .map(|f| f.rsplit('/').next().unwrap_or(f))
        .collect::<Vec<_>>()
        .join(" → ")
}
