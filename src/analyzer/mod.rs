//! Analysis entry point
//!
//! Builds the dependency graph for a set of in-memory source files and turns
//! it into per-file results, domain clusters, merge candidates and a summary.
//! Infallible: degenerate input (no files, unparseable files, dangling
//! imports, cycles) maps to defined values.

pub mod issues;

use crate::clustering::{build_clusters, find_consolidation_candidates, group_by_domain};
use crate::config::AnalyzerConfig;
use crate::graph::metrics::{cycles_containing, import_depths};
use crate::graph::{circular_dependencies, context_budget, transitive_dependencies, DependencyGraph};
use crate::models::{
    AnalysisReport, AnalysisSummary, FileAnalysis, SourceFile, UNKNOWN_DOMAIN,
};
use crate::scoring::{calculate_cohesion, calculate_fragmentation};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Analyze `files` with the given thresholds
pub fn analyze(files: &[SourceFile], config: &AnalyzerConfig) -> AnalysisReport {
    if files.is_empty() {
        debug!("No files to analyze");
        return AnalysisReport::default();
    }

    let config = config.clone().sanitized();
    let graph = DependencyGraph::build(files, &config.domain);
    analyze_graph(&graph, &config)
}

/// Analyze an already built graph
pub fn analyze_graph(graph: &DependencyGraph, config: &AnalyzerConfig) -> AnalysisReport {
    if graph.is_empty() {
        return AnalysisReport::default();
    }

    let cycles = circular_dependencies(graph);
    let depths = import_depths(graph);
    let groups = group_by_domain(graph);

    let primary: BTreeMap<&str, &str> = groups
        .iter()
        .flat_map(|(domain, files)| files.iter().map(move |f| (f.as_str(), domain.as_str())))
        .collect();
    let fragmentation: BTreeMap<&str, f64> = groups
        .iter()
        .map(|(domain, files)| {
            let paths: Vec<&str> = files.iter().map(|f| f.as_str()).collect();
            (domain.as_str(), calculate_fragmentation(&paths))
        })
        .collect();
    let cohesion: BTreeMap<String, f64> = graph
        .nodes
        .iter()
        .map(|(path, node)| (path.clone(), calculate_cohesion(&node.exports, path)))
        .collect();

    let mut results: Vec<FileAnalysis> = graph
        .nodes
        .iter()
        .map(|(path, node)| {
            let dependency_list = transitive_dependencies(graph, path);
            let primary_domain = primary.get(path.as_str()).copied();
            let related_files = primary_domain
                .and_then(|d| groups.get(d))
                .map(|files| files.iter().filter(|f| *f != path).cloned().collect())
                .unwrap_or_default();

            let mut domains: Vec<String> = Vec::new();
            for export in &node.exports {
                for assignment in &export.domains {
                    if !domains.contains(&assignment.domain) {
                        domains.push(assignment.domain.clone());
                    }
                }
            }

            let mut result = FileAnalysis {
                file: path.clone(),
                token_cost: node.token_cost,
                line_count: node.line_count,
                import_depth: depths.get(path.as_str()).copied().unwrap_or(0),
                dependency_count: dependency_list.len(),
                dependency_list,
                circular_deps: cycles_containing(&cycles, path)
                    .into_iter()
                    .cloned()
                    .collect(),
                cohesion_score: cohesion.get(path).copied().unwrap_or(1.0),
                domains,
                primary_domain: primary_domain.unwrap_or(UNKNOWN_DOMAIN).to_string(),
                export_count: node.exports.len(),
                context_budget: context_budget(graph, path),
                fragmentation_score: primary_domain
                    .and_then(|d| fragmentation.get(d))
                    .copied()
                    .unwrap_or(0.0),
                related_files,
                severity: Default::default(),
                issues: Vec::new(),
                recommendations: Vec::new(),
            };
            issues::assess(&mut result, config);
            result
        })
        .collect();

    results.sort_by(|a, b| {
        b.severity
            .cmp(&a.severity)
            .then_with(|| b.context_budget.cmp(&a.context_budget))
            .then_with(|| a.file.cmp(&b.file))
    });

    let clusters = build_clusters(graph, &groups, &cohesion);
    let consolidation_candidates = find_consolidation_candidates(graph, &config.consolidation);
    let summary = AnalysisSummary::from_results(&results, cycles.len());

    info!(
        "Analyzed {} files: {} critical, {} major, {} minor, {} clusters, {} merge candidates",
        summary.total_files,
        summary.critical,
        summary.major,
        summary.minor,
        clusters.len(),
        consolidation_candidates.len()
    );

    AnalysisReport {
        results,
        clusters,
        consolidation_candidates,
        summary,
    }
}
