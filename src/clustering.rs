//! Domain clusters and merge candidates
//!
//! Clusters group files by primary domain and come with a short consolidation
//! plan. Candidates are individual file pairs worth merging, found from
//! co-usage and shared types alone and independent of domains.

use crate::config::ConsolidationConfig;
use crate::domain;
use crate::graph::signals::{co_usage_count, shared_type_count};
use crate::graph::DependencyGraph;
use crate::models::{directory_of, ConsolidationCandidate, ConsolidationPlan, ModuleCluster};
use crate::scoring::calculate_fragmentation;
use std::collections::{BTreeMap, BTreeSet};

/// Files grouped by their primary domain. Files without one are left out.
pub fn group_by_domain(graph: &DependencyGraph) -> BTreeMap<String, Vec<String>> {
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (path, node) in &graph.nodes {
        if let Some(domain) = domain::primary_domain(node) {
            groups.entry(domain).or_default().push(path.clone());
        }
    }
    groups
}

/// One cluster per domain with at least two files, most fragmented first
pub fn build_clusters(
    graph: &DependencyGraph,
    groups: &BTreeMap<String, Vec<String>>,
    cohesion: &BTreeMap<String, f64>,
) -> Vec<ModuleCluster> {
    let mut clusters: Vec<ModuleCluster> = groups
        .iter()
        .filter(|(_, files)| files.len() >= 2)
        .map(|(domain, files)| {
            let paths: Vec<&str> = files.iter().map(|f| f.as_str()).collect();
            let fragmentation_score = calculate_fragmentation(&paths);
            let total_tokens = files.iter().map(|f| graph.token_cost(f)).sum();
            let avg_cohesion = files
                .iter()
                .map(|f| cohesion.get(f).copied().unwrap_or(1.0))
                .sum::<f64>()
                / files.len() as f64;

            ModuleCluster {
                domain: domain.clone(),
                files: files.clone(),
                total_tokens,
                fragmentation_score,
                avg_cohesion,
                suggested_consolidation: consolidation_plan(domain, files, fragmentation_score),
            }
        })
        .collect();

    clusters.sort_by(|a, b| {
        b.fragmentation_score
            .total_cmp(&a.fragmentation_score)
            .then_with(|| a.domain.cmp(&b.domain))
    });
    clusters
}

/// Aim for roughly a third of the current file count
pub fn target_file_count(file_count: usize) -> usize {
    file_count.div_ceil(3).max(1)
}

fn consolidation_plan(domain: &str, files: &[String], fragmentation: f64) -> ConsolidationPlan {
    let target_file_count = target_file_count(files.len());
    let directories: BTreeSet<&str> = files.iter().map(|f| directory_of(f)).collect();
    let mut steps = Vec::new();

    if fragmentation > 0.0 {
        steps.push(format!(
            "Create a `{}/` directory as the single home of the {} domain",
            domain, domain
        ));
        steps.push(format!(
            "Move {} files from {} directories into `{}/`",
            files.len(),
            directories.len(),
            domain
        ));
    }
    if files.len() > target_file_count {
        steps.push(format!(
            "Merge the {} files into about {} by responsibility",
            files.len(),
            target_file_count
        ));
    }
    steps.push(format!(
        "Re-export the {} API through one `index` module",
        domain
    ));

    ConsolidationPlan {
        target_file_count,
        steps,
    }
}

/// File pairs that are imported together often enough, alone or together
/// with shared types, to be worth merging. Strongest first.
pub fn find_consolidation_candidates(
    graph: &DependencyGraph,
    config: &ConsolidationConfig,
) -> Vec<ConsolidationCandidate> {
    let mut candidates = Vec::new();

    for (file1, row) in &graph.co_usage {
        if !graph.nodes.contains_key(file1) {
            continue;
        }
        for file2 in row.keys() {
            if file2 <= file1 || !graph.nodes.contains_key(file2) {
                continue;
            }
            let co_usage = co_usage_count(&graph.co_usage, file1, file2);
            let shared = shared_type_count(&graph.type_graph, file1, file2);

            let paired = co_usage >= config.min_co_usage && shared >= config.min_shared_types;
            let heavy = co_usage >= config.min_co_usage.saturating_mul(2);
            if !paired && !heavy {
                continue;
            }

            let reason = if shared > 0 {
                format!(
                    "Imported together by {} files and share {} types",
                    co_usage, shared
                )
            } else {
                format!("Imported together by {} files", co_usage)
            };
            candidates.push(ConsolidationCandidate {
                file1: file1.clone(),
                file2: file2.clone(),
                co_usage_count: co_usage,
                shared_types: shared,
                strength: strength(co_usage, shared),
                reason,
            });
        }
    }

    candidates.sort_by(|a, b| {
        b.strength
            .total_cmp(&a.strength)
            .then_with(|| b.co_usage_count.cmp(&a.co_usage_count))
            .then_with(|| a.file1.cmp(&b.file1))
            .then_with(|| a.file2.cmp(&b.file2))
    });
    candidates.truncate(config.max_candidates);
    candidates
}

/// `min(1, co_usage / 10 + shared_types / 5)`
pub fn strength(co_usage: usize, shared_types: usize) -> f64 {
    (co_usage as f64 / 10.0 + shared_types as f64 / 5.0).min(1.0)
}
