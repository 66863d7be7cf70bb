//! Semantic signals derived purely from graph data
//!
//! - co-usage: how often two modules are imported by the same file
//! - type graph: which files' exports reference which named types

use super::{CoUsageMatrix, TypeGraph};
use crate::models::FileNode;
use std::collections::{BTreeMap, BTreeSet};

/// Count, for every pair of distinct targets imported by the same file, how
/// many files import both. The matrix is symmetric.
pub fn build_co_usage_matrix(edges: &BTreeMap<String, BTreeSet<String>>) -> CoUsageMatrix {
    let mut matrix = CoUsageMatrix::new();

    for targets in edges.values() {
        let targets: Vec<&String> = targets.iter().collect();
        for (i, a) in targets.iter().enumerate() {
            for b in &targets[i + 1..] {
                *matrix
                    .entry((*a).clone())
                    .or_default()
                    .entry((*b).clone())
                    .or_insert(0) += 1;
                *matrix
                    .entry((*b).clone())
                    .or_default()
                    .entry((*a).clone())
                    .or_insert(0) += 1;
            }
        }
    }

    matrix
}

/// Map each referenced type name to the files whose exports reference it
pub fn build_type_graph(nodes: &BTreeMap<String, FileNode>) -> TypeGraph {
    let mut graph = TypeGraph::new();
    for (path, node) in nodes {
        for export in &node.exports {
            for type_name in &export.type_references {
                graph
                    .entry(type_name.clone())
                    .or_default()
                    .insert(path.clone());
            }
        }
    }
    graph
}

/// Times `a` and `b` were imported by the same file
pub fn co_usage_count(matrix: &CoUsageMatrix, a: &str, b: &str) -> usize {
    matrix
        .get(a)
        .and_then(|row| row.get(b))
        .copied()
        .unwrap_or(0)
}

/// Number of type names referenced by exports of both `a` and `b`
pub fn shared_type_count(type_graph: &TypeGraph, a: &str, b: &str) -> usize {
    type_graph
        .values()
        .filter(|files| files.contains(a) && files.contains(b))
        .count()
}
