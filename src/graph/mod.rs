//! File-level dependency graph
//!
//! Built fresh for every analysis run from in-memory `(path, content)` pairs:
//! 1. extract imports/exports and cost for each file, resolve import targets
//! 2. derive the co-usage matrix and the type-reference graph
//! 3. run domain inference to fill in `exports[].domains`
//!
//! The graph is never mutated after [`DependencyGraph::build`] returns.

pub mod metrics;
pub mod resolve;
pub mod signals;

use crate::config::DomainConfig;
use crate::domain;
use crate::models::{FileNode, SourceFile};
use crate::parsers;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

pub use metrics::{
    circular_dependencies, context_budget, import_depth, import_depths, transitive_dependencies,
};

/// Co-usage counts: file -> file imported alongside it -> times seen together
pub type CoUsageMatrix = BTreeMap<String, BTreeMap<String, usize>>;

/// Type name -> files whose exports reference it
pub type TypeGraph = BTreeMap<String, BTreeSet<String>>;

/// Import graph of a source tree plus the signal matrices derived from it
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    pub nodes: BTreeMap<String, FileNode>,
    /// Import edges. A target is a node path when it resolved, otherwise the
    /// raw import string (a dangling edge).
    pub edges: BTreeMap<String, BTreeSet<String>>,
    pub co_usage: CoUsageMatrix,
    pub type_graph: TypeGraph,
}

/// Token estimate used for every cost figure in a run
pub fn estimate_tokens(content: &str) -> usize {
    content.chars().count().div_ceil(4)
}

impl DependencyGraph {
    /// Build the graph and run domain inference over it
    pub fn build(files: &[SourceFile], config: &DomainConfig) -> Self {
        let mut graph = Self::build_structure(files);
        domain::infer_domains(&mut graph, config);
        graph
    }

    /// Nodes, edges and signal matrices, without domain inference
    pub fn build_structure(files: &[SourceFile]) -> Self {
        let mut graph = Self::default();

        for file in files {
            if graph.nodes.contains_key(&file.path) {
                debug!("Duplicate input path {}, keeping the first", file.path);
                continue;
            }
            let extraction = parsers::extract(&file.content, &file.path);
            graph.nodes.insert(
                file.path.clone(),
                FileNode {
                    path: file.path.clone(),
                    imports: extraction.imports,
                    exports: extraction.exports,
                    token_cost: estimate_tokens(&file.content),
                    line_count: file.content.lines().count(),
                },
            );
        }

        let mut dangling = 0usize;
        for (path, node) in &graph.nodes {
            let targets: BTreeSet<String> = node
                .imports
                .iter()
                .map(|target| {
                    match resolve::resolve_import(path, target, |p| graph.nodes.contains_key(p)) {
                        Some(resolved) => resolved,
                        None => {
                            dangling += 1;
                            target.clone()
                        }
                    }
                })
                .collect();
            graph.edges.insert(path.clone(), targets);
        }

        graph.co_usage = signals::build_co_usage_matrix(&graph.edges);
        graph.type_graph = signals::build_type_graph(&graph.nodes);

        info!(
            "Built dependency graph: {} files, {} edges ({} unresolved)",
            graph.nodes.len(),
            graph.edges.values().map(|t| t.len()).sum::<usize>(),
            dangling
        );
        graph
    }

    pub fn node(&self, path: &str) -> Option<&FileNode> {
        self.nodes.get(path)
    }

    /// Direct import targets of `path` (empty for unknown paths)
    pub fn dependencies(&self, path: &str) -> impl Iterator<Item = &String> {
        self.edges.get(path).into_iter().flatten()
    }

    /// Token cost of `path`, 0 when it is not a node
    pub fn token_cost(&self, path: &str) -> usize {
        self.nodes.get(path).map(|n| n.token_cost).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(entries: &[(&str, &str)]) -> Vec<SourceFile> {
        entries
            .iter()
            .map(|(p, c)| SourceFile::new(*p, *c))
            .collect()
    }

    #[test]
    fn test_estimate_tokens() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcde"), 2);
    }

    #[test]
    fn test_build_resolves_relative_imports() {
        let graph = DependencyGraph::build_structure(&files(&[
            ("src/a.ts", "export function a() {}"),
            ("src/b.ts", "import { a } from './a';\nimport React from 'react';\nexport function b() { return a(); }"),
        ]));

        let edges: Vec<&String> = graph.dependencies("src/b.ts").collect();
        assert_eq!(edges, vec!["react", "src/a.ts"]);
        assert_eq!(graph.node("src/b.ts").unwrap().imports, vec!["./a", "react"]);
        assert!(graph.dependencies("src/a.ts").next().is_none());
    }

    #[test]
    fn test_every_edge_key_is_a_node() {
        let graph = DependencyGraph::build_structure(&files(&[
            ("a.ts", "import './missing';"),
            ("b.ts", "import './a';"),
        ]));
        for key in graph.edges.keys() {
            assert!(graph.nodes.contains_key(key));
        }
        assert!(graph.edges["a.ts"].contains("./missing"));
    }

    #[test]
    fn test_unparseable_file_still_becomes_a_node() {
        let graph = DependencyGraph::build_structure(&files(&[("broken.ts", "export const = (((")]));
        let node = graph.node("broken.ts").unwrap();
        assert!(node.exports.is_empty());
        assert!(node.token_cost > 0);
        assert_eq!(node.line_count, 1);
    }

    #[test]
    fn test_duplicate_paths_keep_first() {
        let graph = DependencyGraph::build_structure(&files(&[
            ("a.ts", "export const first = 1;"),
            ("a.ts", "export const second = 2;"),
        ]));
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.node("a.ts").unwrap().exports[0].name, "first");
    }

    #[test]
    fn test_empty_input() {
        let graph = DependencyGraph::build(&[], &DomainConfig::default());
        assert!(graph.is_empty());
        assert!(graph.co_usage.is_empty());
    }
}
