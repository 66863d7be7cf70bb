//! Cost metrics over the import graph
//!
//! All traversals are cycle-safe. Depth is computed once per graph over the
//! condensation of its strongly connected components, so a dense import
//! cluster costs the same as a chain. Transitive dependencies and cycle
//! enumeration stop a branch at a file already visited. Dangling targets are
//! leaves.

use super::DependencyGraph;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use rustc_hash::{FxHashMap, FxHashSet};

/// Longest import chain starting at `file`
///
/// Files without imports have depth 0. See [`import_depths`] for how cycles
/// are counted.
pub fn import_depth(graph: &DependencyGraph, file: &str) -> usize {
    import_depths(graph).get(file).copied().unwrap_or(0)
}

/// Import depth of every file and dangling target in the graph
///
/// Every edge counts one level. Files in an import cycle count one level
/// each, as if the chain walked the whole cycle before leaving it; a
/// self-import counts as a cycle of one. Runs in O(files + imports).
pub fn import_depths(graph: &DependencyGraph) -> FxHashMap<&str, usize> {
    let mut digraph: DiGraph<&str, ()> = DiGraph::new();
    let mut index: FxHashMap<&str, NodeIndex> = FxHashMap::default();

    for file in graph.nodes.keys() {
        index
            .entry(file.as_str())
            .or_insert_with(|| digraph.add_node(file.as_str()));
    }
    for (file, targets) in &graph.edges {
        let from = *index
            .entry(file.as_str())
            .or_insert_with(|| digraph.add_node(file.as_str()));
        for target in targets {
            let to = *index
                .entry(target.as_str())
                .or_insert_with(|| digraph.add_node(target.as_str()));
            digraph.add_edge(from, to, ());
        }
    }

    // Components come out in reverse topological order: everything a
    // component imports has already been scored when it is reached
    let components = tarjan_scc(&digraph);
    let mut component_of = vec![0usize; digraph.node_count()];
    for (c, members) in components.iter().enumerate() {
        for member in members {
            component_of[member.index()] = c;
        }
    }

    let mut component_depth = vec![0usize; components.len()];
    for (c, members) in components.iter().enumerate() {
        let cyclic = members.len() > 1
            || members
                .first()
                .is_some_and(|m| digraph.contains_edge(*m, *m));

        let mut below: Option<usize> = None;
        for member in members {
            for next in digraph.neighbors(*member) {
                let other = component_of[next.index()];
                if other != c {
                    let depth = component_depth[other];
                    below = Some(below.map_or(depth, |b| b.max(depth)));
                }
            }
        }

        component_depth[c] = match (cyclic, below) {
            (true, below) => members.len() + below.unwrap_or(0),
            (false, Some(below)) => below + 1,
            (false, None) => 0,
        };
    }

    index
        .into_iter()
        .map(|(name, idx)| (name, component_depth[component_of[idx.index()]]))
        .collect()
}

/// Every target reachable from `file`, deduplicated, in discovery order.
/// Includes dangling targets such as external packages; never includes `file`.
pub fn transitive_dependencies(graph: &DependencyGraph, file: &str) -> Vec<String> {
    let mut visited: FxHashSet<&str> = FxHashSet::default();
    let mut result = Vec::new();
    let mut stack: Vec<&str> = vec![file];
    visited.insert(file);

    while let Some(current) = stack.pop() {
        let Some(targets) = graph.edges.get(current) else {
            continue;
        };
        // Reverse so the first import is expanded first
        for target in targets.iter().rev() {
            if visited.insert(target.as_str()) {
                stack.push(target.as_str());
            }
        }
        for target in targets {
            if target != file && !result.contains(target) {
                result.push(target.clone());
            }
        }
    }

    result
}

/// Token cost of `file` plus everything it transitively depends on
pub fn context_budget(graph: &DependencyGraph, file: &str) -> usize {
    graph.token_cost(file)
        + transitive_dependencies(graph, file)
            .iter()
            .map(|dep| graph.token_cost(dep))
            .sum::<usize>()
}

/// Import cycles found by one depth-first pass, each listed as the path from
/// the first repeated file back to itself (`[a, b, a]`)
///
/// Disjoint cycles are all reported and a file may appear in several. Each
/// file is expanded once, so a cycle that closes only through a file already
/// finished is not listed again: with `a -> b -> c -> a` and `a -> c`, only
/// `[a, b, c, a]` is reported.
pub fn circular_dependencies(graph: &DependencyGraph) -> Vec<Vec<String>> {
    let mut finder = CycleFinder {
        graph,
        visited: FxHashSet::default(),
        on_stack: FxHashSet::default(),
        path: Vec::new(),
        cycles: Vec::new(),
    };
    for file in graph.nodes.keys() {
        finder.visit(file.as_str());
    }
    finder.cycles
}

struct CycleFinder<'a> {
    graph: &'a DependencyGraph,
    visited: FxHashSet<&'a str>,
    on_stack: FxHashSet<&'a str>,
    path: Vec<&'a str>,
    cycles: Vec<Vec<String>>,
}

impl<'a> CycleFinder<'a> {
    fn visit(&mut self, file: &'a str) {
        if self.on_stack.contains(file) {
            if let Some(start) = self.path.iter().position(|p| *p == file) {
                let mut cycle: Vec<String> =
                    self.path[start..].iter().map(|p| p.to_string()).collect();
                cycle.push(file.to_string());
                self.cycles.push(cycle);
            }
            return;
        }
        if !self.visited.insert(file) {
            return;
        }

        self.on_stack.insert(file);
        self.path.push(file);
        if let Some(targets) = self.graph.edges.get(file) {
            for target in targets {
                self.visit(target.as_str());
            }
        }
        self.path.pop();
        self.on_stack.remove(file);
    }
}

/// Cycles that `file` takes part in
pub fn cycles_containing<'c>(cycles: &'c [Vec<String>], file: &str) -> Vec<&'c Vec<String>> {
    cycles
        .iter()
        .filter(|cycle| cycle.iter().any(|f| f == file))
        .collect()
}
