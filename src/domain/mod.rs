//! Domain inference
//!
//! Every export gets a ranked list of candidate business domains. Candidates
//! collect boolean signal flags which are folded through [`SignalWeights`]
//! into a confidence; only candidates at or above the configured floor are
//! kept.
//!
//! Inference runs in two phases over the finished graph:
//! - local: export name, import paths, folder path and keyword-named types
//! - final: the local phase plus credit from co-used files and from other
//!   files referencing the same types, using the local phase's best guesses
//!
//! `exports[].domains` is written once, at the end of the final phase.

pub mod signals;
pub mod vocabulary;

pub use signals::SignalWeights;
pub use vocabulary::DomainVocabulary;

use crate::config::DomainConfig;
use crate::graph::DependencyGraph;
use crate::models::{DomainAssignment, DomainSignals, ExportInfo, FileNode};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Candidate domain -> flags that voted for it, for a single export
pub type Candidates = BTreeMap<String, DomainSignals>;

const CONFIDENCE_EPSILON: f64 = 1e-9;

/// Populate `domains` on every export in the graph
pub fn infer_domains(graph: &mut DependencyGraph, config: &DomainConfig) {
    let mut vocabulary = DomainVocabulary::new(&config.keywords);
    if config.auto_detect_keywords {
        vocabulary.extend_from_paths(graph.nodes.keys().map(|k| k.as_str()));
    }
    let mut weights = config.weights;
    if !weights.is_valid() {
        weights.normalize();
    }

    // Local phase
    let local: BTreeMap<&str, Vec<Candidates>> = graph
        .nodes
        .iter()
        .map(|(path, node)| {
            let per_export = node
                .exports
                .iter()
                .map(|export| local_candidates(&vocabulary, node, export))
                .collect();
            (path.as_str(), per_export)
        })
        .collect();

    // Best local guess per export, gathered per file
    let known: BTreeMap<&str, BTreeSet<String>> = local
        .iter()
        .map(|(path, per_export)| {
            let domains = per_export
                .iter()
                .filter_map(|candidates| top_candidate(candidates, &weights))
                .collect();
            (*path, domains)
        })
        .collect();

    // Final phase
    let mut assigned: BTreeMap<String, Vec<Vec<DomainAssignment>>> = BTreeMap::new();
    for (path, node) in &graph.nodes {
        let co_used: Vec<&str> = graph
            .co_usage
            .get(path)
            .map(|row| {
                row.iter()
                    .filter(|(other, count)| {
                        **count >= config.co_usage_threshold && *other != path
                    })
                    .map(|(other, _)| other.as_str())
                    .collect()
            })
            .unwrap_or_default();

        let mut per_export = Vec::with_capacity(node.exports.len());
        for (idx, export) in node.exports.iter().enumerate() {
            let mut candidates = local
                .get(path.as_str())
                .and_then(|c| c.get(idx))
                .cloned()
                .unwrap_or_default();

            for other in &co_used {
                for domain in known.get(other).into_iter().flatten() {
                    candidates.entry(domain.clone()).or_default().co_usage = true;
                }
            }

            for type_name in &export.type_references {
                let Some(files) = graph.type_graph.get(type_name) else {
                    continue;
                };
                for other in files.iter().filter(|f| *f != path) {
                    for domain in known.get(other.as_str()).into_iter().flatten() {
                        candidates.entry(domain.clone()).or_default().type_reference = true;
                    }
                }
            }

            per_export.push(rank(candidates, &weights, config.confidence_floor));
        }
        assigned.insert(path.clone(), per_export);
    }

    let mut classified = 0usize;
    let mut total = 0usize;
    for (path, node) in graph.nodes.iter_mut() {
        let Some(per_export) = assigned.remove(path) else {
            continue;
        };
        for (export, domains) in node.exports.iter_mut().zip(per_export) {
            total += 1;
            if !domains.is_empty() {
                classified += 1;
            }
            export.domains = domains;
        }
    }

    debug!(
        "Domain inference: {}/{} exports classified, {} keywords",
        classified,
        total,
        vocabulary.keywords().len()
    );
}

/// Signals that need nothing beyond the file itself
fn local_candidates(vocabulary: &DomainVocabulary, node: &FileNode, export: &ExportInfo) -> Candidates {
    let mut candidates = Candidates::new();

    if let Some(domain) = vocabulary.match_identifier(&export.name) {
        candidates.entry(domain.to_string()).or_default().export_name = true;
    }

    for target in &node.imports {
        for domain in vocabulary.match_import_path(target) {
            candidates.entry(domain.to_string()).or_default().import_path = true;
        }
    }

    if let Some(domain) = vocabulary.match_folder(&node.path) {
        candidates.entry(domain.to_string()).or_default().folder_structure = true;
    }

    for type_name in &export.type_references {
        if let Some(domain) = vocabulary.match_identifier(type_name) {
            candidates.entry(domain.to_string()).or_default().type_reference = true;
        }
    }

    candidates
}

/// Highest-confidence candidate with any signal at all, ties by name
fn top_candidate(candidates: &Candidates, weights: &SignalWeights) -> Option<String> {
    let mut best: Option<(&String, f64)> = None;
    for (domain, signals) in candidates {
        let confidence = weights.confidence(signals);
        if confidence <= 0.0 {
            continue;
        }
        match best {
            Some((_, c)) if confidence <= c + CONFIDENCE_EPSILON => {}
            _ => best = Some((domain, confidence)),
        }
    }
    best.map(|(domain, _)| domain.clone())
}

/// Score candidates, drop those under `floor`, sort descending
pub fn rank(candidates: Candidates, weights: &SignalWeights, floor: f64) -> Vec<DomainAssignment> {
    let mut ranked: Vec<DomainAssignment> = candidates
        .into_iter()
        .map(|(domain, signals)| DomainAssignment {
            confidence: weights.confidence(&signals),
            domain,
            signals,
        })
        .filter(|a| a.confidence + CONFIDENCE_EPSILON >= floor && a.confidence > 0.0)
        .collect();

    ranked.sort_by(|a, b| {
        b.confidence
            .total_cmp(&a.confidence)
            .then_with(|| a.domain.cmp(&b.domain))
    });
    ranked
}

/// Domain with the highest summed confidence across a file's exports
pub fn primary_domain(node: &FileNode) -> Option<String> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for export in &node.exports {
        for assignment in &export.domains {
            *totals.entry(assignment.domain.as_str()).or_insert(0.0) += assignment.confidence;
        }
    }

    let mut best: Option<(&str, f64)> = None;
    for (domain, total) in totals {
        match best {
            Some((_, b)) if total <= b + CONFIDENCE_EPSILON => {}
            _ => best = Some((domain, total)),
        }
    }
    best.map(|(domain, _)| domain.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SourceFile, UNKNOWN_DOMAIN};

    fn build(entries: &[(&str, &str)]) -> DependencyGraph {
        let files: Vec<SourceFile> = entries
            .iter()
            .map(|(p, c)| SourceFile::new(*p, *c))
            .collect();
        DependencyGraph::build(&files, &DomainConfig::default())
    }

    fn export<'g>(graph: &'g DependencyGraph, path: &str, name: &str) -> &'g ExportInfo {
        graph.nodes[path]
            .exports
            .iter()
            .find(|e| e.name == name)
            .unwrap()
    }

    #[test]
    fn test_name_and_type_reach_floor() {
        let graph = build(&[(
            "src/api.ts",
            "export function getUser(id: string): User { return load(id); }",
        )]);
        let e = export(&graph, "src/api.ts", "getUser");
        assert_eq!(e.inferred_domain(), "user");
        assert!((e.domains[0].confidence - 0.45).abs() < 1e-9);
        assert!(e.domains[0].signals.export_name);
        assert!(e.domains[0].signals.type_reference);
    }

    #[test]
    fn test_name_alone_is_below_floor() {
        let graph = build(&[("misc.ts", "export function getUser() { return 1; }")]);
        assert_eq!(export(&graph, "misc.ts", "getUser").inferred_domain(), UNKNOWN_DOMAIN);
    }

    #[test]
    fn test_generic_file_is_unknown() {
        let graph = build(&[("helpers.ts", "export function formatDate(d) { return d; }")]);
        let e = export(&graph, "helpers.ts", "formatDate");
        assert!(e.domains.is_empty());
        assert_eq!(e.inferred_domain(), UNKNOWN_DOMAIN);
    }

    #[test]
    fn test_folder_import_path_and_name_combine() {
        let graph = build(&[(
            "src/invoices/list.ts",
            "import { fetchAll } from '@acme/invoices';\nexport function listInvoices() { return fetchAll(); }",
        )]);
        let e = export(&graph, "src/invoices/list.ts", "listInvoices");
        assert_eq!(e.domains.len(), 1);
        assert_eq!(e.domains[0].domain, "invoice");
        assert_eq!(
            e.domains[0].signals,
            DomainSignals {
                export_name: true,
                import_path: true,
                folder_structure: true,
                ..Default::default()
            }
        );
        assert!((e.domains[0].confidence - 0.35).abs() < 1e-9);
    }

    #[test]
    fn test_import_path_and_folder_vote_separately() {
        let config = DomainConfig {
            confidence_floor: 0.05,
            ..DomainConfig::default()
        };
        let files = vec![SourceFile::new(
            "src/invoices/list.ts",
            "import { charge } from '../billing/charge';\nexport function listAll() { return charge(); }",
        )];
        let graph = DependencyGraph::build(&files, &config);
        let e = export(&graph, "src/invoices/list.ts", "listAll");

        let names: Vec<&str> = e.domains.iter().map(|a| a.domain.as_str()).collect();
        assert_eq!(names, vec!["billing", "invoice"]);
        assert_eq!(
            e.domains[0].signals,
            DomainSignals {
                import_path: true,
                ..Default::default()
            }
        );
        assert_eq!(
            e.domains[1].signals,
            DomainSignals {
                folder_structure: true,
                ..Default::default()
            }
        );
        assert!((e.domains[0].confidence - 0.10).abs() < 1e-9);
        assert!((e.domains[1].confidence - 0.10).abs() < 1e-9);
    }

    #[test]
    fn test_infrastructure_folder_adds_no_folder_signal() {
        let graph = build(&[(
            "src/utils/format.ts",
            "export function formatInvoice(i: Invoice): string { return ''; }",
        )]);
        let e = export(&graph, "src/utils/format.ts", "formatInvoice");
        assert_eq!(e.domains.len(), 1);
        assert_eq!(e.domains[0].domain, "invoice");
        assert_eq!(
            e.domains[0].signals,
            DomainSignals {
                export_name: true,
                type_reference: true,
                ..Default::default()
            }
        );
        assert!((e.domains[0].confidence - 0.45).abs() < 1e-9);
    }

    #[test]
    fn test_shared_type_credits_other_files_domain() {
        let graph = build(&[
            (
                "src/orders/model.ts",
                "export interface Item { id: string }\nexport function createOrder(i: Item): Order { return i as any; }",
            ),
            (
                "src/summary.ts",
                "export function summarize(i: Item): string { return ''; }",
            ),
        ]);
        let e = export(&graph, "src/summary.ts", "summarize");
        // Item is also referenced by createOrder, whose local guess is "order"
        assert_eq!(e.inferred_domain(), "order");
        assert!(e.domains[0].signals.type_reference);
    }

    #[test]
    fn test_co_usage_credits_partner_domain() {
        let mut entries = vec![
            ("lib/session.ts", "export function readSession(): Session { return s; }"),
            ("lib/glue.ts", "export function glue(x) { return x; }"),
        ];
        let pages = [
            "import './lib/session';\nimport './lib/glue';",
            "import './lib/session';\nimport './lib/glue';\nexport const p2 = 1;",
            "import './lib/session';\nimport './lib/glue';\nexport const p3 = 1;",
        ];
        entries.push(("page1.ts", pages[0]));
        entries.push(("page2.ts", pages[1]));
        entries.push(("page3.ts", pages[2]));
        let graph = build(&entries);

        let e = export(&graph, "lib/glue.ts", "glue");
        assert_eq!(e.inferred_domain(), "session");
        assert!(e.domains[0].signals.co_usage);
        assert!((e.domains[0].confidence - 0.35).abs() < 1e-9);
    }

    #[test]
    fn test_rank_orders_and_filters() {
        let weights = SignalWeights::default();
        let mut candidates = Candidates::new();
        candidates.insert(
            "user".into(),
            DomainSignals {
                export_name: true,
                type_reference: true,
                ..Default::default()
            },
        );
        candidates.insert(
            "billing".into(),
            DomainSignals {
                co_usage: true,
                ..Default::default()
            },
        );
        candidates.insert(
            "team".into(),
            DomainSignals {
                folder_structure: true,
                ..Default::default()
            },
        );
        let ranked = rank(candidates, &weights, 0.3);
        let names: Vec<&str> = ranked.iter().map(|a| a.domain.as_str()).collect();
        assert_eq!(names, vec!["user", "billing"]);
    }

    #[test]
    fn test_floor_is_inclusive() {
        let weights = SignalWeights::default();
        let mut candidates = Candidates::new();
        candidates.insert(
            "cart".into(),
            DomainSignals {
                type_reference: true,
                ..Default::default()
            },
        );
        assert_eq!(rank(candidates, &weights, 0.3).len(), 1);
    }

    #[test]
    fn test_primary_domain_sums_exports() {
        let graph = build(&[(
            "src/api.ts",
            "export function getUser(): User { return u; }\n\
             export function listUsers(): User[] { return []; }\n\
             export function payInvoice(i: Invoice): void {}",
        )]);
        assert_eq!(primary_domain(&graph.nodes["src/api.ts"]).as_deref(), Some("user"));
    }

    #[test]
    fn test_primary_domain_none_without_assignments() {
        let graph = build(&[("x.ts", "export const x = 1;")]);
        assert_eq!(primary_domain(&graph.nodes["x.ts"]), None);
    }
}
