//! Export cohesion
//!
//! Domain cohesion is one minus the normalized Shannon entropy of the
//! exports' top domains. When at least two exports carry referenced-identifier
//! data, the mean pairwise Jaccard similarity of those identifier sets is
//! blended in and weighted higher.

use crate::models::ExportInfo;
use regex::Regex;
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::OnceLock;

const IMPORT_COHESION_WEIGHT: f64 = 0.6;
const DOMAIN_COHESION_WEIGHT: f64 = 0.4;

static TEST_PATH: OnceLock<Regex> = OnceLock::new();

fn test_path_pattern() -> &'static Regex {
    TEST_PATH.get_or_init(|| {
        Regex::new(
            r"(?i)(^|/)(__tests__|__mocks__|__fixtures__|tests?|mocks?|fixtures?|spec)/|\.(test|spec|mock|fixture|stories)\.[cm]?[jt]sx?$",
        )
        .unwrap()
    })
}

/// Test, mock and fixture files by path convention
pub fn is_test_file(path: &str) -> bool {
    test_path_pattern().is_match(path)
}

/// Cohesion of the exports of the file at `path`, in [0, 1]
pub fn calculate_cohesion(exports: &[ExportInfo], path: &str) -> f64 {
    if exports.len() <= 1 || is_test_file(path) {
        return 1.0;
    }

    let domain = domain_cohesion(exports);
    match import_cohesion(exports) {
        Some(import) => {
            (IMPORT_COHESION_WEIGHT * import + DOMAIN_COHESION_WEIGHT * domain).clamp(0.0, 1.0)
        }
        None => domain,
    }
}

/// `1 - H / log2(n)` over the exports' inferred domains
pub fn domain_cohesion(exports: &[ExportInfo]) -> f64 {
    let total = exports.len();
    if total <= 1 {
        return 1.0;
    }

    let mut counts: FxHashMap<&str, usize> = FxHashMap::default();
    for export in exports {
        *counts.entry(export.inferred_domain()).or_insert(0) += 1;
    }

    let entropy: f64 = counts
        .values()
        .map(|&count| {
            let p = count as f64 / total as f64;
            -p * p.log2()
        })
        .sum();
    let max_entropy = (total as f64).log2();

    (1.0 - entropy / max_entropy).clamp(0.0, 1.0)
}

/// Mean pairwise Jaccard similarity of the exports' referenced identifiers.
/// `None` unless at least two exports reference something.
pub fn import_cohesion(exports: &[ExportInfo]) -> Option<f64> {
    let sets: Vec<FxHashSet<&str>> = exports
        .iter()
        .filter(|e| !e.imports.is_empty())
        .map(|e| e.imports.iter().map(|s| s.as_str()).collect())
        .collect();
    if sets.len() < 2 {
        return None;
    }

    let mut sum = 0.0;
    let mut pairs = 0usize;
    for (i, a) in sets.iter().enumerate() {
        for b in &sets[i + 1..] {
            sum += jaccard(a, b);
            pairs += 1;
        }
    }
    Some(sum / pairs as f64)
}

/// |a ∩ b| / |a ∪ b|, 0 for two empty sets
pub fn jaccard(a: &FxHashSet<&str>, b: &FxHashSet<&str>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}
