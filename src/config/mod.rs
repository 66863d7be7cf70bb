//! Analyzer configuration
//!
//! Thresholds, domain-inference tuning and consolidation limits. All fields
//! are optional in config files and fall back to the defaults below.
//!
//! # Configuration Format
//!
//! ```toml
//! # context-analyzer.toml
//! max_depth = 5
//! max_context_budget = 10000
//! min_cohesion = 0.6
//! max_fragmentation = 0.5
//! include_build_artifacts = false
//!
//! [domain]
//! confidence_floor = 0.3
//! keywords = ["warehouse", "shipment"]
//! weights = { co_usage = 0.35, type_reference = 0.3, export_name = 0.15, import_path = 0.1, folder_structure = 0.1 }
//!
//! [consolidation]
//! min_co_usage = 5
//! min_shared_types = 2
//! ```

use crate::domain::SignalWeights;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// File names probed by [`load_project_config`], in order
pub const CONFIG_FILE_NAMES: &[&str] = &["context-analyzer.toml", ".context-analyzer.json"];

/// Top-level analyzer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Import depth above which a file is flagged (default: 5)
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Context budget in tokens above which a file is flagged (default: 10000)
    #[serde(default = "default_max_context_budget")]
    pub max_context_budget: usize,

    /// Cohesion below which a file is flagged (default: 0.6)
    #[serde(default = "default_min_cohesion")]
    pub min_cohesion: f64,

    /// Domain fragmentation above which a file is flagged (default: 0.5)
    #[serde(default = "default_max_fragmentation")]
    pub max_fragmentation: f64,

    /// Report findings for build output (dist/, *.min.js, ...) (default: false)
    #[serde(default)]
    pub include_build_artifacts: bool,

    #[serde(default)]
    pub domain: DomainConfig,

    #[serde(default)]
    pub consolidation: ConsolidationConfig,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_context_budget: default_max_context_budget(),
            min_cohesion: default_min_cohesion(),
            max_fragmentation: default_max_fragmentation(),
            include_build_artifacts: false,
            domain: DomainConfig::default(),
            consolidation: ConsolidationConfig::default(),
        }
    }
}

fn default_max_depth() -> usize {
    5
}

fn default_max_context_budget() -> usize {
    10_000
}

fn default_min_cohesion() -> f64 {
    0.6
}

fn default_max_fragmentation() -> f64 {
    0.5
}

/// Domain inference tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainConfig {
    #[serde(default)]
    pub weights: SignalWeights,

    /// Minimum confidence for a domain to be kept (default: 0.3)
    #[serde(default = "default_confidence_floor")]
    pub confidence_floor: f64,

    /// Co-import count at which co-usage counts as a signal (default: 3)
    #[serde(default = "default_co_usage_threshold")]
    pub co_usage_threshold: usize,

    /// Extra domain keywords, tried after the built-in ones
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Learn keywords from the repository's folder names (default: true)
    #[serde(default = "default_true")]
    pub auto_detect_keywords: bool,
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            weights: SignalWeights::default(),
            confidence_floor: default_confidence_floor(),
            co_usage_threshold: default_co_usage_threshold(),
            keywords: Vec::new(),
            auto_detect_keywords: true,
        }
    }
}

fn default_confidence_floor() -> f64 {
    0.3
}

fn default_co_usage_threshold() -> usize {
    3
}

fn default_true() -> bool {
    true
}

/// Limits for pairwise consolidation-candidate discovery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolidationConfig {
    /// Co-usage count that, with enough shared types, suggests a merge (default: 5)
    #[serde(default = "default_min_co_usage")]
    pub min_co_usage: usize,

    /// Shared type references required alongside co-usage (default: 2)
    #[serde(default = "default_min_shared_types")]
    pub min_shared_types: usize,

    /// Maximum candidates reported (default: 20)
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,
}

impl Default for ConsolidationConfig {
    fn default() -> Self {
        Self {
            min_co_usage: default_min_co_usage(),
            min_shared_types: default_min_shared_types(),
            max_candidates: default_max_candidates(),
        }
    }
}

fn default_min_co_usage() -> usize {
    5
}

fn default_min_shared_types() -> usize {
    2
}

fn default_max_candidates() -> usize {
    20
}

impl AnalyzerConfig {
    /// Clamp out-of-range values into something the analyzer can use
    pub fn sanitized(mut self) -> Self {
        if !self.domain.weights.is_valid() {
            debug!("Signal weights do not sum to 1.0, normalizing");
            self.domain.weights.normalize();
        }
        self.domain.confidence_floor = self.domain.confidence_floor.clamp(0.0, 1.0);
        self.min_cohesion = self.min_cohesion.clamp(0.0, 1.0);
        self.max_fragmentation = self.max_fragmentation.clamp(0.0, 1.0);
        self
    }
}

/// Load configuration from the repository root
///
/// Tries `context-analyzer.toml`, then `.context-analyzer.json`. A file that
/// fails to parse is logged and skipped; with nothing usable the defaults are
/// returned.
pub fn load_project_config(repo_path: &Path) -> AnalyzerConfig {
    for name in CONFIG_FILE_NAMES {
        let path = repo_path.join(name);
        if !path.exists() {
            continue;
        }
        match load_config_file(&path) {
            Ok(config) => {
                debug!("Loaded project config from {}", path.display());
                return config.sanitized();
            }
            Err(e) => {
                warn!("Failed to load {}: {}", path.display(), e);
            }
        }
    }

    debug!("No project config found, using defaults");
    AnalyzerConfig::default()
}

/// Load configuration from a TOML or JSON file, chosen by extension
pub fn load_config_file(path: &Path) -> anyhow::Result<AnalyzerConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: AnalyzerConfig = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(&content)?,
        _ => toml::from_str(&content)?,
    };
    Ok(config)
}

#[cfg(test)]
mod tests;
