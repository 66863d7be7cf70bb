//! Core data models for context-analyzer
//!
//! These models are shared by the graph builder, the domain inference engine
//! and the analyzer, and form the serialized output of an analysis run.

use serde::{Deserialize, Serialize};

/// Domain name used when inference could not settle on anything.
pub const UNKNOWN_DOMAIN: &str = "unknown";

/// A source file handed to the analyzer by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    /// Repo-relative, `/`-separated path. Used as the graph key.
    pub path: String,
    pub content: String,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Declaration kind of an exported symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    Function,
    Class,
    Const,
    Type,
    Interface,
    Default,
}

impl std::fmt::Display for ExportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportKind::Function => write!(f, "function"),
            ExportKind::Class => write!(f, "class"),
            ExportKind::Const => write!(f, "const"),
            ExportKind::Type => write!(f, "type"),
            ExportKind::Interface => write!(f, "interface"),
            ExportKind::Default => write!(f, "default"),
        }
    }
}

/// Which weak signals voted for a candidate domain
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainSignals {
    pub folder_structure: bool,
    pub import_path: bool,
    pub type_reference: bool,
    pub co_usage: bool,
    pub export_name: bool,
}

impl DomainSignals {
    /// Set every flag that is set in `other`
    pub fn merge(&mut self, other: DomainSignals) {
        self.folder_structure |= other.folder_structure;
        self.import_path |= other.import_path;
        self.type_reference |= other.type_reference;
        self.co_usage |= other.co_usage;
        self.export_name |= other.export_name;
    }

    pub fn count(&self) -> usize {
        [
            self.folder_structure,
            self.import_path,
            self.type_reference,
            self.co_usage,
            self.export_name,
        ]
        .iter()
        .filter(|b| **b)
        .count()
    }
}

/// A ranked domain guess for one export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainAssignment {
    pub domain: String,
    /// Weighted sum of the signal flags, in [0, 1]
    pub confidence: f64,
    pub signals: DomainSignals,
}

/// An exported symbol of a file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportInfo {
    pub name: String,
    pub kind: ExportKind,
    /// Ranked (descending confidence). Filled in by domain inference.
    #[serde(default)]
    pub domains: Vec<DomainAssignment>,
    /// Imported identifiers referenced by this export's body
    #[serde(default)]
    pub imports: Vec<String>,
    /// Named types referenced by this export
    #[serde(default)]
    pub type_references: Vec<String>,
}

impl ExportInfo {
    pub fn new(name: impl Into<String>, kind: ExportKind) -> Self {
        Self {
            name: name.into(),
            kind,
            domains: Vec::new(),
            imports: Vec::new(),
            type_references: Vec::new(),
        }
    }

    /// Best single guess, derived from the ranked list
    pub fn inferred_domain(&self) -> &str {
        self.domains
            .first()
            .map(|d| d.domain.as_str())
            .unwrap_or(UNKNOWN_DOMAIN)
    }
}

/// A file in the dependency graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileNode {
    pub path: String,
    /// Raw import targets in source order, deduplicated
    pub imports: Vec<String>,
    pub exports: Vec<ExportInfo>,
    pub token_cost: usize,
    pub line_count: usize,
}

impl FileNode {
    /// Directory part of the path ("" for root-level files)
    pub fn directory(&self) -> &str {
        directory_of(&self.path)
    }
}

/// Directory part of a `/`-separated path
pub fn directory_of(path: &str) -> &str {
    path.rfind('/').map(|i| &path[..i]).unwrap_or("")
}

/// Severity of a per-file result
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Minor,
    Major,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Minor => write!(f, "minor"),
            Severity::Major => write!(f, "major"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

/// Analysis result for a single file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileAnalysis {
    pub file: String,
    pub token_cost: usize,
    pub line_count: usize,
    pub import_depth: usize,
    pub dependency_count: usize,
    pub dependency_list: Vec<String>,
    pub circular_deps: Vec<Vec<String>>,
    pub cohesion_score: f64,
    pub domains: Vec<String>,
    pub primary_domain: String,
    pub export_count: usize,
    pub context_budget: usize,
    pub fragmentation_score: f64,
    pub related_files: Vec<String>,
    pub severity: Severity,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
}

/// How a scattered domain could be pulled back together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidationPlan {
    pub target_file_count: usize,
    pub steps: Vec<String>,
}

/// Files sharing a primary domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleCluster {
    pub domain: String,
    pub files: Vec<String>,
    pub total_tokens: usize,
    pub fragmentation_score: f64,
    pub avg_cohesion: f64,
    pub suggested_consolidation: ConsolidationPlan,
}

/// A pair of files worth merging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolidationCandidate {
    pub file1: String,
    pub file2: String,
    pub co_usage_count: usize,
    pub shared_types: usize,
    pub strength: f64,
    pub reason: String,
}

/// Summary of a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub total_files: usize,
    pub total_tokens: usize,
    pub avg_context_budget: f64,
    pub avg_cohesion: f64,
    pub max_import_depth: usize,
    pub circular_chains: usize,
    pub critical: usize,
    pub major: usize,
    pub minor: usize,
    pub info: usize,
}

impl AnalysisSummary {
    pub fn from_results(results: &[FileAnalysis], circular_chains: usize) -> Self {
        let mut summary = Self {
            total_files: results.len(),
            circular_chains,
            ..Self::default()
        };
        if results.is_empty() {
            return summary;
        }

        let mut budget_sum = 0usize;
        let mut cohesion_sum = 0.0;
        for r in results {
            summary.total_tokens += r.token_cost;
            budget_sum += r.context_budget;
            cohesion_sum += r.cohesion_score;
            summary.max_import_depth = summary.max_import_depth.max(r.import_depth);
            match r.severity {
                Severity::Critical => summary.critical += 1,
                Severity::Major => summary.major += 1,
                Severity::Minor => summary.minor += 1,
                Severity::Info => summary.info += 1,
            }
        }
        summary.avg_context_budget = budget_sum as f64 / results.len() as f64;
        summary.avg_cohesion = cohesion_sum / results.len() as f64;
        summary
    }
}

/// Everything an analysis run produces
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub results: Vec<FileAnalysis>,
    pub clusters: Vec<ModuleCluster>,
    pub consolidation_candidates: Vec<ConsolidationCandidate>,
    pub summary: AnalysisSummary,
}
