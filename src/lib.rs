//! context-analyzer - how much context does a file cost to understand?
//!
//! Builds a file-level import graph for TypeScript/JavaScript sources, infers
//! the business domain of every export from several weak signals, and scores
//! each file on context budget, import depth, cycles, cohesion and domain
//! fragmentation. Works on in-memory `(path, content)` pairs; file discovery
//! and rendering are left to the caller (see the `context-analyzer` binary).
//!
//! ```no_run
//! use context_analyzer::{analyze, AnalyzerConfig, SourceFile};
//!
//! let files = vec![
//!     SourceFile::new("src/a.ts", "export function a() {}"),
//!     SourceFile::new("src/b.ts", "import { a } from './a';\nexport function b() { a(); }"),
//! ];
//! let report = analyze(&files, &AnalyzerConfig::default());
//! println!("{}", report.summary.total_tokens);
//! ```

pub mod analyzer;
pub mod clustering;
pub mod config;
pub mod domain;
pub mod graph;
pub mod models;
pub mod parsers;
pub mod scoring;

pub use analyzer::{analyze, analyze_graph};
pub use config::{load_project_config, AnalyzerConfig};
pub use graph::DependencyGraph;
pub use models::{
    AnalysisReport, AnalysisSummary, ConsolidationCandidate, DomainAssignment, ExportInfo,
    FileAnalysis, FileNode, ModuleCluster, Severity, SourceFile,
};
