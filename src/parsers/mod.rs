//! Import/export extraction using tree-sitter
//!
//! Turns the content of one source file into its direct import targets and its
//! exported symbols. Extraction never fails from the caller's point of view:
//! anything that cannot be parsed yields an empty [`Extraction`], which means
//! "no information" rather than "empty file".

mod typescript;

use crate::models::ExportInfo;
use tracing::debug;

/// Module prefixes that denote runtime built-ins rather than project code
const BUILTIN_PREFIXES: &[&str] = &["node:", "bun:"];

/// Errors raised while parsing a single file. These never escape [`extract`].
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("failed to load grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    #[error("parser produced no syntax tree")]
    NoTree,

    #[error("syntax error near line {line}")]
    Syntax { line: usize },
}

/// Imports and exports of one file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    /// Raw import targets in source order, deduplicated, built-ins removed
    pub imports: Vec<String>,
    pub exports: Vec<ExportInfo>,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.imports.is_empty() && self.exports.is_empty()
    }

    /// Record an import target unless it is a built-in or already present
    pub(crate) fn push_import(&mut self, target: &str) {
        if target.is_empty() || is_builtin_import(target) {
            return;
        }
        if !self.imports.iter().any(|i| i == target) {
            self.imports.push(target.to_string());
        }
    }
}

/// Extract imports and exports from `content`, dispatching on the extension of `path`
pub fn extract(content: &str, path: &str) -> Extraction {
    let ext = extension_of(path);
    let result = match ext {
        "ts" | "tsx" | "mts" | "cts" | "js" | "jsx" | "mjs" | "cjs" => {
            typescript::parse_source(content, ext)
        }
        _ => return Extraction::default(),
    };

    match result {
        Ok(extraction) => extraction,
        Err(e) => {
            debug!("Extraction failed for {}: {}", path, e);
            Extraction::default()
        }
    }
}

/// Whether `path` has an extension the extractor understands
pub fn is_supported(path: &str) -> bool {
    supported_extensions().contains(&extension_of(path))
}

/// All source extensions the extractor understands
pub fn supported_extensions() -> &'static [&'static str] {
    &["ts", "tsx", "mts", "cts", "js", "jsx", "mjs", "cjs"]
}

/// Whether an import target refers to a runtime built-in module
pub fn is_builtin_import(target: &str) -> bool {
    BUILTIN_PREFIXES.iter().any(|p| target.starts_with(p))
}

fn extension_of(path: &str) -> &str {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    match file_name.rfind('.') {
        Some(i) if i > 0 => &file_name[i + 1..],
        _ => "",
    }
}
