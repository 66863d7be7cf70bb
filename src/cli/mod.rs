//! Command line front end: discover files, load config, analyze, print

use anyhow::{Context, Result};
use clap::Parser;
use context_analyzer::config::load_project_config;
use context_analyzer::parsers::is_supported;
use context_analyzer::{analyze, AnalysisReport, AnalyzerConfig, SourceFile};
use ignore::WalkBuilder;
use rayon::prelude::*;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Estimate how expensive each source file is to understand
#[derive(Parser, Debug)]
#[command(name = "context-analyzer")]
#[command(
    version,
    about = "Estimate the context cost of every file in a TypeScript/JavaScript tree",
    after_help = "\
Examples:
  context-analyzer .                          Analyze current directory (JSON)
  context-analyzer src --format text          One line per file
  context-analyzer . --max-depth 8            Override a threshold

Thresholds are read from context-analyzer.toml or .context-analyzer.json in
PATH when present; flags override them."
)]
pub struct Cli {
    /// Path to analyze (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Output format: json or text
    #[arg(long, short = 'f', default_value = "json", value_parser = ["json", "text"])]
    pub format: String,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Import depth above which a file is flagged
    #[arg(long, env = "CONTEXT_ANALYZER_MAX_DEPTH")]
    pub max_depth: Option<usize>,

    /// Context budget (tokens) above which a file is flagged
    #[arg(long, env = "CONTEXT_ANALYZER_MAX_CONTEXT_BUDGET")]
    pub max_context_budget: Option<usize>,

    /// Cohesion below which a file is flagged (0.0-1.0)
    #[arg(long)]
    pub min_cohesion: Option<f64>,

    /// Domain fragmentation above which a file is flagged (0.0-1.0)
    #[arg(long)]
    pub max_fragmentation: Option<f64>,

    /// Report findings for build output (dist/, *.min.js, ...)
    #[arg(long)]
    pub include_build_artifacts: bool,
}

impl Cli {
    /// Project config with command line overrides applied
    fn config(&self) -> AnalyzerConfig {
        let mut config = load_project_config(&self.path);
        if let Some(v) = self.max_depth {
            config.max_depth = v;
        }
        if let Some(v) = self.max_context_budget {
            config.max_context_budget = v;
        }
        if let Some(v) = self.min_cohesion {
            config.min_cohesion = v;
        }
        if let Some(v) = self.max_fragmentation {
            config.max_fragmentation = v;
        }
        if self.include_build_artifacts {
            config.include_build_artifacts = true;
        }
        config.sanitized()
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let root = cli
        .path
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", cli.path.display()))?;
    if !root.is_dir() {
        anyhow::bail!("Not a directory: {}", root.display());
    }

    let config = cli.config();
    let files = collect_files(&root)?;
    info!("Analyzing {} files in {}", files.len(), root.display());

    let report = analyze(&files, &config);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match cli.format.as_str() {
        "text" => write_text(&mut out, &report)?,
        _ => {
            serde_json::to_writer_pretty(&mut out, &report)
                .context("Failed to serialize report")?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Read every supported source file under `root`, honoring .gitignore.
/// Paths are repo-relative and `/`-separated; unreadable files are skipped.
pub fn collect_files(root: &Path) -> Result<Vec<SourceFile>> {
    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(true)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .require_git(false)
        .add_custom_ignore_filename(".contextignore");

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in builder.build().flatten() {
        let path = entry.path();
        if path.is_file() && is_supported(&path.to_string_lossy()) {
            paths.push(path.to_path_buf());
        }
    }
    paths.sort();

    let files: Vec<SourceFile> = paths
        .par_iter()
        .filter_map(|path| {
            let relative = relative_path(root, path)?;
            match std::fs::read_to_string(path) {
                Ok(content) => Some(SourceFile::new(relative, content)),
                Err(e) => {
                    warn!("Skipping {}: {}", path.display(), e);
                    None
                }
            }
        })
        .collect();

    debug!("Collected {} source files", files.len());
    Ok(files)
}

fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

fn write_text(out: &mut impl Write, report: &AnalysisReport) -> Result<()> {
    for r in &report.results {
        writeln!(
            out,
            "{:<8} {:>8} tokens  depth {:>2}  cohesion {:.2}  {}",
            r.severity.to_string(),
            r.context_budget,
            r.import_depth,
            r.cohesion_score,
            r.file
        )?;
        for issue in &r.issues {
            writeln!(out, "         - {}", issue)?;
        }
    }
    let s = &report.summary;
    writeln!(
        out,
        "\n{} files, {} tokens, {} cycles: {} critical, {} major, {} minor, {} info",
        s.total_files, s.total_tokens, s.circular_chains, s.critical, s.major, s.minor, s.info
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_collect_files_relative_and_filtered() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src/user")).unwrap();
        fs::write(dir.path().join("src/user/api.ts"), "export const a = 1;").unwrap();
        fs::write(dir.path().join("src/index.js"), "import './user/api';").unwrap();
        fs::write(dir.path().join("README.md"), "# hi").unwrap();

        let root = dir.path().canonicalize().unwrap();
        let files = collect_files(&root).unwrap();
        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["src/index.js", "src/user/api.ts"]);
        assert_eq!(files[1].content, "export const a = 1;");
    }

    #[test]
    fn test_collect_files_honors_gitignore() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("dist")).unwrap();
        fs::write(dir.path().join(".gitignore"), "dist/\n").unwrap();
        fs::write(dir.path().join("dist/out.js"), "export const x = 1;").unwrap();
        fs::write(dir.path().join("main.ts"), "export const y = 1;").unwrap();

        let root = dir.path().canonicalize().unwrap();
        let files = collect_files(&root).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, "main.ts");
    }

    #[test]
    fn test_cli_flags_override_project_config() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("context-analyzer.toml"),
            "max_depth = 9\nmin_cohesion = 0.4\n",
        )
        .unwrap();
        let cli = Cli::parse_from([
            "context-analyzer",
            dir.path().to_str().unwrap(),
            "--max-depth",
            "3",
        ]);
        let config = cli.config();
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.min_cohesion, 0.4);
    }

    #[test]
    fn test_text_output() {
        let report = analyze(
            &[SourceFile::new("a.ts", "export const a = 1;")],
            &AnalyzerConfig::default(),
        );
        let mut buf = Vec::new();
        write_text(&mut buf, &report).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("info"));
        assert!(text.contains("a.ts"));
        assert!(text.contains("1 files"));
    }
}
