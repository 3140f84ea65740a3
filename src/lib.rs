#![warn(clippy::all)]
#![warn(clippy::cognitive_complexity)]
#![warn(clippy::too_many_lines)]
#![warn(clippy::too_many_arguments)]
// Allow some common patterns that are fine in this codebase
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod classify;
pub mod config;
pub mod lexer;
pub mod models;
pub mod noqa;
pub mod rule_list;
pub mod rules;
pub mod stream;
pub mod token;

use anyhow::Result;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::classify::{classify_source, ClassificationError};
use crate::config::Config;
use crate::models::ReportedViolation;
use crate::rule_list::{PhaseSelection, RuleList, RunReport};
use crate::stream::TokenStream;

/// File extensions treated as VHDL sources
pub const VHDL_EXTENSIONS: [&str; 2] = ["vhd", "vhdl"];

/// Options for the linter
#[derive(Clone, Default)]
pub struct LinterOptions {
    /// Worker threads, 0 for rayon's default
    pub threads: usize,
    /// Rewrite files with the fixed text
    pub fix: bool,
    pub config: Config,
}

/// Failure that stops processing of one file
#[derive(Debug, Error)]
pub enum LintError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{}: {source}", path.display())]
    Classification {
        path: PathBuf,
        source: ClassificationError,
    },
}

impl LintError {
    pub fn path(&self) -> &Path {
        match self {
            LintError::Read { path, .. }
            | LintError::Write { path, .. }
            | LintError::Classification { path, .. } => path,
        }
    }

    pub fn is_classification(&self) -> bool {
        matches!(self, LintError::Classification { .. })
    }
}

/// Result for one file that was processed to the end
#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    pub violations: Vec<ReportedViolation>,
    /// Rules that failed on this file
    pub rule_failures: Vec<String>,
    /// Edits applied when fixing
    pub fixed: usize,
}

/// Result of linting
pub struct LintResult {
    pub reports: Vec<FileReport>,
    pub errors: Vec<LintError>,
    pub files_analyzed: usize,
}

impl LintResult {
    pub fn violation_count(&self) -> usize {
        self.reports.iter().map(|r| r.violations.len()).sum()
    }

    pub fn classification_errors(&self) -> usize {
        self.errors.iter().filter(|e| e.is_classification()).count()
    }

    pub fn file_errors(&self) -> usize {
        self.errors.len() - self.classification_errors()
    }
}

/// Classify a source text with the classifier options of a configuration
pub fn classify(source: &str, config: &Config) -> Result<TokenStream, ClassificationError> {
    let stream = classify_source(source, &config.classifier)?;
    debug!(
        tokens = stream.len(),
        lines = stream.line_count(),
        kinds = stream.kind_histogram().len(),
        "classified"
    );
    Ok(stream)
}

/// Report violations of a source text without changing it
pub fn check_source(source: &str, rules: &RuleList, config: &Config) -> Result<RunReport, ClassificationError> {
    let stream = classify(source, config)?;
    Ok(rules.analyze(&stream, &PhaseSelection::from_config(config)))
}

/// Fix a source text, returning the fixed text and what is left to report
pub fn fix_source(
    source: &str,
    rules: &RuleList,
    config: &Config,
) -> Result<(String, RunReport), ClassificationError> {
    let mut stream = classify(source, config)?;
    let report = rules.fix(&mut stream, &PhaseSelection::from_config(config));
    Ok((stream.text(), report))
}

/// Find all VHDL files in a directory
pub fn find_vhdl_files(path: &Path, skip_patterns: &[String]) -> Vec<PathBuf> {
    use walkdir::{DirEntry, WalkDir};

    // Patterns match below the search root only
    let is_excluded = |entry: &DirEntry| -> bool {
        let relative = entry.path().strip_prefix(path).unwrap_or(entry.path());
        let path_str = relative.to_string_lossy();
        relative.components().any(|component| {
            let name = component.as_os_str().to_string_lossy();
            skip_patterns
                .iter()
                .any(|pattern| name == pattern.as_str() || path_str.contains(pattern.as_str()))
        })
    };

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_excluded(e))
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .and_then(|s| s.to_str())
                    .is_some_and(|ext| VHDL_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        })
        .collect();
    files.sort();
    files
}

/// Lint (and optionally fix) one file
fn process_file(path: &Path, rules: &RuleList, options: &LinterOptions) -> Result<FileReport, LintError> {
    let source = fs::read_to_string(path).map_err(|source| LintError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let classified = |source: ClassificationError| LintError::Classification {
        path: path.to_path_buf(),
        source,
    };

    let report = if options.fix {
        let (fixed_text, report) = fix_source(&source, rules, &options.config).map_err(classified)?;
        if fixed_text != source {
            fs::write(path, fixed_text).map_err(|source| LintError::Write {
                path: path.to_path_buf(),
                source,
            })?;
            info!(path = %path.display(), edits = report.fixed, "fixed");
        }
        report
    } else {
        check_source(&source, rules, &options.config).map_err(classified)?
    };

    info!(path = %path.display(), violations = report.violations.len(), "processed");
    Ok(FileReport {
        path: path.to_path_buf(),
        violations: report.reported(),
        rule_failures: report.failures.iter().map(|f| f.to_string()).collect(),
        fixed: report.fixed,
    })
}

/// Main linting function
pub fn lint_path(path: &Path, rules: &RuleList, options: &LinterOptions) -> Result<LintResult> {
    // Get list of files to analyze
    let files = if path.is_file() {
        vec![path.to_path_buf()]
    } else {
        find_vhdl_files(path, &options.config.exclude)
    };
    let files_analyzed = files.len();

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.threads)
        .build()?;

    // Process files in parallel; each file owns its stream
    let results: Vec<Result<FileReport, LintError>> = pool.install(|| {
        files
            .par_iter()
            .map(|file| process_file(file, rules, options))
            .collect()
    });

    let mut reports = Vec::new();
    let mut errors = Vec::new();
    for result in results {
        match result {
            Ok(report) => reports.push(report),
            Err(e) => {
                warn!("{}", e);
                errors.push(e);
            }
        }
    }

    Ok(LintResult {
        reports,
        errors,
        files_analyzed,
    })
}
