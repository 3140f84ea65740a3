use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use vhdl_style_linter::config::{merge_config, resolve_config};
use vhdl_style_linter::models::Severity;
use vhdl_style_linter::rule_list::RuleList;
use vhdl_style_linter::{lint_path, FileReport, LintError, LinterOptions};

#[derive(ValueEnum, Clone, Debug)]
enum OutputFormat {
    Terminal,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SeverityLevel {
    Error,
    Warning,
    Info,
}

impl SeverityLevel {
    /// Whether a violation of `severity` is at least this level
    fn admits(self, severity: Severity) -> bool {
        let threshold = match self {
            SeverityLevel::Error => Severity::Error,
            SeverityLevel::Warning => Severity::Warning,
            SeverityLevel::Info => Severity::Info,
        };
        severity <= threshold
    }
}

/// Exit codes used by the linter
mod exit_codes {
    pub const SUCCESS: i32 = 0; // No violations found
    pub const VIOLATIONS_FOUND: i32 = 1; // Violations remain
    pub const FILE_ERROR: i32 = 3; // File not found or I/O error
    pub const CLASSIFICATION_ERROR: i32 = 4; // Failed to classify a VHDL file
    pub const CONFIG_ERROR: i32 = 5; // Configuration file error
}

#[derive(Parser, Debug)]
#[command(
    name = "vhdl-style-linter",
    author,
    version,
    about = "Check and fix the style of VHDL source files",
    long_about = "Check and fix the style of VHDL source files.\n\nIf no paths are provided, the current directory is checked recursively."
)]
struct Args {
    /// Paths to analyze (files or directories)
    ///
    /// Examples: vhdl-style-linter (current dir), vhdl-style-linter rtl/, vhdl-style-linter top.vhd
    #[arg(default_value = ".")]
    paths: Vec<String>,

    /// Rewrite files with violations fixed
    #[arg(long = "fix")]
    fix: bool,

    /// Path to configuration file (vhdl-style.toml or vhdl-style.json)
    ///
    /// Example: vhdl-style-linter --config vhdl-style.toml
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Output format
    ///
    /// Example: -f json (for CI/CD)
    #[arg(
        short = 'f',
        long = "output-format",
        value_enum,
        default_value = "terminal"
    )]
    output_format: OutputFormat,

    /// Last phase to run (1-7)
    #[arg(long = "max-phase")]
    max_phase: Option<u8>,

    /// Phase to skip (can be used multiple times)
    ///
    /// Example: --skip-phase 6 (leave keyword case alone)
    #[arg(long = "skip-phase")]
    skip_phase: Vec<u8>,

    /// Skip files and directories matching pattern
    #[arg(long = "skip")]
    skip: Vec<String>,

    /// Minimum severity level to report
    ///
    /// Example: -s error (only errors), -s warning (warnings+errors)
    #[arg(short = 's', long = "severity", value_enum)]
    severity: Option<SeverityLevel>,

    /// List every rule with its phase and settings, then exit
    #[arg(long = "list-rules")]
    list_rules: bool,

    /// Disable colored output
    #[arg(long = "no-color")]
    no_color: bool,

    /// Log level when RUST_LOG is not set
    #[arg(long = "log-level", default_value = "warn")]
    log_level: String,

    /// Number of threads to use (0 = auto)
    #[arg(short = 'j', long = "threads", default_value = "0", hide = true)]
    threads: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let start = Instant::now();

    // Setup logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Load configuration from the explicit file or the nearest one
    let start_path = Path::new(&args.paths[0]);
    let abs_path = start_path
        .canonicalize()
        .unwrap_or_else(|_| start_path.to_path_buf());
    let (config, config_path) = match resolve_config(args.config.as_deref(), &abs_path) {
        Ok(found) => found,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(exit_codes::CONFIG_ERROR);
        }
    };
    if let Some(path) = &config_path {
        tracing::info!(path = %path.display(), "loaded configuration");
    }
    let config = merge_config(config, args.max_phase, &args.skip_phase, &args.skip);

    let mut rules = RuleList::new();
    for e in rules.configure(&config) {
        eprintln!("Warning: {} (ignored)", e);
    }

    if args.list_rules {
        list_rules(&rules, &args.output_format)?;
        return Ok(());
    }

    let options = LinterOptions {
        threads: args.threads,
        fix: args.fix,
        config,
    };

    let mut reports = Vec::new();
    let mut errors: Vec<LintError> = Vec::new();
    let mut missing_paths = false;
    let mut total_files = 0;

    for path_str in &args.paths {
        let path = Path::new(path_str);

        // Check if path exists
        if !path.exists() {
            eprintln!("Error: Path not found: {}", path.display());
            missing_paths = true;
            continue;
        }

        let result = lint_path(path, &rules, &options)?;
        total_files += result.files_analyzed;
        reports.extend(result.reports);
        errors.extend(result.errors);
    }

    // Filter by severity if requested
    if let Some(level) = args.severity {
        for report in &mut reports {
            report.violations.retain(|v| level.admits(v.severity));
        }
    }
    reports.retain(|r| !r.violations.is_empty() || !r.rule_failures.is_empty() || r.fixed > 0);
    reports.sort_by(|a, b| a.path.cmp(&b.path));

    let use_color = !args.no_color;
    match args.output_format {
        OutputFormat::Terminal => report_terminal(&reports, &errors, use_color),
        OutputFormat::Json => report_json(&reports, &errors)?,
    }
    show_statistics(&reports, total_files, start.elapsed().as_secs_f64(), args.fix);

    // Determine exit code based on what happened
    let exit_code = if errors.iter().any(LintError::is_classification) {
        exit_codes::CLASSIFICATION_ERROR
    } else if missing_paths || !errors.is_empty() {
        exit_codes::FILE_ERROR
    } else if reports.iter().any(|r| !r.violations.is_empty()) {
        exit_codes::VIOLATIONS_FOUND
    } else {
        exit_codes::SUCCESS
    };

    if exit_code != exit_codes::SUCCESS {
        process::exit(exit_code);
    }

    Ok(())
}

fn list_rules(rules: &RuleList, format: &OutputFormat) -> Result<()> {
    let docs = rules.rule_documentation();
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&docs)?),
        OutputFormat::Terminal => {
            println!("{:<26} {:>5} {:>8} {:>8} {:>9}  solution", "rule", "phase", "disabled", "fixable", "severity");
            for doc in docs {
                println!(
                    "{:<26} {:>3}.{} {:>8} {:>8} {:>9}  {}",
                    doc.id, doc.phase, doc.subphase, doc.disabled, doc.fixable, doc.severity.to_string(), doc.solution
                );
            }
        }
    }
    Ok(())
}

fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "\x1b[31m",
        Severity::Warning => "\x1b[33m",
        Severity::Info => "\x1b[34m",
    }
}

fn report_terminal(reports: &[FileReport], errors: &[LintError], use_color: bool) {
    for (file_idx, report) in reports.iter().enumerate() {
        // Add spacing between files (but not before the first one)
        if file_idx > 0 {
            println!();
        }

        if use_color {
            println!("\x1b[1;4m{}\x1b[0m", report.path.display());
        } else {
            println!("{}", report.path.display());
        }

        for violation in &report.violations {
            if use_color {
                println!(
                    "  {}: {}{}\x1b[0m: {}",
                    violation.line,
                    severity_color(violation.severity),
                    violation.rule_id,
                    violation.solution
                );
            } else {
                println!(
                    "  {}: {}: {}",
                    violation.line, violation.rule_id, violation.solution
                );
            }
        }
        for failure in &report.rule_failures {
            println!("  internal: {}", failure);
        }
    }

    for error in errors {
        eprintln!("Error: {}", error);
    }
}

fn report_json(reports: &[FileReport], errors: &[LintError]) -> Result<()> {
    use serde_json::json;

    let files: Vec<_> = reports
        .iter()
        .map(|report| {
            json!({
                "file": report.path.display().to_string(),
                "violations": report.violations,
                "rule_failures": report.rule_failures,
                "fixed": report.fixed,
            })
        })
        .collect();
    let errors: Vec<_> = errors
        .iter()
        .map(|e| {
            json!({
                "file": e.path().display().to_string(),
                "error": e.to_string(),
            })
        })
        .collect();

    let output = json!({
        "files": files,
        "errors": errors,
        "count": reports.iter().map(|r| r.violations.len()).sum::<usize>(),
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn show_statistics(reports: &[FileReport], total_files: usize, elapsed_secs: f64, fixing: bool) {
    let mut rule_counts: HashMap<&str, usize> = HashMap::new();
    for report in reports {
        for violation in &report.violations {
            *rule_counts.entry(violation.rule_id.as_str()).or_insert(0) += 1;
        }
    }
    let total_violations: usize = rule_counts.values().sum();
    let total_fixed: usize = reports.iter().map(|r| r.fixed).sum();

    eprintln!("\n{}", "=".repeat(60));
    if fixing {
        eprintln!("Edits applied: {}", total_fixed);
    }
    if total_violations == 0 {
        eprintln!("No issues found!");
    } else {
        eprintln!("Total violations: {}", total_violations);
        let mut sorted_rules: Vec<_> = rule_counts.into_iter().collect();
        sorted_rules.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        for (rule, count) in sorted_rules.iter().take(10) {
            eprintln!("  {}: {}", rule, count);
        }
        if sorted_rules.len() > 10 {
            eprintln!("  ... and {} more rules", sorted_rules.len() - 10);
        }
    }
    eprintln!("Files analyzed: {} in {:.2}s", total_files, elapsed_secs);
    eprintln!("{}", "=".repeat(60));
}
