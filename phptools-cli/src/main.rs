//! phptools CLI - check PHP use statements and generate constructors.
//!
//! Features:
//! - `check`: missing and unused `use` statements, one or many files,
//!   checked in parallel with Rayon
//! - `constructor`: constructor boilerplate from documented properties
//! - Plain or JSON output, phptools.toml configuration
//! - CI-friendly exit codes: 0 clean, 1 diagnostics found, 2 error

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

use phptools_core::{
    check_file, ensure_php_syntax, escape_snippet, generate_constructor, init_structured_logging,
    load_config, log_error, log_warn, print_json, print_plain, syntax_from_path, CheckReport,
    PhptoolsConfig, PhptoolsError, Template,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "PHP use-statement checker and constructor generator")]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report missing and unused `use` statements
    Check {
        /// PHP files to check
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output results in JSON format
        #[arg(long)]
        json: bool,

        /// Syntax identifier of the documents (defaults to each file's extension)
        #[arg(long)]
        syntax: Option<String>,
    },

    /// Generate a constructor from documented properties
    Constructor {
        /// PHP file holding the class
        file: PathBuf,

        /// Escape `$` for snippet insertion
        #[arg(long)]
        snippet: bool,

        /// Template file replacing the builtin one
        #[arg(long)]
        template: Option<PathBuf>,

        /// Syntax identifier of the document (defaults to the file's extension)
        #[arg(long)]
        syntax: Option<String>,
    },
}

/// Resolves the syntax identifier for `file` and applies the PHP gate.
fn gate(file: &Path, syntax: Option<&str>) -> Result<(), PhptoolsError> {
    let syntax = syntax
        .map(str::to_string)
        .unwrap_or_else(|| syntax_from_path(file));
    ensure_php_syntax(&syntax)
}

/// Picks the template: explicit flag, then config override, then builtin.
fn resolve_template(flag: Option<&Path>, config: &PhptoolsConfig, root: &Path) -> Result<Template> {
    let path = flag
        .map(Path::to_path_buf)
        .or_else(|| config.template_path(root));

    match path {
        Some(p) => Template::load(&p)
            .with_context(|| format!("Failed to load template {}", p.display())),
        None => Ok(Template::builtin()),
    }
}

/// Stderr line for a failed file. Refusals are skips, not errors.
fn failure_line(file: &Path, err: &PhptoolsError) -> String {
    let tag = if err.is_refusal() { "SKIP" } else { "ERROR" };
    format!("[{}] {}: {}", tag, file.display(), err)
}

fn report_failure(file: &Path, err: &PhptoolsError) {
    let line = failure_line(file, err);
    if err.is_refusal() {
        log_warn(&line);
    } else {
        log_error(&line);
    }
    eprintln!("{}", line);
}

fn run_check(files: &[PathBuf], json: bool, syntax: Option<&str>) -> i32 {
    let results: Vec<(PathBuf, Result<CheckReport, PhptoolsError>)> = files
        .par_iter()
        .map(|file| {
            let result = gate(file, syntax).and_then(|_| check_file(file));
            (file.clone(), result)
        })
        .collect();

    let mut has_errors = false;
    let mut has_diagnostics = false;
    let mut reports: Vec<(&Path, &CheckReport)> = Vec::with_capacity(results.len());

    for (file, result) in &results {
        match result {
            Ok(report) => {
                has_diagnostics |= !report.is_clean();
                reports.push((file.as_path(), report));
            }
            Err(e) => {
                has_errors = true;
                report_failure(file, e);
            }
        }
    }

    if json {
        print_json(&reports);
    } else {
        let many = reports.len() > 1;
        for (file, report) in &reports {
            if many {
                println!("== {}", file.display());
            }
            print_plain(report);
        }
    }

    if has_errors {
        2
    } else if has_diagnostics {
        1
    } else {
        0
    }
}

fn run_constructor(
    file: &Path,
    snippet: bool,
    template: &Template,
    syntax: Option<&str>,
) -> Result<()> {
    gate(file, syntax)?;

    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    if let Some(code) = generate_constructor(&content, template) {
        if snippet {
            print!("{}", escape_snippet(&code));
        } else {
            print!("{}", code);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("[PANIC] phptools internal error: {}", info);
        eprintln!("[PANIC] The process will exit safely with code 2.");
    }));

    // JSON logs on stderr, filtered by RUST_LOG
    init_structured_logging();

    let cli = Cli::parse();

    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let config = load_config(&cwd)?.unwrap_or_default();

    match cli.command {
        Command::Check { files, json, syntax } => {
            let code = run_check(&files, json || config.wants_json(), syntax.as_deref());
            std::process::exit(code);
        }
        Command::Constructor {
            file,
            snippet,
            template,
            syntax,
        } => {
            let template = resolve_template(template.as_deref(), &config, &cwd)?;
            if let Err(e) = run_constructor(&file, snippet, &template, syntax.as_deref()) {
                match e.downcast_ref::<PhptoolsError>() {
                    Some(err) => report_failure(&file, err),
                    None => {
                        log_error(&format!("{:#}", e));
                        eprintln!("[ERROR] {:#}", e);
                    }
                }
                std::process::exit(2);
            }
            Ok(())
        }
    }
}
