//! Generate error code documentation from the error enums themselves.
//!
//! Codes, descriptions, details and help text come straight from the
//! `code()`, `description()`, `details()` and `help()` methods of
//! `ConfigError`, `SolverError`, `AssemblyError` and `ExportError`.
//!
//! Run with:
//! ```bash
//! cargo run --bin generate_error_docs > docs/ERROR_CODES.md
//! ```

use std::fmt::Write;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use acrostic::assembler::AssemblyError;
use acrostic::errors::ConfigError;
use acrostic::export::ExportError;
use acrostic::solver::SolverError;

/// Append documentation for every error in `$errors` to `$out`. Each error type
/// must have `code()`, `description()`, `details()`, `help()` and `display_detailed()`.
macro_rules! write_error_docs {
    ($out:expr, $errors:expr) => {
        for error in $errors {
            let _ = writeln!($out, "### {}: {}\n", error.code(), error.description());
            let _ = writeln!($out, "**Details:** {}\n", error.details());

            if let Some(help_text) = error.help() {
                let _ = writeln!($out, "**How to fix:**\n```\n{help_text}\n```\n");
            }

            let _ = writeln!($out, "**Example error message:**\n```\n{error}\n```\n");
            let _ = writeln!($out, "**Detailed format:**\n```\n{}\n```\n", error.display_detailed());
            let _ = writeln!($out, "---\n");
        }
    };
}

fn all_config_error_variants() -> Vec<ConfigError> {
    vec![
        ConfigError::LexiconUnreadable {
            path: PathBuf::from("data/missing.dict"),
            source: io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
        },
        ConfigError::EmptyLexicon { label: "data/empty.dict".to_string(), skipped: 2 },
        ConfigError::EmptyInput { field: "source", input: "1984".to_string() },
        ConfigError::ContradictoryBounds { min: 9, max: 5 },
        ConfigError::EmptyIncludedWord { word: "--".to_string() },
        ConfigError::IncludedWordsInfeasible { pool: "quote", letter: 'q', requested: 2, available: 1 },
    ]
}

fn all_solver_error_variants() -> Vec<SolverError> {
    vec![
        SolverError::TimedOut { elapsed: Duration::from_secs(30), nodes: 1_250_000 },
        SolverError::NodeLimitExceeded { limit: 1_000_000 },
        SolverError::InconsistentAssignment { violated: 1, first: "[quote 'e'] 1*x3 + 2*x7 = 2".to_string() },
        SolverError::MalformedAssignment { expected: 812, actual: 811 },
        SolverError::BackendFailure { backend: "milp", message: "numerical instability".to_string() },
    ]
}

fn all_assembly_error_variants() -> Vec<AssemblyError> {
    vec![AssemblyError {
        letter: 'w',
        position: 4,
        source_alpha: "marktwain".to_string(),
        quote_alpha: "thereportsofmydeath".to_string(),
    }]
}

fn all_export_error_variants() -> Vec<ExportError> {
    vec![ExportError { word: "dogs".to_string(), letter: 's' }]
}

fn render() -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# Error Code Reference\n");
    let _ = writeln!(out, "**This document is auto-generated from the source code. Do not edit manually.**\n");

    let _ = writeln!(out, "## Table of Contents\n");
    let _ = writeln!(out, "- [Configuration Errors (C001-C007)](#configuration-errors)");
    let _ = writeln!(out, "- [Solver Errors (S001-S005)](#solver-errors)");
    let _ = writeln!(out, "- [Assembly Errors (A001)](#assembly-errors)");
    let _ = writeln!(out, "- [Export Errors (X001)](#export-errors)");
    let _ = writeln!(out, "- [How to Use Error Codes](#how-to-use-error-codes)\n");

    let _ = writeln!(out, "## Configuration Errors\n");
    let _ = writeln!(out, "Problems with the word list or the command-line input, reported before any solving.\n");
    write_error_docs!(out, all_config_error_variants());

    let _ = writeln!(out, "## Solver Errors\n");
    let _ = writeln!(out, "The search stopped without an answer. An impossible quote/source pair is not an error: it prints nothing.\n");
    write_error_docs!(out, all_solver_error_variants());

    let _ = writeln!(out, "## Assembly Errors\n");
    let _ = writeln!(out, "Internal consistency failures between the solver and the word ordering step.\n");
    write_error_docs!(out, all_assembly_error_variants());

    let _ = writeln!(out, "## Export Errors\n");
    let _ = writeln!(out, "Failures while building the APZ / kotwords grid key.\n");
    write_error_docs!(out, all_export_error_variants());

    let _ = writeln!(out, "## How to Use Error Codes\n");
    let _ = writeln!(out, "When you see an error like:\n");
    let _ = writeln!(out, "```");
    let _ = writeln!(out, "Error: source contains no letters: \"1984\" (C004)");
    let _ = writeln!(out, "Both the quote and the source must contain at least one letter a-z");
    let _ = writeln!(out, "```\n");
    let _ = writeln!(out, "1. Note the error code (e.g., `C004`)");
    let _ = writeln!(out, "2. Look it up in this document for a detailed explanation");
    let _ = writeln!(out, "3. Follow the suggested resolution steps\n");

    let _ = writeln!(out, "## Error Display Formats\n");
    let _ = writeln!(out, "### Detailed Format (via `display_detailed()`)");
    let _ = writeln!(out, "```");
    let _ = writeln!(out, "<message> (<code>)");
    let _ = writeln!(out, "<help text if available>");
    let _ = writeln!(out, "```");

    out
}

fn main() {
    print!("{}", render());
}
