//! `bench_local.rs`: quick local timing runner (no Criterion)
//!
//! PURPOSE
//! -------
//! - Fast, ad-hoc timing for a handful of quote/source pairs on *your* machine.
//! - Loads the word list once, then generates each acrostic several times and reports the median.
//!
//! HOW TO RUN
//! ----------
//! - Optimized build:                `cargo run --bin bench_local --release`
//! - Multiple repeats:               `cargo run --bin bench_local --release -- -r 5`
//! - Print the answers:              `cargo run --bin bench_local --release -- -p`
//! - See all flags:                  `cargo run --bin bench_local -- --help`
//!
//! NOTES
//! -----
//! - Not statistically rigorous. Use the same machine and `--release` for comparable numbers.
//! - Cases live in `get_cases()` below.
//! - One warm-up run per case is done (not included in timing).
//! - We report the *median* over repeats (more robust than mean for small _N_).

use std::hint::black_box;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;

use acrostic::generator::{generate, is_valid_solution, AcrosticOptions};
use acrostic::lexicon::{Lexicon, LexiconFilter, DEFAULT_MAX_WORD_LENGTH, DEFAULT_MIN_SCORE, DEFAULT_MIN_WORD_LENGTH};
use acrostic::solver::SolverConfig;

/// Load the word list once, then time several quote/source pairs.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the word list file (word;score per line)
    #[arg(
        short,
        long,
        default_value = concat!(env!("CARGO_MANIFEST_DIR"), "/data/xwordlist.dict")
    )]
    wordlist: String,

    /// Minimum score filter
    #[arg(short = 'm', long, default_value_t = DEFAULT_MIN_SCORE)]
    min_score: i32,

    /// Number of repeats per case (median is reported)
    #[arg(short = 'r', long = "repeats", default_value_t = 1)]
    num_repeats: usize,

    /// Print the answers of the last run of each case
    #[arg(short = 'p', long = "print")]
    print: bool,

    /// Per-run solver time limit in seconds
    #[arg(short = 't', long, default_value_t = 30)]
    timeout: u64,
}

struct Case {
    quote: &'static str,
    source: &'static str,
}

fn get_cases() -> Vec<Case> {
    vec![
        Case { quote: "The quick brown fox jumps over the lazy dog", source: "Typing drill" },
        Case {
            quote: "The reports of my death are greatly exaggerated",
            source: "Mark Twain",
        },
        Case {
            quote: "It was the best of times, it was the worst of times",
            source: "Dickens, Two Cities",
        },
        Case {
            quote: "Not all those who wander are lost",
            source: "Tolkien",
        },
    ]
}

fn median(mut xs: Vec<f64>) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.sort_by(f64::total_cmp);
    let n = xs.len();
    if n % 2 == 1 {
        xs[n / 2]
    } else {
        0.5 * (xs[n / 2 - 1] + xs[n / 2])
    }
}

const MAX_LABEL_LEN: usize = 24;

fn main() -> ExitCode {
    /// (source, median seconds, status, nodes of the last run)
    type SummaryRow = (String, f64, &'static str, u64);

    let cli = Cli::parse();
    acrostic::log::init_logger(acrostic::log::debug_requested());

    let filter = LexiconFilter {
        min_score: cli.min_score,
        min_len: DEFAULT_MIN_WORD_LENGTH,
        max_len: DEFAULT_MAX_WORD_LENGTH,
    };

    eprintln!("Loading word list from: {}", cli.wordlist);
    let t_load = Instant::now();
    let lexicon = match Lexicon::load_from_path(&cli.wordlist, &filter) {
        Ok(lexicon) => lexicon,
        Err(e) => {
            eprintln!("Error: {}", e.display_detailed());
            return ExitCode::FAILURE;
        }
    };
    eprintln!("Loaded {} words in {:.3}s", lexicon.len(), t_load.elapsed().as_secs_f64());

    let options = AcrosticOptions {
        solver: SolverConfig { time_limit: Some(Duration::from_secs(cli.timeout)), ..SolverConfig::default() },
        ..AcrosticOptions::default()
    };
    let cases = get_cases();
    let mut summary: Vec<SummaryRow> = Vec::with_capacity(cases.len());

    for (idx, case) in cases.iter().enumerate() {
        eprintln!("\n[{:02}] {} / {}", idx + 1, case.source, case.quote);

        if let Err(e) = generate(case.quote, case.source, &lexicon, &options) {
            eprintln!("  ✗ Warm-up failed: {}", e.display_detailed());
            continue;
        }

        let mut times = Vec::with_capacity(cli.num_repeats);
        let mut last = None;

        for rep in 0..cli.num_repeats {
            let t_solve = Instant::now();
            let acrostic = match generate(black_box(case.quote), case.source, &lexicon, &options) {
                Ok(acrostic) => acrostic,
                Err(e) => {
                    eprintln!("  ✗ Run {}/{} failed: {e}", rep + 1, cli.num_repeats);
                    continue;
                }
            };
            let solve_secs = t_solve.elapsed().as_secs_f64();

            times.push(solve_secs);
            eprintln!(
                "  run {:>2}/{:>2}: {:.3}s ({} nodes)",
                rep + 1,
                cli.num_repeats,
                solve_secs,
                acrostic.stats.nodes
            );
            last = Some(acrostic);
        }

        let Some(acrostic) = last else {
            continue;
        };
        let med = median(times);
        let status = if acrostic.is_feasible() { "feasible" } else { "infeasible" };

        if acrostic.is_feasible() && !is_valid_solution(&acrostic.words, case.quote, case.source) {
            eprintln!("  ✗ answers do not spell the quote and source: {:?}", acrostic.words);
        }
        if cli.print {
            for word in &acrostic.words {
                println!("{}", word.to_uppercase());
            }
        }

        eprintln!("  → median {med:.3}s over {} run(s); {status}", cli.num_repeats);
        summary.push((case.source.to_string(), med, status, acrostic.stats.nodes));
    }

    eprintln!("\n==== Summary ====");
    eprintln!("{:<MAX_LABEL_LEN$} | {:>10} | {:>10} | {:>10}", "source", "median (s)", "status", "nodes");
    eprintln!("{:-<MAX_LABEL_LEN$}-+-{:-<10}-+-{:-<10}-+-{:-<10}", "", "", "", "");
    for (source, med, status, nodes) in &summary {
        let display = if source.len() > MAX_LABEL_LEN {
            format!("{}…", source.chars().take(MAX_LABEL_LEN - 1).collect::<String>())
        } else {
            source.clone()
        };
        eprintln!("{display:<MAX_LABEL_LEN$} | {med:>10.3} | {status:>10} | {nodes:>10}");
    }

    ExitCode::SUCCESS
}
