use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use acrostic::export;
use acrostic::formulator::ShortfallPolicy;
use acrostic::generator::{self, AcrosticError, AcrosticOptions};
use acrostic::lexicon::{Lexicon, LexiconFilter, DEFAULT_MAX_WORD_LENGTH, DEFAULT_MIN_SCORE, DEFAULT_MIN_WORD_LENGTH};
use acrostic::solver::{BackendKind, SolverConfig, TieBreak};

/// Acrostic generator: finds words that use every letter of a quote and whose
/// initials spell its source
#[derive(Parser, Debug)]
#[command(author, version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")"), about, long_about = None)]
struct Cli {
    /// The quote whose letters the words must use
    #[arg(short, long)]
    quote: String,

    /// The source (author, title) spelled by the words' first letters
    #[arg(short, long)]
    source: String,

    /// Comma-separated words that must not be used
    #[arg(short = 'x', long, default_value = "")]
    excluded: String,

    /// Comma-separated words that must be used
    #[arg(short, long, default_value = "")]
    included: String,

    /// Path to the word list (word;score per line)
    #[arg(
        short,
        long,
        default_value = concat!(env!("CARGO_MANIFEST_DIR"), "/data/xwordlist.dict")
    )]
    wordlist: PathBuf,

    /// Minimum score filter
    #[arg(short = 'm', long, default_value_t = DEFAULT_MIN_SCORE)]
    min_score: i32,

    /// Shortest word to consider
    #[arg(long, default_value_t = DEFAULT_MIN_WORD_LENGTH)]
    min_len: usize,

    /// Longest word to consider
    #[arg(long, default_value_t = DEFAULT_MAX_WORD_LENGTH)]
    max_len: usize,

    /// Give up after this many seconds
    #[arg(long, value_parser = parse_timeout)]
    timeout: Option<Duration>,

    /// Give up after exploring this many search nodes (branch-and-bound only)
    #[arg(long)]
    node_limit: Option<u64>,

    /// Which words to prefer among those sharing an initial (lexicon, quality, balanced)
    #[arg(long, default_value_t = TieBreak::default())]
    tie_break: TieBreak,

    /// Solver backend (milp, branch-and-bound)
    #[arg(long, default_value_t = BackendKind::default())]
    backend: BackendKind,

    /// Fail instead of capping when included words need letters the quote lacks
    #[arg(long)]
    strict_included: bool,

    /// Write an APZ acrostic file for the solution
    #[arg(long)]
    apz: Option<PathBuf>,

    /// Write the kotwords acrostic fields as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Seed for the grid key shuffle (random if omitted)
    #[arg(long)]
    seed: Option<u64>,
}

fn parse_timeout(s: &str) -> Result<Duration, String> {
    let secs: f64 = s.parse().map_err(|e| format!("invalid number of seconds '{s}': {e}"))?;
    Duration::try_from_secs_f64(secs).map_err(|e| format!("invalid timeout '{s}': {e}"))
}

/// Split a comma-separated list, trimming and lowercasing items and dropping empty ones.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',').map(|item| item.trim().to_lowercase()).filter(|item| !item.is_empty()).collect()
}

/// Entry point of the acrostic CLI.
///
/// Delegates to [`try_main`] and turns any error into a message on stderr and
/// a non-zero exit code. An infeasible quote/source pair is not an error: it
/// prints nothing and exits 0.
fn main() -> ExitCode {
    acrostic::log::init_logger(acrostic::log::debug_requested());

    log::info!("Starting acrostic generator");

    if let Err(e) = try_main() {
        if let Some(acrostic_err) = e.downcast_ref::<AcrosticError>() {
            eprintln!("Error: {}", acrostic_err.display_detailed());
        } else {
            eprintln!("Error: {e}");
        }
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Steps:
/// 1. Load the word list, applying score and length filters.
/// 2. Generate the acrostic.
/// 3. Print one uppercase word per line on stdout.
/// 4. Optionally write the APZ / JSON exports.
/// 5. Print timings and sizes on stderr.
fn try_main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = LexiconFilter { min_score: cli.min_score, min_len: cli.min_len, max_len: cli.max_len };

    let t_load = Instant::now();
    let lexicon = Lexicon::load_from_path(&cli.wordlist, &filter).map_err(AcrosticError::from)?;
    let load_secs = t_load.elapsed().as_secs_f64();

    let options = AcrosticOptions {
        excluded: split_list(&cli.excluded),
        included: split_list(&cli.included),
        shortfall_policy: if cli.strict_included { ShortfallPolicy::Reject } else { ShortfallPolicy::Clamp },
        solver: SolverConfig {
            time_limit: cli.timeout,
            node_limit: cli.node_limit,
            tie_break: cli.tie_break,
            backend: cli.backend,
        },
    };

    let t_solve = Instant::now();
    let acrostic = generator::generate(&cli.quote, &cli.source, &lexicon, &options)?;
    let solve_secs = t_solve.elapsed().as_secs_f64();

    for word in &acrostic.words {
        println!("{}", word.to_uppercase());
    }

    if acrostic.is_feasible() {
        if cli.apz.is_some() || cli.json.is_some() {
            let mut rng = match cli.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let fields = export::create_kotwords_export(&cli.quote, &cli.source, &acrostic.words, &mut rng)
                .map_err(AcrosticError::from)?;
            if let Some(path) = &cli.apz {
                std::fs::write(path, export::to_apz(&fields, &cli.source))?;
                eprintln!("Wrote {}", path.display());
            }
            if let Some(path) = &cli.json {
                std::fs::write(path, export::to_json(&fields)?)?;
                eprintln!("Wrote {}", path.display());
            }
        }
    } else {
        eprintln!("No acrostic exists for this quote and source with the current word list");
    }

    eprintln!(
        "Loaded {} words in {:.3}s; solved in {:.3}s ({} candidates, {} nodes).",
        lexicon.len(),
        load_secs,
        solve_secs,
        acrostic.stats.variables,
        acrostic.stats.nodes
    );

    Ok(())
}
