//! End-to-end acrostic generation: formulate, solve, assemble.
//!
//! ```
//! use acrostic::generator::{create_acrostic, AcrosticOptions};
//! use acrostic::lexicon::{Lexicon, LexiconFilter};
//!
//! let filter = LexiconFilter { min_score: 0, min_len: 3, max_len: 10 };
//! let lexicon = Lexicon::parse_from_str("abc;50\nacb;50\nbca;50", &filter);
//!
//! let words = create_acrostic("ABC ABC", "AA", &lexicon, &AcrosticOptions::default())?;
//! assert_eq!(words.len(), 2);
//! assert!(words.iter().all(|w| w.starts_with('a')));
//! # Ok::<(), acrostic::generator::AcrosticError>(())
//! ```

use log::info;

use crate::assembler::{assemble, AssemblyError};
use crate::errors::ConfigError;
use crate::export::ExportError;
use crate::formulator::{formulate, FormulationInput, ShortfallPolicy};
use crate::letters::{alpha_only, LetterCounts};
use crate::lexicon::Lexicon;
use crate::model::CoverModel;
use crate::solver::{solve_model, SolveStats, SolveStatus, SolverConfig, SolverError};

/// Caller choices for one generation run.
#[derive(Debug, Clone, Default)]
pub struct AcrosticOptions {
    /// Words that must not be used (matched trimmed and case-insensitively).
    pub excluded: Vec<String>,
    /// Words that must be used; the solver fills in the rest.
    pub included: Vec<String>,
    pub shortfall_policy: ShortfallPolicy,
    pub solver: SolverConfig,
}

/// Any failure of the pipeline. Infeasibility is not one of them.
#[derive(Debug, thiserror::Error)]
pub enum AcrosticError {
    #[error(transparent)]
    Config(#[from] Box<ConfigError>),
    #[error(transparent)]
    Solver(#[from] SolverError),
    #[error(transparent)]
    Assembly(#[from] AssemblyError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

impl From<ConfigError> for AcrosticError {
    fn from(err: ConfigError) -> Self {
        AcrosticError::Config(Box::new(err))
    }
}

impl AcrosticError {
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            AcrosticError::Config(e) => e.code(),
            AcrosticError::Solver(e) => e.code(),
            AcrosticError::Assembly(e) => e.code(),
            AcrosticError::Export(e) => e.code(),
        }
    }

    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            AcrosticError::Config(e) => e.description(),
            AcrosticError::Solver(e) => e.description(),
            AcrosticError::Assembly(e) => e.description(),
            AcrosticError::Export(e) => e.description(),
        }
    }

    #[must_use]
    pub fn details(&self) -> &'static str {
        match self {
            AcrosticError::Config(e) => e.details(),
            AcrosticError::Solver(e) => e.details(),
            AcrosticError::Assembly(e) => e.details(),
            AcrosticError::Export(e) => e.details(),
        }
    }

    #[must_use]
    pub fn help(&self) -> Option<&'static str> {
        match self {
            AcrosticError::Config(e) => e.help(),
            AcrosticError::Solver(e) => e.help(),
            AcrosticError::Assembly(e) => e.help(),
            AcrosticError::Export(e) => e.help(),
        }
    }

    #[must_use]
    pub fn display_detailed(&self) -> String {
        crate::errors::format_error_with_code_and_help(&self.to_string(), self.code(), self.help())
    }
}

/// Outcome of a finished run.
#[derive(Debug, Clone)]
pub struct Acrostic {
    /// One word per source letter, in source order; empty when infeasible.
    pub words: Vec<String>,
    pub status: SolveStatus,
    pub stats: SolveStats,
}

impl Acrostic {
    #[must_use]
    pub fn is_feasible(&self) -> bool {
        self.status == SolveStatus::Feasible
    }
}

/// Generate an acrostic and report how the solve went.
///
/// # Errors
///
/// `AcrosticError::Config` for bad input, `AcrosticError::Solver` if a limit
/// was hit or the backend failed, `AcrosticError::Assembly` if the selection
/// could not be ordered. A lexicon with no fitting word is an infeasible
/// result, not an error.
pub fn generate(quote: &str, source: &str, lexicon: &Lexicon, options: &AcrosticOptions) -> Result<Acrostic, AcrosticError> {
    let formulation = formulate(
        &FormulationInput {
            quote,
            source,
            excluded: &options.excluded,
            included: &options.included,
            shortfall_policy: options.shortfall_policy,
        },
        lexicon,
    )?;

    let solved = if formulation.is_trivially_complete() {
        info!("Included words cover the whole quote and source; nothing to solve");
        Acrostic { words: Vec::new(), status: SolveStatus::Feasible, stats: SolveStats::default() }
    } else {
        info!("Setting up constraints");
        let model = CoverModel::from_formulation(&formulation);
        let backend = options.solver.build_backend();
        let result = solve_model(&model, backend.as_ref())?;
        Acrostic { words: result.words, status: result.status, stats: result.stats }
    };

    if !solved.is_feasible() {
        return Ok(solved);
    }

    // included words go last so each one is the first taken for its initial
    let mut pool = solved.words;
    pool.extend(formulation.included.iter().cloned());
    let words = assemble(&pool, &formulation.source_alpha, &formulation.quote_alpha)?;

    Ok(Acrostic { words, ..solved })
}

/// Generate an acrostic: the chosen words in source order, or an empty list if
/// no selection exists.
///
/// # Errors
///
/// See [`generate`].
pub fn create_acrostic(
    quote: &str,
    source: &str,
    lexicon: &Lexicon,
    options: &AcrosticOptions,
) -> Result<Vec<String>, AcrosticError> {
    generate(quote, source, lexicon, options).map(|acrostic| acrostic.words)
}

/// True if `words` use exactly the letters of `quote` and their initials spell `source`.
#[must_use]
pub fn is_valid_solution(words: &[String], quote: &str, source: &str) -> bool {
    let letters: LetterCounts = words.iter().flat_map(|w| w.chars()).collect();
    let initials: String = words.iter().filter_map(|w| w.chars().next()).collect();
    letters == LetterCounts::from_alpha(&alpha_only(quote)) && initials == alpha_only(source.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::LexiconFilter;
    use crate::solver::BackendKind;

    fn lexicon(text: &str) -> Lexicon {
        Lexicon::parse_from_str(text, &LexiconFilter { min_score: 0, min_len: 1, max_len: 20 })
    }

    fn included(words: &[&str]) -> AcrosticOptions {
        AcrosticOptions { included: words.iter().map(ToString::to_string).collect(), ..AcrosticOptions::default() }
    }

    #[test]
    fn test_abc_abc_scenario() {
        let lex = lexicon("abc;50\nacb;50\nbca;50\ncab;50");
        let acrostic = generate("ABC ABC", "AA", &lex, &AcrosticOptions::default()).unwrap();
        assert!(acrostic.is_feasible());
        let mut words = acrostic.words.clone();
        words.sort();
        assert_eq!(words, vec!["abc", "acb"]);
        assert!(is_valid_solution(&acrostic.words, "ABC ABC", "AA"));
    }

    #[test]
    fn test_infeasible_returns_empty() {
        let lex = lexicon("abc;50\nbca;50\nzed;50");
        // 'z' initial only has "zed", which needs letters the quote lacks
        let words = create_acrostic("abc abc z", "aaz", &lex, &AcrosticOptions::default()).unwrap();
        assert!(words.is_empty());
    }

    #[test]
    fn test_included_word_alone_needs_no_solve() {
        let lex = lexicon("dog;50");
        let acrostic = generate("cab", "c", &lex, &included(&["cab"])).unwrap();
        assert_eq!(acrostic.words, vec!["cab"]);
        assert_eq!(acrostic.stats.nodes, 0);
    }

    #[test]
    fn test_included_and_solved_words_are_merged_in_source_order() {
        let lex = lexicon("dog;50\ncab;50\nbat;50");
        let words = create_acrostic("dog, cab!", "D. C.", &lex, &included(&["cab"])).unwrap();
        assert_eq!(words, vec!["dog", "cab"]);
    }

    #[test]
    fn test_excluded_word_never_returned() {
        let lex = lexicon("abc;50\nacb;50\naabbcc;50");
        let options = AcrosticOptions { excluded: vec!["ABC".to_string()], ..AcrosticOptions::default() };
        let words = create_acrostic("abcabc", "aa", &lex, &options).unwrap();
        // without "abc" there is no pair of 'a' words left
        assert!(words.is_empty());
    }

    #[test]
    fn test_no_fitting_word_is_infeasible_not_error() {
        // neither word starts with 'x' or fits "xyzquiz"
        let lex = lexicon("abcd;50\nbcda;50");
        let acrostic = generate("xyz quiz", "X. X.", &lex, &AcrosticOptions::default()).unwrap();
        assert_eq!(acrostic.status, SolveStatus::Infeasible);
        assert!(acrostic.words.is_empty());
        assert_eq!(acrostic.stats.variables, 0);
    }

    #[test]
    fn test_solver_limit_is_an_error() {
        let lex = lexicon("abc;50\nacb;50");
        let options = AcrosticOptions {
            solver: SolverConfig { node_limit: Some(0), backend: BackendKind::BranchAndBound, ..SolverConfig::default() },
            ..AcrosticOptions::default()
        };
        let err = create_acrostic("abcabc", "aa", &lex, &options).unwrap_err();
        assert!(matches!(err, AcrosticError::Solver(SolverError::NodeLimitExceeded { .. })));
        assert_eq!(err.code(), "S002");
    }

    #[test]
    fn test_config_error_codes_are_delegated() {
        let lex = lexicon("abc;50");
        let err = create_acrostic("", "a", &lex, &AcrosticOptions::default()).unwrap_err();
        assert_eq!(err.code(), "C004");
        assert!(err.display_detailed().contains("C004"));
        assert!(err.help().is_some());
    }

    #[test]
    fn test_is_valid_solution() {
        let words = vec!["note".to_string(), "seat".to_string()];
        assert!(is_valid_solution(&words, "Not! Seat, e.", " N.S. "));
        assert!(!is_valid_solution(&words, "Not! Seat, e.", "SN"));
        assert!(!is_valid_solution(&words, "Not seat", "NS"));
    }
}
