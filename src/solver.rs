//! Exact 0/1 feasibility solving for the acrostic word-selection model.
//!
//! The solver takes a [`CoverModel`] and asks a [`FeasibilityBackend`] for an
//! assignment that meets all 52 equality rows. Two backends exist: the default
//! mixed-integer [`MilpBackend`] and the in-crate [`BranchAndBound`] search,
//! picked through [`BackendKind`]. There are exactly three outcomes:
//!
//! - **Feasible**: [`SolveStatus::Feasible`] with the selected words.
//! - **Infeasible**: [`SolveStatus::Infeasible`] with an empty word list. This is
//!   an ordinary result, not an error.
//! - **Failure**: a [`SolverError`] (a limit was hit, the backend failed, or it
//!   handed back an assignment that does not fit the model).
//!
//! Backends report one value per variable as `f64`; anything above
//! [`SELECTION_THRESHOLD`] counts as chosen, so a relaxation-based backend that
//! returns `0.9999999` still yields a clean 0/1 selection.
//!
//! # Error Handling
//!
//! - S001: `TimedOut` (Wall-clock limit reached before the search finished)
//! - S002: `NodeLimitExceeded` (Search node limit reached)
//! - S003: `InconsistentAssignment` (Backend assignment violates the model)
//! - S004: `MalformedAssignment` (Backend returned the wrong number of values)
//! - S005: `BackendFailure` (Backend stopped with an internal error)
//!
//! # Examples
//!
//! ```
//! use acrostic::formulator::Candidate;
//! use acrostic::letters::LetterCounts;
//! use acrostic::model::CoverModel;
//! use acrostic::solver::{solve_model, BranchAndBound, SolveStatus, SolverConfig};
//!
//! let words: Vec<Candidate> = ["abc", "acb", "bca"].iter().filter_map(|w| Candidate::new(w, 50)).collect();
//! let model = CoverModel::build(&words, LetterCounts::from_alpha("abcabc"), LetterCounts::from_alpha("ab"));
//!
//! let result = solve_model(&model, &BranchAndBound::new(SolverConfig::default()))?;
//! assert_eq!(result.status, SolveStatus::Feasible);
//! assert_eq!(result.words.len(), 2);
//! # Ok::<(), acrostic::solver::SolverError>(())
//! ```

use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use instant::Instant;
use log::{debug, info};

use crate::letters::{LetterCounts, ALPHABET_SIZE};
use crate::milp::MilpBackend;
use crate::model::CoverModel;

/// Values strictly above this are read as 1, everything else as 0.
pub const SELECTION_THRESHOLD: f64 = 0.99;

/// Preference among words that share an initial: the search order for
/// [`BranchAndBound`], the objective for [`MilpBackend`].
///
/// This only decides *which* feasible selection is found; it never changes
/// whether one exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreak {
    /// Lexicon order (length, then alphabetical); no objective.
    #[default]
    LexiconOrder,
    /// Best-scored words first.
    HighestQuality,
    /// Words whose length is closest to the average the quote allows
    /// (quote letters / source letters) first, keeping lengths even.
    BalancedLength,
}

impl FromStr for TieBreak {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "lexicon" | "lexicon-order" => Ok(TieBreak::LexiconOrder),
            "quality" | "highest-quality" => Ok(TieBreak::HighestQuality),
            "balanced" | "balanced-length" => Ok(TieBreak::BalancedLength),
            other => Err(format!("unknown tie-break '{other}' (expected lexicon, quality or balanced)")),
        }
    }
}

impl fmt::Display for TieBreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TieBreak::LexiconOrder => "lexicon",
            TieBreak::HighestQuality => "quality",
            TieBreak::BalancedLength => "balanced",
        };
        f.write_str(name)
    }
}

/// Which [`FeasibilityBackend`] runs the solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    #[default]
    Milp,
    BranchAndBound,
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "milp" | "microlp" => Ok(BackendKind::Milp),
            "branch-and-bound" | "bnb" => Ok(BackendKind::BranchAndBound),
            other => Err(format!("unknown backend '{other}' (expected milp or branch-and-bound)")),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BackendKind::Milp => "milp",
            BackendKind::BranchAndBound => "branch-and-bound",
        };
        f.write_str(name)
    }
}

/// Limits, ordering and backend for a solve. No limits by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SolverConfig {
    pub time_limit: Option<Duration>,
    /// Only enforced by [`BranchAndBound`].
    pub node_limit: Option<u64>,
    pub tie_break: TieBreak,
    pub backend: BackendKind,
}

impl SolverConfig {
    /// The backend named by `self.backend`, configured with these limits.
    #[must_use]
    pub fn build_backend(&self) -> Box<dyn FeasibilityBackend> {
        match self.backend {
            BackendKind::Milp => Box::new(MilpBackend::new(*self)),
            BackendKind::BranchAndBound => Box::new(BranchAndBound::new(*self)),
        }
    }
}

/// Whether a selection satisfying every constraint was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    Feasible,
    /// Proven impossible; the word list is empty.
    Infeasible,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolveStats {
    pub variables: usize,
    pub constraints: usize,
    pub nodes: u64,
    pub elapsed: Duration,
}

/// Result of a finished solve (feasible or not).
#[derive(Debug, Clone)]
pub struct SolveResult {
    /// Selected words in variable order; empty when infeasible.
    pub words: Vec<String>,
    pub status: SolveStatus,
    pub stats: SolveStats,
}

impl SolveResult {
    #[must_use]
    pub fn is_feasible(&self) -> bool {
        self.status == SolveStatus::Feasible
    }
}

/// What a backend hands back: per-variable values, or `None` when infeasible.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendOutcome {
    pub values: Option<Vec<f64>>,
    pub nodes: u64,
}

/// Anything that can decide feasibility of a [`CoverModel`].
pub trait FeasibilityBackend {
    fn name(&self) -> &'static str;

    /// Search for an assignment meeting every constraint of `model`.
    ///
    /// # Errors
    ///
    /// Returns a [`SolverError`] if the backend gives up (limits, internal failure).
    /// Proven infeasibility is `Ok` with `values: None`.
    fn find_assignment(&self, model: &CoverModel<'_>) -> Result<BackendOutcome, SolverError>;
}

/// Solver failures. Infeasibility is *not* one of them.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SolverError {
    #[error("solver timed out after {:.2}s ({nodes} nodes explored)", .elapsed.as_secs_f64())]
    TimedOut { elapsed: Duration, nodes: u64 },

    #[error("solver gave up after exploring {limit} nodes")]
    NodeLimitExceeded { limit: u64 },

    #[error("solver assignment violates {violated} constraint(s), first: {first}")]
    InconsistentAssignment { violated: usize, first: String },

    #[error("solver returned {actual} values for {expected} variables")]
    MalformedAssignment { expected: usize, actual: usize },

    #[error("{backend} backend failed: {message}")]
    BackendFailure { backend: &'static str, message: String },
}

impl SolverError {
    /// Returns the error code for this error variant
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            SolverError::TimedOut { .. } => "S001",
            SolverError::NodeLimitExceeded { .. } => "S002",
            SolverError::InconsistentAssignment { .. } => "S003",
            SolverError::MalformedAssignment { .. } => "S004",
            SolverError::BackendFailure { .. } => "S005",
        }
    }

    /// Returns a short description of this error type (for documentation)
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            SolverError::TimedOut { .. } => "Wall-clock limit reached before the search finished",
            SolverError::NodeLimitExceeded { .. } => "Search node limit reached",
            SolverError::InconsistentAssignment { .. } => "Backend assignment violates the model",
            SolverError::MalformedAssignment { .. } => "Backend returned the wrong number of values",
            SolverError::BackendFailure { .. } => "Backend stopped with an internal error",
        }
    }

    /// Returns detailed explanation of this error type (for documentation)
    #[must_use]
    pub fn details(&self) -> &'static str {
        match self {
            SolverError::TimedOut { .. } => "The search was stopped by the caller-supplied time limit. Nothing is known about feasibility; no partial selection is returned.",
            SolverError::NodeLimitExceeded { .. } => "The search was stopped by the caller-supplied node limit. Nothing is known about feasibility; no partial selection is returned.",
            SolverError::InconsistentAssignment { .. } => "The backend reported success but the selected words do not meet every letter or initial count. This is a bug in the backend.",
            SolverError::MalformedAssignment { .. } => "The backend returned a value vector whose length differs from the number of candidate words. This is a bug in the backend.",
            SolverError::BackendFailure { .. } => "The backend could not finish (for example the MILP solver reported an unbounded or numerically unstable problem). Nothing is known about feasibility.",
        }
    }

    /// Returns a helpful suggestion for this error
    #[must_use]
    pub fn help(&self) -> Option<&'static str> {
        match self {
            SolverError::TimedOut { .. } | SolverError::NodeLimitExceeded { .. } => {
                Some("Raise --timeout/--node-limit, or shrink the search with a higher --min-score or some --included words")
            }
            SolverError::InconsistentAssignment { .. } | SolverError::MalformedAssignment { .. } => {
                Some("This is an internal error. Please report it with the quote and source used.")
            }
            SolverError::BackendFailure { .. } => Some("Retry with --backend branch-and-bound, and report the quote and source used"),
        }
    }

    /// Formats the error with code and optional help text
    #[must_use]
    pub fn display_detailed(&self) -> String {
        crate::errors::format_error_with_code_and_help(&self.to_string(), self.code(), self.help())
    }
}

/// Run `backend` on `model` and turn its values into a word selection.
///
/// # Errors
///
/// Propagates backend failures, and returns `InconsistentAssignment` /
/// `MalformedAssignment` if the backend's answer does not fit the model.
pub fn solve_model(model: &CoverModel<'_>, backend: &dyn FeasibilityBackend) -> Result<SolveResult, SolverError> {
    info!(
        "Optimizing with {} ({} variables, {} constraints)",
        backend.name(),
        model.num_variables(),
        model.num_constraints()
    );
    let t_solve = Instant::now();
    let outcome = backend.find_assignment(model)?;
    let elapsed = t_solve.elapsed();

    let stats = SolveStats {
        variables: model.num_variables(),
        constraints: model.num_constraints(),
        nodes: outcome.nodes,
        elapsed,
    };
    info!("Complete. Total time: {:.2} seconds ({} nodes)", elapsed.as_secs_f64(), stats.nodes);

    let Some(values) = outcome.values else {
        info!("No feasible selection exists");
        return Ok(SolveResult { words: Vec::new(), status: SolveStatus::Infeasible, stats });
    };

    let chosen = extract_selection(model, &values)?;
    let violations = model.violations(&chosen);
    if let Some(first) = violations.first() {
        return Err(SolverError::InconsistentAssignment { violated: violations.len(), first: first.to_string() });
    }

    let words = model
        .variables
        .iter()
        .zip(&chosen)
        .filter(|(_, picked)| **picked)
        .map(|(c, _)| c.word.clone())
        .collect();

    Ok(SolveResult { words, status: SolveStatus::Feasible, stats })
}

/// Read a backend's per-variable values as a 0/1 selection.
///
/// # Errors
///
/// `MalformedAssignment` if `values` does not have one entry per variable.
pub fn extract_selection(model: &CoverModel<'_>, values: &[f64]) -> Result<Vec<bool>, SolverError> {
    if values.len() != model.num_variables() {
        return Err(SolverError::MalformedAssignment { expected: model.num_variables(), actual: values.len() });
    }
    Ok(values.iter().map(|&v| v > SELECTION_THRESHOLD).collect())
}

/// Wall-clock limit for one solve.
struct TimeBudget {
    start: Instant,
    limit: Option<Duration>,
}

impl TimeBudget {
    fn new(limit: Option<Duration>) -> Self {
        Self { start: Instant::now(), limit }
    }

    fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    fn expired(&self) -> bool {
        self.limit.is_some_and(|limit| self.start.elapsed() >= limit)
    }
}

/// Exact depth-first branch-and-bound over the 0/1 word variables.
///
/// Each level fills one outstanding source initial. The initial with the fewest
/// words still fitting the remaining letters is branched on first, and words
/// sharing an initial are only ever taken in ascending group order so that no
/// selection is visited twice. A branch is cut when:
///
/// - some initial has fewer fitting words left than it still needs,
/// - some letter is needed more often as an initial than the quote still has it,
/// - the remaining letter total falls outside what the remaining words' lengths allow,
/// - some remaining quote letter appears in no fitting word.
#[derive(Debug, Clone, Default)]
pub struct BranchAndBound {
    config: SolverConfig,
}

impl BranchAndBound {
    #[must_use]
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }
}

impl FeasibilityBackend for BranchAndBound {
    fn name(&self) -> &'static str {
        "branch-and-bound"
    }

    fn find_assignment(&self, model: &CoverModel<'_>) -> Result<BackendOutcome, SolverError> {
        let mut search = Search::new(model, &self.config);
        let found = search.run()?;

        let values = found.then(|| {
            let mut values = vec![0.0; model.num_variables()];
            for &var in &search.chosen {
                values[var] = 1.0;
            }
            values
        });
        Ok(BackendOutcome { values, nodes: search.nodes })
    }
}

/// Mutable state of one branch-and-bound run.
struct Search<'m, 'a> {
    model: &'m CoverModel<'a>,
    /// Variable indices per initial, in tie-break order.
    groups: Vec<Vec<usize>>,
    /// Shortest / longest word length per initial (0 when the group is empty).
    min_len: [u32; ALPHABET_SIZE],
    max_len: [u32; ALPHABET_SIZE],
    quote_left: LetterCounts,
    source_left: LetterCounts,
    /// First group position still eligible, per initial.
    next_in_group: [usize; ALPHABET_SIZE],
    chosen: Vec<usize>,
    nodes: u64,
    node_limit: Option<u64>,
    budget: TimeBudget,
}

impl<'m, 'a> Search<'m, 'a> {
    fn new(model: &'m CoverModel<'a>, config: &SolverConfig) -> Self {
        let mut groups = model.variables_by_initial();
        order_groups(model, &mut groups, config.tie_break);

        let mut min_len = [0; ALPHABET_SIZE];
        let mut max_len = [0; ALPHABET_SIZE];
        for (idx, group) in groups.iter().enumerate() {
            let lens = group.iter().map(|&var| model.variables[var].letters.total());
            min_len[idx] = lens.clone().min().unwrap_or(0);
            max_len[idx] = lens.max().unwrap_or(0);
        }

        Self {
            model,
            groups,
            min_len,
            max_len,
            quote_left: model.quote_target,
            source_left: model.source_target,
            next_in_group: [0; ALPHABET_SIZE],
            chosen: Vec::with_capacity(model.source_target.total() as usize),
            nodes: 0,
            node_limit: config.node_limit,
            budget: TimeBudget::new(config.time_limit),
        }
    }

    fn run(&mut self) -> Result<bool, SolverError> {
        let found = self.descend()?;
        debug!(
            "branch-and-bound finished: found={found}, nodes={}, elapsed={:.3}s",
            self.nodes,
            self.budget.elapsed().as_secs_f64()
        );
        Ok(found)
    }

    fn check_limits(&self) -> Result<(), SolverError> {
        if let Some(limit) = self.node_limit {
            if self.nodes > limit {
                return Err(SolverError::NodeLimitExceeded { limit });
            }
        }
        if self.budget.expired() {
            return Err(SolverError::TimedOut { elapsed: self.budget.elapsed(), nodes: self.nodes });
        }
        Ok(())
    }

    /// Cheap necessary conditions on the remaining letters.
    fn bounds_hold(&self) -> bool {
        let mut min_total = 0;
        let mut max_total = 0;
        for idx in 0..ALPHABET_SIZE {
            let needed = self.source_left[idx];
            if needed > self.quote_left[idx] {
                return false;
            }
            min_total += needed * self.min_len[idx];
            max_total += needed * self.max_len[idx];
        }
        let remaining = self.quote_left.total();
        (min_total..=max_total).contains(&remaining)
    }

    fn descend(&mut self) -> Result<bool, SolverError> {
        self.nodes += 1;
        self.check_limits()?;

        if self.source_left.is_empty() {
            return Ok(self.quote_left.is_empty());
        }
        if !self.bounds_hold() {
            return Ok(false);
        }

        // Pick the initial with the fewest fitting words; note which letters any fitting word can still supply.
        let mut coverable = [false; ALPHABET_SIZE];
        let mut branch: Option<(usize, Vec<usize>)> = None;
        for idx in 0..ALPHABET_SIZE {
            let needed = self.source_left[idx] as usize;
            if needed == 0 {
                continue;
            }
            let group = &self.groups[idx];
            let options: Vec<usize> = (self.next_in_group[idx]..group.len())
                .filter(|&pos| self.model.variables[group[pos]].letters.fits_within(&self.quote_left))
                .collect();
            if options.len() < needed {
                return Ok(false);
            }
            for &pos in &options {
                let letters = &self.model.variables[group[pos]].letters;
                for (covered, &count) in coverable.iter_mut().zip(letters.as_array()) {
                    *covered |= count > 0;
                }
            }
            if branch.as_ref().map_or(true, |(_, best)| options.len() < best.len()) {
                branch = Some((idx, options));
            }
        }

        if (0..ALPHABET_SIZE).any(|idx| self.quote_left[idx] > 0 && !coverable[idx]) {
            return Ok(false);
        }

        let Some((idx, options)) = branch else {
            return Ok(false);
        };

        let saved_next = self.next_in_group[idx];
        for pos in options {
            let var = self.groups[idx][pos];
            let letters = self.model.variables[var].letters;

            self.quote_left.subtract(&letters);
            self.source_left.take(idx);
            self.next_in_group[idx] = pos + 1;
            self.chosen.push(var);

            if self.descend()? {
                return Ok(true);
            }

            self.chosen.pop();
            self.source_left.increment(idx);
            self.quote_left.add(&letters);
        }
        self.next_in_group[idx] = saved_next;

        Ok(false)
    }
}

/// Sort each initial's variables according to `tie_break`; variable index breaks remaining ties.
fn order_groups(model: &CoverModel<'_>, groups: &mut [Vec<usize>], tie_break: TieBreak) {
    let vars = model.variables;
    match tie_break {
        TieBreak::LexiconOrder => {}
        TieBreak::HighestQuality => {
            for group in groups.iter_mut() {
                group.sort_by_key(|&var| (Reverse(vars[var].quality), var));
            }
        }
        TieBreak::BalancedLength => {
            // |len - quote/source| scaled by `source` to stay in integers
            let quote_total = i64::from(model.quote_target.total());
            let source_total = i64::from(model.source_target.total());
            for group in groups.iter_mut() {
                group.sort_by_key(|&var| {
                    let len = i64::from(vars[var].letters.total());
                    ((len * source_total - quote_total).abs(), Reverse(vars[var].quality), var)
                });
            }
        }
    }
}
