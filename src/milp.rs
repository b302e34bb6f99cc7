//! Mixed-integer backend: hands the [`CoverModel`] to the `microlp` solver
//! through `good_lp`.
//!
//! Every candidate becomes a binary variable and every non-empty model row an
//! equality constraint. The tie-break becomes a linear objective:
//!
//! - [`TieBreak::LexiconOrder`]: no objective, the first feasible point wins.
//! - [`TieBreak::HighestQuality`]: minimise the negated word scores.
//! - [`TieBreak::BalancedLength`]: minimise each word's distance from the
//!   average length the quote allows.
//!
//! A row with no terms and a positive right-hand side can never hold, so the
//! model is reported infeasible without calling the solver.
//!
//! On native targets a time limit runs the solve on a worker thread. When the
//! limit passes first the caller gets [`SolverError::TimedOut`] and the worker
//! is left to finish on its own; its result is discarded.

use std::time::Duration;

use good_lp::{constraint, variable, Expression, ProblemVariables, ResolutionError, Solution, SolverModel, Variable};
use log::{debug, warn};

use crate::model::CoverModel;
use crate::solver::{BackendOutcome, FeasibilityBackend, SolverConfig, SolverError, TieBreak};

const BACKEND_NAME: &str = "milp";

/// The model reduced to plain numbers, ready to move to a worker thread.
#[derive(Debug, Clone, PartialEq)]
struct LinearProgram {
    num_variables: usize,
    /// `(terms, rhs)` for each row that mentions at least one variable.
    rows: Vec<(Vec<(usize, f64)>, f64)>,
    costs: Vec<f64>,
}

impl LinearProgram {
    /// `None` when some row has no terms but needs a positive total.
    fn from_model(model: &CoverModel<'_>, tie_break: TieBreak) -> Option<Self> {
        let mut rows = Vec::with_capacity(model.num_constraints());
        for row in &model.constraints {
            if row.terms.is_empty() {
                if row.rhs > 0 {
                    debug!("row {row} cannot be met by any candidate");
                    return None;
                }
                continue;
            }
            let terms = row.terms.iter().map(|&(var, coeff)| (var, f64::from(coeff))).collect();
            rows.push((terms, f64::from(row.rhs)));
        }

        Some(Self { num_variables: model.num_variables(), rows, costs: objective_costs(model, tie_break) })
    }

    /// `Ok(None)` when infeasible; `Err` carries the solver's own message.
    fn solve(&self) -> Result<Option<Vec<f64>>, String> {
        if self.rows.is_empty() {
            return Ok(Some(vec![0.0; self.num_variables]));
        }

        let mut vars = ProblemVariables::new();
        let xs: Vec<Variable> = (0..self.num_variables).map(|_| vars.add(variable().binary())).collect();
        let objective: Expression = self.costs.iter().zip(&xs).map(|(&cost, &x)| cost * x).sum();

        let mut problem = vars.minimise(objective).using(good_lp::microlp);
        for (terms, rhs) in &self.rows {
            let lhs: Expression = terms.iter().map(|&(var, coeff)| coeff * xs[var]).sum();
            let rhs = *rhs;
            problem = problem.with(constraint!(lhs == rhs));
        }

        match problem.solve() {
            Ok(solution) => Ok(Some(xs.iter().map(|&x| solution.value(x)).collect())),
            Err(ResolutionError::Infeasible) => Ok(None),
            Err(e) => Err(e.to_string()),
        }
    }
}

/// Per-variable objective coefficients for `tie_break`.
fn objective_costs(model: &CoverModel<'_>, tie_break: TieBreak) -> Vec<f64> {
    let vars = model.variables;
    match tie_break {
        TieBreak::LexiconOrder => vec![0.0; vars.len()],
        TieBreak::HighestQuality => vars.iter().map(|c| -f64::from(c.quality)).collect(),
        TieBreak::BalancedLength => {
            let quote_total = f64::from(model.quote_target.total());
            let source_total = f64::from(model.source_target.total());
            vars.iter()
                .map(|c| (f64::from(c.letters.total()) * source_total - quote_total).abs())
                .collect()
        }
    }
}

fn failure(message: String) -> SolverError {
    SolverError::BackendFailure { backend: BACKEND_NAME, message }
}

#[cfg(not(target_arch = "wasm32"))]
fn solve_within(program: LinearProgram, limit: Option<Duration>) -> Result<Option<Vec<f64>>, SolverError> {
    use std::sync::mpsc::{self, RecvTimeoutError};
    use std::thread;

    use instant::Instant;

    let Some(limit) = limit else {
        return program.solve().map_err(failure);
    };
    if limit.is_zero() {
        return Err(SolverError::TimedOut { elapsed: Duration::ZERO, nodes: 0 });
    }

    let start = Instant::now();
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        // the receiver is gone once the caller has timed out
        let _ = sender.send(program.solve());
    });

    match receiver.recv_timeout(limit) {
        Ok(result) => result.map_err(failure),
        Err(RecvTimeoutError::Timeout) => Err(SolverError::TimedOut { elapsed: start.elapsed(), nodes: 0 }),
        Err(RecvTimeoutError::Disconnected) => Err(failure("solver thread exited without a result".to_string())),
    }
}

#[cfg(target_arch = "wasm32")]
fn solve_within(program: LinearProgram, limit: Option<Duration>) -> Result<Option<Vec<f64>>, SolverError> {
    if limit.is_some() {
        warn!("time limits are not enforced by the {BACKEND_NAME} backend on wasm32");
    }
    program.solve().map_err(failure)
}

/// Exact 0/1 solve through a mixed-integer program. Reports zero nodes; the
/// node limit only applies to [`crate::solver::BranchAndBound`].
#[derive(Debug, Clone, Default)]
pub struct MilpBackend {
    config: SolverConfig,
}

impl MilpBackend {
    #[must_use]
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }
}

impl FeasibilityBackend for MilpBackend {
    fn name(&self) -> &'static str {
        BACKEND_NAME
    }

    fn find_assignment(&self, model: &CoverModel<'_>) -> Result<BackendOutcome, SolverError> {
        if let Some(limit) = self.config.node_limit {
            warn!("node limit {limit} is ignored by the {BACKEND_NAME} backend");
        }

        let Some(program) = LinearProgram::from_model(model, self.config.tie_break) else {
            return Ok(BackendOutcome { values: None, nodes: 0 });
        };
        debug!("{BACKEND_NAME}: {} variables, {} non-empty rows", program.num_variables, program.rows.len());

        let values = solve_within(program, self.config.time_limit)?;
        Ok(BackendOutcome { values, nodes: 0 })
    }
}
