//! The 0/1 linear model behind word selection, built declaratively and kept
//! separate from any backend that solves it.
//!
//! One binary variable per candidate word; two families of 26 equality
//! constraints each:
//!
//! - **quote letter** `L`: Σ (occurrences of `L` in word *i*) · xᵢ = quote target for `L`
//! - **source initial** `L`: Σ (words *i* starting with `L`) xᵢ = source target for `L`
//!
//! Both families are always emitted in full (52 rows), with zero right-hand
//! sides for absent letters.

use std::fmt;

use crate::formulator::{Candidate, Formulation};
use crate::letters::{letter_at, LetterCounts, ALPHABET_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintFamily {
    QuoteLetter,
    SourceInitial,
}

/// Σ coefficient · x\[variable\] = rhs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearConstraint {
    pub family: ConstraintFamily,
    pub letter: char,
    /// `(variable index, coefficient)`, only non-zero coefficients, ascending by index.
    pub terms: Vec<(usize, u32)>,
    pub rhs: u32,
}

impl LinearConstraint {
    /// Left-hand side under a 0/1 assignment.
    #[must_use]
    pub fn lhs(&self, chosen: &[bool]) -> u32 {
        self.terms.iter().filter(|(var, _)| chosen[*var]).map(|(_, coeff)| coeff).sum()
    }
}

impl fmt::Display for LinearConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.family {
            ConstraintFamily::QuoteLetter => "quote",
            ConstraintFamily::SourceInitial => "initial",
        };
        let lhs = if self.terms.is_empty() {
            "0".to_string()
        } else {
            self.terms.iter().map(|(var, coeff)| format!("{coeff}*x{var}")).collect::<Vec<_>>().join(" + ")
        };
        write!(f, "[{label} '{}'] {lhs} = {}", self.letter, self.rhs)
    }
}

/// The full feasibility model over a set of candidates.
#[derive(Debug, Clone)]
pub struct CoverModel<'a> {
    pub variables: &'a [Candidate],
    pub quote_target: LetterCounts,
    pub source_target: LetterCounts,
    pub constraints: Vec<LinearConstraint>,
}

impl<'a> CoverModel<'a> {
    #[must_use]
    pub fn from_formulation(formulation: &'a Formulation) -> Self {
        Self::build(&formulation.candidates, formulation.quote_target, formulation.source_target)
    }

    /// Assemble the 52 constraint rows for `variables` against the two targets.
    #[must_use]
    pub fn build(variables: &'a [Candidate], quote_target: LetterCounts, source_target: LetterCounts) -> Self {
        let mut constraints = Vec::with_capacity(2 * ALPHABET_SIZE);

        for idx in 0..ALPHABET_SIZE {
            let terms = variables
                .iter()
                .enumerate()
                .filter(|(_, c)| c.letters[idx] > 0)
                .map(|(var, c)| (var, c.letters[idx]))
                .collect();
            constraints.push(LinearConstraint {
                family: ConstraintFamily::QuoteLetter,
                letter: letter_at(idx),
                terms,
                rhs: quote_target[idx],
            });
        }

        for idx in 0..ALPHABET_SIZE {
            let terms = variables
                .iter()
                .enumerate()
                .filter(|(_, c)| c.initial == idx)
                .map(|(var, _)| (var, 1))
                .collect();
            constraints.push(LinearConstraint {
                family: ConstraintFamily::SourceInitial,
                letter: letter_at(idx),
                terms,
                rhs: source_target[idx],
            });
        }

        Self { variables, quote_target, source_target, constraints }
    }

    #[must_use]
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    #[must_use]
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Rows not satisfied by a 0/1 assignment (`chosen.len()` must equal the variable count).
    #[must_use]
    pub fn violations(&self, chosen: &[bool]) -> Vec<&LinearConstraint> {
        debug_assert_eq!(chosen.len(), self.num_variables(), "assignment length must match variable count");
        self.constraints.iter().filter(|row| row.lhs(chosen) != row.rhs).collect()
    }

    #[must_use]
    pub fn is_satisfied_by(&self, chosen: &[bool]) -> bool {
        self.violations(chosen).is_empty()
    }

    /// Variable indices grouped by initial letter, in variable order.
    #[must_use]
    pub fn variables_by_initial(&self) -> Vec<Vec<usize>> {
        let mut groups = vec![Vec::new(); ALPHABET_SIZE];
        for (var, c) in self.variables.iter().enumerate() {
            groups[c.initial].push(var);
        }
        groups
    }
}
