//! Turn a quote, a source and a lexicon into the two letter budgets the solver
//! must hit exactly, plus the list of words that could possibly contribute.
//!
//! Included words are accounted for here: their letters come out of the quote
//! budget and their initials out of the source budget, so the solver only has
//! to fill in the remainder.

use std::collections::HashSet;

use log::{debug, info, warn};

use crate::errors::ConfigError;
use crate::letters::{alpha_only, letter_at, AcrosticChar, LetterCounts, ALPHABET_SIZE};
use crate::lexicon::Lexicon;

/// What to do when included words ask for letters the quote (or source) doesn't have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShortfallPolicy {
    /// Cap the missing letters at zero and carry on (with a warning).
    #[default]
    Clamp,
    /// Fail with `ConfigError::IncludedWordsInfeasible`.
    Reject,
}

/// A lexicon word that may be selected by the solver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub word: String,
    pub quality: i32,
    pub letters: LetterCounts,
    /// Alphabet index of the first letter.
    pub initial: usize,
}

impl Candidate {
    /// Build a candidate from a lowercase `a`-`z` word. Returns `None` for an empty word.
    #[must_use]
    pub fn new(word: &str, quality: i32) -> Option<Self> {
        let initial = word.chars().next()?.letter_index()?;
        Some(Self { word: word.to_string(), quality, letters: LetterCounts::from_alpha(word), initial })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.word.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.word.is_empty()
    }
}

/// Everything the solver needs, plus what the assembler needs afterwards.
#[derive(Debug, Clone)]
pub struct Formulation {
    /// Normalized full quote (before included words were removed).
    pub quote_alpha: String,
    /// Normalized full source (before included initials were removed).
    pub source_alpha: String,
    /// Normalized included words, in the order given.
    pub included: Vec<String>,
    /// Letters the solver's words must use, exactly.
    pub quote_target: LetterCounts,
    /// Initials the solver's words must have, exactly.
    pub source_target: LetterCounts,
    pub candidates: Vec<Candidate>,
}

impl Formulation {
    /// True when included words already account for the whole quote and source,
    /// leaving the solver nothing to do.
    #[must_use]
    pub fn is_trivially_complete(&self) -> bool {
        self.quote_target.is_empty() && self.source_target.is_empty()
    }
}

/// Inputs to [`formulate`] beyond the lexicon.
#[derive(Debug, Clone, Default)]
pub struct FormulationInput<'a> {
    pub quote: &'a str,
    pub source: &'a str,
    pub excluded: &'a [String],
    pub included: &'a [String],
    pub shortfall_policy: ShortfallPolicy,
}

/// Compute letter targets and narrow the lexicon to plausible contributors.
///
/// A lexicon word becomes a candidate when it is not excluded, not already
/// included, starts with a letter still needed by the source target, and uses
/// no letter more often than the quote target provides.
///
/// # Errors
///
/// - `ConfigError::EmptyInput` if the quote or source has no letters.
/// - `ConfigError::EmptyIncludedWord` for an included word without letters.
/// - `ConfigError::IncludedWordsInfeasible` under `ShortfallPolicy::Reject`.
///
/// An empty candidate list is not an error: the generator reports it as infeasible.
pub fn formulate(input: &FormulationInput<'_>, lexicon: &Lexicon) -> Result<Formulation, Box<ConfigError>> {
    let quote_alpha = alpha_only(input.quote);
    let source_alpha = alpha_only(input.source.trim());

    if quote_alpha.is_empty() {
        return Err(Box::new(ConfigError::EmptyInput { field: "quote", input: input.quote.to_string() }));
    }
    if source_alpha.is_empty() {
        return Err(Box::new(ConfigError::EmptyInput { field: "source", input: input.source.to_string() }));
    }

    let included = normalize_included(input.included)?;

    info!("Setting up constraint targets");
    let included_letters: LetterCounts = included.iter().flat_map(|w| w.chars()).collect();
    let included_initials: LetterCounts = included.iter().filter_map(|w| w.chars().next()).collect();

    let quote_target = remove_letters(
        LetterCounts::from_alpha(&quote_alpha),
        &included_letters,
        "quote",
        input.shortfall_policy,
    )?;
    let source_target = remove_letters(
        LetterCounts::from_alpha(&source_alpha),
        &included_initials,
        "source",
        input.shortfall_policy,
    )?;
    debug!("quote target {quote_target}; source target {source_target}");

    info!("Setting up variables");
    let excluded_set: HashSet<String> = input.excluded.iter().map(|w| w.trim().to_lowercase()).collect();
    let included_set: HashSet<&str> = included.iter().map(String::as_str).collect();

    let candidates: Vec<Candidate> = lexicon
        .entries
        .iter()
        .filter(|e| !excluded_set.contains(&e.word) && !included_set.contains(e.word.as_str()))
        .filter_map(|e| Candidate::new(&e.word, e.quality))
        .filter(|c| source_target[c.initial] > 0 && c.letters.fits_within(&quote_target))
        .collect();

    info!("{} candidate words from {} lexicon entries", candidates.len(), lexicon.len());

    Ok(Formulation { quote_alpha, source_alpha, included, quote_target, source_target, candidates })
}

fn normalize_included(included: &[String]) -> Result<Vec<String>, Box<ConfigError>> {
    included
        .iter()
        .map(|raw| {
            let word = alpha_only(raw);
            if word.is_empty() {
                Err(Box::new(ConfigError::EmptyIncludedWord { word: raw.clone() }))
            } else {
                Ok(word)
            }
        })
        .collect()
}

/// Take `used` out of `pool`, one copy per occurrence.
///
/// Under `Clamp` a letter that runs out stays at zero; under `Reject` the
/// first such letter is reported.
fn remove_letters(
    mut pool: LetterCounts,
    used: &LetterCounts,
    pool_name: &'static str,
    policy: ShortfallPolicy,
) -> Result<LetterCounts, Box<ConfigError>> {
    if policy == ShortfallPolicy::Reject {
        if let Some(idx) = (0..ALPHABET_SIZE).find(|&i| used[i] > pool[i]) {
            return Err(Box::new(ConfigError::IncludedWordsInfeasible {
                pool: pool_name,
                letter: letter_at(idx),
                requested: used[idx],
                available: pool[idx],
            }));
        }
    }

    for idx in 0..ALPHABET_SIZE {
        let mut missing = 0;
        for _ in 0..used[idx] {
            if !pool.take(idx) {
                missing += 1;
            }
        }
        if missing > 0 {
            warn!(
                "included words need {missing} more '{}' than the {pool_name} has; capping at zero",
                letter_at(idx)
            );
        }
    }
    Ok(pool)
}
