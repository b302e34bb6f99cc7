//! Put an unordered selection of words into source-label order.
//!
//! Words are bucketed by initial in the order they are given; each source
//! letter then takes the most recently added word from its bucket. For a fixed
//! input order the output is therefore fully reproducible.

use log::{error, warn};

use crate::letters::{AcrosticChar, ALPHABET_SIZE};

/// A source letter had no word left to take.
///
/// A feasible solver result always holds exactly one word per source letter,
/// so this marks a broken invariant between the solver model and assembly,
/// never a user input problem.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no chosen word left for source letter '{letter}' at position {position} of \"{source_alpha}\"")]
pub struct AssemblyError {
    pub letter: char,
    pub position: usize,
    pub source_alpha: String,
    pub quote_alpha: String,
}

impl AssemblyError {
    #[must_use]
    pub fn code(&self) -> &'static str {
        "A001"
    }

    #[must_use]
    pub fn description(&self) -> &'static str {
        "Selected words do not match the source letters"
    }

    #[must_use]
    pub fn details(&self) -> &'static str {
        "The solver reported a feasible selection, but some source letter has no selected word starting with it. The model and the assembler disagree; this is a bug."
    }

    #[must_use]
    pub fn help(&self) -> Option<&'static str> {
        Some("This is an internal error. Please report it with the quote and source used.")
    }

    #[must_use]
    pub fn display_detailed(&self) -> String {
        crate::errors::format_error_with_code_and_help(&self.to_string(), self.code(), self.help())
    }
}

/// Order `words` so that their initials spell `source_alpha`.
///
/// Words left over once every source letter has one are dropped with a warning
/// (this only happens when included words were clamped against the source).
///
/// # Errors
///
/// `AssemblyError` if some source letter finds no remaining word. The quote is
/// only carried for the diagnostic.
///
/// ```
/// use acrostic::assembler::assemble;
///
/// let words = vec!["bca".to_string(), "abc".to_string()];
/// assert_eq!(assemble(&words, "ab", "abcabc")?, vec!["abc", "bca"]);
/// # Ok::<(), acrostic::assembler::AssemblyError>(())
/// ```
pub fn assemble(words: &[String], source_alpha: &str, quote_alpha: &str) -> Result<Vec<String>, AssemblyError> {
    let mut buckets: Vec<Vec<&String>> = vec![Vec::new(); ALPHABET_SIZE];
    for word in words {
        if let Some(idx) = word.chars().next().and_then(|c| c.letter_index()) {
            buckets[idx].push(word);
        }
    }

    let mut ordered = Vec::with_capacity(source_alpha.len());
    for (position, letter) in source_alpha.chars().enumerate() {
        let next = letter.letter_index().and_then(|idx| buckets[idx].pop());
        let Some(word) = next else {
            error!(
                "assembly failed at source letter '{letter}' (position {position}); quote: \"{quote_alpha}\", source: \"{source_alpha}\", words: {words:?}"
            );
            return Err(AssemblyError {
                letter,
                position,
                source_alpha: source_alpha.to_string(),
                quote_alpha: quote_alpha.to_string(),
            });
        };
        ordered.push(word.clone());
    }

    let leftover: Vec<&String> = buckets.into_iter().flatten().collect();
    if !leftover.is_empty() {
        warn!("{} word(s) had no source letter left and were dropped: {leftover:?}", leftover.len());
    }

    Ok(ordered)
}
