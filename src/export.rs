//! Export an ordered acrostic solution for the kotwords acrostic renderer
//! (<https://jpd236.github.io/kotwords/acrostic.html>).
//!
//! Two shapes are produced from the same [`KotwordsExport`]:
//! - the renderer's form fields, serialisable as JSON ([`to_json`]);
//! - an APZ acrostic text file ([`to_apz`]).
//!
//! The grid key assigns every letter of every answer to a distinct occurrence
//! of that letter in the quote, chosen at random. Randomness comes from the
//! caller's RNG so a seeded RNG reproduces the same key.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::letters::{alpha_only, AcrosticChar, ALPHABET_SIZE};

/// Field names follow the kotwords acrostic form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KotwordsExport {
    /// The quote exactly as given.
    pub solution: String,
    /// One line per answer: space-separated 1-based quote positions of its letters.
    pub grid_key: String,
    /// One uppercase answer per line.
    pub answers: String,
    /// Source, blank line, quote.
    pub completion_message: String,
    /// One placeholder clue per answer.
    pub clues: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("answer \"{word}\" needs a '{letter}' the quote has no unused occurrence of")]
pub struct ExportError {
    pub word: String,
    pub letter: char,
}

impl ExportError {
    #[must_use]
    pub fn code(&self) -> &'static str {
        "X001"
    }

    #[must_use]
    pub fn description(&self) -> &'static str {
        "Answers do not use exactly the quote's letters"
    }

    #[must_use]
    pub fn details(&self) -> &'static str {
        "Building the grid key maps every answer letter to an unused quote letter. The answers asked for more copies of a letter than the quote contains, so they cannot have come from this quote."
    }

    #[must_use]
    pub fn help(&self) -> Option<&'static str> {
        Some("Export the exact quote the solution was generated from")
    }

    #[must_use]
    pub fn display_detailed(&self) -> String {
        crate::errors::format_error_with_code_and_help(&self.to_string(), self.code(), self.help())
    }
}

/// Build the renderer fields for `solution` (answers in source order).
///
/// # Errors
///
/// `ExportError` if an answer letter has no remaining occurrence in the quote.
pub fn create_kotwords_export<R: Rng + ?Sized>(
    quote: &str,
    source: &str,
    solution: &[String],
    rng: &mut R,
) -> Result<KotwordsExport, ExportError> {
    // quote positions of each letter, shuffled letter by letter in alphabetical order
    let mut positions: Vec<Vec<usize>> = vec![Vec::new(); ALPHABET_SIZE];
    for (pos, idx) in alpha_only(quote).chars().filter_map(|c| c.letter_index()).enumerate() {
        positions[idx].push(pos);
    }
    for slots in &mut positions {
        slots.shuffle(rng);
    }

    let mut grid_key = Vec::with_capacity(solution.len());
    for word in solution {
        let mut line = Vec::with_capacity(word.len());
        for letter in word.chars() {
            let pos = letter
                .letter_index()
                .and_then(|idx| positions[idx].pop())
                .ok_or_else(|| ExportError { word: word.clone(), letter })?;
            line.push((pos + 1).to_string());
        }
        grid_key.push(line.join(" "));
    }

    let answers: Vec<String> = solution.iter().map(|w| w.to_uppercase()).collect();
    let clues: Vec<String> = answers.iter().map(|a| format!("CLUE_FOR_{a}")).collect();

    Ok(KotwordsExport {
        solution: quote.to_string(),
        grid_key: grid_key.join("\n"),
        answers: answers.join("\n"),
        completion_message: format!("{source}\n\n{quote}"),
        clues: clues.join("\n"),
    })
}

/// Pretty-printed JSON of the renderer fields.
///
/// # Errors
///
/// Only if serde fails, which it does not for plain strings.
pub fn to_json(export: &KotwordsExport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(export)
}

/// Render the APZ acrostic text file for `export`.
#[must_use]
pub fn to_apz(export: &KotwordsExport, source: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" ?>
<!-- Acrostic text file -->
<puzzle>
<metadata>
    <!-- These first three fields should be self-explanatory -->
    <title>PUZZLE_TITLE_HERE</title>
    <creator>PUZZLE_AUTHOR_HERE</creator>
    <copyright>PUZZLE_COPYRIGHT_HERE</copyright>
    <!-- Suggested Width can be filled if you want to suggest a width for the grid -->
    <suggestedwidth></suggestedwidth>
    <apzversion>1.0</apzversion>
    <description/>
</metadata>
<!-- In the solution, use spaces for word breaks. Omit any punctuation (commas,
periods, etc.) unless you want it to get its own prefilled, uneditable square
in the quote grid.  NOTE: the solution must be all uppercase. -->
<solution>{solution_upper}</solution>
<!-- Source and Quote will be displayed upon successful completion.
Typically the quote has more punctuation than the "solution" -->
<source>
{source}
</source>
<quote>
{solution}
</quote>
<!-- fullquote is not currently used. -->
<fullquote>
{solution}
</fullquote>
<gridkey>
{grid_key}
</gridkey>
<answers>
{answers}
</answers>
<clues>
{clues}
</clues>
</puzzle>
"#,
        solution_upper = export.solution.to_uppercase(),
        source = source,
        solution = export.solution,
        grid_key = export.grid_key,
        answers = export.answers,
        clues = export.clues,
    )
}
