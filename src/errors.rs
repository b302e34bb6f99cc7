//! Configuration errors with error codes and helpful messages.
//!
//! These cover everything that can go wrong *before* the solver runs: an
//! unreadable or useless lexicon, malformed quote/source input, and included
//! words that do not fit the quote.
//!
//! # Error Codes
//!
//! - C001: `LexiconUnreadable` (Lexicon file missing or unreadable)
//! - C002: `EmptyLexicon` (No usable entries in the lexicon)
//! - C003: retired (an empty candidate list is an ordinary infeasible result)
//! - C004: `EmptyInput` (Quote or source has no letters)
//! - C005: `ContradictoryBounds` (Minimum word length exceeds maximum)
//! - C006: `EmptyIncludedWord` (Included word has no letters)
//! - C007: `IncludedWordsInfeasible` (Included words need letters the quote lacks)
//!
//! # Examples
//!
//! ```
//! use acrostic::errors::ConfigError;
//!
//! let err = ConfigError::ContradictoryBounds { min: 8, max: 4 };
//! assert_eq!(err.code(), "C005");
//! println!("{}", err.display_detailed());
//! ```

use std::io;
use std::path::PathBuf;

/// Custom error type for configuration and input problems
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read lexicon from '{}': {source}", .path.display())]
    LexiconUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("lexicon '{label}' has no usable entries ({skipped} malformed lines skipped)")]
    EmptyLexicon { label: String, skipped: usize },

    #[error("{field} contains no letters: \"{input}\"")]
    EmptyInput { field: &'static str, input: String },

    #[error("contradictory word-length bounds: min={min}, max={max}")]
    ContradictoryBounds { min: usize, max: usize },

    #[error("included word \"{word}\" contains no letters")]
    EmptyIncludedWord { word: String },

    #[error("included words need {requested} '{letter}' in the {pool} but only {available} available")]
    IncludedWordsInfeasible {
        pool: &'static str,
        letter: char,
        requested: u32,
        available: u32,
    },
}

impl ConfigError {
    /// Returns the error code for this error variant
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::LexiconUnreadable { .. } => "C001",
            ConfigError::EmptyLexicon { .. } => "C002",
            ConfigError::EmptyInput { .. } => "C004",
            ConfigError::ContradictoryBounds { .. } => "C005",
            ConfigError::EmptyIncludedWord { .. } => "C006",
            ConfigError::IncludedWordsInfeasible { .. } => "C007",
        }
    }

    /// Returns a short description of this error type (for documentation)
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            ConfigError::LexiconUnreadable { .. } => "Lexicon file missing or unreadable",
            ConfigError::EmptyLexicon { .. } => "No usable entries in the lexicon",
            ConfigError::EmptyInput { .. } => "Quote or source has no letters",
            ConfigError::ContradictoryBounds { .. } => "Minimum word length exceeds maximum",
            ConfigError::EmptyIncludedWord { .. } => "Included word has no letters",
            ConfigError::IncludedWordsInfeasible { .. } => "Included words need letters the quote lacks",
        }
    }

    /// Returns detailed explanation of this error type (for documentation)
    #[must_use]
    pub fn details(&self) -> &'static str {
        match self {
            ConfigError::LexiconUnreadable { .. } => "The lexicon path does not exist or could not be read as UTF-8 text.",
            ConfigError::EmptyLexicon { .. } => "Every line of the lexicon was either malformed (no `;score` field), below the minimum score, or outside the word-length bounds.",
            ConfigError::EmptyInput { .. } => "After removing punctuation, digits and spaces, the quote or the source was empty.",
            ConfigError::ContradictoryBounds { .. } => "The minimum word length was larger than the maximum word length, so no word can qualify.",
            ConfigError::EmptyIncludedWord { .. } => "An entry of the included-word list has no letters once punctuation is removed.",
            ConfigError::IncludedWordsInfeasible { .. } => "Strict mode is on and the included words use more copies of a letter than the quote (or more initials than the source) provides.",
        }
    }

    /// Returns a helpful suggestion or example for this error
    #[must_use]
    pub fn help(&self) -> Option<&'static str> {
        match self {
            ConfigError::LexiconUnreadable { .. } => Some("Check the --wordlist path; each line should look like 'word;score'"),
            ConfigError::EmptyLexicon { .. } => Some("Lower --min-score or widen --min-len/--max-len"),
            ConfigError::EmptyInput { .. } => Some("Both the quote and the source must contain at least one letter a-z"),
            ConfigError::ContradictoryBounds { .. } => Some("The minimum length cannot exceed the maximum length"),
            ConfigError::EmptyIncludedWord { .. } => Some("Remove the empty item from --included (e.g., 'cab,dog' not 'cab,,dog')"),
            ConfigError::IncludedWordsInfeasible { .. } => Some("Drop an included word, or run without --strict-included to cap the shortfall at zero"),
        }
    }

    /// Formats the error with code and optional help text
    #[must_use]
    pub fn display_detailed(&self) -> String {
        format_error_with_code_and_help(&self.to_string(), self.code(), self.help())
    }
}

/// Helper function to format error messages with code and optional help text
pub(crate) fn format_error_with_code_and_help(base_msg: &str, code: &str, help: Option<&str>) -> String {
    if let Some(help_text) = help {
        format!("{base_msg} ({code})\n{help_text}")
    } else {
        format!("{base_msg} ({code})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_variants() -> Vec<ConfigError> {
        vec![
            ConfigError::LexiconUnreadable {
                path: PathBuf::from("missing.dict"),
                source: io::Error::new(io::ErrorKind::NotFound, "not found"),
            },
            ConfigError::EmptyLexicon { label: "x.dict".to_string(), skipped: 3 },
            ConfigError::EmptyInput { field: "quote", input: "123".to_string() },
            ConfigError::ContradictoryBounds { min: 8, max: 4 },
            ConfigError::EmptyIncludedWord { word: "--".to_string() },
            ConfigError::IncludedWordsInfeasible { pool: "quote", letter: 'z', requested: 2, available: 1 },
        ]
    }

    #[test]
    fn test_error_codes_and_help() {
        let err = ConfigError::ContradictoryBounds { min: 8, max: 4 };
        assert_eq!(err.code(), "C005");
        assert!(err.help().is_some());
        let detailed = err.display_detailed();
        assert!(detailed.contains("C005"));
        assert!(detailed.contains("minimum length cannot exceed"));
    }

    /// Test that all `ConfigError` variants have unique error codes
    #[test]
    fn test_all_error_codes_are_unique() {
        let mut codes = std::collections::HashSet::new();
        for err in all_variants() {
            let code = err.code();
            assert!(code.starts_with('C'), "Error code '{}' should start with 'C'", code);
            assert!(codes.insert(code), "Duplicate error code found: {}", code);
        }
        assert_eq!(codes.len(), 6);
    }

    /// Test that all error codes follow the format C0XX
    #[test]
    fn test_error_code_format() {
        for err in all_variants() {
            let code = err.code();
            assert_eq!(code.len(), 4, "Error code '{}' should be 4 characters (C0XX)", code);
            assert!(code[1..].parse::<u16>().is_ok(), "Error code '{}' should end with a number", code);
        }
    }

    #[test]
    fn test_help_text_adds_information() {
        for err in all_variants() {
            if let Some(help_text) = err.help() {
                assert!(help_text.len() > 10, "Help text for {:?} should be substantial", err);
                assert_ne!(help_text, err.to_string());
            }
            assert!(!err.description().is_empty());
            assert!(err.details().len() > err.description().len());
        }
    }

    #[test]
    fn test_infeasible_included_message_names_letter_and_counts() {
        let err = ConfigError::IncludedWordsInfeasible { pool: "quote", letter: 'z', requested: 2, available: 1 };
        let msg = err.to_string();
        assert!(msg.contains("'z'"));
        assert!(msg.contains('2') && msg.contains('1'));
    }

    #[test]
    fn test_unreadable_lexicon_mentions_path() {
        let err = ConfigError::LexiconUnreadable {
            path: PathBuf::from("nowhere/words.dict"),
            source: io::Error::new(io::ErrorKind::NotFound, "No such file"),
        };
        assert!(err.to_string().contains("nowhere/words.dict"));
        assert_eq!(err.code(), "C001");
    }

    #[test]
    fn test_unreadable_lexicon_keeps_io_source() {
        let err = ConfigError::LexiconUnreadable {
            path: PathBuf::from("nowhere/words.dict"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        let source = std::error::Error::source(&err).and_then(|e| e.downcast_ref::<io::Error>());
        assert_eq!(source.map(io::Error::kind), Some(io::ErrorKind::PermissionDenied));
    }
}
