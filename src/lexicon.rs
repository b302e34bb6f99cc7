//! Load and filter the scored word list the acrostic words come from
//!
//! The input format is one entry per line, `word;score`, with `score` an integer
//! quality rating (higher is better).
//!
//! The parsing logic:
//! - Blank lines are ignored.
//! - Lines with no `;score` field, or a score that is not an integer, are
//!   malformed: they are skipped, logged at debug level, and counted.
//! - Words are trimmed and lowercased; words that still contain anything other
//!   than `a`-`z` are skipped (the solver only knows 26 letters).
//! - Entries below the minimum score or outside `[min_len, max_len]` are dropped.
//! - Duplicates collapse to one entry carrying the highest score seen.
//! - The final list is sorted by length first, then alphabetically.
//!
//! `parse_from_str` never touches the filesystem so it can be used from WASM;
//! `load_from_path` is the native convenience wrapper.

#[cfg(not(target_arch = "wasm32"))]
use std::path::Path;

use log::{debug, info};

use crate::errors::ConfigError;
use crate::letters::AcrosticChar;

/// Words shorter than this make for dull clues.
pub const DEFAULT_MIN_WORD_LENGTH: usize = 4;
pub const DEFAULT_MAX_WORD_LENGTH: usize = 15;
pub const DEFAULT_MIN_SCORE: i32 = 90;

/// One usable word of the lexicon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexiconEntry {
    /// Lowercase, `a`-`z` only.
    pub word: String,
    pub quality: i32,
}

/// Which lexicon lines survive loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexiconFilter {
    pub min_score: i32,
    pub min_len: usize,
    pub max_len: usize,
}

impl Default for LexiconFilter {
    fn default() -> Self {
        Self {
            min_score: DEFAULT_MIN_SCORE,
            min_len: DEFAULT_MIN_WORD_LENGTH,
            max_len: DEFAULT_MAX_WORD_LENGTH,
        }
    }
}

impl LexiconFilter {
    /// Reject bounds no word could satisfy.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ContradictoryBounds` if `min_len > max_len`.
    pub fn validate(&self) -> Result<(), Box<ConfigError>> {
        if self.min_len > self.max_len {
            return Err(Box::new(ConfigError::ContradictoryBounds { min: self.min_len, max: self.max_len }));
        }
        Ok(())
    }

    fn accepts(&self, word: &str, quality: i32) -> bool {
        quality >= self.min_score && (self.min_len..=self.max_len).contains(&word.len())
    }
}

/// A processed, ready-to-use lexicon.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    /// Deduplicated entries sorted by (length, alphabetical).
    pub entries: Vec<LexiconEntry>,
    /// Number of malformed lines that were skipped while parsing.
    pub skipped: usize,
}

impl Lexicon {
    /// Parse a raw lexicon from an in-memory string.
    ///
    /// This never fails: malformed lines are skipped and counted in
    /// [`Lexicon::skipped`]. Use [`Lexicon::from_text`] to also reject a
    /// lexicon with no usable entries.
    pub fn parse_from_str(contents: &str, filter: &LexiconFilter) -> Lexicon {
        let mut skipped = 0;

        let mut entries: Vec<LexiconEntry> = contents
            .lines()
            .enumerate()
            .filter_map(|(line_no, raw_line)| {
                let line = raw_line.trim();
                if line.is_empty() {
                    return None;
                }

                // split on the first ';' only
                let Some((word_raw, score_raw)) = line.split_once(';') else {
                    debug!("lexicon line {}: no score field, skipping \"{line}\"", line_no + 1);
                    skipped += 1;
                    return None;
                };
                let Ok(quality) = score_raw.trim().parse::<i32>() else {
                    debug!("lexicon line {}: bad score \"{}\", skipping", line_no + 1, score_raw.trim());
                    skipped += 1;
                    return None;
                };

                let word = word_raw.trim().to_lowercase();
                if word.is_empty() || !word.chars().all(|c| c.is_letter()) {
                    debug!("lexicon line {}: \"{word}\" is not a plain a-z word, skipping", line_no + 1);
                    skipped += 1;
                    return None;
                }

                filter.accepts(&word, quality).then_some(LexiconEntry { word, quality })
            })
            .collect();

        // Alphabetical with the best score first, so `dedup_by` keeps the best copy.
        entries.sort_by(|a, b| a.word.cmp(&b.word).then(b.quality.cmp(&a.quality)));
        entries.dedup_by(|later, earlier| later.word == earlier.word);

        entries.sort_by(|a, b| a.word.len().cmp(&b.word.len()).then_with(|| a.word.cmp(&b.word)));

        Lexicon { entries, skipped }
    }

    /// Parse `contents` and require at least one usable entry.
    ///
    /// `label` names the source in log lines and errors (a path, or e.g. "upload").
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ContradictoryBounds` for an invalid filter and
    /// `ConfigError::EmptyLexicon` if nothing survives parsing and filtering.
    pub fn from_text(contents: &str, label: &str, filter: &LexiconFilter) -> Result<Lexicon, Box<ConfigError>> {
        filter.validate()?;
        let lexicon = Self::parse_from_str(contents, filter);

        if lexicon.skipped > 0 {
            info!("Skipped {} malformed lines in lexicon '{label}'", lexicon.skipped);
        }
        if lexicon.is_empty() {
            return Err(Box::new(ConfigError::EmptyLexicon { label: label.to_string(), skipped: lexicon.skipped }));
        }
        info!("Loaded {} lexicon entries from '{label}'", lexicon.len());
        Ok(lexicon)
    }

    /// Native-only convenience method: read from a file path and parse.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::LexiconUnreadable` if the file cannot be read, plus
    /// anything [`Lexicon::from_text`] returns.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path<P: AsRef<Path>>(path: P, filter: &LexiconFilter) -> Result<Lexicon, Box<ConfigError>> {
        let path_ref = path.as_ref();
        let data = std::fs::read_to_string(path_ref).map_err(|source| {
            Box::new(ConfigError::LexiconUnreadable { path: path_ref.to_path_buf(), source })
        })?;

        Self::from_text(&data, &path_ref.display().to_string(), filter)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.word.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn open_filter(min_score: i32) -> LexiconFilter {
        LexiconFilter { min_score, min_len: 1, max_len: 50 }
    }

    fn words(lexicon: &Lexicon) -> Vec<&str> {
        lexicon.words().collect()
    }

    #[test]
    fn test_parse_basic() {
        let lexicon = Lexicon::parse_from_str("cat;50\ndog;60\nbird;40", &open_filter(45));
        assert_eq!(words(&lexicon), vec!["cat", "dog"]);
        assert_eq!(lexicon.entries[1].quality, 60);
    }

    #[test]
    fn test_parse_filters_by_length() {
        let filter = LexiconFilter { min_score: 0, min_len: 4, max_len: 5 };
        let lexicon = Lexicon::parse_from_str("cat;50\nlion;50\ntiger;50\njaguar;50", &filter);
        assert_eq!(words(&lexicon), vec!["lion", "tiger"]);
    }

    #[test]
    fn test_parse_deduplicates_keeping_best_score() {
        let lexicon = Lexicon::parse_from_str("cat;50\ndog;60\ncat;70\ncat;55", &open_filter(45));
        assert_eq!(words(&lexicon), vec!["cat", "dog"]);
        assert_eq!(lexicon.entries[0].quality, 70);
    }

    #[test]
    fn test_parse_sorts_by_length_then_alpha() {
        let lexicon = Lexicon::parse_from_str("dog;50\napple;50\ncat;50\nab;50\nzebra;50", &open_filter(45));
        assert_eq!(words(&lexicon), vec!["ab", "cat", "dog", "apple", "zebra"]);
    }

    #[test]
    fn test_parse_normalizes_case_and_whitespace() {
        let lexicon = Lexicon::parse_from_str("  CAT  ;  50  \n  Dog ; 60 ", &open_filter(45));
        assert_eq!(words(&lexicon), vec!["cat", "dog"]);
    }

    #[test]
    fn test_parse_skips_and_counts_malformed_lines() {
        let input = "cat;50\ninvalid_line\ndog;60\n\napple;bad_score\nno-way;70";
        let lexicon = Lexicon::parse_from_str(input, &open_filter(45));
        assert_eq!(words(&lexicon), vec!["cat", "dog"]);
        assert_eq!(lexicon.skipped, 3);
    }

    #[test]
    fn test_parse_negative_scores() {
        let lexicon = Lexicon::parse_from_str("cat;-10\ndog;0\nbird;-5", &open_filter(0));
        assert_eq!(words(&lexicon), vec!["dog"]);
    }

    #[test]
    fn test_from_text_rejects_empty() {
        let err = Lexicon::from_text("nonsense\nmore nonsense", "inline", &open_filter(0)).unwrap_err();
        assert_eq!(err.code(), "C002");
        assert!(matches!(*err, ConfigError::EmptyLexicon { skipped: 2, .. }));
    }

    #[test]
    fn test_from_text_rejects_contradictory_bounds() {
        let filter = LexiconFilter { min_score: 0, min_len: 9, max_len: 3 };
        let err = Lexicon::from_text("cat;50", "inline", &filter).unwrap_err();
        assert_eq!(err.code(), "C005");
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "acid;95\nable;99\nzz;10").unwrap();
        let lexicon = Lexicon::load_from_path(file.path(), &LexiconFilter::default()).unwrap();
        assert_eq!(words(&lexicon), vec!["able", "acid"]);
    }

    #[test]
    fn test_load_from_missing_path() {
        let err = Lexicon::load_from_path("definitely/not/here.dict", &LexiconFilter::default()).unwrap_err();
        assert_eq!(err.code(), "C001");
    }

    #[test]
    fn test_default_filter() {
        let filter = LexiconFilter::default();
        assert_eq!(filter.min_score, 90);
        assert_eq!(filter.min_len, 4);
        assert_eq!(filter.max_len, 15);
        assert!(filter.validate().is_ok());
    }
}
