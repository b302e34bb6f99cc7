//! Integration tests for the acrostic generator.
//!
//! These run the full pipeline (lexicon loading, formulation, solving,
//! assembly and export) against a small fixture word list.

use std::collections::HashSet;
use std::io::Write;

use rand::rngs::StdRng;
use rand::SeedableRng;

use acrostic::errors::ConfigError;
use acrostic::export::{create_kotwords_export, to_apz};
use acrostic::formulator::ShortfallPolicy;
use acrostic::generator::{create_acrostic, generate, is_valid_solution, AcrosticError, AcrosticOptions};
use acrostic::letters::{alpha_only, LetterCounts};
use acrostic::lexicon::{Lexicon, LexiconFilter};
use acrostic::solver::{BackendKind, SolveStatus, SolverConfig, SolverError, TieBreak};

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/test_lexicon.dict");

fn test_filter() -> LexiconFilter {
    LexiconFilter { min_score: 0, min_len: 3, max_len: 15 }
}

/// Load the fixture lexicon (3+ letters, any score)
fn load_test_lexicon() -> Lexicon {
    Lexicon::load_from_path(FIXTURE, &test_filter()).expect("fixture lexicon should load")
}

fn strings(words: &[&str]) -> Vec<String> {
    words.iter().map(ToString::to_string).collect()
}

/// Assert every documented property of a feasible answer list.
fn assert_valid(words: &[String], quote: &str, source: &str) {
    let letters: LetterCounts = words.iter().flat_map(|w| w.chars()).collect();
    assert_eq!(letters, LetterCounts::from_alpha(&alpha_only(quote)), "letters of {words:?} != quote");

    let initials: String = words.iter().filter_map(|w| w.chars().next()).collect();
    assert_eq!(initials, alpha_only(source), "initials of {words:?} != source");

    let unique: HashSet<&String> = words.iter().collect();
    assert_eq!(unique.len(), words.len(), "a word was used twice in {words:?}");

    assert!(is_valid_solution(words, quote, source));
}

#[cfg(test)]
mod lexicon_loading {
    use super::*;

    #[test]
    fn test_fixture_loads_and_counts_malformed_lines() {
        let lexicon = load_test_lexicon();
        assert_eq!(lexicon.skipped, 3);
        // "qi" is too short; "Tiger" collapses into "tiger"
        assert_eq!(lexicon.len(), 23);
        assert!(lexicon.words().all(|w| w.len() >= 3));
        assert_eq!(lexicon.words().filter(|w| *w == "tiger").count(), 1);
    }

    #[test]
    fn test_score_filter() {
        let filter = LexiconFilter { min_score: 60, ..test_filter() };
        let lexicon = Lexicon::load_from_path(FIXTURE, &filter).unwrap();
        assert!(lexicon.entries.iter().all(|e| e.quality >= 60));
        assert!(!lexicon.words().any(|w| w == "trip"));
    }

    #[test]
    fn test_missing_file_is_a_config_error() {
        let err = Lexicon::load_from_path("tests/fixtures/does_not_exist.dict", &test_filter()).unwrap_err();
        assert_eq!(err.code(), "C001");
        assert!(matches!(*err, ConfigError::LexiconUnreadable { .. }));
    }

    #[test]
    fn test_file_without_usable_entries() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "just words\nno;scores;here?\nab;99").unwrap();
        let err = Lexicon::load_from_path(file.path(), &test_filter()).unwrap_err();
        assert_eq!(err.code(), "C002");
    }

    #[test]
    fn test_contradictory_bounds() {
        let filter = LexiconFilter { min_len: 9, max_len: 4, ..test_filter() };
        let err = Lexicon::load_from_path(FIXTURE, &filter).unwrap_err();
        assert!(matches!(*err, ConfigError::ContradictoryBounds { min: 9, max: 4 }));
    }
}

#[cfg(test)]
mod scenarios {
    use super::*;

    #[test]
    fn test_abc_abc_needs_two_a_words() {
        let lexicon = Lexicon::parse_from_str("abc;50\nacb;50\nbca;50\ncab;50", &test_filter());
        let words = create_acrostic("ABC ABC", "AA", &lexicon, &AcrosticOptions::default()).unwrap();
        assert_eq!(words.len(), 2);
        assert!(words.iter().all(|w| w.starts_with('a')));
        assert_valid(&words, "ABC ABC", "AA");
    }

    #[test]
    fn test_unique_solution_in_source_order() {
        let lexicon = load_test_lexicon();
        let words = create_acrostic("Tiger, apple, cider!", "C. A. T.", &lexicon, &AcrosticOptions::default()).unwrap();
        assert_eq!(words, strings(&["cider", "apple", "tiger"]));
        assert_valid(&words, "Tiger, apple, cider!", "C. A. T.");
    }

    #[test]
    fn test_anagram_pair() {
        let lexicon = load_test_lexicon();
        let words = create_acrostic("Lemon melon", "LM", &lexicon, &AcrosticOptions::default()).unwrap();
        assert_eq!(words, strings(&["lemon", "melon"]));
    }

    #[test]
    fn test_letter_without_candidates_is_infeasible_not_error() {
        let lexicon = load_test_lexicon();
        // the only 'q' word is too short for the filter
        let acrostic = generate("tiger apple cider qi", "CATQ", &lexicon, &AcrosticOptions::default()).unwrap();
        assert_eq!(acrostic.status, SolveStatus::Infeasible);
        assert!(acrostic.words.is_empty());
    }

    #[test]
    fn test_lexicon_without_fitting_words_is_infeasible_not_error() {
        let lexicon = Lexicon::parse_from_str("abcd;50\nbcda;50", &test_filter());
        let acrostic = generate("xyz quiz", "X. X.", &lexicon, &AcrosticOptions::default()).unwrap();
        assert_eq!(acrostic.status, SolveStatus::Infeasible);
        assert!(acrostic.words.is_empty());
    }

    #[test]
    fn test_included_word_covering_everything() {
        let lexicon = load_test_lexicon();
        let options = AcrosticOptions { included: strings(&["cab"]), ..AcrosticOptions::default() };
        let words = create_acrostic("cab", "c", &lexicon, &options).unwrap();
        assert_eq!(words, strings(&["cab"]));
    }
}

#[cfg(test)]
mod included_and_excluded {
    use super::*;

    #[test]
    fn test_included_word_appears_verbatim() {
        let lexicon = load_test_lexicon();
        let options = AcrosticOptions { included: strings(&["Tiger"]), ..AcrosticOptions::default() };
        let words = create_acrostic("Tiger apple cider", "CAT", &lexicon, &options).unwrap();
        assert!(words.contains(&"tiger".to_string()));
        assert_valid(&words, "Tiger apple cider", "CAT");
    }

    #[test]
    fn test_excluded_word_never_appears() {
        let lexicon = load_test_lexicon();
        let options = AcrosticOptions { excluded: strings(&["APPLE"]), ..AcrosticOptions::default() };
        // "apple" was the only 'a' word that fits, so nothing is left
        let words = create_acrostic("Tiger apple cider", "CAT", &lexicon, &options).unwrap();
        assert!(words.is_empty());
    }

    #[test]
    fn test_strict_included_rejects_missing_letters() {
        let lexicon = load_test_lexicon();
        let options = AcrosticOptions {
            included: strings(&["zebra"]),
            shortfall_policy: ShortfallPolicy::Reject,
            ..AcrosticOptions::default()
        };
        let err = create_acrostic("Tiger apple cider", "CAT", &lexicon, &options).unwrap_err();
        assert_eq!(err.code(), "C007");
        assert!(matches!(err, AcrosticError::Config(ref e) if matches!(**e, ConfigError::IncludedWordsInfeasible { .. })));
    }

    #[test]
    fn test_empty_included_item() {
        let lexicon = load_test_lexicon();
        let options = AcrosticOptions { included: strings(&["..."]), ..AcrosticOptions::default() };
        let err = create_acrostic("Tiger apple cider", "CAT", &lexicon, &options).unwrap_err();
        assert_eq!(err.code(), "C006");
    }
}

#[cfg(test)]
mod solver_behaviour {
    use super::*;

    #[test]
    fn test_limits_are_errors_not_infeasibility() {
        let lexicon = load_test_lexicon();
        let options = AcrosticOptions {
            solver: SolverConfig { node_limit: Some(0), backend: BackendKind::BranchAndBound, ..SolverConfig::default() },
            ..AcrosticOptions::default()
        };
        let err = create_acrostic("Tiger apple cider", "CAT", &lexicon, &options).unwrap_err();
        assert!(matches!(err, AcrosticError::Solver(SolverError::NodeLimitExceeded { limit: 0 })));
    }

    #[test]
    fn test_backends_agree_on_the_fixture() {
        let lexicon = load_test_lexicon();
        for backend in [BackendKind::Milp, BackendKind::BranchAndBound] {
            let options = AcrosticOptions {
                solver: SolverConfig { backend, ..SolverConfig::default() },
                ..AcrosticOptions::default()
            };
            let words = create_acrostic("Tiger, apple, cider!", "C. A. T.", &lexicon, &options).unwrap();
            assert_eq!(words, strings(&["cider", "apple", "tiger"]), "{backend}");
        }
    }

    #[test]
    fn test_every_tie_break_gives_a_valid_answer() {
        let lexicon = load_test_lexicon();
        for tie_break in [TieBreak::LexiconOrder, TieBreak::HighestQuality, TieBreak::BalancedLength] {
            let options = AcrosticOptions {
                solver: SolverConfig { tie_break, ..SolverConfig::default() },
                ..AcrosticOptions::default()
            };
            let words = create_acrostic("Glare, noble eagle", "GNE", &lexicon, &options).unwrap();
            assert_valid(&words, "Glare, noble eagle", "GNE");
        }
    }

    #[test]
    fn test_repeat_runs_agree() {
        let lexicon = load_test_lexicon();
        let first = generate("Glare, noble eagle", "GNE", &lexicon, &AcrosticOptions::default()).unwrap();
        let second = generate("Glare, noble eagle", "GNE", &lexicon, &AcrosticOptions::default()).unwrap();
        assert_eq!(first.words, second.words);
        assert_eq!(first.stats.nodes, second.stats.nodes);
        assert_eq!(first.stats.constraints, 52);
    }

    #[test]
    fn test_empty_quote_fails_before_solving() {
        let lexicon = load_test_lexicon();
        let err = create_acrostic("1, 2, 3!", "CAT", &lexicon, &AcrosticOptions::default()).unwrap_err();
        assert_eq!(err.code(), "C004");
    }
}

#[cfg(test)]
mod export {
    use super::*;

    #[test]
    fn test_export_of_generated_answer() {
        let lexicon = load_test_lexicon();
        let quote = "Tiger, apple, cider!";
        let source = "C. A. T.";
        let words = create_acrostic(quote, source, &lexicon, &AcrosticOptions::default()).unwrap();

        let fields = create_kotwords_export(quote, source, &words, &mut StdRng::seed_from_u64(2024)).unwrap();
        assert_eq!(fields.answers, "CIDER\nAPPLE\nTIGER");
        assert_eq!(fields.clues, "CLUE_FOR_CIDER\nCLUE_FOR_APPLE\nCLUE_FOR_TIGER");

        // every quote position is used exactly once
        let mut positions: Vec<usize> = fields
            .grid_key
            .split(['\n', ' '])
            .map(|n| n.parse().unwrap())
            .collect();
        positions.sort_unstable();
        assert_eq!(positions, (1..=alpha_only(quote).len()).collect::<Vec<_>>());

        let again = create_kotwords_export(quote, source, &words, &mut StdRng::seed_from_u64(2024)).unwrap();
        assert_eq!(fields, again);

        let apz = to_apz(&fields, source);
        assert!(apz.contains("<solution>TIGER, APPLE, CIDER!</solution>"));
        assert!(apz.contains("<answers>\nCIDER\nAPPLE\nTIGER\n</answers>"));
    }
}

#[cfg(test)]
mod scale {
    use super::*;
    use std::time::Duration;

    use rand::seq::SliceRandom;
    use rand::Rng;

    fn random_word(rng: &mut StdRng, len: usize) -> String {
        (0..len).map(|_| char::from(b'a' + rng.gen_range(0..26u8))).collect()
    }

    /// Twenty hidden answer words plus a few thousand distractors drawn from
    /// the same letters, so every distractor survives candidate filtering.
    #[test]
    #[ignore = "large instance; run with --ignored"]
    fn test_realistic_instance_solves_within_time_limit() {
        let mut rng = StdRng::seed_from_u64(42);
        let answers: Vec<String> = (0..20)
            .map(|_| {
                let len = rng.gen_range(4..=8);
                random_word(&mut rng, len)
            })
            .collect();
        let quote = answers.join(" ");
        let source: String = answers.iter().filter_map(|w| w.chars().next()).collect();
        let initials: HashSet<char> = source.chars().collect();

        let mut text: String = answers.iter().map(|w| format!("{w};95\n")).collect();
        let mut pool: Vec<char> = alpha_only(&quote).chars().collect();
        for _ in 0..6000 {
            pool.shuffle(&mut rng);
            let len = rng.gen_range(4..=8);
            if initials.contains(&pool[0]) {
                let word: String = pool[..len].iter().collect();
                text.push_str(&format!("{word};95\n"));
            }
        }
        let lexicon = Lexicon::parse_from_str(&text, &LexiconFilter { min_score: 0, min_len: 4, max_len: 15 });

        let options = AcrosticOptions {
            solver: SolverConfig { time_limit: Some(Duration::from_secs(120)), ..SolverConfig::default() },
            ..AcrosticOptions::default()
        };
        let acrostic = generate(&quote, &source, &lexicon, &options).unwrap();

        assert!(acrostic.stats.variables >= 1000, "only {} candidates", acrostic.stats.variables);
        assert!(acrostic.is_feasible());
        assert_eq!(acrostic.words.len(), 20);
        assert_valid(&acrostic.words, &quote, &source);
    }
}
