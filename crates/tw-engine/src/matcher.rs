//! Fuzzy keyword matching for free-text input.

use strsim::normalized_levenshtein;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Smallest score an imperfect match can get. Only identical strings score 0.
const MIN_IMPERFECT_SCORE: f64 = 0.001;

/// Scores how well player input matches a choice keyword.
///
/// Scores run from 0.0 (perfect) to 1.0 (unrelated).
pub trait KeywordMatcher {
    /// Score `input` against `keyword`.
    fn score(&self, input: &str, keyword: &str) -> f64;
}

/// Position-independent fuzzy matcher.
///
/// Both strings are lowercased and stripped of diacritics. The shorter one
/// is slid across the longer one and the best window's edit similarity
/// decides the score, so "torch" scores well inside "light the torch".
#[derive(Debug, Clone, Copy, Default)]
pub struct FuzzyMatcher;

impl KeywordMatcher for FuzzyMatcher {
    fn score(&self, input: &str, keyword: &str) -> f64 {
        let input = normalize(input);
        let keyword = normalize(keyword);

        if input == keyword {
            return 0.0;
        }
        if input.is_empty() || keyword.is_empty() {
            return 1.0;
        }

        let (short, long) = if input.chars().count() <= keyword.chars().count() {
            (input, keyword)
        } else {
            (keyword, input)
        };
        let long: Vec<char> = long.chars().collect();
        let width = short.chars().count();

        let best = long
            .windows(width)
            .map(|window| {
                let window: String = window.iter().collect();
                normalized_levenshtein(&short, &window)
            })
            .fold(0.0_f64, f64::max);

        (1.0 - best).max(MIN_IMPERFECT_SCORE)
    }
}

/// Lowercase, strip diacritics, and collapse whitespace.
pub fn normalize(text: &str) -> String {
    let folded: String = text
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}
