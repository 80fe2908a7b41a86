//! String similarity metrics on top of `rapidfuzz`.
//!
//! All scores are in `[0, 1]`.

use rapidfuzz::fuzz::{Args, RatioBatchComparator};
use unicode_normalization::UnicodeNormalization;

/// Replaces every non-alphanumeric character with a space, lower-cases and
/// trims the result.
pub fn default_process(text: &str) -> String {
    let processed: String = text
        .chars()
        .flat_map(|c| {
            let mapped: Vec<char> = if c.is_alphanumeric() {
                c.to_lowercase().collect()
            } else {
                vec![' ']
            };
            mapped
        })
        .collect();
    processed.trim().to_string()
}

/// NFD decomposition followed by [`default_process`]. Combining marks are
/// not alphanumeric, so accents turn into spaces.
pub fn preprocess(text: &str) -> String {
    let decomposed: String = text.nfd().collect();
    default_process(&decomposed)
}

/// Normalized Indel similarity. Empty input scores 0.
pub fn ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    rapidfuzz::fuzz::ratio(a.chars(), b.chars())
}

/// Similarity of two names after [`default_process`].
pub fn name_similarity(a: &str, b: &str) -> f64 {
    ratio(&default_process(a), &default_process(b))
}

/// Best [`ratio`] of the shorter string against any window of the longer
/// one, including the windows cut off at either end.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    PartialRatio::new(a).similarity(b)
}

/// [`partial_ratio`] of one query against many choices. The query is
/// prepared once and reused for every choice it is not longer than.
pub struct PartialRatio {
    query: String,
    chars: Vec<char>,
    scorer: RatioBatchComparator<char>,
}

impl PartialRatio {
    pub fn new(query: &str) -> Self {
        let chars: Vec<char> = query.chars().collect();
        Self {
            query: query.to_string(),
            scorer: RatioBatchComparator::new(chars.iter().copied()),
            chars,
        }
    }

    pub fn similarity(&self, choice: &str) -> f64 {
        let choice_chars: Vec<char> = choice.chars().collect();
        if self.chars.len() <= choice_chars.len() {
            best_window(&self.query, &self.chars, &self.scorer, choice, &choice_chars)
        } else {
            let scorer = RatioBatchComparator::new(choice_chars.iter().copied());
            best_window(choice, &choice_chars, &scorer, &self.query, &self.chars)
        }
    }
}

fn best_window(
    short: &str,
    short_chars: &[char],
    scorer: &RatioBatchComparator<char>,
    long: &str,
    long_chars: &[char],
) -> f64 {
    if short_chars.is_empty() {
        return 0.0;
    }
    if long.contains(short) {
        return 1.0;
    }

    let width = short_chars.len();
    let full = long_chars.windows(width);
    let heads = (1..width).map(|len| &long_chars[..len]);
    let tails = (1..width).map(|len| &long_chars[long_chars.len() - len..]);

    let mut best = 0.0_f64;
    for window in full.chain(heads).chain(tails) {
        // Windows below the best score so far are abandoned early.
        let args = Args::default().score_cutoff(best);
        if let Some(score) = scorer.similarity_with_args(window.iter().copied(), &args)
            && score > best
        {
            best = score;
            if best >= 1.0 {
                break;
            }
        }
    }
    best
}
