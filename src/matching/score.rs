//! Scores a candidate author list against the declared authors.

use serde::{Deserialize, Serialize};

use crate::models::Author;

use super::authors::match_authors;

/// Weights of the three score components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub author_ratio: f64,
    pub name_similarity: f64,
    pub affiliation_coverage: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            author_ratio: 0.5,
            name_similarity: 0.2,
            affiliation_coverage: 0.3,
        }
    }
}

/// Weighted mean of [`author_ratio`], [`name_similarity`] and
/// [`affiliation_coverage`], in `[0, 1]`.
///
/// A paper without declared authors always scores 0.
pub fn score_authors(extracted: &[Author], declared: &[Author], weights: &ScoreWeights) -> f64 {
    if declared.is_empty() {
        return 0.0;
    }
    weighted_mean(&[
        (author_ratio(declared.len(), extracted.len()), weights.author_ratio),
        (name_similarity(declared, extracted), weights.name_similarity),
        (affiliation_coverage(extracted), weights.affiliation_coverage),
    ])
}

/// How well the number of extracted authors fits the declared count.
///
/// Extracting too few is penalized linearly. Extracting too many is
/// penalized as well, down to 0 at twice the declared count.
pub fn author_ratio(declared: usize, extracted: usize) -> f64 {
    if declared == 0 {
        return 0.0;
    }
    let (d, e) = (declared as f64, extracted as f64);
    if extracted <= declared {
        e / d
    } else if extracted >= declared * 2 {
        0.0
    } else {
        (e - 2.0 * d).abs() / d
    }
}

/// Mean similarity of every declared author to its matched extracted author.
pub fn name_similarity(declared: &[Author], extracted: &[Author]) -> f64 {
    let matches = match_authors(declared, extracted);
    if matches.is_empty() {
        return 0.0;
    }
    matches.iter().map(|m| m.score).sum::<f64>() / matches.len() as f64
}

/// Fraction of extracted authors with at least one affiliation.
pub fn affiliation_coverage(extracted: &[Author]) -> f64 {
    if extracted.is_empty() {
        return 0.0;
    }
    let covered = extracted.iter().filter(|author| author.has_affiliation()).count();
    covered as f64 / extracted.len() as f64
}

fn weighted_mean(scores: &[(f64, f64)]) -> f64 {
    let total_weight: f64 = scores.iter().map(|(_, weight)| weight).sum();
    if total_weight <= 0.0 {
        return 0.0;
    }
    let mean = scores.iter().map(|(score, weight)| score * weight).sum::<f64>() / total_weight;
    mean.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declared(names: &[&str]) -> Vec<Author> {
        names.iter().map(|name| Author::without_affiliation(*name)).collect()
    }

    #[test]
    fn test_author_ratio() {
        assert_eq!(author_ratio(0, 3), 0.0);
        assert_eq!(author_ratio(4, 2), 0.5);
        assert_eq!(author_ratio(4, 4), 1.0);
        assert_eq!(author_ratio(5, 6), 0.8);
        assert_eq!(author_ratio(5, 10), 0.0);
        assert_eq!(author_ratio(5, 12), 0.0);
    }

    #[test]
    fn test_affiliation_coverage() {
        let extracted = vec![Author::new("Jane Doe", ["MIT"]), Author::without_affiliation("John Roe")];
        assert_eq!(affiliation_coverage(&extracted), 0.5);
        assert_eq!(affiliation_coverage(&[]), 0.0);
    }

    #[test]
    fn test_perfect_candidate() {
        let extracted = vec![Author::new("Jane Doe", ["MIT"]), Author::new("John Roe", ["ETH"])];
        let score = score_authors(&extracted, &declared(&["Jane Doe", "John Roe"]), &ScoreWeights::default());
        assert!((score - 1.0).abs() < 1e-9, "score was {score}");
    }

    #[test]
    fn test_zero_only_without_declared_authors() {
        let extracted = vec![Author::new("Jane Doe", ["MIT"])];
        assert_eq!(score_authors(&extracted, &[], &ScoreWeights::default()), 0.0);

        let score = score_authors(
            &[Author::without_affiliation("Someone Else")],
            &declared(&["Jane Doe"]),
            &ScoreWeights::default(),
        );
        assert!(score > 0.0 && score <= 1.0, "score was {score}");
    }

    #[test]
    fn test_score_stays_in_bounds() {
        let weights = ScoreWeights::default();
        let declared = declared(&["Jane Doe", "John Roe", "Ann Lee"]);
        let candidates = vec![
            vec![],
            vec![Author::without_affiliation("X")],
            vec![Author::new("Jane Doe", ["MIT"]); 7],
            vec![Author::new("Jane Doe", ["MIT"]), Author::new("Ann Lee", ["ETH"])],
        ];
        for extracted in candidates {
            let score = score_authors(&extracted, &declared, &weights);
            assert!((0.0..=1.0).contains(&score), "score {score} for {extracted:?}");
        }
    }

    #[test]
    fn test_custom_weights() {
        let weights = ScoreWeights {
            author_ratio: 1.0,
            name_similarity: 0.0,
            affiliation_coverage: 0.0,
        };
        let extracted = vec![Author::without_affiliation("X")];
        assert_eq!(score_authors(&extracted, &declared(&["A", "B"]), &weights), 0.5);
    }
}
