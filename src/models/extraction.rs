use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use super::Author;

/// Which scheme family produced the candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ExtractionKind {
    /// Exactly one command was found.
    Single,
    /// Several commands matched a multi-command scheme.
    Multi,
    /// Several commands were merged into one `\author{}` and run through
    /// the single-command schemes.
    Wrapped,
}

/// The authors one scheme extracted, with its score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionCandidate {
    pub scheme_id: String,
    pub authors: Vec<Author>,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub kind: ExtractionKind,
    pub candidates: Vec<ExtractionCandidate>,
}

impl ExtractionResult {
    /// The first candidate with the highest score.
    pub fn best(&self) -> Option<&ExtractionCandidate> {
        self.candidates.iter().fold(None, |best, candidate| match best {
            Some(current) if current.score >= candidate.score => Some(current),
            _ => Some(candidate),
        })
    }

    /// Candidates ordered from best to worst; ties keep registration order.
    pub fn ranked(&self) -> Vec<&ExtractionCandidate> {
        let mut ranked: Vec<&ExtractionCandidate> = self.candidates.iter().collect();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(scheme_id: &str, score: f64) -> ExtractionCandidate {
        ExtractionCandidate {
            scheme_id: scheme_id.to_string(),
            authors: vec![Author::without_affiliation("A")],
            score,
        }
    }

    #[test]
    fn test_best_prefers_first_maximum() {
        let result = ExtractionResult {
            kind: ExtractionKind::Single,
            candidates: vec![candidate("a", 0.4), candidate("b", 0.9), candidate("c", 0.9)],
        };
        assert_eq!(result.best().map(|c| c.scheme_id.as_str()), Some("b"));
        let ranked: Vec<&str> = result.ranked().iter().map(|c| c.scheme_id.as_str()).collect();
        assert_eq!(ranked, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_kind_serialization() {
        assert_eq!(serde_json::to_string(&ExtractionKind::Wrapped).unwrap(), "\"wrapped\"");
        assert_eq!(ExtractionKind::Multi.to_string(), "multi");
        assert_eq!("single".parse::<ExtractionKind>().unwrap(), ExtractionKind::Single);
    }
}
