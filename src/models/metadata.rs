use serde::{Deserialize, Serialize};

use super::Author;

/// The declared metadata of a paper as stored next to its sources.
///
/// Only `authors` is used by the pipeline; the remaining fields are kept so
/// the file round-trips.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaperMetadata {
    pub paper_id: String,
    pub version: String,
    pub title: String,
    pub comment: String,
    pub journal_ref: String,
    pub doi: String,
    pub categories: Vec<String>,
    pub last_updated: String,
    pub published_on: String,
    pub authors: Vec<Author>,
}

impl PaperMetadata {
    pub fn author_names(&self) -> Vec<&str> {
        self.authors.iter().map(|author| author.name.as_str()).collect()
    }
}
