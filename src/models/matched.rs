use serde::{Deserialize, Serialize};

use super::ResearchOrganization;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedAffiliation {
    pub extracted_name: String,
    pub organization: ResearchOrganization,
    pub aff_score: f64,
}

/// A declared author paired with the extracted author it was matched to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedAuthor {
    pub declared_name: String,
    pub extracted_name: String,
    pub name_score: f64,
    pub affiliations: Vec<MatchedAffiliation>,
}

/// Final per-paper record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchedPaper {
    pub matched_authors: Vec<MatchedAuthor>,
}
