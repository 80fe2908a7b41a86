//! Scoring and matching of extracted data against reference data: the
//! declared author list of a paper and the organization registry.

pub mod affiliations;
pub mod authors;
pub mod fuzz;
pub mod score;

pub use affiliations::{AffiliationMatch, AffiliationMatcher, DEFAULT_TOP_K, OrganizationIndex};
pub use authors::{NameMatch, match_authors};
pub use score::{ScoreWeights, score_authors};
