//! Stage 3: pair extracted authors with the declared ones and resolve
//! their affiliations to organizations.

use anyhow::{Context, Result};
use log::{debug, warn};
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::matching::{AffiliationMatcher, match_authors};
use crate::models::{
    ExtractionCandidate, ExtractionResult, MatchedAffiliation, MatchedAuthor, MatchedPaper, PaperMetadata,
};

use super::Outcome;
use super::files::{
    EXTRACTED_DATA_FILE, MATCHED_DATA_FILE, METADATA_FILE, artifact_exists, paper_id, read_artifact,
    read_optional_artifact, write_artifact,
};

/// Every affiliation of the best candidates of papers that still need
/// matching.
pub fn collect_affiliations(paper_dirs: &[PathBuf]) -> BTreeSet<String> {
    paper_dirs
        .par_iter()
        .map(|paper_dir| match paper_affiliations(paper_dir) {
            Ok(affiliations) => affiliations,
            Err(err) => {
                warn!("{}: {:#}", paper_id(paper_dir), err);
                Vec::new()
            }
        })
        .flatten()
        .collect()
}

fn paper_affiliations(paper_dir: &Path) -> Result<Vec<String>> {
    if artifact_exists(paper_dir, MATCHED_DATA_FILE) {
        return Ok(Vec::new());
    }
    let Some(result) = read_optional_artifact::<ExtractionResult>(paper_dir, EXTRACTED_DATA_FILE)? else {
        return Ok(Vec::new());
    };
    Ok(result
        .best()
        .map(|best| {
            best.authors
                .iter()
                .flat_map(|author| author.affiliations.iter().cloned())
                .collect()
        })
        .unwrap_or_default())
}

/// Writes `matched_data.json` for one paper unless it already exists.
pub fn match_paper(paper_dir: &Path, matcher: &AffiliationMatcher) -> Result<Outcome> {
    let id = paper_id(paper_dir);
    if artifact_exists(paper_dir, MATCHED_DATA_FILE) {
        debug!("{}: already matched", id);
        return Ok(Outcome::Skipped);
    }
    let Some(result) = read_optional_artifact::<ExtractionResult>(paper_dir, EXTRACTED_DATA_FILE)? else {
        debug!("{}: nothing extracted", id);
        return Ok(Outcome::Empty);
    };
    let Some(best) = result.best() else {
        debug!("{}: extraction has no candidates", id);
        return Ok(Outcome::Empty);
    };
    let metadata: PaperMetadata =
        read_artifact(paper_dir, METADATA_FILE).with_context(|| format!("{id}: cannot match without metadata"))?;

    let matched = match_candidate(&metadata, best, matcher);
    if matched.matched_authors.is_empty() {
        debug!("{}: no declared author could be matched", id);
        return Ok(Outcome::Empty);
    }

    write_artifact(paper_dir, MATCHED_DATA_FILE, &matched)?;
    Ok(Outcome::Written)
}

/// Pairs the declared authors with the candidate's authors and resolves the
/// affiliations of every pair.
pub fn match_candidate(
    metadata: &PaperMetadata,
    candidate: &ExtractionCandidate,
    matcher: &AffiliationMatcher,
) -> MatchedPaper {
    let matched_authors = match_authors(&metadata.authors, &candidate.authors)
        .into_iter()
        .map(|name_match| MatchedAuthor {
            declared_name: name_match.declared.name.clone(),
            extracted_name: name_match.extracted.name.clone(),
            name_score: name_match.score,
            affiliations: name_match
                .extracted
                .affiliations
                .iter()
                .map(|affiliation| {
                    let found = matcher.match_affiliation(affiliation);
                    MatchedAffiliation {
                        extracted_name: affiliation.clone(),
                        organization: matcher.organization(&found).clone(),
                        aff_score: found.score,
                    }
                })
                .collect(),
        })
        .collect();
    MatchedPaper { matched_authors }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::{DEFAULT_TOP_K, OrganizationIndex};
    use crate::models::{Author, ExtractionKind, ResearchOrganization};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn matcher() -> AffiliationMatcher {
        let organizations = vec![
            ResearchOrganization::sentinel(),
            ResearchOrganization {
                id: "https://ror.org/042nb2s44".to_string(),
                names: vec!["Massachusetts Institute of Technology".to_string(), "MIT".to_string()],
                locations: Vec::new(),
            },
            ResearchOrganization {
                id: "https://ror.org/05a28rw58".to_string(),
                names: vec!["ETH Zurich".to_string()],
                locations: Vec::new(),
            },
        ];
        AffiliationMatcher::new(Arc::new(OrganizationIndex::new(organizations).unwrap()), DEFAULT_TOP_K)
    }

    fn paper(declared: &[&str], extracted: Vec<Author>) -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let metadata = PaperMetadata {
            authors: declared.iter().map(|name| Author::without_affiliation(*name)).collect(),
            ..PaperMetadata::default()
        };
        write_artifact(temp_dir.path(), METADATA_FILE, &metadata).unwrap();
        let result = ExtractionResult {
            kind: ExtractionKind::Single,
            candidates: vec![ExtractionCandidate {
                scheme_id: "AffAddr".to_string(),
                authors: extracted,
                score: 1.0,
            }],
        };
        write_artifact(temp_dir.path(), EXTRACTED_DATA_FILE, &result).unwrap();
        temp_dir
    }

    #[test]
    fn test_match_paper() {
        let temp_dir = paper(
            &["Jane Doe", "John Roe"],
            vec![
                Author::new("J. Roe", ["ETH Zurich, Switzerland"]),
                Author::new("Jane Doe", ["MIT"]),
            ],
        );
        let matcher = matcher();
        assert_eq!(match_paper(temp_dir.path(), &matcher).unwrap(), Outcome::Written);

        let matched: MatchedPaper = read_artifact(temp_dir.path(), MATCHED_DATA_FILE).unwrap();
        let summary: Vec<(&str, &str, &str)> = matched
            .matched_authors
            .iter()
            .map(|author| {
                (
                    author.declared_name.as_str(),
                    author.extracted_name.as_str(),
                    author.affiliations[0].organization.short_id(),
                )
            })
            .collect();
        assert_eq!(
            summary,
            vec![("Jane Doe", "Jane Doe", "042nb2s44"), ("John Roe", "J. Roe", "05a28rw58")]
        );
        assert_eq!(matched.matched_authors[0].name_score, 1.0);

        assert_eq!(match_paper(temp_dir.path(), &matcher).unwrap(), Outcome::Skipped);
    }

    #[test]
    fn test_collect_affiliations_skips_matched_papers() {
        let first = paper(&["Jane Doe"], vec![Author::new("Jane Doe", ["MIT", "ETH Zurich"])]);
        let second = paper(&["John Roe"], vec![Author::new("John Roe", ["MIT"])]);
        let done = paper(&["Ann Lee"], vec![Author::new("Ann Lee", ["Harvard University"])]);
        write_artifact(done.path(), MATCHED_DATA_FILE, &MatchedPaper::default()).unwrap();

        let dirs: Vec<PathBuf> = [&first, &second, &done].iter().map(|dir| dir.path().to_path_buf()).collect();
        let affiliations: Vec<String> = collect_affiliations(&dirs).into_iter().collect();
        assert_eq!(affiliations, vec!["ETH Zurich", "MIT"]);
    }

    #[test]
    fn test_match_paper_without_extraction() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(match_paper(temp_dir.path(), &matcher()).unwrap(), Outcome::Empty);
    }
}
