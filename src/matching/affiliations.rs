//! Fuzzy matching of extracted affiliation strings against the organization
//! registry.
//!
//! Every affiliation is searched in two steps. `partial_ratio` finds the
//! index names that occur somewhere inside the affiliation, which favors
//! short names: "Techno" scores perfectly inside any "... Technology".
//! The best `top_k` of those are then ranked again with `ratio` over the
//! whole string so that a full name like "Georgia Institute of Technology"
//! wins over its fragments.

use anyhow::{Context, Result, bail};
use dashmap::DashMap;
use log::debug;
use rayon::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::models::ResearchOrganization;

use super::fuzz::{PartialRatio, preprocess, ratio};

/// Number of `partial_ratio` hits re-ranked by `ratio`.
pub const DEFAULT_TOP_K: usize = 10;

/// The organizations with one preprocessed entry per name.
#[derive(Debug)]
pub struct OrganizationIndex {
    organizations: Vec<ResearchOrganization>,
    entries: Vec<IndexEntry>,
}

#[derive(Debug)]
struct IndexEntry {
    organization: usize,
    name: String,
}

impl OrganizationIndex {
    /// Reads a dataset written by [`crate::pipeline::OrganizationDataset::save`].
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read organization dataset {}", path.display()))?;
        let organizations: Vec<ResearchOrganization> = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse organization dataset {}", path.display()))?;
        Self::new(organizations).with_context(|| format!("Invalid organization dataset {}", path.display()))
    }

    /// Builds the index. The first organization has to be the sentinel.
    pub fn new(organizations: Vec<ResearchOrganization>) -> Result<Self> {
        match organizations.first() {
            Some(first) if first.is_sentinel() => {}
            Some(first) => bail!("expected the sentinel organization first, found '{}'", first.id),
            None => bail!("the dataset is empty"),
        }

        // Names without a letter or digit process to nothing.
        let entries = organizations
            .iter()
            .enumerate()
            .flat_map(|(organization, org)| {
                org.names.iter().filter_map(move |name| {
                    let name = preprocess(name);
                    (!name.is_empty()).then_some(IndexEntry { organization, name })
                })
            })
            .collect();

        Ok(Self { organizations, entries })
    }

    pub fn organizations(&self) -> &[ResearchOrganization] {
        &self.organizations
    }

    pub fn sentinel(&self) -> &ResearchOrganization {
        &self.organizations[0]
    }

    /// Number of searchable names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The organization an affiliation resolved to, by position in
/// [`OrganizationIndex::organizations`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffiliationMatch {
    pub organization: usize,
    pub score: f64,
}

impl AffiliationMatch {
    const UNMATCHED: Self = Self {
        organization: 0,
        score: 0.0,
    };

    pub fn is_sentinel(&self) -> bool {
        self.organization == 0
    }
}

/// Memoizing matcher over a shared [`OrganizationIndex`].
pub struct AffiliationMatcher {
    index: Arc<OrganizationIndex>,
    top_k: usize,
    memo: DashMap<String, AffiliationMatch>,
}

impl AffiliationMatcher {
    pub fn new(index: Arc<OrganizationIndex>, top_k: usize) -> Self {
        Self {
            index,
            top_k: top_k.max(1),
            memo: DashMap::new(),
        }
    }

    pub fn index(&self) -> &OrganizationIndex {
        &self.index
    }

    pub fn organization(&self, found: &AffiliationMatch) -> &ResearchOrganization {
        self.index
            .organizations
            .get(found.organization)
            .unwrap_or_else(|| self.index.sentinel())
    }

    /// Resolves one affiliation, computing it at most once per string.
    ///
    /// Two threads asking for the same new string may both compute it; the
    /// results are identical.
    pub fn match_affiliation(&self, affiliation: &str) -> AffiliationMatch {
        if let Some(found) = self.memo.get(affiliation) {
            return *found;
        }
        let found = self.search(affiliation);
        *self.memo.entry(affiliation.to_string()).or_insert(found)
    }

    /// Resolves all `affiliations` in parallel.
    pub fn match_all<'a, I>(&self, affiliations: I) -> HashMap<String, AffiliationMatch>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let affiliations: Vec<&str> = affiliations.into_iter().collect();
        affiliations
            .par_iter()
            .map(|affiliation| (affiliation.to_string(), self.match_affiliation(affiliation)))
            .collect()
    }

    /// Number of memoized affiliations.
    pub fn memoized(&self) -> usize {
        self.memo.len()
    }

    fn search(&self, affiliation: &str) -> AffiliationMatch {
        let query = preprocess(affiliation);
        if query.is_empty() {
            debug!("Affiliation '{}' is empty after preprocessing", affiliation);
            return AffiliationMatch::UNMATCHED;
        }

        let mut best: Option<(f64, usize)> = None;
        for entry_index in self.top_partial_matches(&query) {
            let entry = &self.index.entries[entry_index];
            let score = ratio(&entry.name, &query);
            if best.is_none_or(|(best_score, _)| score > best_score) {
                best = Some((score, entry.organization));
            }
        }

        match best {
            Some((score, organization)) => AffiliationMatch { organization, score },
            None => AffiliationMatch::UNMATCHED,
        }
    }

    /// Indices of the `top_k` entries with the highest `partial_ratio`.
    /// Earlier entries win ties.
    fn top_partial_matches(&self, query: &str) -> Vec<usize> {
        let query = PartialRatio::new(query);
        let mut top: Vec<(f64, usize)> = Vec::with_capacity(self.top_k + 1);
        for (entry_index, entry) in self.index.entries.iter().enumerate() {
            let score = query.similarity(&entry.name);
            if top.len() == self.top_k && top.last().is_some_and(|(lowest, _)| score <= *lowest) {
                continue;
            }
            let position = top.partition_point(|(existing, _)| *existing >= score);
            top.insert(position, (score, entry_index));
            top.truncate(self.top_k);
        }
        top.into_iter().map(|(_, entry_index)| entry_index).collect()
    }
}
