use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Id of the organization that stands for "no match". It is always the first
/// entry of a dataset.
pub const SENTINEL_ID: &str = "-1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchLocation {
    pub location_name: String,
    pub country_name: String,
}

/// An entry of the organization registry.
///
/// Equality and hashing only look at `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchOrganization {
    pub id: String,
    pub names: Vec<String>,
    #[serde(default)]
    pub locations: Vec<ResearchLocation>,
}

impl ResearchOrganization {
    pub fn sentinel() -> Self {
        Self {
            id: SENTINEL_ID.to_string(),
            names: vec![String::new()],
            locations: Vec::new(),
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.id == SENTINEL_ID
    }

    /// The id without its URL prefix: `https://ror.org/042nb2s44` → `042nb2s44`.
    pub fn short_id(&self) -> &str {
        let id = self.id.trim_end_matches('/');
        id.rsplit('/').next().unwrap_or(id)
    }
}

impl PartialEq for ResearchOrganization {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ResearchOrganization {}

impl Hash for ResearchOrganization {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
