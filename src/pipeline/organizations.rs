//! Preparation of the organization dataset from a raw ROR dump.

use anyhow::{Context, Result};
use log::info;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::models::{ResearchLocation, ResearchOrganization};

/// Names this short are mostly acronyms that match everywhere.
const MIN_NAME_CHARS: usize = 5;

/// The organization list the match stage reads, sentinel first.
#[derive(Debug, Clone, PartialEq)]
pub struct OrganizationDataset {
    organizations: Vec<ResearchOrganization>,
}

#[derive(Debug, Deserialize)]
struct RawOrganization {
    id: String,
    #[serde(default)]
    names: Vec<RawName>,
    #[serde(default)]
    locations: Vec<RawLocation>,
}

#[derive(Debug, Deserialize)]
struct RawName {
    #[serde(default)]
    value: String,
}

#[derive(Debug, Deserialize)]
struct RawLocation {
    #[serde(default)]
    geonames_details: RawGeonames,
}

#[derive(Debug, Default, Deserialize)]
struct RawGeonames {
    #[serde(default)]
    name: String,
    #[serde(default)]
    country_name: String,
}

impl From<RawOrganization> for ResearchOrganization {
    fn from(raw: RawOrganization) -> Self {
        Self {
            id: raw.id,
            names: raw
                .names
                .into_iter()
                .map(|name| name.value)
                .filter(|name| name.chars().count() >= MIN_NAME_CHARS)
                .collect(),
            locations: raw
                .locations
                .into_iter()
                .map(|location| ResearchLocation {
                    location_name: location.geonames_details.name,
                    country_name: location.geonames_details.country_name,
                })
                .collect(),
        }
    }
}

impl OrganizationDataset {
    /// Reads a ROR schema v2 JSON dump.
    pub fn from_ror_dump(path: &Path) -> Result<Self> {
        let json =
            fs::read_to_string(path).with_context(|| format!("Failed to read ROR dump {}", path.display()))?;
        let raw: Vec<RawOrganization> =
            serde_json::from_str(&json).with_context(|| format!("Failed to parse ROR dump {}", path.display()))?;
        info!("Read {} organizations from {}", raw.len(), path.display());
        Ok(Self::from_organizations(raw.into_iter().map(ResearchOrganization::from)))
    }

    /// Prepends the sentinel to `organizations`.
    pub fn from_organizations(organizations: impl IntoIterator<Item = ResearchOrganization>) -> Self {
        let organizations = std::iter::once(ResearchOrganization::sentinel())
            .chain(organizations.into_iter().filter(|org| !org.is_sentinel()))
            .collect();
        Self { organizations }
    }

    pub fn organizations(&self) -> &[ResearchOrganization] {
        &self.organizations
    }

    pub fn into_organizations(self) -> Vec<ResearchOrganization> {
        self.organizations
    }

    /// Writes the dataset as the JSON array read by
    /// [`crate::matching::OrganizationIndex::load`].
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string(&self.organizations).context("Failed to serialize organizations")?;
        fs::write(path, json).with_context(|| format!("Failed to write organization dataset {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::OrganizationIndex;
    use tempfile::TempDir;

    const DUMP: &str = r#"[
      {
        "id": "https://ror.org/042nb2s44",
        "names": [
          {"value": "Massachusetts Institute of Technology", "types": ["ror_display", "label"], "lang": "en"},
          {"value": "MIT", "types": ["acronym"], "lang": null}
        ],
        "locations": [
          {"geonames_id": 4931972, "geonames_details": {"name": "Cambridge", "country_name": "United States", "country_code": "US"}}
        ],
        "status": "active"
      },
      {
        "id": "https://ror.org/05a28rw58",
        "names": [{"value": "ETH Zurich"}]
      }
    ]"#;

    #[test]
    fn test_from_ror_dump() {
        let temp_dir = TempDir::new().unwrap();
        let dump = temp_dir.path().join("v1.50-ror-data_schema_v2.json");
        fs::write(&dump, DUMP).unwrap();

        let dataset = OrganizationDataset::from_ror_dump(&dump).unwrap();
        let organizations = dataset.organizations();
        assert_eq!(organizations.len(), 3);
        assert!(organizations[0].is_sentinel());

        let mit = &organizations[1];
        assert_eq!(mit.short_id(), "042nb2s44");
        assert_eq!(mit.names, vec!["Massachusetts Institute of Technology"]);
        assert_eq!(
            mit.locations,
            vec![ResearchLocation {
                location_name: "Cambridge".to_string(),
                country_name: "United States".to_string(),
            }]
        );
        assert_eq!(organizations[2].names, vec!["ETH Zurich"]);
        assert!(organizations[2].locations.is_empty());
    }

    #[test]
    fn test_saved_dataset_loads_as_index() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ror").join("ror.json");
        let dataset = OrganizationDataset::from_organizations([ResearchOrganization {
            id: "https://ror.org/05a28rw58".to_string(),
            names: vec!["ETH Zurich".to_string()],
            locations: Vec::new(),
        }]);
        dataset.save(&path).unwrap();

        let index = OrganizationIndex::load(&path).unwrap();
        assert_eq!(index.organizations(), dataset.organizations());
    }

    #[test]
    fn test_invalid_dump() {
        let temp_dir = TempDir::new().unwrap();
        let dump = temp_dir.path().join("dump.json");
        fs::write(&dump, r#"{"id": "not a list"}"#).unwrap();
        assert!(OrganizationDataset::from_ror_dump(&dump).is_err());
    }
}
