use serde::{Deserialize, Serialize};

/// An author together with the affiliations found for them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    #[serde(default)]
    pub affiliations: Vec<String>,
}

impl Author {
    /// Creates an author; empty affiliation strings are dropped.
    pub fn new<S, I, A>(name: S, affiliations: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Self {
            name: name.into(),
            affiliations: affiliations
                .into_iter()
                .map(Into::<String>::into)
                .filter(|affiliation| !affiliation.is_empty())
                .collect(),
        }
    }

    pub fn without_affiliation(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            affiliations: Vec::new(),
        }
    }

    pub fn has_affiliation(&self) -> bool {
        !self.affiliations.is_empty()
    }
}

/// Same name and the same affiliations, counted with repetition. Order does
/// not matter.
impl PartialEq for Author {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && sorted(&self.affiliations) == sorted(&other.affiliations)
    }
}

impl Eq for Author {}

fn sorted(affiliations: &[String]) -> Vec<&str> {
    let mut sorted: Vec<&str> = affiliations.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    sorted
}
