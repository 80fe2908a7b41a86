//! Linking authors to affiliations through shared reference ids such as
//! `$^{1,2}$`, `\affmark[a]` or `\inst{3}`.

use crate::latex::patterns::MATH_MODE;
use crate::models::Author;

use super::util::{sanitize_text, split_ref_commands};

/// An author name together with the ids it refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameRef {
    pub name: String,
    pub ref_ids: Vec<String>,
}

impl NameRef {
    pub fn new(name: impl Into<String>, ref_ids: Vec<String>) -> Self {
        Self {
            name: name.into(),
            ref_ids,
        }
    }

    /// Builds the ids from a raw reference string via [`split_ref_strings`].
    pub fn parse(name: impl Into<String>, raw_refs: &str) -> Self {
        Self::new(name, split_ref_strings(raw_refs))
    }
}

/// An affiliation name with the id authors use to point at it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffRef {
    pub name: String,
    pub ref_id: String,
}

impl AffRef {
    pub fn new(name: impl Into<String>, ref_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ref_id: ref_id.into(),
        }
    }
}

/// Resolves every name's ids against the affiliations. Names and affiliations
/// are sanitized; affiliations that end up empty are dropped, as are authors
/// without a name.
pub fn join_by_ref(names: &[NameRef], affiliations: &[AffRef]) -> Vec<Author> {
    let affiliations: Vec<(String, &str)> = affiliations
        .iter()
        .map(|aff| (sanitize_text(&aff.name), aff.ref_id.as_str()))
        .filter(|(name, _)| !name.is_empty())
        .collect();

    names
        .iter()
        .filter_map(|name_ref| {
            let name = sanitize_text(&name_ref.name);
            if name.is_empty() {
                return None;
            }
            let affs = affiliations
                .iter()
                .filter(|(_, ref_id)| name_ref.ref_ids.iter().any(|id| id == ref_id))
                .map(|(aff, _)| aff.clone());
            Some(Author::new(name, affs))
        })
        .collect()
}

/// Decomposes a raw reference string into its ids.
///
/// `"1,2"` → `["1", "2"]`, `"\dag\ddag"` → `["\dag", "\ddag"]`,
/// `"1*"` → `["*", "1"]`, `"$a$$b$"` → `["$a$", "$b$"]`.
pub fn split_ref_strings(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    if raw.chars().count() == 1 {
        return vec![raw.to_string()];
    }
    if raw.contains(',') {
        return split_trimmed(raw, ',');
    }
    if raw.contains('$') {
        return MATH_MODE.find_iter(raw).map(|m| m.as_str().to_string()).collect();
    }
    if raw.contains('\\') {
        let commands = split_ref_commands("\\", raw);
        let command_len: usize = commands.iter().map(String::len).sum();
        if command_len == raw.replace(' ', "").len() {
            return commands;
        }
        let rest = commands.iter().fold(raw.to_string(), |rest, command| rest.replace(command.as_str(), ""));
        let mut ids = split_ref_strings(rest.trim());
        ids.extend(commands);
        return ids;
    }
    if raw.contains(' ') {
        return split_trimmed(raw, ' ');
    }
    if raw.contains('*') {
        let mut ids = vec!["*".to_string()];
        ids.extend(split_ref_strings(&raw.replace('*', "")));
        return ids;
    }
    vec![raw.to_string()]
}

fn split_trimmed(raw: &str, separator: char) -> Vec<String> {
    raw.split(separator)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn test_split_ref_strings() {
        assert_eq!(split_ref_strings("a"), ids(&["a"]));
        assert_eq!(split_ref_strings("1, 2,,3"), ids(&["1", "2", "3"]));
        assert_eq!(split_ref_strings("$a$$b$"), ids(&["$a$", "$b$"]));
        assert_eq!(split_ref_strings(r"\dag\ddag"), ids(&[r"\dag", r"\ddag"]));
        assert_eq!(split_ref_strings(r"1 \dag"), ids(&["1", r"\dag"]));
        assert_eq!(split_ref_strings("a b"), ids(&["a", "b"]));
        assert_eq!(split_ref_strings("1*"), ids(&["*", "1"]));
        assert_eq!(split_ref_strings("12"), ids(&["12"]));
        assert!(split_ref_strings("").is_empty());
    }

    #[test]
    fn test_join_by_ref() {
        let names = vec![NameRef::parse("Jane Doe", "1,2"), NameRef::parse("John Roe", "2")];
        let affs = vec![AffRef::new("MIT", "1"), AffRef::new("ETH Zürich.", "2"), AffRef::new(r"\email{x}", "3")];
        let authors = join_by_ref(&names, &affs);
        assert_eq!(
            authors,
            vec![Author::new("Jane Doe", ["MIT", "ETH Zürich"]), Author::new("John Roe", ["ETH Zürich"])]
        );
    }

    #[test]
    fn test_join_by_ref_is_order_independent() {
        let names = vec![NameRef::parse("A", "1,2"), NameRef::parse("B", "2")];
        let affs = vec![AffRef::new("X", "1"), AffRef::new("Y", "2")];
        let forward = join_by_ref(&names, &affs);

        let reversed: Vec<AffRef> = affs.iter().rev().cloned().collect();
        assert_eq!(join_by_ref(&names, &reversed), forward, "affiliation order must not matter");
    }

    #[test]
    fn test_unresolved_reference_gives_no_affiliation() {
        let authors = join_by_ref(&[NameRef::parse("A", "9")], &[AffRef::new("X", "1")]);
        assert_eq!(authors, vec![Author::without_affiliation("A")]);
        assert!(join_by_ref(&[NameRef::parse("  ", "1")], &[]).is_empty());
    }
}
