//! `\authorinfo{names}{affiliation}{email}` and its `\oneauthor` /
//! `\twoauthors` relatives. The e-mail argument is ignored.

use crate::latex::balanced::top_level_groups;
use crate::latex::patterns::{MATH_AFFILIATION, MATH_MODE, split_on_separator};
use crate::models::Author;

use super::SingleCommandScheme;
use super::refs::{AffRef, NameRef, join_by_ref};
use super::util::{sanitize_text, share_affiliation};

const INFO_COMMANDS: &[&str] = &["twoauthors", "oneauthor", "authorinfo"];

/// Names and one affiliation shared by all of them.
pub struct AuthorInfoSingle;

impl SingleCommandScheme for AuthorInfoSingle {
    const ID: &'static str = "AuthorInfoSingle";

    fn validate(cmd_name: &str, content: &str) -> bool {
        INFO_COMMANDS.contains(&cmd_name) && names_and_affiliation(content).is_some()
    }

    fn extract(_cmd_name: &str, content: &str) -> Vec<Author> {
        let Some((names, affiliation)) = names_and_affiliation(content) else {
            return Vec::new();
        };
        share_affiliation(split_on_separator(names), &sanitize_text(affiliation))
    }
}

/// `\authorinfo{Jane$^1$, John$^2$}{$^1$MIT $^2$ETH}{...}`
pub struct AuthorInfoMath;

impl SingleCommandScheme for AuthorInfoMath {
    const ID: &'static str = "AuthorInfoMath";

    fn validate(cmd_name: &str, content: &str) -> bool {
        cmd_name == "authorinfo" && MATH_MODE.is_match(content)
    }

    fn extract(_cmd_name: &str, content: &str) -> Vec<Author> {
        let Some((names, affiliation)) = names_and_affiliation(content) else {
            return Vec::new();
        };

        let names: Vec<NameRef> = split_on_separator(names.trim())
            .into_iter()
            .filter_map(|part| {
                let reference = MATH_MODE.captures(&part)?;
                let ref_ids = reference["cnt"].trim_matches(|c| matches!(c, '{' | '}' | '^' | ' '));
                Some(NameRef::parse(part.replace(&reference[0], ""), ref_ids))
            })
            .collect();

        let affiliations: Vec<AffRef> = MATH_AFFILIATION
            .captures_iter(affiliation.trim())
            .map(|caps| {
                let ref_id = caps["ref_id"].trim_matches(|c| matches!(c, '$' | '^' | '{' | '}' | ' '));
                AffRef::new(&caps["name"], ref_id)
            })
            .collect();

        join_by_ref(&names, &affiliations)
    }
}

/// Inner text of the first two argument groups.
fn names_and_affiliation(content: &str) -> Option<(&str, &str)> {
    let groups = top_level_groups(content);
    match groups.as_slice() {
        [names, affiliation, ..] => Some((names.inner(content), affiliation.inner(content))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_author_info_single() {
        let content = r"{Jane Doe and John Roe}{MIT, Cambridge}{jane@mit.edu}";
        assert!(AuthorInfoSingle::validate("authorinfo", content));
        assert!(AuthorInfoSingle::validate("twoauthors", content));
        assert!(!AuthorInfoSingle::validate("author", content));
        assert!(!AuthorInfoSingle::validate("authorinfo", "{Jane Doe}"));

        assert_eq!(
            AuthorInfoSingle::extract("authorinfo", content),
            vec![
                Author::new("Jane Doe", ["MIT, Cambridge"]),
                Author::new("John Roe", ["MIT, Cambridge"]),
            ]
        );
    }

    #[test]
    fn test_author_info_math() {
        let content = r"{Jane Doe$^1$ \and John Roe$^{2}$}{$^1$MIT $^2$ETH}{}";
        assert!(AuthorInfoMath::validate("authorinfo", content));
        assert!(!AuthorInfoMath::validate("oneauthor", content));

        assert_eq!(
            AuthorInfoMath::extract("authorinfo", content),
            vec![Author::new("Jane Doe", ["MIT"]), Author::new("John Roe", ["ETH"])]
        );
    }

    #[test]
    fn test_author_info_math_skips_names_without_reference() {
        let content = r"{Jane Doe$^1$, John Roe}{$^1$MIT}{}";
        assert_eq!(
            AuthorInfoMath::extract("authorinfo", content),
            vec![Author::new("Jane Doe", ["MIT"])]
        );
    }
}
