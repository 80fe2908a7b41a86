use crate::latex::command::{CommandPattern, split_before};
use crate::latex::patterns::{AFFILIATION, AUTHORNAME, SUP, split_on_separator};
use crate::models::Author;

use super::SingleCommandScheme;
use super::refs::{AffRef, NameRef, join_by_ref};
use super::util::{Gap, contains_ci, join_adjacent, sanitize_text, share_affiliation, split_ref_commands, strip_outer};

/// `\authorname{Jane\sup{1}, John\sup{2}}` with `\affiliation{\sup{1}MIT \sup{2}ETH}`.
///
/// Without any `\sup{}` and a single `\affiliation{}` every name shares that
/// affiliation.
pub struct AuthorNameAffiliation;

impl SingleCommandScheme for AuthorNameAffiliation {
    const ID: &'static str = "AuthorNameAffiliation";

    fn validate(_cmd_name: &str, content: &str) -> bool {
        contains_ci(content, r"\authorname") && contains_ci(content, r"\affiliation")
    }

    fn extract(_cmd_name: &str, content: &str) -> Vec<Author> {
        let content = join_adjacent(strip_outer(content).trim(), &SUP, Gap::Whitespace, |a, b| {
            format!(r"\sup{{{a},{b}}}")
        });
        if !content.contains(r"\sup{") && content.matches(r"\affiliation{").count() == 1 {
            return first_names_with_first_affiliation(&content, &AUTHORNAME, &AFFILIATION);
        }

        let names: Vec<NameRef> = AUTHORNAME
            .find_iter(&content)
            .iter()
            .flat_map(|authorname| {
                split_before(&SUP, authorname.content_inner().trim())
                    .into_iter()
                    .map(|(name, sup)| NameRef::parse(name, sup.content_inner().trim()))
                    .collect::<Vec<_>>()
            })
            .collect();

        let affiliations: Vec<AffRef> = AFFILIATION
            .find_iter(&content)
            .iter()
            .flat_map(|affiliation| split_ref_commands(r"\sup", affiliation.content_inner().trim()))
            .filter_map(|part| {
                let sup = SUP.find(&part)?;
                Some(AffRef::new(part.replace(sup.as_str(), "").trim(), sup.content_inner().trim()))
            })
            .collect();

        join_by_ref(&names, &affiliations)
    }
}

/// Names from the first `names` command, all sharing the affiliation of the
/// first `affiliation` command.
pub(super) fn first_names_with_first_affiliation(
    content: &str,
    names: &CommandPattern,
    affiliation: &CommandPattern,
) -> Vec<Author> {
    let (Some(names), Some(affiliation)) = (names.find(content), affiliation.find(content)) else {
        return Vec::new();
    };
    let affiliation = sanitize_text(affiliation.content_inner());
    share_affiliation(split_on_separator(names.content_inner().trim()), &affiliation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_affiliation_without_references() {
        let content = r"{\authorname{Jane Doe, John Roe} \affiliation{MIT}}";
        assert!(AuthorNameAffiliation::validate("author", content));
        assert_eq!(
            AuthorNameAffiliation::extract("author", content),
            vec![Author::new("Jane Doe", ["MIT"]), Author::new("John Roe", ["MIT"])]
        );
    }

    #[test]
    fn test_sup_references() {
        let content = r"{\authorname{Jane Doe\sup{1}\sup{2}, John Roe\sup{2}} \affiliation{\sup{1}MIT \sup{2}ETH}}";
        assert_eq!(
            AuthorNameAffiliation::extract("author", content),
            vec![Author::new("Jane Doe", ["MIT", "ETH"]), Author::new("John Roe", ["ETH"])]
        );
    }
}
