//! Schemes built around `\affiliation{}` and `\affiliations`.

use crate::latex::command::split_before;
use crate::latex::patterns::{AFFILIATION, MATH_AFFILIATION, MATH_AUTHOR_REF, split_on_separator};
use crate::latex::remove_latex_newlines;
use crate::models::Author;

use super::SingleCommandScheme;
use super::refs::{AffRef, NameRef, join_by_ref};
use super::util::{
    Gap, contains_ci, find_all_indices, join_adjacent, join_adjacent_math, math_mode_refs, sanitize_text,
    share_affiliation, strip_outer,
};

const MATH_REF_TRIM: &[char] = &['$', '^', '{', '}', ' '];

/// Names, each group followed by one or more `\affiliation{}`.
pub struct NameAffiliation;

impl SingleCommandScheme for NameAffiliation {
    const ID: &'static str = "NameAffiliation";

    fn validate(_cmd_name: &str, content: &str) -> bool {
        plain_affiliation(content)
    }

    fn extract(_cmd_name: &str, content: &str) -> Vec<Author> {
        let content = join_affiliations(&remove_latex_newlines(strip_outer(content).trim()));

        split_before(&AFFILIATION, &content)
            .into_iter()
            .flat_map(|(names, affiliation)| {
                let affiliation = sanitize_text(affiliation.content_inner().trim());
                share_affiliation(split_on_separator(names), &affiliation)
            })
            .collect()
    }
}

/// `Jane$^1$` on the names, `\affiliation{$^1$MIT}` for the affiliations.
pub struct AffiliationMath;

impl SingleCommandScheme for AffiliationMath {
    const ID: &'static str = "AffiliationMath";

    fn validate(_cmd_name: &str, content: &str) -> bool {
        plain_affiliation(content) && math_mode_refs(content) > 0
    }

    fn extract(_cmd_name: &str, content: &str) -> Vec<Author> {
        let content = remove_latex_newlines(strip_outer(content).trim());
        let content = join_affiliations(&join_adjacent_math(&content));

        let affiliations: Vec<AffRef> = AFFILIATION
            .find_iter(&content)
            .iter()
            .flat_map(|affiliation| math_affiliations(affiliation.content_inner().trim()))
            .collect();
        let names = math_names(&AFFILIATION.remove_all(&content));

        join_by_ref(&names, &affiliations)
    }
}

/// `Jane$^1$, John$^2$ \affiliations $^1$MIT $^2$ETH`
pub struct Affiliations;

impl SingleCommandScheme for Affiliations {
    const ID: &'static str = "Affiliations";

    fn validate(_cmd_name: &str, content: &str) -> bool {
        contains_ci(content, r"\affiliations")
    }

    fn extract(_cmd_name: &str, content: &str) -> Vec<Author> {
        let content = join_adjacent_math(strip_outer(content).trim());

        let mut bounds = find_all_indices(r"\affiliations", &content);
        let names_end = bounds.first().copied().unwrap_or(content.len());
        bounds.push(content.len());

        let names = math_names(&content[..names_end]);
        let affiliations: Vec<AffRef> = bounds
            .windows(2)
            .flat_map(|window| math_affiliations(&content[window[0] + r"\affiliations".len()..window[1]]))
            .collect();

        join_by_ref(&names, &affiliations)
    }
}

fn plain_affiliation(content: &str) -> bool {
    if contains_ci(content, r"\sup") || contains_ci(content, r"\authorname") {
        return false;
    }
    !contains_ci(content, r"\affiliations") && contains_ci(content, r"\affiliation")
}

fn join_affiliations(content: &str) -> String {
    join_adjacent(content, &AFFILIATION, Gap::LineBreakOrAnd, |a, b| format!(r"\affiliation{{{a}, {b}}}"))
}

fn math_affiliations(text: &str) -> Vec<AffRef> {
    MATH_AFFILIATION
        .captures_iter(text)
        .map(|caps| AffRef::new(&caps["name"], caps["ref_id"].trim_matches(MATH_REF_TRIM)))
        .collect()
}

fn math_names(text: &str) -> Vec<NameRef> {
    MATH_AUTHOR_REF
        .captures_iter(text)
        .map(|caps| NameRef::parse(&caps["name"], caps["ref_id"].trim_matches(MATH_REF_TRIM)))
        .collect()
}
