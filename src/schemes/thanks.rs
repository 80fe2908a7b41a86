//! Schemes where the affiliations are written in `\thanks{}`.

use crate::latex::command::split_before;
use crate::latex::patterns::{MATH_AFFILIATION, MATH_AUTHOR_REF, MATH_MODE, PREDICATIVE_EXPRESSIONS, THANKS, split_on_separator};
use crate::models::Author;

use super::SingleCommandScheme;
use super::compsoc::extract_compsoc_thanks;
use super::refs::{AffRef, NameRef, join_by_ref};
use super::util::{contains_ci, join_adjacent_math, math_mode_refs, sanitize_text, strip_outer};

/// Every author is followed by `\thanks{affiliation}`.
pub struct Thanks;

impl SingleCommandScheme for Thanks {
    const ID: &'static str = "Thanks";

    fn validate(_cmd_name: &str, content: &str) -> bool {
        contains_ci(content, r"\thanks") && every_author_thanked(content)
    }

    fn extract(_cmd_name: &str, content: &str) -> Vec<Author> {
        let mut authors: Vec<(String, Vec<String>)> = Vec::new();
        for (name, thanks) in split_before(&THANKS, strip_outer(content)) {
            let name = sanitize_text(name);
            let affiliation = sanitize_text(thanks.content_inner());
            if !name.is_empty() {
                authors.push((name, vec![affiliation]));
            } else if let Some((_, affiliations)) = authors.last_mut() {
                // `Jane\thanks{A}\thanks{B}`
                affiliations.push(affiliation);
            }
        }
        authors
            .into_iter()
            .map(|(name, affiliations)| Author::new(name, affiliations))
            .collect()
    }
}

/// Names with `$^1$` references, the affiliations inside `\thanks{$^1$ MIT}`.
pub struct ThanksMath;

impl SingleCommandScheme for ThanksMath {
    const ID: &'static str = "ThanksMath";

    fn validate(_cmd_name: &str, content: &str) -> bool {
        contains_ci(content, r"\thanks") && math_mode_refs(content) > 0 && !PREDICATIVE_EXPRESSIONS.is_match(content)
    }

    fn extract(_cmd_name: &str, content: &str) -> Vec<Author> {
        let content = join_adjacent_math(content);

        let affiliations: Vec<AffRef> = THANKS
            .find_iter(&content)
            .iter()
            .flat_map(|thanks| {
                MATH_AFFILIATION
                    .captures_iter(thanks.content())
                    .map(|caps| {
                        let ref_id = caps["ref_id"].trim_matches(|c| matches!(c, '$' | '^' | '{' | '}' | '.' | ' '));
                        AffRef::new(&caps["name"], ref_id)
                    })
                    .collect::<Vec<_>>()
            })
            .collect();

        let remaining = THANKS.remove_all(&content);
        let names: Vec<NameRef> = MATH_AUTHOR_REF
            .captures_iter(&remaining)
            .map(|caps| {
                let ref_ids = caps["ref_id"].trim_matches(|c| matches!(c, '$' | '^' | '{' | '}' | ' '));
                NameRef::parse(&caps["name"], ref_ids)
            })
            .collect();

        join_by_ref(&names, &affiliations)
    }
}

/// Every author is followed by `\thanks{X is with Y}`.
pub struct ThanksWith;

impl SingleCommandScheme for ThanksWith {
    const ID: &'static str = "ThanksWith";

    fn validate(_cmd_name: &str, content: &str) -> bool {
        if !thanks_outside_ieee(content) {
            return false;
        }
        let predicative = THANKS
            .find_iter(content)
            .iter()
            .all(|thanks| PREDICATIVE_EXPRESSIONS.is_match(thanks.content_inner()));
        predicative && every_author_thanked(content)
    }

    fn extract(_cmd_name: &str, content: &str) -> Vec<Author> {
        split_before(&THANKS, strip_outer(content))
            .into_iter()
            .filter_map(|(name, thanks)| {
                let name = MATH_MODE.replace_all(name, "");
                let parts: Vec<&str> = PREDICATIVE_EXPRESSIONS.split(thanks.content_inner()).collect();
                let [_, affiliation] = parts.as_slice() else {
                    return None;
                };
                let name = sanitize_text(&name);
                (!name.is_empty()).then(|| Author::new(name, [sanitize_text(affiliation)]))
            })
            .collect()
    }
}

/// `\thanks{}` notes read like `\IEEEcompsocthanksitem`s.
pub struct ThanksWithMath;

impl SingleCommandScheme for ThanksWithMath {
    const ID: &'static str = "ThanksWithMath";

    fn validate(_cmd_name: &str, content: &str) -> bool {
        thanks_outside_ieee(content)
    }

    fn extract(_cmd_name: &str, content: &str) -> Vec<Author> {
        let content = MATH_MODE.replace_all(strip_outer(content).trim(), "");

        let mut items = Vec::new();
        let names = THANKS.replace_all(&content, |thanks| {
            items.push(format!(r"\IEEEcompsocthanksitem {}", thanks.content_inner().trim()));
            String::new()
        });

        extract_compsoc_thanks(&format!(r"{{{names} \IEEEcompsocitemizethanks{{{}}}}}", items.join(" ")))
    }
}

fn thanks_outside_ieee(content: &str) -> bool {
    contains_ci(content, r"\thanks") && !contains_ci(content, r"\ieeecompsoc") && !contains_ci(content, "authorblock")
}

/// Whether every name has a `\thanks{}`. The notes are emptied first since
/// they may contain separators.
fn every_author_thanked(content: &str) -> bool {
    let emptied = THANKS.replace_all(content, |_| r"\thanks{}".to_string());
    split_on_separator(&emptied)
        .iter()
        .all(|part| contains_ci(part, r"\thanks{}"))
}
