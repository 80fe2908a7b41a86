//! Schemes built around `\affil{}` (the `authblk` package).

use crate::latex::command::split_before;
use crate::latex::patterns::{AFFIL, INST, MATH_AFFILIATION, MATH_AUTHOR_REF, NAME, split_on_separator};
use crate::models::Author;

use super::SingleCommandScheme;
use super::refs::{AffRef, NameRef, join_by_ref};
use super::util::{
    Gap, contains_ci, find_all_indices, join_adjacent, join_adjacent_math, math_mode_refs, sanitize_text,
    share_affiliation, strip_outer,
};

const MATH_REF_TRIM: &[char] = &['$', '^', '{', '}', ' '];

/// Names, each group followed by `\affil{affiliation}`.
pub struct NameAffil;

impl SingleCommandScheme for NameAffil {
    const ID: &'static str = "NameAffil";

    fn validate(_cmd_name: &str, content: &str) -> bool {
        if contains_ci(content, r"\textsuperscript") || contains_ci(content, r"\inst") {
            return false;
        }
        math_mode_refs(content) == 0 && contains_ci(content, r"\affil")
    }

    fn extract(_cmd_name: &str, content: &str) -> Vec<Author> {
        let mut content = strip_outer(content).trim().to_string();
        if let Some(name) = NAME.find(&content) {
            let unwrapped = name.content_inner().trim().to_string();
            let range = name.start..name.end;
            content.replace_range(range, &unwrapped);
        }

        split_before(&AFFIL, &content)
            .into_iter()
            .flat_map(|(names, affil)| {
                let affiliation = sanitize_text(affil.content_inner());
                share_affiliation(split_on_separator(names.trim()), &affiliation)
            })
            .collect()
    }
}

/// `Jane\affil{1}` on the names, `\inst{1} MIT` for the affiliations.
pub struct AffilRefInst;

impl SingleCommandScheme for AffilRefInst {
    const ID: &'static str = "AffilRefInst";

    fn validate(_cmd_name: &str, content: &str) -> bool {
        contains_ci(content, r"\inst") && contains_ci(content, r"\affil")
    }

    fn extract(_cmd_name: &str, content: &str) -> Vec<Author> {
        let content = join_adjacent(content, &AFFIL, Gap::Whitespace, |a, b| format!(r"\affil{{{a},{b}}}"));

        let names: Vec<NameRef> = split_before(&AFFIL, &content)
            .into_iter()
            .map(|(name, affil)| NameRef::parse(name, affil.content_inner().trim()))
            .collect();

        join_by_ref(&names, &inst_affiliations(&content))
    }
}

/// `Jane$^1$` on the names, `\affil{$^1$ MIT}` for the affiliations.
pub struct AffilMath;

impl SingleCommandScheme for AffilMath {
    const ID: &'static str = "AffilMath";

    fn validate(_cmd_name: &str, content: &str) -> bool {
        if contains_ci(content, r"\textsuperscript") || contains_ci(content, r"\inst") {
            return false;
        }
        math_mode_refs(content) > 0 && contains_ci(content, r"\affil")
    }

    fn extract(_cmd_name: &str, content: &str) -> Vec<Author> {
        let content = join_adjacent_math(strip_outer(content).trim());

        let affiliations: Vec<AffRef> = AFFIL
            .find_iter(&content)
            .iter()
            .flat_map(|affil| {
                MATH_AFFILIATION
                    .captures_iter(affil.content_inner().trim())
                    .map(|caps| AffRef::new(&caps["name"], caps["ref_id"].trim_matches(MATH_REF_TRIM)))
                    .collect::<Vec<_>>()
            })
            .collect();

        let remaining = AFFIL.remove_all(&content);
        let names: Vec<NameRef> = MATH_AUTHOR_REF
            .captures_iter(&remaining)
            .map(|caps| NameRef::parse(&caps["name"], caps["ref_id"].trim_matches(MATH_REF_TRIM)))
            .collect();

        join_by_ref(&names, &affiliations)
    }
}

/// Segments from one `\inst{id}` to the next, each naming one affiliation.
fn inst_affiliations(content: &str) -> Vec<AffRef> {
    // the closing brace of the content is not part of the last affiliation
    let last = content.char_indices().last().map_or(0, |(index, _)| index);
    let mut bounds = find_all_indices(r"\inst{", content);
    bounds.push(last);

    bounds
        .windows(2)
        .filter(|window| window[0] < window[1])
        .filter_map(|window| {
            let part = &content[window[0]..window[1]];
            let inst = INST.find(part)?;
            Some(AffRef::new(part.replace(inst.as_str(), ""), inst.content_inner().trim()))
        })
        .collect()
}
