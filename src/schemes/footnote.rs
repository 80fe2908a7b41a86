//! Schemes where the affiliation sits in a footnote.

use std::collections::HashMap;

use crate::latex::command::{split_after, split_before};
use crate::latex::patterns::{FOOTNOTE, FOOTNOTEMARK, split_on_separator};
use crate::latex::remove_latex_newlines;
use crate::models::Author;

use super::SingleCommandScheme;
use super::refs::{AffRef, NameRef, join_by_ref};
use super::util::{Gap, contains_ci, join_adjacent, sanitize_text, strip_outer};

/// Names marked with `\footnotemark[id]`, affiliation lines starting with the
/// same mark:
///
/// ```text
/// Jane Doe\footnotemark[1] \and John Roe\footnotemark[2] \\
/// \footnotemark[1] MIT \\ \footnotemark[2] ETH
/// ```
pub struct FootnoteMark;

impl SingleCommandScheme for FootnoteMark {
    const ID: &'static str = "FootnoteMark";

    fn validate(_cmd_name: &str, content: &str) -> bool {
        if !content.contains(r"\footnotemark") {
            return false;
        }

        let mut occurrences: HashMap<&str, usize> = HashMap::new();
        for mark in FOOTNOTEMARK.find_iter(content) {
            *occurrences.entry(mark.content()).or_default() += 1;
        }
        // once on an author and once on an affiliation
        !occurrences.is_empty() && occurrences.values().all(|&count| count >= 2)
    }

    fn extract(_cmd_name: &str, content: &str) -> Vec<Author> {
        let content = join_adjacent(strip_outer(content).trim(), &FOOTNOTEMARK, Gap::Whitespace, |a, b| {
            format!(r"\footnotemark[{a},{b}]")
        });

        let mut names = Vec::new();
        let mut affiliations = Vec::new();
        for part in content.split(r"\\") {
            let part = part.trim_matches(|c| c == '{' || c == ' ');
            if part.starts_with(r"\footnotemark") {
                affiliations.extend(
                    split_after(&FOOTNOTEMARK, part)
                        .into_iter()
                        .map(|(mark, name)| AffRef::new(name, mark.content_inner().trim())),
                );
            } else {
                names.extend(marked_names(part));
            }
        }

        join_by_ref(&names, &affiliations)
    }
}

/// Every name followed by `\footnote{affiliation}`.
pub struct Footnote;

impl SingleCommandScheme for Footnote {
    const ID: &'static str = "Footnote";

    fn validate(_cmd_name: &str, content: &str) -> bool {
        !contains_ci(content, r"\footnotemark") && contains_ci(content, r"\footnote")
    }

    fn extract(_cmd_name: &str, content: &str) -> Vec<Author> {
        let content = remove_latex_newlines(strip_outer(content).trim());

        split_before(&FOOTNOTE, &content)
            .into_iter()
            .filter_map(|(name, footnote)| {
                let name = sanitize_text(name);
                (!name.is_empty()).then(|| Author::new(name, [sanitize_text(footnote.content_inner())]))
            })
            .collect()
    }
}

/// `name\footnotemark[ids]` pairs; only the last name in front of each mark
/// counts.
fn marked_names(part: &str) -> Vec<NameRef> {
    split_before(&FOOTNOTEMARK, part)
        .into_iter()
        .filter_map(|(lead, mark)| {
            let name = split_on_separator(lead).pop()?;
            let ref_ids = mark
                .content_inner()
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .collect();
            Some(NameRef::new(name, ref_ids))
        })
        .collect()
}
