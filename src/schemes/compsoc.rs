//! `\IEEEcompsocitemizethanks{}` with items written as sentences like
//! `J. Doe and J. Roe are with the University of X`.

use regex::Regex;
use std::sync::LazyLock;

use crate::latex::patterns::{COMPSOC_ITEMIZE, PREDICATIVE_EXPRESSIONS, split_on_separator};
use crate::models::Author;

use super::SingleCommandScheme;
use super::util::sanitize_text;

static COMPSOC_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\\ieeecompsocthanksitem").unwrap());

const ALL_AUTHORS: &[&str] = &["all authors", "all the authors", "authors"];

/// Names first, then `\IEEEcompsocitemizethanks{\IEEEcompsocthanksitem ...}`.
pub struct CompSocItemizeThanks;

impl SingleCommandScheme for CompSocItemizeThanks {
    const ID: &'static str = "CompSocItemizeThanks";

    fn validate(_cmd_name: &str, content: &str) -> bool {
        content.contains(r"\IEEEcompsocitemizethanks") && content.contains(r"\IEEEcompsocthanksitem")
    }

    fn extract(_cmd_name: &str, content: &str) -> Vec<Author> {
        extract_compsoc_thanks(content)
    }
}

/// Pairs the names in front of the itemize block with the `X is with Y`
/// sentences inside it.
pub(super) fn extract_compsoc_thanks(content: &str) -> Vec<Author> {
    let content = join_itemize(content);
    let Some(itemize) = COMPSOC_ITEMIZE.find(&content) else {
        return Vec::new();
    };

    let names = sanitize_text(&content.replace(itemize.as_str(), ""));
    let names = split_on_separator(&names);

    let mut matched: Vec<(String, Vec<String>)> = Vec::new();
    for item in COMPSOC_ITEM.split(itemize.content_inner()).map(str::trim) {
        if item.is_empty() {
            continue;
        }
        let Some((subject, affiliation)) = split_subject(item) else {
            continue;
        };
        let affiliation = sanitize_text(affiliation);
        if affiliation.is_empty() {
            continue;
        }
        for name in names_in_subject(&names, &sanitize_text(subject)) {
            let name = sanitize_text(name);
            match matched.iter_mut().find(|(known, _)| *known == name) {
                Some((_, affiliations)) if !affiliations.contains(&affiliation) => {
                    affiliations.push(affiliation.clone());
                }
                Some(_) => {}
                None => matched.push((name, vec![affiliation.clone()])),
            }
        }
    }

    matched
        .into_iter()
        .filter(|(name, _)| !name.is_empty())
        .map(|(name, affiliations)| Author::new(name, affiliations))
        .collect()
}

/// Merges every itemize block into the first one.
fn join_itemize(content: &str) -> String {
    let blocks = COMPSOC_ITEMIZE.find_iter(content);
    let (Some(first), Some(last)) = (blocks.first(), blocks.last()) else {
        return content.to_string();
    };
    let items: Vec<&str> = blocks.iter().map(|block| block.content_inner().trim()).collect();
    format!(
        r"{} \IEEEcompsocitemizethanks{{{}}} {}",
        &content[..first.start],
        items.join(" "),
        &content[last.end..]
    )
}

/// `X is with Y` → `(X, Y)`.
///
/// Items with more than one predicate (`X is with Y. She is also with Z`)
/// are skipped.
fn split_subject(item: &str) -> Option<(&str, &str)> {
    let parts: Vec<&str> = PREDICATIVE_EXPRESSIONS.split(item).collect();
    match parts.as_slice() {
        [subject, affiliation] => Some((subject.trim(), affiliation.trim())),
        _ => None,
    }
}

/// Names from `names` the sentence subject refers to: in full, by last name,
/// or collectively.
fn names_in_subject<'n>(names: &'n [String], subject: &str) -> Vec<&'n str> {
    let subject = subject.to_lowercase();
    if ALL_AUTHORS.contains(&subject.trim()) {
        return names.iter().map(String::as_str).collect();
    }

    names
        .iter()
        .filter(|name| {
            let lower = name.to_lowercase();
            if subject.contains(&lower) {
                return true;
            }
            // short names vary ("A. B. Doe", "A. Doe"), the last name does not
            let last_name = format!(" {}", lower.rsplit(' ').next().unwrap_or_default());
            subject.contains(&last_name)
                || subject.contains(&last_name.replace('-', " "))
                || subject.contains("the other authors")
        })
        .map(String::as_str)
        .collect()
}
