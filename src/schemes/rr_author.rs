//! `\RRauthor{}` from the INRIA research report class. Authors are separated
//! by `\and` or commas, and an author without a `\thanks{}` belongs to INRIA.

use std::sync::LazyLock;

use crate::latex::command::{CommandPattern, OptionalArgs};
use crate::latex::patterns::{THANKS, THANKSREF, split_on_separator};
use crate::models::Author;

use super::SingleCommandScheme;
use super::util::{Gap, join_adjacent, sanitize_text, strip_outer};

pub const DEFAULT_AFFILIATION: &str = "French Institute for Research in Computer Science and Automation, France";

/// `\thanks[id]{...}` with the id optional.
static THANKS_WITH_ID: LazyLock<CommandPattern> =
    LazyLock::new(|| CommandPattern::builder("thanks").options(OptionalArgs::Flat).build().unwrap());

/// `\RRauthor{Jane Doe\thanks{MIT} \and John Roe}`
pub struct RrAuthorThanks;

impl SingleCommandScheme for RrAuthorThanks {
    const ID: &'static str = "RrAuthorThanks";

    fn validate(cmd_name: &str, content: &str) -> bool {
        let lower = content.to_ascii_lowercase();
        cmd_name == "rrauthor" && lower.contains(r"\thanks{") && !lower.contains(r"\thanksref{")
    }

    fn extract(_cmd_name: &str, content: &str) -> Vec<Author> {
        // the thanks text may contain the separator, so it is swapped for an
        // index before splitting
        let mut notes = Vec::new();
        let content = THANKS.replace_all(strip_outer(content).trim(), |thanks| {
            notes.push(sanitize_text(thanks.content_inner().trim()));
            format!(r" \thanks{{{}}} ", notes.len() - 1)
        });

        author_parts(&content)
            .into_iter()
            .map(|part| match THANKS.find(part) {
                Some(thanks) => {
                    let affiliation = thanks
                        .content_inner()
                        .parse::<usize>()
                        .ok()
                        .and_then(|index| notes.get(index))
                        .cloned()
                        .unwrap_or_default();
                    Author::new(sanitize_text(&part.replace(thanks.as_str(), "")), [affiliation])
                }
                None => Author::new(sanitize_text(part), [DEFAULT_AFFILIATION]),
            })
            .filter(|author| !author.name.is_empty())
            .collect()
    }
}

/// `\thanks[id]{affiliation}` once, `\thanksref{id}` for every other author
/// of that affiliation.
pub struct RrAuthorThanksRef;

impl SingleCommandScheme for RrAuthorThanksRef {
    const ID: &'static str = "RrAuthorThanksRef";

    fn validate(cmd_name: &str, content: &str) -> bool {
        let lower = content.to_ascii_lowercase();
        cmd_name == "rrauthor" && lower.contains(r"\thanks[") && lower.contains(r"\thanksref{")
    }

    fn extract(_cmd_name: &str, content: &str) -> Vec<Author> {
        let content = join_adjacent(content, &THANKSREF, Gap::Whitespace, |a, b| format!(r"\thanksref{{{a},{b}}}"));

        // every \thanks becomes a \thanksref; thanks without an id get a
        // placeholder
        let mut affiliations: Vec<(String, String)> = Vec::new();
        let content = THANKS_WITH_ID.replace_all(strip_outer(&content).trim(), |thanks| {
            let ref_id = thanks
                .first_option()
                .map(|id| id.trim().to_string())
                .unwrap_or_else(|| format!("rr-thanks-{}", affiliations.len()));
            affiliations.push((ref_id.clone(), sanitize_text(thanks.content_inner().trim())));
            format!(r" \thanksref{{{ref_id}}} ")
        });

        author_parts(&content)
            .into_iter()
            .filter_map(|part| {
                let Some(reference) = THANKSREF.find(part) else {
                    let name = sanitize_text(part);
                    return (!name.is_empty()).then(|| Author::new(name, [DEFAULT_AFFILIATION]));
                };
                let name = sanitize_text(&part.replace(reference.as_str(), ""));
                let ids: Vec<&str> = reference.content_inner().split(',').map(str::trim).collect();
                let matched = affiliations
                    .iter()
                    .filter(|(ref_id, _)| ids.contains(&ref_id.as_str()))
                    .map(|(_, affiliation)| affiliation.clone());
                (!name.is_empty()).then(|| Author::new(name, matched))
            })
            .collect()
    }
}

/// No `\thanks` at all: everyone belongs to the default affiliation.
pub struct RrAuthorNoThanks;

impl SingleCommandScheme for RrAuthorNoThanks {
    const ID: &'static str = "RrAuthorNoThanks";

    fn validate(cmd_name: &str, content: &str) -> bool {
        cmd_name == "rrauthor" && !content.to_ascii_lowercase().contains(r"\thanks")
    }

    fn extract(_cmd_name: &str, content: &str) -> Vec<Author> {
        split_on_separator(content)
            .iter()
            .map(|name| sanitize_text(name))
            .filter(|name| !name.is_empty())
            .map(|name| Author::new(name, [DEFAULT_AFFILIATION]))
            .collect()
    }
}

/// Splits on `\and ` when present, on commas otherwise.
fn author_parts(content: &str) -> Vec<&str> {
    let separator = if content.contains(r"\and ") { r"\and " } else { "," };
    content.split(separator).collect()
}
