//! `\name` / `\addr` sections, either as prefixes (`\name Jane Doe`) or
//! with arguments (`\name{Jane Doe}`).

use crate::latex::patterns::{TEXTSUPERSCRIPT, split_on_separator};
use crate::models::Author;

use super::SingleCommandScheme;
use super::refs::{AffRef, NameRef, join_by_ref};
use super::util::{Gap, contains_ci, join_adjacent, sanitize_text, split_on_commands, starts_with_ci};

const NAME: &str = r"\name";
const ADDR: &str = r"\addr";

/// Names in front of one or more `\addr` sections share those affiliations.
pub struct NameAddr;

impl SingleCommandScheme for NameAddr {
    const ID: &'static str = "NameAddr";

    fn validate(_cmd_name: &str, content: &str) -> bool {
        has_name_and_addr(content)
    }

    fn extract(_cmd_name: &str, content: &str) -> Vec<Author> {
        let mut authors = Vec::new();
        let mut names: Vec<String> = Vec::new();
        let mut affiliations: Vec<String> = Vec::new();

        for part in split_on_commands(&[NAME, ADDR], content) {
            if starts_with_ci(&part, NAME) {
                if !affiliations.is_empty() {
                    authors.extend(names.drain(..).map(|name| Author::new(name, affiliations.clone())));
                    affiliations.clear();
                }
                names.extend(
                    split_on_separator(&part[NAME.len()..])
                        .iter()
                        .map(|name| sanitize_text(name))
                        .filter(|name| !name.is_empty()),
                );
            } else if starts_with_ci(&part, ADDR) {
                affiliations.push(sanitize_text(&part[ADDR.len()..]));
            }
        }
        authors.extend(names.into_iter().map(|name| Author::new(name, affiliations.clone())));
        authors
    }
}

/// `\name{Jane Doe\textsuperscript{1}}` and `\addr{\textsuperscript{1}MIT}`.
pub struct NameAddrTextSuperScript;

impl SingleCommandScheme for NameAddrTextSuperScript {
    const ID: &'static str = "NameAddrTextSuperScript";

    fn validate(_cmd_name: &str, content: &str) -> bool {
        contains_ci(content, r"\textsuperscript") && has_name_and_addr(content)
    }

    fn extract(_cmd_name: &str, content: &str) -> Vec<Author> {
        let content = join_adjacent(content, &TEXTSUPERSCRIPT, Gap::Whitespace, |a, b| {
            format!(r"\textsuperscript{{{a},{b}}}")
        });

        let mut names = Vec::new();
        let mut affiliations = Vec::new();
        for part in split_on_commands(&[NAME, ADDR], &content) {
            let is_name = starts_with_ci(&part, NAME);
            if !is_name && !starts_with_ci(&part, ADDR) {
                continue;
            }
            let Some(mark) = TEXTSUPERSCRIPT.find(&part) else {
                continue;
            };
            let ref_id = mark.content_inner().trim();
            let prefix = if is_name { NAME.len() } else { ADDR.len() };
            let rest = part[prefix..].replace(mark.as_str(), "");

            if is_name {
                names.extend(
                    split_on_separator(&rest)
                        .into_iter()
                        .map(|name| NameRef::parse(name, ref_id)),
                );
            } else {
                affiliations.push(AffRef::new(rest, ref_id));
            }
        }

        join_by_ref(&names, &affiliations)
    }
}

fn has_name_and_addr(content: &str) -> bool {
    !contains_ci(content, r"\address") && contains_ci(content, NAME) && contains_ci(content, ADDR)
}
