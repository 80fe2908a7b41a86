//! Schemes built around `\affaddr{}`, as used by the ACM `sig-alternate`
//! class.

use crate::latex::command::split_before;
use crate::latex::patterns::{AFFADDR, AFFMARK, ALIGNAUTHOR, MATH_AUTHOR_REF, MATH_MODE, split_on_separator};
use crate::models::Author;

use super::SingleCommandScheme;
use super::refs::{AffRef, NameRef, join_by_ref};
use super::util::{
    Gap, contains_ci, find_all_indices, join_adjacent, join_adjacent_math, math_mode_refs, sanitize_text, share_affiliation,
    split_lines, starts_with_ci, strip_outer,
};

const NAME_TRIM: &[char] = &['{', '}', ',', '\\', ' '];

/// Each author starts with `\alignauthor`; the `\affaddr{}` lines that follow
/// make up the affiliation.
pub struct AlignAuthorAffAddr;

impl SingleCommandScheme for AlignAuthorAffAddr {
    const ID: &'static str = "AlignAuthorAffAddr";

    fn validate(_cmd_name: &str, content: &str) -> bool {
        contains_ci(content, r"\alignauthor") && contains_ci(content, r"\affaddr")
    }

    fn extract(_cmd_name: &str, content: &str) -> Vec<Author> {
        let mut authors = Vec::new();
        for part in strip_outer(content).split(r"\alignauthor").map(str::trim) {
            if part.is_empty() {
                continue;
            }
            let affiliation_parts: Vec<&str> = AFFADDR
                .find_iter(part)
                .iter()
                .map(|found| found.content_inner().trim())
                .filter(|aff| !aff.is_empty())
                .collect();
            let affiliation = sanitize_text(&affiliation_parts.join(", "));

            let names_only = AFFADDR.remove_all(part);
            for line in split_lines(&names_only) {
                authors.extend(share_affiliation(split_on_separator(line), &affiliation));
            }
        }
        authors
    }
}

/// `Jane\affmark[1], John\affmark[2]` followed by
/// `\affaddr{\affmark[1]MIT}\affaddr{\affmark[2]ETH}`.
pub struct AffMarkAffAddr;

impl SingleCommandScheme for AffMarkAffAddr {
    const ID: &'static str = "AffMarkAffAddr";

    fn validate(_cmd_name: &str, content: &str) -> bool {
        let every_affaddr_marked = AFFADDR
            .find_iter(content)
            .iter()
            .all(|found| contains_ci(found.as_str(), r"\affmark"));
        every_affaddr_marked && contains_ci(content, r"\affmark") && contains_ci(content, r"\affaddr")
    }

    fn extract(_cmd_name: &str, content: &str) -> Vec<Author> {
        let content = join_affmarks(content);

        let mut affiliations = Vec::new();
        let mut consumed = Vec::new();
        for found in AFFADDR.find_iter(&content) {
            let inner = found.content_inner().trim();
            if contains_ci(inner, r"\affaddr") {
                // \affaddr{\affaddr{...}, \affaddr{...}}
                for nested in AFFADDR.find_iter(inner) {
                    affiliations.push(marked_affiliation(nested.content_inner().trim()));
                    consumed.push(nested.as_str());
                }
            } else {
                affiliations.push(marked_affiliation(inner));
                consumed.push(found.as_str());
            }
        }
        let names = consumed
            .iter()
            .fold(content.clone(), |names, affaddr| names.replace(affaddr, ""));

        join_by_ref(&marked_names(&names), &affiliations)
    }
}

/// `\affmark[]` on names and on plain affiliation lines.
pub struct AffMarkNoAffAddr;

impl SingleCommandScheme for AffMarkNoAffAddr {
    const ID: &'static str = "AffMarkNoAffAddr";

    fn validate(_cmd_name: &str, content: &str) -> bool {
        contains_ci(content, r"\affmark") && !contains_ci(content, r"\affaddr")
    }

    fn extract(_cmd_name: &str, content: &str) -> Vec<Author> {
        let content = join_affmarks(content);

        let mut names = Vec::new();
        let mut affiliations = Vec::new();
        for line in content.split(r"\\").map(str::trim) {
            if line.starts_with(r"\affmark") {
                affiliations.push(marked_affiliation(line));
            } else {
                names.extend(marked_names(line));
            }
        }
        join_by_ref(&names, &affiliations)
    }
}

/// Plain names with `\affaddr{}` lines.
///
/// The lines are read as one of:
/// - `[names, affaddr]`
/// - names followed by a block of `\affaddr` lines that form one affiliation
/// - `[names, affaddr, affaddr, names, affaddr, ...]`
pub struct AffAddr;

impl SingleCommandScheme for AffAddr {
    const ID: &'static str = "AffAddr";

    fn validate(_cmd_name: &str, content: &str) -> bool {
        if contains_ci(content, r"\affmark") || contains_ci(content, r"\alignauthor") {
            return false;
        }
        contains_ci(content, r"\affaddr")
    }

    fn extract(_cmd_name: &str, content: &str) -> Vec<Author> {
        let lines = affaddr_lines(strip_outer(content));
        let parts: Vec<&str> = lines.iter().map(String::as_str).collect();
        match parts.len() {
            0 => Vec::new(),
            2 => single_affiliation(&parts),
            _ if has_affaddr_block(&parts) => affaddr_block(&parts),
            _ => ordered(&parts),
        }
    }
}

/// `\affaddr{$^1$ MIT}` with `$^1$` on the names.
pub struct AffAddrMathMode;

impl SingleCommandScheme for AffAddrMathMode {
    const ID: &'static str = "AffAddrMathMode";

    fn validate(_cmd_name: &str, content: &str) -> bool {
        contains_ci(content, r"\affaddr") && !contains_ci(content, r"\affmark") && math_mode_refs(content) > 0
    }

    fn extract(_cmd_name: &str, content: &str) -> Vec<Author> {
        let content = join_adjacent_math(strip_outer(content).trim());
        if content.contains(r"\alignauthor{") {
            return alignauthor_blocks(&content);
        }
        affaddr_math(&content)
    }
}

fn join_affmarks(content: &str) -> String {
    join_adjacent(content, &AFFMARK, Gap::Whitespace, |a, b| format!(r"\affmark[{a},{b}]"))
}

/// `\affmark[1]MIT` → affiliation `MIT` with id `1`.
fn marked_affiliation(text: &str) -> AffRef {
    match AFFMARK.find(text) {
        Some(mark) => {
            let name = text.replace(mark.as_str(), "");
            AffRef::new(name.trim_matches(NAME_TRIM), mark.content_inner().trim())
        }
        None => AffRef::new(text.trim_matches(NAME_TRIM), ""),
    }
}

/// Every `name\affmark[ids]` pair in `text`.
fn marked_names(text: &str) -> Vec<NameRef> {
    split_before(&AFFMARK, text)
        .into_iter()
        .map(|(lead, mark)| NameRef::parse(lead.trim_matches(NAME_TRIM), mark.content_inner().trim()))
        .collect()
}

fn single_affiliation(parts: &[&str]) -> Vec<Author> {
    let Some(found) = AFFADDR.find(parts[1]) else {
        return Vec::new();
    };
    let affiliation = sanitize_text(found.content_inner());
    share_affiliation(split_on_separator(parts[0]), &affiliation)
}

/// Lines split on `\\`, with a line break added in front of every `\affaddr`
/// that does not start a line.
fn affaddr_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    for line in split_lines(text) {
        let mut bounds = vec![0];
        bounds.extend(find_all_indices(r"\affaddr", line));
        bounds.push(line.len());
        lines.extend(
            bounds
                .windows(2)
                .map(|window| line[window[0]..window[1]].trim())
                .filter(|piece| !piece.is_empty())
                .map(str::to_string),
        );
    }
    lines
}

/// Whether every line after the first `\affaddr` line is an `\affaddr` line.
fn has_affaddr_block(parts: &[&str]) -> bool {
    if parts.len() < 3 {
        return false;
    }
    let mut in_block = false;
    for part in &parts[1..] {
        if starts_with_ci(part, r"\affaddr") {
            in_block = true;
        } else if in_block {
            return false;
        }
    }
    true
}

/// Text after a leading `\affaddr`; the argument may lack braces.
fn affaddr_argument(part: &str) -> &str {
    part.get(r"\affaddr".len()..).unwrap_or_default()
}

fn affaddr_block(parts: &[&str]) -> Vec<Author> {
    let mut names = Vec::new();
    let mut affiliation_parts = Vec::new();
    for part in parts {
        if starts_with_ci(part, r"\affaddr") {
            affiliation_parts.push(affaddr_argument(part).trim_matches(|c| c == '{' || c == '}' || c == ' '));
        } else {
            names.extend(split_on_separator(part));
        }
    }
    let affiliation = sanitize_text(&affiliation_parts.join(", "));
    share_affiliation(names, &affiliation)
}

fn ordered(parts: &[&str]) -> Vec<Author> {
    let mut authors = Vec::new();
    let mut names: Vec<String> = Vec::new();
    let mut affiliations: Vec<String> = Vec::new();
    for part in parts {
        if starts_with_ci(part, r"\affaddr") {
            affiliations.push(sanitize_text(affaddr_argument(part)));
            continue;
        }
        if !names.is_empty() && !affiliations.is_empty() {
            authors.extend(names.drain(..).map(|name| Author::new(name, affiliations.clone())));
            affiliations.clear();
        }
        names.extend(
            split_on_separator(part)
                .iter()
                .map(|name| sanitize_text(name))
                .filter(|name| !name.is_empty()),
        );
    }
    authors.extend(names.into_iter().map(|name| Author::new(name, affiliations.clone())));
    authors
}

fn alignauthor_blocks(content: &str) -> Vec<Author> {
    let mut authors = Vec::new();
    for block in ALIGNAUTHOR.find_iter(content) {
        let inner = block.content_inner();
        let affaddr_count = inner.to_ascii_lowercase().matches("affaddr").count();
        if inner.contains('$') || affaddr_count != 1 {
            authors.extend(affaddr_math(inner));
            continue;
        }
        // one shared affiliation, no references
        let Some(found) = AFFADDR.find(inner) else {
            continue;
        };
        let affiliation = sanitize_text(found.content_inner());
        let rest = format!("{}{}", &inner[..found.start], &inner[found.end..]);
        for line in split_lines(&rest) {
            authors.extend(share_affiliation(split_on_separator(line), &affiliation));
        }
    }
    authors
}

fn affaddr_math(content: &str) -> Vec<Author> {
    let mut affiliations = Vec::new();
    let mut names = content.to_string();
    for found in AFFADDR.find_iter(content) {
        names = names.replace(found.as_str(), "");
        let affiliation = found.content_inner();
        let Some(reference) = MATH_MODE.captures(affiliation) else {
            continue;
        };
        let ref_id = reference["cnt"].trim_matches(|c| matches!(c, '{' | '}' | '^' | ' '));
        affiliations.push(AffRef::new(affiliation.replace(&reference[0], ""), ref_id));
    }

    let names = names.strip_prefix(r"\alignauthor ").unwrap_or(&names);
    let name_refs: Vec<NameRef> = MATH_AUTHOR_REF
        .captures_iter(names)
        .filter(|caps| !caps["name"].is_empty())
        .map(|caps| {
            let refs = caps["ref_id"].trim_matches(|c| matches!(c, '$' | '{' | '}' | '^' | ' '));
            NameRef::parse(&caps["name"], refs)
        })
        .collect();

    join_by_ref(&name_refs, &affiliations)
}
