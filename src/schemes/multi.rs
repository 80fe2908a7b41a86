//! Schemes for authorship spread over several commands.

use regex::Regex;
use std::sync::LazyLock;

use crate::latex::balanced::curly_group;
use crate::latex::command::{CommandMatch, CommandPattern, OptionalArgs};
use crate::latex::patterns::{INST, split_on_separator};
use crate::models::Author;

use super::MultiCommandScheme;
use super::refs::{AffRef, NameRef, join_by_ref};
use super::util::{command_content, command_name, contains_ci, sanitize_text, strip_outer};

static AUTHOR_WITH_OPTION: LazyLock<CommandPattern> = LazyLock::new(|| {
    CommandPattern::builder("author")
        .star()
        .options(OptionalArgs::Flat)
        .build()
        .unwrap()
});

static ADDRESS_WITH_OPTION: LazyLock<CommandPattern> =
    LazyLock::new(|| CommandPattern::builder("address").options(OptionalArgs::Flat).build().unwrap());

static RSUPER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\s*\\rsuper\s*").unwrap());

static LSUPER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^\\lsuper\s*").unwrap());

static ICML_AUTHOR: LazyLock<CommandPattern> = LazyLock::new(|| {
    CommandPattern::builder("icmlauthor")
        .max_args(2)
        .spaced_args()
        .build()
        .unwrap()
});

static ICML_AFFILIATION: LazyLock<CommandPattern> = LazyLock::new(|| {
    CommandPattern::builder("icml(?:affiliation|address)")
        .max_args(2)
        .spaced_args()
        .build()
        .unwrap()
});

const SEQUENCE_AUTHORS: &[&str] = &["author", "authorname", "name"];

const SEQUENCE_AFFILIATIONS: &[&str] = &["address", "affaddr", "affil", "affiliation", "institute", "institution"];

/// Marks that link names to affiliations by id, which a plain sequence
/// cannot honor. `\inst{}` is checked separately since it prefixes
/// `\institute` and `\institution`.
const REFERENCE_MARKS: &[&str] = &[
    "$^",
    r"\textsuperscript",
    r"\affmark",
    r"\thanks",
    r"\footnote",
    r"\rsuper",
    r"\lsuper",
];

/// `\author[1]{Jane Doe}` and `\address[1]{MIT}`.
pub struct OptionalArgumentId;

impl MultiCommandScheme for OptionalArgumentId {
    const ID: &'static str = "OptionalArgumentId";

    fn validate(commands: &[String]) -> bool {
        let mut authors = 0;
        let mut addresses = 0;
        for command in commands {
            if optional_id(&AUTHOR_WITH_OPTION, command).is_some() {
                authors += 1;
            } else if optional_id(&ADDRESS_WITH_OPTION, command).is_some() {
                addresses += 1;
            } else {
                return false;
            }
        }
        authors > 0 && addresses > 0
    }

    fn extract(commands: &[String]) -> Vec<Author> {
        let mut names = Vec::new();
        let mut affiliations = Vec::new();
        for command in commands {
            if let Some(found) = optional_id(&AUTHOR_WITH_OPTION, command) {
                let ids = found.first_option().unwrap_or_default();
                names.push(NameRef::parse(found.content_inner(), ids.trim()));
            } else if let Some(found) = optional_id(&ADDRESS_WITH_OPTION, command) {
                let id = found.first_option().unwrap_or_default();
                affiliations.push(AffRef::new(found.content_inner(), id.trim()));
            }
        }
        join_by_ref(&names, &affiliations)
    }
}

/// `\author[short]{Jane Doe\rsuper a}` and `\address{{\lsuper a}MIT}`.
pub struct LeftRightSuper;

impl MultiCommandScheme for LeftRightSuper {
    const ID: &'static str = "LeftRightSuper";

    fn validate(commands: &[String]) -> bool {
        commands.iter().any(|command| contains_ci(command, r"\rsuper"))
            && commands.iter().any(|command| contains_ci(command, r"\lsuper"))
    }

    fn extract(commands: &[String]) -> Vec<Author> {
        let mut names = Vec::new();
        let mut affiliations = Vec::new();
        for command in commands {
            match command_name(command).to_lowercase().as_str() {
                "author" => {
                    let Some(found) = AUTHOR_WITH_OPTION.find(command) else {
                        continue;
                    };
                    let mut parts = RSUPER.splitn(found.content_inner(), 2);
                    let (Some(name), Some(id)) = (parts.next(), parts.next()) else {
                        continue;
                    };
                    names.push(NameRef::parse(name, id.trim_matches(|c| c == '{' || c == '}' || c == ' ')));
                }
                "address" => {
                    if let Some(affiliation) = left_super_affiliation(command) {
                        affiliations.push(affiliation);
                    }
                }
                _ => {}
            }
        }
        join_by_ref(&names, &affiliations)
    }
}

/// `\author{Jane Doe, John Roe} \affiliation{MIT} \author{Ann Lee}
/// \affiliation{ETH}`: every affiliation belongs to the names since the
/// previous affiliation.
pub struct AuthorAffiliationSequence;

impl MultiCommandScheme for AuthorAffiliationSequence {
    const ID: &'static str = "AuthorAffiliationSequence";

    fn validate(commands: &[String]) -> bool {
        if commands.len() < 2 {
            return false;
        }
        let kinds: Vec<Option<SequenceKind>> = commands.iter().map(|command| SequenceKind::of(command)).collect();
        if kinds.iter().any(Option::is_none) || kinds.first() != Some(&Some(SequenceKind::Names)) {
            return false;
        }
        if !kinds.contains(&Some(SequenceKind::Affiliation)) {
            return false;
        }
        !commands.iter().any(|command| {
            INST.is_match(command) || REFERENCE_MARKS.iter().any(|mark| contains_ci(command, mark))
        })
    }

    fn extract(commands: &[String]) -> Vec<Author> {
        let mut authors = Vec::new();
        let mut names: Vec<String> = Vec::new();
        let mut affiliations: Vec<String> = Vec::new();

        for command in commands {
            let content = command_content(command);
            let text = strip_outer(&content);
            match SequenceKind::of(command) {
                Some(SequenceKind::Names) => {
                    if !affiliations.is_empty() {
                        authors.extend(names.drain(..).map(|name| Author::new(name, affiliations.clone())));
                        affiliations.clear();
                    }
                    names.extend(
                        split_on_separator(text)
                            .iter()
                            .map(|name| sanitize_text(name))
                            .filter(|name| !name.is_empty()),
                    );
                }
                Some(SequenceKind::Affiliation) => affiliations.push(sanitize_text(text)),
                None => {}
            }
        }
        authors.extend(names.into_iter().map(|name| Author::new(name, affiliations.clone())));
        authors
    }
}

/// `\icmlauthor{Jane Doe}{mit,eth}` and `\icmlaffiliation{mit}{MIT}`.
pub struct IcmlAuthors;

impl MultiCommandScheme for IcmlAuthors {
    const ID: &'static str = "IcmlAuthors";

    fn validate(commands: &[String]) -> bool {
        commands.iter().any(|command| two_args(&ICML_AUTHOR, command).is_some())
            && commands.iter().any(|command| two_args(&ICML_AFFILIATION, command).is_some())
    }

    fn extract(commands: &[String]) -> Vec<Author> {
        let mut names = Vec::new();
        let mut affiliations = Vec::new();
        for command in commands {
            if let Some((name, keys)) = two_args(&ICML_AUTHOR, command) {
                let keys = keys
                    .split(',')
                    .map(str::trim)
                    .filter(|key| !key.is_empty())
                    .map(str::to_string)
                    .collect();
                names.push(NameRef::new(name, keys));
            } else if let Some((key, affiliation)) = two_args(&ICML_AFFILIATION, command) {
                affiliations.push(AffRef::new(affiliation, key.trim()));
            }
        }
        join_by_ref(&names, &affiliations)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SequenceKind {
    Names,
    Affiliation,
}

impl SequenceKind {
    fn of(command: &str) -> Option<Self> {
        let name = command_name(command).to_lowercase();
        if SEQUENCE_AUTHORS.contains(&name.as_str()) {
            Some(Self::Names)
        } else if SEQUENCE_AFFILIATIONS.contains(&name.as_str()) {
            Some(Self::Affiliation)
        } else {
            None
        }
    }
}

/// The command at the start of `command` when it has an optional argument.
fn optional_id<'c>(pattern: &CommandPattern, command: &'c str) -> Option<CommandMatch<'c>> {
    pattern
        .find(command)
        .filter(|found| found.start == 0 && found.first_option().is_some_and(|id| !id.trim().is_empty()))
}

fn two_args<'c>(pattern: &CommandPattern, command: &'c str) -> Option<(&'c str, &'c str)> {
    let found = pattern.find(command).filter(|found| found.start == 0)?;
    Some((found.arg_inner(0)?, found.arg_inner(1)?))
}

/// `\address{{\lsuper a}MIT}` → `MIT` with id `a`.
fn left_super_affiliation(command: &str) -> Option<AffRef> {
    let content = command_content(command);
    let inner = strip_outer(&content).trim_start();
    let label = curly_group(inner, 0)?;
    let id = LSUPER.replace(label.inner(inner).trim(), "");
    let id = id.trim_matches(|c| c == '{' || c == '}' || c == ' ');
    Some(AffRef::new(&inner[label.end..], id))
}
