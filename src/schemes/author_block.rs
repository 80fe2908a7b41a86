//! Schemes for the IEEE `\IEEEauthorblockN{names}` / `\IEEEauthorblockA{affiliation}`
//! layout, with and without references.

use std::sync::LazyLock;

use crate::latex::command::{CommandPattern, split_after, split_before};
use crate::latex::patterns::{AUTHORREFMARK, MATH_AFFILIATION, MATH_AUTHOR_REF, split_on_separator};
use crate::latex::remove_latex_newlines;
use crate::models::Author;

use super::SingleCommandScheme;
use super::refs::{AffRef, NameRef, join_by_ref};
use super::util::{Gap, contains_ci, join_adjacent, join_adjacent_math, math_mode_refs, sanitize_text, share_affiliation};

static AUTHOR_BLOCK: LazyLock<CommandPattern> =
    LazyLock::new(|| CommandPattern::builder("(?:ieee)?authorblock[an]").build().unwrap());

static AUTHOR_BLOCK_A: LazyLock<CommandPattern> =
    LazyLock::new(|| CommandPattern::builder("(?:ieee)?authorblocka").build().unwrap());

static AUTHOR_BLOCK_N: LazyLock<CommandPattern> =
    LazyLock::new(|| CommandPattern::builder("(?:ieee)?authorblockn").build().unwrap());

const MATH_REF_TRIM: &[char] = &['$', '^', '{', '}', ' '];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Names,
    Affiliation,
}

#[derive(Debug, Clone, Copy)]
struct Block<'a> {
    kind: BlockKind,
    content: &'a str,
}

fn author_blocks(text: &str) -> Vec<Block<'_>> {
    AUTHOR_BLOCK
        .find_iter(text)
        .iter()
        .map(|found| Block {
            kind: if found.name().to_ascii_lowercase().ends_with('n') {
                BlockKind::Names
            } else {
                BlockKind::Affiliation
            },
            content: found.content_inner().trim(),
        })
        .collect()
}

fn has_name_and_affiliation_blocks(content: &str) -> bool {
    contains_ci(content, "authorblockn") && contains_ci(content, "authorblocka")
}

/// Name blocks, each section closed by the affiliation block after it.
pub struct AuthorBlock;

impl SingleCommandScheme for AuthorBlock {
    const ID: &'static str = "AuthorBlock";

    fn validate(_cmd_name: &str, content: &str) -> bool {
        has_name_and_affiliation_blocks(content)
    }

    fn extract(_cmd_name: &str, content: &str) -> Vec<Author> {
        // consecutive A blocks split one affiliation (or hold e-mails), consecutive
        // N blocks share the next affiliation
        let content = join_adjacent(content, &AUTHOR_BLOCK_A, Gap::Whitespace, |a, b| {
            format!(r"\authorblockA{{{a}, {b}}}")
        });
        let content = join_adjacent(&content, &AUTHOR_BLOCK_N, Gap::Whitespace, |a, b| {
            format!(r"\authorblockN{{{a}, {b}}}")
        });

        let mut authors = Vec::new();
        let mut names: Vec<String> = Vec::new();
        let mut affiliation = String::new();
        for block in author_blocks(&content) {
            match block.kind {
                BlockKind::Affiliation => affiliation = sanitize_text(block.content),
                BlockKind::Names => {
                    if !affiliation.is_empty() {
                        authors.extend(share_affiliation(&names, &affiliation));
                        affiliation.clear();
                    }
                    names = split_on_separator(block.content);
                }
            }
        }
        if !affiliation.is_empty() {
            authors.extend(share_affiliation(&names, &affiliation));
        }
        authors
    }
}

/// `Jane\IEEEauthorrefmark{1}` in name blocks and
/// `\IEEEauthorrefmark{1} MIT` in affiliation blocks.
pub struct AuthorBlockWithRef;

impl SingleCommandScheme for AuthorBlockWithRef {
    const ID: &'static str = "AuthorBlockWithRef";

    fn validate(_cmd_name: &str, content: &str) -> bool {
        if !has_name_and_affiliation_blocks(content) || !contains_ci(content, "authorrefmark") {
            return false;
        }
        let blocks = author_blocks(content);
        let Some(last) = blocks.last() else {
            return false;
        };
        // a trailing block of e-mails carries no reference
        let trailing_emails =
            last.kind == BlockKind::Names && last.content.contains('@') && !contains_ci(last.content, "authorrefmark");
        let end = if trailing_emails { blocks.len() - 1 } else { blocks.len() };
        blocks[..end]
            .iter()
            .all(|block| contains_ci(block.content, "authorrefmark"))
    }

    fn extract(_cmd_name: &str, content: &str) -> Vec<Author> {
        let content = join_adjacent(&remove_latex_newlines(content), &AUTHORREFMARK, Gap::Whitespace, |a, b| {
            format!(r"\authorrefmark{{{a},{b}}}")
        });

        let mut names = Vec::new();
        let mut affiliations = Vec::new();
        for block in author_blocks(&content) {
            match block.kind {
                BlockKind::Names => names.extend(split_before(&AUTHORREFMARK, block.content).into_iter().map(
                    |(name, mark)| {
                        let ref_ids = mark
                            .content_inner()
                            .split(',')
                            .map(str::trim)
                            .filter(|id| !id.is_empty())
                            .map(str::to_string)
                            .collect();
                        NameRef::new(name.trim(), ref_ids)
                    },
                )),
                BlockKind::Affiliation => affiliations.extend(
                    split_after(&AUTHORREFMARK, block.content)
                        .into_iter()
                        .map(|(mark, name)| AffRef::new(name, mark.content_inner().trim())),
                ),
            }
        }
        join_by_ref(&names, &affiliations)
    }
}

/// Author blocks linked by math mode ids: `Jane$^1$` and `$^1$MIT`.
pub struct AuthorBlockMath;

impl SingleCommandScheme for AuthorBlockMath {
    const ID: &'static str = "AuthorBlockMath";

    fn validate(_cmd_name: &str, content: &str) -> bool {
        if math_mode_refs(content) == 0 || !has_name_and_affiliation_blocks(content) {
            return false;
        }
        if contains_ci(content, "authorrefmark") {
            return false;
        }
        author_blocks(content).iter().all(|block| block.content.contains('$'))
    }

    fn extract(_cmd_name: &str, content: &str) -> Vec<Author> {
        let mut names = Vec::new();
        let mut affiliations = Vec::new();
        for block in author_blocks(content) {
            match block.kind {
                BlockKind::Names => {
                    let joined = join_adjacent_math(block.content);
                    names.extend(MATH_AUTHOR_REF.captures_iter(&joined).filter_map(|caps| {
                        let name = caps["name"].trim_matches(|c| c == ',' || c == ' ');
                        let refs = caps["ref_id"].trim_matches(MATH_REF_TRIM);
                        (!name.is_empty() && !refs.is_empty()).then(|| NameRef::parse(name, refs))
                    }));
                }
                BlockKind::Affiliation => affiliations.extend(
                    MATH_AFFILIATION
                        .captures_iter(block.content)
                        .map(|caps| AffRef::new(&caps["name"], caps["ref_id"].trim_matches(MATH_REF_TRIM))),
                ),
            }
        }
        join_by_ref(&names, &affiliations)
    }
}
