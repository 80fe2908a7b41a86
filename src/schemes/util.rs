//! Text helpers shared by the extraction schemes.

use regex::Regex;
use std::sync::LazyLock;

use crate::latex::balanced::top_level_groups;
use crate::latex::collapse_whitespace;
use crate::latex::command::CommandPattern;
use crate::latex::patterns::{
    AUTHOR, EMAIL, FOOTNOTE, FOOTNOTEMARK, INST, INSTITUTION, SEPARATOR_COMMANDS, TEXTSUPERSCRIPT,
    THANKS, TITLENOTE,
};
use crate::models::Author;

/// Two math mode groups next to each other: `$^1$ $^2$`.
static MATH_MODE_PAIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$(?P<first>[^$]+)\$\s*\$(?P<second>[^$]+)\$").unwrap());

/// Characters removed from both halves before two commands are joined.
const JOIN_TRIM: &[char] = &['{', '}', '\\', '^', ' '];

/// What may sit between two commands that are joined into one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gap {
    Whitespace,
    /// Whitespace, optionally with one `\\` or `\and`.
    LineBreakOrAnd,
}

impl Gap {
    fn allows(self, between: &str) -> bool {
        let between = between.trim();
        match self {
            Gap::Whitespace => between.is_empty(),
            Gap::LineBreakOrAnd => {
                between.is_empty() || between == r"\\" || between.eq_ignore_ascii_case(r"\and")
            }
        }
    }
}

/// Case-insensitive substring test for ASCII needles.
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_ascii_lowercase().contains(&needle.to_ascii_lowercase())
}

/// Case-insensitive prefix test for ASCII prefixes.
pub fn starts_with_ci(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// Number of `$^` and `${}^` math mode references.
pub fn math_mode_refs(content: &str) -> usize {
    content.matches("$^").count() + content.matches("${}^").count()
}

/// Drops the first and the last character, normally the outer braces.
pub fn strip_outer(content: &str) -> &str {
    let mut chars = content.chars();
    chars.next();
    chars.next_back();
    chars.as_str()
}

/// Start offsets of every non-overlapping, case-insensitive occurrence of
/// `term` in `text`.
pub fn find_all_indices(term: &str, text: &str) -> Vec<usize> {
    if term.is_empty() || text.is_empty() {
        return Vec::new();
    }
    let text = text.to_ascii_lowercase();
    let term = term.to_ascii_lowercase();
    text.match_indices(&term).map(|(index, _)| index).collect()
}

/// `"\cmd{1} aff1 \cmd{2} aff2"` → `["\cmd{1} aff1", "\cmd{2} aff2"]`.
///
/// Text in front of the first occurrence is dropped.
pub fn split_ref_commands(command: &str, text: &str) -> Vec<String> {
    let mut bounds = find_all_indices(command, text);
    bounds.push(text.len());
    bounds
        .windows(2)
        .map(|window| text[window[0]..window[1]].trim().to_string())
        .collect()
}

/// Splits `text` in front of every occurrence of any of `commands`. Empty
/// parts are dropped; the text in front of the first command is kept.
pub fn split_on_commands(commands: &[&str], text: &str) -> Vec<String> {
    let mut parts = vec![text.to_string()];
    for command in commands {
        parts = parts
            .iter()
            .flat_map(|part| {
                let mut bounds = vec![0];
                bounds.extend(find_all_indices(command, part));
                bounds.push(part.len());
                bounds
                    .windows(2)
                    .map(|window| part[window[0]..window[1]].trim().to_string())
                    .filter(|piece| !piece.is_empty())
                    .collect::<Vec<_>>()
            })
            .collect();
    }
    parts
}

/// Splits on `\\` and drops empty lines.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split(r"\\")
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Command name between the backslash and the first `[` or `{`.
pub fn command_name(command: &str) -> String {
    let body = command.strip_prefix('\\').unwrap_or(command);
    let end = match (body.find('['), body.find('{')) {
        (Some(bracket), Some(curly)) if bracket < curly => bracket,
        (_, Some(curly)) => curly,
        (Some(bracket), None) => bracket,
        (None, None) => body.len(),
    };
    body[..end].trim_matches(|c| c == '*' || c == ' ').to_string()
}

/// All top-level `{...}` groups of `command`, braces kept, concatenated.
pub fn command_content(command: &str) -> String {
    top_level_groups(command)
        .iter()
        .map(|group| group.full(command).trim())
        .collect()
}

/// Cleans an author name or affiliation of everything LaTeX.
pub fn sanitize_text(text: &str) -> String {
    let text = remove_separators(text);

    let text = AUTHOR.replace_all(&text, |found| found.content().to_string());
    let text = INSTITUTION.replace_all(&text, |found| found.content().to_string());
    let text = [&*INST, &*THANKS, &*FOOTNOTE, &*FOOTNOTEMARK, &*TITLENOTE, &*TEXTSUPERSCRIPT]
        .into_iter()
        .fold(text, |text, pattern| pattern.remove_all(&text));

    let text = EMAIL.replace_all(&text, "");
    let text = text.replace(r"\\", " ");
    let text: String = text
        .chars()
        .filter(|c| !matches!(c, '$' | '{' | '}' | '[' | ']' | '^' | '\\'))
        .collect();
    let text = text.trim_matches(|c| matches!(c, ',' | '.' | ';' | ':' | ' '));
    collapse_whitespace(text)
}

fn remove_separators(text: &str) -> String {
    let text = text.trim_matches(|c| c == ',' || c == ' ');
    let text = SEPARATOR_COMMANDS.replace_all(text, "");
    let mut text = text.trim();
    if text.get(..4).is_some_and(|head| head.eq_ignore_ascii_case("and ")) {
        text = &text[4..];
    }
    let tail = text.len().saturating_sub(4);
    if text.get(tail..).is_some_and(|end| end.eq_ignore_ascii_case(" and")) {
        text = &text[..tail];
    }
    text.to_string()
}

/// One author per name, every one with the same `affiliation`. Names are
/// sanitized and empty ones dropped.
pub fn share_affiliation<I, S>(names: I, affiliation: &str) -> Vec<Author>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .map(|name| sanitize_text(name.as_ref()))
        .filter(|name| !name.is_empty())
        .map(|name| Author::new(name, [affiliation]))
        .collect()
}

/// Joins runs of the same command standing next to each other into one, e.g.
/// `\affmark[a]\affmark[b]` → `\affmark[a,b]`.
///
/// `render` receives the trimmed arguments of the two commands and returns
/// the replacement command.
pub fn join_adjacent<F>(text: &str, pattern: &CommandPattern, gap: Gap, render: F) -> String
where
    F: Fn(&str, &str) -> String,
{
    let mut text = text.to_string();
    loop {
        let next = {
            let matches = pattern.find_iter(&text);
            matches
                .windows(2)
                .find(|pair| gap.allows(&text[pair[0].end..pair[1].start]))
                .map(|pair| {
                    let first = pair[0].content_inner().trim_matches(JOIN_TRIM);
                    let second = pair[1].content_inner().trim_matches(JOIN_TRIM);
                    (pair[0].start..pair[1].end, render(first, second))
                })
        };
        let Some((range, joined)) = next else {
            break;
        };
        text.replace_range(range, &joined);
    }
    text
}

/// `$^a$ $^b$` → `$^{a,b}$`
pub fn join_adjacent_math(text: &str) -> String {
    let mut text = text.to_string();
    loop {
        let next = MATH_MODE_PAIR.captures(&text).map(|caps| {
            let first = caps["first"].trim_matches(JOIN_TRIM);
            let second = caps["second"].trim_matches(JOIN_TRIM);
            (caps.get(0).map_or(0..0, |m| m.range()), format!("$^{{{first},{second}}}$"))
        });
        let Some((range, joined)) = next else {
            break;
        };
        text.replace_range(range, &joined);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::latex::patterns::AFFMARK;

    #[test]
    fn test_find_all_indices_is_case_insensitive() {
        assert_eq!(find_all_indices(r"\inst", r"a\INST{1} b\inst{2}"), vec![1, 11]);
        assert!(find_all_indices("", "abc").is_empty());
    }

    #[test]
    fn test_split_ref_commands_drops_leading_text() {
        assert_eq!(
            split_ref_commands(r"\sup", r"x \sup{1} MIT \sup{2} ETH"),
            vec![r"\sup{1} MIT", r"\sup{2} ETH"]
        );
    }

    #[test]
    fn test_split_on_commands_keeps_leading_text() {
        assert_eq!(
            split_on_commands(&[r"\name", r"\addr"], r"x \name A \addr B \name C"),
            vec!["x", r"\name A", r"\addr B", r"\name C"]
        );
    }

    #[test]
    fn test_command_name_and_content() {
        assert_eq!(command_name(r"\author*[1]{Jane}"), "author");
        assert_eq!(command_name(r"\authorinfo{A}{B}{C}"), "authorinfo");
        assert_eq!(command_content(r"\authorinfo{A}{B{x}} {C}"), "{A}{B{x}}{C}");
    }

    #[test]
    fn test_sanitize_text() {
        assert_eq!(sanitize_text(r", and Jane Doe\thanks{x} \and"), "Jane Doe");
        // Math-mode ids are only unwrapped; schemes split them off beforehand.
        assert_eq!(sanitize_text(r"Jane Doe$^{1}$"), "Jane Doe1");
        assert_eq!(sanitize_text(r"\institution{MIT}, jane@mit.edu"), "MIT");
        assert_eq!(sanitize_text(r"Dept. of CS\\ ETH Zürich."), "Dept. of CS ETH Zürich");
        assert_eq!(sanitize_text(r"{\inst{1}}"), "");
    }

    #[test]
    fn test_share_affiliation() {
        let authors = share_affiliation(["Jane Doe", " ", "and John Roe"], "MIT");
        assert_eq!(authors, vec![Author::new("Jane Doe", ["MIT"]), Author::new("John Roe", ["MIT"])]);
    }

    #[test]
    fn test_join_adjacent() {
        let joined = join_adjacent(r"A\affmark[1] \affmark[2], B\affmark[3]", &AFFMARK, Gap::Whitespace, |a, b| {
            format!(r"\affmark[{a},{b}]")
        });
        assert_eq!(joined, r"A\affmark[1,2], B\affmark[3]");
    }

    #[test]
    fn test_join_adjacent_repeats() {
        let joined = join_adjacent(r"\affmark[1]\affmark[2]\affmark[3]", &AFFMARK, Gap::Whitespace, |a, b| {
            format!(r"\affmark[{a},{b}]")
        });
        assert_eq!(joined, r"\affmark[1,2,3]");
    }

    #[test]
    fn test_join_adjacent_math() {
        assert_eq!(join_adjacent_math(r"Jane$^1$ $^{2}$, John$^3$"), r"Jane$^{1,2}$, John$^3$");
    }
}
