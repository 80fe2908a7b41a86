//! Matching of LaTeX command invocations: `\name*[opt]...{arg}{arg}{arg}`.
//!
//! A [`CommandPattern`] pairs a regular expression for the command head with
//! the balanced scanner for the arguments. The head regex includes the first
//! delimiter, so when several names share a prefix the regex engine picks the
//! name that is actually followed by an argument.

use regex::Regex;
use std::ops::Range;

use super::balanced::{Group, bracket_group, find_balanced, skip_whitespace};

/// How `[...]` groups in front of the arguments are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionalArgs {
    /// No optional groups are accepted.
    None,
    /// `[^]]*`: the group ends at the first `]`.
    Flat,
    /// Nested `[...]` groups are balanced.
    Nested,
}

/// Extra condition on the text preceding a command head.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    None,
    /// The backslash must not itself be escaped (`\\name` is a line break).
    NotEscaped,
    /// The command must not be the subject of `\newcommand`, `\renewcommand` or `\def`.
    NotDefinition,
}

/// A compiled command matcher.
#[derive(Debug)]
pub struct CommandPattern {
    head: Regex,
    options: OptionalArgs,
    open: u8,
    close: u8,
    max_args: usize,
    spaced_args: bool,
    guard: Guard,
}

/// Builder for [`CommandPattern`].
#[derive(Debug, Clone)]
pub struct CommandPatternBuilder {
    names: String,
    star: bool,
    space_after_name: bool,
    options: OptionalArgs,
    open: u8,
    close: u8,
    max_args: usize,
    spaced_args: bool,
    guard: Guard,
    case_insensitive: bool,
}

impl CommandPattern {
    /// Starts a pattern for the command names described by the regex fragment
    /// `names` (without the leading backslash).
    ///
    /// Defaults: one curly argument directly after the name, no optional
    /// groups, case-insensitive.
    pub fn builder(names: impl Into<String>) -> CommandPatternBuilder {
        CommandPatternBuilder {
            names: names.into(),
            star: false,
            space_after_name: false,
            options: OptionalArgs::None,
            open: b'{',
            close: b'}',
            max_args: 1,
            spaced_args: false,
            guard: Guard::None,
            case_insensitive: true,
        }
    }

    /// Finds the leftmost command starting at or after `from`.
    pub fn find_at<'h>(&self, haystack: &'h str, from: usize) -> Option<CommandMatch<'h>> {
        let mut pos = from;
        while pos <= haystack.len() {
            let caps = self.head.captures_at(haystack, pos)?;
            let head = caps.get(0)?;
            let name = caps.name("name").map_or(head.range(), |m| m.range());

            if self.guard_allows(haystack, head.start())
                && let Some(found) = self.parse_tail(haystack, head.start(), name.clone(), head.end() - 1)
            {
                return Some(found);
            }
            // heads always start with an ASCII backslash
            pos = head.start() + 1;
        }
        None
    }

    pub fn find<'h>(&self, haystack: &'h str) -> Option<CommandMatch<'h>> {
        self.find_at(haystack, 0)
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        self.find(haystack).is_some()
    }

    /// All non-overlapping matches, left to right.
    pub fn find_iter<'h>(&self, haystack: &'h str) -> Vec<CommandMatch<'h>> {
        let mut matches = Vec::new();
        let mut pos = 0;
        while let Some(found) = self.find_at(haystack, pos) {
            pos = found.end;
            matches.push(found);
        }
        matches
    }

    pub fn count(&self, haystack: &str) -> usize {
        self.find_iter(haystack).len()
    }

    /// Every match, including commands nested inside the arguments of
    /// another match.
    pub fn find_overlapping<'h>(&self, haystack: &'h str) -> Vec<CommandMatch<'h>> {
        let mut matches = Vec::new();
        let mut pos = 0;
        while let Some(found) = self.find_at(haystack, pos) {
            pos = found.start + 1;
            matches.push(found);
        }
        matches
    }

    /// Replaces every non-overlapping match with the result of `replacer`.
    pub fn replace_all<F>(&self, haystack: &str, mut replacer: F) -> String
    where
        F: FnMut(&CommandMatch<'_>) -> String,
    {
        let mut result = String::with_capacity(haystack.len());
        let mut last = 0;
        for found in self.find_iter(haystack) {
            result.push_str(&haystack[last..found.start]);
            result.push_str(&replacer(&found));
            last = found.end;
        }
        result.push_str(&haystack[last..]);
        result
    }

    /// Removes every non-overlapping match.
    pub fn remove_all(&self, haystack: &str) -> String {
        self.replace_all(haystack, |_| String::new())
    }

    /// Replaces the leftmost match until none is left. Inner commands exposed
    /// by a replacement are handled by later rounds.
    ///
    /// `replacer` must shrink the text or remove the command, otherwise the
    /// loop would not terminate; rounds are capped at the input length.
    pub fn replace_until_stable<F>(&self, haystack: &str, mut replacer: F) -> String
    where
        F: FnMut(&CommandMatch<'_>) -> String,
    {
        let mut text = haystack.to_string();
        let mut rounds = text.len() + 1;
        while rounds > 0
            && let Some(found) = self.find(&text)
        {
            let replacement = replacer(&found);
            let (start, end) = (found.start, found.end);
            text.replace_range(start..end, &replacement);
            rounds -= 1;
        }
        text
    }

    fn guard_allows(&self, haystack: &str, start: usize) -> bool {
        match self.guard {
            Guard::None => true,
            Guard::NotEscaped => !is_escaped(haystack, start),
            Guard::NotDefinition => !follows_definition(&haystack[..start]),
        }
    }

    fn parse_tail<'h>(
        &self,
        haystack: &'h str,
        start: usize,
        name: Range<usize>,
        mut pos: usize,
    ) -> Option<CommandMatch<'h>> {
        let bytes = haystack.as_bytes();

        let mut options = Vec::new();
        if self.options != OptionalArgs::None {
            while bytes.get(pos) == Some(&b'[') {
                let group = match self.options {
                    OptionalArgs::Flat => {
                        let close = haystack[pos + 1..].find(']')?;
                        Group {
                            start: pos,
                            end: pos + 1 + close + 1,
                        }
                    }
                    _ => bracket_group(haystack, pos)?,
                };
                options.push(group);
                pos = skip_whitespace(haystack, group.end);
            }
        }

        let mut args = Vec::new();
        let first_end = find_balanced(haystack, pos, self.open, self.close)?;
        args.push(Group {
            start: pos,
            end: first_end,
        });
        let mut end = first_end;

        while args.len() < self.max_args {
            let next = if self.spaced_args {
                skip_whitespace(haystack, end)
            } else {
                end
            };
            match find_balanced(haystack, next, self.open, self.close) {
                Some(arg_end) => {
                    args.push(Group {
                        start: next,
                        end: arg_end,
                    });
                    end = arg_end;
                }
                None => break,
            }
        }

        Some(CommandMatch {
            haystack,
            start,
            end,
            name,
            options,
            args,
        })
    }
}

impl CommandPatternBuilder {
    /// Accepts an optional `*` after the name.
    pub fn star(mut self) -> Self {
        self.star = true;
        self
    }

    /// Accepts whitespace between the name (or star) and the first group.
    pub fn space_after_name(mut self) -> Self {
        self.space_after_name = true;
        self
    }

    pub fn options(mut self, options: OptionalArgs) -> Self {
        self.options = options;
        self
    }

    /// Uses `[...]` instead of `{...}` for the arguments.
    pub fn bracket_args(mut self) -> Self {
        self.open = b'[';
        self.close = b']';
        self
    }

    /// Accepts up to `max_args` arguments; at least one is always required.
    pub fn max_args(mut self, max_args: usize) -> Self {
        self.max_args = max_args.max(1);
        self
    }

    /// Accepts whitespace between consecutive arguments.
    pub fn spaced_args(mut self) -> Self {
        self.spaced_args = true;
        self
    }

    pub fn guard(mut self, guard: Guard) -> Self {
        self.guard = guard;
        self
    }

    pub fn case_sensitive(mut self) -> Self {
        self.case_insensitive = false;
        self
    }

    pub fn build(self) -> Result<CommandPattern, regex::Error> {
        let flags = if self.case_insensitive { "(?i)" } else { "" };
        let star = if self.star { r"\*?" } else { "" };
        let space = if self.space_after_name { r"\s*" } else { "" };
        let open = regex::escape(&(self.open as char).to_string());
        let first = if self.options == OptionalArgs::None {
            open
        } else {
            format!(r"(?:\[|{open})")
        };
        let head = Regex::new(&format!(
            r"{flags}\\(?P<name>{names}){star}{space}{first}",
            names = self.names
        ))?;

        Ok(CommandPattern {
            head,
            options: self.options,
            open: self.open,
            close: self.close,
            max_args: self.max_args,
            spaced_args: self.spaced_args,
            guard: self.guard,
        })
    }
}

/// One command invocation inside a haystack.
#[derive(Debug, Clone)]
pub struct CommandMatch<'h> {
    haystack: &'h str,
    pub start: usize,
    pub end: usize,
    name: Range<usize>,
    options: Vec<Group>,
    args: Vec<Group>,
}

impl<'h> CommandMatch<'h> {
    pub fn as_str(&self) -> &'h str {
        &self.haystack[self.start..self.end]
    }

    /// The command name as written, without the backslash.
    pub fn name(&self) -> &'h str {
        &self.haystack[self.name.clone()]
    }

    pub fn arg_count(&self) -> usize {
        self.args.len()
    }

    /// Argument `index` including its delimiters.
    pub fn arg(&self, index: usize) -> Option<&'h str> {
        self.args.get(index).map(|group| group.full(self.haystack))
    }

    /// Argument `index` without its delimiters.
    pub fn arg_inner(&self, index: usize) -> Option<&'h str> {
        self.args.get(index).map(|group| group.inner(self.haystack))
    }

    /// The first argument including its delimiters.
    pub fn content(&self) -> &'h str {
        self.arg(0).unwrap_or_default()
    }

    /// The first argument without its delimiters.
    pub fn content_inner(&self) -> &'h str {
        self.arg_inner(0).unwrap_or_default()
    }

    /// All optional `[...]` groups, concatenated as written.
    pub fn options_str(&self) -> String {
        self.options.iter().map(|group| group.full(self.haystack)).collect()
    }

    /// The inner text of the first optional group.
    pub fn first_option(&self) -> Option<&'h str> {
        self.options.first().map(|group| group.inner(self.haystack))
    }
}

/// Pairs every match with the text between the previous match and itself.
///
/// The leading text is trimmed at its end only.
pub fn split_before<'h>(pattern: &CommandPattern, haystack: &'h str) -> Vec<(&'h str, CommandMatch<'h>)> {
    let mut pairs = Vec::new();
    let mut last = 0;
    for found in pattern.find_iter(haystack) {
        let lead = haystack[last..found.start].trim_end();
        last = found.end;
        pairs.push((lead, found));
    }
    pairs
}

/// Pairs every match with the text following it up to the next match.
pub fn split_after<'h>(pattern: &CommandPattern, haystack: &'h str) -> Vec<(CommandMatch<'h>, &'h str)> {
    let matches = pattern.find_iter(haystack);
    let mut pairs = Vec::with_capacity(matches.len());
    for (index, found) in matches.iter().enumerate() {
        let tail_end = matches.get(index + 1).map_or(haystack.len(), |next| next.start);
        let tail = haystack[found.end..tail_end].trim();
        pairs.push((found.clone(), tail));
    }
    pairs
}

/// Whether the character at `pos` is preceded by a backslash.
pub fn is_escaped(haystack: &str, pos: usize) -> bool {
    pos > 0 && haystack.as_bytes()[pos - 1] == b'\\'
}

/// Whether `preceding` ends in `\newcommand`, `\renewcommand` or `\def`,
/// optionally followed by whitespace.
pub fn follows_definition(preceding: &str) -> bool {
    let trimmed = preceding.trim_end().to_ascii_lowercase();
    [r"\newcommand", r"\renewcommand", r"\def"]
        .iter()
        .any(|definition| trimmed.ends_with(definition))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author_pattern() -> CommandPattern {
        CommandPattern::builder("author|authors|affil|affiliation")
            .star()
            .space_after_name()
            .options(OptionalArgs::Nested)
            .max_args(3)
            .guard(Guard::NotDefinition)
            .build()
            .unwrap()
    }

    #[test]
    fn test_nested_argument() {
        let text = r"\author{a{b}c} rest";
        let found = author_pattern().find(text).unwrap();
        assert_eq!(found.as_str(), r"\author{a{b}c}");
        assert_eq!(found.content(), "{a{b}c}");
        assert_eq!(found.content_inner(), "a{b}c");
        assert_eq!(found.name(), "author");
    }

    #[test]
    fn test_options_and_multiple_arguments() {
        let text = r"\author*[1][x[y]] {Name}{Aff}{Mail} tail";
        let found = author_pattern().find(text).unwrap();
        assert_eq!(found.options_str(), "[1][x[y]]");
        assert_eq!(found.arg_count(), 3);
        assert_eq!(found.arg_inner(1), Some("Aff"));
    }

    #[test]
    fn test_name_backtracks_to_command_with_argument() {
        let text = r"\affiliation{X}";
        let found = author_pattern().find(text).unwrap();
        assert_eq!(found.name(), "affiliation");
    }

    #[test]
    fn test_unbalanced_command_is_skipped() {
        let text = r"\author{broken \author{ok}";
        let found = author_pattern().find_iter(text);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].content_inner(), "ok");
    }

    #[test]
    fn test_definitions_are_ignored() {
        let text = r"\newcommand \author{x} \def\affil{y} \author{z}";
        let found = author_pattern().find_iter(text);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].content_inner(), "z");
    }

    #[test]
    fn test_escaped_guard() {
        let pattern = CommandPattern::builder("[a-z][a-z0-9]+")
            .guard(Guard::NotEscaped)
            .build()
            .unwrap();
        assert!(pattern.find(r"\\textbf{x}").is_none());
        assert!(pattern.find(r"a \textbf{x}").is_some());
    }

    #[test]
    fn test_replace_until_stable_unwraps_outer_to_inner() {
        let pattern = CommandPattern::builder("mbox|textbf").build().unwrap();
        let text = pattern.replace_until_stable(r"\mbox{\textbf{x}} y", |m| format!(" {} ", m.content_inner()));
        assert_eq!(text.split_whitespace().collect::<Vec<_>>(), vec!["x", "y"]);
    }

    #[test]
    fn test_split_before_and_after() {
        let pattern = CommandPattern::builder("thanks").build().unwrap();
        let text = r"Jane Doe \thanks{MIT}, John Roe\thanks{ETH}";
        let before = split_before(&pattern, text);
        assert_eq!(before.len(), 2);
        assert_eq!(before[0].0, "Jane Doe");
        assert_eq!(before[1].0, ", John Roe");

        let after = split_after(&pattern, r"\thanks{1} A \thanks{2} B");
        assert_eq!(after[0].1, "A");
        assert_eq!(after[1].1, "B");
    }

    #[test]
    fn test_bracket_arguments() {
        let pattern = CommandPattern::builder("footnotemark").bracket_args().build().unwrap();
        let found = pattern.find(r"Doe\footnotemark[2]").unwrap();
        assert_eq!(found.content_inner(), "2");
    }
}
