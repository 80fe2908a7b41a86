//! Balanced delimiter scanning.
//!
//! LaTeX arguments nest arbitrarily (`\author{A \thanks{B {C}}}`), which a
//! regular expression cannot describe. Every place that needs "the `{...}`
//! group starting here" goes through [`find_balanced`] instead.

/// Groups nested deeper than this are treated as unbalanced.
pub const MAX_NESTING_DEPTH: usize = 256;

/// A delimited group inside a haystack. `start..end` includes both delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Group {
    pub start: usize,
    pub end: usize,
}

impl Group {
    /// The group including its delimiters.
    pub fn full<'h>(&self, haystack: &'h str) -> &'h str {
        &haystack[self.start..self.end]
    }

    /// The group without its outer delimiters.
    pub fn inner<'h>(&self, haystack: &'h str) -> &'h str {
        &haystack[self.start + 1..self.end - 1]
    }
}

/// Returns the exclusive end of the group opened at `open_pos`.
///
/// `open` and `close` must be ASCII. Escaped delimiters (`\{`) are counted
/// like any other delimiter.
pub fn find_balanced(text: &str, open_pos: usize, open: u8, close: u8) -> Option<usize> {
    let bytes = text.as_bytes();
    if bytes.get(open_pos) != Some(&open) {
        return None;
    }

    let mut depth = 0usize;
    for (offset, &byte) in bytes[open_pos..].iter().enumerate() {
        if byte == open {
            depth += 1;
            if depth > MAX_NESTING_DEPTH {
                return None;
            }
        } else if byte == close {
            depth -= 1;
            if depth == 0 {
                return Some(open_pos + offset + 1);
            }
        }
    }
    None
}

/// Returns the `{...}` group opened at `open_pos`, if balanced.
pub fn curly_group(text: &str, open_pos: usize) -> Option<Group> {
    find_balanced(text, open_pos, b'{', b'}').map(|end| Group {
        start: open_pos,
        end,
    })
}

/// Returns the `[...]` group opened at `open_pos`, if balanced.
pub fn bracket_group(text: &str, open_pos: usize) -> Option<Group> {
    find_balanced(text, open_pos, b'[', b']').map(|end| Group {
        start: open_pos,
        end,
    })
}

/// All non-overlapping balanced `{...}` groups, scanned left to right.
///
/// An opening brace without a partner is skipped and scanning continues
/// right after it.
pub fn top_level_groups(text: &str) -> Vec<Group> {
    let mut groups = Vec::new();
    let mut pos = 0;
    while let Some(offset) = text[pos..].find('{') {
        let open = pos + offset;
        match curly_group(text, open) {
            Some(group) => {
                groups.push(group);
                pos = group.end;
            }
            None => pos = open + 1,
        }
    }
    groups
}

/// Advances `pos` past any whitespace.
pub fn skip_whitespace(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .find(|(_, ch)| !ch.is_whitespace())
        .map_or(text.len(), |(offset, _)| pos + offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_group_is_matched_to_its_partner() {
        let text = r"\cmd{a{b}c} tail";
        let group = curly_group(text, 4).unwrap();
        assert_eq!(group.full(text), "{a{b}c}");
        assert_eq!(group.inner(text), "a{b}c");
    }

    #[test]
    fn test_unbalanced_group_is_rejected() {
        assert_eq!(find_balanced("{a{b}", 0, b'{', b'}'), None);
        assert_eq!(find_balanced("x{}", 0, b'{', b'}'), None);
    }

    #[test]
    fn test_brackets() {
        let text = "[a[b]]c";
        assert_eq!(bracket_group(text, 0).map(|g| g.full(text)), Some("[a[b]]"));
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("{}{}", "{".repeat(MAX_NESTING_DEPTH + 1), "}".repeat(MAX_NESTING_DEPTH + 1));
        assert_eq!(find_balanced(&deep, 0, b'{', b'}'), None);

        let ok = format!("{}{}", "{".repeat(MAX_NESTING_DEPTH), "}".repeat(MAX_NESTING_DEPTH));
        assert_eq!(find_balanced(&ok, 0, b'{', b'}'), Some(ok.len()));
    }

    #[test]
    fn test_top_level_groups_skip_unpaired_braces() {
        let text = "{a}{ {b{c}} x";
        let groups: Vec<&str> = top_level_groups(text).iter().map(|g| g.full(text)).collect();
        assert_eq!(groups, vec!["{a}", "{b{c}}"]);
    }

    #[test]
    fn test_multibyte_text_around_groups() {
        let text = "Müller {Universität Wien} Zürich";
        let groups = top_level_groups(text);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].inner(text), "Universität Wien");
    }

    #[test]
    fn test_skip_whitespace() {
        assert_eq!(skip_whitespace("a  \n b", 1), 5);
        assert_eq!(skip_whitespace("a   ", 1), 4);
    }
}
