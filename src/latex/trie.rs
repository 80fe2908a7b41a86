//! Keyword sets compiled into prefix-factored regular expressions.
//!
//! A plain union such as `author|authors|authorblockN` makes the regex engine
//! re-try every alternative at each position. Factoring shared prefixes into a
//! trie first gives `author(?:(?:blockN|s))?`, which matches the same language with
//! far fewer alternatives.

use std::collections::BTreeMap;

#[derive(Default)]
struct TrieNode {
    children: BTreeMap<char, TrieNode>,
    terminal: bool,
}

impl TrieNode {
    fn insert(&mut self, word: &str) {
        let mut node = self;
        for ch in word.chars() {
            node = node.children.entry(ch).or_default();
        }
        node.terminal = true;
    }

    /// Returns `None` for a node that only terminates a word.
    fn pattern(&self) -> Option<String> {
        if self.children.is_empty() {
            return None;
        }

        let mut alternatives = Vec::new();
        let mut char_class = Vec::new();
        for (ch, child) in &self.children {
            let quoted = regex::escape(&ch.to_string());
            match child.pattern() {
                Some(rest) => alternatives.push(format!("{quoted}{rest}")),
                None => char_class.push(quoted),
            }
        }

        let class_only = alternatives.is_empty();
        match char_class.len() {
            0 => {}
            1 => alternatives.push(char_class.remove(0)),
            _ => alternatives.push(format!("[{}]", char_class.concat())),
        }

        let mut result = if alternatives.len() == 1 {
            alternatives.remove(0)
        } else {
            format!("(?:{})", alternatives.join("|"))
        };

        if self.terminal {
            result = if class_only {
                format!("{result}?")
            } else {
                format!("(?:{result})?")
            };
        }
        Some(result)
    }
}

/// Compiles `words` into a single regex fragment (without anchors or flags).
///
/// Returns an empty string when `words` is empty or only contains empty words.
pub fn trie_pattern<I, S>(words: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut root = TrieNode::default();
    for word in words {
        root.insert(word.as_ref());
    }
    root.pattern().unwrap_or_default()
}
