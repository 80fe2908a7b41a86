//! Expansion of TeX accent and ligature escapes (`\"o`, `{\ss}`, `\c c`, ...)
//! into Unicode.

use log::debug;
use regex::{Captures, Regex};
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

use super::command::is_escaped;

/// One alternative per written form. Alternatives whose backslash must not be
/// escaped are listed in [`GUARDED`].
static DIACRITIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        // \H{o}, \'{\i}
        r#"\\(?P<c1>["'.=^`|~bcCdfhHkrtuUv])\{(?P<ch1>[\\a-zA-Z]{0,2})\}"#,
        // \'e
        r#"|\\(?P<c2>["'.=^`|~])(?P<ch2>[a-zA-Z])"#,
        // {\aa}
        r#"|\{\\(?P<ch3>[\\a-zA-Z]{1,2})\}"#,
        // {\'e}
        r#"|\{\\(?P<c4>["'.=^`|~])(?P<ch4>[\\a-zA-Z])\}"#,
        // {\v s}
        r#"|\{\\(?P<c5>["'.=^`|~bcCdfhHkrtuUv]) (?P<ch5>[a-zA-Z])\}"#,
        // \v s
        r#"|\\(?P<c6>["'.=^`|~bcCdfhHkrtuUv]) (?P<ch6>[a-zA-Z])"#,
        // \o , \L{}
        r#"|\\(?P<ch7>[iIjJlLoO])(?: |\{\})"#,
        // \ss , \AE{}
        r#"|\\(?P<ch8>(?i:aa|ae|dj|dh|ij|ng|oe|ss|th))(?: |\{\})"#,
    ))
    .unwrap()
});

const ALTERNATIVES: usize = 8;

const GUARDED: [usize; 6] = [1, 2, 5, 6, 7, 8];

/// Maps a ligature or special letter written without an accent.
fn special_letter(letter: &str) -> Option<&'static str> {
    let mapped = match letter {
        "i" => "ı",
        "j" => "ȷ",
        "l" => "ł",
        "L" => "Ł",
        "o" => "ø",
        "O" => "Ø",
        "aa" => "å",
        "AA" => "Å",
        "ae" => "æ",
        "AE" => "Æ",
        "dh" => "ð",
        "dj" => "đ",
        "DJ" | "DH" => "Đ",
        "ij" => "ĳ",
        "IJ" => "Ĳ",
        "ng" => "ŋ",
        "NG" => "Ŋ",
        "oe" => "œ",
        "OE" => "Œ",
        "ss" => "ß",
        "SS" => "SS",
        "th" => "þ",
        "TH" => "Þ",
        _ => return None,
    };
    Some(mapped)
}

fn combining_mark(accent: &str) -> Option<char> {
    let mark = match accent {
        "`" => '\u{0300}',
        "'" => '\u{0301}',
        "^" => '\u{0302}',
        "~" => '\u{0303}',
        "=" => '\u{0304}',
        "u" => '\u{0306}',
        "." => '\u{0307}',
        "\"" => '\u{0308}',
        "h" => '\u{0309}',
        "r" => '\u{030A}',
        "H" => '\u{030B}',
        "v" => '\u{030C}',
        "|" => '\u{030D}',
        "U" => '\u{030E}',
        "C" => '\u{030F}',
        "f" => '\u{0311}',
        "b" => '\u{0320}',
        "d" => '\u{0323}',
        "c" => '\u{0327}',
        "k" => '\u{0328}',
        "t" => '\u{0361}',
        _ => return None,
    };
    Some(mark)
}

/// Resolves an accent applied to `letter` (either may be empty) to composed
/// Unicode text.
pub fn tex_to_unicode(accent: Option<&str>, letter: &str) -> Option<String> {
    let letter = letter.strip_prefix('\\').map_or(letter.to_string(), |bare| match (accent, bare) {
        (Some(_), "i") => "ı".to_string(),
        (Some(_), "j") => "ȷ".to_string(),
        _ => bare.to_string(),
    });

    let Some(accent) = accent else {
        return special_letter(&letter).map(str::to_string);
    };

    if letter.is_empty() {
        return match accent {
            "l" => Some("ł".to_string()),
            "L" => Some("Ł".to_string()),
            "o" => Some("ø".to_string()),
            "O" => Some("Ø".to_string()),
            _ => None,
        };
    }

    let mark = combining_mark(accent)?;
    Some(format!("{letter}{mark}").nfc().collect())
}

/// Replaces every resolvable accent escape in `text`.
pub fn replace_diacritics(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut last = 0;
    for caps in DIACRITIC.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let backslash = whole.start() + whole.as_str().find('\\').unwrap_or(0);
        let guarded = (1..=ALTERNATIVES)
            .find(|alternative| caps.name(&format!("ch{alternative}")).is_some())
            .is_some_and(|alternative| GUARDED.contains(&alternative));
        if guarded && is_escaped(text, backslash) {
            continue;
        }

        match resolve(&caps) {
            Some(replacement) => {
                result.push_str(&text[last..whole.start()]);
                result.push_str(&replacement);
                last = whole.end();
            }
            None => debug!("Could not resolve accent escape '{}'", whole.as_str()),
        }
    }
    result.push_str(&text[last..]);
    result
}

fn resolve(caps: &Captures<'_>) -> Option<String> {
    (1..=ALTERNATIVES).find_map(|alternative| {
        let letter = caps.name(&format!("ch{alternative}"))?;
        let accent = caps.name(&format!("c{alternative}")).map(|m| m.as_str());
        Some(tex_to_unicode(accent, letter.as_str()))
    })?
}
