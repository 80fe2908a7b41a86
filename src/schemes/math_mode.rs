//! Math mode superscripts on names (`Jane Doe$^{1,2}$`) and in front of the
//! affiliations (`$^1$MIT`).

use crate::latex::patterns::{MATH_AFFILIATION, MATH_AUTHOR_REF};
use crate::models::Author;

use super::SingleCommandScheme;
use super::refs::{AffRef, NameRef, join_by_ref};
use super::util::join_adjacent_math;

/// Commands other schemes use to mark affiliations. `\thanks`, `\footnote`
/// and `\textsuperscript` are not among them, they often carry unrelated notes.
const OWNED_ELSEWHERE: &[&str] = &[
    r"\addr",
    r"\address",
    r"\affaddr",
    r"\affiliation",
    r"\affiliations",
    r"\affil",
    r"\authorblock",
    r"\ieeeauthorblock",
    r"\ieeeauthorrefmark",
    r"\ieeecompsocitemizethanks",
    r"\institute",
    r"\institution",
];

const REF_TRIM: &[char] = &['$', '^', '{', '}', ' '];

pub struct AuthorMathModeAff;

impl SingleCommandScheme for AuthorMathModeAff {
    const ID: &'static str = "AuthorMathModeAff";

    fn validate(cmd_name: &str, content: &str) -> bool {
        let dollars = content.matches('$').count();
        if dollars == 0 || dollars % 2 == 1 {
            return false;
        }

        // `$ ^{1}$` and `${ }^{1}$` count as well
        let no_spaces = content.replace(' ', "");
        if no_spaces.matches("$^").count() + no_spaces.matches("${}^").count() < 2 {
            return false;
        }

        let lower = content.to_ascii_lowercase();
        if OWNED_ELSEWHERE.iter().any(|command| lower.contains(command)) {
            return false;
        }
        cmd_name != "authorinfo"
    }

    fn extract(_cmd_name: &str, content: &str) -> Vec<Author> {
        extract_math_mode(content)
    }
}

/// Splits on `\\` into author lines and affiliation lines and joins them by
/// their math mode ids.
pub(super) fn extract_math_mode(content: &str) -> Vec<Author> {
    let content = join_adjacent_math(content);

    let mut names = Vec::new();
    let mut affiliations = Vec::new();
    for part in math_parts(&content) {
        if is_affiliation_part(&part) {
            affiliations.extend(MATH_AFFILIATION.captures_iter(&part).filter_map(|caps| {
                let ref_id = caps["ref_id"].trim_matches(REF_TRIM);
                let name = &caps["name"];
                (!name.is_empty() && !ref_id.is_empty()).then(|| AffRef::new(name, ref_id))
            }));
        } else if is_author_part(&part) {
            names.extend(MATH_AUTHOR_REF.captures_iter(&part).filter_map(|caps| {
                let ref_id = caps["ref_id"].trim_matches(REF_TRIM);
                let name = &caps["name"];
                (!name.is_empty() && !ref_id.is_empty()).then(|| NameRef::parse(name, ref_id))
            }));
        }
    }

    join_by_ref(&names, &affiliations)
}

/// Lines split on `\\`. A line without any `$` continues the line before it:
/// `$^1$Institute \\ University \\ Country` stays one part.
fn math_parts(content: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut buffer = String::new();
    for line in content.split(r"\\").collect::<Vec<_>>().into_iter().rev() {
        if line.contains('$') {
            parts.push(format!("{line}{buffer}").trim().to_string());
            buffer.clear();
        } else {
            buffer.insert_str(0, line);
        }
    }
    if !buffer.trim().is_empty() {
        parts.push(buffer.trim().to_string());
    }
    parts.reverse();
    parts
}

fn is_author_part(part: &str) -> bool {
    part.ends_with('$') || part.matches('$').count() >= 2
}

/// Affiliations carry their id on the left: `$^1$MIT`, or a single
/// reference within the first half of the line.
fn is_affiliation_part(part: &str) -> bool {
    if part.starts_with('$') {
        return true;
    }
    part.matches('$').count() == 2 && part.find('$').is_some_and(|index| index < part.len() / 2)
}
