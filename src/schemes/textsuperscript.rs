//! Schemes built around `\textsuperscript{}` (or `\ts{}`) references.

use std::sync::LazyLock;

use crate::latex::command::{CommandPattern, split_before};
use crate::latex::patterns::{AFFIL, NAME, TEXTSUPERSCRIPT};
use crate::models::Author;

use super::SingleCommandScheme;
use super::math_mode::extract_math_mode;
use super::refs::{AffRef, NameRef, join_by_ref};
use super::util::{Gap, contains_ci, join_adjacent, split_ref_commands};

/// `\textsuperscript{id}{affiliation}`
static DOUBLE_TEXTSUPERSCRIPT: LazyLock<CommandPattern> = LazyLock::new(|| {
    CommandPattern::builder("t(?:s|extsuperscript)")
        .max_args(2)
        .spaced_args()
        .build()
        .unwrap()
});

/// `Jane\textsuperscript{1}` on the names, `\textsuperscript{1}MIT` on the
/// affiliations. Read like the math mode form.
pub struct AuthorTextSuperScript;

impl SingleCommandScheme for AuthorTextSuperScript {
    const ID: &'static str = "AuthorTextSuperScript";

    fn validate(_cmd_name: &str, content: &str) -> bool {
        TEXTSUPERSCRIPT.count(content) >= 2
    }

    fn extract(_cmd_name: &str, content: &str) -> Vec<Author> {
        let content = TEXTSUPERSCRIPT.replace_all(&join_superscripts(content), |mark| {
            let ref_id = mark.content_inner().trim_matches(|c| matches!(c, '$' | ',' | ' '));
            format!("$^{{{ref_id}}}$")
        });
        extract_math_mode(&content)
    }
}

/// `Jane\textsuperscript{1}` on the names, affiliations as
/// `\textsuperscript{1}{MIT}`.
pub struct AuthorDoubleTextSuperScript;

impl SingleCommandScheme for AuthorDoubleTextSuperScript {
    const ID: &'static str = "AuthorDoubleTextSuperScript";

    fn validate(_cmd_name: &str, content: &str) -> bool {
        TEXTSUPERSCRIPT.count(content) > 2
            && DOUBLE_TEXTSUPERSCRIPT
                .find_iter(content)
                .iter()
                .any(|mark| mark.arg_count() == 2)
    }

    fn extract(_cmd_name: &str, content: &str) -> Vec<Author> {
        let content = join_superscripts(content);

        let mut affiliations = Vec::new();
        let names_only = DOUBLE_TEXTSUPERSCRIPT.replace_all(&content, |mark| {
            let (Some(ref_id), Some(name)) = (mark.arg_inner(0), mark.arg_inner(1)) else {
                return mark.as_str().to_string();
            };
            let (ref_id, name) = (ref_id.trim(), name.trim());
            if !ref_id.is_empty() && !name.is_empty() {
                affiliations.push(AffRef::new(name, ref_id));
            }
            String::new()
        });

        join_by_ref(&superscript_names(&names_only), &affiliations)
    }
}

/// `\name{Jane\textsuperscript{1}, John\textsuperscript{2}}` and
/// `\affil{\textsuperscript{1}MIT \textsuperscript{2}ETH}`.
pub struct AuthorTextSuperScriptNameAffil;

impl SingleCommandScheme for AuthorTextSuperScriptNameAffil {
    const ID: &'static str = "AuthorTextSuperScriptNameAffil";

    fn validate(_cmd_name: &str, content: &str) -> bool {
        TEXTSUPERSCRIPT.count(content) > 2 && contains_ci(content, r"\name") && contains_ci(content, r"\affil{")
    }

    fn extract(_cmd_name: &str, content: &str) -> Vec<Author> {
        let (Some(names), Some(affil)) = (NAME.find(content), AFFIL.find(content)) else {
            return Vec::new();
        };

        let names = superscript_names(&join_superscripts(names.content_inner().trim()));
        let affiliations: Vec<AffRef> = split_ref_commands(r"\textsuperscript", affil.content_inner().trim())
            .iter()
            .filter_map(|part| {
                let mark = TEXTSUPERSCRIPT.find(part).filter(|mark| mark.start == 0)?;
                Some(AffRef::new(part[mark.end..].trim(), mark.content_inner().trim()))
            })
            .collect();

        join_by_ref(&names, &affiliations)
    }
}

fn join_superscripts(content: &str) -> String {
    join_adjacent(content, &TEXTSUPERSCRIPT, Gap::Whitespace, |a, b| format!(r"\textsuperscript{{{a},{b}}}"))
}

/// Every name followed by `\textsuperscript{ids}`. A name is the text since
/// the previous superscript.
fn superscript_names(text: &str) -> Vec<NameRef> {
    split_before(&TEXTSUPERSCRIPT, text)
        .into_iter()
        .filter_map(|(lead, mark)| {
            let name = lead.trim();
            let name = match name.get(..4) {
                Some(head) if head.eq_ignore_ascii_case("and ") => &name[4..],
                _ => name,
            };
            let ref_ids: Vec<String> = mark
                .content_inner()
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .collect();
            (!name.is_empty() && !ref_ids.is_empty()).then(|| NameRef::new(name, ref_ids))
        })
        .collect()
}
