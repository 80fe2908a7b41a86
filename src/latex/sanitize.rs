//! Normalization of a located LaTeX command before any scheme sees it.
//!
//! Pipeline stages, in order:
//! - unwrap pass-through commands (`\mbox{x}` → `x`) and `\parbox`
//! - unwrap font switches inside arguments, inside `{...}` groups and bare
//! - delete commands that never carry names or affiliations
//! - normalize TeX spacing, accents and escaped characters
//! - drop measurements such as `[2pt]`
//! - resolve `\footnotemark[n]` against the footnotes it refers to
//! - strip ORCID identifiers
//! - collapse whitespace

use log::warn;
use regex::{Captures, Regex};
use std::sync::LazyLock;

use super::balanced::curly_group;
use super::command::{CommandMatch, is_escaped};
use super::diacritics::replace_diacritics;
use super::patterns::{
    DESCRIPTORS, ESCAPED_CHARS, FOOTNOTE, FOOTNOTEMARK, FULL_COMMAND, MEASUREMENTS, ORCID_COMMANDS,
    ORCID_HREF_HEAD, ORCID_PLAIN, ORCID_URL, PARBOX, SPACE_MULTI, SPACING, STYLES_IN_TEXT,
    STYLES_NO_CURLY, STYLES_START, UNWRAPPABLE, USELESS, USELESS_EMAIL, USELESS_NO_ARGS,
};

/// Commands a `\footnotemark[n]` can point at.
const MARK_TARGETS: [&str; 3] = ["footnote", "institute", "thanks"];

/// Whitespace just inside a brace.
static BRACE_PADDING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{\s+|\s+\}").unwrap());

/// Sanitizes one command invocation. Pure and idempotent.
pub fn sanitize_command(latex: &str) -> String {
    let text = unwrap_commands(latex);
    let text = unwrap_fonts(&text);

    let text = USELESS_NO_ARGS.replace_all(&text, "");
    let text = USELESS.remove_all(&text);
    let text = USELESS_EMAIL.replace_all(&text, "");
    let text = DESCRIPTORS.replace_all(&text, "");

    let text = remove_tex_spacing(&text);
    let text = replace_diacritics(&text);
    let text = replace_unescaped(&ESCAPED_CHARS, &text, |caps| caps["char"].to_string());
    let text = MEASUREMENTS.replace_all(&text, "");

    let text = replace_footnote_marks(&text);
    let text = remove_orcid_ids(&text);
    let text = BRACE_PADDING.replace_all(&text, |caps: &Captures<'_>| caps[0].trim().to_string());
    collapse_whitespace(&text)
}

/// Collapses whitespace runs (line breaks included) to one space and trims.
pub fn collapse_whitespace(text: &str) -> String {
    SPACE_MULTI.replace_all(text, " ").trim().to_string()
}

/// Turns `\newline` and `\\` into spaces.
pub fn remove_latex_newlines(text: &str) -> String {
    let text = text.replace(r"\newline", " ").replace(r"\\", " ");
    collapse_whitespace(&text)
}

/// Applies `replacer` to every match whose first character is not escaped.
fn replace_unescaped<F>(re: &Regex, text: &str, mut replacer: F) -> String
where
    F: FnMut(&Captures<'_>) -> String,
{
    let mut result = String::with_capacity(text.len());
    let mut last = 0;
    for caps in re.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if is_escaped(text, whole.start()) {
            continue;
        }
        result.push_str(&text[last..whole.start()]);
        result.push_str(&replacer(&caps));
        last = whole.end();
    }
    result.push_str(&text[last..]);
    result
}

// ── Unwrapping ──

fn unwrap_commands(latex: &str) -> String {
    let text = UNWRAPPABLE.replace_until_stable(latex, |found| {
        let args: Vec<&str> = (0..found.arg_count())
            .filter_map(|index| found.arg_inner(index))
            .filter(|arg| !arg.is_empty())
            .collect();
        format!(" {} ", args.join(" "))
    });

    PARBOX.replace_all(&text, |found| match found.arg_inner(1) {
        Some(content) => content.trim().to_string(),
        None => found.as_str().to_string(),
    })
}

fn unwrap_fonts(latex: &str) -> String {
    let text = unwrap_fonts_in_commands(latex);
    let text = unwrap_fonts_in_text(&text);

    let mut result = String::with_capacity(text.len());
    let mut last = 0;
    for found in STYLES_NO_CURLY.find_iter(&text) {
        let preceded = found.start() > 0 && matches!(text.as_bytes()[found.start() - 1], b'\\' | b'{');
        if preceded {
            continue;
        }
        result.push_str(&text[last..found.start()]);
        last = found.end();
    }
    result.push_str(&text[last..]);
    result
}

/// `\author{\rm Jane}` → ` \author{Jane} `
fn unwrap_fonts_in_commands(latex: &str) -> String {
    FULL_COMMAND.replace_all(latex, rebuild_without_leading_style)
}

fn rebuild_without_leading_style(found: &CommandMatch<'_>) -> String {
    let mut args = String::new();
    for index in 0..found.arg_count() {
        let Some(arg) = found.arg_inner(index) else {
            break;
        };
        let mut content = unwrap_fonts_in_commands(arg.trim());
        if let Some(style) = STYLES_START.find(&content) {
            content = content[style.end()..].trim().to_string();
        }
        args.push('{');
        args.push_str(&content);
        args.push('}');
    }
    format!(r" \{}{}{} ", found.name(), found.options_str(), args)
}

/// `{\bf Jane Doe}` → `Jane Doe`
fn unwrap_fonts_in_text(latex: &str) -> String {
    let mut text = latex.to_string();
    let mut from = 0;
    loop {
        let next = STYLES_IN_TEXT
            .find_iter(&text[from..])
            .map(|m| (from + m.start(), from + m.end()))
            .filter(|(start, _)| !is_escaped(&text, *start))
            .find_map(|(start, style_end)| curly_group(&text, start).map(|group| (start, style_end, group.end)));

        let Some((start, style_end, group_end)) = next else {
            break;
        };
        let content = text[style_end..group_end - 1].to_string();
        text.replace_range(start..group_end, &content);
        from = start;
    }
    text
}

fn remove_tex_spacing(text: &str) -> String {
    let text = text.replace('~', " ").replace(r"\newline", r"\\");
    replace_unescaped(&SPACING, &text, |_| " ".to_string())
}

// ── References ──

/// Replaces `\footnotemark[...]` with the command it refers to, padded with
/// spaces like every rebuilt command.
///
/// - empty or `\value{footnote}`: the closest preceding `\footnote{}`
/// - `n`: the n-th `\footnote`, `\institute` or `\thanks`, nested ones included
/// - out of range: the mark is dropped
fn replace_footnote_marks(text: &str) -> String {
    if !text.contains(r"\footnotemark") {
        return text.to_string();
    }

    let targets: Vec<CommandMatch<'_>> = FULL_COMMAND
        .find_overlapping(text)
        .into_iter()
        .filter(|found| MARK_TARGETS.contains(&found.name()))
        .collect();
    if targets.is_empty() {
        return text.to_string();
    }

    FOOTNOTEMARK.replace_all(text, |mark| {
        let content = mark.content_inner().trim();
        let resolved = if content.is_empty() || content.eq_ignore_ascii_case(r"\value{footnote}") {
            FOOTNOTE.find_iter(&text[..mark.start]).last().map(|footnote| footnote.as_str())
        } else if let Ok(number) = content.parse::<usize>() {
            number
                .checked_sub(1)
                .and_then(|index| targets.get(index))
                // A mark inside the command it points at refers to itself.
                .filter(|target| !(target.start <= mark.start && mark.end <= target.end))
                .map(|target| target.as_str())
        } else {
            warn!("Unhandled footnotemark content '{}' in '{}'", content, text);
            return mark.as_str().to_string();
        };
        // Marks inside the copied command would be expanded again on the next pass.
        let resolved = resolved.map(|target| FOOTNOTEMARK.remove_all(target)).unwrap_or_default();
        format!(" {resolved} ")
    })
}

fn remove_orcid_ids(text: &str) -> String {
    let text = ORCID_COMMANDS.remove_all(text);
    let text = ORCID_PLAIN.replace_all(&text, "").into_owned();

    let mut result = String::with_capacity(text.len());
    let mut last = 0;
    for head in ORCID_HREF_HEAD.find_iter(&text) {
        if head.start() < last {
            continue;
        }
        if let Some(icon) = curly_group(&text, head.end()) {
            result.push_str(&text[last..head.start()]);
            last = icon.end;
        }
    }
    result.push_str(&text[last..]);

    ORCID_URL.replace_all(&result, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwraps_pass_through_commands() {
        assert_eq!(
            sanitize_command(r"\author{\mbox{Jane \textbf{Doe}}}"),
            r"\author{Jane Doe}"
        );
    }

    #[test]
    fn test_font_switches() {
        assert_eq!(sanitize_command(r"\author{\rm Jane Doe}"), r"\author{Jane Doe}");
        assert_eq!(sanitize_command(r"\author{A {\bf Jane Doe} B}"), r"\author{A Jane Doe B}");
        assert_eq!(sanitize_command(r"\author{Jane \small Doe}"), r"\author{Jane Doe}");
    }

    #[test]
    fn test_useless_commands_are_removed() {
        let text = r"\author{Jane Doe\vspace{2mm} \email{jane@mit.edu} \protect\and John}";
        assert_eq!(sanitize_command(text), r"\author{Jane Doe \and John}");
    }

    #[test]
    fn test_spacing_and_escapes() {
        assert_eq!(sanitize_command(r"\affil{AT\&T~Labs,\,NJ}"), r"\affil{AT&T Labs, NJ}");
        assert_eq!(sanitize_command(r"\affil{A\\,B}"), r"\affil{A\\,B}");
    }

    #[test]
    fn test_measurements_and_newlines() {
        assert_eq!(sanitize_command(r"\author{A\\[2pt] B\newline C}"), r"\author{A\\ B\\ C}");
    }

    #[test]
    fn test_footnotemark_number_resolves_to_target() {
        let text = r"\author{A\footnote{MIT} \and B\footnotemark[1]}";
        assert_eq!(
            sanitize_command(text),
            r"\author{A \footnote{MIT} \and B \footnote{MIT}}"
        );
    }

    #[test]
    fn test_empty_footnotemark_uses_previous_footnote() {
        let text = r"\author{A\footnote{X} B\footnote{Y} \and C\footnotemark[]}";
        assert_eq!(
            sanitize_command(text),
            r"\author{A \footnote{X} B \footnote{Y} \and C \footnote{Y}}"
        );
    }

    #[test]
    fn test_out_of_range_footnotemark_is_dropped() {
        let text = r"\author{A\thanks{X} B\footnotemark[7]}";
        assert_eq!(sanitize_command(text), r"\author{A \thanks{X} B}");
    }

    #[test]
    fn test_footnotemark_inside_its_own_target_is_dropped() {
        let once = sanitize_command(r"\author{A\thanks{B\footnotemark[1]}}");
        assert!(!once.contains("footnotemark"), "got: {once}");
        assert_eq!(once.matches(r"\thanks").count(), 1, "got: {once}");
        assert_eq!(sanitize_command(&once), once);
    }

    #[test]
    fn test_copied_footnote_loses_its_marks() {
        let text = r"\author{A\thanks{X\footnotemark[2]} B\thanks{Y\footnotemark[1]}}";
        let once = sanitize_command(text);
        assert!(!once.contains("footnotemark"), "got: {once}");
        assert_eq!(sanitize_command(&once), once);
    }

    #[test]
    fn test_accents_keep_the_command_braces() {
        let text = r#"\author{\v s\"{o} {\o} \'e}"#;
        assert_eq!(sanitize_command(text), r"\author{šö ø é}");
    }

    #[test]
    fn test_orcid_is_removed() {
        let text = r"\author{Jane Doe \orcidlink{0000-0002-1825-0097} ORCID: 0000-0002-1825-0097}";
        assert_eq!(sanitize_command(text), r"\author{Jane Doe}");
    }

    #[test]
    fn test_sanitizing_is_idempotent() {
        let inputs = [
            r#"\author{\mbox{Jos\'{e} M\"uller}\thanks{TU M\"unchen, Germany}}"#,
            r"\author{{\bf A}\textsuperscript{1} \and B~C\footnotemark[1]}",
            r#"\affil{  Dept.\ of CS,\\ \textit{ETH} Z\"urich \url{http://x.y} }"#,
            r"\author{A\footnote{X} B\footnotemark[1]}",
            r"\author{A\thanks{B\footnotemark[1]}}",
        ];
        for input in inputs {
            let once = sanitize_command(input);
            assert_eq!(sanitize_command(&once), once, "input: {input}");
        }
    }

    #[test]
    fn test_remove_latex_newlines() {
        assert_eq!(remove_latex_newlines("A\\\\ B\\newline  C"), "A B C");
    }
}
