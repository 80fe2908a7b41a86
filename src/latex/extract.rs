use std::ops::Range;

use super::command::follows_definition;
use super::patterns::{AUTHORSHIP, AUTHORSHIP_ENV, DOCUMENTCLASS};
use super::sanitize::sanitize_command;
use crate::models::LatexCommand;

/// Locates every author and affiliation command in `tex` (comments already
/// removed) and sanitizes it.
///
/// Environments are collected first. A command that lies strictly inside an
/// accepted environment or command is skipped, as is a command whose arguments
/// are empty. The result is ordered by position in the document.
pub fn extract_commands(tex: &str) -> Vec<LatexCommand> {
    let mut accepted: Vec<Range<usize>> = Vec::new();

    for env in AUTHORSHIP_ENV.find_iter(tex) {
        if follows_definition(&tex[..env.start()]) || is_enclosed(&accepted, env.range()) {
            continue;
        }
        if !is_empty_command(env.as_str()) {
            accepted.push(env.range());
        }
    }
    let environments = accepted.len();

    for found in AUTHORSHIP.find_iter(tex) {
        let range = found.start..found.end;
        if is_enclosed(&accepted, range.clone()) || is_empty_command(found.as_str()) {
            continue;
        }
        accepted.push(range);
    }
    log::trace!(
        "Found {} author environments and {} commands",
        environments,
        accepted.len() - environments
    );

    accepted.sort_by_key(|range| range.start);
    accepted
        .into_iter()
        .map(|range| {
            let original = &tex[range];
            LatexCommand::new(original, sanitize_command(original))
        })
        .collect()
}

/// The class name of the first `\documentclass` in `tex`.
pub fn extract_document_class(tex: &str) -> Option<String> {
    let found = DOCUMENTCLASS.find(tex)?;
    let name = found.content_inner().trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// Whether the argument region (first `{` to last `}`) holds nothing but
/// braces and spaces.
pub fn is_empty_command(command: &str) -> bool {
    let (Some(first), Some(last)) = (command.find('{'), command.rfind('}')) else {
        return true;
    };
    if last < first {
        return true;
    }
    command[first..last].trim_matches(|c| c == '{' || c == '}' || c == ' ').is_empty()
}

fn is_enclosed(accepted: &[Range<usize>], candidate: Range<usize>) -> bool {
    accepted
        .iter()
        .any(|outer| candidate.start > outer.start && candidate.end < outer.end)
}
