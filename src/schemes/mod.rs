mod affaddr;
mod affil;
#[cfg(test)]
mod affil_test;
mod affiliation;
#[cfg(test)]
mod affiliation_test;
mod article_authors;
mod author_address;
mod author_block;
mod author_info;
mod author_name;
mod compsoc;
mod footnote;
#[cfg(test)]
mod footnote_test;
mod institute;
mod math_mode;
mod multi;
mod name_addr;
#[cfg(test)]
mod name_addr_test;
pub mod refs;
mod rr_author;
#[cfg(test)]
mod rr_author_test;
mod textsuperscript;
mod thanks;
pub mod util;

use log::{debug, warn};

use crate::matching::{ScoreWeights, score_authors};
use crate::models::{Author, ExtractionCandidate, ExtractionKind, ExtractionResult};

use self::util::{command_content, command_name};

/// Original text recorded for commands merged into one `\author{}`.
pub const WRAPPED_ORIGINAL: &str = "Wrapped Multiple Commands as one";

/// An extraction strategy for a paper whose authorship is written as one
/// LaTeX command, typically `\author{...}`.
///
/// Each scheme recognizes one structural convention (names followed by
/// `\affaddr{}`, `\IEEEauthorblockN`/`\IEEEauthorblockA` pairs, math mode
/// superscripts, ...) and turns it into authors with affiliations.
///
/// # Implementation Guide
///
/// - `ID`: stable identifier stored with every candidate
/// - `validate()`: a cheap structural precondition; no allocation-heavy work
/// - `extract()`: the actual extraction; pure and self-contained
///
/// Every scheme whose `validate` holds is extracted and scored, so `validate`
/// may overlap with other schemes. Both functions receive the lower-cased
/// command name and the concatenated top-level `{...}` groups of the command,
/// braces kept.
///
/// # Error Handling
///
/// Schemes never fail. Input a scheme cannot make sense of produces an empty
/// list, which the dispatcher drops.
///
/// # Example
///
/// ```ignore
/// use affilmatch::models::Author;
/// use affilmatch::schemes::SingleCommandScheme;
///
/// pub struct NameOnly;
///
/// impl SingleCommandScheme for NameOnly {
///     const ID: &'static str = "NameOnly";
///
///     fn validate(cmd_name: &str, _content: &str) -> bool {
///         cmd_name == "author"
///     }
///
///     fn extract(_cmd_name: &str, content: &str) -> Vec<Author> {
///         vec![Author::without_affiliation(content.trim_matches(|c| c == '{' || c == '}'))]
///     }
/// }
/// ```
pub trait SingleCommandScheme {
    /// Identifier stored in [`ExtractionCandidate::scheme_id`].
    const ID: &'static str;

    /// Whether the command looks like this scheme's convention.
    fn validate(cmd_name: &str, content: &str) -> bool;

    /// Extracts the authors. Only called when `validate` holds.
    fn extract(cmd_name: &str, content: &str) -> Vec<Author>;
}

/// An extraction strategy for authorship spread over several commands, e.g.
/// `\author[1]{...}` followed by `\address[1]{...}`.
///
/// Both functions receive the sanitized commands in document order.
pub trait MultiCommandScheme {
    const ID: &'static str;

    fn validate(commands: &[String]) -> bool;

    fn extract(commands: &[String]) -> Vec<Author>;
}

macro_rules! define_single_schemes {
    ($($scheme:ty),* $(,)?) => {
        /// Identifiers of the single-command schemes in registration order.
        pub const SINGLE_SCHEME_IDS: &[&str] = &[$(<$scheme>::ID),*];

        fn run_single_schemes(cmd_name: &str, content: &str) -> Vec<(&'static str, Vec<Author>)> {
            let mut results = Vec::new();
            $(
                if <$scheme>::validate(cmd_name, content) {
                    results.push((<$scheme>::ID, <$scheme>::extract(cmd_name, content)));
                }
            )*
            results
        }
    };
}

macro_rules! define_multi_schemes {
    ($($scheme:ty),* $(,)?) => {
        /// Identifiers of the multi-command schemes in registration order.
        pub const MULTI_SCHEME_IDS: &[&str] = &[$(<$scheme>::ID),*];

        fn run_multi_schemes(commands: &[String]) -> Vec<(&'static str, Vec<Author>)> {
            let mut results = Vec::new();
            $(
                if <$scheme>::validate(commands) {
                    results.push((<$scheme>::ID, <$scheme>::extract(commands)));
                }
            )*
            results
        }
    };
}

define_single_schemes! {
    AlignAuthorAffAddr,
    AffMarkAffAddr,
    AffMarkNoAffAddr,
    AffAddr,
    AffAddrMathMode,
    AuthorBlock,
    AuthorBlockWithRef,
    AuthorBlockMath,
    NameAffiliation,
    AffiliationMath,
    Affiliations,
    NameAffil,
    AffilRefInst,
    AffilMath,
    AuthorAddress,
    ArticleAuthors,
    Institute,
    AuthorNameAffiliation,
    AuthorInfoSingle,
    AuthorInfoMath,
    NameAddr,
    NameAddrTextSuperScript,
    FootnoteMark,
    Footnote,
    CompSocItemizeThanks,
    AuthorMathModeAff,
    AuthorTextSuperScript,
    AuthorDoubleTextSuperScript,
    AuthorTextSuperScriptNameAffil,
    RrAuthorThanks,
    RrAuthorThanksRef,
    RrAuthorNoThanks,
    Thanks,
    ThanksMath,
    ThanksWith,
    ThanksWithMath,
}

define_multi_schemes! {
    OptionalArgumentId,
    LeftRightSuper,
    AuthorAffiliationSequence,
    IcmlAuthors,
}

pub use self::affaddr::{AffAddr, AffAddrMathMode, AffMarkAffAddr, AffMarkNoAffAddr, AlignAuthorAffAddr};
pub use self::affil::{AffilMath, AffilRefInst, NameAffil};
pub use self::affiliation::{AffiliationMath, Affiliations, NameAffiliation};
pub use self::article_authors::ArticleAuthors;
pub use self::author_address::AuthorAddress;
pub use self::author_block::{AuthorBlock, AuthorBlockMath, AuthorBlockWithRef};
pub use self::author_info::{AuthorInfoMath, AuthorInfoSingle};
pub use self::author_name::AuthorNameAffiliation;
pub use self::compsoc::CompSocItemizeThanks;
pub use self::footnote::{Footnote, FootnoteMark};
pub use self::institute::Institute;
pub use self::math_mode::AuthorMathModeAff;
pub use self::multi::{AuthorAffiliationSequence, IcmlAuthors, LeftRightSuper, OptionalArgumentId};
pub use self::name_addr::{NameAddr, NameAddrTextSuperScript};
pub use self::rr_author::{RrAuthorNoThanks, RrAuthorThanks, RrAuthorThanksRef};
pub use self::textsuperscript::{AuthorDoubleTextSuperScript, AuthorTextSuperScript, AuthorTextSuperScriptNameAffil};
pub use self::thanks::{Thanks, ThanksMath, ThanksWith, ThanksWithMath};

/// Runs every applicable scheme over a paper's sanitized commands and scores
/// the results against the declared authors.
///
/// One command goes through the single-command schemes. Several commands go
/// through the multi-command schemes first; when none of them applies the
/// commands are merged into one `\author{}` and handled as a single command.
///
/// Returns `None` when no scheme produced any author.
pub fn extract_authors(commands: &[String], declared: &[Author], weights: &ScoreWeights) -> Option<ExtractionResult> {
    match commands {
        [] => None,
        [command] => extract_single(command, ExtractionKind::Single, declared, weights),
        _ => {
            let results = run_multi_schemes(commands);
            if results.is_empty() {
                let wrapped = format!(r"\author{{{}}}", commands.join(" "));
                debug!("No multi-command scheme applies. {}: {}", WRAPPED_ORIGINAL, wrapped);
                return extract_single(&wrapped, ExtractionKind::Wrapped, declared, weights);
            }
            into_result(results, ExtractionKind::Multi, declared, weights)
        }
    }
}

/// Whether any multi-command scheme applies to `commands`.
pub fn has_multi_scheme(commands: &[String]) -> bool {
    !run_multi_schemes(commands).is_empty()
}

fn extract_single(
    command: &str,
    kind: ExtractionKind,
    declared: &[Author],
    weights: &ScoreWeights,
) -> Option<ExtractionResult> {
    let cmd_name = command_name(command).to_lowercase();
    let content = command_content(command);
    if cmd_name.is_empty() || content.is_empty() {
        warn!("Could not read name or content of command '{}'", command);
        return None;
    }

    let results = run_single_schemes(&cmd_name, &content);
    if results.is_empty() {
        debug!("No single-command scheme applies to '{}'", command);
    }
    into_result(results, kind, declared, weights)
}

fn into_result(
    results: Vec<(&'static str, Vec<Author>)>,
    kind: ExtractionKind,
    declared: &[Author],
    weights: &ScoreWeights,
) -> Option<ExtractionResult> {
    let candidates: Vec<ExtractionCandidate> = results
        .into_iter()
        .filter(|(_, authors)| !authors.is_empty())
        .map(|(scheme_id, authors)| ExtractionCandidate {
            scheme_id: scheme_id.to_string(),
            score: score_authors(&authors, declared, weights),
            authors,
        })
        .collect();

    (!candidates.is_empty()).then_some(ExtractionResult { kind, candidates })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declared(names: &[&str]) -> Vec<Author> {
        names.iter().map(|name| Author::without_affiliation(*name)).collect()
    }

    #[test]
    fn test_registry_is_complete() {
        assert_eq!(SINGLE_SCHEME_IDS.len(), 36);
        assert_eq!(MULTI_SCHEME_IDS.len(), 4);
        assert_eq!(SINGLE_SCHEME_IDS.first(), Some(&"AlignAuthorAffAddr"));
        assert_eq!(SINGLE_SCHEME_IDS.last(), Some(&"ThanksWithMath"));
    }

    #[test]
    fn test_no_commands_no_result() {
        assert!(extract_authors(&[], &declared(&["Jane Doe"]), &ScoreWeights::default()).is_none());
    }

    #[test]
    fn test_single_affaddr_command() {
        let commands = vec![r"\author{Jane Doe\affaddr{MIT}}".to_string()];
        let result = extract_authors(&commands, &declared(&["Jane Doe"]), &ScoreWeights::default())
            .expect("an affaddr scheme should apply");
        assert_eq!(result.kind, ExtractionKind::Single);

        let best = result.best().expect("at least one candidate");
        assert_eq!(best.authors, vec![Author::new("Jane Doe", ["MIT"])]);
        assert!((best.score - 1.0).abs() < 1e-9, "score was {}", best.score);
    }

    #[test]
    fn test_several_commands_are_wrapped() {
        let commands = vec![r"\author{Jane Doe}".to_string(), r"\thanks{MIT}".to_string()];
        assert!(!has_multi_scheme(&commands));

        let result = extract_authors(&commands, &declared(&["Jane Doe"]), &ScoreWeights::default())
            .expect("wrapped command should be extracted");
        assert_eq!(result.kind, ExtractionKind::Wrapped);
        let best = result.best().expect("at least one candidate");
        assert_eq!(best.scheme_id, "Thanks");
        assert_eq!(best.authors, vec![Author::new("Jane Doe", ["MIT"])]);
    }

    #[test]
    fn test_unrecognized_command_gives_nothing() {
        let commands = vec![r"\author{}".to_string()];
        assert!(extract_authors(&commands, &[], &ScoreWeights::default()).is_none());
    }

    #[test]
    fn test_candidates_keep_registration_order() {
        let commands = vec![r"\author{Jane Doe\thanks{MIT} \and John Roe\thanks{ETH}}".to_string()];
        let result = extract_authors(&commands, &declared(&["Jane Doe", "John Roe"]), &ScoreWeights::default())
            .expect("thanks schemes should apply");
        let positions: Vec<usize> = result
            .candidates
            .iter()
            .filter_map(|c| SINGLE_SCHEME_IDS.iter().position(|id| *id == c.scheme_id))
            .collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
        assert!(result.candidates.iter().any(|c| c.scheme_id == "Thanks"));
    }
}
