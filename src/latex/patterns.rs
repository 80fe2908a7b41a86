//! Command vocabularies and compiled patterns shared by the sanitizer, the
//! command extractor and the extraction schemes.
//!
//! - Keyword sets are compiled with [`trie_pattern`].
//! - Anything with a nested `{...}` argument is a [`CommandPattern`]; plain
//!   regexes are used for flat structures only.
//! - Patterns that need "not preceded by" checks are paired with a guard at
//!   the call site (see [`super::command::is_escaped`]).

use regex::Regex;
use std::sync::LazyLock;

use super::command::{CommandPattern, Guard, OptionalArgs};
use super::trie::trie_pattern;

// ── Vocabularies ──

/// Commands that carry author names.
pub const AUTHOR_COMMANDS: &[&str] = &[
    "addauthor",
    "additionalauthors",
    "aistatsauthor",
    "articleauthors",
    "auteur",
    "auteurs",
    "author",
    "authora",
    "authoranon",
    "authorb",
    "authorbio",
    "authorblockN",
    "authorc",
    "authord",
    "authore",
    "authorinfo",
    "authorlist",
    "authorname",
    "authors",
    "authorsn",
    "author*",
    "authoreightname",
    "authorfivename",
    "authorfourname",
    "authorninename",
    "authoronename",
    "authorsevenname",
    "authorsixname",
    "authortenname",
    "authorthreename",
    "authortwoname",
    "firstauthorname",
    "secondauthorname",
    "thirdauthorname",
    "fourthauthorname",
    "hpcaauthors",
    "icmlauthor",
    "ieeeauthorblockn",
    "longauthor",
    "maintitleauthorlist",
    "midlauthor",
    "mlsysauthor",
    "name",
    "neutrAuthorListBib",
    "oneauthor",
    "rrauthor",
    "sauthor",
    "setauthor",
    "setauthors",
    "sysmlauthor",
    "thanks",
    "thesisauthor",
    "trauthor",
    "twoauthors",
];

/// Commands that carry affiliations.
pub const AFFILIATION_COMMANDS: &[&str] = &[
    "address",
    "additionalaffiliation",
    "affa",
    "affaddr",
    "affgrous",
    "affb",
    "affc",
    "affd",
    "affe",
    "affil",
    "affiliate",
    "affilOne",
    "affiliation",
    "affiliationa",
    "affiliationb",
    "affiliationc",
    "affiliations",
    "affrdc",
    "affzack",
    "aistatsaddress",
    "authoraaddr",
    "authoraddr",
    "authoraffiliation",
    "authorbaddr",
    "authorblockA",
    "authorcaddr",
    "authordaddr",
    "authoreaddr",
    "authoreightaffil",
    "authorfiveaffil",
    "authorfouraffil",
    "authornineaffil",
    "authoroneaffil",
    "authorsevenaffil",
    "authorsixaffil",
    "authortenaffil",
    "authorthreeaffil",
    "authortwoaffil",
    "hpcaaffiliation",
    "icmlaffiliation",
    "icmladdress",
    "ieeeauthorblocka",
    "inst",
    "institute",
    "institutes",
    "institution",
    "institutions",
    "longaddress",
    "lyxaddress",
    "mlsysaffiliation",
    "neutrAddress",
    "neutrDepartment",
    "neutrInstitution",
    "publishers",
    "setaffiliation",
    "sysmlaffiliation",
    "thesislocation",
    "trgroup",
];

/// Formatting commands without arguments.
const USELESS_NO_ARG_COMMANDS: &[&str] = &[
    "baselineskip",
    "bigskip",
    "centering",
    "enspace",
    "enskip",
    "hskip",
    "hfill",
    "medskip",
    "negthickspace",
    "protect",
    "selectfont",
    "smallskip",
    "space",
    "xspace",
];

/// Commands removed together with their arguments.
const USELESS_COMMANDS: &[&str] = &[
    "color",
    "corauthref",
    "corr",
    "corref",
    "date",
    "email",
    "fnref",
    "fontsize",
    "hspace",
    "hspace*",
    "ieeemembership",
    "includegraphics",
    "postcode",
    "revised",
    "state",
    "street",
    "streetaddress",
    "strut",
    "textcolor",
    "url",
    "vspace*",
    "vspace",
];

/// Font size and style switches, usable as `{\bf text}` or `\textbf{text}`.
const LATEX_STYLES: &[&str] = &[
    "tiny",
    "scriptsize",
    "footnotesize",
    "normalsize",
    "small",
    "large",
    "huge",
    "em",
    "emph",
    "rm",
    "sf",
    "tt",
    "it",
    "sl",
    "sc",
    "bf",
    "textbf",
    "textit",
    "textlf",
    "textmd",
    "textnormal",
    "textrm",
    "textsc",
    "textsf",
    "textsl",
    "texttt",
    "textup",
    "normalfont",
    "rmfamily",
    "sffamily",
    "ttfamily",
    "upshape",
    "itshape",
    "slshape",
    "scshape",
    "bfseries",
    "mdseries",
    "lfseries",
];

/// Commands replaced by their arguments.
const UNWRAPPABLE_COMMANDS: &[&str] = &[
    "au",
    "auth",
    "city",
    "country",
    "cwanon",
    "department",
    "fnm",
    "fnms",
    "href",
    "lowercase",
    "makebox",
    "maketextuppercase",
    "mbox",
    "orgaddress",
    "orgdiv",
    "orgname",
    "snm",
    "sfx",
    "spfx",
    "sur",
    "text",
    "underline",
    "uppercase",
];

/// Words that may sit between the verb and the preposition of a predicative
/// expression (`X is an assistant professor at Y`).
const PREDICATE_FILLERS: &[&str] = &[
    "a",
    "affiliated",
    "also",
    "an",
    "appointments",
    "assistant",
    "associated",
    "candidate",
    "currently",
    "doctoral",
    "full",
    "graduate",
    "head",
    "master",
    "ph.d",
    "professor",
    "shared",
    "student",
];

fn styles_pattern() -> String {
    trie_pattern(LATEX_STYLES)
}

fn build(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap()
}

// ── Command location ──

/// Any known author or affiliation command with up to three arguments.
pub static AUTHORSHIP: LazyLock<CommandPattern> = LazyLock::new(|| {
    let names = trie_pattern(AUTHOR_COMMANDS.iter().chain(AFFILIATION_COMMANDS));
    CommandPattern::builder(names)
        .star()
        .space_after_name()
        .options(OptionalArgs::Nested)
        .max_args(3)
        .guard(Guard::NotDefinition)
        .build()
        .unwrap()
});

/// `\begin{author}...\end{author}` and the mdx variant.
pub static AUTHORSHIP_ENV: LazyLock<Regex> = LazyLock::new(|| {
    build(r"(?is)\\(?:mdxauthorstart\{\}|begin\{author\})\s*.*?(?:mdxauthorend\{\}|end\{author\})")
});

/// `\documentclass[...]{name}`
pub static DOCUMENTCLASS: LazyLock<CommandPattern> = LazyLock::new(|| {
    CommandPattern::builder("documentclass")
        .space_after_name()
        .options(OptionalArgs::Flat)
        .build()
        .unwrap()
});

/// `\begin{comment}...\end{comment}` blocks.
pub static COMMENT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| build(r"(?is)\\begin\s*\{\s*comment\s*\}.*?\\end\s*\{\s*comment\s*\}"));

// ── Sanitizing ──

/// Commands whose arguments replace them.
pub static UNWRAPPABLE: LazyLock<CommandPattern> = LazyLock::new(|| {
    let names = trie_pattern(UNWRAPPABLE_COMMANDS.iter().chain(LATEX_STYLES));
    CommandPattern::builder(names)
        .options(OptionalArgs::Flat)
        .max_args(3)
        .spaced_args()
        .build()
        .unwrap()
});

/// `\parbox{width}{content}`
pub static PARBOX: LazyLock<CommandPattern> = LazyLock::new(|| {
    CommandPattern::builder("parbox")
        .max_args(2)
        .spaced_args()
        .build()
        .unwrap()
});

/// Any unescaped command with lower case name and at least one argument.
pub static FULL_COMMAND: LazyLock<CommandPattern> = LazyLock::new(|| {
    CommandPattern::builder("[a-z][a-z0-9]+")
        .star()
        .space_after_name()
        .options(OptionalArgs::Flat)
        .max_args(3)
        .spaced_args()
        .guard(Guard::NotEscaped)
        .build()
        .unwrap()
});

/// `{\bf\small text}`: the opening brace and the style switches.
pub static STYLES_IN_TEXT: LazyLock<Regex> =
    LazyLock::new(|| build(&format!(r"(?i)\{{\s*(?:\\(?:{})\s*)+\s", styles_pattern())));

/// Style switches at the very start of a string.
pub static STYLES_START: LazyLock<Regex> =
    LazyLock::new(|| build(&format!(r"(?i)^(?:\\(?:{})\s*)+\s", styles_pattern())));

/// A bare style switch followed by whitespace.
pub static STYLES_NO_CURLY: LazyLock<Regex> =
    LazyLock::new(|| build(&format!(r"(?i)\\(?:{})\s", styles_pattern())));

pub static USELESS_NO_ARGS: LazyLock<Regex> =
    LazyLock::new(|| build(&format!(r"(?i)\\(?:{})", trie_pattern(USELESS_NO_ARG_COMMANDS))));

pub static USELESS: LazyLock<CommandPattern> = LazyLock::new(|| {
    CommandPattern::builder(trie_pattern(USELESS_COMMANDS))
        .options(OptionalArgs::Flat)
        .max_args(3)
        .spaced_args()
        .build()
        .unwrap()
});

/// `\email` left over without an argument.
pub static USELESS_EMAIL: LazyLock<Regex> = LazyLock::new(|| build(r"(?i)\\emails?\s"));

/// Labels such as ` e-mail: ` in front of contact details.
pub static DESCRIPTORS: LazyLock<Regex> = LazyLock::new(|| build(r"(?i)\s(?:e-?mails?|website|link):\s"));

/// `\ `, `\,`, `\!`, `\>`, `\:` and `\;`.
pub static SPACING: LazyLock<Regex> = LazyLock::new(|| build(r"\\[ ,!>:;]"));

pub static MEASUREMENTS: LazyLock<Regex> = LazyLock::new(|| {
    build(r"(?i)\[-?(?:[0-9]+)?\.?[0-9]+(?:pt|mm|cm|in|ex|em|mu|sp|bp|pc|dd|cc|nd|nc)\]")
});

/// `\%`, `\$`, `\{`, `\}`, `\_`, `\#` and `\&`.
pub static ESCAPED_CHARS: LazyLock<Regex> = LazyLock::new(|| build(r"\\(?P<char>[%$\{\}_#&])"));

/// E-mail addresses including the `{a,b}@host` group form.
pub static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    build(
        r"(?i)\(?(?:\\[a-z]*email|e-?mails?:|contacts?:)?\s*(?:\\?\{?[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9.\-]+\\?\}?|\\?\{?\\?\{[a-zA-Z0-9_.+, -]+\\?\}@[a-zA-Z0-9-]+\.[a-zA-Z0-9.\-]+\\?\}?)\)?",
    )
});

pub static SPACE_MULTI: LazyLock<Regex> = LazyLock::new(|| build(r"\s+"));

// ── ORCID ──

const ORCID_ID: &str = r"[0-9]{4}(?:[−\-][0-9]{4}){2}[−\-][0-9]{3}[0-9X]";

pub static ORCID_COMMANDS: LazyLock<CommandPattern> = LazyLock::new(|| {
    CommandPattern::builder(r"(?:lmcs|my)?orcid(?:[a-z]{1,2}|[ivx]+|i(?:con|d)|link|a(?:uthor[a-z]{0,2}|ffil))?")
        .options(OptionalArgs::Flat)
        .build()
        .unwrap()
});

pub static ORCID_PLAIN: LazyLock<Regex> =
    LazyLock::new(|| build(&format!(r"(?i)orcid(?:\s*id)?:?\s*{ORCID_ID}")));

pub static ORCID_URL: LazyLock<Regex> =
    LazyLock::new(|| build(&format!(r"(?i)(?:https?://)?orcid\.org/{ORCID_ID}")));

/// `\href{orcid url}` up to its second argument.
pub static ORCID_HREF_HEAD: LazyLock<Regex> =
    LazyLock::new(|| build(&format!(r"(?i)\\href\{{(?:https?://)?orcid\.org/{ORCID_ID}\}}\s*")));

// ── Separators ──

/// `\and`, `\quad`, `\qquad` and `\cdot`.
pub static SEPARATOR_COMMANDS: LazyLock<Regex> = LazyLock::new(|| build(r"(?i)\\(?:and|qq?uad|cdot)\s*"));

pub static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| build(r"(?i)(?:\\(?:and|qq?uad|cdot)\s*|,|\sand\s)"));

/// Splits names on `\and`, commas and the word `and`; empty parts are dropped.
pub fn split_on_separator(text: &str) -> Vec<String> {
    SEPARATORS
        .split(text)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// `X is with Y`, `X are affiliated with the Y` and similar.
pub static PREDICATIVE_EXPRESSIONS: LazyLock<Regex> = LazyLock::new(|| {
    build(&format!(
        r"(?i)\s+(?:is|are|was|were|works|holds)\s+(?:(?:{})\s+)*(?:of|with|at|to|in)(?:\s+the)?\s+",
        trie_pattern(PREDICATE_FILLERS)
    ))
});

// ── Math mode ──

pub static MATH_MODE: LazyLock<Regex> = LazyLock::new(|| build(r"\$(?P<cnt>[^$]+)\$"));

/// `name $^{ref}$` pairs.
pub static MATH_AUTHOR_REF: LazyLock<Regex> =
    LazyLock::new(|| build(r"(?P<name>.*?)\s*(?P<ref_id>\$[^$]+\$)"));

/// `$^{ref}$ affiliation` pairs.
pub static MATH_AFFILIATION: LazyLock<Regex> =
    LazyLock::new(|| build(r"(?P<ref_id>\$[^$]+\$)\s*(?P<name>[^$]+)"));

// ── Content commands ──

macro_rules! content_commands {
    ($($(#[$doc:meta])* $ident:ident => $names:expr),* $(,)?) => {
        $(
            $(#[$doc])*
            pub static $ident: LazyLock<CommandPattern> =
                LazyLock::new(|| CommandPattern::builder($names).build().unwrap());
        )*
    };
}

content_commands! {
    ADDRESS => "address",
    AFFADDR => "affaddr",
    AFFIL => "affil",
    AFFILIATION => "affiliation",
    ALIGNAUTHOR => "alignauthor",
    AUTHOR => "author",
    AUTHORNAME => "authorname",
    COMPSOC_ITEMIZE => "ieeecompsocitemizethanks",
    FOOTNOTE => "footnote",
    INST => "inst",
    INSTITUTE => "institute",
    INSTITUTION => "institution",
    NAME => "name",
    SUP => "sup",
    /// `\textsuperscript{}` and its `\ts{}` shorthand.
    TEXTSUPERSCRIPT => "t(?:s|extsuperscript)",
    THANKS => "thanks",
    THANKSREF => "thanksref",
    TITLENOTE => "titlenote",
    /// `\authorrefmark{}` including the IEEE variant.
    AUTHORREFMARK => "(?:ieee)?authorrefmark",
}

/// `\affmark[...]`
pub static AFFMARK: LazyLock<CommandPattern> =
    LazyLock::new(|| CommandPattern::builder("affmark").bracket_args().build().unwrap());

/// `\footnotemark[...]`
pub static FOOTNOTEMARK: LazyLock<CommandPattern> =
    LazyLock::new(|| CommandPattern::builder("footnotemark").bracket_args().build().unwrap());
