//! LaTeX handling: locating author and affiliation commands in a document and
//! normalizing them for the extraction schemes.

pub mod balanced;
pub mod command;
mod comments;
pub mod diacritics;
mod extract;
pub mod patterns;
mod sanitize;
pub mod trie;

pub use comments::remove_comments;
pub use extract::{extract_commands, extract_document_class, is_empty_command};
pub use sanitize::{collapse_whitespace, remove_latex_newlines, sanitize_command};
