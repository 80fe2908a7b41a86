use crate::latex::patterns::{ADDRESS, AUTHOR};
use crate::models::Author;

use super::SingleCommandScheme;
use super::author_name::first_names_with_first_affiliation;
use super::util::contains_ci;

/// `\author{Jane Doe and John Roe} \address{MIT}`
pub struct AuthorAddress;

impl SingleCommandScheme for AuthorAddress {
    const ID: &'static str = "AuthorAddress";

    fn validate(_cmd_name: &str, content: &str) -> bool {
        contains_ci(content, r"\author{") && contains_ci(content, r"\address{")
    }

    fn extract(_cmd_name: &str, content: &str) -> Vec<Author> {
        first_names_with_first_affiliation(content, &AUTHOR, &ADDRESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_author_address() {
        let content = r"{\author{Jane Doe and John Roe} \address{Dept. of CS, MIT}}";
        assert!(AuthorAddress::validate("author", content));
        assert!(!AuthorAddress::validate("author", r"{Jane Doe \address{MIT}}"));
        assert_eq!(
            AuthorAddress::extract("author", content),
            vec![
                Author::new("Jane Doe", ["Dept. of CS, MIT"]),
                Author::new("John Roe", ["Dept. of CS, MIT"]),
            ]
        );
    }
}
