#[cfg(test)]
mod tests {
    use crate::models::Author;
    use crate::schemes::rr_author::DEFAULT_AFFILIATION;
    use crate::schemes::{RrAuthorNoThanks, RrAuthorThanks, RrAuthorThanksRef, SingleCommandScheme};

    #[test]
    fn test_rr_author_thanks_comma_separated() {
        let content = r"{Jane Doe\thanks{MIT, Cambridge}, John Roe}";
        assert!(RrAuthorThanks::validate("rrauthor", content));
        assert!(!RrAuthorThanks::validate("author", content));
        assert!(!RrAuthorNoThanks::validate("rrauthor", content));

        assert_eq!(
            RrAuthorThanks::extract("rrauthor", content),
            vec![
                Author::new("Jane Doe", ["MIT, Cambridge"]),
                Author::new("John Roe", [DEFAULT_AFFILIATION]),
            ]
        );
    }

    #[test]
    fn test_rr_author_thanks_and_separated() {
        let content = r"{Jane Doe\thanks{ETH Zurich} \and John Roe\thanks{MIT}}";
        assert_eq!(
            RrAuthorThanks::extract("rrauthor", content),
            vec![Author::new("Jane Doe", ["ETH Zurich"]), Author::new("John Roe", ["MIT"])]
        );
    }

    #[test]
    fn test_rr_author_thanks_ref() {
        let content = r"{Jane Doe\thanks[eth]{ETH Zurich} \and John Roe\thanksref{eth} \and Ann Lee\thanks{MIT} \and Bob Stone}";
        assert!(RrAuthorThanksRef::validate("rrauthor", content));
        assert!(!RrAuthorThanks::validate("rrauthor", content));

        assert_eq!(
            RrAuthorThanksRef::extract("rrauthor", content),
            vec![
                Author::new("Jane Doe", ["ETH Zurich"]),
                Author::new("John Roe", ["ETH Zurich"]),
                Author::new("Ann Lee", ["MIT"]),
                Author::new("Bob Stone", [DEFAULT_AFFILIATION]),
            ]
        );
    }

    #[test]
    fn test_rr_author_without_thanks() {
        let content = r"{Jane Doe \and John Roe, Ann Lee}";
        assert!(RrAuthorNoThanks::validate("rrauthor", content));
        assert_eq!(
            RrAuthorNoThanks::extract("rrauthor", content),
            vec![
                Author::new("Jane Doe", [DEFAULT_AFFILIATION]),
                Author::new("John Roe", [DEFAULT_AFFILIATION]),
                Author::new("Ann Lee", [DEFAULT_AFFILIATION]),
            ]
        );
    }
}
