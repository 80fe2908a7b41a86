#[cfg(test)]
mod tests {
    use crate::models::Author;
    use crate::schemes::{AffiliationMath, Affiliations, NameAffiliation, SingleCommandScheme};

    #[test]
    fn test_name_affiliation_joins_consecutive_affiliations() {
        let content = r"{Emil Vassev\\ \affiliation{Lero}\\ \affiliation{University of Limerick}\\ \and Serguei A. Mokhov \affiliation{Concordia University}}";
        assert!(NameAffiliation::validate("author", content));
        assert!(!AffiliationMath::validate("author", content));

        assert_eq!(
            NameAffiliation::extract("author", content),
            vec![
                Author::new("Emil Vassev", ["Lero, University of Limerick"]),
                Author::new("Serguei A. Mokhov", ["Concordia University"]),
            ]
        );
    }

    #[test]
    fn test_name_affiliation_rejects_other_conventions() {
        assert!(!NameAffiliation::validate("author", r"{\authorname{A} \affiliation{B}}"));
        assert!(!NameAffiliation::validate("author", r"{A \affiliations B}"));
    }

    #[test]
    fn test_affiliation_math() {
        let content = r"{Jane Doe$^1$ $^2$, John Roe$^2$ \affiliation{$^1$MIT} \affiliation{$^2$ETH}}";
        assert!(AffiliationMath::validate("author", content));
        assert_eq!(
            AffiliationMath::extract("author", content),
            vec![Author::new("Jane Doe", ["MIT", "ETH"]), Author::new("John Roe", ["ETH"])]
        );
    }

    #[test]
    fn test_affiliations_section() {
        let content = r"{Jane Doe$^1$, John Roe$^2$ \affiliations $^1$MIT, $^2$ETH}";
        assert!(Affiliations::validate("author", content));
        assert!(!NameAffiliation::validate("author", content));
        assert_eq!(
            Affiliations::extract("author", content),
            vec![Author::new("Jane Doe", ["MIT"]), Author::new("John Roe", ["ETH"])]
        );
    }
}
