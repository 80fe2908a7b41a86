#[cfg(test)]
mod tests {
    use crate::models::Author;
    use crate::schemes::{AffilMath, AffilRefInst, NameAffil, SingleCommandScheme};

    #[test]
    fn test_name_affil() {
        let content = r"{Asim Abdulkhaleq \affil{University of Stuttgart, Germany} Stefan Wagner \affil{University of Stuttgart, Germany}}";
        assert!(NameAffil::validate("author", content));
        assert!(!AffilMath::validate("author", content));

        let affiliation = "University of Stuttgart, Germany";
        assert_eq!(
            NameAffil::extract("author", content),
            vec![
                Author::new("Asim Abdulkhaleq", [affiliation]),
                Author::new("Stefan Wagner", [affiliation]),
            ]
        );
    }

    #[test]
    fn test_name_affil_unwraps_name_and_splits_names() {
        let content = r"{\name{Jane Doe and John Roe} \affil{MIT}}";
        assert_eq!(
            NameAffil::extract("author", content),
            vec![Author::new("Jane Doe", ["MIT"]), Author::new("John Roe", ["MIT"])]
        );
    }

    #[test]
    fn test_name_affil_rejects_references() {
        assert!(!NameAffil::validate("author", r"{Jane$^1$ \affil{$^1$MIT}}"));
        assert!(!NameAffil::validate("author", r"{Jane\inst{1} \affil{MIT}}"));
    }

    #[test]
    fn test_affil_ref_inst() {
        let content = r"{Jane Doe\affil{1} \affil{2}, John Roe\affil{2} \inst{1}MIT \inst{2}ETH}";
        assert!(AffilRefInst::validate("author", content));
        assert_eq!(
            AffilRefInst::extract("author", content),
            vec![Author::new("Jane Doe", ["MIT", "ETH"]), Author::new("John Roe", ["ETH"])]
        );
    }

    #[test]
    fn test_affil_math() {
        let content = r"{Jane Doe$^{1}$, John Roe$^{2}$ \affil{$^1$MIT} \affil{$^2$ETH}}";
        assert!(AffilMath::validate("author", content));
        assert_eq!(
            AffilMath::extract("author", content),
            vec![Author::new("Jane Doe", ["MIT"]), Author::new("John Roe", ["ETH"])]
        );
    }
}
