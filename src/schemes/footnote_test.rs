#[cfg(test)]
mod tests {
    use crate::models::Author;
    use crate::schemes::{Footnote, FootnoteMark, SingleCommandScheme};

    #[test]
    fn test_footnote_mark() {
        let content = r"{Jane Doe\footnotemark[1] \and John Roe\footnotemark[1]\footnotemark[2] \\ \footnotemark[1] MIT \\ \footnotemark[2] ETH}";
        assert!(FootnoteMark::validate("author", content));
        assert!(!Footnote::validate("author", content));

        assert_eq!(
            FootnoteMark::extract("author", content),
            vec![Author::new("Jane Doe", ["MIT"]), Author::new("John Roe", ["MIT", "ETH"])]
        );
    }

    #[test]
    fn test_footnote_mark_affiliations_on_one_line() {
        let content = r"{Nicholas Manoukis\footnotemark[2] \and Eric Anderson\footnotemark[4] \\ \footnotemark[2] National Institutes of Health \footnotemark[4] Southwest Fisheries Science Center}";
        assert!(FootnoteMark::validate("author", content));
        assert_eq!(
            FootnoteMark::extract("author", content),
            vec![
                Author::new("Nicholas Manoukis", ["National Institutes of Health"]),
                Author::new("Eric Anderson", ["Southwest Fisheries Science Center"]),
            ]
        );
    }

    #[test]
    fn test_footnote_mark_needs_every_reference_twice() {
        assert!(!FootnoteMark::validate("author", r"{Jane\footnotemark[1] \\ \footnotemark[2] MIT}"));
        assert!(!FootnoteMark::validate("author", r"{Jane Doe \footnote{MIT}}"));
    }

    #[test]
    fn test_footnote() {
        let content = r"{Asim Abdulkhaleq\footnote{University of Stuttgart, Asim.Abdulkhaleq@informatik.uni-stuttgart.de}, Daniel Lammering \footnote{Continental, Regensburg, Germany} and Pierre Blueher \footnote{Continental, Frankfurt am Main, Germany}}";
        assert!(Footnote::validate("author", content));
        assert!(!FootnoteMark::validate("author", content));

        assert_eq!(
            Footnote::extract("author", content),
            vec![
                Author::new("Asim Abdulkhaleq", ["University of Stuttgart"]),
                Author::new("Daniel Lammering", ["Continental, Regensburg, Germany"]),
                Author::new("Pierre Blueher", ["Continental, Frankfurt am Main, Germany"]),
            ]
        );
    }
}
