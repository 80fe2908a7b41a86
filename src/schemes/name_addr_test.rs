#[cfg(test)]
mod tests {
    use crate::models::Author;
    use crate::schemes::{NameAddr, NameAddrTextSuperScript, SingleCommandScheme};

    #[test]
    fn test_name_addr_prefix_form() {
        let content = r"{\name Jane Doe \name John Roe \addr MIT \addr Cambridge, USA \name Ann Lee \addr ETH}";
        assert!(NameAddr::validate("author", content));
        assert!(!NameAddrTextSuperScript::validate("author", content));

        assert_eq!(
            NameAddr::extract("author", content),
            vec![
                Author::new("Jane Doe", ["MIT", "Cambridge, USA"]),
                Author::new("John Roe", ["MIT", "Cambridge, USA"]),
                Author::new("Ann Lee", ["ETH"]),
            ]
        );
    }

    #[test]
    fn test_name_addr_argument_form() {
        let content = r"{\name{Jane Doe} \addr{MIT}}";
        assert_eq!(NameAddr::extract("author", content), vec![Author::new("Jane Doe", ["MIT"])]);
    }

    #[test]
    fn test_name_addr_rejects_address() {
        assert!(!NameAddr::validate("author", r"{\name{Jane Doe} \address{MIT}}"));
    }

    #[test]
    fn test_name_addr_textsuperscript() {
        let content = r"{\name{Jane Doe\textsuperscript{1}} \name{John Roe\textsuperscript{1}\textsuperscript{2}} \addr{\textsuperscript{1}MIT} \addr{\textsuperscript{2}ETH}}";
        assert!(NameAddrTextSuperScript::validate("author", content));

        assert_eq!(
            NameAddrTextSuperScript::extract("author", content),
            vec![Author::new("Jane Doe", ["MIT"]), Author::new("John Roe", ["MIT", "ETH"])]
        );
    }
}
