use std::sync::LazyLock;

use crate::latex::balanced::skip_whitespace;
use crate::latex::command::CommandPattern;
use crate::latex::patterns::AUTHOR;
use crate::models::Author;

use super::SingleCommandScheme;
use super::util::sanitize_text;

/// `\aff{}` as used inside `\articleauthors{}`.
static AFF: LazyLock<CommandPattern> = LazyLock::new(|| CommandPattern::builder("aff").build().unwrap());

/// `\articleauthors{\author{Jane}\aff{MIT} \author{John}\aff{ETH}}`
pub struct ArticleAuthors;

impl SingleCommandScheme for ArticleAuthors {
    const ID: &'static str = "ArticleAuthors";

    fn validate(cmd_name: &str, _content: &str) -> bool {
        cmd_name == "articleauthors"
    }

    fn extract(_cmd_name: &str, content: &str) -> Vec<Author> {
        AUTHOR
            .find_iter(content)
            .iter()
            .filter_map(|author| {
                let aff_start = skip_whitespace(content, author.end);
                let aff = AFF.find_at(content, aff_start).filter(|aff| aff.start == aff_start)?;
                Some(Author::new(
                    sanitize_text(author.content_inner()),
                    [sanitize_text(aff.content_inner())],
                ))
            })
            .collect()
    }
}
