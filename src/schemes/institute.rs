use crate::latex::command::split_before;
use crate::latex::patterns::{INSTITUTE, split_on_separator};
use crate::latex::remove_latex_newlines;
use crate::models::Author;

use super::SingleCommandScheme;
use super::util::{Gap, contains_ci, join_adjacent, sanitize_text, share_affiliation, strip_outer};

/// `Jane Doe \institute{MIT} \and John Roe \institute{ETH}`
pub struct Institute;

impl SingleCommandScheme for Institute {
    const ID: &'static str = "Institute";

    fn validate(_cmd_name: &str, content: &str) -> bool {
        if !contains_ci(content, r"\institute") {
            return false;
        }
        // nothing but an optional `\and` may follow the last \institute{}
        let inner = strip_outer(content).trim();
        let Some(last) = INSTITUTE.find_iter(inner).pop() else {
            return false;
        };
        let rest = inner[last.end..].trim();
        rest.is_empty() || rest.eq_ignore_ascii_case(r"\and")
    }

    fn extract(_cmd_name: &str, content: &str) -> Vec<Author> {
        let content = remove_latex_newlines(content);
        let content = join_adjacent(&content, &INSTITUTE, Gap::Whitespace, |a, b| format!(r"\institute{{{a}, {b}}}"));

        split_before(&INSTITUTE, &content)
            .into_iter()
            .flat_map(|(names, institute)| {
                let affiliation = sanitize_text(institute.content_inner());
                share_affiliation(split_on_separator(names.trim()), &affiliation)
            })
            .collect()
    }
}
