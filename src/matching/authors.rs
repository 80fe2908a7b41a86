//! Pairs declared authors with extracted authors by name.

use crate::models::Author;

use super::fuzz::name_similarity;

/// One declared author and the extracted author closest to it.
#[derive(Debug, Clone, PartialEq)]
pub struct NameMatch<'a> {
    pub score: f64,
    pub declared: &'a Author,
    pub extracted: &'a Author,
}

/// Matches every declared author to an extracted author.
///
/// With lists of equal length every extracted author is used at most once,
/// in declared order. Otherwise at least one list is assumed to be wrong
/// and every declared author is matched against all extracted authors.
pub fn match_authors<'a>(declared: &'a [Author], extracted: &'a [Author]) -> Vec<NameMatch<'a>> {
    if extracted.is_empty() {
        return Vec::new();
    }
    if declared.len() == extracted.len() {
        match_equal_cardinality(declared, extracted)
    } else {
        declared
            .iter()
            .filter_map(|author| best_match(author, extracted.iter()))
            .collect()
    }
}

fn match_equal_cardinality<'a>(declared: &'a [Author], extracted: &'a [Author]) -> Vec<NameMatch<'a>> {
    let mut pool: Vec<&Author> = extracted.iter().collect();
    let mut matches = Vec::with_capacity(declared.len());
    for author in declared {
        let Some(found) = best_match(author, pool.iter().copied()) else {
            break;
        };
        if let Some(position) = pool.iter().position(|candidate| std::ptr::eq(*candidate, found.extracted)) {
            pool.remove(position);
        }
        matches.push(found);
    }
    matches
}

/// The first extracted author with the highest similarity.
fn best_match<'a>(author: &'a Author, pool: impl Iterator<Item = &'a Author>) -> Option<NameMatch<'a>> {
    let mut best: Option<NameMatch<'a>> = None;
    for candidate in pool {
        let score = name_similarity(&author.name, &candidate.name);
        if best.as_ref().is_none_or(|current| score > current.score) {
            best = Some(NameMatch {
                score,
                declared: author,
                extracted: candidate,
            });
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authors(names: &[&str]) -> Vec<Author> {
        names.iter().map(|name| Author::without_affiliation(*name)).collect()
    }

    fn pairs<'a>(matches: &[NameMatch<'a>]) -> Vec<(&'a str, &'a str)> {
        matches
            .iter()
            .map(|m| (m.declared.name.as_str(), m.extracted.name.as_str()))
            .collect()
    }

    #[test]
    fn test_equal_cardinality_removes_matched_authors() {
        let declared = authors(&["Jane Doe", "Jane Doe"]);
        let extracted = authors(&["Jane Doe", "J. Roe"]);
        let matches = match_authors(&declared, &extracted);
        assert_eq!(pairs(&matches), vec![("Jane Doe", "Jane Doe"), ("Jane Doe", "J. Roe")]);
        assert_eq!(matches[0].score, 1.0);
        assert!(matches[1].score < 1.0);
    }

    #[test]
    fn test_equal_cardinality_reorders() {
        let declared = authors(&["John Roe", "Jane Doe"]);
        let extracted = authors(&["Jane Doe", "John Roe"]);
        let matches = match_authors(&declared, &extracted);
        assert_eq!(pairs(&matches), vec![("John Roe", "John Roe"), ("Jane Doe", "Jane Doe")]);
    }

    #[test]
    fn test_unequal_cardinality_reuses_authors() {
        let declared = authors(&["Jane Doe", "Jane Doe", "John Roe"]);
        let extracted = authors(&["Jane Doe", "John Roe"]);
        let matches = match_authors(&declared, &extracted);
        assert_eq!(
            pairs(&matches),
            vec![("Jane Doe", "Jane Doe"), ("Jane Doe", "Jane Doe"), ("John Roe", "John Roe")]
        );
    }

    #[test]
    fn test_empty_pool() {
        assert!(match_authors(&authors(&["Jane Doe"]), &[]).is_empty());
        assert!(match_authors(&[], &authors(&["Jane Doe"])).is_empty());
    }

    #[test]
    fn test_ties_go_to_first_candidate() {
        let declared = authors(&["Ann"]);
        let extracted = authors(&["Bob", "Cid"]);
        let matches = match_authors(&declared, &extracted);
        assert_eq!(pairs(&matches), vec![("Ann", "Bob")]);
        assert_eq!(matches[0].score, 0.0);
    }
}
