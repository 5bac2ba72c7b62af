// PasteVault - Recherche dans l'historique
// Filtrage par expression reguliere, insensible a la casse
//
// # Algorithme
// Un seul parcours de l'historique. Un element correspond si :
// - le motif est un petit nombre (moins de SEARCH_INDEX_MAX_LEN chiffres
//   ASCII) egal a sa position, ou
// - sa valeur contient une correspondance non vide du motif.
// L'expression est compilee insensible a la casse, multi-ligne, et `.`
// reconnait aussi les retours a la ligne.
// Les indices sont retournes dans l'ordre croissant.

use crate::constants::SEARCH_INDEX_MAX_LEN;
use crate::error::PvResult;
use crate::history::item::Item;
use crate::history::store::History;
use regex::RegexBuilder;

/// Indices des elements correspondant au motif.
pub fn search_items(items: &[Item], pattern: &str) -> PvResult<Vec<usize>> {
    let regex = RegexBuilder::new(pattern)
        .case_insensitive(true)
        .multi_line(true)
        .dot_matches_new_line(true)
        .build()?;
    let literal_index = literal_index(pattern);

    Ok(items
        .iter()
        .enumerate()
        .filter(|(i, item)| {
            literal_index == Some(*i) || regex.find_iter(item.value()).any(|m| !m.is_empty())
        })
        .map(|(i, _)| i)
        .collect())
}

/// Position designee par un motif purement numerique et court.
fn literal_index(pattern: &str) -> Option<usize> {
    if pattern.is_empty()
        || pattern.len() >= SEARCH_INDEX_MAX_LEN
        || !pattern.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    pattern.parse().ok()
}

impl History {
    /// Recherche dans l'historique courant.
    pub fn search(&self, pattern: &str) -> PvResult<Vec<usize>> {
        search_items(self.items(), pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PvError;

    fn texts(values: &[&str]) -> Vec<Item> {
        values.iter().map(|v| Item::text(*v)).collect()
    }

    #[test]
    fn test_search_case_insensitive() {
        let items = texts(&["Hello World", "foo bar", "HELLO"]);
        assert_eq!(search_items(&items, "hello").unwrap(), vec![0, 2]);
    }

    #[test]
    fn test_search_regex() {
        let items = texts(&["id: 42", "id: x", "no id"]);
        assert_eq!(search_items(&items, r"^id: \d+$").unwrap(), vec![0]);
    }

    #[test]
    fn test_search_dot_matches_newline() {
        let items = texts(&["first\nsecond", "first second"]);
        assert_eq!(search_items(&items, "first.second").unwrap(), vec![0, 1]);
        assert_eq!(search_items(&items, "^second").unwrap(), vec![0]);
    }

    #[test]
    fn test_search_ignores_empty_matches() {
        let items = texts(&["abc", ""]);
        assert_eq!(search_items(&items, "x*").unwrap(), Vec::<usize>::new());
    }

    #[test]
    fn test_search_numeric_includes_index() {
        let items = texts(&["a", "b", "c", "d", "e 12"]);
        assert_eq!(search_items(&items, "3").unwrap(), vec![3]);
        assert_eq!(search_items(&items, "12").unwrap(), vec![4]);
        assert_eq!(search_items(&items, "0").unwrap(), vec![0]);
    }

    #[test]
    fn test_search_long_number_is_plain_pattern() {
        let items = texts(&["a", "b", "call 12345"]);
        assert_eq!(literal_index("12345"), None);
        assert_eq!(search_items(&items, "12345").unwrap(), vec![2]);
    }

    #[test]
    fn test_search_invalid_pattern() {
        let items = texts(&["a"]);
        assert!(matches!(search_items(&items, "("), Err(PvError::Pattern(_))));
    }

    #[test]
    fn test_history_search() {
        let dir = tempfile::tempdir().unwrap();
        let mut h = crate::history::store::tests::history_in(dir.path());
        for v in ["alpha", "beta", "gamma", "delta"] {
            h.add(Item::text(v)).unwrap();
        }
        // ordre : delta, gamma, beta, alpha
        assert_eq!(h.search("ta$").unwrap(), vec![0, 2]);
        assert_eq!(h.search("3").unwrap(), vec![3]);
    }
}
