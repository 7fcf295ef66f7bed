//! Entity canonicalization - collapse repeated and abbreviated mentions into
//! one frequency-ranked list.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::types::mention::Mention;

/// Canonical entity keys with their mention counts.
///
/// Iteration order is rank order: descending count, ties in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityList(IndexMap<String, usize>);

impl EntityList {
    /// Count for a key, if present.
    pub fn get(&self, key: &str) -> Option<usize> {
        self.0.get(key).copied()
    }

    /// Number of distinct entities.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    /// Entries in rank order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Keys in rank order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn into_inner(self) -> IndexMap<String, usize> {
        self.0
    }
}

/// Initials of the capitalized words, e.g. "World Food Programme" -> "WFP".
pub fn initials(text: &str) -> String {
    text.split_whitespace()
        .filter_map(|word| word.chars().next())
        .filter(|c| c.is_uppercase())
        .collect()
}

/// Single characters and purely numeric strings are not entities.
pub fn is_valid_entity(text: &str) -> bool {
    text.chars().count() > 1 && !text.chars().all(char::is_numeric)
}

/// Merge mentions into a ranked list of canonical entities.
///
/// A multi-word mention whose initials were already seen as a key is counted
/// under that acronym. Merging is one-way: an acronym seen after its
/// spelled-out form starts its own entry.
pub fn canonicalize(mentions: &[Mention]) -> EntityList {
    let mut counts: IndexMap<String, usize> = IndexMap::new();

    for mention in mentions {
        let text = mention.word.trim();

        if let Some(count) = counts.get_mut(text) {
            *count += 1;
            continue;
        }

        if !is_valid_entity(text) {
            continue;
        }

        let multi_word = text.split_whitespace().nth(1).is_some();
        if multi_word {
            if let Some(count) = counts.get_mut(initials(text).as_str()) {
                *count += 1;
                continue;
            }
        }

        counts.insert(text.to_string(), 1);
    }

    // Stable: equal counts keep insertion order
    counts.sort_by(|_, a, _, b| b.cmp(a));
    EntityList(counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mentions(words: &[&str]) -> Vec<Mention> {
        words
            .iter()
            .enumerate()
            .map(|(i, w)| Mention::new(*w, i * 10, i * 10 + w.len()))
            .collect()
    }

    #[test]
    fn test_spelled_out_form_merges_into_prior_acronym() {
        let list = canonicalize(&mentions(&["WFP", "WFP", "World Food Programme"]));

        assert_eq!(list.len(), 1);
        assert_eq!(list.get("WFP"), Some(3));
    }

    #[test]
    fn test_acronym_after_spelled_out_form_is_not_merged() {
        let list = canonicalize(&mentions(&["World Food Programme", "WFP"]));

        assert_eq!(list.get("World Food Programme"), Some(1));
        assert_eq!(list.get("WFP"), Some(1));
    }

    #[test]
    fn test_invalid_mentions_are_discarded() {
        let list = canonicalize(&mentions(&["5", "a", "UN"]));

        assert_eq!(list.len(), 1);
        assert_eq!(list.get("UN"), Some(1));
        assert_eq!(list.total(), 1);
    }

    #[test]
    fn test_numeric_multi_char_is_invalid() {
        assert!(!is_valid_entity("2030"));
        assert!(!is_valid_entity(""));
        assert!(is_valid_entity("G77"));
    }

    #[test]
    fn test_ranked_by_count_with_stable_ties() {
        let list = canonicalize(&mentions(&[
            "Chad", "Mali", "UNICEF", "Mali", "Niger", "UNICEF", "Mali",
        ]));

        let ranked: Vec<_> = list.iter().collect();
        assert_eq!(
            ranked,
            vec![("Mali", 3), ("UNICEF", 2), ("Chad", 1), ("Niger", 1)]
        );
    }

    #[test]
    fn test_single_word_does_not_merge_by_initial() {
        // "Kenya" has initials "K"; single-word mentions never merge
        let list = canonicalize(&mentions(&["KE", "Kenya"]));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_initials_skip_lowercase_words() {
        assert_eq!(initials("Food and Agriculture Organization"), "FAO");
        assert_eq!(initials("the world"), "");
    }

    #[test]
    fn test_trims_surface_text() {
        let list = canonicalize(&mentions(&[" UNHCR", "UNHCR "]));
        assert_eq!(list.get("UNHCR"), Some(2));
    }

    #[test]
    fn test_total_never_exceeds_mentions() {
        let input = mentions(&["UN", "1", "x", "UN", "United Nations", "Geneva"]);
        let list = canonicalize(&input);

        assert!(list.total() <= input.len());
        assert_eq!(list.get("UN"), Some(3));
    }

    #[test]
    fn test_serializes_as_ordered_object() {
        let list = canonicalize(&mentions(&["Chad", "Mali", "Mali"]));
        let json = serde_json::to_string(&list).unwrap();

        assert_eq!(json, r#"{"Mali":2,"Chad":1}"#);
    }
}
