//! Folded-name column lookup.

use std::collections::HashMap;

/// Lookup from a folded column key to the original entry.
///
/// Built once per resource/table pair. Construction fails when two entries
/// fold to the same key.
#[derive(Debug)]
pub struct ColumnIndex<'a, T> {
    entries: &'a [T],
    keys: Vec<String>,
    by_key: HashMap<String, usize>,
}

impl<'a, T> ColumnIndex<'a, T> {
    /// Indexes `entries` under the given keys, one key per entry.
    ///
    /// Returns `None` if the keys are not unique.
    #[must_use]
    pub fn new(entries: &'a [T], keys: Vec<String>) -> Option<Self> {
        debug_assert_eq!(entries.len(), keys.len());

        let by_key: HashMap<String, usize> = keys.iter().enumerate().map(|(i, k)| (k.clone(), i)).collect();
        if by_key.len() != entries.len() {
            return None;
        }

        Some(Self { entries, keys, by_key })
    }

    /// Entry stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&'a T> {
        let entries = self.entries;
        self.by_key.get(key).map(|&i| &entries[i])
    }

    /// Returns true if an entry is stored under `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }

    /// Entries with their keys, in original order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &'a T)> + '_ {
        self.keys.iter().map(String::as_str).zip(self.entries.iter())
    }

    /// Keys in original order.
    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upper(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_ascii_uppercase()).collect()
    }

    #[test]
    fn test_lookup_both_ways() {
        let names = ["id", "Name"];
        let index = ColumnIndex::new(&names, upper(&names)).expect("unique");

        assert_eq!(index.get("NAME"), Some(&"Name"));
        assert!(index.contains("ID"));
        assert!(!index.contains("id"));
        assert_eq!(index.keys(), ["ID", "NAME"]);
        assert_eq!(index.iter().next(), Some(("ID", &"id")));
    }

    #[test]
    fn test_collision_detected() {
        let names = ["id", "ID", "name"];
        assert!(ColumnIndex::new(&names, upper(&names)).is_none());
    }
}
