//! Insertion-ordered set used for IP and ifIndex lists.

use serde::{Deserialize, Serialize};

/// A deduplicated list that keeps first-insertion order.
///
/// The index tables record which IPs or ifIndexes were seen for a key, once
/// each, in the order polling encountered them. A hash set would lose the
/// order and a plain `Vec` would admit duplicates, so the tables use this
/// instead. Serializes as a plain JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderedSet<T> {
    items: Vec<T>,
}

impl<T: PartialEq> OrderedSet<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Appends `item` unless an equal item is already present.
    /// Returns whether the item was inserted.
    pub fn insert(&mut self, item: T) -> bool {
        if self.items.contains(&item) {
            false
        } else {
            self.items.push(item);
            true
        }
    }

    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }
}

impl<T> OrderedSet<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T> Default for OrderedSet<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: PartialEq> FromIterator<T> for OrderedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        for item in iter {
            set.insert(item);
        }
        set
    }
}

impl<'a, T> IntoIterator for &'a OrderedSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_first_seen_order() {
        let mut set = OrderedSet::new();
        assert!(set.insert("10.0.0.2"));
        assert!(set.insert("10.0.0.1"));
        assert!(set.insert("10.0.0.3"));

        let items: Vec<&str> = set.iter().copied().collect();
        assert_eq!(items, vec!["10.0.0.2", "10.0.0.1", "10.0.0.3"]);
    }

    #[test]
    fn test_insert_rejects_duplicates() {
        let mut set = OrderedSet::new();
        assert!(set.insert("aa:aa"));
        assert!(!set.insert("aa:aa"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_from_iterator_dedups() {
        let set: OrderedSet<u32> = [3, 1, 3, 2, 1].into_iter().collect();
        assert_eq!(set.as_slice(), &[3, 1, 2]);
    }

    #[test]
    fn test_serializes_as_array() {
        let set: OrderedSet<&str> = ["b", "a"].into_iter().collect();
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["b","a"]"#);
    }

    #[test]
    fn test_empty_set_is_empty() {
        let set: OrderedSet<String> = OrderedSet::new();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
    }
}
