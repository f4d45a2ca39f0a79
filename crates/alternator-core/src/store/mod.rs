//! Per-table item storage.
//!
//! Items are kept in an ordered map keyed by the composite storage key (see
//! [`crate::encoding::composite`]). Because encoded keys sort exactly like the
//! values they encode, all items of one hash value are contiguous and ordered
//! by range key ascending.

use std::collections::BTreeMap;
use std::ops::Bound;

use crate::types::Item;

/// The items of one table.
#[derive(Debug, Default, Clone)]
pub struct ItemStore {
    items: BTreeMap<Vec<u8>, Item>,
}

impl ItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `item` at `key`, fully replacing any previous item.
    ///
    /// Returns the replaced item, if any.
    pub fn put(&mut self, key: Vec<u8>, item: Item) -> Option<Item> {
        self.items.insert(key, item)
    }

    pub fn get(&self, key: &[u8]) -> Option<&Item> {
        self.items.get(key)
    }

    /// Remove the item at `key`. Absence is not an error.
    pub fn delete(&mut self, key: &[u8]) -> Option<Item> {
        self.items.remove(key)
    }

    /// Items whose storage key lies in `[start, end)`, in key order.
    ///
    /// `None` leaves that side unbounded. An empty or inverted interval yields
    /// nothing.
    pub fn range<'a>(
        &'a self,
        start: Option<&[u8]>,
        end: Option<&[u8]>,
    ) -> Box<dyn Iterator<Item = (&'a [u8], &'a Item)> + 'a> {
        if let (Some(start), Some(end)) = (start, end)
            && start >= end
        {
            return Box::new(std::iter::empty());
        }
        let lower = start.map_or(Bound::Unbounded, |s| Bound::Included(s.to_vec()));
        let upper = end.map_or(Bound::Unbounded, |e| Bound::Excluded(e.to_vec()));
        Box::new(
            self.items
                .range::<Vec<u8>, _>((lower, upper))
                .map(|(k, v)| (k.as_slice(), v)),
        )
    }

    /// All items in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &Item)> {
        self.items.iter().map(|(k, v)| (k.as_slice(), v))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(code: &str, data: &str) -> Item {
        Item::new().with("code", code).with("stringData", data)
    }

    #[test]
    fn test_put_replaces_whole_item() {
        let mut store = ItemStore::new();
        let first = Item::new()
            .with("code", "hash2")
            .with("stringData", "string2a")
            .with("extra", "only-in-first");
        assert!(store.put(b"k".to_vec(), first.clone()).is_none());

        let replaced = store.put(b"k".to_vec(), item("hash2", "string2b"));
        assert_eq!(replaced, Some(first));

        let current = store.get(b"k").unwrap();
        assert_eq!(current, &item("hash2", "string2b"));
        assert!(!current.contains("extra"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let mut store = ItemStore::new();
        store.put(b"k".to_vec(), item("hash1", "string1"));
        assert!(store.delete(b"k").is_some());
        assert!(store.delete(b"k").is_none());
        assert!(store.get(b"k").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_range_is_half_open_and_ordered() {
        let mut store = ItemStore::new();
        for (k, data) in [(b"b", "2"), (b"a", "1"), (b"d", "4"), (b"c", "3")] {
            store.put(k.to_vec(), item("x", data));
        }
        let data: Vec<&str> = store
            .range(Some(b"b".as_slice()), Some(b"d".as_slice()))
            .map(|(_, item)| item.get("stringData").and_then(|v| v.as_str()).unwrap())
            .collect();
        assert_eq!(data, vec!["2", "3"]);

        assert_eq!(store.range(None, None).count(), 4);
        assert_eq!(store.range(Some(b"c".as_slice()), None).count(), 2);
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let mut store = ItemStore::new();
        store.put(b"b".to_vec(), item("x", "2"));
        assert_eq!(store.range(Some(b"d".as_slice()), Some(b"a".as_slice())).count(), 0);
        assert_eq!(store.range(Some(b"b".as_slice()), Some(b"b".as_slice())).count(), 0);
    }
}
