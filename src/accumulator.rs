//! In-memory state for the current day: the ordered buffer of accepted items
//! and the set of identifiers already seen.
//!
//! Invariant: every id in `seen` belongs to exactly one item in `items`, and no
//! two items share an id. Both are only mutated through [`Accumulator::ingest`]
//! and [`Accumulator::reset`].

use crate::models::{ItemId, NewsItem, RawItem};
use chrono::Local;
use std::collections::HashSet;
use tracing::debug;

/// Deduplicated items collected since the start of the current day.
#[derive(Debug, Default)]
pub struct Accumulator {
    items: Vec<NewsItem>,
    seen: HashSet<ItemId>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append every raw entry whose id is non-empty and not yet seen.
    ///
    /// Input order is preserved; nothing is re-sorted here. Returns the number
    /// of newly accepted items.
    pub fn ingest(&mut self, raw_items: Vec<RawItem>) -> usize {
        let before = self.items.len();
        for raw in raw_items {
            let Some(item) = NewsItem::from_raw(raw, &Local) else {
                debug!("Dropping entry without identifier");
                continue;
            };
            if self.seen.insert(item.id.clone()) {
                self.items.push(item);
            }
        }
        self.items.len() - before
    }

    /// Stable sort by creation time; entries without `ctime` go first.
    pub fn sort_by_ctime(&mut self) {
        self.items.sort_by_key(|item| item.ctime);
    }

    /// Drop everything collected so far; previously seen ids become new again.
    pub fn reset(&mut self) {
        self.items.clear();
        self.seen.clear();
    }

    pub fn items(&self) -> &[NewsItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn raw(id: &str, ctime: i64) -> RawItem {
        RawItem {
            id: Some(ItemId::Text(id.to_string())),
            title: Some(format!("title {id}")),
            content: Some(format!("content {id}")),
            ctime: Some(ctime),
        }
    }

    fn ids(acc: &Accumulator) -> Vec<String> {
        acc.items().iter().map(|i| i.id.to_string()).collect()
    }

    #[test]
    fn test_ingest_keeps_input_order() {
        let mut acc = Accumulator::new();
        let accepted = acc.ingest(vec![raw("a", 100), raw("b", 50)]);
        assert_eq!(accepted, 2);
        assert_eq!(ids(&acc), ["a", "b"]);
    }

    #[test]
    fn test_reingest_is_idempotent() {
        let mut acc = Accumulator::new();
        let batch = vec![raw("a", 100), raw("b", 50)];
        acc.ingest(batch.clone());
        assert_eq!(acc.ingest(batch), 0);
        assert_eq!(acc.len(), 2);
    }

    #[test]
    fn test_duplicates_within_one_batch() {
        let mut acc = Accumulator::new();
        let accepted = acc.ingest(vec![raw("a", 100), raw("a", 200), raw("c", 10)]);
        assert_eq!(accepted, 2);
        assert_eq!(ids(&acc), ["a", "c"]);
        // first occurrence wins
        assert_eq!(acc.items()[0].ctime, Some(100));
    }

    #[test]
    fn test_entries_without_identifier_are_dropped() {
        let mut acc = Accumulator::new();
        let no_id = RawItem {
            ctime: Some(5),
            ..Default::default()
        };
        let zero_id = RawItem {
            id: Some(ItemId::Num(0)),
            ..Default::default()
        };
        assert_eq!(acc.ingest(vec![no_id, zero_id, raw("", 1), raw("x", 2)]), 1);
        assert_eq!(ids(&acc), ["x"]);
    }

    #[test]
    fn test_sort_is_stable_and_ascending() {
        let mut acc = Accumulator::new();
        let undated = RawItem {
            id: Some(ItemId::Num(9)),
            ..Default::default()
        };
        acc.ingest(vec![raw("a", 100), raw("b", 50), raw("c", 100), undated, raw("d", 50)]);
        acc.sort_by_ctime();
        assert_eq!(ids(&acc), ["9", "b", "d", "a", "c"]);
    }

    #[test]
    fn test_reset_forgets_seen_ids() {
        let mut acc = Accumulator::new();
        acc.ingest(vec![raw("a", 100)]);
        assert!(acc.seen.contains(&ItemId::Text("a".into())));

        acc.reset();
        assert!(acc.is_empty());
        assert!(acc.seen.is_empty());
        assert_eq!(acc.ingest(vec![raw("a", 100)]), 1);
    }

    #[test]
    fn test_no_duplicate_ids_across_many_batches() {
        let mut acc = Accumulator::new();
        for round in 0..5 {
            let batch = (0..10)
                .map(|n| raw(&format!("id-{}", (n + round * 3) % 17), n))
                .collect();
            acc.ingest(batch);
        }
        let unique: HashSet<_> = acc.items().iter().map(|i| i.id.clone()).collect();
        assert_eq!(unique.len(), acc.len());
    }
}
