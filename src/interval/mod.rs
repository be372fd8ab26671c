//! An ordered map from interval starts to their end bound and value, with
//! logarithmic point-containment search.
//!
//! [IntervalMap] keys entries by their start. Inserting an entry with a start
//! that is already present replaces the previous entry (the container is a
//! map over starts, not a multiset of intervals). The container does not
//! reject overlapping ranges: [IntervalMap::search] is only guaranteed to
//! return the covering interval when stored intervals are pairwise disjoint.

use std::collections::BTreeMap;

/// A stored interval: the inclusive `[start, end]` range and its value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Entry {
    pub start: i64,
    pub end: i64,
    pub value: f64,
}

/// Bounds stored against each start key.
#[derive(Clone, Copy, Debug)]
struct Span {
    end: i64,
    value: f64,
}

/// An ordered map from interval start to interval end and value.
#[derive(Debug, Default)]
pub struct IntervalMap {
    entries: BTreeMap<i64, Span>,
}

impl IntervalMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert `[start, end]` with `value`, replacing any entry with the same
    /// start.
    ///
    /// Callers must uphold `start <= end`; an inverted entry is stored as
    /// given and will never be returned by [Self::search].
    pub fn insert(&mut self, start: i64, end: i64, value: f64) {
        self.entries.insert(start, Span { end, value });
    }

    /// Find the stored interval containing `key`.
    ///
    /// Returns the entry with the greatest start at or below `key` whose end
    /// bound covers it, or `None` when no stored interval contains `key`.
    /// This resolves the containing interval only when stored intervals are
    /// pairwise disjoint; when intervals overlap, some covering interval may
    /// be shadowed by a later start and missed. Maintaining disjoint
    /// intervals is the caller's responsibility.
    pub fn search(&self, key: i64) -> Option<Entry> {
        let (&start, span) = self.entries.range(..=key).next_back()?;
        (key <= span.end).then_some(Entry {
            start,
            end: span.end,
            value: span.value,
        })
    }

    /// Iterate entries in ascending start order.
    pub fn iter(&self) -> impl Iterator<Item = Entry> + '_ {
        self.entries.iter().map(|(&start, span)| Entry {
            start,
            end: span.end,
            value: span.value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn test_empty() {
        let map = IntervalMap::new();
        assert!(map.is_empty());
        assert_eq!(map.search(0), None);
        assert_eq!(map.search(i64::MIN), None);
        assert_eq!(map.search(i64::MAX), None);
    }

    #[test]
    fn test_search_bounds() {
        let mut map = IntervalMap::new();
        map.insert(10, 20, 1.5);
        assert_eq!(
            map.search(10),
            Some(Entry {
                start: 10,
                end: 20,
                value: 1.5
            })
        );
        assert!(map.search(15).is_some());
        assert!(map.search(20).is_some());
        assert_eq!(map.search(9), None);
        assert_eq!(map.search(21), None);
    }

    #[test]
    fn test_search_between_intervals() {
        let mut map = IntervalMap::new();
        map.insert(0, 5, 1.0);
        map.insert(10, 15, 2.0);
        assert_eq!(map.search(7), None);
        assert_eq!(map.search(5).unwrap().value, 1.0);
        assert_eq!(map.search(10).unwrap().value, 2.0);
    }

    #[test]
    fn test_single_point_interval() {
        let mut map = IntervalMap::new();
        map.insert(3, 3, 0.5);
        assert_eq!(map.search(3).unwrap().value, 0.5);
        assert_eq!(map.search(2), None);
        assert_eq!(map.search(4), None);
    }

    #[test]
    fn test_negative_keys() {
        let mut map = IntervalMap::new();
        map.insert(-10, -5, 2.5);
        assert_eq!(map.search(-7).unwrap().start, -10);
        assert_eq!(map.search(-11), None);
        assert_eq!(map.search(-4), None);
    }

    #[test]
    fn test_insert_overwrites_same_start() {
        let mut map = IntervalMap::new();
        map.insert(1, 5, 3.0);
        map.insert(1, 8, 4.0);
        assert_eq!(map.len(), 1);
        assert_eq!(
            map.search(6),
            Some(Entry {
                start: 1,
                end: 8,
                value: 4.0
            })
        );
    }

    #[test]
    fn test_iter_ordered() {
        let mut map = IntervalMap::new();
        map.insert(30, 35, 3.0);
        map.insert(10, 15, 1.0);
        map.insert(20, 25, 2.0);
        let starts: Vec<i64> = map.iter().map(|entry| entry.start).collect();
        assert_eq!(starts, vec![10, 20, 30]);
    }

    #[test]
    fn test_random_disjoint_intervals() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut map = IntervalMap::new();
        let mut intervals = Vec::new();
        let mut next = -1_000;
        for i in 0..200 {
            let start = next + rng.gen_range(1..20);
            let end = start + rng.gen_range(0..50);
            map.insert(start, end, i as f64);
            intervals.push((start, end, i as f64));
            next = end;
        }

        // Every contained key resolves to its interval, every gap key misses.
        for &(start, end, value) in &intervals {
            for key in start..=end {
                let entry = map.search(key).unwrap();
                assert_eq!((entry.start, entry.end, entry.value), (start, end, value));
            }
        }
        for pair in intervals.windows(2) {
            for key in (pair[0].1 + 1)..pair[1].0 {
                assert_eq!(map.search(key), None);
            }
        }
        assert_eq!(map.search(intervals[0].0 - 1), None);
        assert_eq!(map.search(intervals.last().unwrap().1 + 1), None);
    }
}
