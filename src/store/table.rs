use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

/// Id-keyed rows with a counter that only ever moves forward.
///
/// Ids are handed out by a single atomic increment, so they are unique and
/// never reused after a removal. Scans return rows sorted by id, which is
/// insertion order.
pub struct Table<T> {
    next_id: AtomicU64,
    rows: DashMap<u64, T>,
}

impl<T: Clone> Table<T> {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            rows: DashMap::new(),
        }
    }

    pub fn insert_with(&self, build: impl FnOnce(u64) -> T) -> T {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let row = build(id);
        self.rows.insert(id, row.clone());
        row
    }

    pub fn get(&self, id: u64) -> Option<T> {
        self.rows.get(&id).map(|entry| entry.value().clone())
    }

    /// Mutates a row in place while holding its shard lock.
    pub fn modify(&self, id: u64, change: impl FnOnce(&mut T)) -> Option<T> {
        let mut entry = self.rows.get_mut(&id)?;
        change(entry.value_mut());
        Some(entry.value().clone())
    }

    pub fn remove(&self, id: u64) -> Option<T> {
        self.rows.remove(&id).map(|(_, row)| row)
    }

    pub fn scan(&self, keep: impl Fn(&T) -> bool) -> Vec<T> {
        let mut rows: Vec<(u64, T)> = self
            .rows
            .iter()
            .filter(|entry| keep(entry.value()))
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        rows.sort_by_key(|(id, _)| *id);
        rows.into_iter().map(|(_, row)| row).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<T: Clone> Default for Table<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the current instant, nudged forward when the clock has not moved
/// past `previous`, so update stamps strictly increase.
pub fn advance_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}
