//! Ephemeral search result cache.
//!
//! A save action arrives with nothing but a recipe id, so the full record has
//! to be resolvable without a second provider round trip. Results are kept in
//! process memory keyed by recipe id with a TTL: every search upserts its
//! records, and entries from earlier searches stay resolvable until they
//! expire instead of being wiped by the next query. Expired entries are
//! dropped lazily on access.

use std::{
    collections::HashMap,
    sync::Mutex,
    time::{Duration, Instant},
};

use crate::recipe::RecipeRecord;

pub struct SearchCache {
    ttl: Duration,
    inner: Mutex<HashMap<String, Entry>>,
}

struct Entry {
    record: RecipeRecord,
    stored_at: Instant,
}

impl SearchCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// Upserts a result set. Re-searched ids get their timestamp refreshed.
    pub fn store(&self, results: &[RecipeRecord]) {
        let now = Instant::now();
        let mut inner = self.inner.lock().unwrap();

        inner.retain(|_, entry| now.duration_since(entry.stored_at) < self.ttl);

        for record in results {
            inner.insert(
                record.id.clone(),
                Entry {
                    record: record.clone(),
                    stored_at: now,
                },
            );
        }
    }

    /// Resolves a full record by id, if a fresh-enough search produced it.
    pub fn lookup(&self, id: &str) -> Option<RecipeRecord> {
        let mut inner = self.inner.lock().unwrap();

        match inner.get(id) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => Some(entry.record.clone()),
            Some(_) => {
                inner.remove(id);
                None
            }
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::{sample, RecipeRecord};

    fn record(id: &str) -> RecipeRecord {
        RecipeRecord {
            id: id.into(),
            ..sample()
        }
    }

    #[test]
    fn lookup_before_any_search_misses() {
        let cache = SearchCache::new(Duration::from_secs(60));
        assert!(cache.lookup("r1").is_none());
    }

    #[test]
    fn stored_results_resolve_by_id() {
        let cache = SearchCache::new(Duration::from_secs(60));
        cache.store(&[record("r1"), record("r2")]);

        assert_eq!(cache.lookup("r1").unwrap().id, "r1");
        assert_eq!(cache.lookup("r2").unwrap().id, "r2");
        assert!(cache.lookup("r3").is_none());
    }

    #[test]
    fn later_search_keeps_earlier_ids_alive() {
        let cache = SearchCache::new(Duration::from_secs(60));
        cache.store(&[record("r1")]);
        cache.store(&[record("r2")]);

        // The old single-slot design lost r1 here.
        assert!(cache.lookup("r1").is_some());
        assert!(cache.lookup("r2").is_some());
    }

    #[test]
    fn expired_entries_are_dropped() {
        let cache = SearchCache::new(Duration::ZERO);
        cache.store(&[record("r1")]);
        assert!(cache.lookup("r1").is_none());
    }
}
