//! TTL-based cache for the fixed read queries.
//!
//! Entries are keyed by the exact statement text of the fixed query that
//! produced them. An entry older than its time-to-live is stale and is never
//! served; the next access recomputes it. A successful mutation anywhere in
//! the process clears the whole cache at once — invalidation is deliberately
//! coarse and table-oblivious, which is the simplest policy that leaves no
//! staleness window after a write.
//!
//! Only the fixed named queries go through this cache. Ad-hoc user text is
//! executed uncached: caching arbitrary text by exact-string key would grow
//! without bound and could serve stale results for textually-identical but
//! logically distinct queries across sessions.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::decode::RowSet;

/// Default time-to-live for cached table dumps.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

/// One materialized result set with its creation timestamp.
#[derive(Debug, Clone)]
struct CacheEntry {
   rows: RowSet,
   created_at: Instant,
}

/// Hit/miss counters for the cache.
///
/// `misses` equals the number of times the underlying query was (re)executed,
/// which makes cache behavior observable without instrumenting the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
   pub hits: u64,
   pub misses: u64,
}

/// Cache of fixed read-query results, keyed by statement text.
#[derive(Debug, Default)]
pub struct QueryCache {
   entries: Mutex<HashMap<String, CacheEntry>>,
   hits: AtomicU64,
   misses: AtomicU64,
}

impl QueryCache {
   pub fn new() -> Self {
      Self::default()
   }

   /// Return a fresh entry for `key`, or `None` when the entry is absent or
   /// older than `ttl`. Stale entries are dropped so the map stays bounded
   /// by the set of fixed queries.
   pub fn lookup(&self, key: &str, ttl: Duration) -> Option<RowSet> {
      let mut entries = self.entries.lock().expect("cache mutex poisoned");

      if let Some(entry) = entries.get(key) {
         if entry.created_at.elapsed() < ttl {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(key, "cache hit");
            return Some(entry.rows.clone());
         }

         entries.remove(key);
         debug!(key, "cache entry stale");
      } else {
         debug!(key, "cache miss");
      }

      self.misses.fetch_add(1, Ordering::Relaxed);
      None
   }

   /// Record a freshly computed result set for `key`.
   pub fn store(&self, key: &str, rows: RowSet) {
      let mut entries = self.entries.lock().expect("cache mutex poisoned");
      entries.insert(
         key.to_string(),
         CacheEntry {
            rows,
            created_at: Instant::now(),
         },
      );
   }

   /// Discard every entry unconditionally.
   ///
   /// Called after any successful mutation, regardless of which table it
   /// touched.
   pub fn invalidate_all(&self) {
      let mut entries = self.entries.lock().expect("cache mutex poisoned");
      let dropped = entries.len();
      entries.clear();
      debug!(dropped, "cache invalidated");
   }

   pub fn stats(&self) -> CacheStats {
      CacheStats {
         hits: self.hits.load(Ordering::Relaxed),
         misses: self.misses.load(Ordering::Relaxed),
      }
   }

   /// Number of live entries, fresh or not.
   pub fn len(&self) -> usize {
      self.entries.lock().expect("cache mutex poisoned").len()
   }

   pub fn is_empty(&self) -> bool {
      self.len() == 0
   }
}

#[cfg(test)]
mod tests {
   use super::*;
   use serde_json::json;

   fn one_row() -> RowSet {
      let mut row = indexmap::IndexMap::default();
      row.insert("custid".to_string(), json!(1));
      vec![row]
   }

   // ─── lookup freshness ───

   #[test]
   fn lookup_returns_fresh_entry() {
      let cache = QueryCache::new();
      cache.store("SELECT 1", one_row());

      let rows = cache.lookup("SELECT 1", Duration::from_secs(60));

      assert_eq!(rows, Some(one_row()));
      assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 0 });
   }

   #[test]
   fn lookup_misses_on_absent_key() {
      let cache = QueryCache::new();

      assert_eq!(cache.lookup("SELECT 1", Duration::from_secs(60)), None);
      assert_eq!(cache.stats(), CacheStats { hits: 0, misses: 1 });
   }

   #[test]
   fn stale_entry_is_never_served() {
      let cache = QueryCache::new();
      cache.store("SELECT 1", one_row());

      std::thread::sleep(Duration::from_millis(5));
      let rows = cache.lookup("SELECT 1", Duration::from_millis(1));

      assert_eq!(rows, None);
      // Stale entries are dropped, not kept around
      assert!(cache.is_empty());
   }

   #[test]
   fn restore_after_staleness_serves_again() {
      let cache = QueryCache::new();
      cache.store("SELECT 1", one_row());

      std::thread::sleep(Duration::from_millis(5));
      assert_eq!(cache.lookup("SELECT 1", Duration::from_millis(1)), None);

      cache.store("SELECT 1", one_row());
      assert_eq!(
         cache.lookup("SELECT 1", Duration::from_secs(60)),
         Some(one_row())
      );
   }

   // ─── invalidation ───

   #[test]
   fn invalidate_all_clears_every_entry() {
      let cache = QueryCache::new();
      cache.store("SELECT 1", one_row());
      cache.store("SELECT 2", one_row());
      assert_eq!(cache.len(), 2);

      cache.invalidate_all();

      assert!(cache.is_empty());
      assert_eq!(cache.lookup("SELECT 1", Duration::from_secs(60)), None);
      assert_eq!(cache.lookup("SELECT 2", Duration::from_secs(60)), None);
   }

   // ─── counters ───

   #[test]
   fn misses_count_executions() {
      let cache = QueryCache::new();

      // miss, execute, store
      assert!(cache.lookup("SELECT 1", Duration::from_secs(60)).is_none());
      cache.store("SELECT 1", one_row());

      // two hits within TTL: no further executions
      assert!(cache.lookup("SELECT 1", Duration::from_secs(60)).is_some());
      assert!(cache.lookup("SELECT 1", Duration::from_secs(60)).is_some());

      assert_eq!(cache.stats(), CacheStats { hits: 2, misses: 1 });
   }
}
