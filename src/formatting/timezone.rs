// src/formatting/timezone.rs
//! UTC instant → fixed-offset local display string, memoized.

use crate::constants::{
    FORMATTER_CACHE_CAPACITY, IST_OFFSET_SECONDS, LOCAL_ZONE_LABEL, UNKNOWN_TIMESTAMP,
};
use chrono::{DateTime, FixedOffset, Utc};
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Renders instants as `YYYY-MM-DD HH:MM:SS <LABEL>` in a fixed offset.
///
/// The mapping is a pure function of the instant, so results are kept in a
/// bounded LRU cache; evicted entries are simply recomputed.
pub struct LocalTimeFormatter {
    offset: FixedOffset,
    label: String,
    cache: Mutex<LruCache<DateTime<Utc>, String>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl LocalTimeFormatter {
    /// Formatter for Indian Standard Time (+05:30).
    pub fn ist() -> Self {
        let offset = FixedOffset::east_opt(IST_OFFSET_SECONDS)
            .expect("IST offset is within one day of UTC");
        Self::new(offset, LOCAL_ZONE_LABEL, FORMATTER_CACHE_CAPACITY)
    }

    /// Formatter for an arbitrary offset and label. A zero capacity is
    /// treated as one.
    pub fn new(offset: FixedOffset, label: impl Into<String>, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            offset,
            label: label.into(),
            cache: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Renders `instant` in local time, or `"Unknown"` when absent.
    pub fn to_local_display(&self, instant: Option<DateTime<Utc>>) -> String {
        let Some(instant) = instant else {
            return UNKNOWN_TIMESTAMP.to_string();
        };

        let mut cache = self.cache.lock();
        if let Some(rendered) = cache.get(&instant) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return rendered.clone();
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let rendered = format!(
            "{} {}",
            instant
                .with_timezone(&self.offset)
                .format("%Y-%m-%d %H:%M:%S"),
            self.label
        );
        cache.put(instant, rendered.clone());
        rendered
    }

    /// Number of memoized renderings currently held.
    pub fn cached_len(&self) -> usize {
        self.cache.lock().len()
    }

    /// `(hits, misses)` since construction.
    pub fn cache_counts(&self) -> (u64, u64) {
        (
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
        )
    }
}

impl Default for LocalTimeFormatter {
    fn default() -> Self {
        Self::ist()
    }
}
