//! Response caching for generation calls.
//!
//! Avoids paying for (and waiting on) the same generation twice. Results are
//! cached by [`GenerationRequest`] for a fixed time-to-live and expire
//! lazily: a stale entry stays in place until the next lookup for its key
//! recomputes and overwrites it.
//!
//! Each key owns an async mutex slot. Concurrent lookups for the same key
//! queue on that slot, so only the first one runs `compute` and the rest
//! read its result. Lookups for different keys never wait on each other.
//! Failed computations are not cached, and a key whose first computation
//! fails leaves nothing behind.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use tracing::debug;

use crate::prompt::GenerationRequest;

/// Default time-to-live for cached generations: one hour.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// A cached generation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CachedText {
    pub text: String,
    pub fetched_at: DateTime<Utc>,
}

impl CachedText {
    /// Whether the entry is still live at `now`.
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: TimeDelta) -> bool {
        now.signed_duration_since(self.fetched_at) < ttl
    }
}

type Slot = Arc<tokio::sync::Mutex<Option<CachedText>>>;

/// TTL cache for generation results, keyed by `(country, style, kind)`.
#[derive(Debug)]
pub struct ResponseCache {
    slots: Mutex<HashMap<GenerationRequest, Slot>>,
    ttl: Duration,
    ttl_delta: TimeDelta,
    /// Hits counter for diagnostics.
    hits: AtomicU64,
    /// Misses counter for diagnostics.
    misses: AtomicU64,
}

impl ResponseCache {
    /// Create an empty cache with the given time-to-live.
    pub fn new(ttl: Duration) -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            ttl,
            ttl_delta: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Return the cached text for `request` if it is fresh, otherwise run
    /// `compute`, store its output, and return it.
    ///
    /// Errors from `compute` are returned as-is and leave the slot as it was.
    pub async fn get_or_compute<F, Fut, E>(
        &self,
        request: &GenerationRequest,
        compute: F,
    ) -> Result<String, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, E>>,
    {
        let slot = self.slot_for(request);
        let mut entry = slot.lock().await;

        if let Some(cached) = entry
            .as_ref()
            .filter(|c| c.is_fresh(Utc::now(), self.ttl_delta))
        {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(
                kind = %request.kind(),
                country = request.country(),
                style = request.style(),
                "Generation cache hit"
            );
            return Ok(cached.text.clone());
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!(
            kind = %request.kind(),
            country = request.country(),
            style = request.style(),
            stale = entry.is_some(),
            "Generation cache miss"
        );

        let text = match compute().await {
            Ok(text) => text,
            Err(e) => {
                if entry.is_none() {
                    self.forget_empty_slot(request, &slot);
                }
                return Err(e);
            }
        };
        *entry = Some(CachedText {
            text: text.clone(),
            fetched_at: Utc::now(),
        });
        Ok(text)
    }

    /// Look at the current entry for `request` without computing anything.
    ///
    /// Returns stale entries too. Returns `None` while the slot is busy with
    /// an in-flight computation.
    pub fn peek(&self, request: &GenerationRequest) -> Option<CachedText> {
        let slot = self.lock_slots().get(request).cloned()?;
        let entry = slot.try_lock().ok()?;
        entry.as_ref().cloned()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.lock_slots().clear();
    }

    /// Number of keys holding a result. Slots busy with an in-flight
    /// computation are not counted.
    pub fn len(&self) -> usize {
        self.lock_slots()
            .values()
            .filter(|slot| slot.try_lock().is_ok_and(|entry| entry.is_some()))
            .count()
    }

    /// Whether no key holds a result.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cache hit count.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Cache miss count.
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Hit rate as a fraction (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits() + self.misses();
        if total == 0 {
            0.0
        } else {
            self.hits() as f64 / total as f64
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            hits: self.hits(),
            misses: self.misses(),
            hit_rate: self.hit_rate(),
            ttl_secs: self.ttl.as_secs(),
        }
    }

    fn slot_for(&self, request: &GenerationRequest) -> Slot {
        self.lock_slots().entry(request.clone()).or_default().clone()
    }

    /// Remove a slot that never held a result, unless another lookup is
    /// already queued on it. Clones of a slot are only taken under the map
    /// lock, so the count is stable while it is held.
    fn forget_empty_slot(&self, request: &GenerationRequest, slot: &Slot) {
        let mut slots = self.lock_slots();
        let ours = slots.get(request).is_some_and(|s| Arc::ptr_eq(s, slot));
        if ours && Arc::strong_count(slot) == 2 {
            slots.remove(request);
        }
    }

    #[cfg(test)]
    fn slot_count(&self) -> usize {
        self.lock_slots().len()
    }

    fn lock_slots(&self) -> std::sync::MutexGuard<'_, HashMap<GenerationRequest, Slot>> {
        self.slots.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

/// Point-in-time cache statistics.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub ttl_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{FakeGenerator, GenerationUnavailable, TextGenerator};
    use std::sync::atomic::AtomicUsize;

    fn name_request() -> GenerationRequest {
        GenerationRequest::name("India", "Modern")
    }

    #[tokio::test]
    async fn second_lookup_within_ttl_hits() {
        let cache = ResponseCache::default();
        let generator = FakeGenerator::new().with_default_response("Spice Route").numbered();
        let request = name_request();

        let first = cache
            .get_or_compute(&request, || generator.generate(&request.prompt()))
            .await
            .unwrap();
        let second = cache
            .get_or_compute(&request, || generator.generate(&request.prompt()))
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(first, "Spice Route #1");
        assert_eq!(generator.calls(), 1);
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);
    }

    #[tokio::test]
    async fn expired_entry_is_recomputed() {
        let cache = ResponseCache::new(Duration::ZERO);
        let generator = FakeGenerator::new().with_default_response("menu").numbered();
        let request = GenerationRequest::menu("Japan", "Fusion");

        let first = cache
            .get_or_compute(&request, || generator.generate("x"))
            .await
            .unwrap();
        let second = cache
            .get_or_compute(&request, || generator.generate("x"))
            .await
            .unwrap();

        assert_eq!(generator.calls(), 2);
        assert_ne!(first, second);
        // The stale entry was overwritten, not duplicated.
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.peek(&request).unwrap().text, second);
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let cache = ResponseCache::default();
        let computed = AtomicUsize::new(0);

        for request in [
            GenerationRequest::name("India", "Modern"),
            GenerationRequest::menu("India", "Modern"),
            GenerationRequest::name("India", "Luxury"),
            GenerationRequest::name("Italy", "Modern"),
        ] {
            cache
                .get_or_compute(&request, || async {
                    computed.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, GenerationUnavailable>(request.prompt())
                })
                .await
                .unwrap();
        }

        assert_eq!(computed.load(Ordering::SeqCst), 4);
        assert_eq!(cache.len(), 4);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let cache = ResponseCache::default();
        let generator = FakeGenerator::new().with_default_response("Spice Route");
        let request = name_request();

        generator.set_unavailable(true);
        let err = cache
            .get_or_compute(&request, || generator.generate("x"))
            .await
            .unwrap_err();
        assert!(err.reason().contains("unavailable"));
        assert!(cache.is_empty());
        assert_eq!(cache.slot_count(), 0);

        generator.set_unavailable(false);
        let text = cache
            .get_or_compute(&request, || generator.generate("x"))
            .await
            .unwrap();
        assert_eq!(text, "Spice Route");
        assert_eq!(generator.calls(), 2);
    }

    #[tokio::test]
    async fn failed_keys_leave_no_slots_behind() {
        let cache = ResponseCache::default();
        for i in 0..100 {
            let request = GenerationRequest::name(format!("Country {i}"), "Modern");
            cache
                .get_or_compute(&request, || async {
                    Err::<String, _>(GenerationUnavailable::new("down"))
                })
                .await
                .unwrap_err();
        }
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.slot_count(), 0);
    }

    #[tokio::test]
    async fn failure_after_expiry_keeps_the_slot() {
        let cache = ResponseCache::new(Duration::ZERO);
        let request = name_request();
        cache
            .get_or_compute(&request, || async { Ok::<_, GenerationUnavailable>("a".into()) })
            .await
            .unwrap();
        cache
            .get_or_compute(&request, || async {
                Err::<String, _>(GenerationUnavailable::new("down"))
            })
            .await
            .unwrap_err();
        // The stale entry stays until a later lookup succeeds.
        assert_eq!(cache.slot_count(), 1);
        assert_eq!(cache.peek(&request).unwrap().text, "a");
    }

    #[tokio::test]
    async fn concurrent_identical_requests_share_one_call() {
        let cache = ResponseCache::default();
        let generator = FakeGenerator::new()
            .with_default_response("Spice Route")
            .with_delay(Duration::from_millis(50));
        let request = name_request();

        let lookups = (0..5).map(|_| cache.get_or_compute(&request, || generator.generate("x")));
        let results = futures::future::join_all(lookups).await;

        assert_eq!(generator.calls(), 1);
        for result in results {
            assert_eq!(result.unwrap(), "Spice Route");
        }
        assert_eq!(cache.misses(), 1);
        assert_eq!(cache.hits(), 4);
    }

    #[tokio::test]
    async fn clear_drops_entries() {
        let cache = ResponseCache::default();
        let request = name_request();
        cache
            .get_or_compute(&request, || async { Ok::<_, GenerationUnavailable>("a".into()) })
            .await
            .unwrap();
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.peek(&request).is_none());
    }

    #[test]
    fn freshness_boundary() {
        let fetched_at = Utc::now();
        let entry = CachedText {
            text: "x".into(),
            fetched_at,
        };
        let ttl = TimeDelta::seconds(3600);
        assert!(entry.is_fresh(fetched_at + TimeDelta::seconds(3599), ttl));
        assert!(!entry.is_fresh(fetched_at + TimeDelta::seconds(3600), ttl));
    }

    #[test]
    fn stats_snapshot() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        let stats = cache.stats();
        assert_eq!(stats.entries, 0);
        assert_eq!(stats.ttl_secs, 60);
        assert_eq!(cache.hit_rate(), 0.0);
    }
}
