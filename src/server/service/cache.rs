//! In-process memoization with per-entry expiry.
//!
//! Values are stored as opaque JSON so a single [`Cache`] can hold every kind of lookup
//! result. Keys combine an [`EntityKind`] with the id or name that was looked up, which
//! keeps e.g. a character record and its killboard statistics apart even though both are
//! keyed by the same character ID.

use std::{fmt, future::Future, sync::Arc, time::Duration};

use dashmap::DashMap;
use dioxus_logger::tracing;
use serde::{de::DeserializeOwned, Serialize};
use tokio::time::Instant;

use crate::server::{
    error::lookup::LookupError, model::upstream::UpstreamResponse, service::retry::RetryPolicy,
};

/// Upper bound for any entry lifetime, whatever the provider or configuration asks for
const MAX_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Kind of value stored under a cache key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Character name → resolved identity
    Identity,
    /// Character name → finished profile
    Profile,
    /// Character ID → directory record
    Character,
    CorporationName,
    AllianceName,
    /// Character ID → corporation history
    CorporationHistory,
    /// Character ID → killboard statistics
    CharacterStats,
    /// Corporation ID → danger ratio
    CorporationDanger,
    /// Character ID → most recent killmail
    LatestKillmail,
    /// Character ID → full kill list
    KillList,
    /// Character ID + window → recent kill list
    RecentKillList,
}

impl EntityKind {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Profile => "profile",
            Self::Character => "character",
            Self::CorporationName => "corporation_name",
            Self::AllianceName => "alliance_name",
            Self::CorporationHistory => "corporation_history",
            Self::CharacterStats => "character_stats",
            Self::CorporationDanger => "corporation_danger",
            Self::LatestKillmail => "latest_killmail",
            Self::KillList => "kill_list",
            Self::RecentKillList => "recent_kill_list",
        }
    }
}

/// Composite cache key of entity kind and subject (an ID or a name).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    kind: EntityKind,
    subject: String,
}

impl CacheKey {
    pub fn by_id(kind: EntityKind, id: i64) -> Self {
        Self {
            kind,
            subject: id.to_string(),
        }
    }

    pub fn by_name(kind: EntityKind, name: &str) -> Self {
        Self {
            kind,
            subject: name.to_string(),
        }
    }

    /// Key for results that depend on more than one parameter, e.g. ID and time window
    pub fn by_parts(kind: EntityKind, parts: &[&(dyn fmt::Display + Sync)]) -> Self {
        let subject = parts
            .iter()
            .map(|part| part.to_string())
            .collect::<Vec<_>>()
            .join(":");

        Self { kind, subject }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind.as_str(), self.subject)
    }
}

#[derive(Clone, Debug)]
struct CacheEntry {
    value: serde_json::Value,
    expires_at: Instant,
}

/// Shared in-process cache with per-entry time-to-live.
///
/// Cloning is cheap and every clone shares the same storage. Reads and writes lock only
/// the shard holding the key, so lookups for unrelated keys never wait on each other.
/// Entries are evicted lazily: a read past expiry removes the entry and reports a miss.
#[derive(Clone, Debug, Default)]
pub struct Cache {
    entries: Arc<DashMap<CacheKey, CacheEntry>>,
}

impl Cache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a value if present and not yet expired.
    ///
    /// An entry that fails to deserialize into `T` is treated as a miss.
    pub fn get<T>(&self, key: &CacheKey) -> Option<T>
    where
        T: DeserializeOwned,
    {
        let now = Instant::now();

        let value = {
            let entry = self.entries.get(key)?;
            if entry.expires_at > now {
                Some(entry.value.clone())
            } else {
                None
            }
        };

        match value {
            Some(value) => match serde_json::from_value(value) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!("Discarding undecodable cache entry {}: {}", key, e);
                    None
                }
            },
            None => {
                // Only remove if still expired, a concurrent writer may have refreshed it
                self.entries
                    .remove_if(key, |_, entry| entry.expires_at <= Instant::now());
                None
            }
        }
    }

    /// Store a value for `ttl`, replacing any previous entry for the key.
    ///
    /// Lifetimes longer than one year are capped to one year.
    pub fn set<T>(&self, key: CacheKey, value: &T, ttl: Duration)
    where
        T: Serialize,
    {
        let now = Instant::now();
        let expires_at = now.checked_add(ttl.min(MAX_TTL)).unwrap_or(now);

        match serde_json::to_value(value) {
            Ok(value) => {
                self.entries.insert(key, CacheEntry { value, expires_at });
            }
            Err(e) => tracing::warn!("Skipping cache write for {}: {}", key, e),
        }
    }

    /// Get a value from cache, or run `fetch` and cache its result.
    ///
    /// `fetch` returns the value together with the lifetime it should be cached for.
    /// Errors are returned as-is and never cached.
    pub async fn get_or_fetch<T, E, F, Fut>(&self, key: CacheKey, fetch: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(T, Duration), E>>,
    {
        if let Some(value) = self.get(&key) {
            tracing::debug!("Cache hit for {}", key);
            return Ok(value);
        }

        let (value, ttl) = fetch().await?;
        self.set(key, &value, ttl);

        Ok(value)
    }

    /// Get a value from cache, or request it from an upstream provider under `retry`.
    ///
    /// The final response is converted with [`UpstreamResponse::into_result`] and, when
    /// successful, cached for the lifetime `ttl` resolves to given the provider's hint.
    ///
    /// # Arguments
    /// - `key` - Cache key for the value
    /// - `ttl` - Lifetime policy for a fresh value
    /// - `retry` - Retry policy for the upstream request
    /// - `description` - Request description for logging
    /// - `request` - Issues one attempt of the upstream request
    pub async fn get_or_request<T, F, Fut>(
        &self,
        key: CacheKey,
        ttl: Ttl,
        retry: &RetryPolicy,
        description: &str,
        request: F,
    ) -> Result<T, LookupError>
    where
        T: Serialize + DeserializeOwned,
        F: Fn() -> Fut,
        Fut: Future<Output = UpstreamResponse<T>>,
    {
        self.get_or_fetch(key, || async move {
            let response = retry.execute(description, request).await;
            let max_age = response.max_age;

            Ok((response.into_result()?, ttl.resolve(max_age)))
        })
        .await
    }

    /// Number of stored entries, including expired ones not yet evicted
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// How long a fetched value stays cached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ttl {
    /// Always cache for this long
    Fixed(Duration),
    /// Use the provider's suggested lifetime when it sends one, else the fallback
    Suggested { fallback: Duration },
}

impl Ttl {
    pub fn resolve(&self, suggested: Option<Duration>) -> Duration {
        match self {
            Self::Fixed(ttl) => *ttl,
            Self::Suggested { fallback } => suggested.unwrap_or(*fallback),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod get {
        use super::*;

        /// Tests reading a stored value before it expires.
        ///
        /// Expected: Some with the stored value
        #[tokio::test(start_paused = true)]
        async fn returns_value_within_ttl() {
            let cache = Cache::new();
            let key = CacheKey::by_id(EntityKind::Character, 42);
            cache.set(key.clone(), &"Solo Candidate".to_string(), Duration::from_secs(60));

            tokio::time::advance(Duration::from_secs(59)).await;

            assert_eq!(cache.get::<String>(&key), Some("Solo Candidate".to_string()));
        }

        /// Tests reading a value after its TTL elapsed.
        ///
        /// Verifies that the expired entry is reported as absent and lazily removed.
        ///
        /// Expected: None and an empty cache
        #[tokio::test(start_paused = true)]
        async fn treats_expired_entry_as_absent() {
            let cache = Cache::new();
            let key = CacheKey::by_id(EntityKind::Character, 42);
            cache.set(key.clone(), &1_i64, Duration::from_secs(60));

            tokio::time::advance(Duration::from_secs(60)).await;

            assert_eq!(cache.get::<i64>(&key), None);
            assert!(cache.is_empty());
        }

        /// Tests that TTLs are tracked per entry.
        ///
        /// Verifies that a short-lived entry expires while a long-lived entry stored at the
        /// same time is still served.
        ///
        /// Expected: None for the short entry, Some for the long entry
        #[tokio::test(start_paused = true)]
        async fn expires_entries_independently() {
            let cache = Cache::new();
            let short = CacheKey::by_id(EntityKind::CharacterStats, 1);
            let long = CacheKey::by_id(EntityKind::Character, 1);
            cache.set(short.clone(), &1_i64, Duration::from_secs(60));
            cache.set(long.clone(), &2_i64, Duration::from_secs(3600));

            tokio::time::advance(Duration::from_secs(120)).await;

            assert_eq!(cache.get::<i64>(&short), None);
            assert_eq!(cache.get::<i64>(&long), Some(2));
        }

        /// Tests that keys of different kinds do not collide.
        ///
        /// Expected: each kind returns its own value
        #[tokio::test]
        async fn separates_entity_kinds() {
            let cache = Cache::new();
            cache.set(CacheKey::by_id(EntityKind::CorporationName, 7), &"Corp", Duration::from_secs(60));
            cache.set(CacheKey::by_id(EntityKind::AllianceName, 7), &"Alliance", Duration::from_secs(60));

            assert_eq!(
                cache.get::<String>(&CacheKey::by_id(EntityKind::CorporationName, 7)),
                Some("Corp".to_string())
            );
            assert_eq!(
                cache.get::<String>(&CacheKey::by_id(EntityKind::AllianceName, 7)),
                Some("Alliance".to_string())
            );
        }

        /// Tests storing a value with a lifetime too large to add to the current instant.
        ///
        /// Verifies that a provider-suggested max-age of `u64::MAX` seconds is capped
        /// instead of overflowing, and that the capped entry still expires eventually.
        ///
        /// Expected: Some within the capped lifetime, None after it
        #[tokio::test(start_paused = true)]
        async fn caps_oversized_ttl() {
            let cache = Cache::new();
            let key = CacheKey::by_id(EntityKind::CharacterStats, 42);
            let ttl = Ttl::Suggested {
                fallback: Duration::from_secs(3600),
            }
            .resolve(Some(Duration::from_secs(u64::MAX)));

            cache.set(key.clone(), &1_i64, ttl);

            tokio::time::advance(Duration::from_secs(30 * 24 * 60 * 60)).await;
            assert_eq!(cache.get::<i64>(&key), Some(1));

            tokio::time::advance(MAX_TTL).await;
            assert_eq!(cache.get::<i64>(&key), None);
        }

        /// Tests reading a value as the wrong type.
        ///
        /// Expected: None
        #[tokio::test]
        async fn treats_undecodable_entry_as_absent() {
            let cache = Cache::new();
            let key = CacheKey::by_name(EntityKind::Identity, "Solo Candidate");
            cache.set(key.clone(), &"not a number", Duration::from_secs(60));

            assert_eq!(cache.get::<i64>(&key), None);
        }
    }

    mod get_or_fetch {
        use super::*;

        /// Tests that a fetched value is cached for subsequent calls.
        ///
        /// Expected: fetch runs once, both calls return the value
        #[tokio::test]
        async fn fetches_once_then_serves_from_cache() {
            let cache = Cache::new();
            let key = CacheKey::by_id(EntityKind::CorporationName, 98_000_001);
            let mut calls = 0;

            for _ in 0..2 {
                let value: Result<String, ()> = cache
                    .get_or_fetch(key.clone(), || {
                        calls += 1;
                        async { Ok(("The Order of Autumn".to_string(), Duration::from_secs(60))) }
                    })
                    .await;
                assert_eq!(value, Ok("The Order of Autumn".to_string()));
            }

            assert_eq!(calls, 1);
        }

        /// Tests that failures are not cached.
        ///
        /// Expected: fetch runs again after an error
        #[tokio::test]
        async fn does_not_cache_errors() {
            let cache = Cache::new();
            let key = CacheKey::by_id(EntityKind::AllianceName, 99_000_001);

            let first: Result<String, &str> = cache
                .get_or_fetch(key.clone(), || async { Err("unavailable") })
                .await;
            let second: Result<String, &str> = cache
                .get_or_fetch(key.clone(), || async {
                    Ok(("Autumn.".to_string(), Duration::from_secs(60)))
                })
                .await;

            assert_eq!(first, Err("unavailable"));
            assert_eq!(second, Ok("Autumn.".to_string()));
            assert_eq!(cache.len(), 1);
        }
    }

    mod get_or_request {
        use super::*;

        /// Tests caching a successful upstream response with its suggested lifetime.
        ///
        /// Verifies that the provider's max-age takes precedence over the fallback and that
        /// the entry expires once the suggested lifetime elapses.
        ///
        /// Expected: one request while cached, a second request after expiry
        #[tokio::test(start_paused = true)]
        async fn caches_for_suggested_lifetime() {
            let cache = Cache::new();
            let key = CacheKey::by_id(EntityKind::CorporationDanger, 98_000_001);
            let policy = RetryPolicy::non_client_errors().with_backoff(Duration::ZERO);
            let ttl = Ttl::Suggested {
                fallback: Duration::from_secs(3600),
            };
            let calls = std::sync::atomic::AtomicUsize::new(0);

            let request = || async {
                calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                UpstreamResponse::ok("GET /stats/corporationID/98000001/", 64.0)
                    .with_max_age(Some(Duration::from_secs(300)))
            };

            for _ in 0..2 {
                let danger = cache
                    .get_or_request(key.clone(), ttl, &policy, "corporation danger", request)
                    .await;
                assert_eq!(danger, Ok(64.0));
            }
            assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);

            tokio::time::advance(Duration::from_secs(300)).await;

            cache
                .get_or_request(key, ttl, &policy, "corporation danger", request)
                .await
                .unwrap();
            assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 2);
        }

        /// Tests that exhausted retries surface as a lookup error and are not cached.
        ///
        /// Expected: Err(UpstreamUnavailable) and an empty cache
        #[tokio::test]
        async fn surfaces_exhausted_retries() {
            let cache = Cache::new();
            let key = CacheKey::by_id(EntityKind::Character, 42);
            let policy = RetryPolicy::server_errors().with_backoff(Duration::ZERO);

            let result: Result<i64, LookupError> = cache
                .get_or_request(key, Ttl::Fixed(Duration::from_secs(60)), &policy, "character 42", || async {
                    UpstreamResponse::status("GET /characters/42/", 503)
                })
                .await;

            assert_eq!(
                result,
                Err(LookupError::UpstreamUnavailable {
                    endpoint: "GET /characters/42/".to_string(),
                    status: Some(503),
                })
            );
            assert!(cache.is_empty());
        }
    }

    mod ttl {
        use super::*;

        /// Tests resolving TTL policies.
        ///
        /// Expected: fixed ignores suggestions, suggested prefers them over the fallback
        #[test]
        fn resolves_policy() {
            let hour = Duration::from_secs(3600);
            let minute = Duration::from_secs(60);

            assert_eq!(Ttl::Fixed(hour).resolve(Some(minute)), hour);
            assert_eq!(Ttl::Suggested { fallback: hour }.resolve(Some(minute)), minute);
            assert_eq!(Ttl::Suggested { fallback: hour }.resolve(None), hour);
        }
    }

    /// Tests rendering keys for logs.
    ///
    /// Expected: `kind:subject`, with multi-part subjects joined by colons
    #[test]
    fn formats_keys() {
        assert_eq!(CacheKey::by_id(EntityKind::Character, 42).to_string(), "character:42");
        assert_eq!(
            CacheKey::by_parts(EntityKind::RecentKillList, &[&42, &3600]).to_string(),
            "recent_kill_list:42:3600"
        );
    }
}
