//! Cached, retried access to the directory service.

use chrono::{DateTime, Utc};

use crate::server::{
    client::DirectoryService,
    error::lookup::LookupError,
    model::directory::{CorporationHistoryEntry, DirectoryRecord},
    service::{
        cache::{Cache, CacheKey, EntityKind, Ttl},
        retry::RetryPolicy,
    },
};

/// Directory lookups shared by identity resolution and profile aggregation.
///
/// Record, corporation, alliance and history lookups are cached with the long-lived TTL.
/// Name searches are never cached here; the resolved identity is cached instead.
#[derive(Clone, Copy)]
pub struct DirectoryLookup<'a> {
    directory: &'a dyn DirectoryService,
    cache: &'a Cache,
    retry: RetryPolicy,
    ttl: Ttl,
}

impl<'a> DirectoryLookup<'a> {
    /// Creates a new instance of [`DirectoryLookup`]
    pub fn new(
        directory: &'a dyn DirectoryService,
        cache: &'a Cache,
        retry: RetryPolicy,
        ttl: Ttl,
    ) -> Self {
        Self {
            directory,
            cache,
            retry,
            ttl,
        }
    }

    /// Candidate character IDs for a name
    pub async fn search(&self, name: &str) -> Result<Vec<i64>, LookupError> {
        let description = format!("search {:?}", name);

        self.retry
            .execute(&description, || self.directory.search_character(name))
            .await
            .into_result()
    }

    pub async fn character(&self, character_id: i64) -> Result<DirectoryRecord, LookupError> {
        self.cache
            .get_or_request(
                CacheKey::by_id(EntityKind::Character, character_id),
                self.ttl,
                &self.retry,
                &format!("character {}", character_id),
                || self.directory.character(character_id),
            )
            .await
    }

    pub async fn corporation_name(&self, corporation_id: i64) -> Result<String, LookupError> {
        self.cache
            .get_or_request(
                CacheKey::by_id(EntityKind::CorporationName, corporation_id),
                self.ttl,
                &self.retry,
                &format!("corporation {}", corporation_id),
                || self.directory.corporation_name(corporation_id),
            )
            .await
    }

    /// Alliance name, empty without a lookup when `alliance_id` is 0
    pub async fn alliance_name(&self, alliance_id: i64) -> Result<String, LookupError> {
        if alliance_id == 0 {
            return Ok(String::new());
        }

        self.cache
            .get_or_request(
                CacheKey::by_id(EntityKind::AllianceName, alliance_id),
                self.ttl,
                &self.retry,
                &format!("alliance {}", alliance_id),
                || self.directory.alliance_name(alliance_id),
            )
            .await
    }

    /// Date the character joined their current corporation.
    ///
    /// # Returns
    /// - `Ok(Some(DateTime))` - Start date of the newest history entry
    /// - `Ok(None)` - The history is empty
    pub async fn corporation_joined(
        &self,
        character_id: i64,
    ) -> Result<Option<DateTime<Utc>>, LookupError> {
        let history: Vec<CorporationHistoryEntry> = self
            .cache
            .get_or_request(
                CacheKey::by_id(EntityKind::CorporationHistory, character_id),
                self.ttl,
                &self.retry,
                &format!("corporation history {}", character_id),
                || self.directory.corporation_history(character_id),
            )
            .await?;

        Ok(history.first().map(|entry| entry.start_date))
    }
}
