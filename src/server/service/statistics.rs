//! Cached, retried access to the statistics service.

use std::time::Duration;

use crate::server::{
    client::StatisticsService,
    error::lookup::LookupError,
    model::statistics::{CombatStats, Killmail},
    service::{
        cache::{Cache, CacheKey, EntityKind, Ttl},
        retry::RetryPolicy,
    },
};

/// Killboard lookups used by profile aggregation.
///
/// Results are cached for the provider-suggested lifetime when one is sent, otherwise for
/// the default TTL.
#[derive(Clone, Copy)]
pub struct StatisticsLookup<'a> {
    statistics: &'a dyn StatisticsService,
    cache: &'a Cache,
    retry: RetryPolicy,
    ttl: Ttl,
}

impl<'a> StatisticsLookup<'a> {
    /// Creates a new instance of [`StatisticsLookup`]
    pub fn new(
        statistics: &'a dyn StatisticsService,
        cache: &'a Cache,
        retry: RetryPolicy,
        ttl: Ttl,
    ) -> Self {
        Self {
            statistics,
            cache,
            retry,
            ttl,
        }
    }

    pub async fn character_stats(&self, character_id: i64) -> Result<CombatStats, LookupError> {
        self.cache
            .get_or_request(
                CacheKey::by_id(EntityKind::CharacterStats, character_id),
                self.ttl,
                &self.retry,
                &format!("character stats {}", character_id),
                || self.statistics.character_stats(character_id),
            )
            .await
    }

    pub async fn corporation_danger(&self, corporation_id: i64) -> Result<f64, LookupError> {
        self.cache
            .get_or_request(
                CacheKey::by_id(EntityKind::CorporationDanger, corporation_id),
                self.ttl,
                &self.retry,
                &format!("corporation stats {}", corporation_id),
                || self.statistics.corporation_danger(corporation_id),
            )
            .await
    }

    pub async fn latest_killmail(
        &self,
        character_id: i64,
    ) -> Result<Option<Killmail>, LookupError> {
        self.cache
            .get_or_request(
                CacheKey::by_id(EntityKind::LatestKillmail, character_id),
                self.ttl,
                &self.retry,
                &format!("latest killmail {}", character_id),
                || self.statistics.latest_killmail(character_id),
            )
            .await
    }

    pub async fn kills(&self, character_id: i64) -> Result<Vec<Killmail>, LookupError> {
        self.cache
            .get_or_request(
                CacheKey::by_id(EntityKind::KillList, character_id),
                self.ttl,
                &self.retry,
                &format!("kills {}", character_id),
                || self.statistics.kills(character_id),
            )
            .await
    }

    pub async fn recent_kills(
        &self,
        character_id: i64,
        window: Duration,
    ) -> Result<Vec<Killmail>, LookupError> {
        let seconds = window.as_secs();
        let key = CacheKey::by_parts(EntityKind::RecentKillList, &[&character_id, &seconds]);

        self.cache
            .get_or_request(
                key,
                self.ttl,
                &self.retry,
                &format!("recent kills {} ({}s)", character_id, seconds),
                || self.statistics.recent_kills(character_id, window),
            )
            .await
    }
}
