//! Upstream provider interfaces and their HTTP implementations.
//!
//! The lookup core only talks to the [`DirectoryService`] and [`StatisticsService`]
//! traits, so it never depends on a particular transport. [`esi::EsiClient`] and
//! [`zkill::ZkillClient`] implement them over HTTP with `reqwest`; tests substitute
//! in-memory fakes.

pub mod esi;
pub mod zkill;

use std::time::Duration;

use async_trait::async_trait;
use dioxus_logger::tracing;
use reqwest::header::{HeaderMap, CACHE_CONTROL};
use serde::de::DeserializeOwned;

use crate::server::model::{
    directory::{CorporationHistoryEntry, DirectoryRecord},
    statistics::{CombatStats, Killmail},
    upstream::{UpstreamResponse, UpstreamStatus},
};

/// Game-entity directory: identities, corporations and alliances.
#[async_trait]
pub trait DirectoryService: Send + Sync {
    /// Candidate character IDs for a name, possibly empty
    async fn search_character(&self, name: &str) -> UpstreamResponse<Vec<i64>>;

    async fn character(&self, character_id: i64) -> UpstreamResponse<DirectoryRecord>;

    async fn corporation_name(&self, corporation_id: i64) -> UpstreamResponse<String>;

    async fn alliance_name(&self, alliance_id: i64) -> UpstreamResponse<String>;

    /// Corporation history, newest entry first
    async fn corporation_history(
        &self,
        character_id: i64,
    ) -> UpstreamResponse<Vec<CorporationHistoryEntry>>;
}

/// Combat statistics keyed by character or corporation ID.
#[async_trait]
pub trait StatisticsService: Send + Sync {
    /// Killboard statistics; characters without a killboard yield all zeros
    async fn character_stats(&self, character_id: i64) -> UpstreamResponse<CombatStats>;

    async fn corporation_danger(&self, corporation_id: i64) -> UpstreamResponse<f64>;

    /// Most recent kill or loss, `None` when the character has no killmails
    async fn latest_killmail(&self, character_id: i64) -> UpstreamResponse<Option<Killmail>>;

    async fn kills(&self, character_id: i64) -> UpstreamResponse<Vec<Killmail>>;

    /// Kills within the last `window`
    async fn recent_kills(
        &self,
        character_id: i64,
        window: Duration,
    ) -> UpstreamResponse<Vec<Killmail>>;
}

/// Sends a request and decodes a JSON body into an [`UpstreamResponse`].
///
/// Transport failures and client-side timeouts become bodiless responses without a status
/// code. A success whose body fails to decode keeps its status code but has no body.
pub(crate) async fn send_json<T>(
    endpoint: String,
    request: reqwest::RequestBuilder,
) -> UpstreamResponse<T>
where
    T: DeserializeOwned,
{
    let response = match request.send().await {
        Ok(response) => response,
        Err(e) if e.is_timeout() => {
            tracing::debug!("Request to {} timed out: {}", endpoint, e);
            return UpstreamResponse::timed_out(endpoint);
        }
        Err(e) => {
            tracing::debug!("Request to {} failed: {}", endpoint, e);
            return UpstreamResponse::transport_failure(endpoint);
        }
    };

    let status = response.status();
    let max_age = max_age(response.headers());

    if !status.is_success() {
        tracing::debug!("Request to {} returned {}", endpoint, status);
        return UpstreamResponse::status(endpoint, status.as_u16()).with_max_age(max_age);
    }

    match response.json::<T>().await {
        Ok(body) => UpstreamResponse {
            endpoint,
            status: UpstreamStatus::Code(status.as_u16()),
            body: Some(body),
            max_age,
        },
        Err(e) => {
            tracing::warn!("Failed to decode response body from {}: {}", endpoint, e);
            UpstreamResponse::status(endpoint, status.as_u16()).with_max_age(max_age)
        }
    }
}

/// Extracts `max-age` from a `Cache-Control` header
pub(crate) fn max_age(headers: &HeaderMap) -> Option<Duration> {
    let value = headers.get(CACHE_CONTROL)?.to_str().ok()?;

    value
        .split(',')
        .filter_map(|directive| directive.trim().strip_prefix("max-age="))
        .find_map(|secs| secs.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}
