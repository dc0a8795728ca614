//! Statistics service client for zKillboard.

use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize};

use crate::server::{
    client::{send_json, StatisticsService},
    error::Error,
    model::{
        statistics::{CombatStats, Killmail},
        upstream::UpstreamResponse,
    },
};

const DEFAULT_ZKILL_URL: &str = "https://zkillboard.com/api";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CorporationStats {
    #[serde(default)]
    danger_ratio: f64,
}

/// HTTP client for the zKillboard API.
#[derive(Clone, Debug)]
pub struct ZkillClient {
    http: reqwest::Client,
    zkill_url: String,
}

impl ZkillClient {
    pub fn builder() -> ZkillClientBuilder {
        ZkillClientBuilder::default()
    }

    async fn get<T>(&self, path: String) -> UpstreamResponse<T>
    where
        T: DeserializeOwned,
    {
        let request = self.http.get(format!("{}{}", self.zkill_url, path));

        send_json(format!("GET {}", path), request).await
    }
}

#[async_trait]
impl StatisticsService for ZkillClient {
    async fn character_stats(&self, character_id: i64) -> UpstreamResponse<CombatStats> {
        // zKillboard answers `null` for characters it has never seen
        self.get::<Option<CombatStats>>(format!("/stats/characterID/{}/", character_id))
            .await
            .map(Option::unwrap_or_default)
    }

    async fn corporation_danger(&self, corporation_id: i64) -> UpstreamResponse<f64> {
        self.get::<Option<CorporationStats>>(format!("/stats/corporationID/{}/", corporation_id))
            .await
            .map(|stats| stats.map(|s| s.danger_ratio).unwrap_or_default())
    }

    async fn latest_killmail(&self, character_id: i64) -> UpstreamResponse<Option<Killmail>> {
        self.get::<Vec<Killmail>>(format!("/characterID/{}/limit/1/", character_id))
            .await
            .map(|killmails| killmails.into_iter().next())
    }

    async fn kills(&self, character_id: i64) -> UpstreamResponse<Vec<Killmail>> {
        self.get(format!("/kills/characterID/{}/", character_id))
            .await
    }

    async fn recent_kills(
        &self,
        character_id: i64,
        window: Duration,
    ) -> UpstreamResponse<Vec<Killmail>> {
        self.get(format!(
            "/kills/characterID/{}/pastSeconds/{}/",
            character_id,
            window.as_secs()
        ))
        .await
    }
}

/// Builder for [`ZkillClient`].
#[derive(Default)]
pub struct ZkillClientBuilder {
    zkill_url: Option<String>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
}

impl ZkillClientBuilder {
    /// Base URL without trailing slash, defaults to the public zKillboard API
    pub fn zkill_url(mut self, zkill_url: &str) -> Self {
        self.zkill_url = Some(zkill_url.trim_end_matches('/').to_string());
        self
    }

    /// zKillboard rejects requests without a descriptive user agent
    pub fn user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = Some(user_agent.to_string());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<ZkillClient, Error> {
        let mut http = reqwest::Client::builder();
        if let Some(user_agent) = &self.user_agent {
            http = http.user_agent(user_agent);
        }
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }

        Ok(ZkillClient {
            http: http.build()?,
            zkill_url: self
                .zkill_url
                .unwrap_or_else(|| DEFAULT_ZKILL_URL.to_string()),
        })
    }
}

#[cfg(test)]
mod tests;
