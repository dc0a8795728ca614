//! Directory service client for EVE Online's ESI.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::server::{
    client::{send_json, DirectoryService},
    error::Error,
    model::{
        directory::{CorporationHistoryEntry, DirectoryRecord},
        upstream::UpstreamResponse,
    },
};

const DEFAULT_ESI_URL: &str = "https://esi.evetech.net/latest";
const DEFAULT_DATASOURCE: &str = "tranquility";

#[derive(Deserialize)]
struct ResolvedIds {
    #[serde(default)]
    characters: Vec<ResolvedId>,
}

#[derive(Deserialize)]
struct ResolvedId {
    id: i64,
}

#[derive(Deserialize)]
struct NamedEntity {
    name: String,
}

/// HTTP client for the ESI endpoints the lookup consumes.
#[derive(Clone, Debug)]
pub struct EsiClient {
    http: reqwest::Client,
    esi_url: String,
    datasource: String,
}

impl EsiClient {
    pub fn builder() -> EsiClientBuilder {
        EsiClientBuilder::default()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.esi_url, path)
    }

    async fn get<T>(&self, path: String) -> UpstreamResponse<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let request = self
            .http
            .get(self.url(&path))
            .query(&[("datasource", self.datasource.as_str())]);

        send_json(format!("GET {}", path), request).await
    }
}

#[async_trait]
impl DirectoryService for EsiClient {
    async fn search_character(&self, name: &str) -> UpstreamResponse<Vec<i64>> {
        let path = "/universe/ids/";
        let request = self
            .http
            .post(self.url(path))
            .query(&[("datasource", self.datasource.as_str()), ("language", "en")])
            .json(&[name]);

        send_json::<ResolvedIds>(format!("POST {}", path), request)
            .await
            .map(|ids| ids.characters.into_iter().map(|c| c.id).collect())
    }

    async fn character(&self, character_id: i64) -> UpstreamResponse<DirectoryRecord> {
        self.get(format!("/characters/{}/", character_id)).await
    }

    async fn corporation_name(&self, corporation_id: i64) -> UpstreamResponse<String> {
        self.get::<NamedEntity>(format!("/corporations/{}/", corporation_id))
            .await
            .map(|corporation| corporation.name)
    }

    async fn alliance_name(&self, alliance_id: i64) -> UpstreamResponse<String> {
        self.get::<NamedEntity>(format!("/alliances/{}/", alliance_id))
            .await
            .map(|alliance| alliance.name)
    }

    async fn corporation_history(
        &self,
        character_id: i64,
    ) -> UpstreamResponse<Vec<CorporationHistoryEntry>> {
        self.get(format!("/characters/{}/corporationhistory/", character_id))
            .await
    }
}

/// Builder for [`EsiClient`].
#[derive(Default)]
pub struct EsiClientBuilder {
    esi_url: Option<String>,
    datasource: Option<String>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
}

impl EsiClientBuilder {
    /// Base URL without trailing slash, defaults to the public ESI
    pub fn esi_url(mut self, esi_url: &str) -> Self {
        self.esi_url = Some(esi_url.trim_end_matches('/').to_string());
        self
    }

    pub fn datasource(mut self, datasource: &str) -> Self {
        self.datasource = Some(datasource.to_string());
        self
    }

    pub fn user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = Some(user_agent.to_string());
        self
    }

    /// Transport-level timeout for a single request
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<EsiClient, Error> {
        let mut http = reqwest::Client::builder();
        if let Some(user_agent) = &self.user_agent {
            http = http.user_agent(user_agent);
        }
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }

        Ok(EsiClient {
            http: http.build()?,
            esi_url: self.esi_url.unwrap_or_else(|| DEFAULT_ESI_URL.to_string()),
            datasource: self
                .datasource
                .unwrap_or_else(|| DEFAULT_DATASOURCE.to_string()),
        })
    }
}
