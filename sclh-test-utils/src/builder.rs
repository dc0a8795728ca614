//! Declarative test builder.
//!
//! This module provides the `TestBuilder` API for configuring mock ESI and zKillboard
//! endpoints before a test runs. Endpoint registrations are queued and executed during the
//! final `build()` call.

use mockito::{Mock, Server, ServerGuard};
use serde_json::Value;

use crate::{constant::ZKILL_PREFIX, context::TestContext, fixtures::mockito as endpoints};

type MockBuilder = Box<dyn FnOnce(&mut ServerGuard) -> Mock>;

/// Builder for declarative test initialization.
///
/// # Example
///
/// ```no_run
/// use sclh_test_utils::prelude::*;
///
/// # async fn example() {
/// let test = TestBuilder::new()
///     .with_search_endpoint("Solo Candidate", vec![42], 1)
///     .with_character_endpoint(42, factory::mock_character("Solo Candidate", 98_000_001, None), 1)
///     .build()
///     .await;
/// # }
/// ```
#[derive(Default)]
pub struct TestBuilder {
    mock_builders: Vec<MockBuilder>,
}

impl TestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an arbitrary mock endpoint.
    ///
    /// # Arguments
    /// - `builder` - Creates the mock on the test server
    pub fn with_mock_endpoint<F>(mut self, builder: F) -> Self
    where
        F: FnOnce(&mut ServerGuard) -> Mock + 'static,
    {
        self.mock_builders.push(Box::new(builder));
        self
    }

    /// Name search returning the given candidate IDs (empty for no match)
    pub fn with_search_endpoint(
        self,
        name: &str,
        character_ids: Vec<i64>,
        expected_requests: usize,
    ) -> Self {
        let name = name.to_string();
        self.with_mock_endpoint(move |server| {
            endpoints::create_search_endpoint(server, &name, &character_ids, expected_requests)
        })
    }

    pub fn with_character_endpoint(
        self,
        character_id: i64,
        character: Value,
        expected_requests: usize,
    ) -> Self {
        self.with_mock_endpoint(move |server| {
            endpoints::create_character_endpoint(server, character_id, &character, expected_requests)
        })
    }

    pub fn with_corporation_endpoint(
        self,
        corporation_id: i64,
        corporation: Value,
        expected_requests: usize,
    ) -> Self {
        self.with_mock_endpoint(move |server| {
            endpoints::create_corporation_endpoint(
                server,
                corporation_id,
                &corporation,
                expected_requests,
            )
        })
    }

    pub fn with_alliance_endpoint(
        self,
        alliance_id: i64,
        alliance: Value,
        expected_requests: usize,
    ) -> Self {
        self.with_mock_endpoint(move |server| {
            endpoints::create_alliance_endpoint(server, alliance_id, &alliance, expected_requests)
        })
    }

    pub fn with_corporation_history_endpoint(
        self,
        character_id: i64,
        history: Vec<Value>,
        expected_requests: usize,
    ) -> Self {
        self.with_mock_endpoint(move |server| {
            endpoints::create_corporation_history_endpoint(
                server,
                character_id,
                &history,
                expected_requests,
            )
        })
    }

    pub fn with_character_stats_endpoint(
        self,
        character_id: i64,
        stats: Value,
        expected_requests: usize,
    ) -> Self {
        self.with_mock_endpoint(move |server| {
            endpoints::create_character_stats_endpoint(server, character_id, &stats, expected_requests)
        })
    }

    pub fn with_corporation_stats_endpoint(
        self,
        corporation_id: i64,
        danger_ratio: f64,
        expected_requests: usize,
    ) -> Self {
        self.with_mock_endpoint(move |server| {
            endpoints::create_corporation_stats_endpoint(
                server,
                corporation_id,
                danger_ratio,
                expected_requests,
            )
        })
    }

    pub fn with_latest_killmail_endpoint(
        self,
        character_id: i64,
        killmails: Vec<Value>,
        expected_requests: usize,
    ) -> Self {
        self.with_mock_endpoint(move |server| {
            endpoints::create_latest_killmail_endpoint(
                server,
                character_id,
                &killmails,
                expected_requests,
            )
        })
    }

    pub fn with_kills_endpoint(
        self,
        character_id: i64,
        killmails: Vec<Value>,
        expected_requests: usize,
    ) -> Self {
        self.with_mock_endpoint(move |server| {
            endpoints::create_kills_endpoint(server, character_id, &killmails, expected_requests)
        })
    }

    pub fn with_recent_kills_endpoint(
        self,
        character_id: i64,
        seconds: u64,
        killmails: Vec<Value>,
        expected_requests: usize,
    ) -> Self {
        self.with_mock_endpoint(move |server| {
            endpoints::create_recent_kills_endpoint(
                server,
                character_id,
                seconds,
                &killmails,
                expected_requests,
            )
        })
    }

    /// ESI endpoint answering with a bare status code, e.g. 503
    pub fn with_esi_status_endpoint(
        self,
        method: &str,
        path: &str,
        status: usize,
        expected_requests: usize,
    ) -> Self {
        let (method, path) = (method.to_string(), path.to_string());
        self.with_mock_endpoint(move |server| {
            endpoints::create_status_endpoint(server, &method, &path, status, expected_requests)
        })
    }

    /// zKillboard endpoint answering with a bare status code; `path` excludes the prefix
    pub fn with_zkill_status_endpoint(
        self,
        path: &str,
        status: usize,
        expected_requests: usize,
    ) -> Self {
        let path = format!("{}{}", ZKILL_PREFIX, path);
        self.with_mock_endpoint(move |server| {
            endpoints::create_status_endpoint(server, "GET", &path, status, expected_requests)
        })
    }

    /// Start the mock server and register all queued endpoints
    pub async fn build(self) -> TestContext {
        let mut server = Server::new_async().await;

        let mocks = self
            .mock_builders
            .into_iter()
            .map(|builder| builder(&mut server))
            .collect();

        TestContext { server, mocks }
    }
}
