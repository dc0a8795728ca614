use std::time::Duration;

use sclh_test_utils::{constant::TEST_USER_AGENT, prelude::*};

use super::*;
use crate::server::model::upstream::StatusClass;

fn client(test: &TestContext) -> ZkillClient {
    ZkillClient::builder()
        .zkill_url(&test.zkill_url())
        .user_agent(TEST_USER_AGENT)
        .build()
        .expect("Failed to build zKillboard client")
}

mod character_stats {
    use super::*;

    /// Expect killboard statistics to be decoded from camelCase fields
    #[tokio::test]
    async fn decodes_stats() {
        let test = TestBuilder::new()
            .with_character_stats_endpoint(42, factory::mock_stats(12, 3, 80.0, 25.0), 1)
            .build()
            .await;

        let stats = client(&test)
            .character_stats(42)
            .await
            .into_result()
            .expect("Expected stats");

        assert_eq!(stats.ships_destroyed, 12);
        assert_eq!(stats.ships_lost, 3);
        assert_eq!(stats.danger_ratio, 80.0);
        assert_eq!(stats.gang_ratio, 25.0);
        assert!(stats.has_killboard());
        test.assert_mocks();
    }

    /// Expect zeroed statistics when zKillboard answers `null`
    #[tokio::test]
    async fn defaults_unknown_character_to_zero() {
        let test = TestBuilder::new()
            .with_character_stats_endpoint(42, factory::mock_empty_stats(), 1)
            .build()
            .await;

        let response = client(&test).character_stats(42).await;

        assert_eq!(response.class(), StatusClass::Success);
        let stats = response.body.expect("Expected stats");
        assert_eq!(stats, CombatStats::default());
        assert!(!stats.has_killboard());
        test.assert_mocks();
    }

    /// Expect a 429 to be classified as a client error
    #[tokio::test]
    async fn classifies_rate_limit_as_client_error() {
        let test = TestBuilder::new()
            .with_zkill_status_endpoint("/stats/characterID/42/", 429, 1)
            .build()
            .await;

        let response = client(&test).character_stats(42).await;

        assert_eq!(response.class(), StatusClass::ClientError);
        test.assert_mocks();
    }
}

mod corporation_danger {
    use super::*;

    /// Expect the corporation danger ratio
    #[tokio::test]
    async fn extracts_danger_ratio() {
        let test = TestBuilder::new()
            .with_corporation_stats_endpoint(98_000_001, 64.0, 1)
            .build()
            .await;

        let response = client(&test).corporation_danger(98_000_001).await;

        assert_eq!(response.body, Some(64.0));
        test.assert_mocks();
    }
}

mod latest_killmail {
    use super::*;

    /// Expect the single killmail from the list
    #[tokio::test]
    async fn returns_first_killmail() {
        let test = TestBuilder::new()
            .with_latest_killmail_endpoint(
                42,
                vec![factory::mock_killmail(7, "2024-05-01T12:00:00Z", Some(42), 587)],
                1,
            )
            .build()
            .await;

        let killmail = client(&test)
            .latest_killmail(42)
            .await
            .body
            .flatten()
            .expect("Expected killmail");

        assert_eq!(killmail.killmail_id, 7);
        assert_eq!(killmail.victim.character_id, Some(42));
        test.assert_mocks();
    }

    /// Expect None when the character has no killmails
    #[tokio::test]
    async fn returns_none_for_empty_list() {
        let test = TestBuilder::new()
            .with_latest_killmail_endpoint(42, vec![], 1)
            .build()
            .await;

        let response = client(&test).latest_killmail(42).await;

        assert_eq!(response.body, Some(None));
        test.assert_mocks();
    }
}

mod recent_kills {
    use super::*;

    /// Expect the window to be sent in whole seconds
    #[tokio::test]
    async fn requests_window_in_seconds() {
        let test = TestBuilder::new()
            .with_recent_kills_endpoint(
                42,
                3600,
                vec![
                    factory::mock_killmail(9, "2024-05-01T12:00:00Z", Some(7), 587),
                    factory::mock_killmail(8, "2024-05-01T11:00:00Z", None, 35832),
                ],
                1,
            )
            .build()
            .await;

        let response = client(&test)
            .recent_kills(42, Duration::from_secs(3600))
            .await;

        assert_eq!(response.endpoint, "GET /kills/characterID/42/pastSeconds/3600/");
        assert_eq!(response.body.map(|kills| kills.len()), Some(2));
        test.assert_mocks();
    }
}

mod kills {
    use super::*;

    /// Expect the full kill list
    #[tokio::test]
    async fn returns_kill_list() {
        let test = TestBuilder::new()
            .with_kills_endpoint(
                42,
                vec![factory::mock_killmail(9, "2024-05-01T12:00:00Z", Some(7), 23757)],
                1,
            )
            .build()
            .await;

        let kills = client(&test).kills(42).await.into_result().expect("Expected kills");

        assert_eq!(kills.len(), 1);
        assert_eq!(kills[0].victim.ship_type_id, 23757);
        test.assert_mocks();
    }
}
