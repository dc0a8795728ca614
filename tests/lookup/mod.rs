//! End-to-end lookups through the HTTP clients against mocked ESI and zKillboard endpoints.
//!
//! Every mock declares how often it must be called, so `assert_mocks` verifies both that the
//! expected requests were made and that no request was repeated.

use sclh::server::config::LookupConfig;
use sclh_test_utils::prelude::*;

use crate::setup::{test_config, test_state};

const CORPORATION_ID: i64 = 98_000_001;

fn names(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

/// Registers the corporation endpoints every profile build in these tests needs
fn with_corporation(builder: TestBuilder, character_id: i64, expected_requests: usize) -> TestBuilder {
    builder
        .with_corporation_endpoint(
            CORPORATION_ID,
            factory::mock_corporation("The Order of Autumn"),
            expected_requests,
        )
        .with_corporation_history_endpoint(
            character_id,
            vec![factory::mock_history_entry(CORPORATION_ID, 1, "2020-01-15T00:00:00Z")],
            expected_requests,
        )
        .with_corporation_stats_endpoint(CORPORATION_ID, 64.0, expected_requests)
}

/// Tests the single candidate scenario.
///
/// Verifies that a name with exactly one search result is accepted without a disambiguation
/// fetch: the character record is requested once, for the profile, and statistics once.
///
/// Expected: one profile for character 42 with every enrichment populated
#[tokio::test]
async fn resolves_solo_candidate() {
    let builder = TestBuilder::new()
        .with_search_endpoint("Solo Candidate", vec![42], 1)
        .with_character_endpoint(
            42,
            factory::mock_character("Solo Candidate", CORPORATION_ID, Some(99_000_001)),
            1,
        )
        .with_alliance_endpoint(99_000_001, factory::mock_alliance("Autumn."), 1)
        .with_character_stats_endpoint(42, factory::mock_stats(12, 3, 80.0, 25.0), 1)
        .with_latest_killmail_endpoint(
            42,
            vec![factory::mock_killmail(7, "2024-05-01T12:00:00Z", None, 35832)],
            1,
        );
    let test = with_corporation(builder, 42, 1).build().await;
    let state = test_state(&test, test_config());

    let profiles = state.orchestrator().lookup(&names(&["Solo Candidate"])).await;

    assert_eq!(profiles.len(), 1);
    let profile = &profiles[0];
    assert_eq!(profile.character_id, 42);
    assert_eq!(profile.security, 1.23);
    assert_eq!(profile.kills, 12);
    assert_eq!(profile.last_kill, "struct 2024-05-01");
    assert_eq!(profile.corp_name, "The Order of Autumn");
    assert_eq!(profile.corp_danger, 64.0);
    assert_eq!(profile.alliance_name, "Autumn.");
    test.assert_mocks();
}

/// Tests the ambiguous name scenario.
///
/// Verifies that both candidate records are fetched once, that the exact match wins and
/// that the winning record fetched during disambiguation is reused for the profile.
///
/// Expected: one profile for character 2
#[tokio::test]
async fn disambiguates_by_exact_name() {
    let builder = TestBuilder::new()
        .with_search_endpoint("Ambiguous Name", vec![1, 2], 1)
        .with_character_endpoint(
            1,
            factory::mock_character("Ambiguous Name Jr", CORPORATION_ID, None),
            1,
        )
        .with_character_endpoint(
            2,
            factory::mock_character("Ambiguous Name", CORPORATION_ID, None),
            1,
        )
        .with_character_stats_endpoint(2, factory::mock_empty_stats(), 1);
    let test = with_corporation(builder, 2, 1).build().await;
    let state = test_state(&test, test_config());

    let profiles = state.orchestrator().lookup(&names(&["Ambiguous Name"])).await;

    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0].character_id, 2);
    assert!(!profiles[0].has_killboard);
    assert_eq!(profiles[0].last_kill, "");
    test.assert_mocks();
}

/// Tests repeating a lookup within the cache lifetime.
///
/// Expected: identical results with every endpoint called only once
#[tokio::test]
async fn serves_repeated_lookup_from_cache() {
    let builder = TestBuilder::new()
        .with_search_endpoint("Solo Candidate", vec![42], 1)
        .with_character_endpoint(42, factory::mock_character("Solo Candidate", CORPORATION_ID, None), 1)
        .with_character_stats_endpoint(42, factory::mock_empty_stats(), 1);
    let test = with_corporation(builder, 42, 1).build().await;
    let state = test_state(&test, test_config());

    let first = state.orchestrator().lookup(&names(&["Solo Candidate"])).await;
    let second = state
        .orchestrator()
        .lookup(&names(&["Solo Candidate", "Solo Candidate"]))
        .await;

    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 2);
    assert!(second.iter().all(|profile| profile.character_id == 42));
    test.assert_mocks();
}

/// Tests names without search results.
///
/// Expected: no profile and no further requests
#[tokio::test]
async fn omits_unknown_names() {
    let test = TestBuilder::new()
        .with_search_endpoint("Nobody", vec![], 1)
        .build()
        .await;
    let state = test_state(&test, test_config());

    let profiles = state.orchestrator().lookup(&names(&["Nobody"])).await;

    assert!(profiles.is_empty());
    test.assert_mocks();
}

/// Tests a directory outage while fetching the character record.
///
/// Verifies that the record request is retried on server errors up to three attempts and
/// that the character is then omitted.
///
/// Expected: empty result after 3 record requests
#[tokio::test]
async fn retries_directory_server_errors() {
    let test = TestBuilder::new()
        .with_search_endpoint("Solo Candidate", vec![42], 1)
        .with_esi_status_endpoint("GET", "/characters/42/", 503, 3)
        .build()
        .await;
    let state = test_state(&test, test_config());

    let profiles = state.orchestrator().lookup(&names(&["Solo Candidate"])).await;

    assert!(profiles.is_empty());
    test.assert_mocks();
}

/// Tests a statistics outage.
///
/// Verifies that statistics requests are retried up to five attempts and that the profile
/// is still returned with zeroed statistics.
///
/// Expected: profile without killboard after 5 statistics requests
#[tokio::test]
async fn degrades_statistics_outage_to_defaults() {
    let builder = TestBuilder::new()
        .with_search_endpoint("Solo Candidate", vec![42], 1)
        .with_character_endpoint(42, factory::mock_character("Solo Candidate", CORPORATION_ID, None), 1)
        .with_zkill_status_endpoint("/stats/characterID/42/", 502, 5);
    let test = with_corporation(builder, 42, 1).build().await;
    let state = test_state(&test, test_config());

    let profiles = state.orchestrator().lookup(&names(&["Solo Candidate"])).await;

    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0].kills, 0);
    assert!(!profiles[0].has_killboard);
    assert_eq!(profiles[0].corp_danger, 64.0);
    test.assert_mocks();
}

/// Tests kill history enrichment.
///
/// Expected: kill history summary from the full and recent kill lists
#[tokio::test]
async fn summarizes_kill_history_when_enabled() {
    let config = LookupConfig {
        kill_history_enabled: true,
        ..test_config()
    };
    let window = config.recent_kill_window.as_secs();
    let builder = TestBuilder::new()
        .with_search_endpoint("Solo Candidate", vec![42], 1)
        .with_character_endpoint(42, factory::mock_character("Solo Candidate", CORPORATION_ID, None), 1)
        .with_character_stats_endpoint(42, factory::mock_empty_stats(), 1)
        .with_kills_endpoint(
            42,
            vec![
                factory::mock_killmail(3, "2024-05-01T12:00:00Z", Some(7), 671),
                factory::mock_killmail(2, "2024-04-01T12:00:00Z", Some(8), 587),
            ],
            1,
        )
        .with_recent_kills_endpoint(
            42,
            window,
            vec![factory::mock_killmail(3, "2024-05-01T12:00:00Z", Some(7), 671)],
            1,
        );
    let test = with_corporation(builder, 42, 1).build().await;
    let state = test_state(&test, config);

    let profiles = state.orchestrator().lookup(&names(&["Solo Candidate"])).await;

    let history = &profiles[0].kill_history;
    assert_eq!(history.total_kills, 2);
    assert_eq!(history.recent_kills, 1);
    assert_eq!(history.notable_kills, 1);
    test.assert_mocks();
}
