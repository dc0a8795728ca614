//! Mock HTTP endpoint creation utilities.
//!
//! Each function registers one endpoint on the mock server that returns the given JSON
//! body and verifies it was called exactly `expected_requests` times. Query strings such as
//! `?datasource=tranquility` are ignored when matching.

use mockito::{Matcher, Mock, ServerGuard};
use serde_json::{json, Value};

use crate::constant::ZKILL_PREFIX;

fn json_endpoint(
    server: &mut ServerGuard,
    method: &str,
    path: &str,
    body: &Value,
    expected_requests: usize,
) -> Mock {
    server
        .mock(method, path)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .expect(expected_requests)
        .create()
}

/// Create a mock endpoint for `POST /universe/ids/` resolving `name` to `character_ids`.
///
/// The endpoint only matches requests whose body is exactly `["<name>"]`.
pub fn create_search_endpoint(
    server: &mut ServerGuard,
    name: &str,
    character_ids: &[i64],
    expected_requests: usize,
) -> Mock {
    let body = if character_ids.is_empty() {
        json!({})
    } else {
        let characters: Vec<Value> = character_ids
            .iter()
            .map(|id| json!({ "id": id, "name": name }))
            .collect();
        json!({ "characters": characters })
    };

    server
        .mock("POST", "/universe/ids/")
        .match_query(Matcher::Any)
        .match_body(Matcher::Json(json!([name])))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .expect(expected_requests)
        .create()
}

/// Create a mock endpoint for `GET /characters/{character_id}/`
pub fn create_character_endpoint(
    server: &mut ServerGuard,
    character_id: i64,
    character: &Value,
    expected_requests: usize,
) -> Mock {
    let path = format!("/characters/{}/", character_id);
    json_endpoint(server, "GET", &path, character, expected_requests)
}

/// Create a mock endpoint for `GET /corporations/{corporation_id}/`
pub fn create_corporation_endpoint(
    server: &mut ServerGuard,
    corporation_id: i64,
    corporation: &Value,
    expected_requests: usize,
) -> Mock {
    let path = format!("/corporations/{}/", corporation_id);
    json_endpoint(server, "GET", &path, corporation, expected_requests)
}

/// Create a mock endpoint for `GET /alliances/{alliance_id}/`
pub fn create_alliance_endpoint(
    server: &mut ServerGuard,
    alliance_id: i64,
    alliance: &Value,
    expected_requests: usize,
) -> Mock {
    let path = format!("/alliances/{}/", alliance_id);
    json_endpoint(server, "GET", &path, alliance, expected_requests)
}

/// Create a mock endpoint for `GET /characters/{character_id}/corporationhistory/`
pub fn create_corporation_history_endpoint(
    server: &mut ServerGuard,
    character_id: i64,
    history: &[Value],
    expected_requests: usize,
) -> Mock {
    let path = format!("/characters/{}/corporationhistory/", character_id);
    json_endpoint(server, "GET", &path, &json!(history), expected_requests)
}

/// Create a mock endpoint for zKillboard `/stats/characterID/{character_id}/`
pub fn create_character_stats_endpoint(
    server: &mut ServerGuard,
    character_id: i64,
    stats: &Value,
    expected_requests: usize,
) -> Mock {
    let path = format!("{}/stats/characterID/{}/", ZKILL_PREFIX, character_id);
    json_endpoint(server, "GET", &path, stats, expected_requests)
}

/// Create a mock endpoint for zKillboard `/stats/corporationID/{corporation_id}/`
pub fn create_corporation_stats_endpoint(
    server: &mut ServerGuard,
    corporation_id: i64,
    danger_ratio: f64,
    expected_requests: usize,
) -> Mock {
    let path = format!("{}/stats/corporationID/{}/", ZKILL_PREFIX, corporation_id);
    let body = json!({ "dangerRatio": danger_ratio });
    json_endpoint(server, "GET", &path, &body, expected_requests)
}

/// Create a mock endpoint for zKillboard `/characterID/{character_id}/limit/1/`
pub fn create_latest_killmail_endpoint(
    server: &mut ServerGuard,
    character_id: i64,
    killmails: &[Value],
    expected_requests: usize,
) -> Mock {
    let path = format!("{}/characterID/{}/limit/1/", ZKILL_PREFIX, character_id);
    json_endpoint(server, "GET", &path, &json!(killmails), expected_requests)
}

/// Create a mock endpoint for zKillboard `/kills/characterID/{character_id}/`
pub fn create_kills_endpoint(
    server: &mut ServerGuard,
    character_id: i64,
    killmails: &[Value],
    expected_requests: usize,
) -> Mock {
    let path = format!("{}/kills/characterID/{}/", ZKILL_PREFIX, character_id);
    json_endpoint(server, "GET", &path, &json!(killmails), expected_requests)
}

/// Create a mock endpoint for zKillboard `/kills/characterID/{character_id}/pastSeconds/{seconds}/`
pub fn create_recent_kills_endpoint(
    server: &mut ServerGuard,
    character_id: i64,
    seconds: u64,
    killmails: &[Value],
    expected_requests: usize,
) -> Mock {
    let path = format!(
        "{}/kills/characterID/{}/pastSeconds/{}/",
        ZKILL_PREFIX, character_id, seconds
    );
    json_endpoint(server, "GET", &path, &json!(killmails), expected_requests)
}

/// Create a mock endpoint answering with a bare status code
pub fn create_status_endpoint(
    server: &mut ServerGuard,
    method: &str,
    path: &str,
    status: usize,
    expected_requests: usize,
) -> Mock {
    server
        .mock(method, path)
        .match_query(Matcher::Any)
        .with_status(status)
        .expect(expected_requests)
        .create()
}
