//! JSON bodies shaped like ESI and zKillboard responses.

use serde_json::{json, Value};

pub static MOCK_BIRTHDAY: &str = "2015-03-24T11:37:00Z";

/// Character record as returned by `GET /characters/{id}/`
pub fn mock_character(name: &str, corporation_id: i64, alliance_id: Option<i64>) -> Value {
    let mut character = json!({
        "birthday": MOCK_BIRTHDAY,
        "bloodline_id": 7,
        "corporation_id": corporation_id,
        "gender": "female",
        "name": name,
        "race_id": 8,
        "security_status": 1.234_567
    });

    if let Some(alliance_id) = alliance_id {
        character["alliance_id"] = json!(alliance_id);
    }

    character
}

/// Corporation record as returned by `GET /corporations/{id}/`
pub fn mock_corporation(name: &str) -> Value {
    json!({
        "ceo_id": 2114794365,
        "creator_id": 2114794365,
        "member_count": 21,
        "name": name,
        "tax_rate": 0.0,
        "ticker": "F4LL."
    })
}

/// Alliance record as returned by `GET /alliances/{id}/`
pub fn mock_alliance(name: &str) -> Value {
    json!({
        "creator_corporation_id": 98784257,
        "creator_id": 2114794365,
        "date_founded": "2024-09-25T06:25:58Z",
        "executor_corporation_id": 98787881,
        "name": name,
        "ticker": "AUTMN"
    })
}

/// Corporation history entry as returned by `GET /characters/{id}/corporationhistory/`
pub fn mock_history_entry(corporation_id: i64, record_id: i64, start_date: &str) -> Value {
    json!({
        "corporation_id": corporation_id,
        "record_id": record_id,
        "start_date": start_date
    })
}

/// Killboard statistics as returned by `/stats/characterID/{id}/`
pub fn mock_stats(kills: i64, losses: i64, danger: f64, gang: f64) -> Value {
    json!({
        "shipsDestroyed": kills,
        "shipsLost": losses,
        "dangerRatio": danger,
        "gangRatio": gang
    })
}

/// Statistics for a character zKillboard has never seen
pub fn mock_empty_stats() -> Value {
    Value::Null
}

/// Killmail as returned by the zKillboard kill list endpoints
pub fn mock_killmail(
    killmail_id: i64,
    killmail_time: &str,
    victim_character_id: Option<i64>,
    victim_ship_type_id: i64,
) -> Value {
    let mut victim = json!({ "ship_type_id": victim_ship_type_id });
    if let Some(character_id) = victim_character_id {
        victim["character_id"] = json!(character_id);
    }

    json!({
        "killmail_id": killmail_id,
        "killmail_time": killmail_time,
        "victim": victim
    })
}
