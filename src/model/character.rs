use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Merged profile for one resolved character.
///
/// Every field carries a usable default when the lookup feeding it failed or came back
/// empty, so consumers never have to handle partially populated records.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CharacterProfile {
    /// Display name, after nickname overrides
    pub name: String,
    pub character_id: i64,
    /// Security status rounded to two decimals
    pub security: f64,
    /// Character age formatted as `1y2m3d`, or `today`
    pub age: String,
    pub birthday: DateTime<Utc>,
    pub danger: f64,
    pub gang: f64,
    pub kills: i64,
    pub losses: i64,
    pub has_killboard: bool,
    /// Most recent killboard activity such as `kill 2024-05-01`, empty without a killboard
    pub last_kill: String,
    pub corp_id: i64,
    pub corp_name: String,
    /// Whole days since the character joined the current corporation
    pub corp_age: i64,
    pub is_npc_corp: bool,
    pub corp_danger: f64,
    /// Zero when the character is not in an alliance
    pub alliance_id: i64,
    /// Empty when the character is not in an alliance
    pub alliance_name: String,
    pub kill_history: KillHistorySummary,
}

/// Kill activity derived from the character's killmail lists.
///
/// Only populated when kill history enrichment is enabled; otherwise all zeros.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct KillHistorySummary {
    /// Kills inside the recent window
    pub recent_kills: usize,
    /// Kills over the full returned history
    pub total_kills: usize,
    /// Kills where the victim flew a notable hull
    pub notable_kills: usize,
    pub last_kill_at: Option<DateTime<Utc>>,
}
