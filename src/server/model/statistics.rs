//! Records consumed from the statistics service (zKillboard).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregate killboard statistics for a character.
///
/// zKillboard omits the fields entirely for characters without a killboard, so every
/// field defaults to zero.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatStats {
    #[serde(default)]
    pub ships_destroyed: i64,
    #[serde(default)]
    pub ships_lost: i64,
    #[serde(default)]
    pub danger_ratio: f64,
    #[serde(default)]
    pub gang_ratio: f64,
}

impl CombatStats {
    /// A character has a killboard once it has at least one kill or loss
    pub fn has_killboard(&self) -> bool {
        self.ships_destroyed != 0 || self.ships_lost != 0
    }
}

/// Killmail fields the lookup needs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Killmail {
    pub killmail_id: i64,
    pub killmail_time: DateTime<Utc>,
    pub victim: KillmailVictim,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct KillmailVictim {
    /// Absent for structures and other unpiloted victims
    #[serde(default)]
    pub character_id: Option<i64>,
    #[serde(default)]
    pub ship_type_id: i64,
}
