//! Records consumed from the directory service (ESI).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A character name resolved to its unique identifier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub character_id: i64,
    /// Name exactly as it was queried
    pub name: String,
}

/// Public directory information for a character.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DirectoryRecord {
    pub name: String,
    pub birthday: DateTime<Utc>,
    #[serde(default)]
    pub security_status: f64,
    pub corporation_id: i64,
    /// Zero when the character is not in an alliance
    #[serde(default)]
    pub alliance_id: i64,
}

/// One entry of a character's corporation history, newest first as returned by ESI.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CorporationHistoryEntry {
    pub corporation_id: i64,
    #[serde(default)]
    pub record_id: i64,
    pub start_date: DateTime<Utc>,
}
