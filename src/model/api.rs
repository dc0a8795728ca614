use serde::{Deserialize, Serialize};

use crate::model::character::CharacterProfile;

/// The response when an error occurs with an API request
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorDto {
    /// The error message
    pub error: String,
}

/// Character names pasted from a local channel or fleet window
#[derive(Clone, Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LookupRequestDto {
    /// One character name per entry; blank entries are ignored
    pub names: Vec<String>,
}

/// Profiles for every name that resolved to a character
#[derive(Clone, Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LookupResponseDto {
    /// How many names were accepted for lookup after trimming and truncation
    pub accepted: usize,
    /// Upper bound on names accepted per request
    pub max_characters: usize,
    /// Resolved profiles in request order
    pub characters: Vec<CharacterProfile>,
}
