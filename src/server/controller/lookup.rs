use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    model::{
        api::{ErrorDto, LookupRequestDto, LookupResponseDto},
        character::CharacterProfile,
    },
    server::{error::Error, model::app::AppState},
};

pub static LOOKUP_TAG: &str = "lookup";

/// Look up profiles for a list of character names
///
/// Names are trimmed, blank entries dropped and the list truncated to the configured
/// maximum. Names that do not resolve are omitted from the response.
#[utoipa::path(
    post,
    path = "/api/lookup",
    tag = LOOKUP_TAG,
    request_body = LookupRequestDto,
    responses(
        (status = 200, description = "Profiles for every resolved name, in request order", body = LookupResponseDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn lookup_characters(
    State(state): State<AppState>,
    Json(request): Json<LookupRequestDto>,
) -> impl IntoResponse {
    let outcome = state.orchestrator().lookup_bounded(request.names).await;

    (
        StatusCode::OK,
        Json(LookupResponseDto {
            accepted: outcome.accepted,
            max_characters: state.lookup.max_characters,
            characters: outcome.characters,
        }),
    )
}

/// Look up the profile of a single character
#[utoipa::path(
    get,
    path = "/api/character/{name}",
    tag = LOOKUP_TAG,
    params(
        ("name" = String, Path, description = "Exact character name")
    ),
    responses(
        (status = 200, description = "Character profile", body = CharacterProfile),
        (status = 404, description = "No character matches the name", body = ErrorDto),
        (status = 502, description = "Upstream provider rejected the request", body = ErrorDto),
        (status = 503, description = "Upstream provider unavailable", body = ErrorDto),
        (status = 504, description = "Upstream provider timed out", body = ErrorDto)
    ),
)]
pub async fn get_character(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, Error> {
    let profile = state.orchestrator().lookup_one(&name).await?;

    Ok((StatusCode::OK, Json(profile)))
}
