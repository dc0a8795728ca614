use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dioxus_logger::tracing;
use thiserror::Error;

use crate::model::api::ErrorDto;

/// Outcome of a failed lookup step.
///
/// `NotFound` is an ordinary result for names that do not resolve; the remaining variants
/// describe upstream trouble after the retry policy gave up.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("No character found matching name {0:?}")]
    NotFound(String),
    #[error("Upstream {endpoint} unavailable (status {status:?}) after exhausting retries")]
    UpstreamUnavailable {
        endpoint: String,
        status: Option<u16>,
    },
    #[error("Upstream {endpoint} rejected the request (status {status:?})")]
    UpstreamRejected {
        endpoint: String,
        status: Option<u16>,
    },
    #[error("Timed out waiting for {0}")]
    Timeout(String),
}

impl LookupError {
    /// Whether the failure may clear up on a later request
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::UpstreamUnavailable { .. } | Self::Timeout(_))
    }
}

impl IntoResponse for LookupError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::NotFound(_) => {
                tracing::debug!("{}", self);

                (StatusCode::NOT_FOUND, "Character not found")
            }
            Self::UpstreamRejected { .. } => {
                tracing::warn!("{}", self);

                (StatusCode::BAD_GATEWAY, "Upstream provider rejected the request")
            }
            Self::UpstreamUnavailable { .. } => {
                tracing::warn!("{}", self);

                (StatusCode::SERVICE_UNAVAILABLE, "Upstream provider unavailable, please try again later")
            }
            Self::Timeout(_) => {
                tracing::warn!("{}", self);

                (StatusCode::GATEWAY_TIMEOUT, "Upstream provider timed out, please try again later")
            }
        };

        (
            status,
            Json(ErrorDto {
                error: message.to_string(),
            }),
        )
            .into_response()
    }
}
