//! Error types for the lookup server.
//!
//! This module provides the error handling system with specialized error types for
//! configuration and upstream lookups. All errors implement `IntoResponse` for Axum HTTP
//! responses and use `thiserror` for ergonomic error definitions with automatic `Display`
//! and `Error` trait implementations.

pub mod config;
pub mod lookup;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dioxus_logger::tracing;
use thiserror::Error;

use crate::{
    model::api::ErrorDto,
    server::error::{config::ConfigError, lookup::LookupError},
};

/// Main error type for the lookup server.
///
/// Aggregates domain-specific error types and external library errors into a single
/// unified error type. `#[from]` enables automatic conversion via the `?` operator and the
/// `IntoResponse` implementation maps errors to HTTP responses for API consumers.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (missing or invalid environment variables).
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    /// Lookup error (unresolvable name, upstream failures).
    #[error(transparent)]
    LookupError(#[from] LookupError),
    /// HTTP client construction error.
    #[error(transparent)]
    HttpClientError(#[from] reqwest::Error),
    /// Listener or socket error.
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

/// Converts application errors into HTTP responses.
///
/// Lookup errors carry their own status mapping; everything else is treated as an
/// internal server error (500) and logged.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Self::ConfigError(err) => err.into_response(),
            Self::LookupError(err) => err.into_response(),
            err => InternalServerError(err).into_response(),
        }
    }
}

/// Wrapper type for converting any displayable error into a 500 Internal Server Error response.
///
/// Logs the error message and returns a generic "Internal server error" message to the
/// client to avoid leaking implementation details.
pub struct InternalServerError<E>(pub E);

impl<E: std::fmt::Display> IntoResponse for InternalServerError<E> {
    fn into_response(self) -> Response {
        tracing::error!("{}", self.0);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorDto {
                error: "Internal server error".to_string(),
            }),
        )
            .into_response()
    }
}
