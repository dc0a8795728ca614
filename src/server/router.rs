//! HTTP routing and OpenAPI documentation configuration.
//!
//! This module defines the application's HTTP routes and generates OpenAPI documentation
//! using utoipa. All API endpoints are registered here with their OpenAPI specifications,
//! and the generated document is served as JSON at `/api/docs/openapi.json`.

use axum::{routing::get, Json, Router};
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::server::{controller, model::app::AppState};

/// Builds the application's HTTP router with all API endpoints and the OpenAPI document.
///
/// # Registered Endpoints
/// - `POST /api/lookup` - Look up profiles for a list of names
/// - `GET /api/character/{name}` - Look up a single profile
/// - `GET /api/docs/openapi.json` - OpenAPI specification
///
/// # Example
/// ```ignore
/// let router = routes().with_state(app_state);
/// axum::serve(listener, router).await?;
/// ```
pub fn routes() -> Router<AppState> {
    #[derive(OpenApi)]
    #[openapi(info(title = "sclh", description = "Character lookup API"), tags(
        (name = controller::lookup::LOOKUP_TAG, description = "Character lookup API routes"),
    ))]
    struct ApiDoc;

    let (routes, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(controller::lookup::lookup_characters))
        .routes(routes!(controller::lookup::get_character))
        .split_for_parts();

    routes.route(
        "/api/docs/openapi.json",
        get(move || {
            let api = api.clone();
            async move { Json(api) }
        }),
    )
}
