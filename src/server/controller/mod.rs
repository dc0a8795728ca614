//! HTTP controller endpoints for the lookup web API.
//!
//! Controllers are thin: they decode the request, hand the names to the lookup core and map
//! the outcome into a response. They use utoipa for OpenAPI documentation.

pub mod lookup;
