//! Server-side models.
//!
//! Application state plus the records consumed from upstream providers and the response
//! envelope used to classify their answers.

pub mod app;
pub mod directory;
pub mod statistics;
pub mod upstream;
