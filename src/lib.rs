//! Local-channel character lookup for EVE Online.
//!
//! Resolves pasted character names into profiles assembled from ESI and zKillboard.

pub mod model;
pub mod server;
