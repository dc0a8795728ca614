//! Server application core modules.
//!
//! This module contains the lookup core (caching, retries, batching, identity resolution and
//! profile aggregation) together with the thin HTTP layer in front of it and the clients
//! for EVE Online's ESI and zKillboard.

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod router;
pub mod service;
pub mod startup;
pub mod util;
