//! Utility functions and helpers for server operations.
//!
//! This module provides EVE Online-specific rules (NPC corporations, notable hulls, display
//! name overrides) and time formatting used when building character profiles.

pub mod eve;
pub mod time;
