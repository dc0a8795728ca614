//! Lookup core.
//!
//! Leaf-first: [`cache`], [`retry`] and [`batch`] are generic building blocks;
//! [`directory`] and [`statistics`] combine them into cached, retried provider access;
//! [`identity`] and [`profile`] implement name resolution and profile aggregation; and
//! [`lookup`] wires everything into the name list to profile list entry point.

pub mod batch;
pub mod cache;
pub mod directory;
pub mod identity;
pub mod lookup;
pub mod profile;
pub mod retry;
pub mod statistics;
