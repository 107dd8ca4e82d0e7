//! Board insights library.
//!
//! Read-side analytics over a collaborative bookmarking store: per-board
//! point rankings, member interaction streams, and pin content harvesting
//! with local topic/keyword extraction and throttled semantic enrichment.

#![allow(clippy::needless_raw_string_hashes)]

pub mod config;
pub mod constants;
pub mod db;
pub mod enrichment;
pub mod harvest;
pub mod interactions;
pub mod stats;
pub mod text;
