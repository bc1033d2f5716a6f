//! Test fixtures for territory-planner.
//!
//! Provides:
//! - Synthetic three-city location sets (deterministic, no ambient randomness)
//! - Builders for location records and travel-time provider stubs

pub mod three_cities;

pub use three_cities::*;
