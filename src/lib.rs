//! territory-planner core engine
//!
//! Partitions geocoded service locations into balanced zones, repairs the
//! zones for city coherence and geographic outliers, builds a recurring
//! weekly visit schedule, and orders each day's visits using travel-time
//! data with 2-opt local search.

pub mod traits;
pub mod model;
pub mod input;
pub mod haversine;
pub mod centroid;
pub mod assign;
pub mod coherence;
pub mod outliers;
pub mod schedule;
pub mod route;
pub mod planner;
pub mod osrm;
