//! Synthetic locations clustered around three widely-separated Nevada and
//! Arizona metros. Offsets are derived from the index arithmetic below, so
//! the fixture is fully deterministic.

use territory_planner::input::{Coordinate, LocationRecord};
use territory_planner::traits::{ProviderError, TravelTimeProvider};

/// A city anchor for synthetic clusters.
pub struct CityAnchor {
    pub name: &'static str,
    pub state: &'static str,
    pub lat: f64,
    pub lng: f64,
}

pub const LAS_VEGAS: CityAnchor = CityAnchor {
    name: "Las Vegas",
    state: "NV",
    lat: 36.1699,
    lng: -115.1398,
};

pub const RENO: CityAnchor = CityAnchor {
    name: "Reno",
    state: "NV",
    lat: 39.5296,
    lng: -119.8138,
};

pub const PHOENIX: CityAnchor = CityAnchor {
    name: "Phoenix",
    state: "AZ",
    lat: 33.4484,
    lng: -112.0740,
};

/// One fully-populated record near a city anchor, jittered within ~2 miles.
pub fn record_near(city: &CityAnchor, index: usize) -> LocationRecord {
    let jitter_lat = ((index * 37) % 100) as f64 * 0.0004 - 0.02;
    let jitter_lng = ((index * 61) % 100) as f64 * 0.0004 - 0.02;
    LocationRecord {
        id: format!("{}-{}", city.name.to_lowercase().replace(' ', "-"), index),
        name: format!("{} Site {}", city.name, index),
        street: Some(format!("{} Main St", 100 + index)),
        city: Some(city.name.to_string()),
        state: Some(city.state.to_string()),
        postal_code: Some("00000".to_string()),
        latitude: Some(Coordinate::Number(city.lat + jitter_lat)),
        longitude: Some(Coordinate::Number(city.lng + jitter_lng)),
    }
}

/// `counts.0 + counts.1 + counts.2` records across the three metros.
pub fn three_city_records(counts: (usize, usize, usize)) -> Vec<LocationRecord> {
    let mut records = Vec::new();
    for i in 0..counts.0 {
        records.push(record_near(&LAS_VEGAS, i));
    }
    for i in 0..counts.1 {
        records.push(record_near(&RENO, i));
    }
    for i in 0..counts.2 {
        records.push(record_near(&PHOENIX, i));
    }
    records
}

/// Provider that always fails, for exercising the fallback branch.
pub struct FailingProvider;

impl TravelTimeProvider for FailingProvider {
    fn travel_matrix(&self, _locations: &[(f64, f64)]) -> Result<Vec<Vec<i32>>, ProviderError> {
        Err(ProviderError::Unavailable("stub outage".to_string()))
    }
}
