//! Great-circle distance in miles, plus a haversine travel-time provider.
//!
//! The haversine provider estimates travel time from straight-line distance
//! and an assumed speed. Less accurate than a road-network provider
//! (ignores roads) but always available.

use crate::traits::{ProviderError, TravelTimeProvider};

/// Average driving speed assumption for time estimation.
const DEFAULT_SPEED_MPH: f64 = 25.0;

/// Earth radius in miles.
const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Great-circle distance between two (lat, lng) points in miles.
pub fn distance_miles(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lng1) = from;
    let (lat2, lng2) = to;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_MILES * c
}

/// Haversine-based travel-time provider.
///
/// Useful as an offline provider and in tests; never fails.
#[derive(Debug, Clone)]
pub struct HaversineMatrix {
    /// Assumed average driving speed in mph.
    pub speed_mph: f64,
}

impl Default for HaversineMatrix {
    fn default() -> Self {
        Self {
            speed_mph: DEFAULT_SPEED_MPH,
        }
    }
}

impl HaversineMatrix {
    pub fn new(speed_mph: f64) -> Self {
        Self { speed_mph }
    }

    fn miles_to_seconds(&self, miles: f64) -> i32 {
        let hours = miles / self.speed_mph;
        (hours * 3600.0).round() as i32
    }
}

impl TravelTimeProvider for HaversineMatrix {
    fn travel_matrix(&self, locations: &[(f64, f64)]) -> Result<Vec<Vec<i32>>, ProviderError> {
        let n = locations.len();
        let mut matrix = vec![vec![0; n]; n];

        for (i, from) in locations.iter().enumerate() {
            for (j, to) in locations.iter().enumerate() {
                if i != j {
                    let miles = distance_miles(*from, *to);
                    matrix[i][j] = self.miles_to_seconds(miles);
                }
            }
        }

        Ok(matrix)
    }
}
