//! Injected-collaborator seams for the planning engine.
//!
//! These are intentionally minimal. Concrete apps supply their own
//! travel-time provider; tests supply fixed matrices and seeded randomness.

use std::fmt;

/// Failure surfaced by a travel-time provider for one batch.
///
/// Never fatal to a planning run: the route refiner matches on the `Err`
/// and falls back to proximity ordering for that batch only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The provider could not be reached or refused the request.
    Unavailable(String),
    /// The provider answered with a matrix that does not fit the request.
    Malformed(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Unavailable(reason) => {
                write!(f, "travel-time provider unavailable: {}", reason)
            }
            ProviderError::Malformed(reason) => {
                write!(f, "travel-time provider returned malformed data: {}", reason)
            }
        }
    }
}

impl std::error::Error for ProviderError {}

/// Provides a pairwise travel-time matrix for a set of locations.
///
/// The matrix is indexed by the provided location order, values in
/// seconds. Symmetry is not assumed.
pub trait TravelTimeProvider {
    fn travel_matrix(&self, locations: &[(f64, f64)]) -> Result<Vec<Vec<i32>>, ProviderError>;
}

/// Source of randomness for centroid seeding.
///
/// Abstracted so runs are reproducible in tests via a fixed seed instead
/// of ambient process randomness.
pub trait RandomSource {
    /// Next value in `[0, 1)`.
    fn next_f64(&mut self) -> f64;
}

/// Deterministic splitmix64 generator, the default `RandomSource`.
#[derive(Debug, Clone)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        let mut z = self.state.wrapping_add(0x9E3779B97F4A7C15);
        self.state = z;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
        z ^ (z >> 31)
    }
}

impl RandomSource for SplitMix64 {
    fn next_f64(&mut self) -> f64 {
        // 53 high bits give a uniform double in [0, 1).
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splitmix_is_deterministic() {
        let mut a = SplitMix64::new(42);
        let mut b = SplitMix64::new(42);
        for _ in 0..100 {
            assert_eq!(a.next_f64(), b.next_f64());
        }
    }

    #[test]
    fn splitmix_stays_in_unit_interval() {
        let mut rng = SplitMix64::new(7);
        for _ in 0..1000 {
            let value = rng.next_f64();
            assert!((0.0..1.0).contains(&value), "out of range: {}", value);
        }
    }
}
