//! Route refinement per daily batch.
//!
//! Requests a travel-time matrix from the injected provider, seeds a tour
//! with nearest-neighbor from matrix index 0, and improves it with 2-opt.
//! Candidate tours are recosted in full, so asymmetric matrices stay
//! correct under segment reversal.

use tracing::debug;

use crate::model::Location;
use crate::traits::{ProviderError, TravelTimeProvider};

/// Improvements below this many seconds are ignored to avoid thrashing on
/// float noise in provider data.
const IMPROVEMENT_TOLERANCE_SECONDS: i64 = 1;

/// Assumed average urban speed for deriving distance from time. A stated
/// approximation, not a measured calibration.
pub const AVERAGE_SPEED_MPH: f64 = 25.0;

/// Total drive estimate for one refined daily tour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TourEstimate {
    pub total_seconds: i64,
}

impl TourEstimate {
    pub fn drive_minutes(&self) -> f64 {
        self.total_seconds as f64 / 60.0
    }

    /// Derived from time at [`AVERAGE_SPEED_MPH`]; an estimate, not an
    /// independently measured quantity.
    pub fn distance_miles(&self) -> f64 {
        self.total_seconds as f64 / 3600.0 * AVERAGE_SPEED_MPH
    }
}

/// Reorders a daily batch to approximately minimize total travel time.
///
/// Batches of two or fewer come back unchanged with no estimate and no
/// provider call. A provider failure is returned to the caller, which
/// keeps the proximity order for this batch only.
pub fn refine_route(
    batch: &[Location],
    provider: &dyn TravelTimeProvider,
) -> Result<(Vec<Location>, Option<TourEstimate>), ProviderError> {
    if batch.len() <= 2 {
        return Ok((batch.to_vec(), None));
    }

    let coords: Vec<(f64, f64)> = batch.iter().map(Location::coords).collect();
    let matrix = provider.travel_matrix(&coords)?;
    validate_matrix(&matrix, batch.len())?;

    let initial = nearest_neighbor_tour(&matrix);
    let initial_seconds = tour_seconds(&initial, &matrix);
    let (order, total_seconds) = two_opt(initial, &matrix);
    debug!(
        stops = batch.len(),
        initial_seconds,
        refined_seconds = total_seconds,
        "refined daily tour"
    );

    let refined = order.iter().map(|&i| batch[i].clone()).collect();
    Ok((refined, Some(TourEstimate { total_seconds })))
}

fn validate_matrix(matrix: &[Vec<i32>], n: usize) -> Result<(), ProviderError> {
    if matrix.len() != n || matrix.iter().any(|row| row.len() != n) {
        return Err(ProviderError::Malformed(format!(
            "expected {n}x{n} matrix, got {} rows",
            matrix.len()
        )));
    }
    Ok(())
}

/// Initial tour: nearest unvisited neighbor, always starting from index 0.
pub fn nearest_neighbor_tour(matrix: &[Vec<i32>]) -> Vec<usize> {
    let n = matrix.len();
    let mut order = Vec::with_capacity(n);
    let mut visited = vec![false; n];
    let mut current = 0;
    order.push(current);
    visited[current] = true;

    for _ in 1..n {
        let mut best: Option<(usize, i32)> = None;
        for (next, seen) in visited.iter().enumerate() {
            if *seen {
                continue;
            }
            let cost = matrix[current][next];
            if best.is_none_or(|(_, c)| cost < c) {
                best = Some((next, cost));
            }
        }
        // n > order.len() guarantees an unvisited node exists.
        let (next, _) = best.unwrap_or((current, 0));
        order.push(next);
        visited[next] = true;
        current = next;
    }

    order
}

/// Total time of an open tour over the matrix.
pub fn tour_seconds(order: &[usize], matrix: &[Vec<i32>]) -> i64 {
    order
        .windows(2)
        .map(|pair| matrix[pair[0]][pair[1]] as i64)
        .sum()
}

/// 2-opt improvement: repeatedly scan all non-adjacent edge pairs and
/// reverse the segment between them whenever that shortens the tour by
/// more than the tolerance; stops when a full scan yields no improvement.
pub fn two_opt(mut order: Vec<usize>, matrix: &[Vec<i32>]) -> (Vec<usize>, i64) {
    let n = order.len();
    let mut best = tour_seconds(&order, matrix);
    if n < 4 {
        return (order, best);
    }

    loop {
        let mut improved = false;
        for i in 0..n - 3 {
            for j in i + 2..n - 1 {
                let mut candidate = order.clone();
                candidate[i + 1..=j].reverse();
                let cost = tour_seconds(&candidate, matrix);
                if best - cost > IMPROVEMENT_TOLERANCE_SECONDS {
                    order = candidate;
                    best = cost;
                    improved = true;
                }
            }
        }
        if !improved {
            break;
        }
    }

    (order, best)
}
