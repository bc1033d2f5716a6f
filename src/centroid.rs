//! Centroid finder: distance-weighted seeding plus iterative refinement.
//!
//! Seeds are spread apart by picking each subsequent centroid with
//! probability proportional to its squared great-circle distance to the
//! nearest already-chosen centroid, then refined with mean-position
//! iterations until movement settles.

use crate::haversine::distance_miles;
use crate::traits::RandomSource;

/// Refinement stops once no centroid moves more than this many miles.
const CONVERGENCE_MILES: f64 = 0.01;

/// Upper bound on refinement iterations.
const MAX_ITERATIONS: usize = 50;

/// Returns `k` (lat, lng) centroids for the given points.
///
/// With fewer than `k` unique points, duplicate centroids may occur;
/// downstream balanced assignment still yields a valid partition since it
/// operates on distances, not centroid identity.
pub fn find_centroids(
    points: &[(f64, f64)],
    k: usize,
    rng: &mut dyn RandomSource,
) -> Vec<(f64, f64)> {
    if k == 0 || points.is_empty() {
        return Vec::new();
    }

    let mut centroids = seed_centroids(points, k, rng);

    for _ in 0..MAX_ITERATIONS {
        let assignments: Vec<usize> = points
            .iter()
            .map(|p| nearest_centroid(*p, &centroids))
            .collect();

        let mut max_movement = 0.0_f64;
        for (c, centroid) in centroids.iter_mut().enumerate() {
            let members: Vec<(f64, f64)> = points
                .iter()
                .zip(&assignments)
                .filter(|(_, a)| **a == c)
                .map(|(p, _)| *p)
                .collect();
            // Empty clusters keep their prior position.
            if members.is_empty() {
                continue;
            }
            let updated = mean_position(&members);
            max_movement = max_movement.max(distance_miles(*centroid, updated));
            *centroid = updated;
        }

        if max_movement < CONVERGENCE_MILES {
            break;
        }
    }

    centroids
}

fn seed_centroids(
    points: &[(f64, f64)],
    k: usize,
    rng: &mut dyn RandomSource,
) -> Vec<(f64, f64)> {
    let n = points.len();
    let first = ((rng.next_f64() * n as f64) as usize).min(n - 1);
    let mut centroids = vec![points[first]];

    while centroids.len() < k {
        let weights: Vec<f64> = points
            .iter()
            .map(|p| {
                let d = centroids
                    .iter()
                    .map(|c| distance_miles(*p, *c))
                    .fold(f64::INFINITY, f64::min);
                d * d
            })
            .collect();
        let total: f64 = weights.iter().sum();

        if total <= f64::EPSILON {
            // Every point already coincides with a centroid; duplicates
            // are the only option left.
            let pick = ((rng.next_f64() * n as f64) as usize).min(n - 1);
            centroids.push(points[pick]);
            continue;
        }

        let mut target = rng.next_f64() * total;
        let mut chosen = n - 1;
        for (i, w) in weights.iter().enumerate() {
            target -= w;
            if target <= 0.0 {
                chosen = i;
                break;
            }
        }
        centroids.push(points[chosen]);
    }

    centroids
}

/// Index of the centroid nearest to `point` (first wins on ties).
pub fn nearest_centroid(point: (f64, f64), centroids: &[(f64, f64)]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (i, c) in centroids.iter().enumerate() {
        let d = distance_miles(point, *c);
        if d < best_dist {
            best_dist = d;
            best = i;
        }
    }
    best
}

/// Arithmetic mean of a non-empty set of (lat, lng) points.
pub fn mean_position(points: &[(f64, f64)]) -> (f64, f64) {
    let n = points.len() as f64;
    let (lat_sum, lng_sum) = points
        .iter()
        .fold((0.0, 0.0), |(la, lo), p| (la + p.0, lo + p.1));
    (lat_sum / n, lng_sum / n)
}
