//! Balanced assignment of locations to centroids.
//!
//! Greedy approximation: every (location, centroid) distance pair is
//! sorted ascending and walked once, assigning a location only while it is
//! unassigned and the target zone is under capacity. Deterministic,
//! near-linear after the sort, and no zone ever exceeds the cap.

use crate::haversine::distance_miles;
use crate::model::Location;

/// Hard per-zone capacity for `n` locations over `k` zones.
pub fn zone_capacity(n: usize, k: usize) -> usize {
    n.div_ceil(k)
}

/// Assigns every location to exactly one zone under the capacity cap.
///
/// Returns `centroids.len()` member lists; zones beyond the location count
/// come back empty. When `n` is not evenly divisible by `k`, some zones
/// land at the cap and others smaller — later refinement stages move
/// members around but never rebalance wholesale.
pub fn assign_balanced(
    locations: &[Location],
    centroids: &[(f64, f64)],
) -> Vec<Vec<Location>> {
    let n = locations.len();
    let k = centroids.len();
    let mut zones: Vec<Vec<Location>> = vec![Vec::new(); k];
    if n == 0 || k == 0 {
        return zones;
    }

    let cap = zone_capacity(n, k);

    let mut pairs: Vec<(f64, usize, usize)> = Vec::with_capacity(n * k);
    for (li, location) in locations.iter().enumerate() {
        for (ci, centroid) in centroids.iter().enumerate() {
            pairs.push((distance_miles(location.coords(), *centroid), li, ci));
        }
    }
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut assigned = vec![false; n];
    let mut remaining = n;
    for (_, li, ci) in pairs {
        if remaining == 0 {
            break;
        }
        if assigned[li] || zones[ci].len() >= cap {
            continue;
        }
        assigned[li] = true;
        remaining -= 1;
        zones[ci].push(locations[li].clone());
    }

    zones
}
