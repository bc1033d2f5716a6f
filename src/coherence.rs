//! City coherence refinement.
//!
//! Reduces the number of cities whose locations are split across zones by
//! swapping strays into their city's majority zone. A local greedy
//! heuristic: it improves monotonically but does not guarantee zero split
//! cities.
//!
//! The city index is an explicit value threaded through each pass (no
//! shared mutable bookkeeping); every swap updates it incrementally so it
//! always mirrors actual zone membership.

use std::collections::HashMap;

use tracing::debug;

use crate::centroid::mean_position;
use crate::haversine::distance_miles;
use crate::model::Location;

/// normalized city name -> zone index -> count of that city's locations.
pub type CityIndex = HashMap<String, HashMap<usize, usize>>;

/// Refinement stops after this many passes even if swaps keep landing.
/// A tunable constant, not a proven convergence bound.
pub const MAX_PASSES: usize = 3;

/// Zone size window the refiner must preserve.
#[derive(Debug, Clone, Copy)]
pub struct ZoneBounds {
    pub min: usize,
    pub max: usize,
}

impl ZoneBounds {
    /// `[floor(n/k) - 1, ceil(n/k)]` for `n` locations over `k` zones.
    pub fn for_run(n: usize, k: usize) -> Self {
        Self {
            min: (n / k).saturating_sub(1),
            max: n.div_ceil(k),
        }
    }

    fn allows(&self, size: usize) -> bool {
        size >= self.min && size <= self.max
    }
}

/// Builds the city index from scratch for the given zone membership.
pub fn build_city_index(zones: &[Vec<Location>]) -> CityIndex {
    let mut index = CityIndex::new();
    for (zi, zone) in zones.iter().enumerate() {
        for location in zone {
            if let Some(city) = location.normalized_city() {
                *index.entry(city).or_default().entry(zi).or_insert(0) += 1;
            }
        }
    }
    index
}

/// Number of cities present in more than one zone.
pub fn count_split_cities(index: &CityIndex) -> usize {
    index
        .values()
        .filter(|zones| zones.values().filter(|count| **count > 0).count() > 1)
        .count()
}

/// Runs up to [`MAX_PASSES`] refinement passes, stopping early once a pass
/// makes no swaps.
pub fn refine_city_coherence(
    mut zones: Vec<Vec<Location>>,
    mut index: CityIndex,
    bounds: ZoneBounds,
) -> (Vec<Vec<Location>>, CityIndex) {
    for pass in 0..MAX_PASSES {
        let (next_zones, next_index, swaps) = refine_pass(zones, index, bounds);
        zones = next_zones;
        index = next_index;
        debug!(pass, swaps, "city coherence pass");
        if swaps == 0 {
            break;
        }
    }
    (zones, index)
}

/// One sweep over every zone member, swapping strays toward their city's
/// majority zone. Returns the updated membership, the updated index, and
/// the number of swaps performed.
pub fn refine_pass(
    mut zones: Vec<Vec<Location>>,
    mut index: CityIndex,
    bounds: ZoneBounds,
) -> (Vec<Vec<Location>>, CityIndex, usize) {
    // Centroids are fixed for the duration of the pass; swaps are 1-for-1
    // so sizes never drift mid-pass.
    let centroids: Vec<Option<(f64, f64)>> = zones
        .iter()
        .map(|zone| {
            if zone.is_empty() {
                None
            } else {
                let points: Vec<(f64, f64)> = zone.iter().map(Location::coords).collect();
                Some(mean_position(&points))
            }
        })
        .collect();

    let mut swaps = 0;
    for z in 0..zones.len() {
        let mut li = 0;
        while li < zones[z].len() {
            let Some(city) = zones[z][li].normalized_city() else {
                li += 1;
                continue;
            };
            let Some(majority) = majority_zone(&index, &city) else {
                li += 1;
                continue;
            };
            if majority == z {
                li += 1;
                continue;
            }

            let Some(home_centroid) = centroids[z] else {
                li += 1;
                continue;
            };
            let Some(candidate) = best_swap_candidate(&zones[majority], &index, majority, home_centroid)
            else {
                li += 1;
                continue;
            };

            if !bounds.allows(zones[z].len()) || !bounds.allows(zones[majority].len()) {
                li += 1;
                continue;
            }

            swap_members(&mut zones, &mut index, z, li, majority, candidate);
            swaps += 1;
            li += 1;
        }
    }

    (zones, index, swaps)
}

/// Zone holding a strict majority (>50%) of the city's locations.
fn majority_zone(index: &CityIndex, city: &str) -> Option<usize> {
    let counts = index.get(city)?;
    let total: usize = counts.values().sum();
    counts
        .iter()
        .find(|(_, count)| **count * 2 > total)
        .map(|(zone, _)| *zone)
}

/// Best swap-back candidate inside the majority zone: a member that is not
/// itself part of its own city's majority there, closest to the source
/// zone's centroid.
fn best_swap_candidate(
    zone: &[Location],
    index: &CityIndex,
    zone_idx: usize,
    target_centroid: (f64, f64),
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (p, location) in zone.iter().enumerate() {
        let anchored = location
            .normalized_city()
            .and_then(|city| majority_zone(index, &city))
            .is_some_and(|m| m == zone_idx);
        if anchored {
            continue;
        }
        let dist = distance_miles(location.coords(), target_centroid);
        if best.is_none_or(|(_, d)| dist < d) {
            best = Some((p, dist));
        }
    }
    best.map(|(p, _)| p)
}

fn swap_members(
    zones: &mut [Vec<Location>],
    index: &mut CityIndex,
    z: usize,
    li: usize,
    m: usize,
    p: usize,
) {
    let outgoing = zones[z][li].clone();
    let incoming = zones[m][p].clone();
    zones[z][li] = incoming.clone();
    zones[m][p] = outgoing.clone();

    if let Some(city) = outgoing.normalized_city() {
        record_move(index, &city, z, m);
    }
    if let Some(city) = incoming.normalized_city() {
        record_move(index, &city, m, z);
    }
}

fn record_move(index: &mut CityIndex, city: &str, from: usize, to: usize) {
    if let Some(counts) = index.get_mut(city) {
        if let Some(count) = counts.get_mut(&from) {
            *count -= 1;
            if *count == 0 {
                counts.remove(&from);
            }
        }
        *counts.entry(to).or_insert(0) += 1;
    }
}
