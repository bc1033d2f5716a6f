//! Pipeline orchestration and aggregation.
//!
//! The single entry point is [`optimize`]: validation, geocode filtering,
//! centroid finding, balanced assignment, city coherence refinement,
//! outlier resolution, daily scheduling, per-batch route refinement, and
//! finally assignee grouping with summary statistics.
//!
//! Only this stage surfaces fatal errors; every earlier stage succeeds
//! with best-effort output, and provider failures degrade single batches.

use std::fmt;

use tracing::{debug, warn};

use crate::assign::{assign_balanced, zone_capacity};
use crate::centroid::{find_centroids, mean_position};
use crate::coherence::{build_city_index, count_split_cities, refine_city_coherence, ZoneBounds};
use crate::input::{geocoded_locations, ConfigError, LocationRecord, PlannerConfig};
use crate::model::{
    Algorithm, AssigneeGroup, DailyAssignment, Location, PlanStats, ScheduledStop, TerritoryPlan,
    Zone,
};
use crate::outliers::resolve_outliers;
use crate::route::refine_route;
use crate::schedule::{build_daily_assignments, proximity_order};
use crate::traits::{RandomSource, TravelTimeProvider};

/// Fatal input-contract violation, raised before any computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    /// No location survived geocode filtering: the caller's data needs
    /// fixing, not the run.
    NoGeocodedLocations,
    InvalidConfig(ConfigError),
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanError::NoGeocodedLocations => {
                f.write_str("no locations with valid coordinates to optimize")
            }
            PlanError::InvalidConfig(err) => write!(f, "invalid configuration: {}", err),
        }
    }
}

impl std::error::Error for PlanError {}

impl From<ConfigError> for PlanError {
    fn from(err: ConfigError) -> Self {
        PlanError::InvalidConfig(err)
    }
}

/// Runs the full territory optimization pipeline.
///
/// `provider` is optional: without one (or when it fails for a batch) the
/// plan falls back to proximity ordering with unset drive estimates, and
/// the stats record which variant ran.
pub fn optimize(
    records: &[LocationRecord],
    config: &PlannerConfig,
    provider: Option<&dyn TravelTimeProvider>,
    rng: &mut dyn RandomSource,
) -> Result<TerritoryPlan, PlanError> {
    config.validate()?;

    let locations = geocoded_locations(records);
    if locations.is_empty() {
        return Err(PlanError::NoGeocodedLocations);
    }

    let n = locations.len();
    let k = config.num_zones;
    let cap = zone_capacity(n, k);
    debug!(total = records.len(), geocoded = n, zones = k, "starting optimization run");

    let points: Vec<(f64, f64)> = locations.iter().map(Location::coords).collect();
    let seed_centroids = find_centroids(&points, k, rng);

    let members = assign_balanced(&locations, &seed_centroids);

    let index = build_city_index(&members);
    let split_cities_before = count_split_cities(&index);

    let bounds = ZoneBounds::for_run(n, k);
    let (mut members, _) = refine_city_coherence(members, index, bounds);

    let moves = resolve_outliers(&mut members, cap);
    debug!(outlier_moves = moves, "zone membership settled");

    let split_cities_after = count_split_cities(&build_city_index(&members));

    let mut zones = Vec::with_capacity(k);
    let mut any_estimate = false;
    for (zi, zone_locations) in members.into_iter().enumerate() {
        let centroid = if zone_locations.is_empty() {
            seed_centroids[zi]
        } else {
            let zone_points: Vec<(f64, f64)> =
                zone_locations.iter().map(Location::coords).collect();
            mean_position(&zone_points)
        };

        let ordered = proximity_order(&zone_locations);
        let mut days = build_daily_assignments(&ordered, config.locations_per_day);

        // Provider calls are sequential, one daily batch at a time.
        if let Some(provider) = provider {
            for day in &mut days {
                if refine_day(day, provider) {
                    any_estimate = true;
                }
            }
        }

        zones.push(Zone {
            number: zi + 1,
            name: format!("Zone {}", zi + 1),
            centroid,
            locations: zone_locations,
            days,
        });
    }

    let algorithm = if any_estimate {
        Algorithm::TravelTime
    } else {
        Algorithm::ProximityFallback
    };

    let groups = partition_into_groups(&zones, config.num_groups);

    let estimates: Vec<f64> = zones
        .iter()
        .flat_map(|z| &z.days)
        .filter_map(|d| d.drive_minutes)
        .collect();
    let avg_daily_drive_minutes = if estimates.is_empty() {
        None
    } else {
        Some(estimates.iter().sum::<f64>() / estimates.len() as f64)
    };

    let stats = PlanStats {
        total_locations: records.len(),
        geocoded_locations: n,
        zones_created: zones.len(),
        split_cities_before,
        split_cities_after,
        avg_daily_drive_minutes,
        algorithm,
    };

    Ok(TerritoryPlan { zones, groups, stats })
}

/// Refines one daily batch in place; returns whether an estimate landed.
/// A provider failure keeps the proximity order for this batch only.
fn refine_day(day: &mut DailyAssignment, provider: &dyn TravelTimeProvider) -> bool {
    let batch: Vec<Location> = day.stops.iter().map(|s| s.location.clone()).collect();
    match refine_route(&batch, provider) {
        Ok((ordered, Some(estimate))) => {
            day.stops = ordered
                .into_iter()
                .enumerate()
                .map(|(i, location)| ScheduledStop {
                    location,
                    sequence: i + 1,
                })
                .collect();
            day.drive_minutes = Some(estimate.drive_minutes());
            day.distance_miles = Some(estimate.distance_miles());
            true
        }
        Ok((_, None)) => false,
        Err(err) => {
            warn!(
                week = day.week,
                day = day.day_of_week,
                error = %err,
                "travel-time provider failed; keeping proximity order for this batch"
            );
            false
        }
    }
}

/// Partitions the ordered zone list evenly (by zone count) across the
/// requested number of assignees, merging each group's schedule
/// chronologically.
fn partition_into_groups(zones: &[Zone], num_groups: usize) -> Vec<AssigneeGroup> {
    let k = zones.len();
    let base = k / num_groups;
    let remainder = k % num_groups;

    let mut groups = Vec::with_capacity(num_groups);
    let mut cursor = 0;
    for g in 0..num_groups {
        let take = base + usize::from(g < remainder);
        let slice = &zones[cursor..cursor + take];
        cursor += take;

        let mut schedule: Vec<DailyAssignment> =
            slice.iter().flat_map(|z| z.days.iter().cloned()).collect();
        schedule.sort_by_key(|d| (d.week, d.day_of_week));

        groups.push(AssigneeGroup {
            name: format!("FRM {}", g + 1),
            zone_names: slice.iter().map(|z| z.name.clone()).collect(),
            total_locations: slice.iter().map(|z| z.locations.len()).sum(),
            schedule,
        });
    }

    groups
}
