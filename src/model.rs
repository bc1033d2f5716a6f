//! Output value objects for a planning run.
//!
//! Everything here is created fresh per run. Zone membership is mutated by
//! the refinement stages (2-4) while the pipeline runs; after that the plan
//! is a plain value handed back to the caller.

use serde::Serialize;

/// A geocoded service site.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub id: String,
    pub name: String,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn coords(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }

    /// City name normalized for coherence bookkeeping.
    pub fn normalized_city(&self) -> Option<String> {
        self.city.as_ref().map(|c| c.trim().to_lowercase()).filter(|c| !c.is_empty())
    }
}

/// One visit within a daily route, tagged with its 1-based position.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduledStop {
    pub location: Location,
    pub sequence: usize,
}

/// One zone's visits for one (week, day-of-week) pair.
///
/// `drive_minutes`/`distance_miles` are present only when the travel-time
/// provider produced a matrix for this batch; the distance is derived from
/// time at an assumed average speed, not independently measured.
#[derive(Debug, Clone, Serialize)]
pub struct DailyAssignment {
    /// 1-based week number.
    pub week: u32,
    /// 1 = Monday through 5 = Friday.
    pub day_of_week: u8,
    pub stops: Vec<ScheduledStop>,
    pub drive_minutes: Option<f64>,
    pub distance_miles: Option<f64>,
}

/// A geographic partition of locations assigned as a unit.
#[derive(Debug, Clone, Serialize)]
pub struct Zone {
    /// Sequential 1-based zone number.
    pub number: usize,
    pub name: String,
    /// Mean position of the zone's members (seed centroid if empty).
    pub centroid: (f64, f64),
    pub locations: Vec<Location>,
    pub days: Vec<DailyAssignment>,
}

/// A partition of zones handed to one assignee.
#[derive(Debug, Clone, Serialize)]
pub struct AssigneeGroup {
    pub name: String,
    pub zone_names: Vec<String>,
    pub total_locations: usize,
    /// All member zones' daily assignments, sorted by (week, day).
    pub schedule: Vec<DailyAssignment>,
}

/// Which routing variant produced the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Algorithm {
    /// At least one daily batch was ordered from a travel-time matrix.
    TravelTime,
    /// Proximity ordering only (no provider, or every batch failed).
    ProximityFallback,
}

impl Algorithm {
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::TravelTime => "travel-time-2opt",
            Algorithm::ProximityFallback => "proximity-fallback",
        }
    }
}

/// Summary statistics for a planning run.
#[derive(Debug, Clone, Serialize)]
pub struct PlanStats {
    pub total_locations: usize,
    pub geocoded_locations: usize,
    pub zones_created: usize,
    /// Cities split across more than one zone, measured right after
    /// balanced assignment.
    pub split_cities_before: usize,
    /// Same count measured from the final zone membership.
    pub split_cities_after: usize,
    /// Mean over all daily batches that carry a drive estimate.
    pub avg_daily_drive_minutes: Option<f64>,
    pub algorithm: Algorithm,
}

/// The complete result of one optimization run.
#[derive(Debug, Clone, Serialize)]
pub struct TerritoryPlan {
    pub zones: Vec<Zone>,
    pub groups: Vec<AssigneeGroup>,
    pub stats: PlanStats,
}
