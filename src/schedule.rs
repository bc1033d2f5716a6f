//! Daily scheduling: proximity ordering and fixed-size visit batches.
//!
//! The nearest-neighbor walk is a cheap seed for the route refiner, not
//! the final route. Batches cycle Monday through Friday, bumping the week
//! number after every fifth day; the last batch of a zone may be short.

use crate::haversine::distance_miles;
use crate::model::{DailyAssignment, Location, ScheduledStop};

/// Working days per week for batch cycling.
const DAYS_PER_WEEK: usize = 5;

/// Orders a zone's locations by a nearest-neighbor walk, starting from the
/// southwest-most location (smallest lat + lng sum).
pub fn proximity_order(locations: &[Location]) -> Vec<Location> {
    if locations.len() <= 1 {
        return locations.to_vec();
    }

    let start = locations
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            (a.latitude + a.longitude).total_cmp(&(b.latitude + b.longitude))
        })
        .map(|(i, _)| i)
        .unwrap_or(0);

    let mut remaining: Vec<&Location> = locations.iter().collect();
    let mut ordered = Vec::with_capacity(locations.len());
    ordered.push(remaining.swap_remove(start).clone());

    while !remaining.is_empty() {
        let here = ordered.last().map(Location::coords).unwrap_or_default();
        let next = remaining
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                distance_miles(here, a.coords()).total_cmp(&distance_miles(here, b.coords()))
            })
            .map(|(i, _)| i)
            .unwrap_or(0);
        ordered.push(remaining.swap_remove(next).clone());
    }

    ordered
}

/// Slices an ordered location list into daily batches of `per_day` visits.
///
/// Stops carry a contiguous 1-based sequence; drive estimates start out
/// unset and are filled in by the route refiner when a provider is
/// available.
pub fn build_daily_assignments(ordered: &[Location], per_day: usize) -> Vec<DailyAssignment> {
    ordered
        .chunks(per_day)
        .enumerate()
        .map(|(chunk_idx, chunk)| DailyAssignment {
            week: (chunk_idx / DAYS_PER_WEEK) as u32 + 1,
            day_of_week: (chunk_idx % DAYS_PER_WEEK) as u8 + 1,
            stops: chunk
                .iter()
                .enumerate()
                .map(|(i, location)| ScheduledStop {
                    location: location.clone(),
                    sequence: i + 1,
                })
                .collect(),
            drive_minutes: None,
            distance_miles: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(id: &str, lat: f64, lng: f64) -> Location {
        Location {
            id: id.to_string(),
            name: format!("Site {}", id),
            street: None,
            city: None,
            state: None,
            postal_code: None,
            latitude: lat,
            longitude: lng,
        }
    }

    fn line(n: usize) -> Vec<Location> {
        (0..n)
            .map(|i| location(&format!("L{}", i), 36.0 + i as f64 * 0.01, -115.0))
            .collect()
    }

    #[test]
    fn walk_starts_southwest_and_follows_the_line() {
        let mut shuffled = line(10);
        shuffled.reverse();
        shuffled.swap(2, 7);

        let ordered = proximity_order(&shuffled);
        let ids: Vec<&str> = ordered.iter().map(|l| l.id.as_str()).collect();
        let expected: Vec<String> = (0..10).map(|i| format!("L{}", i)).collect();
        assert_eq!(ids, expected.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn batches_cover_every_location_once() {
        let ordered = line(40);
        let days = build_daily_assignments(&ordered, 17);
        assert_eq!(days.len(), 3);
        assert_eq!(days.iter().map(|d| d.stops.len()).sum::<usize>(), 40);
        assert_eq!(days[2].stops.len(), 6, "final batch may be short");
    }

    #[test]
    fn sequences_are_contiguous_one_based() {
        let ordered = line(20);
        for day in build_daily_assignments(&ordered, 17) {
            let sequences: Vec<usize> = day.stops.iter().map(|s| s.sequence).collect();
            let expected: Vec<usize> = (1..=day.stops.len()).collect();
            assert_eq!(sequences, expected);
        }
    }

    #[test]
    fn day_and_week_cycle_monday_to_friday() {
        let ordered = line(70);
        let days = build_daily_assignments(&ordered, 10);
        let tags: Vec<(u32, u8)> = days.iter().map(|d| (d.week, d.day_of_week)).collect();
        assert_eq!(
            tags,
            vec![(1, 1), (1, 2), (1, 3), (1, 4), (1, 5), (2, 1), (2, 2)]
        );
    }

    #[test]
    fn estimates_start_unset() {
        let days = build_daily_assignments(&line(5), 17);
        assert!(days[0].drive_minutes.is_none());
        assert!(days[0].distance_miles.is_none());
    }
}
