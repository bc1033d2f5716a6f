//! Inbound location records and run configuration.
//!
//! The surrounding application hands over raw records; coordinates may
//! arrive as JSON numbers or strings depending on how they were captured.
//! Records without parseable coordinates never enter the pipeline.

use std::fmt;

use serde::Deserialize;

use crate::model::Location;

/// A latitude or longitude as captured upstream.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Coordinate {
    Number(f64),
    Text(String),
}

impl Coordinate {
    /// Parses to degrees; `None` for non-numeric text or non-finite values.
    pub fn parse(&self) -> Option<f64> {
        let value = match self {
            Coordinate::Number(n) => *n,
            Coordinate::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

/// Raw location record as supplied by the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct LocationRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub latitude: Option<Coordinate>,
    #[serde(default)]
    pub longitude: Option<Coordinate>,
}

impl LocationRecord {
    fn geocoded(&self) -> Option<Location> {
        let latitude = self.latitude.as_ref()?.parse()?;
        let longitude = self.longitude.as_ref()?.parse()?;
        Some(Location {
            id: self.id.clone(),
            name: self.name.clone(),
            street: self.street.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            postal_code: self.postal_code.clone(),
            latitude,
            longitude,
        })
    }
}

/// Filters records down to the geocoded set that participates in planning.
pub fn geocoded_locations(records: &[LocationRecord]) -> Vec<Location> {
    records.iter().filter_map(LocationRecord::geocoded).collect()
}

/// Run configuration with the application defaults.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Target daily visit batch size.
    pub locations_per_day: usize,
    /// Target zone count K.
    pub num_zones: usize,
    /// Number of assignees to partition zones across.
    pub num_groups: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            locations_per_day: 17,
            num_zones: 11,
            num_groups: 1,
        }
    }
}

impl PlannerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.locations_per_day == 0 {
            return Err(ConfigError::new("locations_per_day must be positive"));
        }
        if self.num_zones == 0 {
            return Err(ConfigError::new("num_zones must be positive"));
        }
        if self.num_groups == 0 {
            return Err(ConfigError::new("num_groups must be positive"));
        }
        Ok(())
    }
}

/// A non-positive configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub message: &'static str,
}

impl ConfigError {
    fn new(message: &'static str) -> Self {
        Self { message }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message)
    }
}

impl std::error::Error for ConfigError {}
