//! Vehicle table: the static charging requests of the fleet.

use std::fs::File;
use std::io::Read;
use std::ops::RangeInclusive;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Error, Result};

/// One charging request.
///
/// The vehicle draws `power` for `duration` consecutive slots, and the whole
/// interval must fit inside `[window_start, window_end]`.
///
/// CSV and TOML input also accept the French column names
/// (`debut`, `fin`, `puissance`, `cycle`) as aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Vehicle {
    /// First slot at which charging may start.
    #[serde(alias = "debut")]
    pub window_start: usize,
    /// Last slot at which the vehicle may still be charging (inclusive).
    #[serde(alias = "fin")]
    pub window_end: usize,
    /// Power drawn while charging.
    #[serde(alias = "puissance")]
    pub power: u32,
    /// Number of consecutive charging slots.
    #[serde(alias = "cycle")]
    pub duration: usize,
}

impl Vehicle {
    /// Creates a new charging request.
    ///
    /// # Panics
    ///
    /// Panics if `power` or `duration` is zero, or if the window is too short
    /// to hold `duration` slots.
    pub fn new(window_start: usize, window_end: usize, power: u32, duration: usize) -> Self {
        assert!(power > 0, "power must be > 0");
        assert!(duration > 0, "duration must be > 0");
        assert!(window_end >= window_start, "window_end must be >= window_start");
        assert!(
            window_end - window_start + 1 >= duration,
            "window must hold at least `duration` slots"
        );
        Self {
            window_start,
            window_end,
            power,
            duration,
        }
    }

    /// Latest start that keeps the charging interval inside the window.
    pub fn latest_start(&self) -> usize {
        (self.window_end + 1).saturating_sub(self.duration)
    }

    /// Every admissible start slot, in ascending order.
    pub fn feasible_starts(&self) -> RangeInclusive<usize> {
        self.window_start..=self.latest_start()
    }

    /// Last slot occupied when charging starts at `start`.
    pub fn end_slot(&self, start: usize) -> usize {
        start + self.duration - 1
    }

    /// Returns `true` when charging from `start` covers slot `h`.
    pub fn occupies(&self, start: usize, h: usize) -> bool {
        start <= h && h <= self.end_slot(start)
    }

    fn validate(&self, index: usize, horizon: usize, errors: &mut Vec<ConfigError>) {
        let field = |name: &str| format!("fleet[{index}].{name}");

        if self.power == 0 {
            errors.push(ConfigError::new(field("power"), "must be > 0"));
        }
        if self.duration == 0 {
            errors.push(ConfigError::new(field("duration"), "must be > 0"));
        }
        if self.window_end < self.window_start {
            errors.push(ConfigError::new(
                field("window_end"),
                format!("must be >= window_start ({})", self.window_start),
            ));
        } else if self.window_end - self.window_start + 1 < self.duration {
            errors.push(ConfigError::new(
                field("duration"),
                format!(
                    "window [{}, {}] is too short for {} slots",
                    self.window_start, self.window_end, self.duration
                ),
            ));
        }
        if self.window_end > horizon {
            errors.push(ConfigError::new(
                field("window_end"),
                format!("must be <= market.horizon ({horizon})"),
            ));
        }
    }
}

/// The ordered vehicle table. Vehicle indices are positions in this table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Fleet {
    vehicles: Vec<Vehicle>,
}

impl Fleet {
    pub fn new(vehicles: Vec<Vehicle>) -> Self {
        Self { vehicles }
    }

    /// Reads a fleet from a CSV file with a header row.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or a row does not parse.
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| Error::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_csv_reader(file)
    }

    /// Reads a fleet from any CSV source with a header row.
    ///
    /// # Errors
    ///
    /// Returns an error if a row is malformed or has unknown columns.
    pub fn from_csv_reader(reader: impl Read) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let vehicles = rdr
            .deserialize::<Vehicle>()
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { vehicles })
    }

    /// Checks every record against the horizon and returns all violations.
    ///
    /// Returns an empty vector if the fleet is valid.
    pub fn validate(&self, horizon: usize) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.vehicles.is_empty() {
            errors.push(ConfigError::new("fleet", "must contain at least one vehicle"));
        }
        for (i, v) in self.vehicles.iter().enumerate() {
            v.validate(i, horizon, &mut errors);
        }
        errors
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    /// Returns the vehicle at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn vehicle(&self, index: usize) -> &Vehicle {
        &self.vehicles[index]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Vehicle> {
        self.vehicles.iter()
    }

    /// Largest `window_end` in the fleet, or `0` for an empty fleet.
    pub fn last_slot(&self) -> usize {
        self.vehicles.iter().map(|v| v.window_end).max().unwrap_or(0)
    }
}

impl<'a> IntoIterator for &'a Fleet {
    type Item = &'a Vehicle;
    type IntoIter = std::slice::Iter<'a, Vehicle>;

    fn into_iter(self) -> Self::IntoIter {
        self.vehicles.iter()
    }
}
