//! Seeded synthetic fleets for presets, benchmarks and tests.

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::Deserialize;

use crate::error::ConfigError;
use crate::fleet::{Fleet, Vehicle};

/// Parameters of a random fleet.
///
/// Each vehicle samples a charging duration, then a window that holds the
/// duration plus up to `slack_max` spare slots, then an arrival slot that keeps
/// the window inside `[0, horizon]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Number of vehicles to generate.
    pub vehicles: usize,
    /// Random seed.
    pub seed: u64,
    /// Minimum charging power.
    pub power_min: u32,
    /// Maximum charging power.
    pub power_max: u32,
    /// Minimum charging duration (slots).
    pub duration_min: usize,
    /// Maximum charging duration (slots).
    pub duration_max: usize,
    /// Maximum number of spare slots in a window beyond the duration.
    pub slack_max: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            vehicles: 8,
            seed: 42,
            power_min: 3,
            power_max: 7,
            duration_min: 1,
            duration_max: 4,
            slack_max: 8,
        }
    }
}

impl GeneratorConfig {
    /// Checks ranges against the horizon and returns all violations.
    pub fn validate(&self, horizon: usize) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.vehicles == 0 {
            errors.push(ConfigError::new("fleet.generator.vehicles", "must be > 0"));
        }
        if self.power_min == 0 {
            errors.push(ConfigError::new("fleet.generator.power_min", "must be > 0"));
        }
        if self.power_min > self.power_max {
            errors.push(ConfigError::new(
                "fleet.generator.power_min",
                "must be <= fleet.generator.power_max",
            ));
        }
        if self.duration_min == 0 {
            errors.push(ConfigError::new("fleet.generator.duration_min", "must be > 0"));
        }
        if self.duration_min > self.duration_max {
            errors.push(ConfigError::new(
                "fleet.generator.duration_min",
                "must be <= fleet.generator.duration_max",
            ));
        }
        if self.duration_min > horizon + 1 {
            errors.push(ConfigError::new(
                "fleet.generator.duration_min",
                format!("must fit in the horizon ({} slots)", horizon + 1),
            ));
        }
        errors
    }

    /// Samples a fleet whose windows all end at or before `horizon`.
    ///
    /// Durations above the horizon length are clipped to it. Call
    /// [`GeneratorConfig::validate`] first; invalid ranges panic.
    pub fn generate(&self, horizon: usize) -> Fleet {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let slots = horizon + 1;

        let vehicles = (0..self.vehicles)
            .map(|_| {
                let duration_max = self.duration_max.min(slots);
                let duration_min = self.duration_min.min(duration_max);
                let duration = rng.random_range(duration_min..=duration_max);

                let slack = rng.random_range(0..=self.slack_max.min(slots - duration));
                let width = duration + slack;
                let window_start = rng.random_range(0..=slots - width);
                let power = rng.random_range(self.power_min..=self.power_max);

                Vehicle::new(window_start, window_start + width - 1, power, duration)
            })
            .collect();

        Fleet::new(vehicles)
    }
}
