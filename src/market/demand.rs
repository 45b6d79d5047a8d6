//! Station demand per slot.
//!
//! [`demand`] and [`demand_partial`] are the reference definitions: a fresh
//! scan of the fleet on every call. [`LoadProfile`] keeps the same sums in a
//! per-slot array that is updated as single vehicles move, which is what the
//! solver uses in its inner loops.

use crate::fleet::{Fleet, Vehicle};

use super::types::{MarketConfig, PartialSchedule, Schedule};

/// Total power drawn at slot `h` by every vehicle of `schedule` occupying it.
pub fn demand(h: usize, schedule: &Schedule, fleet: &Fleet) -> u64 {
    fleet
        .iter()
        .zip(schedule.iter())
        .filter(|(v, start)| v.occupies(**start, h))
        .map(|(v, _)| u64::from(v.power))
        .sum()
}

/// Total power drawn at slot `h` by the vehicles assigned so far.
pub fn demand_partial(h: usize, partial: &PartialSchedule, fleet: &Fleet) -> u64 {
    partial
        .entries()
        .iter()
        .map(|a| (fleet.vehicle(a.vehicle), a.start))
        .filter(|(v, start)| v.occupies(*start, h))
        .map(|(v, _)| u64::from(v.power))
        .sum()
}

/// Per-slot station demand, maintained incrementally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadProfile {
    slots: Vec<u64>,
}

impl LoadProfile {
    /// Creates an all-zero profile covering `len` slots.
    pub fn new(len: usize) -> Self {
        Self {
            slots: vec![0; len],
        }
    }

    /// Creates an empty profile wide enough for the horizon and every window of `fleet`.
    pub fn for_fleet(fleet: &Fleet, config: &MarketConfig) -> Self {
        Self::new(config.slots().max(fleet.last_slot() + 1))
    }

    /// Builds the profile of a complete schedule.
    pub fn from_schedule(fleet: &Fleet, schedule: &Schedule, config: &MarketConfig) -> Self {
        let mut profile = Self::for_fleet(fleet, config);
        for (v, &start) in fleet.iter().zip(schedule.iter()) {
            profile.add(v, start);
        }
        profile
    }

    /// Adds the vehicle's power over its interval starting at `start`.
    pub fn add(&mut self, vehicle: &Vehicle, start: usize) {
        let end = vehicle.end_slot(start);
        if end >= self.slots.len() {
            self.slots.resize(end + 1, 0);
        }
        for d in &mut self.slots[start..=end] {
            *d += u64::from(vehicle.power);
        }
    }

    /// Removes the vehicle's power over its interval starting at `start`.
    pub fn remove(&mut self, vehicle: &Vehicle, start: usize) {
        let end = vehicle.end_slot(start).min(self.slots.len().saturating_sub(1));
        if start > end {
            return;
        }
        for d in &mut self.slots[start..=end] {
            *d = d.saturating_sub(u64::from(vehicle.power));
        }
    }

    /// Resets every slot to zero.
    pub fn reset(&mut self) {
        self.slots.fill(0);
    }

    /// Demand at slot `h`; zero beyond the covered range.
    pub fn at(&self, h: usize) -> u64 {
        self.slots.get(h).copied().unwrap_or(0)
    }

    /// Highest demand over all slots.
    pub fn peak(&self) -> u64 {
        self.slots.iter().copied().max().unwrap_or(0)
    }

    /// Returns `true` when no slot exceeds `p_max`.
    pub fn within_cap(&self, p_max: u64) -> bool {
        self.slots.iter().all(|&d| d <= p_max)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.slots
    }
}
