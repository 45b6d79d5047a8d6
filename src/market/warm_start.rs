//! Sequential greedy warm start.
//!
//! Vehicles are placed one at a time in index order. Vehicle `i` picks its
//! cheapest start seeing only vehicles `0..i`, which are already fixed; the
//! vehicles after it do not exist yet for that decision.

use tracing::debug;

use crate::fleet::Fleet;

use super::cost::{candidate_cost, cheapest_start};
use super::demand::LoadProfile;
use super::types::{MarketConfig, PartialSchedule, Schedule};

/// Builds the initial schedule from prefix-only best responses.
///
/// Deterministic for a given fleet order. The result is a starting point for
/// the equilibrium iterator, with no optimality claim.
pub fn warm_start(fleet: &Fleet, config: &MarketConfig) -> Schedule {
    let mut partial = PartialSchedule::with_capacity(fleet.len());
    let mut placed = LoadProfile::for_fleet(fleet, config);

    for (i, vehicle) in fleet.iter().enumerate() {
        let pick = cheapest_start(vehicle, |t| candidate_cost(&placed, vehicle, t, config));
        debug!(vehicle = i, start = pick.start, cost = %pick.cost, "warm start placement");

        partial.assign(i, pick.start);
        placed.add(vehicle, pick.start);
    }

    // every vehicle 0..n was assigned above
    partial
        .into_schedule(fleet.len())
        .unwrap_or_else(|| Schedule::new(Vec::new()))
}
