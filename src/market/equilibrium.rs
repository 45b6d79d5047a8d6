//! Gauss-Seidel best-response iteration.
//!
//! One sweep visits the vehicles in index order and moves each one to its
//! cheapest start given the current slots of all the others. Vehicles before
//! `i` have already moved in this sweep when `i` is evaluated. Sweeping stops
//! when a full sweep leaves the schedule unchanged, or at the sweep limit.

use serde::Serialize;
use tracing::debug;

use crate::fleet::Fleet;

use super::cost::{candidate_cost, cheapest_start};
use super::demand::LoadProfile;
use super::types::{MarketConfig, Schedule};

/// Default number of sweeps after which iteration gives up.
pub const SWEEP_LIMIT: usize = 100;

/// State of the iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Another sweep is due.
    Running,
    /// The last sweep changed nothing: every vehicle is at its best response.
    Converged,
    /// The sweep limit was hit while the schedule was still moving.
    BoundReached,
}

impl Status {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Running)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Converged => "converged",
            Self::BoundReached => "bound reached",
        }
    }
}

/// Sweep counter and pre-sweep snapshot deciding when iteration stops.
#[derive(Debug, Clone)]
pub struct Convergence {
    previous: Option<Schedule>,
    sweeps: usize,
    limit: usize,
}

impl Convergence {
    pub fn new(limit: usize) -> Self {
        Self {
            previous: None,
            sweeps: 0,
            limit,
        }
    }

    /// Status of `current` against the snapshot taken before the last sweep.
    ///
    /// Equality wins over the limit: a sweep that changes nothing is
    /// convergence even when it was the last one allowed.
    pub fn status(&self, current: &Schedule) -> Status {
        if self.previous.as_ref() == Some(current) {
            Status::Converged
        } else if self.sweeps >= self.limit {
            Status::BoundReached
        } else {
            Status::Running
        }
    }

    /// Snapshots the schedule before a sweep mutates it.
    pub fn begin_sweep(&mut self, current: &Schedule) {
        self.previous = Some(current.clone());
    }

    pub fn end_sweep(&mut self) {
        self.sweeps += 1;
    }

    pub fn sweeps(&self) -> usize {
        self.sweeps
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

/// Final schedule of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Equilibrium {
    pub schedule: Schedule,
    /// Number of sweeps performed.
    pub sweeps: usize,
    pub status: Status,
}

/// Owns the working schedule and advances it sweep by sweep.
///
/// Station demand is kept in a [`LoadProfile`] updated on every move, so a
/// candidate costs `O(duration)` instead of a rescan of the fleet per slot.
#[derive(Debug, Clone)]
pub struct EquilibriumIterator {
    fleet: Fleet,
    config: MarketConfig,
    schedule: Schedule,
    load: LoadProfile,
    convergence: Convergence,
}

impl EquilibriumIterator {
    /// Creates an iterator starting from `initial`.
    ///
    /// # Panics
    ///
    /// Panics if `initial` does not hold exactly one start per vehicle.
    pub fn new(fleet: Fleet, config: MarketConfig, initial: Schedule, max_sweeps: usize) -> Self {
        assert_eq!(
            fleet.len(),
            initial.len(),
            "schedule must hold one start per vehicle"
        );
        let load = LoadProfile::from_schedule(&fleet, &initial, &config);
        Self {
            fleet,
            config,
            schedule: initial,
            load,
            convergence: Convergence::new(max_sweeps),
        }
    }

    pub fn status(&self) -> Status {
        self.convergence.status(&self.schedule)
    }

    /// Performs one full sweep and returns how many vehicles moved.
    ///
    /// Sweeps regardless of status; use [`EquilibriumIterator::step`] to
    /// respect termination.
    pub fn sweep(&mut self) -> usize {
        self.convergence.begin_sweep(&self.schedule);

        let mut moved = 0;
        for (i, vehicle) in self.fleet.iter().enumerate() {
            let current = self.schedule.start(i);
            self.load.remove(vehicle, current);

            let load = &self.load;
            let config = &self.config;
            let pick = cheapest_start(vehicle, |t| candidate_cost(load, vehicle, t, config));

            self.load.add(vehicle, pick.start);
            if pick.start != current {
                self.schedule.set(i, pick.start);
                moved += 1;
            }
        }

        self.convergence.end_sweep();
        debug!(sweep = self.convergence.sweeps(), moved, "sweep complete");
        moved
    }

    /// Sweeps once if iteration is still running, then returns the new status.
    pub fn step(&mut self) -> Status {
        if self.status() == Status::Running {
            self.sweep();
        }
        self.status()
    }

    /// Sweeps until convergence or the sweep limit.
    pub fn run(mut self) -> Equilibrium {
        while self.step() == Status::Running {}
        self.finish()
    }

    /// Stops iterating and returns the schedule as it stands.
    pub fn finish(self) -> Equilibrium {
        let status = self.status();
        Equilibrium {
            schedule: self.schedule,
            sweeps: self.convergence.sweeps(),
            status,
        }
    }

    /// Copy of the current state, leaving the iterator usable.
    pub fn snapshot(&self) -> Equilibrium {
        Equilibrium {
            schedule: self.schedule.clone(),
            sweeps: self.convergence.sweeps(),
            status: self.status(),
        }
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn load(&self) -> &LoadProfile {
        &self.load
    }

    pub fn sweeps(&self) -> usize {
        self.convergence.sweeps()
    }

    pub fn max_sweeps(&self) -> usize {
        self.convergence.limit()
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    pub fn config(&self) -> &MarketConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fleet::Vehicle;
    use crate::market::cost::{best_response, cost};
    use crate::market::demand::demand;
    use crate::market::types::Cost;
    use crate::market::warm_start::warm_start;

    fn cfg(p_max: u64) -> MarketConfig {
        MarketConfig::new(12, 1.0, p_max, 1.0, 1.0)
    }

    fn solve(fleet: &Fleet, config: &MarketConfig, limit: usize) -> Equilibrium {
        let initial = warm_start(fleet, config);
        EquilibriumIterator::new(fleet.clone(), config.clone(), initial, limit).run()
    }

    #[test]
    fn convergence_needs_a_snapshot() {
        let c = Convergence::new(SWEEP_LIMIT);
        assert_eq!(c.status(&Schedule::new(vec![0])), Status::Running);
    }

    #[test]
    fn convergence_detects_unchanged_sweep() {
        let mut c = Convergence::new(SWEEP_LIMIT);
        let x = Schedule::new(vec![1, 2]);
        c.begin_sweep(&x);
        c.end_sweep();
        assert_eq!(c.status(&x), Status::Converged);
        assert_eq!(c.status(&Schedule::new(vec![1, 3])), Status::Running);
    }

    #[test]
    fn oscillation_stops_at_the_sweep_limit() {
        // a schedule that flips on every sweep never settles
        let mut c = Convergence::new(SWEEP_LIMIT);
        let mut x = Schedule::new(vec![0, 1]);
        while c.status(&x) == Status::Running {
            c.begin_sweep(&x);
            x = Schedule::new(vec![x.start(1), x.start(0)]);
            c.end_sweep();
        }
        assert_eq!(c.sweeps(), 100);
        assert_eq!(c.status(&x), Status::BoundReached);
    }

    #[test]
    fn settling_on_the_last_allowed_sweep_is_convergence() {
        let mut c = Convergence::new(2);
        let x = Schedule::new(vec![0]);
        c.begin_sweep(&Schedule::new(vec![1]));
        c.end_sweep();
        c.begin_sweep(&x);
        c.end_sweep();
        assert_eq!(c.status(&x), Status::Converged);
    }

    #[test]
    fn single_vehicle_converges_at_earliest_start() {
        let fleet = Fleet::new(vec![Vehicle::new(0, 5, 10, 2)]);
        let eq = solve(&fleet, &cfg(100), SWEEP_LIMIT);
        assert_eq!(eq.schedule.as_slice(), &[0]);
        assert_eq!(eq.status, Status::Converged);
        assert!(eq.sweeps <= 2);
    }

    #[test]
    fn first_sweep_corrects_prefix_only_warm_start() {
        // warm start puts vehicle 0 at slot 0 before it knows vehicle 1 is pinned there
        let fleet = Fleet::new(vec![Vehicle::new(0, 1, 5, 1), Vehicle::new(0, 0, 5, 1)]);
        let eq = solve(&fleet, &cfg(100), SWEEP_LIMIT);
        assert_eq!(eq.schedule.as_slice(), &[1, 0]);
        assert_eq!(eq.sweeps, 2);
        assert_eq!(eq.status, Status::Converged);
    }

    #[test]
    fn limit_reached_while_still_moving() {
        let fleet = Fleet::new(vec![Vehicle::new(0, 1, 5, 1), Vehicle::new(0, 0, 5, 1)]);
        let eq = solve(&fleet, &cfg(100), 1);
        assert_eq!(eq.sweeps, 1);
        assert_eq!(eq.status, Status::BoundReached);
        assert_eq!(eq.schedule.as_slice(), &[1, 0]);
    }

    #[test]
    fn step_is_a_no_op_after_termination() {
        let fleet = Fleet::new(vec![Vehicle::new(0, 5, 10, 2)]);
        let c = cfg(100);
        let mut it = EquilibriumIterator::new(fleet.clone(), c.clone(), warm_start(&fleet, &c), 5);
        assert_eq!(it.step(), Status::Converged);
        let sweeps = it.sweeps();
        assert_eq!(it.step(), Status::Converged);
        assert_eq!(it.sweeps(), sweeps);
    }

    #[test]
    fn load_tracks_schedule_after_every_sweep() {
        let fleet = Fleet::new(vec![
            Vehicle::new(0, 8, 3, 3),
            Vehicle::new(0, 8, 4, 2),
            Vehicle::new(2, 12, 5, 4),
            Vehicle::new(0, 3, 2, 2),
        ]);
        let c = cfg(9);
        let mut it = EquilibriumIterator::new(fleet.clone(), c.clone(), warm_start(&fleet, &c), 10);
        while it.status() == Status::Running {
            it.sweep();
            for h in 0..=c.horizon {
                assert_eq!(it.load().at(h), demand(h, it.schedule(), &fleet));
            }
        }
    }

    #[test]
    fn separates_vehicles_that_cannot_share_the_station() {
        let fleet = Fleet::new(vec![Vehicle::new(0, 3, 60, 2), Vehicle::new(1, 4, 60, 2)]);
        let c = cfg(100);
        let eq = solve(&fleet, &c, SWEEP_LIMIT);
        assert_eq!(eq.status, Status::Converged);
        let (a, b) = (eq.schedule.start(0), eq.schedule.start(1));
        assert!(a + 2 <= b || b + 2 <= a, "intervals overlap: {a} and {b}");
        assert!(cost(&eq.schedule, 0, &fleet, &c).is_finite());
        assert!(cost(&eq.schedule, 1, &fleet, &c).is_finite());
    }

    #[test]
    fn inseparable_vehicles_carry_infeasible_cost() {
        let fleet = Fleet::new(vec![Vehicle::new(0, 2, 60, 2), Vehicle::new(0, 2, 60, 2)]);
        let c = cfg(100);
        let eq = solve(&fleet, &c, SWEEP_LIMIT);
        let costs: Vec<Cost> = (0..2).map(|i| cost(&eq.schedule, i, &fleet, &c)).collect();
        assert!(costs.contains(&Cost::Infeasible));
    }

    #[test]
    fn converged_schedule_is_a_fixed_point() {
        let fleet = Fleet::new(vec![
            Vehicle::new(0, 10, 3, 3),
            Vehicle::new(1, 9, 4, 2),
            Vehicle::new(0, 12, 5, 4),
            Vehicle::new(4, 8, 2, 2),
            Vehicle::new(0, 5, 6, 1),
        ]);
        let c = cfg(10);
        let eq = solve(&fleet, &c, SWEEP_LIMIT);
        assert_eq!(eq.status, Status::Converged);
        for i in 0..fleet.len() {
            assert_eq!(best_response(&eq.schedule, i, &fleet, &c).start, eq.schedule.start(i));
        }
    }
}
