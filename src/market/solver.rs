//! Solver that chains the warm start and the best-response sweeps.

use tracing::info;

use crate::fleet::Fleet;

use super::equilibrium::{Equilibrium, EquilibriumIterator, SWEEP_LIMIT, Status};
use super::report::ScheduleReport;
use super::types::{MarketConfig, Schedule};
use super::warm_start::warm_start;

/// Solver owning the fleet and market configuration.
#[derive(Debug, Clone)]
pub struct Solver {
    config: MarketConfig,
    fleet: Fleet,
    max_sweeps: usize,
}

impl Solver {
    /// Creates a solver with the default sweep limit.
    ///
    /// # Arguments
    ///
    /// * `fleet` - Vehicle table, indexed in iteration order
    /// * `config` - Market parameters
    pub fn new(fleet: Fleet, config: MarketConfig) -> Self {
        Self {
            config,
            fleet,
            max_sweeps: SWEEP_LIMIT,
        }
    }

    /// Replaces the sweep limit.
    ///
    /// # Panics
    ///
    /// Panics if `max_sweeps` is zero.
    pub fn with_max_sweeps(mut self, max_sweeps: usize) -> Self {
        assert!(max_sweeps > 0, "max_sweeps must be > 0");
        self.max_sweeps = max_sweeps;
        self
    }

    /// Initial schedule from the prefix-only greedy pass.
    pub fn warm_start(&self) -> Schedule {
        warm_start(&self.fleet, &self.config)
    }

    /// Iterator positioned at the warm start, for sweep-by-sweep callers.
    pub fn iterator(&self) -> EquilibriumIterator {
        EquilibriumIterator::new(
            self.fleet.clone(),
            self.config.clone(),
            self.warm_start(),
            self.max_sweeps,
        )
    }

    /// Runs warm start and sweeps to termination.
    pub fn run(&self) -> Equilibrium {
        info!(
            vehicles = self.fleet.len(),
            horizon = self.config.horizon,
            p_max = self.config.p_max,
            max_sweeps = self.max_sweeps,
            "solving"
        );

        let equilibrium = self.iterator().run();

        match equilibrium.status {
            Status::BoundReached => info!(
                sweeps = equilibrium.sweeps,
                "sweep limit reached before convergence"
            ),
            _ => info!(sweeps = equilibrium.sweeps, "converged"),
        }
        equilibrium
    }

    /// Report of `equilibrium` against this solver's fleet and market.
    pub fn report(&self, equilibrium: &Equilibrium) -> ScheduleReport {
        ScheduleReport::from_equilibrium(&self.fleet, &self.config, equilibrium)
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    pub fn config(&self) -> &MarketConfig {
        &self.config
    }

    pub fn max_sweeps(&self) -> usize {
        self.max_sweeps
    }
}
