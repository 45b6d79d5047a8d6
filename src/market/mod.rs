//! Charging market: demand, price, cost, and the best-response solver.

/// Per-vehicle cost and best-response search.
pub mod cost;
pub mod demand;
/// Gauss-Seidel sweeps and their termination.
pub mod equilibrium;
pub mod price;
pub mod report;
pub mod solver;
pub mod types;
/// Prefix-only greedy initial schedule.
pub mod warm_start;

pub use equilibrium::{Equilibrium, EquilibriumIterator, SWEEP_LIMIT, Status};
pub use report::ScheduleReport;
pub use solver::Solver;
pub use types::{Cost, MarketConfig, Schedule};
