//! Best-response equilibrium of EV fleet charging at a power-capped station.

/// Command-line arguments.
pub mod cli;
pub mod config;
pub mod error;
pub mod fleet;
pub mod generator;
pub mod io;
/// Demand, price, cost, warm start, and equilibrium sweeps.
pub mod market;

#[cfg(feature = "api")]
pub mod api;
#[cfg(feature = "tui")]
pub mod tui;
