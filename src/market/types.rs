//! Core market types: run-wide configuration, cost outcomes, and schedules.

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

/// Run-wide market parameters threaded through demand, price, and cost.
///
/// # Examples
///
/// ```
/// use charge_equilibrium::market::types::MarketConfig;
///
/// let cfg = MarketConfig::new(24, 1.0, 12, 1.0, 1.0);
/// assert_eq!(cfg.slots(), 25);
/// assert_eq!(cfg.price(3), 4.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketConfig {
    /// Last slot index of the horizon (inclusive), `H`.
    pub horizon: usize,
    /// Length of one slot, `dt`.
    pub dt: f64,
    /// Station-wide power cap, `Pmax`.
    pub p_max: u64,
    /// Price slope per unit of demand.
    pub alpha: f64,
    /// Price at zero demand.
    pub beta: f64,
}

impl MarketConfig {
    /// Creates a new market configuration.
    ///
    /// # Panics
    ///
    /// Panics if `dt` is not a positive finite number, or if `alpha` or `beta`
    /// is not finite.
    pub fn new(horizon: usize, dt: f64, p_max: u64, alpha: f64, beta: f64) -> Self {
        assert!(dt.is_finite() && dt > 0.0, "dt must be > 0");
        assert!(alpha.is_finite(), "alpha must be finite");
        assert!(beta.is_finite(), "beta must be finite");
        Self {
            horizon,
            dt,
            p_max,
            alpha,
            beta,
        }
    }

    /// Number of slots in `[0, horizon]`.
    pub fn slots(&self) -> usize {
        self.horizon + 1
    }

    /// Price at the given demand under this market's coefficients.
    pub fn price(&self, demand: u64) -> f64 {
        super::price::price(demand, self.alpha, self.beta)
    }

    /// Returns `true` when `demand` does not exceed the station cap.
    pub fn within_cap(&self, demand: u64) -> bool {
        demand <= self.p_max
    }
}

/// Outcome of evaluating one vehicle's charging interval.
///
/// `Infeasible` stands for the interval pushing station demand above the cap
/// at some slot. It orders after every finite cost and equal to itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Cost {
    Finite(f64),
    Infeasible,
}

impl Cost {
    pub fn is_finite(&self) -> bool {
        matches!(self, Self::Finite(_))
    }

    /// The finite value, or `None` for an infeasible interval.
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Finite(v) => Some(*v),
            Self::Infeasible => None,
        }
    }

    /// Total order: finite costs by value, `Infeasible` last.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Finite(a), Self::Finite(b)) => a.total_cmp(b),
            (Self::Finite(_), Self::Infeasible) => Ordering::Less,
            (Self::Infeasible, Self::Finite(_)) => Ordering::Greater,
            (Self::Infeasible, Self::Infeasible) => Ordering::Equal,
        }
    }

    /// Strictly cheaper than `other`.
    pub fn is_cheaper_than(&self, other: &Self) -> bool {
        self.total_cmp(other) == Ordering::Less
    }
}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.total_cmp(other))
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(v) => write!(f, "{v:.2}"),
            Self::Infeasible => write!(f, "inf"),
        }
    }
}

/// One start slot per vehicle, indexed like the fleet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Schedule {
    starts: Vec<usize>,
}

impl Schedule {
    pub fn new(starts: Vec<usize>) -> Self {
        Self { starts }
    }

    /// Start slot of vehicle `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of range.
    pub fn start(&self, i: usize) -> usize {
        self.starts[i]
    }

    /// Moves vehicle `i` to `start`.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of range.
    pub fn set(&mut self, i: usize, start: usize) {
        self.starts[i] = start;
    }

    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.starts
    }

    pub fn iter(&self) -> std::slice::Iter<'_, usize> {
        self.starts.iter()
    }
}

impl From<Vec<usize>> for Schedule {
    fn from(starts: Vec<usize>) -> Self {
        Self::new(starts)
    }
}

/// A vehicle fixed at a start slot while the rest of the fleet is unassigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pub start: usize,
    pub vehicle: usize,
}

/// Assignments for a prefix of the fleet, in assignment order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialSchedule {
    entries: Vec<Assignment>,
}

impl PartialSchedule {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            entries: Vec::with_capacity(n),
        }
    }

    /// Assigns `vehicle` to `start`, replacing an earlier assignment of the same vehicle.
    pub fn assign(&mut self, vehicle: usize, start: usize) {
        match self.entries.iter_mut().find(|a| a.vehicle == vehicle) {
            Some(entry) => entry.start = start,
            None => self.entries.push(Assignment { start, vehicle }),
        }
    }

    /// Start slot of `vehicle`, if it has been assigned.
    pub fn start_of(&self, vehicle: usize) -> Option<usize> {
        self.entries
            .iter()
            .find(|a| a.vehicle == vehicle)
            .map(|a| a.start)
    }

    pub fn entries(&self) -> &[Assignment] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Converts a complete assignment of vehicles `0..n` into a [`Schedule`].
    ///
    /// Returns `None` if some vehicle in `0..n` has no assignment.
    pub fn into_schedule(self, n: usize) -> Option<Schedule> {
        let mut starts = vec![None; n];
        for a in self.entries {
            if let Some(slot) = starts.get_mut(a.vehicle) {
                *slot = Some(a.start);
            }
        }
        starts
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .map(Schedule::new)
    }
}
