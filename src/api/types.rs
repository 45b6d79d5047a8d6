//! API response and query types.
//!
//! Field names follow the CSV export columns.

use serde::{Deserialize, Serialize};

use crate::market::report::{ScheduleReport, SlotOutcome, VehicleOutcome};
use crate::market::{MarketConfig, Status};

/// Run summary: market parameters plus report totals.
#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub config: MarketConfig,
    pub summary: Summary,
}

/// Aggregate figures of a [`ScheduleReport`], without the per-row data.
#[derive(Debug, Serialize)]
pub struct Summary {
    pub vehicles: usize,
    pub status: Status,
    pub sweeps: usize,
    pub total_cost: f64,
    pub infeasible_vehicles: usize,
    pub peak_demand: u64,
    pub cap_violations: usize,
}

impl From<&ScheduleReport> for Summary {
    fn from(r: &ScheduleReport) -> Self {
        Self {
            vehicles: r.vehicles.len(),
            status: r.status,
            sweeps: r.sweeps,
            total_cost: r.total_cost,
            infeasible_vehicles: r.infeasible_vehicles,
            peak_demand: r.peak_demand,
            cap_violations: r.cap_violations,
        }
    }
}

/// One vehicle of the schedule.
///
/// `cost` is `null` for a vehicle whose interval exceeds the cap.
#[derive(Debug, Serialize)]
pub struct ScheduleRecord {
    pub vehicle: usize,
    pub window_start: usize,
    pub window_end: usize,
    pub power: u32,
    pub duration: usize,
    pub start: usize,
    pub end: usize,
    pub cost: Option<f64>,
    pub feasible: bool,
}

impl From<&VehicleOutcome> for ScheduleRecord {
    fn from(v: &VehicleOutcome) -> Self {
        Self {
            vehicle: v.vehicle,
            window_start: v.window_start,
            window_end: v.window_end,
            power: v.power,
            duration: v.duration,
            start: v.start,
            end: v.end,
            cost: v.cost.value(),
            feasible: v.cost.is_finite(),
        }
    }
}

/// One slot of the station profile.
#[derive(Debug, Serialize)]
pub struct ProfileRecord {
    pub slot: usize,
    pub demand: u64,
    pub price: f64,
    pub within_cap: bool,
}

impl From<&SlotOutcome> for ProfileRecord {
    fn from(s: &SlotOutcome) -> Self {
        Self {
            slot: s.slot,
            demand: s.demand,
            price: s.price,
            within_cap: s.within_cap,
        }
    }
}

/// Optional range query parameters for the profile endpoint.
#[derive(Debug, Deserialize)]
pub struct ProfileQuery {
    /// First slot (inclusive).
    pub from: Option<usize>,
    /// Last slot (inclusive).
    pub to: Option<usize>,
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
