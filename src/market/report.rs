//! Post-hoc report of an equilibrium schedule.

use std::fmt;

use serde::Serialize;

use crate::fleet::Fleet;

use super::cost::cost;
use super::demand::LoadProfile;
use super::equilibrium::{Equilibrium, Status};
use super::types::{Cost, MarketConfig};

/// Where one vehicle ended up and what it pays there.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleOutcome {
    pub vehicle: usize,
    pub window_start: usize,
    pub window_end: usize,
    pub power: u32,
    pub duration: usize,
    pub start: usize,
    /// Last occupied slot (inclusive).
    pub end: usize,
    pub cost: Cost,
}

/// Station state at one slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotOutcome {
    pub slot: usize,
    pub demand: u64,
    pub price: f64,
    pub within_cap: bool,
}

/// Aggregate view of a solved schedule.
///
/// Recomputed from the schedule with the reference cost and demand
/// definitions, independently of the solver's incremental bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleReport {
    pub vehicles: Vec<VehicleOutcome>,
    pub slots: Vec<SlotOutcome>,
    /// Sum of the finite vehicle costs.
    pub total_cost: f64,
    /// Vehicles whose interval exceeds the cap somewhere.
    pub infeasible_vehicles: usize,
    pub peak_demand: u64,
    pub p_max: u64,
    /// Slots whose demand exceeds the cap.
    pub cap_violations: usize,
    pub sweeps: usize,
    pub status: Status,
}

impl ScheduleReport {
    pub fn from_equilibrium(fleet: &Fleet, config: &MarketConfig, eq: &Equilibrium) -> Self {
        let vehicles: Vec<VehicleOutcome> = fleet
            .iter()
            .zip(eq.schedule.iter())
            .enumerate()
            .map(|(i, (v, &start))| VehicleOutcome {
                vehicle: i,
                window_start: v.window_start,
                window_end: v.window_end,
                power: v.power,
                duration: v.duration,
                start,
                end: v.end_slot(start),
                cost: cost(&eq.schedule, i, fleet, config),
            })
            .collect();

        let profile = LoadProfile::from_schedule(fleet, &eq.schedule, config);
        let slots: Vec<SlotOutcome> = profile
            .as_slice()
            .iter()
            .enumerate()
            .map(|(slot, &demand)| SlotOutcome {
                slot,
                demand,
                price: config.price(demand),
                within_cap: config.within_cap(demand),
            })
            .collect();

        let total_cost = vehicles.iter().filter_map(|v| v.cost.value()).sum();
        let infeasible_vehicles = vehicles.iter().filter(|v| !v.cost.is_finite()).count();
        let cap_violations = slots.iter().filter(|s| !s.within_cap).count();

        Self {
            vehicles,
            slots,
            total_cost,
            infeasible_vehicles,
            peak_demand: profile.peak(),
            p_max: config.p_max,
            cap_violations,
            sweeps: eq.sweeps,
            status: eq.status,
        }
    }

    /// Slots `from..=to`, clamped to the reported range.
    pub fn slot_range(&self, from: usize, to: usize) -> &[SlotOutcome] {
        if from > to || from >= self.slots.len() {
            return &[];
        }
        let end = to.min(self.slots.len() - 1);
        &self.slots[from..=end]
    }

    /// Per-vehicle charging timeline with a demand strip underneath.
    pub fn timeline(&self) -> Timeline<'_> {
        Timeline(self)
    }
}

impl fmt::Display for ScheduleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Equilibrium Report ---")?;
        writeln!(f, "Vehicles:             {}", self.vehicles.len())?;
        writeln!(
            f,
            "Status:               {} after {} sweep(s)",
            self.status.label(),
            self.sweeps
        )?;
        writeln!(f, "Total cost:           {:.2}", self.total_cost)?;
        writeln!(f, "Infeasible vehicles:  {}", self.infeasible_vehicles)?;
        writeln!(f, "Peak demand:          {} / {}", self.peak_demand, self.p_max)?;
        write!(f, "Cap violations:       {}", self.cap_violations)
    }
}

const LEVELS: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Text rendering of a [`ScheduleReport`], one row per vehicle.
///
/// `#` marks charging slots, `.` the rest of the window. The demand row
/// scales against the cap and shows `!` where it is exceeded.
pub struct Timeline<'a>(&'a ScheduleReport);

impl Timeline<'_> {
    fn level(demand: u64, p_max: u64) -> char {
        if demand > p_max {
            return '!';
        }
        if demand == 0 {
            return LEVELS[0];
        }
        let top = (LEVELS.len() - 1) as u64;
        let idx = (demand * top).div_ceil(p_max).clamp(1, top);
        LEVELS[idx as usize]
    }
}

impl fmt::Display for Timeline<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        let n = report.slots.len();

        let tens: String = (0..n)
            .map(|h| if h % 10 == 0 { char::from(b'0' + ((h / 10) % 10) as u8) } else { ' ' })
            .collect();
        let units: String = (0..n).map(|h| char::from(b'0' + (h % 10) as u8)).collect();
        writeln!(f, "{:<8} {tens}", "slot")?;
        writeln!(f, "{:<8} {units}", "")?;

        for v in &report.vehicles {
            let row: String = (0..n)
                .map(|h| {
                    if v.start <= h && h <= v.end {
                        '#'
                    } else if v.window_start <= h && h <= v.window_end {
                        '.'
                    } else {
                        ' '
                    }
                })
                .collect();
            writeln!(f, "{:<8}|{row}| {}", format!("v{}", v.vehicle), v.cost)?;
        }

        let strip: String = report
            .slots
            .iter()
            .map(|s| Self::level(s.demand, report.p_max))
            .collect();
        write!(f, "{:<8}|{strip}| peak {}", "demand", report.peak_demand)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fleet::Vehicle;
    use crate::market::types::Schedule;

    fn report(starts: Vec<usize>, p_max: u64) -> ScheduleReport {
        let fleet = Fleet::new(vec![Vehicle::new(0, 4, 6, 2), Vehicle::new(1, 5, 6, 2)]);
        let config = MarketConfig::new(5, 1.0, p_max, 1.0, 1.0);
        let eq = Equilibrium {
            schedule: Schedule::new(starts),
            sweeps: 2,
            status: Status::Converged,
        };
        ScheduleReport::from_equilibrium(&fleet, &config, &eq)
    }

    #[test]
    fn separated_schedule_totals() {
        let r = report(vec![0, 2], 10);
        // each vehicle pays 2 slots at price 7 with power 6
        assert_eq!(r.total_cost, 168.0);
        assert_eq!(r.infeasible_vehicles, 0);
        assert_eq!(r.peak_demand, 6);
        assert_eq!(r.cap_violations, 0);
        assert_eq!(r.slots.len(), 6);
        assert_eq!(r.vehicles[1].end, 3);
    }

    #[test]
    fn overlap_over_cap_is_counted() {
        let r = report(vec![1, 1], 10);
        assert_eq!(r.infeasible_vehicles, 2);
        assert_eq!(r.total_cost, 0.0);
        assert_eq!(r.peak_demand, 12);
        assert_eq!(r.cap_violations, 2);
        assert!(!r.slots[1].within_cap);
        assert_eq!(r.slots[1].price, 13.0);
    }

    #[test]
    fn slot_range_clamps() {
        let r = report(vec![0, 2], 10);
        assert_eq!(r.slot_range(2, 3).len(), 2);
        assert_eq!(r.slot_range(4, 100).len(), 2);
        assert!(r.slot_range(3, 2).is_empty());
        assert!(r.slot_range(10, 12).is_empty());
    }

    #[test]
    fn summary_mentions_status() {
        let text = report(vec![0, 2], 10).to_string();
        assert!(text.contains("converged after 2 sweep(s)"));
        assert!(text.contains("6 / 10"));
    }

    #[test]
    fn timeline_marks_charging_slots() {
        let text = report(vec![0, 2], 10).timeline().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[2].starts_with("v0      |##... |"));
        assert!(lines[3].starts_with("v1      | .##..|"));
        assert!(lines[4].starts_with("demand  |"));
    }

    #[test]
    fn timeline_flags_cap_excess() {
        let text = report(vec![1, 1], 10).timeline().to_string();
        assert!(text.lines().last().is_some_and(|l| l.contains('!')));
    }

    #[test]
    fn levels_scale_to_cap() {
        assert_eq!(Timeline::level(0, 10), ' ');
        assert_eq!(Timeline::level(10, 10), '█');
        assert_eq!(Timeline::level(1, 10), '▁');
        assert_eq!(Timeline::level(11, 10), '!');
        assert_eq!(Timeline::level(1, 0), '!');
    }
}
