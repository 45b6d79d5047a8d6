//! Per-vehicle charging cost and the best-response search over start slots.

use crate::fleet::{Fleet, Vehicle};

use super::demand::{LoadProfile, demand, demand_partial};
use super::types::{Cost, MarketConfig, PartialSchedule, Schedule};

/// A start slot together with the cost it would incur.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub start: usize,
    pub cost: Cost,
}

/// Cost of charging `vehicle` from `start`, reading station demand through `demand_at`.
///
/// Accumulates `price(d) * power * dt` slot by slot and stops with
/// [`Cost::Infeasible`] at the first slot whose demand exceeds the cap.
/// Every cost in the crate goes through this function, so brute-force and
/// incremental evaluations agree bit for bit.
pub fn interval_cost(
    vehicle: &Vehicle,
    start: usize,
    config: &MarketConfig,
    mut demand_at: impl FnMut(usize) -> u64,
) -> Cost {
    let power = f64::from(vehicle.power);
    let mut total = 0.0;
    for h in start..=vehicle.end_slot(start) {
        let d = demand_at(h);
        if !config.within_cap(d) {
            return Cost::Infeasible;
        }
        total += config.price(d) * power * config.dt;
    }
    Cost::Finite(total)
}

/// Full-information cost of vehicle `i` under `schedule`.
pub fn cost(schedule: &Schedule, i: usize, fleet: &Fleet, config: &MarketConfig) -> Cost {
    interval_cost(fleet.vehicle(i), schedule.start(i), config, |h| {
        demand(h, schedule, fleet)
    })
}

/// Cost of vehicle `i` counting only the vehicles assigned in `partial`.
///
/// Returns `None` if vehicle `i` itself has no assignment yet.
pub fn cost_partial(
    partial: &PartialSchedule,
    i: usize,
    fleet: &Fleet,
    config: &MarketConfig,
) -> Option<Cost> {
    let start = partial.start_of(i)?;
    Some(interval_cost(fleet.vehicle(i), start, config, |h| {
        demand_partial(h, partial, fleet)
    }))
}

/// Cost of placing `vehicle` at `start` on top of `others`, a profile that excludes it.
pub fn candidate_cost(
    others: &LoadProfile,
    vehicle: &Vehicle,
    start: usize,
    config: &MarketConfig,
) -> Cost {
    let power = u64::from(vehicle.power);
    interval_cost(vehicle, start, config, |h| others.at(h) + power)
}

/// Cheapest feasible start of `vehicle` under `cost_of`.
///
/// Starts are tried in ascending order and only a strictly cheaper candidate
/// replaces the incumbent, so the earliest start wins exact ties. When every
/// start is infeasible the earliest one is returned. A vehicle with no
/// admissible start yields its `window_start` as infeasible.
pub fn cheapest_start(vehicle: &Vehicle, mut cost_of: impl FnMut(usize) -> Cost) -> Candidate {
    let mut best: Option<Candidate> = None;
    for start in vehicle.feasible_starts() {
        let cost = cost_of(start);
        if best.is_none_or(|b| cost.is_cheaper_than(&b.cost)) {
            best = Some(Candidate { start, cost });
        }
    }
    best.unwrap_or(Candidate {
        start: vehicle.window_start,
        cost: Cost::Infeasible,
    })
}

/// Best response of vehicle `i` with every other vehicle held at its `schedule` slot.
///
/// Evaluates each candidate with the reference [`cost`] definition.
pub fn best_response(
    schedule: &Schedule,
    i: usize,
    fleet: &Fleet,
    config: &MarketConfig,
) -> Candidate {
    let mut trial = schedule.clone();
    cheapest_start(fleet.vehicle(i), |t| {
        trial.set(i, t);
        cost(&trial, i, fleet, config)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(p_max: u64) -> MarketConfig {
        MarketConfig::new(10, 1.0, p_max, 1.0, 1.0)
    }

    #[test]
    fn single_vehicle_cost() {
        // one slot at demand 10: price 11, times power 10 and dt 1, over 2 slots
        let fleet = Fleet::new(vec![Vehicle::new(0, 5, 10, 2)]);
        let x = Schedule::new(vec![3]);
        assert_eq!(cost(&x, 0, &fleet, &cfg(100)), Cost::Finite(220.0));
    }

    #[test]
    fn dt_scales_cost() {
        let fleet = Fleet::new(vec![Vehicle::new(0, 5, 10, 2)]);
        let x = Schedule::new(vec![3]);
        let half = MarketConfig::new(10, 0.5, 100, 1.0, 1.0);
        assert_eq!(cost(&x, 0, &fleet, &half), Cost::Finite(110.0));
    }

    #[test]
    fn overlap_raises_both_costs() {
        let fleet = Fleet::new(vec![Vehicle::new(0, 5, 4, 2), Vehicle::new(0, 5, 2, 1)]);
        let x = Schedule::new(vec![0, 1]);
        // v0: slot 0 demand 4 -> 5*4, slot 1 demand 6 -> 7*4
        assert_eq!(cost(&x, 0, &fleet, &cfg(100)), Cost::Finite(48.0));
        // v1: slot 1 demand 6 -> 7*2
        assert_eq!(cost(&x, 1, &fleet, &cfg(100)), Cost::Finite(14.0));
    }

    #[test]
    fn exceeding_cap_anywhere_is_infeasible() {
        let fleet = Fleet::new(vec![Vehicle::new(0, 5, 6, 3), Vehicle::new(0, 5, 6, 1)]);
        let x = Schedule::new(vec![0, 2]);
        assert_eq!(cost(&x, 0, &fleet, &cfg(11)), Cost::Infeasible);
        assert_eq!(cost(&x, 1, &fleet, &cfg(11)), Cost::Infeasible);
        assert!(cost(&x, 0, &fleet, &cfg(12)).is_finite());
    }

    #[test]
    fn demand_equal_to_cap_is_allowed() {
        let fleet = Fleet::new(vec![Vehicle::new(0, 5, 12, 1)]);
        let x = Schedule::new(vec![0]);
        assert!(cost(&x, 0, &fleet, &cfg(12)).is_finite());
    }

    #[test]
    fn partial_cost_ignores_later_vehicles() {
        let fleet = Fleet::new(vec![Vehicle::new(0, 5, 4, 2), Vehicle::new(0, 5, 2, 1)]);
        let mut p = PartialSchedule::default();
        p.assign(0, 0);
        assert_eq!(cost_partial(&p, 0, &fleet, &cfg(100)), Some(Cost::Finite(40.0)));
        assert_eq!(cost_partial(&p, 1, &fleet, &cfg(100)), None);
        p.assign(1, 1);
        assert_eq!(cost_partial(&p, 0, &fleet, &cfg(100)), Some(Cost::Finite(48.0)));
    }

    #[test]
    fn candidate_cost_matches_reference_cost() {
        let fleet = Fleet::new(vec![
            Vehicle::new(0, 8, 3, 3),
            Vehicle::new(1, 9, 5, 2),
            Vehicle::new(0, 9, 4, 4),
        ]);
        let c = MarketConfig::new(9, 0.25, 9, 1.5, 0.3);
        let x = Schedule::new(vec![2, 3, 1]);
        for i in 0..fleet.len() {
            let mut others = LoadProfile::from_schedule(&fleet, &x, &c);
            others.remove(fleet.vehicle(i), x.start(i));
            for t in fleet.vehicle(i).feasible_starts() {
                let mut trial = x.clone();
                trial.set(i, t);
                assert_eq!(
                    candidate_cost(&others, fleet.vehicle(i), t, &c),
                    cost(&trial, i, &fleet, &c),
                    "vehicle {i} at {t}"
                );
            }
        }
    }

    #[test]
    fn cheapest_start_prefers_earliest_on_ties() {
        let v = Vehicle::new(2, 9, 1, 1);
        let pick = cheapest_start(&v, |_| Cost::Finite(5.0));
        assert_eq!(pick.start, 2);

        let pick = cheapest_start(&v, |t| if t >= 6 { Cost::Finite(1.0) } else { Cost::Finite(2.0) });
        assert_eq!(pick, Candidate { start: 6, cost: Cost::Finite(1.0) });
    }

    #[test]
    fn cheapest_start_takes_finite_over_infeasible() {
        let v = Vehicle::new(0, 4, 1, 1);
        let pick = cheapest_start(&v, |t| if t == 3 { Cost::Finite(1e9) } else { Cost::Infeasible });
        assert_eq!(pick.start, 3);
    }

    #[test]
    fn all_infeasible_picks_window_start() {
        let v = Vehicle::new(1, 4, 1, 1);
        let pick = cheapest_start(&v, |_| Cost::Infeasible);
        assert_eq!(pick, Candidate { start: 1, cost: Cost::Infeasible });
    }

    #[test]
    fn best_response_moves_away_from_congestion() {
        let fleet = Fleet::new(vec![Vehicle::new(0, 0, 5, 1), Vehicle::new(0, 1, 5, 1)]);
        let x = Schedule::new(vec![0, 0]);
        let br = best_response(&x, 1, &fleet, &cfg(100));
        assert_eq!(br.start, 1);
        assert_eq!(br.cost, Cost::Finite(30.0));
    }
}
