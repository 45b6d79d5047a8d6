//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use charge_equilibrium::fleet::{Fleet, Vehicle};
use charge_equilibrium::generator::GeneratorConfig;
use charge_equilibrium::market::cost::best_response;
use charge_equilibrium::market::warm_start::warm_start;
use charge_equilibrium::market::{Equilibrium, MarketConfig, Schedule, Status};

/// Market with the article defaults and the given cap (H=24, dt=1, alpha=beta=1).
pub fn market(p_max: u64) -> MarketConfig {
    MarketConfig::new(24, 1.0, p_max, 1.0, 1.0)
}

/// Seeded synthetic fleet over a 25-slot horizon.
pub fn random_fleet(seed: u64, vehicles: usize) -> Fleet {
    GeneratorConfig {
        vehicles,
        seed,
        ..GeneratorConfig::default()
    }
    .generate(24)
}

/// The article fleet, as shipped in `data/article.csv`.
pub fn article_fleet() -> Fleet {
    Fleet::new(vec![
        Vehicle::new(0, 7, 3, 4),
        Vehicle::new(1, 9, 7, 3),
        Vehicle::new(3, 14, 3, 5),
        Vehicle::new(6, 11, 7, 2),
        Vehicle::new(8, 20, 3, 6),
        Vehicle::new(10, 17, 7, 3),
        Vehicle::new(13, 23, 3, 4),
        Vehicle::new(16, 24, 7, 4),
    ])
}

/// Gauss-Seidel iteration written directly on the full-scan best response.
pub fn reference_equilibrium(fleet: &Fleet, config: &MarketConfig, limit: usize) -> Equilibrium {
    let mut x = warm_start(fleet, config);
    let mut previous: Option<Schedule> = None;
    let mut sweeps = 0;
    while previous.as_ref() != Some(&x) && sweeps < limit {
        previous = Some(x.clone());
        for i in 0..fleet.len() {
            let pick = best_response(&x, i, fleet, config);
            x.set(i, pick.start);
        }
        sweeps += 1;
    }
    let status = if previous.as_ref() == Some(&x) {
        Status::Converged
    } else {
        Status::BoundReached
    };
    Equilibrium {
        schedule: x,
        sweeps,
        status,
    }
}
