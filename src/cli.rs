//! Command-line arguments and their application to a scenario.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{FleetSection, ScenarioConfig};
use crate::error::{ConfigError, Result};

#[derive(Debug, Parser)]
#[command(name = "charge-equilibrium")]
#[command(version, about = "Best-response equilibrium of EV charging at a capped station")]
#[command(
    long_about = "Computes a charging schedule for a fleet of electric vehicles sharing a \
    power-capped station under a congestion price.\n\
    \nEach vehicle picks the start slot that minimises its own cost given the others. \
    A greedy warm start is refined by best-response sweeps until nothing moves.\n\
    \nExamples:\n  \
    charge-equilibrium\n  \
    charge-equilibrium --preset congested\n  \
    charge-equilibrium --fleet fleet.csv --pmax 20 --schedule-out schedule.csv"
)]
pub struct Cli {
    /// Load scenario from TOML config file
    #[arg(long, conflicts_with = "preset")]
    pub scenario: Option<PathBuf>,

    /// Built-in preset (article, congested, random)
    #[arg(long)]
    pub preset: Option<String>,

    /// Fleet CSV replacing the scenario's fleet
    #[arg(long)]
    pub fleet: Option<PathBuf>,

    /// Station power cap
    #[arg(long)]
    pub pmax: Option<u64>,

    /// Last slot index of the horizon
    #[arg(long)]
    pub horizon: Option<usize>,

    /// Slot length
    #[arg(long)]
    pub dt: Option<f64>,

    /// Price slope per unit of demand
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Price at zero demand
    #[arg(long)]
    pub beta: Option<f64>,

    /// Sweep limit
    #[arg(long)]
    pub max_sweeps: Option<usize>,

    /// Seed of the synthetic fleet generator
    #[arg(long)]
    pub seed: Option<u64>,

    /// Export one row per vehicle to CSV
    #[arg(long)]
    pub schedule_out: Option<PathBuf>,

    /// Export one row per slot to CSV
    #[arg(long)]
    pub profile_out: Option<PathBuf>,

    /// Start REST API server after solving
    #[cfg(feature = "api")]
    #[arg(long)]
    pub serve: bool,

    /// API server port
    #[cfg(feature = "api")]
    #[arg(long, default_value_t = 3000)]
    pub port: u16,

    /// Watch the sweeps in a live terminal view
    #[cfg(feature = "tui")]
    #[arg(long)]
    pub tui: bool,
}

impl Cli {
    /// Short name of the selected scenario, for display.
    pub fn scenario_name(&self) -> String {
        if let Some(path) = &self.scenario {
            return path
                .file_stem()
                .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().into_owned());
        }
        self.preset.clone().unwrap_or_else(|| "article".to_string())
    }

    /// Loads the selected scenario and applies command-line overrides.
    ///
    /// `--scenario` takes priority, then `--preset`, then the article default.
    ///
    /// # Errors
    ///
    /// Returns an error if the scenario file cannot be loaded or the preset is unknown.
    pub fn load_scenario(&self) -> Result<ScenarioConfig> {
        let mut scenario = if let Some(path) = &self.scenario {
            ScenarioConfig::from_toml_file(path)?
        } else if let Some(name) = &self.preset {
            ScenarioConfig::from_preset(name)?
        } else {
            ScenarioConfig::article()
        };
        self.apply(&mut scenario)?;
        Ok(scenario)
    }

    /// Overwrites scenario fields with the values given on the command line.
    ///
    /// # Errors
    ///
    /// Returns an error if `--seed` is given for a fleet that is not generated.
    pub fn apply(&self, scenario: &mut ScenarioConfig) -> Result<()> {
        if let Some(path) = &self.fleet {
            scenario.fleet = FleetSection {
                csv: Some(path.clone()),
                vehicles: None,
                generator: None,
            };
            // command-line paths are relative to the working directory
            scenario.base_dir = None;
        }

        let m = &mut scenario.market;
        if let Some(p_max) = self.pmax {
            m.p_max = p_max;
        }
        if let Some(horizon) = self.horizon {
            m.horizon = horizon;
        }
        if let Some(dt) = self.dt {
            m.dt = dt;
        }
        if let Some(alpha) = self.alpha {
            m.alpha = alpha;
        }
        if let Some(beta) = self.beta {
            m.beta = beta;
        }
        if let Some(max_sweeps) = self.max_sweeps {
            scenario.solver.max_sweeps = max_sweeps;
        }

        if let Some(seed) = self.seed {
            match scenario.fleet.generator.as_mut() {
                Some(generator) => generator.seed = seed,
                None => {
                    return Err(ConfigError::new(
                        "seed",
                        "only applies to a generated fleet (fleet.generator)",
                    )
                    .into());
                }
            }
        }
        Ok(())
    }
}
