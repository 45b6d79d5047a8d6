//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{ConfigError, Error, Result};
use crate::fleet::{Fleet, Vehicle};
use crate::generator::GeneratorConfig;
use crate::market::{MarketConfig, SWEEP_LIMIT, Solver};

/// Top-level scenario configuration parsed from TOML.
///
/// All sections have defaults matching the article scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::article`] for the built-in default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Horizon, cap and price coefficients.
    #[serde(default)]
    pub market: MarketSection,
    /// Iteration limits.
    #[serde(default)]
    pub solver: SolverSection,
    /// Where the vehicle table comes from.
    #[serde(default)]
    pub fleet: FleetSection,
    /// Directory that relative fleet paths are resolved against.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

/// Market parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarketSection {
    /// Last slot index of the horizon (inclusive).
    pub horizon: usize,
    /// Slot length.
    pub dt: f64,
    /// Station-wide power cap.
    pub p_max: u64,
    /// Price slope per unit of demand.
    pub alpha: f64,
    /// Price at zero demand.
    pub beta: f64,
}

impl Default for MarketSection {
    fn default() -> Self {
        Self {
            horizon: 24,
            dt: 1.0,
            p_max: 12,
            alpha: 1.0,
            beta: 1.0,
        }
    }
}

/// Solver limits.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverSection {
    /// Sweeps after which iteration stops without convergence.
    pub max_sweeps: usize,
}

impl Default for SolverSection {
    fn default() -> Self {
        Self {
            max_sweeps: SWEEP_LIMIT,
        }
    }
}

/// Fleet source. Exactly one of the three fields must be set.
///
/// A missing `[fleet]` table falls back to the article fleet.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FleetSection {
    /// CSV file with one vehicle per row.
    #[serde(default)]
    pub csv: Option<PathBuf>,
    /// Inline vehicle records.
    #[serde(default)]
    pub vehicles: Option<Vec<Vehicle>>,
    /// Seeded synthetic fleet.
    #[serde(default)]
    pub generator: Option<GeneratorConfig>,
}

impl Default for FleetSection {
    fn default() -> Self {
        Self::inline(article_fleet())
    }
}

impl FleetSection {
    fn inline(vehicles: Vec<Vehicle>) -> Self {
        Self {
            csv: None,
            vehicles: Some(vehicles),
            generator: None,
        }
    }

    fn sources(&self) -> usize {
        usize::from(self.csv.is_some())
            + usize::from(self.vehicles.is_some())
            + usize::from(self.generator.is_some())
    }
}

/// Eight vehicles sharing a 12 kW station over one day.
fn article_fleet() -> Vec<Vehicle> {
    vec![
        Vehicle::new(0, 7, 3, 4),
        Vehicle::new(1, 9, 7, 3),
        Vehicle::new(3, 14, 3, 5),
        Vehicle::new(6, 11, 7, 2),
        Vehicle::new(8, 20, 3, 6),
        Vehicle::new(10, 17, 7, 3),
        Vehicle::new(13, 23, 3, 4),
        Vehicle::new(16, 24, 7, 4),
    ]
}

impl ScenarioConfig {
    /// Returns the article scenario: eight vehicles, 12 kW cap, 25 hourly slots.
    pub fn article() -> Self {
        Self::default()
    }

    /// Returns the congested preset: the article fleet under a tighter cap
    /// and a steeper price.
    pub fn congested() -> Self {
        Self {
            market: MarketSection {
                p_max: 9,
                alpha: 2.0,
                ..MarketSection::default()
            },
            ..Self::default()
        }
    }

    /// Returns the random preset: a seeded synthetic fleet of 40 vehicles.
    pub fn random() -> Self {
        Self {
            market: MarketSection {
                p_max: 30,
                ..MarketSection::default()
            },
            fleet: FleetSection {
                csv: None,
                vehicles: None,
                generator: Some(GeneratorConfig {
                    vehicles: 40,
                    ..GeneratorConfig::default()
                }),
            },
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["article", "congested", "random"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> std::result::Result<Self, ConfigError> {
        match name {
            "article" => Ok(Self::article()),
            "congested" => Ok(Self::congested()),
            "random" => Ok(Self::random()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// A relative `fleet.csv` path is resolved against the file's directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.display().to_string(),
            source,
        })?;
        let mut cfg = Self::from_toml_str(&content)?;
        cfg.base_dir = path.parent().map(Path::to_path_buf);
        Ok(cfg)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Inline and generated fleets are checked here. CSV fleets are checked
    /// by [`ScenarioConfig::build_fleet`] once the file has been read.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let m = &self.market;

        if m.horizon == 0 {
            errors.push(ConfigError::new("market.horizon", "must be > 0"));
        }
        if !(m.dt.is_finite() && m.dt > 0.0) {
            errors.push(ConfigError::new("market.dt", "must be a finite number > 0"));
        }
        if m.p_max == 0 {
            errors.push(ConfigError::new("market.p_max", "must be > 0"));
        }
        if !(m.alpha.is_finite() && m.alpha >= 0.0) {
            errors.push(ConfigError::new("market.alpha", "must be a finite number >= 0"));
        }
        if !m.beta.is_finite() {
            errors.push(ConfigError::new("market.beta", "must be finite"));
        }

        if self.solver.max_sweeps == 0 {
            errors.push(ConfigError::new("solver.max_sweeps", "must be >= 1"));
        }

        let f = &self.fleet;
        if f.sources() != 1 {
            errors.push(ConfigError::new(
                "fleet",
                "exactly one of fleet.csv, fleet.vehicles, fleet.generator must be set",
            ));
        }
        if let Some(vehicles) = &f.vehicles {
            errors.extend(Fleet::new(vehicles.clone()).validate(m.horizon));
        }
        if let Some(generator) = &f.generator {
            errors.extend(generator.validate(m.horizon));
        }

        errors
    }

    /// Path of the fleet CSV, resolved against the scenario directory.
    pub fn csv_path(&self) -> Option<PathBuf> {
        let csv = self.fleet.csv.as_ref()?;
        Some(match &self.base_dir {
            Some(dir) if csv.is_relative() => dir.join(csv),
            _ => csv.clone(),
        })
    }

    /// Reads or generates the vehicle table and validates it against the horizon.
    ///
    /// # Errors
    ///
    /// Returns an error if the CSV cannot be read or any record is invalid.
    pub fn build_fleet(&self) -> Result<Fleet> {
        let horizon = self.market.horizon;
        let fleet = if let Some(path) = self.csv_path() {
            Fleet::from_csv_path(&path)?
        } else if let Some(vehicles) = &self.fleet.vehicles {
            Fleet::new(vehicles.clone())
        } else if let Some(generator) = &self.fleet.generator {
            Error::check(generator.validate(horizon))?;
            generator.generate(horizon)
        } else {
            Fleet::default()
        };
        Error::check(fleet.validate(horizon))?;
        Ok(fleet)
    }

    /// Market parameters for the solver.
    ///
    /// # Panics
    ///
    /// Panics on values [`ScenarioConfig::validate`] rejects.
    pub fn market_config(&self) -> MarketConfig {
        let m = &self.market;
        MarketConfig::new(m.horizon, m.dt, m.p_max, m.alpha, m.beta)
    }

    /// Validates the scenario and builds a ready-to-run solver.
    ///
    /// # Errors
    ///
    /// Returns every validation error at once, or the first fleet loading error.
    pub fn solver(&self) -> Result<Solver> {
        Error::check(self.validate())?;
        let fleet = self.build_fleet()?;
        Ok(Solver::new(fleet, self.market_config()).with_max_sweeps(self.solver.max_sweeps))
    }
}
