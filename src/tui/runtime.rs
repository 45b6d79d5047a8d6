//! TUI application state around a live equilibrium iterator.

use std::time::Instant;

use crate::config::ScenarioConfig;
use crate::error::Result;
use crate::market::{EquilibriumIterator, ScheduleReport, Status};

/// Tick interval options in milliseconds (slowest → fastest).
const SPEED_LEVELS_MS: [u64; 6] = [1000, 500, 250, 100, 50, 20];

/// Default speed index (250 ms).
const DEFAULT_SPEED_IDX: usize = 2;

/// TUI application state.
pub struct App {
    /// Iterator positioned at the latest sweep.
    iterator: EquilibriumIterator,
    /// Current scenario (kept for restart).
    scenario: ScenarioConfig,
    /// Vehicles moved by the latest sweep.
    pub moved_last: Option<usize>,
    /// Whether automatic sweeping is paused.
    pub paused: bool,
    /// Current index into `SPEED_LEVELS_MS`.
    pub speed_idx: usize,
    /// Whether the user has requested quit.
    pub quit: bool,
    /// When the last sweep was executed.
    pub last_tick: Instant,
    /// Name of the active scenario or preset.
    pub preset_name: String,
}

impl App {
    /// Creates an app positioned at the warm start of `scenario`.
    ///
    /// # Errors
    ///
    /// Returns an error if the scenario is invalid or its fleet cannot be loaded.
    pub fn new(scenario: ScenarioConfig, name: &str) -> Result<Self> {
        let iterator = scenario.solver()?.iterator();
        Ok(Self {
            iterator,
            scenario,
            moved_last: None,
            paused: false,
            speed_idx: DEFAULT_SPEED_IDX,
            quit: false,
            last_tick: Instant::now(),
            preset_name: name.to_string(),
        })
    }

    /// Runs one sweep unless iteration has already terminated.
    pub fn tick(&mut self) {
        if self.is_finished() {
            return;
        }
        self.moved_last = Some(self.iterator.sweep());
    }

    /// Toggles pause/resume.
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Shortens the tick interval.
    pub fn speed_up(&mut self) {
        if self.speed_idx + 1 < SPEED_LEVELS_MS.len() {
            self.speed_idx += 1;
        }
    }

    /// Lengthens the tick interval.
    pub fn speed_down(&mut self) {
        if self.speed_idx > 0 {
            self.speed_idx -= 1;
        }
    }

    /// Returns the current tick interval in milliseconds.
    pub fn tick_interval_ms(&self) -> u64 {
        SPEED_LEVELS_MS[self.speed_idx]
    }

    /// Switches to a built-in preset and restarts from its warm start.
    ///
    /// Unknown or failing presets leave the current state untouched.
    pub fn switch_preset(&mut self, name: &str) {
        let Ok(scenario) = ScenarioConfig::from_preset(name) else {
            return;
        };
        self.load(scenario, name);
    }

    /// Restarts the current scenario from its warm start.
    pub fn restart(&mut self) {
        let name = self.preset_name.clone();
        self.load(self.scenario.clone(), &name);
    }

    fn load(&mut self, scenario: ScenarioConfig, name: &str) {
        let Ok(solver) = scenario.solver() else {
            return;
        };
        self.iterator = solver.iterator();
        self.scenario = scenario;
        self.moved_last = None;
        self.paused = false;
        self.preset_name = name.to_string();
    }

    pub fn status(&self) -> Status {
        self.iterator.status()
    }

    pub fn sweeps(&self) -> usize {
        self.iterator.sweeps()
    }

    pub fn max_sweeps(&self) -> usize {
        self.iterator.max_sweeps()
    }

    /// Returns `true` once the iterator has converged or hit its limit.
    pub fn is_finished(&self) -> bool {
        self.status().is_terminal()
    }

    /// Report of the schedule as it stands after the latest sweep.
    pub fn report(&self) -> ScheduleReport {
        ScheduleReport::from_equilibrium(
            self.iterator.fleet(),
            self.iterator.config(),
            &self.iterator.snapshot(),
        )
    }
}
