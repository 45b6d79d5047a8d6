//! Every shipped scenario file parses, validates and solves.

mod common;

use std::path::Path;

use charge_equilibrium::config::ScenarioConfig;
use charge_equilibrium::market::Status;

const SCENARIOS: &[&str] = &[
    "scenarios/article.toml",
    "scenarios/evening_peak.toml",
    "scenarios/random.toml",
];

#[test]
fn shipped_scenarios_are_valid() {
    for path in SCENARIOS {
        let cfg = ScenarioConfig::from_toml_file(Path::new(path))
            .unwrap_or_else(|e| panic!("{path} should load: {e}"));
        let errors = cfg.validate();
        assert!(errors.is_empty(), "{path} should be valid: {errors:?}");
        let eq = cfg.solver().expect("solver builds").run();
        assert!(eq.status.is_terminal(), "{path}");
    }
}

#[test]
fn article_csv_matches_builtin_fleet() {
    let cfg = ScenarioConfig::from_toml_file(Path::new("scenarios/article.toml")).expect("loads");
    assert_eq!(cfg.build_fleet().expect("csv reads"), common::article_fleet());
    assert_eq!(
        ScenarioConfig::article().build_fleet().expect("inline fleet"),
        common::article_fleet()
    );
}

#[test]
fn random_scenario_matches_random_preset() {
    let file = ScenarioConfig::from_toml_file(Path::new("scenarios/random.toml")).expect("loads");
    let preset = ScenarioConfig::random();
    assert_eq!(
        file.build_fleet().expect("generated"),
        preset.build_fleet().expect("generated")
    );
}

#[test]
fn evening_peak_respects_the_cap() {
    let cfg =
        ScenarioConfig::from_toml_file(Path::new("scenarios/evening_peak.toml")).expect("loads");
    let solver = cfg.solver().expect("solver builds");
    let report = solver.report(&solver.run());
    assert_eq!(report.status, Status::Converged);
    assert_eq!(report.cap_violations, 0);
}

#[test]
fn missing_scenario_file_names_the_path() {
    let err = ScenarioConfig::from_toml_file(Path::new("scenarios/nope.toml"))
        .expect_err("missing file");
    assert!(err.to_string().contains("scenarios/nope.toml"));
}
