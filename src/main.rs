//! Charging equilibrium entry point: CLI wiring and scenario-driven solver construction.

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use charge_equilibrium::cli::Cli;
use charge_equilibrium::io::export::{export_profile_csv, export_schedule_csv};

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let scenario = cli.load_scenario()?;

    #[cfg(feature = "tui")]
    if cli.tui {
        let app = charge_equilibrium::tui::App::new(scenario, &cli.scenario_name())?;
        return charge_equilibrium::tui::run(app).context("terminal UI failed");
    }

    let solver = scenario.solver()?;
    let equilibrium = solver.run();
    let report = solver.report(&equilibrium);

    println!("{report}");
    println!();
    println!("{}", report.timeline());

    if let Some(path) = &cli.schedule_out {
        export_schedule_csv(&report, path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "schedule written");
    }
    if let Some(path) = &cli.profile_out {
        export_profile_csv(&report, path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "profile written");
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(charge_equilibrium::api::AppState {
            config: solver.config().clone(),
            report,
        });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;
        rt.block_on(charge_equilibrium::api::serve(state, addr))
            .with_context(|| format!("API server on {addr} failed"))?;
    }

    Ok(())
}
