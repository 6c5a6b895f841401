//! vqesim - Main CLI Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use vqesim::{
    cli::{Args, Commands, Config, RunArgs, Verbosity},
    display::DashboardView,
    events::{EventBus, SimulatorEvent},
    logging,
    notifications::{NotificationLevel, SharedNotifications},
    simulator::{ConvergenceSimulator, NoiseRegistry, DEFAULT_NOISE},
    telemetry::{TelemetryCollector, TelemetryDisplay},
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Err(msg) = args.validate() {
        eprintln!("{} {}", "Error:".red().bold(), msg);
        std::process::exit(2);
    }

    // `config --init` must work when the target file is missing or unreadable
    if let Some(Commands::Config { init: true }) = &args.command {
        let path = Config::write_default(args.config.as_deref())
            .context("Failed to write default configuration")?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    let config = Config::load(args.config.as_deref()).context("Failed to load configuration")?;

    let verbosity = if args.quiet || args.verbose > 0 {
        args.verbosity()
    } else {
        config.default_verbosity()
    };

    if !config.telemetry.color_output {
        colored::control::set_override(false);
    }

    if let Err(err) = logging::init(verbosity) {
        eprintln!("{} {}", "Warning:".yellow(), err);
    }

    match &args.command {
        Some(Commands::Config { .. }) => show_config(&config),
        _ => {
            let run = args.run_args().unwrap_or_default();
            execute_runs(&config, &run, verbosity).await
        }
    }
}

fn show_config(config: &Config) -> Result<()> {
    let rendered = toml::to_string_pretty(config).context("Failed to serialize config")?;
    println!("{}", rendered);
    Ok(())
}

async fn execute_runs(config: &Config, run: &RunArgs, verbosity: Verbosity) -> Result<()> {
    let mut sim_config = config.simulator.clone();
    if let Some(interval_ms) = run.interval_ms {
        sim_config.interval_ms = interval_ms;
    }
    sim_config.validate()?;

    let telemetry = TelemetryCollector::new();
    let (bus, mut events) = EventBus::new();
    let notifications = SharedNotifications::new(config.notifications.queue());
    let sweeper = notifications.spawn_sweeper(config.notifications.sweep_interval());

    let simulator = ConvergenceSimulator::new(sim_config.clone())
        .with_event_bus(bus)
        .with_telemetry(telemetry.clone());
    let simulator = match (run.noise_name(), run.seed) {
        (None, None) => simulator,
        (name, seed) => {
            let name = name.unwrap_or(DEFAULT_NOISE);
            simulator.with_boxed_noise(NoiseRegistry::new().create(name, seed))
        }
    };

    let show_progress = verbosity.show_progress() && config.telemetry.show_progress_bars;
    let mut view = DashboardView::new(show_progress, verbosity.show_events());
    view.show_banner(sim_config.target, sim_config.max_iterations, sim_config.interval());

    for run_number in 1..=run.runs {
        simulator.start();
        view.start_run(run_number, sim_config.max_iterations);

        let generation = simulator.snapshot().generation;
        while let Some(event) = events.recv().await {
            if event.generation() != generation {
                continue;
            }
            match event {
                SimulatorEvent::SampleRecorded { sample, .. } => view.on_sample(&sample),
                SimulatorEvent::RunConverged {
                    iterations, reason, ..
                } => {
                    let id = notifications.push(
                        format!("Run {} converged after {} iterations", run_number, iterations),
                        NotificationLevel::Success,
                    );
                    if let Some(notification) =
                        notifications.active().into_iter().find(|n| n.id == id)
                    {
                        view.show_notification(&notification);
                    }
                    view.finish_run(simulator.summary().as_ref(), reason.describe());
                    break;
                }
                SimulatorEvent::RunStarted { .. } | SimulatorEvent::RunReset { .. } => {}
            }
        }

        view.show_series(&simulator.samples());

        if run.json {
            let snapshot = serde_json::to_string_pretty(&simulator.snapshot())?;
            println!("{}", snapshot);
        }
    }

    sweeper.abort();
    TelemetryDisplay::new(telemetry, verbosity).display_summary();
    Ok(())
}
