use std::{env, net::SocketAddr, time::Duration};

use anyhow::Context;
use clap::Parser;
use swarm::{
    cli::{Cli, Commands, simulate::SimulateConfig, verbosity_directive},
    startup_message::startup_message,
};
use swarm_simulator::network::SimulatedNetwork;
use tokio::time;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Entry point for the swarm tools. Initializes logging, parses CLI arguments and runs the
/// selected command. Handles graceful shutdown on Ctrl-C.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set the default log level based on verbosity flag or RUST_LOG env var
    let rust_log = env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();
    let env_filter = match rust_log.is_empty() {
        true => EnvFilter::builder().parse_lossy(verbosity_directive(cli.command.verbosity())),
        false => EnvFilter::builder().parse_lossy(rust_log),
    };
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    info!("\n{}", startup_message());

    match cli.command {
        Commands::Simulate(config) => run_simulation(*config).await,
    }
}

/// Runs a simulated swarm, one round per tick, until the round budget is spent or Ctrl-C is
/// received. The final report is printed to stdout as JSON.
pub async fn run_simulation(config: SimulateConfig) -> anyhow::Result<()> {
    if config.enable_metrics {
        let address = SocketAddr::new(config.metrics_address, config.metrics_port);
        prometheus_exporter::start(address).context("Failed to start prometheus exporter")?;
        info!(
            "Metrics started on {}:{}",
            config.metrics_address, config.metrics_port
        );
    }

    let mut network = SimulatedNetwork::new(config.simulation_config())?;
    let mut interval = time::interval(Duration::from_millis(config.round_interval_ms));
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    while network.round() < config.rounds {
        tokio::select! {
            _ = &mut shutdown => {
                info!(round = network.round(), "Ctrl-C received, shutting down...");
                break;
            }
            _ = interval.tick() => network.step()?,
        }
    }

    let report = network.report();
    report.log_summary();
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
