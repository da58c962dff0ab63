use std::net::{IpAddr, Ipv4Addr};

use clap::Parser;
use swarm_agent::constants::DEFAULT_MAX_PEERS;
use swarm_simulator::config::{DEFAULT_BASE_PORT, DEFAULT_FLAKY_FAILURE_RATE, SimulationConfig};

const DEFAULT_NODES: usize = 8;
const DEFAULT_ROUNDS: u64 = 100;
const DEFAULT_ROUND_INTERVAL_MS: u64 = 100;
const DEFAULT_BLOCK_INTERVAL: u64 = 2;
const DEFAULT_METRICS_ADDRESS: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
const DEFAULT_METRICS_PORT: u16 = 8080;

#[derive(Debug, Parser)]
pub struct SimulateConfig {
    /// Verbosity level
    #[arg(short, long, default_value_t = 2)]
    pub verbosity: u8,

    /// Number of nodes in the swarm
    #[arg(long, default_value_t = DEFAULT_NODES)]
    pub nodes: usize,

    /// Number of rounds to run
    #[arg(long, default_value_t = DEFAULT_ROUNDS)]
    pub rounds: u64,

    /// Maximum number of subscriptions per agent
    #[arg(long, default_value_t = DEFAULT_MAX_PEERS)]
    pub max_peers: usize,

    /// Seed for the simulated network and every agent in it
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Nodes that drop a fraction of their requests
    #[arg(long, default_value_t = 0)]
    pub flaky_nodes: usize,

    /// Fraction of requests a flaky node drops
    #[arg(long, default_value_t = DEFAULT_FLAKY_FAILURE_RATE)]
    pub flaky_failure_rate: f64,

    /// Nodes that announce blocks they never supply
    #[arg(long, default_value_t = 0)]
    pub malicious_nodes: usize,

    /// Rounds between two mined blocks
    #[arg(long, default_value_t = DEFAULT_BLOCK_INTERVAL)]
    pub block_interval: u64,

    /// Port of node 0; node i listens on base port + i
    #[arg(long, default_value_t = DEFAULT_BASE_PORT)]
    pub base_port: u16,

    /// Wall-clock time between two rounds
    #[arg(long, default_value_t = DEFAULT_ROUND_INTERVAL_MS, value_parser = clap::value_parser!(u64).range(1..))]
    pub round_interval_ms: u64,

    #[arg(long, help = "Enable the prometheus metrics exporter")]
    pub enable_metrics: bool,

    /// Metrics bind address
    #[arg(long, default_value_t = DEFAULT_METRICS_ADDRESS)]
    pub metrics_address: IpAddr,

    /// Metrics port
    #[arg(long, default_value_t = DEFAULT_METRICS_PORT)]
    pub metrics_port: u16,
}

impl SimulateConfig {
    pub fn simulation_config(&self) -> SimulationConfig {
        SimulationConfig {
            nodes: self.nodes,
            max_peers: self.max_peers,
            seed: self.seed,
            flaky_nodes: self.flaky_nodes,
            malicious_nodes: self.malicious_nodes,
            flaky_failure_rate: self.flaky_failure_rate,
            block_interval: self.block_interval,
            base_port: self.base_port,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        config: SimulateConfig,
    }

    #[test]
    fn test_defaults() {
        let config = TestCli::parse_from(["program"]).config;

        assert_eq!(config.simulation_config(), SimulationConfig::default());
        assert_eq!(config.rounds, DEFAULT_ROUNDS);
        assert!(!config.enable_metrics);
    }

    #[test]
    fn test_swarm_shape() {
        let config = TestCli::parse_from([
            "program",
            "--nodes",
            "20",
            "--max-peers",
            "4",
            "--seed",
            "9",
            "--flaky-nodes",
            "3",
            "--malicious-nodes",
            "2",
            "--base-port",
            "7000",
        ])
        .config
        .simulation_config();

        assert_eq!(config.nodes, 20);
        assert_eq!(config.max_peers, 4);
        assert_eq!(config.seed, 9);
        assert_eq!(config.flaky_nodes, 3);
        assert_eq!(config.malicious_nodes, 2);
        assert_eq!(config.address(0), "127.0.0.1:7000");
    }

    #[test]
    fn test_rejects_zero_round_interval() {
        assert!(TestCli::try_parse_from(["program", "--round-interval-ms", "0"]).is_err());
    }
}
