use anyhow::{anyhow, ensure};
use swarm_agent::constants::DEFAULT_MAX_PEERS;

use crate::behaviour::NodeBehaviour;

pub const DEFAULT_BASE_PORT: u16 = 9000;
pub const DEFAULT_FLAKY_FAILURE_RATE: f64 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub nodes: usize,
    pub max_peers: usize,
    pub seed: u64,
    /// Nodes that drop a fraction of requests.
    pub flaky_nodes: usize,
    /// Nodes that announce blocks they cannot supply.
    pub malicious_nodes: usize,
    pub flaky_failure_rate: f64,
    /// A block is mined every this many rounds.
    pub block_interval: u64,
    /// Node `i` listens on `127.0.0.1:{base_port + i}`.
    pub base_port: u16,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            nodes: 8,
            max_peers: DEFAULT_MAX_PEERS,
            seed: 0,
            flaky_nodes: 0,
            malicious_nodes: 0,
            flaky_failure_rate: DEFAULT_FLAKY_FAILURE_RATE,
            block_interval: 2,
            base_port: DEFAULT_BASE_PORT,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.nodes > 0, "a simulation needs at least one node");
        ensure!(
            self.flaky_nodes + self.malicious_nodes < self.nodes,
            "at least one node must be honest, got {} flaky and {} malicious out of {}",
            self.flaky_nodes,
            self.malicious_nodes,
            self.nodes
        );
        ensure!(
            (0.0..=1.0).contains(&self.flaky_failure_rate),
            "flaky failure rate must be within [0, 1], got {}",
            self.flaky_failure_rate
        );
        ensure!(self.block_interval > 0, "block interval must be positive");
        u16::try_from(self.nodes - 1)
            .ok()
            .and_then(|offset| self.base_port.checked_add(offset))
            .ok_or_else(|| anyhow!("{} nodes do not fit above port {}", self.nodes, self.base_port))?;
        Ok(())
    }

    pub fn address(&self, index: usize) -> String {
        format!("127.0.0.1:{}", usize::from(self.base_port) + index)
    }

    /// Node 0 is always honest; malicious nodes take the highest indices and flaky nodes the
    /// ones just below them.
    pub fn behaviour(&self, index: usize) -> NodeBehaviour {
        let malicious_from = self.nodes - self.malicious_nodes;
        let flaky_from = malicious_from - self.flaky_nodes;
        if index >= malicious_from {
            NodeBehaviour::Malicious
        } else if index >= flaky_from {
            NodeBehaviour::Flaky
        } else {
            NodeBehaviour::Honest
        }
    }
}
