use std::num::NonZeroUsize;

use crate::constants::DEFAULT_MAX_PEERS;

/// Construction-time settings of an agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentConfig {
    /// Upper bound on the number of subscribed peers.
    pub max_peers: usize,
    /// Seed peers pinged when the agent has nobody to talk to.
    pub peer_list: Vec<String>,
    /// Self-advertised addresses. These are rated when peerless but never selected on idle.
    pub introductions: Vec<String>,
    /// Bound on the number of peers the belief store remembers. Unbounded when `None`.
    pub max_tracked_beliefs: Option<NonZeroUsize>,
    /// Seed for peer selection. Drawn from the OS when `None`.
    pub seed: Option<u64>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_peers: DEFAULT_MAX_PEERS,
            peer_list: vec![],
            introductions: vec![],
            max_tracked_beliefs: None,
            seed: None,
        }
    }
}

impl AgentConfig {
    /// Build a config from a comma-separated seed peer list such as `"127.0.0.1:9000, 127.0.0.1:9001"`.
    pub fn from_peer_list(max_peers: usize, peer_list: &str, introductions: Vec<String>) -> Self {
        Self {
            max_peers,
            peer_list: parse_peer_list(peer_list),
            introductions,
            ..Default::default()
        }
    }

    pub fn is_introduction(&self, host: &str) -> bool {
        self.introductions.iter().any(|introduction| introduction == host)
    }
}

pub fn parse_peer_list(peer_list: &str) -> Vec<String> {
    peer_list
        .split(',')
        .map(str::trim)
        .filter(|host| !host.is_empty())
        .map(str::to_string)
        .collect()
}
