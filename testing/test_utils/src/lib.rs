use std::collections::HashMap;

use swarm_agent::{
    status_report::SitRep,
    transport::{SwarmCommand, SwarmTransport},
};

/// A transport that records every command it is given and answers queries from fixed state.
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    pub own_location: String,
    /// Peers returned from `get_peers`, in order.
    pub peers: Vec<String>,
    pub karma: HashMap<String, f64>,
    pub commands: Vec<SwarmCommand>,
    pub block_count: u64,
}

impl RecordingTransport {
    pub fn new(own_location: &str) -> Self {
        Self {
            own_location: own_location.to_string(),
            ..Default::default()
        }
    }

    pub fn with_peers(mut self, peers: &[&str]) -> Self {
        self.peers = peers.iter().map(|peer| peer.to_string()).collect();
        self
    }

    /// Drain the recorded commands.
    pub fn take_commands(&mut self) -> Vec<SwarmCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn pinged(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                SwarmCommand::Ping { host } => Some(host.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn discovering(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                SwarmCommand::DiscoverBlocks { host, .. } => Some(host.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn unsubscribed(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                SwarmCommand::StopBlockDiscover { host, .. } => Some(host.as_str()),
                _ => None,
            })
            .collect()
    }

    /// The most recently published status report, parsed.
    pub fn last_status_report(&self) -> Option<SitRep> {
        self.commands.iter().rev().find_map(|command| match command {
            SwarmCommand::SetStatusReport { report } => serde_json::from_str(report).ok(),
            _ => None,
        })
    }

    pub fn status_report_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, SwarmCommand::SetStatusReport { .. }))
            .count()
    }
}

impl SwarmTransport for RecordingTransport {
    fn ping(&mut self, host: &str) {
        self.commands.push(SwarmCommand::Ping {
            host: host.to_string(),
        });
    }

    fn discover_blocks(&mut self, host: &str, depth: u32) {
        self.commands.push(SwarmCommand::DiscoverBlocks {
            host: host.to_string(),
            depth,
        });
    }

    fn stop_block_discover(&mut self, host: &str, depth: u32) {
        self.commands.push(SwarmCommand::StopBlockDiscover {
            host: host.to_string(),
            depth,
        });
    }

    fn get_block(&mut self, host: &str, block_id: &str) {
        self.commands.push(SwarmCommand::GetBlock {
            host: host.to_string(),
            block_id: block_id.to_string(),
        });
    }

    fn load_chain(&mut self, host: &str, depth: u32) {
        self.commands.push(SwarmCommand::LoadChain {
            host: host.to_string(),
            depth,
        });
    }

    fn set_karma(&mut self, host: &str, karma: f64) {
        self.karma.insert(host.to_string(), karma);
        self.commands.push(SwarmCommand::SetKarma {
            host: host.to_string(),
            karma,
        });
    }

    fn get_karma(&self, host: &str) -> f64 {
        self.karma.get(host).copied().unwrap_or_default()
    }

    fn get_peers(&self, max_count: usize, min_karma: f64) -> Vec<String> {
        self.peers
            .iter()
            .filter(|peer| self.karma.get(peer.as_str()).is_none_or(|karma| *karma >= min_karma))
            .take(max_count)
            .cloned()
            .collect()
    }

    fn query_own_location(&self) -> String {
        self.own_location.clone()
    }

    fn set_status_report(&mut self, report: String) {
        self.commands.push(SwarmCommand::SetStatusReport { report });
    }

    fn block_count(&self) -> u64 {
        self.block_count
    }
}
