use std::collections::{BTreeSet, HashMap, HashSet};

use swarm_agent::transport::{SwarmCommand, SwarmTransport};

/// The in-memory swarm layer of one simulated node.
///
/// Outbound requests are queued and resolved by the network at the end of the round. Karma and
/// status reports are local state and take effect immediately.
#[derive(Debug, Clone, Default)]
pub struct SimTransport {
    own_location: String,
    known_peers: BTreeSet<String>,
    karma: HashMap<String, f64>,
    outbox: Vec<SwarmCommand>,
    /// Peers whose chain heads are polled every round.
    discovering: BTreeSet<String>,
    status_report: Option<String>,
    chain: Vec<String>,
    known_blocks: HashSet<String>,
}

impl SimTransport {
    pub fn new(own_location: String, genesis: &str) -> Self {
        let mut transport = Self {
            own_location,
            ..Default::default()
        };
        transport.add_block(genesis);
        transport
    }

    /// Record a peer connection. Returns `true` if the peer was not known before.
    pub fn add_peer(&mut self, host: &str) -> bool {
        host != self.own_location && self.known_peers.insert(host.to_string())
    }

    pub fn known_peers(&self) -> &BTreeSet<String> {
        &self.known_peers
    }

    pub fn discovering(&self) -> &BTreeSet<String> {
        &self.discovering
    }

    /// Append a block to the local chain. Returns `true` if it was new.
    pub fn add_block(&mut self, block_id: &str) -> bool {
        if !self.known_blocks.insert(block_id.to_string()) {
            return false;
        }
        self.chain.push(block_id.to_string());
        true
    }

    pub fn has_block(&self, block_id: &str) -> bool {
        self.known_blocks.contains(block_id)
    }

    /// The newest `depth` block ids, oldest first.
    pub fn chain_head(&self, depth: u32) -> &[String] {
        let depth = usize::try_from(depth).unwrap_or(usize::MAX);
        &self.chain[self.chain.len().saturating_sub(depth)..]
    }

    pub fn status_report(&self) -> Option<&str> {
        self.status_report.as_deref()
    }

    pub fn take_outbox(&mut self) -> Vec<SwarmCommand> {
        std::mem::take(&mut self.outbox)
    }
}

impl SwarmTransport for SimTransport {
    fn ping(&mut self, host: &str) {
        self.outbox.push(SwarmCommand::Ping {
            host: host.to_string(),
        });
    }

    fn discover_blocks(&mut self, host: &str, depth: u32) {
        self.discovering.insert(host.to_string());
        self.outbox.push(SwarmCommand::DiscoverBlocks {
            host: host.to_string(),
            depth,
        });
    }

    fn stop_block_discover(&mut self, host: &str, _depth: u32) {
        self.discovering.remove(host);
    }

    fn get_block(&mut self, host: &str, block_id: &str) {
        self.outbox.push(SwarmCommand::GetBlock {
            host: host.to_string(),
            block_id: block_id.to_string(),
        });
    }

    fn load_chain(&mut self, host: &str, depth: u32) {
        self.outbox.push(SwarmCommand::LoadChain {
            host: host.to_string(),
            depth,
        });
    }

    fn set_karma(&mut self, host: &str, karma: f64) {
        self.karma.insert(host.to_string(), karma);
    }

    fn get_karma(&self, host: &str) -> f64 {
        self.karma.get(host).copied().unwrap_or_default()
    }

    /// Known peers ordered by published karma, highest first.
    fn get_peers(&self, max_count: usize, min_karma: f64) -> Vec<String> {
        let mut peers: Vec<(&String, f64)> = self
            .known_peers
            .iter()
            .map(|peer| (peer, self.get_karma(peer)))
            .filter(|(_, karma)| *karma >= min_karma)
            .collect();
        peers.sort_by(|(_, a), (_, b)| b.total_cmp(a));
        peers
            .into_iter()
            .take(max_count)
            .map(|(peer, _)| peer.clone())
            .collect()
    }

    fn query_own_location(&self) -> String {
        self.own_location.clone()
    }

    fn set_status_report(&mut self, report: String) {
        self.status_report = Some(report);
    }

    fn block_count(&self) -> u64 {
        self.chain.len() as u64
    }
}
