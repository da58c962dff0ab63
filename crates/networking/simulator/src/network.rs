use std::collections::HashMap;

use anyhow::Context;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use swarm_agent::{
    config::AgentConfig,
    constants::{BLOCK_DISCOVERY_DEPTH, CHAIN_REQUEST_DEPTH},
    controller::AgentController,
    event::SwarmEvent,
    transport::{SwarmCommand, SwarmTransport},
};
use tracing::{debug, info, trace};

use crate::{
    behaviour::NodeBehaviour,
    config::SimulationConfig,
    report::{BehaviourKarma, NodeReport, SimulationReport},
    transport::SimTransport,
};

pub const GENESIS_BLOCK: &str = "genesis";

pub struct SimNode {
    address: String,
    behaviour: NodeBehaviour,
    agent: AgentController<SimTransport>,
    /// Events delivered at the start of the next round.
    inbox: Vec<SwarmEvent>,
}

impl SimNode {
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn behaviour(&self) -> NodeBehaviour {
        self.behaviour
    }

    pub fn agent(&self) -> &AgentController<SimTransport> {
        &self.agent
    }
}

/// A swarm of agents wired together in memory and driven in lock-step rounds.
///
/// Each round mints blocks, lets every agent handle its pending events and an idle tick, polls
/// block discovery for every subscription, and resolves the queued requests into the events each
/// agent sees next round. With a fixed seed the run is fully deterministic.
pub struct SimulatedNetwork {
    config: SimulationConfig,
    nodes: Vec<SimNode>,
    index: HashMap<String, usize>,
    rng: ChaCha8Rng,
    round: u64,
    blocks_minted: u64,
}

impl SimulatedNetwork {
    pub fn new(config: SimulationConfig) -> anyhow::Result<Self> {
        config.validate().context("Invalid simulation config")?;

        let seed_peer = config.address(0);
        let nodes: Vec<SimNode> = (0..config.nodes)
            .map(|index| {
                let address = config.address(index);
                let peer_list = if index == 0 {
                    vec![]
                } else {
                    vec![seed_peer.clone()]
                };
                let agent_config = AgentConfig {
                    max_peers: config.max_peers,
                    peer_list,
                    introductions: vec![address.clone()],
                    max_tracked_beliefs: None,
                    seed: Some(config.seed.wrapping_add(index as u64 + 1)),
                };
                let transport = SimTransport::new(address.clone(), GENESIS_BLOCK);
                SimNode {
                    behaviour: config.behaviour(index),
                    agent: AgentController::new(agent_config, transport),
                    inbox: vec![],
                    address,
                }
            })
            .collect();
        let index = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.address.clone(), index))
            .collect();

        info!(
            nodes = config.nodes,
            flaky = config.flaky_nodes,
            malicious = config.malicious_nodes,
            seed = config.seed,
            "Starting simulated swarm"
        );

        Ok(Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            nodes,
            index,
            round: 0,
            blocks_minted: 0,
        })
    }

    pub fn nodes(&self) -> &[SimNode] {
        &self.nodes
    }

    pub fn round(&self) -> u64 {
        self.round
    }

    /// Run `rounds` rounds and report the outcome.
    pub fn run(&mut self, rounds: u64) -> anyhow::Result<SimulationReport> {
        for _ in 0..rounds {
            self.step()?;
        }
        let report = self.report();
        report.log_summary();
        Ok(report)
    }

    /// Advance the swarm by one round.
    pub fn step(&mut self) -> anyhow::Result<()> {
        self.round += 1;
        if self.round % self.config.block_interval == 0 {
            self.mint_block();
        }

        for node in &mut self.nodes {
            let mut events = std::mem::take(&mut node.inbox);
            if node.agent.transport().known_peers().is_empty() {
                events.insert(0, SwarmEvent::Peerless);
            }
            events.push(SwarmEvent::Idle);

            for event in events {
                node.agent
                    .handle_event(event)
                    .with_context(|| format!("Agent {} failed to handle an event", node.address))?;
            }

            if self.round % self.config.block_interval == 0
                && let Some(host) = trusted_subscription(&node.agent)
            {
                node.agent.request_chain(&host);
            }
        }

        for source in 0..self.nodes.len() {
            let mut events = vec![];
            let discovering: Vec<String> = self.nodes[source]
                .agent
                .transport()
                .discovering()
                .iter()
                .cloned()
                .collect();
            for host in discovering {
                events.extend(self.fetch_chain(source, host, BLOCK_DISCOVERY_DEPTH));
            }
            for command in self.nodes[source].agent.transport_mut().take_outbox() {
                events.extend(self.resolve(source, command));
            }
            self.nodes[source].inbox.extend(events);
        }

        debug!(round = self.round, blocks = self.blocks_minted, "Round complete");
        Ok(())
    }

    pub fn report(&self) -> SimulationReport {
        let nodes = self
            .nodes
            .iter()
            .map(|node| NodeReport {
                address: node.address.clone(),
                behaviour: node.behaviour,
                blocks: node.agent.transport().block_count(),
                known_peers: node.agent.transport().known_peers().len(),
                status_report: node.agent.status_report(),
            })
            .collect();

        let karma_by_behaviour = NodeBehaviour::ALL
            .iter()
            .map(|behaviour| self.karma_of(*behaviour))
            .collect();

        SimulationReport {
            rounds: self.round,
            blocks_minted: self.blocks_minted,
            nodes,
            karma_by_behaviour,
        }
    }

    /// Mean karma honest nodes hold for nodes of the given behaviour.
    fn karma_of(&self, behaviour: NodeBehaviour) -> BehaviourKarma {
        let targets: Vec<&SimNode> = self
            .nodes
            .iter()
            .filter(|node| node.behaviour == behaviour)
            .collect();

        let samples: Vec<f64> = self
            .nodes
            .iter()
            .filter(|observer| observer.behaviour == NodeBehaviour::Honest)
            .flat_map(|observer| {
                targets
                    .iter()
                    .filter(|target| target.address != observer.address)
                    .filter(|target| observer.agent.beliefs().contains(&target.address))
                    .map(|target| observer.agent.karma(&target.address))
            })
            .collect();

        let mean_karma =
            (!samples.is_empty()).then(|| samples.iter().sum::<f64>() / samples.len() as f64);

        BehaviourKarma {
            behaviour,
            nodes: targets.len(),
            samples: samples.len(),
            mean_karma,
        }
    }

    fn mint_block(&mut self) {
        let miners: Vec<usize> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.behaviour == NodeBehaviour::Honest)
            .map(|(index, _)| index)
            .collect();
        if miners.is_empty() {
            return;
        }

        let miner = miners[self.rng.random_range(0..miners.len())];
        self.blocks_minted += 1;
        let block_id = format!("block-{:06}", self.blocks_minted);
        debug!(miner = %self.nodes[miner].address, block_id, "Minted block");
        self.nodes[miner].agent.transport_mut().add_block(&block_id);
    }

    fn lookup(&self, host: &str) -> Option<usize> {
        self.index.get(host).copied()
    }

    /// Whether `target` drops the request it is being sent.
    fn drops_request(&mut self, target: usize) -> bool {
        self.nodes[target].behaviour == NodeBehaviour::Flaky
            && self.rng.random_bool(self.config.flaky_failure_rate)
    }

    fn resolve(&mut self, source: usize, command: SwarmCommand) -> Vec<SwarmEvent> {
        trace!(source = %self.nodes[source].address, ?command, "Resolving command");
        match command {
            SwarmCommand::Ping { host } => self.ping(source, host),
            SwarmCommand::LoadChain { host, depth } => self.fetch_chain(source, host, depth),
            SwarmCommand::GetBlock { host, block_id } => self.get_block(source, host, block_id),
            // Discovery is served by the per-round poll.
            SwarmCommand::DiscoverBlocks { .. }
            | SwarmCommand::StopBlockDiscover { .. }
            | SwarmCommand::SetKarma { .. }
            | SwarmCommand::SetStatusReport { .. } => vec![],
        }
    }

    /// A successful ping connects both ends and introduces one of the target's peers.
    fn ping(&mut self, source: usize, host: String) -> Vec<SwarmEvent> {
        let Some(target) = self.lookup(&host) else {
            return vec![SwarmEvent::PingFailed { host }];
        };
        if self.drops_request(target) {
            return vec![SwarmEvent::PingFailed { host }];
        }

        let source_address = self.nodes[source].address.clone();
        self.nodes[target]
            .agent
            .transport_mut()
            .add_peer(&source_address);

        let target_peers = self.nodes[target].agent.transport().known_peers();
        let introduced = match target_peers.len() {
            0 => None,
            count => target_peers
                .iter()
                .nth(self.rng.random_range(0..count))
                .cloned(),
        };

        let transport = self.nodes[source].agent.transport_mut();
        transport.add_peer(&host);

        let mut events = vec![];
        if let Some(peer) = introduced
            && transport.add_peer(&peer)
        {
            events.push(SwarmEvent::NewPeerDiscovered { host: peer });
        }
        events.push(SwarmEvent::PingSucceeded { host });
        events
    }

    fn fetch_chain(&mut self, source: usize, host: String, depth: u32) -> Vec<SwarmEvent> {
        let Some(target) = self.lookup(&host) else {
            return vec![SwarmEvent::PingFailed { host }];
        };
        if self.drops_request(target) {
            return vec![SwarmEvent::PingFailed { host }];
        }

        if self.nodes[target].behaviour == NodeBehaviour::Malicious {
            let block_id = format!("forged-{target}-{}", self.round);
            return vec![SwarmEvent::LooseBlock { host, block_id }];
        }

        let head = self.nodes[target].agent.transport().chain_head(depth).to_vec();
        let transport = self.nodes[source].agent.transport_mut();
        head.into_iter()
            .map(|block_id| {
                if transport.add_block(&block_id) {
                    SwarmEvent::NewBlockIdFound {
                        host: host.clone(),
                        block_id,
                    }
                } else {
                    SwarmEvent::BlockIdRepeated {
                        host: host.clone(),
                        block_id,
                    }
                }
            })
            .collect()
    }

    fn get_block(&mut self, source: usize, host: String, block_id: String) -> Vec<SwarmEvent> {
        let Some(target) = self.lookup(&host) else {
            return vec![SwarmEvent::PingFailed { host }];
        };

        let supplied = !self.drops_request(target)
            && self.nodes[target].behaviour != NodeBehaviour::Malicious
            && self.nodes[target].agent.transport().has_block(&block_id);
        if !supplied {
            return vec![SwarmEvent::BlockNotSupplied { host, block_id }];
        }

        self.nodes[source].agent.transport_mut().add_block(&block_id);
        vec![SwarmEvent::BlockSupplied { host, block_id }]
    }
}

/// The subscription the agent currently rates highest.
fn trusted_subscription(agent: &AgentController<SimTransport>) -> Option<String> {
    agent
        .subscriptions()
        .peers()
        .iter()
        .max_by(|a, b| agent.karma(a).total_cmp(&agent.karma(b)))
        .cloned()
}
